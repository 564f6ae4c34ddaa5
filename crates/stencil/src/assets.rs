//! Where templates and CSV data come from, and where outputs go

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{MergeError, MergeResult};

/// A read-only source of named assets (templates and CSV files)
pub trait AssetSource {
    /// Read an asset fully into memory.
    ///
    /// A missing asset is reported as [`MergeError::AssetNotFound`].
    fn open(&self, name: &str) -> MergeResult<Vec<u8>>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn open(&self, name: &str) -> MergeResult<Vec<u8>> {
        (**self).open(name)
    }
}

/// Assets read from files under a root directory
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Assets under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn open(&self, name: &str) -> MergeResult<Vec<u8>> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(asset = name, bytes = bytes.len(), "read asset");
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MergeError::AssetNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Assets held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// An empty set of assets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(name.into(), bytes.into());
    }

    /// Builder form of [`MemoryAssets::insert`]
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn open(&self, name: &str) -> MergeResult<Vec<u8>> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| MergeError::AssetNotFound(name.to_string()))
    }
}

/// Directory that merge outputs are written to
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Outputs under `root` (created on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of an output file
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Write an output file, replacing any existing one. Parent
    /// directories are created. Returns the full path written.
    ///
    /// `file_name` must be a relative path of plain components; anything
    /// that could land outside the root is refused.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> MergeResult<PathBuf> {
        let relative = Path::new(file_name);
        let plain = relative.components().next().is_some()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(MergeError::InvalidOutputName(file_name.to_string()));
        }
        let path = self.resolve(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        Ok(path)
    }
}
