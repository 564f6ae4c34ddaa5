//! OPC error types

use thiserror::Error;

/// Result type for package operations
pub type OpcResult<T> = std::result::Result<T, OpcError>;

/// Errors that can occur while reading or writing a package
#[derive(Debug, Error)]
pub enum OpcError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Part content is not valid UTF-8
    #[error("Part {0} is not valid UTF-8")]
    Encoding(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Structurally invalid package
    #[error("Invalid package: {0}")]
    InvalidFormat(String),
}
