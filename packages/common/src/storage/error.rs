use thiserror::Error;

/// Errors that can occur while storing or retrieving uploaded files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file was not found on disk.
    #[error("stored file not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored name is not a flat filename.
    #[error("invalid stored name: {0}")]
    InvalidName(String),

    /// The upload exceeds the configured size limit.
    #[error("upload exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
