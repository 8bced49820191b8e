use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The media backend refused a play-intent (autoplay policy, revoked
    /// permission, source swapped out mid-request).
    #[error("Play request rejected: {0}")]
    Rejected(String),

    #[error("Unknown media resource: {0}")]
    UnknownResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
