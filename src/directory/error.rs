use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Organization not found: {0}")]
    NotFound(String),

    #[error("Organization directory unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
