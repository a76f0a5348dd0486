use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Period not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}
