use crate::literal::LiteralError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LiteralError> for CoreError {
    fn from(err: LiteralError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
