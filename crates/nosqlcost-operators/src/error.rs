use nosqlcost_core::error::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    /// Invalid shapes/values raised by the size and cost models.
    #[error(transparent)]
    Model(#[from] CoreError),

    #[error("operator '{operator}' requires a right-hand collection")]
    MissingRight { operator: &'static str },

    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}
