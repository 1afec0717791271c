//! Errors raised while constructing or parsing fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("decimal arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}
