//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid cache capacity: {0} (must be greater than zero)")]
    InvalidCapacity(i64),
}
