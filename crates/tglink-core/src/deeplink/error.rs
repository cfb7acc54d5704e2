//! Reasons an address has no deep-link equivalent.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("address has no path segments")]
    NoSegments,
    #[error("phone path has no digits after '+'")]
    EmptyPhone,
    #[error("{segment:?} is a reserved path")]
    ReservedPath { segment: String },
    #[error("{segment:?} is not a valid username")]
    InvalidUsername { segment: String },
}
