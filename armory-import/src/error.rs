//! Error types for armory-import
//!
//! Only run-fatal failures live here. A character fetch or mapping failure is
//! not an error of the run; it becomes a [`SkipReason`](crate::pipeline::SkipReason).

use crate::client::ApiError;
use thiserror::Error;

/// Fatal import error
#[derive(Debug, Error)]
pub enum ImportError {
    /// Token exchange or roster fetch failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Store write failed
    #[error(transparent)]
    Store(#[from] armory_common::Error),
}

/// Result type for import runs
pub type ImportResult<T> = Result<T, ImportError>;
