//! Pipeline rejections.

use std::fmt;

/// Why the pipeline stopped a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The path requires a principal and none is attached.
    Unauthenticated { path: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated { path } => {
                write!(f, "authentication required for {path}")
            }
        }
    }
}

impl std::error::Error for Rejection {}
