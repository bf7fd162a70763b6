//! engconv Core - Fundamental types
//!
//! This crate provides the types shared by every engconv crate:
//! - `ConvError`: Structured conversion errors
//! - `codes`: Machine-readable error codes

mod error;

pub use error::{ConvError, ErrorReport, Result, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ConvError, ErrorReport, Result};
    pub use crate::error::codes;
}
