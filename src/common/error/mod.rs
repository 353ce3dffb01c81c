//! Unified error types for stoppack.
//!
//! Every fallible operation in the crate returns [`Result`], so callers only
//! ever have to match on one error enum.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
