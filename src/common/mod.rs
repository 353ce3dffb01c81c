//! Common types and utilities shared by the analyzer, the scenario
//! processors and the package writer.

// Submodule declarations
pub mod clock;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
