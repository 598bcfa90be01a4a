//! REST API endpoints for Brapi
pub mod raw;

#[cfg(feature = "table")]
pub mod table;

// Re-export raw module for convenience.
pub use raw::*;
