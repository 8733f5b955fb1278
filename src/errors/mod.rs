//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout the build pass.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants grouped into syntax, symbol, type, shape and
//!   structural kinds
//! - The diagnostic accumulator used for best-effort builds
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
