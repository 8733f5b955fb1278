//! Type checking and semantic analysis module.
//!
//! This module turns the untyped tree into a typed one while:
//!
//! - Resolving every variable reference to a declared tensor symbol
//! - Inferring and unifying element types, pinning numeric literals
//! - Checking indices against declared shapes
//! - Validating network relations and the version header
//!
//! Errors are collected rather than returned, so one pass reports every
//! problem in the query.

pub mod dtype;
pub mod symbols;
pub mod type_checker;
pub mod typed_ast;
