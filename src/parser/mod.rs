//! Parser module for building the untyped tree.
//!
//! This module transforms a stream of tokens into a [`Query`](crate::ast::ast::Query).
//! Every compound form is a parenthesised list whose head token selects the
//! handler, so parsing is table driven rather than precedence driven:
//!
//! - Statement parsing (version, network blocks, assertions)
//! - Definition parsing (tensor declarations and network relations)
//! - Expression parsing (literals, indexed variables, operator forms)
//!
//! The first syntax error aborts the parse.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
