//! Unit tests for error handling.
//!
//! This module contains tests for error types, kinds and report rendering.

use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::sync::Arc;

fn position(offset: u32) -> Position {
    Position(offset, Arc::new("test.vnnlib".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Syntax);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(42),
    );

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_symbol_errors_have_symbol_kind() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        position(0),
    );
    assert_eq!(error.kind(), ErrorKind::Symbol);

    let error = Error::new(
        ErrorImpl::NetworkNotDeclared {
            network: "net".to_string(),
        },
        position(0),
    );
    assert_eq!(error.kind(), ErrorKind::Symbol);
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: "float32".to_string(),
            received: "int8".to_string(),
            operand: "Y[0]".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.kind(), ErrorKind::Type);
    assert!(error.to_string().contains("float32"));
    assert!(error.to_string().contains("int8"));
}

#[test]
fn test_shape_errors_have_shape_kind() {
    let error = Error::new(
        ErrorImpl::IndexOutOfBounds {
            variable: "X".to_string(),
            index: 5,
            dimension: 0,
            bound: 1,
        },
        position(0),
    );

    assert_eq!(error.kind(), ErrorKind::Shape);
    assert_eq!(
        error.get_tip().to_string(),
        "Index 5 out of bound 1 for dimension 0 of `X`"
    );
}

#[test]
fn test_structural_errors_have_structural_kind() {
    let error = Error::new(
        ErrorImpl::InvalidVersion {
            version: "2".to_string(),
        },
        position(0),
    );

    assert_eq!(error.kind(), ErrorKind::Structural);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_empty_diagnostics_render_empty_report() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());
    assert_eq!(diagnostics.report("(vnnlib-version <2.0>)", "test.vnnlib"), "");
}

#[test]
fn test_diagnostics_report_points_at_line() {
    let source = "(vnnlib-version <2.0>)\n(assert (> X 1))\n";
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "X".to_string(),
        },
        position(34),
    ));

    let report = diagnostics.report(source, "test.vnnlib");
    assert!(report.contains("VariableNotDeclared"));
    assert!(report.contains("test.vnnlib:2"));
    assert!(report.contains("2 | (assert (> X 1))"));
    assert_eq!(diagnostics.count_of(ErrorKind::Symbol), 1);
}
