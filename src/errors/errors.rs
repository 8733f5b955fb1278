use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The error categories a caller can branch on.
///
/// Only `Syntax` and `Io` abort a build; every other kind is recovered
/// locally and accumulated into [`super::diagnostics::Diagnostics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Symbol,
    Type,
    Shape,
    Structural,
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Symbol => "symbol",
            ErrorKind::Type => "type",
            ErrorKind::Shape => "shape",
            ErrorKind::Structural => "structural",
            ErrorKind::Io => "io",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::UnknownType { .. } => ErrorKind::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::AmbiguousVariable { .. }
            | ErrorImpl::NetworkAlreadyDeclared { .. }
            | ErrorImpl::NetworkNotDeclared { .. } => ErrorKind::Symbol,
            ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::ComparisonTypeMismatch { .. }
            | ErrorImpl::NonNumericOperand { .. }
            | ErrorImpl::ExpectedArithmetic { .. }
            | ErrorImpl::ExpectedBoolean { .. }
            | ErrorImpl::NetworkUsedAsTensor { .. }
            | ErrorImpl::UnpinnedLiteral { .. } => ErrorKind::Type,
            ErrorImpl::IndexRankMismatch { .. } | ErrorImpl::IndexOutOfBounds { .. } => {
                ErrorKind::Shape
            }
            ErrorImpl::InvalidVersion { .. }
            | ErrorImpl::ContradictoryRelations { .. }
            | ErrorImpl::SelfRelation { .. }
            | ErrorImpl::RelationSignatureMismatch { .. } => ErrorKind::Structural,
            ErrorImpl::FileReadError { .. } => ErrorKind::Io,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::AmbiguousVariable { .. } => "AmbiguousVariable",
            ErrorImpl::NetworkAlreadyDeclared { .. } => "NetworkAlreadyDeclared",
            ErrorImpl::NetworkNotDeclared { .. } => "NetworkNotDeclared",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ComparisonTypeMismatch { .. } => "ComparisonTypeMismatch",
            ErrorImpl::NonNumericOperand { .. } => "NonNumericOperand",
            ErrorImpl::ExpectedArithmetic { .. } => "ExpectedArithmetic",
            ErrorImpl::ExpectedBoolean { .. } => "ExpectedBoolean",
            ErrorImpl::NetworkUsedAsTensor { .. } => "NetworkUsedAsTensor",
            ErrorImpl::UnpinnedLiteral { .. } => "UnpinnedLiteral",
            ErrorImpl::IndexRankMismatch { .. } => "IndexRankMismatch",
            ErrorImpl::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            ErrorImpl::InvalidVersion { .. } => "InvalidVersion",
            ErrorImpl::ContradictoryRelations { .. } => "ContradictoryRelations",
            ErrorImpl::SelfRelation { .. } => "SelfRelation",
            ErrorImpl::RelationSignatureMismatch { .. } => "RelationSignatureMismatch",
            ErrorImpl::FileReadError { .. } => "FileReadError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, is a parenthesis missing?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown element type `{}` found", type_))
            }
            ErrorImpl::VariableAlreadyDeclared { variable, network } => ErrorTip::Suggestion(
                format!("Variable `{}` already declared in network `{}`", variable, network),
            ),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::AmbiguousVariable { variable, networks } => ErrorTip::Suggestion(format!(
                "Variable `{}` is declared in several networks: {}",
                variable, networks
            )),
            ErrorImpl::NetworkAlreadyDeclared { network } => {
                ErrorTip::Suggestion(format!("Network `{}` already declared", network))
            }
            ErrorImpl::NetworkNotDeclared { network } => {
                ErrorTip::Suggestion(format!("Network `{}` not declared", network))
            }
            ErrorImpl::TypeMatchError {
                expected,
                received,
                operand,
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}` from `{}`",
                expected, received, operand
            )),
            ErrorImpl::ComparisonTypeMismatch { lhs, rhs } => ErrorTip::Suggestion(format!(
                "Cannot compare `{}` with `{}`",
                lhs, rhs
            )),
            ErrorImpl::NonNumericOperand { type_, operand } => ErrorTip::Suggestion(format!(
                "Operand `{}` has non-numeric type `{}`",
                operand, type_
            )),
            ErrorImpl::ExpectedArithmetic { found } => ErrorTip::Suggestion(format!(
                "Expected an arithmetic expression, found `{}`",
                found
            )),
            ErrorImpl::ExpectedBoolean { found, type_ } => ErrorTip::Suggestion(format!(
                "Expected a boolean expression, found `{}` of type `{}`",
                found, type_
            )),
            ErrorImpl::NetworkUsedAsTensor { network } => ErrorTip::Suggestion(format!(
                "`{}` names a network, not a tensor",
                network
            )),
            ErrorImpl::UnpinnedLiteral { type_ } => ErrorTip::Suggestion(format!(
                "Comparison of literals only, type stays `{}`",
                type_
            )),
            ErrorImpl::IndexRankMismatch {
                variable,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` has rank {}, received {} indices",
                variable, expected, received
            )),
            ErrorImpl::IndexOutOfBounds {
                variable,
                index,
                dimension,
                bound,
            } => ErrorTip::Suggestion(format!(
                "Index {} out of bound {} for dimension {} of `{}`",
                index, bound, dimension, variable
            )),
            ErrorImpl::InvalidVersion { version } => ErrorTip::Suggestion(format!(
                "Version `{}` is not of the form <major.minor>",
                version
            )),
            ErrorImpl::ContradictoryRelations { network } => ErrorTip::Suggestion(format!(
                "Network `{}` declares more than one relation",
                network
            )),
            ErrorImpl::SelfRelation { network } => {
                ErrorTip::Suggestion(format!("Network `{}` is related to itself", network))
            }
            ErrorImpl::RelationSignatureMismatch {
                network,
                other,
                detail,
            } => ErrorTip::Suggestion(format!(
                "Network `{}` does not match `{}`: {}",
                network, other, detail
            )),
            ErrorImpl::FileReadError { path, message } => {
                ErrorTip::Suggestion(format!("Could not read `{}`: {}", path, message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown element type {type_:?}")]
    UnknownType { type_: String },
    #[error("variable {variable:?} already declared in network {network:?}")]
    VariableAlreadyDeclared { variable: String, network: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("variable {variable:?} is ambiguous, declared in {networks}")]
    AmbiguousVariable { variable: String, networks: String },
    #[error("network {network:?} already declared")]
    NetworkAlreadyDeclared { network: String },
    #[error("network {network:?} not declared")]
    NetworkNotDeclared { network: String },
    #[error("types do not match: expected `{expected}`, received `{received}` from `{operand}`")]
    TypeMatchError {
        expected: String,
        received: String,
        operand: String,
    },
    #[error("comparison operands do not match: `{lhs}` and `{rhs}`")]
    ComparisonTypeMismatch { lhs: String, rhs: String },
    #[error("non-numeric operand `{operand}` of type `{type_}`")]
    NonNumericOperand { type_: String, operand: String },
    #[error("expected arithmetic expression, found `{found}`")]
    ExpectedArithmetic { found: String },
    #[error("expected boolean expression, found `{found}` of type `{type_}`")]
    ExpectedBoolean { found: String, type_: String },
    #[error("network {network:?} used as a tensor")]
    NetworkUsedAsTensor { network: String },
    #[error("literal-only comparison left with type `{type_}`")]
    UnpinnedLiteral { type_: String },
    #[error("wrong number of indices for {variable:?}: expected {expected}, received {received}")]
    IndexRankMismatch {
        variable: String,
        expected: usize,
        received: usize,
    },
    #[error("index {index} out of bound {bound} for dimension {dimension} of {variable:?}")]
    IndexOutOfBounds {
        variable: String,
        index: i64,
        dimension: usize,
        bound: i64,
    },
    #[error("invalid version {version:?}")]
    InvalidVersion { version: String },
    #[error("network {network:?} declares contradictory relations")]
    ContradictoryRelations { network: String },
    #[error("network {network:?} is related to itself")]
    SelfRelation { network: String },
    #[error("network {network:?} does not match {other:?}: {detail}")]
    RelationSignatureMismatch {
        network: String,
        other: String,
        detail: String,
    },
    #[error("failed to read {path:?}: {message}")]
    FileReadError { path: String, message: String },
}
