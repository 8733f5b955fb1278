use std::fmt::Display;

use crate::{type_checker::dtype::DType, Span};

use super::expressions::Expr;

/// `(vnnlib-version <major.minor>)`; the lexeme is validated by the type checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub lexeme: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementType {
    pub dtype: DType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    IsometricTo,
    EqualTo,
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::IsometricTo => write!(f, "isometric-to"),
            RelationKind::EqualTo => write!(f, "equal-to"),
        }
    }
}

/// `(isometric-to other)` or `(equal-to other)` inside a network block.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRelation {
    pub kind: RelationKind,
    pub target: String,
    pub span: Span,
}

/// One `declare-input`, `declare-hidden` or `declare-output` form.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorDeclaration {
    pub name: String,
    pub element_type: ElementType,
    pub shape: Vec<i64>,
    pub onnx_name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDefinition {
    pub name: String,
    pub relations: Vec<NetworkRelation>,
    pub inputs: Vec<TensorDeclaration>,
    pub hidden: Vec<TensorDeclaration>,
    pub outputs: Vec<TensorDeclaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub condition: Expr,
    pub span: Span,
}

/// Root of the untyped tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub version: Version,
    pub networks: Vec<NetworkDefinition>,
    pub assertions: Vec<Assertion>,
    pub span: Span,
}
