//! Typed tree definitions.
//!
//! This module contains the typed variants of the nodes produced by the
//! parser. Each arithmetic node carries its resolved element type, each
//! variable reference carries the id of the symbol it resolved to, and
//! every node renders back to surface syntax through `Display`.
//!
//! The tree is read-only once the type checker hands it out as a
//! [`TypedQuery`]; the only mutation, literal pinning, is crate-private.

use std::fmt::Display;

use crate::{
    ast::expressions::{write_indices, write_list, CompareOp, ConnectiveOp},
    Span,
};

use super::{
    dtype::DType,
    symbols::{Indices, Shape, SymbolId, SymbolInfo, SymbolKind, SymbolTable},
};

// ARITHMETIC

/// A reference to a declared tensor, `X[0,1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TVarExpr {
    pub symbol: SymbolId,
    pub name: String,
    pub indices: Indices,
    pub dtype: DType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TInt {
    pub lexeme: String,
    pub value: i64,
    pub dtype: DType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TFloat {
    pub lexeme: String,
    pub value: f64,
    pub dtype: DType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TNegate {
    pub expr: Box<TArithExpr>,
    pub dtype: DType,
    pub span: Span,
}

/// Sum or product over every argument.
#[derive(Debug, Clone, PartialEq)]
pub struct TNary {
    pub args: Vec<TArithExpr>,
    pub dtype: DType,
    pub span: Span,
}

/// `head` minus each of `rest`.
#[derive(Debug, Clone, PartialEq)]
pub struct TMinus {
    pub head: Box<TArithExpr>,
    pub rest: Vec<TArithExpr>,
    pub dtype: DType,
    pub span: Span,
}

/// Stand-in for a sub-expression that failed to type. Keeps the source
/// text so the tree still renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TInvalid {
    pub source: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TArithExpr {
    Var(TVarExpr),
    Int(TInt),
    Float(TFloat),
    Negate(TNegate),
    Plus(TNary),
    Minus(TMinus),
    Multiply(TNary),
    Invalid(TInvalid),
}

impl TArithExpr {
    pub fn dtype(&self) -> DType {
        match self {
            TArithExpr::Var(var) => var.dtype,
            TArithExpr::Int(int) => int.dtype,
            TArithExpr::Float(float) => float.dtype,
            TArithExpr::Negate(negate) => negate.dtype,
            TArithExpr::Plus(nary) | TArithExpr::Multiply(nary) => nary.dtype,
            TArithExpr::Minus(minus) => minus.dtype,
            TArithExpr::Invalid(_) => DType::Unknown,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            TArithExpr::Var(var) => &var.span,
            TArithExpr::Int(int) => &int.span,
            TArithExpr::Float(float) => &float.span,
            TArithExpr::Negate(negate) => &negate.span,
            TArithExpr::Plus(nary) | TArithExpr::Multiply(nary) => &nary.span,
            TArithExpr::Minus(minus) => &minus.span,
            TArithExpr::Invalid(invalid) => &invalid.span,
        }
    }

    /// Re-stamps every literal-typed node of this subtree with `dtype`.
    /// Nodes that already carry a concrete kind are left alone.
    pub(crate) fn pin(&mut self, dtype: DType) {
        if !self.dtype().is_constant() {
            return;
        }

        match self {
            TArithExpr::Int(int) => int.dtype = dtype,
            TArithExpr::Float(float) => float.dtype = dtype,
            TArithExpr::Negate(negate) => {
                negate.dtype = dtype;
                negate.expr.pin(dtype);
            }
            TArithExpr::Plus(nary) | TArithExpr::Multiply(nary) => {
                nary.dtype = dtype;
                nary.args.iter_mut().for_each(|arg| arg.pin(dtype));
            }
            TArithExpr::Minus(minus) => {
                minus.dtype = dtype;
                minus.head.pin(dtype);
                minus.rest.iter_mut().for_each(|arg| arg.pin(dtype));
            }
            TArithExpr::Var(_) | TArithExpr::Invalid(_) => {}
        }
    }
}

impl Display for TArithExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TArithExpr::Var(var) => {
                write!(f, "{}", var.name)?;
                write_indices(f, &var.indices)
            }
            TArithExpr::Int(int) => write!(f, "{}", int.lexeme),
            TArithExpr::Float(float) => write!(f, "{}", float.lexeme),
            TArithExpr::Negate(negate) => write!(f, "(- {})", negate.expr),
            TArithExpr::Plus(nary) => write_list(f, "+", &nary.args),
            TArithExpr::Minus(minus) => {
                write_list(f, "-", std::iter::once(&*minus.head).chain(minus.rest.iter()))
            }
            TArithExpr::Multiply(nary) => write_list(f, "*", &nary.args),
            TArithExpr::Invalid(invalid) => write!(f, "{}", invalid.source),
        }
    }
}

// BOOLEAN

#[derive(Debug, Clone, PartialEq)]
pub struct TCompare {
    pub op: CompareOp,
    pub lhs: Box<TArithExpr>,
    pub rhs: Box<TArithExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TConnective {
    pub op: ConnectiveOp,
    pub args: Vec<TBoolExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TBoolExpr {
    Compare(TCompare),
    Connective(TConnective),
    Invalid(TInvalid),
}

impl TBoolExpr {
    pub fn dtype(&self) -> DType {
        match self {
            TBoolExpr::Compare(_) | TBoolExpr::Connective(_) => DType::Bool,
            TBoolExpr::Invalid(_) => DType::Unknown,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            TBoolExpr::Compare(compare) => &compare.span,
            TBoolExpr::Connective(connective) => &connective.span,
            TBoolExpr::Invalid(invalid) => &invalid.span,
        }
    }
}

impl Display for TBoolExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TBoolExpr::Compare(compare) => {
                write!(f, "({} {} {})", compare.op, compare.lhs, compare.rhs)
            }
            TBoolExpr::Connective(connective) => {
                write_list(f, &connective.op.to_string(), &connective.args)
            }
            TBoolExpr::Invalid(invalid) => write!(f, "{}", invalid.source),
        }
    }
}

// STRUCTURAL

#[derive(Debug, Clone, PartialEq)]
pub struct TAssertion {
    pub condition: TBoolExpr,
    pub span: Span,
}

impl Display for TAssertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(assert {})", self.condition)
    }
}

/// An input, hidden or output declaration. `symbol` indexes the arena
/// entry this declaration created; the remaining fields are that entry's
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct TDefinition {
    pub symbol: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub dtype: DType,
    pub shape: Shape,
    pub onnx_name: Option<String>,
    pub span: Span,
}

impl TDefinition {
    pub(crate) fn new(symbol: SymbolId, info: &SymbolInfo, span: Span) -> Self {
        TDefinition {
            symbol,
            name: info.name.clone(),
            kind: info.kind,
            dtype: info.dtype,
            shape: info.shape.clone(),
            onnx_name: info.onnx_name.clone(),
            span,
        }
    }
}

impl Display for TDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = match self.kind {
            SymbolKind::Input => "declare-input",
            SymbolKind::Hidden => "declare-hidden",
            SymbolKind::Output => "declare-output",
            SymbolKind::Network | SymbolKind::Unknown => "declare",
        };
        let dims: Vec<String> = self.shape.iter().map(|dim| dim.to_string()).collect();

        write!(f, "({} {} {} [{}]", keyword, self.name, self.dtype, dims.join(","))?;
        if let Some(onnx_name) = &self.onnx_name {
            write!(f, " {:?}", onnx_name)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TNetworkDefinition {
    pub name: String,
    /// `None` when the name was already taken by an earlier network.
    pub symbol: Option<SymbolId>,
    pub isometric_to: Option<String>,
    pub equal_to: Option<String>,
    pub inputs: Vec<TDefinition>,
    pub hidden: Vec<TDefinition>,
    pub outputs: Vec<TDefinition>,
    pub span: Span,
}

impl TNetworkDefinition {
    /// Every declaration in order: inputs, hidden, outputs.
    pub fn definitions(&self) -> impl Iterator<Item = &TDefinition> {
        self.inputs.iter().chain(self.hidden.iter()).chain(self.outputs.iter())
    }
}

impl Display for TNetworkDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(declare-network {}", self.name)?;
        if let Some(target) = &self.isometric_to {
            write!(f, "\n  (isometric-to {})", target)?;
        }
        if let Some(target) = &self.equal_to {
            write!(f, "\n  (equal-to {})", target)?;
        }
        for definition in self.definitions() {
            write!(f, "\n  {}", definition)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TVersion {
    pub major: u32,
    pub minor: u32,
    pub span: Span,
}

impl Display for TVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(vnnlib-version <{}.{}>)", self.major, self.minor)
    }
}

/// The typed, validated query. Owns the symbol arena every
/// [`SymbolId`] in the tree points into.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedQuery {
    version: TVersion,
    networks: Vec<TNetworkDefinition>,
    assertions: Vec<TAssertion>,
    symbols: SymbolTable,
    span: Span,
}

impl TypedQuery {
    pub(crate) fn new(
        version: TVersion,
        networks: Vec<TNetworkDefinition>,
        assertions: Vec<TAssertion>,
        symbols: SymbolTable,
        span: Span,
    ) -> Self {
        TypedQuery {
            version,
            networks,
            assertions,
            symbols,
            span,
        }
    }

    pub fn version(&self) -> &TVersion {
        &self.version
    }

    pub fn networks(&self) -> &[TNetworkDefinition] {
        &self.networks
    }

    pub fn assertions(&self) -> &[TAssertion] {
        &self.assertions
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        self.symbols.get(id)
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn network(&self, name: &str) -> Option<&TNetworkDefinition> {
        self.networks.iter().find(|network| network.name == name)
    }

    pub fn root(&self) -> TNode<'_> {
        TNode::Query(self)
    }
}

impl Display for TypedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)?;
        for network in &self.networks {
            write!(f, "\n{}", network)?;
        }
        for assertion in &self.assertions {
            write!(f, "\n{}", assertion)?;
        }
        Ok(())
    }
}

/// A borrowed view of any node in a [`TypedQuery`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TNode<'a> {
    Query(&'a TypedQuery),
    Version(&'a TVersion),
    Network(&'a TNetworkDefinition),
    Definition(&'a TDefinition),
    Assertion(&'a TAssertion),
    Bool(&'a TBoolExpr),
    Arith(&'a TArithExpr),
}

impl<'a> TNode<'a> {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<TNode<'a>> {
        match *self {
            TNode::Query(query) => std::iter::once(TNode::Version(&query.version))
                .chain(query.networks.iter().map(TNode::Network))
                .chain(query.assertions.iter().map(TNode::Assertion))
                .collect(),
            TNode::Version(_) | TNode::Definition(_) => vec![],
            TNode::Network(network) => network.definitions().map(TNode::Definition).collect(),
            TNode::Assertion(assertion) => vec![TNode::Bool(&assertion.condition)],
            TNode::Bool(TBoolExpr::Compare(compare)) => {
                vec![TNode::Arith(&compare.lhs), TNode::Arith(&compare.rhs)]
            }
            TNode::Bool(TBoolExpr::Connective(connective)) => {
                connective.args.iter().map(TNode::Bool).collect()
            }
            TNode::Bool(TBoolExpr::Invalid(_)) => vec![],
            TNode::Arith(arith) => match arith {
                TArithExpr::Negate(negate) => vec![TNode::Arith(&negate.expr)],
                TArithExpr::Plus(nary) | TArithExpr::Multiply(nary) => {
                    nary.args.iter().map(TNode::Arith).collect()
                }
                TArithExpr::Minus(minus) => std::iter::once(TNode::Arith(&*minus.head))
                    .chain(minus.rest.iter().map(TNode::Arith))
                    .collect(),
                TArithExpr::Var(_)
                | TArithExpr::Int(_)
                | TArithExpr::Float(_)
                | TArithExpr::Invalid(_) => vec![],
            },
        }
    }

    /// This node followed by all of its descendants, depth first.
    pub fn descendants(&self) -> Vec<TNode<'a>> {
        let mut nodes = vec![*self];
        for child in self.children() {
            nodes.extend(child.descendants());
        }
        nodes
    }

    /// The element type of expression nodes.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            TNode::Bool(expr) => Some(expr.dtype()),
            TNode::Arith(expr) => Some(expr.dtype()),
            TNode::Definition(definition) => Some(definition.dtype),
            _ => None,
        }
    }

    pub fn get_span(&self) -> &'a Span {
        match *self {
            TNode::Query(query) => &query.span,
            TNode::Version(version) => &version.span,
            TNode::Network(network) => &network.span,
            TNode::Definition(definition) => &definition.span,
            TNode::Assertion(assertion) => &assertion.span,
            TNode::Bool(expr) => expr.get_span(),
            TNode::Arith(expr) => expr.get_span(),
        }
    }
}

impl Display for TNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TNode::Query(query) => write!(f, "{}", query),
            TNode::Version(version) => write!(f, "{}", version),
            TNode::Network(network) => write!(f, "{}", network),
            TNode::Definition(definition) => write!(f, "{}", definition),
            TNode::Assertion(assertion) => write!(f, "{}", assertion),
            TNode::Bool(expr) => write!(f, "{}", expr),
            TNode::Arith(expr) => write!(f, "{}", expr),
        }
    }
}
