use std::fmt::Display;

use crate::Span;

/// The six comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            CompareOp::GreaterThan => ">",
            CompareOp::LessThan => "<",
            CompareOp::GreaterEqual => ">=",
            CompareOp::LessEqual => "<=",
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectiveOp {
    And,
    Or,
}

impl Display for ConnectiveOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectiveOp::And => write!(f, "and"),
            ConnectiveOp::Or => write!(f, "or"),
        }
    }
}

// LITERALS

/// Integer literal; the lexeme keeps its sign.
#[derive(Debug, Clone, PartialEq)]
pub struct IntExpr {
    pub lexeme: String,
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatExpr {
    pub lexeme: String,
    pub value: f64,
    pub span: Span,
}

/// Variable reference, `X` or `X[0,1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarExpr {
    pub name: String,
    pub indices: Vec<i64>,
    pub span: Span,
}

// COMPOUND

#[derive(Debug, Clone, PartialEq)]
pub struct NegateExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

/// `(+ ...)` and `(* ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NaryExpr {
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `(- head rest...)`
#[derive(Debug, Clone, PartialEq)]
pub struct MinusExpr {
    pub head: Box<Expr>,
    pub rest: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareExpr {
    pub op: CompareOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectiveExpr {
    pub op: ConnectiveOp,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// An untyped expression.
///
/// The parser does not separate arithmetic from boolean forms; the type
/// checker decides which category each position requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(VarExpr),
    Int(IntExpr),
    Float(FloatExpr),
    Negate(NegateExpr),
    Plus(NaryExpr),
    Minus(MinusExpr),
    Multiply(NaryExpr),
    Compare(CompareExpr),
    Connective(ConnectiveExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Var(var) => &var.span,
            Expr::Int(int) => &int.span,
            Expr::Float(float) => &float.span,
            Expr::Negate(negate) => &negate.span,
            Expr::Plus(nary) | Expr::Multiply(nary) => &nary.span,
            Expr::Minus(minus) => &minus.span,
            Expr::Compare(compare) => &compare.span,
            Expr::Connective(connective) => &connective.span,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Expr::Compare(_) | Expr::Connective(_))
    }
}

pub(crate) fn write_indices(f: &mut std::fmt::Formatter<'_>, indices: &[i64]) -> std::fmt::Result {
    if indices.is_empty() {
        return Ok(());
    }
    let indices: Vec<String> = indices.iter().map(|index| index.to_string()).collect();
    write!(f, "[{}]", indices.join(","))
}

pub(crate) fn write_list<T: Display>(
    f: &mut std::fmt::Formatter<'_>,
    head: &str,
    items: impl IntoIterator<Item = T>,
) -> std::fmt::Result {
    write!(f, "({}", head)?;
    for item in items {
        write!(f, " {}", item)?;
    }
    write!(f, ")")
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(var) => {
                write!(f, "{}", var.name)?;
                write_indices(f, &var.indices)
            }
            Expr::Int(int) => write!(f, "{}", int.lexeme),
            Expr::Float(float) => write!(f, "{}", float.lexeme),
            Expr::Negate(negate) => write!(f, "(- {})", negate.expr),
            Expr::Plus(nary) => write_list(f, "+", &nary.args),
            Expr::Minus(minus) => {
                write_list(f, "-", std::iter::once(&*minus.head).chain(minus.rest.iter()))
            }
            Expr::Multiply(nary) => write_list(f, "*", &nary.args),
            Expr::Compare(compare) => write!(f, "({} {} {})", compare.op, compare.lhs, compare.rhs),
            Expr::Connective(connective) => {
                write_list(f, &connective.op.to_string(), &connective.args)
            }
        }
    }
}
