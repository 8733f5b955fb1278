use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("vnnlib-version", TokenKind::VnnlibVersion);
        map.insert("declare-network", TokenKind::DeclareNetwork);
        map.insert("declare-input", TokenKind::DeclareInput);
        map.insert("declare-hidden", TokenKind::DeclareHidden);
        map.insert("declare-output", TokenKind::DeclareOutput);
        map.insert("isometric-to", TokenKind::IsometricTo);
        map.insert("equal-to", TokenKind::EqualTo);
        map.insert("assert", TokenKind::Assert);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Comma,

    Equals,    // ==
    NotEquals, // !=
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Plus,
    Dash,
    Star,

    // Reserved
    VnnlibVersion,
    DeclareNetwork,
    DeclareInput,
    DeclareHidden,
    DeclareOutput,
    IsometricTo,
    EqualTo,
    Assert,
    And,
    Or,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
