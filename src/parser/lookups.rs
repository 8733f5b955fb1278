use std::collections::HashMap;

use crate::{ast::{ast::NetworkDefinition, expressions::Expr}, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser, stmt::*};

pub type StmtHandler = fn(&mut Parser) -> Result<TopLevel, Error>;
pub type DefinitionHandler = fn(&mut Parser, &mut NetworkDefinition) -> Result<(), Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type CompoundHandler = fn(&mut Parser) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Arithmetic
    parser.compound(TokenKind::Plus, parse_plus_expr);
    parser.compound(TokenKind::Dash, parse_minus_expr);
    parser.compound(TokenKind::Star, parse_multiply_expr);

    // Relational
    parser.compound(TokenKind::Greater, parse_compare_expr);
    parser.compound(TokenKind::Less, parse_compare_expr);
    parser.compound(TokenKind::GreaterEquals, parse_compare_expr);
    parser.compound(TokenKind::LessEquals, parse_compare_expr);
    parser.compound(TokenKind::Equals, parse_compare_expr);
    parser.compound(TokenKind::NotEquals, parse_compare_expr);

    // Logical
    parser.compound(TokenKind::And, parse_connective_expr);
    parser.compound(TokenKind::Or, parse_connective_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_number_expr);
    parser.nud(TokenKind::Identifier, parse_var_expr);
    parser.nud(TokenKind::OpenParen, parse_compound_expr);

    // Network body
    parser.definition(TokenKind::DeclareInput, parse_input_definition);
    parser.definition(TokenKind::DeclareHidden, parse_hidden_definition);
    parser.definition(TokenKind::DeclareOutput, parse_output_definition);
    parser.definition(TokenKind::IsometricTo, parse_relation);
    parser.definition(TokenKind::EqualTo, parse_relation);

    // Statements
    parser.stmt(TokenKind::VnnlibVersion, parse_version_stmt);
    parser.stmt(TokenKind::DeclareNetwork, parse_network_stmt);
    parser.stmt(TokenKind::Assert, parse_assert_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type DefinitionLookup = HashMap<TokenKind, DefinitionHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type CompoundLookup = HashMap<TokenKind, CompoundHandler>;
