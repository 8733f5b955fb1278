//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (signed integers and floats)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Error cases

use std::sync::Arc;

use super::{lexer::tokenize, tokens::{Token, TokenKind}};
use crate::errors::errors::ErrorKind;

fn lex(source: &str) -> Vec<Token> {
    tokenize(source, Arc::new("test.vnnlib".to_string())).unwrap()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "vnnlib-version declare-network declare-input declare-hidden declare-output isometric-to equal-to assert and or";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::VnnlibVersion,
            TokenKind::DeclareNetwork,
            TokenKind::DeclareInput,
            TokenKind::DeclareHidden,
            TokenKind::DeclareOutput,
            TokenKind::IsometricTo,
            TokenKind::EqualTo,
            TokenKind::Assert,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("X foo_bar net-1 _hidden float32");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "X");
    assert_eq!(tokens[1].value, "foo_bar");
    assert_eq!(tokens[2].value, "net-1");
    assert_eq!(tokens[3].value, "_hidden");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "float32");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 -7 -0.5 1e-3 2.0");

    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["42", "3.14", "-7", "-0.5", "1e-3", "2.0", "EOF"]);
    assert!(tokens[..6].iter().all(|token| token.kind == TokenKind::Number));
}

#[test]
fn test_dash_followed_by_space_is_operator() {
    assert_eq!(
        kinds("(- X 1)"),
        vec![
            TokenKind::OpenParen,
            TokenKind::Dash,
            TokenKind::Identifier,
            TokenKind::Number,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""input_0" "with \"quote\"" "tab\there""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "input_0");
    assert_eq!(tokens[1].value, "with \"quote\"");
    assert_eq!(tokens[2].value, "tab\there");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * == != < > <= >="),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_indexed_variable() {
    assert_eq!(
        kinds("X[0,1]"),
        vec![
            TokenKind::Identifier,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_version() {
    assert_eq!(
        kinds("(vnnlib-version <2.0>)"),
        vec![
            TokenKind::OpenParen,
            TokenKind::VnnlibVersion,
            TokenKind::Less,
            TokenKind::Number,
            TokenKind::Greater,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("; a comment\n(assert ; trailing\n X)");

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::Assert);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "X");
    assert_eq!(tokens[3].kind, TokenKind::CloseParen);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_token_spans_are_byte_offsets() {
    let tokens = lex("(assert X)");

    assert_eq!(tokens[1].span.start.0, 1);
    assert_eq!(tokens[1].span.end.0, 7);
    assert_eq!(tokens[2].span.start.0, 8);
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("(assert @)", Arc::new("test.vnnlib".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_unrecognised_multibyte_character() {
    let error = tokenize("X ∀", Arc::new("test.vnnlib".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 2);
}
