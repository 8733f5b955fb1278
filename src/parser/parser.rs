//! Parser implementation for building the untyped tree.
//!
//! This module contains the main Parser struct and the entry point. Every
//! compound form starts with `(` followed by a keyword or operator token,
//! so dispatch is a table lookup on the token after the parenthesis.
//!
//! It maintains lookup tables for:
//! - Top-level statement handlers (version, network, assertion)
//! - Definition handlers (forms inside a network block)
//! - NUD (null denotation) handlers for atoms and compound expressions
//! - Compound expression handlers keyed by operator

use std::{collections::HashMap, sync::Arc};

use crate::{
    ast::ast::Query,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, CompoundHandler, CompoundLookup, DefinitionHandler,
        DefinitionLookup, NUDHandler, NUDLookup, StmtHandler, StmtLookup,
    },
    stmt::{parse_stmt, TopLevel},
};

/// Deepest nesting of compound expressions the parser accepts.
pub const MAX_NESTING: usize = 256;

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements, definitions and expressions. It tracks the current position
/// in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Compound expressions currently open
    depth: usize,
    /// The name of the source file being parsed
    file: Arc<String>,
    /// Lookup table for top-level statement handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for forms inside a network block
    definition_lookup: DefinitionLookup,
    /// Lookup table for null denotation (atom) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for compound expression handlers
    compound_lookup: CompoundLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Shared string containing the source file name
    pub fn new(mut tokens: Vec<Token>, file: Arc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Arc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            depth: 0,
            file,
            stmt_lookup: HashMap::new(),
            definition_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            compound_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `n` places ahead, or EOF past the end.
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor never moves past EOF.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Expects a token, reporting `message` when it is missing.
    pub fn expect_detailed(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token, Error> {
        let error = self.error_detailed(message);
        self.expect_error(expected_kind, Some(error))
    }

    /// Builds an `UnexpectedTokenDetailed` error at the current token.
    pub fn error_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Opens one level of expression nesting, failing past [`MAX_NESTING`].
    pub fn enter_nesting(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_detailed("expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_definition_lookup(&self) -> &DefinitionLookup {
        &self.definition_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_compound_lookup(&self) -> &CompoundLookup {
        &self.compound_lookup
    }

    /// Registers a top-level statement handler for the keyword after `(`.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a network-body handler for the keyword after `(`.
    pub fn definition(&mut self, kind: TokenKind, definition_fn: DefinitionHandler) {
        self.definition_lookup.insert(kind, definition_fn);
    }

    /// Registers a null denotation handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a compound expression handler for the operator after `(`.
    pub fn compound(&mut self, kind: TokenKind, compound_fn: CompoundHandler) {
        self.compound_lookup.insert(kind, compound_fn);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn get_file(&self) -> Arc<String> {
        Arc::clone(&self.file)
    }
}

/// Parses a stream of tokens into the untyped tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses the version, the network
/// blocks and the assertions, in that order.
///
/// # Returns
///
/// The root Query, or the first syntax error.
pub fn parse(tokens: Vec<Token>, file: Arc<String>) -> Result<Query, Error> {
    let mut parser = Parser::new(tokens, Arc::clone(&file));
    create_token_lookups(&mut parser);

    if parser.current_token_kind() != TokenKind::OpenParen
        || parser.peek_kind(1) != TokenKind::VnnlibVersion
    {
        return Err(parser.error_detailed("expected `(vnnlib-version <major.minor>)` first"));
    }

    let version = match parse_stmt(&mut parser)? {
        TopLevel::Version(version) => version,
        _ => return Err(parser.error_detailed("expected a version declaration")),
    };

    let mut networks = vec![];
    let mut assertions = vec![];

    while parser.has_tokens() {
        let position = parser.get_position();
        match parse_stmt(&mut parser)? {
            TopLevel::Network(network) => {
                if !assertions.is_empty() {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: network.name,
                            message: String::from("network declarations must precede assertions"),
                        },
                        position,
                    ));
                }
                networks.push(network);
            }
            TopLevel::Assertion(assertion) => assertions.push(assertion),
            TopLevel::Version(version) => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: version.lexeme,
                        message: String::from("version declared more than once"),
                    },
                    position,
                ))
            }
        }
    }

    Ok(Query {
        span: Span {
            start: Position(0, Arc::clone(&file)),
            end: parser.get_position(),
        },
        version,
        networks,
        assertions,
    })
}
