//! Token construction shorthands for the VNN-LIB lexer.
//!
//! Most rows of the pattern table are brackets, commas and operators whose
//! lexeme is the pattern itself. `MK_DEFAULT_HANDLER!` covers those rows and
//! `MK_TOKEN!` builds the token they push. Keywords go through the symbol
//! handler instead.

/// `Token { kind, value, span }` in one line.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Handler for a pattern that always matches the literal `$value`, such as
/// `(`, `,` or `>=`.
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new(r"^>=").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">="),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.span_of($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}
