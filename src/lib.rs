#![allow(clippy::module_inception)]

//! Semantic analysis for VNN-LIB property specifications.
//!
//! The crate turns VNN-LIB text into an untyped tree (`lexer`, `parser`,
//! `ast`) and then into a typed, validated tree (`type_checker`). Symbol,
//! type, shape and structural errors never abort a build: they are collected
//! into a [`Diagnostics`] report alongside a best-effort [`TypedQuery`].

use std::{fs, path::Path, sync::Arc};

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};

pub mod ast;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

pub use config::{BuildOptions, LiteralPolicy};
pub use errors::diagnostics::Diagnostics;
pub use type_checker::typed_ast::TypedQuery;

/// Byte offset into a named source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Arc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Arc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Returns `(line number, line text, offset within line)` for a byte offset.
///
/// Offsets past the end of the source land on the end of the last line.
pub fn get_line_at_position(content: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;
    let mut start = 0;
    let mut line_number = 1;
    let mut last = (1, String::new(), 0);

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        last = (line_number, line.to_string(), line.trim_end().len());
        start = end;
        line_number += 1;
    }

    last
}


/// Renders one error as a caret snippet against its source.
pub fn render_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: message
        -> query.vnnlib:20
           |
        20 | (assert (> X 0.5))
           | -----------^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {} [{}]\n", error.get_error_name(), error.kind()));
    } else {
        out.push_str(&format!(
            "Error: {} [{}] ({})\n",
            error.get_error_name(),
            error.kind(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", file, line));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let trimmed = string.trim_start();
    (String::from(trimmed), string.len() - trimmed.len())
}

/// Result of a build: the best-effort tree, every recovered error, and the
/// source they refer to.
#[derive(Debug)]
pub struct Build {
    pub query: TypedQuery,
    pub diagnostics: Diagnostics,
    source: String,
    file: Arc<String>,
}

impl Build {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn is_well_typed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The human-readable diagnostic report; empty when no errors were found.
    pub fn report(&self) -> String {
        self.diagnostics.report(&self.source, &self.file)
    }
}

/// Lexes, parses and type-checks `content`.
///
/// Syntax errors are returned as `Err`; everything else lands in the
/// returned [`Build`]'s diagnostics.
pub fn build_query_str(content: &str, options: &BuildOptions) -> Result<Build, Error> {
    let file = Arc::new(
        options
            .file_name
            .clone()
            .unwrap_or_else(|| String::from("<string>")),
    );
    build_source(content.to_string(), file, options)
}

/// Reads `path` and builds it like [`build_query_str`].
pub fn build_query(path: impl AsRef<Path>, options: &BuildOptions) -> Result<Build, Error> {
    let path = path.as_ref();
    let file = Arc::new(path.display().to_string());
    let content = fs::read_to_string(path).map_err(|error| {
        Error::new(
            ErrorImpl::FileReadError {
                path: path.display().to_string(),
                message: error.to_string(),
            },
            Position(0, Arc::clone(&file)),
        )
    })?;

    build_source(content, file, options)
}

fn build_source(content: String, file: Arc<String>, options: &BuildOptions) -> Result<Build, Error> {
    let tokens = lexer::lexer::tokenize(&content, Arc::clone(&file))?;
    let ast = parser::parser::parse(tokens, Arc::clone(&file))?;
    let (query, diagnostics) = type_checker::type_checker::type_check(&ast, options);

    tracing::debug!(
        file = %file,
        errors = diagnostics.len(),
        "build finished"
    );

    Ok(Build {
        query,
        diagnostics,
        source: content,
        file,
    })
}

/// Builds the typed tree for the file at `path` with default options.
pub fn parse_query(path: impl AsRef<Path>) -> Result<TypedQuery, Error> {
    Ok(build_query(path, &BuildOptions::default())?.query)
}

/// Builds the typed tree for `content` with default options.
pub fn parse_query_str(content: &str) -> Result<TypedQuery, Error> {
    Ok(build_query_str(content, &BuildOptions::default())?.query)
}

/// Validates the file at `path`; the empty string means no semantic errors.
pub fn check_query(path: impl AsRef<Path>) -> Result<String, Error> {
    Ok(build_query(path, &BuildOptions::default())?.report())
}

/// Validates `content`; the empty string means no semantic errors.
pub fn check_query_str(content: &str) -> Result<String, Error> {
    Ok(build_query_str(content, &BuildOptions::default())?.report())
}
