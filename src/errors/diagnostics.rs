use crate::render_error;

use super::errors::{Error, ErrorKind};

/// Ordered accumulator for every recoverable error found during a build.
///
/// Errors are kept in the order they were recorded, which follows the order
/// of declarations and assertions in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        tracing::warn!(kind = %error.kind(), "{}", error);
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind() == kind).count()
    }

    /// Renders every error against `source`, separated by blank lines.
    /// An empty accumulator renders as the empty string.
    pub fn report(&self, source: &str, file: &str) -> String {
        self.errors
            .iter()
            .map(|error| render_error(error, source, file))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
