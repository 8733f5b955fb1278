//! Build configuration.

use std::{fmt::Display, str::FromStr};

use crate::type_checker::dtype::DType;

/// What to do when a comparison is left with a literal-constant type,
/// i.e. both of its operands are built from literals only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiteralPolicy {
    /// Leave the literal-constant kind in the tree.
    #[default]
    Keep,
    /// Pin both operands to the given concrete kind.
    Default(DType),
    /// Report an `UnpinnedLiteral` type error.
    Reject,
}

impl FromStr for LiteralPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(LiteralPolicy::Keep),
            "reject" => Ok(LiteralPolicy::Reject),
            other => match other.parse::<DType>() {
                Ok(dtype) if dtype.is_concrete() => Ok(LiteralPolicy::Default(dtype)),
                _ => Err(format!(
                    "expected `keep`, `reject` or a concrete element type, found `{}`",
                    other
                )),
            },
        }
    }
}

impl Display for LiteralPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralPolicy::Keep => write!(f, "keep"),
            LiteralPolicy::Default(dtype) => write!(f, "{}", dtype),
            LiteralPolicy::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub literal_policy: LiteralPolicy,
    /// Name used in positions and reports; defaults to `<string>` for text input.
    pub file_name: Option<String>,
}

impl BuildOptions {
    pub fn with_literal_policy(mut self, literal_policy: LiteralPolicy) -> Self {
        self.literal_policy = literal_policy;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_policy_from_str() {
        assert_eq!("keep".parse::<LiteralPolicy>(), Ok(LiteralPolicy::Keep));
        assert_eq!("reject".parse::<LiteralPolicy>(), Ok(LiteralPolicy::Reject));
        assert_eq!(
            "float64".parse::<LiteralPolicy>(),
            Ok(LiteralPolicy::Default(DType::F64))
        );
        assert!("unknown".parse::<LiteralPolicy>().is_err());
        assert!("float-constant".parse::<LiteralPolicy>().is_err());
    }
}
