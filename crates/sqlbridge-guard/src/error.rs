use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which kind of raw SQL is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    View,
    Check,
    Default,
}

impl ExpressionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExpressionKind::View => "view definition",
            ExpressionKind::Check => "check expression",
            ExpressionKind::Default => "default expression",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an expression was refused. Each variant's message carries a stable
/// phrase callers can match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("{kind} cannot be null or empty")]
    Empty { kind: ExpressionKind },
    #[error("{kind} is too long: {length} characters (max {max})")]
    TooLong {
        kind: ExpressionKind,
        length: usize,
        max: usize,
    },
    #[error("{kind} contains invalid control characters")]
    ControlCharacters { kind: ExpressionKind },
    #[error("comment not allowed in {kind}")]
    Comment { kind: ExpressionKind },
    #[error("view definition must start with SELECT")]
    MustStartWithSelect,
    #[error("{kind} contains dangerous keyword '{keyword}'")]
    DangerousKeyword {
        kind: ExpressionKind,
        keyword: String,
    },
}

impl ExpressionError {
    /// Short machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            ExpressionError::Empty { .. } => "empty",
            ExpressionError::TooLong { .. } => "too_long",
            ExpressionError::ControlCharacters { .. } => "control_characters",
            ExpressionError::Comment { .. } => "comment",
            ExpressionError::MustStartWithSelect => "must_start_with_select",
            ExpressionError::DangerousKeyword { .. } => "dangerous_keyword",
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            ExpressionError::Empty { kind }
            | ExpressionError::TooLong { kind, .. }
            | ExpressionError::ControlCharacters { kind }
            | ExpressionError::Comment { kind }
            | ExpressionError::DangerousKeyword { kind, .. } => *kind,
            ExpressionError::MustStartWithSelect => ExpressionKind::View,
        }
    }
}

/// A validator could not be built from its options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("max_length must be greater than zero")]
    ZeroMaxLength,
    #[error("invalid denied keyword '{0}': only letters, digits, '_' and '.' are allowed")]
    InvalidKeyword(String),
    #[error("failed to compile deny pattern for '{keyword}': {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_stable_phrases() {
        let kind = ExpressionKind::Check;
        assert!(ExpressionError::Empty { kind }
            .to_string()
            .contains("cannot be null or empty"));
        assert!(ExpressionError::TooLong {
            kind,
            length: 3000,
            max: 2048
        }
        .to_string()
        .contains("too long"));
        assert!(ExpressionError::ControlCharacters { kind }
            .to_string()
            .contains("invalid control characters"));
        assert!(ExpressionError::Comment { kind }
            .to_string()
            .contains("comment not allowed"));
        assert_eq!(
            ExpressionError::DangerousKeyword {
                kind,
                keyword: "DROP".to_string()
            }
            .to_string(),
            "check expression contains dangerous keyword 'DROP'"
        );
    }
}
