use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::{ExpressionError, ExpressionKind, OptionsError};
use crate::options::ValidatorOptions;

/// Always refused, in any kind of expression.
pub const DENIED_KEYWORDS: [&str; 25] = [
    "DROP",
    "EXEC",
    "EXECUTE",
    "UNION",
    "SHUTDOWN",
    "WAITFOR",
    "BACKUP",
    "RESTORE",
    "INSERT",
    "UPDATE",
    "DELETE",
    "TRUNCATE",
    "ALTER",
    "CREATE",
    "GRANT",
    "REVOKE",
    "DECLARE",
    "DBCC",
    "OPENROWSET",
    "OPENQUERY",
    "OPENDATASOURCE",
    "SP_EXECUTESQL",
    "SLEEP",
    "PG_SLEEP",
    "BENCHMARK",
];

/// Catalog and extended-procedure prefixes.
pub const DENIED_PREFIXES: [&str; 2] = ["xp_", "sys."];

static DEFAULT_VALIDATOR: LazyLock<ExpressionValidator> = LazyLock::new(|| {
    ExpressionValidator::new(&ValidatorOptions::default())
        .expect("built-in deny list compiles")
});

static STARTS_WITH_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*SELECT\b").expect("select pattern is valid"));

#[derive(Debug, Clone)]
struct DenyRule {
    keyword: String,
    pattern: Regex,
}

impl DenyRule {
    fn keyword(keyword: &str) -> Result<Self, OptionsError> {
        Self::compile(keyword, format!(r"(?i)\b{}\b", regex::escape(keyword)))
    }

    fn prefix(prefix: &str) -> Result<Self, OptionsError> {
        Self::compile(prefix, format!(r"(?i)\b{}", regex::escape(prefix)))
    }

    fn compile(keyword: &str, pattern: String) -> Result<Self, OptionsError> {
        let pattern = Regex::new(&pattern).map_err(|source| OptionsError::Pattern {
            keyword: keyword.to_string(),
            source,
        })?;
        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }
}

/// Deny-list gate for raw SQL fragments spliced into DDL.
///
/// The validator never rewrites its input. Checks run in a fixed order and
/// the first failure is reported:
///
/// 1. blank text
/// 2. longer than `max_length` characters
/// 3. control characters other than tab, CR and LF
/// 4. `--` or `/*` comments
/// 5. view definitions not starting with `SELECT`
/// 6. `;` followed by another statement
/// 7. denied keywords and prefixes (`SELECT` too, outside views)
#[derive(Debug, Clone)]
pub struct ExpressionValidator {
    max_length: usize,
    rules: Vec<DenyRule>,
    select_rule: DenyRule,
}

impl ExpressionValidator {
    pub fn new(options: &ValidatorOptions) -> Result<Self, OptionsError> {
        if options.max_length == 0 {
            return Err(OptionsError::ZeroMaxLength);
        }

        let mut rules = Vec::with_capacity(
            DENIED_KEYWORDS.len() + DENIED_PREFIXES.len() + options.extra_denied_keywords.len(),
        );
        for keyword in DENIED_KEYWORDS {
            rules.push(DenyRule::keyword(keyword)?);
        }
        for prefix in DENIED_PREFIXES {
            rules.push(DenyRule::prefix(prefix)?);
        }
        for extra in &options.extra_denied_keywords {
            let extra = extra.trim();
            if extra.is_empty()
                || !extra
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
            {
                return Err(OptionsError::InvalidKeyword(extra.to_string()));
            }
            let rule = if extra.ends_with(['_', '.']) {
                DenyRule::prefix(extra)?
            } else {
                DenyRule::keyword(extra)?
            };
            rules.push(rule);
        }

        Ok(Self {
            max_length: options.max_length,
            rules,
            select_rule: DenyRule::keyword("SELECT")?,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn validate(&self, kind: ExpressionKind, text: &str) -> Result<(), ExpressionError> {
        self.check(kind, text).inspect_err(|error| {
            warn!(
                kind = %kind,
                category = error.category(),
                length = text.chars().count(),
                "expression rejected"
            );
        })
    }

    pub fn validate_view_definition(&self, text: &str) -> Result<(), ExpressionError> {
        self.validate(ExpressionKind::View, text)
    }

    pub fn validate_check_expression(&self, text: &str) -> Result<(), ExpressionError> {
        self.validate(ExpressionKind::Check, text)
    }

    pub fn validate_default_expression(&self, text: &str) -> Result<(), ExpressionError> {
        self.validate(ExpressionKind::Default, text)
    }

    fn check(&self, kind: ExpressionKind, text: &str) -> Result<(), ExpressionError> {
        if text.trim().is_empty() {
            return Err(ExpressionError::Empty { kind });
        }

        let length = text.chars().count();
        if length > self.max_length {
            return Err(ExpressionError::TooLong {
                kind,
                length,
                max: self.max_length,
            });
        }

        if text
            .chars()
            .any(|ch| ch.is_control() && !matches!(ch, '\t' | '\n' | '\r'))
        {
            return Err(ExpressionError::ControlCharacters { kind });
        }

        if text.contains("--") || text.contains("/*") {
            return Err(ExpressionError::Comment { kind });
        }

        if kind == ExpressionKind::View && !STARTS_WITH_SELECT.is_match(text) {
            return Err(ExpressionError::MustStartWithSelect);
        }

        if has_trailing_statement(text) {
            return Err(ExpressionError::DangerousKeyword {
                kind,
                keyword: ";".to_string(),
            });
        }

        let select = (kind != ExpressionKind::View).then_some(&self.select_rule);
        if let Some(rule) = select
            .into_iter()
            .chain(&self.rules)
            .find(|rule| rule.pattern.is_match(text))
        {
            return Err(ExpressionError::DangerousKeyword {
                kind,
                keyword: rule.keyword.clone(),
            });
        }

        Ok(())
    }
}

impl Default for ExpressionValidator {
    fn default() -> Self {
        DEFAULT_VALIDATOR.clone()
    }
}

/// A `;` with anything but whitespace after it.
fn has_trailing_statement(text: &str) -> bool {
    text.match_indices(';')
        .any(|(index, _)| !text[index + 1..].trim().is_empty())
}

/// Validate a view body with the built-in deny list.
pub fn validate_view_definition(text: &str) -> Result<(), ExpressionError> {
    DEFAULT_VALIDATOR.validate_view_definition(text)
}

/// Validate a check-constraint body with the built-in deny list.
pub fn validate_check_expression(text: &str) -> Result<(), ExpressionError> {
    DEFAULT_VALIDATOR.validate_check_expression(text)
}

/// Validate a column default with the built-in deny list.
pub fn validate_default_expression(text: &str) -> Result<(), ExpressionError> {
    DEFAULT_VALIDATOR.validate_default_expression(text)
}
