use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Longest expression accepted, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 2048;

/// Tunables for an [`ExpressionValidator`](crate::ExpressionValidator).
///
/// Loaded from the `[validator]` table of a config file; missing keys keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    pub max_length: usize,
    /// Denied in addition to the built-in list. A trailing `_` or `.` makes
    /// the entry a prefix (`xp_`, `sys.`).
    pub extra_denied_keywords: Vec<String>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            extra_denied_keywords: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let options: ValidatorOptions = toml::from_str("").unwrap();
        assert_eq!(options, ValidatorOptions::default());

        let options: ValidatorOptions =
            toml::from_str("extra_denied_keywords = [\"MERGE\"]").unwrap();
        assert_eq!(options.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(options.extra_denied_keywords, vec!["MERGE"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ValidatorOptions>("max_len = 10").is_err());
    }
}
