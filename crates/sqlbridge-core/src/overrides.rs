use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

use crate::dialect::Dialect;
use crate::tokenize::split_respecting_nesting;

/// Delimiters accepted between override entries.
pub const ENTRY_DELIMITERS: [char; 2] = [',', ';'];

/// Per-dialect SQL type text pinned by a caller, e.g. `{mysql:json,pg:jsonb}`.
///
/// Parsing is best-effort: malformed entries, unknown providers and empty type
/// text are skipped. When a dialect appears twice the last entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ProviderOverrides {
    entries: BTreeMap<Dialect, String>,
}

impl ProviderOverrides {
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();

        let body = text.trim();
        let body = body.strip_prefix('{').unwrap_or(body);
        let body = body.strip_suffix('}').unwrap_or(body);

        for entry in split_respecting_nesting(body, &ENTRY_DELIMITERS) {
            let Some((alias, type_text)) = entry.split_once(':') else {
                debug!(entry = %entry, "override entry without ':' skipped");
                continue;
            };

            let alias = alias.trim();
            let type_text = type_text.trim();
            if alias.is_empty() || type_text.is_empty() {
                debug!(entry = %entry, "override entry with empty part skipped");
                continue;
            }

            match Dialect::from_alias(alias) {
                Some(dialect) => {
                    entries.insert(dialect, type_text.to_string());
                }
                None => debug!(provider = %alias, "unknown override provider skipped"),
            }
        }

        Self { entries }
    }

    pub fn get(&self, dialect: Dialect) -> Option<&str> {
        self.entries.get(&dialect).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dialect, &str)> {
        self.entries
            .iter()
            .map(|(dialect, text)| (*dialect, text.as_str()))
    }
}

impl FromStr for ProviderOverrides {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProviderOverrides::parse(s))
    }
}

/// Parse the override mini-language. See [`ProviderOverrides`].
pub fn parse_overrides(text: &str) -> ProviderOverrides {
    ProviderOverrides::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_braced_entries() {
        let overrides = parse_overrides("{mysql:decimal(10,2), sqlserver : decimal(12,4) }");
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get(Dialect::MySql), Some("decimal(10,2)"));
        assert_eq!(overrides.get(Dialect::SqlServer), Some("decimal(12,4)"));
    }

    #[test]
    fn braces_are_optional() {
        let overrides = parse_overrides("pg:integer[];sqlite:text");
        assert_eq!(overrides.get(Dialect::PostgreSql), Some("integer[]"));
        assert_eq!(overrides.get(Dialect::Sqlite), Some("text"));
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_overrides("").is_empty());
        assert!(parse_overrides("   ").is_empty());
        assert!(parse_overrides("{}").is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let overrides = parse_overrides("{mysql:int,maria:bigint}");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(Dialect::MySql), Some("bigint"));
    }

    #[test]
    fn skips_empty_alias_and_type() {
        let overrides = parse_overrides("{:int,mysql:,pg:uuid}");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(Dialect::PostgreSql), Some("uuid"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let overrides = parse_overrides("{pg:jsonb,mssql:nvarchar(max)}");
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"sqlserver":"nvarchar(max)","postgresql":"jsonb"}"#);
    }
}
