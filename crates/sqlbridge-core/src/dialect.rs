use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SQL engine family a type map or override targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    SqlServer,
    MySql,
    PostgreSql,
    Sqlite,
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 4] = [
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::Sqlite,
    ];

    /// Canonical lower-case name (e.g. `postgresql`).
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::SqlServer => "sqlserver",
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Spellings accepted when parsing provider names. Matching is case-insensitive.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Dialect::SqlServer => &["sqlserver", "sql-server", "sql_server", "mssql", "tsql"],
            Dialect::MySql => &["mysql", "maria", "mariadb"],
            Dialect::PostgreSql => &["postgresql", "postgres", "pg", "pgsql"],
            Dialect::Sqlite => &["sqlite", "sqlite3"],
        }
    }

    /// Resolve a provider alias, ignoring case and surrounding whitespace.
    pub fn from_alias(alias: &str) -> Option<Dialect> {
        let alias = alias.trim();
        if alias.is_empty() {
            return None;
        }
        Dialect::ALL.into_iter().find(|dialect| {
            dialect
                .aliases()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(alias))
        })
    }

    /// Whether the dialect stores arrays natively.
    pub fn supports_native_arrays(&self) -> bool {
        matches!(self, Dialect::PostgreSql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dialect::from_alias(s).ok_or_else(|| Error::UnknownDialect(s.trim().to_string()))
    }
}
