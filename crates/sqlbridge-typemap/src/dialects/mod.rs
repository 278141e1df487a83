//! Per-dialect type rules.

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

pub use mysql::MySqlRules;
pub use postgres::PostgresRules;
pub use sqlite::SqliteRules;
pub use sqlserver::SqlServerRules;

use sqlbridge_core::Dialect;

use crate::rules::DialectRules;

/// Rules for a dialect.
pub fn rules_for(dialect: Dialect) -> Box<dyn DialectRules> {
    match dialect {
        Dialect::SqlServer => Box::new(SqlServerRules),
        Dialect::MySql => Box::new(MySqlRules),
        Dialect::PostgreSql => Box::new(PostgresRules),
        Dialect::Sqlite => Box::new(SqliteRules),
    }
}
