//! Two-way mapping between native types and SQL type syntax.
//!
//! Each dialect has a [`TypeMapRegistry`] built from its [`DialectRules`].
//! The forward direction walks [`RULE_ORDER`] and stops at the first stage
//! that produces a SQL type; the reverse direction is best-effort and fails
//! closed on anything it does not recognize.

pub mod dialects;
pub mod registry;
pub mod rules;
pub mod safety;
pub mod sql_name;

pub use registry::{TypeMapRegistry, try_map_native_to_sql, try_map_sql_to_native};
pub use rules::{
    ArrayElement, DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE, DEFAULT_ENUM_LENGTH,
    DEFAULT_STRING_LENGTH, DialectRules, RULE_ORDER, RuleKind, UUID_TEXT_LENGTH,
};
pub use safety::is_safe_type_name;
pub use sql_name::{ParsedSqlType, parse_sql_type};
