use serde_json::{Value, json};
use sqlbridge_core::{
    Dialect, Length, NativeType, NativeTypeDescriptor, parse_canonical_name, parse_overrides,
};
use sqlbridge_guard::{ExpressionKind, ExpressionValidator};
use sqlbridge_typemap::TypeMapRegistry;
use tracing::info;

use crate::CliError;

/// Sizing hints given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    pub length: Option<Length>,
    pub precision: Option<u16>,
    pub scale: Option<u16>,
    pub ascii: bool,
    pub fixed: bool,
}

pub fn map_native(
    native_type: &str,
    dialect: Dialect,
    hints: &Hints,
    overrides: Option<&str>,
) -> Result<Value, CliError> {
    let native = parse_canonical_name(native_type)?;
    let descriptor = describe(native, hints);
    let overrides = overrides.map(parse_overrides);

    let registry = TypeMapRegistry::for_dialect(dialect);
    let sql = registry
        .resolve(&descriptor, overrides.as_ref())
        .ok_or_else(|| CliError::Unmapped {
            dialect,
            type_name: descriptor.native_type().to_string(),
        })?;

    info!(dialect = %dialect, sql_type = %sql, "native type mapped");
    Ok(json!({
        "dialect": dialect,
        "native_type": descriptor.native_type().to_string(),
        "sql_type": sql,
    }))
}

pub fn reverse_sql(sql_type: &str, dialect: Dialect) -> Result<Value, CliError> {
    let descriptor = TypeMapRegistry::for_dialect(dialect)
        .try_map_sql_to_native(sql_type)
        .ok_or_else(|| CliError::Unmapped {
            dialect,
            type_name: sql_type.to_string(),
        })?;

    info!(dialect = %dialect, sql_type = %sql_type, "sql type mapped");
    Ok(json!({
        "dialect": dialect,
        "sql_type": sql_type,
        "native_type": descriptor.native_type().to_string(),
        "descriptor": descriptor,
    }))
}

pub fn render(native_type: &str) -> Result<Value, CliError> {
    let native = parse_canonical_name(native_type)?;
    Ok(json!({ "canonical_name": native.canonical_name() }))
}

pub fn overrides(text: &str) -> Result<Value, CliError> {
    Ok(serde_json::to_value(parse_overrides(text))?)
}

pub fn validate(
    validator: &ExpressionValidator,
    kind: ExpressionKind,
    expression: &str,
) -> Result<Value, CliError> {
    validator.validate(kind, expression)?;
    Ok(json!({ "kind": kind, "valid": true }))
}

fn describe(native: NativeType, hints: &Hints) -> NativeTypeDescriptor {
    let mut descriptor = NativeTypeDescriptor::new(native)
        .with_unicode(!hints.ascii)
        .with_fixed_length(hints.fixed);
    if let Some(length) = hints.length {
        descriptor = descriptor.with_length(length);
    }
    match (hints.precision, hints.scale) {
        (Some(precision), Some(scale)) => descriptor.with_precision_scale(precision, scale),
        (Some(precision), None) => descriptor.with_precision(precision),
        _ => descriptor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_honours_hints() {
        let hints = Hints {
            precision: Some(10),
            scale: Some(2),
            ..Hints::default()
        };
        let value = map_native("Decimal", Dialect::MySql, &hints, None).unwrap();
        assert_eq!(value["sql_type"]["sql_type_name"], "decimal(10,2)");
        assert_eq!(value["dialect"], "mysql");
    }

    #[test]
    fn map_prefers_overrides() {
        let value = map_native(
            "String",
            Dialect::PostgreSql,
            &Hints::default(),
            Some("{pg:citext}"),
        )
        .unwrap();
        assert_eq!(value["sql_type"]["sql_type_name"], "citext");
    }

    #[test]
    fn reverse_reports_canonical_name() {
        let value = reverse_sql("_int4", Dialect::PostgreSql).unwrap();
        assert_eq!(value["native_type"], "Int32[]");
    }

    #[test]
    fn unmapped_types_are_errors() {
        let err = reverse_sql("xml", Dialect::PostgreSql).unwrap_err();
        assert!(matches!(err, CliError::Unmapped { .. }));
    }
}
