use sqlbridge_core::{
    Dialect, GeometryKind, Length, NativeType, NativeTypeDescriptor, PrimitiveKind,
    SqlTypeDescriptor,
};

use crate::rules::{
    DialectRules, UUID_TEXT_LENGTH, decimal_type, native, native_decimal, native_geometry,
    native_string, requested_length, sql_type,
};
use crate::sql_name::ParsedSqlType;

/// SQLite type rules.
///
/// SQLite accepts any declared type name and stores values by affinity, so
/// the forward direction emits conventional names and the reverse direction
/// falls back to the affinity rules for names it does not know.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteRules;

impl DialectRules for SqliteRules {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn primitive(
        &self,
        kind: PrimitiveKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        match kind {
            PrimitiveKind::Boolean
            | PrimitiveKind::UInt8
            | PrimitiveKind::Int8
            | PrimitiveKind::Int16
            | PrimitiveKind::UInt16
            | PrimitiveKind::Int32
            | PrimitiveKind::UInt32
            | PrimitiveKind::Int64 => sql_type("integer"),
            PrimitiveKind::UInt64 => Some(sql_type("decimal(20,0)")?.with_precision_scale(20, 0)),
            PrimitiveKind::Float32 | PrimitiveKind::Float64 => sql_type("real"),
            PrimitiveKind::Decimal => decimal_type("decimal", descriptor),
            PrimitiveKind::Char => self.string(Length::Bounded(1), descriptor.is_unicode(), true),
            PrimitiveKind::String => self.string(
                requested_length(descriptor),
                descriptor.is_unicode(),
                descriptor.is_fixed_length(),
            ),
            PrimitiveKind::Uuid => self.string(Length::Bounded(UUID_TEXT_LENGTH), false, true),
            PrimitiveKind::Date => sql_type("date"),
            PrimitiveKind::Time | PrimitiveKind::Duration => sql_type("time"),
            PrimitiveKind::DateTime => sql_type("datetime"),
            PrimitiveKind::DateTimeTz => sql_type("timestamptz"),
        }
    }

    fn binary(&self, _descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor> {
        Some(sql_type("blob")?.with_length(Length::Max))
    }

    fn string(
        &self,
        length: Length,
        is_unicode: bool,
        is_fixed_length: bool,
    ) -> Option<SqlTypeDescriptor> {
        let sql = match length {
            Length::Bounded(width) => {
                let base = if is_fixed_length { "char" } else { "varchar" };
                sql_type(format!("{base}({width})"))?
                    .with_length(length)
                    .with_fixed_length(is_fixed_length)
            }
            Length::Max => sql_type("text")?.with_length(Length::Max),
        };
        Some(sql.with_unicode(is_unicode))
    }

    fn json_text(&self, is_unicode: bool) -> Option<SqlTypeDescriptor> {
        self.string(Length::Max, is_unicode, false)
    }

    fn geometry(&self, kind: Option<GeometryKind>) -> Option<SqlTypeDescriptor> {
        match kind {
            Some(kind) => sql_type(kind.name().to_lowercase()),
            None => sql_type("geometry"),
        }
    }

    fn sql_to_native(&self, parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor> {
        let key = parsed.type_key();
        let known = match key.as_str() {
            "bool" | "boolean" => Some(native(PrimitiveKind::Boolean)),
            "tinyint" => Some(native(PrimitiveKind::Int8)),
            "smallint" | "int2" => Some(native(PrimitiveKind::Int16)),
            "int" | "mediumint" => Some(native(PrimitiveKind::Int32)),
            "integer" | "bigint" | "int8" => Some(native(PrimitiveKind::Int64)),
            "real" | "double" | "double precision" | "float" => {
                Some(native(PrimitiveKind::Float64))
            }
            "decimal" | "numeric" => native_decimal(parsed),
            "char" | "character" | "nchar" => match parsed.length() {
                Some(Length::Bounded(UUID_TEXT_LENGTH)) => Some(native(PrimitiveKind::Uuid)),
                Some(Length::Bounded(1)) => Some(native(PrimitiveKind::Char)),
                _ => native_string(parsed, true, true),
            },
            "varchar" | "nvarchar" | "varying character" | "native character" => {
                native_string(parsed, true, false)
            }
            "text" | "clob" => Some(native(PrimitiveKind::String).with_max_length()),
            "blob" => Some(NativeTypeDescriptor::new(NativeType::bytes()).with_max_length()),
            "date" => Some(native(PrimitiveKind::Date)),
            "time" => Some(native(PrimitiveKind::Time)),
            "datetime" | "timestamp" => Some(native(PrimitiveKind::DateTime)),
            "timestamptz" => Some(native(PrimitiveKind::DateTimeTz)),
            "uuid" | "guid" => Some(native(PrimitiveKind::Uuid)),
            "json" => Some(NativeTypeDescriptor::new(NativeType::json())),
            "geometry" => Some(native_geometry(parsed)),
            other => GeometryKind::from_name(other)
                .map(|kind| NativeTypeDescriptor::new(NativeType::geometry(Some(kind)))),
        };
        known.or_else(|| affinity(&key))
    }
}

/// Column affinity for a declared type name (SQLite's "Determination of
/// Column Affinity" rules). NUMERIC affinity is left unmapped.
fn affinity(type_key: &str) -> Option<NativeTypeDescriptor> {
    let upper = type_key.to_ascii_uppercase();
    if upper.contains("INT") {
        Some(native(PrimitiveKind::Int64))
    } else if ["CHAR", "CLOB", "TEXT"]
        .iter()
        .any(|marker| upper.contains(marker))
    {
        Some(native(PrimitiveKind::String).with_max_length())
    } else if upper.contains("BLOB") {
        Some(NativeTypeDescriptor::new(NativeType::bytes()).with_max_length())
    } else if ["REAL", "FLOA", "DOUB"]
        .iter()
        .any(|marker| upper.contains(marker))
    {
        Some(native(PrimitiveKind::Float64))
    } else {
        None
    }
}
