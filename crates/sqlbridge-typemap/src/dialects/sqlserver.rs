use sqlbridge_core::{
    Dialect, GeometryKind, Length, NativeType, NativeTypeDescriptor, PrimitiveKind,
    SqlTypeDescriptor,
};

use crate::rules::{
    DialectRules, decimal_type, native, native_decimal, native_geometry, native_string,
    requested_length, sql_type,
};
use crate::sql_name::ParsedSqlType;

/// Longest `nvarchar(n)` before `nvarchar(max)` is required.
const MAX_UNICODE_LENGTH: u32 = 4000;
/// Longest `varchar(n)` / `varbinary(n)` before `(max)` is required.
const MAX_BYTE_LENGTH: u32 = 8000;

/// SQL Server / Azure SQL type rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerRules;

impl DialectRules for SqlServerRules {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn primitive(
        &self,
        kind: PrimitiveKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        match kind {
            PrimitiveKind::Boolean => sql_type("bit"),
            PrimitiveKind::UInt8 => sql_type("tinyint"),
            PrimitiveKind::Int8 | PrimitiveKind::Int16 => sql_type("smallint"),
            PrimitiveKind::UInt16 | PrimitiveKind::Int32 => sql_type("int"),
            PrimitiveKind::UInt32 | PrimitiveKind::Int64 => sql_type("bigint"),
            PrimitiveKind::UInt64 => Some(sql_type("decimal(20,0)")?.with_precision_scale(20, 0)),
            PrimitiveKind::Float32 => sql_type("real"),
            PrimitiveKind::Float64 => sql_type("float"),
            PrimitiveKind::Decimal => decimal_type("decimal", descriptor),
            PrimitiveKind::Char => self.string(Length::Bounded(1), descriptor.is_unicode(), true),
            PrimitiveKind::String => self.string(
                requested_length(descriptor),
                descriptor.is_unicode(),
                descriptor.is_fixed_length(),
            ),
            PrimitiveKind::Uuid => sql_type("uniqueidentifier"),
            PrimitiveKind::Date => sql_type("date"),
            PrimitiveKind::Time | PrimitiveKind::Duration => sql_type("time"),
            PrimitiveKind::DateTime => sql_type("datetime2"),
            PrimitiveKind::DateTimeTz => sql_type("datetimeoffset"),
        }
    }

    fn binary(&self, descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor> {
        match descriptor.length() {
            Some(Length::Bounded(length)) if length <= MAX_BYTE_LENGTH => {
                let base = if descriptor.is_fixed_length() {
                    "binary"
                } else {
                    "varbinary"
                };
                Some(
                    sql_type(format!("{base}({length})"))?
                        .with_length(Length::Bounded(length))
                        .with_fixed_length(descriptor.is_fixed_length()),
                )
            }
            _ => Some(sql_type("varbinary(max)")?.with_length(Length::Max)),
        }
    }

    fn string(
        &self,
        length: Length,
        is_unicode: bool,
        is_fixed_length: bool,
    ) -> Option<SqlTypeDescriptor> {
        let prefix = if is_unicode { "n" } else { "" };
        let limit = if is_unicode {
            MAX_UNICODE_LENGTH
        } else {
            MAX_BYTE_LENGTH
        };

        let sql = match length {
            Length::Bounded(width) if width <= limit => {
                let base = if is_fixed_length { "char" } else { "varchar" };
                sql_type(format!("{prefix}{base}({width})"))?
                    .with_length(length)
                    .with_fixed_length(is_fixed_length)
            }
            _ => sql_type(format!("{prefix}varchar(max)"))?.with_length(Length::Max),
        };
        Some(sql.with_unicode(is_unicode))
    }

    fn json_text(&self, is_unicode: bool) -> Option<SqlTypeDescriptor> {
        self.string(Length::Max, is_unicode, false)
    }

    fn geometry(&self, _kind: Option<GeometryKind>) -> Option<SqlTypeDescriptor> {
        sql_type("geometry")
    }

    fn sql_to_native(&self, parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor> {
        if !parsed.modifiers.is_empty() {
            return None;
        }

        match parsed.base.as_str() {
            "bit" => Some(native(PrimitiveKind::Boolean)),
            "tinyint" => Some(native(PrimitiveKind::UInt8)),
            "smallint" => Some(native(PrimitiveKind::Int16)),
            "int" | "integer" => Some(native(PrimitiveKind::Int32)),
            "bigint" => Some(native(PrimitiveKind::Int64)),
            "real" => Some(native(PrimitiveKind::Float32)),
            "float" => match parsed.precision_scale() {
                Some((bits, None)) if bits <= 24 => Some(native(PrimitiveKind::Float32)),
                _ => Some(native(PrimitiveKind::Float64)),
            },
            "decimal" | "numeric" | "dec" => native_decimal(parsed),
            "money" => Some(native(PrimitiveKind::Decimal).with_precision_scale(19, 4)),
            "smallmoney" => Some(native(PrimitiveKind::Decimal).with_precision_scale(10, 4)),
            "char" | "nchar" => {
                let is_unicode = parsed.base == "nchar";
                match parsed.length() {
                    None if parsed.arguments.is_empty() => {
                        Some(native(PrimitiveKind::Char).with_unicode(is_unicode))
                    }
                    Some(Length::Bounded(1)) => {
                        Some(native(PrimitiveKind::Char).with_unicode(is_unicode))
                    }
                    _ => native_string(parsed, is_unicode, true),
                }
            }
            "varchar" => native_string(parsed, false, false),
            "nvarchar" => native_string(parsed, true, false),
            "sysname" => Some(
                native(PrimitiveKind::String)
                    .with_length(Length::Bounded(128))
                    .with_unicode(true),
            ),
            "text" => Some(
                native(PrimitiveKind::String)
                    .with_max_length()
                    .with_unicode(false),
            ),
            "ntext" => Some(native(PrimitiveKind::String).with_max_length()),
            "uniqueidentifier" => Some(native(PrimitiveKind::Uuid)),
            "date" => Some(native(PrimitiveKind::Date)),
            "time" => Some(native(PrimitiveKind::Time)),
            "datetime" | "datetime2" | "smalldatetime" => Some(native(PrimitiveKind::DateTime)),
            "datetimeoffset" => Some(native(PrimitiveKind::DateTimeTz)),
            "binary" => native_bytes(parsed, true),
            "varbinary" => native_bytes(parsed, false),
            "image" => Some(NativeTypeDescriptor::new(NativeType::bytes()).with_max_length()),
            "geometry" | "geography" => Some(native_geometry(parsed)),
            _ => None,
        }
    }
}

fn native_bytes(parsed: &ParsedSqlType, is_fixed_length: bool) -> Option<NativeTypeDescriptor> {
    let descriptor =
        NativeTypeDescriptor::new(NativeType::bytes()).with_fixed_length(is_fixed_length);
    match (parsed.arguments.is_empty(), parsed.length()) {
        (true, _) => Some(descriptor),
        (false, Some(length)) => Some(descriptor.with_length(length)),
        (false, None) => None,
    }
}
