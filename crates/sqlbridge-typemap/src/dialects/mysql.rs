use sqlbridge_core::{
    Dialect, GeometryKind, Length, NativeType, NativeTypeDescriptor, PrimitiveKind,
    SqlTypeDescriptor,
};

use crate::rules::{
    DialectRules, UUID_TEXT_LENGTH, decimal_type, native, native_decimal, native_string,
    requested_length, sql_type,
};
use crate::sql_name::ParsedSqlType;

/// Longest `char(n)` / `binary(n)`.
const MAX_FIXED_LENGTH: u32 = 255;
/// Longest `varchar(n)` that fits a row with a 4-byte charset.
const MAX_VARCHAR_LENGTH: u32 = 16383;
const MAX_VARBINARY_LENGTH: u32 = 65535;

/// MySQL / MariaDB type rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlRules;

impl DialectRules for MySqlRules {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn primitive(
        &self,
        kind: PrimitiveKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        match kind {
            PrimitiveKind::Boolean => sql_type("tinyint(1)"),
            PrimitiveKind::UInt8 => sql_type("tinyint unsigned"),
            PrimitiveKind::Int8 => sql_type("tinyint"),
            PrimitiveKind::Int16 => sql_type("smallint"),
            PrimitiveKind::UInt16 => sql_type("smallint unsigned"),
            PrimitiveKind::Int32 => sql_type("int"),
            PrimitiveKind::UInt32 => sql_type("int unsigned"),
            PrimitiveKind::Int64 => sql_type("bigint"),
            PrimitiveKind::UInt64 => sql_type("bigint unsigned"),
            PrimitiveKind::Float32 => sql_type("float"),
            PrimitiveKind::Float64 => sql_type("double"),
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
            PrimitiveKind::DateTimeTz => sql_type("timestamp"),
        }
    }

    fn binary(&self, descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor> {
        match descriptor.length() {
            Some(Length::Bounded(length))
                if descriptor.is_fixed_length() && length <= MAX_FIXED_LENGTH =>
            {
                Some(
                    sql_type(format!("binary({length})"))?
                        .with_length(Length::Bounded(length))
                        .with_fixed_length(true),
                )
            }
            Some(Length::Bounded(length)) if length <= MAX_VARBINARY_LENGTH => Some(
                sql_type(format!("varbinary({length})"))?.with_length(Length::Bounded(length)),
            ),
            _ => Some(sql_type("longblob")?.with_length(Length::Max)),
        }
    }

    fn string(
        &self,
        length: Length,
        is_unicode: bool,
        is_fixed_length: bool,
    ) -> Option<SqlTypeDescriptor> {
        let sql = match length {
            Length::Bounded(width) if is_fixed_length && width <= MAX_FIXED_LENGTH => {
                sql_type(format!("char({width})"))?
                    .with_length(length)
                    .with_fixed_length(true)
            }
            Length::Bounded(width) if width <= MAX_VARCHAR_LENGTH => {
                sql_type(format!("varchar({width})"))?.with_length(length)
            }
            _ => sql_type("longtext")?.with_length(Length::Max),
        };
        Some(sql.with_unicode(is_unicode))
    }

    fn json_text(&self, _is_unicode: bool) -> Option<SqlTypeDescriptor> {
        sql_type("json")
    }

    fn geometry(&self, kind: Option<GeometryKind>) -> Option<SqlTypeDescriptor> {
        match kind {
            Some(kind) => sql_type(kind.name().to_lowercase()),
            None => sql_type("geometry"),
        }
    }

    fn sql_to_native(&self, parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor> {
        // Attributes may follow the name with or without a display width:
        // `int unsigned` and `int(10) unsigned` carry the same type.
        let type_key = parsed.type_key();
        let mut is_unsigned = false;
        let mut words = Vec::new();
        for word in type_key.split(' ') {
            match word {
                "unsigned" => is_unsigned = true,
                "signed" | "zerofill" => {}
                other => words.push(other),
            }
        }
        let key = words.join(" ");

        let integer = |signed: PrimitiveKind, unsigned: PrimitiveKind| {
            Some(native(if is_unsigned { unsigned } else { signed }))
        };

        match key.as_str() {
            "tinyint" if !is_unsigned && parsed.arguments == ["1"] => {
                Some(native(PrimitiveKind::Boolean))
            }
            "bool" | "boolean" => Some(native(PrimitiveKind::Boolean)),
            "bit" if parsed.arguments.is_empty() || parsed.arguments == ["1"] => {
                Some(native(PrimitiveKind::Boolean))
            }
            "tinyint" => integer(PrimitiveKind::Int8, PrimitiveKind::UInt8),
            "smallint" => integer(PrimitiveKind::Int16, PrimitiveKind::UInt16),
            "mediumint" => integer(PrimitiveKind::Int32, PrimitiveKind::UInt32),
            "int" | "integer" => integer(PrimitiveKind::Int32, PrimitiveKind::UInt32),
            "bigint" => integer(PrimitiveKind::Int64, PrimitiveKind::UInt64),
            "year" => Some(native(PrimitiveKind::Int16)),
            "float" => Some(native(PrimitiveKind::Float32)),
            "double" | "double precision" | "real" => Some(native(PrimitiveKind::Float64)),
            "decimal" | "numeric" | "dec" | "fixed" => native_decimal(parsed),
            "char" => match parsed.length() {
                Some(Length::Bounded(UUID_TEXT_LENGTH)) => Some(native(PrimitiveKind::Uuid)),
                Some(Length::Bounded(1)) => Some(native(PrimitiveKind::Char)),
                None if parsed.arguments.is_empty() => Some(native(PrimitiveKind::Char)),
                _ => native_string(parsed, true, true),
            },
            "varchar" => native_string(parsed, true, false),
            "tinytext" => Some(native(PrimitiveKind::String).with_length(Length::Bounded(255))),
            "text" | "mediumtext" | "longtext" => {
                Some(native(PrimitiveKind::String).with_max_length())
            }
            "binary" => native_bytes(parsed, true),
            "varbinary" => native_bytes(parsed, false),
            "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                Some(NativeTypeDescriptor::new(NativeType::bytes()).with_max_length())
            }
            "date" => Some(native(PrimitiveKind::Date)),
            "time" => Some(native(PrimitiveKind::Time)),
            "datetime" => Some(native(PrimitiveKind::DateTime)),
            "timestamp" => Some(native(PrimitiveKind::DateTimeTz)),
            "json" => Some(NativeTypeDescriptor::new(NativeType::json())),
            "geometry" => Some(NativeTypeDescriptor::new(NativeType::geometry(None))),
            "geomcollection" => Some(NativeTypeDescriptor::new(NativeType::geometry(Some(
                GeometryKind::GeometryCollection,
            )))),
            other => GeometryKind::from_name(other)
                .map(|kind| NativeTypeDescriptor::new(NativeType::geometry(Some(kind)))),
        }
    }
}

fn native_bytes(parsed: &ParsedSqlType, is_fixed_length: bool) -> Option<NativeTypeDescriptor> {
    let descriptor =
        NativeTypeDescriptor::new(NativeType::bytes()).with_fixed_length(is_fixed_length);
    match (parsed.arguments.is_empty(), parsed.length()) {
        (true, _) => Some(descriptor),
        (false, Some(Length::Bounded(length))) => {
            Some(descriptor.with_length(Length::Bounded(length)))
        }
        (false, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_name::parse_sql_type;

    fn reverse(name: &str) -> Option<NativeType> {
        MySqlRules
            .sql_to_native(&parse_sql_type(name)?)
            .map(|descriptor| descriptor.native_type().clone())
    }

    #[test]
    fn tinyint_one_is_boolean() {
        assert_eq!(reverse("tinyint(1)"), Some(PrimitiveKind::Boolean.into()));
        assert_eq!(reverse("TINYINT"), Some(PrimitiveKind::Int8.into()));
        assert_eq!(reverse("tinyint(3) unsigned"), Some(PrimitiveKind::UInt8.into()));
    }

    #[test]
    fn unsigned_and_display_widths_are_understood() {
        assert_eq!(reverse("int(10) unsigned"), Some(PrimitiveKind::UInt32.into()));
        assert_eq!(reverse("int(11)"), Some(PrimitiveKind::Int32.into()));
        assert_eq!(
            reverse("bigint unsigned zerofill"),
            Some(PrimitiveKind::UInt64.into())
        );
        assert_eq!(reverse("INT SIGNED"), Some(PrimitiveKind::Int32.into()));
    }

    #[test]
    fn unsigned_output_maps_back_to_unsigned_kinds() {
        for kind in [
            PrimitiveKind::UInt8,
            PrimitiveKind::UInt16,
            PrimitiveKind::UInt32,
            PrimitiveKind::UInt64,
        ] {
            let sql = MySqlRules.primitive(kind, &native(kind)).unwrap();
            assert_eq!(reverse(sql.sql_type_name()), Some(kind.into()), "{sql}");
        }
    }

    #[test]
    fn spatial_subtypes_round_trip() {
        for kind in GeometryKind::ALL {
            let sql = MySqlRules.geometry(Some(kind)).unwrap();
            assert_eq!(
                reverse(sql.sql_type_name()),
                Some(NativeType::geometry(Some(kind)))
            );
        }
    }

    #[test]
    fn enum_and_set_fail_closed() {
        assert_eq!(reverse("set"), None);
        assert_eq!(reverse("enum"), None);
        assert_eq!(reverse("varchar(10) binary"), None);
    }

    #[test]
    fn long_strings_become_longtext() {
        let sql = MySqlRules
            .string(Length::Bounded(20000), true, false)
            .unwrap();
        assert_eq!(sql.sql_type_name(), "longtext");
        assert_eq!(sql.length(), Some(Length::Max));
    }
}
