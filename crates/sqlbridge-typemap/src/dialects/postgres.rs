use sqlbridge_core::{
    Dialect, GeometryKind, Length, NativeType, NativeTypeDescriptor, PrimitiveKind,
    SqlTypeDescriptor,
};

use crate::rules::{
    ArrayElement, DialectRules, decimal_type, native, native_decimal, native_geometry,
    native_string, requested_length, sql_type,
};
use crate::sql_name::ParsedSqlType;

/// Longest `varchar(n)` PostgreSQL accepts.
const MAX_VARCHAR_LENGTH: u32 = 10_485_760;

/// PostgreSQL type rules. The only dialect with native arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresRules;

impl PostgresRules {
    /// Element type of a native array. Unsized strings and decimals use the
    /// unconstrained `text` and `numeric`.
    fn element_type(
        &self,
        element: ArrayElement,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        match element {
            ArrayElement::Bytes => self.binary(descriptor),
            ArrayElement::Primitive(PrimitiveKind::String) => match descriptor.length() {
                Some(length) => self.string(
                    length,
                    descriptor.is_unicode(),
                    descriptor.is_fixed_length(),
                ),
                None => self.string(Length::Max, descriptor.is_unicode(), false),
            },
            ArrayElement::Primitive(PrimitiveKind::Decimal) if descriptor.precision().is_none() => {
                sql_type("numeric")
            }
            ArrayElement::Primitive(kind) => self.primitive(kind, descriptor),
        }
    }
}

impl DialectRules for PostgresRules {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    fn primitive(
        &self,
        kind: PrimitiveKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        match kind {
            PrimitiveKind::Boolean => sql_type("boolean"),
            PrimitiveKind::UInt8 | PrimitiveKind::Int8 | PrimitiveKind::Int16 => {
                sql_type("smallint")
            }
            PrimitiveKind::UInt16 | PrimitiveKind::Int32 => sql_type("integer"),
            PrimitiveKind::UInt32 | PrimitiveKind::Int64 => sql_type("bigint"),
            PrimitiveKind::UInt64 => Some(sql_type("numeric(20,0)")?.with_precision_scale(20, 0)),
            PrimitiveKind::Float32 => sql_type("real"),
            PrimitiveKind::Float64 => sql_type("double precision"),
            PrimitiveKind::Decimal => decimal_type("numeric", descriptor),
            PrimitiveKind::Char => self.string(Length::Bounded(1), descriptor.is_unicode(), true),
            PrimitiveKind::String => self.string(
                requested_length(descriptor),
                descriptor.is_unicode(),
                descriptor.is_fixed_length(),
            ),
            PrimitiveKind::Uuid => sql_type("uuid"),
            PrimitiveKind::Date => sql_type("date"),
            PrimitiveKind::Time => sql_type("time"),
            PrimitiveKind::DateTime => sql_type("timestamp"),
            PrimitiveKind::DateTimeTz => sql_type("timestamptz"),
            PrimitiveKind::Duration => sql_type("interval"),
        }
    }

    fn binary(&self, _descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor> {
        Some(sql_type("bytea")?.with_length(Length::Max))
    }

    fn string(
        &self,
        length: Length,
        is_unicode: bool,
        is_fixed_length: bool,
    ) -> Option<SqlTypeDescriptor> {
        let sql = match length {
            Length::Bounded(width) if width <= MAX_VARCHAR_LENGTH => {
                let base = if is_fixed_length { "char" } else { "varchar" };
                sql_type(format!("{base}({width})"))?
                    .with_length(length)
                    .with_fixed_length(is_fixed_length)
            }
            _ => sql_type("text")?.with_length(Length::Max),
        };
        Some(sql.with_unicode(is_unicode))
    }

    fn json_text(&self, _is_unicode: bool) -> Option<SqlTypeDescriptor> {
        sql_type("jsonb")
    }

    fn native_array(
        &self,
        element: ArrayElement,
        dimensions: usize,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        let element = self.element_type(element, descriptor)?;
        let name = format!("{}{}", element.sql_type_name(), "[]".repeat(dimensions.max(1)));
        let mut sql = sql_type(name)?
            .with_unicode(element.is_unicode())
            .with_fixed_length(element.is_fixed_length());
        if let Some(length) = element.length() {
            sql = sql.with_length(length);
        }
        if let (Some(precision), Some(scale)) = (element.precision(), element.scale()) {
            sql = sql.with_precision_scale(precision, scale);
        }
        Some(sql)
    }

    fn geometry(&self, kind: Option<GeometryKind>) -> Option<SqlTypeDescriptor> {
        match kind {
            Some(kind) => sql_type(format!("geometry({})", kind.name())),
            None => sql_type("geometry"),
        }
    }

    fn catalog_array_element(&self, parsed: &ParsedSqlType) -> Option<ParsedSqlType> {
        let element = parsed.base.strip_prefix('_')?;
        if element.is_empty() {
            return None;
        }
        Some(parsed.with_base(element))
    }

    fn sql_to_native(&self, parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor> {
        match parsed.type_key().as_str() {
            "bool" | "boolean" => Some(native(PrimitiveKind::Boolean)),
            "int2" | "smallint" | "smallserial" | "serial2" => Some(native(PrimitiveKind::Int16)),
            "int4" | "int" | "integer" | "serial" | "serial4" => {
                Some(native(PrimitiveKind::Int32))
            }
            "int8" | "bigint" | "bigserial" | "serial8" => Some(native(PrimitiveKind::Int64)),
            "float4" | "real" => Some(native(PrimitiveKind::Float32)),
            "float8" | "double precision" => Some(native(PrimitiveKind::Float64)),
            "float" => match parsed.precision_scale() {
                Some((bits, None)) if bits <= 24 => Some(native(PrimitiveKind::Float32)),
                _ => Some(native(PrimitiveKind::Float64)),
            },
            "numeric" | "decimal" => native_decimal(parsed),
            "money" => Some(native(PrimitiveKind::Decimal)),
            "char" | "character" | "bpchar" => match parsed.length() {
                Some(Length::Bounded(1)) => Some(native(PrimitiveKind::Char)),
                None if parsed.arguments.is_empty() => Some(native(PrimitiveKind::Char)),
                _ => native_string(parsed, true, true),
            },
            "varchar" | "character varying" => native_string(parsed, true, false),
            "text" | "citext" => Some(native(PrimitiveKind::String).with_max_length()),
            "uuid" => Some(native(PrimitiveKind::Uuid)),
            "date" => Some(native(PrimitiveKind::Date)),
            "time" | "time without time zone" => Some(native(PrimitiveKind::Time)),
            "timestamp" | "timestamp without time zone" => {
                Some(native(PrimitiveKind::DateTime))
            }
            "timestamptz" | "timestamp with time zone" => Some(native(PrimitiveKind::DateTimeTz)),
            "interval" => Some(native(PrimitiveKind::Duration)),
            "bytea" => Some(NativeTypeDescriptor::new(NativeType::bytes()).with_max_length()),
            "json" | "jsonb" => Some(NativeTypeDescriptor::new(NativeType::json())),
            "geometry" | "geography" => Some(native_geometry(parsed)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_name::parse_sql_type;

    fn reverse(name: &str) -> Option<NativeType> {
        PostgresRules
            .sql_to_native(&parse_sql_type(name)?)
            .map(|descriptor| descriptor.native_type().clone())
    }

    #[test]
    fn renders_native_arrays_per_dimension() {
        let rules = PostgresRules;
        let ints = rules
            .native_array(
                ArrayElement::Primitive(PrimitiveKind::Int32),
                1,
                &native(PrimitiveKind::Int32),
            )
            .unwrap();
        assert_eq!(ints.sql_type_name(), "integer[]");

        let text = rules
            .native_array(
                ArrayElement::Primitive(PrimitiveKind::String),
                2,
                &native(PrimitiveKind::String),
            )
            .unwrap();
        assert_eq!(text.sql_type_name(), "text[][]");

        let bytes = NativeTypeDescriptor::new(NativeType::bytes());
        let blobs = rules.native_array(ArrayElement::Bytes, 1, &bytes).unwrap();
        assert_eq!(blobs.sql_type_name(), "bytea[]");
    }

    #[test]
    fn array_elements_keep_size_hints() {
        let rules = PostgresRules;
        let decimal = native(PrimitiveKind::Decimal).with_precision_scale(10, 2);
        let sql = rules
            .native_array(ArrayElement::Primitive(PrimitiveKind::Decimal), 1, &decimal)
            .unwrap();
        assert_eq!(sql.sql_type_name(), "numeric(10,2)[]");
        assert_eq!((sql.precision(), sql.scale()), (Some(10), Some(2)));

        let unsized_decimal = rules
            .native_array(
                ArrayElement::Primitive(PrimitiveKind::Decimal),
                1,
                &native(PrimitiveKind::Decimal),
            )
            .unwrap();
        assert_eq!(unsized_decimal.sql_type_name(), "numeric[]");

        let names = native(PrimitiveKind::String).with_length(Length::Bounded(40));
        let sql = rules
            .native_array(ArrayElement::Primitive(PrimitiveKind::String), 1, &names)
            .unwrap();
        assert_eq!(sql.sql_type_name(), "varchar(40)[]");
        assert_eq!(sql.length(), Some(Length::Bounded(40)));
    }

    #[test]
    fn catalog_names_strip_the_underscore() {
        let parsed = parse_sql_type("_int4").unwrap();
        let element = PostgresRules.catalog_array_element(&parsed).unwrap();
        assert_eq!(element.base, "int4");
        assert!(PostgresRules
            .catalog_array_element(&parse_sql_type("int4").unwrap())
            .is_none());
        assert!(PostgresRules
            .catalog_array_element(&parse_sql_type("_").unwrap())
            .is_none());
    }

    #[test]
    fn multi_word_catalog_names() {
        assert_eq!(
            reverse("timestamp(3) with time zone"),
            Some(PrimitiveKind::DateTimeTz.into())
        );
        assert_eq!(
            reverse("character varying(40)"),
            Some(PrimitiveKind::String.into())
        );
        assert_eq!(
            reverse("double precision"),
            Some(PrimitiveKind::Float64.into())
        );
    }

    #[test]
    fn geometry_subtype_is_recovered() {
        let sql = PostgresRules.geometry(Some(GeometryKind::Polygon)).unwrap();
        assert_eq!(sql.sql_type_name(), "geometry(Polygon)");
        assert_eq!(
            reverse(sql.sql_type_name()),
            Some(NativeType::geometry(Some(GeometryKind::Polygon)))
        );
    }

    #[test]
    fn unmapped_names_fail_closed() {
        for name in ["timetz", "xml", "inet", "tsvector", "hstore"] {
            assert_eq!(reverse(name), None, "{name} should fail closed");
        }
    }
}
