use std::fmt;

use sqlbridge_core::{
    Dialect, GeometryKind, Length, NativeType, NativeTypeDescriptor, PrimitiveKind,
    SqlTypeDescriptor,
};

use crate::sql_name::ParsedSqlType;

/// Default width for bounded strings when no length is given.
pub const DEFAULT_STRING_LENGTH: u32 = 255;
/// Default width for enum columns.
pub const DEFAULT_ENUM_LENGTH: u32 = 128;
/// Width of a textual UUID (`8-4-4-4-12`).
pub const UUID_TEXT_LENGTH: u32 = 36;
pub const DEFAULT_DECIMAL_PRECISION: u16 = 16;
pub const DEFAULT_DECIMAL_SCALE: u16 = 4;

/// Stages of the forward mapping, tried in this order. The first stage that
/// produces a SQL type wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Primitives and byte buffers.
    Exact,
    Array,
    Collection,
    Enum,
    Json,
    Geometry,
}

pub const RULE_ORDER: [RuleKind; 6] = [
    RuleKind::Exact,
    RuleKind::Array,
    RuleKind::Collection,
    RuleKind::Enum,
    RuleKind::Json,
    RuleKind::Geometry,
];

/// Leaf of a native array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayElement {
    Primitive(PrimitiveKind),
    Bytes,
}

/// Dialect-specific rendering and recognition of SQL types.
///
/// The registry decides which stage applies to a native type; implementors
/// only spell out the SQL for that stage.
pub trait DialectRules: fmt::Debug + Send + Sync {
    fn dialect(&self) -> Dialect;

    fn primitive(
        &self,
        kind: PrimitiveKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor>;

    fn binary(&self, descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor>;

    /// Variable or fixed-length text of the given width.
    fn string(
        &self,
        length: Length,
        is_unicode: bool,
        is_fixed_length: bool,
    ) -> Option<SqlTypeDescriptor>;

    /// Text column holding serialized JSON.
    fn json_text(&self, is_unicode: bool) -> Option<SqlTypeDescriptor>;

    /// Dedicated JSON storage, if any.
    fn json(&self, descriptor: &NativeTypeDescriptor) -> Option<SqlTypeDescriptor> {
        self.json_text(descriptor.is_unicode())
    }

    /// Native array storage; dialects without arrays return `None`.
    ///
    /// Length, precision and scale on `descriptor` size the element type.
    fn native_array(
        &self,
        _element: ArrayElement,
        _dimensions: usize,
        _descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        None
    }

    fn geometry(&self, kind: Option<GeometryKind>) -> Option<SqlTypeDescriptor>;

    /// Element of a catalog-style array name (`_int4`), when the dialect has one.
    fn catalog_array_element(&self, _parsed: &ParsedSqlType) -> Option<ParsedSqlType> {
        None
    }

    /// Best-effort reverse mapping of a scalar (non-array) SQL type.
    fn sql_to_native(&self, parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor>;
}

pub(crate) fn sql_type(name: impl Into<String>) -> Option<SqlTypeDescriptor> {
    SqlTypeDescriptor::new(name).ok()
}

/// `decimal(p,s)` with the descriptor's precision/scale or the 16,4 default.
pub(crate) fn decimal_type(
    base: &str,
    descriptor: &NativeTypeDescriptor,
) -> Option<SqlTypeDescriptor> {
    let (precision, scale) = match descriptor.precision() {
        Some(precision) => (precision, descriptor.scale().unwrap_or(0)),
        None => (DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE),
    };
    Some(sql_type(format!("{base}({precision},{scale})"))?.with_precision_scale(precision, scale))
}

/// Requested string length, defaulting to a bounded 255.
pub(crate) fn requested_length(descriptor: &NativeTypeDescriptor) -> Length {
    descriptor
        .length()
        .unwrap_or(Length::Bounded(DEFAULT_STRING_LENGTH))
}

pub(crate) fn native(kind: PrimitiveKind) -> NativeTypeDescriptor {
    NativeTypeDescriptor::new(NativeType::Primitive(kind))
}

/// Reverse-mapped decimal carrying the parsed precision and scale.
pub(crate) fn native_decimal(parsed: &ParsedSqlType) -> Option<NativeTypeDescriptor> {
    let descriptor = native(PrimitiveKind::Decimal);
    match parsed.precision_scale() {
        Some((precision, Some(scale))) => Some(descriptor.with_precision_scale(precision, scale)),
        Some((precision, None)) => Some(descriptor.with_precision_scale(precision, 0)),
        None if parsed.arguments.is_empty() => Some(descriptor),
        None => None,
    }
}

/// Reverse-mapped string with the parsed length.
pub(crate) fn native_string(
    parsed: &ParsedSqlType,
    is_unicode: bool,
    is_fixed_length: bool,
) -> Option<NativeTypeDescriptor> {
    let descriptor = native(PrimitiveKind::String)
        .with_unicode(is_unicode)
        .with_fixed_length(is_fixed_length);
    match (parsed.arguments.is_empty(), parsed.length()) {
        (true, _) => Some(descriptor),
        (false, Some(length)) => Some(descriptor.with_length(length)),
        (false, None) => None,
    }
}

/// Reverse-mapped geometry; the first argument may name the subtype.
pub(crate) fn native_geometry(parsed: &ParsedSqlType) -> NativeTypeDescriptor {
    let kind = parsed
        .arguments
        .first()
        .and_then(|argument| GeometryKind::from_name(argument));
    NativeTypeDescriptor::new(NativeType::geometry(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_priority_order_is_pinned() {
        assert_eq!(
            RULE_ORDER,
            [
                RuleKind::Exact,
                RuleKind::Array,
                RuleKind::Collection,
                RuleKind::Enum,
                RuleKind::Json,
                RuleKind::Geometry,
            ]
        );
    }

    #[test]
    fn decimal_defaults_to_sixteen_four() {
        let sql = decimal_type("decimal", &native(PrimitiveKind::Decimal)).unwrap();
        assert_eq!(sql.sql_type_name(), "decimal(16,4)");
        assert_eq!(sql.precision(), Some(16));
        assert_eq!(sql.scale(), Some(4));
    }

    #[test]
    fn decimal_embeds_explicit_precision() {
        let descriptor = native(PrimitiveKind::Decimal).with_precision_scale(10, 2);
        let sql = decimal_type("numeric", &descriptor).unwrap();
        assert_eq!(sql.sql_type_name(), "numeric(10,2)");

        let descriptor = native(PrimitiveKind::Decimal).with_precision(20);
        let sql = decimal_type("numeric", &descriptor).unwrap();
        assert_eq!(sql.sql_type_name(), "numeric(20,0)");
    }
}
