use std::sync::LazyLock;

use sqlbridge_core::{
    Dialect, DomainType, EnumType, Length, NativeType, NativeTypeDescriptor, ProviderOverrides,
    SqlTypeDescriptor,
};
use tracing::debug;

use crate::dialects::rules_for;
use crate::rules::{ArrayElement, DEFAULT_ENUM_LENGTH, DialectRules, RULE_ORDER, RuleKind};
use crate::safety::is_safe_type_name;
use crate::sql_name::parse_sql_type;

static SQL_SERVER: LazyLock<TypeMapRegistry> =
    LazyLock::new(|| TypeMapRegistry::new(Dialect::SqlServer));
static MYSQL: LazyLock<TypeMapRegistry> = LazyLock::new(|| TypeMapRegistry::new(Dialect::MySql));
static POSTGRES: LazyLock<TypeMapRegistry> =
    LazyLock::new(|| TypeMapRegistry::new(Dialect::PostgreSql));
static SQLITE: LazyLock<TypeMapRegistry> = LazyLock::new(|| TypeMapRegistry::new(Dialect::Sqlite));

/// Two-way type mapping for one dialect.
///
/// Registries hold no mutable state; [`TypeMapRegistry::for_dialect`] hands
/// out shared instances that can be used from any thread.
#[derive(Debug)]
pub struct TypeMapRegistry {
    rules: Box<dyn DialectRules>,
}

impl TypeMapRegistry {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            rules: rules_for(dialect),
        }
    }

    /// The process-wide registry for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> &'static TypeMapRegistry {
        match dialect {
            Dialect::SqlServer => &SQL_SERVER,
            Dialect::MySql => &MYSQL,
            Dialect::PostgreSql => &POSTGRES,
            Dialect::Sqlite => &SQLITE,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.rules.dialect()
    }

    pub fn rule_order(&self) -> &'static [RuleKind] {
        &RULE_ORDER
    }

    /// Map a native type to this dialect's SQL syntax.
    ///
    /// Nullable wrappers are ignored. Returns `None` when no rule recognizes
    /// the type.
    pub fn try_map_native_to_sql(
        &self,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        let unwrapped =
            descriptor.with_native_type(descriptor.native_type().strip_nullable().clone());

        let mapped = RULE_ORDER
            .iter()
            .find_map(|rule| self.apply(*rule, &unwrapped));

        if mapped.is_none() {
            debug!(
                dialect = %self.dialect(),
                native_type = %descriptor.native_type(),
                "no rule maps native type"
            );
        }
        mapped
    }

    /// Best-effort reverse mapping of a SQL type name.
    ///
    /// Array syntax (`text[]`, and `_int4` catalog names) is only understood
    /// where the dialect has native arrays. Unknown or malformed names return
    /// `None`.
    pub fn try_map_sql_to_native(&self, sql_type_name: &str) -> Option<NativeTypeDescriptor> {
        let Some(parsed) = parse_sql_type(sql_type_name) else {
            debug!(dialect = %self.dialect(), sql_type = %sql_type_name, "malformed sql type name");
            return None;
        };

        let (element, dimensions) = if parsed.array_dims > 0 {
            (parsed.element(), parsed.array_dims)
        } else if let Some(element) = self.rules.catalog_array_element(&parsed) {
            (element, 1)
        } else {
            (parsed, 0)
        };

        if dimensions > 0 && !self.dialect().supports_native_arrays() {
            debug!(
                dialect = %self.dialect(),
                sql_type = %sql_type_name,
                "dialect has no array types"
            );
            return None;
        }

        let Some(descriptor) = self.rules.sql_to_native(&element) else {
            debug!(
                dialect = %self.dialect(),
                sql_type = %sql_type_name,
                "no native type for sql type"
            );
            return None;
        };

        if dimensions == 0 {
            return Some(descriptor);
        }
        let rank = u8::try_from(dimensions).ok()?;
        let array = NativeType::array_with_rank(descriptor.native_type().clone(), rank).ok()?;
        Some(descriptor.with_native_type(array))
    }

    /// Map with a caller override taking precedence.
    ///
    /// The override for this dialect is used verbatim when it looks like a
    /// plain type name; otherwise it is ignored and the rules apply.
    pub fn resolve(
        &self,
        descriptor: &NativeTypeDescriptor,
        overrides: Option<&ProviderOverrides>,
    ) -> Option<SqlTypeDescriptor> {
        if let Some(text) = overrides.and_then(|overrides| overrides.get(self.dialect())) {
            if is_safe_type_name(text) {
                if let Some(sql) = override_descriptor(text) {
                    return Some(sql);
                }
            }
            debug!(dialect = %self.dialect(), "unsafe type override ignored");
        }
        self.try_map_native_to_sql(descriptor)
    }

    fn apply(
        &self,
        rule: RuleKind,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        let rules = self.rules.as_ref();
        match (rule, descriptor.native_type()) {
            (RuleKind::Exact, NativeType::Primitive(kind)) => rules.primitive(*kind, descriptor),
            (RuleKind::Exact, native) if native.is_bytes() => rules.binary(descriptor),
            (RuleKind::Array, native @ NativeType::Array { .. }) => {
                self.map_array(native, descriptor)
            }
            (RuleKind::Collection, NativeType::Generic(_)) => {
                rules.json_text(descriptor.is_unicode())
            }
            (RuleKind::Enum, NativeType::Enum(enum_type)) => rules.string(
                enum_width(enum_type, descriptor),
                descriptor.is_unicode(),
                false,
            ),
            (RuleKind::Json, NativeType::Domain(DomainType::Json)) => rules.json(descriptor),
            (RuleKind::Geometry, NativeType::Domain(DomainType::Geometry(kind))) => {
                rules.geometry(*kind)
            }
            _ => None,
        }
    }

    fn map_array(
        &self,
        native: &NativeType,
        descriptor: &NativeTypeDescriptor,
    ) -> Option<SqlTypeDescriptor> {
        let mut dimensions = 0usize;
        let mut current = native;
        let leaf = loop {
            if dimensions > 0 && current.is_bytes() {
                break Some(ArrayElement::Bytes);
            }
            match current.strip_nullable() {
                NativeType::Array { element, rank } => {
                    dimensions += usize::from(*rank);
                    current = element.as_ref();
                }
                NativeType::Primitive(kind) => break Some(ArrayElement::Primitive(*kind)),
                _ => break None,
            }
        };

        leaf.and_then(|leaf| self.rules.native_array(leaf, dimensions, descriptor))
            .or_else(|| self.rules.json_text(descriptor.is_unicode()))
    }
}

/// Enum columns hold the member name, so they are never narrower than the
/// longest member. Without a length hint the default width is the floor.
fn enum_width(enum_type: &EnumType, descriptor: &NativeTypeDescriptor) -> Length {
    let longest = u32::try_from(enum_type.longest_member_len()).unwrap_or(u32::MAX);
    match descriptor.length() {
        Some(Length::Max) => Length::Max,
        Some(Length::Bounded(width)) => Length::Bounded(width.max(longest)),
        None => Length::Bounded(longest.max(DEFAULT_ENUM_LENGTH)),
    }
}

fn override_descriptor(text: &str) -> Option<SqlTypeDescriptor> {
    let sql = SqlTypeDescriptor::new(text).ok()?;
    let Some(parsed) = parse_sql_type(text) else {
        return Some(sql);
    };
    let sql = match (parsed.length(), parsed.precision_scale()) {
        (_, Some((precision, Some(scale)))) => sql.with_precision_scale(precision, scale),
        (Some(length), _) => sql.with_length(length),
        _ => sql,
    };
    Some(sql)
}

/// Forward mapping through the shared registry for `dialect`.
pub fn try_map_native_to_sql(
    descriptor: &NativeTypeDescriptor,
    dialect: Dialect,
) -> Option<SqlTypeDescriptor> {
    TypeMapRegistry::for_dialect(dialect).try_map_native_to_sql(descriptor)
}

/// Reverse mapping through the shared registry for `dialect`.
pub fn try_map_sql_to_native(
    sql_type_name: &str,
    dialect: Dialect,
) -> Option<NativeTypeDescriptor> {
    TypeMapRegistry::for_dialect(dialect).try_map_sql_to_native(sql_type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlbridge_core::{PrimitiveKind, parse_overrides};

    #[test]
    fn shared_registries_match_their_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(TypeMapRegistry::for_dialect(dialect).dialect(), dialect);
        }
        assert!(std::ptr::eq(
            TypeMapRegistry::for_dialect(Dialect::MySql),
            TypeMapRegistry::for_dialect(Dialect::MySql)
        ));
    }

    #[test]
    fn nullable_maps_like_its_inner_type() {
        let registry = TypeMapRegistry::new(Dialect::PostgreSql);
        let plain = NativeTypeDescriptor::new(PrimitiveKind::Int32.into());
        let nullable =
            NativeTypeDescriptor::new(NativeType::nullable(PrimitiveKind::Int32.into()));
        assert_eq!(
            registry.try_map_native_to_sql(&plain),
            registry.try_map_native_to_sql(&nullable)
        );
    }

    #[test]
    fn enum_width_covers_longest_member() {
        let short = NativeType::enumeration("Color", vec!["Red".into(), "Green".into()]);
        let long_member = "X".repeat(200);
        let long = NativeType::enumeration("Code", vec![long_member]);

        let registry = TypeMapRegistry::new(Dialect::PostgreSql);
        let sql = registry
            .try_map_native_to_sql(&NativeTypeDescriptor::new(short.clone()))
            .unwrap();
        assert_eq!(sql.sql_type_name(), "varchar(128)");

        let sql = registry
            .try_map_native_to_sql(&NativeTypeDescriptor::new(long))
            .unwrap();
        assert_eq!(sql.sql_type_name(), "varchar(200)");

        let sql = registry
            .try_map_native_to_sql(
                &NativeTypeDescriptor::new(short).with_length(Length::Bounded(20)),
            )
            .unwrap();
        assert_eq!(sql.sql_type_name(), "varchar(20)");
    }

    #[test]
    fn enum_length_hint_never_truncates_members() {
        let status = NativeType::enumeration("Status", vec!["Active".into(), "Suspended".into()]);
        let registry = TypeMapRegistry::new(Dialect::PostgreSql);
        let sql = registry
            .try_map_native_to_sql(
                &NativeTypeDescriptor::new(status).with_length(Length::Bounded(3)),
            )
            .unwrap();
        assert_eq!(sql.sql_type_name(), "varchar(9)");
        assert_eq!(sql.length(), Some(Length::Bounded(9)));
    }

    #[test]
    fn nested_arrays_accumulate_dimensions() {
        let registry = TypeMapRegistry::new(Dialect::PostgreSql);
        let jagged = NativeType::array(NativeType::array(PrimitiveKind::Int64.into()));
        let sql = registry
            .try_map_native_to_sql(&NativeTypeDescriptor::new(jagged))
            .unwrap();
        assert_eq!(sql.sql_type_name(), "bigint[][]");

        let blobs = NativeType::array(NativeType::bytes());
        let sql = registry
            .try_map_native_to_sql(&NativeTypeDescriptor::new(blobs))
            .unwrap();
        assert_eq!(sql.sql_type_name(), "bytea[]");
    }

    #[test]
    fn arrays_of_non_primitives_use_json_text() {
        let registry = TypeMapRegistry::new(Dialect::PostgreSql);
        let lists = NativeType::array(NativeType::list(PrimitiveKind::Int32.into()));
        let sql = registry
            .try_map_native_to_sql(&NativeTypeDescriptor::new(lists))
            .unwrap();
        assert_eq!(sql.sql_type_name(), "jsonb");
    }

    #[test]
    fn override_wins_only_when_safe() {
        let registry = TypeMapRegistry::new(Dialect::MySql);
        let descriptor = NativeTypeDescriptor::new(PrimitiveKind::Decimal.into());

        let overrides = parse_overrides("{mysql:decimal(10,2),pg:numeric}");
        let sql = registry.resolve(&descriptor, Some(&overrides)).unwrap();
        assert_eq!(sql.sql_type_name(), "decimal(10,2)");
        assert_eq!(sql.precision(), Some(10));
        assert_eq!(sql.scale(), Some(2));

        let hostile = parse_overrides("{mysql:varchar(10)--}");
        let sql = registry.resolve(&descriptor, Some(&hostile)).unwrap();
        assert_eq!(sql.sql_type_name(), "decimal(16,4)");

        let sql = registry.resolve(&descriptor, None).unwrap();
        assert_eq!(sql.sql_type_name(), "decimal(16,4)");
    }
}
