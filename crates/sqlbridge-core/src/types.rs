use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest array rank accepted when building array types.
pub const MAX_ARRAY_RANK: u8 = 32;

/// Scalar host types with a direct SQL counterpart in every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    UInt8,
    Int8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Char,
    String,
    Uuid,
    Date,
    Time,
    DateTime,
    DateTimeTz,
    Duration,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 20] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::UInt8,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::Decimal,
        PrimitiveKind::Char,
        PrimitiveKind::String,
        PrimitiveKind::Uuid,
        PrimitiveKind::Date,
        PrimitiveKind::Time,
        PrimitiveKind::DateTime,
        PrimitiveKind::DateTimeTz,
        PrimitiveKind::Duration,
    ];

    /// Name used in canonical type names.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::UInt8 => "UInt8",
            PrimitiveKind::Int8 => "Int8",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Float32 => "Float32",
            PrimitiveKind::Float64 => "Float64",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::String => "String",
            PrimitiveKind::Uuid => "Uuid",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::Time => "Time",
            PrimitiveKind::DateTime => "DateTime",
            PrimitiveKind::DateTimeTz => "DateTimeTz",
            PrimitiveKind::Duration => "Duration",
        }
    }

    /// Look up a primitive by its canonical name (case-sensitive).
    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
    }

    /// Value range for integer-like kinds. Booleans count as `0..=1`.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            PrimitiveKind::Boolean => Some((0, 1)),
            PrimitiveKind::UInt8 => Some((0, u8::MAX as i128)),
            PrimitiveKind::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveKind::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveKind::UInt16 => Some((0, u16::MAX as i128)),
            PrimitiveKind::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveKind::UInt32 => Some((0, u32::MAX as i128)),
            PrimitiveKind::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveKind::UInt64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Whether every value of `self` is representable as `other` without loss.
    pub fn widens_to(&self, other: PrimitiveKind) -> bool {
        if *self == other {
            return true;
        }

        if let Some((min, max)) = self.integer_range() {
            if other == PrimitiveKind::Decimal {
                return true;
            }
            return match other.integer_range() {
                Some((other_min, other_max)) => other_min <= min && max <= other_max,
                None => false,
            };
        }

        matches!(
            (self, other),
            (PrimitiveKind::Float32, PrimitiveKind::Float64)
                | (PrimitiveKind::Char, PrimitiveKind::String)
                | (PrimitiveKind::Date, PrimitiveKind::DateTime)
                | (PrimitiveKind::Date, PrimitiveKind::DateTimeTz)
                | (PrimitiveKind::DateTime, PrimitiveKind::DateTimeTz)
        )
    }
}

/// Spatial subtype carried by a geometry marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 7] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// Case-insensitive lookup, so SQL spellings like `POINT` resolve too.
    pub fn from_name(name: &str) -> Option<GeometryKind> {
        GeometryKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Domain-specific markers that have dedicated storage in some dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "domain", content = "geometry", rename_all = "snake_case")]
pub enum DomainType {
    Json,
    Geometry(Option<GeometryKind>),
}

/// Generic collection such as a list or a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GenericType {
    pub namespace: Option<String>,
    pub name: String,
    pub arguments: Vec<NativeType>,
}

impl GenericType {
    /// Name including the namespace, without type arguments.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Host enum type with its member names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    /// Length in characters of the longest member name.
    pub fn longest_member_len(&self) -> usize {
        self.members
            .iter()
            .map(|member| member.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Shape of a host application type.
///
/// Arrays and generics own their element types, so a `NativeType` is always a
/// finite tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum NativeType {
    Primitive(PrimitiveKind),
    Nullable(Box<NativeType>),
    Array {
        element: Box<NativeType>,
        rank: u8,
    },
    Generic(GenericType),
    Enum(EnumType),
    Domain(DomainType),
    /// Any other host type, identified by name only.
    Named(String),
}

impl NativeType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        NativeType::Primitive(kind)
    }

    /// Wrap in a nullable; wrapping an already nullable type is a no-op.
    pub fn nullable(inner: NativeType) -> Self {
        match inner {
            NativeType::Nullable(_) => inner,
            other => NativeType::Nullable(Box::new(other)),
        }
    }

    /// Single-dimension array of `element`.
    pub fn array(element: NativeType) -> Self {
        NativeType::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Multi-dimensional array (`rank` 2 renders as `[,]`).
    pub fn array_with_rank(element: NativeType, rank: u8) -> Result<Self> {
        if rank == 0 || rank > MAX_ARRAY_RANK {
            return Err(Error::InvalidDescriptor(format!(
                "array rank must be between 1 and {MAX_ARRAY_RANK}, got {rank}"
            )));
        }
        Ok(NativeType::Array {
            element: Box::new(element),
            rank,
        })
    }

    /// Raw byte buffer, represented as an array of `UInt8`.
    pub fn bytes() -> Self {
        NativeType::array(NativeType::Primitive(PrimitiveKind::UInt8))
    }

    pub fn list(element: NativeType) -> Self {
        NativeType::Generic(GenericType {
            namespace: None,
            name: "List".to_string(),
            arguments: vec![element],
        })
    }

    pub fn dictionary(key: NativeType, value: NativeType) -> Self {
        NativeType::Generic(GenericType {
            namespace: None,
            name: "Dictionary".to_string(),
            arguments: vec![key, value],
        })
    }

    /// Generic collection with one or two type arguments.
    pub fn generic(
        namespace: Option<&str>,
        name: impl Into<String>,
        arguments: Vec<NativeType>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidDescriptor(
                "generic type name cannot be empty".to_string(),
            ));
        }
        if !(1..=2).contains(&arguments.len()) {
            return Err(Error::InvalidDescriptor(format!(
                "generic type {name} must have one or two type arguments, got {}",
                arguments.len()
            )));
        }
        Ok(NativeType::Generic(GenericType {
            namespace: namespace
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
            name,
            arguments,
        }))
    }

    pub fn enumeration(name: impl Into<String>, members: Vec<String>) -> Self {
        NativeType::Enum(EnumType {
            name: name.into(),
            members,
        })
    }

    pub fn json() -> Self {
        NativeType::Domain(DomainType::Json)
    }

    pub fn geometry(kind: Option<GeometryKind>) -> Self {
        NativeType::Domain(DomainType::Geometry(kind))
    }

    pub fn named(name: impl Into<String>) -> Self {
        NativeType::Named(name.into())
    }

    /// The type with any nullable wrapper removed.
    pub fn strip_nullable(&self) -> &NativeType {
        match self {
            NativeType::Nullable(inner) => inner.strip_nullable(),
            other => other,
        }
    }

    /// Whether this is the byte-buffer shape (`UInt8[]`).
    pub fn is_bytes(&self) -> bool {
        matches!(
            self.strip_nullable(),
            NativeType::Array { element, rank: 1 }
                if **element == NativeType::Primitive(PrimitiveKind::UInt8)
        )
    }

    /// Whether a value of `self` survives a trip through `recovered`.
    ///
    /// Primitives may widen, arrays need compatible elements and equal rank,
    /// and enums are compatible with strings.
    pub fn is_compatible_with(&self, recovered: &NativeType) -> bool {
        match (self.strip_nullable(), recovered.strip_nullable()) {
            (NativeType::Primitive(original), NativeType::Primitive(recovered)) => {
                original.widens_to(*recovered)
            }
            (
                NativeType::Array {
                    element: original,
                    rank: original_rank,
                },
                NativeType::Array {
                    element: recovered,
                    rank: recovered_rank,
                },
            ) => original_rank == recovered_rank && original.is_compatible_with(recovered),
            (NativeType::Enum(_), NativeType::Primitive(PrimitiveKind::String)) => true,
            (
                NativeType::Domain(DomainType::Geometry(_)),
                NativeType::Domain(DomainType::Geometry(None)),
            ) => true,
            (original, recovered) => original == recovered,
        }
    }
}

impl From<PrimitiveKind> for NativeType {
    fn from(kind: PrimitiveKind) -> Self {
        NativeType::Primitive(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_does_not_double_wrap() {
        let once = NativeType::nullable(PrimitiveKind::Int32.into());
        let twice = NativeType::nullable(once.clone());
        assert_eq!(once, twice);
        assert_eq!(
            twice.strip_nullable(),
            &NativeType::Primitive(PrimitiveKind::Int32)
        );
    }

    #[test]
    fn generic_requires_one_or_two_arguments() {
        assert!(NativeType::generic(None, "Tuple", Vec::new()).is_err());
        assert!(
            NativeType::generic(
                None,
                "Triple",
                vec![
                    PrimitiveKind::Int32.into(),
                    PrimitiveKind::Int32.into(),
                    PrimitiveKind::Int32.into(),
                ],
            )
            .is_err()
        );
        let pair = NativeType::generic(
            Some("Collections"),
            "Pair",
            vec![PrimitiveKind::String.into(), PrimitiveKind::Int64.into()],
        )
        .unwrap();
        assert!(matches!(pair, NativeType::Generic(ref g) if g.arguments.len() == 2));
    }

    #[test]
    fn array_rank_is_bounded() {
        assert!(NativeType::array_with_rank(PrimitiveKind::Int32.into(), 0).is_err());
        assert!(NativeType::array_with_rank(PrimitiveKind::Int32.into(), 33).is_err());
        assert!(NativeType::array_with_rank(PrimitiveKind::Int32.into(), 3).is_ok());
    }

    #[test]
    fn integer_widening_follows_ranges() {
        assert!(PrimitiveKind::UInt8.widens_to(PrimitiveKind::Int16));
        assert!(PrimitiveKind::Int8.widens_to(PrimitiveKind::Int64));
        assert!(PrimitiveKind::UInt64.widens_to(PrimitiveKind::Decimal));
        assert!(PrimitiveKind::Boolean.widens_to(PrimitiveKind::Int64));
        assert!(!PrimitiveKind::Int8.widens_to(PrimitiveKind::UInt8));
        assert!(!PrimitiveKind::UInt64.widens_to(PrimitiveKind::Int64));
        assert!(!PrimitiveKind::Float64.widens_to(PrimitiveKind::Float32));
        assert!(PrimitiveKind::Float32.widens_to(PrimitiveKind::Float64));
    }

    #[test]
    fn bytes_shape_is_detected() {
        assert!(NativeType::bytes().is_bytes());
        assert!(NativeType::nullable(NativeType::bytes()).is_bytes());
        assert!(!NativeType::array(PrimitiveKind::Int8.into()).is_bytes());
    }

    #[test]
    fn enum_longest_member_counts_chars() {
        let status = EnumType {
            name: "Status".to_string(),
            members: vec!["Active".to_string(), "Suspended".to_string()],
        };
        assert_eq!(status.longest_member_len(), 9);
    }
}
