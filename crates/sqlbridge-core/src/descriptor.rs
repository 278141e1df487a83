use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::NativeType;

/// Character or byte length hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Bounded(u32),
    /// The dialect's unbounded form (`varchar(max)`, `text`, ...).
    Max,
}

impl Length {
    /// Parse `max` (any case) or a positive integer.
    pub fn parse(text: &str) -> Option<Length> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("max") {
            return Some(Length::Max);
        }
        match text.parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(value) => Some(Length::Bounded(value)),
        }
    }

    pub fn is_max(&self) -> bool {
        matches!(self, Length::Max)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Bounded(value) => write!(f, "{value}"),
            Length::Max => f.write_str("max"),
        }
    }
}

/// A native type plus the sizing hints used when picking a SQL type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NativeTypeDescriptor {
    native_type: NativeType,
    length: Option<Length>,
    precision: Option<u16>,
    scale: Option<u16>,
    is_unicode: bool,
    is_fixed_length: bool,
}

impl NativeTypeDescriptor {
    /// Descriptor with no hints. Text defaults to unicode, variable length.
    pub fn new(native_type: NativeType) -> Self {
        Self {
            native_type,
            length: None,
            precision: None,
            scale: None,
            is_unicode: true,
            is_fixed_length: false,
        }
    }

    /// Length hint. A zero-width bound is not a usable size and clears the hint.
    pub fn with_length(mut self, length: Length) -> Self {
        self.length = match length {
            Length::Bounded(0) => None,
            length => Some(length),
        };
        self
    }

    pub fn with_max_length(self) -> Self {
        self.with_length(Length::Max)
    }

    /// Set precision and clear any scale.
    pub fn with_precision(mut self, precision: u16) -> Self {
        self.precision = Some(precision);
        self.scale = None;
        self
    }

    pub fn with_precision_scale(mut self, precision: u16, scale: u16) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_unicode(mut self, is_unicode: bool) -> Self {
        self.is_unicode = is_unicode;
        self
    }

    pub fn with_fixed_length(mut self, is_fixed_length: bool) -> Self {
        self.is_fixed_length = is_fixed_length;
        self
    }

    pub fn native_type(&self) -> &NativeType {
        &self.native_type
    }

    pub fn length(&self) -> Option<Length> {
        self.length
    }

    pub fn precision(&self) -> Option<u16> {
        self.precision
    }

    /// Scale, only ever present alongside a precision.
    pub fn scale(&self) -> Option<u16> {
        self.precision.and(self.scale)
    }

    pub fn is_unicode(&self) -> bool {
        self.is_unicode
    }

    pub fn is_fixed_length(&self) -> bool {
        self.is_fixed_length
    }

    /// Same hints, different type. Used to unwrap nullables and array elements.
    pub fn with_native_type(&self, native_type: NativeType) -> Self {
        Self {
            native_type,
            ..self.clone()
        }
    }
}

impl From<NativeType> for NativeTypeDescriptor {
    fn from(native_type: NativeType) -> Self {
        NativeTypeDescriptor::new(native_type)
    }
}

/// A rendered SQL type and the hints it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SqlTypeDescriptor {
    sql_type_name: String,
    base_type_name: String,
    length: Option<Length>,
    precision: Option<u16>,
    scale: Option<u16>,
    is_unicode: bool,
    is_fixed_length: bool,
}

impl SqlTypeDescriptor {
    /// Build from a SQL type name; the base name is derived from it.
    pub fn new(sql_type_name: impl Into<String>) -> Result<Self> {
        let sql_type_name = sql_type_name.into().trim().to_string();
        let base_type_name = base_type_name(&sql_type_name);
        if sql_type_name.is_empty() || base_type_name.is_empty() {
            return Err(Error::InvalidTypeName(
                "sql type name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            sql_type_name,
            base_type_name,
            length: None,
            precision: None,
            scale: None,
            is_unicode: false,
            is_fixed_length: false,
        })
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u16) -> Self {
        self.precision = Some(precision);
        self.scale = None;
        self
    }

    pub fn with_precision_scale(mut self, precision: u16, scale: u16) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_unicode(mut self, is_unicode: bool) -> Self {
        self.is_unicode = is_unicode;
        self
    }

    pub fn with_fixed_length(mut self, is_fixed_length: bool) -> Self {
        self.is_fixed_length = is_fixed_length;
        self
    }

    pub fn sql_type_name(&self) -> &str {
        &self.sql_type_name
    }

    pub fn base_type_name(&self) -> &str {
        &self.base_type_name
    }

    pub fn length(&self) -> Option<Length> {
        self.length
    }

    pub fn precision(&self) -> Option<u16> {
        self.precision
    }

    pub fn scale(&self) -> Option<u16> {
        self.precision.and(self.scale)
    }

    pub fn is_unicode(&self) -> bool {
        self.is_unicode
    }

    pub fn is_fixed_length(&self) -> bool {
        self.is_fixed_length
    }
}

impl fmt::Display for SqlTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type_name)
    }
}

/// Strip parenthesized parameter lists and bracket suffixes, then lower-case.
///
/// `decimal(10,2)` → `decimal`, `integer[]` → `integer`,
/// `int(10) unsigned` → `int unsigned`.
pub fn base_type_name(sql_type_name: &str) -> String {
    let mut depth = 0usize;
    let mut stripped = String::with_capacity(sql_type_name.len());

    for ch in sql_type_name.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
