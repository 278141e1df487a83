//! Canonical, assembly-independent names for native types.
//!
//! The rendered form is used for cache keys and diagnostics, so the exact
//! spelling (including the single space after a comma between generic
//! arguments) is part of the public contract.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{DomainType, GeometryKind, NativeType, PrimitiveKind};

/// Render a native type; `None` in gives `None` out.
pub fn render_canonical_name(native: Option<&NativeType>) -> Option<String> {
    native.map(NativeType::canonical_name)
}

impl NativeType {
    /// Deterministic textual name, e.g. `Dictionary<String, List<Int32>[]>`.
    pub fn canonical_name(&self) -> String {
        let mut out = String::new();
        write_name(self, &mut out);
        out
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl FromStr for NativeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_canonical_name(s)
    }
}

fn write_name(native: &NativeType, out: &mut String) {
    match native {
        NativeType::Primitive(kind) => out.push_str(kind.name()),
        NativeType::Nullable(inner) => {
            out.push_str("Nullable<");
            write_name(inner, out);
            out.push('>');
        }
        NativeType::Array { element, rank } => {
            write_name(element, out);
            out.push('[');
            for _ in 1..*rank {
                out.push(',');
            }
            out.push(']');
        }
        NativeType::Generic(generic) => {
            out.push_str(&generic.qualified_name());
            out.push('<');
            for (idx, argument) in generic.arguments.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_name(argument, out);
            }
            out.push('>');
        }
        NativeType::Enum(enum_type) => out.push_str(&enum_type.name),
        NativeType::Domain(DomainType::Json) => out.push_str("Json"),
        NativeType::Domain(DomainType::Geometry(None)) => out.push_str("Geometry"),
        NativeType::Domain(DomainType::Geometry(Some(kind))) => out.push_str(kind.name()),
        NativeType::Named(name) => out.push_str(name),
    }
}

/// Parse a canonical name back into a [`NativeType`].
///
/// Enums have no textual marker and come back as [`NativeType::Named`].
pub fn parse_canonical_name(text: &str) -> Result<NativeType> {
    let mut parser = NameParser::new(text);
    let native = parser.parse_type()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(native)
}

struct NameParser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> NameParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse_type(&mut self) -> Result<NativeType> {
        self.skip_whitespace();
        let path = self.parse_path()?;
        self.skip_whitespace();

        let mut native = if self.eat('<') {
            let mut arguments = vec![self.parse_type()?];
            loop {
                self.skip_whitespace();
                if self.eat(',') {
                    arguments.push(self.parse_type()?);
                } else if self.eat('>') {
                    break;
                } else {
                    return Err(self.error("expected ',' or '>'"));
                }
            }
            generic_from(&path, arguments)?
        } else {
            simple_from(&path)
        };

        loop {
            self.skip_whitespace();
            if !self.eat('[') {
                break;
            }
            let mut rank = 1usize;
            loop {
                self.skip_whitespace();
                if self.eat(',') {
                    rank += 1;
                } else if self.eat(']') {
                    break;
                } else {
                    return Err(self.error("expected ',' or ']'"));
                }
            }
            let rank = u8::try_from(rank).map_err(|_| self.error("array rank too large"))?;
            native = NativeType::array_with_rank(native, rank)?;
        }

        Ok(native)
    }

    fn parse_path(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let path: String = self.chars[start..self.pos].iter().collect();
        if path.is_empty() || path.starts_with('.') || path.ends_with('.') {
            return Err(self.error("expected a type name"));
        }
        Ok(path)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: &str) -> Error {
        Error::InvalidTypeName(format!(
            "{message} at position {} in '{}'",
            self.pos, self.input
        ))
    }
}

fn generic_from(path: &str, mut arguments: Vec<NativeType>) -> Result<NativeType> {
    if path == "Nullable" {
        return match arguments.len() {
            1 => Ok(NativeType::nullable(arguments.remove(0))),
            count => Err(Error::InvalidTypeName(format!(
                "Nullable takes one type argument, got {count}"
            ))),
        };
    }

    match path.rsplit_once('.') {
        Some((namespace, name)) => NativeType::generic(Some(namespace), name, arguments),
        None => NativeType::generic(None, path, arguments),
    }
}

fn simple_from(path: &str) -> NativeType {
    if let Some(kind) = PrimitiveKind::from_name(path) {
        return NativeType::Primitive(kind);
    }
    match path {
        "Json" => NativeType::json(),
        "Geometry" => NativeType::geometry(None),
        _ => GeometryKind::ALL
            .into_iter()
            .find(|kind| kind.name() == path)
            .map(|kind| NativeType::geometry(Some(kind)))
            .unwrap_or_else(|| NativeType::named(path)),
    }
}
