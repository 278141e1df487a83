use sqlbridge_core::{Length, split_respecting_nesting};

/// A SQL type name split into its parts.
///
/// `int(10) unsigned` has base `int`, arguments `["10"]` and modifiers
/// `unsigned`; `numeric(18,6)[]` has one array dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSqlType {
    pub name: String,
    pub base: String,
    pub arguments: Vec<String>,
    pub modifiers: String,
    pub array_dims: usize,
}

impl ParsedSqlType {
    /// Base name followed by modifiers, e.g. `timestamp with time zone`.
    pub fn type_key(&self) -> String {
        if self.modifiers.is_empty() {
            self.base.clone()
        } else {
            format!("{} {}", self.base, self.modifiers)
        }
    }

    /// The same type without array dimensions.
    pub fn element(&self) -> ParsedSqlType {
        ParsedSqlType {
            array_dims: 0,
            ..self.clone()
        }
    }

    /// The same type under a different base name.
    pub fn with_base(&self, base: &str) -> ParsedSqlType {
        ParsedSqlType {
            base: base.to_string(),
            ..self.clone()
        }
    }

    /// First argument read as a length (`max` or a positive integer).
    pub fn length(&self) -> Option<Length> {
        match self.arguments.as_slice() {
            [first] => Length::parse(first),
            _ => None,
        }
    }

    /// First two arguments read as precision and optional scale.
    pub fn precision_scale(&self) -> Option<(u16, Option<u16>)> {
        match self.arguments.as_slice() {
            [precision] => Some((precision.parse().ok()?, None)),
            [precision, scale] => Some((precision.parse().ok()?, Some(scale.parse().ok()?))),
            _ => None,
        }
    }
}

/// Split a SQL type name into base, arguments, modifiers and array suffixes.
///
/// Returns `None` for empty or malformed names (unbalanced groups, a second
/// argument list, characters outside an identifier).
pub fn parse_sql_type(sql_type_name: &str) -> Option<ParsedSqlType> {
    let name = sql_type_name.trim();
    if name.is_empty() {
        return None;
    }

    let (without_arrays, array_dims) = strip_array_suffixes(name)?;

    let (base, arguments, modifiers) = match without_arrays.find('(') {
        Some(open) => {
            let close = without_arrays.rfind(')')?;
            if close < open {
                return None;
            }
            let inner = &without_arrays[open + 1..close];
            let rest = &without_arrays[close + 1..];
            if rest.contains(['(', ')']) || inner.contains(['(', ')']) {
                return None;
            }
            let arguments = split_respecting_nesting(inner, &[',']);
            if arguments.is_empty() {
                return None;
            }
            (&without_arrays[..open], arguments, rest)
        }
        None => {
            if without_arrays.contains(')') {
                return None;
            }
            (without_arrays, Vec::new(), "")
        }
    };

    let base = normalize_words(base);
    let modifiers = normalize_words(modifiers);
    if base.is_empty() || !is_identifier_text(&base) || !is_identifier_text(&modifiers) {
        return None;
    }

    Some(ParsedSqlType {
        name: name.to_string(),
        base,
        arguments,
        modifiers,
        array_dims,
    })
}

fn strip_array_suffixes(name: &str) -> Option<(&str, usize)> {
    let mut rest = name.trim_end();
    let mut dims = 0;
    while let Some(stripped) = rest.strip_suffix(']') {
        let open = stripped.rfind('[')?;
        let size = stripped[open + 1..].trim();
        if !size.is_empty() && !size.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        rest = stripped[..open].trim_end();
        dims += 1;
    }
    if rest.contains(['[', ']']) {
        return None;
    }
    Some((rest, dims))
}

fn normalize_words(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_identifier_text(text: &str) -> bool {
    text.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == ' ' || ch == '.')
}
