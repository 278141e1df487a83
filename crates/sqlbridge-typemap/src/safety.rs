use std::sync::LazyLock;

use regex::Regex;

/// Longest type text accepted from an override.
pub const MAX_TYPE_NAME_LENGTH: usize = 128;

static SAFE_TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let word = r"[A-Za-z_][A-Za-z0-9_.]*";
    let parameter = r"(?:\d+|[A-Za-z_][A-Za-z0-9_]*)";
    let parameters = format!(r"\s*\(\s*{parameter}(?:\s*,\s*{parameter})*\s*\)");
    let pattern = format!(r"^{word}(?:\s+{word})*(?:{parameters})?(?:\s+{word})*(?:\s*\[\d*\])*$");
    Regex::new(&pattern).expect("safe type name pattern is valid")
});

/// Whether `text` has the shape of a plain SQL type name.
///
/// Accepts identifier words, one optional parameter list of numbers or
/// identifiers (`max`, `Point`), trailing words and `[]` groups. Anything
/// carrying quotes, comments, statement separators or nested groups is
/// refused, so override text can be spliced into DDL as-is.
pub fn is_safe_type_name(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.len() <= MAX_TYPE_NAME_LENGTH && SAFE_TYPE_NAME.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_type_names() {
        for name in [
            "int",
            "nvarchar(max)",
            "decimal(10, 2)",
            "int(10) unsigned",
            "timestamp(3) with time zone",
            "double precision",
            "integer[]",
            "text[][]",
            "geometry(Point,4326)",
            "public.citext",
        ] {
            assert!(is_safe_type_name(name), "rejected '{name}'");
        }
    }

    #[test]
    fn refuses_injection_shapes() {
        for name in [
            "",
            "int; drop table users",
            "varchar(10)--",
            "int /* x */",
            "varchar('a')",
            "decimal((10),2)",
            "text[x]",
            "int)",
            "\"quoted\"",
        ] {
            assert!(!is_safe_type_name(name), "accepted '{name}'");
        }
    }

    #[test]
    fn refuses_overlong_names() {
        let name = "a".repeat(MAX_TYPE_NAME_LENGTH + 1);
        assert!(!is_safe_type_name(&name));
    }
}
