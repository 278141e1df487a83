/// Split `text` on any of `delimiters`, ignoring delimiters nested inside
/// `(...)` or `[...]`.
///
/// Tokens are trimmed and empty tokens are dropped, so consecutive delimiters
/// never yield an empty entry. Unbalanced closing characters are ignored.
pub fn split_respecting_nesting(text: &str, delimiters: &[char]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            _ => {}
        }

        if paren_depth == 0 && bracket_depth == 0 && delimiters.contains(&ch) {
            push_token(&mut tokens, &current);
            current.clear();
        } else {
            current.push(ch);
        }
    }
    push_token(&mut tokens, &current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let token = raw.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_commas_inside_parentheses() {
        let tokens = split_respecting_nesting(
            "mysql:decimal(10,2),sqlserver:decimal(12,4)",
            &[','],
        );
        assert_eq!(tokens, vec!["mysql:decimal(10,2)", "sqlserver:decimal(12,4)"]);
    }

    #[test]
    fn keeps_delimiters_inside_brackets() {
        let tokens = split_respecting_nesting("pg:integer[], mysql:json", &[',', ';']);
        assert_eq!(tokens, vec!["pg:integer[]", "mysql:json"]);

        let tokens = split_respecting_nesting("a[1,2];b", &[',', ';']);
        assert_eq!(tokens, vec!["a[1,2]", "b"]);
    }

    #[test]
    fn drops_empty_tokens() {
        let tokens = split_respecting_nesting(" a ,, ;b; ", &[',', ';']);
        assert_eq!(tokens, vec!["a", "b"]);
        assert!(split_respecting_nesting("", &[',']).is_empty());
        assert!(split_respecting_nesting(" ,;, ", &[',', ';']).is_empty());
    }

    #[test]
    fn tolerates_unbalanced_closers() {
        let tokens = split_respecting_nesting("a),b", &[',']);
        assert_eq!(tokens, vec!["a)", "b"]);
    }

    #[test]
    fn nested_groups_track_depth() {
        let tokens = split_respecting_nesting("f(g(1,2),3),x", &[',']);
        assert_eq!(tokens, vec!["f(g(1,2),3)", "x"]);
    }
}
