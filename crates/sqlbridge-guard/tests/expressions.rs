use sqlbridge_guard::{
    DENIED_KEYWORDS, ExpressionError, ExpressionKind, ExpressionValidator,
    validate_check_expression, validate_default_expression, validate_view_definition,
};

fn message(result: Result<(), ExpressionError>) -> String {
    result.expect_err("expected rejection").to_string()
}

#[test]
fn accepts_ordinary_expressions() {
    assert!(validate_view_definition("SELECT id, name FROM users WHERE active = 1").is_ok());
    assert!(validate_view_definition("  select id from orders").is_ok());
    assert!(validate_check_expression("status IN ('A','B','C')").is_ok());
    assert!(validate_check_expression("price >= 0 AND price < 1000").is_ok());
    assert!(validate_default_expression("GETDATE()").is_ok());
    assert!(validate_default_expression("0").is_ok());
    assert!(validate_default_expression("CURRENT_TIMESTAMP").is_ok());
}

#[test]
fn blank_input_is_empty() {
    for text in ["", "   ", "\n\t"] {
        assert!(message(validate_check_expression(text)).contains("cannot be null or empty"));
    }
}

#[test]
fn overlong_input_is_too_long() {
    let text = format!("a = '{}'", "x".repeat(2100));
    assert!(message(validate_check_expression(&text)).contains("too long"));

    let exact = "1".repeat(2048);
    assert!(validate_default_expression(&exact).is_ok());
    let over = "1".repeat(2049);
    assert!(message(validate_default_expression(&over)).contains("too long"));
}

#[test]
fn control_characters_are_rejected() {
    assert!(message(validate_default_expression("0\0")).contains("invalid control characters"));
    assert!(message(validate_check_expression("a\u{7}b")).contains("invalid control characters"));
    assert!(validate_check_expression("a > 1\r\n AND b > 2\t").is_ok());
}

#[test]
fn comments_are_rejected() {
    assert!(message(validate_check_expression("a > 1 -- note")).contains("comment not allowed"));
    assert!(message(validate_view_definition("SELECT /* x */ 1")).contains("comment not allowed"));
}

#[test]
fn statement_injection_in_check_is_rejected() {
    let err = validate_check_expression("status='A'; DROP TABLE users; --").unwrap_err();
    assert_eq!(err.category(), "comment");

    let err = validate_check_expression("status='A'; DROP TABLE users").unwrap_err();
    assert_eq!(err.category(), "dangerous_keyword");
}

#[test]
fn views_must_start_with_select() {
    let msg = message(validate_view_definition("DROP TABLE users"));
    assert!(msg.contains("must start with SELECT"), "{msg}");
    assert!(message(validate_view_definition("WITH x AS (SELECT 1) SELECT * FROM x"))
        .contains("must start with SELECT"));
    assert!(message(validate_view_definition("SELECTED")).contains("must start with SELECT"));
}

#[test]
fn sub_selects_are_denied_outside_views() {
    let msg = message(validate_default_expression("(SELECT password FROM users)"));
    assert!(msg.contains("SELECT"), "{msg}");
    assert!(validate_check_expression("id IN (SELECT id FROM t)").is_err());
}

#[test]
fn every_builtin_keyword_is_denied_case_insensitively() {
    for keyword in DENIED_KEYWORDS {
        let lower = format!("SELECT a FROM t WHERE {} = 1", keyword.to_lowercase());
        let err = validate_view_definition(&lower).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::DangerousKeyword {
                kind: ExpressionKind::View,
                keyword: keyword.to_string()
            }
        );
    }
}

#[test]
fn union_and_waitfor_in_views() {
    assert!(message(validate_view_definition("SELECT a FROM t UNION SELECT b FROM u"))
        .contains("dangerous keyword 'UNION'"));
    assert!(message(validate_view_definition("SELECT 1 WAITFOR DELAY '0:0:5'"))
        .contains("WAITFOR"));
}

#[test]
fn validation_is_idempotent_and_uses_the_shared_defaults() {
    let validator = ExpressionValidator::default();
    for text in ["GETDATE()", "(SELECT 1)", ""] {
        assert_eq!(
            validator.validate_default_expression(text),
            validate_default_expression(text)
        );
        assert_eq!(
            validate_default_expression(text),
            validate_default_expression(text)
        );
    }
}
