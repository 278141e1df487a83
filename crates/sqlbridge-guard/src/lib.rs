//! Injection gate for raw SQL fragments (view bodies, check constraints,
//! column defaults) before they are embedded in generated DDL.

pub mod error;
pub mod options;
pub mod validator;

pub use error::{ExpressionError, ExpressionKind, OptionsError};
pub use options::{DEFAULT_MAX_LENGTH, ValidatorOptions};
pub use validator::{
    DENIED_KEYWORDS, DENIED_PREFIXES, ExpressionValidator, validate_check_expression,
    validate_default_expression, validate_view_definition,
};
