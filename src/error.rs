use thiserror::Error;

use crate::secret::CSRF_SECRET_ENV;

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("missing CSRF secret: set the {CSRF_SECRET_ENV} environment variable or configure one explicitly")]
    MissingSecret,

    #[error("argument secret is required and must be non-empty")]
    InvalidSecret,

    #[error("salt length must be at least 1")]
    InvalidSaltLength,

    #[error("CSRF protection requires at least one route matcher")]
    EmptyMatcher,

    #[error("invalid matcher pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CsrfError>;
