use crate::error::{CsrfError, Result};

/// Environment variable holding the process-wide CSRF secret.
pub const CSRF_SECRET_ENV: &str = "CSRF_SECRET";

/// Read the CSRF secret from the environment.
///
/// The secret's absence is deliberately not checked at startup; it surfaces
/// the first time a token is created or verified.
pub fn secret_from_env() -> Result<String> {
    match std::env::var(CSRF_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(CsrfError::MissingSecret),
    }
}
