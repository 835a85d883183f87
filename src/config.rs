use crate::error::{CsrfError, Result};
use crate::matcher::MatcherRule;
use crate::secret::secret_from_env;
use crate::token::DEFAULT_SALT_LENGTH;
use serde::{Deserialize, Serialize};

/// Default name of the cookie carrying the CSRF token.
pub const DEFAULT_COOKIE_NAME: &str = "csrf-token";

/// Cookie SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to the emitted token cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Cookie HttpOnly flag
    pub http_only: bool,

    /// Cookie SameSite policy
    pub same_site: SameSite,

    /// Cookie path
    pub path: String,

    /// Cookie secure flag (HTTPS only)
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            secure: false,
        }
    }
}

/// CSRF protection configuration.
///
/// Built once at startup and treated as a read-only snapshot for the process
/// lifetime; the middleware wraps it in an `Arc` and never mutates it.
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Explicit secret. When `None`, the secret is read lazily from the
    /// `CSRF_SECRET` environment variable.
    pub secret: Option<String>,

    /// Name of the token cookie
    pub cookie_name: String,

    /// Attributes for the emitted cookie
    pub cookie: CookieOptions,

    /// Response body for requests rejected with no token present
    pub error_message: String,

    /// Emit warning diagnostics for rejected requests
    pub verbose: bool,

    /// Salt length for freshly issued tokens
    pub salt_length: usize,

    /// Ordered route-matching rules; first match wins
    pub matcher: Vec<MatcherRule>,
}

impl CsrfConfig {
    /// Create a configuration with default settings and a single catch-all
    /// matcher rule (every path, safe methods exempt).
    pub fn new() -> Self {
        Self {
            secret: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie: CookieOptions::default(),
            error_message: "CSRF Verification Failed.".to_string(),
            verbose: false,
            salt_length: DEFAULT_SALT_LENGTH,
            matcher: vec![
                MatcherRule::parse("^/").expect("default matcher pattern is valid"),
            ],
        }
    }

    /// Set an explicit secret instead of reading `CSRF_SECRET`.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the token cookie name
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the cookie attributes
    pub fn with_cookie_options(mut self, cookie: CookieOptions) -> Self {
        self.cookie = cookie;
        self
    }

    /// Set the cookie HttpOnly flag
    pub fn with_cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    /// Set the cookie SameSite policy
    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = same_site;
        self
    }

    /// Set the cookie path
    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = path.into();
        self
    }

    /// Set the cookie secure flag
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    /// Set the rejection body for token-less requests
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Enable or disable warning diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the salt length for issued tokens
    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    /// Replace the matcher list. Replacement is wholesale, not a merge.
    pub fn with_matcher<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = MatcherRule>,
    {
        self.matcher = rules.into_iter().collect();
        self
    }

    /// Resolve the effective secret: the explicit one if set, otherwise the
    /// environment variable.
    pub fn resolve_secret(&self) -> Result<String> {
        match &self.secret {
            Some(secret) if !secret.is_empty() => Ok(secret.clone()),
            Some(_) => Err(CsrfError::InvalidSecret),
            None => secret_from_env(),
        }
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}
