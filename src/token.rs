use crate::error::{CsrfError, Result};
use crate::secret::secret_from_env;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Default number of salt characters in a freshly issued token.
pub const DEFAULT_SALT_LENGTH: usize = 8;

/// Salted, keyed CSRF token codec.
///
/// Tokens have the form `<salt>-<base64url(sha256(salt + "-" + secret))>`.
/// The salt is embedded in the token itself, so verification is stateless:
/// the expected digest is recomputed from the received salt and the shared
/// secret, with no server-side token store. The cost of statelessness is
/// that an individual token cannot be revoked before it rotates.
#[derive(Debug, Clone)]
pub struct CsrfTokens {
    secret: String,
    salt_length: usize,
}

impl CsrfTokens {
    /// Create a codec bound to a secret. The secret must be non-empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CsrfError::InvalidSecret);
        }

        Ok(Self {
            secret,
            salt_length: DEFAULT_SALT_LENGTH,
        })
    }

    /// Override the salt length (default 8). Must be at least 1.
    pub fn with_salt_length(mut self, salt_length: usize) -> Result<Self> {
        if salt_length == 0 {
            return Err(CsrfError::InvalidSaltLength);
        }
        self.salt_length = salt_length;
        Ok(self)
    }

    /// Deterministic half of token creation: salt + secret -> token string.
    fn tokenize(secret: &str, salt: &str) -> String {
        let digest = Sha256::digest(format!("{salt}-{secret}"));
        format!("{salt}-{}", URL_SAFE_NO_PAD.encode(digest))
    }

    /// Create a new CSRF token with a fresh random salt.
    pub fn create(&self) -> String {
        Self::tokenize(&self.secret, &random_salt(self.salt_length))
    }

    /// Verify a token against a secret.
    ///
    /// Never panics on malformed input: an empty secret, an empty token, or
    /// a token with no `-` delimiter all yield `false`. The salt is taken
    /// from everything before the FIRST `-` (salts come from a Base62
    /// alphabet and cannot contain the delimiter), the expected token is
    /// recomputed, and the full received token is compared against the full
    /// expected token in constant time.
    pub fn verify(&self, secret: &str, token: &str) -> bool {
        if secret.is_empty() || token.is_empty() {
            return false;
        }

        let Some(index) = token.find('-') else {
            return false;
        };

        let expected = Self::tokenize(secret, &token[..index]);

        // ct_eq rejects length mismatches up front; that only leaks a
        // structural fact, never digest content.
        bool::from(token.as_bytes().ct_eq(expected.as_bytes()))
    }
}

/// Random Base62 salt (digits + upper + lower letters, no `-`).
fn random_salt(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Create a new CSRF token using the environment-provided secret.
pub fn generate_token() -> Result<String> {
    let codec = CsrfTokens::new(secret_from_env()?)?;
    Ok(codec.create())
}

/// Verify a token against the environment-provided secret.
pub fn validate_token(token: &str) -> Result<bool> {
    let secret = secret_from_env()?;
    let codec = CsrfTokens::new(secret.clone())?;
    Ok(codec.verify(&secret, token))
}
