use crate::config::CsrfConfig;
use crate::error::{CsrfError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::matcher;
use crate::token::CsrfTokens;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::warn;

/// Type alias for the next handler in the middleware chain
pub type Next = Box<
    dyn FnOnce(HttpRequest) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send>> + Send,
>;

/// Middleware trait for processing requests before they reach the handler
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass to next middleware
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse>;
}

/// CSRF protection middleware.
///
/// Classifies every request exactly once: unmatched requests pass through
/// (with lazy token seeding), matched requests without a token are rejected
/// with the configured message and a fresh cookie, matched requests with a
/// forged token are rejected outright, and matched requests with a valid
/// token pass through untouched.
///
/// Only the cookie-held token is checked against the secret. Cross-checking
/// a second client-supplied copy (header or form field) is left to the
/// caller at the framework boundary.
#[derive(Clone)]
pub struct CsrfMiddleware {
    config: Arc<CsrfConfig>,
}

impl CsrfMiddleware {
    /// Create new CSRF middleware.
    ///
    /// Rejects an empty matcher list before any request is evaluated; a
    /// middleware with no route scope is a wiring mistake, not an
    /// "always pass" default.
    pub fn new(config: CsrfConfig) -> Result<Self> {
        if config.matcher.is_empty() {
            return Err(CsrfError::EmptyMatcher);
        }

        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    fn codec(&self) -> Result<CsrfTokens> {
        CsrfTokens::new(self.config.resolve_secret()?)?.with_salt_length(self.config.salt_length)
    }

    /// Generate a fresh CSRF token
    pub fn generate_token(&self) -> Result<String> {
        Ok(self.codec()?.create())
    }

    /// Get the CSRF token carried by the request's cookie header, if any
    pub fn token_from_request(&self, request: &HttpRequest) -> Option<String> {
        request.cookie(&self.config.cookie_name)
    }

    /// Force-issue a new token cookie on a response, returning the token
    pub fn refresh_token(&self, response: &mut HttpResponse) -> Result<String> {
        let token = self.generate_token()?;
        self.set_token_cookie(response, &token);
        Ok(token)
    }

    /// Attach a token to the response as a `Set-Cookie` header
    fn set_token_cookie(&self, response: &mut HttpResponse, token: &str) {
        let opts = &self.config.cookie;

        let mut cookie = format!(
            "{}={}; Path={}",
            self.config.cookie_name, token, opts.path
        );

        if opts.secure {
            cookie.push_str("; Secure");
        }

        if opts.http_only {
            cookie.push_str("; HttpOnly");
        }

        cookie.push_str("; SameSite=");
        cookie.push_str(opts.same_site.as_str());

        response
            .headers
            .insert("Set-Cookie".to_string(), cookie);
    }

    /// Only method and path are logged; token and secret material never are.
    fn warn_rejected(&self, request: &HttpRequest, reason: &str) {
        if self.config.verbose {
            warn!(method = %request.method, path = %request.path, "{reason}");
        }
    }
}

#[async_trait]
impl Middleware for CsrfMiddleware {
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse> {
        let protected = matcher::requires_protection(&self.config.matcher, &req).await;
        let token = self.token_from_request(&req);

        if protected {
            match &token {
                None => {
                    self.warn_rejected(&req, "client sent a state-changing request without a CSRF token");

                    // Seed a token on the rejection so the client can retry.
                    let mut response = HttpResponse::forbidden()
                        .with_body(self.config.error_message.clone());
                    self.refresh_token(&mut response)?;
                    return Ok(response);
                }
                Some(value) => {
                    let secret = self.config.resolve_secret()?;
                    let codec = self.codec()?;
                    if !codec.verify(&secret, value) {
                        self.warn_rejected(&req, "client sent an invalid CSRF token");
                        return Ok(HttpResponse::forbidden().with_body("403 Forbidden"));
                    }
                }
            }
        }

        let mut response = next(req).await?;

        // Lazy seeding: any response to a token-less request carries a fresh
        // token so a later protected mutation already has one.
        if token.is_none() {
            self.refresh_token(&mut response)?;
        }

        Ok(response)
    }
}
