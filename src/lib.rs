//! # CSRF Shield
//!
//! Stateless double-submit cookie CSRF protection.
//!
//! ## Features
//!
//! - ✅ **Salted Tokens** - `salt-base64url(sha256(salt-secret))`, verifiable
//!   without server-side storage
//! - ✅ **Constant-time Verification** - timing-safe comparison end to end
//! - ✅ **Route Matchers** - ordered regex rules with method policies and
//!   async per-request skip handlers
//! - ✅ **Middleware Integration** - one 403-or-forward decision per request
//! - ✅ **Lazy Token Seeding** - token cookies issued even on unprotected
//!   routes so a later mutation already has one
//! - ✅ **Configurable** - cookie name and attributes, error message,
//!   salt length, verbosity
//!
//! ## Quick Start
//!
//! ```rust
//! use csrf_shield::{CsrfConfig, CsrfMiddleware, MatcherRule};
//!
//! let config = CsrfConfig::new()
//!     .with_secret("replace-me-with-a-real-secret")
//!     .with_cookie_secure(true)
//!     .with_matcher([
//!         // POST/PUT/DELETE/... under /api are protected; GET/HEAD/OPTIONS
//!         // are exempt by default.
//!         MatcherRule::parse("^/api/").unwrap(),
//!     ]);
//!
//! let csrf = CsrfMiddleware::new(config).unwrap();
//! let token = csrf.generate_token().unwrap();
//! assert!(token.contains('-'));
//! ```
//!
//! Without an explicit secret, the `CSRF_SECRET` environment variable is read
//! lazily the first time a token is created or verified.
//!
//! ## Token Codec
//!
//! ```rust
//! use csrf_shield::CsrfTokens;
//!
//! let codec = CsrfTokens::new("my-secret").unwrap();
//! let token = codec.create();
//!
//! assert!(codec.verify("my-secret", &token));
//! assert!(!codec.verify("other-secret", &token));
//! assert!(!codec.verify("my-secret", "not-a-real-token"));
//! ```
//!
//! ## Matcher Rules
//!
//! ```rust
//! use csrf_shield::MatcherRule;
//!
//! let rules = [
//!     // Webhooks authenticate out of band; skip them dynamically.
//!     MatcherRule::parse("^/api/webhooks/")
//!         .unwrap()
//!         .with_skip_handler(|req| async move { req.header("X-Webhook-Sig").is_some() }),
//!     // Everything else under /api, every method.
//!     MatcherRule::parse("^/api/").unwrap().ignore_no_methods(),
//! ];
//! assert_eq!(rules.len(), 2);
//! ```
//!
//! ## Usage in a Middleware Chain
//!
//! ```ignore
//! use csrf_shield::{CsrfMiddleware, Middleware, Next};
//!
//! async fn serve(csrf: &CsrfMiddleware, req: HttpRequest, next: Next) {
//!     match csrf.handle(req, next).await {
//!         Ok(response) => { /* 403 or the downstream response */ }
//!         Err(e) => { /* fatal configuration error, e.g. missing secret */ }
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod matcher;
pub mod middleware;
pub mod secret;
pub mod token;

pub use config::{CookieOptions, CsrfConfig, DEFAULT_COOKIE_NAME, SameSite};
pub use error::{CsrfError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use matcher::{MatcherRule, MethodPolicy, SkipHandler, requires_protection};
pub use middleware::{CsrfMiddleware, Middleware, Next};
pub use secret::CSRF_SECRET_ENV;
pub use token::{CsrfTokens, DEFAULT_SALT_LENGTH, generate_token, validate_token};
