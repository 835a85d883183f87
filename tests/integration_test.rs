//! Integration tests for csrf-shield

use csrf_shield::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const SECRET: &str = "integration-test-secret";

fn protected_api_middleware() -> CsrfMiddleware {
    let config = CsrfConfig::new()
        .with_secret(SECRET)
        .with_matcher([MatcherRule::parse("^/api/").unwrap()]);
    CsrfMiddleware::new(config).unwrap()
}

/// A downstream handler that records whether it ran.
fn next_handler() -> (Next, Arc<AtomicBool>) {
    let called = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&called);
    let next: Next = Box::new(move |_req| {
        flag.store(true, Ordering::SeqCst);
        Box::pin(async { HttpResponse::ok().with_json(&serde_json::json!({ "ok": true })) })
    });
    (next, called)
}

fn cookie_token(response: &HttpResponse) -> Option<String> {
    let cookie = response.headers.get("Set-Cookie")?;
    let (name_value, _) = cookie.split_once(';')?;
    let (name, value) = name_value.split_once('=')?;
    assert_eq!(name, DEFAULT_COOKIE_NAME);
    Some(value.to_string())
}

#[tokio::test]
async fn unprotected_get_seeds_a_token_cookie() {
    let csrf = protected_api_middleware();
    let (next, called) = next_handler();

    let req = HttpRequest::new("GET", "/about");
    let response = csrf.handle(req, next).await.unwrap();

    assert!(called.load(Ordering::SeqCst));
    assert_eq!(response.status, 200);

    let seeded = cookie_token(&response).expect("token cookie seeded");
    let codec = CsrfTokens::new(SECRET).unwrap();
    assert!(codec.verify(SECRET, &seeded));
}

#[tokio::test]
async fn protected_post_without_token_is_rejected_with_fresh_cookie() {
    let csrf = protected_api_middleware();
    let (next, called) = next_handler();

    let req = HttpRequest::new("POST", "/api/submit");
    let response = csrf.handle(req, next).await.unwrap();

    assert!(!called.load(Ordering::SeqCst));
    assert_eq!(response.status, 403);
    assert_eq!(response.body, b"CSRF Verification Failed.");

    let seeded = cookie_token(&response).expect("retry token issued");
    let codec = CsrfTokens::new(SECRET).unwrap();
    assert!(codec.verify(SECRET, &seeded));
}

#[tokio::test]
async fn protected_post_with_forged_token_is_rejected_without_cookie() {
    let csrf = protected_api_middleware();
    let (next, called) = next_handler();

    let valid = csrf.generate_token().unwrap();
    let forged = &valid[..valid.len() - 4];

    let req = HttpRequest::new("POST", "/api/submit")
        .with_header("Cookie", format!("{DEFAULT_COOKIE_NAME}={forged}"));
    let response = csrf.handle(req, next).await.unwrap();

    assert!(!called.load(Ordering::SeqCst));
    assert_eq!(response.status, 403);
    assert_eq!(response.body, b"403 Forbidden");
    assert!(!response.headers.contains_key("Set-Cookie"));
}

#[tokio::test]
async fn protected_post_with_valid_token_passes_through() {
    let csrf = protected_api_middleware();
    let (next, called) = next_handler();

    let token = csrf.generate_token().unwrap();
    let req = HttpRequest::new("POST", "/api/submit")
        .with_header("Cookie", format!("{DEFAULT_COOKIE_NAME}={token}"));
    let response = csrf.handle(req, next).await.unwrap();

    assert!(called.load(Ordering::SeqCst));
    assert_eq!(response.status, 200);
    // Valid tokens are reused, never reissued.
    assert!(!response.headers.contains_key("Set-Cookie"));
}

#[tokio::test]
async fn empty_matcher_list_fails_at_setup() {
    let config = CsrfConfig::new().with_secret(SECRET).with_matcher([]);
    assert!(matches!(
        CsrfMiddleware::new(config),
        Err(CsrfError::EmptyMatcher)
    ));
}

#[tokio::test]
async fn unprotected_request_with_existing_token_keeps_it() {
    let csrf = protected_api_middleware();
    let (next, _called) = next_handler();

    let token = csrf.generate_token().unwrap();
    let req = HttpRequest::new("GET", "/about")
        .with_header("Cookie", format!("{DEFAULT_COOKIE_NAME}={token}"));
    let response = csrf.handle(req, next).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(!response.headers.contains_key("Set-Cookie"));
}

#[tokio::test]
async fn skip_handler_can_exempt_a_protected_route() {
    let config = CsrfConfig::new().with_secret(SECRET).with_matcher([
        MatcherRule::parse("^/api/")
            .unwrap()
            .with_skip_handler(|req| async move { req.header("X-Webhook-Sig").is_some() }),
    ]);
    let csrf = CsrfMiddleware::new(config).unwrap();

    // Signed webhook delivery: the skip handler exempts it, so it reaches
    // the downstream handler without a token.
    let (next, called) = next_handler();
    let req = HttpRequest::new("POST", "/api/webhooks/github")
        .with_header("X-Webhook-Sig", "sha256=...");
    let response = csrf.handle(req, next).await.unwrap();
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(response.status, 200);

    // Same request without the signature header is protected.
    let (next, called) = next_handler();
    let req = HttpRequest::new("POST", "/api/webhooks/github");
    let response = csrf.handle(req, next).await.unwrap();
    assert!(!called.load(Ordering::SeqCst));
    assert_eq!(response.status, 403);
}

#[tokio::test]
async fn refresh_token_reissues_on_demand() {
    let csrf = protected_api_middleware();

    let mut response = HttpResponse::ok();
    let token = csrf.refresh_token(&mut response).unwrap();

    assert_eq!(cookie_token(&response), Some(token.clone()));
    let codec = CsrfTokens::new(SECRET).unwrap();
    assert!(codec.verify(SECRET, &token));
}

#[tokio::test]
async fn tokens_are_unique_per_issuance() {
    let csrf = protected_api_middleware();
    let a = csrf.generate_token().unwrap();
    let b = csrf.generate_token().unwrap();
    assert_ne!(a, b);

    let codec = CsrfTokens::new(SECRET).unwrap();
    assert!(codec.verify(SECRET, &a));
    assert!(codec.verify(SECRET, &b));
}
