use crate::error::Result;
use crate::http::HttpRequest;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Which HTTP methods a rule exempts from protection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MethodPolicy {
    /// Exempt the safe methods GET, HEAD and OPTIONS (the default).
    #[default]
    IgnoreSafe,
    /// Exempt nothing; every method is protectable.
    IgnoreNone,
    /// Exempt exactly the listed methods (case-insensitive).
    Ignore(Vec<String>),
}

impl MethodPolicy {
    const SAFE_METHODS: [&'static str; 3] = ["GET", "HEAD", "OPTIONS"];

    /// Whether a request with this method is protectable under the policy.
    pub fn protects(&self, method: &str) -> bool {
        match self {
            MethodPolicy::IgnoreSafe => !Self::SAFE_METHODS
                .iter()
                .any(|m| m.eq_ignore_ascii_case(method)),
            MethodPolicy::IgnoreNone => true,
            MethodPolicy::Ignore(methods) => {
                !methods.iter().any(|m| m.eq_ignore_ascii_case(method))
            }
        }
    }
}

/// Async per-request predicate. Resolving `true` means "skip protection for
/// this request" and evaluation moves on to the next rule.
pub type SkipHandler =
    Arc<dyn Fn(HttpRequest) -> Pin<Box<dyn Future<Output = bool> + Send>> + Send + Sync>;

/// One route-matching rule: a path pattern, a method policy, and an optional
/// dynamic skip handler.
#[derive(Clone)]
pub struct MatcherRule {
    pattern: Regex,
    methods: MethodPolicy,
    skip_handler: Option<SkipHandler>,
}

impl MatcherRule {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            methods: MethodPolicy::default(),
            skip_handler: None,
        }
    }

    /// Build a rule from a pattern string.
    pub fn parse(pattern: &str) -> Result<Self> {
        Ok(Self::new(Regex::new(pattern)?))
    }

    /// Set the method policy.
    pub fn with_methods(mut self, methods: MethodPolicy) -> Self {
        self.methods = methods;
        self
    }

    /// Exempt the given methods instead of the default GET/HEAD/OPTIONS set.
    pub fn ignore_methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_methods(MethodPolicy::Ignore(
            methods.into_iter().map(Into::into).collect(),
        ))
    }

    /// Exempt no methods; protect every method that matches the pattern.
    pub fn ignore_no_methods(self) -> Self {
        self.with_methods(MethodPolicy::IgnoreNone)
    }

    /// Attach a dynamic predicate that can exempt individual requests.
    ///
    /// Returning `true` skips protection for the request, so the handler's
    /// polarity is the inverse of "does this rule match".
    pub fn with_skip_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.skip_handler = Some(Arc::new(move |req| Box::pin(handler(req))));
        self
    }

    /// Evaluate this rule against a request. May suspend if the rule carries
    /// a skip handler.
    pub async fn matches(&self, request: &HttpRequest) -> bool {
        if !self.pattern.is_match(&request.path) {
            return false;
        }

        if !self.methods.protects(&request.method) {
            return false;
        }

        if let Some(handler) = &self.skip_handler {
            if handler(request.clone()).await {
                return false;
            }
        }

        true
    }
}

impl From<Regex> for MatcherRule {
    fn from(pattern: Regex) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Debug for MatcherRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherRule")
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("skip_handler", &self.skip_handler.as_ref().map(|_| "..."))
            .finish()
    }
}

/// Evaluate an ordered rule list against a request. The first rule that
/// matches on pattern, method policy and skip handler decides the verdict;
/// an exhausted list means the request is not protected.
pub async fn requires_protection(rules: &[MatcherRule], request: &HttpRequest) -> bool {
    for rule in rules {
        if rule.matches(request).await {
            return true;
        }
    }
    false
}
