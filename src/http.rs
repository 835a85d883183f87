// HTTP request and response wrappers used at the framework boundary.
//
// Host frameworks adapt their own request/response types into these; how the
// serialized cookie ultimately lands on the wire is the adapter's concern.

use serde::Serialize;
use std::collections::HashMap;

/// HTTP request wrapper
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Add a request header. Keys are stored lowercase, since header names
    /// are case-insensitive on the wire.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Get a header value, trying the exact name first and then its
    /// lowercase form (the stored shape for `with_header` keys).
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers
            .get(name)
            .or_else(|| self.headers.get(&name.to_lowercase()))
    }

    /// Get a cookie value by name from the `Cookie` request header.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.header("Cookie")?;
        header.split(';').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.trim() == name {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn forbidden() -> Self {
        Self::new(403)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> crate::Result<Self> {
        self.body = serde_json::to_vec(value)
            .map_err(|e| crate::CsrfError::Internal(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
