//! HTTP transport types for the host-does-IO split.
//!
//! # Design
//! `TumblrClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `HttpRemoteClient` is the only piece
//! that executes them, so request shaping and response decoding stay
//! deterministic and are unit-tested without a server.

/// HTTP method for a request. The v2 API only reads with GET and writes
/// with POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query-string pairs, appended by the executor.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON body for writes.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter by exact name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
