//! Stateless HTTP request builder and response parser for the v2 blog API.
//!
//! # Design
//! `TumblrClient` holds only the base URL and the two credential fields it
//! puts on the wire. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; `HttpRemoteClient` does the round-trip in between.
//!
//! Every response is wrapped as `{"meta": {"status", "msg"}, "response": ...}`.
//! Parsing unwraps the envelope on success and turns `meta.msg` into the
//! `RemoteError` message on failure.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::config::Credentials;
use crate::error::RemoteError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{BlogPostsParams, DeletePostParams, EditPostParams, PostVariant, QueryParams};
use crate::types::{BlogAvatar, BlogInfo, BlogPosts, PostId, PostKind};

/// Synchronous, stateless request builder for one API host.
#[derive(Clone)]
pub struct TumblrClient {
    base_url: String,
    api_key: String,
    token: String,
}

impl fmt::Debug for TumblrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TumblrClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    msg: String,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    detail: String,
}

impl TumblrClient {
    pub fn new(base_url: &str, credentials: &Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: credentials.consumer_key.clone(),
            token: credentials.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_blog_info(&self, blog: &str, params: &QueryParams) -> HttpRequest {
        self.read(format!("{}/info", self.blog_url(blog)), extra_query(params))
    }

    pub fn build_blog_avatar(
        &self,
        blog: &str,
        size: Option<u32>,
        params: &QueryParams,
    ) -> HttpRequest {
        let url = match size {
            Some(size) => format!("{}/avatar/{size}", self.blog_url(blog)),
            None => format!("{}/avatar", self.blog_url(blog)),
        };
        self.read(url, extra_query(params))
    }

    pub fn build_blog_posts(
        &self,
        blog: &str,
        post_type: Option<&PostKind>,
        params: &BlogPostsParams,
    ) -> HttpRequest {
        let url = match post_type {
            Some(kind) => format!("{}/posts/{}", self.blog_url(blog), kind.as_str()),
            None => format!("{}/posts", self.blog_url(blog)),
        };
        self.read(url, params.to_query())
    }

    /// Build a create request for any post variant. The `type` field is set
    /// from the variant, overriding whatever the caller put in the envelope.
    pub fn build_create_post<P>(&self, blog: &str, params: &P) -> Result<HttpRequest, RemoteError>
    where
        P: PostVariant + Clone,
    {
        let mut params = params.clone();
        params.envelope_mut().post_type = Some(P::POST_TYPE);
        self.write(format!("{}/post", self.blog_url(blog)), &params)
    }

    pub fn build_edit_post(
        &self,
        blog: &str,
        params: &EditPostParams,
    ) -> Result<HttpRequest, RemoteError> {
        self.write(format!("{}/post/edit", self.blog_url(blog)), params)
    }

    pub fn build_delete_post(
        &self,
        blog: &str,
        params: &DeletePostParams,
    ) -> Result<HttpRequest, RemoteError> {
        self.write(format!("{}/post/delete", self.blog_url(blog)), params)
    }

    pub fn parse_blog_info(&self, response: HttpResponse) -> Result<BlogInfo, RemoteError> {
        parse_envelope(response)
    }

    pub fn parse_blog_avatar(&self, response: HttpResponse) -> Result<BlogAvatar, RemoteError> {
        parse_envelope(response)
    }

    pub fn parse_blog_posts(&self, response: HttpResponse) -> Result<BlogPosts, RemoteError> {
        parse_envelope(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<PostId, RemoteError> {
        parse_envelope(response)
    }

    pub fn parse_edit_post(&self, response: HttpResponse) -> Result<PostId, RemoteError> {
        parse_envelope(response)
    }

    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<PostId, RemoteError> {
        parse_envelope(response)
    }

    fn blog_url(&self, blog: &str) -> String {
        format!("{}/v2/blog/{}", self.base_url, blog_hostname(blog))
    }

    fn read(&self, url: String, mut query: Vec<(String, String)>) -> HttpRequest {
        query.insert(0, ("api_key".to_string(), self.api_key.clone()));
        HttpRequest {
            method: HttpMethod::Get,
            url,
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    fn write<T: serde::Serialize>(&self, url: String, params: &T) -> Result<HttpRequest, RemoteError> {
        let body =
            serde_json::to_string(params).map_err(|e| RemoteError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            query: Vec::new(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {}", self.token)),
            ],
            body: Some(body),
        })
    }
}

/// Normalize a blog name or URL to the hostname the API expects.
///
/// `staff` becomes `staff.tumblr.com`; custom domains and full URLs keep
/// their host.
pub fn blog_hostname(identifier: &str) -> String {
    let host = identifier.trim();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    let host = host.split('/').next().unwrap_or(host);
    if host.contains('.') {
        host.to_string()
    } else {
        format!("{host}.tumblr.com")
    }
}

/// Caller-supplied pairs go after `api_key`, which they cannot override.
fn extra_query(params: &QueryParams) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(name, _)| name.as_str() != "api_key")
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, RemoteError> {
    check_status(&response)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| RemoteError::Deserialization(e.to_string()))?;
    Ok(envelope.response)
}

/// Map non-2xx status codes to a `RemoteError`, preferring the server's own
/// message over the raw body.
fn check_status(response: &HttpResponse) -> Result<(), RemoteError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    let message = match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => envelope
            .errors
            .into_iter()
            .map(|e| e.detail)
            .find(|d| !d.is_empty())
            .or_else(|| envelope.meta.map(|m| m.msg))
            .unwrap_or_default(),
        Err(_) => response.body.clone(),
    };
    warn!(status = response.status, %message, "remote call failed");
    Err(RemoteError::from_status(response.status, message))
}
