//! The remote-client capability the facade is composed over, and its HTTP
//! implementation.
//!
//! # Design
//! `RemoteClient` is the seam: one async method per relayed endpoint, blog
//! identifier first, each resolving exactly once. The facade only ever holds
//! an `Arc<dyn RemoteClient>`, so tests substitute an in-memory adapter and
//! nothing overrides the wrapped client's behavior.

use async_trait::async_trait;
use tracing::debug;

use crate::client::TumblrClient;
use crate::config::{ClientConfig, Credentials};
use crate::error::{ConstructionError, RemoteError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{
    BlogPostsParams, CreateTextPostParams, DeletePostParams, EditPostParams, QueryParams,
};
use crate::types::{BlogAvatar, BlogInfo, BlogPosts, PostId, PostKind};

/// Endpoints the facade relays.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn blog_info(&self, blog: &str, params: &QueryParams) -> Result<BlogInfo, RemoteError>;

    async fn blog_avatar(
        &self,
        blog: &str,
        size: Option<u32>,
        params: &QueryParams,
    ) -> Result<BlogAvatar, RemoteError>;

    async fn blog_posts(
        &self,
        blog: &str,
        post_type: Option<&PostKind>,
        params: &BlogPostsParams,
    ) -> Result<BlogPosts, RemoteError>;

    async fn edit_post(&self, blog: &str, params: &EditPostParams) -> Result<PostId, RemoteError>;

    async fn delete_post(&self, blog: &str, params: &DeletePostParams) -> Result<PostId, RemoteError>;

    async fn create_text_post(
        &self,
        blog: &str,
        params: &CreateTextPostParams,
    ) -> Result<PostId, RemoteError>;
}

/// `RemoteClient` over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    http: reqwest::Client,
    api: TumblrClient,
}

impl HttpRemoteClient {
    pub fn new(credentials: &Credentials, config: &ClientConfig) -> Result<Self, ConstructionError> {
        if credentials.consumer_key.trim().is_empty() {
            return Err(ConstructionError::MissingCredential("consumer_key"));
        }
        let base_url = config.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConstructionError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            api: TumblrClient::new(base_url, credentials),
        })
    }

    /// The request builder this adapter executes.
    pub fn api(&self) -> &TumblrClient {
        &self.api
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, RemoteError> {
        debug!(method = ?req.method, url = %req.url, "sending request");

        let mut builder = match req.method {
            HttpMethod::Get => self.http.get(&req.url),
            HttpMethod::Post => self.http.post(&req.url),
        };
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn blog_info(&self, blog: &str, params: &QueryParams) -> Result<BlogInfo, RemoteError> {
        let response = self.execute(self.api.build_blog_info(blog, params)).await?;
        self.api.parse_blog_info(response)
    }

    async fn blog_avatar(
        &self,
        blog: &str,
        size: Option<u32>,
        params: &QueryParams,
    ) -> Result<BlogAvatar, RemoteError> {
        let request = self.api.build_blog_avatar(blog, size, params);
        let response = self.execute(request).await?;
        self.api.parse_blog_avatar(response)
    }

    async fn blog_posts(
        &self,
        blog: &str,
        post_type: Option<&PostKind>,
        params: &BlogPostsParams,
    ) -> Result<BlogPosts, RemoteError> {
        let request = self.api.build_blog_posts(blog, post_type, params);
        let response = self.execute(request).await?;
        self.api.parse_blog_posts(response)
    }

    async fn edit_post(&self, blog: &str, params: &EditPostParams) -> Result<PostId, RemoteError> {
        let request = self.api.build_edit_post(blog, params)?;
        let response = self.execute(request).await?;
        self.api.parse_edit_post(response)
    }

    async fn delete_post(&self, blog: &str, params: &DeletePostParams) -> Result<PostId, RemoteError> {
        let request = self.api.build_delete_post(blog, params)?;
        let response = self.execute(request).await?;
        self.api.parse_delete_post(response)
    }

    async fn create_text_post(
        &self,
        blog: &str,
        params: &CreateTextPostParams,
    ) -> Result<PostId, RemoteError> {
        let request = self.api.build_create_post(blog, params)?;
        let response = self.execute(request).await?;
        self.api.parse_create_post(response)
    }
}
