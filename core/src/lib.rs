//! Blog-scoped async facade over the v2 blog-publishing API.
//!
//! # Overview
//! `BlogFacade` binds one blog identifier to a `RemoteClient` and exposes one
//! method per endpoint. Each method returns a cold `Single`: a stream (and
//! future) that performs exactly one remote call when polled and yields
//! exactly one result.
//!
//! # Design
//! - The facade composes over the adapter; it never subclasses or overrides it.
//! - `TumblrClient` builds and parses HTTP exchanges without I/O;
//!   `HttpRemoteClient` executes them with `reqwest`.
//! - Each post type has its own parameter struct sharing `PostEnvelope`.
//! - Declared-but-unbacked operations fail with `NotImplemented` up front.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod http;
pub mod params;
pub mod single;
pub mod types;

pub use adapter::{HttpRemoteClient, RemoteClient};
pub use client::TumblrClient;
pub use config::{ClientConfig, Credentials};
pub use error::{ConstructionError, Error, NotImplemented, RemoteError};
pub use facade::{BlogFacade, Operation, Unsupported};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{
    BlogPostsParams, CreateAudioPostParams, CreateChatPostParams, CreateLinkPostParams,
    CreatePhotoPostParams, CreateQuotePostParams, CreateTextPostParams, CreateVideoPostParams,
    DeletePostParams, EditPostParams, FollowParams, LikeParams, NewPost, PostEnvelope, PostFormat,
    PostState, PostType, PostVariant, QueryParams, ReblogPostParams, Tweet,
};
pub use single::Single;
pub use types::{Blog, BlogAvatar, BlogInfo, BlogPosts, Post, PostId, PostKind, PostStatus};
