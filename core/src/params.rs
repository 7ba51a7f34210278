//! Request parameter contracts.
//!
//! # Design
//! Every post-creation variant is its own struct carrying the shared
//! `PostEnvelope` (flattened on the wire) plus the fields only that post type
//! accepts. Which variant is valid is decided by which facade method is
//! called, never by a runtime tag; `PostVariant` ties each struct to its
//! `PostType` so the adapter can stamp the `type` field itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form query parameters for listing endpoints without a typed contract.
pub type QueryParams = BTreeMap<String, String>;

/// Content type of a post being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Text,
    Photo,
    Quote,
    Link,
    Chat,
    Audio,
    Video,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Text => "text",
            PostType::Photo => "photo",
            PostType::Quote => "quote",
            PostType::Link => "link",
            PostType::Chat => "chat",
            PostType::Audio => "audio",
            PostType::Video => "video",
        }
    }
}

/// Lifecycle state requested for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostState {
    Published,
    Draft,
    Queue,
    Private,
}

/// Body markup format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFormat {
    Html,
    Markdown,
}

/// Auto-share override. The service only accepts `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tweet {
    Off,
}

/// Fields shared by every write operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostEnvelope {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PostState>,
    /// Comma-separated tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet: Option<Tweet>,
    /// GMT publish date, e.g. `2026-10-18 09:00:00 GMT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<PostFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_inline_images: Option<bool>,
}

impl PostEnvelope {
    /// Join `tags` with commas and store them.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.tags = if joined.is_empty() { None } else { Some(joined) };
        self
    }

    pub fn with_state(mut self, state: PostState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_format(mut self, format: PostFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// A post-creation parameter shape bound to exactly one `PostType`.
pub trait PostVariant: Serialize {
    const POST_TYPE: PostType;

    fn envelope(&self) -> &PostEnvelope;

    fn envelope_mut(&mut self) -> &mut PostEnvelope;
}

macro_rules! post_variant {
    ($ty:ty, $kind:expr) => {
        impl PostVariant for $ty {
            const POST_TYPE: PostType = $kind;

            fn envelope(&self) -> &PostEnvelope {
                &self.envelope
            }

            fn envelope_mut(&mut self) -> &mut PostEnvelope {
                &mut self.envelope
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTextPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

impl CreateTextPostParams {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            envelope: PostEnvelope::default(),
            title: None,
            body: body.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_envelope(mut self, envelope: PostEnvelope) -> Self {
        self.envelope = envelope;
        self
    }
}

/// Photo post. One of `source`, `data` or `data64` carries the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePhotoPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateQuotePostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLinkPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChatPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub conversation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAudioPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVideoPostParams {
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    /// Embed code or a video URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

post_variant!(CreateTextPostParams, PostType::Text);
post_variant!(CreatePhotoPostParams, PostType::Photo);
post_variant!(CreateQuotePostParams, PostType::Quote);
post_variant!(CreateLinkPostParams, PostType::Link);
post_variant!(CreateChatPostParams, PostType::Chat);
post_variant!(CreateAudioPostParams, PostType::Audio);
post_variant!(CreateVideoPostParams, PostType::Video);

/// Any post-creation shape, for the generic create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NewPost {
    Text(CreateTextPostParams),
    Photo(CreatePhotoPostParams),
    Quote(CreateQuotePostParams),
    Link(CreateLinkPostParams),
    Chat(CreateChatPostParams),
    Audio(CreateAudioPostParams),
    Video(CreateVideoPostParams),
}

impl NewPost {
    pub fn post_type(&self) -> PostType {
        match self {
            NewPost::Text(_) => PostType::Text,
            NewPost::Photo(_) => PostType::Photo,
            NewPost::Quote(_) => PostType::Quote,
            NewPost::Link(_) => PostType::Link,
            NewPost::Chat(_) => PostType::Chat,
            NewPost::Audio(_) => PostType::Audio,
            NewPost::Video(_) => PostType::Video,
        }
    }
}

macro_rules! new_post_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for NewPost {
            fn from(params: $ty) -> Self {
                NewPost::$variant(params)
            }
        }
    };
}

new_post_from!(Text, CreateTextPostParams);
new_post_from!(Photo, CreatePhotoPostParams);
new_post_from!(Quote, CreateQuotePostParams);
new_post_from!(Link, CreateLinkPostParams);
new_post_from!(Chat, CreateChatPostParams);
new_post_from!(Audio, CreateAudioPostParams);
new_post_from!(Video, CreateVideoPostParams);

/// Edit an existing post. Only the fields present are changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPostParams {
    pub id: u64,
    #[serde(flatten)]
    pub envelope: PostEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl EditPostParams {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            envelope: PostEnvelope::default(),
            title: None,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePostParams {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReblogPostParams {
    pub id: u64,
    pub reblog_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Follow or unfollow target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowParams {
    pub url: String,
}

/// Like or unlike target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeParams {
    pub id: u64,
    pub reblog_key: String,
}

/// Query parameters for a blog's post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblog_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_info: Option<bool>,
    /// `text` or `raw`; HTML is returned when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl BlogPostsParams {
    /// Flatten into query-string pairs, skipping absent fields.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.id {
            query.push(("id".to_string(), id.to_string()));
        }
        if let Some(tag) = &self.tag {
            query.push(("tag".to_string(), tag.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(reblog_info) = self.reblog_info {
            query.push(("reblog_info".to_string(), reblog_info.to_string()));
        }
        if let Some(notes_info) = self.notes_info {
            query.push(("notes_info".to_string(), notes_info.to_string()));
        }
        if let Some(filter) = &self.filter {
            query.push(("filter".to_string(), filter.clone()));
        }
        query
    }
}
