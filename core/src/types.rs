//! Response contracts for the v2 blog API.
//!
//! # Design
//! Payloads are relayed, not validated. Documented fields are typed and
//! defaulted when absent; everything else lands in a flattened `extra` map
//! so nothing the service sends is dropped on the way through.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the blog info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogInfo {
    pub blog: Blog,
}

/// Blog metadata snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub name: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub posts: u64,
    pub total_posts: u64,
    pub followers: u64,
    pub likes: u64,
    pub drafts: u64,
    pub queue: u64,
    pub messages: u64,
    /// Seconds since the epoch of the last update.
    pub updated: u64,
    pub admin: bool,
    pub ask: bool,
    pub ask_anon: bool,
    pub can_submit: bool,
    pub followed: bool,
    pub is_nsfw: bool,
    pub primary: bool,
    #[serde(rename = "type")]
    pub blog_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the avatar endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAvatar {
    pub avatar_url: String,
}

/// Type of a published post. Includes `answer`, which cannot be created
/// through this API. Types the service adds later arrive as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Quote,
    Link,
    Answer,
    Video,
    Audio,
    Photo,
    Chat,
    #[serde(untagged)]
    Other(String),
}

impl PostKind {
    /// Wire name, also used as the listing path segment.
    pub fn as_str(&self) -> &str {
        match self {
            PostKind::Text => "text",
            PostKind::Quote => "quote",
            PostKind::Link => "link",
            PostKind::Answer => "answer",
            PostKind::Video => "video",
            PostKind::Audio => "audio",
            PostKind::Photo => "photo",
            PostKind::Chat => "chat",
            PostKind::Other(kind) => kind,
        }
    }
}

/// Lifecycle state reported for a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Queued,
    Draft,
    Private,
    #[serde(untagged)]
    Other(String),
}

/// A post as returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub blog_name: String,
    pub id: u64,
    pub post_url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reblog_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookmarklet: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PostStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the posts listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPosts {
    #[serde(default)]
    pub blog: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posts: Vec<Post>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<u64>,
}

/// Explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier returned by create, edit and delete.
///
/// The service sends `id` as a number (and sometimes a string twin in
/// `id_string`); it is kept as a string so large ids survive intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostId {
    pub id: String,
}

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            id: Option<Value>,
            #[serde(default)]
            id_string: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        if let Some(id) = raw.id_string {
            return Ok(PostId { id });
        }
        match raw.id {
            Some(Value::String(id)) => Ok(PostId { id }),
            Some(Value::Number(n)) => Ok(PostId { id: n.to_string() }),
            Some(other) => Err(de::Error::custom(format!("unexpected post id: {other}"))),
            None => Err(de::Error::missing_field("id")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_accepts_number_or_string() {
        let from_number: PostId = serde_json::from_str(r#"{"id":42}"#).unwrap();
        let from_string: PostId = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(from_number, PostId::new("42"));
        assert_eq!(from_string, PostId::new("42"));
    }

    #[test]
    fn post_id_prefers_id_string() {
        let id: PostId =
            serde_json::from_str(r#"{"id":1.2345678901234568e18,"id_string":"1234567890123456789"}"#)
                .unwrap();
        assert_eq!(id.id, "1234567890123456789");
    }

    #[test]
    fn post_id_requires_an_id() {
        let result: Result<PostId, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
        let result: Result<PostId, _> = serde_json::from_str(r#"{"id":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn blog_keeps_unknown_fields() {
        let info: BlogInfo = serde_json::from_str(
            r#"{"blog":{"name":"demo","title":"Demo","posts":3,"type":"public","theme":{"avatar_shape":"square"}}}"#,
        )
        .unwrap();
        assert_eq!(info.blog.name, "demo");
        assert_eq!(info.blog.posts, 3);
        assert_eq!(info.blog.blog_type, "public");
        assert_eq!(info.blog.extra["theme"]["avatar_shape"], "square");
        assert_eq!(info.blog.followers, 0);
    }

    #[test]
    fn post_parses_documented_fields() {
        let post: Post = serde_json::from_str(
            r#"{
                "blog_name": "demo",
                "id": 7,
                "post_url": "https://demo.tumblr.com/post/7",
                "type": "answer",
                "timestamp": 1700000000,
                "date": "2023-11-14 22:13:20 GMT",
                "format": "html",
                "reblog_key": "abc",
                "tags": ["a", "b"],
                "state": "queued",
                "note_count": 12
            }"#,
        )
        .unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.kind, Some(PostKind::Answer));
        assert_eq!(post.format.as_deref(), Some("html"));
        assert_eq!(post.state, Some(PostStatus::Queued));
        assert_eq!(post.tags, vec!["a", "b"]);
        assert!(!post.liked);
        assert_eq!(post.extra["note_count"], 12);
    }

    #[test]
    fn listing_keeps_posts_with_unfamiliar_values() {
        let listing: BlogPosts = serde_json::from_str(
            r#"{
                "posts": [
                    {"blog_name": "demo", "id": 1, "post_url": "u1", "type": "blocks"},
                    {"blog_name": "demo", "id": 2, "post_url": "u2", "state": "submission"},
                    {"blog_name": "demo", "id": 3, "post_url": "u3", "tags": null, "format": "rich"}
                ],
                "total_posts": 3
            }"#,
        )
        .unwrap();
        assert_eq!(listing.posts.len(), 3);
        assert_eq!(listing.posts[0].kind, Some(PostKind::Other("blocks".to_string())));
        assert_eq!(listing.posts[1].state, Some(PostStatus::Other("submission".to_string())));
        assert!(listing.posts[2].tags.is_empty());
        assert_eq!(listing.posts[2].format.as_deref(), Some("rich"));
    }

    #[test]
    fn unfamiliar_kind_serializes_back_verbatim() {
        let kind: PostKind = serde_json::from_str(r#""blocks""#).unwrap();
        assert_eq!(kind.as_str(), "blocks");
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""blocks""#);
        assert_eq!(serde_json::to_string(&PostKind::Answer).unwrap(), r#""answer""#);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let post: Post = serde_json::from_str(
            r#"{"blog_name":"demo","id":4,"post_url":"u","timestamp":null,"date":null,"liked":null,"type":null}"#,
        )
        .unwrap();
        assert_eq!(post.timestamp, 0);
        assert!(post.date.is_empty());
        assert!(!post.liked);
        assert_eq!(post.kind, None);

        let listing: BlogPosts = serde_json::from_str(r#"{"posts":null}"#).unwrap();
        assert!(listing.posts.is_empty());
    }

    #[test]
    fn blog_posts_defaults_to_empty_listing() {
        let posts: BlogPosts = serde_json::from_str(r#"{}"#).unwrap();
        assert!(posts.posts.is_empty());
        assert!(posts.blog.is_null());
    }
}
