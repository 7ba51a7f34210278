//! Facade behavior against an in-memory `RemoteClient`.
//!
//! # Design
//! `ScriptedClient` answers every endpoint from fixed results and counts how
//! often it is called, so each test can check both what the facade emits and
//! whether the adapter was touched at all.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use futures::StreamExt;
use serde_json::json;
use tumblr_core::{
    Blog, BlogAvatar, BlogFacade, BlogInfo, BlogPosts, BlogPostsParams, ConstructionError,
    CreateAudioPostParams, CreateChatPostParams, CreateLinkPostParams, CreatePhotoPostParams,
    CreateQuotePostParams, CreateTextPostParams, CreateVideoPostParams, DeletePostParams,
    EditPostParams, FollowParams, LikeParams, NewPost, Operation, Post, PostEnvelope, PostId,
    PostKind, QueryParams, ReblogPostParams, RemoteClient, RemoteError, Unsupported,
};

struct ScriptedClient {
    calls: AtomicUsize,
    fail_with: Option<RemoteError>,
    posts: Vec<Post>,
    delay: Option<Duration>,
    /// One line per call describing the arguments the adapter received.
    seen: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn ok(posts: Vec<Post>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
            posts,
            delay: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, line: String) {
        self.seen.lock().unwrap().push(line);
    }

    fn failing(err: RemoteError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::ok(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, value: T) -> Result<T, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl RemoteClient for ScriptedClient {
    async fn blog_info(&self, blog: &str, params: &QueryParams) -> Result<BlogInfo, RemoteError> {
        self.record(format!("info {params:?}"));
        self.answer(BlogInfo {
            blog: Blog {
                name: blog.to_string(),
                title: "Scripted".to_string(),
                ..Blog::default()
            },
        })
        .await
    }

    async fn blog_avatar(
        &self,
        blog: &str,
        size: Option<u32>,
        params: &QueryParams,
    ) -> Result<BlogAvatar, RemoteError> {
        self.record(format!("avatar {size:?} {params:?}"));
        self.answer(BlogAvatar {
            avatar_url: format!("https://avatars.test/{blog}/{}", size.unwrap_or(64)),
        })
        .await
    }

    async fn blog_posts(
        &self,
        blog: &str,
        post_type: Option<&PostKind>,
        _params: &BlogPostsParams,
    ) -> Result<BlogPosts, RemoteError> {
        self.record(format!("posts {:?}", post_type.map(PostKind::as_str)));
        self.answer(BlogPosts {
            blog: json!({ "name": blog }),
            posts: self.posts.clone(),
            total_posts: Some(self.posts.len() as u64),
        })
        .await
    }

    async fn edit_post(&self, _blog: &str, params: &EditPostParams) -> Result<PostId, RemoteError> {
        self.answer(PostId::new(params.id.to_string())).await
    }

    async fn delete_post(&self, _blog: &str, params: &DeletePostParams) -> Result<PostId, RemoteError> {
        self.answer(PostId::new(params.id.to_string())).await
    }

    async fn create_text_post(
        &self,
        _blog: &str,
        params: &CreateTextPostParams,
    ) -> Result<PostId, RemoteError> {
        // Encode the body length so each call's answer is tied to its input.
        self.answer(PostId::new(format!("{}", 1000 + params.body.len())))
            .await
    }
}

fn post(id: u64) -> Post {
    serde_json::from_value(json!({
        "blog_name": "demo",
        "id": id,
        "post_url": format!("https://demo.tumblr.com/post/{id}"),
        "type": "text",
    }))
    .unwrap()
}

fn facade(client: Arc<ScriptedClient>) -> BlogFacade {
    BlogFacade::with_client("demo", client).unwrap()
}

// --- construction ---

#[test]
fn construction_rejects_blank_blog_identifier() {
    let err = BlogFacade::with_client("  ", Arc::new(ScriptedClient::ok(Vec::new()))).unwrap_err();
    assert!(matches!(err, ConstructionError::InvalidBlogIdentifier(_)));
}

#[test]
fn construction_binds_identifier_without_calling_adapter() {
    let client = Arc::new(ScriptedClient::ok(Vec::new()));
    let facade = facade(client.clone());
    assert_eq!(facade.blog_identifier(), "demo");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn identical_facades_emit_identical_payloads() {
    let a = facade(Arc::new(ScriptedClient::ok(vec![post(1)])));
    let b = facade(Arc::new(ScriptedClient::ok(vec![post(1)])));
    let params = BlogPostsParams {
        limit: Some(1),
        ..BlogPostsParams::default()
    };
    assert_eq!(
        a.blog_posts(None, params.clone()).await,
        b.blog_posts(None, params).await
    );
}

// --- relays ---

#[tokio::test]
async fn relays_emit_exactly_the_adapter_payload() {
    let client = Arc::new(ScriptedClient::ok(vec![post(1), post(2)]));
    let facade = facade(client.clone());

    let items: Vec<_> = facade.blog_info(QueryParams::new()).collect().await;
    assert_eq!(items.len(), 1);
    let info = items.into_iter().next().unwrap().unwrap();
    assert_eq!(info.blog.name, "demo");
    assert_eq!(info.blog.title, "Scripted");

    let items: Vec<_> = facade.blog_avatar(Some(128), QueryParams::new()).collect().await;
    assert_eq!(
        items,
        vec![Ok(BlogAvatar {
            avatar_url: "https://avatars.test/demo/128".to_string()
        })]
    );

    let items: Vec<_> = facade
        .blog_posts(Some(PostKind::Text), BlogPostsParams::default())
        .collect()
        .await;
    assert_eq!(items.len(), 1);
    let listing = items.into_iter().next().unwrap().unwrap();
    assert_eq!(listing.posts, vec![post(1), post(2)]);

    let items: Vec<_> = facade.delete_post(DeletePostParams { id: 9 }).collect().await;
    assert_eq!(items, vec![Ok(PostId::new("9"))]);

    let items: Vec<_> = facade
        .create_text_post(CreateTextPostParams::new("hello"))
        .collect()
        .await;
    assert_eq!(items, vec![Ok(PostId::new("1005"))]);

    assert_eq!(client.calls(), 5);
}

#[tokio::test]
async fn relays_forward_optional_parameters() {
    let client = Arc::new(ScriptedClient::ok(Vec::new()));
    let facade = facade(client.clone());
    let params = QueryParams::from([("fields".to_string(), "name".to_string())]);

    facade.blog_info(params.clone()).await.unwrap();
    facade.blog_avatar(Some(96), params).await.unwrap();
    facade
        .blog_posts(Some(PostKind::Answer), BlogPostsParams::default())
        .await
        .unwrap();

    assert_eq!(
        client.seen(),
        vec![
            r#"info {"fields": "name"}"#.to_string(),
            r#"avatar Some(96) {"fields": "name"}"#.to_string(),
            r#"posts Some("answer")"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn edit_post_pairs_input_and_output() {
    let facade = facade(Arc::new(ScriptedClient::ok(Vec::new())));
    let mut stream = facade.edit_post(EditPostParams::new(42).with_body("x"));
    assert_eq!(stream.next().await, Some(Ok(PostId::new("42"))));
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn relays_propagate_adapter_errors_verbatim() {
    let err = RemoteError::Status {
        status: 503,
        message: "maintenance".to_string(),
    };
    let client = Arc::new(ScriptedClient::failing(err.clone()));
    let facade = facade(client.clone());

    assert_eq!(facade.blog_info(QueryParams::new()).await.unwrap_err(), err);
    assert_eq!(facade.blog_avatar(None, QueryParams::new()).await.unwrap_err(), err);
    assert_eq!(
        facade
            .blog_posts(None, BlogPostsParams::default())
            .await
            .unwrap_err(),
        err
    );
    assert_eq!(facade.edit_post(EditPostParams::new(1)).await.unwrap_err(), err);
    assert_eq!(facade.delete_post(DeletePostParams { id: 1 }).await.unwrap_err(), err);
    assert_eq!(
        facade
            .create_text_post(CreateTextPostParams::new("x"))
            .await
            .unwrap_err(),
        err
    );

    let items: Vec<_> = facade.blog_info(QueryParams::new()).collect().await;
    assert_eq!(items, vec![Err(err)]);
}

#[tokio::test]
async fn relays_are_cold_and_each_subscription_calls_again() {
    let client = Arc::new(ScriptedClient::ok(Vec::new()));
    let facade = facade(client.clone());

    let first = facade.blog_info(QueryParams::new());
    let second = facade.blog_info(QueryParams::new());
    assert_eq!(client.calls(), 0);

    first.await.unwrap();
    assert_eq!(client.calls(), 1);
    second.await.unwrap();
    assert_eq!(client.calls(), 2);

    drop(facade.blog_avatar(None, QueryParams::new()));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn concurrent_calls_stay_correlated() {
    let client = Arc::new(ScriptedClient {
        delay: Some(Duration::from_millis(5)),
        ..ScriptedClient::ok(Vec::new())
    });
    let facade = facade(client.clone());

    let edits = (0..32u64).map(|id| facade.edit_post(EditPostParams::new(id)));
    let results = join_all(edits).await;

    assert_eq!(client.calls(), 32);
    for (id, result) in results.into_iter().enumerate() {
        assert_eq!(result, Ok(PostId::new(id.to_string())));
    }
}

#[tokio::test]
async fn cancelled_call_delivers_nothing() {
    let client = Arc::new(ScriptedClient {
        delay: Some(Duration::from_secs(60)),
        ..ScriptedClient::ok(Vec::new())
    });
    let facade = facade(client.clone());

    let outcome = tokio::time::timeout(Duration::from_millis(20), facade.blog_info(QueryParams::new())).await;
    assert!(outcome.is_err(), "call should still be pending");
    // The adapter was reached; only local delivery was abandoned.
    assert_eq!(client.calls(), 1);
}

// --- derived ---

#[tokio::test]
async fn blog_post_emits_first_of_listing() {
    let facade = facade(Arc::new(ScriptedClient::ok(vec![post(1), post(2)])));
    let first = facade
        .blog_post(Some(PostKind::Text), BlogPostsParams::default())
        .value()
        .await;
    assert_eq!(first, Some(post(1)));
}

#[tokio::test]
async fn blog_post_can_filter_for_answers() {
    let client = Arc::new(ScriptedClient::ok(vec![post(3)]));
    let facade = facade(client.clone());
    let first = facade
        .blog_post(Some(PostKind::Answer), BlogPostsParams::default())
        .value()
        .await;
    assert_eq!(first, Some(post(3)));
    assert_eq!(client.seen(), vec![r#"posts Some("answer")"#.to_string()]);
}

#[tokio::test]
async fn blog_post_on_empty_listing_is_none() {
    let facade = facade(Arc::new(ScriptedClient::ok(Vec::new())));
    let items: Vec<_> = facade
        .blog_post(None, BlogPostsParams::default())
        .collect()
        .await;
    assert_eq!(items, vec![Ok(None)]);
}

#[tokio::test]
async fn blog_post_turns_failure_into_none() {
    for err in [
        RemoteError::NotFound("Not Found".to_string()),
        RemoteError::Unauthorized("bad key".to_string()),
        RemoteError::Transport("connection refused".to_string()),
    ] {
        let facade = facade(Arc::new(ScriptedClient::failing(err)));
        let first = facade.blog_post(None, BlogPostsParams::default()).value().await;
        assert_eq!(first, None);
    }
}

// --- placeholders ---

fn invoke_placeholder(facade: &BlogFacade, operation: Operation) -> Option<Unsupported> {
    let result = match operation {
        Operation::BlogLikes => facade.blog_likes(QueryParams::new()),
        Operation::BlogFollowers => facade.blog_followers(QueryParams::new()),
        Operation::BlogQueue => facade.blog_queue(QueryParams::new()),
        Operation::BlogDrafts => facade.blog_drafts(QueryParams::new()),
        Operation::BlogSubmissions => facade.blog_submissions(QueryParams::new()),
        Operation::UserInfo => facade.user_info(),
        Operation::UserDashboard => facade.user_dashboard(QueryParams::new()),
        Operation::UserFollowing => facade.user_following(QueryParams::new()),
        Operation::UserLikes => facade.user_likes(QueryParams::new()),
        Operation::TaggedPosts => facade.tagged_posts("rust", QueryParams::new()),
        Operation::CreatePost => facade.create_post(NewPost::from(CreateTextPostParams::new("x"))),
        Operation::ReblogPost => facade.reblog_post(ReblogPostParams {
            id: 1,
            reblog_key: "k".to_string(),
            comment: None,
        }),
        Operation::FollowBlog => facade.follow_blog(FollowParams {
            url: "staff.tumblr.com".to_string(),
        }),
        Operation::UnfollowBlog => facade.unfollow_blog(FollowParams {
            url: "staff.tumblr.com".to_string(),
        }),
        Operation::LikePost => facade.like_post(LikeParams {
            id: 1,
            reblog_key: "k".to_string(),
        }),
        Operation::UnlikePost => facade.unlike_post(LikeParams {
            id: 1,
            reblog_key: "k".to_string(),
        }),
        Operation::CreatePhotoPost => facade.create_photo_post(CreatePhotoPostParams::default()),
        Operation::CreateQuotePost => facade.create_quote_post(CreateQuotePostParams {
            envelope: PostEnvelope::default(),
            quote: "q".to_string(),
            source: None,
        }),
        Operation::CreateLinkPost => facade.create_link_post(CreateLinkPostParams {
            envelope: PostEnvelope::default(),
            title: None,
            url: "https://example.com".to_string(),
            thumbnail: None,
            excerpt: None,
            author: None,
            description: None,
        }),
        Operation::CreateChatPost => facade.create_chat_post(CreateChatPostParams {
            envelope: PostEnvelope::default(),
            title: None,
            conversation: "a: hi".to_string(),
        }),
        Operation::CreateAudioPost => facade.create_audio_post(CreateAudioPostParams::default()),
        Operation::CreateVideoPost => facade.create_video_post(CreateVideoPostParams::default()),
        _ => return None,
    };
    Some(result)
}

#[test]
fn placeholders_fail_without_touching_adapter() {
    let client = Arc::new(ScriptedClient::ok(vec![post(1)]));
    let facade = facade(client.clone());

    let mut checked = 0;
    for operation in Operation::ALL {
        let Some(result) = invoke_placeholder(&facade, operation) else {
            assert!(operation.is_implemented(), "{operation} has no invocation");
            continue;
        };
        assert!(!operation.is_implemented(), "{operation} should be a placeholder");
        let err = result.unwrap_err();
        assert_eq!(err.operation, operation);
        checked += 1;
    }

    assert_eq!(checked, 22);
    assert_eq!(client.calls(), 0);
}

#[test]
fn placeholder_error_is_distinct_from_remote_error() {
    let facade = facade(Arc::new(ScriptedClient::ok(Vec::new())));
    let err: tumblr_core::Error = facade.user_info().unwrap_err().into();
    assert!(matches!(err, tumblr_core::Error::NotImplemented(_)));

    let mut extra = BTreeMap::new();
    extra.insert("limit".to_string(), "5".to_string());
    assert!(facade.blog_likes(extra).is_err());
}
