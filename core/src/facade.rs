//! Blog-scoped facade over a `RemoteClient`.
//!
//! # Design
//! `BlogFacade` binds one blog identifier to one adapter for its whole
//! lifetime and holds nothing else. Every operation hands back a cold
//! `Single`: the adapter is not called until the caller polls, and each poll
//! of a fresh `Single` is a fresh call. Relays return adapter errors as-is.
//! `blog_post` is the one place an error becomes a value, and placeholder
//! operations fail with `NotImplemented` before touching the adapter.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{HttpRemoteClient, RemoteClient};
use crate::config::{ClientConfig, Credentials};
use crate::error::{ConstructionError, NotImplemented};
use crate::params::{
    BlogPostsParams, CreateAudioPostParams, CreateChatPostParams, CreateLinkPostParams,
    CreatePhotoPostParams, CreateQuotePostParams, CreateTextPostParams, CreateVideoPostParams,
    DeletePostParams, EditPostParams, FollowParams, LikeParams, NewPost, QueryParams,
    ReblogPostParams,
};
use crate::single::Single;
use crate::types::{BlogAvatar, BlogInfo, BlogPosts, Post, PostId, PostKind};

/// Every operation on the facade's public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BlogInfo,
    BlogAvatar,
    BlogLikes,
    BlogFollowers,
    BlogPosts,
    BlogPost,
    BlogQueue,
    BlogDrafts,
    BlogSubmissions,
    UserInfo,
    UserDashboard,
    UserFollowing,
    UserLikes,
    TaggedPosts,
    CreatePost,
    EditPost,
    ReblogPost,
    DeletePost,
    FollowBlog,
    UnfollowBlog,
    LikePost,
    UnlikePost,
    CreateTextPost,
    CreatePhotoPost,
    CreateQuotePost,
    CreateLinkPost,
    CreateChatPost,
    CreateAudioPost,
    CreateVideoPost,
}

impl Operation {
    pub const ALL: [Operation; 29] = [
        Operation::BlogInfo,
        Operation::BlogAvatar,
        Operation::BlogLikes,
        Operation::BlogFollowers,
        Operation::BlogPosts,
        Operation::BlogPost,
        Operation::BlogQueue,
        Operation::BlogDrafts,
        Operation::BlogSubmissions,
        Operation::UserInfo,
        Operation::UserDashboard,
        Operation::UserFollowing,
        Operation::UserLikes,
        Operation::TaggedPosts,
        Operation::CreatePost,
        Operation::EditPost,
        Operation::ReblogPost,
        Operation::DeletePost,
        Operation::FollowBlog,
        Operation::UnfollowBlog,
        Operation::LikePost,
        Operation::UnlikePost,
        Operation::CreateTextPost,
        Operation::CreatePhotoPost,
        Operation::CreateQuotePost,
        Operation::CreateLinkPost,
        Operation::CreateChatPost,
        Operation::CreateAudioPost,
        Operation::CreateVideoPost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::BlogInfo => "blog_info",
            Operation::BlogAvatar => "blog_avatar",
            Operation::BlogLikes => "blog_likes",
            Operation::BlogFollowers => "blog_followers",
            Operation::BlogPosts => "blog_posts",
            Operation::BlogPost => "blog_post",
            Operation::BlogQueue => "blog_queue",
            Operation::BlogDrafts => "blog_drafts",
            Operation::BlogSubmissions => "blog_submissions",
            Operation::UserInfo => "user_info",
            Operation::UserDashboard => "user_dashboard",
            Operation::UserFollowing => "user_following",
            Operation::UserLikes => "user_likes",
            Operation::TaggedPosts => "tagged_posts",
            Operation::CreatePost => "create_post",
            Operation::EditPost => "edit_post",
            Operation::ReblogPost => "reblog_post",
            Operation::DeletePost => "delete_post",
            Operation::FollowBlog => "follow_blog",
            Operation::UnfollowBlog => "unfollow_blog",
            Operation::LikePost => "like_post",
            Operation::UnlikePost => "unlike_post",
            Operation::CreateTextPost => "create_text_post",
            Operation::CreatePhotoPost => "create_photo_post",
            Operation::CreateQuotePost => "create_quote_post",
            Operation::CreateLinkPost => "create_link_post",
            Operation::CreateChatPost => "create_chat_post",
            Operation::CreateAudioPost => "create_audio_post",
            Operation::CreateVideoPost => "create_video_post",
        }
    }

    /// Whether the facade backs this operation with a remote call.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            Operation::BlogInfo
                | Operation::BlogAvatar
                | Operation::BlogPosts
                | Operation::BlogPost
                | Operation::EditPost
                | Operation::DeletePost
                | Operation::CreateTextPost
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a placeholder operation.
pub type Unsupported = Result<Single<Value>, NotImplemented>;

/// One blog's view of the remote API.
#[derive(Clone)]
pub struct BlogFacade {
    blog: Arc<str>,
    client: Arc<dyn RemoteClient>,
}

impl BlogFacade {
    /// Bind `blog_identifier` to an HTTP adapter against the public API.
    pub fn new(
        blog_identifier: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, ConstructionError> {
        Self::with_config(blog_identifier, credentials, ClientConfig::default())
    }

    pub fn with_config(
        blog_identifier: impl Into<String>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self, ConstructionError> {
        let client = HttpRemoteClient::new(&credentials, &config)?;
        Self::with_client(blog_identifier, Arc::new(client))
    }

    /// Bind `blog_identifier` to an existing adapter.
    pub fn with_client(
        blog_identifier: impl Into<String>,
        client: Arc<dyn RemoteClient>,
    ) -> Result<Self, ConstructionError> {
        let blog = blog_identifier.into();
        if blog.trim().is_empty() {
            return Err(ConstructionError::InvalidBlogIdentifier(blog));
        }
        debug!(blog = %blog, "blog facade bound");
        Ok(Self {
            blog: Arc::from(blog),
            client,
        })
    }

    pub fn blog_identifier(&self) -> &str {
        &self.blog
    }

    fn bind(&self) -> (Arc<dyn RemoteClient>, Arc<str>) {
        (self.client.clone(), self.blog.clone())
    }

    // Relays

    pub fn blog_info(&self, params: QueryParams) -> Single<BlogInfo> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, "blog_info");
            client.blog_info(&blog, &params).await
        })
    }

    pub fn blog_avatar(&self, size: Option<u32>, params: QueryParams) -> Single<BlogAvatar> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, ?size, "blog_avatar");
            client.blog_avatar(&blog, size, &params).await
        })
    }

    /// Listing filtered by any response-side post type, `answer` included.
    pub fn blog_posts(
        &self,
        post_type: Option<PostKind>,
        params: BlogPostsParams,
    ) -> Single<BlogPosts> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, ?post_type, "blog_posts");
            client.blog_posts(&blog, post_type.as_ref(), &params).await
        })
    }

    pub fn edit_post(&self, params: EditPostParams) -> Single<PostId> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, id = params.id, "edit_post");
            client.edit_post(&blog, &params).await
        })
    }

    pub fn delete_post(&self, params: DeletePostParams) -> Single<PostId> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, id = params.id, "delete_post");
            client.delete_post(&blog, &params).await
        })
    }

    pub fn create_text_post(&self, params: CreateTextPostParams) -> Single<PostId> {
        let (client, blog) = self.bind();
        Single::new(async move {
            debug!(blog = %blog, state = ?params.envelope.state, "create_text_post");
            client.create_text_post(&blog, &params).await
        })
    }

    // Derived

    /// First post of the filtered listing, or `None`.
    ///
    /// Any failure of the underlying listing, including transport and auth
    /// failures, is reported as `None`.
    pub fn blog_post(
        &self,
        post_type: Option<PostKind>,
        params: BlogPostsParams,
    ) -> Single<Option<Post>, Infallible> {
        self.blog_posts(post_type, params)
            .map(|listing| listing.posts.into_iter().next())
            .recover(|err| {
                debug!(error = %err, "blog_post listing failed, reporting no post");
                None
            })
    }

    // Placeholders

    pub fn blog_likes(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::BlogLikes)
    }

    pub fn blog_followers(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::BlogFollowers)
    }

    pub fn blog_queue(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::BlogQueue)
    }

    pub fn blog_drafts(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::BlogDrafts)
    }

    pub fn blog_submissions(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::BlogSubmissions)
    }

    pub fn user_info(&self) -> Unsupported {
        not_implemented(Operation::UserInfo)
    }

    pub fn user_dashboard(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::UserDashboard)
    }

    pub fn user_following(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::UserFollowing)
    }

    pub fn user_likes(&self, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::UserLikes)
    }

    pub fn tagged_posts(&self, _tag: &str, _params: QueryParams) -> Unsupported {
        not_implemented(Operation::TaggedPosts)
    }

    pub fn create_post(&self, _params: NewPost) -> Unsupported {
        not_implemented(Operation::CreatePost)
    }

    pub fn reblog_post(&self, _params: ReblogPostParams) -> Unsupported {
        not_implemented(Operation::ReblogPost)
    }

    pub fn follow_blog(&self, _params: FollowParams) -> Unsupported {
        not_implemented(Operation::FollowBlog)
    }

    pub fn unfollow_blog(&self, _params: FollowParams) -> Unsupported {
        not_implemented(Operation::UnfollowBlog)
    }

    pub fn like_post(&self, _params: LikeParams) -> Unsupported {
        not_implemented(Operation::LikePost)
    }

    pub fn unlike_post(&self, _params: LikeParams) -> Unsupported {
        not_implemented(Operation::UnlikePost)
    }

    pub fn create_photo_post(&self, _params: CreatePhotoPostParams) -> Unsupported {
        not_implemented(Operation::CreatePhotoPost)
    }

    pub fn create_quote_post(&self, _params: CreateQuotePostParams) -> Unsupported {
        not_implemented(Operation::CreateQuotePost)
    }

    pub fn create_link_post(&self, _params: CreateLinkPostParams) -> Unsupported {
        not_implemented(Operation::CreateLinkPost)
    }

    pub fn create_chat_post(&self, _params: CreateChatPostParams) -> Unsupported {
        not_implemented(Operation::CreateChatPost)
    }

    pub fn create_audio_post(&self, _params: CreateAudioPostParams) -> Unsupported {
        not_implemented(Operation::CreateAudioPost)
    }

    pub fn create_video_post(&self, _params: CreateVideoPostParams) -> Unsupported {
        not_implemented(Operation::CreateVideoPost)
    }
}

impl fmt::Debug for BlogFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogFacade")
            .field("blog", &self.blog)
            .finish_non_exhaustive()
    }
}

fn not_implemented(operation: Operation) -> Unsupported {
    warn!(%operation, "operation is not implemented");
    Err(NotImplemented { operation })
}
