use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Key every read must carry as `api_key`.
pub const API_KEY: &str = "mock-api-key";
/// Bearer token every write must carry.
pub const ACCESS_TOKEN: &str = "mock-access-token";
/// Blog seeded into every fresh store.
pub const DEMO_BLOG: &str = "demo.tumblr.com";

const AVATAR_SIZES: [u32; 9] = [16, 24, 30, 40, 48, 64, 96, 128, 512];
const MAX_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockPost {
    pub blog_name: String,
    pub id: u64,
    pub id_string: String,
    pub post_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: i64,
    pub date: String,
    pub format: String,
    pub reblog_key: String,
    pub tags: Vec<String>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MockBlog {
    pub name: String,
    pub title: String,
    pub description: String,
    pub updated: i64,
    pub posts: Vec<MockPost>,
}

impl MockBlog {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: format!("{name} blog"),
            description: String::new(),
            updated: 0,
            posts: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Store {
    blogs: HashMap<String, MockBlog>,
    next_id: u64,
}

impl Store {
    fn seeded() -> Self {
        let mut blogs = HashMap::new();
        blogs.insert(DEMO_BLOG.to_string(), MockBlog::new("demo"));
        Self {
            blogs,
            next_id: 1000,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/v2/blog/{blog}/info", get(blog_info))
        .route("/v2/blog/{blog}/avatar", get(blog_avatar))
        .route("/v2/blog/{blog}/avatar/{size}", get(blog_avatar_sized))
        .route("/v2/blog/{blog}/posts", get(blog_posts))
        .route("/v2/blog/{blog}/posts/{kind}", get(blog_posts_typed))
        .route("/v2/blog/{blog}/post", post(create_post))
        .route("/v2/blog/{blog}/post/edit", post(edit_post))
        .route("/v2/blog/{blog}/post/delete", post(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error reply in the service's envelope shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let msg = self.status.canonical_reason().unwrap_or("Error");
        let body = json!({
            "meta": { "status": self.status.as_u16(), "msg": msg },
            "response": [],
            "errors": [{ "title": msg, "detail": self.detail }],
        });
        (self.status, Json(body)).into_response()
    }
}

fn envelope(status: StatusCode, response: Value) -> Response {
    let msg = status.canonical_reason().unwrap_or("OK");
    let body = json!({
        "meta": { "status": status.as_u16(), "msg": msg },
        "response": response,
    });
    (status, Json(body)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadQuery {
    pub api_key: Option<String>,
    pub id: Option<u64>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn require_api_key(query: &ReadQuery) -> Result<(), ApiFailure> {
    match query.api_key.as_deref() {
        Some(API_KEY) => Ok(()),
        _ => Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid api_key")),
    }
}

fn require_token(headers: &HeaderMap) -> Result<(), ApiFailure> {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid token")),
    }
}

fn blog_json(host: &str, blog: &MockBlog) -> Value {
    json!({
        "name": blog.name,
        "title": blog.title,
        "description": blog.description,
        "url": format!("https://{host}/"),
        "posts": blog.posts.len(),
        "total_posts": blog.posts.len(),
        "updated": blog.updated,
        "type": "public",
        "ask": false,
        "is_nsfw": false,
    })
}

async fn blog_info(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiFailure> {
    require_api_key(&query)?;
    let store = db.read().await;
    let record = store.blogs.get(&blog).ok_or_else(ApiFailure::not_found)?;
    Ok(envelope(StatusCode::OK, json!({ "blog": blog_json(&blog, record) })))
}

async fn blog_avatar(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiFailure> {
    avatar(db, blog, 64, query).await
}

async fn blog_avatar_sized(
    State(db): State<Db>,
    Path((blog, size)): Path<(String, u32)>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiFailure> {
    avatar(db, blog, size, query).await
}

async fn avatar(db: Db, blog: String, size: u32, query: ReadQuery) -> Result<Response, ApiFailure> {
    require_api_key(&query)?;
    if !AVATAR_SIZES.contains(&size) {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid avatar size"));
    }
    let store = db.read().await;
    let record = store.blogs.get(&blog).ok_or_else(ApiFailure::not_found)?;
    let url = format!("https://64.media.tumblr.com/avatar_{}_{size}.png", record.name);
    Ok(envelope(StatusCode::OK, json!({ "avatar_url": url })))
}

async fn blog_posts(
    State(db): State<Db>,
    Path(blog): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiFailure> {
    list_posts(db, blog, None, query).await
}

async fn blog_posts_typed(
    State(db): State<Db>,
    Path((blog, kind)): Path<(String, String)>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiFailure> {
    list_posts(db, blog, Some(kind), query).await
}

async fn list_posts(
    db: Db,
    blog: String,
    kind: Option<String>,
    query: ReadQuery,
) -> Result<Response, ApiFailure> {
    require_api_key(&query)?;
    let store = db.read().await;
    let record = store.blogs.get(&blog).ok_or_else(ApiFailure::not_found)?;

    let matching: Vec<&MockPost> = record
        .posts
        .iter()
        .rev()
        .filter(|p| kind.as_deref().is_none_or(|k| p.kind == k))
        .filter(|p| query.id.is_none_or(|id| p.id == id))
        .filter(|p| query.tag.as_deref().is_none_or(|t| p.tags.iter().any(|tag| tag == t)))
        .collect();
    let total = matching.len();
    let limit = query.limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT);
    let page: Vec<&MockPost> = matching
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(limit)
        .collect();

    Ok(envelope(
        StatusCode::OK,
        json!({
            "blog": blog_json(&blog, record),
            "posts": page,
            "total_posts": total,
        }),
    ))
}

fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Requested state as the service reports it back.
fn reported_state(state: Option<&str>) -> Result<String, ApiFailure> {
    match state.unwrap_or("published") {
        "published" => Ok("published".to_string()),
        "draft" => Ok("draft".to_string()),
        "queue" => Ok("queued".to_string()),
        "private" => Ok("private".to_string()),
        other => Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid state: {other}"),
        )),
    }
}

fn string_field(input: &Value, name: &str) -> Option<String> {
    input.get(name).and_then(Value::as_str).map(String::from)
}

fn required_field(input: &Value, name: &str) -> Result<String, ApiFailure> {
    string_field(input, name)
        .ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, format!("Missing {name}")))
}

async fn create_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Result<Response, ApiFailure> {
    require_token(&headers)?;

    let kind = string_field(&input, "type").unwrap_or_else(|| "text".to_string());
    let mut post = MockPost {
        blog_name: String::new(),
        id: 0,
        id_string: String::new(),
        post_url: String::new(),
        kind: kind.clone(),
        timestamp: 0,
        date: String::new(),
        format: string_field(&input, "format").unwrap_or_else(|| "html".to_string()),
        reblog_key: Uuid::new_v4().simple().to_string()[..8].to_string(),
        tags: split_tags(input.get("tags").and_then(Value::as_str)),
        state: reported_state(input.get("state").and_then(Value::as_str))?,
        slug: string_field(&input, "slug"),
        title: string_field(&input, "title"),
        body: None,
        quote: None,
        source: string_field(&input, "source"),
        url: None,
        conversation: None,
    };
    match kind.as_str() {
        "text" => post.body = Some(required_field(&input, "body")?),
        "quote" => post.quote = Some(required_field(&input, "quote")?),
        "link" => post.url = Some(required_field(&input, "url")?),
        "chat" => post.conversation = Some(required_field(&input, "conversation")?),
        other => {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                format!("Unsupported post type: {other}"),
            ))
        }
    }

    let mut store = db.write().await;
    let id = store.next_id;
    let record = store.blogs.get_mut(&blog).ok_or_else(ApiFailure::not_found)?;
    let now = Utc::now();
    post.blog_name = record.name.clone();
    post.id = id;
    post.id_string = id.to_string();
    post.post_url = format!("https://{blog}/post/{id}");
    post.timestamp = now.timestamp();
    post.date = now.format("%Y-%m-%d %H:%M:%S GMT").to_string();
    record.updated = post.timestamp;
    record.posts.push(post);
    store.next_id += 1;

    Ok(envelope(
        StatusCode::CREATED,
        json!({ "id": id, "id_string": id.to_string() }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct EditPost {
    pub id: u64,
    pub state: Option<String>,
    pub tags: Option<String>,
    pub format: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

async fn edit_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    headers: HeaderMap,
    Json(input): Json<EditPost>,
) -> Result<Response, ApiFailure> {
    require_token(&headers)?;
    let mut store = db.write().await;
    let record = store.blogs.get_mut(&blog).ok_or_else(ApiFailure::not_found)?;
    let post = record
        .posts
        .iter_mut()
        .find(|p| p.id == input.id)
        .ok_or_else(ApiFailure::not_found)?;

    if input.state.is_some() {
        post.state = reported_state(input.state.as_deref())?;
    }
    if input.tags.is_some() {
        post.tags = split_tags(input.tags.as_deref());
    }
    if let Some(format) = input.format {
        post.format = format;
    }
    if let Some(slug) = input.slug {
        post.slug = Some(slug);
    }
    if let Some(title) = input.title {
        post.title = Some(title);
    }
    if let Some(body) = input.body {
        post.body = Some(body);
    }

    Ok(envelope(StatusCode::OK, json!({ "id": input.id })))
}

#[derive(Debug, Deserialize)]
pub struct DeletePost {
    pub id: u64,
}

async fn delete_post(
    State(db): State<Db>,
    Path(blog): Path<String>,
    headers: HeaderMap,
    Json(input): Json<DeletePost>,
) -> Result<Response, ApiFailure> {
    require_token(&headers)?;
    let mut store = db.write().await;
    let record = store.blogs.get_mut(&blog).ok_or_else(ApiFailure::not_found)?;
    let before = record.posts.len();
    record.posts.retain(|p| p.id != input.id);
    if record.posts.len() == before {
        return Err(ApiFailure::not_found());
    }
    Ok(envelope(StatusCode::OK, json!({ "id": input.id })))
}
