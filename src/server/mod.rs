//! JSON API over the blog queries

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::blog::{Blog, PostPage, ScoredPost};
use crate::content::{table_of_contents, Post, TocEntry};
use crate::query::{self, PostFilter, QueryError};
use crate::Folio;

/// Server state
struct ServerState {
    blog: Blog,
    blog_root: String,
    per_page: usize,
    recent_posts: usize,
    related_posts: usize,
}

/// Errors returned to API clients as `{"error": ...}`
#[derive(Debug, Error)]
enum ApiError {
    #[error("post not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    BadRequest(#[from] QueryError),
    #[error("{0}")]
    Internal(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<QueryError>() {
            Ok(query_err) => ApiError::BadRequest(query_err),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// A post with the fields a detail page needs
#[derive(Debug, Serialize)]
struct PostDetail {
    #[serde(flatten)]
    post: Post,
    permalink: String,
    toc: Vec<TocEntry>,
    /// Slug of the next newer post
    newer: Option<String>,
    /// Slug of the next older post
    older: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    category: Option<String>,
    tag: Option<String>,
    per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CountQuery {
    limit: Option<usize>,
}

/// Run a blocking query off the async workers
async fn blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Build the API router
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(ServerState {
        blog: folio.blog(),
        blog_root: folio.config.blog_root.clone(),
        per_page: folio.config.per_page,
        recent_posts: folio.config.recent_posts,
        related_posts: folio.config.related_posts,
    });

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/pages/:page", get(page_of_posts))
        .route("/api/post/*key", get(get_post))
        .route("/api/related/*key", get(related_posts))
        .route("/api/categories", get(categories))
        .route("/api/tags", get(tags))
        .route("/api/recent", get(recent_posts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {:?} at http://{}:{}/api/posts", folio.content_dir, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(filter): Query<PostFilter>,
) -> ApiResult<Vec<Post>> {
    let blog = state.blog.clone();
    blocking(move || blog.filtered(&filter)).await.map(Json)
}

async fn page_of_posts(
    State(state): State<Arc<ServerState>>,
    Path(page): Path<usize>,
    Query(params): Query<PageQuery>,
) -> ApiResult<PostPage> {
    let blog = state.blog.clone();
    let per_page = params.per_page.unwrap_or(state.per_page);
    let filter = PostFilter {
        category: params.category,
        tag: params.tag,
        ..Default::default()
    };
    blocking(move || blog.page(&filter, page, per_page))
        .await
        .map(Json)
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
) -> ApiResult<PostDetail> {
    let blog = state.blog.clone();
    let key = key.trim_matches('/').to_string();
    let lookup = key.clone();
    let found = blocking(move || {
        let posts = blog.all_posts()?;
        Ok(query::find_by_key(&posts, &lookup).map(|post| {
            (
                post.clone(),
                post.prev(&posts).map(|p| p.slug.clone()),
                post.next(&posts).map(|p| p.slug.clone()),
            )
        }))
    })
    .await?;

    let (post, newer, older) = found.ok_or(ApiError::NotFound(key))?;
    Ok(Json(PostDetail {
        permalink: post.permalink(&state.blog_root),
        toc: table_of_contents(&post.content),
        post,
        newer,
        older,
    }))
}

async fn related_posts(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
    Query(params): Query<CountQuery>,
) -> ApiResult<Vec<ScoredPost>> {
    let blog = state.blog.clone();
    let key = key.trim_matches('/').to_string();
    let max = params.limit.unwrap_or(state.related_posts);
    let lookup = key.clone();
    let related = blocking(move || match blog.get(&lookup)? {
        Some(post) => blog.related_scored(&post, max).map(Some),
        None => Ok(None),
    })
    .await?;

    related.map(Json).ok_or(ApiError::NotFound(key))
}

async fn categories(State(state): State<Arc<ServerState>>) -> ApiResult<Vec<String>> {
    let blog = state.blog.clone();
    blocking(move || blog.categories()).await.map(Json)
}

async fn tags(State(state): State<Arc<ServerState>>) -> ApiResult<Vec<String>> {
    let blog = state.blog.clone();
    blocking(move || blog.tags()).await.map(Json)
}

async fn recent_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<CountQuery>,
) -> ApiResult<Vec<Post>> {
    let blog = state.blog.clone();
    let count = params.limit.unwrap_or(state.recent_posts);
    blocking(move || blog.recent(count)).await.map(Json)
}
