//! HTTP API server
//!
//! A thin axum layer over the post service and the item store. Handlers do
//! no business logic of their own; they translate between HTTP and the core
//! operations and map errors to statuses.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::content::{Category, Post, PostResponse, Tag};
use crate::error::PostError;
use crate::items::{CreateItem, Item, ItemError, ItemStore};
use crate::query::PostService;
use crate::Blog;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub items: Arc<ItemStore>,
}

/// Start the API server
pub async fn start(blog: &Blog) -> Result<()> {
    let state = AppState {
        posts: Arc::new(blog.post_service()),
        items: Arc::new(ItemStore::new()),
    };

    let app = router(state);

    let addr = format!("{}:{}", blog.config.ip, blog.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("Server running at http://{}", addr);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/post", get(get_posts))
        .route("/api/post/ids", get(get_post_ids))
        .route("/api/post/categories", get(get_category_list))
        .route("/api/post/tags", get(get_tag_list))
        .route("/api/post/related/:id", get(get_related_posts))
        .route("/api/post/img/:id/:file", get(get_post_image))
        .route("/api/post/:id", get(get_post_by_id))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/:id",
            get(get_item).patch(mark_item_sold).delete(delete_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PostListQuery {
    page: Option<usize>,
    category: Option<String>,
    tag: Option<String>,
    #[serde(alias = "searchQuery")]
    search: Option<String>,
}

async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostResponse>, ApiError> {
    let response = state
        .posts
        .get_posts(
            query.page,
            query.category.as_deref(),
            query.tag.as_deref(),
            query.search.as_deref(),
        )
        .await?;
    Ok(Json(response))
}

async fn get_post_ids(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.posts.get_post_ids().await?))
}

async fn get_category_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.posts.get_category_list().await?))
}

async fn get_tag_list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.posts.get_tag_list().await?))
}

async fn get_post_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.get_post_by_id(&id).await?))
}

async fn get_related_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let reference = state.posts.get_post_by_id(&id).await?;
    Ok(Json(state.posts.get_related_posts(&reference).await?))
}

async fn get_post_image(
    State(state): State<AppState>,
    Path((id, file)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let bytes = state.posts.get_post_image_file(&id, &file).await?;
    let content_type = content_type_for(&file);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.items.list().await)
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.items.get(id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let item = state.items.create(input).await;
    (StatusCode::CREATED, Json(item))
}

async fn mark_item_sold(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.items.mark_sold(id).await?))
}

async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    state.items.delete(id).await;
    StatusCode::NO_CONTENT
}

/// Content type for a post image, derived from the file extension
fn content_type_for(file: &str) -> &'static str {
    let ext = file.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An error response: a status code plus a JSON body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        let status = match &err {
            // "Missing" and "unreadable" are indistinguishable to the API
            PostError::NotFound { .. } | PostError::Read { .. } => StatusCode::NOT_FOUND,
            PostError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            PostError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostStore;
    use axum::body::Body;
    use axum::http::Request;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(root: &std::path::Path) -> AppState {
        AppState {
            posts: Arc::new(PostService::with_rng(
                PostStore::new(root),
                10,
                5,
                StdRng::seed_from_u64(7),
            )),
            items: Arc::new(ItemStore::new()),
        }
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("hello");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("index.md"),
            "---\ntitle: Hello\ndate: 2023-05-01\ntags: rust\ncategories: dev\n---\nBody text\n",
        )
        .unwrap();
        fs::write(dir.join("shot.png"), b"\x89PNG").unwrap();
        tmp
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_posts_returns_page_and_total() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(Request::builder().uri("/api/post").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["posts"][0]["id"], "hello");
        assert_eq!(json["posts"][0]["title"], "Hello");
    }

    #[tokio::test]
    async fn test_get_post_by_id_missing_is_404() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/post/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ids_route_is_not_shadowed_by_post_id() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/post/ids")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!(["hello"]));
    }

    #[tokio::test]
    async fn test_get_post_image_sets_content_type() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/post/img/hello/shot.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_related_posts_for_missing_reference_is_404() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/post/related/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_items_crud_roundtrip() {
        let tmp = fixture();
        let state = test_state(tmp.path());

        let create = Request::builder()
            .method("POST")
            .uri("/api/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"widget","price":1200}"#))
            .unwrap();
        let response = router(state.clone()).oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "ON_SALE");
        let id = created["id"].as_str().unwrap().to_string();

        let patch = Request::builder()
            .method("PATCH")
            .uri(format!("/api/items/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(patch).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "SOLD_OUT");

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/items/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let list = Request::builder()
            .uri("/api/items")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(list).await.unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_item_is_404() {
        let tmp = fixture();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/items/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
