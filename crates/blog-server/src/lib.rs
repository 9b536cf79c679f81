//! HTTP API for the blog.
//!
//! Exposes users and posts of a store as JSON resources under `/api/v1`.

pub mod dto;
pub mod error;
pub mod query;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use blog_core::{PostsRepository, PostsService, UsersRepository, UsersService};
use blog_fs::{PaginationSettings, Store};
use dto::{
    CreatePost, CreateUser, CreatedResponse, HealthResponse, PostResponse, UpdatePost, UpdateUser,
    UserResponse,
};
use error::AppError;
use query::{ListParams, parse_id};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server state shared across handlers.
struct AppState {
    users: UsersService,
    posts: PostsService,
    pagination: PaginationSettings,
}

/// Build the application router on top of a store.
pub fn router(store: Store) -> Router {
    let pagination = store.config().pagination.clone();
    let store = Arc::new(store);
    let users_repo: Arc<dyn UsersRepository> = store.clone();
    let posts_repo: Arc<dyn PostsRepository> = store;

    let state = Arc::new(AppState {
        users: UsersService::new(users_repo),
        posts: PostsService::new(posts_repo),
        pagination,
    });

    let api = Router::new()
        .route("/users", get(find_all_users).post(create_user))
        .route(
            "/users/{id}",
            get(find_user).patch(update_user).delete(delete_user),
        )
        .route("/posts", get(find_all_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(find_post).patch(update_post).delete(delete_post),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the HTTP server.
///
/// # Errors
/// Returns error if the store cannot be opened, binding fails or the server
/// encounters an error.
pub async fn serve(store_path: &std::path::Path, host: &str, port: u16) -> Result<()> {
    let store = Store::open(store_path)
        .with_context(|| format!("Failed to open store at {}", store_path.display()))?;
    let app = router(store);

    let addr = format!("{host}:{port}");
    info!(address = %addr, "Starting blog server");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

type SharedState = State<Arc<AppState>>;

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// --- Users ---

async fn create_user(
    State(state): SharedState,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = payload?;
    let id = state.users.create_user(req.into())?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn find_all_users(
    State(state): SharedState,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let page = params.page(&state.pagination)?;
    let users = state.users.find_all_users(page)?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn find_user(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id)?;
    let user = state.users.find_user_by_id(id)?;
    Ok(Json(user.into()))
}

async fn update_user(
    State(state): SharedState,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    state.users.update_user_by_id(id, &req.into())?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.users.delete_user_by_id(id)?;
    Ok(StatusCode::OK)
}

// --- Posts ---

async fn create_post(
    State(state): SharedState,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = payload?;
    let id = state.posts.create_post(req.into())?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn find_all_posts(
    State(state): SharedState,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let page = params.page(&state.pagination)?;
    let author_id = params.author_id()?;
    let posts = state.posts.find_all_posts(page, author_id)?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

async fn find_post(
    State(state): SharedState,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PostResponse>, AppError> {
    let id = parse_id(&id)?;
    let author_id = params.author_id()?;
    let post = state.posts.find_post_by_id(id, author_id)?;
    Ok(Json(post.into()))
}

async fn update_post(
    State(state): SharedState,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
    payload: Result<Json<UpdatePost>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let author_id = params.author_id()?;
    let Json(req) = payload?;
    state.posts.update_post_by_id(id, author_id, &req.into())?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_post(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.posts.delete_post_by_id(id)?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn setup() -> (TempDir, Router) {
        let tmp = TempDir::new().unwrap();
        let store = Store::init(tmp.path()).unwrap();
        (tmp, router(store))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_alice(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/users",
            Some(json!({
                "first_name": "Alice",
                "last_name": "Smith",
                "email": "alice@example.com",
                "username": "alice_s",
                "password": "secret",
                "birth_date": "1990-05-17"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (_tmp, app) = setup();
        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let (_tmp, app) = setup();
        let id = create_alice(&app).await;
        let uri = format!("/api/v1/users/{id}");

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice_s");
        assert_eq!(body["birth_date"], "1990-05-17");
        assert!(body.get("hashed_password").is_none());

        let (status, _) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({"email": "alice@new.example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["email"], "alice@new.example.com");
        assert_eq!(body["first_name"], "Alice");
        assert_eq!(body["birth_date"], "1990-05-17");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let (_tmp, app) = setup();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"username": "bob"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation error: email is required");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (_tmp, app) = setup();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_ids() {
        let (_tmp, app) = setup();

        let (status, body) = send(&app, "GET", "/api/v1/users/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid id");

        let (status, body) = send(&app, "GET", "/api/v1/posts?author_id=zzz", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid author_id");
    }

    #[tokio::test]
    async fn test_pagination_errors() {
        let (_tmp, app) = setup();

        let (status, body) = send(&app, "GET", "/api/v1/users?limit=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid limit value");

        let (status, body) = send(&app, "GET", "/api/v1/users?offset=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid offset value");
    }

    #[tokio::test]
    async fn test_posts_scoped_by_author() {
        let (_tmp, app) = setup();
        let author = create_alice(&app).await;
        let stranger = Uuid::new_v4();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/posts",
            Some(json!({"title": "Hello", "extract": "hi", "content": "Hello world", "author_id": author})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let post_id = body["id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, "GET", &format!("/api/v1/posts?author_id={author}"), None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", &format!("/api/v1/posts?author_id={stranger}"), None).await;
        assert_eq!(body.as_array().unwrap().len(), 0);

        let uri = format!("/api/v1/posts/{post_id}?author_id={stranger}");
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "PATCH", &uri, Some(json!({"title": "Hijacked"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/api/v1/posts/{post_id}?author_id={author}");
        let (status, _) = send(&app, "PATCH", &uri, Some(json!({"content": "Edited"}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["title"], "Hello");
        assert_eq!(body["extract"], "hi");
        assert_eq!(body["content"], "Edited");

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/posts/{post_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_limit() {
        let (_tmp, app) = setup();
        for i in 0..3 {
            send(
                &app,
                "POST",
                "/api/v1/users",
                Some(json!({"username": format!("user{i}"), "email": format!("u{i}@example.com")})),
            )
            .await;
        }

        let (status, body) = send(&app, "GET", "/api/v1/users?limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(&app, "GET", "/api/v1/users?limit=2&offset=2", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
