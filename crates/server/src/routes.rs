use std::sync::Arc;

use axum::{body::Bytes, extract::Path, routing::get, Router};
use axum_extra::extract::WithRejection;
use service::{storage::UserStore, UserService};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::ApiError;
use crate::views::Views;

pub mod pages;
pub mod users;

/// `:id` path segment; malformed segments answer through `ApiError`.
pub type IdPath = WithRejection<Path<String>, ApiError>;
/// Raw request body; oversized or unreadable bodies answer through `ApiError`.
pub type RawBody = WithRejection<Bytes, ApiError>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, views: Views) -> Self {
        Self { users: Arc::new(UserService::new(store)), views: Arc::new(views) }
    }
}

/// Anything the route table does not cover, including unsupported methods
/// on known paths.
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

/// Build the full application router.
///
/// `/users/data/:id` and `/users/:id` differ in segment count, so the JSON
/// lookup can never be shadowed by the page route.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(pages::home).fallback(route_not_found))
        .route(
            "/users",
            get(users::list_users).post(users::create_user).fallback(route_not_found),
        )
        .route("/users/data/:id", get(users::get_user_data).fallback(route_not_found))
        .route(
            "/users/:id",
            get(pages::user_page)
                .put(users::replace_user)
                .patch(users::patch_user)
                .delete(users::delete_user)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
