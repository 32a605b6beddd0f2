use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod calculations;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health probe, calculations, users and login.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let calculation_routes = Router::new()
        .route("/calculations", get(calculations::list).post(calculations::create))
        .route(
            "/calculations/:id",
            get(calculations::get_one).put(calculations::update).delete(calculations::remove),
        );

    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get_one).put(users::update).delete(users::remove))
        .route("/login", post(users::login));

    // Compose
    Router::new()
        .route("/health", get(health))
        .merge(calculation_routes)
        .merge(user_routes)
        .with_state(state)
        // 超时返回 408
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
