//! # Courier Gateway Crate
//!
//! The HTTP and WebSocket surface of the Courier backend: REST routes for
//! auth and chat management, and the `/ws` endpoint that feeds the relay
//! core. Handlers stay thin; state-carrying logic lives in the relay,
//! users, and database crates.

#[cfg(debug_assertions)]
mod docs;
mod error;
mod state;
mod store;
mod util;

pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
pub use store::SqlStoreGateway;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/users", get(routes::auth::list_users))
        .route("/api/chats", post(routes::chats::access_chat))
        .route("/api/chats", get(routes::chats::list_chats))
        .route(
            "/api/chats/:chat_id/messages",
            get(routes::chats::list_messages),
        )
        .route("/api/chats/:chat_id", delete(routes::chats::delete_chat))
        .route("/ws", get(routes::websocket::websocket_handler))
        .with_state(state)
        .layer(cors_layer());

    attach_docs(router)
}

#[cfg(debug_assertions)]
fn attach_docs(router: Router) -> Router {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
    )
}

#[cfg(not(debug_assertions))]
fn attach_docs(router: Router) -> Router {
    router
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
