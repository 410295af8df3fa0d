//! HTTP front end for session-scoped todo lists.
//!
//! # Design
//! - Every request is bound to a `Session` through the `todo_session` cookie
//!   (see `store`). There is no other state. A session is only kept once
//!   an operation changes it.
//! - Handlers are thin: they call one `todo_core::Session` operation and
//!   render or redirect. Writes answer with 303 See Other.
//! - Pages are rendered as HTML strings by `views`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;
pub mod views;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use todo_core::ListOrder;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use store::{SessionId, SessionLimits, SessionStore, SESSION_COOKIE};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub list_order: ListOrder,
}

pub fn app(config: &Config) -> Router {
    router(config, SessionStore::with_limits(config.session_limits))
}

/// The application routed over an existing store.
pub fn router(config: &Config, store: SessionStore) -> Router {
    let state = AppState {
        store,
        list_order: config.list_order,
    };
    Router::new()
        .route("/", get(handlers::index))
        .route("/lists", get(handlers::list_lists).post(handlers::create_list))
        .route("/lists/new", get(handlers::new_list))
        .route("/lists/{list_id}", get(handlers::show_list).post(handlers::update_list))
        .route("/lists/{list_id}/edit", get(handlers::edit_list))
        .route("/lists/{list_id}/destroy", post(handlers::destroy_list))
        .route("/lists/{list_id}/todos", post(handlers::create_todo))
        .route("/lists/{list_id}/todos/{todo_id}/destroy", post(handlers::destroy_todo))
        .route("/lists/{list_id}/todos/{todo_id}/check", post(handlers::check_todo))
        .route("/lists/{list_id}/complete", post(handlers::complete_list))
        .layer(middleware::from_fn(store::attach_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: &Config) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}
