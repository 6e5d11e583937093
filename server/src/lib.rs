//! HTTP API for an ordered list of todos backed by MongoDB.
//!
//! # Overview
//! Four routes under `/todos` create, list, update and delete todos. Each
//! handler validates its input, runs a few awaited store operations in
//! sequence, and answers with JSON. Failures flow through `ApiError`, the
//! single place that maps error kinds to status codes.
//!
//! # Design
//! - The store is an `Arc<dyn TodoStore>` passed in as router state; the
//!   binary constructs it at startup and shuts it down after serving.
//! - `app` builds the router without binding a socket so tests can drive it
//!   with `tower::ServiceExt::oneshot`.

use std::future::Future;

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod store;

pub use error::ApiError;
pub use model::{CreateTodo, NewTodo, Todo, TodoId, UpdateTodo};
pub use store::{MemoryStore, MongoStore, SharedStore, StoreError, TodoStore};

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{todo_id}",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}
