//! Data access for todos.
//!
//! # Design
//! Handlers talk to an `Arc<dyn TodoStore>` injected as router state, so the
//! connection is constructed once at startup and torn down explicitly instead
//! of living in a global. `MongoStore` is the production backend;
//! `MemoryStore` has the same observable behavior and backs the tests.
//!
//! No operation is transactional. An order swap is two separate `save`
//! calls, so concurrent reorders can leave duplicate `order` values.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{NewTodo, Todo, TodoId};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::{MongoStore, COLLECTION_NAME, DATABASE_NAME};

/// Errors raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    #[error("insert did not return an object id")]
    MissingInsertedId,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The `todos` collection.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Highest `order` currently stored, `None` when there are no todos.
    async fn max_order(&self) -> StoreResult<Option<i64>>;

    /// Persist a new, open todo and return it with its assigned id.
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo>;

    /// All todos, highest `order` first.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Any todo currently holding `order`.
    async fn find_by_order(&self, order: i64) -> StoreResult<Option<Todo>>;

    /// Overwrite `value`, `order` and `doneAt` of the stored record with the
    /// same id. Saving a record that no longer exists is a no-op.
    async fn save(&self, todo: &Todo) -> StoreResult<()>;

    /// Remove a todo. Returns whether a record was removed.
    async fn delete(&self, id: TodoId) -> StoreResult<bool>;

    /// Release the backend's resources. Called once, after the server stops.
    async fn shutdown(&self) {}
}

pub type SharedStore = Arc<dyn TodoStore>;
