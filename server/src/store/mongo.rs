use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson},
    options::ClientOptions,
    Client, Collection,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{StoreError, StoreResult, TodoStore};
use crate::config::MongoConfig;
use crate::model::{NewTodo, Todo, TodoId};

pub const DATABASE_NAME: &str = "todo_memo";
pub const COLLECTION_NAME: &str = "todos";

const APP_NAME: &str = "todo-memo";

/// A todo as laid out in the `todos` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    value: String,
    order: i64,
    #[serde(rename = "doneAt", default)]
    done_at: Option<bson::DateTime>,
}

impl TodoDocument {
    fn into_todo(self) -> StoreResult<Todo> {
        let id = self
            .id
            .ok_or_else(|| StoreError::InvalidDocument("todo without _id".to_string()))?;
        let done_at = self.done_at.map(from_bson_datetime).transpose()?;
        Ok(Todo {
            id: TodoId::from(id),
            value: self.value,
            order: self.order,
            done_at,
        })
    }
}

fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_datetime(at: bson::DateTime) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).ok_or_else(|| {
        StoreError::InvalidDocument(format!("doneAt out of range: {}", at.timestamp_millis()))
    })
}

/// `TodoStore` backed by the `todos` collection of the `todo_memo` database.
///
/// The driver pools connections internally; one `MongoStore` is created at
/// startup and shared by every request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    todos: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping before serving.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(config.uri()).await?;
        options.app_name = Some(APP_NAME.to_string());
        let client = Client::with_options(options)?;

        let database = client.database(DATABASE_NAME);
        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = DATABASE_NAME, "connected to MongoDB");

        Ok(Self {
            todos: database.collection(COLLECTION_NAME),
            client,
        })
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn max_order(&self) -> StoreResult<Option<i64>> {
        let top = self
            .todos
            .find_one(doc! {})
            .sort(doc! { "order": -1 })
            .await?;
        Ok(top.map(|document| document.order))
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let document = TodoDocument {
            id: None,
            value: todo.value,
            order: todo.order,
            done_at: None,
        };
        let result = self.todos.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingInsertedId)?;
        debug!(%id, order = document.order, "inserted todo");

        TodoDocument {
            id: Some(id),
            ..document
        }
        .into_todo()
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let documents: Vec<TodoDocument> = self
            .todos
            .find(doc! {})
            .sort(doc! { "order": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(TodoDocument::into_todo).collect()
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        self.todos
            .find_one(doc! { "_id": id.object_id() })
            .await?
            .map(TodoDocument::into_todo)
            .transpose()
    }

    async fn find_by_order(&self, order: i64) -> StoreResult<Option<Todo>> {
        self.todos
            .find_one(doc! { "order": order })
            .await?
            .map(TodoDocument::into_todo)
            .transpose()
    }

    async fn save(&self, todo: &Todo) -> StoreResult<()> {
        let done_at = todo
            .done_at
            .map_or(Bson::Null, |at| Bson::DateTime(to_bson_datetime(at)));
        let result = self
            .todos
            .update_one(
                doc! { "_id": todo.id.object_id() },
                doc! { "$set": { "value": todo.value.as_str(), "order": todo.order, "doneAt": done_at } },
            )
            .await?;
        debug!(id = %todo.id, matched = result.matched_count, "saved todo");
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> StoreResult<bool> {
        let result = self
            .todos
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("disconnected from MongoDB");
    }
}
