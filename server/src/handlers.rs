//! HTTP handlers for the `/todos` resource.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::model::{CreateTodo, NewTodo, TodoEnvelope, TodoId, TodoList, UpdateTodo};
use crate::store::SharedStore;

fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("\"todoId\" is not a valid id: {raw:?}")))
}

/// `POST /todos`: append a todo above every existing one.
pub async fn create_todo(
    State(store): State<SharedStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoEnvelope>), ApiError> {
    let Json(body) = payload?;
    let input = CreateTodo::validate(&body)?;

    let order = store
        .max_order()
        .await?
        .map_or(1, |max| max.saturating_add(1));
    let todo = store
        .insert(NewTodo {
            value: input.value,
            order,
        })
        .await?;
    info!(id = %todo.id, order, "created todo");

    Ok((StatusCode::CREATED, Json(TodoEnvelope { todo })))
}

/// `GET /todos`: every todo, highest order first.
pub async fn list_todos(State(store): State<SharedStore>) -> Result<Json<TodoList>, ApiError> {
    let todos = store.list().await?;
    Ok(Json(TodoList { todos }))
}

/// `PATCH /todos/{todoId}`: reorder, complete/reopen, or edit a todo.
///
/// Moving to an order held by another todo swaps the two positions; moving to
/// an unused order just takes it. The swap is two separate writes. A request
/// without a JSON body changes nothing.
pub async fn update_todo(
    State(store): State<SharedStore>,
    Path(todo_id): Path<String>,
    payload: Result<Option<Json<UpdateTodo>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&todo_id)?;
    let input = payload?.map(|Json(input)| input).unwrap_or_default();

    let mut todo = store.find(id).await?.ok_or_else(ApiError::todo_not_found)?;

    if let Some(order) = input.order {
        if let Some(mut holder) = store.find_by_order(order).await? {
            if holder.id != todo.id {
                holder.order = todo.order;
                store.save(&holder).await?;
                debug!(id = %holder.id, order = holder.order, "swapped order");
            }
        }
        todo.order = order;
    }

    if let Some(done) = input.done {
        todo.set_done(done, Utc::now());
    }

    if let Some(value) = input.value {
        todo.value = value;
    }

    store.save(&todo).await?;
    info!(%id, order = todo.order, done = todo.is_done(), "updated todo");

    Ok(Json(json!({})))
}

/// `DELETE /todos/{todoId}`: remove one todo. Remaining orders keep their gaps.
pub async fn delete_todo(
    State(store): State<SharedStore>,
    Path(todo_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&todo_id)?;

    if store.find(id).await?.is_none() {
        return Err(ApiError::todo_info_not_found());
    }
    store.delete(id).await?;
    info!(%id, "deleted todo");

    Ok(Json(json!({})))
}
