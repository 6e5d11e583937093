use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreResult, TodoStore};
use crate::model::{NewTodo, Todo, TodoId};

/// Process-local store. Ids are generated the same way MongoDB generates
/// them, so their ordering follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<TodoId, Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn max_order(&self) -> StoreResult<Option<i64>> {
        let todos = self.todos.read().await;
        Ok(todos.values().map(|todo| todo.order).max())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let todo = Todo {
            id: TodoId::generate(),
            value: todo.value,
            order: todo.order,
            done_at: None,
        };
        self.todos.write().await.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut list: Vec<Todo> = todos.values().cloned().collect();
        list.sort_by(|a, b| b.order.cmp(&a.order).then_with(|| b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self.todos.read().await.get(&id).cloned())
    }

    async fn find_by_order(&self, order: i64) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .values()
            .filter(|todo| todo.order == order)
            .min_by_key(|todo| todo.id)
            .cloned())
    }

    async fn save(&self, todo: &Todo) -> StoreResult<()> {
        if let Some(stored) = self.todos.write().await.get_mut(&todo.id) {
            *stored = todo.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> StoreResult<bool> {
        Ok(self.todos.write().await.remove(&id).is_some())
    }
}
