//! Full CRUD lifecycle against a live server backed by the in-memory store.
//!
//! Starts the server on a random port, then drives every client operation
//! over real HTTP using ureq.

use std::sync::Arc;

use todo_memo_core::{
    ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, TodoClient, UpdateTodo,
};
use todo_memo_server::MemoryStore;

/// Execute an `HttpRequest` with ureq. Status codes are returned as data so
/// the client does the interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let method = req.method.as_str();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(&req.path).send_empty(),
    }
    .unwrap_or_else(|err| panic!("{method} {} failed: {err}", req.path));

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    HttpResponse::new(status, body)
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_memo_server::run(listener, Arc::new(MemoryStore::new())).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let client = TodoClient::new(&start_server());

    // Empty to start with.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Invalid input is rejected with the server's message.
    let req = client.build_create_todo(&CreateTodo::new("")).unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m.contains("empty")));

    // Create two todos; orders count up from 1.
    let req = client.build_create_todo(&CreateTodo::new("buy milk")).unwrap();
    let milk = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(milk.order, 1);
    assert!(!milk.is_done());

    let req = client.build_create_todo(&CreateTodo::new("walk dog")).unwrap();
    let dog = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(dog.order, 2);

    // Swap positions.
    let req = client.build_update_todo(&milk.id, &UpdateTodo::order(2)).unwrap();
    client.parse_update_todo(execute(req)).unwrap();
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    let values: Vec<&str> = todos.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["buy milk", "walk dog"]);

    // Complete one.
    let req = client.build_update_todo(&milk.id, &UpdateTodo::done(true)).unwrap();
    client.parse_update_todo(execute(req)).unwrap();
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos[0].is_done());
    assert!(!todos[1].is_done());

    // Delete, then delete again.
    client
        .parse_delete_todo(execute(client.build_delete_todo(&milk.id)))
        .unwrap();
    let err = client
        .parse_delete_todo(execute(client.build_delete_todo(&milk.id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Updating a deleted todo is also NotFound.
    let req = client.build_update_todo(&milk.id, &UpdateTodo::value("gone")).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, dog.id);
    assert_eq!(todos[0].order, 1);
}
