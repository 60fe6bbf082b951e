use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{HeaderMap, Method, StatusCode, header};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::{net::{Ipv4Addr, SocketAddr}, sync::Arc};
use tokio::net::{TcpListener, TcpStream};

use crate::{api, store::{Seed, Store}};
use super::{
    Context, HttpConfig, serve_connection,
    handlers::{API_METHODS, GRAPHIQL_METHODS, MAX_BODY_SIZE, check_body_size},
};


fn config(cors_allow_origin: &str) -> HttpConfig {
    HttpConfig {
        port: 0,
        address: Ipv4Addr::LOCALHOST.into(),
        cors_allow_origin: cors_allow_origin.into(),
    }
}

/// Starts a server with the built-in seed data on a random local port.
async fn start_server(config: HttpConfig) -> (SocketAddr, Arc<Store>) {
    let store = Arc::new(Store::new(Seed::builtin().unwrap()));
    let ctx = Context::new(&config, false, api::root_node(), Arc::clone(&store)).unwrap();
    let ctx = Arc::new(ctx);

    let listener = TcpListener::bind((config.address, config.port)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (stream, peer) = listener.accept().await.unwrap();
            serve_connection(stream, peer, Arc::clone(&ctx));
        }
    });

    (addr, store)
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Reply {
    fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).map(|v| v.to_str().unwrap())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON response ({e}): {}", self.body))
    }
}

async fn send(addr: SocketAddr, req: hyper::Request<Full<Bytes>>) -> Reply {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let (parts, body) = sender.send_request(req).await.unwrap().into_parts();
    let body = body.collect().await.unwrap().to_bytes();
    Reply {
        status: parts.status,
        headers: parts.headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

fn post(uri: &str, content_type: &str, body: &str) -> hyper::Request<Full<Bytes>> {
    hyper::Request::post(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap()
}

fn empty(method: Method, uri: &str) -> hyper::Request<Full<Bytes>> {
    hyper::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn todo_ids(store: &Store) -> Vec<i32> {
    store.todos.read().await.all().iter().map(|t| t.id).collect()
}


#[tokio::test]
async fn post_json() {
    let (addr, _) = start_server(config("*")).await;
    let reply = send(addr, post(
        "/graphql",
        "application/json",
        r#"{ "query": "{ todos { id user { id } } }" }"#,
    )).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.header(header::CONTENT_TYPE).unwrap().starts_with("application/json"));
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert_eq!(reply.json()["data"]["todos"][0], json!({ "id": 1, "user": { "id": 1 } }));
}

#[tokio::test]
async fn post_graphql_on_root_path() {
    let (addr, _) = start_server(config("*")).await;
    let reply = send(addr, post("/", "application/graphql", "{ users { id name } }")).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["users"][0], json!({ "id": 1, "name": "Leanne Graham" }));
}

#[tokio::test]
async fn post_json_batch() {
    let (addr, store) = start_server(config("*")).await;
    let reply = send(addr, post("/graphql", "application/json", r#"[
        { "query": "mutation { deleteTodo(id: 2) }" },
        { "query": "mutation { deleteTodo(id: 999) }" }
    ]"#)).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!([
        { "data": { "deleteTodo": true } },
        { "data": { "deleteTodo": false } },
    ]));
    assert!(!todo_ids(&store).await.contains(&2));
}

#[tokio::test]
async fn validation_error_is_bad_request() {
    let (addr, _) = start_server(config("*")).await;
    let reply = send(addr, post(
        "/graphql",
        "application/json",
        r#"{ "query": "{ todos { nope } }" }"#,
    )).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.json()["errors"][0]["message"].is_string(), "{}", reply.body);
}

#[tokio::test]
async fn field_error_is_ok() {
    let (addr, store) = start_server(config("*")).await;
    let reply = send(addr, post(
        "/graphql",
        "application/json",
        r#"{ "query": "mutation { addTodo(title: \"\", userId: 1) { id } }" }"#,
    )).await;

    assert_eq!(reply.status, StatusCode::OK);
    let out = reply.json();
    assert_eq!(out["data"], json!({ "addTodo": null }));
    assert_eq!(out["errors"][0]["extensions"]["kind"], "INVALID_INPUT");
    assert_eq!(todo_ids(&store).await.len(), 10);
}

#[tokio::test]
async fn malformed_body_is_client_error() {
    let (addr, _) = start_server(config("*")).await;
    let reply = send(addr, post("/graphql", "application/json", "{ nope")).await;
    assert!(reply.status.is_client_error(), "{}", reply.status);

    let reply = send(addr, post("/graphql", "text/plain", "{ users { id } }")).await;
    assert!(reply.status.is_client_error(), "{}", reply.status);
}

#[tokio::test]
async fn get_never_executes_operations() {
    let (addr, store) = start_server(config("*")).await;
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("query", "mutation { deleteTodo(id: 1) }")
        .finish();
    let reply = send(addr, empty(Method::GET, &format!("/graphql?{query}"))).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.header(header::CONTENT_TYPE).unwrap().starts_with("text/html"));
    assert!(todo_ids(&store).await.contains(&1));
}

#[tokio::test]
async fn graphiql() {
    let (addr, _) = start_server(config("*")).await;
    for path in ["/", "/graphql", "/graphiql", "/graphiql/"] {
        let reply = send(addr, empty(Method::GET, path)).await;
        assert_eq!(reply.status, StatusCode::OK, "{path}");
        assert!(reply.header(header::CONTENT_TYPE).unwrap().starts_with("text/html"), "{path}");
        assert!(reply.body.contains("/graphql"), "{path}");
    }
}

#[tokio::test]
async fn unknown_path() {
    let (addr, _) = start_server(config("*")).await;
    for method in [Method::GET, Method::POST] {
        let reply = send(addr, empty(method, "/todos")).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn method_not_allowed_lists_methods() {
    let (addr, _) = start_server(config("*")).await;

    let reply = send(addr, empty(Method::PUT, "/graphql")).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(reply.header(header::ALLOW), Some(API_METHODS));

    let reply = send(addr, post("/graphiql", "application/json", "{}")).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(reply.header(header::ALLOW), Some(GRAPHIQL_METHODS));
}

#[tokio::test]
async fn cors_preflight() {
    let (addr, _) = start_server(config("https://todo.example.com")).await;
    let reply = send(addr, empty(Method::OPTIONS, "/graphql")).await;

    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(
        reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://todo.example.com"),
    );
    assert!(reply.header(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap().contains("POST"));
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_HEADERS), Some("content-type"));
}

#[tokio::test]
async fn cors_disabled() {
    let (addr, _) = start_server(config("")).await;

    let reply = send(addr, empty(Method::OPTIONS, "/graphql")).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), None);

    let reply = send(addr, post("/graphql", "application/graphql", "{ users { id } }")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), None);
}

#[test]
fn invalid_cors_origin() {
    let store = Arc::new(Store::new(Seed::builtin().unwrap()));
    let res = Context::new(&config("bad\norigin"), false, api::root_node(), store);
    assert!(res.is_err());
}

fn body_size_status(content_length: Option<&str>) -> Result<(), StatusCode> {
    let mut headers = HeaderMap::new();
    if let Some(len) = content_length {
        headers.insert(header::CONTENT_LENGTH, len.parse().unwrap());
    }
    check_body_size(&headers).map_err(|r| r.status())
}

#[test]
fn body_size_limit() {
    let max = MAX_BODY_SIZE.to_string();
    let too_large = (MAX_BODY_SIZE + 1).to_string();

    assert_eq!(body_size_status(Some("0")), Ok(()));
    assert_eq!(body_size_status(Some(&max)), Ok(()));
    assert_eq!(body_size_status(Some(&too_large)), Err(StatusCode::PAYLOAD_TOO_LARGE));
    assert_eq!(body_size_status(Some("lots")), Err(StatusCode::BAD_REQUEST));
    assert_eq!(body_size_status(None), Err(StatusCode::LENGTH_REQUIRED));
}
