use std::time::Duration;

use realtime_db::{FirebaseStore, RealtimeStore, StoreError};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Reads one request, head and body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Answers a single request and returns what was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (format!("http://{addr}/"), handle)
}

#[tokio::test]
async fn set_puts_the_value_at_its_path() {
    let (url, server) = serve_once("204 No Content", "").await;
    let store = FirebaseStore::new(&url, Some("secret".to_owned())).unwrap();

    store
        .set("favorites/hello", json!({ "id": "hello", "word": "hello" }))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(
        request.starts_with("PUT /favorites/hello.json?auth=secret&print=silent HTTP/1.1"),
        "{request}"
    );
    assert!(request.ends_with(r#"{"id":"hello","word":"hello"}"#), "{request}");
}

#[tokio::test]
async fn push_returns_the_generated_key() {
    let (url, server) = serve_once("200 OK", r#"{"name":"-NqZ3kP0aBcDeFgHiJkL"}"#).await;
    let store = FirebaseStore::new(&url, None).unwrap();

    let key = store.push("history", json!("hello")).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /history.json HTTP/1.1"), "{request}");
    assert!(request.ends_with("\"hello\""));
    assert_eq!(key, "-NqZ3kP0aBcDeFgHiJkL");
}

#[tokio::test]
async fn rejected_writes_carry_the_status() {
    let (url, server) = serve_once("401 Unauthorized", r#"{"error":"Permission denied"}"#).await;
    let store = FirebaseStore::new(&url, None).unwrap();

    let error = store.set("favorites/hello", json!(1)).await.unwrap_err();
    server.await.unwrap();

    match error {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Permission denied"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_database_fails_the_write() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = FirebaseStore::new(&format!("http://{addr}/"), None).unwrap();

    let error = store.set("favorites/hello", json!(1)).await.unwrap_err();
    assert!(matches!(error, StoreError::Unreachable(_)), "{error:?}");
}

#[tokio::test]
async fn writes_after_shutdown_are_refused() {
    let store = FirebaseStore::new("http://127.0.0.1:9/", None).unwrap();
    store.shutdown().await;
    assert!(matches!(
        store.push("history", json!("hello")).await,
        Err(StoreError::Closed)
    ));
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("snapshot within five seconds")
        .expect("subscription still open")
}

#[tokio::test]
async fn subscription_follows_the_event_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let events = [
            "event: put\ndata: {\"path\":\"/\",\"data\":{\"-a\":\"hello\"}}\n\n",
            "event: keep-alive\ndata: null\n\n",
            "event: put\ndata: {\"path\":\"/-b\",\"data\":\"world\"}\n\n",
            "event: patch\ndata: {\"path\":\"/\",\"data\":{\"-c\":\"again\"}}\n\n",
        ];
        for event in events {
            socket.write_all(event.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }
        // hold the stream open until the client goes away
        let mut buf = [0u8; 64];
        while socket.read(&mut buf).await.unwrap_or(0) > 0 {}
        request
    });

    let store = FirebaseStore::new(&format!("http://{addr}/"), None).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let subscription = store
        .subscribe(
            "history",
            Box::new(move |snapshot: Value| {
                let _ = tx.send(snapshot);
            }),
        )
        .await
        .unwrap();

    assert_eq!(next(&mut rx).await, json!({ "-a": "hello" }));
    assert_eq!(next(&mut rx).await, json!({ "-a": "hello", "-b": "world" }));
    assert_eq!(
        next(&mut rx).await,
        json!({ "-a": "hello", "-b": "world", "-c": "again" })
    );

    subscription.release();
    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    assert!(request.starts_with("GET /history.json HTTP/1.1"));
    assert!(request.to_lowercase().contains("accept: text/event-stream"));
}
