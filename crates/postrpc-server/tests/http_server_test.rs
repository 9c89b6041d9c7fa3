//! End-to-end server tests: real listener, real client, one process.

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use postrpc_client::{Client, ClientConfig};
use postrpc_server::{
    BoxError, HandlerResult, Reply, RequestContext, Server, ServerConfig, ServerHandle,
};

async fn echo(ctx: RequestContext) -> HandlerResult {
    let data = ctx.raw_data().cloned().unwrap_or(Value::Null);
    Ok(ctx.reply(data))
}

async fn start(server: Server) -> ServerHandle {
    server.listen().await.unwrap()
}

fn local_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        ..ServerConfig::default()
    }
}

fn client_for(handle: &ServerHandle) -> Client {
    Client::new(ClientConfig::new("127.0.0.1", handle.local_addr().port())).unwrap()
}

/// Send one raw HTTP request, bypassing the client's codec entirely.
async fn raw_post(handle: &ServerHandle, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(handle.local_addr()).await.unwrap();
    let request = format!(
        "POST / HTTP/1.1\r\nhost: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        handle.local_addr(),
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8(response).unwrap();

    let status = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn test_round_trip_echo() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;
    let client = client_for(&handle);

    let result = client.call("echo", json!({"x": 1})).await.unwrap();

    assert_eq!(result.code(), 200);
    assert_eq!(result.raw_data(), &json!({"x": 1}));
    assert_eq!(
        result.headers().get("content-type").unwrap(),
        "application/json"
    );
    handle.shutdown();
}

#[tokio::test]
async fn test_unknown_method_resolves_with_500() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;
    let client = client_for(&handle);

    // Resolved call, not a rejection.
    let result = client.call("foo", json!({})).await.unwrap();

    assert_eq!(result.code(), 500);
    assert_eq!(result.raw_data(), &json!({"error": "unknown method foo"}));
    handle.shutdown();
}

#[tokio::test]
async fn test_handler_error_resolves_with_500() {
    let handle = start(Server::new(local_config()).handle(
        "boom",
        |_ctx: RequestContext| async move { Err::<Reply, BoxError>("boom".into()) },
    ))
    .await;
    let client = client_for(&handle);

    let result = client.call("boom", json!({})).await.unwrap();

    assert_eq!(result.code(), 500);
    assert_eq!(result.raw_data(), &json!({"error": "boom"}));
    handle.shutdown();
}

#[tokio::test]
async fn test_immediate_and_awaiting_handlers_look_identical() {
    // One handler fails before its first await point, the other after
    // yielding; callers cannot tell them apart.
    let handle = start(
        Server::new(local_config())
            .handle("early", |_ctx: RequestContext| async move {
                Err::<Reply, BoxError>("boom".into())
            })
            .handle("late", |_ctx: RequestContext| async move {
                tokio::task::yield_now().await;
                Err::<Reply, BoxError>("boom".into())
            }),
    )
    .await;
    let client = client_for(&handle);

    let early = client.call("early", json!({})).await.unwrap();
    let late = client.call("late", json!({})).await.unwrap();

    assert_eq!(early.code(), late.code());
    assert_eq!(early.raw_data(), late.raw_data());
    handle.shutdown();
}

#[tokio::test]
async fn test_custom_code_and_headers() {
    let handle = start(Server::new(local_config()).handle(
        "create",
        |ctx: RequestContext| async move {
            Ok::<_, BoxError>(
                ctx.reply(json!({"id": 7}))
                    .with_code(201)
                    .with_header("x-request-id", "abc"),
            )
        },
    ))
    .await;
    let client = client_for(&handle);

    let result = client.call("create", json!({})).await.unwrap();

    assert_eq!(result.code(), 201);
    assert_eq!(result.headers().get("x-request-id").unwrap(), "abc");
    assert_eq!(result.raw_data(), &json!({"id": 7}));
    handle.shutdown();
}

#[tokio::test]
async fn test_context_sees_inbound_headers() {
    let handle = start(Server::new(local_config()).handle(
        "headers",
        |ctx: RequestContext| async move {
            let content_type = ctx
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Ok::<_, BoxError>(ctx.reply(json!({"content-type": content_type})))
        },
    ))
    .await;
    let client = client_for(&handle);

    let result = client.call("headers", json!({})).await.unwrap();

    assert_eq!(
        result.raw_data(),
        &json!({"content-type": "application/json"})
    );
    handle.shutdown();
}

#[tokio::test]
async fn test_typed_context_data() {
    #[derive(serde::Deserialize)]
    struct Pair {
        a: i64,
        b: i64,
    }

    let handle = start(Server::new(local_config()).handle(
        "add",
        |ctx: RequestContext| async move {
            let pair: Pair = ctx.data()?;
            Ok::<_, BoxError>(ctx.reply(json!(pair.a + pair.b)))
        },
    ))
    .await;
    let client = client_for(&handle);

    let result = client.call("add", json!({"a": 2, "b": 3})).await.unwrap();

    assert_eq!(result.raw_data(), &json!(5));
    handle.shutdown();
}

#[tokio::test]
async fn test_malformed_body_gets_parser_message() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;

    let expected = serde_json::from_str::<Value>("{bad").unwrap_err().to_string();
    let (status, body) = raw_post(&handle, "{bad").await;

    assert_eq!(status, 500);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": expected}));
    handle.shutdown();
}

#[tokio::test]
async fn test_empty_body_is_not_a_decode_error() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;

    let (status, body) = raw_post(&handle, "").await;

    // Decodes to an empty envelope and fails dispatch, not decoding.
    assert_eq!(status, 500);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "unknown method ");
    handle.shutdown();
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;
    let client = client_for(&handle);

    let calls = (0..10).map(|i| {
        let client = &client;
        async move { client.call("echo", json!({"i": i})).await }
    });
    let results = futures::future::join_all(calls).await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap().raw_data(), &json!({"i": i}));
    }
    handle.shutdown();
}

#[tokio::test]
async fn test_pure_handler_is_idempotent() {
    let handle = start(Server::new(local_config()).handle("echo", echo)).await;
    let client = client_for(&handle);

    let first = client.call("echo", json!({"x": 1})).await.unwrap();
    let second = client.call("echo", json!({"x": 1})).await.unwrap();

    assert_eq!(first.code(), second.code());
    assert_eq!(first.raw_data(), second.raw_data());
    handle.shutdown();
}
