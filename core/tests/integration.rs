//! Exchanges over real TCP against the mock server.
//!
//! # Design
//! One mock server is started on a random port for the whole test binary.
//! Every test drives `HttpClient` through the default `TcpTransport`, so the
//! bytes on the wire are exactly what the client builds. The mock server's
//! `/echo`, `/query` and `/form` routes report what it received, which lets
//! the tests assert on the server's view of each request.

use std::net::{SocketAddr, TcpListener};
use std::sync::OnceLock;
use std::time::Duration;

use mock_server::{Echo, Pairs};
use sockhttp_core::{ClientConfig, ClientError, HttpClient, HttpMethod, Params, RequestArgs};

fn server() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| {
        let std_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });
        addr
    })
}

fn url(path: &str) -> String {
    format!("http://{}{path}", server())
}

fn client() -> HttpClient {
    HttpClient::with_config(ClientConfig::default().with_timeout(Duration::from_secs(5)))
}

fn pairs(expected: &[(&str, &str)]) -> Pairs {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn get_sends_url_query_host_and_connection_close() {
    let response = client().get(&url("/echo?a=1&b=2"), RequestArgs::None).unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert!(response.headers.starts_with("HTTP/1.1 200 OK"));

    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query.as_deref(), Some("a=1&b=2"));
    assert_eq!(echo.host.as_deref(), Some("127.0.0.1"));
    assert_eq!(echo.connection.as_deref(), Some("close"));
    assert!(echo.body.is_empty());
}

#[test]
fn get_with_mapping_reaches_server_decoded() {
    let args = Params::from([("q", "rust & c"), ("lang", "en")]);
    let response = client().get(&url("/query?ignored=1"), args).unwrap();

    assert_eq!(response.code, 200);
    let received: Pairs = serde_json::from_str(&response.body).unwrap();
    assert_eq!(received, pairs(&[("q", "rust & c"), ("lang", "en")]));
}

#[test]
fn get_with_string_args_translates_spaces() {
    let response = client().get(&url("/query"), "greeting=hello world&n=1").unwrap();

    let received: Pairs = serde_json::from_str(&response.body).unwrap();
    assert_eq!(received, pairs(&[("greeting", "hello world"), ("n", "1")]));
}

#[test]
fn post_form_body_reaches_server_decoded() {
    let args = Params::from([("name", "a b"), ("id", "7")]);
    let response = client().post(&url("/form"), args).unwrap();

    assert_eq!(response.code, 200);
    let received: Pairs = serde_json::from_str(&response.body).unwrap();
    assert_eq!(received, pairs(&[("name", "a b"), ("id", "7")]));
}

#[test]
fn post_keeps_url_query_and_sends_exact_content_length() {
    let args = Params::from([("word", "café")]);
    let response = client().post(&url("/echo?page=2"), args).unwrap();

    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.query.as_deref(), Some("page=2"));
    assert_eq!(echo.body, "word=caf%C3%A9");
    assert_eq!(echo.content_length.as_deref(), Some("14"));
    assert_eq!(echo.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
}

#[test]
fn post_without_args_sends_empty_body() {
    let response = client().post(&url("/echo"), RequestArgs::None).unwrap();

    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.content_length.as_deref(), Some("0"));
    assert!(echo.body.is_empty());
}

#[test]
fn command_dispatches_by_method() {
    let response = client()
        .command(&url("/echo"), HttpMethod::Post, "k=v")
        .unwrap();
    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, "k=v");
}

#[test]
fn error_statuses_are_returned_as_responses() {
    let response = client().get(&url("/missing"), RequestArgs::None).unwrap();
    assert_eq!(response.code, 404);
    assert_eq!(response.body, "Not found");

    let response = client().get(&url("/status/503"), RequestArgs::None).unwrap();
    assert_eq!(response.code, 503);
    assert_eq!(response.body, "status 503");
}

#[test]
fn non_utf8_body_falls_back_to_latin1() {
    let response = client().get(&url("/latin1"), RequestArgs::None).unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.body, "caf\u{e9}");
}

#[test]
fn large_body_is_read_across_many_chunks() {
    let client = HttpClient::with_config(ClientConfig::default().with_recv_chunk_size(7));
    let response = client.get(&url("/large?size=100000"), RequestArgs::None).unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body.len(), 100_000);
    assert_eq!(response.header("content-length"), Some("100000"));
}

#[test]
fn response_limit_aborts_the_exchange() {
    let client = HttpClient::with_config(ClientConfig::default().with_max_response_bytes(1024));
    let err = client
        .get(&url("/large?size=100000"), RequestArgs::None)
        .unwrap_err();
    assert!(matches!(err, ClientError::TransmissionFailure(_)));
}

#[test]
fn matches_reference_client_body() {
    let target = url("/query?b=2&a=%2F&c=x+y");
    let ours = client().get(&target, RequestArgs::None).unwrap();

    let reference = ureq::get(&target)
        .call()
        .unwrap()
        .body_mut()
        .read_to_string()
        .unwrap();

    assert_eq!(ours.body, reference);
}

#[test]
fn one_client_serves_concurrent_callers() {
    let client = client();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = &client;
                scope.spawn(move || {
                    let args = Params::from([("n", i.to_string())]);
                    client.get(&url("/query"), args).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let response = handle.join().unwrap();
            let received: Pairs = serde_json::from_str(&response.body).unwrap();
            assert_eq!(received, vec![("n".to_string(), i.to_string())]);
        }
    });
}

#[test]
fn refused_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = client()
        .get(&format!("http://127.0.0.1:{port}/"), RequestArgs::None)
        .unwrap_err();
    assert!(matches!(err, ClientError::ConnectionFailure { .. }));
}

#[test]
fn unresolvable_host_is_reported() {
    let err = client()
        .get("http://no-such-host.invalid/", RequestArgs::None)
        .unwrap_err();
    assert!(matches!(err, ClientError::ResolutionFailure { .. }));
}
