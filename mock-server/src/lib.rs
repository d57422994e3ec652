use axum::{
    extract::{Form, Path, Query, RawQuery},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw of a request, returned as JSON by `/echo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub connection: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

/// Decoded key-value pairs, in the order they arrived.
pub type Pairs = Vec<(String, String)>;

#[derive(Deserialize)]
pub struct SizeParam {
    pub size: usize,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo).post(echo))
        .route("/query", get(query_pairs))
        .route("/form", axum::routing::post(form_pairs))
        .route("/status/{code}", get(status))
        .route("/latin1", get(latin1))
        .route("/large", get(large))
        .fallback(not_found)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        query,
        host: header_value(&headers, header::HOST),
        connection: header_value(&headers, header::CONNECTION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        content_length: header_value(&headers, header::CONTENT_LENGTH),
        body,
    })
}

async fn query_pairs(Query(pairs): Query<Pairs>) -> Json<Pairs> {
    Json(pairs)
}

async fn form_pairs(Form(pairs): Form<Pairs>) -> Json<Pairs> {
    Json(pairs)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn latin1() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
        vec![b'c', b'a', b'f', 0xE9],
    )
}

async fn large(Query(SizeParam { size }): Query<SizeParam>) -> String {
    "x".repeat(size)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
