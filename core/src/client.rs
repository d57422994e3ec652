//! Blocking HTTP/1.1 client over raw transport connections.
//!
//! # Design
//! `HttpClient` holds only its configuration and transport. Every call runs
//! the same progression: resolve, connect, send, receive until the peer
//! closes, parse. The connection is local to the call and closed exactly
//! once on both success and failure, so a client value can be shared freely.
//! Request building and response parsing are pure; only the transport
//! touches the network.

use std::fmt;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::{decode, Encoding, HttpResponse};
use crate::transport::{Connection, TcpTransport, Transport};
use crate::types::RequestArgs;
use crate::uri::ParsedUrl;

/// Step of an exchange, reported in logs when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Connecting,
    Sending,
    Receiving,
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Connecting => "connecting",
            Stage::Sending => "sending",
            Stage::Receiving => "receiving",
            Stage::Parsing => "parsing",
        };
        f.write_str(name)
    }
}

/// Synchronous GET/POST client. One connection per call.
#[derive(Debug, Clone)]
pub struct HttpClient<T = TcpTransport> {
    transport: T,
    config: ClientConfig,
}

impl HttpClient<TcpTransport> {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            transport: TcpTransport::new(&config),
            config,
        }
    }
}

impl Default for HttpClient<TcpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> HttpClient<T> {
    /// Use a caller-supplied transport.
    ///
    /// Only the receive settings of `config` (`recv_chunk_size`,
    /// `max_response_bytes`) are applied here. Deadlines belong to the
    /// transport, so the timeout fields must be configured on `transport`
    /// itself, e.g. `TcpTransport::new(&config)`.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Configuration the client was built with. See `with_transport` for
    /// which fields a caller-supplied transport honours.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get(&self, url: &str, args: impl Into<RequestArgs>) -> Result<HttpResponse, ClientError> {
        self.execute(HttpMethod::Get, url, &args.into())
    }

    pub fn post(&self, url: &str, args: impl Into<RequestArgs>) -> Result<HttpResponse, ClientError> {
        self.execute(HttpMethod::Post, url, &args.into())
    }

    /// Dispatch to `get` or `post` by `method`.
    pub fn command(
        &self,
        url: &str,
        method: HttpMethod,
        args: impl Into<RequestArgs>,
    ) -> Result<HttpResponse, ClientError> {
        self.execute(method, url, &args.into())
    }

    fn execute(&self, method: HttpMethod, url: &str, args: &RequestArgs) -> Result<HttpResponse, ClientError> {
        let parsed = ParsedUrl::parse(url)?;
        let request = HttpRequest::build(method, &parsed, args);

        let span = tracing::debug_span!("request", %method, host = %parsed.host, port = parsed.port);
        let _enter = span.enter();

        let target = in_stage(Stage::Resolving, || self.transport.resolve(&parsed.host, parsed.port))?;
        let mut conn = in_stage(Stage::Connecting, || self.transport.open(target))?;

        let received = self.exchange(&mut conn, &request);
        conn.close();
        let raw = received?;

        let decoded = decode(raw);
        if decoded.encoding == Encoding::Latin1 {
            tracing::debug!("response is not valid UTF-8, decoded as Latin-1");
        }

        let response = in_stage(Stage::Parsing, || HttpResponse::parse(&decoded.text))?;
        tracing::debug!(code = response.code, body_len = response.body.len(), "response parsed");
        Ok(response)
    }

    fn exchange(&self, conn: &mut T::Connection, request: &HttpRequest) -> Result<Vec<u8>, ClientError> {
        let bytes = request.to_bytes();
        in_stage(Stage::Sending, || conn.send(&bytes))?;
        in_stage(Stage::Receiving, || {
            receive_all(conn, self.config.recv_chunk_size, self.config.max_response_bytes)
        })
    }
}

fn in_stage<R>(stage: Stage, f: impl FnOnce() -> Result<R, ClientError>) -> Result<R, ClientError> {
    tracing::debug!(%stage, "entering stage");
    f().inspect_err(|err| tracing::warn!(%stage, %err, "request failed"))
}

/// Read fixed-size chunks until the peer closes the connection.
fn receive_all<C: Connection>(conn: &mut C, chunk_size: usize, limit: usize) -> Result<Vec<u8>, ClientError> {
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let n = conn.recv(&mut chunk)?;
        if n == 0 {
            return Ok(buffer);
        }
        if buffer.len() + n > limit {
            return Err(ClientError::TransmissionFailure(format!(
                "response exceeds {limit} bytes"
            )));
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
}
