//! Minimal HTTP/1.1 client written directly against TCP sockets.
//!
//! # Overview
//! Shows every byte of a GET or POST exchange: the request line and headers
//! are assembled by hand, sent over a fresh connection, and the response is
//! read until the peer closes it, then split into status code, header block
//! and body.
//!
//! # Design
//! - `ParsedUrl`, the encoders, `HttpRequest` and `HttpResponse::parse` are
//!   pure and never touch the network.
//! - `HttpClient` drives one exchange per call through a `Transport`, which is
//!   the only seam that performs I/O.
//! - Connections are values owned by a single call, never stored on the
//!   client, so one client may be shared between callers.

pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;
pub mod uri;

pub use client::{HttpClient, Stage};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, UnknownMethod};
pub use response::{decode, Decoded, Encoding, HttpResponse};
pub use transport::{Connection, TcpConnection, TcpTransport, Transport};
pub use types::{Params, RequestArgs, Target};
pub use uri::ParsedUrl;
