//! Error types for the socket HTTP client.
//!
//! # Design
//! Each variant corresponds to the stage of an exchange that failed. Nothing
//! is recovered locally: the client closes any open connection and hands the
//! error back to the caller. Variants carry the underlying message as a
//! `String` so the error stays `Clone` and comparable in tests.

use std::fmt;
use std::io;

/// Errors returned by `HttpClient` and the pure request/response helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The URL could not be parsed or has no host.
    InvalidUrl(String),

    /// The hostname did not resolve to an IPv4 address.
    ResolutionFailure { host: String, reason: String },

    /// The TCP connection was refused or the peer is unreachable.
    ConnectionFailure { target: String, reason: String },

    /// A send or receive failed after the connection was established.
    TransmissionFailure(String),

    /// Connect, read or write exceeded its configured deadline.
    Timeout(String),

    /// The response has no header/body delimiter or no usable status line.
    MalformedResponse(String),
}

impl ClientError {
    /// Classify an I/O error raised mid-exchange.
    pub(crate) fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ClientError::Timeout(err.to_string()),
            _ => ClientError::TransmissionFailure(err.to_string()),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            ClientError::ResolutionFailure { host, reason } => {
                write!(f, "could not resolve {host}: {reason}")
            }
            ClientError::ConnectionFailure { target, reason } => {
                write!(f, "could not connect to {target}: {reason}")
            }
            ClientError::TransmissionFailure(msg) => write!(f, "transmission failed: {msg}"),
            ClientError::Timeout(msg) => write!(f, "timed out: {msg}"),
            ClientError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
