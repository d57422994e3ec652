//! Socket-level transport consumed by `HttpClient`.
//!
//! # Design
//! A `Transport` resolves hosts and opens connections; each `Connection` is
//! an owned value threaded through `send`/`recv` and consumed by `close`.
//! The client never stores a connection, so one client value can serve
//! many callers. Tests plug in a scripted transport through the same traits.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::Target;

/// Name resolution and connection establishment.
pub trait Transport {
    type Connection: Connection;

    /// Resolve `host` to an IPv4 endpoint on `port`.
    fn resolve(&self, host: &str, port: u16) -> Result<Target, ClientError>;

    /// Open a fresh connection to `target`.
    fn open(&self, target: Target) -> Result<Self::Connection, ClientError>;
}

/// One open byte stream to a peer.
pub trait Connection {
    /// Send all of `bytes`.
    fn send(&mut self, bytes: &[u8]) -> Result<(), ClientError>;

    /// Read into `buf`. `Ok(0)` means the peer closed the stream.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ClientError>;

    /// Release the connection.
    fn close(self);
}

/// Blocking TCP transport backed by `std::net`.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpTransport {
    /// A zero duration in `config` means no deadline for that operation.
    pub fn new(config: &ClientConfig) -> Self {
        let nonzero = |d: Duration| (!d.is_zero()).then_some(d);
        Self {
            connect_timeout: nonzero(config.connect_timeout),
            read_timeout: config.read_timeout.and_then(nonzero),
            write_timeout: config.write_timeout.and_then(nonzero),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;

    fn resolve(&self, host: &str, port: u16) -> Result<Target, ClientError> {
        let failure = |reason: String| ClientError::ResolutionFailure {
            host: host.to_string(),
            reason,
        };

        let addrs = (host, port).to_socket_addrs().map_err(|e| failure(e.to_string()))?;
        addrs
            .filter_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(Target::new(*v4.ip(), v4.port())),
                SocketAddr::V6(_) => None,
            })
            .next()
            .ok_or_else(|| failure("no IPv4 address".to_string()))
    }

    fn open(&self, target: Target) -> Result<TcpConnection, ClientError> {
        let failure = |err: io::Error| match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                ClientError::Timeout(format!("connecting to {target}: {err}"))
            }
            _ => ClientError::ConnectionFailure {
                target: target.to_string(),
                reason: err.to_string(),
            },
        };

        let addr = target.socket_addr();
        let stream = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(failure)?;
        stream.set_read_timeout(self.read_timeout).map_err(failure)?;
        stream.set_write_timeout(self.write_timeout).map_err(failure)?;

        tracing::debug!(%target, "connected");
        Ok(TcpConnection { stream })
    }
}

/// A connected TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Connection for TcpConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.stream
            .write_all(bytes)
            .and_then(|()| self.stream.flush())
            .map_err(|e| ClientError::from_io(&e))
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ClientError> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result.map_err(|e| ClientError::from_io(&e)),
            }
        }
    }

    fn close(self) {
        // NotConnected here only means the peer already tore the socket down.
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            tracing::trace!(%err, "shutdown after exchange");
        }
    }
}
