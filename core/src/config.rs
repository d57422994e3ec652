//! Client configuration.

use std::time::Duration;

/// Deadlines and buffer sizes applied to every exchange.
///
/// `Default` gives bounded values for all deadlines so an unresponsive peer
/// cannot block a call forever. A `None` read or write timeout disables that
/// deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    /// Bytes requested from the transport per receive.
    pub recv_chunk_size: usize,
    /// Largest response accepted before the exchange is aborted.
    pub max_response_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Some(Duration::from_secs(30)),
            write_timeout: Some(Duration::from_secs(30)),
            recv_chunk_size: 1024,
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    /// Use `timeout` for connect, read and write. Zero disables the deadlines.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = Some(timeout);
        self.write_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Chunk size is clamped to at least one byte.
    pub fn with_recv_chunk_size(mut self, size: usize) -> Self {
        self.recv_chunk_size = size.max(1);
        self
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }
}
