//! Domain values shared by the encoder, request builder and transport.
//!
//! # Design
//! `Params` keeps insertion order so encoded pairs come out in the order the
//! caller wrote them. Re-inserting a key replaces its value but keeps its
//! original position, which is how both URL-embedded queries and caller
//! mappings collapse duplicate keys.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use indexmap::IndexMap;

/// Resolved connection endpoint for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub address: Ipv4Addr,
    pub port: u16,
}

impl Target {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self { address, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.address, self.port))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Insertion-ordered string mapping of query or form parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Arguments a caller may attach to a GET or POST.
///
/// `Form` pairs are percent-encoded by the client. `Query` is taken as an
/// already-encoded `k1=v1&k2=v2` string whose only rewrite is space to `+`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestArgs {
    #[default]
    None,
    Form(Params),
    Query(String),
}

impl RequestArgs {
    /// True when no pairs would be produced from these arguments.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestArgs::None => true,
            RequestArgs::Form(params) => params.is_empty(),
            RequestArgs::Query(query) => query.is_empty(),
        }
    }
}

impl From<Params> for RequestArgs {
    fn from(params: Params) -> Self {
        RequestArgs::Form(params)
    }
}

impl From<&str> for RequestArgs {
    fn from(query: &str) -> Self {
        RequestArgs::Query(query.to_string())
    }
}

impl From<String> for RequestArgs {
    fn from(query: String) -> Self {
        RequestArgs::Query(query)
    }
}
