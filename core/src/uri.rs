//! URL decomposition into the pieces an HTTP/1.1 request line needs.

use url::Url;

use crate::error::ClientError;
use crate::types::Params;

/// Port used when the URL does not name one, regardless of scheme.
pub const DEFAULT_PORT: u16 = 80;

/// Host, port, path and decoded query pairs of a request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Params,
}

impl ParsedUrl {
    /// Decompose `input` using standard URL grammar.
    ///
    /// Query pairs are percent- and plus-decoded. Pairs with an empty value
    /// are dropped and a repeated key overwrites the earlier value in place.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let url = Url::parse(input).map_err(|e| ClientError::InvalidUrl(format!("{input}: {e}")))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ClientError::InvalidUrl(format!("{input}: missing host"))),
        };

        let path = match url.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        let query = url
            .query_pairs()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        Ok(Self {
            host,
            port: explicit_port(&url, input).unwrap_or(DEFAULT_PORT),
            path,
            query,
        })
    }
}

/// Port written in the URL, if any.
///
/// `Url` drops a port equal to the scheme's known default, so `:443` on an
/// https URL only survives as text in the authority of `input`.
fn explicit_port(url: &Url, input: &str) -> Option<u16> {
    if let Some(port) = url.port() {
        return Some(port);
    }
    let default = url.port_or_known_default()?;
    authority_has_port(input).then_some(default)
}

/// True when the authority of `input` ends in `:<digits>`.
fn authority_has_port(input: &str) -> bool {
    let Some((_, rest)) = input.trim_start().split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    // Skip past a bracketed IPv6 literal before looking for the colon.
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    match after_host.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
