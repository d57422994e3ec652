//! HTTP/1.1 request construction.
//!
//! # Design
//! `HttpRequest` describes a request as plain data: method, request target,
//! ordered headers and optional body. `to_bytes` renders the exact wire text
//! that goes out in a single send. Building a request never touches the
//! network, so every byte the client transmits can be checked in tests.

use std::fmt;
use std::str::FromStr;

use crate::encode::{post_parts, query_suffix};
use crate::types::RequestArgs;
use crate::uri::ParsedUrl;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method name is neither GET nor POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported method {:?}, expected GET or POST", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(HttpMethod::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(HttpMethod::Post)
        } else {
            Err(UnknownMethod(s.to_string()))
        }
    }
}

/// An HTTP/1.1 request described as plain data.
///
/// Built by `HttpRequest::build`. Headers are kept in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Assemble the request for `method` against `url` carrying `args`.
    ///
    /// GET puts the winning argument source in the query. POST keeps the
    /// URL-embedded query on the target and sends `args` as a urlencoded
    /// body whose `Content-Length` is its UTF-8 byte length.
    pub fn build(method: HttpMethod, url: &ParsedUrl, args: &RequestArgs) -> Self {
        match method {
            HttpMethod::Get => HttpRequest {
                method,
                target: format!("{}{}", url.path, query_suffix(args, &url.query)),
                headers: vec![
                    ("Host".to_string(), url.host.clone()),
                    ("Connection".to_string(), "close".to_string()),
                ],
                body: None,
            },
            HttpMethod::Post => {
                let parts = post_parts(args, &url.query);
                HttpRequest {
                    method,
                    target: format!("{}{}", url.path, parts.query),
                    headers: vec![
                        ("Host".to_string(), url.host.clone()),
                        ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
                        ("Connection".to_string(), "close".to_string()),
                        ("Content-Length".to_string(), parts.body.len().to_string()),
                    ],
                    body: Some(parts.body),
                }
            }
        }
    }

    /// Render the request line, headers and body as wire bytes.
    ///
    /// Every line ends in `\r\n`. A body is followed by one more `\r\n` that
    /// `Content-Length` does not count.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1\r\n", self.method, self.target);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        if let Some(body) = &self.body {
            out.push_str(body);
            out.push_str("\r\n");
        }
        out.into_bytes()
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
