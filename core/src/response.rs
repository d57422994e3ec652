//! Response decoding and parsing.
//!
//! # Design
//! The received bytes are decoded once, UTF-8 first and Latin-1 second.
//! Latin-1 maps every byte to a code point so decoding never fails. The
//! decoded text is split at the first blank line: the status code comes from
//! the second whitespace token of the status line, not from a fixed offset,
//! so protocol tokens of any length are handled.

use std::fmt;

use serde::Serialize;

use crate::error::ClientError;

const HEADER_BODY_DELIMITER: &str = "\r\n\r\n";

/// Character encoding that produced a `Decoded` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

/// Raw response bytes decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: Encoding,
}

/// Decode `bytes` as UTF-8, falling back to Latin-1.
pub fn decode(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(text) => Decoded {
            text,
            encoding: Encoding::Utf8,
        },
        Err(err) => Decoded {
            text: err.as_bytes().iter().map(|&b| char::from(b)).collect(),
            encoding: Encoding::Latin1,
        },
    }
}

/// A fully received and parsed HTTP response.
///
/// `headers` is the raw header block including the status line, without the
/// trailing blank line. `body` is everything after the first blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub code: u16,
    pub headers: String,
    pub body: String,
}

impl HttpResponse {
    /// Split `raw` into status code, header block and body.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let (headers, body) = raw.split_once(HEADER_BODY_DELIMITER).ok_or_else(|| {
            ClientError::MalformedResponse("no blank line between headers and body".to_string())
        })?;

        Ok(Self {
            code: status_code(headers)?,
            headers: headers.to_string(),
            body: body.to_string(),
        })
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.trim())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n\r\n{}\r\n", self.headers, self.body)
    }
}

fn status_code(headers: &str) -> Result<u16, ClientError> {
    let status_line = headers.lines().next().unwrap_or_default();
    let mut tokens = status_line.split_whitespace();

    match (tokens.next(), tokens.next()) {
        (Some(version), Some(code))
            if version.starts_with("HTTP/")
                && code.len() == 3
                && code.bytes().all(|b| b.is_ascii_digit()) =>
        {
            code.parse()
                .map_err(|_| ClientError::MalformedResponse(format!("bad status code {code:?}")))
        }
        _ => Err(ClientError::MalformedResponse(format!(
            "bad status line {status_line:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_headers_and_body() {
        let raw = "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\n\r\nNot found\r\n";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.code, 404);
        assert_eq!(response.body, "Not found\r\n");
        assert_eq!(response.headers, "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain");
        assert!(!response.is_success());
    }

    #[test]
    fn body_keeps_later_blank_lines() {
        let raw = "HTTP/1.1 200 OK\r\n\r\nfirst\r\n\r\nsecond";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.body, "first\r\n\r\nsecond");
    }

    #[test]
    fn status_code_does_not_depend_on_version_length() {
        let response = HttpResponse::parse("HTTP/1.0 201 Created\r\n\r\n").unwrap();
        assert_eq!(response.code, 201);
        let response = HttpResponse::parse("HTTP/2 204\r\n\r\n").unwrap();
        assert_eq!(response.code, 204);
        assert_eq!(response.body, "");
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let err = HttpResponse::parse("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert!(matches!(HttpResponse::parse(""), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn short_or_garbled_status_line_is_malformed() {
        for raw in [
            "HTTP/1.1\r\n\r\nbody",
            "HTTP/1.1 20\r\n\r\n",
            "HTTP/1.1 2000 OK\r\n\r\n",
            "HTTP/1.1 abc OK\r\n\r\n",
            "SSH-2.0 200 hello\r\n\r\n",
            "\r\n\r\n",
        ] {
            let err = HttpResponse::parse(raw).unwrap_err();
            assert!(matches!(err, ClientError::MalformedResponse(_)), "{raw:?}");
        }
    }

    #[test]
    fn round_trips_rendered_responses() {
        for code in [100u16, 200, 302, 404, 599] {
            let body = "line one\r\nline two\n";
            let response = HttpResponse {
                code,
                headers: format!("HTTP/1.1 {code} Whatever\r\nX-Test: yes"),
                body: body.to_string(),
            };
            let text = format!("{}\r\n\r\n{}", response.headers, response.body);
            let parsed = HttpResponse::parse(&text).unwrap();
            assert_eq!(parsed, response);
        }
    }

    #[test]
    fn display_renders_headers_blank_line_and_body() {
        let response = HttpResponse {
            code: 200,
            headers: "HTTP/1.1 200 OK".to_string(),
            body: "hi".to_string(),
        };
        assert_eq!(response.to_string(), "HTTP/1.1 200 OK\r\n\r\nhi\r\n");
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_skips_status_line() {
        let raw = "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nX-Empty:\r\n\r\n";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(response.header("x-empty"), Some(""));
        assert_eq!(response.header("missing"), None);
        assert!(response.is_success());
    }

    #[test]
    fn decode_prefers_utf8() {
        let decoded = decode("héllo".as_bytes().to_vec());
        assert_eq!(decoded.encoding, Encoding::Utf8);
        assert_eq!(decoded.text, "héllo");
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        let decoded = decode(vec![b'c', b'a', b'f', 0xE9, 0xFF]);
        assert_eq!(decoded.encoding, Encoding::Latin1);
        assert_eq!(decoded.text, "caf\u{e9}\u{ff}");
    }
}
