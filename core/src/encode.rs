//! Query-string and urlencoded-body encoding.
//!
//! # Design
//! Caller mappings and URL-embedded pairs are escaped with the
//! `application/x-www-form-urlencoded` byte serializer, key and value
//! independently. String arguments are treated as already encoded: the only
//! rewrite is space to `+`, so encoding them twice is a no-op.
//!
//! Argument precedence per slot:
//! - GET query: caller mapping, then URL-embedded query, then caller string.
//! - POST body: caller mapping, then caller string. The URL-embedded query
//!   always stays on the request target.

use url::form_urlencoded::byte_serialize;

use crate::types::{Params, RequestArgs};

/// Encoded pieces of a POST: the request-target suffix and the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostParts {
    pub query: String,
    pub body: String,
}

/// Encode every pair as `key=value`, joined with `&`, in insertion order.
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Normalise a pre-encoded `k1=v1&k2=v2` string. Spaces become `+`.
pub fn encode_query_string(query: &str) -> String {
    query.replace(' ', "+")
}

/// Encode caller arguments on their own, without any fallback.
pub fn encode_args(args: &RequestArgs) -> String {
    match args {
        RequestArgs::None => String::new(),
        RequestArgs::Form(params) => encode_params(params),
        RequestArgs::Query(query) => encode_query_string(query),
    }
}

/// Query suffix for a GET target: empty, or `?` followed by the winning source.
pub fn query_suffix(args: &RequestArgs, url_query: &Params) -> String {
    let encoded = match args {
        RequestArgs::Form(params) if !params.is_empty() => encode_params(params),
        _ if !url_query.is_empty() => encode_params(url_query),
        RequestArgs::Query(query) if !query.is_empty() => encode_query_string(query),
        _ => String::new(),
    };
    with_question_mark(encoded)
}

/// Target suffix and body for a POST.
pub fn post_parts(args: &RequestArgs, url_query: &Params) -> PostParts {
    PostParts {
        query: with_question_mark(encode_params(url_query)),
        body: encode_args(args),
    }
}

fn escape(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn with_question_mark(encoded: String) -> String {
    if encoded.is_empty() {
        encoded
    } else {
        format!("?{encoded}")
    }
}
