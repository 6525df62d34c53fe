use std::collections::HashMap;

use thiserror::Error;

use crate::http::request::{Method, Request};

/// Marks the end of the header section.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("unknown method")]
    InvalidMethod,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("invalid Content-Length")]
    InvalidContentLength,
    #[error("header section exceeds {0} bytes")]
    HeaderTooLarge(usize),
    #[error("declared body exceeds {0} bytes")]
    BodyTooLarge(usize),
}

/// Searches `buf` for the header terminator, starting at `from`.
///
/// `from` is where the previous search stopped. The search backs up three
/// bytes so a terminator split across two reads is still found. Returns the
/// index just past the terminator.
pub fn find_header_end(buf: &[u8], from: usize) -> Option<usize> {
    let start = from.saturating_sub(HEADER_TERMINATOR.len() - 1);
    buf.get(start..)?
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| start + pos + HEADER_TERMINATOR.len())
}

/// Parses a complete header section (terminator included or not) into a
/// [`Request`] with an empty body. The body is filled once all
/// `Content-Length` bytes have arrived.
pub fn parse_request_head(head: &[u8]) -> Result<Request, ParseError> {
    let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = head.split("\r\n");

    // Request line
    let mut parts = lines
        .next()
        .ok_or(ParseError::InvalidRequest)?
        .split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;
    if parts.next().is_some() {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::parse(method_str).ok_or(ParseError::InvalidMethod)?;

    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }

        headers.insert(key.to_string(), value.trim().to_string());
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, v)| {
            v.parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength)
        })
        .transpose()?
        .unwrap_or(0);

    Ok(Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        content_length,
        body: Vec::new(),
    })
}
