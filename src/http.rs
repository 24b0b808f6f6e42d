//! HTTP request-line / status-line parsing: dispatches to the
//! URL and MIME parsers and enforces the Host / Content-Length /
//! Transfer-Encoding framing invariants before a message is `done`.

use crate::config::ParserConfig;
use crate::error::{HdrError, ParseStatus, Result};
use crate::headers::{Parser as LineParser, Side};
use crate::heap::{HeaderHeap, StrRef};
use crate::mime::MimeHeader;
use crate::token;
use crate::url::{self, Url};
use bstr::ByteSlice;
use log::{debug, warn};

/// Maximum bytes a single request/status line may occupy before more input
/// is read.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    Request,
    Response,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

/// The method-and-URL or status-and-reason union of an HTTP start line,
/// modeled as an enum since Rust has no need for a tagged-union-by-polarity
/// trick.
pub enum StartLine {
    Request {
        method: StrRef,
        /// Set when the method matched a well-known token (the
        /// interned-method-index); `GET`/`POST`/etc. serialize back using
        /// the interned, canonically-cased bytes when this is `Some`.
        method_wks: Option<usize>,
        url: Url,
    },
    Response {
        status: u16,
        reason: StrRef,
    },
}

pub struct HttpMessage {
    pub polarity: Polarity,
    pub version: HttpVersion,
    pub mime: MimeHeader,
    pub start: StartLine,
}

impl HttpMessage {
    pub fn method_bytes<'h>(&self, heap: &'h HeaderHeap, f: impl FnOnce(&[u8])) {
        if let StartLine::Request { method, .. } = &self.start {
            heap.with_bytes(method, f);
        }
    }
}

/// Finds the next complete line (CRLF or bare LF), returning the line
/// without its terminator and the number of input bytes it and its
/// terminator consumed. `None` means more bytes are needed; `Err` means the
/// line already exceeds `max_len` with no terminator in sight.
fn scan_line(input: &[u8], max_len: usize) -> Result<Option<(&[u8], usize)>> {
    match input.find_byte(b'\n') {
        Some(pos) => {
            if pos > max_len {
                return Err(HdrError::Malformed);
            }
            let mut line = &input[..pos];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            Ok(Some((line, pos + 1)))
        }
        None => {
            if input.len() > max_len {
                Err(HdrError::Malformed)
            } else {
                Ok(None)
            }
        }
    }
}

fn parse_version_tail(tail: &[u8]) -> Result<HttpVersion> {
    if tail.len() != 8 || !tail.starts_with(b"HTTP/") {
        return Err(HdrError::Malformed);
    }
    let major = tail[5];
    let dot = tail[6];
    let minor = tail[7];
    if dot != b'.' || !major.is_ascii_digit() || !minor.is_ascii_digit() {
        return Err(HdrError::Malformed);
    }
    let version = HttpVersion {
        major: major - b'0',
        minor: minor - b'0',
    };
    if version.major == 0 && version.minor == 9 {
        // HTTP/0.9 has no headers and no status line; out of scope for a
        // parser that always expects a MIME block to follow.
        return Err(HdrError::Malformed);
    }
    Ok(version)
}

/// `GET <url> HTTP/1.<d>` when the line is at least 16 bytes; falls through
/// to the slow path on any mismatch.
fn fast_path_request(line: &[u8]) -> Option<(&[u8], &[u8], HttpVersion)> {
    if line.len() < 16 || !line.starts_with(b"GET ") {
        return None;
    }
    let tail = &line[line.len() - 9..];
    if !tail.starts_with(b" HTTP/1.") {
        return None;
    }
    let digit = tail[8];
    if !digit.is_ascii_digit() {
        return None;
    }
    let url = &line[4..line.len() - 9];
    if url.is_empty() {
        return None;
    }
    Some((
        b"GET",
        url,
        HttpVersion {
            major: 1,
            minor: digit - b'0',
        },
    ))
}

fn slow_path_request(line: &[u8]) -> Result<(&[u8], &[u8], HttpVersion)> {
    let sp1 = line.find_byte(b' ').ok_or(HdrError::Malformed)?;
    let method = &line[..sp1];
    let rest = &line[sp1 + 1..];
    let sp2 = rest.rfind_byte(b' ').ok_or(HdrError::Malformed)?;
    let url = &rest[..sp2];
    let version = parse_version_tail(&rest[sp2 + 1..])?;
    if method.is_empty() || url.is_empty() {
        return Err(HdrError::Malformed);
    }
    Ok((method, url, version))
}

/// `HTTP/1.<d> <ddd> ...` when the line is at least 13 bytes.
fn fast_path_response(line: &[u8]) -> Option<(HttpVersion, u16, &[u8])> {
    if line.len() < 13 || !line.starts_with(b"HTTP/1.") {
        return None;
    }
    let digit = line[7];
    if !digit.is_ascii_digit() || line.get(8) != Some(&b' ') {
        return None;
    }
    let status_bytes = line.get(9..12)?;
    if !status_bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let status: u16 = std::str::from_utf8(status_bytes).ok()?.parse().ok()?;
    let reason = if line.len() > 13 { &line[13..] } else { &line[12..12] };
    Some((
        HttpVersion {
            major: 1,
            minor: digit - b'0',
        },
        status,
        reason,
    ))
}

fn slow_path_response(line: &[u8]) -> Result<(HttpVersion, u16, &[u8])> {
    let sp1 = line.find_byte(b' ').ok_or(HdrError::Malformed)?;
    let version = parse_version_tail(&line[..sp1])?;
    let rest = &line[sp1 + 1..];
    let sp2 = rest.find_byte(b' ').unwrap_or(rest.len());
    let status_bytes = &rest[..sp2];
    if status_bytes.len() != 3 || !status_bytes.iter().all(u8::is_ascii_digit) {
        return Err(HdrError::Malformed);
    }
    let status: u16 = std::str::from_utf8(status_bytes)
        .unwrap()
        .parse()
        .map_err(|_| HdrError::Malformed)?;
    let reason = rest.get(sp2 + 1..).unwrap_or(b"");
    Ok((version, status, reason))
}

fn looks_absolute(url_bytes: &[u8]) -> bool {
    let authority_marker = url_bytes.find_byteset(b"/?#").unwrap_or(url_bytes.len());
    url_bytes[..authority_marker].contains_str("://")
}

/// Validates the `Host` header against one already-inserted
/// field: splits on the first colon not inside brackets, requires an
/// all-digit port in `1..=65535`, and requires the address to consist of
/// [`crate::util::is_host_char`] bytes with nothing but whitespace after.
fn validate_host(heap: &HeaderHeap, mime: &MimeHeader) -> Result<()> {
    let first = match mime.find_field(heap, b"Host") {
        crate::error::FieldResult::Ok(id) => id,
        crate::error::FieldResult::NoSuchField => return Ok(()),
    };
    if mime.get(first).next_dup.is_some() {
        warn!("duplicate Host header");
        return Err(HdrError::Malformed);
    }
    heap.with_bytes(&mime.get(first).value, |value| {
        let mut in_brackets = false;
        let mut colon_pos = None;
        for (i, &c) in value.iter().enumerate() {
            match c {
                b'[' => in_brackets = true,
                b']' => in_brackets = false,
                b':' if !in_brackets => {
                    colon_pos = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let (addr, rest) = match colon_pos {
            Some(i) => (&value[..i], &value[i + 1..]),
            None => (value, &value[0..0]),
        };
        if !addr.iter().all(|&c| crate::util::is_host_char(c)) {
            return Err(HdrError::Malformed);
        }
        if !rest.is_empty() {
            let port_end = rest.find_not_byteset(b"0123456789").unwrap_or(rest.len());
            let (port, trailing) = rest.split_at(port_end);
            if port.is_empty() || !trailing.iter().all(u8::is_ascii_whitespace) {
                return Err(HdrError::Malformed);
            }
            let parsed: u32 = std::str::from_utf8(port)
                .map_err(|_| HdrError::Malformed)?
                .parse()
                .map_err(|_| HdrError::Malformed)?;
            if parsed == 0 || parsed > 65535 {
                return Err(HdrError::Malformed);
            }
        }
        Ok(())
    })
}

/// Applies the Transfer-Encoding/Content-Length resolution: TE wins
/// outright (every Content-Length is deleted), a non-digit
/// Content-Length is an error, and differing duplicate Content-Lengths are
/// an error (identical duplicates collapse silently).
fn validate_content_framing(heap: &HeaderHeap, mime: &mut MimeHeader) -> Result<()> {
    if mime.find_field(heap, b"Transfer-Encoding").is_ok() {
        if mime.find_field(heap, b"Content-Length").is_ok() {
            debug!("Transfer-Encoding present; dropping Content-Length");
            mime.delete(heap, b"Content-Length");
        }
        return Ok(());
    }
    let first = match mime.find_field(heap, b"Content-Length") {
        crate::error::FieldResult::Ok(id) => id,
        crate::error::FieldResult::NoSuchField => return Ok(()),
    };
    let first_value = {
        let mut v = Vec::new();
        heap.with_bytes(&mime.get(first).value, |b| v.extend_from_slice(b));
        v
    };
    // A leading `+` is not a digit, so `+5` is rejected rather than
    // accepted as an unsigned form.
    if first_value.is_empty() || !first_value.iter().all(u8::is_ascii_digit) {
        warn!("non-digit Content-Length");
        return Err(HdrError::Malformed);
    }
    let mut cur = mime.get(first).next_dup;
    while let Some(id) = cur {
        let dup_value = {
            let mut v = Vec::new();
            heap.with_bytes(&mime.get(id).value, |b| v.extend_from_slice(b));
            v
        };
        if dup_value != first_value {
            warn!("conflicting duplicate Content-Length values");
            return Err(HdrError::Malformed);
        }
        cur = mime.get(id).next_dup;
    }
    Ok(())
}

/// Rejects once `consumed` bytes of start-line-plus-header-block exceed
/// `max`, whether or not the block has finished parsing: while it is still
/// incomplete every byte fed so far is header-block-in-progress (no body
/// can have started before framing is known), so the check applies equally
/// to the `Cont` and `Done` paths.
fn enforce_header_budget(consumed: usize, max: usize) -> Result<()> {
    if consumed > max {
        return Err(HdrError::Malformed);
    }
    Ok(())
}

/// Parses a complete MIME block starting at `input` using the header-line
/// scanner, inserting every field into `mime`. Returns the number of bytes
/// consumed, or `None` if the block is not yet complete.
fn parse_mime_block(heap: &HeaderHeap, side: Side, input: &[u8], mime: &mut MimeHeader) -> Result<Option<usize>> {
    let parser = LineParser::new(side);
    let (rest, (fields, complete)) = match parser.headers()(input) {
        Ok(v) => v,
        Err(nom::Err::Incomplete(_)) => return Ok(None),
        Err(_) => return Err(HdrError::Malformed),
    };
    if !complete {
        return Ok(None);
    }
    for field in fields {
        mime.insert(heap, &field.name.name, &field.value.value)?;
    }
    Ok(Some(input.len() - rest.len()))
}

/// Parses one complete HTTP request from `input`.
///
/// Returns `(ParseStatus::Cont, None, 0)` when more bytes are required,
/// `(ParseStatus::Done, Some(msg), consumed)` on success, and propagates a
/// malformed-input error otherwise.
pub fn parse_request(
    heap: &HeaderHeap,
    input: &[u8],
    config: &ParserConfig,
) -> Result<(ParseStatus, Option<HttpMessage>, usize)> {
    let Some((line, line_consumed)) = scan_line(input, config.max_request_header_size.min(MAX_LINE_LEN))? else {
        return Ok((ParseStatus::Cont, None, 0));
    };
    let (method, url_bytes, version) = fast_path_request(line)
        .map(Ok)
        .unwrap_or_else(|| slow_path_request(line))?;

    let url = if looks_absolute(url_bytes) {
        url::parse_absolute(heap, url_bytes, config.strict_uri_parsing)?
    } else {
        url::parse_origin_form(heap, url_bytes, config.strict_uri_parsing)?
    };

    let method_wks = token::tokenize_string(method).filter(|&i| token::metadata_of(i).ttype == token::TokenType::Method);
    let method_ref = heap.localize(method)?;

    let mut mime = MimeHeader::new();
    let rest = &input[line_consumed..];
    let mime_consumed = match parse_mime_block(heap, Side::Request, rest, &mut mime)? {
        Some(n) => n,
        None => {
            enforce_header_budget(line_consumed + rest.len(), config.max_request_header_size)?;
            return Ok((ParseStatus::Cont, None, 0));
        }
    };
    enforce_header_budget(line_consumed + mime_consumed, config.max_request_header_size)?;

    validate_host(heap, &mime)?;
    validate_content_framing(heap, &mut mime)?;

    let msg = HttpMessage {
        polarity: Polarity::Request,
        version,
        mime,
        start: StartLine::Request {
            method: method_ref,
            method_wks,
            url,
        },
    };
    Ok((ParseStatus::Done, Some(msg), line_consumed + mime_consumed))
}

/// Parses one complete HTTP response from `input`. See [`parse_request`]
/// for the return-value convention.
pub fn parse_response(
    heap: &HeaderHeap,
    input: &[u8],
    config: &ParserConfig,
) -> Result<(ParseStatus, Option<HttpMessage>, usize)> {
    let Some((line, line_consumed)) = scan_line(input, config.max_response_header_size.min(MAX_LINE_LEN))? else {
        return Ok((ParseStatus::Cont, None, 0));
    };
    let (version, status, reason) = fast_path_response(line)
        .map(Ok)
        .unwrap_or_else(|| slow_path_response(line))?;
    let reason_ref = heap.localize(reason)?;

    let mut mime = MimeHeader::new();
    let rest = &input[line_consumed..];
    let mime_consumed = match parse_mime_block(heap, Side::Response, rest, &mut mime)? {
        Some(n) => n,
        None => {
            enforce_header_budget(line_consumed + rest.len(), config.max_response_header_size)?;
            return Ok((ParseStatus::Cont, None, 0));
        }
    };
    enforce_header_budget(line_consumed + mime_consumed, config.max_response_header_size)?;

    let msg = HttpMessage {
        polarity: Polarity::Response,
        version,
        mime,
        start: StartLine::Response {
            status,
            reason: reason_ref,
        },
    };
    Ok((ParseStatus::Done, Some(msg), line_consumed + mime_consumed))
}

/// Serializes a parsed message back to wire form. This is byte-identical
/// to well-formed input up to: canonical
/// method/scheme capitalization, CRLF line endings, LWS-folding removal,
/// and a Content-Length dropped in favor of Transfer-Encoding.
pub fn serialize(heap: &HeaderHeap, msg: &HttpMessage) -> Vec<u8> {
    let mut out = Vec::new();
    match &msg.start {
        StartLine::Request { method, method_wks, url } => {
            if let Some(idx) = method_wks {
                out.extend_from_slice(token::index_to_interned_pointer(*idx));
            } else {
                heap.with_bytes(method, |b| out.extend_from_slice(b));
            }
            out.push(b' ');
            out.extend_from_slice(url::print(heap, url).as_bytes());
            out.extend_from_slice(format!(" HTTP/{}.{}\r\n", msg.version.major, msg.version.minor).as_bytes());
        }
        StartLine::Response { status, reason } => {
            out.extend_from_slice(format!("HTTP/{}.{} {:03} ", msg.version.major, msg.version.minor, status).as_bytes());
            heap.with_bytes(reason, |b| out.extend_from_slice(b));
            out.extend_from_slice(b"\r\n");
        }
    }
    for (_, field) in msg.mime.iter() {
        heap.with_bytes(&field.name, |b| out.extend_from_slice(b));
        out.extend_from_slice(b": ");
        heap.with_bytes(&field.value, |b| out.extend_from_slice(b));
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_get_request() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let input = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";
        let (status, msg, consumed) = parse_request(&heap, input, &config).unwrap();
        assert_eq!(status, ParseStatus::Done);
        assert_eq!(consumed, input.len());
        let msg = msg.unwrap();
        assert_eq!(msg.version, HttpVersion { major: 1, minor: 1 });
        match &msg.start {
            StartLine::Request { method, url, .. } => {
                heap.with_bytes(method, |b| assert_eq!(b, b"GET"));
                assert!(url.path.is_none());
            }
            _ => panic!("expected request"),
        }
        assert!(msg.mime.has_slot(0));
    }

    #[test]
    fn rejects_http_0_9() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        assert!(parse_request(&heap, b"GET / HTTP/0.9\r\n\r\n", &config).is_err());
    }

    #[test]
    fn transfer_encoding_erases_content_length() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let input = b"POST / HTTP/1.1\r\nHost: a\r\nTransfer-Encoding: chunked\r\nContent-Length: 5\r\n\r\n";
        let (status, msg, _) = parse_request(&heap, input, &config).unwrap();
        assert_eq!(status, ParseStatus::Done);
        let msg = msg.unwrap();
        assert!(matches!(
            msg.mime.find_field(&heap, b"Content-Length"),
            crate::error::FieldResult::NoSuchField
        ));
    }

    #[test]
    fn parses_simple_response() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let input = b"HTTP/1.1 200 OK\r\n\r\n";
        let (status, msg, consumed) = parse_response(&heap, input, &config).unwrap();
        assert_eq!(status, ParseStatus::Done);
        assert_eq!(consumed, input.len());
        match msg.unwrap().start {
            StartLine::Response { status, reason } => {
                assert_eq!(status, 200);
                heap.with_bytes(&reason, |b| assert_eq!(b, b"OK"));
            }
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn duplicate_host_is_error() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let input = b"GET / HTTP/1.1\r\nHost: a\r\nHost: b\r\n\r\n";
        assert!(parse_request(&heap, input, &config).is_err());
    }

    #[test]
    fn oversized_header_block_is_rejected_even_with_a_small_start_line() {
        let heap = HeaderHeap::new(4096);
        let mut config = ParserConfig::default();
        config.max_request_header_size = 64;
        let mut input = b"GET / HTTP/1.1\r\nHost: a\r\nX-Filler: ".to_vec();
        input.extend_from_slice(&vec![b'X'; 100]);
        input.extend_from_slice(b"\r\n\r\n");
        // Start line alone is well under the 64-byte budget; the header
        // block as a whole is not.
        assert!(parse_request(&heap, &input, &config).is_err());
    }

    #[test]
    fn incomplete_header_block_already_over_budget_is_rejected() {
        let heap = HeaderHeap::new(4096);
        let mut config = ParserConfig::default();
        config.max_request_header_size = 32;
        let mut input = b"GET / HTTP/1.1\r\nX-Filler: ".to_vec();
        input.extend_from_slice(&vec![b'X'; 100]);
        // No terminating CRLF CRLF yet: the header block is still
        // incomplete, but already larger than the budget.
        assert!(parse_request(&heap, &input, &config).is_err());
    }

    #[test]
    fn needs_more_bytes_for_partial_request() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let (status, msg, consumed) = parse_request(&heap, b"GET / HTTP/1.1\r\nHost: a\r\n", &config).unwrap();
        assert_eq!(status, ParseStatus::Cont);
        assert!(msg.is_none());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn round_trips_well_formed_request() {
        let heap = HeaderHeap::new(1024);
        let config = ParserConfig::default();
        let input: &[u8] = b"GET /a?x=1 HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let (_, msg, _) = parse_request(&heap, input, &config).unwrap();
        let out = serialize(&heap, &msg.unwrap());
        assert_eq!(out, input);
    }
}
