//! URL object: parsing, printing, and cache-key digesting.

use crate::error::{HdrError, Result};
use crate::heap::{HeaderHeap, StrRef};
use crate::table::Table;
use crate::token::FnvHasher;
use bstr::ByteSlice;
use lazy_static::lazy_static;
use std::hash::Hasher;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UrlType {
    Http,
    Https,
    Ws,
    Wss,
    Generic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strictness {
    Off,
    Mostly,
    Strict,
}

lazy_static! {
    static ref SCHEME_TYPES: Table<UrlType> = {
        let mut t = Table::with_capacity(5);
        t.add("http", UrlType::Http);
        t.add("https", UrlType::Https);
        t.add("ws", UrlType::Ws);
        t.add("wss", UrlType::Wss);
        t
    };
}

fn canonical_port(url_type: UrlType, port: Option<u16>) -> u16 {
    match (url_type, port) {
        (_, Some(p)) => p,
        (UrlType::Http, None) => 80,
        (UrlType::Https, None) => 443,
        (UrlType::Ws, None) => 80,
        (UrlType::Wss, None) => 443,
        (UrlType::Generic, None) => 0,
    }
}

/// Fixed-size struct with ten (pointer, length) component pairs.
/// Components live as `Option<StrRef>` rather than raw `(ptr, len)` pairs,
/// with `None` standing in for an absent component instead of a
/// zero-length marker.
#[derive(Clone)]
pub struct Url {
    pub url_type: UrlType,
    pub port: u16,
    pub scheme: Option<StrRef>,
    pub user: Option<StrRef>,
    pub password: Option<StrRef>,
    pub host: Option<StrRef>,
    pub port_text: Option<StrRef>,
    pub path: Option<StrRef>,
    pub params: Option<StrRef>,
    pub query: Option<StrRef>,
    pub fragment: Option<StrRef>,
    /// `false` once any setter has run since the cached print was built.
    pub clean: bool,
}

impl Url {
    fn empty() -> Self {
        Self {
            url_type: UrlType::Generic,
            port: 0,
            scheme: None,
            user: None,
            password: None,
            host: None,
            port_text: None,
            path: None,
            params: None,
            query: None,
            fragment: None,
            clean: true,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }
}

fn is_scheme_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.')
}

fn validate_strict(bytes: &[u8], strictness: Strictness) -> Result<()> {
    match strictness {
        Strictness::Off => Ok(()),
        Strictness::Mostly => {
            if bytes.iter().any(|c| c.is_ascii_whitespace() || !c.is_ascii_graphic() && *c != b' ')
            {
                return Err(HdrError::Malformed);
            }
            Ok(())
        }
        Strictness::Strict => {
            if bytes.iter().any(|c| !crate::util::is_uri_strict_char(*c)) {
                return Err(HdrError::Malformed);
            }
            Ok(())
        }
    }
}

/// Splits an authority component (`user:pass@host:port` or `host:port`,
/// with the host possibly a bracketed IPv6 literal) into its parts.
struct Authority<'a> {
    user: Option<&'a [u8]>,
    password: Option<&'a [u8]>,
    host: &'a [u8],
    port: Option<&'a [u8]>,
}

fn parse_authority(input: &[u8]) -> Result<Authority<'_>> {
    let (userinfo, hostport) = match input.rfind_byte(b'@') {
        Some(i) => (Some(&input[..i]), &input[i + 1..]),
        None => (None, input),
    };
    let (user, password) = match userinfo {
        Some(u) => match u.find_byte(b':') {
            Some(i) => (Some(&u[..i]), Some(&u[i + 1..])),
            None => (Some(u), None),
        },
        None => (None, None),
    };

    let (host, port) = if hostport.starts_with_str("[") {
        // IPv6 literal: count colons inside the brackets (max 8), then the
        // bracket close marks the end of host; anything after an optional
        // ':' is the port.
        let close = hostport.find_byte(b']').ok_or(HdrError::Malformed)?;
        let inside = &hostport[1..close];
        if inside.iter().filter(|&&c| c == b':').count() > 8 {
            return Err(HdrError::Malformed);
        }
        let host = &hostport[..close + 1];
        let rest = &hostport[close + 1..];
        let port = if let Some(stripped) = rest.strip_prefix(b":") {
            Some(stripped)
        } else if rest.is_empty() {
            None
        } else {
            return Err(HdrError::Malformed);
        };
        (host, port)
    } else {
        match hostport.find_byte(b':') {
            Some(i) => (&hostport[..i], Some(&hostport[i + 1..])),
            None => (hostport, None),
        }
    };

    if host.is_empty() {
        return Err(HdrError::Malformed);
    }
    Ok(Authority {
        user,
        password,
        host,
        port,
    })
}

/// Parses the absolute form `scheme://authority[/path][;params][?query][#fragment]`.
pub fn parse_absolute(heap: &HeaderHeap, input: &[u8], strictness: Strictness) -> Result<Url> {
    let scheme_end = input
        .find_byte(b':')
        .filter(|&i| i > 0 && input[..i].iter().all(|&c| is_scheme_char(c)))
        .ok_or(HdrError::Malformed)?;
    if !input[scheme_end..].starts_with_str("://") {
        return Err(HdrError::Malformed);
    }
    let scheme_bytes = &input[..scheme_end];
    let rest = &input[scheme_end + 3..];

    let mut url = Url::empty();
    url.url_type = SCHEME_TYPES
        .get_nocase(scheme_bytes)
        .map(|(_, t)| *t)
        .unwrap_or(UrlType::Generic);
    // Schemes are a well-known token set; print canonically
    // cased rather than preserving whatever casing the input used.
    let canonical_scheme = crate::token::tokenize_string(scheme_bytes)
        .filter(|&i| crate::token::metadata_of(i).ttype == crate::token::TokenType::Scheme)
        .map(crate::token::index_to_interned_pointer)
        .unwrap_or(scheme_bytes);
    url.scheme = Some(heap.localize(canonical_scheme)?);

    let authority_end = rest.find_byteset(b"/;?#").unwrap_or(rest.len());
    let authority = parse_authority(&rest[..authority_end])?;
    validate_strict(authority.host, strictness)?;

    url.host = Some(heap.localize(authority.host)?);
    if let Some(u) = authority.user {
        url.user = Some(heap.localize(u)?);
    }
    if let Some(p) = authority.password {
        url.password = Some(heap.localize(p)?);
    }
    if let Some(p) = authority.port {
        if p.is_empty() || !p.iter().all(u8::is_ascii_digit) {
            return Err(HdrError::Malformed);
        }
        let parsed: u32 = std::str::from_utf8(p)
            .unwrap()
            .parse()
            .map_err(|_| HdrError::Malformed)?;
        if parsed == 0 || parsed > 65535 {
            return Err(HdrError::Malformed);
        }
        url.port_text = Some(heap.localize(p)?);
        url.port = parsed as u16;
    }
    url.port = canonical_port(url.url_type, (url.port != 0).then_some(url.port));

    parse_path_onward(heap, &rest[authority_end..], strictness, &mut url)?;
    Ok(url)
}

/// Parses the origin form used on a request line (`/path?query`), with no
/// scheme or authority.
pub fn parse_origin_form(heap: &HeaderHeap, input: &[u8], strictness: Strictness) -> Result<Url> {
    let mut url = Url::empty();
    parse_path_onward(heap, input, strictness, &mut url)?;
    Ok(url)
}

fn parse_path_onward(
    heap: &HeaderHeap,
    mut rest: &[u8],
    strictness: Strictness,
    url: &mut Url,
) -> Result<()> {
    validate_strict(rest, strictness)?;

    let frag_start = rest.find_byte(b'#');
    let fragment = frag_start.map(|i| {
        let f = &rest[i + 1..];
        rest = &rest[..i];
        f
    });

    let query_start = rest.find_byte(b'?');
    let query = query_start.map(|i| {
        let q = &rest[i + 1..];
        rest = &rest[..i];
        q
    });

    let params_start = rest.find_byte(b';');
    let params = params_start.map(|i| {
        let p = &rest[i + 1..];
        rest = &rest[..i];
        p
    });

    let path = rest.strip_prefix(b"/").unwrap_or(rest);

    if !path.is_empty() {
        url.path = Some(heap.localize(path)?);
    }
    if let Some(p) = params {
        url.params = Some(heap.localize(p)?);
    }
    if let Some(q) = query {
        url.query = Some(heap.localize(q)?);
    }
    if let Some(f) = fragment {
        url.fragment = Some(heap.localize(f)?);
    }
    Ok(())
}

/// Serializes the URL in canonical component order.
pub fn print(heap: &HeaderHeap, url: &Url) -> String {
    let mut out = String::new();
    if let Some(scheme) = &url.scheme {
        heap.with_bytes(scheme, |b| out.push_str(&b.to_str_lossy()));
        out.push_str("://");
        if let Some(user) = &url.user {
            heap.with_bytes(user, |b| out.push_str(&b.to_str_lossy()));
            if let Some(pw) = &url.password {
                out.push(':');
                heap.with_bytes(pw, |b| out.push_str(&b.to_str_lossy()));
            }
            out.push('@');
        }
        if let Some(host) = &url.host {
            let bracketed = heap.with_bytes(host, |b| b.contains(&b':') && !b.starts_with(b"["));
            if bracketed {
                out.push('[');
                heap.with_bytes(host, |b| out.push_str(&b.to_str_lossy()));
                out.push(']');
            } else {
                heap.with_bytes(host, |b| out.push_str(&b.to_str_lossy()));
            }
        }
        if let Some(port_text) = &url.port_text {
            out.push(':');
            heap.with_bytes(port_text, |b| out.push_str(&b.to_str_lossy()));
        }
    }
    out.push('/');
    if let Some(path) = &url.path {
        heap.with_bytes(path, |b| out.push_str(&b.to_str_lossy()));
    }
    if let Some(params) = &url.params {
        out.push(';');
        heap.with_bytes(params, |b| out.push_str(&b.to_str_lossy()));
    }
    if let Some(query) = &url.query {
        out.push('?');
        heap.with_bytes(query, |b| out.push_str(&b.to_str_lossy()));
    }
    if let Some(fragment) = &url.fragment {
        out.push('#');
        heap.with_bytes(fragment, |b| out.push_str(&b.to_str_lossy()));
    }
    out
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheDigest(pub u64);

const FAST_PATH_BUFFER_CAP: usize = 512;

/// True when the URL qualifies for [`fast_digest`]: http/https, no
/// user/password/params/query, and no percent-encoding in host or path.
pub fn fast_path_applies(heap: &HeaderHeap, url: &Url) -> bool {
    if !matches!(url.url_type, UrlType::Http | UrlType::Https) {
        return false;
    }
    if url.user.is_some() || url.password.is_some() || url.params.is_some() || url.query.is_some()
    {
        return false;
    }
    let has_percent = |r: &Option<StrRef>| {
        r.as_ref()
            .map(|r| heap.with_bytes(r, |b| b.contains(&b'%')))
            .unwrap_or(false)
    };
    if has_percent(&url.host) || has_percent(&url.path) {
        return false;
    }
    let len = url.host.as_ref().map(StrRef::len).unwrap_or(0) + url.path.as_ref().map(StrRef::len).unwrap_or(0);
    len < FAST_PATH_BUFFER_CAP
}

fn push_component(buf: &mut Vec<u8>, heap: &HeaderHeap, r: &Option<StrRef>, lowercase: bool) {
    if let Some(r) = r {
        heap.with_bytes(r, |bytes| {
            if lowercase {
                buf.extend(bytes.iter().map(u8::to_ascii_lowercase));
            } else {
                buf.extend_from_slice(bytes);
            }
        });
    }
}

fn hash_bytes(bytes: &[u8], cache_generation: Option<i64>) -> CacheDigest {
    let mut hasher = FnvHasher::default();
    hasher.write(bytes);
    if let Some(gen) = cache_generation {
        hasher.write(&gen.to_ne_bytes());
    }
    CacheDigest(hasher.finish())
}

/// Cache-key digest taken via the small-buffer fast path.
pub fn fast_digest(heap: &HeaderHeap, url: &Url, cache_generation: Option<i64>) -> CacheDigest {
    let mut buf = Vec::with_capacity(FAST_PATH_BUFFER_CAP);
    push_component(&mut buf, heap, &url.scheme, true);
    buf.extend_from_slice(b"://");
    buf.push(b':');
    buf.push(b'@');
    push_component(&mut buf, heap, &url.host, true);
    buf.push(b'/');
    push_component(&mut buf, heap, &url.path, false);
    buf.push(b';');
    buf.push(b'?');
    buf.extend_from_slice(&url.port.to_be_bytes());
    hash_bytes(&buf, cache_generation)
}

fn unescape(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(hex) = std::str::from_utf8(&bytes[i + 1..i + 3]) {
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Cache-key digest taken via the general, unescape-then-lowercase path.
/// Must agree with [`fast_digest`] on any URL for which
/// [`fast_path_applies`] holds.
pub fn general_digest(heap: &HeaderHeap, url: &Url, cache_generation: Option<i64>) -> CacheDigest {
    let mut buf = Vec::new();
    let mut push = |r: &Option<StrRef>, lowercase: bool| {
        if let Some(r) = r {
            heap.with_bytes(r, |bytes| {
                let unescaped = unescape(bytes);
                if lowercase {
                    buf.extend(unescaped.iter().map(u8::to_ascii_lowercase));
                } else {
                    buf.extend_from_slice(&unescaped);
                }
            });
        }
    };
    push(&url.scheme, true);
    buf.extend_from_slice(b"://");
    push(&url.user, false);
    buf.push(b':');
    push(&url.password, false);
    buf.push(b'@');
    push(&url.host, true);
    buf.push(b'/');
    push(&url.path, false);
    buf.push(b';');
    push(&url.params, false);
    buf.push(b'?');
    push(&url.query, false);
    buf.extend_from_slice(&url.port.to_be_bytes());
    hash_bytes(&buf, cache_generation)
}
