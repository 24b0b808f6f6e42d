//! Byte-classification helpers shared by the header-line scanner, the URL
//! parser, and the HTTP request/status line parsers.

/// Bit-set helpers for the `u64` flag words attached to names, values, and
/// MIME fields throughout the crate.
pub trait FlagOperations<T> {
    fn is_set(&self, flag: T) -> bool;
    fn set(&mut self, flag: T);
    fn unset(&mut self, flag: T);
}

impl FlagOperations<u64> for u64 {
    fn is_set(&self, flag: u64) -> bool {
        self & flag == flag
    }

    fn set(&mut self, flag: u64) {
        *self |= flag;
    }

    fn unset(&mut self, flag: u64) {
        *self &= !flag;
    }
}

/// RFC 7230 `tchar`: token characters allowed in a header field name.
pub fn is_token(c: u8) -> bool {
    match c {
        b'a'..=b'z'
        | b'A'..=b'Z'
        | b'0'..=b'9'
        | b'!'
        | b'#'
        | b'$'
        | b'%'
        | b'&'
        | b'\''
        | b'*'
        | b'+'
        | b'-'
        | b'.'
        | b'^'
        | b'_'
        | b'`'
        | b'|'
        | b'~' => true,
        _ => false,
    }
}

/// Separator characters that terminate an HTTP token (RFC 2616 `separators`).
pub fn is_separator(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
            | b'{'
            | b'}'
            | b' '
            | b'\t'
    )
}

pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c')
}

/// Bytes allowed in a `Host` header's address component
pub fn is_host_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, b'-' | b'.' | b'[' | b']' | b'_' | b':' | b'~' | b'%')
}

/// Bytes allowed unescaped in RFC 3986 `pchar | reserved | "%"`, used by the
/// URL parser's `strict` mode.
pub fn is_uri_strict_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b':'
                | b'/'
                | b'?'
                | b'#'
                | b'['
                | b']'
                | b'@'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b'%'
        )
}

/// Trims leading and trailing whitespace the way the header-line scanner
/// trims a name or value before storing it.
pub fn trimmed(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|c| !is_space(*c)).unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|c| !is_space(*c))
        .map(|p| p + 1)
        .unwrap_or(0);
    if start >= end {
        &data[0..0]
    } else {
        &data[start..end]
    }
}

/// ASCII case-insensitive comparison, used throughout the WKS and field
/// lookups instead of allocating a lowercased copy.
pub fn eq_nocase(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignore_ascii_case(y))
}
