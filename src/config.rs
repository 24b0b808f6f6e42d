//! Tunables the records collaborator hands the parser.
//!
//! This crate owns none of the storage or reload semantics for these
//! values — a host binary reads them out of whatever config layer it uses
//! and fills in a [`ParserConfig`] per connection or per worker, the same
//! way each grammar in this crate takes a `cfg: &Config` parameter rather
//! than reaching for a global.

use crate::url::Strictness;

/// Cache-key digest strategy (`url_hash_method`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UrlHashMethod {
    /// Always use the general unescape-then-lowercase digest path.
    General,
    /// Use the small-buffer fast path when it applies, falling back to the
    /// general path otherwise.
    FastWhenApplicable,
}

/// Borrowed by parser entry points; never owned by a parsed message.
#[derive(Copy, Clone, Debug)]
pub struct ParserConfig {
    /// URI character validation strictness.
    pub strict_uri_parsing: Strictness,
    /// Reject a request whose start-line + header block exceeds this many
    /// bytes with `ParseStatus::Error`.
    pub max_request_header_size: usize,
    /// Same, for responses.
    pub max_response_header_size: usize,
    pub url_hash_method: UrlHashMethod,
    /// Mixed into the cache-key digest when `Some`; `None` disables mixing
    /// (the `-1` sentinel, represented natively here).
    pub cache_generation: Option<i64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_uri_parsing: Strictness::Off,
            max_request_header_size: 64 * 1024,
            max_response_header_size: 64 * 1024,
            url_hash_method: UrlHashMethod::General,
            cache_generation: None,
        }
    }
}
