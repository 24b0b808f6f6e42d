//! Well-known string (WKS) interning table.
//!
//! A closed set of HTTP tokens (field names, methods, schemes, cache-control
//! directives, transfer encodings) is hashed into a single contiguous byte
//! pool once at process start. Looking a string up in [`tokenize_string`]
//! either returns the index of an existing entry or `None`; the table never
//! grows after that point, so every index handed out stays valid and every
//! interned pointer stays stable for the life of the process.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

/// What kind of token an entry represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenType {
    FieldName,
    Method,
    Scheme,
    CacheControlDirective,
    Encoding,
}

/// Per-token flag bits, orthogonal to [`TokenType`].
pub struct TokenFlags;

impl TokenFlags {
    /// The field's value is a comma-separated list (e.g. `Accept`).
    pub const HAS_COMMAS: u64 = 0x01;
    /// More than one instance of the field may legally appear.
    pub const MULTI_VALUE: u64 = 0x02;
    /// The field is hop-by-hop and must not be forwarded unmodified.
    pub const HOP_BY_HOP: u64 = 0x04;
    /// The field carries proxy authentication material.
    pub const PROXY_AUTH: u64 = 0x08;
}

/// Metadata published for one interned token.
#[derive(Copy, Clone, Debug)]
pub struct TokenMeta {
    offset: usize,
    len: usize,
    pub ttype: TokenType,
    /// Fast-lookup slot in `0..32`, assigned only to the commonest field names.
    pub slot_id: Option<u8>,
    /// Bit position in the cooked Cache-Control bitset, assigned only to
    /// cache-control directives.
    pub cc_bit: Option<u8>,
    pub flags: u64,
}

impl TokenMeta {
    pub fn len(&self) -> usize {
        self.len
    }

    /// The presence-mask bit this token contributes, derived from its slot id.
    pub fn presence_bit(&self) -> Option<u64> {
        self.slot_id.map(|s| 1u64 << s)
    }
}

type Entry = (&'static str, TokenType, Option<u8>, Option<u8>, u64);

const F: TokenType = TokenType::FieldName;
const M: TokenType = TokenType::Method;
const S: TokenType = TokenType::Scheme;
const C: TokenType = TokenType::CacheControlDirective;
const E: TokenType = TokenType::Encoding;

const HC: u64 = TokenFlags::HAS_COMMAS;
const MV: u64 = TokenFlags::MULTI_VALUE;
const HBH: u64 = TokenFlags::HOP_BY_HOP;
const PA: u64 = TokenFlags::PROXY_AUTH;

/// Source-of-truth token list. Field names with a slot id are the 32 the
/// hot-path field index keeps a direct lookup cell for (the MIME object);
/// every other entry is looked up by the case-insensitive linear/chain walk.
const TOKEN_DEFS: &[Entry] = &[
    // Field names with fast-lookup slots, 0..32.
    ("Host", F, Some(0), None, 0),
    ("Content-Length", F, Some(1), None, 0),
    ("Content-Type", F, Some(2), None, 0),
    ("Transfer-Encoding", F, Some(3), None, HC | MV | HBH),
    ("Connection", F, Some(4), None, HC | MV | HBH),
    ("Cache-Control", F, Some(5), None, HC | MV),
    ("Date", F, Some(6), None, 0),
    ("Cookie", F, Some(7), None, 0),
    ("Set-Cookie", F, Some(8), None, MV),
    ("Via", F, Some(9), None, HC | MV),
    ("X-Forwarded-For", F, Some(10), None, HC | MV),
    ("Accept", F, Some(11), None, HC | MV),
    ("Accept-Encoding", F, Some(12), None, HC | MV),
    ("Accept-Language", F, Some(13), None, HC | MV),
    ("Accept-Charset", F, Some(14), None, HC | MV),
    ("User-Agent", F, Some(15), None, 0),
    ("Referer", F, Some(16), None, 0),
    ("Authorization", F, Some(17), None, 0),
    ("Proxy-Authenticate", F, Some(18), None, HBH | PA),
    ("Proxy-Authorization", F, Some(19), None, HBH | PA),
    ("Expires", F, Some(20), None, 0),
    ("Last-Modified", F, Some(21), None, 0),
    ("ETag", F, Some(22), None, 0),
    ("Location", F, Some(23), None, 0),
    ("Server", F, Some(24), None, 0),
    ("Vary", F, Some(25), None, HC | MV),
    ("Pragma", F, Some(26), None, HC | MV),
    ("Upgrade", F, Some(27), None, HC | MV | HBH),
    ("Expect", F, Some(28), None, HC | MV),
    ("Range", F, Some(29), None, 0),
    ("If-Modified-Since", F, Some(30), None, 0),
    ("If-None-Match", F, Some(31), None, HC | MV),
    // Field names with no fast-lookup slot.
    ("Keep-Alive", F, None, None, HBH),
    ("TE", F, None, None, HBH),
    ("Trailer", F, None, None, HBH),
    ("Content-Encoding", F, None, None, 0),
    ("Content-Disposition", F, None, None, 0),
    ("X-Forwarded-Proto", F, None, None, 0),
    // Methods.
    ("GET", M, None, None, 0),
    ("HEAD", M, None, None, 0),
    ("POST", M, None, None, 0),
    ("PUT", M, None, None, 0),
    ("DELETE", M, None, None, 0),
    ("CONNECT", M, None, None, 0),
    ("OPTIONS", M, None, None, 0),
    ("TRACE", M, None, None, 0),
    ("PATCH", M, None, None, 0),
    // Schemes.
    ("http", S, None, None, 0),
    ("https", S, None, None, 0),
    ("ftp", S, None, None, 0),
    ("ws", S, None, None, 0),
    ("wss", S, None, None, 0),
    // Cache-Control directives, cooked into their own bitset.
    ("no-cache", C, None, Some(0), 0),
    ("no-store", C, None, Some(1), 0),
    ("max-age", C, None, Some(2), 0),
    ("must-revalidate", C, None, Some(3), 0),
    ("private", C, None, Some(4), 0),
    ("public", C, None, Some(5), 0),
    ("proxy-revalidate", C, None, Some(6), 0),
    ("s-maxage", C, None, Some(7), 0),
    ("no-transform", C, None, Some(8), 0),
    ("only-if-cached", C, None, Some(9), 0),
    ("stale-while-revalidate", C, None, Some(10), 0),
    ("stale-if-error", C, None, Some(11), 0),
    ("immutable", C, None, Some(12), 0),
    // Transfer/content encodings.
    ("chunked", E, None, None, 0),
    ("gzip", E, None, None, 0),
    ("deflate", E, None, None, 0),
    ("identity", E, None, None, 0),
    ("br", E, None, None, 0),
];

/// FNV-1a, used instead of the default hasher because the lookup table's
/// keys are short, fixed ASCII strings where FNV-1a's avalanche behavior
/// already gives a good distribution without SipHash's per-process seeding.
pub struct FnvHasher(u64);

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FnvHasher {
    pub fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.0;
        for b in bytes {
            hash ^= u64::from(*b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.0 = hash;
    }
}

#[derive(Clone, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> FnvHasher {
        FnvHasher(FNV_OFFSET_BASIS)
    }
}

fn lowercased(bytes: &[u8]) -> Vec<u8> {
    bytes.to_ascii_lowercase()
}

lazy_static! {
    /// Single contiguous backing store for every interned token's bytes.
    /// [`is_interned`] tests pointer membership against this one allocation.
    static ref INTERN_POOL: Vec<u8> = {
        let mut buf = Vec::with_capacity(TOKEN_DEFS.iter().map(|e| e.0.len()).sum());
        for (s, ..) in TOKEN_DEFS {
            buf.extend_from_slice(s.as_bytes());
        }
        buf
    };

    static ref TOKEN_TABLE: Vec<TokenMeta> = {
        let mut offset = 0usize;
        TOKEN_DEFS
            .iter()
            .map(|(s, ttype, slot_id, cc_bit, flags)| {
                let meta = TokenMeta {
                    offset,
                    len: s.len(),
                    ttype: *ttype,
                    slot_id: *slot_id,
                    cc_bit: *cc_bit,
                    flags: *flags,
                };
                offset += s.len();
                meta
            })
            .collect()
    };

    static ref LOOKUP: HashMap<Vec<u8>, usize, FnvBuildHasher> = {
        let mut map: HashMap<Vec<u8>, usize, FnvBuildHasher> =
            HashMap::with_hasher(FnvBuildHasher);
        for (i, (s, ..)) in TOKEN_DEFS.iter().enumerate() {
            map.insert(lowercased(s.as_bytes()), i);
        }
        map
    };
}

/// Looks up `bytes` in the interned table, case-insensitively. Returns the
/// token's stable index, or `None` if it is not a well-known string.
pub fn tokenize_string(bytes: &[u8]) -> Option<usize> {
    LOOKUP.get(&lowercased(bytes)).copied()
}

/// Returns the stable, process-lifetime pointer for an interned index.
///
/// Panics if `index` is out of range; callers only ever hold indices handed
/// back by [`tokenize_string`] or obtained by iterating the table.
pub fn index_to_interned_pointer(index: usize) -> &'static [u8] {
    let meta = &TOKEN_TABLE[index];
    &INTERN_POOL[meta.offset..meta.offset + meta.len]
}

/// Pointer-range membership test: true if `ptr` is a subslice of the
/// intern pool's single backing allocation, i.e. it was handed out by
/// [`index_to_interned_pointer`] rather than copied or parsed from input.
pub fn is_interned(ptr: &[u8]) -> bool {
    let base = INTERN_POOL.as_ptr() as usize;
    let end = base + INTERN_POOL.len();
    let p = ptr.as_ptr() as usize;
    p >= base && p.saturating_add(ptr.len()) <= end
}

pub fn metadata_of(index: usize) -> &'static TokenMeta {
    &TOKEN_TABLE[index]
}

pub fn table_len() -> usize {
    TOKEN_TABLE.len()
}
