//! Result types shared by the parsers and the header heap.
//!
//! Mirrors the small-enum-over-bool style the parser uses throughout: a
//! caller needs to distinguish "done", "need more bytes", and "fatal" rather
//! than collapse them into a single `Result<(), E>`.

use std::fmt;

/// Outcome of feeding bytes to a streaming parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseStatus {
    /// The message parsed to completion; the caller may extract it.
    Done,
    /// More bytes are required before a decision can be made.
    Cont,
    /// The input is malformed beyond recovery. Fatal for the connection.
    Error,
}

/// Outcome of a MIME field lookup, used where `Option` would blur "no such
/// field" together with "field present but empty".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldResult<T> {
    Ok(T),
    NoSuchField,
}

impl<T> FieldResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, FieldResult::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            FieldResult::Ok(v) => Some(v),
            FieldResult::NoSuchField => None,
        }
    }
}

/// Error surfaced by anything that is not itself a streaming parser: heap
/// allocation, marshaling, and configuration rejection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HdrError {
    /// A byte sequence did not match the expected grammar.
    Malformed,
    /// A marshal or unmarshal pass could not translate every pointer.
    MarshalTranslation,
    /// The image's magic number did not match what was expected.
    BadMagic,
    /// A string or object heap allocation could not be satisfied even after
    /// demote/coalesce; only possible if capacity was misconfigured to 0.
    HeapExhausted,
}

impl fmt::Display for HdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HdrError::Malformed => "malformed input",
            HdrError::MarshalTranslation => "marshal translation miss",
            HdrError::BadMagic => "bad magic number",
            HdrError::HeapExhausted => "heap exhausted",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for HdrError {}

pub type Result<T> = std::result::Result<T, HdrError>;

/// The header-line grammar's error type. An alias rather than a new type:
/// nothing above the grammar layer inspects the error kind, so there is no
/// reason to hide `nom`'s own `Error` behind a wrapper.
pub type NomError<I> = nom::error::Error<I>;

/// Bridges a terminal nom failure (anything that is not `Incomplete`) into
/// the top-level parse status.
impl<I> From<nom::Err<NomError<I>>> for HdrError {
    fn from(e: nom::Err<NomError<I>>) -> Self {
        match e {
            nom::Err::Incomplete(_) => HdrError::Malformed,
            nom::Err::Error(_) | nom::Err::Failure(_) => HdrError::Malformed,
        }
    }
}
