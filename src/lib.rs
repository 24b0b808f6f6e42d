//! Header heap, well-known string interning, and HTTP/URL/MIME parsing for
//! a forward/reverse proxy's message representation layer.
//!
//! The crate is organized leaves-first: byte-classification helpers and the
//! result types at the bottom, the token table and string/header heaps
//! above that, the URL/MIME/HTTP grammars on top, and the marshaling engine
//! and cache image wrapper as the thin layer that ties a header heap to the
//! cache.

pub mod cache_image;
pub mod config;
pub mod error;
pub mod headers;
pub mod heap;
pub mod http;
pub mod marshal;
pub mod mime;
pub mod strheap;
pub mod table;
pub mod token;
pub mod url;
pub mod util;

pub use config::{ParserConfig, UrlHashMethod};
pub use error::{FieldResult, HdrError, ParseStatus, Result};
pub use heap::HeaderHeap;
pub use http::{HttpMessage, Polarity};
