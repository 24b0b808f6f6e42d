//! Marshaling engine's cache-side object wrapper: a fixed
//! descriptor plus two marshaled header-heap images (request, response),
//! the shape the cache hands the core a refcounted buffer for and expects
//! back as one contiguous, relocatable image.

use crate::error::{HdrError, Result};
use crate::heap::{HeaderHeap, StrRef};
use crate::http::{HttpMessage, Polarity, StartLine};
use crate::marshal::{self, StringPool, UnmarshaledImage};
use crate::mime::{FieldId, MimeField, MimeHeader};
use crate::url::{Url, UrlType};
use std::sync::Arc;

/// Magic for a cache alternate image that is still in marshaled form on
/// disk; matches the header-heap image magic since both share one
/// translation convention.
pub const MARSHALED_MAGIC: u32 = 0xdcba_feed;
/// Magic once the image has been unmarshaled into memory.
pub const ALIVE_MAGIC: u32 = 0xabcd_feed;

fn push_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}
fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_ne_bytes());
}
fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_ne_bytes());
}
fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_ne_bytes());
}
fn push_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_ne_bytes());
}
fn push_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_ne_bytes());
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(HdrError::MarshalTranslation);
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }
    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_ne_bytes(self.take(2)?.try_into().unwrap()))
    }
    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_ne_bytes(self.take(4)?.try_into().unwrap()))
    }
    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_ne_bytes(self.take(4)?.try_into().unwrap()))
    }
    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_ne_bytes(self.take(8)?.try_into().unwrap()))
    }
    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_ne_bytes(self.take(8)?.try_into().unwrap()))
    }
}

const ABSENT: u32 = u32::MAX;

fn push_opt_str(buf: &mut Vec<u8>, heap: &HeaderHeap, pool: &mut StringPool, r: &Option<StrRef>) {
    match r {
        Some(r) => {
            let (off, len) = pool.intern(heap, r);
            push_u32(buf, off);
            push_u32(buf, len);
        }
        None => {
            push_u32(buf, 0);
            push_u32(buf, ABSENT);
        }
    }
}

fn read_opt_str(reader: &mut Reader, image: &UnmarshaledImage) -> Result<Option<StrRef>> {
    let off = reader.u32()?;
    let len = reader.u32()?;
    if len == ABSENT {
        Ok(None)
    } else {
        Ok(Some(image.string_ref(off, len)))
    }
}

fn url_type_tag(t: UrlType) -> u8 {
    match t {
        UrlType::Http => 0,
        UrlType::Https => 1,
        UrlType::Ws => 2,
        UrlType::Wss => 3,
        UrlType::Generic => 4,
    }
}

fn url_type_from_tag(tag: u8) -> Result<UrlType> {
    Ok(match tag {
        0 => UrlType::Http,
        1 => UrlType::Https,
        2 => UrlType::Ws,
        3 => UrlType::Wss,
        4 => UrlType::Generic,
        _ => return Err(HdrError::MarshalTranslation),
    })
}

/// Encodes `msg` into a self-contained header region, pooling every string
/// it references into `pool`. Paired with [`decode`].
pub fn encode(heap: &HeaderHeap, msg: &HttpMessage, pool: &mut StringPool) -> Vec<u8> {
    let mut buf = Vec::new();
    push_u8(&mut buf, matches!(msg.polarity, Polarity::Response) as u8);
    push_u8(&mut buf, msg.version.major);
    push_u8(&mut buf, msg.version.minor);

    match &msg.start {
        StartLine::Request { method, method_wks, url } => {
            let (moff, mlen) = pool.intern(heap, method);
            push_u32(&mut buf, moff);
            push_u32(&mut buf, mlen);
            push_i32(&mut buf, method_wks.map(|i| i as i32).unwrap_or(-1));

            push_opt_str(&mut buf, heap, pool, &url.scheme);
            push_opt_str(&mut buf, heap, pool, &url.user);
            push_opt_str(&mut buf, heap, pool, &url.password);
            push_opt_str(&mut buf, heap, pool, &url.host);
            push_opt_str(&mut buf, heap, pool, &url.port_text);
            push_opt_str(&mut buf, heap, pool, &url.path);
            push_opt_str(&mut buf, heap, pool, &url.params);
            push_opt_str(&mut buf, heap, pool, &url.query);
            push_opt_str(&mut buf, heap, pool, &url.fragment);
            push_u8(&mut buf, url_type_tag(url.url_type));
            push_u16(&mut buf, url.port);
        }
        StartLine::Response { status, reason } => {
            push_u16(&mut buf, *status);
            let (roff, rlen) = pool.intern(heap, reason);
            push_u32(&mut buf, roff);
            push_u32(&mut buf, rlen);
        }
    }

    push_u64(&mut buf, msg.mime.presence_mask);
    push_u32(&mut buf, msg.mime.cc_bits);
    push_i64(&mut buf, msg.mime.date.unwrap_or(i64::MIN));
    push_i64(&mut buf, msg.mime.content_length);

    let fields: Vec<(FieldId, &MimeField)> = msg.mime.iter().collect();
    let index_of = |target: FieldId| fields.iter().position(|(id, _)| *id == target);
    push_u32(&mut buf, fields.len() as u32);
    for i in 0..fields.len() {
        let field: &MimeField = fields[i].1;
        let (noff, nlen) = pool.intern(heap, &field.name);
        push_u32(&mut buf, noff);
        push_u32(&mut buf, nlen);
        let (voff, vlen) = pool.intern(heap, &field.value);
        push_u32(&mut buf, voff);
        push_u32(&mut buf, vlen);
        push_i32(&mut buf, field.wks_index.map(|idx| idx as i32).unwrap_or(-1));
        push_u64(&mut buf, field.flags);
        let next_idx = field.next_dup.and_then(index_of).map(|i| i as i32).unwrap_or(-1);
        push_i32(&mut buf, next_idx);
    }
    buf
}

/// Rebuilds an [`HttpMessage`] from an image produced by [`encode`].
/// Back-pointers into the MIME/URL structures are rebuilt fresh here
/// rather than carried across the image ("Cyclic
/// references").
pub fn decode(image: &UnmarshaledImage) -> Result<HttpMessage> {
    let mut reader = Reader::new(&image.header_bytes);
    let is_response = reader.u8()? != 0;
    let major = reader.u8()?;
    let minor = reader.u8()?;

    let start = if is_response {
        let status = reader.u16()?;
        let roff = reader.u32()?;
        let rlen = reader.u32()?;
        StartLine::Response {
            status,
            reason: image.string_ref(roff, rlen),
        }
    } else {
        let moff = reader.u32()?;
        let mlen = reader.u32()?;
        let method = image.string_ref(moff, mlen);
        let method_wks = match reader.i32()? {
            -1 => None,
            i => Some(i as usize),
        };
        let scheme = read_opt_str(&mut reader, image)?;
        let user = read_opt_str(&mut reader, image)?;
        let password = read_opt_str(&mut reader, image)?;
        let host = read_opt_str(&mut reader, image)?;
        let port_text = read_opt_str(&mut reader, image)?;
        let path = read_opt_str(&mut reader, image)?;
        let params = read_opt_str(&mut reader, image)?;
        let query = read_opt_str(&mut reader, image)?;
        let fragment = read_opt_str(&mut reader, image)?;
        let url_type = url_type_from_tag(reader.u8()?)?;
        let port = reader.u16()?;
        let url = Url {
            url_type,
            port,
            scheme,
            user,
            password,
            host,
            port_text,
            path,
            params,
            query,
            fragment,
            clean: true,
        };
        StartLine::Request {
            method,
            method_wks,
            url,
        }
    };

    let presence_mask_from_image = reader.u64()?;
    let cc_bits = reader.u32()?;
    let date_raw = reader.i64()?;
    let content_length = reader.i64()?;
    let date = if date_raw == i64::MIN { None } else { Some(date_raw) };

    let field_count = reader.u32()? as usize;
    let mut raw_fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let noff = reader.u32()?;
        let nlen = reader.u32()?;
        let voff = reader.u32()?;
        let vlen = reader.u32()?;
        let wks_index = match reader.i32()? {
            -1 => None,
            i => Some(i as usize),
        };
        let flags = reader.u64()?;
        let next_idx = reader.i32()?;
        raw_fields.push((
            image.string_ref(noff, nlen),
            image.string_ref(voff, vlen),
            wks_index,
            flags,
            next_idx,
        ));
    }

    let mut mime = MimeHeader::new();
    let mut ids = Vec::with_capacity(raw_fields.len());
    for (name, value, wks_index, flags, _) in &raw_fields {
        let id = mime.restore_field(MimeField {
            name: name.clone(),
            value: value.clone(),
            next_dup: None,
            wks_index: *wks_index,
            flags: *flags,
        });
        ids.push(id);
    }
    for (i, (.., next_idx)) in raw_fields.iter().enumerate() {
        if *next_idx >= 0 {
            mime.set_next_dup(ids[i], Some(ids[*next_idx as usize]));
        }
    }
    mime.set_cooked_values(cc_bits, date, content_length);
    debug_assert_eq!(mime.presence_mask, presence_mask_from_image);

    Ok(HttpMessage {
        polarity: if is_response { Polarity::Response } else { Polarity::Request },
        version: crate::http::HttpVersion { major, minor },
        mime,
        start,
    })
}

/// Descriptor fields carried alongside the two heap images:
/// object key, per-message timestamps, and any fragment offsets beyond the
/// inline threshold. Owns no heap; it is a pure value copied verbatim by
/// [`marshal_alternate`]/[`unmarshal_alternate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheAlternate {
    pub object_key: Vec<u8>,
    pub request_time: i64,
    pub response_time: i64,
    pub fragment_offsets: Vec<u64>,
}

/// Assembles the full on-disk cache alternate image: descriptor, then the
/// marshaled request heap, then the marshaled response heap.
pub fn marshal_alternate(
    descriptor: &CacheAlternate,
    request_heap: &HeaderHeap,
    request_msg: &HttpMessage,
    response_heap: &HeaderHeap,
    response_msg: &HttpMessage,
) -> Vec<u8> {
    let mut request_pool = StringPool::new();
    let request_header = encode(request_heap, request_msg, &mut request_pool);
    let request_image = marshal::marshal(&request_header, request_pool);

    let mut response_pool = StringPool::new();
    let response_header = encode(response_heap, response_msg, &mut response_pool);
    let response_image = marshal::marshal(&response_header, response_pool);

    let mut out = Vec::new();
    push_u32(&mut out, MARSHALED_MAGIC);
    push_u32(&mut out, descriptor.object_key.len() as u32);
    out.extend_from_slice(&descriptor.object_key);
    push_i64(&mut out, descriptor.request_time);
    push_i64(&mut out, descriptor.response_time);
    push_u32(&mut out, descriptor.fragment_offsets.len() as u32);
    for off in &descriptor.fragment_offsets {
        push_u64(&mut out, *off);
    }
    push_u32(&mut out, request_image.len() as u32);
    push_u32(&mut out, response_image.len() as u32);
    out.extend_from_slice(&request_image);
    out.extend_from_slice(&response_image);
    out
}

/// Validates the descriptor magic, splits out the two heap images, and
/// unmarshals each independently. Any size inconsistency or bad magic
/// anywhere in the chain is a cache miss, surfaced here as `Err` rather
/// than a bespoke `-1` sentinel.
pub fn unmarshal_alternate(buffer: Arc<[u8]>) -> Result<(CacheAlternate, HttpMessage, HttpMessage)> {
    let mut reader = Reader::new(&buffer);
    let magic = reader.u32()?;
    if magic != MARSHALED_MAGIC && magic != ALIVE_MAGIC {
        return Err(HdrError::BadMagic);
    }
    let key_len = reader.u32()? as usize;
    let object_key = reader.take(key_len)?.to_vec();
    let request_time = reader.i64()?;
    let response_time = reader.i64()?;
    let frag_count = reader.u32()? as usize;
    let mut fragment_offsets = Vec::with_capacity(frag_count);
    for _ in 0..frag_count {
        fragment_offsets.push(reader.u64()?);
    }
    let request_len = reader.u32()? as usize;
    let response_len = reader.u32()? as usize;
    let request_bytes = reader.take(request_len)?;
    let response_bytes = reader.take(response_len)?;

    let request_image = marshal::unmarshal(Arc::from(request_bytes.to_vec().into_boxed_slice()))?;
    let response_image = marshal::unmarshal(Arc::from(response_bytes.to_vec().into_boxed_slice()))?;

    let request_msg = decode(&request_image)?;
    let response_msg = decode(&response_image)?;

    Ok((
        CacheAlternate {
            object_key,
            request_time,
            response_time,
            fragment_offsets,
        },
        request_msg,
        response_msg,
    ))
}
