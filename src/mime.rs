//! MIME header: field storage, presence bitmask, fast slot lookup for the
//! 32 commonest field names, and cooked derived values.

use crate::error::{FieldResult, HdrError, Result};
use crate::heap::{HeaderHeap, StrRef};
use crate::token::{self, TokenFlags};
use crate::util::eq_nocase;

/// How many fields a single [`FieldBlock`] holds inline before a new block
/// is chained on.
pub const FIELD_BLOCK_CAPACITY: usize = 8;

/// Per-field flags, independent of the token-level flags in [`TokenFlags`].
pub struct FieldFlags;
impl FieldFlags {
    /// The field has been cooked: its slot id is set and, for Cache-Control,
    /// Date, and Content-Length, its value has been folded into the MIME
    /// header's derived fields.
    pub const COOKED: u64 = 0x01;
    /// Tombstoned: logically deleted, skipped by lookup and iteration, but
    /// left in place so earlier `next_dup` links and slot indices stay
    /// valid. Reclaimed only when the owning header heap coalesces.
    pub const DELETED: u64 = 0x02;
}

#[derive(Clone)]
pub struct MimeField {
    pub name: StrRef,
    pub value: StrRef,
    pub next_dup: Option<FieldId>,
    pub wks_index: Option<usize>,
    pub flags: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldId {
    block: usize,
    slot: usize,
}

/// A fixed-capacity run of fields, chained to the next block once full.
pub struct FieldBlock {
    fields: Vec<MimeField>,
    next: Option<Box<FieldBlock>>,
}

impl FieldBlock {
    fn new() -> Self {
        Self {
            fields: Vec::with_capacity(FIELD_BLOCK_CAPACITY),
            next: None,
        }
    }
}

pub struct MimeHeader {
    pub presence_mask: u64,
    /// Fast-path cache from a WKS slot id to that field's location, so the
    /// 32 commonest field names never need the linear block walk.
    pub slot_index: [Option<FieldId>; 32],
    /// Bitset of Cache-Control directive bits, derived from `cc_bit` in
    /// interned token metadata.
    pub cc_bits: u32,
    /// Cooked `Date`, in seconds since the epoch.
    pub date: Option<i64>,
    /// Cooked `Content-Length`; `-1` means unknown/absent.
    pub content_length: i64,
    first_block: FieldBlock,
    block_count: usize,
}

impl MimeHeader {
    pub fn new() -> Self {
        Self {
            presence_mask: 0,
            slot_index: [None; 32],
            cc_bits: 0,
            date: None,
            content_length: -1,
            first_block: FieldBlock::new(),
            block_count: 1,
        }
    }

    fn block(&self, i: usize) -> &FieldBlock {
        let mut b = &self.first_block;
        for _ in 0..i {
            b = b.next.as_ref().expect("block index in range");
        }
        b
    }

    fn block_mut(&mut self, i: usize) -> &mut FieldBlock {
        let mut b = &mut self.first_block;
        for _ in 0..i {
            b = b.next.as_mut().expect("block index in range");
        }
        b
    }

    pub fn get(&self, id: FieldId) -> &MimeField {
        &self.block(id.block).fields[id.slot]
    }

    fn get_mut(&mut self, id: FieldId) -> &mut MimeField {
        &mut self.block_mut(id.block).fields[id.slot]
    }

    /// Iterates every live (non-tombstoned) field in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &MimeField)> {
        let mut blocks = Vec::with_capacity(self.block_count);
        let mut b = Some(&self.first_block);
        let mut i = 0;
        while let Some(blk) = b {
            blocks.push((i, blk));
            b = blk.next.as_deref();
            i += 1;
        }
        blocks.into_iter().flat_map(|(bi, blk)| {
            blk.fields
                .iter()
                .enumerate()
                .map(move |(si, f)| (FieldId { block: bi, slot: si }, f))
        }).filter(|(_, f)| f.flags & FieldFlags::DELETED == 0)
    }

    fn push_raw(&mut self, field: MimeField) -> FieldId {
        if self.first_block.fields.len() < FIELD_BLOCK_CAPACITY && self.block_count == 1 {
            self.first_block.fields.push(field);
            return FieldId {
                block: 0,
                slot: self.first_block.fields.len() - 1,
            };
        }
        let last_idx = self.block_count - 1;
        if self.block(last_idx).fields.len() >= FIELD_BLOCK_CAPACITY {
            self.block_mut(last_idx).next = Some(Box::new(FieldBlock::new()));
            self.block_count += 1;
        }
        let last_idx = self.block_count - 1;
        let blk = self.block_mut(last_idx);
        blk.fields.push(field);
        FieldId {
            block: last_idx,
            slot: blk.fields.len() - 1,
        }
    }

    /// Inserts a name/value pair, comma-joining into an existing field when
    /// the token's flags say duplicates may be comma-joined, otherwise
    /// chaining as a duplicate.
    pub fn insert(&mut self, heap: &HeaderHeap, name: &[u8], value: &[u8]) -> Result<()> {
        let wks_index = token::tokenize_string(name);
        let meta = wks_index.map(token::metadata_of);
        let flags = meta.map(|m| m.flags).unwrap_or(0);
        let slot_id = meta.and_then(|m| m.slot_id);

        if flags & TokenFlags::HAS_COMMAS != 0 {
            if let Some(existing) = self.find_tail(heap, name) {
                let joined = {
                    let mut v = Vec::new();
                    heap.with_bytes(&self.get(existing).value, |b| v.extend_from_slice(b));
                    v.extend_from_slice(b", ");
                    v.extend_from_slice(value);
                    v
                };
                let new_value = heap.localize(&joined)?;
                self.get_mut(existing).value = new_value;
                self.cook(heap, existing)?;
                return Ok(());
            }
        }

        let name_ref = heap.localize(name)?;
        let value_ref = heap.localize(value)?;
        let mut field = MimeField {
            name: name_ref,
            value: value_ref,
            next_dup: None,
            wks_index,
            flags: 0,
        };
        if slot_id.is_some() {
            field.flags |= FieldFlags::COOKED;
        }
        let id = self.push_raw(field);

        if let Some(tail) = self.find_tail_before(heap, name, id) {
            self.get_mut(tail).next_dup = Some(id);
        }
        if let Some(slot) = slot_id {
            if self.slot_index[slot as usize].is_none() {
                self.slot_index[slot as usize] = Some(id);
            }
            self.presence_mask |= 1u64 << slot;
        }
        self.cook(heap, id)?;
        Ok(())
    }

    /// Finds the last live occurrence of `name` inserted before `before`,
    /// the tail of whatever duplicate chain the new field should extend.
    fn find_tail_before(&self, heap: &HeaderHeap, name: &[u8], before: FieldId) -> Option<FieldId> {
        let mut tail = None;
        for (id, f) in self.iter() {
            if id == before {
                break;
            }
            if heap.with_bytes(&f.name, |b| eq_nocase(b, name)) {
                tail = Some(id);
            }
        }
        tail
    }

    /// Finds the first live field named `name`, used by the comma-join path
    /// to locate the field a repeated value should be folded into.
    fn find_tail(&self, heap: &HeaderHeap, name: &[u8]) -> Option<FieldId> {
        let mut tail = None;
        for (id, f) in self.iter() {
            if heap.with_bytes(&f.name, |b| eq_nocase(b, name)) {
                tail = Some(id);
            }
        }
        tail
    }

    /// Finds the first live field by name, taking the slot-indexed fast path
    /// for the 32 commonest field names and falling back to a case-insensitive
    /// walk over raw bytes otherwise.
    pub fn find_field(&self, heap: &HeaderHeap, name: &[u8]) -> FieldResult<FieldId> {
        if let Some(idx) = token::tokenize_string(name) {
            if let Some(slot) = token::metadata_of(idx).slot_id {
                return match self.slot_index[slot as usize] {
                    Some(id) if self.get(id).flags & FieldFlags::DELETED == 0 => FieldResult::Ok(id),
                    _ => FieldResult::NoSuchField,
                };
            }
            if let Some((id, _)) = self.iter().find(|(_, f)| f.wks_index == Some(idx)) {
                return FieldResult::Ok(id);
            }
            return FieldResult::NoSuchField;
        }
        for (id, f) in self.iter() {
            if heap.with_bytes(&f.name, |b| eq_nocase(b, name)) {
                return FieldResult::Ok(id);
            }
        }
        FieldResult::NoSuchField
    }

    /// Fast presence test for a common field by its interned slot id.
    pub fn has_slot(&self, slot: u8) -> bool {
        self.presence_mask & (1u64 << slot) != 0
    }

    /// Deletes every field matching `name`. Clears the field's presence bit
    /// only once no duplicates remain.
    pub fn delete(&mut self, heap: &HeaderHeap, name: &[u8]) {
        let ids: Vec<FieldId> = match self.find_field(heap, name) {
            FieldResult::Ok(first) => {
                let mut ids = vec![first];
                let mut cur = self.get(first).next_dup;
                while let Some(id) = cur {
                    ids.push(id);
                    cur = self.get(id).next_dup;
                }
                ids
            }
            FieldResult::NoSuchField => return,
        };
        let mut slot_to_clear = None;
        for id in &ids {
            let f = self.get_mut(*id);
            f.flags |= FieldFlags::DELETED;
            if let Some(idx) = f.wks_index {
                if let Some(slot) = token::metadata_of(idx).slot_id {
                    slot_to_clear = Some(slot);
                }
            }
        }
        if let Some(slot) = slot_to_clear {
            self.slot_index[slot as usize] = None;
            self.presence_mask &= !(1u64 << slot);
        }
    }

    fn cook(&mut self, heap: &HeaderHeap, id: FieldId) -> Result<()> {
        let (wks_index, value) = {
            let f = self.get(id);
            (f.wks_index, f.value.clone())
        };
        let Some(idx) = wks_index else { return Ok(()) };
        let bytes = token::index_to_interned_pointer(idx);
        if eq_nocase(bytes, b"Cache-Control") {
            heap.with_bytes(&value, |v| {
                for token_bytes in v.split(|&c| c == b',') {
                    let trimmed = crate::util::trimmed(token_bytes);
                    let directive = trimmed.split(|&c| c == b'=').next().unwrap_or(trimmed);
                    if let Some(tidx) = token::tokenize_string(directive) {
                        if let Some(bit) = token::metadata_of(tidx).cc_bit {
                            self.cc_bits |= 1u32 << bit;
                        }
                    }
                }
            });
        } else if eq_nocase(bytes, b"Content-Length") {
            heap.with_bytes(&value, |v| {
                if !v.is_empty() && v.iter().all(u8::is_ascii_digit) {
                    if let Ok(n) = std::str::from_utf8(v).unwrap().parse::<i64>() {
                        self.content_length = n;
                    }
                }
            });
        } else if eq_nocase(bytes, b"Date") {
            heap.with_bytes(&value, |v| {
                self.date = parse_http_date(v);
            });
        }
        Ok(())
    }
}

impl MimeHeader {
    /// Restores a field exactly as marshaled, without re-deriving cooked
    /// values or comma-joining duplicates — the marshaling engine's decode
    /// path carries the already-cooked bitset/date/content-length
    /// alongside and calls [`MimeHeader::set_cooked_values`] once instead.
    pub(crate) fn restore_field(&mut self, field: MimeField) -> FieldId {
        let slot_id = field
            .wks_index
            .and_then(|idx| token::metadata_of(idx).slot_id);
        let id = self.push_raw(field);
        if let Some(slot) = slot_id {
            if self.slot_index[slot as usize].is_none() {
                self.slot_index[slot as usize] = Some(id);
            }
            self.presence_mask |= 1u64 << slot;
        }
        id
    }

    pub(crate) fn set_next_dup(&mut self, id: FieldId, next: Option<FieldId>) {
        self.get_mut(id).next_dup = next;
    }

    pub(crate) fn set_cooked_values(&mut self, cc_bits: u32, date: Option<i64>, content_length: i64) {
        self.cc_bits = cc_bits;
        self.date = date;
        self.content_length = content_length;
    }
}

impl Default for MimeHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an HTTP date into seconds since the epoch, trying the three forms
/// a server may legally send in turn: RFC 1123 (`Sun, 06 Nov 1994
/// 08:49:37 GMT`), RFC 850 (`Sunday, 06-Nov-94 08:49:37 GMT`), and asctime
/// (`Sun Nov  6 08:49:37 1994`). The latter two are hand-scanned token by
/// token rather than matched against a single format descriptor, since their
/// two-digit year and space-padded day fall outside what a fixed-width
/// descriptor expresses cleanly.
fn parse_http_date(bytes: &[u8]) -> Option<i64> {
    let s = std::str::from_utf8(bytes).ok()?.trim();
    time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc2822)
        .ok()
        .map(|dt| dt.unix_timestamp())
        .or_else(|| parse_rfc850_date(s))
        .or_else(|| parse_asctime_date(s))
}

/// `<full weekday>, DD-Mon-YY HH:MM:SS GMT`. Two-digit years follow the
/// POSIX `strptime` rule: `00`-`68` are 2000-2068, `69`-`99` are 1969-1999.
fn parse_rfc850_date(s: &str) -> Option<i64> {
    let (_weekday, rest) = s.split_once(", ")?;
    let mut parts = rest.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let mut date_fields = date_part.split('-');
    let day: u8 = date_fields.next()?.parse().ok()?;
    let month = month_from_abbrev(date_fields.next()?)?;
    let yy: i32 = date_fields.next()?.parse().ok()?;
    let year = if yy < 69 { 2000 + yy } else { 1900 + yy };
    build_timestamp(year, month, day, time_part)
}

/// `<abbrev weekday> <abbrev month> <space-padded day> HH:MM:SS <year>`.
fn parse_asctime_date(s: &str) -> Option<i64> {
    let mut parts = s.split_whitespace();
    let _weekday = parts.next()?;
    let month = month_from_abbrev(parts.next()?)?;
    let day: u8 = parts.next()?.parse().ok()?;
    let time_part = parts.next()?;
    let year: i32 = parts.next()?.parse().ok()?;
    build_timestamp(year, month, day, time_part)
}

fn build_timestamp(year: i32, month: time::Month, day: u8, time_part: &str) -> Option<i64> {
    let mut time_fields = time_part.split(':');
    let hour: u8 = time_fields.next()?.parse().ok()?;
    let minute: u8 = time_fields.next()?.parse().ok()?;
    let second: u8 = time_fields.next()?.parse().ok()?;
    let date = time::Date::from_calendar_date(year, month, day).ok()?;
    let time = time::Time::from_hms(hour, minute, second).ok()?;
    Some(time::PrimitiveDateTime::new(date, time).assume_utc().unix_timestamp())
}

fn month_from_abbrev(s: &str) -> Option<time::Month> {
    use time::Month::*;
    Some(match s {
        "Jan" => January,
        "Feb" => February,
        "Mar" => March,
        "Apr" => April,
        "May" => May,
        "Jun" => June,
        "Jul" => July,
        "Aug" => August,
        "Sep" => September,
        "Oct" => October,
        "Nov" => November,
        "Dec" => December,
        _ => return None,
    })
}
