//! String storage backing a header heap: one growable, owned buffer while a
//! heap is being built, demoted to an immutable, cheaply-shareable buffer
//! once another writable heap needs to take its place.

use std::sync::Arc;

/// Rounds `n` up to the next multiple of 8.
fn align8(n: usize) -> usize {
    (n + 7) & !7
}

/// The heap's own bump-allocated buffer. Bytes are appended and never moved
/// or freed individually; the whole buffer is discarded at once, or demoted.
#[derive(Debug)]
pub struct WritableStringHeap {
    buf: Vec<u8>,
    capacity: usize,
}

impl WritableStringHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Appends `bytes` and returns its `(offset, len)` within this heap, or
    /// `None` if the heap's capacity would be exceeded. The offset is always
    /// an 8-byte-aligned bump: `buf` grows with zero-fill padding as needed
    /// to reach the next multiple of 8 before the bytes themselves land.
    pub fn allocate(&mut self, bytes: &[u8]) -> Option<(usize, usize)> {
        let offset = align8(self.buf.len());
        if offset + bytes.len() > self.capacity {
            return None;
        }
        self.buf.resize(offset, 0);
        self.buf.extend_from_slice(bytes);
        Some((offset, bytes.len()))
    }

    /// Grows the allocation at `(ptr, old_len)` to `new_len` bytes in place,
    /// returning the (unchanged) offset on success. Succeeds only if `ptr` is
    /// still the most recent allocation in this heap (nothing has been
    /// appended since) and the heap has room for the extra bytes; otherwise
    /// returns `None` and the caller must allocate fresh and copy.
    pub fn expand(&mut self, ptr: usize, old_len: usize, new_len: usize) -> Option<usize> {
        if ptr + old_len != self.buf.len() {
            return None;
        }
        if new_len <= old_len {
            self.buf.truncate(ptr + new_len);
            return Some(ptr);
        }
        if ptr + new_len > self.capacity {
            return None;
        }
        self.buf.resize(ptr + new_len, 0);
        Some(ptr)
    }

    pub fn get(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf[offset..offset + len]
    }

    pub fn space_available(&self) -> usize {
        self.capacity - self.buf.len()
    }

    pub fn total_size(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.buf.len()
    }

    /// Freezes this heap's bytes into a refcounted, shareable read-only
    /// buffer. The caller installs the result into a read-only slot.
    pub fn demote(self) -> ReadOnlyStringHeap {
        ReadOnlyStringHeap {
            buf: Arc::from(self.buf.into_boxed_slice()),
        }
    }
}

/// An immutable string buffer, shareable across header heaps (and threads,
/// since `Arc<[u8]>` is `Send + Sync`) without copying.
#[derive(Debug, Clone)]
pub struct ReadOnlyStringHeap {
    buf: Arc<[u8]>,
}

impl ReadOnlyStringHeap {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buf: Arc::from(bytes.into_boxed_slice()),
        }
    }

    pub fn get(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf[offset..offset + len]
    }

    pub fn total_size(&self) -> usize {
        self.buf.len()
    }

    pub fn refcount(&self) -> usize {
        Arc::strong_count(&self.buf)
    }

    /// Pointer-range membership test, used when relocalizing a string
    /// reference that may already live in this buffer.
    pub fn contains(&self, ptr: &[u8]) -> bool {
        let base = self.buf.as_ptr() as usize;
        let end = base + self.buf.len();
        let p = ptr.as_ptr() as usize;
        p >= base && p.saturating_add(ptr.len()) <= end
    }

    /// Merges `others` into a single new buffer, concatenated in order,
    /// returning the merged heap and each input's byte offset within it.
    /// Used by heap coalescing when the read-only slot array fills up.
    pub fn coalesce(heaps: &[ReadOnlyStringHeap]) -> (ReadOnlyStringHeap, Vec<usize>) {
        let mut merged = Vec::with_capacity(heaps.iter().map(|h| h.total_size()).sum());
        let mut offsets = Vec::with_capacity(heaps.len());
        for h in heaps {
            offsets.push(merged.len());
            merged.extend_from_slice(&h.buf);
        }
        (ReadOnlyStringHeap::from_bytes(merged), offsets)
    }
}
