//! The header heap: per-transaction owner of every string a parsed message
//! references. Holds one writable string heap that new
//! allocations land in, plus up to [`MAX_RONLY`] read-only heaps inherited
//! or demoted from elsewhere, and hands callers [`StrRef`] handles instead
//! of raw pointers.
//!
//! A single header heap is owned by one transaction at a time; nothing here
//! synchronizes concurrent access, so `HeaderHeap` is deliberately `!Sync`
//! (it holds `Cell`/`RefCell`, which settles that without an explicit
//! negative impl).

use crate::error::{HdrError, Result};
use crate::strheap::{ReadOnlyStringHeap, WritableStringHeap};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// Compile-time cap on read-only string heap slots a header heap can hold
/// at once.
pub const MAX_RONLY: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeapMagic {
    Alive,
    Marshaled,
    Dead,
    Corrupt,
}

struct RonlySlot {
    heap: ReadOnlyStringHeap,
    locked: bool,
}

/// A handle to a string stored somewhere reachable from a header heap.
/// Mirrors the source's three-way pointer provenance without a raw pointer:
/// the byte range lives in this heap's writable heap, in one of its
/// read-only slots, or in a buffer owned entirely outside the heap.
#[derive(Clone, Debug)]
pub enum StrRef {
    /// In the heap's current writable string heap.
    Inline { offset: usize, len: usize },
    /// In one of the heap's read-only slots.
    Shared {
        slot: usize,
        offset: usize,
        len: usize,
    },
    /// In a caller-owned buffer that outlives the heap by contract. Backed
    /// by `Arc<[u8]>` rather than a bare pointer so the "don't copy"
    /// optimization stays safe: the buffer can't be freed out from under
    /// the reference even if the caller's own binding is dropped.
    External(Arc<[u8]>, usize, usize),
}

impl StrRef {
    pub fn len(&self) -> usize {
        match self {
            StrRef::Inline { len, .. } => *len,
            StrRef::Shared { len, .. } => *len,
            StrRef::External(_, _, len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct HeaderHeap {
    magic: Cell<HeapMagic>,
    writable: RefCell<Option<WritableStringHeap>>,
    ronly: RefCell<[Option<RonlySlot>; MAX_RONLY]>,
    lost_string_bytes: Cell<usize>,
    default_writable_capacity: usize,
}

impl HeaderHeap {
    pub const DEFAULT_CAPACITY: usize = 2048;

    pub fn new(capacity: usize) -> Self {
        Self {
            magic: Cell::new(HeapMagic::Alive),
            writable: RefCell::new(None),
            ronly: RefCell::new([None, None, None]),
            lost_string_bytes: Cell::new(0),
            default_writable_capacity: capacity,
        }
    }

    pub fn magic(&self) -> HeapMagic {
        self.magic.get()
    }

    pub fn is_alive(&self) -> bool {
        self.magic.get() == HeapMagic::Alive
    }

    pub fn mark_dead(&self) {
        self.magic.set(HeapMagic::Dead);
    }

    fn ensure_writable(&self) {
        let mut w = self.writable.borrow_mut();
        if w.is_none() {
            *w = Some(WritableStringHeap::new(self.default_writable_capacity));
        }
    }

    /// Allocates `bytes` into the writable string heap, growing the heap
    /// (via demote + fresh writable heap) if the current one is exhausted.
    pub fn allocate_string(&self, bytes: &[u8]) -> Result<StrRef> {
        self.ensure_writable();
        {
            let mut w = self.writable.borrow_mut();
            if let Some((offset, len)) = w.as_mut().unwrap().allocate(bytes) {
                return Ok(StrRef::Inline { offset, len });
            }
        }
        // Writable heap exhausted: demote it to read-only and start fresh.
        self.demote_writable_string_heap()?;
        *self.writable.borrow_mut() = Some(WritableStringHeap::new(
            self.default_writable_capacity.max(bytes.len()),
        ));
        let mut w = self.writable.borrow_mut();
        w.as_mut()
            .unwrap()
            .allocate(bytes)
            .map(|(offset, len)| StrRef::Inline { offset, len })
            .ok_or(HdrError::HeapExhausted)
    }

    /// Wraps an externally owned buffer range without copying.
    pub fn external_string(buf: Arc<[u8]>, offset: usize, len: usize) -> StrRef {
        StrRef::External(buf, offset, len)
    }

    /// Grows `r` to `new_len` bytes, in place when possible. Only an
    /// `Inline` ref that is still the writable heap's most recent
    /// allocation can grow in place; any other ref (a stale `Inline`, a
    /// `Shared` slot, or an `External` buffer) falls back to copying the
    /// existing bytes into a fresh writable-heap allocation, zero-padding
    /// the tail if `new_len` is longer than what's there.
    pub fn expand_string(&self, r: &StrRef, new_len: usize) -> Result<StrRef> {
        if let StrRef::Inline { offset, len } = *r {
            let mut w = self.writable.borrow_mut();
            if let Some(wh) = w.as_mut() {
                if let Some(new_offset) = wh.expand(offset, len, new_len) {
                    return Ok(StrRef::Inline {
                        offset: new_offset,
                        len: new_len,
                    });
                }
            }
        }
        let mut buf = Vec::with_capacity(new_len);
        self.with_bytes(r, |b| buf.extend_from_slice(b));
        buf.resize(new_len, 0);
        self.allocate_string(&buf)
    }

    /// Copies the bytes `r` refers to into a fresh writable-heap allocation,
    /// independent of whatever heap or slot `r` currently lives in. Used
    /// before mutating a string that may be shared (e.g. still referenced
    /// from a locked read-only slot).
    pub fn duplicate_string(&self, r: &StrRef) -> Result<StrRef> {
        let mut buf = Vec::new();
        self.with_bytes(r, |b| buf.extend_from_slice(b));
        self.allocate_string(&buf)
    }

    /// Runs `f` with the referenced bytes borrowed out of whichever heap
    /// owns them. Kept callback-shaped (rather than returning `&[u8]`
    /// directly) so the borrow never has to outlive the `RefCell` guard.
    pub fn with_bytes<R>(&self, r: &StrRef, f: impl FnOnce(&[u8]) -> R) -> R {
        match r {
            StrRef::Inline { offset, len } => {
                let w = self.writable.borrow();
                f(w.as_ref().expect("inline ref with no writable heap").get(*offset, *len))
            }
            StrRef::Shared { slot, offset, len } => {
                let ronly = self.ronly.borrow();
                let slot = ronly[*slot].as_ref().expect("shared ref into empty slot");
                f(slot.heap.get(*offset, *len))
            }
            StrRef::External(buf, offset, len) => f(&buf[*offset..*offset + *len]),
        }
    }

    /// Ensures `bytes` is reachable from this heap's own storage, copying
    /// into the writable heap if it is not already resolvable from one of
    /// this heap's slots.
    pub fn localize(&self, bytes: &[u8]) -> Result<StrRef> {
        self.allocate_string(bytes)
    }

    /// Incorporates another heap's writable and read-only string heaps as
    /// additional read-only slots here, bumping refcounts without copying.
    /// Returns the slot index each inherited heap landed in, in order
    /// (writable heap first, if present).
    pub fn inherit_string_heaps(&self, src: &HeaderHeap) -> Result<Vec<usize>> {
        let mut landed = Vec::new();
        if let Some(w) = src.writable.borrow().as_ref() {
            // Can't move a borrowed writable heap out; snapshot its bytes.
            let ro = ReadOnlyStringHeap::from_bytes({
                let mut buf = Vec::with_capacity(w.used());
                buf.extend_from_slice(w.get(0, w.used()));
                buf
            });
            landed.push(self.install_ronly(ro)?);
        }
        for slot in src.ronly.borrow().iter().flatten() {
            landed.push(self.install_ronly(slot.heap.clone())?);
        }
        Ok(landed)
    }

    fn install_ronly(&self, heap: ReadOnlyStringHeap) -> Result<usize> {
        let mut slots = self.ronly.borrow_mut();
        if let Some(i) = slots.iter().position(|s| s.is_none()) {
            slots[i] = Some(RonlySlot {
                heap,
                locked: false,
            });
            return Ok(i);
        }
        drop(slots);
        self.coalesce_string_heaps()?;
        let mut slots = self.ronly.borrow_mut();
        let i = slots
            .iter()
            .position(|s| s.is_none())
            .ok_or(HdrError::HeapExhausted)?;
        slots[i] = Some(RonlySlot {
            heap,
            locked: false,
        });
        Ok(i)
    }

    /// Installs the current writable heap into the first free read-only
    /// slot, triggering a coalesce first if the slot array is full.
    pub fn demote_writable_string_heap(&self) -> Result<()> {
        let taken = self.writable.borrow_mut().take();
        let Some(w) = taken else { return Ok(()) };
        let ro = w.demote();
        self.install_ronly(ro)?;
        Ok(())
    }

    /// Merges every read-only slot (skipping locked ones) into a single new
    /// writable heap, reclaiming `lost_string_bytes`. String pointers that
    /// referenced the merged slots are left stale by design: callers are
    /// expected to re-localize strings they still need before coalescing,
    /// mirroring the source's "walk every object, rewrite every pointer"
    /// pass, which this crate's object layer performs by holding `StrRef`
    /// values directly rather than raw offsets into a shared arena.
    pub fn coalesce_string_heaps(&self) -> Result<()> {
        let mut slots = self.ronly.borrow_mut();
        let unlocked: Vec<ReadOnlyStringHeap> = slots
            .iter()
            .filter_map(|s| match s {
                Some(s) if !s.locked => Some(s.heap.clone()),
                _ => None,
            })
            .collect();
        if unlocked.is_empty() {
            return Ok(());
        }
        let (merged, _offsets) = ReadOnlyStringHeap::coalesce(&unlocked);
        let mut merged_taken = false;
        for slot in slots.iter_mut() {
            if let Some(s) = slot {
                if !s.locked {
                    *slot = None;
                }
            }
        }
        if let Some(empty) = slots.iter().position(|s| s.is_none()) {
            slots[empty] = Some(RonlySlot {
                heap: merged,
                locked: false,
            });
            merged_taken = true;
        }
        self.lost_string_bytes.set(0);
        if !merged_taken {
            return Err(HdrError::HeapExhausted);
        }
        Ok(())
    }

    pub fn lock_ronly(&self, i: usize) {
        if let Some(slot) = self.ronly.borrow_mut()[i].as_mut() {
            slot.locked = true;
        }
    }

    /// Unlocks slot `i`, then compacts the slot array leftward so occupied
    /// slots stay densely packed from index 0.
    pub fn unlock_ronly(&self, i: usize) {
        let mut slots = self.ronly.borrow_mut();
        if let Some(slot) = slots[i].as_mut() {
            slot.locked = false;
        }
        let mut packed: Vec<Option<RonlySlot>> = slots.iter_mut().map(Option::take).collect();
        packed.retain(|s| s.is_some());
        for (dst, src) in slots.iter_mut().zip(packed.into_iter().chain(std::iter::repeat_with(|| None))) {
            *dst = src;
        }
    }

    pub fn record_lost_bytes(&self, n: usize) {
        self.lost_string_bytes.set(self.lost_string_bytes.get() + n);
    }

    pub fn lost_string_bytes(&self) -> usize {
        self.lost_string_bytes.get()
    }

    /// RAII guard that locks the read-only slot backing `r` (a no-op for
    /// `Inline`/`External` refs, which coalesce never touches) until
    /// dropped, preventing coalesce from relocating the string meanwhile.
    pub fn scoped_guard<'a>(&'a self, r: &StrRef) -> HeapGuard<'a> {
        if let StrRef::Shared { slot, .. } = r {
            self.lock_ronly(*slot);
            HeapGuard {
                heap: self,
                slot: Some(*slot),
            }
        } else {
            HeapGuard {
                heap: self,
                slot: None,
            }
        }
    }
}

pub struct HeapGuard<'a> {
    heap: &'a HeaderHeap,
    slot: Option<usize>,
}

impl<'a> Drop for HeapGuard<'a> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            self.heap.unlock_ronly(slot);
        }
    }
}
