//! Direct-lookup typecodes for common array shapes.
//!
//! Arrays of rank 1 to [`FAST_PATH_MAX_NDIM`] whose element type is one of
//! the twelve elementary kinds are classified by indexing a fixed grid on
//! (rank, layout, kind), skipping fingerprinting and hashing entirely.
//!
//! Slots are atomics published with release ordering. Populating a slot
//! that a reentrant or concurrent caller already filled is harmless: both
//! writers store the code the resolver produced for the same shape, and the
//! last write wins.

use std::sync::atomic::{AtomicU64, Ordering};

use typecache_core::{
    ArrayShape, BasicKind, Layout, N_BASIC_KINDS, Resolver, Typecode, TypeofResult, ValueShape,
};

/// Highest rank served by the grid.
pub const FAST_PATH_MAX_NDIM: usize = 5;

const N_SLOTS: usize = FAST_PATH_MAX_NDIM * Layout::COUNT * N_BASIC_KINDS;
const UNSET: u64 = u64::MAX;

/// Position of an array shape in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySlot {
    pub ndim: u32,
    pub layout: Layout,
    pub kind: BasicKind,
}

impl ArraySlot {
    /// The slot for `array`, or `None` when the shape is not served by the
    /// grid: rank outside 1..=5, a non-elementary element type, or a
    /// read-only array (the grid has no mutability axis).
    pub fn for_array(array: &ArrayShape) -> Option<Self> {
        if array.ndim == 0 || array.ndim as usize > FAST_PATH_MAX_NDIM || !array.writable {
            return None;
        }
        Some(Self {
            ndim: array.ndim,
            layout: array.layout(),
            kind: array.dtype.basic()?,
        })
    }

    #[inline]
    fn index(self) -> usize {
        ((self.ndim as usize - 1) * Layout::COUNT + self.layout.slot()) * N_BASIC_KINDS
            + self.kind.index()
    }
}

/// Fixed 5 × 3 × 12 grid of cached array typecodes.
pub struct ArrayTypecodeTable {
    slots: [AtomicU64; N_SLOTS],
}

impl Default for ArrayTypecodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayTypecodeTable {
    /// Create a table with every slot unset.
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU64::new(UNSET) }; N_SLOTS],
        }
    }

    /// Classify an array through the grid.
    ///
    /// Returns `None` when the array is not served by the grid; the caller
    /// then falls back to the fingerprint cache with the same value.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_array<R>(
        &self,
        resolver: &mut R,
        array: &ArrayShape,
    ) -> Option<TypeofResult<Typecode>>
    where
        R: Resolver + ?Sized,
    {
        let slot = ArraySlot::for_array(array)?;
        if let Some(code) = self.get(slot) {
            return Some(Ok(code));
        }
        Some(self.populate(slot, resolver, array))
    }

    fn populate<R>(
        &self,
        slot: ArraySlot,
        resolver: &mut R,
        array: &ArrayShape,
    ) -> TypeofResult<Typecode>
    where
        R: Resolver + ?Sized,
    {
        let code = resolver.resolve(&ValueShape::Array(*array))?;
        log::trace!(
            "typecache: array slot {}d {} {} -> {}",
            slot.ndim,
            slot.layout,
            slot.kind.name(),
            code
        );
        self.slots[slot.index()].store(u64::from(code.index()), Ordering::Release);
        Ok(code)
    }

    /// The cached code of a slot, if populated.
    #[inline]
    pub fn get(&self, slot: ArraySlot) -> Option<Typecode> {
        match self.slots[slot.index()].load(Ordering::Acquire) {
            UNSET => None,
            raw => Some(Typecode::new(raw as u32)),
        }
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.load(Ordering::Relaxed) != UNSET)
            .count()
    }
}

impl std::fmt::Debug for ArrayTypecodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayTypecodeTable")
            .field("populated", &self.populated())
            .finish()
    }
}
