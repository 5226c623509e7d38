//! Memory organization for Argon2.
//!
//! Memory is organized as a matrix of lanes (rows) and columns, with each
//! cell containing a 1024-byte block. Lanes can be processed independently
//! within each slice, enabling parallelism.
//!
//! The matrix is allocated fallibly, so that a memory cost the machine
//! cannot satisfy surfaces as an error instead of aborting the process, and
//! every block is wiped when the matrix is dropped.

use core::marker::PhantomData;

use tracing::{debug, warn};

use super::block::{BLOCK_SIZE, Block};
use super::error::{Error, Result};
use super::params::Params;

/// Number of slices per lane (synchronization points per pass).
pub(crate) const SYNC_POINTS: u32 = 4;

/// Memory layout parameters for Argon2.
///
/// - Total memory is divided into `lanes` independent rows.
/// - Each lane contains `lane_len` blocks.
/// - Each lane is divided into 4 slices.
/// - Each slice of a lane (a segment) contains `segment_len` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

impl Layout {
    pub(crate) fn new(params: &Params) -> Self {
        let lanes = params.parallelism;
        let total_blocks = params.memory_blocks();
        let lane_len = total_blocks / lanes;
        let segment_len = lane_len / SYNC_POINTS;

        Self {
            lanes,
            lane_len,
            segment_len,
            total_blocks,
        }
    }

    /// Flat index of the block at column `index` of `lane`.
    #[inline]
    pub(crate) fn index(&self, lane: u32, index: u32) -> usize {
        lane as usize * self.lane_len as usize + index as usize
    }

    /// Column of the first block of `slice`.
    #[inline]
    pub(crate) fn slice_start(&self, slice: u32) -> u32 {
        slice * self.segment_len
    }

    /// Size of the matrix in bytes, or `None` if it does not fit in `usize`.
    pub(crate) fn byte_len(&self) -> Option<usize> {
        (self.total_blocks as usize).checked_mul(BLOCK_SIZE)
    }
}

/// The memory matrix of one derivation.
///
/// Owned exclusively by a single hash invocation. Dropping it zeroes every
/// block before the allocation is released, on success, on error and while
/// unwinding alike.
pub(crate) struct Matrix {
    blocks: Vec<Block>,
    layout: Layout,
}

impl Matrix {
    /// Allocates a zeroed matrix for `layout`.
    ///
    /// Returns [`Error::OutOfMemory`] when the allocator refuses the request
    /// or when its size overflows the address space.
    pub(crate) fn allocate(layout: Layout) -> Result<Self> {
        let bytes = layout.byte_len().ok_or(Error::OutOfMemory { bytes: usize::MAX })?;

        let mut blocks = Vec::new();
        if let Err(err) = blocks.try_reserve_exact(layout.total_blocks as usize) {
            warn!(bytes, %err, "memory matrix allocation failed");
            return Err(Error::OutOfMemory { bytes });
        }
        blocks.resize(layout.total_blocks as usize, Block::ZERO);

        debug!(
            lanes = layout.lanes,
            lane_len = layout.lane_len,
            segment_len = layout.segment_len,
            bytes,
            "allocated memory matrix"
        );

        Ok(Self { blocks, layout })
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn block(&self, lane: u32, index: u32) -> &Block {
        &self.blocks[self.layout.index(lane, index)]
    }

    pub(crate) fn block_mut(&mut self, lane: u32, index: u32) -> &mut Block {
        let idx = self.layout.index(lane, index);
        &mut self.blocks[idx]
    }

    /// Last block of `lane`, the one finalization folds into the tag.
    pub(crate) fn last_block(&self, lane: u32) -> &Block {
        self.block(lane, self.layout.lane_len - 1)
    }

    /// Hands out a view that lets one worker per lane fill its segment of
    /// a slice concurrently with the others.
    pub(crate) fn slice_view(&mut self) -> SliceView<'_> {
        SliceView {
            ptr: self.blocks.as_mut_ptr(),
            len: self.blocks.len(),
            layout: self.layout,
            _matrix: PhantomData,
        }
    }
}

/// Shared access to the matrix while the lanes of one slice are filled.
///
/// Argon2 guarantees that, within a slice, the worker filling lane `l`
/// only writes the blocks of its own segment and only reads blocks of its
/// own lane or blocks of other lanes that lie outside the current slice.
/// Segments are therefore disjoint write regions, and no block written
/// during the slice is read by another worker. The view relies on that
/// invariant instead of locking.
#[derive(Clone, Copy)]
pub(crate) struct SliceView<'a> {
    ptr: *mut Block,
    len: usize,
    layout: Layout,
    _matrix: PhantomData<&'a mut [Block]>,
}

// SAFETY: see the type-level comment; concurrent workers never alias a
// block that one of them is writing.
unsafe impl Send for SliceView<'_> {}
unsafe impl Sync for SliceView<'_> {}

impl SliceView<'_> {
    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Reads the block at column `index` of `lane`.
    ///
    /// # Safety
    /// No other worker may be writing this block for the lifetime of the
    /// returned reference.
    #[inline]
    pub(crate) unsafe fn block(&self, lane: u32, index: u32) -> &Block {
        let idx = self.layout.index(lane, index);
        assert!(idx < self.len);
        // SAFETY: in bounds; the caller guarantees there is no concurrent
        // writer.
        unsafe { &*self.ptr.add(idx) }
    }

    /// Mutable access to the block at column `index` of `lane`.
    ///
    /// # Safety
    /// The block must belong to the segment owned by the calling worker
    /// and no other reference to it may be alive.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn block_mut(&self, lane: u32, index: u32) -> &mut Block {
        let idx = self.layout.index(lane, index);
        assert!(idx < self.len);
        // SAFETY: in bounds; the caller owns this block exclusively.
        unsafe { &mut *self.ptr.add(idx) }
    }
}
