//! Memory filling for Argon2.
//!
//! The filler walks the matrix pass by pass and slice by slice. Within a
//! slice every lane fills its own segment; the segments are independent,
//! so with the `parallel` feature they are handed to a worker pool sized by
//! the parallelism parameter. The end of a slice is a barrier: every lane
//! finishes slice N before any lane starts slice N+1, since slice N+1 may
//! reference blocks of slice N in any lane.
//!
//! The output does not depend on how many workers are used.

use tracing::trace;

use super::block::{AddressInput, BLOCK_WORDS, Block};
use super::error::Result;
use super::memory::{Matrix, SYNC_POINTS, SliceView};
use super::params::{Params, Version};
use super::reference::{Position, reference_position};

/// Progress of a [`LaneFiller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillState {
    Uninitialized,
    PassInProgress(u32),
    Complete,
}

/// Fills a matrix whose first two columns have already been initialized.
pub(crate) struct LaneFiller<'a> {
    matrix: &'a mut Matrix,
    passes: u32,
    version: Version,
    state: FillState,
    #[cfg(feature = "parallel")]
    workers: Option<rayon::ThreadPool>,
}

impl<'a> LaneFiller<'a> {
    /// Prepares a filler for `matrix`.
    ///
    /// With the `parallel` feature and more than one lane, this spawns a
    /// worker pool of `min(parallelism, available cores)` threads. Failing
    /// to spawn it is a [`HashingFailure`](super::error::Error::HashingFailure).
    ///
    /// The pool belongs to this filler and is torn down when it drops, so
    /// every derivation with `p >= 2` pays for a few thread spawns. That is
    /// small next to filling even the minimum memory cost.
    pub(crate) fn new(matrix: &'a mut Matrix, params: &Params) -> Result<Self> {
        #[cfg(feature = "parallel")]
        let workers = worker_pool(params.parallelism)?;

        Ok(Self {
            matrix,
            passes: params.time_cost,
            version: params.version,
            state: FillState::Uninitialized,
            #[cfg(feature = "parallel")]
            workers,
        })
    }

    pub(crate) fn state(&self) -> FillState {
        self.state
    }

    /// Runs every pass and returns the number of blocks computed.
    pub(crate) fn run(&mut self) -> u64 {
        let mut computed = 0u64;

        for pass in 0..self.passes {
            self.state = FillState::PassInProgress(pass);
            trace!(pass, "filling pass");

            for slice in 0..SYNC_POINTS {
                computed += self.fill_slice(pass, slice);
            }
        }

        self.state = FillState::Complete;
        computed
    }

    /// Fills one slice across all lanes; returns once every lane is done.
    fn fill_slice(&mut self, pass: u32, slice: u32) -> u64 {
        let segment = SegmentFill {
            passes: self.passes,
            version: self.version,
        };
        let view = self.matrix.slice_view();
        let lanes = view.layout().lanes;

        #[cfg(feature = "parallel")]
        if let Some(workers) = &self.workers {
            use rayon::prelude::*;

            return workers.install(|| {
                (0..lanes)
                    .into_par_iter()
                    .map(|lane| segment.fill(view, Position { pass, lane, slice }))
                    .sum::<u64>()
            });
        }

        (0..lanes)
            .map(|lane| segment.fill(view, Position { pass, lane, slice }))
            .sum::<u64>()
    }
}

#[cfg(feature = "parallel")]
fn worker_pool(parallelism: u32) -> Result<Option<rayon::ThreadPool>> {
    use super::error::Error;

    if parallelism < 2 {
        return Ok(None);
    }

    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    let threads = (parallelism as usize).min(cores);
    if threads < 2 {
        return Ok(None);
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("argon2id-lane-{i}"))
        .build()
        .map(Some)
        .map_err(|err| Error::HashingFailure(format!("failed to start lane workers: {err}")))
}

/// Per-pass settings shared by every segment worker.
#[derive(Clone, Copy)]
struct SegmentFill {
    passes: u32,
    version: Version,
}

impl SegmentFill {
    /// Fills the segment at `position` and returns the number of blocks
    /// computed.
    ///
    /// For each block this:
    /// 1. takes J1, J2 from an address block or from the previous block,
    /// 2. maps them to a reference block,
    /// 3. stores G(previous, reference), XORed into the old contents on
    ///    later passes of version 1.3.
    fn fill(self, view: SliceView<'_>, position: Position) -> u64 {
        let layout = *view.layout();
        let data_independent = position.is_data_independent();

        let address_input = AddressInput {
            pass: position.pass,
            lane: position.lane,
            slice: position.slice,
            memory_blocks: layout.total_blocks,
            passes: self.passes,
        };
        let mut address_counter = 0u64;
        let mut addresses = Block::ZERO;

        let start = if position.pass == 0 && position.slice == 0 {
            // Columns 0 and 1 come from H'.
            if data_independent {
                address_counter += 1;
                addresses = Block::address_block(&address_input, address_counter);
            }
            2
        } else {
            0
        };

        let overwrite = position.pass == 0 || self.version == Version::V0x10;

        for i in start..layout.segment_len {
            let index = layout.slice_start(position.slice) + i;
            let prev = if index == 0 { layout.lane_len - 1 } else { index - 1 };

            let pseudo_rand = if data_independent {
                if i as usize % BLOCK_WORDS == 0 {
                    address_counter += 1;
                    addresses = Block::address_block(&address_input, address_counter);
                }
                addresses.0[i as usize % BLOCK_WORDS]
            } else {
                // SAFETY: `prev` is in this worker's own lane and is not
                // being written.
                unsafe { view.block(position.lane, prev) }.0[0]
            };

            let (ref_lane, ref_index) =
                reference_position(&layout, position, i, pseudo_rand);

            // SAFETY: `prev` belongs to this lane; the reference block is
            // either earlier in this lane or outside the current slice of
            // another lane. Neither is the block being written.
            let next = unsafe {
                Block::compress(
                    view.block(position.lane, prev),
                    view.block(ref_lane, ref_index),
                )
            };

            // SAFETY: `index` lies in this worker's segment and the shared
            // references above are no longer used.
            let current = unsafe { view.block_mut(position.lane, index) };
            if overwrite {
                *current = next;
            } else {
                current.in_place_xor(&next);
            }
        }

        u64::from(layout.segment_len - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2id::memory::Layout;

    #[test]
    fn filler_walks_every_pass_and_reports_work() {
        let params = Params::new(3, 64, 2, 32);
        let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
        matrix.block_mut(0, 0).0[0] = 1;
        matrix.block_mut(1, 1).0[5] = 7;

        let mut filler = LaneFiller::new(&mut matrix, &params).unwrap();
        assert_eq!(filler.state(), FillState::Uninitialized);

        let computed = filler.run();
        assert_eq!(filler.state(), FillState::Complete);
        assert_eq!(computed, params.block_computations());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn worker_pool_does_not_change_the_result() {
        let params = Params::new(2, 128, 4, 32);
        let fill = |pooled: bool| {
            let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
            for lane in 0..4 {
                matrix.block_mut(lane, 0).0[0] = u64::from(lane) + 1;
                matrix.block_mut(lane, 1).0[7] = u64::from(lane) << 40;
            }

            {
                let mut filler = LaneFiller::new(&mut matrix, &params).unwrap();
                // Force the pool so single-core hosts still run the
                // concurrent path.
                filler.workers = pooled.then(four_workers);
                filler.run();
            }
            (0..4).map(|lane| matrix.last_block(lane).clone()).collect::<Vec<_>>()
        };

        assert!(fill(true) == fill(false));
    }

    #[cfg(feature = "parallel")]
    fn four_workers() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap()
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn four_workers_reproduce_the_rfc_vector() {
        use crate::derivation::argon2id::boundary::{finalize, initial_hash, initialize_lanes};

        let params = Params::new(3, 32, 4, 32)
            .with_secret([3u8; 8])
            .with_associated_data([4u8; 12]);
        let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
        let h0 = initial_hash(&[1u8; 32], &[2u8; 16], &params);
        initialize_lanes(&mut matrix, &h0);

        {
            let mut filler = LaneFiller::new(&mut matrix, &params).unwrap();
            filler.workers = Some(four_workers());
            filler.run();
        }

        assert_eq!(
            finalize(&matrix, 32).unwrap(),
            hex_literal::hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659")
        );
    }

    #[test]
    fn more_passes_compute_more_blocks() {
        let computed = |time_cost| {
            let params = Params::new(time_cost, 64, 2, 32);
            let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
            LaneFiller::new(&mut matrix, &params).unwrap().run()
        };

        let counts = [computed(1), computed(2), computed(3)];
        assert!(counts.windows(2).all(|pair| pair[0] < pair[1]), "{counts:?}");
        assert_eq!(counts[1] - counts[0], 64);
    }

    #[test]
    fn more_memory_computes_more_blocks() {
        let computed = |memory_cost_kib| {
            let params = Params::new(1, memory_cost_kib, 1, 32);
            let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
            LaneFiller::new(&mut matrix, &params).unwrap().run()
        };

        assert!(computed(8) < computed(64));
        assert!(computed(64) < computed(256));
    }

    #[test]
    fn legacy_version_overwrites_on_later_passes() {
        let fill = |version| {
            let params = Params::new(2, 16, 1, 32).with_version(version);
            let mut matrix = Matrix::allocate(Layout::new(&params)).unwrap();
            matrix.block_mut(0, 0).0[0] = 0x0123_4567;
            matrix.block_mut(0, 1).0[1] = 0x89ab_cdef;
            LaneFiller::new(&mut matrix, &params).unwrap().run();
            matrix.last_block(0).clone()
        };

        assert!(fill(Version::V0x10) != fill(Version::V0x13));
    }
}
