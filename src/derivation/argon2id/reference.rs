//! Reference block position computation for Argon2.
//!
//! When filling a block at position (lane, index), Argon2 needs to select
//! a reference block to mix with the previous block. The selection uses a
//! 64-bit pseudo-random value: the high half picks the lane, the low half
//! picks a block inside the reference area through a non-uniform mapping.

use super::memory::{Layout, SYNC_POINTS};

/// Position of the segment being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
}

impl Position {
    /// Argon2id addresses the first half of the first pass independently
    /// of memory contents.
    pub(crate) fn is_data_independent(&self) -> bool {
        self.pass == 0 && self.slice < SYNC_POINTS / 2
    }
}

/// Computes the reference block for the block at `index` within the
/// segment at `position` (RFC 9106 §3.4.1.3).
///
/// - On the first pass, first slice: only earlier blocks of the same lane.
/// - Otherwise: blocks of any lane, excluding the current slice of other
///   lanes, which may still be in flight.
///
/// The mapping `x = J1² / 2³²`, `z = |R| - 1 - |R|·x / 2³²` biases the
/// choice toward recently written blocks.
///
/// Returns `(reference_lane, reference_index)`.
pub(crate) fn reference_position(
    layout: &Layout,
    position: Position,
    index: u32,
    pseudo_rand: u64,
) -> (u32, u32) {
    let segment_len = u64::from(layout.segment_len);
    let lane_len = u64::from(layout.lane_len);
    let slice = u64::from(position.slice);
    let index = u64::from(index);

    let ref_lane = if position.pass == 0 && position.slice == 0 {
        position.lane
    } else {
        ((pseudo_rand >> 32) % u64::from(layout.lanes)) as u32
    };
    let same_lane = ref_lane == position.lane;

    // Blocks of other lanes are only usable from finished slices; the
    // block just before the current segment is excluded while the first
    // block of the segment is computed.
    let finished = if position.pass == 0 {
        slice * segment_len
    } else {
        lane_len - segment_len
    };
    let reference_area_size = if same_lane {
        finished + index - 1
    } else if index == 0 {
        finished - 1
    } else {
        finished
    };

    let j1 = pseudo_rand & 0xffff_ffff;
    let x = (j1 * j1) >> 32;
    let y = (reference_area_size * x) >> 32;
    let relative_position = reference_area_size - 1 - y;

    let start_position = if position.pass == 0 || position.slice == SYNC_POINTS - 1 {
        0
    } else {
        (slice + 1) * segment_len
    };

    let ref_index = (start_position + relative_position) % lane_len;
    (ref_lane, ref_index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2id::params::Params;

    fn layout() -> Layout {
        // 4 lanes of 16 blocks, segments of 4.
        Layout::new(&Params::new(1, 64, 4, 32))
    }

    #[test]
    fn first_slice_stays_in_lane_and_behind_cursor() {
        let layout = layout();
        let position = Position { pass: 0, lane: 2, slice: 0 };

        for index in 2..layout.segment_len {
            for rand in [0, u64::MAX, 0x1234_5678_9abc_def0] {
                let (lane, col) = reference_position(&layout, position, index, rand);
                assert_eq!(lane, 2);
                assert!(col + 1 < index, "col {col} not behind {index}");
            }
        }
    }

    #[test]
    fn other_lanes_only_expose_finished_slices() {
        let layout = layout();
        let position = Position { pass: 0, lane: 0, slice: 2 };

        for rand_hi in 1..4u64 {
            for index in 0..layout.segment_len {
                for j1 in [0u64, 1, 0x8000_0000, 0xffff_ffff] {
                    let (lane, col) =
                        reference_position(&layout, position, index, (rand_hi << 32) | j1);
                    assert_eq!(lane as u64, rand_hi);
                    assert!(col < layout.slice_start(2));
                }
            }
        }
    }

    #[test]
    fn zero_j1_picks_the_oldest_block() {
        let layout = layout();
        let position = Position { pass: 1, lane: 1, slice: 1 };

        // Same lane: x = 0 so z = |R| - 1, i.e. the farthest block back,
        // which starts right after the current slice.
        let (lane, col) = reference_position(&layout, position, 0, 1 << 32);
        assert_eq!(lane, 1);
        assert_eq!(col, (layout.slice_start(2) + 16 - 4 - 1 - 1) % 16);
    }

    #[test]
    fn data_independent_addressing_covers_first_half_of_first_pass() {
        let pos = |pass, slice| Position { pass, lane: 0, slice };
        assert!(pos(0, 0).is_data_independent());
        assert!(pos(0, 1).is_data_independent());
        assert!(!pos(0, 2).is_data_independent());
        assert!(!pos(1, 0).is_data_independent());
    }
}
