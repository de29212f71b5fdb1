//! Invariant violations
//!
//! Rejected moves and game over are ordinary return values, never errors. These
//! variants describe states correct command handling can never reach; the controller
//! treats any of them as fatal to the session.

use crate::board::CellId;
use crate::topology::Coord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("cell {coord:?} is already held by occupant {existing:?}, cannot lock {incoming:?}")]
    DuplicateOccupancy {
        coord: Coord,
        existing: CellId,
        incoming: CellId,
    },
    #[error("active cell {coord:?} overlaps locked occupant {occupant:?}")]
    ActiveOverlap { coord: Coord, occupant: CellId },
    #[error("active cell {coord:?} lies outside the playfield")]
    ActiveOutOfBounds { coord: Coord },
    #[error("mirror anchors diverged: left {left:?}, right {right:?}")]
    MirrorAnchor { left: Coord, right: Coord },
    #[error("mirror offset {index} diverged: left {left:?}, right {right:?}")]
    MirrorOffset {
        index: usize,
        left: (i32, i32),
        right: (i32, i32),
    },
    #[error("mirrored pieces overlap at {coord:?}")]
    MirrorOverlap { coord: Coord },
}
