//! Board geometry: coordinates, bounds and the gravity axis
//!
//! Every topology addresses cells by an integer `(x, y)` pair. On linear boards `x` is
//! the column and `y` the row, with row 0 at the bottom. On ring boards `x` is the
//! angular slot (wrapping modulo the slot count) and `y` the ring index, ring 0 being
//! the outermost. Gravity always acts along `y`; its sign says which edge is the sink.

use serde::{Deserialize, Serialize};

/// A cell address in topology coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Direction pieces fall on a linear board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gravity {
    /// Toward row 0
    Down,
    /// Toward the top row
    Up,
}

impl Gravity {
    pub fn sign(self) -> i32 {
        match self {
            Gravity::Down => -1,
            Gravity::Up => 1,
        }
    }
}

/// The three board geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Linear {
        width: i32,
        height: i32,
        gravity: Gravity,
    },
    Ring {
        rings: i32,
        slots: i32,
    },
    /// A downward linear grid steered by two pieces mirrored about the center column
    MirrorDual {
        width: i32,
        height: i32,
    },
}

impl Topology {
    /// Step along `y` that moves a cell toward the sink
    pub fn sink_sign(&self) -> i32 {
        match self {
            Topology::Linear { gravity, .. } => gravity.sign(),
            Topology::Ring { .. } => 1,
            Topology::MirrorDual { .. } => -1,
        }
    }

    /// Anchor delta of one gravity step
    pub fn gravity_step(&self) -> (i32, i32) {
        (0, self.sink_sign())
    }

    /// Number of lines (rows or rings) on the board
    pub fn line_count(&self) -> i32 {
        match self {
            Topology::Linear { height, .. } | Topology::MirrorDual { height, .. } => *height,
            Topology::Ring { rings, .. } => *rings,
        }
    }

    /// Number of cells that make a line full
    pub fn line_len(&self) -> i32 {
        match self {
            Topology::Linear { width, .. } | Topology::MirrorDual { width, .. } => *width,
            Topology::Ring { slots, .. } => *slots,
        }
    }

    /// Line at the edge where new pieces enter
    pub fn source_line(&self) -> i32 {
        if self.sink_sign() < 0 {
            self.line_count() - 1
        } else {
            0
        }
    }

    /// Canonical key for a coordinate; wraps the angular index on rings
    pub fn cell_key(&self, coord: Coord) -> Coord {
        match self {
            Topology::Ring { slots, .. } => Coord::new(coord.x.rem_euclid(*slots), coord.y),
            _ => coord,
        }
    }

    /// Cell covered by `offset` of a piece anchored at `anchor`
    ///
    /// Offsets grow toward the sink, so the same catalog shape reads the same way up
    /// under either gravity.
    pub fn project(&self, anchor: Coord, (ox, oy): (i32, i32)) -> Coord {
        self.cell_key(Coord::new(anchor.x + ox, anchor.y + oy * self.sink_sign()))
    }

    /// Cells covered by a piece with `offsets` anchored at `anchor`
    ///
    /// Rings lay every piece flat along the anchor's ring: cell `i` sits `i` slots
    /// clockwise of the anchor, whatever the shape's outline.
    pub fn piece_cells(&self, anchor: Coord, offsets: &[(i32, i32)]) -> Vec<Coord> {
        match self {
            Topology::Ring { .. } => (0..offsets.len() as i32)
                .map(|i| self.cell_key(Coord::new(anchor.x + i, anchor.y)))
                .collect(),
            _ => offsets
                .iter()
                .map(|&offset| self.project(anchor, offset))
                .collect(),
        }
    }

    /// Whether a cell blocks movement because it lies off the playfield
    ///
    /// Cells beyond the source edge do not block: pieces may poke out where they entered.
    pub fn is_out_of_bounds(&self, coord: Coord) -> bool {
        match *self {
            Topology::Linear { width, height, .. } | Topology::MirrorDual { width, height } => {
                if coord.x < 0 || coord.x >= width {
                    return true;
                }
                if self.sink_sign() < 0 {
                    coord.y < 0
                } else {
                    coord.y >= height
                }
            }
            Topology::Ring { rings, .. } => coord.y >= rings,
        }
    }

    /// Whether a cell lies on the stored part of the board
    pub fn is_on_board(&self, coord: Coord) -> bool {
        !self.is_out_of_bounds(coord) && coord.y >= 0 && coord.y < self.line_count()
    }

    /// All cell keys of one line
    pub fn line_cells(&self, line: i32) -> impl Iterator<Item = Coord> {
        (0..self.line_len()).map(move |x| Coord::new(x, line))
    }

    /// Horizontal reflection about the vertical center line of a mirror board
    pub fn mirror_x(&self, x: i32) -> i32 {
        match self {
            Topology::MirrorDual { width, .. } | Topology::Linear { width, .. } => width - 1 - x,
            Topology::Ring { .. } => x,
        }
    }

    /// Where a freshly spawned piece is anchored; `slot` picks the angle on rings
    ///
    /// Mirror boards place the left piece near the left wall so the pair starts apart.
    pub fn entry_point(&self, slot: i32) -> Coord {
        match *self {
            Topology::Linear { width, .. } => Coord::new(width / 2 - 1, self.source_line()),
            Topology::Ring { slots, .. } => Coord::new(slot.rem_euclid(slots), 0),
            Topology::MirrorDual { .. } => Coord::new(MIRROR_ENTRY_X, self.source_line()),
        }
    }

    pub fn is_ring(&self) -> bool {
        matches!(self, Topology::Ring { .. })
    }
}

/// Column of the left piece's anchor at spawn in mirror mode
pub const MIRROR_ENTRY_X: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: Topology = Topology::Linear {
        width: 10,
        height: 20,
        gravity: Gravity::Down,
    };
    const FLIPPED: Topology = Topology::Linear {
        width: 10,
        height: 20,
        gravity: Gravity::Up,
    };
    const RING: Topology = Topology::Ring {
        rings: 12,
        slots: 16,
    };

    #[test]
    fn test_projection_follows_gravity() {
        let anchor = Coord::new(4, 10);
        assert_eq!(CLASSIC.project(anchor, (1, 1)), Coord::new(5, 9));
        assert_eq!(FLIPPED.project(anchor, (1, 1)), Coord::new(5, 11));
    }

    #[test]
    fn test_ring_pieces_lie_along_one_ring() {
        let t = [(1, 0), (0, 1), (1, 1), (2, 1)];
        assert_eq!(
            RING.piece_cells(Coord::new(14, 3), &t),
            vec![
                Coord::new(14, 3),
                Coord::new(15, 3),
                Coord::new(0, 3),
                Coord::new(1, 3)
            ]
        );
        assert_eq!(
            CLASSIC.piece_cells(Coord::new(4, 10), &t),
            vec![
                Coord::new(5, 10),
                Coord::new(4, 9),
                Coord::new(5, 9),
                Coord::new(6, 9)
            ]
        );
    }

    #[test]
    fn test_linear_bounds() {
        assert!(CLASSIC.is_out_of_bounds(Coord::new(-1, 5)));
        assert!(CLASSIC.is_out_of_bounds(Coord::new(10, 5)));
        assert!(CLASSIC.is_out_of_bounds(Coord::new(3, -1)));
        // Above the source edge is hidden, not blocking
        assert!(!CLASSIC.is_out_of_bounds(Coord::new(3, 20)));
        assert!(!CLASSIC.is_on_board(Coord::new(3, 20)));

        assert!(FLIPPED.is_out_of_bounds(Coord::new(3, 20)));
        assert!(!FLIPPED.is_out_of_bounds(Coord::new(3, -1)));
    }

    #[test]
    fn test_ring_bounds_wrap() {
        assert!(!RING.is_out_of_bounds(Coord::new(-5, 0)));
        assert!(RING.is_out_of_bounds(Coord::new(0, 12)));
        assert_eq!(RING.cell_key(Coord::new(-1, 2)), Coord::new(15, 2));
        assert_eq!(RING.cell_key(Coord::new(16, 2)), Coord::new(0, 2));
    }

    #[test]
    fn test_entry_points() {
        assert_eq!(CLASSIC.entry_point(0), Coord::new(4, 19));
        assert_eq!(FLIPPED.entry_point(0), Coord::new(4, 0));
        assert_eq!(RING.entry_point(20), Coord::new(4, 0));
        let mirror = Topology::MirrorDual {
            width: 10,
            height: 20,
        };
        assert_eq!(mirror.entry_point(0), Coord::new(1, 19));
        assert_eq!(mirror.mirror_x(1), 8);
    }
}
