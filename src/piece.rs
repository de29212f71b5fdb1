//! Active falling piece logic

use crate::board::{Board, CellId};
use crate::shape::{RotationDirection, Shape, rotate_offsets};
use crate::topology::{Coord, Topology};

/// An active falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    /// Catalog entry this piece was spawned from
    pub shape: &'static Shape,
    /// Reference coordinate the offsets are relative to
    pub anchor: Coord,
    /// Current rotation of the shape's offsets
    pub offsets: Vec<(i32, i32)>,
    /// One id per offset, in the same order
    pub ids: Vec<CellId>,
}

impl Piece {
    /// Create a piece at `anchor` in the shape's catalog orientation
    pub fn new(shape: &'static Shape, anchor: Coord, ids: Vec<CellId>) -> Self {
        debug_assert_eq!(ids.len(), shape.len());
        Self {
            shape,
            anchor,
            offsets: shape.offsets.to_vec(),
            ids,
        }
    }

    /// Cells covered by a shape with `offsets` anchored at `anchor`
    pub fn cells_at(topology: &Topology, anchor: Coord, offsets: &[(i32, i32)]) -> Vec<Coord> {
        topology.piece_cells(anchor, offsets)
    }

    /// Get the board positions of every cell
    pub fn cells(&self, topology: &Topology) -> Vec<Coord> {
        Self::cells_at(topology, self.anchor, &self.offsets)
    }

    /// Cell ids paired with their current positions
    pub fn placed(&self, topology: &Topology) -> Vec<(CellId, Coord)> {
        self.ids
            .iter()
            .copied()
            .zip(self.cells(topology))
            .collect()
    }

    /// Check the piece's current cells against the board
    pub fn fits(&self, board: &Board) -> bool {
        board.are_cells_free(&self.cells(board.topology()))
    }

    /// Try to shift the anchor, returns true if successful
    pub fn try_move(&mut self, board: &Board, delta: (i32, i32)) -> bool {
        let anchor = board.topology().cell_key(self.anchor.offset(delta));
        let cells = Self::cells_at(board.topology(), anchor, &self.offsets);
        if board.are_cells_free(&cells) {
            self.anchor = anchor;
            true
        } else {
            false
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_move(board, (-1, 0))
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_move(board, (1, 0))
    }

    /// Try to take one gravity step, returns true if successful
    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_move(board, board.topology().gravity_step())
    }

    /// Try to rotate in place, no wall kicks
    ///
    /// Rings have no shape rotation: the verbs shift the piece one slot around the ring
    /// instead, clockwise toward higher slots.
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        if board.topology().is_ring() {
            let step = match direction {
                RotationDirection::Clockwise => 1,
                RotationDirection::CounterClockwise => -1,
            };
            return self.try_move(board, (step, 0));
        }

        let rotated = rotate_offsets(&self.offsets, direction);
        let cells = Self::cells_at(board.topology(), self.anchor, &rotated);
        if board.are_cells_free(&cells) {
            self.offsets = rotated;
            true
        } else {
            false
        }
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }
}
