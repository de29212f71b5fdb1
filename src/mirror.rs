//! The mirrored piece pair used on mirror boards
//!
//! The left piece is steered directly. The right piece is derived from it: its anchor
//! is the left anchor reflected about the center column and its offsets are the left
//! offsets with `x` negated, so every right cell is the reflection of the matching left
//! cell. Moves and rotations are tested for both halves together and applied to both
//! or neither.

use crate::board::{Board, CellId};
use crate::error::InvariantError;
use crate::piece::Piece;
use crate::shape::{RotationDirection, Shape, negate_x, rotate_offsets};
use crate::topology::{Coord, Topology};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct MirrorPair {
    left: Piece,
    right: Piece,
}

impl MirrorPair {
    /// Spawn both halves at the mirror entry points
    pub fn new(
        shape: &'static Shape,
        topology: &Topology,
        left_ids: Vec<CellId>,
        right_ids: Vec<CellId>,
    ) -> Self {
        let left = Piece::new(shape, topology.entry_point(0), left_ids);
        let right = Piece {
            shape,
            anchor: Self::reflect(topology, left.anchor),
            offsets: negate_x(&left.offsets),
            ids: right_ids,
        };
        Self { left, right }
    }

    pub fn left(&self) -> &Piece {
        &self.left
    }

    pub fn right(&self) -> &Piece {
        &self.right
    }

    fn reflect(topology: &Topology, anchor: Coord) -> Coord {
        Coord::new(topology.mirror_x(anchor.x), anchor.y)
    }

    /// Cells of both halves for a candidate left anchor and left offsets
    fn cells_for(
        topology: &Topology,
        left_anchor: Coord,
        left_offsets: &[(i32, i32)],
    ) -> (Vec<Coord>, Vec<Coord>) {
        let left = Piece::cells_at(topology, left_anchor, left_offsets);
        let right = Piece::cells_at(
            topology,
            Self::reflect(topology, left_anchor),
            &negate_x(left_offsets),
        );
        (left, right)
    }

    /// Both halves must clear the board on their own and must not overlap each other
    fn is_free(board: &Board, left_anchor: Coord, left_offsets: &[(i32, i32)]) -> bool {
        let (left, right) = Self::cells_for(board.topology(), left_anchor, left_offsets);
        if !board.are_cells_free(&left) || !board.are_cells_free(&right) {
            return false;
        }
        let left: HashSet<Coord> = left.into_iter().collect();
        right.iter().all(|c| !left.contains(c))
    }

    pub fn fits(&self, board: &Board) -> bool {
        Self::is_free(board, self.left.anchor, &self.left.offsets)
    }

    /// Try to shift the pair; `delta` applies to the left piece and its reflection to
    /// the right piece
    pub fn try_move(&mut self, board: &Board, delta: (i32, i32)) -> bool {
        let anchor = self.left.anchor.offset(delta);
        if !Self::is_free(board, anchor, &self.left.offsets) {
            return false;
        }
        self.left.anchor = anchor;
        self.right.anchor = Self::reflect(board.topology(), anchor);
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_move(board, (-1, 0))
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_move(board, (1, 0))
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_move(board, board.topology().gravity_step())
    }

    /// Rotate the left piece and re-derive the right one, no wall kicks
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        let rotated = rotate_offsets(&self.left.offsets, direction);
        if !Self::is_free(board, self.left.anchor, &rotated) {
            return false;
        }
        self.right.offsets = negate_x(&rotated);
        self.left.offsets = rotated;
        true
    }

    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }

    /// Left cells followed by right cells
    pub fn cells(&self, topology: &Topology) -> Vec<Coord> {
        let mut cells = self.left.cells(topology);
        cells.extend(self.right.cells(topology));
        cells
    }

    pub fn placed(&self, topology: &Topology) -> Vec<(CellId, Coord)> {
        let mut placed = self.left.placed(topology);
        placed.extend(self.right.placed(topology));
        placed
    }

    /// Verify the right piece is still the exact reflection of the left one
    pub fn check_symmetry(&self, topology: &Topology) -> Result<(), InvariantError> {
        if self.right.anchor != Self::reflect(topology, self.left.anchor) {
            return Err(InvariantError::MirrorAnchor {
                left: self.left.anchor,
                right: self.right.anchor,
            });
        }
        for (index, (&l, &r)) in self
            .left
            .offsets
            .iter()
            .zip(&self.right.offsets)
            .enumerate()
        {
            if r != (-l.0, l.1) {
                return Err(InvariantError::MirrorOffset {
                    index,
                    left: l,
                    right: r,
                });
            }
        }
        let left: HashSet<Coord> = self.left.cells(topology).into_iter().collect();
        if let Some(&coord) = self
            .right
            .cells(topology)
            .iter()
            .find(|c| left.contains(c))
        {
            return Err(InvariantError::MirrorOverlap { coord });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::TETROMINOES;

    const MIRROR: Topology = Topology::MirrorDual {
        width: 10,
        height: 20,
    };

    fn spawn(shape: &'static Shape) -> MirrorPair {
        let n = shape.len() as u64;
        MirrorPair::new(
            shape,
            &MIRROR,
            (0..n).map(CellId).collect(),
            (n..2 * n).map(CellId).collect(),
        )
    }

    fn assert_mirrored(pair: &MirrorPair) {
        assert!(pair.check_symmetry(&MIRROR).is_ok());
        assert_eq!(pair.right().anchor.x, MIRROR.mirror_x(pair.left().anchor.x));
        let left = pair.left().cells(&MIRROR);
        let right = pair.right().cells(&MIRROR);
        for (l, r) in left.iter().zip(&right) {
            assert_eq!(r.x, MIRROR.mirror_x(l.x));
            assert_eq!(r.y, l.y);
        }
    }

    #[test]
    fn test_spawn_is_symmetric() {
        for shape in &TETROMINOES {
            let pair = spawn(shape);
            assert_mirrored(&pair);
            assert!(pair.fits(&Board::new(MIRROR)));
        }
    }

    #[test]
    fn test_moves_keep_symmetry() {
        let board = Board::new(MIRROR);
        let mut pair = spawn(&TETROMINOES[2]);
        assert!(pair.move_left(&board));
        assert_eq!(pair.left().anchor.x, 0);
        assert_eq!(pair.right().anchor.x, 9);
        assert_mirrored(&pair);
        assert!(pair.move_down(&board));
        // Clockwise T reaches one column left of its anchor
        assert!(!pair.rotate(RotationDirection::Clockwise, &board));
        assert!(pair.move_right(&board));
        assert!(pair.rotate(RotationDirection::Clockwise, &board));
        assert_mirrored(&pair);
        pair.hard_drop(&board);
        assert_mirrored(&pair);
    }

    #[test]
    fn test_halves_cannot_meet() {
        let board = Board::new(MIRROR);
        let mut pair = spawn(&TETROMINOES[0]);
        // I spans four columns; the halves touch at the center after no moves
        assert!(!pair.move_right(&board));
        assert_mirrored(&pair);
    }

    #[test]
    fn test_either_half_can_block() {
        let mut board = Board::new(MIRROR);
        // Block only the right half's landing spot
        board.lock(Coord::new(7, 10), CellId(99)).unwrap();
        let mut pair = spawn(&TETROMINOES[1]);
        pair.hard_drop(&board);
        assert_eq!(pair.left().anchor.y, 12);
        assert_mirrored(&pair);
    }

    #[test]
    fn test_detects_broken_symmetry() {
        let mut pair = spawn(&TETROMINOES[3]);
        pair.right.anchor.x -= 1;
        assert!(matches!(
            pair.check_symmetry(&MIRROR),
            Err(InvariantError::MirrorAnchor { .. })
        ));
    }
}
