//! Piece definitions
//!
//! Three immutable catalogs: the seven tetrominoes, two trominoes and the twelve
//! pentominoes. Offsets are `(x, y)` with `y` growing toward the sink, anchored at the
//! top-left of each shape's bounding box.

use crate::mode::GameMode;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// A piece definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub name: &'static str,
    /// 0xRRGGBB display color
    pub color: u32,
    pub offsets: &'static [(i32, i32)],
}

impl Shape {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Rotate offsets a quarter turn about the anchor
///
/// Clockwise maps `(x, y)` to `(-y, x)`, counter-clockwise to `(y, -x)`.
pub fn rotate_offsets(offsets: &[(i32, i32)], direction: RotationDirection) -> Vec<(i32, i32)> {
    offsets
        .iter()
        .map(|&(x, y)| match direction {
            RotationDirection::Clockwise => (-y, x),
            RotationDirection::CounterClockwise => (y, -x),
        })
        .collect()
}

/// Reflect offsets about the anchor's column
pub fn negate_x(offsets: &[(i32, i32)]) -> Vec<(i32, i32)> {
    offsets.iter().map(|&(x, y)| (-x, y)).collect()
}

pub const TETROMINOES: [Shape; 7] = [
    Shape {
        name: "I",
        color: 0x00ffff,
        offsets: &[(0, 0), (1, 0), (2, 0), (3, 0)],
    },
    Shape {
        name: "O",
        color: 0xffff00,
        offsets: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Shape {
        name: "T",
        color: 0xff00ff,
        offsets: &[(1, 0), (0, 1), (1, 1), (2, 1)],
    },
    Shape {
        name: "S",
        color: 0x00ff00,
        offsets: &[(1, 0), (2, 0), (0, 1), (1, 1)],
    },
    Shape {
        name: "Z",
        color: 0xff0000,
        offsets: &[(0, 0), (1, 0), (1, 1), (2, 1)],
    },
    Shape {
        name: "J",
        color: 0x0000ff,
        offsets: &[(0, 0), (0, 1), (1, 1), (2, 1)],
    },
    Shape {
        name: "L",
        color: 0xff8800,
        offsets: &[(2, 0), (0, 1), (1, 1), (2, 1)],
    },
];

pub const TROMINOES: [Shape; 2] = [
    Shape {
        name: "I3",
        color: 0x00ffff,
        offsets: &[(0, 0), (1, 0), (2, 0)],
    },
    Shape {
        name: "L3",
        color: 0xff00ff,
        offsets: &[(0, 0), (0, 1), (1, 1)],
    },
];

pub const PENTOMINOES: [Shape; 12] = [
    Shape {
        name: "F",
        color: 0xff1493,
        offsets: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Shape {
        name: "I5",
        color: 0x00ffff,
        offsets: &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
    },
    Shape {
        name: "L5",
        color: 0xff8800,
        offsets: &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 3)],
    },
    Shape {
        name: "N",
        color: 0x9370db,
        offsets: &[(1, 0), (2, 0), (0, 1), (1, 1), (0, 2)],
    },
    Shape {
        name: "P",
        color: 0x00ff00,
        offsets: &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)],
    },
    Shape {
        name: "T5",
        color: 0xff00ff,
        offsets: &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)],
    },
    Shape {
        name: "U",
        color: 0xffd700,
        offsets: &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
    },
    Shape {
        name: "V",
        color: 0xff6347,
        offsets: &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
    },
    Shape {
        name: "W",
        color: 0x4169e1,
        offsets: &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)],
    },
    Shape {
        name: "X",
        color: 0xff1493,
        offsets: &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
    },
    Shape {
        name: "Y",
        color: 0x00ced1,
        offsets: &[(1, 0), (0, 1), (1, 1), (1, 2), (1, 3)],
    },
    Shape {
        name: "Z5",
        color: 0xff0000,
        offsets: &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)],
    },
];

/// The catalog a mode draws from
pub fn shapes_for(mode: GameMode) -> &'static [Shape] {
    match mode {
        GameMode::Trio => &TROMINOES,
        GameMode::Pento => &PENTOMINOES,
        GameMode::Classic | GameMode::Circular | GameMode::GravityFlip | GameMode::Mirror => {
            &TETROMINOES
        }
    }
}

/// Uniformly random shape from the mode's catalog
pub fn random_shape<R: Rng + ?Sized>(mode: GameMode, rng: &mut R) -> &'static Shape {
    let catalog = shapes_for(mode);
    // Catalogs are non-empty constants
    catalog.choose(rng).unwrap_or(&catalog[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(shapes_for(GameMode::Classic).len(), 7);
        assert_eq!(shapes_for(GameMode::Trio).len(), 2);
        assert_eq!(shapes_for(GameMode::Pento).len(), 12);
        assert_eq!(shapes_for(GameMode::Circular), shapes_for(GameMode::Classic));
        assert_eq!(shapes_for(GameMode::Mirror), shapes_for(GameMode::GravityFlip));
    }

    #[test]
    fn test_cell_counts_match_catalog() {
        assert!(TETROMINOES.iter().all(|s| s.len() == 4));
        assert!(TROMINOES.iter().all(|s| s.len() == 3));
        assert!(PENTOMINOES.iter().all(|s| s.len() == 5));
    }

    #[test]
    fn test_offsets_are_distinct() {
        for shape in TETROMINOES.iter().chain(&TROMINOES).chain(&PENTOMINOES) {
            let unique: HashSet<_> = shape.offsets.iter().collect();
            assert_eq!(unique.len(), shape.len(), "{} repeats a cell", shape.name);
        }
    }

    #[test]
    fn test_rotation_round_trip() {
        let t = TETROMINOES[2].offsets;
        let cw = rotate_offsets(t, RotationDirection::Clockwise);
        assert_eq!(cw[0], (0, 1));
        let back = rotate_offsets(&cw, RotationDirection::CounterClockwise);
        assert_eq!(back, t);

        let mut full_turn = t.to_vec();
        for _ in 0..4 {
            full_turn = rotate_offsets(&full_turn, RotationDirection::Clockwise);
        }
        assert_eq!(full_turn, t);
    }

    #[test]
    fn test_random_shape_covers_catalog() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seen: HashSet<_> = (0..500)
            .map(|_| random_shape(GameMode::Pento, &mut rng).name)
            .collect();
        assert_eq!(seen.len(), 12);
    }
}
