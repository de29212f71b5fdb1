//! Cell occupancy and line clearing for every topology

use crate::error::InvariantError;
use crate::topology::{Coord, Topology};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Logical identity of one cell, stable from spawn until the cell is cleared
///
/// Renderers key their own display handles by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub u64);

/// Where a locked cell ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Stored on the board
    Stored,
    /// Beyond the source edge; the cell is discarded
    Hidden,
}

/// Result of clearing full lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collapse {
    /// Cleared line identifiers in the order they were processed
    pub lines: Vec<i32>,
    /// Occupants removed with the cleared lines
    pub removed: Vec<CellId>,
    /// Surviving occupants that shifted, with their final coordinates
    pub moved: Vec<(CellId, Coord)>,
}

impl Collapse {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    topology: Topology,
    /// Locked cells only; the active piece is never stored here
    cells: BTreeMap<Coord, CellId>,
}

impl Board {
    /// Create a new empty board
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            cells: BTreeMap::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Occupant at a cell, if any
    pub fn get(&self, coord: Coord) -> Option<CellId> {
        self.cells.get(&self.topology.cell_key(coord)).copied()
    }

    pub fn occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    pub fn within_bounds(&self, coord: Coord) -> bool {
        !self.topology.is_out_of_bounds(coord)
    }

    /// Check if a cell blocks a piece (off the playfield or occupied)
    pub fn blocks(&self, coord: Coord) -> bool {
        !self.within_bounds(coord) || self.occupied(coord)
    }

    /// Check if every cell is free for a piece
    pub fn are_cells_free(&self, cells: &[Coord]) -> bool {
        cells.iter().all(|&c| !self.blocks(c))
    }

    /// Store a locked cell
    pub fn lock(&mut self, coord: Coord, occupant: CellId) -> Result<Placement, InvariantError> {
        let key = self.topology.cell_key(coord);
        if !self.topology.is_on_board(key) {
            return Ok(Placement::Hidden);
        }
        if let Some(&existing) = self.cells.get(&key) {
            return Err(InvariantError::DuplicateOccupancy {
                coord: key,
                existing,
                incoming: occupant,
            });
        }
        self.cells.insert(key, occupant);
        Ok(Placement::Stored)
    }

    /// Count occupied cells on a line
    pub fn line_fill(&self, line: i32) -> usize {
        self.topology
            .line_cells(line)
            .filter(|c| self.cells.contains_key(c))
            .count()
    }

    /// Check if a line is completely filled
    pub fn is_line_full(&self, line: i32) -> bool {
        self.line_fill(line) == self.topology.line_len() as usize
    }

    /// Full lines, nearest the source edge first
    ///
    /// Collapsing in this order only shifts lines on the source side of the one being
    /// cleared, so later identifiers stay valid.
    pub fn find_full_lines(&self) -> Vec<i32> {
        let sink = self.topology.sink_sign();
        let mut full: Vec<i32> = (0..self.topology.line_count())
            .filter(|&line| self.is_line_full(line))
            .collect();
        full.sort_by_key(|&line| line * sink);
        full
    }

    /// Remove each listed line in turn and shift every line between it and the source
    /// edge one step toward the sink
    pub fn collapse(&mut self, cleared: &[i32]) -> Collapse {
        let sink = self.topology.sink_sign();
        let before: HashMap<CellId, Coord> = self.cells.iter().map(|(&c, &id)| (id, c)).collect();
        let mut removed = Vec::new();

        for &line in cleared {
            let mut next = BTreeMap::new();
            for (coord, id) in std::mem::take(&mut self.cells) {
                if coord.y == line {
                    removed.push(id);
                } else if (coord.y - line) * sink < 0 {
                    next.insert(Coord::new(coord.x, coord.y + sink), id);
                } else {
                    next.insert(coord, id);
                }
            }
            self.cells = next;
        }

        let moved = self
            .cells
            .iter()
            .filter(|&(coord, id)| before.get(id) != Some(coord))
            .map(|(&coord, &id)| (id, coord))
            .collect();

        Collapse {
            lines: cleared.to_vec(),
            removed,
            moved,
        }
    }

    /// Find and collapse every full line
    pub fn clear_full_lines(&mut self) -> Collapse {
        let full = self.find_full_lines();
        if full.is_empty() {
            return Collapse::default();
        }
        self.collapse(&full)
    }

    /// Remove every occupant, returning their ids
    pub fn drain(&mut self) -> Vec<CellId> {
        std::mem::take(&mut self.cells).into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over locked cells in coordinate order
    pub fn cells(&self) -> impl Iterator<Item = (Coord, CellId)> + '_ {
        self.cells.iter().map(|(&c, &id)| (c, id))
    }
}
