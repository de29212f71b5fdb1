//! Notifications for the rendering side
//!
//! The engine never touches display objects. It reports cell lifecycles keyed by
//! [`CellId`] and lets the renderer keep its own handles.

use crate::board::CellId;
use crate::mode::GameMode;
use crate::shape::Shape;
use crate::topology::Coord;
use serde::Serialize;

/// How a cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub shape: &'static str,
    /// 0xRRGGBB
    pub color: u32,
    /// Right-hand half of a mirror pair
    pub mirrored: bool,
}

impl Appearance {
    pub fn of(shape: &Shape, mirrored: bool) -> Self {
        Self {
            shape: shape.name,
            color: shape.color,
            mirrored,
        }
    }
}

/// Why cells were added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellOrigin {
    /// A new active piece
    Spawned,
    /// Cells that just became part of the board
    Locked,
}

/// Receiver for cell and session events; every method defaults to a no-op
pub trait CellSink {
    fn session_started(&mut self, _mode: GameMode) {}

    fn session_ended(&mut self) {}

    fn cells_added(&mut self, _cells: &[(CellId, Coord)], _look: Appearance, _origin: CellOrigin) {}

    fn cells_moved(&mut self, _cells: &[(CellId, Coord)]) {}

    fn cells_removed(&mut self, _ids: &[CellId]) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CellSink for NullSink {}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    SessionStarted {
        mode: GameMode,
    },
    SessionEnded,
    CellsAdded {
        cells: Vec<(CellId, Coord)>,
        look: Appearance,
        origin: CellOrigin,
    },
    CellsMoved {
        cells: Vec<(CellId, Coord)>,
    },
    CellsRemoved {
        ids: Vec<CellId>,
    },
}

/// Records every event in order
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<SinkEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Count of added, moved and removed notifications
    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in &self.events {
            match event {
                SinkEvent::SessionStarted { .. } => counts.sessions_started += 1,
                SinkEvent::SessionEnded => counts.sessions_ended += 1,
                SinkEvent::CellsAdded { cells, .. } => counts.cells_added += cells.len(),
                SinkEvent::CellsMoved { cells } => counts.cells_moved += cells.len(),
                SinkEvent::CellsRemoved { ids } => counts.cells_removed += ids.len(),
            }
        }
        counts
    }
}

/// Aggregate event tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub sessions_started: usize,
    pub sessions_ended: usize,
    pub cells_added: usize,
    pub cells_moved: usize,
    pub cells_removed: usize,
}

impl CellSink for EventLog {
    fn session_started(&mut self, mode: GameMode) {
        self.events.push(SinkEvent::SessionStarted { mode });
    }

    fn session_ended(&mut self) {
        self.events.push(SinkEvent::SessionEnded);
    }

    fn cells_added(&mut self, cells: &[(CellId, Coord)], look: Appearance, origin: CellOrigin) {
        self.events.push(SinkEvent::CellsAdded {
            cells: cells.to_vec(),
            look,
            origin,
        });
    }

    fn cells_moved(&mut self, cells: &[(CellId, Coord)]) {
        self.events.push(SinkEvent::CellsMoved {
            cells: cells.to_vec(),
        });
    }

    fn cells_removed(&mut self, ids: &[CellId]) {
        self.events.push(SinkEvent::CellsRemoved { ids: ids.to_vec() });
    }
}

impl<S: CellSink + ?Sized> CellSink for Box<S> {
    fn session_started(&mut self, mode: GameMode) {
        (**self).session_started(mode);
    }

    fn session_ended(&mut self) {
        (**self).session_ended();
    }

    fn cells_added(&mut self, cells: &[(CellId, Coord)], look: Appearance, origin: CellOrigin) {
        (**self).cells_added(cells, look, origin);
    }

    fn cells_moved(&mut self, cells: &[(CellId, Coord)]) {
        (**self).cells_moved(cells);
    }

    fn cells_removed(&mut self, ids: &[CellId]) {
        (**self).cells_removed(ids);
    }
}
