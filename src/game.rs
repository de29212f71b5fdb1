//! Core game session: the piece lifecycle shared by every mode
//!
//! A session runs `Spawning -> Active -> Locking -> Clearing -> Spawning` until a new
//! piece collides at its entry point, which ends the game. Everything happens
//! synchronously inside command calls and [`Session::update`].

use crate::board::{Board, CellId, Placement};
use crate::error::InvariantError;
use crate::mirror::MirrorPair;
use crate::mode::{BoardGeometry, GameMode};
use crate::picker::Picker;
use crate::piece::Piece;
use crate::score::Score;
use crate::shape::{RotationDirection, Shape};
use crate::sink::{Appearance, CellOrigin, CellSink, NullSink};
use crate::state::{GameState, Phase};
use crate::topology::{Coord, Topology};

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateCW,
    RotateCCW,
    HardDrop,
}

impl Action {
    pub fn all() -> [Action; 6] {
        [
            Action::MoveLeft,
            Action::MoveRight,
            Action::MoveDown,
            Action::RotateCW,
            Action::RotateCCW,
            Action::HardDrop,
        ]
    }
}

/// The piece (or mirrored pair) currently under control
#[derive(Debug, Clone, PartialEq)]
enum Falling {
    Single(Piece),
    Mirror(MirrorPair),
}

impl Falling {
    fn move_left(&mut self, board: &Board) -> bool {
        match self {
            Falling::Single(piece) => piece.move_left(board),
            Falling::Mirror(pair) => pair.move_left(board),
        }
    }

    fn move_right(&mut self, board: &Board) -> bool {
        match self {
            Falling::Single(piece) => piece.move_right(board),
            Falling::Mirror(pair) => pair.move_right(board),
        }
    }

    fn move_down(&mut self, board: &Board) -> bool {
        match self {
            Falling::Single(piece) => piece.move_down(board),
            Falling::Mirror(pair) => pair.move_down(board),
        }
    }

    fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        match self {
            Falling::Single(piece) => piece.rotate(direction, board),
            Falling::Mirror(pair) => pair.rotate(direction, board),
        }
    }

    fn hard_drop(&mut self, board: &Board) -> u32 {
        match self {
            Falling::Single(piece) => piece.hard_drop(board),
            Falling::Mirror(pair) => pair.hard_drop(board),
        }
    }

    fn fits(&self, board: &Board) -> bool {
        match self {
            Falling::Single(piece) => piece.fits(board),
            Falling::Mirror(pair) => pair.fits(board),
        }
    }

    /// Each piece with its mirrored flag
    fn halves(&self) -> Vec<(&Piece, bool)> {
        match self {
            Falling::Single(piece) => vec![(piece, false)],
            Falling::Mirror(pair) => vec![(pair.left(), false), (pair.right(), true)],
        }
    }

    fn placed(&self, topology: &Topology) -> Vec<(CellId, Coord)> {
        match self {
            Falling::Single(piece) => piece.placed(topology),
            Falling::Mirror(pair) => pair.placed(topology),
        }
    }

    fn ids(&self) -> Vec<CellId> {
        self.halves()
            .into_iter()
            .flat_map(|(piece, _)| piece.ids.iter().copied())
            .collect()
    }
}

/// One running game in one mode
pub struct Session<S: CellSink = NullSink> {
    mode: GameMode,
    board: Board,
    falling: Option<Falling>,
    picker: Picker,
    score: Score,
    phase: Phase,
    /// Milliseconds accumulated toward the next gravity step
    drop_counter_ms: u64,
    /// Timestamp of the previous `update`
    last_time_ms: u64,
    next_cell_id: u64,
    fault: Option<InvariantError>,
    destroyed: bool,
    sink: S,
}

impl Session<NullSink> {
    /// Create a session with a random seed and no renderer
    pub fn headless(mode: GameMode, geometry: &BoardGeometry) -> Self {
        Self::new(mode, geometry, NullSink)
    }
}

impl<S: CellSink> Session<S> {
    /// Create a session with a random seed
    pub fn new(mode: GameMode, geometry: &BoardGeometry, sink: S) -> Self {
        Self::with_seed(mode, geometry, rand::random(), sink)
    }

    /// Create a session whose piece sequence is determined by `seed`
    pub fn with_seed(mode: GameMode, geometry: &BoardGeometry, seed: u64, mut sink: S) -> Self {
        sink.session_started(mode);
        tracing::info!(mode = %mode, seed, "session started");

        let mut session = Self {
            mode,
            board: Board::new(mode.topology(geometry)),
            falling: None,
            picker: Picker::with_seed(mode, seed),
            score: Score::new(mode.rules()),
            phase: Phase::Spawning,
            drop_counter_ms: 0,
            last_time_ms: 0,
            next_cell_id: 0,
            fault: None,
            destroyed: false,
            sink,
        };
        session.spawn();
        session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fault(&self) -> Option<&InvariantError> {
        self.fault.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn drop_interval_ms(&self) -> u64 {
        self.score.drop_interval_ms
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Snapshot of score, level, lines and the game-over flag
    pub fn state(&self) -> GameState {
        GameState {
            mode: self.mode,
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            game_over: self.phase.is_terminal(),
        }
    }

    /// Pieces under control: one, or left then right in mirror mode
    pub fn active_pieces(&self) -> Vec<&Piece> {
        self.falling
            .as_ref()
            .map(|f| f.halves().into_iter().map(|(piece, _)| piece).collect())
            .unwrap_or_default()
    }

    pub fn mirror_pair(&self) -> Option<&MirrorPair> {
        match &self.falling {
            Some(Falling::Mirror(pair)) => Some(pair),
            _ => None,
        }
    }

    /// Board positions of the active cells
    pub fn active_cells(&self) -> Vec<Coord> {
        self.falling
            .as_ref()
            .map(|f| {
                f.placed(self.board.topology())
                    .into_iter()
                    .map(|(_, c)| c)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply an action, returns true if it changed anything
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::MoveDown => self.move_down(),
            Action::RotateCW => self.rotate(),
            Action::RotateCCW => self.rotate_counter_clockwise(),
            Action::HardDrop => self.hard_drop(),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.steer(Falling::move_left)
    }

    pub fn move_right(&mut self) -> bool {
        self.steer(Falling::move_right)
    }

    /// One gravity step; locks the piece when the step is blocked
    ///
    /// Returns true only if the piece moved.
    pub fn move_down(&mut self) -> bool {
        if !self.accepts_commands() {
            return false;
        }
        if self.steer(Falling::move_down) {
            return true;
        }
        self.lock_piece();
        false
    }

    pub fn rotate(&mut self) -> bool {
        self.steer(|falling, board| falling.rotate(RotationDirection::Clockwise, board))
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.steer(|falling, board| falling.rotate(RotationDirection::CounterClockwise, board))
    }

    /// Drop until blocked, then lock; returns true if a piece was locked
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_commands() {
            return false;
        }
        let Some(falling) = self.falling.as_mut() else {
            return false;
        };
        let distance = falling.hard_drop(&self.board);
        if distance > 0 {
            let placed = falling.placed(self.board.topology());
            self.sink.cells_moved(&placed);
        }
        tracing::trace!(distance, "hard drop");
        self.lock_piece();
        true
    }

    /// Advance the drop timer to `now_ms` (call every frame)
    pub fn update(&mut self, now_ms: u64) {
        if !self.accepts_commands() {
            return;
        }
        let delta = now_ms.saturating_sub(self.last_time_ms);
        self.last_time_ms = now_ms;
        self.drop_counter_ms = self.drop_counter_ms.saturating_add(delta);

        if self.drop_counter_ms > self.score.drop_interval_ms {
            self.move_down();
            self.drop_counter_ms = 0;
        }
    }

    /// Release every cell and end the session; safe to call repeatedly
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        let mut ids = self.falling.take().map(|f| f.ids()).unwrap_or_default();
        ids.extend(self.board.drain());
        if !ids.is_empty() {
            self.sink.cells_removed(&ids);
        }
        self.sink.session_ended();
        tracing::info!(mode = %self.mode, score = self.score.points, "session ended");
    }

    /// Destroy the session and hand back its sink
    pub fn into_sink(mut self) -> S {
        self.destroy();
        self.sink
    }

    /// Verify that no active cell overlaps the board and mirror symmetry holds
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let Some(falling) = &self.falling else {
            return Ok(());
        };
        let topology = self.board.topology();
        for (_, coord) in falling.placed(topology) {
            if let Some(occupant) = self.board.get(coord) {
                return Err(InvariantError::ActiveOverlap { coord, occupant });
            }
            if !self.board.within_bounds(coord) {
                return Err(InvariantError::ActiveOutOfBounds { coord });
            }
        }
        if let Falling::Mirror(pair) = falling {
            pair.check_symmetry(topology)?;
        }
        Ok(())
    }

    fn accepts_commands(&self) -> bool {
        self.phase == Phase::Active && !self.destroyed
    }

    /// Run a movement against the active piece and report the new positions
    fn steer(&mut self, op: impl FnOnce(&mut Falling, &Board) -> bool) -> bool {
        if !self.accepts_commands() {
            return false;
        }
        let Some(falling) = self.falling.as_mut() else {
            return false;
        };
        if !op(falling, &self.board) {
            tracing::trace!("command rejected");
            return false;
        }
        let placed = falling.placed(self.board.topology());
        self.sink.cells_moved(&placed);
        self.verify();
        true
    }

    fn verify(&mut self) {
        if let Err(err) = self.check_invariants() {
            self.fail(err);
        }
    }

    fn fail(&mut self, err: InvariantError) {
        tracing::error!(error = %err, mode = %self.mode, "invariant violated, ending session");
        self.fault = Some(err);
        self.phase = Phase::Faulted;
    }

    fn alloc_ids(&mut self, count: usize) -> Vec<CellId> {
        let start = self.next_cell_id;
        self.next_cell_id += count as u64;
        (start..self.next_cell_id).map(CellId).collect()
    }

    fn spawn(&mut self) {
        let shape = self.picker.next_shape();
        self.spawn_shape(shape);
    }

    fn spawn_shape(&mut self, shape: &'static Shape) {
        if self.phase.is_terminal() || self.destroyed {
            return;
        }
        self.phase = Phase::Spawning;

        let topology = *self.board.topology();
        let falling = match topology {
            Topology::MirrorDual { .. } => {
                let left = self.alloc_ids(shape.len());
                let right = self.alloc_ids(shape.len());
                Falling::Mirror(MirrorPair::new(shape, &topology, left, right))
            }
            Topology::Ring { slots, .. } => {
                let slot = self.picker.next_slot(slots);
                let ids = self.alloc_ids(shape.len());
                Falling::Single(Piece::new(shape, topology.entry_point(slot), ids))
            }
            Topology::Linear { .. } => {
                let ids = self.alloc_ids(shape.len());
                Falling::Single(Piece::new(shape, topology.entry_point(0), ids))
            }
        };

        for (piece, mirrored) in falling.halves() {
            self.sink.cells_added(
                &piece.placed(&topology),
                Appearance::of(shape, mirrored),
                CellOrigin::Spawned,
            );
        }

        let fits = falling.fits(&self.board);
        self.falling = Some(falling);
        if !fits {
            self.phase = Phase::GameOver;
            tracing::info!(
                mode = %self.mode,
                score = self.score.points,
                level = self.score.level,
                lines = self.score.lines,
                "game over"
            );
            return;
        }

        tracing::debug!(shape = shape.name, "piece spawned");
        self.phase = Phase::Active;
        self.verify();
    }

    /// Lock the active piece, clear lines and spawn the next one
    fn lock_piece(&mut self) {
        let Some(falling) = self.falling.take() else {
            return;
        };
        self.phase = Phase::Locking;

        let topology = *self.board.topology();
        let mut hidden = Vec::new();
        for (piece, mirrored) in falling.halves() {
            let mut stored = Vec::with_capacity(piece.ids.len());
            for (id, coord) in piece.placed(&topology) {
                match self.board.lock(coord, id) {
                    Ok(Placement::Stored) => stored.push((id, coord)),
                    Ok(Placement::Hidden) => hidden.push(id),
                    Err(err) => {
                        self.fail(err);
                        return;
                    }
                }
            }
            if !stored.is_empty() {
                self.sink.cells_added(
                    &stored,
                    Appearance::of(piece.shape, mirrored),
                    CellOrigin::Locked,
                );
            }
        }
        if !hidden.is_empty() {
            self.sink.cells_removed(&hidden);
        }
        tracing::debug!(hidden = hidden.len(), occupied = self.board.len(), "piece locked");

        self.phase = Phase::Clearing;
        self.clear_lines();
        self.spawn();
    }

    fn clear_lines(&mut self) {
        let collapse = self.board.clear_full_lines();
        if collapse.is_empty() {
            return;
        }
        self.sink.cells_removed(&collapse.removed);
        if !collapse.moved.is_empty() {
            self.sink.cells_moved(&collapse.moved);
        }

        let outcome = self.score.add_clear(collapse.lines.len() as u32);
        tracing::debug!(
            lines = ?collapse.lines,
            points = outcome.points,
            score = self.score.points,
            level = self.score.level,
            "lines cleared"
        );
        if outcome.level_up {
            tracing::info!(
                level = self.score.level,
                interval_ms = self.score.drop_interval_ms,
                "level up"
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Discard the active piece and spawn `shape` in its place
    #[cfg(test)]
    pub(crate) fn replace_piece(&mut self, shape: &'static Shape) {
        self.falling = None;
        self.spawn_shape(shape);
    }
}
