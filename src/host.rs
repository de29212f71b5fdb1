//! Owns the running session and swaps it when the player picks another mode

use crate::game::{Action, Session};
use crate::mode::GameMode;
use crate::settings::Settings;
use crate::sink::CellSink;
use crate::state::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mode switcher around a single [`Session`]
///
/// Exactly one session exists at a time. The outgoing session is destroyed (its cells
/// removed and `session_ended` reported) before the next one starts on the same sink.
pub struct GameHost<S: CellSink> {
    settings: Settings,
    /// Source of per-session seeds
    seeds: ChaCha8Rng,
    /// Only empty while a switch is in progress
    session: Option<Session<S>>,
}

impl<S: CellSink> GameHost<S> {
    /// Start the settings' default mode
    pub fn new(settings: Settings, sink: S) -> Self {
        let mut seeds = match settings.gameplay.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mode = settings.gameplay.default_mode;
        let session = Session::with_seed(mode, &settings.board, seeds.r#gen(), sink);
        Self {
            settings,
            seeds,
            session: Some(session),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> Option<&Session<S>> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.session.as_ref().map(|s| s.mode())
    }

    /// Replace the running session with a fresh one in `mode`
    ///
    /// Returns false and keeps the current game if `mode` is already running.
    pub fn switch_mode(&mut self, mode: GameMode) -> bool {
        if self.mode() == Some(mode) {
            return false;
        }
        tracing::info!(mode = %mode, "switching mode");
        self.start(mode);
        true
    }

    /// Start the current mode over with a new seed
    pub fn restart(&mut self) {
        let mode = self.mode().unwrap_or(self.settings.gameplay.default_mode);
        self.start(mode);
    }

    fn start(&mut self, mode: GameMode) {
        let Some(old) = self.session.take() else {
            return;
        };
        let sink = old.into_sink();
        let seed = self.seeds.r#gen();
        self.session = Some(Session::with_seed(mode, &self.settings.board, seed, sink));
    }

    fn with_session(&mut self, f: impl FnOnce(&mut Session<S>) -> bool) -> bool {
        self.session.as_mut().is_some_and(f)
    }

    pub fn apply(&mut self, action: Action) -> bool {
        self.with_session(|session| session.apply(action))
    }

    pub fn move_left(&mut self) -> bool {
        self.with_session(Session::move_left)
    }

    pub fn move_right(&mut self) -> bool {
        self.with_session(Session::move_right)
    }

    pub fn move_down(&mut self) -> bool {
        self.with_session(Session::move_down)
    }

    pub fn rotate(&mut self) -> bool {
        self.with_session(Session::rotate)
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.with_session(Session::rotate_counter_clockwise)
    }

    pub fn hard_drop(&mut self) -> bool {
        self.with_session(Session::hard_drop)
    }

    pub fn update(&mut self, now_ms: u64) {
        if let Some(session) = self.session.as_mut() {
            session.update(now_ms);
        }
    }

    pub fn state(&self) -> Option<GameState> {
        self.session.as_ref().map(|s| s.state())
    }

    /// Destroy the running session; safe to call repeatedly
    pub fn destroy(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.destroy();
        }
    }

    /// Destroy the running session and return the sink
    pub fn into_sink(self) -> Option<S> {
        self.session.map(Session::into_sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{EventLog, SinkEvent};

    fn host(mode: GameMode) -> GameHost<EventLog> {
        let mut settings = Settings::default();
        settings.gameplay.default_mode = mode;
        settings.gameplay.seed = Some(7);
        GameHost::new(settings, EventLog::new())
    }

    #[test]
    fn test_starts_default_mode() {
        let host = host(GameMode::Pento);
        assert_eq!(host.mode(), Some(GameMode::Pento));
        assert_eq!(host.settings().gameplay.seed, Some(7));
        let state = host.state().unwrap();
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_switch_to_same_mode_is_noop() {
        let mut host = host(GameMode::Classic);
        host.hard_drop();
        let cells = host.session().unwrap().board().len();
        assert!(!host.switch_mode(GameMode::Classic));
        assert_eq!(host.session().unwrap().board().len(), cells);
        assert_eq!(host.into_sink().unwrap().counts().sessions_started, 1);
    }

    #[test]
    fn test_switch_tears_down_old_session() {
        let mut host = host(GameMode::Classic);
        host.hard_drop();
        host.hard_drop();
        assert!(host.switch_mode(GameMode::Circular));
        assert_eq!(host.mode(), Some(GameMode::Circular));
        assert!(host.session().unwrap().board().is_empty());
        assert!(host.session().unwrap().board().topology().is_ring());

        let log = host.into_sink().unwrap();
        let events = log.events();
        let ended = events
            .iter()
            .position(|e| *e == SinkEvent::SessionEnded)
            .unwrap();
        // Old cells go before the old session ends, the new session starts after
        assert!(matches!(events[ended - 1], SinkEvent::CellsRemoved { .. }));
        assert_eq!(
            events[ended + 1],
            SinkEvent::SessionStarted {
                mode: GameMode::Circular
            }
        );
        // into_sink ended the second session too
        assert_eq!(log.counts().sessions_started, 2);
        assert_eq!(log.counts().sessions_ended, 2);
    }

    #[test]
    fn test_restart_resets_score() {
        let mut host = host(GameMode::Trio);
        for _ in 0..40 {
            host.hard_drop();
        }
        host.restart();
        assert_eq!(host.mode(), Some(GameMode::Trio));
        let state = host.state().unwrap();
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_commands_after_destroy_are_ignored() {
        let mut host = host(GameMode::Mirror);
        host.destroy();
        host.destroy();
        assert!(!host.move_left());
        assert!(!host.hard_drop());
        host.update(10_000);
        assert_eq!(host.into_sink().unwrap().counts().sessions_ended, 1);
    }
}
