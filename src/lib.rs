//! MULTITRIS - falling blocks on four board topologies
//!
//! One piece controller drives every mode. The board geometry decides which way is
//! down: classic rows, inward-collapsing rings, an upside-down grid, or a grid shared
//! by two mirrored pieces.

pub mod board;
pub mod error;
pub mod game;
pub mod host;
pub mod mirror;
pub mod mode;
pub mod picker;
pub mod piece;
pub mod score;
pub mod settings;
pub mod shape;
pub mod sink;
pub mod state;
pub mod topology;

pub use board::{Board, CellId};
pub use error::InvariantError;
pub use game::{Action, Session};
pub use host::GameHost;
pub use mode::{BoardGeometry, GameMode, UnknownMode};
pub use settings::{Settings, SettingsError};
pub use sink::{Appearance, CellOrigin, CellSink, EventLog, NullSink};
pub use state::{GameState, Phase};
pub use topology::{Coord, Topology};
