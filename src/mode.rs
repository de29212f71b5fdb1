//! Game modes: Classic, Trio, Pento, Circular, Gravity Flip, Mirror

use crate::topology::{Gravity, Topology};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    Classic,     // Seven tetrominoes on a 10x20 grid
    Trio,        // Three-cell pieces
    Pento,       // Five-cell pieces
    Circular,    // Concentric rings collapsing inward
    GravityFlip, // Pieces rise from the floor
    Mirror,      // Two pieces reflected about the center line
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Trio => "Trio",
            GameMode::Pento => "Pento",
            GameMode::Circular => "Circular",
            GameMode::GravityFlip => "Gravity Flip",
            GameMode::Mirror => "Mirror",
        }
    }

    /// Stable identifier used in settings files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Trio => "trio",
            GameMode::Pento => "pento",
            GameMode::Circular => "circular",
            GameMode::GravityFlip => "gravity-flip",
            GameMode::Mirror => "mirror",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Classic => "Seven tetrominoes - level up every 10 lines",
            GameMode::Trio => "Three-cell pieces on the classic grid",
            GameMode::Pento => "All twelve pentominoes on the classic grid",
            GameMode::Circular => "Fill whole rings; the rings collapse toward the center",
            GameMode::GravityFlip => "Pieces fall upward and lines collapse toward the ceiling",
            GameMode::Mirror => "Steer two mirrored pieces at once for a score bonus",
        }
    }

    pub fn all() -> &'static [GameMode] {
        &[
            GameMode::Classic,
            GameMode::Trio,
            GameMode::Pento,
            GameMode::Circular,
            GameMode::GravityFlip,
            GameMode::Mirror,
        ]
    }

    /// Scoring, leveling and drop-speed constants for this mode
    pub fn rules(&self) -> ModeRules {
        match self {
            GameMode::Classic | GameMode::Trio | GameMode::Pento | GameMode::GravityFlip => {
                ModeRules::LINEAR
            }
            GameMode::Mirror => ModeRules::MIRROR,
            GameMode::Circular => ModeRules::CIRCULAR,
        }
    }

    /// Board geometry this mode plays on
    pub fn topology(&self, geometry: &BoardGeometry) -> Topology {
        match self {
            GameMode::Classic | GameMode::Trio | GameMode::Pento => Topology::Linear {
                width: geometry.width,
                height: geometry.height,
                gravity: Gravity::Down,
            },
            GameMode::GravityFlip => Topology::Linear {
                width: geometry.width,
                height: geometry.height,
                gravity: Gravity::Up,
            },
            GameMode::Circular => Topology::Ring {
                rings: geometry.rings,
                slots: geometry.slots,
            },
            GameMode::Mirror => Topology::MirrorDual {
                width: geometry.width,
                height: geometry.height,
            },
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode `{0}` (expected one of classic, trio, pento, circular, gravity-flip, mirror)")]
pub struct UnknownMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        GameMode::all()
            .iter()
            .copied()
            .find(|mode| mode.key() == wanted)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Drop-speed curve: `max(floor, base - level * step)` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropCurve {
    pub base_ms: u64,
    pub step_ms: u64,
    pub floor_ms: u64,
}

/// Per-mode scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    /// Points per line (or ring) per level
    pub multiplier: u32,
    /// Lines needed for each level
    pub lines_per_level: u32,
    pub drop: DropCurve,
}

impl ModeRules {
    pub const LINEAR: ModeRules = ModeRules {
        multiplier: 100,
        lines_per_level: 10,
        drop: DropCurve {
            base_ms: 1000,
            step_ms: 50,
            floor_ms: 100,
        },
    };

    pub const MIRROR: ModeRules = ModeRules {
        multiplier: 150,
        ..ModeRules::LINEAR
    };

    pub const CIRCULAR: ModeRules = ModeRules {
        multiplier: 200,
        lines_per_level: 5,
        drop: DropCurve {
            base_ms: 1500,
            step_ms: 100,
            floor_ms: 200,
        },
    };
}

/// Board dimensions shared by every mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    /// Columns of the linear and mirror grids
    pub width: i32,
    /// Rows of the linear and mirror grids
    pub height: i32,
    /// Concentric rings in circular mode
    pub rings: i32,
    /// Angular slots per ring
    pub slots: i32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            rings: 12,
            slots: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("gravity-flip".parse::<GameMode>(), Ok(GameMode::GravityFlip));
        assert_eq!("Gravity_Flip".parse::<GameMode>(), Ok(GameMode::GravityFlip));
        assert_eq!("circular".parse::<GameMode>(), Ok(GameMode::Circular));
        assert!("tetris99".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_key_round_trips_through_display() {
        for mode in GameMode::all() {
            assert_eq!(mode.to_string().parse::<GameMode>(), Ok(*mode));
        }
    }

    #[test]
    fn test_mode_rules() {
        assert_eq!(GameMode::Classic.rules().multiplier, 100);
        assert_eq!(GameMode::GravityFlip.rules().multiplier, 100);
        assert_eq!(GameMode::Mirror.rules().multiplier, 150);
        assert_eq!(GameMode::Mirror.rules().lines_per_level, 10);
        assert_eq!(GameMode::Circular.rules().multiplier, 200);
        assert_eq!(GameMode::Circular.rules().lines_per_level, 5);
        assert_eq!(GameMode::Circular.rules().drop.base_ms, 1500);
    }

    #[test]
    fn test_topology_per_mode() {
        let geometry = BoardGeometry::default();
        assert!(matches!(
            GameMode::GravityFlip.topology(&geometry),
            Topology::Linear {
                gravity: Gravity::Up,
                ..
            }
        ));
        assert!(matches!(
            GameMode::Circular.topology(&geometry),
            Topology::Ring { rings: 12, slots: 16 }
        ));
        assert!(matches!(
            GameMode::Mirror.topology(&geometry),
            Topology::MirrorDual { width: 10, height: 20 }
        ));
    }
}
