//! Round simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep in milliseconds, driven by the frame loop
//! - Seeded RNG only
//! - Stable iteration order (by player slot)
//! - No terminal or device dependencies

pub mod geometry;
pub mod level;
pub mod particle;
pub mod player;
pub mod powerup;

pub use geometry::{
    Orientation, Segment, on_segment, orientation, path_intersects_segment, segments_intersect,
};
pub use level::{Level, PLAYER_COLORS, RoundState, format_score};
pub use particle::{Particle, ParticleSystem};
pub use player::{Direction, Player};
pub use powerup::{Powerup, PowerupKind, PowerupSpawner, placement_is_valid};
