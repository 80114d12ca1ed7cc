//! Light Cycles - a two-player light-cycle arcade game
//!
//! Core modules:
//! - `sim`: Round simulation (geometry, players, particles, powerups)
//! - `ui`: Name entry and leaderboard screens
//! - `phase`: Phase hand-off between level and screens
//! - `game`: Top-level driver
//! - `render`: Draw lists and the terminal rasterizer
//! - `input`: Logical input events and key bindings
//! - `highscores`: Matchup high score persistence
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod phase;
pub mod render;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{GameError, GameResult};
pub use game::Game;
pub use highscores::HighScores;
pub use phase::{Phase, PhaseContext};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical (landscape) arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Cycle speed as a fraction of arena height per second
    pub const SPEED_FRACTION: f32 = 0.1;

    /// Trail line width
    pub const TRAIL_WIDTH: f32 = 3.0;

    /// Bonus awarded to every surviving player when an opponent crashes
    pub const WINNER_BONUS: f32 = 1000.0;
    /// Points per second survived, paid at round end
    pub const TIME_BONUS_RATE: f32 = 10.0;

    /// Delay after the first death before the round is scored (ms)
    pub const ROLL_OFF_MS: f32 = 3000.0;

    /// Particles spawned per crash
    pub const BURST_COUNT: usize = 10;

    /// Powerup spawn interval (ms)
    pub const POWERUP_INTERVAL_MS: f32 = 5000.0;
    /// Placement attempts before a spawn cycle is skipped
    pub const POWERUP_RETRIES: u32 = 100;
    /// Powerup hit box edge length
    pub const POWERUP_SIZE: f32 = 16.0;

    /// Controller axis deadzone
    pub const DEADZONE: f32 = 0.1;

    /// Inset of the boundary wall from the arena edge
    pub const BOUNDARY_MARGIN: f32 = 4.0;

    /// Name entry alphabet
    pub const ALPHABET: &str = "-ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    /// Letters in a player name
    pub const NAME_LENGTH: usize = 3;

    /// Controller button that quits when held on both controllers
    pub const QUIT_BUTTON: u8 = 9;
}
