//! Between-round screens: name entry and the leaderboard

pub mod hiscore_screen;
pub mod score_screen;

pub use hiscore_screen::HiscoreScreen;
pub use score_screen::{LetterWheel, ScoreScreen};
