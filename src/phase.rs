//! Phase hand-off
//!
//! The game cycles Level -> ScoreScreen -> HiscoreScreen -> Level. Each phase
//! consumes input and time and may hand back its successor; all shared state
//! (store, settings, controllers, RNG, last names) travels in
//! [`PhaseContext`] instead of globals.

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::HighScores;
use crate::input::{ControllerMap, InputEvent};
use crate::render::DrawList;
use crate::settings::Settings;
use crate::sim::Level;
use crate::ui::{HiscoreScreen, ScoreScreen};

/// Default name for a player who never entered one
pub const DEFAULT_NAME: &str = "---";

/// State shared across phases
#[derive(Debug, Clone)]
pub struct PhaseContext {
    pub settings: Settings,
    pub scores: HighScores,
    pub scores_path: PathBuf,
    pub controllers: ControllerMap,
    /// Seeds each new round
    pub rng: Pcg32,
    /// Names from the last confirmed name entry
    pub names: [String; 2],
}

impl PhaseContext {
    pub fn new(settings: Settings, scores: HighScores, scores_path: PathBuf, seed: u64) -> Self {
        Self {
            settings,
            scores,
            scores_path,
            controllers: ControllerMap::new(),
            rng: Pcg32::seed_from_u64(seed),
            names: [DEFAULT_NAME.to_string(), DEFAULT_NAME.to_string()],
        }
    }

    /// Seed for the next round
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// A fresh round for the remembered names
    pub fn new_level(&mut self) -> Level {
        let seed = self.next_seed();
        let names = [self.names[0].as_str(), self.names[1].as_str()];
        Level::new(&self.settings, seed, names)
    }
}

/// The active screen
#[derive(Debug, Clone)]
pub enum Phase {
    Level(Level),
    Score(ScoreScreen),
    Hiscore(HiscoreScreen),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Level(_) => "level",
            Phase::Score(_) => "score",
            Phase::Hiscore(_) => "hiscore",
        }
    }

    pub fn handle(&mut self, event: &InputEvent, ctx: &PhaseContext) {
        match self {
            Phase::Level(level) => level.handle(event, &ctx.controllers),
            Phase::Score(screen) => screen.handle(event, &ctx.controllers),
            Phase::Hiscore(screen) => screen.handle(event, &ctx.controllers),
        }
    }

    /// Advance by `dt` ms; returns the successor when this phase is done
    pub fn update(&mut self, dt: f32, ctx: &mut PhaseContext) -> Option<Phase> {
        match self {
            Phase::Level(level) => {
                let players = level.update(dt)?;
                Some(Phase::Score(ScoreScreen::new(players, &ctx.settings)))
            }
            Phase::Score(screen) => {
                let next = screen.update(dt, &mut ctx.scores, &ctx.scores_path)?;
                for (slot, name) in ctx.names.iter_mut().zip(screen.names()) {
                    *slot = name;
                }
                Some(Phase::Hiscore(next))
            }
            Phase::Hiscore(screen) => {
                if !screen.start {
                    return None;
                }
                let seed = ctx.next_seed();
                let names = [ctx.names[0].as_str(), ctx.names[1].as_str()];
                screen.update(&ctx.settings, seed, names).map(Phase::Level)
            }
        }
    }

    pub fn draw(&self) -> DrawList {
        match self {
            Phase::Level(level) => level.draw(),
            Phase::Score(screen) => screen.draw(),
            Phase::Hiscore(screen) => screen.draw(),
        }
    }
}
