//! Top-level driver
//!
//! Owns the active [`Phase`] and the shared [`PhaseContext`]. Frontends feed
//! it input events and frame times and draw whatever it returns.

use std::path::PathBuf;

use crate::consts::QUIT_BUTTON;
use crate::highscores::HighScores;
use crate::input::{InputEvent, Key};
use crate::phase::{Phase, PhaseContext};
use crate::render::DrawList;
use crate::settings::Settings;

/// Controllers that must hold the quit button together to exit
const QUIT_CONTROLLERS: usize = 2;

#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    ctx: PhaseContext,
    running: bool,
    /// Controller instances currently holding the quit button
    quit_held: Vec<u32>,
}

impl Game {
    /// Start straight into a round
    pub fn new(settings: Settings, scores: HighScores, scores_path: PathBuf, seed: u64) -> Self {
        let mut ctx = PhaseContext::new(settings, scores, scores_path, seed);
        let phase = Phase::Level(ctx.new_level());
        Self {
            phase,
            ctx,
            running: true,
            quit_held: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Bind a controller instance to a player slot
    pub fn attach_controller(&mut self, instance: u32, slot: usize) {
        log::info!("Controller {} attached to player {}", instance, slot + 1);
        self.ctx.controllers.attach(instance, slot);
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape | Key::Char('q')) => {
                log::info!("Quit requested");
                self.running = false;
                return;
            }
            InputEvent::ButtonDown { instance, button } if button == QUIT_BUTTON => {
                let attached = self.ctx.controllers.slot(instance).is_some();
                if attached && !self.quit_held.contains(&instance) {
                    self.quit_held.push(instance);
                }
                if self.quit_held.len() >= QUIT_CONTROLLERS {
                    log::info!("Quit combination held");
                    self.running = false;
                    return;
                }
            }
            InputEvent::ButtonUp { instance, button } if button == QUIT_BUTTON => {
                self.quit_held.retain(|&id| id != instance);
            }
            _ => {}
        }
        self.phase.handle(event, &self.ctx);
    }

    /// Advance the active phase by `dt` milliseconds
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        if let Some(next) = self.phase.update(dt, &mut self.ctx) {
            log::info!("Phase {} -> {}", self.phase.name(), next.name());
            self.phase = next;
        }
    }

    /// Draw list for the frame, optionally rotated for a portrait display
    pub fn draw(&self, rotate: bool) -> DrawList {
        let list = self.phase.draw();
        if rotate {
            list.rotated(self.ctx.settings.arena_width)
        } else {
            list
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;

    fn game(name: &str) -> Game {
        let file = format!("light-cycles-game-{}-{}.json", name, std::process::id());
        let path = std::env::temp_dir().join(file);
        Game::new(Settings::default(), HighScores::new(), path, 42)
    }

    fn quit_down(instance: u32) -> InputEvent {
        InputEvent::ButtonDown {
            instance,
            button: QUIT_BUTTON,
        }
    }

    fn quit_up(instance: u32) -> InputEvent {
        InputEvent::ButtonUp {
            instance,
            button: QUIT_BUTTON,
        }
    }

    #[test]
    fn test_starts_in_level() {
        let g = game("start");
        assert!(g.is_running());
        assert_eq!(g.phase().name(), "level");
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            InputEvent::Quit,
            InputEvent::KeyDown(Key::Escape),
            InputEvent::KeyDown(Key::Char('q')),
        ] {
            let mut g = game("quit");
            g.handle(&event);
            assert!(!g.is_running());
        }
    }

    #[test]
    fn test_quit_needs_both_controllers() {
        let mut g = game("quit-pads");
        g.attach_controller(10, 0);
        g.attach_controller(11, 1);

        g.handle(&quit_down(10));
        g.handle(&quit_down(10));
        assert!(g.is_running());

        g.handle(&quit_up(10));
        g.handle(&quit_down(11));
        assert!(g.is_running());

        g.handle(&quit_down(10));
        assert!(!g.is_running());
    }

    #[test]
    fn test_unknown_controller_cannot_quit() {
        let mut g = game("quit-unknown");
        g.attach_controller(10, 0);
        g.handle(&quit_down(10));
        g.handle(&quit_down(99));
        assert!(g.is_running());
    }

    #[test]
    fn test_steering_reaches_level() {
        let mut g = game("steer");
        g.handle(&InputEvent::KeyDown(Key::Char('w')));
        let Phase::Level(level) = g.phase() else {
            panic!("expected level");
        };
        assert_eq!(level.players[0].trail.len(), 3);
    }

    #[test]
    fn test_round_hands_off_to_score_screen() {
        let mut g = game("handoff");
        for _ in 0..1000 {
            g.update(16.0);
            if g.phase().name() == "score" {
                break;
            }
        }
        assert_eq!(g.phase().name(), "score");
    }

    #[test]
    fn test_rotated_draw() {
        let g = game("rotate");
        let plain = g.draw(false);
        let rotated = g.draw(true);
        assert_eq!(plain.len(), rotated.len());
        let first_text = |list: &DrawList| {
            list.commands.iter().find_map(|c| match c {
                DrawCommand::Text { position, .. } => Some(*position),
                _ => None,
            })
        };
        // (10, 10) -> (10, 800 - 10)
        assert_eq!(first_text(&plain), Some(glam::Vec2::new(10.0, 10.0)));
        assert_eq!(first_text(&rotated), Some(glam::Vec2::new(10.0, 790.0)));
    }

    #[test]
    fn test_stopped_game_does_not_advance() {
        let mut g = game("stopped");
        g.handle(&InputEvent::Quit);
        g.update(1000.0);
        let Phase::Level(level) = g.phase() else {
            panic!("expected level");
        };
        assert_eq!(level.elapsed, 0.0);
    }
}
