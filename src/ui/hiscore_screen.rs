//! Leaderboard shown between rounds

use glam::Vec2;

use crate::consts::QUIT_BUTTON;
use crate::highscores::HighScores;
use crate::input::{Control, ControllerMap, InputEvent, key_control};
use crate::render::{DrawList, Rgba};
use crate::settings::Settings;
use crate::sim::{Level, format_score};

/// Rows listed on the board
pub const BOARD_ROWS: usize = 10;
const ROW_HEIGHT: f32 = 40.0;

/// Per-player totals, highest first; any action starts the next round
#[derive(Debug, Clone)]
pub struct HiscoreScreen {
    pub totals: Vec<(String, f64)>,
    /// Set by an action key or controller button
    pub start: bool,
    size: Vec2,
}

impl HiscoreScreen {
    pub fn new(scores: &HighScores, size: Vec2) -> Self {
        Self {
            totals: scores.totals(),
            start: false,
            size,
        }
    }

    pub fn handle(&mut self, event: &InputEvent, controllers: &ControllerMap) {
        match *event {
            InputEvent::KeyDown(key) => {
                if let Some((_, Control::Action)) = key_control(key) {
                    self.start = true;
                }
            }
            InputEvent::ButtonDown { instance, button } => {
                if button != QUIT_BUTTON && controllers.slot(instance).is_some() {
                    self.start = true;
                }
            }
            _ => {}
        }
    }

    /// Start a fresh round once requested
    pub fn update(&mut self, settings: &Settings, seed: u64, names: [&str; 2]) -> Option<Level> {
        if !self.start {
            return None;
        }
        self.start = false;
        Some(Level::new(settings, seed, names))
    }

    pub fn draw(&self) -> DrawList {
        let mut list = DrawList::new();
        let left = self.size.x / 2.0 - 120.0;
        list.text("HIGH SCORES", Vec2::new(left, 60.0), Rgba::YELLOW);

        for (row, (name, total)) in self.totals.iter().take(BOARD_ROWS).enumerate() {
            let y = 60.0 + ROW_HEIGHT * (row as f32 + 2.0);
            let rank = format!("{:>2}. {}", row + 1, name);
            list.text(rank, Vec2::new(left, y), Rgba::WHITE);
            let total = format_score(*total as f32);
            list.text(total, Vec2::new(left + 160.0, y), Rgba::WHITE);
        }

        let prompt_y = self.size.y - 60.0;
        list.text("PRESS FIRE TO PLAY", Vec2::new(left, prompt_y), Rgba::GREY);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::render::DrawCommand;

    fn button(instance: u32, button: u8) -> InputEvent {
        InputEvent::ButtonDown { instance, button }
    }

    fn board(scores: &HighScores) -> HiscoreScreen {
        HiscoreScreen::new(scores, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_totals_sum_all_opponents() {
        let mut scores = HighScores::new();
        scores.record("ABC", "X", 10.0);
        scores.record("ABC", "Y", 20.0);
        scores.record("DEF", "X", 25.0);
        let screen = board(&scores);
        assert_eq!(
            screen.totals,
            vec![("ABC".to_string(), 30.0), ("DEF".to_string(), 25.0)]
        );
    }

    #[test]
    fn test_action_key_starts_round() {
        let settings = Settings::default();
        let mut screen = board(&HighScores::new());
        screen.handle(&InputEvent::KeyDown(Key::Char('w')), &ControllerMap::new());
        assert!(screen.update(&settings, 1, ["ABC", "XYZ"]).is_none());

        screen.handle(&InputEvent::KeyDown(Key::Space), &ControllerMap::new());
        let level = screen.update(&settings, 1, ["ABC", "XYZ"]).expect("round should start");
        assert_eq!(level.players[0].name, "ABC");
        assert_eq!(level.players[1].name, "XYZ");
        assert_eq!(level.elapsed, 0.0);
        assert!(screen.update(&settings, 1, ["ABC", "XYZ"]).is_none());
    }

    #[test]
    fn test_controller_button_starts_round() {
        let mut controllers = ControllerMap::new();
        controllers.attach(3, 1);
        let mut screen = board(&HighScores::new());

        screen.handle(&button(8, 0), &controllers);
        assert!(!screen.start);
        screen.handle(&button(3, QUIT_BUTTON), &controllers);
        assert!(!screen.start);
        screen.handle(&button(3, 0), &controllers);
        assert!(screen.start);
    }

    #[test]
    fn test_board_lists_top_rows() {
        let mut scores = HighScores::new();
        for i in 0..15 {
            scores.record(&format!("P{:02}", i), "X", f64::from(i));
        }
        let list = board(&scores).draw();
        let rows = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { text, .. } if text.contains(". P")))
            .count();
        assert_eq!(rows, BOARD_ROWS);
        assert!(
            list.commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == " 1. P14"))
        );
    }
}
