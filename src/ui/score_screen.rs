//! Name entry after a round
//!
//! Each player spins a three-slot letter wheel. The wheel has inertia: a
//! press kicks its velocity, velocity and sub-letter offset both decay
//! exponentially, and whole letters of offset (rounded toward zero) are
//! folded into the selected letter. Moving past the last slot parks the
//! selector on a confirm marker; once every player is parked there, either
//! player's action key saves.

use std::path::Path;

use glam::Vec2;

use crate::consts::{ALPHABET, NAME_LENGTH, QUIT_BUTTON};
use crate::error::GameResult;
use crate::highscores::HighScores;
use crate::input::{Control, ControllerMap, InputEvent, axis_direction, key_control};
use crate::render::{DrawList, Rgba};
use crate::settings::Settings;
use crate::sim::{Direction, Player, format_score};

use super::hiscore_screen::HiscoreScreen;

/// Selector position of the virtual confirm slot
pub const CONFIRM_COLUMN: usize = NAME_LENGTH;
/// Velocity given to the wheel by a press (letters per ms)
pub const WHEEL_KICK: f32 = 0.02;
/// Wheel velocity decay per ms
pub const WHEEL_VELOCITY_DECAY: f32 = 0.01;
/// Sub-letter offset decay per ms
pub const WHEEL_OFFSET_DECAY: f32 = 0.004;
/// Glyph cell size in arena units
const GLYPH: f32 = 50.0;

/// Number of symbols on the wheel
pub fn alphabet_len() -> usize {
    ALPHABET.chars().count()
}

/// Symbol at a wheel index (wraps)
pub fn letter(index: usize) -> char {
    ALPHABET
        .chars()
        .nth(index % alphabet_len())
        .unwrap_or('-')
}

/// One player's three-letter wheel
#[derive(Debug, Clone, PartialEq)]
pub struct LetterWheel {
    pub letters: [usize; NAME_LENGTH],
    /// Active slot; `CONFIRM_COLUMN` is the confirm marker
    pub column: usize,
    /// Letters per ms
    pub velocity: f32,
    /// Fractional letters, for the rolling animation
    pub offset: f32,
    /// Last stick direction outside the deadzone
    stick: Option<Direction>,
}

impl LetterWheel {
    /// Wheel preset to `name`; unknown symbols start at `-`
    pub fn from_name(name: &str) -> Self {
        let mut letters = [0; NAME_LENGTH];
        for (slot, ch) in letters.iter_mut().zip(name.chars()) {
            *slot = ALPHABET
                .chars()
                .position(|c| c == ch.to_ascii_uppercase())
                .unwrap_or(0);
        }
        Self {
            letters,
            column: 0,
            velocity: 0.0,
            offset: 0.0,
            stick: None,
        }
    }

    pub fn name(&self) -> String {
        self.letters.iter().map(|&i| letter(i)).collect()
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.column == CONFIRM_COLUMN
    }

    /// Move the selector; clamps to `0..=CONFIRM_COLUMN`
    pub fn select(&mut self, delta: isize) {
        let column = (self.column as isize + delta).clamp(0, CONFIRM_COLUMN as isize) as usize;
        if column != self.column {
            self.column = column;
            self.velocity = 0.0;
            self.offset = 0.0;
        }
    }

    /// Kick the active letter forward (`+1`) or backward (`-1`)
    pub fn spin(&mut self, direction: f32) {
        if !self.is_confirmed() {
            self.velocity = WHEEL_KICK * direction.signum();
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_confirmed() {
            return;
        }
        self.offset += self.velocity * dt;
        self.velocity *= (-WHEEL_VELOCITY_DECAY * dt).exp();

        let whole = self.offset.trunc();
        if whole != 0.0 {
            let len = alphabet_len() as i64;
            let index = self.letters[self.column] as i64 + whole as i64;
            self.letters[self.column] = index.rem_euclid(len) as usize;
            self.offset -= whole;
        }
        self.offset *= (-WHEEL_OFFSET_DECAY * dt).exp();
    }

    /// Apply a steering control
    fn steer(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.select(-1),
            Direction::Down => self.select(1),
            Direction::Left => self.spin(-1.0),
            Direction::Right => self.spin(1.0),
        }
    }

    /// Feed a stick reading; only a fresh deflection counts as a press
    fn stick(&mut self, direction: Option<Direction>) {
        if direction != self.stick {
            if let Some(direction) = direction {
                self.steer(direction);
            }
        }
        self.stick = direction;
    }
}

/// Name entry for the players of a finished round
#[derive(Debug, Clone)]
pub struct ScoreScreen {
    pub players: Vec<Player>,
    pub wheels: Vec<LetterWheel>,
    /// Set by a confirm press, consumed by the next update
    pub confirmed: bool,
    size: Vec2,
    deadzone: f32,
}

impl ScoreScreen {
    pub fn new(players: Vec<Player>, settings: &Settings) -> Self {
        let wheels = players.iter().map(|p| LetterWheel::from_name(&p.name)).collect();
        Self {
            players,
            wheels,
            confirmed: false,
            size: Vec2::new(settings.arena_width, settings.arena_height),
            deadzone: settings.deadzone,
        }
    }

    /// True once every player parked on the confirm marker
    pub fn all_ready(&self) -> bool {
        self.wheels.iter().all(LetterWheel::is_confirmed)
    }

    fn control(&mut self, slot: usize, control: Control) {
        match control {
            Control::Steer(direction) => {
                if let Some(wheel) = self.wheels.get_mut(slot) {
                    wheel.steer(direction);
                }
            }
            Control::Action => {
                if self.all_ready() {
                    self.confirmed = true;
                }
            }
        }
    }

    pub fn handle(&mut self, event: &InputEvent, controllers: &ControllerMap) {
        match *event {
            InputEvent::KeyDown(key) => {
                if let Some((slot, control)) = key_control(key) {
                    self.control(slot, control);
                }
            }
            InputEvent::AxisMotion {
                instance,
                axis,
                value,
            } => {
                let Some(slot) = controllers.slot(instance) else {
                    return;
                };
                let direction = axis_direction(axis, value, self.deadzone);
                if let Some(wheel) = self.wheels.get_mut(slot) {
                    wheel.stick(direction);
                }
            }
            InputEvent::ButtonDown { instance, button } if button != QUIT_BUTTON => {
                if let Some(slot) = controllers.slot(instance) {
                    self.control(slot, Control::Action);
                }
            }
            _ => {}
        }
    }

    /// Spin the wheels and keep paying out bonus; saves once confirmed
    pub fn update(
        &mut self,
        dt: f32,
        scores: &mut HighScores,
        path: &Path,
    ) -> Option<HiscoreScreen> {
        for wheel in &mut self.wheels {
            wheel.update(dt);
        }
        for player in &mut self.players {
            player.accrue(dt);
        }

        if !self.confirmed {
            return None;
        }
        self.confirmed = false;
        if let Err(e) = self.save(scores, path) {
            log::error!("Failed to save high scores: {}", e);
        }
        Some(HiscoreScreen::new(scores, self.size))
    }

    /// Name the players from their wheels and record every matchup
    pub fn save(&mut self, scores: &mut HighScores, path: &Path) -> GameResult<()> {
        for (player, wheel) in self.players.iter_mut().zip(&self.wheels) {
            player.name = wheel.name();
        }
        for (i, player) in self.players.iter().enumerate() {
            for (j, opponent) in self.players.iter().enumerate() {
                if i != j {
                    let score = f64::from(player.score);
                    scores.record(&player.name, &opponent.name, score);
                }
            }
        }
        scores.save(path)
    }

    /// Names currently on the wheels
    pub fn names(&self) -> Vec<String> {
        self.wheels.iter().map(LetterWheel::name).collect()
    }

    pub fn draw(&self) -> DrawList {
        let mut list = DrawList::new();
        let half = self.size.x / 2.0;
        let mid = self.size.y / 2.0;

        for (i, (player, wheel)) in self.players.iter().zip(&self.wheels).enumerate() {
            let left = i as f32 * half + 40.0;
            list.text(format_score(player.score), Vec2::new(left, 60.0), player.color);

            for (column, &index) in wheel.letters.iter().enumerate() {
                let x = left + column as f32 * GLYPH;
                let active = column == wheel.column;
                let color = if active { Rgba::WHITE } else { player.color };
                let y = if active { mid - wheel.offset * GLYPH } else { mid };
                list.text(letter(index).to_string(), Vec2::new(x, y), color);
                if active {
                    // Neighbouring symbols roll past above and below
                    let fade = Rgba::GREY.with_alpha(128);
                    let prev = index + alphabet_len() - 1;
                    list.text(letter(prev).to_string(), Vec2::new(x, y - GLYPH), fade);
                    list.text(letter(index + 1).to_string(), Vec2::new(x, y + GLYPH), fade);
                }
            }

            let marker = if wheel.is_confirmed() { "OK" } else { "^" };
            let marker_x = left + wheel.column as f32 * GLYPH;
            list.text(marker, Vec2::new(marker_x, mid + GLYPH * 2.0), Rgba::YELLOW);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::sim::PLAYER_COLORS;

    fn axis(instance: u32, axis: u8, value: f32) -> InputEvent {
        InputEvent::AxisMotion {
            instance,
            axis,
            value,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("light-cycles-{}-{}.json", name, std::process::id()))
    }

    fn player(name: &str, score: f32) -> Player {
        let mut p = Player::new(name, PLAYER_COLORS[0], Vec2::ZERO, Direction::Right, 60.0);
        p.score = score;
        p
    }

    fn screen(a: (&str, f32), b: (&str, f32)) -> ScoreScreen {
        ScoreScreen::new(vec![player(a.0, a.1), player(b.0, b.1)], &Settings::default())
    }

    fn press(screen: &mut ScoreScreen, key: Key) {
        screen.handle(&InputEvent::KeyDown(key), &ControllerMap::new());
    }

    #[test]
    fn test_alphabet() {
        assert_eq!(alphabet_len(), 37);
        assert_eq!(letter(0), '-');
        assert_eq!(letter(1), 'A');
        assert_eq!(letter(36), '9');
        assert_eq!(letter(37), '-');
    }

    #[test]
    fn test_wheel_from_name() {
        let wheel = LetterWheel::from_name("abc");
        assert_eq!(wheel.letters, [1, 2, 3]);
        assert_eq!(wheel.name(), "ABC");
        assert_eq!(LetterWheel::from_name("A?").name(), "A--");
    }

    #[test]
    fn test_selector_clamps() {
        let mut wheel = LetterWheel::from_name("---");
        wheel.select(-1);
        assert_eq!(wheel.column, 0);
        for _ in 0..10 {
            wheel.select(1);
        }
        assert_eq!(wheel.column, CONFIRM_COLUMN);
        assert!(wheel.is_confirmed());
    }

    #[test]
    fn test_single_kick_advances_one_letter() {
        let mut wheel = LetterWheel::from_name("---");
        wheel.spin(1.0);
        for _ in 0..120 {
            wheel.update(16.0);
        }
        assert_eq!(wheel.letters[0], 1);
        assert!(wheel.offset.abs() < 0.05);
        assert!(wheel.velocity.abs() < 1e-4);
    }

    fn settle(wheel: &mut LetterWheel) {
        for _ in 0..200 {
            wheel.update(16.0);
        }
    }

    #[test]
    fn test_kicks_step_one_letter_each_way() {
        let mut forward = LetterWheel::from_name("M--");
        forward.spin(1.0);
        settle(&mut forward);
        assert_eq!(forward.name(), "N--");

        let mut backward = LetterWheel::from_name("M--");
        backward.spin(-1.0);
        settle(&mut backward);
        assert_eq!(backward.name(), "L--");
        assert!(backward.offset.abs() < 0.05);
    }

    #[test]
    fn test_backward_spin_wraps() {
        let mut wheel = LetterWheel::from_name("---");
        wheel.spin(-1.0);
        settle(&mut wheel);
        assert_eq!(wheel.letters[0], 36);
        assert_eq!(wheel.name(), "9--");
    }

    #[test]
    fn test_confirm_column_does_not_spin() {
        let mut wheel = LetterWheel::from_name("ABC");
        wheel.select(3);
        wheel.spin(1.0);
        wheel.update(500.0);
        assert_eq!(wheel.name(), "ABC");
    }

    #[test]
    fn test_confirm_needs_both_players() {
        let mut s = screen(("ABC", 1.0), ("XYZ", 2.0));
        for _ in 0..3 {
            press(&mut s, Key::Char('s'));
        }
        press(&mut s, Key::Space);
        assert!(!s.confirmed);

        for _ in 0..3 {
            press(&mut s, Key::Down);
        }
        press(&mut s, Key::Enter);
        assert!(s.confirmed);
    }

    #[test]
    fn test_save_records_both_matchups() {
        let path = temp_path("score-screen-save");
        let mut scores = HighScores::new();

        let mut s = screen(("ABC", 120.0), ("XYZ", 80.0));
        s.save(&mut scores, &path).unwrap();
        assert_eq!(scores.get("ABC", "XYZ"), Some(120.0));
        assert_eq!(scores.get("XYZ", "ABC"), Some(80.0));

        // A different pairing leaves the first one alone
        let mut other = screen(("ABC", 10.0), ("QQQ", 5.0));
        other.save(&mut scores, &path).unwrap();

        let mut rematch = screen(("ABC", 200.0), ("XYZ", 40.0));
        rematch.save(&mut scores, &path).unwrap();
        assert_eq!(scores.get("ABC", "XYZ"), Some(200.0));
        assert_eq!(scores.get("XYZ", "ABC"), Some(40.0));
        assert_eq!(scores.get("ABC", "QQQ"), Some(10.0));

        let on_disk = HighScores::load(&path);
        assert_eq!(on_disk, scores);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_confirmed_update_saves_and_moves_on() {
        let path = temp_path("score-screen-update");
        let mut scores = HighScores::new();
        let mut s = screen(("---", 50.0), ("---", 70.0));

        // Player 1 dials in "A" on the first slot, then both park on confirm
        press(&mut s, Key::Char('d'));
        for _ in 0..120 {
            assert!(s.update(16.0, &mut scores, &path).is_none());
        }
        for _ in 0..3 {
            press(&mut s, Key::Char('s'));
            press(&mut s, Key::Down);
        }
        press(&mut s, Key::Space);

        let next = s.update(16.0, &mut scores, &path).expect("should move to leaderboard");
        assert_eq!(s.names(), vec!["A--".to_string(), "---".to_string()]);
        assert_eq!(scores.get("A--", "---"), Some(50.0));
        assert_eq!(scores.get("---", "A--"), Some(70.0));
        assert_eq!(next.totals[0].0, "---");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_failure_still_moves_on() {
        let dir = std::env::temp_dir();
        let mut scores = HighScores::new();
        let mut s = screen(("ABC", 1.0), ("XYZ", 2.0));
        s.confirmed = true;
        // Writing to a directory path fails
        assert!(s.update(16.0, &mut scores, &dir).is_some());
        assert_eq!(scores.get("ABC", "XYZ"), Some(1.0));
    }

    #[test]
    fn test_stick_press_needs_fresh_deflection() {
        let mut s = screen(("ABC", 1.0), ("XYZ", 2.0));
        let mut controllers = ControllerMap::new();
        controllers.attach(4, 0);
        let down = axis(4, 0, -0.9);
        s.handle(&down, &controllers);
        s.handle(&down, &controllers);
        assert_eq!(s.wheels[0].column, 1);

        let centre = axis(4, 0, 0.0);
        s.handle(&centre, &controllers);
        s.handle(&down, &controllers);
        assert_eq!(s.wheels[0].column, 2);
    }

    #[test]
    fn test_bonus_keeps_draining() {
        let path = temp_path("score-screen-drain");
        let mut scores = HighScores::new();
        let mut s = screen(("ABC", 0.0), ("XYZ", 0.0));
        s.players[0].bonus = 30.0;
        s.update(16.0, &mut scores, &path);
        assert_eq!(s.players[0].score, 16.0);
        assert_eq!(s.players[0].bonus, 14.0);
    }
}
