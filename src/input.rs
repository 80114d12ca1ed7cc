//! Input boundary
//!
//! Frontends translate device events into [`InputEvent`]s. Phases map them
//! to per-player [`Control`]s through a fixed binding table, so gameplay
//! never sees raw scan codes or axis polling.

use crate::sim::Direction;

/// Logical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    /// Printable key, lowercased
    Char(char),
}

/// A discrete input event delivered to the active phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    AxisMotion {
        instance: u32,
        axis: u8,
        value: f32,
    },
    ButtonDown { instance: u32, button: u8 },
    ButtonUp { instance: u32, button: u8 },
    Quit,
}

/// What a player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Steer(Direction),
    Action,
}

/// One player's keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub action: Key,
}

/// Player 1: W A S D + Space
pub const PLAYER_ONE: Bindings = Bindings {
    left: Key::Char('a'),
    right: Key::Char('d'),
    up: Key::Char('w'),
    down: Key::Char('s'),
    action: Key::Space,
};

/// Player 2: arrow keys + Enter
pub const PLAYER_TWO: Bindings = Bindings {
    left: Key::Left,
    right: Key::Right,
    up: Key::Up,
    down: Key::Down,
    action: Key::Enter,
};

/// Default layouts indexed by player slot
pub const DEFAULT_BINDINGS: [Bindings; 2] = [PLAYER_ONE, PLAYER_TWO];

impl Bindings {
    /// Map a key to this player's control, if bound
    pub fn control(&self, key: Key) -> Option<Control> {
        if key == self.left {
            Some(Control::Steer(Direction::Left))
        } else if key == self.right {
            Some(Control::Steer(Direction::Right))
        } else if key == self.up {
            Some(Control::Steer(Direction::Up))
        } else if key == self.down {
            Some(Control::Steer(Direction::Down))
        } else if key == self.action {
            Some(Control::Action)
        } else {
            None
        }
    }
}

/// Map a controller axis reading to a direction
///
/// Follows the cabinet wiring: axis 0 is vertical (negative is down) and
/// axis 1 is horizontal. Readings inside the deadzone map to nothing.
pub fn axis_direction(axis: u8, value: f32, deadzone: f32) -> Option<Direction> {
    match axis {
        0 if value < -deadzone => Some(Direction::Down),
        0 if value > deadzone => Some(Direction::Up),
        1 if value < -deadzone => Some(Direction::Left),
        1 if value > deadzone => Some(Direction::Right),
        _ => None,
    }
}

/// Controller instance ids attached to player slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerMap {
    slots: Vec<(u32, usize)>,
}

impl ControllerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `instance` to player `slot`, replacing any earlier mapping
    pub fn attach(&mut self, instance: u32, slot: usize) {
        self.slots.retain(|&(id, _)| id != instance);
        self.slots.push((instance, slot));
    }

    /// Player slot for a controller, `None` for unknown instances
    pub fn slot(&self, instance: u32) -> Option<usize> {
        self.slots
            .iter()
            .find(|&&(id, _)| id == instance)
            .map(|&(_, slot)| slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Resolve a key press to `(player slot, control)` using the default layouts
pub fn key_control(key: Key) -> Option<(usize, Control)> {
    DEFAULT_BINDINGS
        .iter()
        .enumerate()
        .find_map(|(slot, bindings)| bindings.control(key).map(|c| (slot, c)))
}
