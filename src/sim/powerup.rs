//! Powerup pickups
//!
//! Powerups appear on a timer at random free spots in the arena. Picking one
//! up has no effect yet: the level only reports contacts through
//! [`crate::sim::Level::powerup_contacts`].

use glam::Vec2;
use rand::Rng;

use super::geometry::{path_touches_box, point_in_box};
use super::player::Player;

/// Powerup types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Coin,
    Boost,
    Brakes,
    Clear,
}

impl PowerupKind {
    /// Glyph used by text renderers
    pub fn glyph(self) -> char {
        match self {
            PowerupKind::Coin => '$',
            PowerupKind::Boost => '>',
            PowerupKind::Brakes => '=',
            PowerupKind::Clear => '*',
        }
    }
}

/// A pickup in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub active: bool,
}

impl Powerup {
    pub fn new(pos: Vec2, kind: PowerupKind) -> Self {
        Self {
            pos,
            kind,
            active: true,
        }
    }

    /// Hit box corners `(min, max)` for an edge length of `size`
    pub fn hit_box(&self, size: f32) -> (Vec2, Vec2) {
        let half = Vec2::splat(size / 2.0);
        (self.pos - half, self.pos + half)
    }

    /// True if the player's head is inside the hit box
    pub fn touches(&self, player: &Player, size: f32) -> bool {
        let (min, max) = self.hit_box(size);
        point_in_box(player.pos, min, max)
    }
}

/// Check that a hit box centred at `pos` is clear of every trail and pickup
pub fn placement_is_valid(pos: Vec2, size: f32, players: &[Player], existing: &[Powerup]) -> bool {
    let candidate = Powerup::new(pos, PowerupKind::Coin);
    let (min, max) = candidate.hit_box(size);
    if players.iter().any(|p| path_touches_box(&p.trail, min, max)) {
        return false;
    }
    // Boxes of equal size overlap when centres are closer than one edge per axis
    !existing.iter().any(|other| {
        let d = (other.pos - pos).abs();
        d.x < size && d.y < size
    })
}

/// Count-down timer for powerup spawns
#[derive(Debug, Clone)]
pub struct PowerupSpawner {
    /// Milliseconds until the next spawn attempt
    pub timer: f32,
    pub interval: f32,
    pub retries: u32,
    pub size: f32,
}

impl PowerupSpawner {
    pub fn new(interval: f32, retries: u32, size: f32) -> Self {
        Self {
            timer: interval,
            interval,
            retries,
            size,
        }
    }

    /// Count down; on expiry try to place a coin inside `[min, max]`
    ///
    /// Returns `None` when the timer is still running or no free spot was
    /// found within the retry budget (the cycle is skipped).
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        min: Vec2,
        max: Vec2,
        players: &[Player],
        existing: &[Powerup],
    ) -> Option<Powerup> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        if self.interval > 0.0 {
            while self.timer <= 0.0 {
                self.timer += self.interval;
            }
        } else {
            self.timer = 0.0;
        }

        let half = self.size / 2.0;
        let lo = min + Vec2::splat(half);
        let hi = max - Vec2::splat(half);
        if lo.x >= hi.x || lo.y >= hi.y {
            return None;
        }

        for _ in 0..self.retries {
            let pos = Vec2::new(rng.random_range(lo.x..hi.x), rng.random_range(lo.y..hi.y));
            if placement_is_valid(pos, self.size, players, existing) {
                log::debug!("Powerup spawned at ({:.0}, {:.0})", pos.x, pos.y);
                return Some(Powerup::new(pos, PowerupKind::Coin));
            }
        }
        log::debug!("No free spot for a powerup after {} tries", self.retries);
        None
    }
}
