//! Light cycle and its trail
//!
//! The trail is a polyline of every fixed turn vertex plus a final "live"
//! vertex that tracks the head each tick. It always holds at least two
//! points, so the live edge exists from the first frame.

use glam::Vec2;

use crate::render::Rgba;

/// Alpha decay per millisecond for a dead player's trail (x0.99 per frame)
pub const TRAIL_FADE_PER_MS: f32 = 0.000_603;

/// Axis-aligned travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// A player's cycle, trail and score
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub color: Rgba,
    pub pos: Vec2,
    /// Units per second; exactly one component is non-zero while alive
    pub vel: Vec2,
    /// Speed restored on turns
    pub speed: f32,
    pub trail: Vec<Vec2>,
    /// Level time (ms) of the crash, `None` while alive
    pub time_of_death: Option<f32>,
    pub score: f32,
    /// Pending points that drain into `score`
    pub bonus: f32,
    /// Trail opacity, fades after death
    pub fade: f32,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        color: Rgba,
        start: Vec2,
        heading: Direction,
        speed: f32,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            pos: start,
            vel: heading.unit() * speed,
            speed,
            trail: vec![start, start],
            time_of_death: None,
            score: 0.0,
            bonus: 0.0,
            fade: 1.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.time_of_death.is_none()
    }

    /// True while travelling along the x axis
    #[inline]
    pub fn moving_horizontally(&self) -> bool {
        self.vel.x != 0.0
    }

    /// Turn onto the other axis; returns false if the turn was rejected
    ///
    /// Turning along the current axis would either reverse into the live
    /// edge or change nothing, so it is ignored.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if !self.is_alive() || direction.is_horizontal() == self.moving_horizontally() {
            return false;
        }
        self.trail.push(self.pos);
        self.vel = direction.unit() * self.speed;
        true
    }

    /// Move the head by `dt` milliseconds and extend the live edge
    pub fn advance(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.step(dt);
        self.update_live_vertex();
    }

    /// Move the head only, leaving the trail untouched
    #[inline]
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt / 1000.0;
    }

    /// Overwrite the trail's last vertex with the head position
    #[inline]
    pub fn update_live_vertex(&mut self) {
        if let Some(last) = self.trail.last_mut() {
            *last = self.pos;
        }
    }

    /// Previous head position (the live vertex before this tick's overwrite)
    #[inline]
    pub fn live_vertex(&self) -> Vec2 {
        self.trail.last().copied().unwrap_or(self.pos)
    }

    /// Stop the cycle; returns the velocity it had, or `None` if already dead
    pub fn crash(&mut self, now: f32) -> Option<Vec2> {
        if !self.is_alive() {
            return None;
        }
        self.time_of_death = Some(now);
        let vel = self.vel;
        self.vel = Vec2::ZERO;
        Some(vel)
    }

    /// Move up to `dt` points from `bonus` into `score`
    pub fn accrue(&mut self, dt: f32) {
        let payout = self.bonus.min(dt).max(0.0);
        self.score += payout;
        self.bonus -= payout;
    }

    /// Fade the trail of a dead cycle
    pub fn fade_trail(&mut self, dt: f32) {
        if !self.is_alive() {
            self.fade *= (-TRAIL_FADE_PER_MS * dt).exp();
        }
    }

    /// Trail colour including the death fade
    pub fn trail_color(&self) -> Rgba {
        self.color.with_alpha((self.color.a as f32 * self.fade) as u8)
    }
}
