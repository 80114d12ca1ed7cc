//! Crash sparks
//!
//! Purely cosmetic, but stateful: each spark integrates its own velocity and
//! cools exponentially. Heat drives both the colour ramp and the lifetime.

use glam::Vec2;
use rand::Rng;

use crate::render::Rgba;

/// Velocity decay per millisecond (x0.99 per 1 ms step)
pub const VELOCITY_DECAY_PER_MS: f32 = 0.010_050_336;
/// Heat time constant (ms)
pub const HEAT_TIME_CONSTANT_MS: f32 = 1000.0;
/// Sparks cooler than this are invisible and collected
pub const MIN_VISIBLE_HEAT: f32 = 1.0 / 255.0;
/// Colour ramp gain applied to the base colour
pub const COLOR_SCALE: f32 = 2.0;
/// Maximum per-channel sparkle added at full heat
pub const SPARKLE: f32 = 60.0;

/// Random value in [-1, 1)
#[inline]
pub fn jitter<R: Rng>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0
}

/// A single spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub color: Rgba,
    /// 1 when spawned, decays toward 0
    pub heat: f32,
    /// Per-spark noise in [0, 1) for the sparkle term
    pub sparkle: f32,
}

impl Particle {
    /// Advance by `dt` milliseconds
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt / 1000.0;
        self.vel *= (-VELOCITY_DECAY_PER_MS * dt).exp();
        self.heat *= (-dt / HEAT_TIME_CONSTANT_MS).exp();
    }

    pub fn is_visible(&self) -> bool {
        self.heat >= MIN_VISIBLE_HEAT
    }

    /// Colour at the current heat: `clamp(base * scale * heat + noise)`, alpha `255 * heat`
    pub fn display_color(&self) -> Rgba {
        let noise = SPARKLE * self.sparkle * self.heat;
        let channel =
            |base: u8| (base as f32 * COLOR_SCALE * self.heat + noise).clamp(0.0, 255.0) as u8;
        Rgba {
            r: channel(self.color.r),
            g: channel(self.color.g),
            b: channel(self.color.b),
            a: (255.0 * self.heat).clamp(0.0, 255.0) as u8,
        }
    }
}

/// Pool of live sparks
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` sparks at `origin`, each `base_vel + jitter * scale` per axis
    pub fn spawn_burst<R: Rng>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        base_vel: Vec2,
        color: Rgba,
        count: usize,
        scale: f32,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let vel = Vec2::new(
                base_vel.x + jitter(rng) * scale,
                base_vel.y + jitter(rng) * scale,
            );
            self.particles.push(Particle {
                pos: origin,
                vel,
                color,
                heat: 1.0,
                sparkle: rng.random::<f32>(),
            });
        }
    }

    /// Advance every spark and drop the ones that have cooled off
    pub fn advance(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.advance(dt);
        }
        self.particles.retain(Particle::is_visible);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
