//! Round simulation
//!
//! A level owns both cycles, the boundary wall, the spark pool and the
//! powerups. Each tick it moves the living cycles, tests every new leading
//! edge against all walls, pays out bonuses and decides when the round is
//! over. Once the round finishes the players are handed back to the caller.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::geometry::{Segment, path_intersects_segment};
use super::particle::ParticleSystem;
use super::player::{Direction, Player};
use super::powerup::{Powerup, PowerupSpawner};
use crate::input::{Control, ControllerMap, InputEvent, axis_direction, key_control};
use crate::render::{DrawList, Rgba};
use crate::settings::Settings;

/// Player colours by slot
pub const PLAYER_COLORS: [Rgba; 2] = [Rgba::rgb(40, 110, 255), Rgba::rgb(255, 40, 40)];

/// Edge length of the head marker
const HEAD_SIZE: f32 = 5.0;

/// Progress of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Nobody has crashed
    Playing,
    /// Someone crashed; survivors keep racing during the roll-off
    Ending,
    /// Roll-off elapsed, players handed off
    Finished,
}

/// Simulation of a single round
#[derive(Debug, Clone)]
pub struct Level {
    pub settings: Settings,
    pub players: Vec<Player>,
    /// Closed polyline of the arena wall
    pub boundary: Vec<Vec2>,
    pub particles: ParticleSystem,
    pub powerups: Vec<Powerup>,
    spawner: PowerupSpawner,
    rng: Pcg32,
    /// Milliseconds since the round started
    pub elapsed: f32,
}

impl Level {
    /// Start a round with both cycles on the centre line, facing each other
    pub fn new(settings: &Settings, seed: u64, names: [&str; 2]) -> Self {
        let w = settings.arena_width;
        let h = settings.arena_height;
        let speed = settings.speed();
        let players = vec![
            Player::new(
                names[0],
                PLAYER_COLORS[0],
                Vec2::new(w * 0.2, h * 0.5),
                Direction::Right,
                speed,
            ),
            Player::new(
                names[1],
                PLAYER_COLORS[1],
                Vec2::new(w * 0.8, h * 0.5),
                Direction::Left,
                speed,
            ),
        ];
        Self::with_players(settings, seed, players)
    }

    /// Start a round with caller-placed players
    pub fn with_players(settings: &Settings, seed: u64, players: Vec<Player>) -> Self {
        log::info!(
            "New round: {} (seed {})",
            players
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(" vs "),
            seed
        );
        Self {
            settings: settings.clone(),
            players,
            boundary: rectangle_boundary(settings),
            particles: ParticleSystem::new(),
            powerups: Vec::new(),
            spawner: PowerupSpawner::new(
                settings.powerup_interval_ms,
                settings.powerup_retries,
                settings.powerup_size,
            ),
            rng: Pcg32::seed_from_u64(seed),
            elapsed: 0.0,
        }
    }

    /// Time of the earliest crash, if anyone crashed
    pub fn earliest_death(&self) -> Option<f32> {
        self.players
            .iter()
            .filter_map(|p| p.time_of_death)
            .reduce(f32::min)
    }

    pub fn round_state(&self) -> RoundState {
        if self.players.is_empty() {
            return RoundState::Finished;
        }
        match self.earliest_death() {
            None => RoundState::Playing,
            Some(t) if self.elapsed - t > self.settings.roll_off_ms => RoundState::Finished,
            Some(_) => RoundState::Ending,
        }
    }

    /// Advance the round by `dt` milliseconds
    ///
    /// Returns the players once the roll-off after the first crash has
    /// elapsed; the level is spent after that.
    pub fn update(&mut self, dt: f32) -> Option<Vec<Player>> {
        if self.players.is_empty() {
            return None;
        }
        self.elapsed += dt;

        for i in 0..self.players.len() {
            if !self.players[i].is_alive() {
                continue;
            }
            let previous = self.players[i].live_vertex();
            // The live vertex is moved even on a crash so the trail reaches the impact point
            self.players[i].advance(dt);
            let edge = Segment::new(self.players[i].pos, previous);
            if self.edge_hits_wall(i, edge) {
                self.crash(i);
            }
        }

        for player in &mut self.players {
            player.fade_trail(dt);
        }
        self.particles.advance(dt);

        let (min, max) = self.arena_bounds();
        if let Some(powerup) = self.spawner.update(
            dt,
            &mut self.rng,
            min,
            max,
            &self.players,
            &self.powerups,
        ) {
            self.powerups.push(powerup);
        }

        for player in &mut self.players {
            player.accrue(dt);
        }

        if self.round_state() == RoundState::Finished {
            let now = self.elapsed;
            let rate = self.settings.time_bonus_rate;
            for player in &mut self.players {
                let survived = player.time_of_death.unwrap_or(now);
                player.bonus += survived * rate / 1000.0;
            }
            log::info!("Round over after {:.0} ms", now);
            return Some(std::mem::take(&mut self.players));
        }
        None
    }

    /// Test a leading edge against the boundary, opponents and the player's own trail
    fn edge_hits_wall(&self, index: usize, edge: Segment) -> bool {
        if path_intersects_segment(edge, &self.boundary) {
            return true;
        }
        self.players.iter().enumerate().any(|(j, other)| {
            if j == index {
                // Skip the two edges adjacent to the live vertex
                let own = &other.trail;
                own.len() > 2 && path_intersects_segment(edge, &own[..own.len() - 2])
            } else {
                path_intersects_segment(edge, &other.trail)
            }
        })
    }

    /// Crash a player: sparks, then a winner bonus for every survivor
    pub fn crash(&mut self, index: usize) {
        let now = self.elapsed;
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        let Some(last_vel) = player.crash(now) else {
            return;
        };
        log::info!("{} crashed at {:.0} ms", player.name, now);

        let origin = player.pos;
        let color = player.color;
        self.particles.spawn_burst(
            &mut self.rng,
            origin,
            last_vel,
            color,
            self.settings.burst_count,
            self.settings.speed(),
        );

        let bonus = self.settings.winner_bonus;
        for (j, other) in self.players.iter_mut().enumerate() {
            if j != index && other.is_alive() {
                other.bonus += bonus;
            }
        }
    }

    /// Route an input event to the matching player
    pub fn handle(&mut self, event: &InputEvent, controllers: &ControllerMap) {
        let (slot, direction) = match *event {
            InputEvent::KeyDown(key) => match key_control(key) {
                Some((slot, Control::Steer(direction))) => (slot, direction),
                _ => return,
            },
            InputEvent::AxisMotion {
                instance,
                axis,
                value,
            } => {
                let Some(slot) = controllers.slot(instance) else {
                    log::debug!("Ignoring axis motion from unknown controller {}", instance);
                    return;
                };
                match axis_direction(axis, value, self.settings.deadzone) {
                    Some(direction) => (slot, direction),
                    None => return,
                }
            }
            _ => return,
        };
        if let Some(player) = self.players.get_mut(slot) {
            player.turn(direction);
        }
    }

    /// Pairs of `(player, powerup)` indices where a head is on an active pickup
    ///
    /// Consuming pickups and applying their effects is left to the caller.
    pub fn powerup_contacts(&self) -> Vec<(usize, usize)> {
        let size = self.settings.powerup_size;
        let mut contacts = Vec::new();
        for (i, player) in self.players.iter().enumerate() {
            for (k, powerup) in self.powerups.iter().enumerate() {
                if powerup.active && player.is_alive() && powerup.touches(player, size) {
                    contacts.push((i, k));
                }
            }
        }
        contacts
    }

    /// Bounding box of the boundary wall
    pub fn arena_bounds(&self) -> (Vec2, Vec2) {
        let min = self
            .boundary
            .iter()
            .copied()
            .reduce(Vec2::min)
            .unwrap_or(Vec2::ZERO);
        let max = self
            .boundary
            .iter()
            .copied()
            .reduce(Vec2::max)
            .unwrap_or(Vec2::ZERO);
        (min, max)
    }

    pub fn draw(&self) -> DrawList {
        let mut list = DrawList::new();
        list.polyline(&self.boundary, Rgba::GREY, 1.0);

        for player in &self.players {
            let width = self.settings.trail_width;
            list.polyline(&player.trail, player.trail_color(), width);
            let half = Vec2::splat(HEAD_SIZE / 2.0);
            list.rect(player.pos - half, player.pos + half, player.trail_color());
        }

        for particle in self.particles.iter() {
            list.pixel(particle.pos, particle.display_color());
        }

        for powerup in self.powerups.iter().filter(|p| p.active) {
            list.icon(powerup.kind, powerup.pos);
        }

        let score_positions = [
            Vec2::new(10.0, 10.0),
            Vec2::new(self.settings.arena_width / 2.0 + 10.0, 10.0),
        ];
        for (player, position) in self.players.iter().zip(score_positions) {
            list.text(format_score(player.score), position, player.color);
        }
        list
    }
}

/// Zero-padded five digit score
pub fn format_score(score: f32) -> String {
    format!("{:05}", score.max(0.0) as u32)
}

/// Closed rectangle inset by the boundary margin
fn rectangle_boundary(settings: &Settings) -> Vec<Vec2> {
    let m = settings.boundary_margin;
    let (w, h) = (settings.arena_width, settings.arena_height);
    vec![
        Vec2::new(m, m),
        Vec2::new(w - m, m),
        Vec2::new(w - m, h - m),
        Vec2::new(m, h - m),
        Vec2::new(m, m),
    ]
}
