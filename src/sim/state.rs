//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives here.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::Color;
use crate::colors;
use crate::consts::*;

/// Which of the two players a ball belongs to.
///
/// Red is always processed before Blue; every simultaneous-event tie-break in
/// the simulation follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    /// Index into `GameState::balls`
    pub fn index(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Blue => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Blue => "Blue",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Side::Red => colors::RED,
            Side::Blue => colors::BLUE,
        }
    }

    fn start_pos(self) -> Vec2 {
        let (x, y) = match self {
            Side::Red => RED_START,
            Side::Blue => BLUE_START,
        };
        Vec2::new(x, y)
    }
}

/// A player ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub side: Side,
    pub pos: Vec2,
    /// Units per frame
    pub vel: Vec2,
    pub radius: f32,
    /// Not clamped: anything at or below zero ends the match
    pub health: i32,
    /// Absolute expiry of the blade; `None` when unarmed
    pub blade_expires_at: Option<Duration>,
}

impl Ball {
    pub fn new(side: Side, pos: Vec2, vel: Vec2) -> Self {
        Self {
            side,
            pos,
            vel,
            radius: BALL_RADIUS,
            health: STARTING_HEALTH,
            blade_expires_at: None,
        }
    }

    /// Place a ball at its side's start corner with a random diagonal heading
    pub fn spawn<R: Rng + ?Sized>(side: Side, rng: &mut R) -> Self {
        let mut axis = || if rng.random_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        let vel = Vec2::new(axis(), axis());
        Self::new(side, side.start_pos(), vel)
    }

    pub fn color(&self) -> Color {
        self.side.color()
    }

    pub fn has_blade(&self) -> bool {
        self.blade_expires_at.is_some()
    }

    /// Arm (or re-arm) the blade for the full duration starting at `now`
    pub fn apply_blade(&mut self, now: Duration) {
        self.blade_expires_at = Some(now + BLADE_DURATION);
    }

    /// Spend the blade on a hit
    pub fn consume_blade(&mut self) {
        self.blade_expires_at = None;
    }

    /// Step one frame: integrate, bounce off the arena walls, expire the blade.
    ///
    /// Each axis is reflected independently so a corner hit flips both.
    /// Returns true if the blade ran out on this step.
    pub fn advance(&mut self, now: Duration) -> bool {
        self.pos += self.vel;

        // Reflected components always point back into the arena rather than
        // toggling sign: a ball shoved past a wall by separation while already
        // heading inward must not be sent back out.
        let r = self.radius;
        if self.pos.x - r <= 0.0 {
            self.vel.x = self.vel.x.abs();
            self.pos.x = r;
        } else if self.pos.x + r >= WIDTH {
            self.vel.x = -self.vel.x.abs();
            self.pos.x = WIDTH - r;
        }
        if self.pos.y - r <= 0.0 {
            self.vel.y = self.vel.y.abs();
            self.pos.y = r;
        } else if self.pos.y + r >= HEIGHT {
            self.vel.y = -self.vel.y.abs();
            self.pos.y = HEIGHT - r;
        }

        if self.blade_expires_at.is_some_and(|expires_at| now > expires_at) {
            self.blade_expires_at = None;
            return true;
        }
        false
    }

    /// Negate both velocity components
    pub fn reverse(&mut self) {
        self.vel = -self.vel;
    }

    /// Enclosing square of the ball's circle
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.pos - Vec2::splat(self.radius),
            Vec2::splat(2.0 * self.radius),
        )
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Blade,
}

impl PowerUpKind {
    /// Blade is twice as likely as Health
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3) {
            0 => PowerUpKind::Health,
            _ => PowerUpKind::Blade,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Health => "Health",
            PowerUpKind::Blade => "Blade",
        }
    }

    pub fn color(self) -> Color {
        match self {
            PowerUpKind::Health => colors::GREEN,
            PowerUpKind::Blade => colors::YELLOW,
        }
    }
}

/// A collectible lying in the arena until some ball touches it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner of the box
    pub pos: Vec2,
}

impl PowerUp {
    /// Random kind at a random whole-unit position with the box inside the arena
    pub fn random<R: Rng + ?Sized>(id: u32, rng: &mut R) -> Self {
        let kind = PowerUpKind::random(rng);
        let size = POWERUP_SIZE as i32;
        let x = rng.random_range(size..=WIDTH as i32 - size);
        let y = rng.random_range(size..=HEIGHT as i32 - size);
        Self {
            id,
            kind,
            pos: Vec2::new(x as f32, y as f32),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

/// A particle for the death burst
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Frames left
    pub life: u32,
}

impl Particle {
    /// Debris flying out of `origin` in a random direction
    pub fn random<R: Rng + ?Sized>(origin: Vec2, color: Color, rng: &mut R) -> Self {
        let angle = rng.random_range(0.0f32..360.0).to_radians();
        let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
        let radius = rng.random_range(PARTICLE_MIN_RADIUS..=PARTICLE_MAX_RADIUS);
        Self {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius: radius as f32,
            color,
            life: PARTICLE_LIFE,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Unarmed collision, both balls reversed
    Bounce,
    BladeStrike {
        attacker: Side,
        victim: Side,
        health_left: i32,
    },
    BladeExpired {
        side: Side,
    },
    PowerUpSpawned {
        id: u32,
        kind: PowerUpKind,
    },
    PowerUpCollected {
        id: u32,
        kind: PowerUpKind,
        by: Side,
    },
    BallDestroyed {
        side: Side,
    },
}

/// Complete simulation state, owned by the frame loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Red then Blue, fixed for the whole match
    pub balls: [Ball; 2],
    pub power_ups: Vec<PowerUp>,
    /// Visual only, never affects gameplay
    pub particles: Vec<Particle>,
    pub game_over: bool,
    pub winner: Option<Side>,
    /// Earliest time the next power-up roll may happen
    pub next_power_up_roll_at: Duration,
    /// Ticks simulated so far
    pub frame: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh match started at `now`
    pub fn new<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Self {
        let red = Ball::spawn(Side::Red, rng);
        let blue = Ball::spawn(Side::Blue, rng);
        Self::with_balls(red, blue, now)
    }

    /// Match with explicitly placed balls
    pub fn with_balls(red: Ball, blue: Ball, now: Duration) -> Self {
        Self {
            balls: [red, blue],
            power_ups: Vec::new(),
            particles: Vec::new(),
            game_over: false,
            winner: None,
            next_power_up_roll_at: now + POWERUP_SPAWN_INTERVAL,
            frame: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn ball(&self, side: Side) -> &Ball {
        &self.balls[side.index()]
    }

    pub fn ball_mut(&mut self, side: Side) -> &mut Ball {
        &mut self.balls[side.index()]
    }

    /// Game over and the burst has fully faded: time to announce the winner
    pub fn is_finished(&self) -> bool {
        self.game_over && self.particles.is_empty()
    }
}
