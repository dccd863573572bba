//! Collision detection and response
//!
//! Circle-circle tests for the two balls, axis-aligned box overlap for
//! power-up pickup, and the blade rule deciding what a ball-ball hit does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Side};

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

impl Ball {
    /// True when the circles overlap; touching exactly is not a collision
    pub fn collides_with(&self, other: &Ball) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }

    /// Push both balls apart by half the overlap each, along the line between
    /// their centers.
    ///
    /// Coincident centers fall back to a distance of 1 along +X.
    pub fn separate_from(&mut self, other: &mut Ball) {
        let delta = self.pos - other.pos;
        let mut dist = delta.length();
        let normal = if dist == 0.0 {
            dist = 1.0;
            Vec2::X
        } else {
            delta / dist
        };

        let overlap = self.radius + other.radius - dist;
        if overlap > 0.0 {
            let push = normal * (overlap / 2.0);
            self.pos += push;
            other.pos -= push;
        }
    }
}

/// What a ball-ball collision did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clash {
    /// Neither ball was armed; both reversed
    Bounce,
    /// `attacker` spent its blade and `victim` lost one health
    Strike { attacker: Side, victim: Side },
}

/// Resolve a detected collision between `first` and `second`.
///
/// Positions are separated first. The first ball's blade is checked before the
/// second's, so when both are armed the first one wins.
pub fn resolve_clash(first: &mut Ball, second: &mut Ball) -> Clash {
    first.separate_from(second);

    let (attacker, victim) = if first.has_blade() {
        (first, second)
    } else if second.has_blade() {
        (second, first)
    } else {
        first.reverse();
        second.reverse();
        return Clash::Bounce;
    };

    victim.health -= 1;
    attacker.consume_blade();
    Clash::Strike {
        attacker: attacker.side,
        victim: victim.side,
    }
}
