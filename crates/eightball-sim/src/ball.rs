//! Ball identity, the ball arena, and the opening rack.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use eightball_core::player::BallGroup;
use eightball_core::vec2::Vec2;

use crate::table::{BALL_MASS, BALL_RADIUS, CUE_SPOT};

/// Number of object balls in a full rack.
pub const OBJECT_BALLS: usize = 15;
/// Balls in each of the two groups.
pub const GROUP_SIZE: usize = 7;
/// Rack slot that always holds the eight-ball (center of the third row).
const EIGHT_SLOT: usize = 4;

/// Stable ball identifier: the ball's number, with 0 for the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u8);

impl BallId {
    pub const CUE: Self = Self(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What is printed on a ball. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Design {
    /// Solid color, rank 1..=7.
    Solid(u8),
    /// Striped, rank 1..=7 (numbered rank + 8).
    Striped(u8),
    Eight,
    Cue,
}

impl Design {
    /// Design printed on the ball with this number (0 = cue ball).
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(Self::Cue),
            1..=7 => Some(Self::Solid(number)),
            8 => Some(Self::Eight),
            9..=15 => Some(Self::Striped(number - 8)),
            _ => None,
        }
    }

    /// Printed number; `None` for the cue ball.
    pub fn number(self) -> Option<u8> {
        match self {
            Self::Solid(rank) => Some(rank),
            Self::Striped(rank) => Some(rank + 8),
            Self::Eight => Some(8),
            Self::Cue => None,
        }
    }

    /// Group this ball counts toward, if any.
    pub fn group(self) -> Option<BallGroup> {
        match self {
            Self::Solid(_) => Some(BallGroup::Solids),
            Self::Striped(_) => Some(BallGroup::Stripes),
            Self::Eight | Self::Cue => None,
        }
    }

    pub fn is_cue(self) -> bool {
        matches!(self, Self::Cue)
    }
}

/// A ball on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub design: Design,
    pub mass: f32,
}

impl Ball {
    pub fn new(design: Design, position: Vec2) -> Self {
        Self {
            id: BallId(design.number().unwrap_or(0)),
            position,
            velocity: Vec2::ZERO,
            design,
            mass: BALL_MASS,
        }
    }

    pub fn cue(position: Vec2) -> Self {
        Self::new(Design::Cue, position)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_moving(&self) -> bool {
        !self.velocity.is_zero()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// Every ball that can be on the table, indexed by `BallId`.
///
/// Group membership (solids, stripes, eight) is derived from each ball's design,
/// so removing a ball from its slot removes it from every group at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallArena {
    slots: Vec<Option<Ball>>,
}

impl BallArena {
    pub fn new() -> Self {
        Self {
            slots: vec![None; OBJECT_BALLS + 1],
        }
    }

    /// Cue ball on its spot plus a full random rack.
    pub fn standard_rack(rng: &mut impl Rng) -> Self {
        let mut arena = Self::new();
        arena.insert(Ball::cue(CUE_SPOT));
        for ball in rack(rng) {
            arena.insert(ball);
        }
        arena
    }

    /// Place a ball in its slot, replacing whatever was there.
    pub fn insert(&mut self, ball: Ball) {
        let idx = ball.id.index();
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(ball);
    }

    /// Take a ball off the table.
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Balls currently on the table, in id order.
    pub fn alive(&self) -> impl Iterator<Item = &Ball> {
        self.slots.iter().flatten()
    }

    pub fn alive_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.slots.iter_mut().flatten()
    }

    /// Number of balls on the table, cue ball included.
    pub fn len(&self) -> usize {
        self.alive().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.get(BallId::CUE)
    }

    pub fn object_ball_count(&self) -> usize {
        self.alive().filter(|b| !b.design.is_cue()).count()
    }

    /// Balls of `group` still on the table.
    pub fn group_count(&self, group: BallGroup) -> usize {
        self.alive()
            .filter(|b| b.design.group() == Some(group))
            .count()
    }

    pub fn eight_on_table(&self) -> bool {
        self.alive().any(|b| b.design == Design::Eight)
    }

    pub fn total_kinetic_energy(&self) -> f32 {
        self.alive().map(Ball::kinetic_energy).sum()
    }

    /// Mass-weighted center of the balls on the table.
    pub fn center_of_mass(&self) -> Option<Vec2> {
        let mut total_mass = 0.0;
        let mut weighted = Vec2::ZERO;
        for ball in self.alive() {
            total_mass += ball.mass;
            weighted += ball.position * ball.mass;
        }
        (total_mass > 0.0).then(|| weighted * (1.0 / total_mass))
    }
}

/// Centers of the 15 rack slots, row by row from the apex.
pub fn rack_positions() -> [Vec2; OBJECT_BALLS] {
    let r = BALL_RADIUS * 1.05;
    let mut positions = [Vec2::ZERO; OBJECT_BALLS];
    let mut slot = 0;
    for row in 1..=5_i32 {
        for col in 1..=row {
            let x = (3 - row) as f32 * r * 3f32.sqrt() + 300.0;
            let y = (col - 3) as f32 * 2.0 * r + 300.0 + (5 - row) as f32 * r;
            positions[slot] = Vec2::new(x, y);
            slot += 1;
        }
    }
    positions
}

/// The 15 object balls in rack formation. The eight sits in the middle of the third
/// row; 7 of the other 14 slots are solids, numbered 1..=7 in slot order, and the
/// rest stripes, numbered 9..=15.
pub fn rack(rng: &mut impl Rng) -> Vec<Ball> {
    let mut slots: Vec<usize> = (0..OBJECT_BALLS).filter(|&s| s != EIGHT_SLOT).collect();
    slots.shuffle(rng);
    let mut is_solid = [false; OBJECT_BALLS];
    for &s in &slots[..GROUP_SIZE] {
        is_solid[s] = true;
    }

    let mut next_solid = 1;
    let mut next_stripe = 1;
    rack_positions()
        .into_iter()
        .enumerate()
        .map(|(slot, position)| {
            let design = if slot == EIGHT_SLOT {
                Design::Eight
            } else if is_solid[slot] {
                next_solid += 1;
                Design::Solid(next_solid - 1)
            } else {
                next_stripe += 1;
                Design::Striped(next_stripe - 1)
            };
            Ball::new(design, position)
        })
        .collect()
}
