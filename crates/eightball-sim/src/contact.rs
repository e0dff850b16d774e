use serde::{Deserialize, Serialize};

use eightball_core::vec2::Vec2;

use crate::ball::{Ball, BallArena, BallId};

/// An unordered pair of balls touching and closing on each other this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPair {
    pub a: BallId,
    pub b: BallId,
}

/// Whether two balls of radius `radius` are in contact and approaching.
///
/// A touching pair that is already separating is not a contact, so an overlap
/// left over from the previous step is not resolved twice.
pub fn is_approaching(a: &Ball, b: &Ball, radius: f32) -> bool {
    let rel_pos = b.position - a.position;
    let reach = 2.0 * radius;
    if rel_pos.length_squared() > reach * reach {
        return false;
    }
    let rel_vel: Vec2 = b.velocity - a.velocity;
    rel_pos.dot(rel_vel) < 0.0
}

/// Every colliding pair among the balls on the table. O(n^2) over at most 16 balls.
pub fn detect_contacts(arena: &BallArena, radius: f32) -> Vec<ContactPair> {
    let balls: Vec<&Ball> = arena.alive().collect();
    let mut pairs = Vec::new();
    for (i, a) in balls.iter().enumerate() {
        for b in &balls[i + 1..] {
            if is_approaching(a, b, radius) {
                pairs.push(ContactPair { a: a.id, b: b.id });
            }
        }
    }
    pairs
}
