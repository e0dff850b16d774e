use eightball_core::vec2::Vec2;

use crate::ball::{Ball, BallArena, BallId};
use crate::contact::ContactPair;

/// Below this center distance the contact normal is undefined and the pair is skipped.
pub const MIN_SEPARATION: f32 = 1e-3;

/// Post-collision velocities of `a` and `b` for restitution `e`.
///
/// Impulse exchange along the line of centers:
/// `v_a' = v_a - ((1+e)·m_b/(m_a+m_b)) · ((v_a-v_b)·(p_a-p_b)) / |p_a-p_b|² · (p_a-p_b)`,
/// symmetric for `b`. Returns `None` when the centers coincide.
pub fn resolve_pair(a: &Ball, b: &Ball, elasticity: f32) -> Option<(Vec2, Vec2)> {
    let d = a.position - b.position;
    let dist_sq = d.length_squared();
    if dist_sq < MIN_SEPARATION * MIN_SEPARATION {
        return None;
    }
    let total_mass = a.mass + b.mass;
    let closing = (a.velocity - b.velocity).dot(d) / dist_sq;
    let c_a = (1.0 + elasticity) * b.mass / total_mass * closing;
    let c_b = (1.0 + elasticity) * a.mass / total_mass * closing;
    Some((a.velocity - d * c_a, b.velocity + d * c_b))
}

/// Resolve every detected pair against the velocities the balls had when the pairs
/// were detected. A ball in several contacts receives the sum of its per-pair changes.
/// Returns how many pairs were resolved (degenerate pairs are skipped).
pub fn resolve_contacts(arena: &mut BallArena, pairs: &[ContactPair], elasticity: f32) -> usize {
    let mut deltas: Vec<(BallId, Vec2)> = Vec::with_capacity(pairs.len() * 2);
    let mut resolved = 0;
    for pair in pairs {
        let (Some(a), Some(b)) = (arena.get(pair.a), arena.get(pair.b)) else {
            continue;
        };
        match resolve_pair(a, b, elasticity) {
            Some((va, vb)) => {
                deltas.push((pair.a, va - a.velocity));
                deltas.push((pair.b, vb - b.velocity));
                resolved += 1;
            },
            None => {
                tracing::debug!(a = pair.a.0, b = pair.b.0, "skipping coincident contact pair");
            },
        }
    }
    for (id, dv) in deltas {
        if let Some(ball) = arena.get_mut(id) {
            ball.velocity += dv;
        }
    }
    resolved
}
