//! Pocket capture and cue-ball respotting.

use rand::Rng;
use serde::{Deserialize, Serialize};

use eightball_core::vec2::Vec2;

use crate::ball::{Ball, BallArena};
use crate::table::Table;

/// A ball that dropped this step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub ball: Ball,
    pub pocket: usize,
}

/// Remove every ball whose center is inside a pocket's capture circle.
pub fn capture_pocketed(arena: &mut BallArena, table: &Table) -> Vec<Capture> {
    let dropped: Vec<_> = arena
        .alive()
        .filter_map(|b| table.pocket_containing(b.position).map(|p| (b.id, p)))
        .collect();
    dropped
        .into_iter()
        .filter_map(|(id, pocket)| arena.remove(id).map(|ball| Capture { ball, pocket }))
        .collect()
}

/// Whether a ball centered at `spot` would overlap none of the balls on the table.
pub fn is_spot_clear(arena: &BallArena, spot: Vec2, radius: f32) -> bool {
    let reach = 2.0 * radius;
    arena
        .alive()
        .all(|b| b.position.distance_squared(spot) >= reach * reach)
}

/// Up to `attempts` uniformly random spots inside the table's respot area.
pub fn random_respot(
    arena: &BallArena,
    table: &Table,
    rng: &mut impl Rng,
    attempts: u32,
) -> Option<Vec2> {
    (0..attempts)
        .map(|_| {
            Vec2::new(
                rng.random_range(table.respot_min.x..=table.respot_max.x),
                rng.random_range(table.respot_min.y..=table.respot_max.y),
            )
        })
        .find(|&spot| is_spot_clear(arena, spot, table.ball_radius))
}

/// Deterministic scan of the respot area in ball-radius steps, nearest the cue spot first.
fn grid_respot(arena: &BallArena, table: &Table) -> Option<Vec2> {
    let step = table.ball_radius;
    let cols = ((table.respot_max.x - table.respot_min.x) / step) as usize;
    let rows = ((table.respot_max.y - table.respot_min.y) / step) as usize;
    let mut candidates: Vec<Vec2> = (0..=rows)
        .flat_map(|r| {
            (0..=cols).map(move |c| {
                Vec2::new(
                    table.respot_min.x + c as f32 * step,
                    table.respot_min.y + r as f32 * step,
                )
            })
        })
        .collect();
    candidates.sort_by(|a, b| {
        a.distance_squared(table.cue_spot)
            .total_cmp(&b.distance_squared(table.cue_spot))
    });
    candidates
        .into_iter()
        .find(|&spot| is_spot_clear(arena, spot, table.ball_radius))
}

/// Where to put the cue ball after a scratch: the cue spot if clear, otherwise a
/// random clear spot, otherwise the nearest clear grid point to the cue spot.
pub fn find_respot(arena: &BallArena, table: &Table, rng: &mut impl Rng, attempts: u32) -> Vec2 {
    if is_spot_clear(arena, table.cue_spot, table.ball_radius) {
        return table.cue_spot;
    }
    if let Some(spot) = random_respot(arena, table, rng, attempts) {
        return spot;
    }
    tracing::warn!(attempts, "random respot exhausted, scanning grid");
    grid_respot(arena, table).unwrap_or_else(|| {
        tracing::warn!("no clear respot found, using cue spot");
        table.cue_spot
    })
}
