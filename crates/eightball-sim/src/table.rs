use serde::{Deserialize, Serialize};

use eightball_core::vec2::Vec2;

/// Playable width in world units.
pub const TABLE_WIDTH: f32 = 1200.0;
/// Playable height in world units.
pub const TABLE_HEIGHT: f32 = 600.0;
/// Ball radius in world units.
pub const BALL_RADIUS: f32 = 25.0;
/// Uniform ball mass.
pub const BALL_MASS: f32 = 1.0;
/// Ball centers closer than this to a rail bounce off it.
pub const CUSHION_MARGIN: f32 = 1.5 * BALL_RADIUS;
/// A ball whose center comes within this distance of a pocket center drops.
pub const POCKET_CAPTURE_RADIUS: f32 = 2.5 * BALL_RADIUS;
/// Drawn pocket radius.
pub const POCKET_DRAW_RADIUS: f32 = 1.5 * BALL_RADIUS;
/// Where the cue ball is placed at the start and after a scratch.
pub const CUE_SPOT: Vec2 = Vec2::new(1000.0, 300.0);
/// Number of pockets on the table.
pub const POCKET_COUNT: usize = 6;

/// Static table geometry. Never changes once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub width: f32,
    pub height: f32,
    pub ball_radius: f32,
    pub cushion_margin: f32,
    pub capture_radius: f32,
    /// Radius pockets are drawn with; smaller than the capture circle.
    pub pocket_draw_radius: f32,
    pub pockets: [Vec2; POCKET_COUNT],
    pub cue_spot: Vec2,
    /// Lower corner of the area searched when respotting at random.
    pub respot_min: Vec2,
    /// Upper corner of the area searched when respotting at random.
    pub respot_max: Vec2,
}

impl Default for Table {
    fn default() -> Self {
        Self::standard()
    }
}

impl Table {
    /// The 1200x600 table: four corner pockets and two on the middle of the long rails.
    pub fn standard() -> Self {
        let w = TABLE_WIDTH;
        let h = TABLE_HEIGHT;
        let pockets =
            std::array::from_fn(|i| Vec2::new(w * (i % 3) as f32 / 2.0, h * (i / 3) as f32));
        Self {
            width: w,
            height: h,
            ball_radius: BALL_RADIUS,
            cushion_margin: CUSHION_MARGIN,
            capture_radius: POCKET_CAPTURE_RADIUS,
            pocket_draw_radius: POCKET_DRAW_RADIUS,
            pockets,
            cue_spot: CUE_SPOT,
            respot_min: Vec2::new(100.0, 100.0),
            respot_max: Vec2::new(w - 100.0, h - 100.0),
        }
    }

    /// Index of the pocket whose capture circle contains `point`, if any.
    pub fn pocket_containing(&self, point: Vec2) -> Option<usize> {
        let r_sq = self.capture_radius * self.capture_radius;
        self.pockets
            .iter()
            .position(|p| p.distance_squared(point) <= r_sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_pockets_on_corners_and_long_rails() {
        let table = Table::standard();
        let expected = [
            Vec2::new(0.0, 0.0),
            Vec2::new(600.0, 0.0),
            Vec2::new(1200.0, 0.0),
            Vec2::new(0.0, 600.0),
            Vec2::new(600.0, 600.0),
            Vec2::new(1200.0, 600.0),
        ];
        assert_eq!(table.pockets, expected);
    }

    #[test]
    fn capture_radius_boundary_is_inclusive() {
        let table = Table::standard();
        let edge = Vec2::new(POCKET_CAPTURE_RADIUS, 0.0);
        assert_eq!(table.pocket_containing(edge), Some(0));
        let outside = Vec2::new(POCKET_CAPTURE_RADIUS + 0.5, 0.0);
        assert_eq!(table.pocket_containing(outside), None);
    }

    #[test]
    fn middle_pocket_index() {
        let table = Table::standard();
        assert_eq!(table.pocket_containing(Vec2::new(600.0, 590.0)), Some(4));
    }

    #[test]
    fn cue_spot_is_clear_of_pockets() {
        let table = Table::standard();
        assert!(table.pocket_draw_radius < table.capture_radius);
        assert_eq!(table.pocket_containing(table.cue_spot), None);
    }
}
