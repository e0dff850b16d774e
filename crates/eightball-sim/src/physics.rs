//! Position integration, cushion bounces, and rolling friction.

use eightball_core::vec2::Vec2;

use crate::ball::{Ball, BallArena};
use crate::config::SimulationConfig;
use crate::table::Table;

/// Explicit Euler step: `position += velocity * dt`.
pub fn integrate(ball: &mut Ball, dt: f32) {
    ball.position += ball.velocity * dt;
}

/// Bounce off any rail whose margin the ball center has entered.
///
/// Only the velocity component heading into the rail is flipped, so a ball that
/// lingers inside the margin for several steps cannot be flipped back into the rail.
pub fn reflect_off_cushions(ball: &mut Ball, table: &Table) {
    let m = table.cushion_margin;
    let p = ball.position;
    let v = &mut ball.velocity;
    if p.x <= m && v.x < 0.0 {
        v.x = -v.x;
    }
    if p.x >= table.width - m && v.x > 0.0 {
        v.x = -v.x;
    }
    if p.y <= m && v.y < 0.0 {
        v.y = -v.y;
    }
    if p.y >= table.height - m && v.y > 0.0 {
        v.y = -v.y;
    }
}

/// Constant-magnitude deceleration `decel` opposing motion (kinetic friction).
/// Snaps to exactly zero once the speed would fall to `rest_speed` or below,
/// so the ball never reverses and always reaches a true rest.
pub fn apply_friction(ball: &mut Ball, decel: f32, dt: f32, rest_speed: f32) {
    let speed = ball.speed();
    if speed == 0.0 {
        return;
    }
    let new_speed = speed - decel * dt;
    if new_speed <= rest_speed {
        ball.velocity = Vec2::ZERO;
    } else {
        ball.velocity = ball.velocity * (new_speed / speed);
    }
}

/// Advance every ball on the table by one step.
pub fn integrate_all(arena: &mut BallArena, dt: f32) {
    for ball in arena.alive_mut() {
        integrate(ball, dt);
    }
}

/// Cushions then friction for every ball still on the table.
pub fn settle_all(arena: &mut BallArena, table: &Table, config: &SimulationConfig) {
    let accel = config.friction_accel();
    for ball in arena.alive_mut() {
        reflect_off_cushions(ball, table);
        apply_friction(ball, accel / ball.mass, config.dt, config.rest_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::Design;

    fn moving(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut b = Ball::new(Design::Solid(1), Vec2::new(x, y));
        b.velocity = Vec2::new(vx, vy);
        b
    }

    #[test]
    fn euler_step() {
        let mut b = moving(100.0, 100.0, 50.0, -20.0);
        integrate(&mut b, 0.01);
        assert!((b.position.x - 100.5).abs() < 1e-4);
        assert!((b.position.y - 99.8).abs() < 1e-4);
    }

    #[test]
    fn bounces_off_left_rail() {
        let table = Table::standard();
        let mut b = moving(30.0, 300.0, -40.0, 5.0);
        reflect_off_cushions(&mut b, &table);
        assert_eq!(b.velocity, Vec2::new(40.0, 5.0));
    }

    #[test]
    fn bounces_off_bottom_rail() {
        let table = Table::standard();
        let mut b = moving(500.0, 580.0, 3.0, 25.0);
        reflect_off_cushions(&mut b, &table);
        assert_eq!(b.velocity, Vec2::new(3.0, -25.0));
    }

    #[test]
    fn corner_flips_both_components() {
        let table = Table::standard();
        let mut b = moving(1180.0, 20.0, 10.0, -10.0);
        reflect_off_cushions(&mut b, &table);
        assert_eq!(b.velocity, Vec2::new(-10.0, 10.0));
    }

    #[test]
    fn ball_leaving_margin_is_not_flipped_back() {
        let table = Table::standard();
        let mut b = moving(30.0, 300.0, 40.0, 0.0);
        reflect_off_cushions(&mut b, &table);
        assert_eq!(b.velocity, Vec2::new(40.0, 0.0));
    }

    #[test]
    fn interior_ball_is_untouched() {
        let table = Table::standard();
        let mut b = moving(600.0, 300.0, -40.0, 40.0);
        reflect_off_cushions(&mut b, &table);
        assert_eq!(b.velocity, Vec2::new(-40.0, 40.0));
    }

    #[test]
    fn friction_keeps_direction() {
        let mut b = moving(0.0, 0.0, 30.0, 40.0);
        apply_friction(&mut b, 100.0, 0.01, 0.01);
        assert!((b.speed() - 49.0).abs() < 1e-4);
        assert!((b.velocity.x / b.velocity.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn friction_snaps_slow_ball_to_zero() {
        let mut b = moving(0.0, 0.0, 0.015, 0.0);
        apply_friction(&mut b, 1.0, 0.01, 0.01);
        assert_eq!(b.velocity, Vec2::ZERO);
    }

    #[test]
    fn zero_friction_still_rests_crawling_ball() {
        let mut b = moving(0.0, 0.0, 0.005, 0.0);
        apply_friction(&mut b, 0.0, 0.01, 0.01);
        assert_eq!(b.velocity, Vec2::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn friction_decreases_speed_to_exact_zero(
                vx in -100.0f32..100.0,
                vy in -100.0f32..100.0,
                coefficient in 0.05f32..=1.0,
            ) {
                let decel = 2.0 * coefficient;
                let dt = 0.01;
                let mut b = moving(0.0, 0.0, vx, vy);
                let start = b.speed();
                let bound = (start / (decel * dt)).ceil() as usize + 1;
                let mut prev = start;
                let mut steps = 0;
                while b.is_moving() {
                    prop_assert!(steps <= bound, "still moving after {} steps", steps);
                    let dir_before = b.velocity;
                    apply_friction(&mut b, decel, dt, 0.01);
                    let speed = b.speed();
                    prop_assert!(speed < prev, "speed {} did not drop below {}", speed, prev);
                    prop_assert!(b.velocity.is_zero() || b.velocity.dot(dir_before) > 0.0);
                    prev = speed;
                    steps += 1;
                }
                prop_assert_eq!(b.velocity, Vec2::ZERO);
            }
        }
    }
}
