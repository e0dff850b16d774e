//! `TableGame` contract checks for `PoolMatch`.

use eightball_core::game_trait::TableGame;
use eightball_core::player::Seat;
use eightball_core::test_helpers;
use eightball_sim::PoolMatch;
use eightball_sim::config::SimulationConfig;
use eightball_sim::input::ShotInput;

fn game(seed: u64) -> PoolMatch {
    PoolMatch::new(SimulationConfig::new(1.0, 1.0).unwrap(), seed)
}

fn break_shot() -> Vec<u8> {
    ShotInput::offset(-100.0, 2.0).encode().unwrap()
}

#[test]
fn new_game_is_idle() {
    test_helpers::contract_new_game_is_idle(&game(1));
}

#[test]
fn shot_starts_motion() {
    test_helpers::contract_shot_starts_motion(&mut game(1), &break_shot());
}

#[test]
fn input_ignored_while_moving() {
    test_helpers::contract_input_ignored_while_moving(&mut game(1), &break_shot());
}

#[test]
fn wrong_seat_rejected() {
    test_helpers::contract_wrong_seat_rejected(&mut game(1), &break_shot());
}

#[test]
fn state_roundtrip_preserves() {
    let mut g = game(2);
    assert!(g.apply_input(Seat::One, &break_shot()));
    for _ in 0..300 {
        g.update();
    }
    test_helpers::contract_state_roundtrip_preserves(&mut g);
}

#[test]
fn bad_state_ignored() {
    test_helpers::contract_bad_state_ignored(&mut game(3));
}

#[test]
fn malformed_input_rejected() {
    let mut g = game(1);
    assert!(!g.apply_input(Seat::One, &[0xc1]));
    assert!(g.is_at_rest());
}

#[test]
fn break_comes_to_rest() {
    let mut g = game(4);
    assert!(g.apply_input(Seat::One, &break_shot()));
    let (steps, events) = test_helpers::run_until_rest(&mut g, 200_000);
    assert!(steps.is_some(), "break never came to rest");
    assert!(!events.is_empty());
    assert_eq!(g.time_step(), 0.01);
    assert_eq!(g.metadata().players, 2);
}
