pub mod events;
pub mod game_trait;
pub mod player;
pub mod sink;
pub mod vec2;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::MatchEvent;
    use crate::game_trait::TableGame;

    /// Run ticks until the table comes to rest, returning the step count and all events.
    /// Returns `None` for the count if the table was still moving after `max_steps`.
    pub fn run_until_rest(
        game: &mut dyn TableGame,
        max_steps: usize,
    ) -> (Option<usize>, Vec<MatchEvent>) {
        let mut all_events = Vec::new();
        for step in 0..max_steps {
            all_events.extend(game.update());
            if game.is_at_rest() {
                return (Some(step + 1), all_events);
            }
        }
        (None, all_events)
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every TableGame implementation must pass these. Game crates call
    // them with a freshly set up game and a valid encoded shot.

    /// A fresh game is at rest, incomplete, and has no winner.
    pub fn contract_new_game_is_idle(game: &dyn TableGame) {
        assert!(game.is_at_rest(), "new game must start at rest");
        assert!(!game.is_match_complete(), "new game must not be complete");
        assert_eq!(game.winner(), None, "new game must have no winner");
    }

    /// A valid shot from the current seat must be accepted and set the table in motion.
    pub fn contract_shot_starts_motion(game: &mut dyn TableGame, valid_input: &[u8]) {
        let seat = game.current_seat();
        assert!(
            game.apply_input(seat, valid_input),
            "shot from the seat to play must be accepted"
        );
        assert!(!game.is_at_rest(), "table must be moving after a shot");
    }

    /// While the table moves, further shots are ignored and do not change state.
    pub fn contract_input_ignored_while_moving(game: &mut dyn TableGame, valid_input: &[u8]) {
        let seat = game.current_seat();
        assert!(game.apply_input(seat, valid_input));
        game.update();
        let before = game.serialize_state();
        assert!(
            !game.apply_input(seat, valid_input),
            "shot while in motion must be rejected"
        );
        assert_eq!(before, game.serialize_state());
    }

    /// A shot from the seat not on turn is ignored.
    pub fn contract_wrong_seat_rejected(game: &mut dyn TableGame, valid_input: &[u8]) {
        let other = game.current_seat().other();
        let before = game.serialize_state();
        assert!(!game.apply_input(other, valid_input));
        assert_eq!(before, game.serialize_state());
    }

    /// serialize -> apply -> serialize must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn TableGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage state bytes are ignored.
    pub fn contract_bad_state_ignored(game: &mut dyn TableGame) {
        let before = game.serialize_state();
        game.apply_state(&[0xc1, 0x00, 0xff]);
        assert_eq!(before, game.serialize_state());
    }
}
