use serde::{Deserialize, Serialize};

use crate::events::MatchEvent;
use crate::player::Seat;

/// Core trait for a turn-based table simulation.
///
/// The driver owns the step loop, input polling and the sinks;
/// the game only handles physics and rules.
pub trait TableGame {
    /// Game metadata for display and logs.
    fn metadata(&self) -> GameMetadata;

    /// Advance the simulation by one fixed time step. Returns the events raised during the step.
    fn update(&mut self) -> Vec<MatchEvent>;

    /// Apply an encoded shot input from the given seat.
    /// Returns `false` when the input was ignored (wrong seat, table in motion, match over).
    fn apply_input(&mut self, seat: Seat, input: &[u8]) -> bool;

    /// Serialize the authoritative game state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the game state with a previously serialized one.
    fn apply_state(&mut self, state: &[u8]);

    /// Fixed simulation time step in seconds.
    fn time_step(&self) -> f32 {
        0.01
    }

    /// Seat whose turn it is.
    fn current_seat(&self) -> Seat;

    /// Whether every ball on the table is at rest.
    fn is_at_rest(&self) -> bool;

    /// Whether the match is over.
    fn is_match_complete(&self) -> bool;

    /// Winner, once decided.
    fn winner(&self) -> Option<Seat>;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub players: u8,
}

/// Generates the `TableGame` state methods shared by implementations:
/// `serialize_state`, `apply_state`, `is_match_complete`, `winner`.
///
/// Requires the implementing struct to have a `state: $StateType` field,
/// and `$StateType` to have `complete: bool` and `winner: Option<Seat>` fields.
#[macro_export]
macro_rules! table_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("match state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn is_match_complete(&self) -> bool {
            self.state.complete
        }

        fn winner(&self) -> Option<$crate::player::Seat> {
            self.state.winner
        }
    };
}
