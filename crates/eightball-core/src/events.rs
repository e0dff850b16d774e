use serde::{Deserialize, Serialize};

use crate::player::{BallGroup, Seat};
use crate::vec2::Vec2;

/// Events emitted by the simulation during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// The shooter struck the cue ball with this initial velocity.
    ShotTaken { seat: Seat, velocity: Vec2 },
    /// An object ball dropped. `pocket` indexes the table's pocket list.
    BallPocketed { number: u8, pocket: usize },
    /// The cue ball dropped.
    Scratch { pocket: usize },
    CueBallRespotted { position: Vec2 },
    GroupsAssigned { seat: Seat, group: BallGroup },
    /// Shooter pocketed one of their own and shoots again.
    TurnKept { seat: Seat },
    TurnPassed { to: Seat },
    MatchWon { winner: Seat },
    /// Every object ball is off the table.
    TableCleared,
}

impl MatchEvent {
    /// Whether this event ends the match.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MatchWon { .. } | Self::TableCleared)
    }
}
