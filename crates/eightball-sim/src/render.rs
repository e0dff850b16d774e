//! Per-step snapshot handed to the render sink.

use serde::{Deserialize, Serialize};

use eightball_core::player::Seat;
use eightball_core::vec2::Vec2;

use crate::ball::{Ball, Design};
use crate::rules::{Phase, Rules};
use crate::table::Table;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Felt.
    pub const CLOTH: Self = Self::rgb(0, 102, 0);
    /// Rails.
    pub const RAIL: Self = Self::rgb(75, 55, 28);
}

/// Colors shared by solids and stripes, by rank 1..=7.
pub const RANK_COLORS: [Rgba; 7] = [
    Rgba::rgb(255, 255, 51), // Yellow
    Rgba::rgb(0, 0, 255),    // Blue
    Rgba::rgb(255, 0, 0),    // Red
    Rgba::rgb(76, 0, 153),   // Purple
    Rgba::rgb(255, 128, 0),  // Orange
    Rgba::rgb(51, 255, 51),  // Green
    Rgba::rgb(102, 0, 0),    // Maroon
];

/// Main color of a ball. Stripes are drawn as a band of this color on white.
pub fn ball_color(design: Design) -> Rgba {
    match design {
        Design::Solid(rank) | Design::Striped(rank) => RANK_COLORS
            .get(usize::from(rank).wrapping_sub(1))
            .copied()
            .unwrap_or(Rgba::WHITE),
        Design::Eight => Rgba::BLACK,
        Design::Cue => Rgba::WHITE,
    }
}

/// One ball as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSprite {
    pub id: u8,
    pub position: Vec2,
    pub design: Design,
    pub color: Rgba,
    pub number: Option<u8>,
    pub striped: bool,
}

impl From<&Ball> for BallSprite {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id.0,
            position: ball.position,
            design: ball.design,
            color: ball_color(ball.design),
            number: ball.design.number(),
            striped: matches!(ball.design, Design::Striped(_)),
        }
    }
}

/// Status text under the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub player_labels: [String; 2],
    pub group_labels: [String; 2],
    /// Empty once the match is decided.
    pub to_move: String,
    pub winner: Option<String>,
    pub instructions: Vec<String>,
}

pub const AIM_INSTRUCTIONS: [&str; 2] = [
    "CLICK ANYWHERE ON TABLE TO SET DIRECTION AND MAGNITUDE",
    "(INCREASES WITH DISTANCE FROM CUEBALL) OF CUEBALL VELOCITY",
];

impl Hud {
    pub fn new(rules: &Rules, winner: Option<Seat>) -> Self {
        let labels = Seat::BOTH.map(|s| s.label().to_string());
        let groups = Seat::BOTH.map(|s| rules.group_label(s).to_string());
        match winner {
            Some(seat) => Self {
                player_labels: labels,
                group_labels: groups,
                to_move: String::new(),
                winner: Some(format!("{} WINS!!!", seat.label())),
                instructions: vec!["PRESS (q) to QUIT".to_string()],
            },
            None => {
                let to_move = match rules.shooter() {
                    Seat::One => "<-- PLAYER ONE MOVE",
                    Seat::Two => "PLAYER TWO MOVE -->",
                };
                Self {
                    player_labels: labels,
                    group_labels: groups,
                    to_move: to_move.to_string(),
                    winner: None,
                    instructions: AIM_INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
                }
            },
        }
    }
}

/// Everything the render sink needs for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    pub phase: Phase,
    pub table: Table,
    pub cloth: Rgba,
    pub rail: Rgba,
    pub balls: Vec<BallSprite>,
    pub hud: Hud,
}
