use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    /// The opponent's seat.
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "PLAYER ONE",
            Self::Two => "PLAYER TWO",
        }
    }
}

/// The two object-ball groups a player can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallGroup {
    Solids,
    Stripes,
}

impl BallGroup {
    pub fn other(self) -> Self {
        match self {
            Self::Solids => Self::Stripes,
            Self::Stripes => Self::Solids,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Solids => "SOLIDS",
            Self::Stripes => "STRIPES",
        }
    }
}
