//! Turning pointer input into a cue-ball velocity, and the text form of scripted input.

use serde::{Deserialize, Serialize};

use eightball_core::sink::{Aim, InputEvent};
use eightball_core::vec2::Vec2;

/// Shot input as carried across the `TableGame` boundary (rmp-encoded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    pub aim: Aim,
}

impl ShotInput {
    pub fn offset(dx: f32, dy: f32) -> Self {
        Self {
            aim: Aim::Offset(Vec2::new(dx, dy)),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }
}

/// Initial cue-ball velocity for an aim, clamped to `cap` with its direction kept.
pub fn shot_velocity(aim: Aim, cue_position: Vec2, cap: f32) -> Vec2 {
    let raw = match aim {
        Aim::Pointer(p) => p - cue_position,
        Aim::Offset(v) => v,
    };
    raw.clamp_length_max(cap)
}

/// A line of scripted input that could not be understood.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    UnknownCommand(String),
    MissingArgument { command: String, expected: usize },
    BadNumber(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            Self::MissingArgument { command, expected } => {
                write!(f, "{command} takes {expected} numbers")
            },
            Self::BadNumber(s) => write!(f, "not a number: {s}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Parse one line of a shot script.
///
/// ```text
/// aim 40 -12      # velocity offset from the cue ball
/// click 620 300   # pointer position on the table
/// quit
/// ```
///
/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<InputEvent>, InputError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let command = command.to_ascii_lowercase();
    match command.as_str() {
        "quit" | "q" | "exit" => Ok(Some(InputEvent::Quit)),
        "aim" | "click" | "pointer" => {
            let numbers = words
                .map(|w| w.parse::<f32>().map_err(|_| InputError::BadNumber(w.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            let &[x, y] = numbers.as_slice() else {
                return Err(InputError::MissingArgument {
                    command,
                    expected: 2,
                });
            };
            if !x.is_finite() || !y.is_finite() {
                return Err(InputError::BadNumber(format!("{x} {y}")));
            }
            let v = Vec2::new(x, y);
            let aim = if command == "aim" {
                Aim::Offset(v)
            } else {
                Aim::Pointer(v)
            };
            Ok(Some(InputEvent::Shot(aim)))
        },
        _ => Err(InputError::UnknownCommand(command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_aim_is_offset_from_cue() {
        let cue = Vec2::new(1000.0, 300.0);
        let v = shot_velocity(Aim::Pointer(Vec2::new(1030.0, 340.0)), cue, 100.0);
        assert_eq!(v, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn long_aim_is_capped_keeping_direction() {
        let v = shot_velocity(Aim::Offset(Vec2::new(-300.0, 400.0)), Vec2::ZERO, 100.0);
        assert!((v.length() - 100.0).abs() < 1e-3);
        assert!((v.x + 60.0).abs() < 1e-3);
        assert!((v.y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("aim 40 -12").unwrap(),
            Some(InputEvent::Shot(Aim::Offset(Vec2::new(40.0, -12.0))))
        );
        assert_eq!(
            parse_command("  CLICK 620 300 # into the side").unwrap(),
            Some(InputEvent::Shot(Aim::Pointer(Vec2::new(620.0, 300.0))))
        );
        assert_eq!(parse_command("q").unwrap(), Some(InputEvent::Quit));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            parse_command("shoot 1 2"),
            Err(InputError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command("aim 1"),
            Err(InputError::MissingArgument { expected: 2, .. })
        ));
        assert!(matches!(parse_command("aim x 2"), Err(InputError::BadNumber(_))));
        assert!(matches!(parse_command("aim inf 2"), Err(InputError::BadNumber(_))));
    }

    #[test]
    fn shot_input_decodes() {
        let input = ShotInput::offset(10.0, -5.0);
        let decoded: ShotInput = rmp_serde::from_slice(&input.encode().unwrap()).unwrap();
        assert_eq!(decoded, input);
    }
}
