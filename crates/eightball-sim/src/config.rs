use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "EIGHTBALL_CONFIG";
/// Config file consulted when neither CLI nor environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/eightball.toml";

/// Immutable simulation parameters, fixed before the first shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Restitution coefficient for ball-ball contacts, in [0, 1].
    pub elasticity: f32,
    /// Table friction coefficient, in [0, 1]. Deceleration is twice this value.
    pub friction_coefficient: f32,
    /// Fixed integration step in seconds.
    pub dt: f32,
    /// Speed at or below which a ball snaps to rest.
    pub rest_speed: f32,
    /// Maximum launch speed of the cue ball.
    pub aim_cap: f32,
    /// Random placement attempts before the cue-ball respot falls back to a grid scan.
    pub respot_attempts: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            elasticity: 1.0,
            friction_coefficient: 0.5,
            dt: 0.01,
            rest_speed: 0.01,
            aim_cap: 100.0,
            respot_attempts: 10_000,
        }
    }
}

impl SimulationConfig {
    /// Build a validated config from the two player-facing parameters.
    pub fn new(elasticity: f32, friction_coefficient: f32) -> Result<Self, ConfigError> {
        Self {
            elasticity,
            friction_coefficient,
            ..Self::default()
        }
        .validated()
    }

    /// Check every field is in range.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.elasticity) {
            return Err(ConfigError::ElasticityOutOfRange(self.elasticity));
        }
        if !(0.0..=1.0).contains(&self.friction_coefficient) {
            return Err(ConfigError::FrictionOutOfRange(self.friction_coefficient));
        }
        if self.dt.is_nan() || self.dt <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.dt));
        }
        if self.aim_cap.is_nan() || self.aim_cap <= 0.0 {
            return Err(ConfigError::NonPositiveAimCap(self.aim_cap));
        }
        if self.rest_speed.is_nan() || self.rest_speed < 0.0 {
            return Err(ConfigError::NegativeRestSpeed(self.rest_speed));
        }
        Ok(self)
    }

    /// Constant deceleration magnitude applied against motion.
    pub fn friction_accel(&self) -> f32 {
        2.0 * self.friction_coefficient
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(contents)
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .validated()
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `$EIGHTBALL_CONFIG`, then `config/eightball.toml`, falling back to defaults.
    /// A file that exists but does not parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ElasticityOutOfRange(f32),
    FrictionOutOfRange(f32),
    NonPositiveTimeStep(f32),
    NonPositiveAimCap(f32),
    NegativeRestSpeed(f32),
    Read { path: String, message: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElasticityOutOfRange(v) => {
                write!(f, "elasticity must be between 0 and 1 (inclusive), got {v}")
            },
            Self::FrictionOutOfRange(v) => write!(
                f,
                "coefficient of friction must be between 0 and 1 (inclusive), got {v}"
            ),
            Self::NonPositiveTimeStep(v) => write!(f, "time step must be positive, got {v}"),
            Self::NonPositiveAimCap(v) => write!(f, "aim cap must be positive, got {v}"),
            Self::NegativeRestSpeed(v) => {
                write!(f, "rest speed must be zero or positive, got {v}")
            },
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
