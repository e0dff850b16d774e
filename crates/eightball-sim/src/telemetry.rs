use serde::{Deserialize, Serialize};

use eightball_core::vec2::Vec2;

use crate::ball::BallArena;

/// One step's worth of system-level measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Simulated seconds since the match started.
    pub time: f32,
    /// Steps since the current shot was struck.
    pub shot_step: u64,
    pub kinetic_energy: f32,
    pub center_of_mass: Vec2,
}

/// Time series of kinetic energy and center of mass, one sample per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    samples: Vec<TelemetrySample>,
}

impl Telemetry {
    pub fn record(&mut self, time: f32, shot_step: u64, arena: &BallArena) {
        let center_of_mass = arena
            .center_of_mass()
            .or_else(|| self.samples.last().map(|s| s.center_of_mass))
            .unwrap_or(Vec2::ZERO);
        self.samples.push(TelemetrySample {
            time,
            shot_step,
            kinetic_energy: arena.total_kinetic_energy(),
            center_of_mass,
        });
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn peak_energy(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s.kinetic_energy)
            .fold(0.0, f32::max)
    }

    /// Simulated seconds covered by the series.
    pub fn duration(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.time)
    }
}
