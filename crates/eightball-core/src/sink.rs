//! Seams between the simulation and the outside world.

use serde::{Deserialize, Serialize};

use crate::vec2::Vec2;

/// How a shot's aim was expressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Aim {
    /// Absolute pointer position on the table; the shot vector is its offset from the cue ball.
    Pointer(Vec2),
    /// Offset from the cue ball, already computed by the input device.
    Offset(Vec2),
}

/// A discrete input from the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Shot(Aim),
    Quit,
}

/// Yields player input. Polled once per step.
pub trait InputSource {
    /// `accepting` is true when the table is at rest and a shot would be applied.
    /// Sources that queue input should hold shots back while it is false.
    fn poll(&mut self, accepting: bool) -> Option<InputEvent>;

    /// True once the source can never yield another event.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Receives one snapshot per step.
pub trait RenderSink<F> {
    fn present(&mut self, frame: &F);
}

/// Receives the full telemetry series once, when the match ends.
pub trait TelemetrySink<S> {
    fn deliver(&mut self, samples: &[S]);
}

/// A render sink that drops every frame.
#[derive(Debug, Default)]
pub struct NullRender;

impl<F> RenderSink<F> for NullRender {
    fn present(&mut self, _frame: &F) {}
}

/// A telemetry sink that keeps a copy of the delivered series.
#[derive(Debug)]
pub struct CollectTelemetry<S> {
    pub samples: Vec<S>,
}

impl<S> Default for CollectTelemetry<S> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<S: Clone> TelemetrySink<S> for CollectTelemetry<S> {
    fn deliver(&mut self, samples: &[S]) {
        self.samples = samples.to_vec();
    }
}

/// An input source that replays a fixed list of events, one per accepting poll.
/// `Quit` is delivered as soon as it reaches the front of the queue.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: std::collections::VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, accepting: bool) -> Option<InputEvent> {
        match self.queue.front() {
            Some(InputEvent::Quit) => self.queue.pop_front(),
            Some(InputEvent::Shot(_)) if accepting => self.queue.pop_front(),
            _ => None,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}
