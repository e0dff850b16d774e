pub mod ball;
pub mod collision;
pub mod config;
pub mod contact;
pub mod input;
pub mod physics;
pub mod pockets;
pub mod render;
pub mod rules;
pub mod table;
pub mod telemetry;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use eightball_core::events::MatchEvent;
use eightball_core::game_trait::{GameMetadata, TableGame};
use eightball_core::player::Seat;
use eightball_core::sink::{Aim, InputEvent, InputSource, RenderSink, TelemetrySink};
use eightball_core::table_game_boilerplate;
use eightball_core::vec2::Vec2;

use ball::{Ball, BallArena};
use config::SimulationConfig;
use input::{ShotInput, shot_velocity};
use render::{BallSprite, Frame, Hud, Rgba};
use rules::{Phase, Rules, ShotSummary, TableCounts, Verdict};
use table::Table;
use telemetry::{Telemetry, TelemetrySample};

/// Serializable match state: everything needed to resume a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub arena: BallArena,
    pub rules: Rules,
    pub phase: Phase,
    /// The cue ball dropped this shot and has not been put back yet.
    pub cue_pending_respot: bool,
    pub winner: Option<Seat>,
    pub complete: bool,
    /// Steps since the match started.
    pub step: u64,
    /// Steps since the current shot was struck.
    pub shot_step: u64,
    pub shots: u32,
}

/// One eight-ball match: table, balls, rules and the fixed-step simulation.
pub struct PoolMatch {
    config: SimulationConfig,
    table: Table,
    state: MatchState,
    rng: StdRng,
    telemetry: Telemetry,
    /// Raised by `shoot`, returned by the next `step`.
    pending_events: Vec<MatchEvent>,
}

impl PoolMatch {
    /// Fresh match on the standard table with a rack shuffled from `seed`.
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let arena = BallArena::standard_rack(&mut rng);
        Self::build(config, arena, Rules::new(), rng)
    }

    /// Match starting from an arbitrary layout. A missing cue ball is respotted.
    pub fn with_arena(config: SimulationConfig, arena: BallArena, seed: u64) -> Self {
        Self::build(config, arena, Rules::new(), StdRng::seed_from_u64(seed))
    }

    /// Replace the rule state, e.g. to resume with groups already assigned.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.state.rules = rules;
        self
    }

    fn build(
        config: SimulationConfig,
        mut arena: BallArena,
        rules: Rules,
        mut rng: StdRng,
    ) -> Self {
        let table = Table::standard();
        if arena.cue_ball().is_none() {
            let spot = pockets::find_respot(&arena, &table, &mut rng, config.respot_attempts);
            arena.insert(Ball::cue(spot));
        }
        tracing::info!(
            elasticity = config.elasticity,
            friction = config.friction_coefficient,
            balls = arena.len(),
            "Match set up"
        );
        Self {
            config,
            table,
            state: MatchState {
                arena,
                rules,
                phase: Phase::Aiming,
                cue_pending_respot: false,
                winner: None,
                complete: false,
                step: 0,
                shot_step: 0,
                shots: 0,
            },
            rng,
            telemetry: Telemetry::default(),
            pending_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn arena(&self) -> &BallArena {
        &self.state.arena
    }

    pub fn rules(&self) -> &Rules {
        &self.state.rules
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn winner(&self) -> Option<Seat> {
        self.state.winner
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn total_kinetic_energy(&self) -> f32 {
        self.state.arena.total_kinetic_energy()
    }

    /// Strike the cue ball. Ignored unless the table is at rest and the match is live.
    /// Returns whether the shot was taken.
    pub fn shoot(&mut self, aim: Aim) -> bool {
        if self.state.complete || self.state.phase != Phase::Aiming {
            return false;
        }
        let counts = TableCounts::of(&self.state.arena);
        let cap = self.config.aim_cap;
        let Some(cue) = self.state.arena.get_mut(ball::BallId::CUE) else {
            return false;
        };
        let velocity = shot_velocity(aim, cue.position, cap);
        cue.velocity = velocity;

        let seat = self.state.rules.shooter();
        self.state.rules.begin_shot(counts);
        self.state.phase = Phase::InMotion;
        self.state.shot_step = 0;
        self.state.shots += 1;
        tracing::debug!(?seat, vx = velocity.x, vy = velocity.y, "Shot taken");
        self.pending_events.push(MatchEvent::ShotTaken { seat, velocity });
        true
    }

    /// Advance the simulation by one fixed time step.
    pub fn step(&mut self) -> Vec<MatchEvent> {
        let mut events = std::mem::take(&mut self.pending_events);
        if self.state.complete {
            return events;
        }
        self.state.step += 1;

        let arena = &mut self.state.arena;
        let pairs = contact::detect_contacts(arena, self.table.ball_radius);
        collision::resolve_contacts(arena, &pairs, self.config.elasticity);
        physics::integrate_all(arena, self.config.dt);

        for capture in pockets::capture_pocketed(arena, &self.table) {
            let pocket = capture.pocket;
            if capture.ball.design.is_cue() {
                tracing::info!(pocket, "Scratch");
                self.state.cue_pending_respot = true;
                events.push(MatchEvent::Scratch { pocket });
            } else {
                let number = capture.ball.design.number().unwrap_or_default();
                tracing::info!(number, pocket, "Ball pocketed");
                events.push(MatchEvent::BallPocketed { number, pocket });
            }
        }

        physics::settle_all(arena, &self.table, &self.config);

        if self.state.phase == Phase::InMotion {
            self.state.shot_step += 1;
        }
        let time = self.state.step as f32 * self.config.dt;
        self.telemetry.record(time, self.state.shot_step, &self.state.arena);

        if self.state.phase == Phase::InMotion && self.total_kinetic_energy() == 0.0 {
            self.state.phase = Phase::Resolving;
            self.resolve_shot(&mut events);
            self.state.phase = Phase::Aiming;
        }
        events
    }

    fn resolve_shot(&mut self, events: &mut Vec<MatchEvent>) {
        let summary = ShotSummary {
            counts: TableCounts::of(&self.state.arena),
            scratched: self.state.cue_pending_respot,
        };
        match self.state.rules.resolve_shot(summary) {
            Verdict::Decided { winner } => {
                tracing::info!(?winner, shots = self.state.shots, "Match won");
                self.state.winner = Some(winner);
                self.state.complete = true;
                events.push(MatchEvent::MatchWon { winner });
            },
            Verdict::Foul { next } => {
                self.respot_cue(events);
                tracing::info!(?next, "Foul, turn passes");
                events.push(MatchEvent::TurnPassed { to: next });
            },
            Verdict::BreakPass { next } => {
                tracing::info!(?next, "Nothing dropped on the break, turn passes");
                events.push(MatchEvent::TurnPassed { to: next });
            },
            Verdict::Played {
                shooter,
                assigned,
                kept_turn,
            } => {
                if let Some(group) = assigned {
                    tracing::info!(?shooter, group = group.label(), "Groups assigned");
                    events.push(MatchEvent::GroupsAssigned {
                        seat: shooter,
                        group,
                    });
                }
                if kept_turn {
                    tracing::info!(?shooter, "Shooter keeps the table");
                    events.push(MatchEvent::TurnKept { seat: shooter });
                } else {
                    let to = shooter.other();
                    tracing::info!(?to, "Turn passes");
                    events.push(MatchEvent::TurnPassed { to });
                }
            },
        }

        if self.state.arena.len() <= 1 {
            tracing::info!("Table cleared");
            self.state.complete = true;
            events.push(MatchEvent::TableCleared);
        }
    }

    fn respot_cue(&mut self, events: &mut Vec<MatchEvent>) {
        let position = pockets::find_respot(
            &self.state.arena,
            &self.table,
            &mut self.rng,
            self.config.respot_attempts,
        );
        self.state.arena.insert(Ball::cue(position));
        self.state.cue_pending_respot = false;
        tracing::info!(x = position.x, y = position.y, "Cue ball respotted");
        events.push(MatchEvent::CueBallRespotted { position });
    }

    /// Snapshot for the render sink.
    pub fn frame(&self) -> Frame {
        Frame {
            step: self.state.step,
            phase: self.state.phase,
            table: self.table.clone(),
            cloth: Rgba::CLOTH,
            rail: Rgba::RAIL,
            balls: self.state.arena.alive().map(BallSprite::from).collect(),
            hud: Hud::new(&self.state.rules, self.state.winner),
        }
    }

    /// Position of the cue ball, if it is on the table.
    pub fn cue_position(&self) -> Option<Vec2> {
        self.state.arena.cue_ball().map(|b| b.position)
    }
}

impl TableGame for PoolMatch {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Eight-Ball".to_string(),
            description: "Two-player eight-ball pool. Pocket your group, then the eight."
                .to_string(),
            players: 2,
        }
    }

    fn update(&mut self) -> Vec<MatchEvent> {
        self.step()
    }

    fn apply_input(&mut self, seat: Seat, input: &[u8]) -> bool {
        if seat != self.state.rules.shooter() {
            return false;
        }
        match rmp_serde::from_slice::<ShotInput>(input) {
            Ok(shot) => self.shoot(shot.aim),
            Err(e) => {
                tracing::debug!(?seat, error = %e, "Dropped malformed shot input");
                false
            },
        }
    }

    table_game_boilerplate!(state_type: MatchState);

    fn time_step(&self) -> f32 {
        self.config.dt
    }

    fn current_seat(&self) -> Seat {
        self.state.rules.shooter()
    }

    fn is_at_rest(&self) -> bool {
        self.state.phase == Phase::Aiming
    }
}

/// How a driven match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Won(Seat),
    /// Only the cue ball was left without a decided winner.
    TableCleared,
    Quit,
    /// `max_steps` ran out with the match still live.
    StepLimit,
}

/// Drive a match to the end: poll input, step, render, and hand the telemetry
/// series to its sink once the loop exits.
///
/// An input source that runs dry while the table is at rest ends the match as `Quit`.
pub fn run_match(
    game: &mut PoolMatch,
    input: &mut dyn InputSource,
    render: &mut dyn RenderSink<Frame>,
    telemetry: &mut dyn TelemetrySink<TelemetrySample>,
    max_steps: Option<u64>,
) -> MatchOutcome {
    let mut steps: u64 = 0;
    let outcome = loop {
        if let Some(winner) = game.winner() {
            break MatchOutcome::Won(winner);
        }
        if game.is_complete() {
            break MatchOutcome::TableCleared;
        }

        let accepting = game.phase() == Phase::Aiming;
        match input.poll(accepting) {
            Some(InputEvent::Quit) => break MatchOutcome::Quit,
            Some(InputEvent::Shot(aim)) => {
                if !game.shoot(aim) {
                    tracing::debug!("Shot ignored while the table is moving");
                }
            },
            None if accepting && input.is_exhausted() => break MatchOutcome::Quit,
            None => {},
        }

        if max_steps.is_some_and(|max| steps >= max) {
            break MatchOutcome::StepLimit;
        }
        for event in game.step() {
            if event.is_terminal() {
                tracing::info!(?event, steps, "Match decided");
            } else {
                tracing::debug!(?event, "Match event");
            }
        }
        render.present(&game.frame());
        steps += 1;
    };

    telemetry.deliver(game.telemetry().samples());
    tracing::info!(?outcome, steps, shots = game.state().shots, "Match over");
    outcome
}
