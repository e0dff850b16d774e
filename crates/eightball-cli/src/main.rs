mod sinks;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use eightball_core::player::Seat;
use eightball_core::sink::{CollectTelemetry, InputSource, NullRender, RenderSink};
use eightball_sim::config::{ConfigError, SimulationConfig};
use eightball_sim::render::Frame;
use eightball_sim::telemetry::TelemetrySample;
use eightball_sim::{MatchOutcome, PoolMatch, run_match};

use sinks::{ChannelInput, JsonLinesRender, LineInput};

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-player eight-ball, driven by scripted shots")]
struct Args {
    /// Ball-ball restitution, 0..=1. Overrides the config file.
    #[arg(requires = "friction")]
    elasticity: Option<f32>,
    /// Table friction coefficient, 0..=1. Overrides the config file.
    friction: Option<f32>,
    /// TOML config file. Defaults to $EIGHTBALL_CONFIG, then config/eightball.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Shot script (`aim dx dy`, `click x y`, `quit`). Reads stdin when omitted.
    #[arg(long)]
    shots: Option<PathBuf>,
    /// Write render frames here as JSON lines.
    #[arg(long)]
    frames: Option<PathBuf>,
    /// Only write every Nth frame.
    #[arg(long, default_value_t = 1)]
    frame_every: u64,
    /// Write the energy / center-of-mass series here as JSON.
    #[arg(long)]
    telemetry: Option<PathBuf>,
    /// Write the final match state here as MessagePack.
    #[arg(long)]
    dump_state: Option<PathBuf>,
    /// Rack shuffle and respot seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many simulation steps.
    #[arg(long)]
    max_steps: Option<u64>,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    outcome: MatchOutcome,
    winner: Option<Seat>,
    shots: u32,
    steps: u64,
    balls_left: usize,
    /// Simulated seconds.
    duration: f32,
    peak_energy: f32,
}

#[derive(Serialize)]
struct TelemetryFile<'a> {
    seed: u64,
    config: &'a SimulationConfig,
    samples: &'a [TelemetrySample],
}

/// Positional parameters win over every file. Without them, `--config` is read if
/// given, otherwise `fallback` (the environment / default-path lookup).
fn resolve_config(
    args: &Args,
    fallback: impl FnOnce() -> Result<SimulationConfig, ConfigError>,
) -> Result<SimulationConfig> {
    let mut config = match (&args.config, args.elasticity, args.friction) {
        (Some(path), _, _) => SimulationConfig::from_file(path)?,
        (None, Some(_), Some(_)) => SimulationConfig::default(),
        (None, _, _) => fallback()?,
    };
    if let (Some(elasticity), Some(friction)) = (args.elasticity, args.friction) {
        config.elasticity = elasticity;
        config.friction_coefficient = friction;
    }
    Ok(config.validated()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config =
        resolve_config(&args, SimulationConfig::load).context("invalid simulation parameters")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        elasticity = config.elasticity,
        friction = config.friction_coefficient,
        "Config loaded"
    );

    let mut input: Box<dyn InputSource> = match &args.shots {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open shot script {}", path.display()))?;
            Box::new(LineInput::new(BufReader::new(file)))
        },
        None => Box::new(ChannelInput::spawn(|| io::stdin().lock())),
    };
    if config.friction_coefficient == 0.0 && args.max_steps.is_none() {
        tracing::warn!("Friction is zero and no --max-steps given; only quit ends a rolling table");
    }

    let mut frames = match &args.frames {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create frame output {}", path.display()))?;
            Some(JsonLinesRender::new(BufWriter::new(file), args.frame_every))
        },
        None => None,
    };

    let mut game = PoolMatch::new(config, seed);
    let mut telemetry = CollectTelemetry::default();
    let outcome = {
        let mut null = NullRender;
        let render: &mut dyn RenderSink<Frame> = match frames.as_mut() {
            Some(sink) => sink,
            None => &mut null,
        };
        run_match(
            &mut game,
            input.as_mut(),
            render,
            &mut telemetry,
            args.max_steps,
        )
    };

    if let Some(sink) = frames {
        let written = sink.frames_written();
        sink.finish().context("write frames")?;
        tracing::info!(frames = written, "Frames written");
    }

    if let Some(path) = &args.telemetry {
        let file = File::create(path)
            .with_context(|| format!("create telemetry output {}", path.display()))?;
        let doc = TelemetryFile {
            seed,
            config: game.config(),
            samples: &telemetry.samples,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &doc).context("write telemetry")?;
    }

    if let Some(path) = &args.dump_state {
        let bytes = rmp_serde::to_vec(game.state()).context("encode match state")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write match state {}", path.display()))?;
    }

    let summary = Summary {
        seed,
        outcome,
        winner: game.winner(),
        shots: game.state().shots,
        steps: game.state().step,
        balls_left: game.arena().len(),
        duration: game.telemetry().duration(),
        peak_energy: game.telemetry().peak_energy(),
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
