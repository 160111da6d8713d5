use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use aurascope::{
    FrameSink as _, JsonLinesSink, ManualTickSource, PhaseId, SchedulerOpts, ThrottleMode,
    TimelineConfig, Visualization, VisualizationOpts,
};

#[derive(Parser, Debug)]
#[command(name = "aurascope", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one composed frame as JSON.
    Frame(FrameArgs),
    /// Drive a visualization with a fixed tick cadence and stream frames as JSON lines.
    Simulate(SimulateArgs),
    /// List narrative phases and their descriptors.
    Phases,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Timeline config JSON; replaces the selection flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Effect category.
    #[arg(long, default_value = "balanced")]
    category: String,

    /// Intensity bucket.
    #[arg(long, default_value = "medium")]
    intensity: String,

    /// Selection seed.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    seed: i64,

    /// Freeze the animation.
    #[arg(long)]
    reduce_motion: bool,
}

impl SelectionArgs {
    fn load(&self) -> aurascope::AuraResult<TimelineConfig> {
        match &self.config {
            Some(path) => {
                let config = TimelineConfig::from_path(path)?;
                Ok(config.with_reduce_motion(config.reduce_motion || self.reduce_motion))
            }
            None => TimelineConfig::parse(
                &self.category,
                &self.intensity,
                self.seed,
                self.reduce_motion,
            ),
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Loop time in seconds; wrapped into the 8 s loop.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    time: f64,

    /// Narrative phase to settle into before computing the frame.
    #[arg(long, default_value = "idle")]
    phase: String,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Number of ticks to drive.
    #[arg(long, default_value_t = 480)]
    ticks: u64,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 16.0)]
    delta_ms: f64,

    /// Recompute cadence: full, half or quarter.
    #[arg(long, default_value = "full")]
    throttle: String,

    /// Phase to switch to once playback starts.
    #[arg(long)]
    phase: Option<String>,

    /// Tick at which the phase switch happens.
    #[arg(long, default_value_t = 0)]
    phase_at: u64,

    /// Skip frames identical to the previously pushed one.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,

    /// Collect compute-time and fps diagnostics.
    #[arg(long, default_value_t = false)]
    diagnostics: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Phases => cmd_phases(),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = args.selection.load()?;
    let phase: PhaseId = args.phase.parse()?;

    let mut viz = Visualization::with_builtin(
        config,
        VisualizationOpts::default(),
        ManualTickSource::new(),
    )?;
    viz.set_phase(phase);
    // Drop the transition so the frame shows the settled phase.
    viz.reset();
    let frame = viz.frame_at(args.time);

    let out = serde_json::json!({
        "config": config,
        "phase": phase,
        "fingerprint": aurascope::fingerprint_frame(&frame).to_string(),
        "frame": frame,
    });
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &out)?;
    writeln!(stdout)?;
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = args.selection.load()?;
    let throttle: ThrottleMode = args.throttle.parse()?;
    let phase = args
        .phase
        .as_deref()
        .map(str::parse::<PhaseId>)
        .transpose()?;

    let opts = VisualizationOpts {
        scheduler: SchedulerOpts {
            throttle,
            diagnostics: args.diagnostics,
            ..SchedulerOpts::default()
        },
        static_frame_elision: args.static_frame_elision,
        ..VisualizationOpts::default()
    };
    let mut viz = Visualization::with_builtin(config, opts, ManualTickSource::new())?;

    let mut sink = JsonLinesSink::new(std::io::BufWriter::new(std::io::stdout().lock()));
    sink.begin(viz.sink_config())?;
    viz.play();

    let mut total = aurascope::PumpStats::default();
    for tick in 0..args.ticks {
        if let Some(id) = phase.filter(|_| tick == args.phase_at) {
            viz.set_phase(id);
        }
        viz.source_mut().advance(args.delta_ms);
        let stats = viz.pump(&mut sink)?;
        total.ticks += stats.ticks;
        total.frames_recomputed += stats.frames_recomputed;
        total.frames_skipped += stats.frames_skipped;
        total.frames_static += stats.frames_static;
        total.frames_pushed += stats.frames_pushed;
        total.frames_elided += stats.frames_elided;
    }
    sink.end()?;
    viz.teardown();

    let summary = serde_json::json!({
        "stats": total,
        "final_time_seconds": viz.state().current_time_seconds,
        "phase": viz.phase(),
        "diagnostics": viz.diagnostics(),
    });
    eprintln!(
        "{}",
        serde_json::to_string(&summary).context("encode simulate summary")?
    );
    Ok(())
}

fn cmd_phases() -> anyhow::Result<()> {
    let machine = aurascope::PhaseMachine::builtin();
    let phases: Vec<_> = machine.registry().iter().collect();
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &phases)?;
    writeln!(stdout)?;
    Ok(())
}
