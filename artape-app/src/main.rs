//! Artape
//!
//! Replays a scripted tracking session through the measuring core and
//! prints the distance label after every frame.

use artape_app::{LoggingConfig, MeasureConfig, ScenarioRunner, StartPolicy, ViewOptions, init_tracing};
use artape_data::Scenario;
use artape_track::Viewport;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

/// Artape - AR measuring tape, headless
#[derive(Parser, Debug)]
#[command(name = "artape")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON scenario to replay (defaults to the built-in walkthrough)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// What happens to earlier start dots on a repeated "add"
    #[arg(short, long, value_enum, default_value_t = StartPolicy::Replace)]
    policy: StartPolicy,

    /// Hide the live endpoint dot
    #[arg(long)]
    no_end_marker: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Stream spans to Tracy (needs the `tracy` feature)
    #[arg(long)]
    tracy: bool,

    /// View width in points
    #[arg(long, default_value_t = 1170.0)]
    width: f32,

    /// View height in points
    #[arg(long, default_value_t = 2532.0)]
    height: f32,
}

fn main() {
    let args = Args::parse();
    init_tracing(&LoggingConfig {
        level: args.log_level.clone(),
        enable_tracy: args.tracy,
    });

    if let Err(e) = run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::walkthrough(),
    };

    let viewport = Viewport::new(args.width, args.height);
    let config = MeasureConfig::default()
        .with_start_policy(args.policy)
        .with_end_marker(!args.no_end_marker)
        .with_viewport(viewport);
    let mut runner = ScenarioRunner::new(viewport, ViewOptions::default(), config)?;
    let report = runner.run(&scenario)?;

    for frame in &report.frames {
        println!("t={:.3}s", frame.time);
        for line in frame.label.lines() {
            println!("  {}", line);
        }
    }
    info!(
        "Replayed {} frames, {} planes still tracked",
        report.frames.len(),
        report.tracked_planes
    );
    println!("{}", report.final_label);
    Ok(())
}
