//! handcast demo driver
//!
//! Replays a scripted hand closing into a fist while a grab-selecting
//! pointer aims at a small scene, and reports each tick.
//!
//! Usage:
//!   handcast-demo                          # 30 ticks, default config
//!   handcast-demo --config handcast.toml   # Load settings from TOML
//!   handcast-demo --ray-kind linear --json # JSON lines on stdout

use anyhow::Result;
use clap::{Parser, ValueEnum};
use handcast::RayKind;
use handcast_demo::{run_demo, DemoOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RayKindArg {
    Linear,
    Curved,
}

impl From<RayKindArg> for RayKind {
    fn from(arg: RayKindArg) -> Self {
        match arg {
            RayKindArg::Linear => RayKind::Linear,
            RayKindArg::Curved => RayKind::Curved,
        }
    }
}

/// Scripted hand tracking and pointer casting demo
#[derive(Parser)]
#[command(name = "handcast-demo")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "30")]
    ticks: usize,

    /// Override the configured ray kind
    #[arg(long, value_enum)]
    ray_kind: Option<RayKindArg>,

    /// Print one JSON record per tick
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = DemoOptions {
        config: cli.config,
        ticks: cli.ticks,
        ray_kind: cli.ray_kind.map(RayKind::from),
        ..DemoOptions::default()
    };
    let records = run_demo(&options)?;

    if cli.json {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
    } else {
        for record in &records {
            println!(
                "tick {:>3}  grab {:.2}  pinch {:.2}  {:<8}  {:<8}  target {}",
                record.tick,
                record.grab_strength,
                record.pinch_strength,
                record.gesture,
                record.selection,
                if record.target.is_valid {
                    format!(
                        "({:.2}, {:.2}, {:.2})",
                        record.target.position.x, record.target.position.y, record.target.position.z
                    )
                } else {
                    "none".to_string()
                }
            );
        }
    }

    let selections = records.iter().filter(|r| r.selection_started).count();
    info!(ticks = records.len(), selections, "Demo finished");
    Ok(())
}
