//! Frame replay through a real poll loop

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use gba_rumble::mock::RecordingHal;
use gba_rumble::{HeaderSnapshot, RumbleKind, classify};
use joybus_responder::PollLoop;
use serde::Serialize;
use tracing::info;

use crate::commands::load_config;
use crate::error::CliError;
use crate::output;
use crate::script::{Exchange, ScriptBus, ScriptInput, parse_script};

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Session config (YAML, or JSON by extension)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Rumble hardware to emulate
    #[arg(long, conflicts_with = "rom")]
    pub cartridge: Option<RumbleKind>,

    /// Classify rumble from a ROM image instead
    #[arg(long)]
    pub rom: Option<PathBuf>,

    /// Script of frames and key states
    pub script: PathBuf,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    line: usize,
    request: String,
    bits: usize,
    keys: String,
    response: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    success: bool,
    target: String,
    rumble: RumbleKind,
    sessions: u32,
    frames: Vec<FrameReport>,
    hal_effects: Vec<String>,
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<Exchange> for FrameReport {
    fn from(exchange: Exchange) -> Self {
        Self {
            line: exchange.line,
            request: hex(&exchange.request),
            bits: exchange.bits,
            keys: exchange.keys.to_string(),
            response: exchange.response.as_deref().map(hex),
        }
    }
}

/// Replay a script and print every exchange.
pub fn execute(args: &ReplayArgs, json: bool) -> Result<()> {
    let config = load_config(&args.config)?;
    let header = match &args.rom {
        Some(rom) => HeaderSnapshot::from_rom_image(&fs::read(rom).map_err(CliError::from)?),
        None => HeaderSnapshot::for_kind(args.cartridge.unwrap_or_default()),
    };
    let text = fs::read_to_string(&args.script).map_err(CliError::from)?;
    let frames = parse_script(&text)?;
    info!("Replaying {} frame(s) from {}", frames.len(), args.script.display());

    let target = config.target;
    let mut poll = PollLoop::new(
        config,
        ScriptBus::new(&frames),
        ScriptInput::new(&frames),
        header,
    )
    .map_err(CliError::from)?;
    let hal = poll.run(RecordingHal::new()).map_err(CliError::from)?;

    let report = ReplayReport {
        success: true,
        target: target.name().to_string(),
        rumble: classify(&header),
        sessions: poll.sessions(),
        frames: poll
            .into_bus()
            .into_exchanges()
            .into_iter()
            .map(FrameReport::from)
            .collect(),
        hal_effects: hal.effects().iter().map(|e| format!("{e:?}")).collect(),
    };

    if json {
        output::print_json(&report);
    } else {
        print_human(&report);
    }
    Ok(())
}

fn print_human(report: &ReplayReport) {
    println!(
        "{} session(s) as {}, rumble {}",
        report.sessions,
        report.target.bold(),
        report.rumble
    );
    for frame in &report.frames {
        let response = match &frame.response {
            Some(bytes) => bytes.green(),
            None => "--".dimmed(),
        };
        let keys = if frame.keys.is_empty() {
            String::new()
        } else {
            format!(" [{}]", frame.keys)
        };
        println!(
            "{:>4}  {} /{}{} -> {}",
            frame.line,
            frame.request.cyan(),
            frame.bits,
            keys,
            response
        );
    }
    if !report.hal_effects.is_empty() {
        println!("Rumble effects: {}", report.hal_effects.join(", "));
    }
}
