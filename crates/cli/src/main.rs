//! gbajoy - developer tools for the GBA Joybus controller responder
//!
//! Checksum calculators, preset listings, config validation, and offline
//! replay of Joybus command scripts through the real responder.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::TargetArg;
use crate::commands::replay::ReplayArgs;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "gbajoy")]
#[command(about = "GBA Joybus responder tools - checksums, profiles, config validation and replay")]
#[command(version)]
#[command(long_about = "
gbajoy works with the GBA-as-controller Joybus responder on the host.
It computes controller pak checksums, lists the built-in key map profiles,
validates session configs, and replays scripted console commands through
the same dispatcher that runs on the handheld.

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CRC5 and framed address field for a pak address
    Crc5 {
        /// Address, decimal or 0x-prefixed hex
        address: String,
    },

    /// CRC8 of a 32-byte pak block
    Crc8 {
        /// 64 hex digits, whitespace allowed
        hex: String,
    },

    /// List built-in key map profiles
    Profiles {
        /// Only this personality
        #[arg(short, long, value_enum)]
        target: Option<TargetArg>,
    },

    /// Load and validate a session config
    Validate {
        /// Config file (YAML, or JSON by extension)
        config: PathBuf,
    },

    /// Replay a command script through the responder
    Replay(ReplayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gbajoy={log_level},joybus_responder={log_level},controller_pak={log_level},gba_rumble={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(e.downcast_ref::<CliError>().map_or(1, CliError::exit_code))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Crc5 { address } => commands::checksum::crc5_command(address, cli.json),
        Commands::Crc8 { hex } => commands::checksum::crc8_command(hex, cli.json),
        Commands::Profiles { target } => commands::profiles::execute(*target, cli.json),
        Commands::Validate { config } => commands::validate::execute(config, cli.json),
        Commands::Replay(args) => commands::replay::execute(args, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gba_rumble::RumbleKind;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_global_flags() -> TestResult {
        let cli = Cli::try_parse_from(["gbajoy", "-vv", "crc5", "0x8000", "--json"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Crc5 { ref address } if address == "0x8000"));
        Ok(())
    }

    #[test]
    fn parse_profiles_target() -> TestResult {
        let cli = Cli::try_parse_from(["gbajoy", "profiles", "--target", "gamecube"])?;
        assert!(matches!(
            cli.command,
            Commands::Profiles {
                target: Some(TargetArg::Gamecube)
            }
        ));
        Ok(())
    }

    #[test]
    fn parse_replay_cartridge() -> TestResult {
        let cli = Cli::try_parse_from([
            "gbajoy",
            "replay",
            "--config",
            "session.yaml",
            "--cartridge",
            "gpio",
            "probe.txt",
        ])?;
        match &cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.cartridge, Some(RumbleKind::GpioCartridge));
                assert_eq!(args.script, PathBuf::from("probe.txt"));
            }
            _ => return Err("expected Replay command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_replay_rejects_cartridge_with_rom() {
        let result = Cli::try_parse_from([
            "gbajoy",
            "replay",
            "-c",
            "session.yaml",
            "--cartridge",
            "gpio",
            "--rom",
            "game.gba",
            "probe.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["gbajoy", "profiles", "--target", "snes"]).is_err());
    }
}
