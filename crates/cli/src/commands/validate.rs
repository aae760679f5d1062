//! Session config validation

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use gba_input_maps::{GcButton, N64Button};
use joybus_responder::{SessionConfig, Target};
use serde_json::json;

use crate::commands::load_config;
use crate::error::CliError;
use crate::output;

fn profile_name(config: &SessionConfig) -> &str {
    match config.target {
        Target::N64 => config.profile_name::<N64Button>(),
        Target::GameCube => config.profile_name::<GcButton>(),
    }
}

/// Load and validate a config file.
pub fn execute(path: &Path, json: bool) -> Result<()> {
    let config = load_config(path)?;
    config.validate().map_err(CliError::from)?;

    if json {
        output::print_json(&json!({
            "success": true,
            "target": config.target.name(),
            "profile": profile_name(&config),
            "key_echo": config.key_echo,
            "timing": {
                "ticks": config.timing.ticks(),
                "timer_reload": config.timing.timer_reload(),
                "period_ns": config.timing.period_ns(),
            },
        }));
    } else {
        println!("{} {}", "✓".green(), path.display().to_string().bold());
        println!("  Target:  {}", config.target);
        println!("  Profile: {}", profile_name(&config));
        println!("  Key echo: {}", if config.key_echo { "on" } else { "off" });
        println!(
            "  Timing:  {} ticks ({:.0} ns per bit, reload 0x{:04X})",
            config.timing.ticks(),
            config.timing.period_ns(),
            config.timing.timer_reload()
        );
    }
    Ok(())
}
