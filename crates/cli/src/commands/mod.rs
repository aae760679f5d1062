//! Command implementations for the gbajoy CLI

pub mod checksum;
pub mod profiles;
pub mod replay;
pub mod validate;

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use joybus_responder::{SessionConfig, Target};
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    N64,
    Gamecube,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::N64 => Target::N64,
            TargetArg::Gamecube => Target::GameCube,
        }
    }
}

/// Load a session config; `.json` files are JSON, anything else YAML.
pub fn load_config(path: &Path) -> Result<SessionConfig, CliError> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    debug!("Loading {} config from {}", if is_json { "JSON" } else { "YAML" }, path.display());
    let config = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(config)
}

/// Parse a hex or decimal number.
pub fn parse_number(text: &str) -> Result<u16, CliError> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse::<u16>(),
    };
    parsed.map_err(|e| CliError::InvalidArgument(format!("'{text}': {e}")))
}

/// Parse a block of hex bytes, whitespace allowed anywhere.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>, CliError> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_start_matches("0x")
        .to_string();
    if digits.len() % 2 != 0 {
        return Err(CliError::InvalidArgument(
            "odd number of hex digits".to_string(),
        ));
    }
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|d| u8::from_str_radix(d, 16).ok())
                .ok_or_else(|| CliError::InvalidArgument(format!("invalid hex in '{text}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_number_hex_and_decimal() -> TestResult {
        assert_eq!(parse_number("0x8000")?, 0x8000);
        assert_eq!(parse_number("32")?, 32);
        assert!(parse_number("0x1FFFF").is_err());
        Ok(())
    }

    #[test]
    fn parse_hex_bytes_ignores_whitespace() -> TestResult {
        assert_eq!(parse_hex_bytes("0x01 02\n0a")?, vec![0x01, 0x02, 0x0A]);
        assert!(parse_hex_bytes("123").is_err());
        assert!(parse_hex_bytes("zz").is_err());
        Ok(())
    }
}
