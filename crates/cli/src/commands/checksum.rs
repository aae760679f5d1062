//! Checksum tools

use anyhow::Result;
use colored::Colorize;
use joybus_protocol::{BLOCK_LEN, crc5, crc8, encode_address};
use serde_json::json;

use crate::commands::{parse_hex_bytes, parse_number};
use crate::error::CliError;
use crate::output;

/// Print the CRC5 and framed address for a pak address.
pub fn crc5_command(address: &str, json: bool) -> Result<()> {
    let address = parse_number(address)?;
    let block = address & !0x1F;
    let crc = crc5(block);
    let field = encode_address(block);

    if json {
        output::print_json(&json!({
            "success": true,
            "address": block,
            "crc5": crc,
            "field": format!("{field:04X}"),
        }));
    } else {
        if block != address {
            println!("{} 0x{address:04X} aligned to 0x{block:04X}", "Note:".yellow());
        }
        println!("Block address: {}", format!("0x{block:04X}").bold());
        println!("CRC5:          0x{crc:02X}");
        println!("Address field: {}", format!("{field:04X}").cyan());
    }
    Ok(())
}

/// Print the CRC8 of a 32-byte block.
pub fn crc8_command(hex: &str, json: bool) -> Result<()> {
    let bytes = parse_hex_bytes(hex)?;
    let block: [u8; BLOCK_LEN] = bytes.as_slice().try_into().map_err(|e| {
        CliError::InvalidArgument(format!(
            "block must be {BLOCK_LEN} bytes, got {} ({e})",
            bytes.len()
        ))
    })?;
    let crc = crc8(&block);

    if json {
        output::print_json(&json!({ "success": true, "crc8": crc }));
    } else {
        println!("CRC8: {}", format!("0x{crc:02X}").bold());
    }
    Ok(())
}
