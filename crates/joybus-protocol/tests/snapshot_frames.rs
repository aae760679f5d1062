//! Snapshot tests for wire-level values the host checks bit-for-bit.

use insta::assert_snapshot;
use joybus_protocol::{
    BLOCK_LEN, BitWriter, FieldSpec, Response, crc5, crc8, encode_address, read_field,
};

// ── Address framing ──────────────────────────────────────────────────────────

#[test]
fn test_snapshot_encoded_addresses() {
    let lines: Vec<String> = [0x0000u16, 0x0020, 0x0400, 0x7FE0, 0x8000, 0x8020, 0xC000, 0xFFE0]
        .iter()
        .map(|&a| format!("{a:04X} crc5={:02X} field={:04X}", crc5(a), encode_address(a)))
        .collect();
    assert_snapshot!(lines.join("\n"), @r"
    0000 crc5=00 field=0000
    0020 crc5=15 field=0035
    0400 crc5=07 field=0407
    7FE0 crc5=0C field=7FEC
    8000 crc5=01 field=8001
    8020 crc5=14 field=8034
    C000 crc5=1B field=C01B
    FFE0 crc5=0D field=FFED
    ");
}

// ── Block checksums ──────────────────────────────────────────────────────────

#[test]
fn test_snapshot_block_checksums() {
    let mut counting = [0u8; BLOCK_LEN];
    for (i, b) in counting.iter_mut().enumerate() {
        *b = i as u8;
    }
    let mut first_only = [0u8; BLOCK_LEN];
    first_only[0] = 1;

    let lines = [
        format!("zeros={:02X}", crc8(&[0x00; BLOCK_LEN])),
        format!("0x80={:02X}", crc8(&[0x80; BLOCK_LEN])),
        format!("0x81={:02X}", crc8(&[0x81; BLOCK_LEN])),
        format!("first=1 {:02X}", crc8(&first_only)),
        format!("counting={:02X}", crc8(&counting)),
    ];
    assert_snapshot!(lines.join("\n"), @r"
    zeros=00
    0x80=B8
    0x81=53
    first=1 04
    counting=33
    ");
}

// ── Responses ────────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_response_display() -> Result<(), Box<dyn std::error::Error>> {
    let response = Response::concat(&[0x09, 0x00], &[0x03])?;
    assert_snapshot!(format!("{response} ({} bits)", response.bits()), @"09 00 03 (24 bits)");
    Ok(())
}

#[test]
fn test_snapshot_bit_writer_layout() -> Result<(), Box<dyn std::error::Error>> {
    const FIELDS: [FieldSpec; 4] = [
        FieldSpec::new("flag", 0, 1),
        FieldSpec::new("mode", 5, 3),
        FieldSpec::new("nibble", 8, 4),
        FieldSpec::new("byte", 12, 8),
    ];
    let mut buf = [0u8; 3];
    let mut writer = BitWriter::new(&mut buf);
    writer.put_flag(&FIELDS[0], true)?;
    writer.put(&FIELDS[1], 3)?;
    writer.put(&FIELDS[2], 0xC8 >> 4)?;
    writer.put(&FIELDS[3], 0x80)?;
    assert_snapshot!(format!("{buf:02X?}"), @"[83, C8, 00]");
    assert_eq!(read_field(&buf, &FIELDS[3])?, 0x80);
    Ok(())
}
