//! Property-based tests for the pak checksums and frame validation.
//!
//! The lookup tables are re-derived bitwise from their polynomials, so a
//! typo in either table fails here before it can reach a host.

use joybus_protocol::{
    BLOCK_LEN, CRC5_TABLE, CRC8_TABLE, Command, CommandFrame, Crc8, GcCommand, JoybusError,
    N64Command, crc5, crc8, encode_address, split_address,
};
use proptest::prelude::*;

fn derive_crc8_entry(index: u8) -> u8 {
    let mut crc = index;
    for _ in 0..8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ 0x85
        } else {
            crc << 1
        };
    }
    crc
}

fn derive_crc5_entry(index: u8) -> u8 {
    let mut crc = index;
    for _ in 0..5 {
        crc = if crc & 0x10 != 0 {
            ((crc << 1) ^ 0x15) & 0x1F
        } else {
            (crc << 1) & 0x1F
        };
    }
    crc
}

#[test]
fn test_crc8_table_matches_polynomial() {
    for (index, &entry) in CRC8_TABLE.iter().enumerate() {
        assert_eq!(entry, derive_crc8_entry(index as u8), "entry {index:#04X}");
    }
}

#[test]
fn test_crc5_table_matches_polynomial() {
    for (index, &entry) in CRC5_TABLE.iter().enumerate() {
        assert_eq!(entry, derive_crc5_entry(index as u8), "entry {index:#04X}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_crc5_deterministic_and_five_bits(address in any::<u16>()) {
        let first = crc5(address);
        prop_assert_eq!(first, crc5(address));
        prop_assert!(first <= 0x1F);
    }

    /// The embedded CRC never influences the checksum of the block address.
    #[test]
    fn prop_crc5_ignores_crc_bits(address in any::<u16>()) {
        prop_assert_eq!(crc5(address), crc5(address & !0x1F));
    }

    #[test]
    fn prop_encode_address_is_self_consistent(address in any::<u16>()) {
        let (block, embedded) = split_address(encode_address(address));
        prop_assert_eq!(block, address & !0x1F);
        prop_assert_eq!(embedded, crc5(block));
    }

    #[test]
    fn prop_crc8_deterministic(block in prop::array::uniform32(any::<u8>())) {
        prop_assert_eq!(crc8(&block), crc8(&block));
    }

    /// Splitting a block anywhere gives the same running checksum.
    #[test]
    fn prop_crc8_running_split(
        block in prop::array::uniform32(any::<u8>()),
        split in 0usize..=BLOCK_LEN,
    ) {
        let (head, tail) = block.split_at(split);
        let mut running = Crc8::new();
        running.update(head);
        running.update(tail);
        prop_assert_eq!(running.finish(), crc8(&block));
    }

    /// A single flipped bit always changes the CRC8.
    #[test]
    fn prop_crc8_detects_single_bit_flip(
        block in prop::array::uniform32(any::<u8>()),
        byte in 0usize..BLOCK_LEN,
        bit in 0u8..8,
    ) {
        let mut flipped = block;
        if let Some(b) = flipped.get_mut(byte) {
            *b ^= 1 << bit;
        }
        prop_assert_ne!(crc8(&block), crc8(&flipped));
    }

    /// Known opcodes decode only at their own frame length.
    #[test]
    fn prop_gc_frame_length_is_exact(opcode in prop::sample::select(vec![0x00u8, 0x40, 0x41, 0x42, 0x43, 0xFF]), bits in 0usize..300) {
        let bytes = [opcode, 0, 0];
        let frame = CommandFrame::new(&bytes, bits);
        let expected = GcCommand::from_opcode(opcode).map(|c| c.frame_bits());
        match frame.decode::<GcCommand>() {
            Ok(command) => prop_assert_eq!(Some(command.frame_bits()), Some(bits)),
            Err(JoybusError::ShortFrame { .. }) => prop_assert!(bits < 9),
            Err(JoybusError::FrameLength { expected: e, actual, .. }) => {
                prop_assert_eq!(Some(e), expected);
                prop_assert_ne!(e, actual);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn prop_n64_unknown_opcodes_rejected(opcode in 0x04u8..0xFF) {
        let bytes = [opcode];
        let frame = CommandFrame::new(&bytes, 9);
        prop_assert_eq!(frame.decode::<N64Command>(), Err(JoybusError::UnknownCommand(opcode)));
    }
}
