//! Property-based tests for pak address validation and block integrity.

use controller_pak::{PakError, PakStore, is_control_region};
use joybus_protocol::{BLOCK_LEN, crc5, crc8};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A write lands iff the embedded CRC5 matches; otherwise nothing moves.
    #[test]
    fn prop_write_accepted_iff_crc_matches(
        field in any::<u16>(),
        data in prop::array::uniform32(1u8..=255),
    ) {
        let mut store = PakStore::new();
        let block = field & !0x1F;
        let valid = crc5(block) == (field & 0x1F) as u8;
        let result = store.write(field, &data, false);
        prop_assert_eq!(result.is_ok(), valid);
        if valid {
            prop_assert_eq!(store.peek(block), data);
        } else {
            prop_assert!(matches!(result, Err(PakError::AddressCrc { .. })), "expected AddressCrc error");
            prop_assert_eq!(store.peek(block), [0u8; BLOCK_LEN]);
        }
    }

    #[test]
    fn prop_read_accepted_iff_crc_matches(field in any::<u16>(), rumble in any::<bool>()) {
        let store = PakStore::new();
        let valid = crc5(field & !0x1F) == (field & 0x1F) as u8;
        prop_assert_eq!(store.read(field, rumble).is_ok(), valid);
    }

    /// Unless the control-region mask applies, a read returns exactly what
    /// was written with the same CRC8 the write reported.
    #[test]
    fn prop_round_trip_preserves_data(
        block in 0u16..0x800,
        data in prop::array::uniform32(any::<u8>()),
        rumble in any::<bool>(),
    ) {
        let address = block << 5;
        let field = address | u16::from(crc5(address));
        let mut store = PakStore::new();
        let write = store.write(field, &data, rumble);
        prop_assert!(write.is_ok());
        let read = store.read(field, rumble);
        prop_assert!(read.is_ok());
        if let (Ok(write), Ok(read)) = (write, read) {
            prop_assert_eq!(write.crc, crc8(&data));
            let expect_masked = is_control_region(address) && rumble;
            if expect_masked {
                prop_assert!(read.data.iter().all(|b| b & !0x81 == 0));
            } else {
                prop_assert_eq!(read.data, data);
                prop_assert_eq!(read.crc, write.crc);
            }
        }
    }
}
