//! GameCube status packer.
//!
//! A status report is 8 bytes: the button word, the main stick, then 32 bits
//! whose split between substick, triggers and analog buttons depends on the
//! mode the host last requested.
//!
//! | mode | substick | triggers | analog A/B |
//! |------|----------|----------|------------|
//! | 0    | 8+8      | 4+4      | 4+4        |
//! | 1    | 4+4      | 8+8      | 4+4        |
//! | 2    | 4+4      | 4+4      | 8+8        |
//! | 3    | 8+8      | 8+8      | omitted    |
//! | 4    | 8+8      | omitted  | 8+8        |
//!
//! Modes 5 to 7 are accepted and echoed in the Info status byte but pack
//! with the mode 0 layout. A 4-bit field carries the top nibble of its
//! 8-bit source.

use joybus_protocol::{BitWriter, FieldSpec, JoybusResult, read_field};

use crate::origin::AnalogState;

/// Bytes in a packed status report.
pub const STATUS_LEN: usize = 8;

/// Trigger and analog-button value reported while the digital button is held.
pub const FULL_PRESS: u8 = 200;

/// Main stick deflection around the origin for a held d-pad direction.
pub const GC_STICK_OFFSET: u8 = 100;

pub const BUTTON_WORD_FIELD: FieldSpec = FieldSpec::new("buttons", 0, 16);
pub const STICK_X_FIELD: FieldSpec = FieldSpec::new("stick_x", 16, 8);
pub const STICK_Y_FIELD: FieldSpec = FieldSpec::new("stick_y", 24, 8);

/// One of the six analog values a layout can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogField {
    SubstickX,
    SubstickY,
    TriggerL,
    TriggerR,
    AnalogA,
    AnalogB,
}

impl AnalogField {
    pub fn get(self, state: &AnalogState) -> u8 {
        match self {
            Self::SubstickX => state.substick_x,
            Self::SubstickY => state.substick_y,
            Self::TriggerL => state.trigger_l,
            Self::TriggerR => state.trigger_r,
            Self::AnalogA => state.analog_a,
            Self::AnalogB => state.analog_b,
        }
    }

    pub fn set(self, state: &mut AnalogState, value: u8) {
        let slot = match self {
            Self::SubstickX => &mut state.substick_x,
            Self::SubstickY => &mut state.substick_y,
            Self::TriggerL => &mut state.trigger_l,
            Self::TriggerR => &mut state.trigger_r,
            Self::AnalogA => &mut state.analog_a,
            Self::AnalogB => &mut state.analog_b,
        };
        *slot = value;
    }
}

type Layout = [(AnalogField, FieldSpec)];

const MODE0: &Layout = &[
    (AnalogField::SubstickX, FieldSpec::new("substick_x", 32, 8)),
    (AnalogField::SubstickY, FieldSpec::new("substick_y", 40, 8)),
    (AnalogField::TriggerL, FieldSpec::new("trigger_l", 48, 4)),
    (AnalogField::TriggerR, FieldSpec::new("trigger_r", 52, 4)),
    (AnalogField::AnalogA, FieldSpec::new("analog_a", 56, 4)),
    (AnalogField::AnalogB, FieldSpec::new("analog_b", 60, 4)),
];

const MODE1: &Layout = &[
    (AnalogField::SubstickX, FieldSpec::new("substick_x", 32, 4)),
    (AnalogField::SubstickY, FieldSpec::new("substick_y", 36, 4)),
    (AnalogField::TriggerL, FieldSpec::new("trigger_l", 40, 8)),
    (AnalogField::TriggerR, FieldSpec::new("trigger_r", 48, 8)),
    (AnalogField::AnalogA, FieldSpec::new("analog_a", 56, 4)),
    (AnalogField::AnalogB, FieldSpec::new("analog_b", 60, 4)),
];

const MODE2: &Layout = &[
    (AnalogField::SubstickX, FieldSpec::new("substick_x", 32, 4)),
    (AnalogField::SubstickY, FieldSpec::new("substick_y", 36, 4)),
    (AnalogField::TriggerL, FieldSpec::new("trigger_l", 40, 4)),
    (AnalogField::TriggerR, FieldSpec::new("trigger_r", 44, 4)),
    (AnalogField::AnalogA, FieldSpec::new("analog_a", 48, 8)),
    (AnalogField::AnalogB, FieldSpec::new("analog_b", 56, 8)),
];

const MODE3: &Layout = &[
    (AnalogField::SubstickX, FieldSpec::new("substick_x", 32, 8)),
    (AnalogField::SubstickY, FieldSpec::new("substick_y", 40, 8)),
    (AnalogField::TriggerL, FieldSpec::new("trigger_l", 48, 8)),
    (AnalogField::TriggerR, FieldSpec::new("trigger_r", 56, 8)),
];

const MODE4: &Layout = &[
    (AnalogField::SubstickX, FieldSpec::new("substick_x", 32, 8)),
    (AnalogField::SubstickY, FieldSpec::new("substick_y", 40, 8)),
    (AnalogField::AnalogA, FieldSpec::new("analog_a", 48, 8)),
    (AnalogField::AnalogB, FieldSpec::new("analog_b", 56, 8)),
];

/// Analog layout selector, the low 3 bits of a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusMode(u8);

impl StatusMode {
    pub const fn from_request(byte: u8) -> Self {
        Self(byte & 0x07)
    }

    /// Value echoed in the Info status byte, 5..=7 included.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Field table this mode packs with.
    pub fn layout(self) -> &'static [(AnalogField, FieldSpec)] {
        match self.0 {
            1 => MODE1,
            2 => MODE2,
            3 => MODE3,
            4 => MODE4,
            _ => MODE0,
        }
    }

    /// Every field of the report in wire order.
    pub fn fields(self) -> impl Iterator<Item = FieldSpec> {
        [BUTTON_WORD_FIELD, STICK_X_FIELD, STICK_Y_FIELD]
            .into_iter()
            .chain(self.layout().iter().map(|(_, spec)| *spec))
    }
}

/// Values before packing.
///
/// After [`unpack_status`] the analog fields hold the raw field contents,
/// so a 4-bit field reads back as its nibble and omitted fields as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFields {
    pub button_word: u16,
    pub stick_x: u8,
    pub stick_y: u8,
    pub analog: AnalogState,
}

/// Pack a status report.
///
/// # Errors
///
/// Only if a layout table is inconsistent.
pub fn pack_status(mode: StatusMode, fields: &StatusFields) -> JoybusResult<[u8; STATUS_LEN]> {
    let mut buf = [0u8; STATUS_LEN];
    let mut writer = BitWriter::new(&mut buf);
    writer.put(&BUTTON_WORD_FIELD, u32::from(fields.button_word))?;
    writer.put(&STICK_X_FIELD, u32::from(fields.stick_x))?;
    writer.put(&STICK_Y_FIELD, u32::from(fields.stick_y))?;
    for (field, spec) in mode.layout() {
        let source = u32::from(field.get(&fields.analog));
        writer.put(spec, source >> (8 - u32::from(spec.width)))?;
    }
    Ok(buf)
}

/// Read a packed report back into its fields.
///
/// # Errors
///
/// Only if a layout table is inconsistent.
#[allow(
    clippy::cast_possible_truncation,
    reason = "fields are at most 16 bits wide"
)]
pub fn unpack_status(mode: StatusMode, buf: &[u8; STATUS_LEN]) -> JoybusResult<StatusFields> {
    let mut fields = StatusFields {
        button_word: read_field(buf, &BUTTON_WORD_FIELD)? as u16,
        stick_x: read_field(buf, &STICK_X_FIELD)? as u8,
        stick_y: read_field(buf, &STICK_Y_FIELD)? as u8,
        analog: AnalogState::default(),
    };
    for (field, spec) in mode.layout() {
        field.set(&mut fields.analog, read_field(buf, spec)? as u8);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use joybus_protocol::validate_layout;

    #[test]
    fn test_every_layout_fills_eight_bytes() -> Result<(), Box<dyn std::error::Error>> {
        for raw in 0..8 {
            let mode = StatusMode::from_request(raw);
            let fields: Vec<FieldSpec> = mode.fields().collect();
            validate_layout(&fields, STATUS_LEN)?;
            let bits: usize = fields.iter().map(|f| usize::from(f.width)).sum();
            assert_eq!(bits, STATUS_LEN * 8, "mode {raw}");
        }
        Ok(())
    }

    #[test]
    fn test_mode_keeps_low_bits() {
        assert_eq!(StatusMode::from_request(0xFB).raw(), 3);
        assert_eq!(StatusMode::from_request(6).layout(), MODE0);
    }

    #[test]
    fn test_mode0_truncates_trigger() -> Result<(), Box<dyn std::error::Error>> {
        let fields = StatusFields {
            analog: AnalogState {
                trigger_l: 0xFF,
                ..AnalogState::default()
            },
            ..StatusFields::default()
        };
        let packed = pack_status(StatusMode::default(), &fields)?;
        let unpacked = unpack_status(StatusMode::default(), &packed)?;
        assert_eq!(unpacked.analog.trigger_l, 0x0F);
        assert_eq!(packed.get(6), Some(&0xF0));
        Ok(())
    }

    #[test]
    fn test_mode3_omits_analog_buttons() -> Result<(), Box<dyn std::error::Error>> {
        let fields = StatusFields {
            button_word: 0x0180,
            stick_x: 28,
            stick_y: 228,
            analog: AnalogState {
                substick_x: 128,
                substick_y: 128,
                trigger_l: 200,
                trigger_r: 0,
                analog_a: 200,
                analog_b: 200,
            },
        };
        let mode = StatusMode::from_request(3);
        let packed = pack_status(mode, &fields)?;
        assert_eq!(packed, [0x01, 0x80, 28, 228, 128, 128, 200, 0]);
        let unpacked = unpack_status(mode, &packed)?;
        assert_eq!(unpacked.analog.analog_a, 0);
        assert_eq!(unpacked.analog.trigger_l, 200);
        Ok(())
    }

    #[test]
    fn test_mode1_nibbles() -> Result<(), Box<dyn std::error::Error>> {
        let fields = StatusFields {
            analog: AnalogState {
                substick_x: 0xAB,
                substick_y: 0xCD,
                trigger_l: 0x12,
                trigger_r: 0x34,
                analog_a: 0x56,
                analog_b: 0x78,
            },
            ..StatusFields::default()
        };
        let packed = pack_status(StatusMode::from_request(1), &fields)?;
        assert_eq!(packed.get(4..), Some(&[0xAC, 0x12, 0x34, 0x57][..]));
        Ok(())
    }
}
