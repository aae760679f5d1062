//! GameCube origin record and button word.
//!
//! The origin is the calibration snapshot the host reads back with the
//! Origin, Recalibrate and Long-status commands. It only changes when a
//! session starts, so every response built from it is stable for the whole
//! session.

use gba_input_maps::{ButtonSet, GcButton};
use joybus_protocol::{BitWriter, FieldSpec, JoybusResult};

/// Bytes in an origin response.
pub const ORIGIN_RESPONSE_LEN: usize = 10;

/// Bytes in the button word.
pub const BUTTON_WORD_LEN: usize = 2;

pub const GET_ORIGIN_FIELD: FieldSpec = FieldSpec::new("get_origin", 2, 1);
pub const USE_ORIGIN_FIELD: FieldSpec = FieldSpec::new("use_origin", 8, 1);

/// Wire position of each digital button, MSB of byte 0 first:
/// `0 0 get_origin Start Y X B A | use_origin L R Z Up Down Right Left`.
pub const GC_BUTTON_FIELDS: [(GcButton, FieldSpec); 12] = [
    (GcButton::Start, FieldSpec::new("start", 3, 1)),
    (GcButton::Y, FieldSpec::new("y", 4, 1)),
    (GcButton::X, FieldSpec::new("x", 5, 1)),
    (GcButton::B, FieldSpec::new("b", 6, 1)),
    (GcButton::A, FieldSpec::new("a", 7, 1)),
    (GcButton::L, FieldSpec::new("l", 9, 1)),
    (GcButton::R, FieldSpec::new("r", 10, 1)),
    (GcButton::Z, FieldSpec::new("z", 11, 1)),
    (GcButton::Up, FieldSpec::new("up", 12, 1)),
    (GcButton::Down, FieldSpec::new("down", 13, 1)),
    (GcButton::Right, FieldSpec::new("right", 14, 1)),
    (GcButton::Left, FieldSpec::new("left", 15, 1)),
];

/// Substick, trigger and analog-button values, 8 bits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalogState {
    pub substick_x: u8,
    pub substick_y: u8,
    pub trigger_l: u8,
    pub trigger_r: u8,
    pub analog_a: u8,
    pub analog_b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginRecord {
    pub use_origin: bool,
    pub get_origin: bool,
    pub stick_x: u8,
    pub stick_y: u8,
    pub analog: AnalogState,
}

impl Default for OriginRecord {
    /// Centred sticks, released triggers, `use_origin` set.
    fn default() -> Self {
        Self {
            use_origin: true,
            get_origin: false,
            stick_x: 128,
            stick_y: 128,
            analog: AnalogState {
                substick_x: 128,
                substick_y: 128,
                ..AnalogState::default()
            },
        }
    }
}

impl OriginRecord {
    /// Origin response: live buttons with the origin flags, then the stored
    /// stick, substick, triggers and analog buttons.
    ///
    /// # Errors
    ///
    /// Only if the button layout table is inconsistent.
    pub fn to_bytes(&self, buttons: ButtonSet<GcButton>) -> JoybusResult<[u8; ORIGIN_RESPONSE_LEN]> {
        let [hi, lo] = button_word(buttons, self)?.to_be_bytes();
        let a = &self.analog;
        Ok([
            hi,
            lo,
            self.stick_x,
            self.stick_y,
            a.substick_x,
            a.substick_y,
            a.trigger_l,
            a.trigger_r,
            a.analog_a,
            a.analog_b,
        ])
    }
}

/// Pack pressed buttons and the origin flags into the 16-bit button word.
///
/// # Errors
///
/// Only if the button layout table is inconsistent.
pub fn button_word(buttons: ButtonSet<GcButton>, origin: &OriginRecord) -> JoybusResult<u16> {
    let mut buf = [0u8; BUTTON_WORD_LEN];
    let mut writer = BitWriter::new(&mut buf);
    writer.put_flag(&GET_ORIGIN_FIELD, origin.get_origin)?;
    writer.put_flag(&USE_ORIGIN_FIELD, origin.use_origin)?;
    for (button, spec) in &GC_BUTTON_FIELDS {
        writer.put_flag(spec, buttons.contains(*button))?;
    }
    Ok(u16::from_be_bytes(buf))
}
