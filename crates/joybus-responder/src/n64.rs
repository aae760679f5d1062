//! N64 controller personality.
//!
//! Answers identification, status and controller pak commands. The d-pad
//! drives the analog stick at [`N64_STICK_MAGNITUDE`]; the six mappable keys
//! go through the session's key map. A pak in the control region doubles as
//! the rumble switch when rumble hardware was found at session start.

use controller_pak::PakStore;
use gba_input_maps::{ButtonSet, DpadAxes, KeyInput, KeyMap, N64Button, apply};
use gba_rumble::{RumbleController, RumbleHal};
use joybus_protocol::{
    BLOCK_LEN, BitWriter, Command, CommandFrame, FieldSpec, JoybusResult, N64Command, Response,
};
use tracing::{debug, info, trace};

use crate::error::DispatchResult;
use crate::session::{Outcome, Responder};

/// Identification reply: standard controller with a pak inserted.
pub const N64_IDENTITY: [u8; 3] = [0x05, 0x00, 0x01];

/// Stick value for a held d-pad direction.
pub const N64_STICK_MAGNITUDE: i8 = 80;

pub const N64_STATUS_LEN: usize = 4;

/// Wire position of each button, MSB of byte 0 first:
/// `A B Z Start Up Down Left Right | Reset 0 L R C-Up C-Down C-Left C-Right`.
pub const N64_BUTTON_FIELDS: [(N64Button, FieldSpec); 14] = [
    (N64Button::A, FieldSpec::new("a", 0, 1)),
    (N64Button::B, FieldSpec::new("b", 1, 1)),
    (N64Button::Z, FieldSpec::new("z", 2, 1)),
    (N64Button::Start, FieldSpec::new("start", 3, 1)),
    (N64Button::Up, FieldSpec::new("up", 4, 1)),
    (N64Button::Down, FieldSpec::new("down", 5, 1)),
    (N64Button::Left, FieldSpec::new("left", 6, 1)),
    (N64Button::Right, FieldSpec::new("right", 7, 1)),
    (N64Button::L, FieldSpec::new("l", 10, 1)),
    (N64Button::R, FieldSpec::new("r", 11, 1)),
    (N64Button::CUp, FieldSpec::new("c_up", 12, 1)),
    (N64Button::CDown, FieldSpec::new("c_down", 13, 1)),
    (N64Button::CLeft, FieldSpec::new("c_left", 14, 1)),
    (N64Button::CRight, FieldSpec::new("c_right", 15, 1)),
];

pub const N64_STICK_X_FIELD: FieldSpec = FieldSpec::new("stick_x", 16, 8);
pub const N64_STICK_Y_FIELD: FieldSpec = FieldSpec::new("stick_y", 24, 8);

/// Pack a status reply.
///
/// # Errors
///
/// Only if the button layout table is inconsistent.
pub fn pack_n64_status(
    buttons: ButtonSet<N64Button>,
    axes: DpadAxes,
) -> JoybusResult<[u8; N64_STATUS_LEN]> {
    let mut buf = [0u8; N64_STATUS_LEN];
    let mut writer = BitWriter::new(&mut buf);
    for (button, spec) in &N64_BUTTON_FIELDS {
        writer.put_flag(spec, buttons.contains(*button))?;
    }
    let [x] = axes.x.signed(N64_STICK_MAGNITUDE).to_be_bytes();
    let [y] = axes.y.signed(N64_STICK_MAGNITUDE).to_be_bytes();
    writer.put(&N64_STICK_X_FIELD, u32::from(x))?;
    writer.put(&N64_STICK_Y_FIELD, u32::from(y))?;
    Ok(buf)
}

#[derive(Debug)]
pub struct N64Responder<H> {
    keymap: KeyMap,
    pak: PakStore,
    rumble: RumbleController<H>,
}

impl<H: RumbleHal> N64Responder<H> {
    pub fn new(keymap: KeyMap, rumble: RumbleController<H>) -> Self {
        Self {
            keymap,
            pak: PakStore::new(),
            rumble,
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn pak(&self) -> &PakStore {
        &self.pak
    }

    pub fn rumble(&self) -> &RumbleController<H> {
        &self.rumble
    }

    pub fn into_hal(self) -> H {
        self.rumble.into_hal()
    }

    fn status(&self, input: KeyInput) -> DispatchResult<Response> {
        let buttons = apply::<N64Button>(&self.keymap, input);
        let packed = pack_n64_status(buttons, DpadAxes::from_input(input))?;
        Ok(Response::from_slice(&packed)?)
    }

    fn pak_read(&self, frame: &CommandFrame<'_>) -> DispatchResult<Response> {
        let block = self.pak.read(frame.word(1), self.rumble.is_present())?;
        Ok(Response::concat(&block.data, &[block.crc])?)
    }

    fn pak_write(&mut self, frame: &CommandFrame<'_>) -> DispatchResult<Response> {
        let mut data = [0u8; BLOCK_LEN];
        for (dst, src) in data.iter_mut().zip(frame.payload().iter().skip(2)) {
            *dst = *src;
        }
        let write = self
            .pak
            .write(frame.word(1), &data, self.rumble.is_present())?;
        if let Some(motor) = write.motor {
            self.rumble.actuate(motor);
        }
        Ok(Response::from_slice(&[write.crc])?)
    }

    fn dispatch(
        &mut self,
        command: N64Command,
        frame: &CommandFrame<'_>,
        input: KeyInput,
    ) -> DispatchResult<Response> {
        match command {
            N64Command::Info => Ok(Response::from_slice(&N64_IDENTITY)?),
            N64Command::Reset => {
                self.rumble.actuate(false);
                Ok(Response::from_slice(&N64_IDENTITY)?)
            }
            N64Command::Status => self.status(input),
            N64Command::PakRead => self.pak_read(frame),
            N64Command::PakWrite => self.pak_write(frame),
        }
    }
}

impl<H: RumbleHal> Responder for N64Responder<H> {
    fn respond(&mut self, frame: &CommandFrame<'_>, input: KeyInput) -> Outcome {
        if frame.is_runt() {
            return Outcome::idle();
        }

        let command = match frame.decode::<N64Command>() {
            Ok(command) => command,
            Err(e) => {
                debug!("Dropped N64 frame: {}", e);
                return Outcome::idle();
            }
        };
        trace!("N64 {} ({} bits)", command.name(), frame.bits());

        if command == N64Command::Status && input.is_reset_chord() {
            info!("Soft reset chord held, ending N64 session");
            self.rumble.actuate(false);
            return Outcome {
                response: None,
                soft_reset: true,
            };
        }

        match self.dispatch(command, frame, input) {
            Ok(response) => Outcome::reply(response),
            Err(e) => {
                debug!("Dropped N64 {}: {}", command.name(), e);
                Outcome::idle()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_input_maps::GbaKey;
    use gba_rumble::RumbleKind;
    use gba_rumble::mock::RecordingHal;
    use joybus_protocol::{crc8, encode_address, validate_layout};

    const DEFAULT_MAP: KeyMap = KeyMap::new([0, 1, 2, 4, 3, 5]);

    fn responder(kind: RumbleKind) -> N64Responder<RecordingHal> {
        N64Responder::new(DEFAULT_MAP, RumbleController::new(kind, RecordingHal::new()))
    }

    fn send(
        responder: &mut N64Responder<RecordingHal>,
        bytes: &[u8],
        bits: usize,
        input: KeyInput,
    ) -> Option<Vec<u8>> {
        responder
            .respond(&CommandFrame::new(bytes, bits), input)
            .response
            .map(|r| r.as_bytes().to_vec())
    }

    fn write_frame(address: u16, data: &[u8; BLOCK_LEN]) -> Vec<u8> {
        let mut frame = vec![0x03];
        frame.extend_from_slice(&encode_address(address).to_be_bytes());
        frame.extend_from_slice(data);
        frame
    }

    #[test]
    fn test_layout_is_consistent() -> Result<(), Box<dyn std::error::Error>> {
        let mut fields: Vec<FieldSpec> = N64_BUTTON_FIELDS.iter().map(|(_, s)| *s).collect();
        fields.push(N64_STICK_X_FIELD);
        fields.push(N64_STICK_Y_FIELD);
        validate_layout(&fields, N64_STATUS_LEN)?;
        Ok(())
    }

    #[test]
    fn test_info_and_reset_identify() {
        let mut n64 = responder(RumbleKind::None);
        assert_eq!(send(&mut n64, &[0x00], 9, KeyInput::NONE), Some(vec![0x05, 0x00, 0x01]));
        assert_eq!(send(&mut n64, &[0xFF], 9, KeyInput::NONE), Some(vec![0x05, 0x00, 0x01]));
    }

    #[test]
    fn test_info_wrong_length_is_silent() {
        let mut n64 = responder(RumbleKind::None);
        assert_eq!(send(&mut n64, &[0x00, 0x00], 17, KeyInput::NONE), None);
        assert_eq!(send(&mut n64, &[0x42], 9, KeyInput::NONE), None);
    }

    #[test]
    fn test_status_buttons_and_stick() {
        let mut n64 = responder(RumbleKind::None);
        let input = KeyInput::from_keys(&[GbaKey::A, GbaKey::Select, GbaKey::Left, GbaKey::Up]);
        // Select maps to index 4 (L) in the default profile.
        assert_eq!(
            send(&mut n64, &[0x01], 9, input),
            Some(vec![0x80, 0x20, 0xB0, 0x50])
        );
    }

    #[test]
    fn test_status_reset_chord_is_silent() {
        let mut n64 = responder(RumbleKind::GpioCartridge);
        let chord = KeyInput::from_keys(&[GbaKey::A, GbaKey::B, GbaKey::Start, GbaKey::Select]);
        let outcome = n64.respond(&CommandFrame::new(&[0x01], 9), chord);
        assert!(outcome.soft_reset);
        assert!(outcome.response.is_none());
        assert_eq!(n64.rumble().hal().gpio_data(), 0);
    }

    #[test]
    fn test_pak_zero_write_at_origin() {
        let mut n64 = responder(RumbleKind::None);
        let zeros = [0u8; BLOCK_LEN];
        let frame = write_frame(0x0000, &zeros);
        assert_eq!(
            send(&mut n64, &frame, 281, KeyInput::NONE),
            Some(vec![crc8(&zeros)])
        );
        assert_eq!(n64.pak().peek(0x0000), zeros);
    }

    #[test]
    fn test_pak_read_returns_data_and_crc() {
        let mut n64 = responder(RumbleKind::None);
        let data = [0x5A; BLOCK_LEN];
        let frame = write_frame(0x0120, &data);
        let _ = send(&mut n64, &frame, 281, KeyInput::NONE);

        let mut read = vec![0x02];
        read.extend_from_slice(&encode_address(0x0120).to_be_bytes());
        let mut expected = data.to_vec();
        expected.push(crc8(&data));
        assert_eq!(send(&mut n64, &read, 25, KeyInput::NONE), Some(expected));
    }

    #[test]
    fn test_pak_bad_crc_is_silent() {
        let mut n64 = responder(RumbleKind::None);
        let field = encode_address(0x0040) ^ 0x0001;
        let mut frame = vec![0x03];
        frame.extend_from_slice(&field.to_be_bytes());
        frame.extend_from_slice(&[0xAA; BLOCK_LEN]);
        assert_eq!(send(&mut n64, &frame, 281, KeyInput::NONE), None);
        assert_eq!(n64.pak().peek(0x0040), [0u8; BLOCK_LEN]);
    }

    #[test]
    fn test_control_write_switches_gpio_rumble() {
        let mut n64 = responder(RumbleKind::GpioCartridge);
        let mut on = [0u8; BLOCK_LEN];
        on[0] = 0x01;
        let _ = send(&mut n64, &write_frame(0x8000, &on), 281, KeyInput::NONE);
        assert_eq!(n64.rumble().hal().gpio_data(), 0x0008);

        let _ = send(&mut n64, &write_frame(0x8000, &[0u8; BLOCK_LEN]), 281, KeyInput::NONE);
        assert_eq!(n64.rumble().hal().gpio_data(), 0x0000);
    }

    #[test]
    fn test_reset_stops_running_motor() {
        let mut n64 = responder(RumbleKind::GpioCartridge);
        let mut on = [0u8; BLOCK_LEN];
        on[0] = 0x01;
        let _ = send(&mut n64, &write_frame(0x8000, &on), 281, KeyInput::NONE);
        assert!(n64.rumble().is_active());

        assert_eq!(send(&mut n64, &[0xFF], 9, KeyInput::NONE), Some(vec![0x05, 0x00, 0x01]));
        assert!(!n64.rumble().is_active());
        assert_eq!(n64.rumble().hal().gpio_data(), 0x0000);
    }

    #[test]
    fn test_info_leaves_motor_running() {
        let mut n64 = responder(RumbleKind::GpioCartridge);
        let mut on = [0u8; BLOCK_LEN];
        on[0] = 0x01;
        let _ = send(&mut n64, &write_frame(0x8000, &on), 281, KeyInput::NONE);

        assert_eq!(send(&mut n64, &[0x00], 9, KeyInput::NONE), Some(vec![0x05, 0x00, 0x01]));
        assert!(n64.rumble().is_active());
        assert_eq!(n64.rumble().hal().gpio_data(), 0x0008);
    }

    #[test]
    fn test_control_write_without_rumble_stores_only() {
        let mut n64 = responder(RumbleKind::None);
        let _ = send(&mut n64, &write_frame(0x8000, &[0x01; BLOCK_LEN]), 281, KeyInput::NONE);
        assert!(n64.rumble().hal().effects().is_empty());
        assert_eq!(n64.pak().peek(0x8000), [0x01; BLOCK_LEN]);
    }
}
