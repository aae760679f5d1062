//! GameCube controller personality.

use gba_input_maps::{ButtonSet, DpadAxes, GcButton, KeyInput, KeyMap, apply};
use gba_rumble::{RumbleController, RumbleHal};
use joybus_protocol::{Command, CommandFrame, GcCommand, Response};
use tracing::{debug, info, trace};

use crate::error::DispatchResult;
use crate::gc_status::{FULL_PRESS, GC_STICK_OFFSET, StatusFields, StatusMode, pack_status};
use crate::origin::{AnalogState, OriginRecord, button_word};
use crate::session::{Outcome, Responder};

/// Device type reported with rumble hardware.
pub const GC_TYPE_RUMBLE: [u8; 2] = [0x09, 0x00];

/// Device type reported without it.
pub const GC_TYPE_NO_RUMBLE: [u8; 2] = [0x29, 0x00];

/// Motor request carried in the low 2 bits of a status command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MotorCommand {
    #[default]
    Stop = 0,
    Rumble = 1,
    StopHard = 2,
    Reserved = 3,
}

impl MotorCommand {
    pub const fn from_request(byte: u8) -> Self {
        match byte & 0x03 {
            0 => Self::Stop,
            1 => Self::Rumble,
            2 => Self::StopHard,
            _ => Self::Reserved,
        }
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub struct GcResponder<H> {
    keymap: KeyMap,
    origin: OriginRecord,
    mode: StatusMode,
    motor: MotorCommand,
    rumble: RumbleController<H>,
}

impl<H: RumbleHal> GcResponder<H> {
    pub fn new(keymap: KeyMap, rumble: RumbleController<H>) -> Self {
        Self {
            keymap,
            origin: OriginRecord::default(),
            mode: StatusMode::default(),
            motor: MotorCommand::default(),
            rumble,
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn origin(&self) -> &OriginRecord {
        &self.origin
    }

    pub fn mode(&self) -> StatusMode {
        self.mode
    }

    pub fn motor(&self) -> MotorCommand {
        self.motor
    }

    pub fn rumble(&self) -> &RumbleController<H> {
        &self.rumble
    }

    pub fn into_hal(self) -> H {
        self.rumble.into_hal()
    }

    /// Type bytes followed by
    /// `unknown<<6 | get_origin<<5 | motor<<3 | mode`.
    fn info(&self) -> DispatchResult<Response> {
        let device_type = if self.rumble.is_present() {
            GC_TYPE_RUMBLE
        } else {
            GC_TYPE_NO_RUMBLE
        };
        let status = (u8::from(self.origin.get_origin) << 5)
            | (self.motor.raw() << 3)
            | self.mode.raw();
        Ok(Response::concat(&device_type, &[status])?)
    }

    /// Live values for a status report.
    fn status_fields(&self, buttons: ButtonSet<GcButton>, input: KeyInput) -> DispatchResult<StatusFields> {
        let axes = DpadAxes::from_input(input);
        let origin = &self.origin.analog;
        let held = |button, resting| if buttons.contains(button) { FULL_PRESS } else { resting };
        Ok(StatusFields {
            button_word: button_word(buttons, &self.origin)?,
            stick_x: axes.x.around(self.origin.stick_x, GC_STICK_OFFSET),
            stick_y: axes.y.around(self.origin.stick_y, GC_STICK_OFFSET),
            analog: AnalogState {
                substick_x: origin.substick_x,
                substick_y: origin.substick_y,
                trigger_l: held(GcButton::L, origin.trigger_l),
                trigger_r: held(GcButton::R, origin.trigger_r),
                analog_a: held(GcButton::A, origin.analog_a),
                analog_b: held(GcButton::B, origin.analog_b),
            },
        })
    }

    fn set_request(&mut self, frame: &CommandFrame<'_>) {
        self.mode = StatusMode::from_request(frame.byte(1));
        self.motor = MotorCommand::from_request(frame.byte(2));
    }

    fn dispatch(
        &mut self,
        frame: &CommandFrame<'_>,
        input: KeyInput,
        buttons: ButtonSet<GcButton>,
    ) -> DispatchResult<Response> {
        let command = frame.decode::<GcCommand>()?;
        trace!("GameCube {} ({} bits)", command.name(), frame.bits());
        match command {
            GcCommand::Info | GcCommand::Reset => self.info(),
            GcCommand::Status => {
                self.set_request(frame);
                let packed = pack_status(self.mode, &self.status_fields(buttons, input)?)?;
                Ok(Response::from_slice(&packed)?)
            }
            GcCommand::Origin => Ok(Response::from_slice(&self.origin.to_bytes(buttons)?)?),
            GcCommand::Recalibrate | GcCommand::StatusLong => {
                self.set_request(frame);
                Ok(Response::from_slice(&self.origin.to_bytes(buttons)?)?)
            }
        }
    }
}

impl<H: RumbleHal> Responder for GcResponder<H> {
    /// Every frame that is not a runt is answered if valid, and always
    /// re-drives the motor afterwards. A Reset opcode stops the motor even
    /// when the frame length is wrong.
    fn respond(&mut self, frame: &CommandFrame<'_>, input: KeyInput) -> Outcome {
        if frame.is_runt() {
            return Outcome::idle();
        }

        let soft_reset = input.is_reset_chord();
        let buttons = apply::<GcButton>(&self.keymap, input);

        if frame.opcode() == Some(GcCommand::Reset.opcode()) {
            self.motor = MotorCommand::Stop;
        }

        let response = match self.dispatch(frame, input, buttons) {
            Ok(response) => Some(response),
            Err(e) => {
                debug!("Dropped GameCube frame: {}", e);
                None
            }
        };

        self.rumble
            .actuate(!soft_reset && self.motor == MotorCommand::Rumble);

        if soft_reset {
            info!("Soft reset chord held, ending GameCube session");
        }
        Outcome {
            response,
            soft_reset,
        }
    }
}
