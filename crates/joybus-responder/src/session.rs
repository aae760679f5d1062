//! Dispatch outcome and the per-session context.

use gba_input_maps::{GcButton, KeyInput, N64Button};
use gba_rumble::{CartridgeBus, RumbleController, RumbleHal, RumbleKind, classify};
use joybus_protocol::{CommandFrame, Response};
use tracing::info;

use crate::config::{SessionConfig, Target};
use crate::error::ConfigError;
use crate::gamecube::GcResponder;
use crate::n64::N64Responder;

/// What one command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// Bytes to clock out, or `None` to stay silent.
    pub response: Option<Response>,
    /// The session ends after this frame.
    pub soft_reset: bool,
}

impl Outcome {
    /// No response, session continues.
    pub const fn idle() -> Self {
        Self {
            response: None,
            soft_reset: false,
        }
    }

    pub const fn reply(response: Response) -> Self {
        Self {
            response: Some(response),
            soft_reset: false,
        }
    }
}

/// A controller personality answering one command at a time.
pub trait Responder {
    /// Handle one received frame with the keys held right now.
    fn respond(&mut self, frame: &CommandFrame<'_>, input: KeyInput) -> Outcome;
}

/// All mutable state of one session. Soft reset drops it and builds a new one.
#[derive(Debug)]
pub enum Session<H> {
    N64(N64Responder<H>),
    GameCube(GcResponder<H>),
}

impl<H: RumbleHal> Session<H> {
    /// Resolve the key map, classify the cartridge and build fresh state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the key map cannot be resolved.
    pub fn new(
        config: &SessionConfig,
        cartridge: &impl CartridgeBus,
        hal: H,
    ) -> Result<Self, ConfigError> {
        let kind = classify(cartridge);
        let session = match config.target {
            Target::N64 => {
                let keymap = config.resolve_keymap::<N64Button>()?;
                info!(
                    "Starting N64 session: profile {}, rumble {}",
                    config.profile_name::<N64Button>(),
                    kind
                );
                Self::N64(N64Responder::new(keymap, RumbleController::new(kind, hal)))
            }
            Target::GameCube => {
                let keymap = config.resolve_keymap::<GcButton>()?;
                info!(
                    "Starting GameCube session: profile {}, rumble {}",
                    config.profile_name::<GcButton>(),
                    kind
                );
                Self::GameCube(GcResponder::new(keymap, RumbleController::new(kind, hal)))
            }
        };
        Ok(session)
    }

    pub fn target(&self) -> Target {
        match self {
            Self::N64(_) => Target::N64,
            Self::GameCube(_) => Target::GameCube,
        }
    }

    pub fn rumble_kind(&self) -> RumbleKind {
        self.rumble().kind()
    }

    pub fn rumble(&self) -> &RumbleController<H> {
        match self {
            Self::N64(responder) => responder.rumble(),
            Self::GameCube(responder) => responder.rumble(),
        }
    }

    pub fn hal(&self) -> &H {
        self.rumble().hal()
    }

    pub fn into_hal(self) -> H {
        match self {
            Self::N64(responder) => responder.into_hal(),
            Self::GameCube(responder) => responder.into_hal(),
        }
    }
}

impl<H: RumbleHal> Responder for Session<H> {
    fn respond(&mut self, frame: &CommandFrame<'_>, input: KeyInput) -> Outcome {
        match self {
            Self::N64(responder) => responder.respond(frame, input),
            Self::GameCube(responder) => responder.respond(frame, input),
        }
    }
}
