//! The responder's main loop.
//!
//! Blocks on the bus for a command, samples the keys once, dispatches and
//! answers, forever. A soft reset rebuilds the session in place; the loop
//! only returns when the bus reports it is closed, which never happens on
//! hardware.

use gba_input_maps::KeyInput;
use gba_rumble::{CartridgeBus, RumbleHal};
use joybus_protocol::CommandFrame;
use tracing::{info, trace};

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::session::{Responder, Session};

/// Receive buffer size; longer frames are truncated.
pub const RECEIVE_BUFFER_LEN: usize = 128;

/// Bit-level serial primitive.
pub trait Bus {
    /// Block until a command arrives and return its bit count, stop bit
    /// included. `None` means no more commands will arrive.
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize>;

    /// Clock out `bits` bits from `bytes`, then the stop bit.
    fn send(&mut self, bytes: &[u8], bits: usize);
}

/// Key state sampler.
pub trait InputSource {
    fn snapshot(&mut self) -> KeyInput;
}

impl<F: FnMut() -> KeyInput> InputSource for F {
    fn snapshot(&mut self) -> KeyInput {
        self()
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    SoftReset,
    BusClosed,
}

pub struct PollLoop<B, I, C> {
    config: SessionConfig,
    bus: B,
    input: I,
    cartridge: C,
    last_echo: Option<KeyInput>,
    sessions: u32,
}

impl<B: Bus, I: InputSource, C: CartridgeBus> PollLoop<B, I, C> {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(config: SessionConfig, bus: B, input: I, cartridge: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bus,
            input,
            cartridge,
            last_echo: None,
            sessions: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Sessions started so far.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Serve one session until soft reset or bus close.
    pub fn run_session<H: RumbleHal>(&mut self, session: &mut Session<H>) -> SessionEnd {
        let mut buf = [0u8; RECEIVE_BUFFER_LEN];
        loop {
            let Some(bits) = self.bus.receive(&mut buf) else {
                return SessionEnd::BusClosed;
            };
            let len = bits.div_ceil(8).min(buf.len());
            let bytes = buf.get(..len).unwrap_or(&[]);
            let frame = CommandFrame::new(bytes, bits);

            let input = self.input.snapshot();
            let outcome = session.respond(&frame, input);
            if let Some(response) = outcome.response {
                self.bus.send(response.as_bytes(), response.bits());
            }

            if outcome.soft_reset {
                return SessionEnd::SoftReset;
            }
            self.echo(input);
        }
    }

    /// Serve sessions back to back, rebuilding after every soft reset.
    /// Returns the HAL once the bus closes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a session cannot be built.
    pub fn run<H: RumbleHal>(&mut self, hal: H) -> Result<H, ConfigError> {
        let mut hal = hal;
        loop {
            let mut session = Session::new(&self.config, &self.cartridge, hal)?;
            self.sessions = self.sessions.saturating_add(1);
            self.last_echo = None;
            let end = self.run_session(&mut session);
            hal = session.into_hal();
            match end {
                SessionEnd::SoftReset => info!("Restarting session"),
                SessionEnd::BusClosed => {
                    trace!("Bus closed after {} session(s)", self.sessions);
                    return Ok(hal);
                }
            }
        }
    }

    fn echo(&mut self, input: KeyInput) {
        if !self.config.key_echo || self.last_echo == Some(input) {
            return;
        }
        self.last_echo = Some(input);
        info!("Keys: {}", input);
    }
}
