//! Recording HAL for tests and host-side simulation.

use crate::actuator::RumbleHal;

/// One register-level effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalEffect {
    GpioDirection(u16),
    GpioData(u16),
    RefreshDma(bool),
    CartridgeWrite { index: u32, value: u16 },
}

/// Keeps the register state and every effect applied to it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHal {
    gpio_direction: u16,
    gpio_data: u16,
    refresh_dma: bool,
    effects: Vec<HalEffect>,
}

impl RecordingHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[HalEffect] {
        &self.effects
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub fn gpio_direction(&self) -> u16 {
        self.gpio_direction
    }

    pub fn refresh_dma_running(&self) -> bool {
        self.refresh_dma
    }
}

impl RumbleHal for RecordingHal {
    fn set_gpio_direction(&mut self, value: u16) {
        self.gpio_direction = value;
        self.effects.push(HalEffect::GpioDirection(value));
    }

    fn gpio_data(&self) -> u16 {
        self.gpio_data
    }

    fn set_gpio_data(&mut self, value: u16) {
        self.gpio_data = value;
        self.effects.push(HalEffect::GpioData(value));
    }

    fn set_refresh_dma(&mut self, running: bool) {
        self.refresh_dma = running;
        self.effects.push(HalEffect::RefreshDma(running));
    }

    fn write_cartridge(&mut self, index: u32, value: u16) {
        self.effects.push(HalEffect::CartridgeWrite { index, value });
    }
}
