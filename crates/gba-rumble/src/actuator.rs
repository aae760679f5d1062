//! Motor actuation.

use tracing::{debug, trace};

use crate::classify::RumbleKind;

/// Motor line on the cartridge GPIO port.
pub const RUMBLE_GPIO_BIT: u16 = 1 << 3;

/// Motor bit in the halfword written to a slide-type DS rumble pak.
pub const SLIDE_MOTOR_BIT: u16 = 1 << 8;

/// Register-level access to the rumble hardware.
///
/// Implementations perform the effect immediately; none of these can fail.
pub trait RumbleHal {
    fn set_gpio_direction(&mut self, value: u16);

    fn gpio_data(&self) -> u16;

    fn set_gpio_data(&mut self, value: u16);

    /// Start or stop the repeating DMA that keeps a DS rumble pak's motor
    /// refreshed.
    fn set_refresh_dma(&mut self, running: bool);

    fn write_cartridge(&mut self, index: u32, value: u16);
}

impl<H: RumbleHal + ?Sized> RumbleHal for &mut H {
    fn set_gpio_direction(&mut self, value: u16) {
        (**self).set_gpio_direction(value);
    }

    fn gpio_data(&self) -> u16 {
        (**self).gpio_data()
    }

    fn set_gpio_data(&mut self, value: u16) {
        (**self).set_gpio_data(value);
    }

    fn set_refresh_dma(&mut self, running: bool) {
        (**self).set_refresh_dma(running);
    }

    fn write_cartridge(&mut self, index: u32, value: u16) {
        (**self).write_cartridge(index, value);
    }
}

/// Drives the motor using the strategy chosen at session start.
#[derive(Debug)]
pub struct RumbleController<H> {
    kind: RumbleKind,
    hal: H,
    active: bool,
}

impl<H: RumbleHal> RumbleController<H> {
    pub fn new(kind: RumbleKind, hal: H) -> Self {
        Self {
            kind,
            hal,
            active: false,
        }
    }

    pub fn kind(&self) -> RumbleKind {
        self.kind
    }

    pub fn is_present(&self) -> bool {
        self.kind.is_present()
    }

    /// Last state requested through [`Self::actuate`].
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn into_hal(self) -> H {
        self.hal
    }

    /// Switch the motor. A no-op without rumble hardware.
    pub fn actuate(&mut self, enable: bool) {
        if enable != self.active && self.kind.is_present() {
            debug!("Rumble {} via {}", if enable { "on" } else { "off" }, self.kind);
        }
        self.active = enable;

        match self.kind {
            RumbleKind::None => {}
            RumbleKind::GpioCartridge => {
                self.hal.set_gpio_direction(RUMBLE_GPIO_BIT);
                self.hal
                    .set_gpio_data(if enable { RUMBLE_GPIO_BIT } else { 0 });
            }
            RumbleKind::DsRumbleRefresh => self.hal.set_refresh_dma(enable),
            RumbleKind::DsRumbleSlide => {
                self.hal
                    .write_cartridge(0, if enable { SLIDE_MOTOR_BIT } else { 0 });
            }
            RumbleKind::EzFlashOmegaDe => {
                let data = self.hal.gpio_data();
                let next = if enable {
                    data | RUMBLE_GPIO_BIT
                } else {
                    data & !RUMBLE_GPIO_BIT
                };
                trace!("EZ-Flash GPIO 0x{:04X} -> 0x{:04X}", data, next);
                self.hal.set_gpio_data(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HalEffect, RecordingHal};

    #[test]
    fn test_gpio_sets_direction_then_data() {
        let mut rumble = RumbleController::new(RumbleKind::GpioCartridge, RecordingHal::new());
        rumble.actuate(true);
        rumble.actuate(false);
        assert_eq!(
            rumble.hal().effects(),
            &[
                HalEffect::GpioDirection(0x0008),
                HalEffect::GpioData(0x0008),
                HalEffect::GpioDirection(0x0008),
                HalEffect::GpioData(0x0000),
            ]
        );
    }

    #[test]
    fn test_none_is_noop() {
        let mut rumble = RumbleController::new(RumbleKind::None, RecordingHal::new());
        rumble.actuate(true);
        assert!(rumble.hal().effects().is_empty());
        assert!(rumble.is_active());
        assert!(!rumble.is_present());
    }

    #[test]
    fn test_ds_refresh_toggles_dma() {
        let mut rumble = RumbleController::new(RumbleKind::DsRumbleRefresh, RecordingHal::new());
        rumble.actuate(true);
        assert!(rumble.hal().refresh_dma_running());
        rumble.actuate(false);
        assert!(!rumble.hal().refresh_dma_running());
    }

    #[test]
    fn test_ds_slide_writes_slot() {
        let mut rumble = RumbleController::new(RumbleKind::DsRumbleSlide, RecordingHal::new());
        rumble.actuate(true);
        assert_eq!(
            rumble.hal().effects(),
            &[HalEffect::CartridgeWrite {
                index: 0,
                value: 0x0100
            }]
        );
    }

    #[test]
    fn test_ez_omega_preserves_other_bits() {
        let mut hal = RecordingHal::new();
        hal.set_gpio_data(0x0005);
        hal.clear_effects();
        let mut rumble = RumbleController::new(RumbleKind::EzFlashOmegaDe, hal);
        rumble.actuate(true);
        assert_eq!(rumble.hal().gpio_data(), 0x000D);
        rumble.actuate(false);
        assert_eq!(rumble.hal().gpio_data(), 0x0005);
    }

    #[test]
    fn test_controller_over_borrowed_hal() {
        let mut hal = RecordingHal::new();
        {
            let mut rumble = RumbleController::new(RumbleKind::GpioCartridge, &mut hal);
            rumble.actuate(true);
        }
        assert_eq!(hal.gpio_data(), RUMBLE_GPIO_BIT);
    }
}
