//! Rumble cartridge classification.
//!
//! | Halfword 0x59 | Probe                         | Kind               |
//! |---------------|-------------------------------|--------------------|
//! | `0x0059`      | halfword 0xFFFFFF == `!0x0002`| DS rumble, refresh |
//! | `0x0059`      | halfword 0xFFFFFF == `!0x0101`| DS rumble, slide   |
//! | `0x0096`      | game code letter `R` or `V`   | GPIO cartridge     |
//! | `0x0096`      | game code letter `G`          | EZ-Flash Omega DE  |
//! | anything else |                               | none               |
//!
//! `0x0096` is the fixed byte of a GBA cartridge header; `0x0059` is what DS
//! slot accessories present at the same address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Header fixed-value halfword (bytes 0xB2..0xB4).
pub const VERSION_HALFWORD: u32 = 0x59;

/// First two game-code letters (bytes 0xAC..0xAE).
pub const GAME_CODE_HALFWORD: u32 = 0x56;

/// Last halfword of the 32 MiB cartridge space.
pub const DS_SENTINEL_HALFWORD: u32 = 0xFF_FFFF;

pub const DS_REFRESH_SENTINEL: u16 = !0x0002;
pub const DS_SLIDE_SENTINEL: u16 = !0x0101;

const DS_ACCESSORY_MARKER: u16 = 0x0059;
const GBA_HEADER_MARKER: u16 = 0x0096;

/// Read-only view of the cartridge address space, in halfwords.
pub trait CartridgeBus {
    fn read_halfword(&self, index: u32) -> u16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RumbleKind {
    #[default]
    None,
    /// GPIO rumble on the cartridge (WarioWare: Twisted!, Drill Dozer).
    GpioCartridge,
    /// DS rumble pak driven by a repeating refresh DMA.
    DsRumbleRefresh,
    /// DS rumble pak driven by writes to the slot.
    DsRumbleSlide,
    /// EZ-Flash Omega Definitive Edition GPIO bit.
    EzFlashOmegaDe,
}

impl RumbleKind {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::GpioCartridge,
        Self::DsRumbleRefresh,
        Self::DsRumbleSlide,
        Self::EzFlashOmegaDe,
    ];

    pub fn is_present(self) -> bool {
        self != Self::None
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::GpioCartridge => "gpio-cartridge",
            Self::DsRumbleRefresh => "ds-rumble-refresh",
            Self::DsRumbleSlide => "ds-rumble-slide",
            Self::EzFlashOmegaDe => "ez-flash-omega-de",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::GpioCartridge => "gpio",
            Self::DsRumbleRefresh => "ds-refresh",
            Self::DsRumbleSlide => "ds-slide",
            Self::EzFlashOmegaDe => "ez-omega",
        }
    }
}

impl fmt::Display for RumbleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rumble kind: {0}")]
pub struct ParseRumbleKindError(pub String);

impl FromStr for RumbleKind {
    type Err = ParseRumbleKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower || kind.short_name() == lower)
            .ok_or_else(|| ParseRumbleKindError(s.to_string()))
    }
}

/// Decide the rumble mechanism. Reads at most three halfwords.
pub fn classify(bus: &impl CartridgeBus) -> RumbleKind {
    let version = bus.read_halfword(VERSION_HALFWORD);
    let kind = match version {
        DS_ACCESSORY_MARKER => match bus.read_halfword(DS_SENTINEL_HALFWORD) {
            DS_REFRESH_SENTINEL => RumbleKind::DsRumbleRefresh,
            DS_SLIDE_SENTINEL => RumbleKind::DsRumbleSlide,
            _ => RumbleKind::None,
        },
        GBA_HEADER_MARKER => match (bus.read_halfword(GAME_CODE_HALFWORD) & 0xFF) as u8 {
            b'R' | b'V' => RumbleKind::GpioCartridge,
            b'G' => RumbleKind::EzFlashOmegaDe,
            _ => RumbleKind::None,
        },
        _ => RumbleKind::None,
    };
    debug!("Cartridge marker 0x{:04X} classified as {}", version, kind);
    kind
}

/// The three halfwords [`classify`] probes, held in memory. Every other
/// address reads as `0xFFFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSnapshot {
    pub version: u16,
    pub game_code: u16,
    pub ds_sentinel: u16,
}

impl Default for HeaderSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl HeaderSnapshot {
    pub const fn new(version: u16, game_code: u16, ds_sentinel: u16) -> Self {
        Self {
            version,
            game_code,
            ds_sentinel,
        }
    }

    /// Empty slot.
    pub const fn empty() -> Self {
        Self::new(0xFFFF, 0xFFFF, 0xFFFF)
    }

    /// A header that classifies as `kind`.
    pub const fn for_kind(kind: RumbleKind) -> Self {
        match kind {
            RumbleKind::None => Self::empty(),
            RumbleKind::GpioCartridge => Self::new(GBA_HEADER_MARKER, u16::from_le_bytes([b'R', b'Z']), 0xFFFF),
            RumbleKind::EzFlashOmegaDe => Self::new(GBA_HEADER_MARKER, u16::from_le_bytes([b'G', b'B']), 0xFFFF),
            RumbleKind::DsRumbleRefresh => Self::new(DS_ACCESSORY_MARKER, 0xFFFF, DS_REFRESH_SENTINEL),
            RumbleKind::DsRumbleSlide => Self::new(DS_ACCESSORY_MARKER, 0xFFFF, DS_SLIDE_SENTINEL),
        }
    }

    /// Probe a ROM image (little-endian halfwords); bytes past the end read
    /// as `0xFF`.
    pub fn from_rom_image(rom: &[u8]) -> Self {
        let halfword = |index: u32| -> u16 {
            let offset = usize::try_from(index).unwrap_or(usize::MAX).saturating_mul(2);
            let lo = rom.get(offset).copied().unwrap_or(0xFF);
            let hi = rom.get(offset.saturating_add(1)).copied().unwrap_or(0xFF);
            u16::from_le_bytes([lo, hi])
        };
        Self::new(
            halfword(VERSION_HALFWORD),
            halfword(GAME_CODE_HALFWORD),
            halfword(DS_SENTINEL_HALFWORD),
        )
    }
}

impl CartridgeBus for HeaderSnapshot {
    fn read_halfword(&self, index: u32) -> u16 {
        match index {
            VERSION_HALFWORD => self.version,
            GAME_CODE_HALFWORD => self.game_code,
            DS_SENTINEL_HALFWORD => self.ds_sentinel,
            _ => 0xFFFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_gpio_cartridges() {
        for letter in [b'R', b'V'] {
            let header = HeaderSnapshot::new(0x0096, u16::from(letter), 0);
            assert_eq!(classify(&header), RumbleKind::GpioCartridge);
        }
    }

    #[test]
    fn test_classify_uses_low_byte_of_game_code() {
        let header = HeaderSnapshot::new(0x0096, u16::from_le_bytes([b'G', b'R']), 0);
        assert_eq!(classify(&header), RumbleKind::EzFlashOmegaDe);
        let header = HeaderSnapshot::new(0x0096, u16::from_le_bytes([b'A', b'R']), 0);
        assert_eq!(classify(&header), RumbleKind::None);
    }

    #[test]
    fn test_classify_ds_accessories() {
        assert_eq!(
            classify(&HeaderSnapshot::new(0x0059, 0, 0xFFFD)),
            RumbleKind::DsRumbleRefresh
        );
        assert_eq!(
            classify(&HeaderSnapshot::new(0x0059, 0, 0xFEFE)),
            RumbleKind::DsRumbleSlide
        );
        assert_eq!(classify(&HeaderSnapshot::new(0x0059, 0, 0xFFFF)), RumbleKind::None);
    }

    #[test]
    fn test_classify_unknown_marker() {
        assert_eq!(classify(&HeaderSnapshot::empty()), RumbleKind::None);
        assert_eq!(classify(&HeaderSnapshot::new(0x0000, u16::from(b'R'), 0xFFFD)), RumbleKind::None);
    }

    #[test]
    fn test_for_kind_round_trips() {
        for kind in RumbleKind::ALL {
            assert_eq!(classify(&HeaderSnapshot::for_kind(kind)), kind);
        }
    }

    #[test]
    fn test_from_rom_image() {
        let mut rom = vec![0u8; 0xC0];
        rom[0xAC] = b'V';
        rom[0xAD] = b'4';
        rom[0xB2] = 0x96;
        let header = HeaderSnapshot::from_rom_image(&rom);
        assert_eq!(header.version, 0x0096);
        assert_eq!(header.ds_sentinel, 0xFFFF);
        assert_eq!(classify(&header), RumbleKind::GpioCartridge);
    }

    #[test]
    fn test_parse_kind() -> Result<(), ParseRumbleKindError> {
        assert_eq!("gpio".parse::<RumbleKind>()?, RumbleKind::GpioCartridge);
        assert_eq!("DS-Rumble-Slide".parse::<RumbleKind>()?, RumbleKind::DsRumbleSlide);
        assert!("vibrator".parse::<RumbleKind>().is_err());
        Ok(())
    }

    #[test]
    fn test_serde_names_match_display() -> Result<(), serde_json::Error> {
        for kind in RumbleKind::ALL {
            assert_eq!(serde_json::to_string(&kind)?, format!("\"{kind}\""));
        }
        Ok(())
    }
}
