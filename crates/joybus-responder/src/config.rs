//! Session configuration.
//!
//! Everything the start-up menus decide before the first command arrives:
//! which console to emulate, which key map to use, whether to echo keys, and
//! the bus bit timing. Files are YAML or JSON; unknown fields are rejected.

use std::fmt;

use gba_input_maps::{KeyMap, TargetButton, find_preset, validate_keymap};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Profile name selecting [`SessionConfig::keymap`].
pub const CUSTOM_PROFILE: &str = "custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    N64,
    #[default]
    GameCube,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Self::N64 => "n64",
            Self::GameCube => "gamecube",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bus bit period in timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BusTiming(u8);

impl BusTiming {
    pub const MIN: u8 = 50;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 67;

    /// Nanoseconds per timer tick.
    pub const TICK_NS: f64 = 59.59;

    /// # Errors
    ///
    /// Returns [`ConfigError::TimingOutOfRange`] outside 50..=100.
    pub fn new(ticks: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&ticks) {
            Ok(Self(ticks))
        } else {
            Err(ConfigError::TimingOutOfRange(ticks))
        }
    }

    pub fn ticks(self) -> u8 {
        self.0
    }

    /// Counter reload value: the timer counts up from here and overflows
    /// after `ticks` steps.
    pub fn timer_reload(self) -> u16 {
        0u16.wrapping_sub(u16::from(self.0))
    }

    pub fn period_ns(self) -> f64 {
        f64::from(self.0) * Self::TICK_NS
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u8> for BusTiming {
    type Error = ConfigError;

    fn try_from(ticks: u8) -> Result<Self, Self::Error> {
        Self::new(ticks)
    }
}

impl From<BusTiming> for u8 {
    fn from(timing: BusTiming) -> Self {
        timing.0
    }
}

fn default_profile() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub target: Target,

    /// Preset id or display name, or `custom`.
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Only with the custom profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keymap: Option<KeyMap>,

    /// Log every change of the pressed keys.
    #[serde(default)]
    pub key_echo: bool,

    #[serde(default)]
    pub timing: BusTiming,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(Target::default())
    }
}

impl SessionConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            profile: default_profile(),
            keymap: None,
            key_echo: false,
            timing: BusTiming::default(),
        }
    }

    /// Custom profile with an explicit key map.
    pub fn custom(target: Target, keymap: KeyMap) -> Self {
        Self {
            profile: CUSTOM_PROFILE.to_string(),
            keymap: Some(keymap),
            ..Self::new(target)
        }
    }

    pub fn is_custom(&self) -> bool {
        self.profile.eq_ignore_ascii_case(CUSTOM_PROFILE)
    }

    /// The key map this session runs with, for target button set `T`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TargetMismatch`] if `T` is not the configured target
    /// - [`ConfigError::UnknownProfile`] for a name matching no preset
    /// - [`ConfigError::KeymapWithPreset`] for a key map next to a preset
    /// - [`ConfigError::MissingKeymap`] / [`ConfigError::InvalidKeymap`] for
    ///   a custom profile without a usable key map
    pub fn resolve_keymap<T: TargetButton>(&self) -> Result<KeyMap, ConfigError> {
        if self.target.name() != T::PERSONALITY {
            return Err(ConfigError::TargetMismatch {
                configured: self.target.name(),
                requested: T::PERSONALITY,
            });
        }

        if self.is_custom() {
            let keymap = self.keymap.ok_or(ConfigError::MissingKeymap)?;
            validate_keymap::<T>(&keymap)?;
            return Ok(keymap);
        }

        if self.keymap.is_some() {
            return Err(ConfigError::KeymapWithPreset(self.profile.clone()));
        }

        find_preset::<T>(&self.profile)
            .map(|preset| preset.keymap)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: self.profile.clone(),
                target: T::PERSONALITY,
            })
    }

    /// Display name of the selected profile.
    pub fn profile_name<T: TargetButton>(&self) -> &str {
        if self.is_custom() {
            return "Custom profile";
        }
        find_preset::<T>(&self.profile).map_or(self.profile.as_str(), |p| p.name)
    }

    /// Check the whole configuration against its own target.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_keymap`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.target {
            Target::N64 => self.resolve_keymap::<gba_input_maps::N64Button>().map(|_| ()),
            Target::GameCube => self.resolve_keymap::<gba_input_maps::GcButton>().map(|_| ()),
        }
    }
}
