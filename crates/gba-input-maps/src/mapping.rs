//! Key map and the mapping engine.

use serde::{Deserialize, Serialize};

use crate::keys::{GbaKey, KeyInput, MAPPABLE_KEYS};
use crate::targets::{ButtonSet, TargetButton};

pub const KEYMAP_SLOTS: usize = MAPPABLE_KEYS.len();

/// Slot value for a key that drives nothing. Any index past the target's
/// button count behaves the same way; this is the canonical spelling.
pub const UNMAPPED: u8 = u8::MAX;

/// Routes A, B, Start, Select, L and R (in that slot order) onto target
/// button indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyMap {
    pub slots: [u8; KEYMAP_SLOTS],

    /// Also press the target's digital Up/Down while the d-pad is held
    /// vertically.
    #[serde(default)]
    pub mirror_vertical_dpad: bool,
}

impl KeyMap {
    pub const fn new(slots: [u8; KEYMAP_SLOTS]) -> Self {
        Self {
            slots,
            mirror_vertical_dpad: false,
        }
    }

    pub const fn with_vertical_dpad_mirror(mut self) -> Self {
        self.mirror_vertical_dpad = true;
        self
    }

    /// Raw target index for a mappable key; `None` for d-pad keys.
    pub fn slot_for(&self, key: GbaKey) -> Option<u8> {
        let slot = MAPPABLE_KEYS.iter().position(|k| *k == key)?;
        self.slots.get(slot).copied()
    }

    /// Target button a key resolves to, if any.
    pub fn target_for<T: TargetButton>(&self, key: GbaKey) -> Option<T> {
        self.slot_for(key).and_then(T::from_index)
    }
}

/// Target buttons pressed for this input.
///
/// Every pressed mappable key sets its target; unmapped and out-of-range
/// slots contribute nothing.
pub fn apply<T: TargetButton>(map: &KeyMap, input: KeyInput) -> ButtonSet<T> {
    let mut buttons = ButtonSet::empty();
    for (key, &slot) in MAPPABLE_KEYS.iter().zip(map.slots.iter()) {
        if !input.is_pressed(*key) {
            continue;
        }
        if let Some(button) = T::from_index(slot) {
            buttons.insert(button);
        }
    }
    if map.mirror_vertical_dpad {
        if input.is_pressed(GbaKey::Up) {
            buttons.insert(T::DPAD_UP);
        }
        if input.is_pressed(GbaKey::Down) {
            buttons.insert(T::DPAD_DOWN);
        }
    }
    buttons
}

/// One stick axis driven by the d-pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Deflection {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Deflection {
    fn from_pair(positive: bool, negative: bool) -> Self {
        if positive {
            Self::Positive
        } else if negative {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Signed axis value centred on zero.
    pub const fn signed(self, magnitude: i8) -> i8 {
        match self {
            Self::Negative => magnitude.wrapping_neg(),
            Self::Neutral => 0,
            Self::Positive => magnitude,
        }
    }

    /// Unsigned axis value around `center`, wrapping at the byte boundary.
    pub const fn around(self, center: u8, magnitude: u8) -> u8 {
        match self {
            Self::Negative => center.wrapping_sub(magnitude),
            Self::Neutral => center,
            Self::Positive => center.wrapping_add(magnitude),
        }
    }
}

/// D-pad as a digital stick. Right beats Left and Up beats Down when both
/// are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DpadAxes {
    pub x: Deflection,
    pub y: Deflection,
}

impl DpadAxes {
    pub fn from_input(input: KeyInput) -> Self {
        Self {
            x: Deflection::from_pair(input.is_pressed(GbaKey::Right), input.is_pressed(GbaKey::Left)),
            y: Deflection::from_pair(input.is_pressed(GbaKey::Up), input.is_pressed(GbaKey::Down)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{GcButton, N64Button};

    const GC_DEFAULT: KeyMap = KeyMap::new([0, 1, 4, 5, 6, 7]);

    #[test]
    fn apply_sets_mapped_buttons() {
        let input = KeyInput::from_keys(&[GbaKey::Select, GbaKey::R]);
        let buttons = apply::<GcButton>(&GC_DEFAULT, input);
        assert!(buttons.contains(GcButton::Z));
        assert!(buttons.contains(GcButton::R));
        assert_eq!(buttons.len(), 2);
    }

    #[test]
    fn apply_ignores_dpad_without_mirror() {
        let input = KeyInput::from_keys(&[GbaKey::Up, GbaKey::Left]);
        assert!(apply::<GcButton>(&GC_DEFAULT, input).is_empty());
    }

    #[test]
    fn apply_mirrors_vertical_dpad() {
        let map = GC_DEFAULT.with_vertical_dpad_mirror();
        let input = KeyInput::from_keys(&[GbaKey::Down, GbaKey::Right]);
        let buttons = apply::<GcButton>(&map, input);
        assert_eq!(buttons.iter().collect::<Vec<_>>(), vec![GcButton::Down]);
    }

    #[test]
    fn apply_treats_out_of_range_as_unmapped() {
        let map = KeyMap::new([14, UNMAPPED, 2, 3, 4, 5]);
        let input = KeyInput::from_keys(&[GbaKey::A, GbaKey::B, GbaKey::Start]);
        let buttons = apply::<N64Button>(&map, input);
        assert_eq!(buttons.iter().collect::<Vec<_>>(), vec![N64Button::Start]);
    }

    #[test]
    fn target_for_resolves_slots() {
        assert_eq!(GC_DEFAULT.target_for::<GcButton>(GbaKey::Select), Some(GcButton::Z));
        assert_eq!(GC_DEFAULT.target_for::<GcButton>(GbaKey::Up), None);
    }

    #[test]
    fn dpad_priority() {
        let axes = DpadAxes::from_input(KeyInput::from_keys(&[
            GbaKey::Left,
            GbaKey::Right,
            GbaKey::Up,
            GbaKey::Down,
        ]));
        assert_eq!(axes.x, Deflection::Positive);
        assert_eq!(axes.y, Deflection::Positive);

        let axes = DpadAxes::from_input(KeyInput::from_keys(&[GbaKey::Left, GbaKey::Down]));
        assert_eq!(axes.x.signed(80), -80);
        assert_eq!(axes.y.around(128, 100), 28);
    }

    #[test]
    fn deflection_wraps_around_center() {
        assert_eq!(Deflection::Positive.around(200, 100), 44);
        assert_eq!(Deflection::Negative.around(50, 100), 206);
        assert_eq!(Deflection::Neutral.around(128, 100), 128);
    }

    #[test]
    fn keymap_deserializes_without_mirror_flag() -> Result<(), serde_json::Error> {
        let map: KeyMap = serde_json::from_str(r#"{"slots":[0,1,4,5,6,7]}"#)?;
        assert_eq!(map, GC_DEFAULT);
        Ok(())
    }
}
