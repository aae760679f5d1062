//! Key map validation.

use thiserror::Error;

use crate::keys::{GbaKey, MAPPABLE_KEYS};
use crate::mapping::{KeyMap, UNMAPPED};
use crate::targets::TargetButton;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyMapError {
    #[error("{key} maps to unknown {personality} button index {index}")]
    UnknownTarget {
        key: GbaKey,
        index: u8,
        personality: &'static str,
    },

    #[error("{first} and {second} both map to {target}")]
    DuplicateTarget {
        first: GbaKey,
        second: GbaKey,
        target: &'static str,
    },
}

/// Accept a key map only if every slot is [`UNMAPPED`] or a real `T`
/// button and no two slots share a button.
///
/// # Errors
///
/// Returns the first problem found, scanning slots in order.
pub fn validate_keymap<T: TargetButton>(map: &KeyMap) -> Result<(), KeyMapError> {
    for (i, (&key, &index)) in MAPPABLE_KEYS.iter().zip(map.slots.iter()).enumerate() {
        if index == UNMAPPED {
            continue;
        }
        let target = T::from_index(index).ok_or(KeyMapError::UnknownTarget {
            key,
            index,
            personality: T::PERSONALITY,
        })?;
        let mut earlier = MAPPABLE_KEYS.iter().zip(map.slots.iter()).take(i);
        if let Some((&first, _)) = earlier.find(|&(_, &other)| other == index) {
            return Err(KeyMapError::DuplicateTarget {
                first,
                second: key,
                target: target.name(),
            });
        }
    }
    Ok(())
}
