//! Custom profile builder.
//!
//! Models the on-screen builder as a state machine fed one key snapshot per
//! step; drawing the table is left to the front end. Keys are handled with a
//! fixed priority (Start/A, Select, Up, Down, Right, Left) and only the first
//! match acts.

use std::marker::PhantomData;

use crate::keys::{GbaKey, KeyInput, MAPPABLE_KEYS};
use crate::mapping::{KEYMAP_SLOTS, KeyMap};
use crate::targets::TargetButton;
use crate::validation::validate_keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderEvent {
    /// No handled key was pressed.
    Idle,
    CursorMoved(usize),
    SlotChanged { slot: usize, index: u8 },
    DefaultsRestored,
    /// Validation was requested but the map has duplicates.
    Rejected,
    Finished(KeyMap),
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder<T> {
    slots: [u8; KEYMAP_SLOTS],
    cursor: usize,
    _target: PhantomData<T>,
}

impl<T: TargetButton> ProfileBuilder<T> {
    pub fn new() -> Self {
        Self {
            slots: Self::defaults(),
            cursor: 0,
            _target: PhantomData,
        }
    }

    fn defaults() -> [u8; KEYMAP_SLOTS] {
        T::PRESETS
            .first()
            .map_or([0, 1, 2, 3, 4, 5], |p| p.keymap.slots)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn keymap(&self) -> KeyMap {
        KeyMap::new(self.slots)
    }

    pub fn is_valid(&self) -> bool {
        validate_keymap::<T>(&self.keymap()).is_ok()
    }

    /// `(key, target, selected)` for each slot, for the front end to draw.
    pub fn rows(&self) -> impl Iterator<Item = (GbaKey, Option<T>, bool)> + '_ {
        MAPPABLE_KEYS
            .iter()
            .zip(self.slots.iter())
            .enumerate()
            .map(|(i, (&key, &index))| (key, T::from_index(index), i == self.cursor))
    }

    pub fn handle(&mut self, input: KeyInput) -> BuilderEvent {
        if input.is_pressed(GbaKey::Start) || input.is_pressed(GbaKey::A) {
            return if self.is_valid() {
                BuilderEvent::Finished(self.keymap())
            } else {
                BuilderEvent::Rejected
            };
        }
        if input.is_pressed(GbaKey::Select) {
            self.slots = Self::defaults();
            return BuilderEvent::DefaultsRestored;
        }
        if input.is_pressed(GbaKey::Up) {
            if self.cursor == 0 {
                return BuilderEvent::Idle;
            }
            self.cursor -= 1;
            return BuilderEvent::CursorMoved(self.cursor);
        }
        if input.is_pressed(GbaKey::Down) {
            if self.cursor + 1 >= KEYMAP_SLOTS {
                return BuilderEvent::Idle;
            }
            self.cursor += 1;
            return BuilderEvent::CursorMoved(self.cursor);
        }
        let last = T::COUNT.saturating_sub(1);
        let step: fn(u8, u8) -> u8 = if input.is_pressed(GbaKey::Right) {
            |index: u8, last: u8| if index >= last { 0 } else { index + 1 }
        } else if input.is_pressed(GbaKey::Left) {
            |index: u8, last: u8| if index == 0 || index > last { last } else { index - 1 }
        } else {
            return BuilderEvent::Idle;
        };
        let cursor = self.cursor;
        match self.slots.get_mut(cursor) {
            Some(index) => {
                *index = step(*index, last);
                BuilderEvent::SlotChanged {
                    slot: cursor,
                    index: *index,
                }
            }
            None => BuilderEvent::Idle,
        }
    }
}

impl<T: TargetButton> Default for ProfileBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
