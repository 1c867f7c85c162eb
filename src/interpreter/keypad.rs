use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

pub const KEY_COUNT: usize = 16;

/// The hex keypad, shared between the host (which writes it from its own event
/// source) and the driver (which reads it once per iteration). Each key is its
/// own atomic slot, so no locking is needed.
#[derive(Default)]
pub struct Keypad {
    down: [AtomicBool; KEY_COUNT],
    /// Keys that went from released to pressed since the last snapshot.
    presses: AtomicU16,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn set(&self, key: u8, pressed: bool) {
        if pressed {
            self.press(key)
        } else {
            self.release(key)
        }
    }

    /// Keys past 0xF are ignored.
    pub fn press(&self, key: u8) {
        if let Some(slot) = self.down.get(key as usize) {
            if !slot.swap(true, Ordering::AcqRel) {
                self.presses.fetch_or(1 << key, Ordering::AcqRel);
            }
        }
    }

    pub fn release(&self, key: u8) {
        if let Some(slot) = self.down.get(key as usize) {
            slot.store(false, Ordering::Release);
        }
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.down
            .get(key as usize)
            .map_or(false, |slot| slot.load(Ordering::Acquire))
    }

    /// Reads the level of every key and consumes the pending press edges.
    pub fn snapshot(&self) -> KeySnapshot {
        let mut down = [false; KEY_COUNT];
        for (slot, key) in down.iter_mut().zip(self.down.iter()) {
            *slot = key.load(Ordering::Acquire);
        }
        let presses = self.presses.swap(0, Ordering::AcqRel);
        let pressed = (presses != 0).then(|| presses.trailing_zeros() as u8);
        KeySnapshot { down, pressed }
    }
}

/// What the engine sees of the keypad during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub down: [bool; KEY_COUNT],
    /// Lowest key pressed since the previous snapshot, if any.
    pub pressed: Option<u8>,
}

impl KeySnapshot {
    /// Keys past 0xF are never down.
    pub fn is_down(&self, key: u8) -> bool {
        self.down.get(key as usize).copied().unwrap_or(false)
    }
}
