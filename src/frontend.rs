use std::sync::Arc;
use std::time::Duration;

use chip8_base::{Display, Keys};
use rand::Rng;

use crate::driver::Driver;
use crate::interpreter::keypad::Keypad;
use crate::interpreter::timer::{Clock, TICK};

/// Hosts a [`Driver`] inside the `chip8_base` window. The window owns the
/// event loop and calls `step` once per 60Hz frame; each call forwards the key
/// state into the shared keypad and runs the driver flat out until the timers
/// next count down.
pub struct Frontend<R, C> {
    driver: Driver<R, C>,
    keypad: Arc<Keypad>,
}

impl<R: Rng, C: Clock> Frontend<R, C> {
    pub fn new(driver: Driver<R, C>, keypad: Arc<Keypad>) -> Frontend<R, C> {
        Frontend { driver, keypad }
    }

    pub fn driver(&self) -> &Driver<R, C> {
        &self.driver
    }
}

impl<R: Rng, C: Clock> chip8_base::Interpreter for Frontend<R, C> {
    /// Panics once the machine halts: ending the VM thread is how
    /// `chip8_base` learns to close the window.
    fn step(&mut self, keys: &Keys) -> Option<Display> {
        for (key, pressed) in keys.iter().enumerate() {
            self.keypad.set(key as u8, *pressed);
        }

        if let Err(e) = self.driver.run_until_tick() {
            panic!("{}", e);
        }
        if self.driver.is_halted() {
            panic!("machine halted at {:03x}", self.driver.state().pc);
        }

        self.driver.interpreter_mut().display_mut().take_frame()
    }

    fn speed(&self) -> Duration {
        TICK
    }

    // no sound output
    fn buzzer_active(&self) -> bool {
        false
    }
}
