//! A CHIP-8 virtual machine: an opcode decoder and execution engine over a
//! 4K address space, 60Hz delay/sound timers, a 64x32 monochrome screen and
//! a 16-key keypad, plus the driver loop that runs them together.

pub mod driver;
pub mod frontend;
pub mod interpreter;
