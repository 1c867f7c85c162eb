use std::fmt;

use log::debug;

use super::error::FaultKind;

/// Where programs are loaded and execution starts.
pub const PROGRAM_START: u16 = 0x200;

pub const STACK_DEPTH: usize = 16;

/// A general purpose register index, always in `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register(u8);

pub const V0: Register = Register(0x0);

/// Carry, borrow, shifted-out bit and sprite collision all land here.
pub const VF: Register = Register(0xF);

impl Register {
    /// Builds a register from the low nibble of `n`.
    pub const fn new(n: u8) -> Register {
        Register(n & 0xF)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// Machine state. Small and `Copy`: every executed instruction produces a new
/// one rather than mutating the old one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub pc: u16,
    pub i: u16,
    pub v: [u8; 16],
    /// Current call depth, `0..=STACK_DEPTH`.
    pub sp: usize,
    pub stack: [u16; STACK_DEPTH],
    pub halted: bool,
}

impl Default for State {
    fn default() -> Self {
        State {
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            sp: 0,
            stack: [0; STACK_DEPTH],
            halted: false,
        }
    }
}

impl State {
    pub fn get(&self, r: Register) -> u8 {
        self.v[r.index()]
    }

    pub fn set(&mut self, r: Register, value: u8) {
        self.v[r.index()] = value;
    }

    pub fn flag(&self) -> u8 {
        self.get(VF)
    }

    pub fn push(&mut self, addr: u16) -> Result<(), FaultKind> {
        if self.sp == STACK_DEPTH {
            return Err(FaultKind::StackOverflow);
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        debug!("PUSH {:03x}, depth {}", addr, self.sp);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, FaultKind> {
        if self.sp == 0 {
            return Err(FaultKind::StackUnderflow);
        }
        self.sp -= 1;
        let addr = self.stack[self.sp];
        debug!("POP {:03x}, depth {}", addr, self.sp);
        Ok(addr)
    }

    /// Moves to the next instruction, or over it when `skip` holds.
    pub fn advance(mut self, skip: bool) -> State {
        self.pc = self.pc.wrapping_add(if skip { 4 } else { 2 });
        self
    }
}
