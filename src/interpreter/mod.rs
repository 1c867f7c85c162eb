use log::debug;
use rand::Rng;

pub mod display;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod state;
pub mod timer;

use display::Framebuffer;
use error::{Error, FaultKind};
use instruction::Instruction;
use keypad::KeySnapshot;
use memory::Memory;
use state::{State, V0, VF};
use timer::Timers;

/// Which register the 8xy6/8xyE shifts read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftMode {
    /// Shift Vx in place, ignoring Vy.
    #[default]
    Modern,
    /// Shift Vy into Vx, as the COSMAC VIP did.
    Legacy,
}

impl ShiftMode {
    fn source(self) -> fn(u8, u8) -> u8 {
        match self {
            ShiftMode::Modern => |vx, _| vx,
            ShiftMode::Legacy => |_, vy| vy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub shift: ShiftMode,
}

/// The execution engine. Owns the address space, the screen and the random
/// source; machine state and timers are threaded through by the caller.
pub struct Interpreter<R> {
    memory: Memory,
    display: Framebuffer,
    rng: R,
    shift_source: fn(u8, u8) -> u8,
}

impl<R: Rng> Interpreter<R> {
    pub fn new(config: Config, memory: Memory, rng: R) -> Interpreter<R> {
        Interpreter {
            memory,
            display: Framebuffer::default(),
            rng,
            shift_source: config.shift.source(),
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Framebuffer {
        &mut self.display
    }

    /// Reads and decodes the instruction at `pc`, returning the raw word too.
    pub fn fetch(&self, pc: u16) -> Result<(u16, Instruction), Error> {
        let opcode = self.memory.fetch(pc)?;
        let inst = Instruction::decode(opcode).map_err(|kind| kind.at(pc, opcode))?;
        Ok((opcode, inst))
    }

    /// Applies `inst` to `s`, returning the next state.
    pub fn execute(
        &mut self,
        inst: Instruction,
        s: State,
        timers: &mut Timers,
        keys: &KeySnapshot,
    ) -> Result<State, FaultKind> {
        use Instruction::*;

        let mut s = s;
        let mut skip = false;

        match inst {
            ClearScreen => self.display.clear(),
            Return => {
                s.pc = s.pop()?;
                return Ok(s);
            }
            Sys(_) => {}
            Jump(nnn) => {
                s.pc = nnn;
                return Ok(s);
            }
            Call(nnn) => {
                s.push(s.pc.wrapping_add(2))?;
                s.pc = nnn;
                return Ok(s);
            }
            SkipEqImm(x, kk) => skip = s.get(x) == kk,
            SkipNeImm(x, kk) => skip = s.get(x) != kk,
            SkipEqReg(x, y) => skip = s.get(x) == s.get(y),
            SkipNeReg(x, y) => skip = s.get(x) != s.get(y),
            LoadImm(x, kk) => s.set(x, kk),
            AddImm(x, kk) => s.set(x, s.get(x).wrapping_add(kk)),
            Move(x, y) => s.set(x, s.get(y)),
            Or(x, y) => s.set(x, s.get(x) | s.get(y)),
            And(x, y) => s.set(x, s.get(x) & s.get(y)),
            Xor(x, y) => s.set(x, s.get(x) ^ s.get(y)),
            AddCarry(x, y) => {
                let (sum, carry) = s.get(x).overflowing_add(s.get(y));
                s.set(x, sum);
                s.set(VF, carry as u8);
            }
            Sub(x, y) => {
                let (vx, vy) = (s.get(x), s.get(y));
                s.set(x, vx.wrapping_sub(vy));
                s.set(VF, (vx > vy) as u8);
            }
            SubReverse(x, y) => {
                let (vx, vy) = (s.get(x), s.get(y));
                s.set(x, vy.wrapping_sub(vx));
                s.set(VF, (vy > vx) as u8);
            }
            ShiftRight(x, y) => {
                let src = (self.shift_source)(s.get(x), s.get(y));
                s.set(x, src >> 1);
                s.set(VF, src & 0x1);
            }
            ShiftLeft(x, y) => {
                let src = (self.shift_source)(s.get(x), s.get(y));
                s.set(x, src << 1);
                s.set(VF, src >> 7);
            }
            LoadIndex(nnn) => s.i = nnn,
            JumpOffset(nnn) => {
                s.pc = nnn + s.get(V0) as u16;
                return Ok(s);
            }
            Random(x, kk) => s.set(x, self.rng.gen::<u8>() & kk),
            Draw(x, y, n) => {
                let rows = self.memory.read(s.i, n as usize)?;
                let collision =
                    self.display
                        .draw_sprite(s.get(x) as usize, s.get(y) as usize, rows);
                s.set(VF, collision as u8);
            }
            SkipPressed(x) => skip = keys.is_down(s.get(x)),
            SkipNotPressed(x) => skip = !keys.is_down(s.get(x)),
            ReadDelay(x) => s.set(x, timers.delay),
            WaitKey(x) => match keys.pressed {
                Some(key) => {
                    debug!("KEY {:x} -> {}", key, x);
                    s.set(x, key);
                }
                // stay on this instruction; the driver retries next iteration
                None => return Ok(s),
            },
            SetDelay(x) => timers.delay = s.get(x),
            SetSound(x) => timers.sound = s.get(x),
            AddIndex(x) => s.i = s.i.wrapping_add(s.get(x) as u16),
            LoadGlyph(x) => s.i = Memory::glyph_addr(s.get(x))?,
            StoreBcd(x) => {
                let val = s.get(x);
                self.memory.write(s.i, &[val / 100, val / 10 % 10, val % 10])?;
            }
            StoreRegisters(x) => {
                self.memory.write(s.i, &s.v[..=x.index()])?;
            }
            LoadRegisters(x) => {
                let n = x.index() + 1;
                let bytes = self.memory.read(s.i, n)?;
                s.v[..n].copy_from_slice(bytes);
            }
        }

        Ok(s.advance(skip))
    }
}
