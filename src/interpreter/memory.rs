use std::ops::Range;

use super::error::{Error, FaultKind};
use super::state::PROGRAM_START;

pub const MEMORY_SIZE: usize = 4096;

/// Largest program image that fits above the reserved area.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const FONT_ADDR: u16 = 0x000;
pub const GLYPH_SIZE: u16 = 5;

/// Hex digits 0-F, five rows each, left-aligned in the high nibble.
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4K address space. The font sits at the bottom, programs at 0x200.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        let mut bytes = Box::new([0; MEMORY_SIZE]);
        let font = FONT_ADDR as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }
}

impl Memory {
    /// Fresh address space with `program` copied in at 0x200.
    pub fn with_program(program: &[u8]) -> Result<Memory, Error> {
        let mut memory = Memory::default();
        memory.load_program(program)?;
        Ok(memory)
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Reads the big-endian instruction word at `pc`.
    pub fn fetch(&self, pc: u16) -> Result<u16, Error> {
        let at = pc as usize;
        if at + 1 >= MEMORY_SIZE {
            return Err(Error::FetchOutOfBounds { pc });
        }
        Ok(u16::from_be_bytes([self.bytes[at], self.bytes[at + 1]]))
    }

    fn range(&self, addr: u16, len: usize) -> Result<Range<usize>, FaultKind> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            let last = if len == 0 { start } else { end - 1 };
            return Err(FaultKind::AddressOutOfBounds(last));
        }
        Ok(start..end)
    }

    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], FaultKind> {
        let range = self.range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), FaultKind> {
        let range = self.range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Address of the glyph for hex digit `digit`.
    pub fn glyph_addr(digit: u8) -> Result<u16, FaultKind> {
        if digit > 0xF {
            return Err(FaultKind::InvalidGlyph(digit));
        }
        Ok(FONT_ADDR + GLYPH_SIZE * digit as u16)
    }
}
