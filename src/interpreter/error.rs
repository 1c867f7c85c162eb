use thiserror::Error;

/// Everything that can stop the machine. All of these are fatal; the driver
/// halts on the first one it sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("program image is {size} bytes, at most {max} bytes fit")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("cannot fetch an instruction at {pc:#05x}")]
    FetchOutOfBounds { pc: u16 },

    #[error("{kind} at {pc:#05x} (opcode {opcode:04X})")]
    Fault {
        pc: u16,
        opcode: u16,
        kind: FaultKind,
    },
}

/// Why a single instruction failed. The engine reports these and the caller
/// attaches the program counter and raw opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("invalid opcode")]
    InvalidOpcode,

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("no font glyph for value {0:#04x}")]
    InvalidGlyph(u8),

    #[error("memory access at {0:#06x} is out of bounds")]
    AddressOutOfBounds(usize),
}

impl FaultKind {
    pub fn at(self, pc: u16, opcode: u16) -> Error {
        Error::Fault { pc, opcode, kind: self }
    }
}
