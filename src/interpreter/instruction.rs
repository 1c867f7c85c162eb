use std::fmt;

use super::error::FaultKind;
use super::state::Register;

/// A decoded CHIP-8 instruction. Each variant carries only the operands its
/// opcode encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Sys(u16),
    Jump(u16),
    Call(u16),
    SkipEqImm(Register, u8),
    SkipNeImm(Register, u8),
    SkipEqReg(Register, Register),
    LoadImm(Register, u8),
    AddImm(Register, u8),
    Move(Register, Register),
    Or(Register, Register),
    And(Register, Register),
    Xor(Register, Register),
    AddCarry(Register, Register),
    Sub(Register, Register),
    ShiftRight(Register, Register),
    SubReverse(Register, Register),
    ShiftLeft(Register, Register),
    SkipNeReg(Register, Register),
    LoadIndex(u16),
    JumpOffset(u16),
    Random(Register, u8),
    Draw(Register, Register, u8),
    SkipPressed(Register),
    SkipNotPressed(Register),
    ReadDelay(Register),
    WaitKey(Register),
    SetDelay(Register),
    SetSound(Register),
    AddIndex(Register),
    LoadGlyph(Register),
    StoreBcd(Register),
    StoreRegisters(Register),
    LoadRegisters(Register),
}

/// Splits an instruction word into its four nibbles, most significant first.
pub fn nibbles(word: u16) -> (u8, u8, u8, u8) {
    (
        (word >> 12) as u8 & 0xF,
        (word >> 8) as u8 & 0xF,
        (word >> 4) as u8 & 0xF,
        word as u8 & 0xF,
    )
}

fn get_addr(x: u8, y: u8, z: u8) -> u16 {
    ((x as u16) << 8) | ((y as u16) << 4) | (z as u16)
}

fn get_byte(x: u8, y: u8) -> u8 {
    (x << 4) | y
}

impl Instruction {
    /// Decodes one big-endian instruction word. Anything outside the opcode
    /// table is an error, never a fallback instruction.
    pub fn decode(word: u16) -> Result<Instruction, FaultKind> {
        use Instruction::*;

        let (a, b, c, d) = nibbles(word);
        let x = Register::new(b);
        let y = Register::new(c);

        let inst = match (a, b, c, d) {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys(get_addr(b, c, d)),
            (0x1, ..) => Jump(get_addr(b, c, d)),
            (0x2, ..) => Call(get_addr(b, c, d)),
            (0x3, ..) => SkipEqImm(x, get_byte(c, d)),
            (0x4, ..) => SkipNeImm(x, get_byte(c, d)),
            (0x5, _, _, 0x0) => SkipEqReg(x, y),
            (0x6, ..) => LoadImm(x, get_byte(c, d)),
            (0x7, ..) => AddImm(x, get_byte(c, d)),
            (0x8, _, _, 0x0) => Move(x, y),
            (0x8, _, _, 0x1) => Or(x, y),
            (0x8, _, _, 0x2) => And(x, y),
            (0x8, _, _, 0x3) => Xor(x, y),
            (0x8, _, _, 0x4) => AddCarry(x, y),
            (0x8, _, _, 0x5) => Sub(x, y),
            (0x8, _, _, 0x6) => ShiftRight(x, y),
            (0x8, _, _, 0x7) => SubReverse(x, y),
            (0x8, _, _, 0xE) => ShiftLeft(x, y),
            (0x9, _, _, 0x0) => SkipNeReg(x, y),
            (0xA, ..) => LoadIndex(get_addr(b, c, d)),
            (0xB, ..) => JumpOffset(get_addr(b, c, d)),
            (0xC, ..) => Random(x, get_byte(c, d)),
            (0xD, ..) => Draw(x, y, d),
            (0xE, _, 0x9, 0xE) => SkipPressed(x),
            (0xE, _, 0xA, 0x1) => SkipNotPressed(x),
            (0xF, _, 0x0, 0x7) => ReadDelay(x),
            (0xF, _, 0x0, 0xA) => WaitKey(x),
            (0xF, _, 0x1, 0x5) => SetDelay(x),
            (0xF, _, 0x1, 0x8) => SetSound(x),
            (0xF, _, 0x1, 0xE) => AddIndex(x),
            (0xF, _, 0x2, 0x9) => LoadGlyph(x),
            (0xF, _, 0x3, 0x3) => StoreBcd(x),
            (0xF, _, 0x5, 0x5) => StoreRegisters(x),
            (0xF, _, 0x6, 0x5) => LoadRegisters(x),
            _ => return Err(FaultKind::InvalidOpcode),
        };

        Ok(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys(nnn) => write!(f, "SYS {:#05x}", nnn),
            Jump(nnn) => write!(f, "JP {:#05x}", nnn),
            Call(nnn) => write!(f, "CALL {:#05x}", nnn),
            SkipEqImm(x, kk) => write!(f, "SE {}, {:#04x}", x, kk),
            SkipNeImm(x, kk) => write!(f, "SNE {}, {:#04x}", x, kk),
            SkipEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            LoadImm(x, kk) => write!(f, "LD {}, {:#04x}", x, kk),
            AddImm(x, kk) => write!(f, "ADD {}, {:#04x}", x, kk),
            Move(x, y) => write!(f, "LD {}, {}", x, y),
            Or(x, y) => write!(f, "OR {}, {}", x, y),
            And(x, y) => write!(f, "AND {}, {}", x, y),
            Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            AddCarry(x, y) => write!(f, "ADD {}, {}", x, y),
            Sub(x, y) => write!(f, "SUB {}, {}", x, y),
            ShiftRight(x, y) => write!(f, "SHR {}, {}", x, y),
            SubReverse(x, y) => write!(f, "SUBN {}, {}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL {}, {}", x, y),
            SkipNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, {:#05x}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, {:#05x}", nnn),
            Random(x, kk) => write!(f, "RND {}, {:#04x}", x, kk),
            Draw(x, y, n) => write!(f, "DRW {}, {}, {}", x, y, n),
            SkipPressed(x) => write!(f, "SKP {}", x),
            SkipNotPressed(x) => write!(f, "SKNP {}", x),
            ReadDelay(x) => write!(f, "LD {}, DT", x),
            WaitKey(x) => write!(f, "LD {}, K", x),
            SetDelay(x) => write!(f, "LD DT, {}", x),
            SetSound(x) => write!(f, "LD ST, {}", x),
            AddIndex(x) => write!(f, "ADD I, {}", x),
            LoadGlyph(x) => write!(f, "LD F, {}", x),
            StoreBcd(x) => write!(f, "LD B, {}", x),
            StoreRegisters(x) => write!(f, "LD [I], {}", x),
            LoadRegisters(x) => write!(f, "LD {}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    fn r(n: u8) -> Register {
        Register::new(n)
    }

    #[test]
    fn decodes_the_table() {
        let table = [
            (0x00E0, ClearScreen),
            (0x00EE, Return),
            (0x0123, Sys(0x123)),
            (0x1ABC, Jump(0xABC)),
            (0x2300, Call(0x300)),
            (0x3A42, SkipEqImm(r(0xA), 0x42)),
            (0x4A42, SkipNeImm(r(0xA), 0x42)),
            (0x5120, SkipEqReg(r(1), r(2))),
            (0x6005, LoadImm(r(0), 0x05)),
            (0x7003, AddImm(r(0), 0x03)),
            (0x8120, Move(r(1), r(2))),
            (0x8121, Or(r(1), r(2))),
            (0x8122, And(r(1), r(2))),
            (0x8123, Xor(r(1), r(2))),
            (0x8124, AddCarry(r(1), r(2))),
            (0x8125, Sub(r(1), r(2))),
            (0x8126, ShiftRight(r(1), r(2))),
            (0x8127, SubReverse(r(1), r(2))),
            (0x812E, ShiftLeft(r(1), r(2))),
            (0x9120, SkipNeReg(r(1), r(2))),
            (0xA2F0, LoadIndex(0x2F0)),
            (0xB400, JumpOffset(0x400)),
            (0xC30F, Random(r(3), 0x0F)),
            (0xD125, Draw(r(1), r(2), 5)),
            (0xE59E, SkipPressed(r(5))),
            (0xE5A1, SkipNotPressed(r(5))),
            (0xF607, ReadDelay(r(6))),
            (0xF60A, WaitKey(r(6))),
            (0xF615, SetDelay(r(6))),
            (0xF618, SetSound(r(6))),
            (0xF61E, AddIndex(r(6))),
            (0xF629, LoadGlyph(r(6))),
            (0xF633, StoreBcd(r(6))),
            (0xF655, StoreRegisters(r(6))),
            (0xF665, LoadRegisters(r(6))),
        ];
        for (word, expected) in table {
            assert_eq!(Instruction::decode(word), Ok(expected), "{:04X}", word);
            assert_eq!(Instruction::decode(word), Instruction::decode(word));
        }
    }

    #[test]
    fn rejects_words_outside_the_table() {
        let invalid = [
            0x5121, 0x512F, 0x8128, 0x8129, 0x812D, 0x812F, 0x9121, 0xE500, 0xE59F, 0xF600,
            0xF630, 0xF6FF, 0xFFFF,
        ];
        for word in invalid {
            assert_eq!(
                Instruction::decode(word),
                Err(FaultKind::InvalidOpcode),
                "{:04X}",
                word
            );
        }
    }

    #[test]
    fn exhaustive_decode_never_panics() {
        let valid = (0..=u16::MAX)
            .filter(|w| Instruction::decode(*w).is_ok())
            .count();
        // 0x0..0x4, 0x6, 0x7, 0xA..0xD are fully populated (11 * 4096), the rest
        // are sparse: 5xy0, 9xy0 (256 each), 8xy? (9 * 256), Ex?? (2 * 16), Fx?? (9 * 16).
        assert_eq!(valid, 11 * 4096 + 2 * 256 + 9 * 256 + 2 * 16 + 9 * 16);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(LoadImm(r(0), 5).to_string(), "LD V0, 0x05");
        assert_eq!(Call(0x300).to_string(), "CALL 0x300");
        assert_eq!(Draw(r(1), r(2), 5).to_string(), "DRW V1, V2, 5");
        assert_eq!(StoreRegisters(r(3)).to_string(), "LD [I], V3");
        assert_eq!(JumpOffset(0x20).to_string(), "JP V0, 0x020");
        assert_eq!(ReadDelay(r(0xF)).to_string(), "LD VF, DT");
    }
}
