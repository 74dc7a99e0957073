static FIRST_FOUR_BITS: u16 = 0xF000;
static SECOND_FOUR_BITS: u16 = 0x0F00;
static THIRD_FOUR_BITS: u16 = 0x00F0;
static LAST_FOUR_BITS: u16 = 0x000F;
static LAST_EIGHT_BITS: u16 = 0x00FF;
static LAST_TWELVE_BITS: u16 = 0x0FFF;

/// Operand fields of a raw opcode.
pub trait OpCode {
    /// top nibble, selects the instruction family
    fn family(&self) -> u8;

    /// first register selector
    fn x(&self) -> u8;

    /// second register selector
    fn y(&self) -> u8;

    /// low nibble
    fn n(&self) -> u8;

    /// low byte
    fn kk(&self) -> u8;

    /// 12-bit address
    fn nnn(&self) -> u16;
}

impl OpCode for u16 {
    fn family(&self) -> u8 {
        ((self & FIRST_FOUR_BITS) >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & SECOND_FOUR_BITS) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & THIRD_FOUR_BITS) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & LAST_FOUR_BITS) as u8
    }

    fn kk(&self) -> u8 {
        (self & LAST_EIGHT_BITS) as u8
    }

    fn nnn(&self) -> u16 {
        self & LAST_TWELVE_BITS
    }
}

/// A decoded instruction. Register selectors are 4-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// any opcode without a handler
    Null,
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1nnn
    Jump { nnn: u16 },
    /// 2nnn
    Call { nnn: u16 },
    /// 3xkk
    SkipEqImm { x: u8, kk: u8 },
    /// 4xkk
    SkipNeImm { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    Copy { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubReverse { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex { nnn: u16 },
    /// Bnnn
    JumpOffset { nnn: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyNotPressed { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

/// Decodes an opcode in constant time. The 0x0 and 0xE families are matched
/// on the full low byte, 0x8 on the low nibble and 0xF on the low byte.
/// 5xy0 and 9xy0 ignore their low nibble.
pub fn decode(opcode: u16) -> Instruction {
    let x = opcode.x();
    let y = opcode.y();
    let kk = opcode.kk();
    let nnn = opcode.nnn();

    match opcode.family() {
        0x0 => match opcode {
            0x00E0 => Instruction::ClearDisplay,
            0x00EE => Instruction::Return,
            _ => Instruction::Null,
        },
        0x1 => Instruction::Jump { nnn },
        0x2 => Instruction::Call { nnn },
        0x3 => Instruction::SkipEqImm { x, kk },
        0x4 => Instruction::SkipNeImm { x, kk },
        0x5 => Instruction::SkipEqReg { x, y },
        0x6 => Instruction::LoadImm { x, kk },
        0x7 => Instruction::AddImm { x, kk },
        0x8 => match opcode.n() {
            0x0 => Instruction::Copy { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::AddReg { x, y },
            0x5 => Instruction::Sub { x, y },
            0x6 => Instruction::ShiftRight { x },
            0x7 => Instruction::SubReverse { x, y },
            0xE => Instruction::ShiftLeft { x },
            _ => Instruction::Null,
        },
        0x9 => Instruction::SkipNeReg { x, y },
        0xA => Instruction::LoadIndex { nnn },
        0xB => Instruction::JumpOffset { nnn },
        0xC => Instruction::Random { x, kk },
        0xD => Instruction::Draw { x, y, n: opcode.n() },
        0xE => match kk {
            0x9E => Instruction::SkipKeyPressed { x },
            0xA1 => Instruction::SkipKeyNotPressed { x },
            _ => Instruction::Null,
        },
        0xF => match kk {
            0x07 => Instruction::LoadDelay { x },
            0x0A => Instruction::WaitKey { x },
            0x15 => Instruction::SetDelay { x },
            0x18 => Instruction::SetSound { x },
            0x1E => Instruction::AddIndex { x },
            0x29 => Instruction::LoadGlyph { x },
            0x33 => Instruction::StoreBcd { x },
            0x55 => Instruction::StoreRegisters { x },
            0x65 => Instruction::LoadRegisters { x },
            _ => Instruction::Null,
        },
        _ => unreachable!("family is a single nibble"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let op: u16 = 0xD4A7;
        assert_eq!(op.family(), 0xD);
        assert_eq!(op.x(), 0x4);
        assert_eq!(op.y(), 0xA);
        assert_eq!(op.n(), 0x7);
        assert_eq!(op.kk(), 0xA7);
        assert_eq!(op.nnn(), 0x4A7);
    }

    #[test]
    fn test_decode_every_family() {
        let cases = [
            (0x00E0, Instruction::ClearDisplay),
            (0x00EE, Instruction::Return),
            (0x1ABC, Instruction::Jump { nnn: 0xABC }),
            (0x2ABC, Instruction::Call { nnn: 0xABC }),
            (0x3512, Instruction::SkipEqImm { x: 5, kk: 0x12 }),
            (0x4512, Instruction::SkipNeImm { x: 5, kk: 0x12 }),
            (0x5120, Instruction::SkipEqReg { x: 1, y: 2 }),
            (0x6AFF, Instruction::LoadImm { x: 0xA, kk: 0xFF }),
            (0x7A01, Instruction::AddImm { x: 0xA, kk: 0x01 }),
            (0x8120, Instruction::Copy { x: 1, y: 2 }),
            (0x8121, Instruction::Or { x: 1, y: 2 }),
            (0x8122, Instruction::And { x: 1, y: 2 }),
            (0x8123, Instruction::Xor { x: 1, y: 2 }),
            (0x8124, Instruction::AddReg { x: 1, y: 2 }),
            (0x8125, Instruction::Sub { x: 1, y: 2 }),
            (0x8126, Instruction::ShiftRight { x: 1 }),
            (0x8127, Instruction::SubReverse { x: 1, y: 2 }),
            (0x812E, Instruction::ShiftLeft { x: 1 }),
            (0x9120, Instruction::SkipNeReg { x: 1, y: 2 }),
            (0xA123, Instruction::LoadIndex { nnn: 0x123 }),
            (0xB123, Instruction::JumpOffset { nnn: 0x123 }),
            (0xC30F, Instruction::Random { x: 3, kk: 0x0F }),
            (0xD125, Instruction::Draw { x: 1, y: 2, n: 5 }),
            (0xE39E, Instruction::SkipKeyPressed { x: 3 }),
            (0xE3A1, Instruction::SkipKeyNotPressed { x: 3 }),
            (0xF307, Instruction::LoadDelay { x: 3 }),
            (0xF30A, Instruction::WaitKey { x: 3 }),
            (0xF315, Instruction::SetDelay { x: 3 }),
            (0xF318, Instruction::SetSound { x: 3 }),
            (0xF31E, Instruction::AddIndex { x: 3 }),
            (0xF329, Instruction::LoadGlyph { x: 3 }),
            (0xF333, Instruction::StoreBcd { x: 3 }),
            (0xF355, Instruction::StoreRegisters { x: 3 }),
            (0xF365, Instruction::LoadRegisters { x: 3 }),
        ];
        for (opcode, expected) in cases.iter() {
            assert_eq!(decode(*opcode), *expected, "opcode {:04X}", opcode);
        }
    }

    #[test]
    fn test_unassigned_opcodes_are_null() {
        let unassigned: [u16; 10] = [
            0x0000, 0x0123, 0x01E0, 0x8008, 0x800F, 0xE19F, 0xE0A2, 0xF000, 0xF0FF, 0xF356,
        ];
        for opcode in unassigned.iter() {
            assert_eq!(decode(*opcode), Instruction::Null, "opcode {:04X}", opcode);
        }
    }

    #[test]
    fn test_register_compares_ignore_low_nibble() {
        assert_eq!(decode(0x512F), Instruction::SkipEqReg { x: 1, y: 2 });
        assert_eq!(decode(0x9121), Instruction::SkipNeReg { x: 1, y: 2 });
    }
}
