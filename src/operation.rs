use core::fmt;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::address_type::{AddressType, Cycles};
use crate::error::{CoreError, Result};
use crate::instruction::Instruction;

/// One fetched instruction: opcode plus up to two operand bytes in fetch
/// order (`byte1` is the low byte of 16-bit operands).
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Operation {
    pub code: u8,
    pub byte1: u8,
    pub byte2: u8,
}

/// Everything the opcode alone determines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Decoded {
    pub instruction: Instruction,
    pub mode: AddressType,
    pub size: u8,
    pub cycles: Cycles,
}

impl Operation {
    #[must_use]
    pub const fn new(code: u8, byte1: u8, byte2: u8) -> Self {
        Self { code, byte1, byte2 }
    }

    /// 16-bit operand.
    #[must_use]
    pub const fn full(&self) -> Address {
        Address::from_bytes(self.byte2, self.byte1)
    }

    pub fn addressing(&self) -> Result<AddressType> {
        let c = self.code;
        let t = match c {
            0x6C => AddressType::Indirect,
            0xBE => AddressType::AbsoluteY,
            0x96 | 0xB6 => AddressType::ZeropageY,
            _ if c & 0x9F == 0x0A => AddressType::Accumulator,
            _ if c & 0x1C == 0x0C || c == 0x20 => AddressType::Absolute,
            _ if c & 0x1C == 0x1C => AddressType::AbsoluteX,
            _ if c & 0x1F == 0x19 => AddressType::AbsoluteY,
            _ if c & 0x1F == 0x09 || c & 0x9D == 0x80 => AddressType::Immediate,
            _ if c & 0x0F == 0x08 || c & 0x8F == 0x8A || c & 0x9F == 0x00 => AddressType::Implied,
            _ if c & 0x1F == 0x01 => AddressType::IndexedIndirect,
            _ if c & 0x1F == 0x11 => AddressType::IndirectIndexed,
            _ if c & 0x1F == 0x10 => AddressType::Relative,
            _ if c & 0x1C == 0x04 => AddressType::Zeropage,
            _ if c & 0x1C == 0x14 => AddressType::ZeropageX,
            _ => return Err(CoreError::unknown_opcode(c)),
        };
        Ok(t)
    }

    pub fn instruction(&self) -> Result<Instruction> {
        Instruction::from_opcode(self.code).ok_or(CoreError::unknown_opcode(self.code))
    }

    pub fn size(&self) -> Result<u8> {
        Ok(self.addressing()?.size())
    }

    /// Read-modify-write memory ops (x6/xE outside the 0x80-0xBF load/store
    /// block) take two extra cycles, three when indexed absolute. Other
    /// indexed absolute opcodes pay the page penalty.
    fn cycles_by_pattern(&self, c: Cycles) -> Cycles {
        let code = self.code;
        let indexed_abs = code & 0x1C == 0x1C;
        if code & 0xC0 != 0x80 && code & 0x07 == 0x06 {
            let extra = if indexed_abs { 3 } else { 2 };
            Cycles { base: c.base + extra, ..c }
        } else if indexed_abs {
            Cycles { paged: true, ..c }
        } else {
            c
        }
    }

    fn cycle_overrides(&self, c: Cycles) -> Cycles {
        match self.code {
            /* PHP PHA */
            0x08 | 0x48 => Cycles::new(c.base + 1, false, false),
            /* JSR PLP PLA */
            0x20 | 0x28 | 0x68 => Cycles::new(c.base + 2, false, false),
            /* RTI RTS */
            0x40 | 0x60 => Cycles::new(c.base + 4, false, false),
            /* JMP abs */
            0x4C => Cycles::new(3, false, false),
            /* BRK */
            0x00 => Cycles::new(c.base + 5, false, false),
            /* STA abs,X / abs,Y always pay for the index */
            0x9D | 0x99 => Cycles::new(5, false, false),
            /* STA (ind),Y */
            0x91 => Cycles::new(6, false, false),
            _ => c,
        }
    }

    pub fn cycles(&self) -> Result<Cycles> {
        let base = self.addressing()?.cycles();
        Ok(self.cycle_overrides(self.cycles_by_pattern(base)))
    }

    pub fn decode(&self) -> Result<Decoded> {
        let instruction = self.instruction()?;
        let mode = self.addressing()?;
        Ok(Decoded {
            instruction,
            mode,
            size: mode.size(),
            cycles: self.cycle_overrides(self.cycles_by_pattern(mode.cycles())),
        })
    }
}

/// Classifies an opcode without executing it. Operand bytes do not affect
/// the result, they are accepted so a fetched byte stream can be passed as is.
pub fn decode(code: u8, operands: &[u8]) -> Result<Decoded> {
    let op = Operation::new(
        code,
        operands.first().copied().unwrap_or(0),
        operands.get(1).copied().unwrap_or(0),
    );
    op.decode()
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size().unwrap_or(1) {
            3 => write!(f, "{:02X} {:02X} {:02X}", self.code, self.byte1, self.byte2),
            2 => write!(f, "{:02X} {:02X} --", self.code, self.byte1),
            _ => write!(f, "{:02X} -- --", self.code),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Ok(d) => write!(f, "{{ {} {:?} {:?} }}", self, d.instruction, d.mode),
            Err(_) => write!(f, "{{ {} ??? }}", self),
        }
    }
}
