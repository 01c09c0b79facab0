use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Instruction {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
}

use Instruction::*;

/* Documented NMOS opcodes. */
const OPCODES: [(u8, Instruction); 151] = [
    (0x69, ADC), (0x65, ADC), (0x75, ADC), (0x6D, ADC), (0x7D, ADC), (0x79, ADC), (0x61, ADC), (0x71, ADC),
    (0x29, AND), (0x25, AND), (0x35, AND), (0x2D, AND), (0x3D, AND), (0x39, AND), (0x21, AND), (0x31, AND),
    (0x0A, ASL), (0x06, ASL), (0x16, ASL), (0x0E, ASL), (0x1E, ASL),
    (0x90, BCC), (0xB0, BCS), (0xF0, BEQ), (0x30, BMI), (0xD0, BNE), (0x10, BPL), (0x50, BVC), (0x70, BVS),
    (0x24, BIT), (0x2C, BIT),
    (0x00, BRK),
    (0x18, CLC), (0xD8, CLD), (0x58, CLI), (0xB8, CLV),
    (0xC9, CMP), (0xC5, CMP), (0xD5, CMP), (0xCD, CMP), (0xDD, CMP), (0xD9, CMP), (0xC1, CMP), (0xD1, CMP),
    (0xE0, CPX), (0xE4, CPX), (0xEC, CPX),
    (0xC0, CPY), (0xC4, CPY), (0xCC, CPY),
    (0xC6, DEC), (0xD6, DEC), (0xCE, DEC), (0xDE, DEC),
    (0xCA, DEX), (0x88, DEY),
    (0x49, EOR), (0x45, EOR), (0x55, EOR), (0x4D, EOR), (0x5D, EOR), (0x59, EOR), (0x41, EOR), (0x51, EOR),
    (0xE6, INC), (0xF6, INC), (0xEE, INC), (0xFE, INC),
    (0xE8, INX), (0xC8, INY),
    (0x4C, JMP), (0x6C, JMP),
    (0x20, JSR),
    (0xA9, LDA), (0xA5, LDA), (0xB5, LDA), (0xAD, LDA), (0xBD, LDA), (0xB9, LDA), (0xA1, LDA), (0xB1, LDA),
    (0xA2, LDX), (0xA6, LDX), (0xB6, LDX), (0xAE, LDX), (0xBE, LDX),
    (0xA0, LDY), (0xA4, LDY), (0xB4, LDY), (0xAC, LDY), (0xBC, LDY),
    (0x4A, LSR), (0x46, LSR), (0x56, LSR), (0x4E, LSR), (0x5E, LSR),
    (0xEA, NOP),
    (0x09, ORA), (0x05, ORA), (0x15, ORA), (0x0D, ORA), (0x1D, ORA), (0x19, ORA), (0x01, ORA), (0x11, ORA),
    (0x48, PHA), (0x08, PHP), (0x68, PLA), (0x28, PLP),
    (0x2A, ROL), (0x26, ROL), (0x36, ROL), (0x2E, ROL), (0x3E, ROL),
    (0x6A, ROR), (0x66, ROR), (0x76, ROR), (0x6E, ROR), (0x7E, ROR),
    (0x40, RTI), (0x60, RTS),
    (0xE9, SBC), (0xE5, SBC), (0xF5, SBC), (0xED, SBC), (0xFD, SBC), (0xF9, SBC), (0xE1, SBC), (0xF1, SBC),
    (0x38, SEC), (0xF8, SED), (0x78, SEI),
    (0x85, STA), (0x95, STA), (0x8D, STA), (0x9D, STA), (0x99, STA), (0x81, STA), (0x91, STA),
    (0x86, STX), (0x96, STX), (0x8E, STX),
    (0x84, STY), (0x94, STY), (0x8C, STY),
    (0xAA, TAX), (0xA8, TAY), (0xBA, TSX), (0x8A, TXA), (0x9A, TXS), (0x98, TYA),
];

lazy_static! {
    static ref INSTRUCTIONS: [Option<Instruction>; 256] = {
        let mut table = [None; 256];
        for (code, ir) in OPCODES {
            table[code as usize] = Some(ir);
        }
        table
    };
}

impl Instruction {
    /// `None` for undocumented opcodes.
    #[inline]
    #[must_use]
    pub fn from_opcode(code: u8) -> Option<Instruction> {
        INSTRUCTIONS[code as usize]
    }

    #[must_use]
    pub fn opcodes() -> impl Iterator<Item = u8> {
        OPCODES.iter().map(|(code, _)| *code)
    }

    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(self, BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS)
    }
}
