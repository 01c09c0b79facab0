use core::fmt;
use serde::{Deserialize, Serialize};

/// Cost of an instruction before any runtime penalty.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Cycles {
    pub base: u8,
    /// +1 when the effective address crosses a page.
    pub paged: bool,
    /// +1 when taken, +1 more when the target is on another page.
    pub branch: bool,
}

impl Cycles {
    #[must_use]
    pub const fn new(base: u8, paged: bool, branch: bool) -> Self {
        Self { base, paged, branch }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    Accumulator,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Implied,
    Immediate,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
    Zeropage,
    ZeropageX,
    ZeropageY,
}

impl AddressType {
    pub const ALL: [AddressType; 13] = [
        AddressType::Accumulator,
        AddressType::Absolute,
        AddressType::AbsoluteX,
        AddressType::AbsoluteY,
        AddressType::Implied,
        AddressType::Immediate,
        AddressType::Indirect,
        AddressType::IndexedIndirect,
        AddressType::IndirectIndexed,
        AddressType::Relative,
        AddressType::Zeropage,
        AddressType::ZeropageX,
        AddressType::ZeropageY,
    ];

    #[must_use]
    pub const fn cycles(self) -> Cycles {
        match self {
            AddressType::Accumulator | AddressType::Immediate | AddressType::Implied => Cycles::new(2, false, false),
            AddressType::Relative => Cycles::new(2, false, true),
            AddressType::Zeropage => Cycles::new(3, false, false),
            AddressType::ZeropageX
            | AddressType::ZeropageY
            | AddressType::Absolute
            | AddressType::AbsoluteX => Cycles::new(4, false, false),
            AddressType::AbsoluteY => Cycles::new(4, true, false),
            AddressType::Indirect => Cycles::new(5, false, false),
            AddressType::IndirectIndexed => Cycles::new(5, true, false),
            AddressType::IndexedIndirect => Cycles::new(6, false, false),
        }
    }

    /// Instruction length, opcode included.
    #[must_use]
    pub const fn size(self) -> u8 {
        match self {
            AddressType::Accumulator | AddressType::Implied => 1,
            AddressType::Immediate
            | AddressType::Relative
            | AddressType::Zeropage
            | AddressType::ZeropageX
            | AddressType::ZeropageY
            | AddressType::IndexedIndirect
            | AddressType::IndirectIndexed => 2,
            AddressType::Absolute
            | AddressType::AbsoluteX
            | AddressType::AbsoluteY
            | AddressType::Indirect => 3,
        }
    }
}

impl fmt::Debug for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressType::Accumulator => "A",
            AddressType::Absolute => "abs",
            AddressType::AbsoluteX => "abs,X",
            AddressType::AbsoluteY => "abs,Y",
            AddressType::Implied => "impl",
            AddressType::Immediate => "#",
            AddressType::Indirect => "ind",
            AddressType::IndexedIndirect => "X,ind",
            AddressType::IndirectIndexed => "ind,Y",
            AddressType::Relative => "rel",
            AddressType::Zeropage => "zpg",
            AddressType::ZeropageX => "zpg,X",
            AddressType::ZeropageY => "zpg,Y",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cycles() {
        let expected = [
            (AddressType::Accumulator, 2, false, false),
            (AddressType::Absolute, 4, false, false),
            (AddressType::AbsoluteX, 4, false, false),
            (AddressType::AbsoluteY, 4, true, false),
            (AddressType::Immediate, 2, false, false),
            (AddressType::Implied, 2, false, false),
            (AddressType::Indirect, 5, false, false),
            (AddressType::IndexedIndirect, 6, false, false),
            (AddressType::IndirectIndexed, 5, true, false),
            (AddressType::Relative, 2, false, true),
            (AddressType::Zeropage, 3, false, false),
            (AddressType::ZeropageX, 4, false, false),
            (AddressType::ZeropageY, 4, false, false),
        ];
        for (t, base, paged, branch) in expected {
            assert_eq!(t.cycles(), Cycles::new(base, paged, branch), "{:?}", t);
        }
        assert_eq!(expected.len(), AddressType::ALL.len());
    }

    #[test]
    fn sizes() {
        for t in AddressType::ALL {
            let size = t.size();
            assert!((1..=3).contains(&size), "{:?}", t);
        }
        assert_eq!(AddressType::Indirect.size(), 3);
        assert_eq!(AddressType::Relative.size(), 2);
        assert_eq!(AddressType::Accumulator.size(), 1);
    }
}
