use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Where an instruction reads its operand from and, for read-modify-write
/// and store instructions, where the result goes back to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Operand {
    None,
    Accumulator,
    Memory(Address),
    Immediate(u8),
}

impl Operand {
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        match self {
            Operand::Memory(addr) => Some(*addr),
            _ => None,
        }
    }
}

/// An operand location plus whether indexing moved it to another page.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    #[must_use]
    pub const fn new(operand: Operand) -> Self {
        Self { operand, page_crossed: false }
    }

    #[must_use]
    pub const fn indexed(base: Address, addr: Address) -> Self {
        Self {
            operand: Operand::Memory(addr),
            page_crossed: base.crosses_page(addr),
        }
    }
}
