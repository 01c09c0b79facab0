use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Opcode with no addressing mode or no handler. The core stays at the
    /// instruction boundary, the host decides whether to halt or skip it.
    #[error("unknown opcode 0x{opcode:02X}{}", location(.pc))]
    UnknownOpcode { opcode: u8, pc: Option<Address> },

    #[error("save state: {0}")]
    SaveState(String),
}

fn location(pc: &Option<Address>) -> String {
    match pc {
        Some(pc) => format!(" at {}", pc),
        None => String::new(),
    }
}

impl CoreError {
    #[must_use]
    pub fn unknown_opcode(opcode: u8) -> Self {
        CoreError::UnknownOpcode { opcode, pc: None }
    }

    #[must_use]
    pub fn at(self, addr: Address) -> Self {
        match self {
            CoreError::UnknownOpcode { opcode, .. } => CoreError::UnknownOpcode { opcode, pc: Some(addr) },
            e => e,
        }
    }
}

impl From<postcard::Error> for CoreError {
    fn from(err: postcard::Error) -> Self {
        CoreError::SaveState(format!("{}", err))
    }
}

pub type Result<T> = core::result::Result<T, CoreError>;
