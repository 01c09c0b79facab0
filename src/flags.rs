use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Processor status register. `U` is not a flag, it only shows up as 1
    /// in pushed copies of the register.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Flags:u8 {
        const N = 0b10000000; // 80
        const V = 0b01000000; // 40
        const U = 0b00100000; // 20
        const B = 0b00010000; // 10
        const D = 0b00001000; // 08
        const I = 0b00000100; // 04
        const Z = 0b00000010; // 02
        const C = 0b00000001; // 01
    }
}

impl Default for Flags {
    fn default() -> Flags {
        Flags::I
    }
}

impl Flags {
    /// Value pushed by PHP and BRK.
    #[must_use]
    pub fn pushed(self) -> u8 {
        (self | Flags::B | Flags::U).bits()
    }

    /// Value restored by PLP and RTI, B and U do not exist in the register.
    #[must_use]
    pub fn pulled(data: u8) -> Flags {
        Flags::from_bits_truncate(data) & !(Flags::B | Flags::U)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pull() {
        let f = Flags::N | Flags::C;
        assert_eq!(f.pushed(), 0xB1);
        assert_eq!(Flags::pulled(0xFF), Flags::all() & !(Flags::B | Flags::U));
        assert_eq!(Flags::pulled(f.pushed()), f);
    }
}
