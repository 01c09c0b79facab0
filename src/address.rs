use core::fmt;
use core::ops::Add;
use serde::{Deserialize, Serialize};

use crate::consts::PAGE_MASK;

/// 16-bit location on the bus. All arithmetic wraps modulo 0x10000.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(u16);

impl Address {
    #[inline]
    #[must_use]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Big-endian combination: `from_bytes(0x12, 0x34) == 0x1234`.
    #[inline]
    #[must_use]
    pub const fn from_bytes(high: u8, low: u8) -> Self {
        Self(((high as u16) << 8) | low as u16)
    }

    /// Applies a relative branch operand. Values >= 0x80 are negative.
    #[inline]
    #[must_use]
    pub const fn with_offset(self, offset: u8) -> Self {
        if offset >= 0x80 {
            Self(self.0.wrapping_sub((offset ^ 0xFF) as u16 + 1))
        } else {
            Self(self.0.wrapping_add(offset as u16))
        }
    }

    #[inline]
    #[must_use]
    pub const fn wrapping_add(self, v: u16) -> Self {
        Self(self.0.wrapping_add(v))
    }

    #[inline]
    #[must_use]
    pub const fn wrapping_sub(self, v: u16) -> Self {
        Self(self.0.wrapping_sub(v))
    }

    #[inline]
    #[must_use]
    pub const fn zero_page(low: u8) -> Self {
        Self(low as u16)
    }

    #[inline]
    #[must_use]
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    #[must_use]
    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    #[must_use]
    pub const fn page(self) -> u16 {
        self.0 & PAGE_MASK
    }

    #[inline]
    #[must_use]
    pub const fn crosses_page(self, other: Address) -> bool {
        self.page() != other.page()
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for Address {
    fn from(addr: u16) -> Self {
        Self(addr)
    }
}

impl From<Address> for u16 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl Add<u8> for Address {
    type Output = Address;

    fn add(self, rhs: u8) -> Address {
        self.wrapping_add(rhs as u16)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[must_use]
pub const fn from_bytes(high: u8, low: u8) -> Address {
    Address::from_bytes(high, low)
}

#[must_use]
pub const fn with_offset(base: Address, offset: u8) -> Address {
    base.with_offset(offset)
}
