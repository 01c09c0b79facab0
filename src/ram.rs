use log::trace;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::bus::Bus;
use crate::consts::RAM_SIZE;
use crate::error::CoreError;

/// Flat 64K of memory. Save states of any other size are rejected.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>")]
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    pub fn new() -> Ram {
        Ram {
            data: vec![0; RAM_SIZE],
        }
    }

    pub fn get(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    pub fn set(&mut self, addr: u16, data: u8) {
        self.data[addr as usize] = data;
    }

    pub fn fill(&mut self, v: u8) {
        self.data.fill(v);
    }

    /// Loads `buf` at `dest`, wrapping past 0xFFFF.
    pub fn copy(&mut self, dest: u16, buf: &[u8]) {
        trace!("Copy {} bytes to 0x{:04x}", buf.len(), dest);
        for (i, v) in buf.iter().enumerate() {
            self.data[dest.wrapping_add(i as u16) as usize] = *v;
        }
    }

    pub fn set_u16(&mut self, addr: u16, data: u16) {
        self.set(addr, data as u8);
        self.set(addr.wrapping_add(1), (data >> 8) as u8);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Ram {
    fn default() -> Self {
        Ram::new()
    }
}

impl TryFrom<Vec<u8>> for Ram {
    type Error = CoreError;

    fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
        if data.len() != RAM_SIZE {
            return Err(CoreError::SaveState(format!("ram is {} bytes, expected {}", data.len(), RAM_SIZE)));
        }
        Ok(Ram { data })
    }
}

impl Bus for Ram {
    #[inline]
    fn read(&self, addr: Address) -> u8 {
        self.get(addr.value())
    }

    #[inline]
    fn write(&mut self, addr: Address, data: u8) {
        self.set(addr.value(), data);
    }
}
