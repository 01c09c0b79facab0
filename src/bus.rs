use alloc::sync::Arc;
use core::fmt;
use hashbrown::HashMap;
use log::trace;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Byte-addressable memory as seen by the CPU.
///
/// Reads are total: every address answers, locations never written read as 0.
/// Writes replace the stored byte. The core holds no reference between
/// ticks, it borrows the bus for the duration of each call.
pub trait Bus {
    fn read(&self, addr: Address) -> u8;
    fn write(&mut self, addr: Address, data: u8);

    /// Little-endian word at `addr`, `addr + 1`.
    fn read_u16(&self, addr: Address) -> Address {
        let lo = self.read(addr);
        let hi = self.read(addr + 1);
        Address::from_bytes(hi, lo)
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read(&self, addr: Address) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: Address, data: u8) {
        (**self).write(addr, data)
    }
}

/// Bus backed by a hash map, only written locations take space.
#[derive(Default, Clone, Serialize, Deserialize)]
pub struct SparseBus {
    data: HashMap<Address, u8>,
}

impl SparseBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, dest: Address, buf: &[u8]) {
        for (i, v) in buf.iter().enumerate() {
            self.data.insert(dest.wrapping_add(i as u16), *v);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<const N: usize> From<[(u16, u8); N]> for SparseBus {
    fn from(cells: [(u16, u8); N]) -> Self {
        Self {
            data: cells.into_iter().map(|(a, v)| (Address::new(a), v)).collect(),
        }
    }
}

impl Bus for SparseBus {
    fn read(&self, addr: Address) -> u8 {
        self.data.get(&addr).copied().unwrap_or(0)
    }

    fn write(&mut self, addr: Address, data: u8) {
        self.data.insert(addr, data);
    }
}

impl fmt::Debug for SparseBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ cells:{} }}", self.data.len())
    }
}

/// Clonable handle to a bus that a debugger or display can inspect between
/// ticks while the core keeps executing against another clone.
pub struct SharedBus<B: Bus> {
    inner: Arc<Mutex<B>>,
}

impl<B: Bus> SharedBus<B> {
    #[must_use]
    pub fn new(bus: B) -> Self {
        Self {
            inner: Arc::new(Mutex::new(bus)),
        }
    }

    pub fn peek(&self, addr: Address) -> u8 {
        let data = self.inner.lock().read(addr);
        trace!("> Shared peek {:?} -> 0x{:02x}", addr, data);
        data
    }

    pub fn poke(&self, addr: Address, data: u8) {
        trace!("> Shared poke {:?} = 0x{:02x}", addr, data);
        self.inner.lock().write(addr, data);
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<B: Bus> Clone for SharedBus<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Bus> Bus for SharedBus<B> {
    fn read(&self, addr: Address) -> u8 {
        self.inner.lock().read(addr)
    }

    fn write(&mut self, addr: Address, data: u8) {
        self.inner.lock().write(addr, data);
    }
}
