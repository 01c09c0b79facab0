extern crate alloc;

pub mod address;
pub mod address_type;
pub mod bus;
pub mod consts;
pub mod cpu;
pub mod error;
pub mod flags;
pub mod instruction;
pub mod operand;
pub mod operation;
pub mod ram;

pub use address::Address;
pub use address_type::{AddressType, Cycles};
pub use bus::{Bus, SharedBus, SparseBus};
pub use cpu::{Core, CoreConfig, Execution};
pub use error::{CoreError, Result};
pub use flags::Flags;
pub use instruction::Instruction;
pub use operation::{decode, Decoded, Operation};
pub use ram::Ram;

use log::trace;

pub fn serialize_size(core: &Core) -> Result<usize> {
    Ok(postcard::experimental::serialized_size(core)?)
}

/// Writes a save state of `core` into `data`, returns the bytes used.
pub fn serialize(core: &Core, data: &mut [u8]) -> Result<usize> {
    let used = postcard::to_slice(core, data)?.len();
    trace!("Serialized core, {} bytes", used);
    Ok(used)
}

pub fn deserialize(data: &[u8]) -> Result<Core> {
    let core = postcard::from_bytes::<Core>(data)?;
    trace!("Deserialized core {:?}", core);
    Ok(core)
}

pub const fn info() -> (&'static str, &'static str) {
    ("mos6502", env!("CARGO_PKG_VERSION"))
}
