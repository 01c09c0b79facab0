pub const NMIV_ADDR: u16 = 0xFFFA;
pub const RESV_ADDR: u16 = 0xFFFC;
pub const INTV_ADDR: u16 = 0xFFFE;

// "The stack is located in page 1 ($0100-$01FF) and grows downward."
pub const STACK_ADDR: u16 = 0x0100;
pub const STACK_INIT: u8 = 0xFD;

pub const RAM_MAX: u16 = 0xFFFF;
pub const RAM_SIZE: usize = RAM_MAX as usize + 1;

pub const PAGE_MASK: u16 = 0xFF00;
