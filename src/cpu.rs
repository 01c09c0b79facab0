use core::fmt;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::address_type::AddressType;
use crate::bus::Bus;
use crate::consts::{INTV_ADDR, STACK_ADDR, STACK_INIT};
use crate::error::Result;
use crate::flags::Flags;
use crate::instruction::Instruction;
use crate::operand::{Operand, Resolved};
use crate::operation::Operation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub initial_sp: u8,
    pub initial_status: Flags,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            initial_sp: STACK_INIT,
            initial_status: Flags::default(),
        }
    }
}

/// What one instruction did, as seen from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Execution {
    pub operation: Operation,
    pub instruction: Instruction,
    pub mode: AddressType,
    /// Effective address, `None` for register and immediate operands and
    /// for branches that were not taken.
    pub address: Option<Address>,
    /// Total cost including page and branch penalties.
    pub cycles: u8,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Core {
    a: u8,
    x: u8,
    y: u8,
    s: u8,
    pc: Address,
    flags: Flags,
    cycles_remaining: u8,
    ticks: u64,
    last_ir_pc: Address,
}

impl Core {
    pub fn new() -> Core {
        Core::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Core {
        Core {
            a: 0,
            x: 0,
            y: 0,
            s: config.initial_sp,
            pc: Address::default(),
            flags: config.initial_status,
            cycles_remaining: 0,
            ticks: 0,
            last_ir_pc: Address::default(),
        }
    }

    /// Advances the core by one clock cycle. A new instruction is only
    /// fetched once the previous one has used up all of its cycles.
    pub fn tick<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            self.ticks += 1;
            return Ok(());
        }

        let pc = self.pc;
        let op = self.fetch(bus);
        trace!("[{}] > fetch {:?}: {:?}", self.ticks, pc, op);

        let execution = match self.execute(bus, op) {
            Ok(e) => e,
            Err(e) => {
                let e = e.at(pc);
                warn!("[{}] {}", self.ticks, e);
                return Err(e);
            }
        };

        self.cycles_remaining = execution.cycles - 1;
        self.last_ir_pc = pc;
        self.ticks += 1;
        Ok(())
    }

    /// Ticks until the current instruction, or the next one if the core is
    /// at an instruction boundary, has completed. Returns the ticks spent.
    pub fn step_instruction<B: Bus>(&mut self, bus: &mut B) -> Result<u64> {
        let start_ticks = self.ticks;
        self.tick(bus)?;
        while self.cycles_remaining > 0 {
            self.tick(bus)?;
        }
        Ok(self.ticks - start_ticks)
    }

    /// Reads the opcode at PC and as many operand bytes as its addressing
    /// mode uses. PC is not moved.
    pub fn fetch<B: Bus>(&self, bus: &B) -> Operation {
        let code = bus.read(self.pc);
        let mut op = Operation::new(code, 0, 0);
        let size = op.size().unwrap_or(1);
        if size > 1 {
            op.byte1 = bus.read(self.pc + 1);
        }
        if size > 2 {
            op.byte2 = bus.read(self.pc + 2);
        }
        op
    }

    /// Runs a fetched operation as if it sat at PC: PC moves past it first,
    /// then the operand is resolved and the handler applied. No pacing.
    pub fn execute<B: Bus>(&mut self, bus: &mut B, op: Operation) -> Result<Execution> {
        let decoded = op.decode()?;
        self.pc = self.pc.wrapping_add(decoded.size as u16);

        let resolved = self.resolve(bus, &op, decoded.mode);
        let mut cycles = decoded.cycles.base;
        if decoded.cycles.paged && resolved.page_crossed {
            cycles += 1;
        }

        let (taken, crossed) = self.dispatch(bus, decoded.instruction, resolved.operand);
        debug_assert_eq!(decoded.cycles.branch, decoded.instruction.is_branch());
        let mut address = resolved.operand.address();
        if decoded.cycles.branch {
            if taken {
                cycles += if crossed { 2 } else { 1 };
            } else {
                address = None;
            }
        }

        Ok(Execution {
            operation: op,
            instruction: decoded.instruction,
            mode: decoded.mode,
            address,
            cycles,
        })
    }

    /// Effective address of `op` against the current registers, `None` for
    /// modes without one.
    pub fn address<B: Bus>(&self, bus: &B, op: &Operation) -> Result<Option<Address>> {
        let mode = op.addressing()?;
        Ok(self.resolve(bus, op, mode).operand.address())
    }

    pub fn value<B: Bus>(&self, bus: &B, op: &Operation) -> Result<u8> {
        let mode = op.addressing()?;
        let resolved = self.resolve(bus, op, mode);
        Ok(self.read_operand(bus, resolved.operand))
    }

    fn resolve<B: Bus>(&self, bus: &B, op: &Operation, mode: AddressType) -> Resolved {
        match mode {
            AddressType::Accumulator => Resolved::new(Operand::Accumulator),
            AddressType::Immediate => Resolved::new(Operand::Immediate(op.byte1)),
            AddressType::Implied => Resolved::new(Operand::None),
            AddressType::Absolute => Resolved::new(Operand::Memory(op.full())),
            AddressType::AbsoluteX => Resolved::indexed(op.full(), op.full() + self.x),
            AddressType::AbsoluteY => Resolved::indexed(op.full(), op.full() + self.y),
            AddressType::Zeropage => Resolved::new(Operand::Memory(Address::zero_page(op.byte1))),
            AddressType::ZeropageX => Resolved::new(Operand::Memory(Address::zero_page(op.byte1.wrapping_add(self.x)))),
            AddressType::ZeropageY => Resolved::new(Operand::Memory(Address::zero_page(op.byte1.wrapping_add(self.y)))),
            AddressType::Indirect => Resolved::new(Operand::Memory(indirect(bus, op.full()))),
            AddressType::IndexedIndirect => {
                let ptr = op.byte1.wrapping_add(self.x);
                Resolved::new(Operand::Memory(zero_page_word(bus, ptr)))
            }
            AddressType::IndirectIndexed => {
                let base = zero_page_word(bus, op.byte1);
                Resolved::indexed(base, base + self.y)
            }
            AddressType::Relative => Resolved::new(Operand::Memory(self.pc.with_offset(op.byte1))),
        }
    }

    fn read_operand<B: Bus>(&self, bus: &B, operand: Operand) -> u8 {
        match operand {
            Operand::None => 0,
            Operand::Accumulator => self.a,
            Operand::Memory(addr) => bus.read(addr),
            Operand::Immediate(v) => v,
        }
    }

    fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand, data: u8) {
        match operand {
            Operand::Accumulator => self.a = data,
            Operand::Memory(addr) => bus.write(addr, data),
            Operand::None | Operand::Immediate(_) => (),
        }
    }

    /// Applies one instruction. Returns (branch taken, target on another page).
    fn dispatch<B: Bus>(&mut self, bus: &mut B, ir: Instruction, operand: Operand) -> (bool, bool) {
        use Instruction::*;

        match ir {
            ADC | SBC | AND | ORA | EOR | BIT | CMP | CPX | CPY | LDA | LDX | LDY => {
                let v = self.read_operand(bus, operand);
                self.read_class(ir, v);
            }

            BCC => return self.branch(!self.flags.contains(Flags::C), operand),
            BCS => return self.branch(self.flags.contains(Flags::C), operand),
            BNE => return self.branch(!self.flags.contains(Flags::Z), operand),
            BEQ => return self.branch(self.flags.contains(Flags::Z), operand),
            BPL => return self.branch(!self.flags.contains(Flags::N), operand),
            BMI => return self.branch(self.flags.contains(Flags::N), operand),
            BVC => return self.branch(!self.flags.contains(Flags::V), operand),
            BVS => return self.branch(self.flags.contains(Flags::V), operand),

            BRK => self.brk(bus),
            JMP => {
                if let Some(target) = operand.address() {
                    self.pc = target;
                }
            }
            JSR => {
                let ret = self.pc.wrapping_sub(1);
                self.push(bus, ret.high());
                self.push(bus, ret.low());
                if let Some(target) = operand.address() {
                    self.pc = target;
                }
            }
            RTS => {
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.pc = Address::from_bytes(hi, lo) + 1;
            }
            RTI => {
                let p = self.pull(bus);
                self.flags = Flags::pulled(p);
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.pc = Address::from_bytes(hi, lo);
            }

            PHA => self.push(bus, self.a),
            PHP => self.push(bus, self.flags.pushed()),
            PLA => {
                let v = self.pull(bus);
                self.a = self.nz(v);
            }
            PLP => {
                let p = self.pull(bus);
                self.flags = Flags::pulled(p);
            }

            TAX => self.x = self.nz(self.a),
            TAY => self.y = self.nz(self.a),
            TSX => self.x = self.nz(self.s),
            TXA => self.a = self.nz(self.x),
            TYA => self.a = self.nz(self.y),
            TXS => self.s = self.x,

            INX => self.x = self.nz(self.x.wrapping_add(1)),
            INY => self.y = self.nz(self.y.wrapping_add(1)),
            DEX => self.x = self.nz(self.x.wrapping_sub(1)),
            DEY => self.y = self.nz(self.y.wrapping_sub(1)),

            CLC => self.flags.remove(Flags::C),
            CLD => self.flags.remove(Flags::D),
            CLI => self.flags.remove(Flags::I),
            CLV => self.flags.remove(Flags::V),
            SEC => self.flags.insert(Flags::C),
            SED => self.flags.insert(Flags::D),
            SEI => self.flags.insert(Flags::I),

            STA => self.write_operand(bus, operand, self.a),
            STX => self.write_operand(bus, operand, self.x),
            STY => self.write_operand(bus, operand, self.y),

            ASL | LSR | ROL | ROR | INC | DEC => self.read_modify_write(bus, ir, operand),

            NOP => (),
        }
        (false, false)
    }

    fn read_class(&mut self, ir: Instruction, v: u8) {
        match ir {
            Instruction::ADC => self.adc(v),
            Instruction::SBC => self.sbc(v),
            Instruction::AND => self.a = self.nz(self.a & v),
            Instruction::ORA => self.a = self.nz(self.a | v),
            Instruction::EOR => self.a = self.nz(self.a ^ v),
            Instruction::BIT => self.bit(v),
            Instruction::CMP => self.cmp(self.a, v),
            Instruction::CPX => self.cmp(self.x, v),
            Instruction::CPY => self.cmp(self.y, v),
            Instruction::LDA => self.a = self.nz(v),
            Instruction::LDX => self.x = self.nz(v),
            Instruction::LDY => self.y = self.nz(v),
            _ => (),
        }
    }

    fn read_modify_write<B: Bus>(&mut self, bus: &mut B, ir: Instruction, operand: Operand) {
        let v = self.read_operand(bus, operand);
        let r = match ir {
            Instruction::ASL => self.asl(v),
            Instruction::LSR => self.lsr(v),
            Instruction::ROL => self.rol(v),
            Instruction::ROR => self.ror(v),
            Instruction::INC => self.nz(v.wrapping_add(1)),
            _ => self.nz(v.wrapping_sub(1)),
        };
        self.write_operand(bus, operand, r);
    }

    fn nz(&mut self, v: u8) -> u8 {
        self.flags.set(Flags::Z, v == 0);
        self.flags.set(Flags::N, v & 0x80 != 0);
        v
    }

    /* Binary mode only, D is ignored. */
    fn adc(&mut self, val: u8) {
        let sum: u16 = self.a as u16 + val as u16 + (if self.flags.contains(Flags::C) {1} else {0});
        let r = sum as u8;
        self.flags.set(Flags::V, !(self.a ^ val) & (self.a ^ r) & 0x80 != 0);
        self.flags.set(Flags::C, sum > 0xFF);
        self.a = self.nz(r);
    }

    fn sbc(&mut self, val: u8) {
        self.adc(!val);
    }

    fn cmp(&mut self, r: u8, v: u8) {
        self.nz(r.wrapping_sub(v));
        self.flags.set(Flags::C, r >= v);
    }

    fn bit(&mut self, v: u8) {
        self.flags.set(Flags::Z, self.a & v == 0);
        self.flags.set(Flags::V, v & 0x40 != 0);
        self.flags.set(Flags::N, v & 0x80 != 0);
    }

    fn asl(&mut self, v: u8) -> u8 {
        self.flags.set(Flags::C, v & 0x80 != 0);
        self.nz(v << 1)
    }

    fn lsr(&mut self, v: u8) -> u8 {
        self.flags.set(Flags::C, v & 0x01 != 0);
        self.nz(v >> 1)
    }

    fn rol(&mut self, v: u8) -> u8 {
        let carry = self.flags.contains(Flags::C) as u8;
        self.flags.set(Flags::C, v & 0x80 != 0);
        self.nz((v << 1) | carry)
    }

    fn ror(&mut self, v: u8) -> u8 {
        let carry = (self.flags.contains(Flags::C) as u8) << 7;
        self.flags.set(Flags::C, v & 0x01 != 0);
        self.nz((v >> 1) | carry)
    }

    fn branch(&mut self, cond: bool, operand: Operand) -> (bool, bool) {
        match operand.address() {
            Some(target) if cond => {
                let crossed = self.pc.crosses_page(target);
                trace!("[{}] branch {:?} -> {:?}", self.ticks, self.pc, target);
                self.pc = target;
                (true, crossed)
            }
            _ => (false, false),
        }
    }

    /// Software interrupt: pushes the address after the padding byte and the
    /// status with B set, then jumps through the IRQ/BRK vector.
    fn brk<B: Bus>(&mut self, bus: &mut B) {
        let ret = self.pc + 1;
        self.push(bus, ret.high());
        self.push(bus, ret.low());
        self.push(bus, self.flags.pushed());
        self.flags.insert(Flags::I);
        self.pc = bus.read_u16(Address::new(INTV_ADDR));
        debug!("[{}] BRK, return {:?}, vector {:?}", self.ticks, ret, self.pc);
    }

    fn push<B: Bus>(&mut self, bus: &mut B, data: u8) {
        let addr = Address::new(STACK_ADDR | self.s as u16);
        trace!("[{}] push {:?} = 0x{:02x}", self.ticks, addr, data);
        bus.write(addr, data);
        self.s = self.s.wrapping_sub(1);
    }

    fn pull<B: Bus>(&mut self, bus: &B) -> u8 {
        self.s = self.s.wrapping_add(1);
        let addr = Address::new(STACK_ADDR | self.s as u16);
        let data = bus.read(addr);
        trace!("[{}] pull {:?} -> 0x{:02x}", self.ticks, addr, data);
        data
    }

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn set_a(&mut self, a: u8) {
        self.a = a;
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn set_x(&mut self, x: u8) {
        self.x = x;
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn set_y(&mut self, y: u8) {
        self.y = y;
    }

    pub fn s(&self) -> u8 {
        self.s
    }

    pub fn set_s(&mut self, s: u8) {
        self.s = s;
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    pub fn set_pc(&mut self, pc: impl Into<Address>) {
        self.pc = pc.into();
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub fn flag(&self, flag: Flags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.flags.set(flag, value);
    }

    pub fn negative(&self) -> bool {
        self.flag(Flags::N)
    }

    pub fn overflow(&self) -> bool {
        self.flag(Flags::V)
    }

    pub fn brk_flag(&self) -> bool {
        self.flag(Flags::B)
    }

    pub fn decimal(&self) -> bool {
        self.flag(Flags::D)
    }

    pub fn interrupt(&self) -> bool {
        self.flag(Flags::I)
    }

    pub fn zero(&self) -> bool {
        self.flag(Flags::Z)
    }

    pub fn carry(&self) -> bool {
        self.flag(Flags::C)
    }

    pub fn cycles_remaining(&self) -> u8 {
        self.cycles_remaining
    }

    pub fn is_ready(&self) -> bool {
        self.cycles_remaining == 0
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_ir_pc(&self) -> Address {
        self.last_ir_pc
    }
}

impl Default for Core {
    fn default() -> Self {
        Core::new()
    }
}

fn zero_page_word<B: Bus>(bus: &B, ptr: u8) -> Address {
    let lo = bus.read(Address::zero_page(ptr));
    let hi = bus.read(Address::zero_page(ptr.wrapping_add(1)));
    Address::from_bytes(hi, lo)
}

/// JMP ($xxxx) target.
#[cfg(not(feature = "nmos_indirect_jmp"))]
fn indirect<B: Bus>(bus: &B, ptr: Address) -> Address {
    bus.read_u16(ptr)
}

/// JMP ($xxFF) takes its high byte from $xx00, the pointer never carries
/// into the next page.
#[cfg(feature = "nmos_indirect_jmp")]
fn indirect<B: Bus>(bus: &B, ptr: Address) -> Address {
    let lo = bus.read(ptr);
    let hi = bus.read(Address::new(ptr.page() | (ptr.low().wrapping_add(1)) as u16));
    Address::from_bytes(hi, lo)
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ a:0x{:02x}, x: 0x{:02x}, y: 0x{:02x}, s: 0x{:02x} pc: {:?}\nflags: {:?}, cycles_remaining: {}, ticks: {}, last_ir_pc: {:?} }}",
        self.a, self.x, self.y, self.s, self.pc,
        self.flags, self.cycles_remaining, self.ticks, self.last_ir_pc)
    }
}
