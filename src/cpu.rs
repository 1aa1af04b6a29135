mod disassembler;
mod opcode;

pub use disassembler::disassemble;

use crate::bus::SystemBus;

use self::opcode::{AddrMode, FALLBACK_NOP, OPCODES_LOOKUP};

#[derive(Debug, Clone, Copy)]
pub enum Flag { C, Z, I, D, B, U, V, N }

impl Flag {
    pub fn mask(&self) -> u8 {
        match self {
            Flag::C => 0b00000001,
            Flag::Z => 0b00000010,
            Flag::I => 0b00000100,
            Flag::D => 0b00001000,
            Flag::B => 0b00010000,
            Flag::U => 0b00100000,
            Flag::V => 0b01000000,
            Flag::N => 0b10000000,
        }
    }
}

const STACK_START: u16 = 0x100;

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// The 2A03 CPU: a 6502 without decimal mode.
///
/// An instruction executes in full on the clock edge that fetches its opcode;
/// the remaining cycles of its budget are consumed idle so that multi-component
/// timing still lines up. Undocumented opcodes decode as 2-cycle NOPs.
pub struct Cpu6502 {
    pub accumulator: u8,
    pub x_index_reg: u8,
    pub y_index_reg: u8,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub processor_status: u8,
    pub opcode: u8,

    pub total_cycles: u64,
    cycles_remaining: u32,

    addr_mode: AddrMode,
    operand_addr: u16,
    operand_data: u8,
    page_crossed: bool,
}

impl Cpu6502 {
    pub fn new() -> Self {
        Cpu6502 {
            accumulator: 0,
            x_index_reg: 0,
            y_index_reg: 0,
            program_counter: 0,
            stack_pointer: 0xFD,
            processor_status: Flag::U.mask(),
            opcode: 0,

            total_cycles: 0,
            cycles_remaining: 0,

            addr_mode: AddrMode::IMP,
            operand_addr: 0,
            operand_data: 0,
            page_crossed: false,
        }
    }

    /// One CPU clock. At an instruction boundary this fetches, decodes and
    /// executes the whole instruction, loading the cycle budget; every clock
    /// (including that one) burns a single cycle off the budget.
    pub fn clock(&mut self, bus: &mut SystemBus) {
        if self.cycles_remaining == 0 {
            self.opcode = self.advance_pc(bus);

            let op = match OPCODES_LOOKUP.get(&self.opcode) {
                Some(op) => *op,
                None => {
                    log::warn!(
                        "undocumented opcode {:02X} at {:04X}, executing as NOP",
                        self.opcode,
                        self.program_counter.wrapping_sub(1)
                    );
                    &*FALLBACK_NOP
                }
            };

            self.cycles_remaining = op.cycles + op.execute_op(self, bus);
        }

        self.cycles_remaining -= 1;
        self.total_cycles += 1;
    }

    #[inline]
    pub fn cycle_complete(&self) -> bool {
        self.cycles_remaining == 0
    }

    pub fn reset(&mut self, bus: &mut SystemBus) {
        self.accumulator = 0;
        self.x_index_reg = 0;
        self.y_index_reg = 0;
        self.stack_pointer = 0xFD;
        self.processor_status = Flag::U.mask();

        self.program_counter = self.read_word(bus, RESET_VECTOR);

        self.opcode = 0;
        self.addr_mode = AddrMode::IMP;
        self.operand_addr = 0;
        self.operand_data = 0;
        self.page_crossed = false;

        self.total_cycles = 0;
        self.cycles_remaining = 8;
    }

    /// Maskable interrupt; ignored while the I flag is set.
    pub fn irq(&mut self, bus: &mut SystemBus) {
        if self.get_flag(Flag::I) {
            return;
        }

        self.service_interrupt(bus, IRQ_VECTOR);
        self.cycles_remaining = 7;
    }

    /// Non-maskable interrupt; always honored.
    pub fn nmi(&mut self, bus: &mut SystemBus) {
        self.service_interrupt(bus, NMI_VECTOR);
        self.cycles_remaining = 8;
    }

    fn service_interrupt(&mut self, bus: &mut SystemBus, vector_addr: u16) {
        self.push_word_to_stack(bus, self.program_counter);

        // the interrupted status is pushed with B clear, then I masks
        // further interrupts
        self.processor_status &= !Flag::B.mask();
        self.processor_status |= Flag::U.mask();
        self.push_byte_to_stack(bus, self.processor_status);
        self.set_flag(Flag::I, true);

        self.program_counter = self.read_word(bus, vector_addr);
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.processor_status & flag.mask()) != 0
    }

    #[inline]
    fn set_flag(&mut self, flag: Flag, val: bool) {
        let mask = flag.mask();
        if val {
            self.processor_status |= mask;
        } else {
            self.processor_status &= !mask;
        }
    }

    #[inline]
    pub(super) fn add_with_carry(&mut self, bus: &mut SystemBus) -> u32 {
        let op2 = self.read_operand(bus);
        self.add_to_accumulator(op2)
    }

    #[inline]
    pub(super) fn subtract_with_carry(&mut self, bus: &mut SystemBus) -> u32 {
        // inverting the operand turns the subtraction into the same
        // carry-chained addition
        let op2 = self.read_operand(bus) ^ 0xFF;
        self.add_to_accumulator(op2)
    }

    #[inline]
    fn add_to_accumulator(&mut self, op2: u8) -> u32 {
        let op1 = self.accumulator;
        let temp = op1 as u16 + op2 as u16 + self.get_flag(Flag::C) as u16;
        self.accumulator = temp as u8;

        self.set_flag(Flag::C, temp > 0xFF);
        self.set_flag(Flag::V, (!(op1 ^ op2) & (op1 ^ self.accumulator)) & 0x80 != 0);
        self.set_z_and_n_flag(self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn and_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.accumulator &= self.read_operand(bus);

        self.set_z_and_n_flag(self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn arithmetic_shift_left(&mut self, bus: &mut SystemBus) -> u32 {
        let data = self.read_operand(bus);
        let result = data.wrapping_shl(1);
        self.write_operand(bus, result);

        self.set_flag(Flag::C, data & 0b10000000 != 0);
        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn branch_if_carry_clear(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(!self.get_flag(Flag::C))
    }

    #[inline]
    pub(super) fn branch_if_carry_set(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(self.get_flag(Flag::C))
    }

    #[inline]
    pub(super) fn branch_if_equal(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(self.get_flag(Flag::Z))
    }

    #[inline]
    pub(super) fn bit_test(&mut self, bus: &mut SystemBus) -> u32 {
        let data = self.read_operand(bus);
        self.set_flag(Flag::Z, self.accumulator & data == 0);
        self.set_flag(Flag::V, data & 0b01000000 != 0);
        self.set_flag(Flag::N, data & 0b10000000 != 0);

        0
    }

    #[inline]
    pub(super) fn branch_if_minus(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(self.get_flag(Flag::N))
    }

    #[inline]
    pub(super) fn branch_if_not_equal(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(!self.get_flag(Flag::Z))
    }

    #[inline]
    pub(super) fn branch_if_positive(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(!self.get_flag(Flag::N))
    }

    #[inline]
    pub(super) fn branch_if_overflow_clear(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(!self.get_flag(Flag::V))
    }

    #[inline]
    pub(super) fn branch_if_overflow_set(&mut self, _bus: &mut SystemBus) -> u32 {
        self.branch_if_cond(self.get_flag(Flag::V))
    }

    #[inline]
    fn branch_if_cond(&mut self, cond: bool) -> u32 {
        if cond {
            self.program_counter = self.operand_addr;

            1 + self.page_crossed as u32
        } else {
            0
        }
    }

    #[inline]
    pub(super) fn force_interrupt(&mut self, bus: &mut SystemBus) -> u32 {
        // BRK pushes the address past its padding byte, with B set in the
        // pushed copy only
        self.program_counter = self.program_counter.wrapping_add(1);
        self.push_word_to_stack(bus, self.program_counter);
        self.push_byte_to_stack(bus, self.processor_status | Flag::B.mask() | Flag::U.mask());
        self.set_flag(Flag::I, true);

        self.program_counter = self.read_word(bus, IRQ_VECTOR);

        0
    }

    #[inline]
    pub(super) fn clear_carry_flag(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::C, false);

        0
    }

    #[inline]
    pub(super) fn clear_decimal_mode(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::D, false);

        0
    }

    #[inline]
    pub(super) fn clear_interrupt_disable(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::I, false);

        0
    }

    #[inline]
    pub(super) fn clear_overflow_flag(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::V, false);

        0
    }

    #[inline]
    pub(super) fn compare_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.compare_register(bus, self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn compare_x_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.compare_register(bus, self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn compare_y_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.compare_register(bus, self.y_index_reg);

        0
    }

    #[inline]
    fn compare_register(&mut self, bus: &mut SystemBus, register: u8) {
        let data = self.read_operand(bus);
        self.set_flag(Flag::C, register >= data);
        self.set_flag(Flag::Z, register == data);
        self.set_flag(Flag::N, register.wrapping_sub(data) & 0b10000000 != 0);
    }

    #[inline]
    pub(super) fn decrement_memory(&mut self, bus: &mut SystemBus) -> u32 {
        let result = self.read_operand(bus).wrapping_sub(1);
        self.write_operand(bus, result);

        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn decrement_x_reg(&mut self, _bus: &mut SystemBus) -> u32 {
        self.x_index_reg = self.x_index_reg.wrapping_sub(1);

        self.set_z_and_n_flag(self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn decrement_y_reg(&mut self, _bus: &mut SystemBus) -> u32 {
        self.y_index_reg = self.y_index_reg.wrapping_sub(1);

        self.set_z_and_n_flag(self.y_index_reg);

        0
    }

    #[inline]
    pub(super) fn exclusive_or_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.accumulator ^= self.read_operand(bus);

        self.set_z_and_n_flag(self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn increment_memory(&mut self, bus: &mut SystemBus) -> u32 {
        let result = self.read_operand(bus).wrapping_add(1);
        self.write_operand(bus, result);

        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn increment_x_reg(&mut self, _bus: &mut SystemBus) -> u32 {
        self.x_index_reg = self.x_index_reg.wrapping_add(1);

        self.set_z_and_n_flag(self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn increment_y_reg(&mut self, _bus: &mut SystemBus) -> u32 {
        self.y_index_reg = self.y_index_reg.wrapping_add(1);

        self.set_z_and_n_flag(self.y_index_reg);

        0
    }

    #[inline]
    pub(super) fn jump(&mut self, _bus: &mut SystemBus) -> u32 {
        self.program_counter = self.operand_addr;

        0
    }

    #[inline]
    pub(super) fn jump_to_subroutine(&mut self, bus: &mut SystemBus) -> u32 {
        // the saved address points at the last byte of the JSR
        self.push_word_to_stack(bus, self.program_counter.wrapping_sub(1));
        self.program_counter = self.operand_addr;

        0
    }

    #[inline]
    pub(super) fn load_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.accumulator = self.read_operand(bus);

        self.set_z_and_n_flag(self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn load_x_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.x_index_reg = self.read_operand(bus);

        self.set_z_and_n_flag(self.x_index_reg);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn load_y_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.y_index_reg = self.read_operand(bus);

        self.set_z_and_n_flag(self.y_index_reg);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn logical_shift_right(&mut self, bus: &mut SystemBus) -> u32 {
        let data = self.read_operand(bus);
        let result = data.wrapping_shr(1);
        self.write_operand(bus, result);

        self.set_flag(Flag::C, data & 0b00000001 != 0);
        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn no_operation(&mut self, _bus: &mut SystemBus) -> u32 {
        // do nothing

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn or_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.accumulator |= self.read_operand(bus);

        self.set_z_and_n_flag(self.accumulator);

        self.page_crossed as u32
    }

    #[inline]
    pub(super) fn push_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.push_byte_to_stack(bus, self.accumulator);

        0
    }

    #[inline]
    pub(super) fn push_processor_status(&mut self, bus: &mut SystemBus) -> u32 {
        self.push_byte_to_stack(bus, self.processor_status | Flag::B.mask() | Flag::U.mask());

        0
    }

    #[inline]
    pub(super) fn pull_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.accumulator = self.pop_byte_from_stack(bus);

        self.set_z_and_n_flag(self.accumulator);

        0
    }

    #[inline]
    pub(super) fn pull_processor_status(&mut self, bus: &mut SystemBus) -> u32 {
        // the stored byte comes back verbatim, B and U included
        self.processor_status = self.pop_byte_from_stack(bus);

        0
    }

    #[inline]
    pub(super) fn return_from_interrupt(&mut self, bus: &mut SystemBus) -> u32 {
        self.processor_status = self.pop_byte_from_stack(bus);
        self.processor_status &= !(Flag::B.mask() | Flag::U.mask());
        self.program_counter = self.pop_word_from_stack(bus);

        0
    }

    #[inline]
    pub(super) fn return_from_subroutine(&mut self, bus: &mut SystemBus) -> u32 {
        self.program_counter = self.pop_word_from_stack(bus).wrapping_add(1);

        0
    }

    #[inline]
    pub(super) fn rotate_left(&mut self, bus: &mut SystemBus) -> u32 {
        let data = self.read_operand(bus);
        let result = data.wrapping_shl(1) | (self.get_flag(Flag::C) as u8);
        self.write_operand(bus, result);

        self.set_flag(Flag::C, data & 0b10000000 != 0);
        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn rotate_right(&mut self, bus: &mut SystemBus) -> u32 {
        let data = self.read_operand(bus);
        let result = data.wrapping_shr(1) | ((self.get_flag(Flag::C) as u8) << 7);
        self.write_operand(bus, result);

        self.set_flag(Flag::C, data & 0b00000001 != 0);
        self.set_z_and_n_flag(result);

        0
    }

    #[inline]
    pub(super) fn set_carry_flag(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::C, true);

        0
    }

    #[inline]
    pub(super) fn set_decimal_mode(&mut self, _bus: &mut SystemBus) -> u32 {
        // the flag itself is writable; ADC/SBC just never consult it
        self.set_flag(Flag::D, true);

        0
    }

    #[inline]
    pub(super) fn set_interrupt_disable(&mut self, _bus: &mut SystemBus) -> u32 {
        self.set_flag(Flag::I, true);

        0
    }

    #[inline]
    pub(super) fn store_accumulator(&mut self, bus: &mut SystemBus) -> u32 {
        self.write_operand(bus, self.accumulator);

        0
    }

    #[inline]
    pub(super) fn store_x_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.write_operand(bus, self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn store_y_reg(&mut self, bus: &mut SystemBus) -> u32 {
        self.write_operand(bus, self.y_index_reg);

        0
    }

    #[inline]
    pub(super) fn transfer_accumulator_to_x(&mut self, _bus: &mut SystemBus) -> u32 {
        self.x_index_reg = self.accumulator;

        self.set_z_and_n_flag(self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn transfer_accumulator_to_y(&mut self, _bus: &mut SystemBus) -> u32 {
        self.y_index_reg = self.accumulator;

        self.set_z_and_n_flag(self.y_index_reg);

        0
    }

    #[inline]
    pub(super) fn transfer_stack_pointer_to_x(&mut self, _bus: &mut SystemBus) -> u32 {
        self.x_index_reg = self.stack_pointer;

        self.set_z_and_n_flag(self.x_index_reg);

        0
    }

    #[inline]
    pub(super) fn transfer_x_to_accumulator(&mut self, _bus: &mut SystemBus) -> u32 {
        self.accumulator = self.x_index_reg;

        self.set_z_and_n_flag(self.accumulator);

        0
    }

    #[inline]
    pub(super) fn transfer_x_to_stack_pointer(&mut self, _bus: &mut SystemBus) -> u32 {
        self.stack_pointer = self.x_index_reg;

        0
    }

    #[inline]
    pub(super) fn transfer_y_to_accumulator(&mut self, _bus: &mut SystemBus) -> u32 {
        self.accumulator = self.y_index_reg;

        self.set_z_and_n_flag(self.accumulator);

        0
    }

    #[inline]
    pub(super) fn imp_addressing(&mut self, _bus: &mut SystemBus) {
        self.addr_mode = AddrMode::IMP;
        self.page_crossed = false;
    }

    #[inline]
    pub(super) fn acc_addressing(&mut self, _bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ACC;
        self.page_crossed = false;
    }

    #[inline]
    pub(super) fn imm_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::IMM;
        self.operand_data = self.advance_pc(bus);
        self.page_crossed = false;
    }

    #[inline]
    pub(super) fn zpg_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ZPG;
        let operand_addr = self.advance_pc(bus) as u16;

        self.set_operand_addr(operand_addr);
    }

    #[inline]
    pub(super) fn zpx_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ZPX;
        let operand_addr = self.advance_pc(bus).wrapping_add(self.x_index_reg) as u16;

        self.set_operand_addr(operand_addr);
    }

    #[inline]
    pub(super) fn zpy_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ZPY;
        let operand_addr = self.advance_pc(bus).wrapping_add(self.y_index_reg) as u16;

        self.set_operand_addr(operand_addr);
    }

    #[inline]
    pub(super) fn rel_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::REL;
        let offset = (self.advance_pc(bus) as i8) as i32;

        self.set_operand_addr((self.program_counter as i32 + offset) as u16);
        self.page_crossed = (self.program_counter ^ self.operand_addr) & 0xFF00 != 0;
    }

    #[inline]
    pub(super) fn abs_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ABS;
        let abs_address = self.fetch_abs_address(bus);

        self.set_operand_addr(abs_address);
    }

    #[inline]
    pub(super) fn abx_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ABX;
        let addr = self.fetch_abs_address(bus);

        self.set_operand_addr(addr.wrapping_add(self.x_index_reg as u16));
        self.page_crossed = (self.operand_addr ^ addr) & 0xFF00 != 0;
    }

    #[inline]
    pub(super) fn aby_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::ABY;
        let addr = self.fetch_abs_address(bus);

        self.set_operand_addr(addr.wrapping_add(self.y_index_reg as u16));
        self.page_crossed = (self.operand_addr ^ addr) & 0xFF00 != 0;
    }

    #[inline]
    pub(super) fn ind_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::IND;
        let ptr = self.fetch_abs_address(bus);

        let lo = self.read_byte(bus, ptr) as u16;

        // NMOS bug: a pointer on a page boundary wraps within its page
        let hi = if ptr & 0xFF == 0xFF {
            self.read_byte(bus, ptr & 0xFF00)
        } else {
            self.read_byte(bus, ptr.wrapping_add(1))
        } as u16;

        self.set_operand_addr((hi << 8) | lo);
    }

    #[inline]
    pub(super) fn inx_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::INX;
        let ptr = self.advance_pc(bus).wrapping_add(self.x_index_reg);

        let lo = self.read_byte(bus, ptr as u16) as u16;
        let hi = self.read_byte(bus, ptr.wrapping_add(1) as u16) as u16;

        self.set_operand_addr((hi << 8) | lo);
    }

    #[inline]
    pub(super) fn iny_addressing(&mut self, bus: &mut SystemBus) {
        self.addr_mode = AddrMode::INY;
        let ptr = self.advance_pc(bus);

        let lo = self.read_byte(bus, ptr as u16) as u16;
        let hi = self.read_byte(bus, ptr.wrapping_add(1) as u16) as u16;

        let addr = (hi << 8) | lo;

        self.set_operand_addr(addr.wrapping_add(self.y_index_reg as u16));
        self.page_crossed = (self.operand_addr ^ addr) & 0xFF00 != 0;
    }

    #[inline]
    fn write_operand(&mut self, bus: &mut SystemBus, byte: u8) {
        match self.addr_mode {
            AddrMode::ACC | AddrMode::IMP => self.accumulator = byte,
            _ => self.write_byte(bus, self.operand_addr, byte),
        }
    }

    // operands are fetched lazily so pure stores never touch their target
    #[inline]
    fn read_operand(&mut self, bus: &mut SystemBus) -> u8 {
        match self.addr_mode {
            AddrMode::ACC | AddrMode::IMP => self.accumulator,
            AddrMode::IMM => self.operand_data,
            _ => self.read_byte(bus, self.operand_addr),
        }
    }

    #[inline]
    fn set_operand_addr(&mut self, operand_addr: u16) {
        self.operand_addr = operand_addr;
        self.page_crossed = false;
    }

    #[inline]
    fn fetch_abs_address(&mut self, bus: &mut SystemBus) -> u16 {
        let lo = self.advance_pc(bus) as u16;
        let hi = self.advance_pc(bus) as u16;
        (hi << 8) | lo
    }

    #[inline]
    fn push_word_to_stack(&mut self, bus: &mut SystemBus, word: u16) {
        self.push_byte_to_stack(bus, ((word & 0xFF00) >> 8) as u8);
        self.push_byte_to_stack(bus, word as u8);
    }

    #[inline]
    fn pop_word_from_stack(&mut self, bus: &mut SystemBus) -> u16 {
        let lo = self.pop_byte_from_stack(bus) as u16;
        let hi = self.pop_byte_from_stack(bus) as u16;
        (hi << 8) | lo
    }

    #[inline]
    fn push_byte_to_stack(&mut self, bus: &mut SystemBus, byte: u8) {
        self.write_byte(bus, STACK_START | self.stack_pointer as u16, byte);
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    #[inline]
    fn pop_byte_from_stack(&mut self, bus: &mut SystemBus) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        self.read_byte(bus, STACK_START | self.stack_pointer as u16)
    }

    #[inline]
    fn set_z_and_n_flag(&mut self, byte: u8) {
        self.set_flag(Flag::Z, byte == 0);
        self.set_flag(Flag::N, byte & 0b10000000 != 0);
    }

    #[inline]
    fn advance_pc(&mut self, bus: &mut SystemBus) -> u8 {
        let ret = self.read_byte(bus, self.program_counter);
        self.program_counter = self.program_counter.wrapping_add(1);

        ret
    }

    #[inline]
    fn read_word(&mut self, bus: &mut SystemBus, addr: u16) -> u16 {
        let lo = self.read_byte(bus, addr) as u16;
        let hi = self.read_byte(bus, addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    #[inline]
    fn read_byte(&mut self, bus: &mut SystemBus, addr: u16) -> u8 {
        bus.cpu_read(addr as usize, false)
    }

    #[inline]
    fn write_byte(&mut self, bus: &mut SystemBus, addr: u16, byte: u8) {
        bus.cpu_write(addr as usize, byte);
    }
}
