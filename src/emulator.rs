use std::collections::BTreeMap;

use crate::bus::SystemBus;
use crate::cartridge::CartridgeNes;
use crate::cpu::{disassemble, Cpu6502};
use crate::ppu::{Colour, Ppu2C02};
use crate::{SystemControl, DISPLAY_HEIGHT, DISPLAY_WIDTH};

const PRG_ROM_START: u32 = 0x8000;
const ADDR_SPACE_END: u32 = 0x10000;

/// The assembled console: CPU, PPU and bus under one master clock.
///
/// The PPU is clocked on every master tick, the CPU on every third. Hosts
/// drive emulation with `clock()`, or with the coarser `step_cpu_instruction`
/// and `step_ppu_frame` when single-stepping a debugger or pacing rendering.
pub struct NesCore {
    cpu: Cpu6502,
    ppu: Ppu2C02,
    bus: SystemBus,

    system_clock: u64,
    disassembly: BTreeMap<u16, String>,
}

impl NesCore {
    pub fn new() -> Self {
        Self {
            cpu: Cpu6502::new(),
            ppu: Ppu2C02::new(),
            bus: SystemBus::new(),

            system_clock: 0,
            disassembly: BTreeMap::new(),
        }
    }

    /// Connects a cartridge, captures the PRG-ROM disassembly and brings the
    /// whole system out of reset.
    pub fn insert_cartridge(&mut self, cartridge: CartridgeNes) {
        self.bus.insert_cartridge(cartridge);
        self.disassembly = disassemble(&mut self.bus, PRG_ROM_START, ADDR_SPACE_END);
        self.reset();
    }

    pub fn remove_cartridge(&mut self) -> Option<CartridgeNes> {
        let cartridge = self.bus.remove_cartridge();
        self.disassembly.clear();
        self.reset();

        cartridge
    }

    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.ppu.reset();
        self.system_clock = 0;
    }

    /// One master clock tick.
    pub fn clock(&mut self) {
        self.ppu.clock();

        if self.system_clock % 3 == 0 {
            self.cpu.clock(&mut self.bus);
        }

        self.system_clock += 1;
    }

    /// Finishes the in-flight instruction, then runs exactly one more.
    pub fn step_cpu_instruction(&mut self) {
        while !self.cpu.cycle_complete() {
            self.clock();
        }

        // the next instruction executes in full on its fetch cycle
        while self.cpu.cycle_complete() {
            self.clock();
        }
    }

    /// Runs to the end of the current frame, then lets the CPU finish its
    /// in-flight instruction.
    pub fn step_ppu_frame(&mut self) {
        while !self.ppu.frame_complete() {
            self.clock();
        }

        while !self.cpu.cycle_complete() {
            self.clock();
        }

        self.ppu.clear_frame_complete();
    }

    /// Debugger entry point; `read_only` promises the access will not disturb
    /// observable state (used while walking the disassembly).
    pub fn cpu_read(&mut self, addr: u16, read_only: bool) -> u8 {
        self.bus.cpu_read(addr as usize, read_only)
    }

    pub fn cpu_write(&mut self, addr: u16, byte: u8) {
        self.bus.cpu_write(addr as usize, byte);
    }

    pub fn cpu(&self) -> &Cpu6502 {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu2C02 {
        &self.ppu
    }

    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    pub fn try_get_frame(&mut self) -> Option<[Colour; DISPLAY_HEIGHT * DISPLAY_WIDTH]> {
        self.ppu.try_get_frame()
    }

    pub fn pattern_table(&self, which: usize, palette: usize) -> [Colour; 128 * 128] {
        self.ppu.get_pattern_table(&self.bus, which, palette)
    }

    pub fn disassembly(&self) -> &BTreeMap<u16, String> {
        &self.disassembly
    }

    pub fn system_clock(&self) -> u64 {
        self.system_clock
    }

    pub fn set_noise_seed(&mut self, seed: u64) {
        self.ppu.set_noise_seed(seed);
    }
}

impl Default for NesCore {
    fn default() -> Self {
        NesCore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_is_clocked_every_third_master_tick() {
        let mut core = NesCore::new();

        for _ in 0..9 {
            core.clock();
        }

        assert_eq!(core.system_clock(), 9);
        assert_eq!(core.cpu().total_cycles, 3);
    }

    #[test]
    fn reset_zeroes_the_master_clock() {
        let mut core = NesCore::new();

        for _ in 0..10 {
            core.clock();
        }
        core.reset();

        assert_eq!(core.system_clock(), 0);
        assert_eq!(core.cpu().total_cycles, 0);
    }

    #[test]
    fn a_bare_core_resets_to_the_seeded_vector() {
        let mut core = NesCore::new();

        core.reset();

        assert_eq!(core.cpu().program_counter, 0x8000);
    }

    #[test]
    fn removing_the_cartridge_drops_the_disassembly() {
        let mut core = NesCore::new();
        assert!(core.remove_cartridge().is_none());
        assert!(core.disassembly().is_empty());
    }
}
