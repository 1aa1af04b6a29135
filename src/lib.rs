#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate bitflags;

mod bus;
mod cartridge;
mod cpu;
mod emulator;
mod error;
mod mapper;
mod ppu;
mod rng;

pub use bus::SystemBus;
pub use cartridge::{CartridgeNes, Mirroring};
pub use cpu::disassemble;
pub use cpu::{Cpu6502, Flag};
pub use emulator::NesCore;
pub use error::CartridgeError;
pub use ppu::*;

pub const DISPLAY_WIDTH: usize = 256;
pub const DISPLAY_HEIGHT: usize = 240;

// Based on a NTSC system
pub const BASE_CPU_FREQUENCY: f32 = 1_789_773.0;
pub const BASE_PPU_FREQUENCY: f32 = 3.0 * BASE_CPU_FREQUENCY;

pub trait SystemControl {
    fn reset(&mut self);
}
