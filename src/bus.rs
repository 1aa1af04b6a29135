use crate::cartridge::CartridgeNes;
use crate::ppu::PpuBus;
use crate::SystemControl;

const CPU_RAM_START: usize = 0x0000;
const CPU_RAM_END: usize = 0x1FFF;
const PPU_REG_START: usize = 0x2000;
const PPU_REG_END: usize = 0x3FFF;
const APU_IO_START: usize = 0x4000;
const APU_IO_END: usize = 0x4017;

const RESET_VECTOR_LO: usize = 0xFFFC;
const RESET_VECTOR_HI: usize = 0xFFFD;

const CPU_RAM_LENGTH: usize = 0x800;

/// CPU-side address decoding.
///
/// The cartridge is consulted first on every access so that future mappers
/// may intercept any range; only unclaimed addresses fall through to system
/// RAM, the PPU register window or the APU/IO stub. Un-decoded reads return 0
/// and un-decoded writes are dropped.
pub struct SystemBus {
    pub ppu_bus: PpuBus,
    cartridge: Option<CartridgeNes>,

    cpu_ram: [u8; CPU_RAM_LENGTH],
}

impl SystemControl for SystemBus {
    fn reset(&mut self) {
        match self.cartridge.as_mut() {
            Some(cartridge) => cartridge.reset(),
            None => {
                // no PRG-ROM to supply $FFFC/$FFFD; seed the vector so a
                // bare core comes out of reset at $8000
                self.cpu_ram[RESET_VECTOR_LO % CPU_RAM_LENGTH] = 0x00;
                self.cpu_ram[RESET_VECTOR_HI % CPU_RAM_LENGTH] = 0x80;
            }
        }
        self.ppu_bus.reset();
    }
}

impl SystemBus {
    pub fn new() -> Self {
        Self {
            ppu_bus: PpuBus::new(),
            cartridge: None,

            cpu_ram: [0; CPU_RAM_LENGTH],
        }
    }

    pub fn insert_cartridge(&mut self, cartridge: CartridgeNes) {
        self.cartridge = Some(cartridge);
    }

    pub fn remove_cartridge(&mut self) -> Option<CartridgeNes> {
        self.cartridge.take()
    }

    pub fn cartridge(&self) -> Option<&CartridgeNes> {
        self.cartridge.as_ref()
    }

    pub fn cpu_read(&mut self, addr: usize, read_only: bool) -> u8 {
        if let Some(byte) = self.cartridge.as_ref().and_then(|c| c.cpu_read(addr)) {
            return byte;
        }

        match addr {
            CPU_RAM_START..=CPU_RAM_END => self.cpu_ram[addr % CPU_RAM_LENGTH],
            PPU_REG_START..=PPU_REG_END => {
                self.ppu_bus
                    .cpu_read_reg(addr, self.cartridge.as_ref(), read_only)
            }
            APU_IO_START..=APU_IO_END => 0,
            // reachable only when no cartridge (or mapper) claims the
            // vector; reads the RAM-backed cells seeded by reset()
            RESET_VECTOR_LO..=RESET_VECTOR_HI => self.cpu_ram[addr % CPU_RAM_LENGTH],
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: usize, byte: u8) {
        if let Some(cartridge) = self.cartridge.as_mut() {
            if cartridge.cpu_write(addr, byte) {
                return;
            }
        }

        match addr {
            CPU_RAM_START..=CPU_RAM_END => self.cpu_ram[addr % CPU_RAM_LENGTH] = byte,
            PPU_REG_START..=PPU_REG_END => {
                self.ppu_bus
                    .cpu_write_reg(addr, byte, self.cartridge.as_mut())
            }
            _ => {}
        }
    }

    pub fn ppu_read(&self, addr: usize) -> u8 {
        self.ppu_bus.ppu_read(addr, self.cartridge.as_ref())
    }

    pub fn ppu_write(&mut self, addr: usize, byte: u8) {
        self.ppu_bus.ppu_write(addr, byte, self.cartridge.as_mut())
    }
}

#[cfg(test)]
impl SystemBus {
    pub fn test_new() -> Self {
        let mut bus = SystemBus::new();
        bus.insert_cartridge(CartridgeNes::test_new());
        bus
    }

    /// Writes a program into PRG-ROM and points the reset vector at it.
    pub fn load_program(&mut self, program: &[u8], at: u16) {
        for (i, byte) in program.iter().enumerate() {
            self.cpu_write(at as usize + i, *byte);
        }

        self.cpu_write(0xFFFC, at as u8);
        self.cpu_write(0xFFFD, (at >> 8) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_ram_is_mirrored_every_2_kib() {
        let mut bus = SystemBus::new();

        bus.cpu_write(0x0042, 0xAB);

        for k in 0..4 {
            assert_eq!(bus.cpu_read(0x0042 + k * 0x0800, false), 0xAB);
        }

        bus.cpu_write(0x1842, 0xCD);
        assert_eq!(bus.cpu_read(0x0042, false), 0xCD);
    }

    #[test]
    fn ppu_registers_are_mirrored_every_8_bytes() {
        let mut bus = SystemBus::new();

        // compose a palette write through a mirror of $2006/$2007
        bus.cpu_write(0x3FF6, 0x3F);
        bus.cpu_write(0x3FF6, 0x00);
        bus.cpu_write(0x3FF7, 0x15);

        assert_eq!(bus.ppu_read(0x3F00), 0x15);

        // write-only and stubbed registers read as zero through any mirror
        for k in [0, 1, 3, 4, 5, 6] {
            assert_eq!(bus.cpu_read(0x2008 + k, false), bus.cpu_read(0x2000 + k, false));
        }
    }

    #[test]
    fn apu_io_range_is_stubbed() {
        let mut bus = SystemBus::new();

        bus.cpu_write(0x4015, 0xFF);
        assert_eq!(bus.cpu_read(0x4015, false), 0);
        assert_eq!(bus.cpu_read(0x4017, false), 0);
    }

    #[test]
    fn reset_without_a_cartridge_seeds_the_reset_vector() {
        let mut bus = SystemBus::new();

        bus.reset();

        assert_eq!(bus.cpu_read(RESET_VECTOR_LO, false), 0x00);
        assert_eq!(bus.cpu_read(RESET_VECTOR_HI, false), 0x80);
    }

    #[test]
    fn cartridge_overrides_the_seeded_reset_vector() {
        let mut bus = SystemBus::test_new();
        bus.load_program(&[0xEA], 0x9000);

        bus.reset();

        assert_eq!(bus.cpu_read(RESET_VECTOR_LO, false), 0x00);
        assert_eq!(bus.cpu_read(RESET_VECTOR_HI, false), 0x90);
    }

    #[test]
    fn undecoded_addresses_read_zero_without_a_cartridge() {
        let mut bus = SystemBus::new();

        bus.cpu_write(0x8000, 0xFF);
        assert_eq!(bus.cpu_read(0x8000, false), 0);
        assert_eq!(bus.cpu_read(0x4018, false), 0);
    }

    #[test]
    fn cartridge_claims_prg_range_ahead_of_other_responders() {
        let mut bus = SystemBus::test_new();

        bus.cpu_write(0x8000, 0x42);
        assert_eq!(bus.cpu_read(0x8000, false), 0x42);

        // single mapped range: RAM stays untouched by PRG writes
        assert_eq!(bus.cpu_read(0x0000, false), 0x00);
    }
}
