use std::collections::BTreeMap;

use crate::bus::SystemBus;

use super::opcode::{AddrMode, FALLBACK_NOP, OPCODES_LOOKUP};

/// Renders the instructions in `[start, end)` as one text line per
/// instruction, keyed by the instruction's starting address.
///
/// All fetches go through the read-only bus path, so walking a range that
/// overlaps the PPU register window never perturbs emulation state.
pub fn disassemble(bus: &mut SystemBus, start: u32, end: u32) -> BTreeMap<u16, String> {
    let mut listing = BTreeMap::new();
    let mut addr = start;

    while addr < end {
        let line_addr = addr as u16;

        let opcode = bus.cpu_read(addr as usize & 0xFFFF, true);
        addr += 1;

        let op = match OPCODES_LOOKUP.get(&opcode) {
            Some(op) => *op,
            None => &*FALLBACK_NOP,
        };

        let mut next_byte = |addr: &mut u32| -> u8 {
            let byte = bus.cpu_read(*addr as usize & 0xFFFF, true);
            *addr += 1;
            byte
        };

        let text = match op.addr_mode {
            AddrMode::IMP => {
                format!("{:04X}: {:?} (IMP)", line_addr, op.instr)
            }
            AddrMode::ACC => {
                format!("{:04X}: {:?} (ACC)", line_addr, op.instr)
            }
            AddrMode::IMM => {
                let value = next_byte(&mut addr);
                format!("{:04X}: {:?} #${:02X} (IMM)", line_addr, op.instr, value)
            }
            AddrMode::ZPG => {
                let lo = next_byte(&mut addr);
                format!("{:04X}: {:?} ${:02X} (ZPG)", line_addr, op.instr, lo)
            }
            AddrMode::ZPX => {
                let lo = next_byte(&mut addr);
                format!("{:04X}: {:?} ${:02X}, X (ZPX)", line_addr, op.instr, lo)
            }
            AddrMode::ZPY => {
                let lo = next_byte(&mut addr);
                format!("{:04X}: {:?} ${:02X}, Y (ZPY)", line_addr, op.instr, lo)
            }
            AddrMode::REL => {
                let offset = next_byte(&mut addr);
                let target = (addr as u16).wrapping_add((offset as i8) as u16);
                format!(
                    "{:04X}: {:?} ${:02X} [${:04X}] (REL)",
                    line_addr, op.instr, offset, target
                )
            }
            AddrMode::ABS => {
                let lo = next_byte(&mut addr) as u16;
                let hi = next_byte(&mut addr) as u16;
                format!("{:04X}: {:?} ${:04X} (ABS)", line_addr, op.instr, (hi << 8) | lo)
            }
            AddrMode::ABX => {
                let lo = next_byte(&mut addr) as u16;
                let hi = next_byte(&mut addr) as u16;
                format!(
                    "{:04X}: {:?} ${:04X}, X (ABX)",
                    line_addr, op.instr, (hi << 8) | lo
                )
            }
            AddrMode::ABY => {
                let lo = next_byte(&mut addr) as u16;
                let hi = next_byte(&mut addr) as u16;
                format!(
                    "{:04X}: {:?} ${:04X}, Y (ABY)",
                    line_addr, op.instr, (hi << 8) | lo
                )
            }
            AddrMode::IND => {
                let lo = next_byte(&mut addr) as u16;
                let hi = next_byte(&mut addr) as u16;
                format!("{:04X}: {:?} #${:04X} (IND)", line_addr, op.instr, (hi << 8) | lo)
            }
            AddrMode::INX => {
                let lo = next_byte(&mut addr);
                format!("{:04X}: {:?} (${:02X}, X) (INX)", line_addr, op.instr, lo)
            }
            AddrMode::INY => {
                let lo = next_byte(&mut addr);
                format!("{:04X}: {:?} (${:02X}), Y (INY)", line_addr, op.instr, lo)
            }
        };

        listing.insert(line_addr, text);
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SystemBus;

    #[test]
    fn renders_one_line_per_instruction() {
        let mut bus = SystemBus::test_new();
        bus.load_program(
            &[
                0xA2, 0x0A, // LDX #$0A
                0x8E, 0x00, 0x00, // STX $0000
                0xD0, 0xFA, // BNE -6
                0x6C, 0xFF, 0x12, // JMP ($12FF)
                0xEA, // NOP
            ],
            0x8000,
        );

        let listing = disassemble(&mut bus, 0x8000, 0x800B);

        assert_eq!(listing[&0x8000], "8000: LDX #$0A (IMM)");
        assert_eq!(listing[&0x8002], "8002: STX $0000 (ABS)");
        assert_eq!(listing[&0x8005], "8005: BNE $FA [$8001] (REL)");
        assert_eq!(listing[&0x8007], "8007: JMP #$12FF (IND)");
        assert_eq!(listing[&0x800A], "800A: NOP (IMP)");
        assert_eq!(listing.len(), 5);
    }

    #[test]
    fn keys_are_instruction_start_addresses() {
        let mut bus = SystemBus::test_new();
        bus.load_program(&[0xAD, 0x02, 0x20, 0xEA], 0x8000);

        let listing = disassemble(&mut bus, 0x8000, 0x8004);

        assert!(listing.contains_key(&0x8000));
        assert!(!listing.contains_key(&0x8001));
        assert!(listing.contains_key(&0x8003));
    }

    #[test]
    fn undocumented_bytes_render_as_nop() {
        let mut bus = SystemBus::test_new();
        bus.load_program(&[0x02], 0x8000);

        let listing = disassemble(&mut bus, 0x8000, 0x8001);
        assert_eq!(listing[&0x8000], "8000: NOP (IMP)");
    }

    #[test]
    fn walking_the_register_window_leaves_ppu_state_alone() {
        let mut bus = SystemBus::new();

        // leave the shared latch mid-protocol, then walk over $2002
        bus.cpu_write(0x2006, 0x21);
        disassemble(&mut bus, 0x2000, 0x2008);

        // a second $2006 write must still land in the low byte
        bus.cpu_write(0x2006, 0x34);
        bus.cpu_write(0x2007, 0x55);
        assert_eq!(bus.ppu_read(0x2134), 0x55);
    }
}
