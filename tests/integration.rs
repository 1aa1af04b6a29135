//! End-to-end scenarios driven through the public core API, using real iNES
//! images built in memory.

use nescore::{CartridgeNes, Flag, NesCore, DISPLAY_PALETTE};

const PRG_SIZE: usize = 0x8000;
const CHR_SIZE: usize = 0x2000;

/// A 32 KiB NROM image with `program` at `$8000` and the reset vector
/// pointing at it.
fn rom_with_program(program: &[u8]) -> Vec<u8> {
    let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
    image.resize(16, 0);

    let mut prg = vec![0u8; PRG_SIZE];
    prg[..program.len()].copy_from_slice(program);
    prg[0x7FFC] = 0x00;
    prg[0x7FFD] = 0x80;

    image.extend_from_slice(&prg);
    image.extend_from_slice(&[0u8; CHR_SIZE]);
    image
}

fn core_with_program(program: &[u8]) -> NesCore {
    let cartridge = CartridgeNes::from_ines_bytes(&rom_with_program(program)).unwrap();

    let mut core = NesCore::new();
    core.insert_cartridge(cartridge);
    core
}

#[test]
fn multiply_by_repeated_addition() {
    let mut core = core_with_program(&[
        0xA2, 0x0A, // LDX #10
        0x8E, 0x00, 0x00, // STX $0000
        0xA2, 0x03, // LDX #3
        0x8E, 0x01, 0x00, // STX $0001
        0xAC, 0x00, 0x00, // LDY $0000
        0xA9, 0x00, // LDA #0
        0x38, // SEC
        0x18, // CLC
        0x6D, 0x01, 0x00, // ADC $0001
        0x88, // DEY
        0xD0, 0xFA, // BNE back to the ADC
        0x8D, 0x02, 0x00, // STA $0002
        0xEA, 0xEA, 0xEA,
    ]);

    let mut guard = 0;
    while core.cpu().program_counter != 0x801A && guard < 500 {
        core.step_cpu_instruction();
        guard += 1;
    }

    assert_eq!(core.cpu_read(0x0002, true), 30);
}

#[test]
fn flag_set_clear_round_trip() {
    let mut core = core_with_program(&[0x38, 0x18, 0xF8, 0xD8, 0x78, 0x58, 0xB8]);

    for _ in 0..7 {
        core.step_cpu_instruction();
    }

    let cpu = core.cpu();
    let mask = Flag::C.mask() | Flag::D.mask() | Flag::I.mask() | Flag::V.mask();
    assert_eq!(cpu.processor_status & mask, 0);
}

#[test]
fn jsr_rts_round_trip() {
    let mut core = core_with_program(&[
        0x20, 0x07, 0x80, // JSR $8007
        0x00, 0x00, 0x00, 0x00,
        0x60, // RTS
    ]);
    let initial_sp = core.cpu().stack_pointer;

    core.step_cpu_instruction();
    assert_eq!(core.cpu().program_counter, 0x8007);

    core.step_cpu_instruction();
    assert_eq!(core.cpu().program_counter, 0x8003);
    assert_eq!(core.cpu().stack_pointer, initial_sp);
}

#[test]
fn indirect_jmp_takes_the_wrapped_high_byte() {
    let mut core = core_with_program(&[0x6C, 0xFF, 0x12]); // JMP ($12FF)

    core.cpu_write(0x12FF, 0x34);
    core.cpu_write(0x1200, 0x12);
    core.cpu_write(0x1300, 0xAA);

    core.step_cpu_instruction();
    assert_eq!(core.cpu().program_counter, 0x1234);
}

#[test]
fn a_full_frame_of_master_clocks_wraps_the_raster() {
    let mut core = core_with_program(&[0x4C, 0x00, 0x80]); // JMP $8000

    let mut completions = 0;
    let mut was_complete = false;
    for _ in 0..(341 * 261) {
        core.clock();

        if core.ppu().frame_complete() && !was_complete {
            completions += 1;
        }
        was_complete = core.ppu().frame_complete();
    }

    assert_eq!(completions, 1);
    assert_eq!(core.ppu().dot, 0);
    assert_eq!(core.ppu().scanline, 0);
}

#[test]
fn step_ppu_frame_finishes_the_pending_instruction() {
    let mut core = core_with_program(&[0x4C, 0x00, 0x80]); // JMP $8000

    core.step_ppu_frame();

    assert!(!core.ppu().frame_complete());
    assert!(core.cpu().cycle_complete());
    assert!(core.system_clock() >= 341 * 261);
}

#[test]
fn frame_pixels_come_from_the_noise_palette_entries() {
    let mut core = core_with_program(&[0x4C, 0x00, 0x80]);
    core.set_noise_seed(1);

    core.step_ppu_frame();

    for pixel in core.ppu().frame().iter() {
        assert!(*pixel == DISPLAY_PALETTE[0x3F] || *pixel == DISPLAY_PALETTE[0x30]);
    }
}

#[test]
fn ram_and_ppu_register_mirroring() {
    let mut core = core_with_program(&[0x4C, 0x00, 0x80]);

    core.cpu_write(0x0040, 0x5A);
    for k in 0..4u16 {
        assert_eq!(core.cpu_read(0x0040 + k * 0x0800, true), 0x5A);
    }

    // palette write composed entirely through mirrored PPU registers
    core.cpu_write(0x3FF6, 0x3F);
    core.cpu_write(0x3FF6, 0x01);
    core.cpu_write(0x3FF7, 0x2C);
    assert_eq!(core.bus().ppu_read(0x3F01), 0x2C);
}

#[test]
fn palette_mirror_writes_land_on_the_backdrop_entries() {
    let mut core = core_with_program(&[0x4C, 0x00, 0x80]);

    core.cpu_write(0x2006, 0x3F);
    core.cpu_write(0x2006, 0x10);
    core.cpu_write(0x2007, 0x21);

    assert_eq!(core.bus().ppu_read(0x3F00), 0x21);
}

#[test]
fn disassembly_is_keyed_by_instruction_address() {
    let core = core_with_program(&[
        0xA2, 0x0A, // LDX #$0A
        0x8E, 0x00, 0x00, // STX $0000
    ]);

    let listing = core.disassembly();
    assert_eq!(listing[&0x8000], "8000: LDX #$0A (IMM)");
    assert_eq!(listing[&0x8002], "8002: STX $0000 (ABS)");
    assert!(!listing.contains_key(&0x8001));
}

#[test]
fn reset_restores_the_documented_power_on_state() {
    let mut core = core_with_program(&[0xA9, 0x42, 0x4C, 0x02, 0x80]);

    core.step_cpu_instruction();
    assert_eq!(core.cpu().accumulator, 0x42);

    core.reset();
    let cpu = core.cpu();
    assert_eq!(cpu.accumulator, 0);
    assert_eq!(cpu.stack_pointer, 0xFD);
    assert_eq!(cpu.processor_status, Flag::U.mask());
    assert_eq!(cpu.program_counter, 0x8000);
    assert_eq!(core.system_clock(), 0);
}
