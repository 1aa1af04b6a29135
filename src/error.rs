use thiserror::Error;

/// Failures raised while constructing a cartridge from an iNES image.
///
/// Nothing past construction can fail: guest faults (open-bus reads, stack
/// wraps, unknown opcodes) are absorbed by the emulation itself.
#[derive(Error, Debug)]
pub enum CartridgeError {
    #[error("not an iNES file (bad magic)")]
    InvalidFormat,

    #[error("unsupported iNES mapper {0}")]
    UnsupportedMapper(u8),

    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),
}
