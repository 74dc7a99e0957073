use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the interpreter from launching.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read ROM {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("SDL error: {0}")]
    Sdl(String),
}

/// A bounds violation raised by a single instruction. The instruction is
/// rejected and the machine carries on with the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("stack overflow: call at {pc:#05X} with a full stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("key {key:#04X} is not on the keypad")]
    KeyOutOfRange { key: u8 },
}
