//! A CHIP-8 interpreter core. The host loads a program, feeds the keypad,
//! calls [`Chip8::emulate_cycle`] at its own pace and presents the framebuffer.

pub mod buffer;
pub mod chip8;
pub mod error;
pub mod font;
pub mod opcode;
pub mod rom;

pub use crate::chip8::{Chip8, HEIGHT, WIDTH};
pub use crate::error::{Error, Fault};
