use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::buffer::Buffer;
use crate::error::{Error, Fault};
use crate::font::{self, FONTSET, FONT_BASE};
use crate::opcode::{self, Instruction};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub const SCREEN_SIZE: usize = WIDTH * HEIGHT;

/// VF doubles as carry, borrow and collision flag
const FLAG: u8 = 0xF;

pub struct Chip8 {
    opcode: u16,
    memory: Buffer<u8, MEMORY_SIZE>,
    vr: Buffer<u8, REGISTER_COUNT>,
    ir: u16,
    pc: u16,
    gfx: Buffer<bool, SCREEN_SIZE>,
    delay_timer: u8,
    sound_timer: u8,
    stack: Buffer<u16, STACK_SIZE>,
    sp: u16,
    key: Buffer<bool, KEY_COUNT>,
    draw_flag: bool,
    rng: Box<dyn RngCore>,
}

impl Chip8 {
    /// A machine whose random source is seeded once from the OS.
    pub fn new() -> Self {
        Chip8::with_rng(Box::new(StdRng::from_entropy()))
    }

    /// A machine with a reproducible random sequence.
    pub fn with_seed(seed: u64) -> Self {
        Chip8::with_rng(Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        // load fontset
        let mut memory: Buffer<u8, MEMORY_SIZE> = Buffer::new();
        for (i, byte) in FONTSET.iter().enumerate() {
            memory[usize::from(FONT_BASE) + i] = *byte;
        }

        Chip8 {
            opcode: 0,
            memory,
            vr: Buffer::new(),
            ir: 0,
            pc: PROGRAM_START,
            gfx: Buffer::new(),
            delay_timer: 0,
            sound_timer: 0,
            stack: Buffer::new(),
            sp: 0,
            key: Buffer::new(),
            draw_flag: false,
            rng,
        }
    }

    /// Copies a program verbatim to 0x200. Nothing is written if it does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        let target = self
            .memory
            .slice_mut(usize::from(PROGRAM_START), program.len())
            .ok_or(Error::RomTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            })?;
        target.copy_from_slice(program);
        log::info!("loaded {} byte program at {:#05X}", program.len(), PROGRAM_START);
        Ok(())
    }

    /// One fetch, decode, execute and timer tick. Faults reject the offending
    /// instruction and are only logged; the timers tick regardless.
    pub fn emulate_cycle(&mut self) {
        match self.fetch() {
            Ok(opcode) => {
                self.opcode = opcode;
                self.pc += 2;

                let instruction = opcode::decode(opcode);
                log::trace!("{:#05X}: {:04X} {:?}", self.pc - 2, opcode, instruction);
                if let Err(fault) = self.execute(instruction) {
                    log::warn!("{:04X} rejected: {}", opcode, fault);
                }
            }
            Err(fault) => log::warn!("fetch rejected: {}", fault),
        }

        // update timers
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    fn fetch(&self) -> Result<u16, Fault> {
        let bytes = self.read_range(self.pc, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        match instruction {
            Instruction::Null => {
                log::trace!("null operation {:04X}", self.opcode);
            }
            Instruction::ClearDisplay => {
                self.gfx.fill(false);
                self.draw_flag = true;
            }
            Instruction::Return => {
                if self.sp == 0 {
                    return Err(Fault::StackUnderflow { pc: self.pc - 2 });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            Instruction::Jump { nnn } => self.pc = nnn,
            Instruction::Call { nnn } => {
                if usize::from(self.sp) == STACK_SIZE {
                    return Err(Fault::StackOverflow { pc: self.pc - 2 });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            Instruction::SkipEqImm { x, kk } => self.skip_if(self.vr[x] == kk),
            Instruction::SkipNeImm { x, kk } => self.skip_if(self.vr[x] != kk),
            Instruction::SkipEqReg { x, y } => self.skip_if(self.vr[x] == self.vr[y]),
            Instruction::SkipNeReg { x, y } => self.skip_if(self.vr[x] != self.vr[y]),
            Instruction::LoadImm { x, kk } => self.vr[x] = kk,
            // no carry out of an immediate add
            Instruction::AddImm { x, kk } => self.vr[x] = self.vr[x].wrapping_add(kk),
            Instruction::Copy { x, y } => self.vr[x] = self.vr[y],
            Instruction::Or { x, y } => self.vr[x] |= self.vr[y],
            Instruction::And { x, y } => self.vr[x] &= self.vr[y],
            Instruction::Xor { x, y } => self.vr[x] ^= self.vr[y],
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.vr[x].overflowing_add(self.vr[y]);
                self.set_with_flag(x, sum, carry);
            }
            Instruction::Sub { x, y } => {
                let (vx, vy) = (self.vr[x], self.vr[y]);
                self.set_flag_then(x, vx.wrapping_sub(vy), vx > vy);
            }
            Instruction::SubReverse { x, y } => {
                let (vx, vy) = (self.vr[x], self.vr[y]);
                self.set_flag_then(x, vy.wrapping_sub(vx), vy > vx);
            }
            Instruction::ShiftRight { x } => {
                let vx = self.vr[x];
                self.set_with_flag(x, vx >> 1, vx & 0x01 != 0);
            }
            Instruction::ShiftLeft { x } => {
                let vx = self.vr[x];
                self.set_with_flag(x, vx << 1, vx & 0x80 != 0);
            }
            Instruction::LoadIndex { nnn } => self.ir = nnn,
            Instruction::JumpOffset { nnn } => self.pc = nnn + u16::from(self.vr[0u8]),
            Instruction::Random { x, kk } => {
                let random_number: u8 = self.rng.gen();
                self.vr[x] = random_number & kk;
            }
            Instruction::Draw { x, y, n } => self.draw_sprite(x, y, n)?,
            Instruction::SkipKeyPressed { x } => {
                let pressed = self.key_state(self.vr[x])?;
                self.skip_if(pressed);
            }
            Instruction::SkipKeyNotPressed { x } => {
                let pressed = self.key_state(self.vr[x])?;
                self.skip_if(!pressed);
            }
            Instruction::LoadDelay { x } => self.vr[x] = self.delay_timer,
            Instruction::WaitKey { x } => match self.first_pressed_key() {
                Some(key) => self.vr[x] = key,
                // run this instruction again next cycle
                None => self.pc -= 2,
            },
            Instruction::SetDelay { x } => self.delay_timer = self.vr[x],
            Instruction::SetSound { x } => self.sound_timer = self.vr[x],
            Instruction::AddIndex { x } => self.ir = self.ir.wrapping_add(u16::from(self.vr[x])),
            Instruction::LoadGlyph { x } => self.ir = font::glyph_address(self.vr[x]),
            Instruction::StoreBcd { x } => {
                let value = self.vr[x];
                let digits = self.write_range(self.ir, 3)?;
                digits[0] = value / 100;
                digits[1] = (value % 100) / 10;
                digits[2] = value % 10;
            }
            // V0 through Vx inclusive; I is left alone
            Instruction::StoreRegisters { x } => {
                let (ir, count) = (self.ir, usize::from(x) + 1);
                let registers = self.vr.slice(0, count).unwrap_or_default();
                let target = self
                    .memory
                    .slice_mut(usize::from(ir), count)
                    .ok_or_else(|| out_of_bounds(ir))?;
                target.copy_from_slice(registers);
            }
            Instruction::LoadRegisters { x } => {
                let (ir, count) = (self.ir, usize::from(x) + 1);
                let source = self
                    .memory
                    .slice(usize::from(ir), count)
                    .ok_or_else(|| out_of_bounds(ir))?;
                if let Some(registers) = self.vr.slice_mut(0, count) {
                    registers.copy_from_slice(source);
                }
            }
        }
        Ok(())
    }

    /// XORs an `n`-row sprite from memory at I onto the screen. The origin
    /// wraps around the screen; pixels past the right or bottom edge are
    /// clipped. VF ends up 1 iff any lit pixel was turned off.
    fn draw_sprite(&mut self, x: u8, y: u8, height: u8) -> Result<(), Fault> {
        let ir = self.ir;
        let sprite = self
            .memory
            .slice(usize::from(ir), usize::from(height))
            .ok_or_else(|| out_of_bounds(ir))?;
        let origin_x = usize::from(self.vr[x]) % WIDTH;
        let origin_y = usize::from(self.vr[y]) % HEIGHT;

        let mut collision = false;
        for (yline, &pixel) in sprite.iter().enumerate() {
            let row = origin_y + yline;
            if row >= HEIGHT {
                break;
            }
            for xline in 0..8 {
                let col = origin_x + xline;
                if col >= WIDTH {
                    break;
                }
                if pixel & (0x80u8 >> xline) != 0 {
                    let pos = row * WIDTH + col;
                    if self.gfx[pos] {
                        collision = true;
                    }
                    self.gfx[pos] ^= true;
                }
            }
        }

        if collision {
            log::debug!("sprite collision at ({}, {})", origin_x, origin_y);
        }
        self.vr[FLAG] = u8::from(collision);
        self.draw_flag = true;
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc += 2;
        }
    }

    /// Result first, flag second, so VF reports the flag even when x is F.
    fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.vr[x] = value;
        self.vr[FLAG] = u8::from(flag);
    }

    /// Flag first, result second, so VF keeps the difference when x is F.
    fn set_flag_then(&mut self, x: u8, value: u8, flag: bool) {
        self.vr[FLAG] = u8::from(flag);
        self.vr[x] = value;
    }

    fn key_state(&self, key: u8) -> Result<bool, Fault> {
        if usize::from(key) >= KEY_COUNT {
            return Err(Fault::KeyOutOfRange { key });
        }
        Ok(self.key[key])
    }

    fn first_pressed_key(&self) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|&k| self.key[k])
    }

    fn read_range(&self, address: u16, len: usize) -> Result<&[u8], Fault> {
        self.memory
            .slice(usize::from(address), len)
            .ok_or_else(|| out_of_bounds(address))
    }

    fn write_range(&mut self, address: u16, len: usize) -> Result<&mut [u8], Fault> {
        self.memory
            .slice_mut(usize::from(address), len)
            .ok_or_else(|| out_of_bounds(address))
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if usize::from(key) < KEY_COUNT {
            self.key[key] = pressed;
        } else {
            log::warn!("ignoring key {:#04X}, keypad only has {} keys", key, KEY_COUNT);
        }
    }

    pub fn key(&self, key: u8) -> bool {
        usize::from(key) < KEY_COUNT && self.key[key]
    }

    pub fn keypad(&self) -> &[bool] {
        self.key.as_slice()
    }

    /// Row-major, `WIDTH * HEIGHT` cells.
    pub fn framebuffer(&self) -> &[bool] {
        self.gfx.as_slice()
    }

    /// Off-screen cells read as unlit.
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < HEIGHT && col < WIDTH && self.gfx[row * WIDTH + col]
    }

    /// Set by clear and draw until the host has presented the frame.
    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn clear_draw_flag(&mut self) {
        self.draw_flag = false;
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.ir
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn register(&self, x: u8) -> u8 {
        self.vr[x]
    }

    pub fn registers(&self) -> &[u8] {
        self.vr.as_slice()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self, address: u16) -> Option<u8> {
        self.memory.as_slice().get(usize::from(address)).copied()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}

/// The first address a range starting at `start` cannot reach.
fn out_of_bounds(start: u16) -> Fault {
    Fault::MemoryOutOfBounds {
        address: usize::from(start).max(MEMORY_SIZE),
    }
}
