use std::thread;
use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use chip8::{Chip8, Error, HEIGHT, WIDTH};

static BLACK: Color = Color::RGB(0, 0, 0);
static WHITE: Color = Color::RGB(255, 255, 255);

/// about 500 cycles a second; timers tick once per cycle
const CYCLE_DELAY: Duration = Duration::from_millis(2);

pub struct Presenter {
    chip8: Chip8,
    scale: u32,
}

impl Presenter {
    pub fn new(chip8: Chip8, scale: u32) -> Self {
        Presenter { chip8, scale }
    }

    pub fn event_loop(&mut self) -> Result<(), Error> {
        let sdl_context = sdl2::init().map_err(Error::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(Error::Sdl)?;

        let window = video_subsystem
            .window(
                "chip8",
                self.scale * WIDTH as u32,
                self.scale * HEIGHT as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| Error::Sdl(e.to_string()))?;

        let mut canvas = window
            .into_canvas()
            .build()
            .map_err(|e| Error::Sdl(e.to_string()))?;

        let mut event_pump = sdl_context.event_pump().map_err(Error::Sdl)?;

        'running: loop {
            // the keypad has to be current before the next cycle reads it
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => {
                        break 'running;
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => self.press(keycode, true),
                    Event::KeyUp {
                        keycode: Some(keycode), ..
                    } => self.press(keycode, false),
                    _ => {}
                }
            }

            self.chip8.emulate_cycle();
            if self.chip8.draw_flag() {
                self.draw_graphics(&mut canvas)?;
                self.chip8.clear_draw_flag();
            }

            thread::sleep(CYCLE_DELAY);
        }

        log::info!("window closed");
        Ok(())
    }

    fn press(&mut self, keycode: Keycode, pressed: bool) {
        if let Some(chip_key_code) = key_to_code(keycode) {
            self.chip8.set_key(chip_key_code, pressed)
        }
    }

    fn draw_graphics(&self, canvas: &mut Canvas<Window>) -> Result<(), Error> {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let color = if self.chip8.is_set(row, col) {
                    WHITE
                } else {
                    BLACK
                };
                canvas.set_draw_color(color);
                let rectangle = Rect::new(
                    (col * self.scale as usize) as i32,
                    (row * self.scale as usize) as i32,
                    self.scale,
                    self.scale,
                );
                canvas.fill_rect(rectangle).map_err(Error::Sdl)?;
            }
        }
        canvas.present();
        Ok(())
    }
}

/// 1 2 3 4 / Q W E R / A S D F / Z X C V onto the hex keypad
/// 1 2 3 C / 4 5 6 D / 7 8 9 E / A 0 B F
fn key_to_code(keycode: Keycode) -> Option<u8> {
    match keycode {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_keypad_once() {
        #[rustfmt::skip]
        let keys = [
            Keycode::Num1, Keycode::Num2, Keycode::Num3, Keycode::Num4,
            Keycode::Q, Keycode::W, Keycode::E, Keycode::R,
            Keycode::A, Keycode::S, Keycode::D, Keycode::F,
            Keycode::Z, Keycode::X, Keycode::C, Keycode::V,
        ];
        let mut seen = [false; 16];
        for key in keys.iter() {
            let code = key_to_code(*key).unwrap();
            assert!(!seen[usize::from(code)], "{:?} maps to a taken key", key);
            seen[usize::from(code)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(key_to_code(Keycode::Space), None);
        assert_eq!(key_to_code(Keycode::Escape), None);
    }
}
