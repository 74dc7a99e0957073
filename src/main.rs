use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use chip8::{rom, Chip8};

use crate::ui::Presenter;

mod ui;

#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "Runs a CHIP-8 program in an SDL window")]
struct Args {
    #[arg(help = "ROM file to load")]
    rom: PathBuf,

    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=64),
        help = "Window pixels per CHIP-8 pixel"
    )]
    scale: u32,

    #[arg(long, help = "Seed the random number generator for a reproducible run")]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let program = rom::read(&args.rom)?;
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    chip8.load_program(&program)?;

    log::info!("running {}", args.rom.display());
    Presenter::new(chip8, args.scale).event_loop()?;
    Ok(())
}
