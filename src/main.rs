use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use chip8_vm::driver::{Driver, LogTrace};
use chip8_vm::frontend::Frontend;
use chip8_vm::interpreter::keypad::Keypad;
use chip8_vm::interpreter::memory::Memory;
use chip8_vm::interpreter::timer::SystemClock;
use chip8_vm::interpreter::{Config, Interpreter, ShiftMode};

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program", long_about = None)]
struct Args {
    /// Program image to load at 0x200
    rom: PathBuf,

    /// Shift Vy into Vx for 8xy6/8xyE instead of shifting Vx in place
    #[arg(long)]
    legacy_shift: bool,

    /// Log every executed instruction at trace level (needs RUST_LOG=trace to show)
    #[arg(long)]
    trace: bool,

    /// Run without a window until the machine halts
    #[arg(long)]
    headless: bool,

    /// Stop a headless run after this many iterations
    #[arg(long, requires = "headless")]
    max_iterations: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read {}", args.rom.display()))?;
    info!("READ ROM {}", args.rom.display());
    info!("ROM SIZE: {}", rom.len());

    let memory = Memory::with_program(&rom).context("failed to load ROM")?;
    info!("LOADED ROM");

    let config = Config {
        shift: if args.legacy_shift {
            ShiftMode::Legacy
        } else {
            ShiftMode::Modern
        },
    };
    let interpreter = Interpreter::new(config, memory, StdRng::from_entropy());
    let keypad = Arc::new(Keypad::new());
    let mut driver = Driver::new(interpreter, SystemClock, Arc::clone(&keypad));
    if args.trace {
        driver.set_trace(Box::new(LogTrace));
    }

    info!("STARTING CHIP-8");
    if !args.headless {
        // closes the window and exits when the machine halts
        chip8_base::run(Frontend::new(driver, keypad));
    }

    match args.max_iterations {
        Some(max) => {
            let ran = driver.run_for(max)?;
            info!("STOPPED after {} iterations", ran);
        }
        None => driver.run()?,
    }
    info!(
        "{} pixels lit at pc {:03x}",
        driver.interpreter().display().lit(),
        driver.state().pc
    );

    Ok(())
}
