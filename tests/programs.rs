use std::sync::Arc;

use chip8_vm::driver::Driver;
use chip8_vm::interpreter::error::{Error, FaultKind};
use chip8_vm::interpreter::keypad::Keypad;
use chip8_vm::interpreter::memory::{Memory, MAX_PROGRAM_SIZE};
use chip8_vm::interpreter::state::Register;
use chip8_vm::interpreter::timer::SystemClock;
use chip8_vm::interpreter::{Config, Interpreter};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn boot(program: &[u8]) -> Result<Driver<StdRng, SystemClock>, Error> {
    let memory = Memory::with_program(program)?;
    let interpreter = Interpreter::new(Config::default(), memory, StdRng::seed_from_u64(42));
    Ok(Driver::new(interpreter, SystemClock, Arc::new(Keypad::new())))
}

#[test]
fn add_then_return_underflows() -> Result<(), Error> {
    let mut d = boot(&[0x60, 0x05, 0x70, 0x03, 0x00, 0xEE])?;
    let err = d.run().unwrap_err();
    assert_eq!(
        err,
        Error::Fault {
            pc: 0x204,
            opcode: 0x00EE,
            kind: FaultKind::StackUnderflow
        }
    );
    assert_eq!(d.state().v[0], 0x08);
    assert_eq!(d.state().pc, 0x204);
    assert!(d.state().halted);
    Ok(())
}

#[test]
fn subroutine_round_trip() -> Result<(), Error> {
    #[rustfmt::skip]
    let program = [
        0x22, 0x06, // 200: CALL 0x206
        0x61, 0x02, // 202: LD V1, 0x02
        0x12, 0x04, // 204: JP 0x204
        0x60, 0x01, // 206: LD V0, 0x01
        0x00, 0xEE, // 208: RET
    ];
    let mut d = boot(&program)?;
    d.run_for(4)?;
    assert_eq!(d.state().pc, 0x204);
    assert_eq!(d.state().sp, 0);
    assert_eq!(d.state().v[0], 1);
    assert_eq!(d.state().v[1], 2);
    Ok(())
}

#[test]
fn bcd_digits_drawn_with_font() -> Result<(), Error> {
    #[rustfmt::skip]
    let program = [
        0x60, 0x9C, // LD V0, 156
        0xA3, 0x00, // LD I, 0x300
        0xF0, 0x33, // LD B, V0
        0xF2, 0x65, // LD V2, [I]
        0xF0, 0x29, // LD F, V0 (V0 now holds the hundreds digit)
        0x63, 0x00, // LD V3, 0
        0xD3, 0x35, // DRW V3, V3, 5
        0x12, 0x0E, // JP 0x20E
    ];
    let mut d = boot(&program)?;
    d.run_for(8)?;

    let s = d.state();
    assert_eq!(&s.v[..3], &[1, 5, 6]);
    assert_eq!(s.i, 5);
    assert_eq!(s.get(Register::new(0xF)), 0);
    // glyph 1 is 0x20 0x60 0x20 0x20 0x70
    assert_eq!(d.interpreter().display().lit(), 8);
    assert!(d.interpreter().display().get(2, 0));
    Ok(())
}

#[test]
fn carry_chain_counts_past_a_byte() -> Result<(), Error> {
    #[rustfmt::skip]
    let program = [
        0x61, 0x01, // 200: LD V1, 1
        0x80, 0x14, // 202: ADD V0, V1
        0x3F, 0x01, // 204: SE VF, 1
        0x12, 0x02, // 206: JP 0x202
        0x12, 0x08, // 208: JP 0x208
    ];
    let mut d = boot(&program)?;
    d.run_for(1 + 256 * 3)?;
    assert_eq!(d.state().pc, 0x208);
    assert_eq!(d.state().v[0], 0);
    Ok(())
}

#[test]
fn oversized_image_is_rejected_at_load() {
    let image = vec![0u8; MAX_PROGRAM_SIZE + 16];
    assert!(matches!(
        boot(&image),
        Err(Error::ProgramTooLarge { size, .. }) if size == MAX_PROGRAM_SIZE + 16
    ));
}
