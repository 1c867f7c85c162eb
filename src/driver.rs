use std::sync::mpsc::Sender;
use std::sync::Arc;

use log::{error, info, trace};
use rand::Rng;

use crate::interpreter::error::Error;
use crate::interpreter::instruction::Instruction;
use crate::interpreter::keypad::Keypad;
use crate::interpreter::state::State;
use crate::interpreter::timer::{Clock, Timers};
use crate::interpreter::Interpreter;

/// Receives every instruction the driver is about to execute.
pub trait TraceSink {
    fn record(&mut self, pc: u16, inst: &Instruction);
}

/// Writes the disassembly trace to the log at trace level.
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, pc: u16, inst: &Instruction) {
        trace!("{:03x}: {}", pc, inst);
    }
}

impl TraceSink for Sender<(u16, String)> {
    fn record(&mut self, pc: u16, inst: &Instruction) {
        // a dropped receiver just means nobody is listening any more
        let _ = self.send((pc, inst.to_string()));
    }
}

/// Runs the machine: one timer update and one instruction per iteration,
/// until something halts it.
pub struct Driver<R, C> {
    interpreter: Interpreter<R>,
    state: State,
    timers: Timers,
    clock: C,
    keypad: Arc<Keypad>,
    trace: Option<Box<dyn TraceSink + Send>>,
}

impl<R: Rng, C: Clock> Driver<R, C> {
    pub fn new(interpreter: Interpreter<R>, clock: C, keypad: Arc<Keypad>) -> Driver<R, C> {
        let timers = Timers::new(clock.now());
        Driver {
            interpreter,
            state: State::default(),
            timers,
            clock,
            keypad,
            trace: None,
        }
    }

    pub fn set_trace(&mut self, sink: Box<dyn TraceSink + Send>) {
        self.trace = Some(sink);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn interpreter(&self) -> &Interpreter<R> {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter<R> {
        &mut self.interpreter
    }

    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    /// External stop request.
    pub fn halt(&mut self) {
        if !self.state.halted {
            info!("HALT at {:03x}", self.state.pc);
        }
        self.state.halted = true;
    }

    /// Updates the timers if due, then fetches, decodes and executes one
    /// instruction. Any fault halts the machine and is returned.
    pub fn run_iteration(&mut self) -> Result<(), Error> {
        if self.state.halted {
            return Ok(());
        }

        self.timers = self.timers.advance(self.clock.now());
        let keys = self.keypad.snapshot();

        let pc = self.state.pc;
        let next = self.interpreter.fetch(pc).and_then(|(opcode, inst)| {
            if let Some(sink) = self.trace.as_mut() {
                sink.record(pc, &inst);
            }
            self.interpreter
                .execute(inst, self.state, &mut self.timers, &keys)
                .map_err(|kind| kind.at(pc, opcode))
        });

        match next {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                self.state.halted = true;
                Err(e)
            }
        }
    }

    /// Runs until the machine halts.
    pub fn run(&mut self) -> Result<(), Error> {
        while !self.state.halted {
            self.run_iteration()?;
        }
        Ok(())
    }

    /// Runs iterations without delay until the timers next count down or the
    /// machine halts. Returns how many ran.
    pub fn run_until_tick(&mut self) -> Result<u64, Error> {
        let last = self.timers.last_update;
        let mut count = 0;
        while !self.state.halted {
            self.run_iteration()?;
            count += 1;
            if self.timers.last_update != last {
                break;
            }
        }
        Ok(count)
    }

    /// Runs at most `max` iterations, then halts. Returns how many ran.
    pub fn run_for(&mut self, max: u64) -> Result<u64, Error> {
        let mut count = 0;
        while count < max && !self.state.halted {
            self.run_iteration()?;
            count += 1;
        }
        self.halt();
        Ok(count)
    }
}
