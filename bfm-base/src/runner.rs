//! Single-step runner
//!
//! Executes a [`Program`] one instruction per [`BFMRunner::step`] call. See
//! [`BFMRunner`] docs for more.

use core::cmp::max;

use tracing::{debug, trace};

use crate::{
    config::{EngineConfig, JumpStrategy},
    error::{Error, Result},
    instruction::Instruction,
    program::{scan_backward, scan_forward, Program},
    vm::VMContext,
};

/// Stepping runner
///
/// # Example
/// ```
/// # use bfm_base::{runner::{BFMRunner, BFMSignal}, program::Program, config::EngineConfig};
/// let program = Program::new("++++++++[>++++++++<-]>+.").unwrap();
///
/// let mut runner = BFMRunner::new(program, EngineConfig::default());
/// let sig = loop {
///     match runner.step().unwrap() {
///         BFMSignal::Continue => {},
///         s => break s,
///     }
/// };
/// assert_eq!(sig, BFMSignal::Data('A'));
/// assert_eq!(runner.step().unwrap(), BFMSignal::Halt);
/// assert_eq!(runner.context.tape.as_slice(), &[0, 65]);
/// ```
#[derive(Debug)]
pub struct BFMRunner {
    pub program: Program,
    pub context: VMContext,
    strategy: JumpStrategy,
    step_limit: Option<u64>,
    steps: u64,
    max_data_ptr: usize,
    halted: bool,
}

/// Type of returned signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BFMSignal {
    /// All ok, go on
    Continue,
    /// Like [`BFMSignal::Continue`], but a character was written to output
    Data(char),
    /// Last instruction executed, nothing left to do
    Halt,
}

/// Counters collected while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Executed instructions, no-ops included.
    pub steps: u64,
    /// Allocated tape cells.
    pub tape_len: usize,
    /// Highest cell the data pointer reached.
    pub max_data_ptr: usize,
}

impl BFMRunner {
    /// Creates new runner with a fresh context.
    pub fn new(program: Program, config: EngineConfig) -> Self {
        Self {
            program,
            context: VMContext::new(config.cell_mode),
            strategy: config.strategy,
            step_limit: config.step_limit,
            steps: 0,
            max_data_ptr: 0,
            halted: false,
        }
    }

    /// Returns `true` once the last instruction has been executed.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            steps: self.steps,
            tape_len: self.context.tape.len(),
            max_data_ptr: self.max_data_ptr,
        }
    }

    /// Execute one instruction and go to next
    ///
    /// Returns [`BFMSignal::Halt`] without executing anything if the program is
    /// empty or already finished.
    ///
    /// # Example usage
    /// ```
    /// # use bfm_base::{runner::*, program::Program, config::EngineConfig};
    /// let mut runner = BFMRunner::new(Program::new("+>").unwrap(), EngineConfig::default());
    ///
    /// assert_eq!(runner.step().unwrap(), BFMSignal::Continue);
    /// assert_eq!(runner.context.tape.get(0), 1);
    /// assert_eq!(runner.step().unwrap(), BFMSignal::Halt);
    /// assert_eq!(runner.context.data_ptr, 1);
    /// ```
    pub fn step(&mut self) -> Result<BFMSignal> {
        if self.halted || self.program.is_empty() {
            self.halted = true;
            return Ok(BFMSignal::Halt);
        }
        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(Error::StepLimitExceeded { limit });
            }
        }

        let pos = self.context.pc;
        let mut data = None;

        match self.program.instruction_at(pos) {
            Some(Instruction::IncPtr) => {
                self.context.move_right();
                self.max_data_ptr = max(self.max_data_ptr, self.context.data_ptr);
            }
            Some(Instruction::DecPtr) => self.context.move_left()?,
            Some(Instruction::IncCell) => {
                self.context.add_cell(1);
            }
            Some(Instruction::DecCell) => {
                self.context.add_cell(-1);
            }
            Some(Instruction::Output) => {
                data = Some(self.context.write_cell()?);
            }
            Some(ins @ Instruction::Input) => {
                return Err(Error::UnimplementedInstruction {
                    instruction: ins.symbol(),
                    position: pos,
                });
            }
            Some(ins @ (Instruction::LoopOpen | Instruction::LoopClose)) => {
                let cell = self.context.get_cell();
                let taken = match ins {
                    Instruction::LoopOpen => cell == 0,
                    _ => cell != 0,
                };
                if taken {
                    let target = self.jump_target(ins, pos)?;
                    trace!(from = pos, to = target, "jump");
                    self.context.pc = target;
                }
            }
            None => {}
        }

        self.steps += 1;

        if self.context.pc + 1 >= self.program.len() {
            self.halted = true;
            debug!(
                steps = self.steps,
                tape_len = self.context.tape.len(),
                "program halted"
            );
            return Ok(data.map_or(BFMSignal::Halt, BFMSignal::Data));
        }
        self.context.pc += 1;

        Ok(data.map_or(BFMSignal::Continue, BFMSignal::Data))
    }

    fn jump_target(&self, ins: Instruction, pos: usize) -> Result<usize> {
        let code = self.program.as_bytes();
        match (self.strategy, ins) {
            (JumpStrategy::Table, _) => {
                self.program
                    .jumps()
                    .get(pos)
                    .ok_or(Error::ProgramCounterOutOfRange {
                        position: pos as isize,
                        len: code.len(),
                    })
            }
            (JumpStrategy::Scan, Instruction::LoopOpen) => scan_forward(code, pos),
            (JumpStrategy::Scan, _) => scan_backward(code, pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CellMode;

    fn runner(code: &str) -> BFMRunner {
        BFMRunner::new(Program::new(code).unwrap(), EngineConfig::default())
    }

    fn drain(runner: &mut BFMRunner) -> Result<()> {
        while runner.step()? != BFMSignal::Halt {}
        Ok(())
    }

    #[test]
    fn single_steps() {
        let mut fwd = runner(">+<.");

        assert_eq!(fwd.step().unwrap(), BFMSignal::Continue);
        assert_eq!((fwd.context.pc, fwd.context.data_ptr), (1, 1));
        assert_eq!(fwd.step().unwrap(), BFMSignal::Continue);
        assert_eq!(fwd.context.tape.as_slice(), &[0, 1]);
        assert_eq!(fwd.step().unwrap(), BFMSignal::Continue);
        assert_eq!(fwd.context.data_ptr, 0);
        assert_eq!(fwd.step().unwrap(), BFMSignal::Data('\0'));
        assert!(fwd.is_halted());
        assert_eq!(fwd.step().unwrap(), BFMSignal::Halt);
        assert_eq!(fwd.stats().steps, 4);
    }

    #[test]
    fn length_one_program() {
        for code in ["+", "x", ">", "."] {
            let mut r = runner(code);
            assert_ne!(r.step().unwrap(), BFMSignal::Continue, "{code}");
            assert!(r.is_halted());
            assert_eq!(r.stats().steps, 1);
        }
    }

    #[test]
    fn empty_program_halts_without_steps() {
        let mut r = runner("");
        assert_eq!(r.step().unwrap(), BFMSignal::Halt);
        assert_eq!(r.stats(), RunStats::default());
    }

    #[test]
    fn loop_body_runs_k_times() {
        for k in 1..=20usize {
            let code = format!("{}[-]", "+".repeat(k));
            let mut r = runner(&code);
            drain(&mut r).unwrap();

            assert_eq!(r.context.tape.get(0), 0);
            // k increments, then `[` once plus `-` and `]` per iteration
            assert_eq!(r.stats().steps, (k + 1 + 2 * k) as u64, "k = {k}");
        }
    }

    #[test]
    fn zero_cell_skips_loop() {
        let mut r = runner("[+++[>+<-]]+");
        drain(&mut r).unwrap();
        assert_eq!(r.context.tape.as_slice(), &[1]);
        assert_eq!(r.stats().steps, 2);
    }

    #[test]
    fn nested_loops() {
        for strategy in [JumpStrategy::Table, JumpStrategy::Scan] {
            let program = Program::new("++[>++[>+<-]<-]").unwrap();
            let mut r = BFMRunner::new(program, EngineConfig::new().strategy(strategy));
            drain(&mut r).unwrap();

            assert_eq!(r.context.tape.as_slice(), &[0, 0, 4], "{strategy:?}");
            assert_eq!(r.context.data_ptr, 0);
            assert_eq!(r.stats().max_data_ptr, 2);
        }
    }

    #[test]
    fn input_is_not_functional() {
        let mut r = runner("+,+");
        assert_eq!(r.step().unwrap(), BFMSignal::Continue);
        let err = r.step().unwrap_err();
        assert!(matches!(err, Error::UnimplementedInstruction { instruction: ',', position: 1 }));
        assert_eq!(r.context.tape.get(0), 1);
    }

    #[test]
    fn pointer_underflow() {
        let mut r = runner("><<");
        let err = drain(&mut r).unwrap_err();
        assert!(matches!(err, Error::DataPointerUnderflow { position: 2 }));
    }

    #[test]
    fn step_limit() {
        let program = Program::new("+[]").unwrap();
        let mut r = BFMRunner::new(program, EngineConfig::new().step_limit(50));
        let err = drain(&mut r).unwrap_err();
        assert!(matches!(err, Error::StepLimitExceeded { limit: 50 }));
        assert_eq!(r.stats().steps, 50);
    }

    #[test]
    fn wide_output_fails_on_negative() {
        let program = Program::new("++.---.").unwrap();
        let mut r = BFMRunner::new(program, EngineConfig::new().cell_mode(CellMode::Wide));
        let err = drain(&mut r).unwrap_err();
        assert!(matches!(err, Error::InvalidCodePoint { value: -1, position: 6 }));
        assert_eq!(r.context.output, "\u{2}");
    }
}
