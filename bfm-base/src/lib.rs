//! # BFM Virtual Machine
//!
//! This crate contains base things of bfm, a tape machine for the eight-instruction
//! esoteric language. Program text goes through 4 stages to be executed:
//!
//! 1. [`program`] -- load stage. Loads text and matches brackets into a [`JumpTable`].
//! 2. [`instruction`] -- decode program bytes into [`Instruction`]s.
//! 3. [`vm`] -- virtual environment. Owns the tape, pointers and output.
//! 4. [`runner`] -- execute one instruction per step.
//!
//! [`Engine`] ties the stages together and runs a program to completion. Program
//! text can come from a literal or a file, see [`source`].
//!
//! # Example
//!
//! ```
//! # use bfm_base::{Engine, EngineConfig, CellMode, Program, ErrorKind};
//! let mut engine = Engine::new("++++++[>++++++++<-]>+++++.").unwrap();
//! assert_eq!(engine.run().unwrap(), "5");
//!
//! // unmatched brackets are rejected before anything runs
//! let err = Engine::new("+[>+").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ProgramCounterOutOfRange);
//!
//! // reference cell semantics: no wrap at 256, output fails on non-characters
//! let program = Program::new("-.").unwrap();
//! let mut engine = Engine::with_config(program, EngineConfig::new().cell_mode(CellMode::Wide));
//! assert_eq!(engine.run().unwrap_err().kind(), ErrorKind::InvalidCodePoint);
//! ```
//!
//! # Specification
//!
//! ## Instructions
//!
//! | Char | Name        | Description                                          |
//! |------|-------------|------------------------------------------------------|
//! | `>`  | `incptr`    | Data pointer + 1                                     |
//! | `<`  | `decptr`    | Data pointer - 1, error below cell 0                 |
//! | `+`  | `inccell`   | Current cell + 1                                     |
//! | `-`  | `deccell`   | Current cell - 1                                     |
//! | `.`  | `output`    | Write current cell as a character                    |
//! | `,`  | `input`     | Not yet functional, always an error                  |
//! | `[`  | `loopopen`  | If current cell is 0, jump to matching `]`           |
//! | `]`  | `loopclose` | If current cell is not 0, jump back to matching `[`  |
//!
//! Any other character is a no-op, so programs may hold comments and whitespace.
//! Positions in errors are byte offsets into the program text.
//!
//! ## Cells
//!
//! See [`CellMode`]. Default is [`CellMode::Byte`]: cells wrap at 256 and output is
//! Latin-1. [`CellMode::Wide`] keeps 64-bit cells and outputs the raw code point.
//!
//! ## Execution
//!
//! The program counter starts at 0. After each instruction, if the counter is at the
//! last byte the program halts, otherwise it moves one byte forward. A taken jump
//! lands on the matching bracket, so execution resumes right after it. The empty
//! program halts without executing anything.

pub mod config;
pub mod engine;
pub mod error;
pub mod instruction;
pub mod program;
pub mod runner;
pub mod source;
pub mod vm;

pub use config::{CellMode, EngineConfig, JumpStrategy};
pub use engine::Engine;
pub use error::{Error, ErrorKind, Result};
pub use instruction::Instruction;
pub use program::{JumpTable, Program};
pub use runner::{BFMRunner, BFMSignal, RunStats};
pub use source::SourceKind;
