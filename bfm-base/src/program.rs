//! Program text and bracket matching.
//!
//! A [`Program`] owns the source bytes together with a [`JumpTable`] built in one
//! pass when the program is created. Creation fails if any bracket is unmatched, so
//! a program that loads never scans off its own end at run time.
//!
//! [`scan_forward`] and [`scan_backward`] are the live re-scanning matchers. They
//! walk the text with a skip counter and are kept as the [`JumpStrategy::Scan`]
//! alternative to table lookups.
//!
//! # Examples
//!
//! ```
//! # use bfm_base::program::{Program, scan_forward, scan_backward};
//! let program = Program::new("+[>[-]<-]").unwrap();
//!
//! assert_eq!(program.jumps().get(1), Some(8));
//! assert_eq!(program.jumps().get(8), Some(1));
//! assert_eq!(program.jumps().get(3), Some(5));
//!
//! assert_eq!(scan_forward(program.as_bytes(), 1).unwrap(), 8);
//! assert_eq!(scan_backward(program.as_bytes(), 5).unwrap(), 3);
//! ```
//!
//! [`JumpStrategy::Scan`]: crate::config::JumpStrategy::Scan

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    error::{Error, Result},
    instruction::Instruction,
};

const OPEN: u8 = Instruction::LoopOpen as u8;
const CLOSE: u8 = Instruction::LoopClose as u8;

/// Loaded program.
#[derive(Clone, Debug)]
pub struct Program {
    text: Box<[u8]>,
    jumps: JumpTable,
}

impl Program {
    /// Loads program text and matches its brackets.
    ///
    /// Empty text is accepted and runs as a program with no steps.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into().into_bytes().into_boxed_slice();
        let jumps = JumpTable::build(&text)?;

        debug!(len = text.len(), loops = jumps.loops(), "program loaded");

        Ok(Self { text, jumps })
    }

    /// Length of the program in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }

    /// Gets instruction at `pos`. Returns [`None`] for no-op bytes and for
    /// positions past the end.
    pub fn instruction_at(&self, pos: usize) -> Option<Instruction> {
        self.text.get(pos).copied().and_then(Instruction::from_byte)
    }

    /// Iterates over recognized instructions with their positions, skipping
    /// comments and whitespace.
    pub fn instructions(&self) -> impl Iterator<Item = (usize, Instruction)> + '_ {
        self.text
            .iter()
            .enumerate()
            .filter_map(|(pos, byte)| Instruction::from_byte(*byte).map(|ins| (pos, ins)))
    }
}

/// Precomputed bracket matches, in both directions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JumpTable {
    targets: HashMap<usize, usize>,
}

impl JumpTable {
    /// Builds table using an explicit stack of open positions.
    ///
    /// A `]` with nothing open fails with the position a backward scan would
    /// reach (`-1`). A `[` left open at the end fails with the program length,
    /// where a forward scan would stop.
    pub fn build(code: &[u8]) -> Result<Self> {
        let mut targets = HashMap::new();
        let mut open = Vec::new();

        for (pos, byte) in code.iter().enumerate() {
            match *byte {
                OPEN => open.push(pos),
                CLOSE => {
                    let Some(start) = open.pop() else {
                        return Err(Error::ProgramCounterOutOfRange { position: -1, len: code.len() });
                    };
                    targets.insert(start, pos);
                    targets.insert(pos, start);
                }
                _ => {}
            }
        }

        if !open.is_empty() {
            return Err(Error::ProgramCounterOutOfRange {
                position: code.len() as isize,
                len: code.len(),
            });
        }

        Ok(Self { targets })
    }

    /// Gets matching bracket of the bracket at `pos`.
    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.targets.get(&pos).copied()
    }

    /// Count of matched `[`/`]` pairs.
    pub fn loops(&self) -> usize {
        self.targets.len() / 2
    }
}

/// Finds the `]` matching the `[` at `open`, skipping nested pairs.
pub fn scan_forward(code: &[u8], open: usize) -> Result<usize> {
    let mut skip = 0usize;
    let mut pos = open;

    loop {
        pos += 1;
        let Some(byte) = code.get(pos) else {
            return Err(Error::ProgramCounterOutOfRange { position: pos as isize, len: code.len() });
        };
        match *byte {
            OPEN => skip += 1,
            CLOSE if skip == 0 => return Ok(pos),
            CLOSE => skip -= 1,
            _ => {}
        }
    }
}

/// Finds the `[` matching the `]` at `close`, skipping nested pairs.
pub fn scan_backward(code: &[u8], close: usize) -> Result<usize> {
    let mut skip = 0usize;
    let mut pos = close;

    loop {
        let Some(prev) = pos.checked_sub(1) else {
            return Err(Error::ProgramCounterOutOfRange { position: -1, len: code.len() });
        };
        pos = prev;
        match code[pos] {
            CLOSE => skip += 1,
            OPEN if skip == 0 => return Ok(pos),
            OPEN => skip -= 1,
            _ => {}
        }
    }
}
