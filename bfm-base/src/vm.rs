//! Virtual Machine contexts implementation.

use crate::{
    config::CellMode,
    error::{Error, Result},
};

/// Growable memory tape. Cells past the end read as zero and are allocated on
/// first mutable access.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<i64>,
}

impl Tape {
    pub fn new() -> Self {
        Default::default()
    }

    /// Count of allocated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads a cell without growing the tape.
    pub fn get(&self, idx: usize) -> i64 {
        self.cells.get(idx).copied().unwrap_or(0)
    }

    /// Gets a cell, extending the tape with zeros up to `idx`.
    pub fn cell_mut(&mut self, idx: usize) -> &mut i64 {
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, 0);
        }
        &mut self.cells[idx]
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}

/// Represents full Virtual Machine context: tape, both pointers and the output
/// produced so far.
#[derive(Clone, Debug)]
pub struct VMContext {
    pub tape: Tape,
    pub data_ptr: usize,
    pub pc: usize,
    pub output: String,
    pub mode: CellMode,
}

impl Default for VMContext {
    fn default() -> Self {
        Self::new(CellMode::default())
    }
}

impl VMContext {
    /// Allocate new context.
    pub fn new(mode: CellMode) -> Self {
        Self {
            tape: Tape::new(),
            data_ptr: 0,
            pc: 0,
            output: String::new(),
            mode,
        }
    }

    /// Gets value of current cell.
    pub fn get_cell(&mut self) -> i64 {
        *self.tape.cell_mut(self.data_ptr)
    }

    /// Sets value of current cell, normalized by the cell mode.
    pub fn set_cell(&mut self, v: i64) {
        let v = self.mode.normalize(v);
        *self.tape.cell_mut(self.data_ptr) = v;
    }

    /// Performs `cell <- cell + delta`.
    pub fn add_cell(&mut self, delta: i64) -> i64 {
        let v = self.get_cell().wrapping_add(delta);
        let v = self.mode.normalize(v);
        *self.tape.cell_mut(self.data_ptr) = v;
        v
    }

    pub fn move_right(&mut self) {
        self.data_ptr += 1;
    }

    pub fn move_left(&mut self) -> Result<()> {
        let Some(ptr) = self.data_ptr.checked_sub(1) else {
            return Err(Error::DataPointerUnderflow { position: self.pc });
        };
        self.data_ptr = ptr;
        Ok(())
    }

    /// Appends current cell to output as a character.
    pub fn write_cell(&mut self) -> Result<char> {
        let value = self.get_cell();
        let Some(c) = self.mode.to_char(value) else {
            return Err(Error::InvalidCodePoint { value, position: self.pc });
        };
        self.output.push(c);
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tape_grows_lazily() {
        let mut tape = Tape::new();
        assert!(tape.is_empty());
        assert_eq!(tape.get(100), 0);
        assert!(tape.is_empty());

        *tape.cell_mut(3) = 7;
        assert_eq!(tape.as_slice(), &[0, 0, 0, 7]);
        assert_eq!(tape.get(3), 7);
    }

    #[test]
    fn byte_cells_wrap() {
        let mut ctx = VMContext::new(CellMode::Byte);
        assert_eq!(ctx.add_cell(-1), 255);
        assert_eq!(ctx.add_cell(1), 0);
        ctx.set_cell(300);
        assert_eq!(ctx.get_cell(), 44);
    }

    #[test]
    fn wide_cells_do_not_wrap_at_byte() {
        let mut ctx = VMContext::new(CellMode::Wide);
        assert_eq!(ctx.add_cell(-1), -1);
        ctx.set_cell(255);
        assert_eq!(ctx.add_cell(1), 256);
        ctx.set_cell(i64::MAX);
        assert_eq!(ctx.add_cell(1), i64::MIN);
    }

    #[test]
    fn pointer_moves() {
        let mut ctx = VMContext::default();
        ctx.move_right();
        ctx.move_right();
        ctx.move_left().unwrap();
        assert_eq!(ctx.data_ptr, 1);
        ctx.move_left().unwrap();

        ctx.pc = 9;
        assert!(matches!(ctx.move_left(), Err(Error::DataPointerUnderflow { position: 9 })));
        assert_eq!(ctx.data_ptr, 0);
    }

    #[test]
    fn write_cells() {
        let mut ctx = VMContext::new(CellMode::Byte);
        ctx.set_cell(72);
        assert_eq!(ctx.write_cell().unwrap(), 'H');
        ctx.set_cell(0xe9);
        assert_eq!(ctx.write_cell().unwrap(), 'é');
        assert_eq!(ctx.output, "Hé");

        let mut ctx = VMContext::new(CellMode::Wide);
        ctx.set_cell(0x1F600);
        assert_eq!(ctx.write_cell().unwrap(), '😀');
        ctx.set_cell(-1);
        assert!(matches!(ctx.write_cell(), Err(Error::InvalidCodePoint { value: -1, .. })));
        ctx.set_cell(0xD800);
        assert!(matches!(ctx.write_cell(), Err(Error::InvalidCodePoint { value: 0xD800, .. })));
        assert_eq!(ctx.output, "😀");
    }
}
