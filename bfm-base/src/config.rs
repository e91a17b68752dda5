//! Engine configuration.

/// Cell width and output conversion rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellMode {
    /// Cells wrap modulo 256. Output maps `0..=255` to `U+0000..=U+00FF`.
    #[default]
    Byte,
    /// 64-bit cells with wrapping arithmetic. Output uses the raw value as a
    /// code point and fails if it is not a Unicode scalar.
    Wide,
}

impl CellMode {
    /// Brings a value into the range of this mode.
    #[inline(always)]
    pub fn normalize(self, v: i64) -> i64 {
        match self {
            CellMode::Byte => v.rem_euclid(256),
            CellMode::Wide => v,
        }
    }

    /// Converts a cell value to an output character.
    pub fn to_char(self, v: i64) -> Option<char> {
        match self {
            CellMode::Byte => Some(char::from(v.rem_euclid(256) as u8)),
            CellMode::Wide => u32::try_from(v).ok().and_then(char::from_u32),
        }
    }
}

/// How `[` and `]` find their match at run time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JumpStrategy {
    /// O(1) lookup in the table built at load time.
    #[default]
    Table,
    /// Re-scan the program text on every taken jump.
    Scan,
}

/// Engine configuration.
///
/// ```
/// # use bfm_base::config::*;
/// let config = EngineConfig::new()
///     .cell_mode(CellMode::Wide)
///     .step_limit(10_000);
///
/// assert_eq!(config.strategy, JumpStrategy::Table);
/// assert_eq!(config.step_limit, Some(10_000));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub cell_mode: CellMode,
    pub strategy: JumpStrategy,
    /// Maximum count of executed instructions. [`None`] runs without bound.
    pub step_limit: Option<u64>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cell_mode(mut self, mode: CellMode) -> Self {
        self.cell_mode = mode;
        self
    }

    pub fn strategy(mut self, strategy: JumpStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}
