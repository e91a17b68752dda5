//! Run a program to completion.

use tracing::debug;

use crate::{
    config::EngineConfig,
    error::Result,
    program::Program,
    runner::{BFMRunner, BFMSignal, RunStats},
    source::{self, SourceKind},
};

/// Execution engine. Owns the program and its machine state for one run.
///
/// ```
/// # use bfm_base::Engine;
/// let mut engine = Engine::new("++++++++[>+++++++++<-]>.+.").unwrap();
/// assert_eq!(engine.run().unwrap(), "HI");
/// ```
#[derive(Debug)]
pub struct Engine {
    runner: BFMRunner,
}

impl Engine {
    /// Creates engine from literal program text.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Ok(Self::with_config(Program::new(text)?, EngineConfig::default()))
    }

    /// Creates engine from text or from a file, per `kind`.
    pub fn from_source(identifier: &str, kind: SourceKind) -> Result<Self> {
        Self::from_source_with_config(identifier, kind, EngineConfig::default())
    }

    /// Like [`Engine::from_source`], with the kind given as its selector value
    /// (`"T"` or `"F"`).
    ///
    /// ```
    /// # use bfm_base::{Engine, ErrorKind};
    /// let err = Engine::from_source_str("+.", "X").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidSourceKind);
    /// ```
    pub fn from_source_str(identifier: &str, kind: &str) -> Result<Self> {
        Self::from_source(identifier, kind.parse()?)
    }

    pub fn from_source_with_config(identifier: &str, kind: SourceKind, config: EngineConfig) -> Result<Self> {
        let text = source::load(identifier, kind)?;
        Ok(Self::with_config(Program::new(text)?, config))
    }

    /// Creates engine from an already loaded program. Cannot fail: brackets
    /// were matched by [`Program::new`].
    pub fn with_config(program: Program, config: EngineConfig) -> Self {
        Self {
            runner: BFMRunner::new(program, config),
        }
    }

    /// Runs until the last instruction and returns the whole output.
    ///
    /// Calling it again after completion returns the same output without
    /// executing anything. On error, output written so far is kept in
    /// [`Engine::output`].
    pub fn run(&mut self) -> Result<String> {
        while self.runner.step()? != BFMSignal::Halt {}

        let stats = self.runner.stats();
        debug!(steps = stats.steps, output_len = self.output().len(), "run finished");

        Ok(self.output().to_owned())
    }

    /// Output written so far.
    pub fn output(&self) -> &str {
        &self.runner.context.output
    }

    pub fn stats(&self) -> RunStats {
        self.runner.stats()
    }

    pub fn runner(&self) -> &BFMRunner {
        &self.runner
    }

    /// Gives access to the runner for single stepping.
    pub fn runner_mut(&mut self) -> &mut BFMRunner {
        &mut self.runner
    }
}
