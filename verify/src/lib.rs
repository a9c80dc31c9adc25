//! Equivalence checking of generated modules against a reference.
//!
//! The [`EquivalenceChecker`] capability compares two Verilog modules. [`AbcChecker`] delegates
//! to the ABC logic synthesis tool running as a subprocess; [`SimulationChecker`] evaluates both
//! modules over every input pattern in-process, and understands the gate-level subset of Verilog
//! that the crossbar generator emits.

use std::fmt::Display;

mod abc;
mod verilog;
mod simulate;

pub use abc::{AbcChecker, EQUIVALENT_PHRASE};
pub use simulate::SimulationChecker;

/// The verdict of an equivalence checker, along with its report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceResult {
    pub equivalent: bool,
    pub raw_output: String,
}

/// The checker could not reach a verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inconclusive {
    pub stderr: String,
}

impl Display for Inconclusive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "equivalence check inconclusive: {}", self.stderr.trim_end())
    }
}

impl std::error::Error for Inconclusive {}

impl From<std::io::Error> for Inconclusive {
    fn from(error: std::io::Error) -> Self {
        Inconclusive { stderr: error.to_string() }
    }
}

pub trait EquivalenceChecker {
    /// Compares the Boolean functions of two modules, given as Verilog source text.
    ///
    /// Blocks until the check completes.
    fn check(&self, first: &str, second: &str) -> Result<EquivalenceResult, Inconclusive>;
}
