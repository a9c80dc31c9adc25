//! This library turns a crossbar [`Schedule`] into a gate-level Verilog module.
//!
//! The [`CrossbarState`] tracks what every cell of the array holds while the schedule is
//! replayed. Each operation is checked against the rules of the hardware (operands must share a
//! line with each other, and only erased cells may be written), then applied to the state by the
//! [`Emitter`], which yields at most one continuous assignment. The [`Generator`] drives the
//! emitter over the whole schedule and assembles the module.
//!
//! [`Schedule`]: arche_schedule::Schedule

mod state;
mod hazard;
mod error;
mod emit;
mod codegen;

pub use state::{CellToken, CrossbarState};
pub use hazard::{Violation, can_write, check_alignment, check_chain, check_write, is_aligned};
pub use error::GenerateError;
pub use emit::{Assignment, Emitter, Expr, Term};
pub use codegen::{Artifact, BatchPolicy, Generator, GeneratorOptions, generate};
