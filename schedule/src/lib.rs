//! This library provides the in-memory form of a crossbar mapping solution.
//!
//! A [`Schedule`] is a time-ordered list of [`Step`]s, each of which is either a single
//! [`Operation`] or a batch of operations sharing one time slot. Every operation is already
//! bound to physical [`Position`]s of an R×C crossbar; the schedule says nothing about *why*
//! cells were chosen, only what happens to them and when. The mapped [`Netlist`] describes the
//! boundary of the circuit: which signals enter it, and where each output ends up.

mod position;
mod operation;
mod parse;
mod netlist;
mod solution;
mod stats;
mod trace;
mod graph;

pub use position::Position;
pub use operation::{Axis, InvertKind, Operation, Scope, Step, Schedule};
pub use parse::{ParseError, parse_schedule, schedule_from_json};
pub use netlist::{Netlist, Node, NodeId, NodeKind, NetlistBoundary, OutputBinding, UnboundOutput};
pub use solution::MappingSolution;
pub use stats::{StepStatistics, summarize};
pub use trace::write_trace;
pub use graph::write_dot;
