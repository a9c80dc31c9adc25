use std::fmt::Display;
use std::ops::Index;

use crate::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Rows,
    Cols,
}

/// The opcode a single-input inversion was scheduled with. All of them compute `dst = !src`;
/// the distinction only matters for statistics and traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvertKind {
    Copy,
    Not,
    VNot,
}

/// The line family a NOR reduction is performed along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Operands share a row line.
    H,
    /// Operands share a column line.
    V,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Returns every cell of the listed rows or columns to the erased state.
    Reset { scope: Scope, indices: Vec<usize> },
    CopyOrInvert { kind: InvertKind, src: Position, dst: Position, label: String },
    /// `dst = !(operands[0] | operands[1] | ...)`.
    Nor { axis: Axis, operands: Vec<Position>, dst: Position, label: String },
    /// Binds a primary input to a cell; the cell then *is* the signal.
    Input { dst: Position, signal: String },
    SetZero { targets: Vec<Position> },
}

impl Operation {
    /// The opcode this operation is written with in a schedule.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Reset { .. } => "reset",
            Operation::CopyOrInvert { kind: InvertKind::Copy, .. } => "COPY",
            Operation::CopyOrInvert { kind: InvertKind::Not, .. } => "NOT",
            Operation::CopyOrInvert { kind: InvertKind::VNot, .. } => "VNOT",
            Operation::Nor { axis: Axis::H, .. } => "HNOR",
            Operation::Nor { axis: Axis::V, .. } => "VNOR",
            Operation::Input { .. } => "INPUT",
            Operation::SetZero { .. } => "SETZERO",
        }
    }

    /// Number of lines or cells the operation addresses.
    pub fn operand_count(&self) -> usize {
        match self {
            Operation::Reset { indices, .. } => indices.len(),
            Operation::CopyOrInvert { .. } => 1,
            Operation::Nor { operands, .. } => operands.len(),
            Operation::Input { .. } => 1,
            Operation::SetZero { targets } => targets.len(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Operation::CopyOrInvert { label, .. } | Operation::Nor { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    /// Cells whose contents the operation consumes.
    pub fn reads(&self) -> Vec<Position> {
        match self {
            Operation::CopyOrInvert { src, .. } => vec![*src],
            Operation::Nor { operands, .. } => operands.clone(),
            _ => vec![],
        }
    }

    /// Cells the operation stores a new value into. Resets are not included, since the cells
    /// they clear depend on the crossbar dimensions.
    pub fn writes(&self) -> Vec<Position> {
        match self {
            Operation::Reset { .. } => vec![],
            Operation::CopyOrInvert { dst, .. } | Operation::Nor { dst, .. } | Operation::Input { dst, .. } => {
                vec![*dst]
            }
            Operation::SetZero { targets } => targets.clone(),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())?;
        match self {
            Operation::Reset { scope, indices } => {
                for index in indices {
                    write!(f, " {index}")?;
                }
                match scope {
                    Scope::Rows => write!(f, " r"),
                    Scope::Cols => write!(f, " c"),
                }
            }
            Operation::CopyOrInvert { src, dst, label, .. } => write!(f, " {src} {dst} {label}"),
            Operation::Nor { operands, dst, label, .. } => {
                for operand in operands {
                    write!(f, " {operand}")?;
                }
                write!(f, " {dst} {label}")
            }
            Operation::Input { dst, signal } => write!(f, " {dst} {signal}"),
            Operation::SetZero { targets } => {
                for target in targets {
                    write!(f, " {target}")?;
                }
                Ok(())
            }
        }
    }
}

/// One time slot of a schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Single(Operation),
    /// Operations declared to happen simultaneously. They are applied in list order.
    Batch(Vec<Operation>),
}

impl Step {
    pub fn operations(&self) -> &[Operation] {
        match self {
            Step::Single(operation) => std::slice::from_ref(operation),
            Step::Batch(operations) => operations,
        }
    }
}

impl From<Operation> for Step {
    fn from(operation: Operation) -> Self {
        Step::Single(operation)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, operation) in self.operations().iter().enumerate() {
            if index != 0 {
                write!(f, " | ")?;
            }
            write!(f, "{operation}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    steps: Vec<Step>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.steps.iter().flat_map(Step::operations)
    }
}

impl Index<usize> for Schedule {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

impl FromIterator<Step> for Schedule {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Schedule { steps: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
