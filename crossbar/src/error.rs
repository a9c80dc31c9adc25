use std::fmt::Display;

use arche_schedule::Position;

use crate::CellToken;

/// A schedule that cannot be executed on the crossbar. Generation stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    Alignment { operation: String, first: Position, second: Position },
    Hazard { operation: String, position: Position, token: CellToken },
    OutOfBounds { operation: String, rows: usize, cols: usize },
    EmptyOperands { operation: String },
    /// Two members of a batch touch the same cell; only raised for [`BatchPolicy::Disjoint`].
    ///
    /// [`BatchPolicy::Disjoint`]: crate::BatchPolicy::Disjoint
    BatchConflict { step: usize, position: Position },
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Alignment { operation, first, second } => {
                write!(f, "operands {first} and {second} not aligned in `{operation}`")
            }
            GenerateError::Hazard { operation, position, token } => {
                write!(f, "writing to a dirty position {position} holding {token} in `{operation}`")
            }
            GenerateError::OutOfBounds { operation, rows, cols } => {
                write!(f, "`{operation}` addresses a cell outside of the {rows}x{cols} crossbar")
            }
            GenerateError::EmptyOperands { operation } => write!(f, "`{operation}` has no operands"),
            GenerateError::BatchConflict { step, position } => {
                write!(f, "batch at step T{} touches cell {position} from more than one operation", step + 1)
            }
        }
    }
}

impl std::error::Error for GenerateError {}
