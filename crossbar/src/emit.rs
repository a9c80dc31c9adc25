use std::fmt::Display;

use arche_schedule::{Operation, Position, Scope};
use tracing::{debug, trace};

use crate::{CellToken, CrossbarState, GenerateError, Violation, check_alignment, check_chain, check_write};

/// A single-bit operand of an assignment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Const(bool),
    Signal(String),
}

impl From<&CellToken> for Term {
    fn from(token: &CellToken) -> Self {
        match token {
            CellToken::Free => Term::Const(true),
            CellToken::Zero => Term::Const(false),
            CellToken::Occupied(name) => Term::Signal(name.clone()),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Const(false) => write!(f, "1'b0"),
            Term::Const(true) => write!(f, "1'b1"),
            Term::Signal(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Const(bool),
    Not(Term),
    /// Negated OR of one or more terms.
    Nor(Vec<Term>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{}", Term::Const(*value)),
            Expr::Not(term) => write!(f, "~{term}"),
            Expr::Nor(terms) => {
                write!(f, "~(")?;
                for (index, term) in terms.iter().enumerate() {
                    if index != 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{term}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A continuous assignment driving a freshly allocated wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub wire: String,
    pub expr: Expr,
    pub label: String,
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assign {} = {};", self.wire, self.expr)?;
        if !self.label.is_empty() {
            // a line break would end the comment early
            write!(f, " // {}", self.label.replace(char::is_control, " "))?;
        }
        Ok(())
    }
}

/// Applies operations to a crossbar one at a time.
#[derive(Clone, Debug)]
pub struct Emitter {
    state: CrossbarState,
    wire_count: usize,
}

impl Emitter {
    pub fn new(rows: usize, cols: usize) -> Self {
        Emitter { state: CrossbarState::new(rows, cols), wire_count: 0 }
    }

    pub fn state(&self) -> &CrossbarState {
        &self.state
    }

    /// Number of wires allocated so far.
    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    fn allocate_wire(&mut self) -> String {
        self.wire_count += 1;
        format!("tempW{}", self.wire_count)
    }

    fn check_bounds(
        &self,
        operation: &Operation,
        positions: impl IntoIterator<Item = Position>,
    ) -> Result<(), GenerateError> {
        for pos in positions {
            if !self.state.contains(pos) {
                return Err(GenerateError::OutOfBounds {
                    operation: operation.to_string(),
                    rows: self.state.rows(),
                    cols: self.state.cols(),
                });
            }
        }
        Ok(())
    }

    fn violation(operation: &Operation, violation: Violation) -> GenerateError {
        debug!("rejected `{operation}`: {violation:?}");
        match violation {
            Violation::Misaligned { first, second } => {
                GenerateError::Alignment { operation: operation.to_string(), first, second }
            }
            Violation::Dirty { position, token } => {
                GenerateError::Hazard { operation: operation.to_string(), position, token }
            }
        }
    }

    /// Performs a single operation, returning the assignment it produces, if any.
    ///
    /// On error, the state is left as it was before the operation.
    pub fn emit(&mut self, operation: &Operation) -> Result<Option<Assignment>, GenerateError> {
        let fail = |violation| Self::violation(operation, violation);
        match operation {
            Operation::Reset { scope, indices } => {
                let limit = match scope {
                    Scope::Rows => self.state.rows(),
                    Scope::Cols => self.state.cols(),
                };
                if indices.iter().any(|&index| index >= limit) {
                    return Err(GenerateError::OutOfBounds {
                        operation: operation.to_string(),
                        rows: self.state.rows(),
                        cols: self.state.cols(),
                    });
                }
                trace!("{operation}");
                self.state.reset(*scope, indices);
                Ok(None)
            }
            Operation::CopyOrInvert { src, dst, label, .. } => {
                self.check_bounds(operation, [*src, *dst])?;
                check_alignment(*src, *dst).map_err(fail)?;
                check_write(&self.state, *dst, false).map_err(fail)?;
                let term = Term::from(self.state.get(*src));
                self.state.touch(*src);
                Ok(Some(self.drive(*dst, Expr::Not(term), label)))
            }
            Operation::Nor { operands, dst, label, .. } => {
                if operands.is_empty() {
                    return Err(GenerateError::EmptyOperands { operation: operation.to_string() });
                }
                self.check_bounds(operation, operands.iter().copied().chain([*dst]))?;
                check_chain(operands).map_err(fail)?;
                check_write(&self.state, *dst, false).map_err(fail)?;
                let mut terms = Vec::new();
                for &operand in operands {
                    let token = self.state.get(operand);
                    // a zero operand does not contribute to the OR
                    if *token != CellToken::Zero {
                        terms.push(Term::from(token));
                    }
                    self.state.touch(operand);
                }
                let expr = if terms.is_empty() { Expr::Const(true) } else { Expr::Nor(terms) };
                Ok(Some(self.drive(*dst, expr, label)))
            }
            Operation::Input { dst, signal } => {
                self.check_bounds(operation, [*dst])?;
                trace!("{operation}");
                self.state.set(*dst, CellToken::Occupied(signal.clone()));
                self.state.touch(*dst);
                Ok(None)
            }
            Operation::SetZero { targets } => {
                self.check_bounds(operation, targets.iter().copied())?;
                trace!("{operation}");
                for &target in targets {
                    self.state.set(target, CellToken::Zero);
                    self.state.touch(target);
                }
                Ok(None)
            }
        }
    }

    fn drive(&mut self, dst: Position, expr: Expr, label: &str) -> Assignment {
        let wire = self.allocate_wire();
        self.state.set(dst, CellToken::Occupied(wire.clone()));
        self.state.touch(dst);
        let assignment = Assignment { wire, expr, label: label.to_owned() };
        debug!("{assignment}");
        assignment
    }
}
