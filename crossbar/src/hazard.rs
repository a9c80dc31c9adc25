use arche_schedule::Position;

use crate::{CellToken, CrossbarState};

/// Why an operation may not be performed on the current crossbar state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Two cells that must share a row or column line do not.
    Misaligned { first: Position, second: Position },
    /// A cell that is not erased would be overwritten.
    Dirty { position: Position, token: CellToken },
}

pub fn is_aligned(first: Position, second: Position) -> bool {
    first.is_aligned_with(second)
}

/// A cell may be written if it is erased, or if the write is an exempt one (binding an input or
/// forcing a constant zero).
pub fn can_write(state: &CrossbarState, pos: Position, exempt: bool) -> bool {
    exempt || *state.get(pos) == CellToken::Free
}

pub fn check_alignment(first: Position, second: Position) -> Result<(), Violation> {
    if is_aligned(first, second) { Ok(()) } else { Err(Violation::Misaligned { first, second }) }
}

/// Checks that each operand shares a line with the one following it.
pub fn check_chain(operands: &[Position]) -> Result<(), Violation> {
    for pair in operands.windows(2) {
        check_alignment(pair[0], pair[1])?;
    }
    Ok(())
}

pub fn check_write(state: &CrossbarState, pos: Position, exempt: bool) -> Result<(), Violation> {
    if can_write(state, pos, exempt) {
        Ok(())
    } else {
        Err(Violation::Dirty { position: pos, token: state.get(pos).clone() })
    }
}

#[cfg(test)]
mod test {
    use arche_schedule::Position;

    use crate::{CellToken, CrossbarState, Violation, can_write, check_chain, check_write};

    #[test]
    fn test_write() {
        let mut state = CrossbarState::new(2, 2);
        let pos = Position::new(1, 1);
        assert!(can_write(&state, pos, false));
        state.set(pos, CellToken::Zero);
        assert!(!can_write(&state, pos, false));
        assert!(can_write(&state, pos, true));
        assert_eq!(check_write(&state, pos, false), Err(Violation::Dirty { position: pos, token: CellToken::Zero }));
        assert_eq!(check_write(&state, pos, true), Ok(()));
    }

    #[test]
    fn test_chain() {
        // an L-shaped chain is fine as long as neighbours share a line
        assert_eq!(check_chain(&[Position::new(0, 0), Position::new(0, 5), Position::new(3, 5)]), Ok(()));
        assert_eq!(check_chain(&[Position::new(2, 2)]), Ok(()));
        assert_eq!(
            check_chain(&[Position::new(0, 0), Position::new(0, 1), Position::new(1, 2)]),
            Err(Violation::Misaligned { first: Position::new(0, 1), second: Position::new(1, 2) })
        );
    }
}
