use std::fmt::Display;

use arche_schedule::{Position, Scope};

/// The contents of a single crossbar cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellToken {
    /// Erased and available for writing. An erased cell reads as logic 1.
    Free,
    /// Holds the constant 0.
    Zero,
    /// Holds the value of the named wire or primary input.
    Occupied(String),
}

impl Display for CellToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellToken::Free => write!(f, "free"),
            CellToken::Zero => write!(f, "zero"),
            CellToken::Occupied(name) => write!(f, "{name:?}"),
        }
    }
}

/// The data held by every cell of an R×C crossbar, plus a per-cell access tally.
///
/// Addressing a cell outside of the array panics.
#[derive(Clone, Debug)]
pub struct CrossbarState {
    rows: usize,
    cols: usize,
    cells: Vec<CellToken>,
    usage: Vec<u32>,
}

impl CrossbarState {
    pub fn new(rows: usize, cols: usize) -> Self {
        CrossbarState { rows, cols, cells: vec![CellToken::Free; rows * cols], usage: vec![0; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.contains(pos), "cell {pos} outside of {}x{} crossbar", self.rows, self.cols);
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: Position) -> &CellToken {
        &self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, token: CellToken) {
        let index = self.index(pos);
        self.cells[index] = token;
    }

    /// Erases every cell of the given rows or columns.
    pub fn reset(&mut self, scope: Scope, indices: &[usize]) {
        for &index in indices {
            match scope {
                Scope::Rows => {
                    for col in 0..self.cols {
                        self.set(Position::new(index, col), CellToken::Free);
                    }
                }
                Scope::Cols => {
                    for row in 0..self.rows {
                        self.set(Position::new(row, index), CellToken::Free);
                    }
                }
            }
        }
    }

    /// Records one read or write of a cell.
    pub fn touch(&mut self, pos: Position) {
        let index = self.index(pos);
        self.usage[index] += 1;
    }

    pub fn usage(&self, pos: Position) -> u32 {
        self.usage[self.index(pos)]
    }

    /// Number of cells that were accessed at least once.
    pub fn devices_used(&self) -> usize {
        self.usage.iter().filter(|&&count| count != 0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &CellToken)> {
        self.cells.iter().enumerate().map(|(index, token)| (Position::new(index / self.cols, index % self.cols), token))
    }
}

#[cfg(test)]
mod test {
    use arche_schedule::{Position, Scope};

    use crate::{CellToken, CrossbarState};

    #[test]
    fn test_initial() {
        let state = CrossbarState::new(2, 3);
        assert_eq!(state.iter().count(), 6);
        assert!(state.iter().all(|(_, token)| *token == CellToken::Free));
        assert!(state.contains(Position::new(1, 2)));
        assert!(!state.contains(Position::new(2, 0)));
        assert!(!state.contains(Position::new(0, 3)));
    }

    #[test]
    fn test_reset() {
        let mut state = CrossbarState::new(3, 3);
        for (pos, _) in CrossbarState::new(3, 3).iter() {
            state.set(pos, CellToken::Occupied(format!("w{}{}", pos.row, pos.col)));
        }
        state.reset(Scope::Rows, &[1]);
        assert_eq!(state.get(Position::new(1, 0)), &CellToken::Free);
        assert_eq!(state.get(Position::new(1, 2)), &CellToken::Free);
        assert_eq!(state.get(Position::new(0, 1)), &CellToken::Occupied("w01".into()));
        state.reset(Scope::Cols, &[0, 2]);
        assert_eq!(state.get(Position::new(0, 0)), &CellToken::Free);
        assert_eq!(state.get(Position::new(2, 2)), &CellToken::Free);
        assert_eq!(state.get(Position::new(2, 1)), &CellToken::Occupied("w21".into()));
    }

    #[test]
    fn test_usage() {
        let mut state = CrossbarState::new(2, 2);
        state.touch(Position::new(0, 1));
        state.touch(Position::new(0, 1));
        state.touch(Position::new(1, 1));
        assert_eq!(state.usage(Position::new(0, 1)), 2);
        assert_eq!(state.usage(Position::new(0, 0)), 0);
        assert_eq!(state.devices_used(), 2);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        CrossbarState::new(2, 2).get(Position::new(2, 0));
    }
}
