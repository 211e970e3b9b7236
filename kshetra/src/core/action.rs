//! Grid actions.

use serde::{Deserialize, Serialize};

/// Number of action slots per state (stay + four moves).
pub const ACTION_COUNT: usize = 5;

/// An action on the 4-connected grid.
///
/// Index 0 is reserved for [`Action::Stay`]; its column in a safety matrix
/// encodes whether the state itself is safe. Indices 1..=4 are moves.
///
/// Rows grow along the first world axis (x), columns along the second (y):
///
/// ```text
///            Up (row - 1)
///                 ▲
///  Left (col - 1) ◄ ● ► Right (col + 1)
///                 ▼
///           Down (row + 1)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Remain in place.
    Stay = 0,
    /// Column + 1.
    Right = 1,
    /// Row + 1.
    Down = 2,
    /// Column - 1.
    Left = 3,
    /// Row - 1.
    Up = 4,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Stay,
        Action::Right,
        Action::Down,
        Action::Left,
        Action::Up,
    ];

    /// The four moves (everything except [`Action::Stay`]).
    pub const MOVES: [Action; 4] = [Action::Right, Action::Down, Action::Left, Action::Up];

    /// Column index in a safety matrix.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action for a column index, if one exists.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Whether this action changes state.
    #[inline]
    pub fn is_move(self) -> bool {
        self != Action::Stay
    }

    /// The action that undoes this one.
    pub fn reverse(self) -> Action {
        match self {
            Action::Stay => Action::Stay,
            Action::Right => Action::Left,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Up => Action::Down,
        }
    }

    /// (row, col) offset.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Action::Stay => (0, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Stay => "stay",
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
            Action::Up => "up",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), Some(action));
        }
        assert_eq!(Action::from_index(ACTION_COUNT), None);
    }

    #[test]
    fn test_reverse_cancels_offset() {
        for action in Action::ALL {
            let (dr, dc) = action.offset();
            let (rr, rc) = action.reverse().offset();
            assert_eq!((dr + rr, dc + rc), (0, 0));
            assert_eq!(action.reverse().reverse(), action);
        }
    }

    #[test]
    fn test_moves_exclude_stay() {
        assert!(Action::MOVES.iter().all(|a| a.is_move()));
        assert!(!Action::Stay.is_move());
    }
}
