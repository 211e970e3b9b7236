//! Dense boolean (state × action) matrix.

use crate::core::{ACTION_COUNT, Action};

/// Boolean flag per (state, action) pair.
///
/// Column 0 ([`Action::Stay`]) holds the state-level flag, columns 1..=4
/// hold per-move flags. Used for S, S_hat, the seed and ground truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyMatrix {
    rows: Vec<[bool; ACTION_COUNT]>,
}

impl SafetyMatrix {
    /// All-false matrix for `states` states.
    pub fn new(states: usize) -> Self {
        Self {
            rows: vec![[false; ACTION_COUNT]; states],
        }
    }

    /// Matrix with the [`Action::Stay`] column set from `flags`.
    pub fn from_state_flags(flags: &[bool]) -> Self {
        let mut m = Self::new(flags.len());
        for (row, &flag) in m.rows.iter_mut().zip(flags) {
            row[0] = flag;
        }
        m
    }

    /// Number of states (rows).
    #[inline]
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    /// Flag for (state, action). Out-of-range states read as false.
    #[inline]
    pub fn get(&self, state: usize, action: Action) -> bool {
        self.rows
            .get(state)
            .is_some_and(|row| row[action.index()])
    }

    /// Set the flag for (state, action).
    #[inline]
    pub fn set(&mut self, state: usize, action: Action, value: bool) {
        self.rows[state][action.index()] = value;
    }

    /// All flags of a state.
    #[inline]
    pub fn row(&self, state: usize) -> &[bool; ACTION_COUNT] {
        &self.rows[state]
    }

    /// Whether any flag of the state is set.
    #[inline]
    pub fn any(&self, state: usize) -> bool {
        self.rows[state].iter().any(|&f| f)
    }

    /// Whether any move (not stay) of the state is set.
    pub fn any_move(&self, state: usize) -> bool {
        self.rows[state][1..].iter().any(|&f| f)
    }

    /// Number of set flags.
    pub fn count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&f| f).count())
            .sum()
    }

    /// Whether no flag is set.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&f| !f))
    }

    /// Iterate set flags as (state, action).
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, Action)> + '_ {
        self.rows.iter().enumerate().flat_map(|(s, row)| {
            Action::ALL
                .iter()
                .filter(move |a| row[a.index()])
                .map(move |&a| (s, a))
        })
    }

    /// Every flag set here is also set in `other`.
    pub fn is_subset_of(&self, other: &SafetyMatrix) -> bool {
        self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.iter().zip(b).all(|(&x, &y)| !x || y))
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &SafetyMatrix) {
        for (a, b) in self.rows.iter_mut().zip(&other.rows) {
            for (x, &y) in a.iter_mut().zip(b) {
                *x |= y;
            }
        }
    }

    /// Number of flags set in both matrices.
    pub fn count_and(&self, other: &SafetyMatrix) -> usize {
        self.count_pairs(other, |x, y| x && y)
    }

    /// Number of flags set here but not in `other`.
    pub fn count_and_not(&self, other: &SafetyMatrix) -> usize {
        self.count_pairs(other, |x, y| x && !y)
    }

    fn count_pairs(&self, other: &SafetyMatrix, pred: impl Fn(bool, bool) -> bool) -> usize {
        self.rows
            .iter()
            .zip(&other.rows)
            .map(|(a, b)| a.iter().zip(b).filter(|(x, y)| pred(**x, **y)).count())
            .sum()
    }
}
