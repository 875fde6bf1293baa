use std::fmt::Debug;

use crate::{StateId, ValidationError};

/// An unordered pair of two distinct states. Internally the larger index is always stored
/// first, which gives every pair a single address in the [`ImplicationTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatePair {
    high: StateId,
    low: StateId,
}

impl StatePair {
    /// Canonicalizes the pair `{a, b}`. Returns `None` if `a == b`, as a state paired with
    /// itself imposes no constraint.
    pub fn new(a: StateId, b: StateId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(Self { high: a, low: b }),
            std::cmp::Ordering::Less => Some(Self { high: b, low: a }),
        }
    }

    /// The larger of the two states.
    pub fn high(&self) -> StateId {
        self.high
    }

    /// The smaller of the two states.
    pub fn low(&self) -> StateId {
        self.low
    }

    /// Returns the pair as `(smaller, larger)`, which is how pairs are presented.
    pub fn ascending(&self) -> (StateId, StateId) {
        (self.low, self.high)
    }

    /// Returns true if `state` is one of the two states.
    pub fn contains(&self, state: StateId) -> bool {
        self.high == state || self.low == state
    }
}

impl Debug for StatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(S{}, S{})", self.low, self.high)
    }
}

/// The cell of an [`ImplicationTable`] for one pair of states. An entry is either
/// eliminated, meaning the two states are known to be distinguishable, or it lists the
/// pairs whose equivalence is needed for the two states to be equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplicationEntry {
    eliminated: bool,
    dependencies: Vec<StatePair>,
}

impl ImplicationEntry {
    /// Returns true if the pair has been shown to be distinguishable.
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// The pairs this entry depends on.
    pub fn dependencies(&self) -> &[StatePair] {
        &self.dependencies
    }

    /// Marks the entry as eliminated. There is no way back.
    pub(crate) fn eliminate(&mut self) {
        self.eliminated = true;
    }

    pub(crate) fn add_dependency(&mut self, pair: StatePair) {
        debug_assert!(!self.eliminated, "dependency recorded on eliminated entry");
        self.dependencies.push(pair);
    }
}

/// Triangular table with one [`ImplicationEntry`] for each unordered pair of distinct states.
/// Row `r` belongs to the state `r + 1` and holds the entries for the pairs with the states
/// `0..=r`, so a machine with `n` states has `n - 1` rows and `n * (n - 1) / 2` entries.
/// Lookups go through [`StatePair`] and are bounds checked by the table, a pair that does
/// not address a cell simply has no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicationTable {
    num_states: usize,
    rows: Vec<Vec<ImplicationEntry>>,
}

impl ImplicationTable {
    /// Allocates a table for `num_states` states, where no entry is eliminated and no
    /// dependencies are recorded.
    pub fn new(num_states: usize) -> Result<Self, ValidationError> {
        let failure = || ValidationError::AllocationFailure { states: num_states };
        num_states
            .checked_mul(num_states.saturating_sub(1))
            .ok_or_else(failure)?;

        let mut rows = Vec::new();
        rows.try_reserve_exact(num_states.saturating_sub(1))
            .map_err(|_| failure())?;
        for row in 1..num_states {
            let mut entries = Vec::new();
            entries.try_reserve_exact(row).map_err(|_| failure())?;
            entries.resize_with(row, ImplicationEntry::default);
            rows.push(entries);
        }

        Ok(Self { num_states, rows })
    }

    /// The number of states the table was built for.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the number of pairs, i.e. the number of entries in the table.
    pub fn size(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Iterates over all canonical pairs, row by row: `(1, 0), (2, 0), (2, 1), (3, 0), ...`.
    pub fn pairs(&self) -> impl Iterator<Item = StatePair> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, entries)| {
            (0..entries.len()).map(move |low| StatePair {
                high: row + 1,
                low,
            })
        })
    }

    /// Iterates over all pairs that are not eliminated, in the order of [`Self::pairs`].
    pub fn surviving_pairs(&self) -> impl Iterator<Item = StatePair> + '_ {
        self.pairs().filter(|pair| !self.is_eliminated(*pair))
    }

    /// Returns the entry for `pair`, or `None` if the pair does not address a cell of the
    /// table, which happens when one of its states is not a state of the machine.
    pub fn entry(&self, pair: StatePair) -> Option<&ImplicationEntry> {
        let (row, col) = Self::address(pair)?;
        self.rows.get(row)?.get(col)
    }

    pub(crate) fn entry_mut(&mut self, pair: StatePair) -> Option<&mut ImplicationEntry> {
        let (row, col) = Self::address(pair)?;
        self.rows.get_mut(row)?.get_mut(col)
    }

    /// Looks up the pair `{a, b}` in arbitrary order. Returns `None` if `a == b` or if the
    /// pair lies outside of the table.
    pub fn lookup(&self, a: StateId, b: StateId) -> Option<&ImplicationEntry> {
        self.entry(StatePair::new(a, b)?)
    }

    /// Returns true if `pair` is known to be distinguishable. Pairs without an entry are
    /// never eliminated.
    pub fn is_eliminated(&self, pair: StatePair) -> bool {
        self.entry(pair).is_some_and(ImplicationEntry::is_eliminated)
    }

    /// Counts the eliminated entries.
    pub fn eliminated_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|entry| entry.is_eliminated())
            .count()
    }

    /// Computes `(high - 1, low)`. The canonical form guarantees `high > low`, hence
    /// `high >= 1`, while `high <= num_states - 1` is enforced by the row lookup.
    fn address(pair: StatePair) -> Option<(usize, usize)> {
        if pair.high <= pair.low {
            return None;
        }
        Some((pair.high.checked_sub(1)?, pair.low))
    }
}
