use tracing::{debug, trace};

use crate::{
    implication::{ImplicationTable, StatePair},
    model::TransitionModel,
    Color, ValidationError,
};

/// Drives an [`ImplicationTable`] for a given [`TransitionModel`] to its fixed point.
///
/// The work happens in three steps, which [`EliminationEngine::run`] performs in order:
/// 1. [`EliminationEngine::mark_output_differences`] eliminates every pair of states that
///    emit different outputs on some input symbol.
/// 2. [`EliminationEngine::record_dependencies`] notes, for every pair that survived, the
///    pairs of successor states that must be equivalent for the pair to be equivalent.
/// 3. [`EliminationEngine::propagate`] repeatedly sweeps the table and eliminates pairs that
///    depend on an eliminated pair, until a full sweep changes nothing.
///
/// The engine owns the table while it runs, afterwards the table is handed out read-only.
#[derive(Debug, Clone)]
pub struct EliminationEngine<'a, O> {
    model: &'a TransitionModel<O>,
    table: ImplicationTable,
}

impl<'a, O: Color> EliminationEngine<'a, O> {
    /// Allocates a fresh implication table for `model`.
    pub fn new(model: &'a TransitionModel<O>) -> Result<Self, ValidationError> {
        Ok(Self {
            table: ImplicationTable::new(model.num_states())?,
            model,
        })
    }

    /// Gives a reference to the table in its current state.
    pub fn table(&self) -> &ImplicationTable {
        &self.table
    }

    /// Runs all three steps and returns the finished table.
    pub fn run(mut self) -> ImplicationTable {
        let direct = self.mark_output_differences();
        self.record_dependencies();
        let passes = self.propagate();
        debug!(
            "eliminated {} of {} pairs, {direct} by output and the rest in {passes} passes",
            self.table.eliminated_count(),
            self.table.size()
        );
        self.table
    }

    /// Eliminates each pair for which some input symbol produces different outputs in the
    /// two states. Returns the number of eliminated pairs.
    pub fn mark_output_differences(&mut self) -> usize {
        let model = self.model;
        let pairs: Vec<StatePair> = self.table.pairs().collect();
        let mut eliminated = 0;

        for pair in pairs {
            let (i, j) = (pair.high(), pair.low());
            let Some(symbol) = model
                .inputs()
                .find(|&symbol| model.output(i, symbol) != model.output(j, symbol))
            else {
                continue;
            };

            trace!("{pair:?} differ in output on input {symbol}");
            if let Some(entry) = self.table.entry_mut(pair) {
                entry.eliminate();
                eliminated += 1;
            }
        }

        debug!("{eliminated} pairs eliminated by differing outputs");
        eliminated
    }

    /// Records, for every pair that is not eliminated, the pairs of successors on each input
    /// symbol. Symbols on which both states move to the same state impose no constraint, and
    /// neither do symbols on which the two states move into each other.
    pub fn record_dependencies(&mut self) {
        let model = self.model;
        let pairs: Vec<StatePair> = self.table.surviving_pairs().collect();

        for pair in pairs {
            let (i, j) = (pair.high(), pair.low());
            let Some(entry) = self.table.entry_mut(pair) else {
                continue;
            };
            for symbol in model.inputs() {
                let next_i = model.next_state(i, symbol);
                let next_j = model.next_state(j, symbol);
                let Some(dependency) = StatePair::new(next_i, next_j) else {
                    continue;
                };
                if dependency == pair {
                    continue;
                }
                entry.add_dependency(dependency);
            }
        }
    }

    /// Sweeps over all surviving pairs and eliminates those that depend on an eliminated
    /// pair, until a sweep produces no change. Dependencies are not ordered, so a pair may
    /// only become eliminated in a later sweep than the pair it depends on. Returns the
    /// number of sweeps that were made, including the last one which changed nothing.
    ///
    /// Dependencies that do not address a cell of the table are skipped.
    pub fn propagate(&mut self) -> usize {
        let pairs: Vec<StatePair> = self.table.pairs().collect();
        let mut passes = 0;

        loop {
            passes += 1;
            let mut changed = false;

            for &pair in &pairs {
                let Some(entry) = self.table.entry(pair) else {
                    continue;
                };
                if entry.is_eliminated() {
                    continue;
                }

                let culprit = entry
                    .dependencies()
                    .iter()
                    .find(|&&dependency| self.table.is_eliminated(dependency))
                    .copied();

                if let Some(dependency) = culprit {
                    trace!("{pair:?} eliminated as it depends on {dependency:?}");
                    if let Some(entry) = self.table.entry_mut(pair) {
                        entry.eliminate();
                    }
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        debug!("propagation reached fixed point after {passes} passes");
        passes
    }
}
