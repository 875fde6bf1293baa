use bit_set::BitSet;
use tracing::debug;

use crate::{
    implication::ImplicationTable,
    math::Partition,
    model::{ModelBuilder, TransitionModel},
    Color, StateId, ValidationError,
};

/// Merges states into equivalence classes. Every state points to a representative (its
/// "boss"), initially itself. Merging the classes of two states redirects every state that
/// reports to the first boss to the second one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClassBuilder {
    boss: Vec<StateId>,
}

impl EquivalenceClassBuilder {
    /// Creates a builder in which every one of the `num_states` states forms its own class.
    pub fn new(num_states: usize) -> Self {
        Self {
            boss: (0..num_states).collect(),
        }
    }

    /// Reads the surviving pairs of a finished [`ImplicationTable`] and collects them into
    /// a [`Minimization`].
    pub fn build(table: &ImplicationTable) -> Minimization {
        let mut builder = Self::new(table.num_states());
        let mut equivalent_pairs = vec![];

        for pair in table.surviving_pairs() {
            builder.merge(pair.high(), pair.low());
            equivalent_pairs.push(pair.ascending());
        }

        let classes = builder.classes();
        debug!(
            "{} states fall into {} classes",
            table.num_states(),
            classes.size()
        );
        Minimization {
            num_states: table.num_states(),
            equivalent_pairs,
            classes,
        }
    }

    /// Returns the current representative of `state`.
    pub fn representative(&self, state: StateId) -> Option<StateId> {
        self.boss.get(state).copied()
    }

    /// Moves every state that shares the representative of `from` into the class of `into`.
    /// Both states must exist.
    pub(crate) fn merge(&mut self, from: StateId, into: StateId) {
        debug_assert!(from < self.boss.len(), "S{from} does not exist");
        debug_assert!(into < self.boss.len(), "S{into} does not exist");
        let (old_boss, new_boss) = (self.boss[from], self.boss[into]);
        for boss in self.boss.iter_mut().filter(|boss| **boss == old_boss) {
            *boss = new_boss;
        }
    }

    /// Reads out the classes. They are ordered by their smallest member, which is the order
    /// in which a scan over the states first encounters them.
    pub fn classes(&self) -> Partition<StateId> {
        let mut visited = BitSet::with_capacity(self.boss.len());
        let mut classes = vec![];

        for (state, boss) in self.boss.iter().enumerate() {
            if !visited.insert(state) {
                continue;
            }
            let mut class = vec![state];
            for (other, other_boss) in self.boss.iter().enumerate().skip(state + 1) {
                if other_boss == boss && visited.insert(other) {
                    class.push(other);
                }
            }
            classes.push(class);
        }

        Partition::new(classes)
    }
}

/// The outcome of minimizing a machine: the pairs of equivalent states and the partition of
/// all states into equivalence classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimization {
    num_states: usize,
    equivalent_pairs: Vec<(StateId, StateId)>,
    classes: Partition<StateId>,
}

impl Minimization {
    /// The number of states of the machine that was minimized.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// All pairs of distinct equivalent states as `(smaller, larger)`, ordered by the larger
    /// state first and the smaller state second.
    pub fn equivalent_pairs(&self) -> &[(StateId, StateId)] {
        &self.equivalent_pairs
    }

    /// The equivalence classes, class `k` is the `k`-th class to be encountered when going
    /// through the states in ascending order.
    pub fn classes(&self) -> &Partition<StateId> {
        &self.classes
    }

    /// Returns the index of the class containing `state`.
    pub fn class_of(&self, state: StateId) -> Option<usize> {
        self.classes.class_of(&state)
    }

    /// Returns true if `p` and `q` are equivalent. Every state is equivalent to itself.
    pub fn equivalent(&self, p: StateId, q: StateId) -> bool {
        self.classes.related(&p, &q)
    }

    /// Returns true if no two distinct states are equivalent.
    pub fn is_minimal(&self) -> bool {
        self.equivalent_pairs.is_empty()
    }

    /// Builds the minimized machine, which has one state per class. The transitions of class
    /// `k` are those of the smallest state in the class, with targets replaced by their class.
    ///
    /// `model` has to be the machine this minimization was computed for, otherwise an error
    /// is returned.
    pub fn quotient<O: Color>(
        &self,
        model: &TransitionModel<O>,
    ) -> Result<TransitionModel<O>, ValidationError> {
        if model.num_states() != self.num_states {
            return Err(ValidationError::DimensionMismatch {
                expected: self.num_states,
                found: model.num_states(),
            });
        }

        let mut builder = ModelBuilder::new(self.classes.size(), model.num_inputs());
        for (class, members) in self.classes.iter().enumerate() {
            let Some(&representative) = members.first() else {
                continue;
            };
            for (input, transition) in model.row(representative).iter().enumerate() {
                let target = self.class_of(transition.next_state).ok_or_else(|| {
                    ValidationError::out_of_range(
                        representative,
                        input,
                        transition.next_state,
                        self.num_states,
                    )
                })?;
                builder.add_transition(class, input, target, transition.output.clone());
            }
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::EquivalenceClassBuilder;
    use crate::prelude::*;

    #[test]
    fn merging_redirects_whole_class() {
        let mut builder = EquivalenceClassBuilder::new(5);
        builder.merge(3, 1);
        builder.merge(4, 3);
        assert_eq!(builder.representative(4), Some(1));
        builder.merge(1, 0);
        assert_eq!(builder.representative(3), Some(0));
        assert_eq!(builder.representative(4), Some(0));
        assert_eq!(
            builder.classes(),
            Partition::new([vec![0, 1, 3, 4], vec![2]])
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "S7 does not exist")]
    fn merging_unknown_state_panics() {
        let mut builder = EquivalenceClassBuilder::new(5);
        builder.merge(7, 0);
    }

    #[test]
    fn classes_ordered_by_smallest_member() {
        let mut builder = EquivalenceClassBuilder::new(4);
        builder.merge(3, 1);
        let classes = builder.classes();
        let ordered: Vec<Vec<usize>> = classes
            .iter()
            .map(|class| class.iter().copied().collect())
            .collect();
        assert_eq!(ordered, vec![vec![0], vec![1, 3], vec![2]]);
    }

    #[test]
    fn quotient_collapses_classes() {
        // S1 and S2 are equivalent, both loop and emit 1
        let model =
            TransitionModel::from_rows(vec![vec![(2, 0)], vec![(1, 1)], vec![(2, 1)]]).unwrap();
        let minimization = minimize(&model).unwrap();
        assert_eq!(minimization.equivalent_pairs(), &[(1, 2)]);
        assert!(minimization.equivalent(2, 1));
        assert!(minimization.equivalent(0, 0));
        assert!(!minimization.is_minimal());

        let quotient = minimization.quotient(&model).unwrap();
        assert_eq!(quotient.num_states(), 2);
        assert_eq!(quotient.next_state(0, 0), 1);
        assert_eq!(quotient.next_state(1, 0), 1);
        assert_eq!(*quotient.output(0, 0), 0);
        assert_eq!(*quotient.output(1, 0), 1);
    }

    #[test]
    fn quotient_rejects_other_model() {
        let model = TransitionModel::from_rows(vec![vec![(0, 0)]]).unwrap();
        let minimization = minimize(&model).unwrap();
        let other = TransitionModel::from_rows(vec![vec![(1, 0)], vec![(0, 0)]]).unwrap();
        assert_eq!(
            minimization.quotient(&other),
            Err(ValidationError::DimensionMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
