//! Library for minimizing deterministic finite-state machines with state-dependent output.
//!
//! A machine is given as a [`TransitionModel`], which assigns to every state and every input
//! symbol a successor state and an output. Two states are equivalent if no sequence of inputs
//! can tell them apart by the outputs that are produced. The crate computes these equivalences
//! with the classical implication table: every unordered pair of states gets an entry in a
//! triangular [`ImplicationTable`], pairs with differing outputs are eliminated right away and
//! the [`EliminationEngine`] then propagates eliminations along the recorded next-state
//! dependencies until a fixed point is reached. Finally the [`EquivalenceClassBuilder`] collapses
//! the surviving pairs into equivalence classes, which are returned as a [`Minimization`].
//!
//! ```
//! use fsm_minimize::prelude::*;
//!
//! // S0 and S1 swap into each other on the only input and emit the same output.
//! let model = TransitionModel::from_rows(vec![vec![(1, 0)], vec![(0, 0)]]).unwrap();
//! let minimization = minimize(&model).unwrap();
//! assert_eq!(minimization.equivalent_pairs(), &[(0, 1)]);
//! assert_eq!(minimization.classes().size(), 1);
//! ```
//!
//! Further components that are of importance are
//! - [`parse`], which reads the plain integer description of a machine,
//! - [`report`], which renders tables and results for humans,
//! - [`refine`], a partition refinement that computes the same partition in a different way
//!   and is mainly used to cross-check the implication table.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::{fmt::Debug, hash::Hash};

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use fsm_minimize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        classes::{EquivalenceClassBuilder, Minimization},
        elimination::EliminationEngine,
        error::ValidationError,
        implication::{ImplicationEntry, ImplicationTable, StatePair},
        math::{self, Partition},
        minimize,
        model::{ModelBuilder, Transition, TransitionModel},
        parse::parse_description,
        refine::partition_refinement,
        report::Show,
        Color, InputId, Int, StateId,
    };
}

/// Type aliases and the [`math::Partition`] type that is shared by the algorithms.
pub mod math;

/// Errors that can be raised while validating a machine.
pub mod error;
pub use error::ValidationError;

/// Defines the validated, read-only transition model of a machine.
pub mod model;
pub use model::TransitionModel;

/// The triangular implication table over unordered state pairs.
pub mod implication;
pub use implication::{ImplicationTable, StatePair};

/// Builds the implication table and propagates eliminations to a fixed point.
pub mod elimination;
pub use elimination::EliminationEngine;

/// Collapses surviving pairs into equivalence classes.
pub mod classes;
pub use classes::{EquivalenceClassBuilder, Minimization};

/// Partition refinement, an independent way of computing the coarsest equivalence.
pub mod refine;

/// Reading machine descriptions from text.
pub mod parse;

/// Human readable output of models, implication tables and results.
pub mod report;

/// Implements the generation of random transition models.
#[cfg(feature = "random")]
pub mod random;

/// Index of a state, states of a machine with `n` states are `0..n`.
pub type StateId = usize;

/// Index of an input symbol, a machine with `k` inputs reads symbols `0..k`.
pub type InputId = usize;

/// Alias for the default type of outputs, this is what [`parse`] produces.
pub type Int = i64;

/// A color is simply a type that can be used as the output of a transition. Outputs are only
/// ever compared for equality, hashing is needed for [`refine`].
pub trait Color: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Color for T {}

/// Minimizes the given model, this runs the whole pipeline: the implication table is built and
/// driven to its fixed point by an [`EliminationEngine`], after which an
/// [`EquivalenceClassBuilder`] reads out the partition.
///
/// Fails with [`ValidationError::AllocationFailure`] if the implication table for the model
/// cannot be allocated.
pub fn minimize<O: Color>(model: &TransitionModel<O>) -> Result<Minimization, ValidationError> {
    let table = EliminationEngine::new(model)?.run();
    Ok(EquivalenceClassBuilder::build(&table))
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The example from the wikipedia article on DFA minimization, the output of each
    /// transition is the acceptance of its source state.
    pub fn wiki_model() -> TransitionModel<bool> {
        let accepting = [false, false, true, true, true, false];
        ModelBuilder::new(6, 2)
            .with_transitions(
                [
                    (0, 0, 1),
                    (0, 1, 2),
                    (1, 0, 0),
                    (1, 1, 3),
                    (2, 0, 4),
                    (2, 1, 5),
                    (3, 0, 4),
                    (3, 1, 5),
                    (4, 0, 4),
                    (4, 1, 5),
                    (5, 0, 5),
                    (5, 1, 5),
                ]
                .map(|(p, a, q)| (p, a, q, accepting[p])),
            )
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn minimize_wiki_model() {
        let minimization = minimize(&wiki_model()).unwrap();
        assert_eq!(
            minimization.classes(),
            &Partition::new([vec![0, 1], vec![2, 3, 4], vec![5]])
        );
        assert_eq!(
            minimization.equivalent_pairs(),
            &[(0, 1), (2, 3), (2, 4), (3, 4)]
        );
    }

    #[test]
    fn minimize_agrees_with_refinement() {
        let model = wiki_model();
        let minimization = minimize(&model).unwrap();
        assert_eq!(minimization.classes(), &partition_refinement(&model));
    }
}
