use std::ops::Range;

use tracing::trace;

use crate::{Color, InputId, Int, StateId, ValidationError};

/// The effect of reading one input symbol in some state: the machine moves to `next_state`
/// and emits `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition<O = Int> {
    /// The state that is reached.
    pub next_state: StateId,
    /// The output that is emitted.
    pub output: O,
}

impl<O> Transition<O> {
    /// Creates a new transition.
    pub fn new(next_state: StateId, output: O) -> Self {
        Self { next_state, output }
    }
}

/// A validated deterministic machine with `num_states` states and `num_inputs` input symbols.
/// For every state and every input there is precisely one [`Transition`] and its target is
/// guaranteed to be one of the states of the machine. Once built, a model is never modified.
///
/// Models are either built from complete rows with [`TransitionModel::from_rows`], or
/// transition by transition through a [`ModelBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionModel<O = Int> {
    num_states: usize,
    num_inputs: usize,
    // row-major, the transitions of state `q` occupy `q * num_inputs..(q + 1) * num_inputs`
    transitions: Vec<Transition<O>>,
}

impl<O: Color> TransitionModel<O> {
    /// Builds a model from one row per state, where row `q` lists `(next_state, output)` for
    /// the inputs `0, 1, ...` in order. All rows must have the same, positive, length.
    ///
    /// # Example
    /// ```
    /// use fsm_minimize::prelude::*;
    ///
    /// let model = TransitionModel::from_rows(vec![vec![(0, 'a')], vec![(0, 'b')]]).unwrap();
    /// assert_eq!(model.num_states(), 2);
    /// assert_eq!(model.next_state(1, 0), 0);
    /// assert_eq!(model.output(1, 0), &'b');
    /// ```
    pub fn from_rows<R, I>(rows: R) -> Result<Self, ValidationError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (StateId, O)>,
    {
        let rows: Vec<Vec<(StateId, O)>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let num_states = rows.len();
        let num_inputs = rows.first().map(Vec::len).unwrap_or_default();

        let mut builder = ModelBuilder::new(num_states, num_inputs);
        for (state, row) in rows.into_iter().enumerate() {
            if row.len() != num_inputs {
                return Err(ValidationError::malformed(
                    state,
                    row.len().min(num_inputs),
                    format!("row has {} entries, expected {num_inputs}", row.len()),
                ));
            }
            for (input, (next_state, output)) in row.into_iter().enumerate() {
                builder.add_transition(state, input, next_state, output);
            }
        }
        builder.build()
    }
}

impl<O> TransitionModel<O> {
    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the number of input symbols.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Iterates over all states in ascending order.
    pub fn states(&self) -> Range<StateId> {
        0..self.num_states
    }

    /// Iterates over all input symbols in ascending order.
    pub fn inputs(&self) -> Range<InputId> {
        0..self.num_inputs
    }

    /// Returns the transition for `state` on `input`, or `None` if either is out of range.
    pub fn get(&self, state: StateId, input: InputId) -> Option<&Transition<O>> {
        if state >= self.num_states || input >= self.num_inputs {
            return None;
        }
        self.transitions.get(state * self.num_inputs + input)
    }

    /// Returns all transitions of `state`, ordered by input symbol.
    ///
    /// # Panics
    /// If `state` is not a state of the model.
    pub fn row(&self, state: StateId) -> &[Transition<O>] {
        assert!(state < self.num_states, "S{state} does not exist");
        &self.transitions[state * self.num_inputs..(state + 1) * self.num_inputs]
    }

    /// Returns the transition for `state` on `input`.
    ///
    /// # Panics
    /// If `state` or `input` is out of range.
    pub fn transition(&self, state: StateId, input: InputId) -> &Transition<O> {
        &self.row(state)[input]
    }

    /// Returns the state that is reached from `state` on `input`.
    pub fn next_state(&self, state: StateId, input: InputId) -> StateId {
        self.transition(state, input).next_state
    }

    /// Returns the output that is emitted from `state` on `input`.
    pub fn output(&self, state: StateId, input: InputId) -> &O {
        &self.transition(state, input).output
    }
}

/// Helper struct for the construction of a [`TransitionModel`] one transition at a time.
/// Transitions are given as tuples `(state, input, next_state, output)`, nothing is checked
/// until [`ModelBuilder::build`] is called.
///
/// # Example
///
/// A machine with two states and one input, where both states emit `0` and move to the
/// respectively other state.
/// ```
/// use fsm_minimize::prelude::*;
///
/// let model = ModelBuilder::new(2, 1)
///     .with_transitions([(0, 0, 1, 0), (1, 0, 0, 0)])
///     .build()
///     .unwrap();
/// assert_eq!(model.next_state(0, 0), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder<O = Int> {
    num_states: usize,
    num_inputs: usize,
    transitions: Vec<(StateId, InputId, StateId, O)>,
}

impl<O: Color> ModelBuilder<O> {
    /// Creates an empty builder for a machine of the given dimensions.
    pub fn new(num_states: usize, num_inputs: usize) -> Self {
        Self {
            num_states,
            num_inputs,
            transitions: vec![],
        }
    }

    /// Adds a list of transitions, each given as `(state, input, next_state, output)`.
    pub fn with_transitions<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (StateId, InputId, StateId, O)>,
    {
        self.transitions.extend(iter);
        self
    }

    /// Adds a single transition.
    pub fn add_transition(
        &mut self,
        state: StateId,
        input: InputId,
        next_state: StateId,
        output: O,
    ) -> &mut Self {
        self.transitions.push((state, input, next_state, output));
        self
    }

    /// Validates the collected transitions and turns them into a [`TransitionModel`]. This
    /// fails if one of the dimensions is zero, if a transition is given twice or lies outside
    /// the machine, if a target state does not exist or if some transition is missing.
    pub fn build(self) -> Result<TransitionModel<O>, ValidationError> {
        let Self {
            num_states,
            num_inputs,
            transitions,
        } = self;

        if num_states == 0 {
            return Err(ValidationError::InvalidCount {
                what: "states",
                value: 0,
            });
        }
        if num_inputs == 0 {
            return Err(ValidationError::InvalidCount {
                what: "inputs",
                value: 0,
            });
        }

        let cells = num_states
            .checked_mul(num_inputs)
            .ok_or(ValidationError::AllocationFailure { states: num_states })?;
        let mut slots: Vec<Option<Transition<O>>> = Vec::new();
        slots
            .try_reserve_exact(cells)
            .map_err(|_| ValidationError::AllocationFailure { states: num_states })?;
        slots.resize(cells, None);

        for (state, input, next_state, output) in transitions {
            if state >= num_states || input >= num_inputs {
                return Err(ValidationError::malformed(
                    state,
                    input,
                    format!("machine only has {num_states} states and {num_inputs} inputs"),
                ));
            }
            if next_state >= num_states {
                return Err(ValidationError::out_of_range(
                    state, input, next_state, num_states,
                ));
            }
            let slot = &mut slots[state * num_inputs + input];
            if slot.is_some() {
                return Err(ValidationError::malformed(
                    state,
                    input,
                    "transition is given twice",
                ));
            }
            *slot = Some(Transition::new(next_state, output));
        }

        let transitions = slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or_else(|| {
                    ValidationError::malformed(
                        position / num_inputs,
                        position % num_inputs,
                        "transition is missing",
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!("built model with {num_states} states and {num_inputs} inputs");
        Ok(TransitionModel {
            num_states,
            num_inputs,
            transitions,
        })
    }
}
