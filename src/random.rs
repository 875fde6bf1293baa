use tracing::trace;

use crate::{model::ModelBuilder, Int, TransitionModel, ValidationError};

/// Generates a random model with `num_states` states and `num_inputs` inputs, in which every
/// transition leads to a uniformly chosen state and emits an output drawn uniformly from
/// `0..num_outputs`. Fails if one of the dimensions is zero.
pub fn random_model(
    num_states: usize,
    num_inputs: usize,
    num_outputs: usize,
) -> Result<TransitionModel<Int>, ValidationError> {
    random_model_with(&mut fastrand::Rng::new(), num_states, num_inputs, num_outputs)
}

/// Works as [`random_model`], but draws from the given generator. Seeding the generator
/// makes the result reproducible.
pub fn random_model_with(
    rng: &mut fastrand::Rng,
    num_states: usize,
    num_inputs: usize,
    num_outputs: usize,
) -> Result<TransitionModel<Int>, ValidationError> {
    let outputs = Int::try_from(num_outputs.max(1)).unwrap_or(Int::MAX);
    let mut builder = ModelBuilder::new(num_states, num_inputs);
    for state in 0..num_states {
        for input in 0..num_inputs {
            builder.add_transition(
                state,
                input,
                rng.usize(..num_states),
                rng.i64(0..outputs),
            );
        }
    }
    trace!("generated random model with {num_states} states and {num_inputs} inputs");
    builder.build()
}

/// Generates a random model that is guaranteed to have equivalent states: a random model with
/// `num_states` states is built and then every state is duplicated, so that `q` and
/// `q + num_states` always behave the same.
pub fn random_redundant_model(
    rng: &mut fastrand::Rng,
    num_states: usize,
    num_inputs: usize,
    num_outputs: usize,
) -> Result<TransitionModel<Int>, ValidationError> {
    let base = random_model_with(rng, num_states, num_inputs, num_outputs)?;
    let mut builder = ModelBuilder::new(2 * num_states, num_inputs);
    for state in base.states() {
        for (input, transition) in base.row(state).iter().enumerate() {
            // the copy jumps back and forth between the two halves at random
            let next = transition.next_state + num_states * usize::from(rng.bool());
            builder.add_transition(state, input, next, transition.output);
            let next = transition.next_state + num_states * usize::from(rng.bool());
            builder.add_transition(state + num_states, input, next, transition.output);
        }
    }
    builder.build()
}
