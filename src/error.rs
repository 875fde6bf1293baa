use thiserror::Error;

use crate::{InputId, StateId};

/// Everything that can go wrong before the minimization starts. All of these are detected
/// eagerly, a computation that encountered one of them produces no result at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The number of states or the number of inputs is not positive.
    #[error("number of {what} must be positive, got {value}")]
    InvalidCount {
        /// Which count was rejected, either `"states"` or `"inputs"`.
        what: &'static str,
        /// The value that was given.
        value: i64,
    },
    /// A transition leads to a state outside of `0..num_states`.
    #[error("transition from S{state} on input {input} leads to {next_state}, but there are only {num_states} states")]
    OutOfRangeTransition {
        /// Source state of the offending transition.
        state: StateId,
        /// Input symbol of the offending transition.
        input: InputId,
        /// The target that was given.
        next_state: i64,
        /// Number of states of the machine.
        num_states: usize,
    },
    /// Transition data is missing, given twice, addressed outside of the machine or could
    /// not be read at all.
    #[error("malformed entry for S{state} on input {input}: {reason}")]
    MalformedEntry {
        /// State of the entry.
        state: StateId,
        /// Input symbol of the entry.
        input: InputId,
        /// What is wrong with it.
        reason: String,
    },
    /// A result computed for one machine was applied to a machine of a different size.
    #[error("expected a machine with {expected} states, got {found}")]
    DimensionMismatch {
        /// The number of states the result was computed for.
        expected: usize,
        /// The number of states of the given machine.
        found: usize,
    },
    /// The internal tables for the given number of states could not be allocated.
    #[error("could not allocate implication table for {states} states")]
    AllocationFailure {
        /// The number of states for which allocation was attempted.
        states: usize,
    },
}

impl ValidationError {
    pub(crate) fn malformed(state: StateId, input: InputId, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            state,
            input,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(
        state: StateId,
        input: InputId,
        next_state: impl TryInto<i64>,
        num_states: usize,
    ) -> Self {
        Self::OutOfRangeTransition {
            state,
            input,
            next_state: next_state.try_into().unwrap_or(i64::MAX),
            num_states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn error_messages() {
        let err = ValidationError::out_of_range(1, 0, 7usize, 3);
        assert_eq!(
            err.to_string(),
            "transition from S1 on input 0 leads to 7, but there are only 3 states"
        );
        let err = ValidationError::InvalidCount {
            what: "inputs",
            value: 0,
        };
        assert_eq!(err.to_string(), "number of inputs must be positive, got 0");
    }
}
