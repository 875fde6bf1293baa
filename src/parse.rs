//! Machines are described as a stream of whitespace separated integers: first the number of
//! states and the number of inputs, followed by a `next_state output` pair for every state
//! and every input, states in ascending order and within a state the inputs in ascending
//! order. Everything after a `#` up to the end of the line is ignored.
//!
//! ```text
//! # two states, one input
//! 2 1
//! 1 0   # S0 on input 0
//! 0 0   # S1 on input 0
//! ```
use tracing::trace;

use crate::{model::ModelBuilder, InputId, Int, StateId, TransitionModel, ValidationError};

/// Parses a machine description, see the [module level documentation](crate::parse) for the format.
///
/// # Example
/// ```
/// use fsm_minimize::prelude::*;
///
/// let model = parse_description("2 1\n1 0\n0 0").unwrap();
/// assert_eq!(model.num_states(), 2);
/// assert_eq!(model.next_state(0, 0), 1);
/// ```
pub fn parse_description(input: &str) -> Result<TransitionModel<Int>, ValidationError> {
    let mut tokens = Tokens::new(input);

    let num_states = tokens.read_count("states")?;
    let num_inputs = tokens.read_count("inputs")?;
    trace!("reading description of {num_states} states and {num_inputs} inputs");

    let mut builder = ModelBuilder::new(num_states, num_inputs);
    for state in 0..num_states {
        for input in 0..num_inputs {
            let next_state = tokens.value(state, input, "next state")?;
            let output = tokens.value(state, input, "output")?;
            let next_state = usize::try_from(next_state)
                .ok()
                .filter(|&next| next < num_states)
                .ok_or_else(|| {
                    ValidationError::out_of_range(state, input, next_state, num_states)
                })?;
            builder.add_transition(state, input, next_state, output);
        }
    }

    if let Some(surplus) = tokens.next_token() {
        return Err(ValidationError::malformed(
            num_states - 1,
            num_inputs - 1,
            format!("unexpected token `{surplus}` after the last transition"),
        ));
    }

    builder.build()
}

struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = &'a str> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: Box::new(
                input
                    .lines()
                    .map(|line| line.split_once('#').map_or(line, |(content, _)| content))
                    .flat_map(str::split_whitespace),
            ),
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize, ValidationError> {
        let token = self.next_token().ok_or_else(|| {
            ValidationError::malformed(0, 0, format!("missing number of {what}"))
        })?;
        let value: i64 = token.parse().map_err(|_| {
            ValidationError::malformed(0, 0, format!("number of {what} `{token}` is no integer"))
        })?;
        if value <= 0 {
            return Err(ValidationError::InvalidCount { what, value });
        }
        usize::try_from(value).map_err(|_| ValidationError::InvalidCount { what, value })
    }

    fn value(
        &mut self,
        state: StateId,
        input: InputId,
        what: &'static str,
    ) -> Result<i64, ValidationError> {
        let token = self
            .next_token()
            .ok_or_else(|| ValidationError::malformed(state, input, format!("missing {what}")))?;
        token.parse().map_err(|_| {
            ValidationError::malformed(state, input, format!("{what} `{token}` is no integer"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::parse_description;
    use crate::ValidationError;

    #[test]
    fn parse_with_comments() {
        let model = parse_description(
            "# states and inputs\n3 2\n\
             1 0 2 1 # S0\n\
             0 0 2 1\n\
             2 5 2 5\n",
        )
        .unwrap();
        assert_eq!(model.num_states(), 3);
        assert_eq!(model.num_inputs(), 2);
        assert_eq!(model.next_state(0, 1), 2);
        assert_eq!(*model.output(2, 0), 5);
    }

    #[test]
    fn parse_reads_counts_before_transitions() {
        let model = parse_description("3 1  2 0  0 1  1 0").unwrap();
        assert_eq!(model.num_states(), 3);
        assert_eq!(model.num_inputs(), 1);
        assert_eq!(model.next_state(2, 0), 1);
        assert_eq!(*model.output(1, 0), 1);
    }

    #[test]
    fn parse_rejects_bad_counts() {
        assert_eq!(
            parse_description("0 1"),
            Err(ValidationError::InvalidCount {
                what: "states",
                value: 0
            })
        );
        assert_eq!(
            parse_description("2 -1"),
            Err(ValidationError::InvalidCount {
                what: "inputs",
                value: -1
            })
        );
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert_eq!(
            parse_description("2 1  0 0  -1 0"),
            Err(ValidationError::OutOfRangeTransition {
                state: 1,
                input: 0,
                next_state: -1,
                num_states: 2
            })
        );
        assert!(matches!(
            parse_description("2 1  2 0  0 0"),
            Err(ValidationError::OutOfRangeTransition { next_state: 2, .. })
        ));
    }

    #[test]
    fn parse_rejects_malformed_entries() {
        assert!(matches!(
            parse_description("2 1  0 0  1"),
            Err(ValidationError::MalformedEntry {
                state: 1,
                input: 0,
                ..
            })
        ));
        assert!(matches!(
            parse_description("1 1  0 x"),
            Err(ValidationError::MalformedEntry { .. })
        ));
        assert!(matches!(
            parse_description("2 3  0 0 0 0 0 0  1 0 1 0 1 0  4"),
            Err(ValidationError::MalformedEntry {
                state: 1,
                input: 2,
                ..
            })
        ));
        assert!(matches!(
            parse_description(""),
            Err(ValidationError::MalformedEntry { .. })
        ));
    }
}
