use tracing::trace;

use crate::{
    math::{Map, Partition},
    model::TransitionModel,
    Color, StateId,
};

/// Computes the coarsest partition of the states of `model` in which equivalent states emit
/// the same outputs and move into equivalent states on every input, using Moore's partition
/// refinement. States start out grouped by their outputs and classes are split by the
/// classes of their successors until the number of classes stops growing.
///
/// This yields the same equivalence as the implication table computed by
/// [`crate::minimize`], and the classes are ordered by their smallest member in the same way.
pub fn partition_refinement<O: Color>(model: &TransitionModel<O>) -> Partition<StateId> {
    let mut class_of = numbering(model.states().map(|q| {
        model
            .row(q)
            .iter()
            .map(|t| t.output.clone())
            .collect::<Vec<_>>()
    }));
    let mut size = class_of.iter().max().map_or(0, |max| max + 1);
    trace!("outputs split {} states into {size} classes", model.num_states());

    loop {
        let refined = numbering(model.states().map(|q| {
            let mut signature = Vec::with_capacity(model.num_inputs() + 1);
            signature.push(class_of[q]);
            signature.extend(model.row(q).iter().map(|t| class_of[t.next_state]));
            signature
        }));
        let refined_size = refined.iter().max().map_or(0, |max| max + 1);
        class_of = refined;
        if refined_size == size {
            break;
        }
        trace!("refined {size} into {refined_size} classes");
        size = refined_size;
    }

    let mut classes = vec![vec![]; size];
    for (state, class) in class_of.into_iter().enumerate() {
        classes[class].push(state);
    }
    Partition::new(classes)
}

/// Assigns consecutive numbers to the distinct keys in the order they first appear.
fn numbering<K, I>(keys: I) -> Vec<usize>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut ids: Map<K, usize> = Map::default();
    keys.into_iter()
        .map(|key| {
            let next = ids.len();
            *ids.entry(key).or_insert(next)
        })
        .collect()
}
