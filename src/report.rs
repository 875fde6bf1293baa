use std::fmt::Display;

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{
    classes::Minimization,
    implication::{ImplicationTable, StatePair},
    math::Partition,
    model::TransitionModel,
    StateId,
};

/// Helper trait which can be used to display states, tables and results. This is mainly
/// used for debugging and by the command line tool, the output is meant for humans.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;
}

impl Show for StatePair {
    fn show(&self) -> String {
        let (low, high) = self.ascending();
        format!("S{low}-S{high}")
    }
}

impl Show for Partition<StateId> {
    fn show(&self) -> String {
        self.iter()
            .map(|class| format!("{{{}}}", class.iter().join(", ")))
            .join(", ")
    }
}

impl<O: Display> Show for TransitionModel<O> {
    /// Renders the transition table, one row per state and one column per input, where each
    /// cell reads `next_state / output`.
    fn show(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.inputs().map(|a| format!("{a}"))),
        );
        for state in self.states() {
            builder.push_record(
                std::iter::once(format!("S{state}")).chain(
                    self.row(state)
                        .iter()
                        .map(|t| format!("S{} / {}", t.next_state, t.output)),
                ),
            );
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Show for ImplicationTable {
    /// Renders the triangular table the way it is drawn by hand: row `S{i}` and column
    /// `S{j}` hold the entry for the pair of both states, a red `X` marks an eliminated pair,
    /// otherwise the pairs it depends on are listed (`=` if there are none).
    fn show(&self) -> String {
        let n = self.num_states();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain((0..n.saturating_sub(1)).map(|j| format!("S{j}"))),
        );
        for i in 1..n {
            let mut row = vec![format!("S{i}")];
            for j in 0..n - 1 {
                let cell = match self.lookup(i, j) {
                    Some(entry) if j < i && entry.is_eliminated() => "X".red().to_string(),
                    Some(entry) if j < i && entry.dependencies().is_empty() => "=".to_string(),
                    Some(entry) if j < i => entry.dependencies().iter().map(Show::show).join(" "),
                    _ => String::new(),
                };
                row.push(cell);
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::ascii())
            .to_string()
    }
}

impl Minimization {
    /// Renders the classes as a table listing the name of each class, its members and the
    /// state whose transitions the class takes over in the minimized machine.
    pub fn class_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Class", "States", "Representative"]);
        for (k, class) in self.classes().iter().enumerate() {
            builder.push_record([
                format!("A{k}").bold().to_string(),
                class.iter().map(|q| format!("S{q}")).join(", "),
                class
                    .first()
                    .map(|q| format!("S{q}"))
                    .unwrap_or_default(),
            ]);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Show for Minimization {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Display for Minimization {
    /// Lists every pair of equivalent states followed by the equivalence classes, where
    /// class `k` is named `Ak`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "---- Equivalent Pairs Found ----")?;
        if self.is_minimal() {
            writeln!(
                f,
                "No equivalent states found. The machine is already minimal."
            )?;
        }
        for (low, high) in self.equivalent_pairs() {
            writeln!(f, "S{low} and S{high} are equivalent.")?;
        }

        writeln!(f)?;
        writeln!(f, "---- Final Equivalence Classes ----")?;
        for (k, class) in self.classes().iter().enumerate() {
            writeln!(f, "A{k} = {{ {} }}", class.iter().join(", "))?;
        }
        Ok(())
    }
}
