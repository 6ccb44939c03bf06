//! This module defines the `TransitionTable`, the rule set of a machine together with the
//! classification of each of its states.

use crate::analyzer::{analyze, has_halting_state, shadowed_rules, unreachable_states};
use crate::types::{MachineError, Rule, StateClass};
use std::collections::HashMap;

/// An ordered rule sequence plus a per-state classification mapping.
///
/// The rules are immutable once the table is built. The classification of a state may be
/// flipped to `Crashed` by the interpreter and back to `Running` when the run concludes.
///
/// Construction validates that state `0` and every state referenced by a rule are
/// classified, so lookups by the interpreter never go out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rules: Vec<Rule>,
    classes: Vec<StateClass>,
    index: HashMap<(usize, char), usize>,
}

impl TransitionTable {
    /// Creates a new `TransitionTable` from ordered rules and classifications indexed by state id.
    ///
    /// Duplicate `(source_state, read)` keys are accepted; only the first one in table order
    /// is ever used.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if every referenced state is classified.
    /// * `Err(MachineError)` otherwise.
    pub fn new(rules: Vec<Rule>, classes: Vec<StateClass>) -> Result<Self, MachineError> {
        analyze(&rules, &classes)?;

        for shadowed in shadowed_rules(&rules) {
            tracing::warn!(
                rule = %rules[shadowed],
                index = shadowed,
                "rule is shadowed by an earlier rule"
            );
        }
        for state in unreachable_states(&rules, &classes) {
            tracing::debug!(state, "state is unreachable from the initial state");
        }
        if !has_halting_state(&classes) {
            tracing::warn!("table has no halting state, every word will be rejected");
        }

        let mut index = HashMap::with_capacity(rules.len());
        for (position, rule) in rules.iter().enumerate() {
            index.entry((rule.source_state, rule.read)).or_insert(position);
        }

        Ok(Self {
            rules,
            classes,
            index,
        })
    }

    /// Finds the first rule, in table order, for the given state and symbol.
    pub fn find_rule(&self, state: usize, symbol: char) -> Option<&Rule> {
        self.index
            .get(&(state, symbol))
            .map(|&position| &self.rules[position])
    }

    /// Returns the classification of `state`, if it has one.
    pub fn classification(&self, state: usize) -> Option<StateClass> {
        self.classes.get(state).copied()
    }

    /// Returns the classification of a state known to be valid for this table.
    pub(crate) fn class_of(&self, state: usize) -> StateClass {
        self.classes[state]
    }

    /// Marks `state` as `Crashed`.
    pub(crate) fn mark_crashed(&mut self, state: usize) {
        self.classes[state] = StateClass::Crashed;
    }

    /// Clears a crash mark on `state`, returning it to `Running`.
    pub(crate) fn heal(&mut self, state: usize) {
        if self.classes[state] == StateClass::Crashed {
            self.classes[state] = StateClass::Running;
        }
    }

    /// Returns the rules in table order, shadowed duplicates included.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the current classification of every state, indexed by state id.
    ///
    /// Between runs no state is left `Crashed` by the interpreter, though a table may have
    /// been built with `Crashed` entries.
    pub fn classifications(&self) -> &[StateClass] {
        &self.classes
    }

    /// Returns the number of classified states.
    pub fn state_count(&self) -> usize {
        self.classes.len()
    }
}
