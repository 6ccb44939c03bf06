//! This module provides functions for analyzing transition tables before execution. Fatal checks
//! ensure every state the interpreter can reach has a classification; diagnostic checks report
//! shadowed rules and unreachable states without rejecting the table.

use crate::types::{MachineError, Rule, StateClass, INITIAL_STATE};
use std::collections::{HashMap, HashSet};

/// Represents the problems that make a transition table unusable.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The initial state has no classification entry.
    MissingInitialState,
    /// Rules reference states that have no classification entry.
    UnclassifiedStates(Vec<usize>),
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into the matching `MachineError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::MissingInitialState => MachineError::UnclassifiedState(INITIAL_STATE),
            AnalysisError::UnclassifiedStates(states) => match states.as_slice() {
                [state] => MachineError::UnclassifiedState(*state),
                _ => MachineError::ValidationError(format!(
                    "States without classification: {:?}",
                    states
                )),
            },
        }
    }
}

/// Analyzes a rule sequence and its classification mapping for errors that would make the
/// interpreter fault.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError)` describing the first failed check.
pub fn analyze(rules: &[Rule], classes: &[StateClass]) -> Result<(), MachineError> {
    let checks: [fn(&[Rule], &[StateClass]) -> Result<(), AnalysisError>; 2] =
        [check_initial_state, check_unclassified_states];

    checks
        .iter()
        .try_for_each(|check| check(rules, classes))
        .map_err(MachineError::from)
}

/// Checks that the initial state has a classification entry. An empty classification
/// mapping fails here.
fn check_initial_state(_rules: &[Rule], classes: &[StateClass]) -> Result<(), AnalysisError> {
    if INITIAL_STATE >= classes.len() {
        return Err(AnalysisError::MissingInitialState);
    }

    Ok(())
}

/// Checks that every source and destination state referenced by a rule is classified.
fn check_unclassified_states(rules: &[Rule], classes: &[StateClass]) -> Result<(), AnalysisError> {
    let mut missing: Vec<usize> = rules
        .iter()
        .flat_map(|rule| [rule.source_state, rule.next_state])
        .filter(|&state| state >= classes.len())
        .collect();

    if !missing.is_empty() {
        missing.sort_unstable();
        missing.dedup();
        return Err(AnalysisError::UnclassifiedStates(missing));
    }

    Ok(())
}

/// Returns the indices of rules that can never fire because an earlier rule has the same
/// `(source_state, read)` key.
pub fn shadowed_rules(rules: &[Rule]) -> Vec<usize> {
    let mut first_seen = HashMap::new();

    rules
        .iter()
        .enumerate()
        .filter(|(index, rule)| {
            *first_seen
                .entry((rule.source_state, rule.read))
                .or_insert(*index)
                != *index
        })
        .map(|(index, _)| index)
        .collect()
}

/// Returns the classified states that no sequence of rules leads to from the initial state.
pub fn unreachable_states(rules: &[Rule], classes: &[StateClass]) -> Vec<usize> {
    let mut visited = HashSet::new();
    let mut queue = vec![INITIAL_STATE];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        queue.extend(
            rules
                .iter()
                .filter(|rule| rule.source_state == state)
                .map(|rule| rule.next_state)
                .filter(|next| !visited.contains(next)),
        );
    }

    (0..classes.len())
        .filter(|state| !visited.contains(state))
        .collect()
}

/// Returns true if at least one state is classified `Halting`.
pub fn has_halting_state(classes: &[StateClass]) -> bool {
    classes.contains(&StateClass::Halting)
}
