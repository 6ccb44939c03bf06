//! This module defines the `TuringMachine` struct, which interprets a `TransitionTable` over a
//! single tape to decide whether a word belongs to the machine's language.

use crate::table::TransitionTable;
use crate::types::{
    Direction, MachineError, RejectReason, Rejection, StateClass, Step, Verdict, INITIAL_STATE,
    TERMINATOR_SYMBOL,
};
use std::iter;

/// Represents a deterministic single-tape Turing Machine.
///
/// The machine owns its `TransitionTable`. A crash relabels the current state as `Crashed`
/// in that table, and concluding the run relabels it `Running` again, so the same machine can
/// decide any number of words in sequence. Because `run` takes `&mut self`, a table is never
/// observed by two runs at once.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    table: TransitionTable,
    state: usize,
    head: usize,
    tape: Vec<char>,
    step_count: usize,
    last_rejection: Option<Rejection>,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` bound to `table`, loaded with the empty word.
    pub fn new(table: TransitionTable) -> Self {
        Self {
            table,
            state: INITIAL_STATE,
            head: 0,
            tape: vec![TERMINATOR_SYMBOL],
            step_count: 0,
            last_rejection: None,
        }
    }

    /// Resets the run state: the machine returns to state `0` with the head on the first cell
    /// of `word` followed by a single terminator symbol.
    pub fn reset(&mut self, word: &str) {
        self.state = INITIAL_STATE;
        self.head = 0;
        self.tape = word.chars().chain(iter::once(TERMINATOR_SYMBOL)).collect();
        self.step_count = 0;
        self.last_rejection = None;
    }

    /// Executes a single step of the machine.
    ///
    /// Looks up the rule for the current state and the symbol under the head, writes its symbol
    /// in place, moves the head and enters the rule's next state.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied.
    /// * `Step::Crash(_)` if there is no rule, or the rule moves the head off the left end. The
    ///   current state is then classified `Crashed` and neither the state nor the head moves.
    /// * `Step::Halt` if the current state is not `Running`. Nothing changes.
    pub fn step(&mut self) -> Step {
        if self.table.class_of(self.state) != StateClass::Running {
            return Step::Halt;
        }

        let symbol = self.symbol();
        let rule = match self.table.find_rule(self.state, symbol) {
            Some(rule) => *rule,
            None => return self.crash(symbol, RejectReason::NoRule),
        };

        self.tape[self.head] = rule.write;

        match rule.direction {
            Direction::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(TERMINATOR_SYMBOL);
                }
            }
            Direction::Left => {
                if self.head == 0 {
                    return self.crash(symbol, RejectReason::LeftBoundary);
                }
                self.head -= 1;
            }
        }

        tracing::trace!(step = self.step_count, rule = %rule, head = self.head, "applied rule");

        self.state = rule.next_state;
        self.step_count += 1;

        Step::Continue
    }

    fn crash(&mut self, symbol: char, reason: RejectReason) -> Step {
        tracing::debug!(state = self.state, head = self.head, ?reason, "machine crashed");

        self.table.mark_crashed(self.state);
        self.last_rejection = Some(Rejection {
            state: self.state,
            symbol,
            head: self.head,
            step: self.step_count,
            reason,
        });

        Step::Crash(reason)
    }

    /// Reports the verdict once the current state is terminal.
    ///
    /// A `Halting` state accepts. A `Crashed` state rejects, and its classification is reset
    /// to `Running` so the table is clean for the next word.
    ///
    /// # Returns
    ///
    /// * `None` while the current state is still `Running`.
    pub fn conclude(&mut self) -> Option<Verdict> {
        match self.table.class_of(self.state) {
            StateClass::Running => None,
            StateClass::Halting => Some(Verdict::Accepted),
            StateClass::Crashed => {
                self.table.heal(self.state);
                Some(Verdict::Rejected)
            }
        }
    }

    /// Runs the machine on `word` until it accepts or crashes.
    ///
    /// There is no step limit: a table that cycles through `Running` states forever makes this
    /// call loop forever. Use `run_bounded` for untrusted tables.
    pub fn run(&mut self, word: &str) -> Verdict {
        self.reset(word);

        loop {
            if let Some(verdict) = self.conclude() {
                self.log_verdict(word, verdict);
                return verdict;
            }
            self.step();
        }
    }

    /// Runs the machine on `word` for at most `max_steps` steps.
    ///
    /// # Returns
    ///
    /// * `Ok(Verdict)` if the run reached a verdict within the limit.
    /// * `Err(MachineError::StepLimitExceeded)` otherwise. No state is left marked `Crashed`.
    pub fn run_bounded(&mut self, word: &str, max_steps: usize) -> Result<Verdict, MachineError> {
        self.reset(word);

        for _ in 0..max_steps {
            if let Some(verdict) = self.conclude() {
                self.log_verdict(word, verdict);
                return Ok(verdict);
            }
            self.step();
        }

        match self.conclude() {
            Some(verdict) => {
                self.log_verdict(word, verdict);
                Ok(verdict)
            }
            None => {
                tracing::debug!(word, max_steps, "step limit exceeded");
                Err(MachineError::StepLimitExceeded(max_steps))
            }
        }
    }

    /// Returns true if `word` is accepted by the machine.
    pub fn process_data(&mut self, word: &str) -> bool {
        self.run(word).is_accepted()
    }

    fn log_verdict(&self, word: &str, verdict: Verdict) {
        tracing::debug!(word, ?verdict, steps = self.step_count, "run finished");
    }

    /// Returns the current state id.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the tape contents, terminator symbols included.
    pub fn tape(&self) -> &[char] {
        &self.tape
    }

    /// Returns the tape as a `String`, terminator symbols included.
    pub fn tape_as_string(&self) -> String {
        self.tape.iter().collect()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape[self.head]
    }

    /// Returns the number of rules applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the details of the crash that ended the most recent run, if it crashed.
    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.last_rejection.as_ref()
    }

    /// Returns the transition table the machine runs on.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Consumes the machine and returns its transition table.
    pub fn into_table(self) -> TransitionTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rule;

    // Accepts every word whose second letter is 'b'.
    fn create_second_letter_machine() -> TuringMachine {
        let table = TransitionTable::new(
            vec![
                Rule::new(0, 'a', 'a', Direction::Right, 1),
                Rule::new(0, 'b', 'b', Direction::Right, 1),
                Rule::new(1, 'b', 'b', Direction::Right, 2),
                Rule::new(2, 'a', 'a', Direction::Right, 2),
                Rule::new(2, 'b', 'b', Direction::Right, 2),
                Rule::new(2, '#', '#', Direction::Right, 3),
            ],
            vec![
                StateClass::Running,
                StateClass::Running,
                StateClass::Running,
                StateClass::Halting,
            ],
        )
        .unwrap();

        TuringMachine::new(table)
    }

    #[test]
    fn test_machine_creation() {
        let machine = create_second_letter_machine();

        assert_eq!(machine.state(), 0);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.tape(), &['#']);
        assert_eq!(machine.step_count(), 0);
        assert!(machine.last_rejection().is_none());
    }

    #[test]
    fn test_reset_appends_terminator() {
        let mut machine = create_second_letter_machine();
        machine.reset("ab");

        assert_eq!(machine.tape(), &['a', 'b', '#']);
        assert_eq!(machine.symbol(), 'a');
    }

    #[test]
    fn test_single_step() {
        let mut machine = create_second_letter_machine();
        machine.reset("ab");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.state(), 1);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_step_overwrites_in_place() {
        let table = TransitionTable::new(
            vec![Rule::new(0, 'a', 'X', Direction::Right, 1)],
            vec![StateClass::Running, StateClass::Halting],
        )
        .unwrap();
        let mut machine = TuringMachine::new(table);
        machine.reset("aa");

        machine.step();
        assert_eq!(machine.tape(), &['X', 'a', '#']);
    }

    #[test]
    fn test_no_rule_crash_marks_current_state() {
        let mut machine = create_second_letter_machine();
        machine.reset("aa");

        machine.step();
        assert_eq!(machine.step(), Step::Crash(RejectReason::NoRule));
        assert_eq!(machine.state(), 1);
        assert_eq!(machine.head(), 1);
        assert_eq!(
            machine.table().classification(1),
            Some(StateClass::Crashed)
        );

        // A crashed state no longer steps.
        assert_eq!(machine.step(), Step::Halt);
        assert_eq!(machine.head(), 1);
    }

    #[test]
    fn test_left_boundary_crash() {
        let table = TransitionTable::new(
            vec![Rule::new(0, 'a', 'Z', Direction::Left, 1)],
            vec![StateClass::Running, StateClass::Halting],
        )
        .unwrap();
        let mut machine = TuringMachine::new(table);
        machine.reset("a");

        assert_eq!(machine.step(), Step::Crash(RejectReason::LeftBoundary));
        assert_eq!(machine.state(), 0);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        // The write happens before the move is checked.
        assert_eq!(machine.tape(), &['Z', '#']);

        let rejection = machine.last_rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::LeftBoundary);
        assert_eq!(rejection.symbol, 'a');
    }

    #[test]
    fn test_conclude_heals_crashed_state() {
        let mut machine = create_second_letter_machine();
        machine.reset("aa");

        assert_eq!(machine.conclude(), None);
        machine.step();
        machine.step();

        assert_eq!(machine.conclude(), Some(Verdict::Rejected));
        assert_eq!(machine.table().classification(1), Some(StateClass::Running));
    }

    #[test]
    fn test_right_overrun_grows_tape() {
        let mut machine = create_second_letter_machine();

        assert!(machine.process_data("ab"));
        assert_eq!(machine.head(), 3);
        assert_eq!(machine.tape(), &['a', 'b', '#', '#']);
    }

    #[test]
    fn test_second_letter_language() {
        let mut machine = create_second_letter_machine();

        assert!(machine.process_data("ab"));
        assert!(machine.process_data("bb"));
        assert!(machine.process_data("abaa"));
        assert!(machine.process_data("babb"));
        assert!(!machine.process_data("ba"));
        assert!(!machine.process_data("aaaa"));
        assert!(!machine.process_data("a"));
        assert!(!machine.process_data(""));
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let mut machine = create_second_letter_machine();

        assert!(!machine.process_data("aaaa"));
        assert!(!machine.process_data("aaaa"));
        assert!(machine.process_data("abaa"));
        assert!(machine.process_data("abaa"));
        assert_eq!(
            machine.table().classifications(),
            &[
                StateClass::Running,
                StateClass::Running,
                StateClass::Running,
                StateClass::Halting
            ]
        );
    }

    #[test]
    fn test_last_rejection_is_cleared_on_accept() {
        let mut machine = create_second_letter_machine();

        assert_eq!(machine.run("aa"), Verdict::Rejected);
        let rejection = machine.last_rejection().unwrap();
        assert_eq!(rejection.state, 1);
        assert_eq!(rejection.head, 1);
        assert_eq!(rejection.step, 1);
        assert_eq!(rejection.reason, RejectReason::NoRule);

        assert_eq!(machine.run("ab"), Verdict::Accepted);
        assert!(machine.last_rejection().is_none());
    }

    #[test]
    fn test_run_bounded_stops_cycles() {
        let table = TransitionTable::new(
            vec![
                Rule::new(0, 'a', 'a', Direction::Right, 1),
                Rule::new(1, '#', '#', Direction::Left, 0),
            ],
            vec![StateClass::Running, StateClass::Running],
        )
        .unwrap();
        let mut machine = TuringMachine::new(table);

        assert_eq!(
            machine.run_bounded("a", 100),
            Err(MachineError::StepLimitExceeded(100))
        );
        assert_eq!(machine.step_count(), 100);
        assert_eq!(
            machine.table().classifications(),
            &[StateClass::Running, StateClass::Running]
        );

        assert_eq!(machine.run_bounded("b", 100), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_run_bounded_verdict_on_last_step() {
        let mut machine = create_second_letter_machine();

        // "ab" needs exactly three steps to reach the halting state.
        assert_eq!(machine.run_bounded("ab", 3), Ok(Verdict::Accepted));
        assert_eq!(
            machine.run_bounded("ab", 2),
            Err(MachineError::StepLimitExceeded(2))
        );
    }

    #[test]
    fn test_halting_initial_state_accepts_immediately() {
        let table = TransitionTable::new(Vec::new(), vec![StateClass::Halting]).unwrap();
        let mut machine = TuringMachine::new(table);

        assert!(machine.process_data("anything"));
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_crashed_initial_state_rejects_once() {
        let table = TransitionTable::new(
            vec![Rule::new(0, 'a', 'a', Direction::Right, 1)],
            vec![StateClass::Crashed, StateClass::Halting],
        )
        .unwrap();
        let mut machine = TuringMachine::new(table);

        assert!(!machine.process_data("a"));
        assert_eq!(machine.step_count(), 0);
        assert!(machine.last_rejection().is_none());
        assert_eq!(
            machine.table().classifications(),
            &[StateClass::Running, StateClass::Halting]
        );

        assert!(machine.process_data("a"));
    }

    #[test]
    fn test_crashed_destination_state_rejects_once() {
        let table = TransitionTable::new(
            vec![
                Rule::new(0, 'a', 'a', Direction::Right, 1),
                Rule::new(1, '#', '#', Direction::Right, 2),
            ],
            vec![StateClass::Running, StateClass::Crashed, StateClass::Halting],
        )
        .unwrap();
        let mut machine = TuringMachine::new(table);

        assert_eq!(machine.run("a"), Verdict::Rejected);
        assert_eq!(machine.state(), 1);
        assert_eq!(machine.step_count(), 1);
        assert!(machine.last_rejection().is_none());
        assert_eq!(machine.table().classification(1), Some(StateClass::Running));

        assert_eq!(machine.run("a"), Verdict::Accepted);
        assert_eq!(machine.run("a"), Verdict::Accepted);
    }

    #[test]
    fn test_into_table_returns_clean_table() {
        let mut machine = create_second_letter_machine();
        machine.process_data("aaaa");

        let table = machine.into_table();
        assert_eq!(table.classification(1), Some(StateClass::Running));
    }
}
