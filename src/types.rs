//! This module defines the core data structures and types used throughout the Turing Machine
//! interpreter, including transition rules, state classifications, verdicts and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The blank symbol appended to every input word to bound the meaningful tape region.
pub const TERMINATOR_SYMBOL: char = '#';
/// The id of the state every run starts in.
pub const INITIAL_STATE: usize = 0;
/// The default number of steps a bounded run may take before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Returns the single-letter form used in the compact rule notation.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Represents a single transition rule of a deterministic single-tape machine.
///
/// A rule applies when the machine is in `source_state` and reads `read` under the head.
/// It then writes `write`, moves the head in `direction` and enters `next_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The state this rule applies in.
    pub source_state: usize,
    /// The symbol that must be under the head.
    pub read: char,
    /// The symbol written in place of `read`.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine enters.
    pub next_state: usize,
}

impl Rule {
    /// Creates a new `Rule`.
    ///
    /// # Arguments
    ///
    /// * `source_state` - The state the rule applies in.
    /// * `read` - The symbol that must be under the head.
    /// * `write` - The symbol written in its place.
    /// * `direction` - Where the head moves afterwards.
    /// * `next_state` - The state the machine enters.
    pub fn new(
        source_state: usize,
        read: char,
        write: char,
        direction: Direction,
        next_state: usize,
    ) -> Self {
        Self {
            source_state,
            read,
            write,
            direction,
            next_state,
        }
    }

    /// Returns true if this rule applies to the given state and symbol.
    pub fn matches(&self, state: usize, symbol: char) -> bool {
        self.source_state == state && self.read == symbol
    }
}

/// Formats the rule in the compact `state,read=>write,direction,next` notation, e.g. `0,a=>A,R,1`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}=>{},{},{}",
            self.source_state,
            self.read,
            self.write,
            self.direction.as_char(),
            self.next_state
        )
    }
}

/// The classification of a state.
///
/// `Running` and `Halting` are fixed at construction time. `Crashed` is transient: the
/// interpreter marks the state it crashed in and clears the mark when the run concludes.
/// A table built with `Crashed` entries rejects the first run that stops in such a state,
/// and that state is `Running` from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateClass {
    /// The machine keeps stepping while in this state.
    Running,
    /// Reaching this state accepts the input.
    Halting,
    /// The machine crashed in this state during the current run.
    Crashed,
}

/// The membership verdict of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The run reached a `Halting` state; the word is in the language.
    Accepted,
    /// The run ended in a `Crashed` state; the word is not in the language.
    Rejected,
}

impl Verdict {
    /// Returns true for `Verdict::Accepted`.
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> Self {
        verdict.is_accepted()
    }
}

/// Why a run crashed. Both causes reject the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No rule exists for the current state and the symbol under the head.
    NoRule,
    /// A rule tried to move the head left of the first tape cell.
    LeftBoundary,
}

/// Details of the most recent crash, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// The state the machine was in when it crashed.
    pub state: usize,
    /// The symbol under the head at the time of the crash.
    pub symbol: char,
    /// The head position at the time of the crash.
    pub head: usize,
    /// The number of rules applied before the crash.
    pub step: usize,
    /// Whether the machine found no rule or ran off the left end of the tape.
    pub reason: RejectReason,
}

/// Represents the outcome of a single interpreter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule was applied and the machine moved to its next state.
    Continue,
    /// The current state is not `Running`, so nothing was done.
    Halt,
    /// The machine crashed and the current state is now classified `Crashed`.
    Crash(RejectReason),
}

/// Represents various errors that can occur while building or driving a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// A state is referenced by the table but has no classification entry.
    #[error("State {0} has no classification")]
    UnclassifiedState(usize),
    /// Indicates an error during the validation of a transition table.
    #[error("Table validation error: {0}")]
    ValidationError(String),
    /// A bounded run took more steps than allowed without reaching a verdict.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// A built-in program could not be found.
    #[error("Program not found: {0}")]
    ProgramNotFound(String),
}
