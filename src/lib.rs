//! This crate provides the core logic of a deterministic single-tape Turing Machine interpreter.
//! It includes modules for building and validating transition tables, running the machine over
//! an input word to decide membership, and a catalog of predefined example programs.

pub mod analyzer;
pub mod machine;
pub mod programs;
pub mod table;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the types describing rules, classifications, verdicts and errors.
pub use types::{
    Direction, MachineError, RejectReason, Rejection, Rule, StateClass, Step, Verdict,
    MAX_EXECUTION_STEPS, TERMINATOR_SYMBOL,
};
