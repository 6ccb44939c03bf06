use crate::machine::TuringMachine;
use crate::table::TransitionTable;
use crate::types::{Direction, MachineError, Rule, StateClass};

use Direction::{Left as L, Right as R};
use StateClass::{Halting as H, Running as Run};

/// A named transition table with a short description of the language it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The name used to look the program up, e.g. `contains-bbb`.
    pub name: &'static str,
    pub description: &'static str,
    /// The rules in table order.
    pub rules: Vec<Rule>,
    /// The classification of each state, indexed by state id.
    pub classes: Vec<StateClass>,
}

impl Program {
    /// Builds a validated `TransitionTable` for this program.
    pub fn table(&self) -> Result<TransitionTable, MachineError> {
        TransitionTable::new(self.rules.clone(), self.classes.clone())
    }

    /// Builds a fresh `TuringMachine` for this program.
    pub fn machine(&self) -> Result<TuringMachine, MachineError> {
        self.table().map(TuringMachine::new)
    }
}

fn rules(table: &[(usize, char, char, Direction, usize)]) -> Vec<Rule> {
    table
        .iter()
        .map(|&(source, read, write, direction, next)| {
            Rule::new(source, read, write, direction, next)
        })
        .collect()
}

fn second_letter_b() -> Program {
    Program {
        name: "second-letter-b",
        description: "Words over {a, b} whose second letter is 'b'",
        rules: rules(&[
            (0, 'a', 'a', R, 1),
            (0, 'b', 'b', R, 1),
            (1, 'b', 'b', R, 2),
            (2, 'a', 'a', R, 2),
            (2, 'b', 'b', R, 2),
            (2, '#', '#', R, 3),
        ]),
        classes: vec![Run, Run, Run, H],
    }
}

fn contains_bbb() -> Program {
    Program {
        name: "contains-bbb",
        description: "Words over {a, b} that contain 'bbb'",
        rules: rules(&[
            (0, 'a', 'a', R, 0),
            (0, 'b', 'b', R, 1),
            (1, 'a', 'a', R, 0),
            (1, 'b', 'b', R, 2),
            (2, 'a', 'a', R, 0),
            (2, 'b', 'b', R, 3),
            (3, 'a', 'a', R, 3),
            (3, 'b', 'b', R, 3),
            (3, '#', '#', R, 4),
        ]),
        classes: vec![Run, Run, Run, Run, H],
    }
}

// Each pass marks one 'b' as 'B' and one 'a' as 'A', then checks a single 'a' is left over.
fn b_n_a_n_plus_one() -> Program {
    Program {
        name: "b-n-a-n-plus-1",
        description: "N 'b's followed by N+1 'a's, N > 0",
        rules: rules(&[
            (0, 'b', 'B', R, 1),
            (1, 'b', 'b', R, 1),
            (1, 'A', 'A', R, 1),
            (1, 'a', 'A', L, 2),
            (2, 'A', 'A', L, 2),
            (2, 'b', 'b', L, 3),
            (3, 'b', 'b', L, 3),
            (3, 'B', 'B', R, 0),
            (2, 'B', 'B', R, 4),
            (4, 'A', 'A', R, 4),
            (4, 'a', 'a', R, 5),
            (5, '#', '#', R, 6),
        ]),
        classes: vec![Run, Run, Run, Run, Run, Run, H],
    }
}

// Erases matching outer symbols until at most one symbol remains.
fn odd_palindrome() -> Program {
    Program {
        name: "odd-palindrome",
        description: "Odd-length palindromes over {x, y}",
        rules: rules(&[
            (0, 'x', '#', R, 1),
            (1, 'x', 'x', R, 1),
            (1, 'y', 'y', R, 1),
            (1, '#', '#', L, 2),
            (2, 'x', '#', L, 3),
            (2, '#', '#', R, 7),
            (3, 'x', 'x', L, 3),
            (3, 'y', 'y', L, 3),
            (3, '#', '#', R, 0),
            (0, 'y', '#', R, 4),
            (4, 'x', 'x', R, 4),
            (4, 'y', 'y', R, 4),
            (4, '#', '#', L, 5),
            (5, '#', '#', R, 7),
            (5, 'y', '#', L, 6),
            (6, 'x', 'x', L, 6),
            (6, 'y', 'y', L, 6),
            (6, '#', '#', R, 0),
        ]),
        classes: vec![Run, Run, Run, Run, Run, Run, Run, H],
    }
}

fn q_n_p_n_q_n() -> Program {
    Program {
        name: "q-n-p-n-q-n",
        description: "N 'q's, then N 'p's, then N 'q's, N > 0",
        rules: rules(&[
            (0, 'q', '*', R, 1),
            (1, 'q', 'q', R, 1),
            (1, 'p', 'p', R, 2),
            (2, 'p', 'p', R, 2),
            (2, 'q', 'q', L, 3),
            (3, 'p', 'q', R, 4),
            (4, 'q', 'q', R, 4),
            (4, '#', '#', L, 5),
            (5, 'q', '#', L, 6),
            (6, 'q', '#', L, 7),
            (7, 'q', 'q', L, 7),
            (7, 'p', 'p', L, 7),
            (7, '*', '*', R, 0),
            (0, '#', '#', R, 8),
        ]),
        classes: vec![Run, Run, Run, Run, Run, Run, Run, Run, H],
    }
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = vec![
        second_letter_b(),
        contains_bbb(),
        b_n_a_n_plus_one(),
        odd_palindrome(),
        q_n_p_n_q_n(),
    ];
}

/// `ProgramManager` gives access to the built-in programs in `PROGRAMS` by index or by name.
pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, MachineError> {
        PROGRAMS
            .get(index)
            .cloned()
            .ok_or_else(|| MachineError::ProgramNotFound(format!("index {}", index)))
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, MachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| MachineError::ProgramNotFound(name.to_string()))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|program| program.name.to_string())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.to_string(),
            description: program.description.to_string(),
            state_count: program.classes.len(),
            rule_count: program.rules.len(),
        })
    }

    /// Search for programs by name or description
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| {
                program.name.to_lowercase().contains(&query)
                    || program.description.to_lowercase().contains(&query)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// A summary of a built-in program, as returned by `ProgramManager::get_program_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    /// The position of the program in `PROGRAMS`.
    pub index: usize,
    pub name: String,
    pub description: String,
    /// The number of classified states.
    pub state_count: usize,
    pub rule_count: usize,
}
