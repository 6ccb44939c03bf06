use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tmrun::{
    MachineError, ProgramManager, Rejection, Step, TuringMachine, Verdict, MAX_EXECUTION_STEPS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The built-in program to run
    #[clap(short, long)]
    program: Option<String>,

    /// The words to test for membership
    words: Vec<String>,

    /// List the built-in programs
    #[clap(short, long)]
    list: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print one JSON report per word
    #[clap(long)]
    json: bool,

    /// Maximum number of steps per word, 0 for no limit
    #[clap(long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    program: &'a str,
    word: &'a str,
    verdict: Option<Verdict>,
    steps: usize,
    rejection: Option<&'a Rejection>,
    error: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for index in 0..ProgramManager::get_program_count() {
            if let Ok(info) = ProgramManager::get_program_info(index) {
                println!("{:<16} {}", info.name, info.description);
            }
        }
        return ExitCode::SUCCESS;
    }

    let Some(name) = cli.program.as_deref() else {
        eprintln!("A program is required, use --list to see the available ones");
        return ExitCode::FAILURE;
    };

    let mut machine = match ProgramManager::get_program_by_name(name).and_then(|p| p.machine()) {
        Ok(machine) => machine,
        Err(e) => {
            tracing::error!("failed to load program {name}: {e}");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for word in &cli.words {
        let result = if cli.debug {
            run_traced(&mut machine, word, cli.max_steps)
        } else if cli.max_steps == 0 {
            Ok(machine.run(word))
        } else {
            machine.run_bounded(word, cli.max_steps)
        };

        if cli.json {
            let report = Report {
                program: name,
                word,
                verdict: result.as_ref().ok().copied(),
                steps: machine.step_count(),
                rejection: machine.last_rejection(),
                error: result.as_ref().err().map(|e| e.to_string()),
            };
            match serde_json::to_string(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("failed to serialize report: {e}"),
            }
        } else {
            match result {
                Ok(verdict) => println!("X = {}\tMember? {}", word, verdict.is_accepted()),
                Err(e) => println!("X = {}\tUndecided: {}", word, e),
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_traced(
    machine: &mut TuringMachine,
    word: &str,
    max_steps: usize,
) -> Result<Verdict, MachineError> {
    let print_state = |machine: &TuringMachine| {
        println!(
            "Step: {}, State: {}, Head: {}, Tape: {}",
            machine.step_count(),
            machine.state(),
            machine.head(),
            machine.tape_as_string()
        );
    };

    machine.reset(word);
    print_state(machine);

    loop {
        if let Some(verdict) = machine.conclude() {
            println!("\nMachine {}.", if verdict.is_accepted() { "accepted" } else { "rejected" });
            return Ok(verdict);
        }
        if max_steps != 0 && machine.step_count() >= max_steps {
            return Err(MachineError::StepLimitExceeded(max_steps));
        }

        match machine.step() {
            Step::Continue => print_state(machine),
            Step::Crash(reason) => println!("\nMachine crashed: {:?}", reason),
            Step::Halt => {}
        }
    }
}
