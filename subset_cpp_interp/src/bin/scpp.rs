//! SubsetCpp command-line interface
//!
//! Usage:
//!   scpp                      # Start the interactive REPL
//!   scpp file.mcpp            # Run a script file
//!   scpp -e "code"            # Run a code string
//!   scpp --dump-ast file      # Print the parsed AST as JSON
//!   scpp --dump-tokens file   # Print the token stream as JSON

use std::env;
use std::fs;
use std::process::ExitCode;

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Editor, Helper};

use subset_cpp_interp::repl::is_complete;
use subset_cpp_interp::{api, OutputEvent, ReplOutcome, ReplSession};

const USAGE: &str = "usage: scpp [FILE | -e CODE | --dump-ast FILE | --dump-tokens FILE]";

/// Line-editor helper: multi-line continuation while brackets are open
struct CppHelper;

impl Completer for CppHelper {
    type Candidate = String;
}

impl Hinter for CppHelper {
    type Hint = String;
}

impl Highlighter for CppHelper {}

impl Validator for CppHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        if input.trim().is_empty() {
            return Ok(ValidationResult::Valid(None));
        }
        if is_complete(input) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

impl Helper for CppHelper {}

fn is_exit_cmd(line: &str) -> bool {
    matches!(line, ":q" | ":quit" | "exit" | "quit")
}

fn print_events(outcome: &ReplOutcome) {
    for event in &outcome.events {
        match event {
            OutputEvent::Printed(line) => println!("{line}"),
            OutputEvent::Value(repr) => println!("{repr}"),
        }
    }
}

fn run_source(source: &str) -> ExitCode {
    let outcome = api::run_script(source);
    print_events(&outcome);
    match outcome.error {
        None => ExitCode::SUCCESS,
        Some(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_dump(path: &str, dump: fn(&str) -> Result<String, subset_cpp_interp::InterpreterError>) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("scpp: cannot read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    match dump(&source) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_repl() -> ExitCode {
    println!("subset_cpp REPL (:q to quit)");

    let mut editor: Editor<CppHelper, DefaultHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("scpp: cannot initialize line editor: {e}");
            return ExitCode::FAILURE;
        }
    };
    editor.set_helper(Some(CppHelper));

    let mut session = ReplSession::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if is_exit_cmd(trimmed) {
                    println!("Bye.");
                    return ExitCode::SUCCESS;
                }
                let _ = editor.add_history_entry(&line);

                let outcome = session.eval(&line);
                print_events(&outcome);
                if let Some(err) = outcome.error {
                    eprintln!("{err}");
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!();
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("scpp: readline error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None => run_repl(),
        Some("-h") | Some("--help") => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Some("-e") => match args.get(1) {
            Some(code) => run_source(code),
            None => {
                eprintln!("{USAGE}");
                ExitCode::FAILURE
            }
        },
        Some("--dump-ast") => match args.get(1) {
            Some(path) => run_dump(path, api::dump_ast_json),
            None => {
                eprintln!("{USAGE}");
                ExitCode::FAILURE
            }
        },
        Some("--dump-tokens") => match args.get(1) {
            Some(path) => run_dump(path, api::dump_tokens_json),
            None => {
                eprintln!("{USAGE}");
                ExitCode::FAILURE
            }
        },
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => run_source(&source),
            Err(e) => {
                eprintln!("scpp: cannot read {path}: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
