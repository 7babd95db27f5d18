//! Interactive session
//!
//! Maintains the durable program (definitions accumulated across
//! submissions), the runtime tables rebuilt from it, and a persistent
//! session scope whose parent is the global frame. Every submission is
//! analyzed before it runs: a failed analysis leaves both the durable
//! program and the session scope untouched.

use std::collections::HashSet;

use subset_cpp_parser::{parse_program, parse_statements, Program, Stmt};

use crate::error::InterpreterError;
use crate::repl::input;
use crate::runtime::{Env, Flow, FrameId, FunctionTable, Interp, OutputEvent};
use crate::sem::ProgramAnalyzer;

/// Result of evaluating one submission (or a whole script)
#[derive(Debug, Default)]
pub struct ReplOutcome {
    /// Output in emission order: printed lines and value echoes
    pub events: Vec<OutputEvent>,
    /// The error that aborted the submission, if any. Events emitted
    /// before the failure are kept.
    pub error: Option<InterpreterError>,
}

impl ReplOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Lines printed by built-ins, in order
    pub fn printed(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                OutputEvent::Printed(line) => Some(line.as_str()),
                OutputEvent::Value(_) => None,
            })
            .collect()
    }

    /// Echoed expression values, in order
    pub fn shown(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                OutputEvent::Value(repr) => Some(repr.as_str()),
                OutputEvent::Printed(_) => None,
            })
            .collect()
    }
}

/// REPL session state that persists across submissions
#[derive(Debug)]
pub struct ReplSession {
    /// The durable program: the single source of truth for definitions
    program: Program,
    /// Runtime tables rebuilt from the durable program
    table: FunctionTable,
    /// Global frame + persistent session frame (+ transient call frames)
    env: Env,
    session_frame: FrameId,
    /// Durable class names, handed to the parser so types and
    /// constructors from earlier submissions keep parsing
    class_names: HashSet<String>,
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplSession {
    pub fn new() -> Self {
        let mut env = Env::new();
        let session_frame = env.push_frame(Env::GLOBAL);
        Self {
            program: Program::default(),
            table: FunctionTable::default(),
            env,
            session_frame,
            class_names: HashSet::new(),
        }
    }

    /// The accumulated definitions
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Evaluate one complete submission
    pub fn eval(&mut self, submission: &str) -> ReplOutcome {
        let mut events = Vec::new();
        let error = self.eval_inner(submission, &mut events).err();
        ReplOutcome { events, error }
    }

    /// Evaluate a whole script by splitting it into submissions the way
    /// the interactive loop would; stops at the first error.
    pub fn eval_script(&mut self, source: &str) -> ReplOutcome {
        let mut events = Vec::new();
        for submission in input::split_submissions(source) {
            let mut outcome = self.eval(&submission);
            events.append(&mut outcome.events);
            if outcome.error.is_some() {
                return ReplOutcome {
                    events,
                    error: outcome.error,
                };
            }
        }
        ReplOutcome {
            events,
            error: None,
        }
    }

    fn eval_inner(
        &mut self,
        submission: &str,
        events: &mut Vec<OutputEvent>,
    ) -> Result<(), InterpreterError> {
        if input::is_definition(submission) {
            self.eval_definition(submission)
        } else {
            self.eval_statements(submission, events)
        }
    }

    /// Definitions: parse, analyze the candidate program, and only then
    /// commit it and rebuild the runtime tables.
    fn eval_definition(&mut self, submission: &str) -> Result<(), InterpreterError> {
        let new_defs = parse_program(submission, &self.class_names)?;

        let mut candidate = self.program.clone();
        candidate.extend(new_defs);
        ProgramAnalyzer::analyze(&candidate)?;

        let table = FunctionTable::build(&candidate)?;
        self.class_names = candidate.classes.iter().map(|c| c.name.clone()).collect();
        self.program = candidate;
        self.table = table;
        Ok(())
    }

    /// Statements: parse as an anonymous body, analyze against the
    /// durable program plus the live session variables, then execute in
    /// the persistent session frame. Expression statements echo their
    /// value.
    fn eval_statements(
        &mut self,
        submission: &str,
        events: &mut Vec<OutputEvent>,
    ) -> Result<(), InterpreterError> {
        let stmts = parse_statements(submission, &self.class_names)?;

        let session_vars = self.env.vars_in_frame(self.session_frame);
        ProgramAnalyzer::check_statements(&self.program, &session_vars, &stmts)?;

        let mut interp = Interp::new(&self.program, &self.table, events);
        for stmt in &stmts {
            match stmt {
                Stmt::Expr(expr) => {
                    let value = interp.eval_expr(&mut self.env, self.session_frame, expr)?;
                    interp.emit_value(&value);
                }
                _ => {
                    if let Flow::Return(_) =
                        interp.exec_stmt(&mut self.env, self.session_frame, stmt)?
                    {
                        // A top-level return ends the submission.
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_statements_echo_values() {
        let mut session = ReplSession::new();
        let outcome = session.eval("1 + 2;");
        assert!(outcome.success(), "unexpected error: {:?}", outcome.error);
        assert_eq!(outcome.shown(), vec!["3"]);
        assert!(outcome.printed().is_empty());
    }

    #[test]
    fn test_variables_persist_across_submissions() {
        let mut session = ReplSession::new();
        assert!(session.eval("int x = 41;").success());
        let outcome = session.eval("x + 1;");
        assert_eq!(outcome.shown(), vec!["42"]);
    }

    #[test]
    fn test_redeclaration_in_session_rejected() {
        let mut session = ReplSession::new();
        assert!(session.eval("int x = 1;").success());
        let outcome = session.eval("int x = 2;");
        assert!(matches!(
            outcome.error,
            Some(InterpreterError::Semantic(_))
        ));
        // The original binding survives.
        assert_eq!(session.eval("x;").shown(), vec!["1"]);
    }

    #[test]
    fn test_top_level_return_stops_submission() {
        let mut session = ReplSession::new();
        let outcome = session.eval("print_int(1); return; print_int(2);");
        assert!(outcome.success(), "unexpected error: {:?}", outcome.error);
        assert_eq!(outcome.printed(), vec!["1"]);
    }

    #[test]
    fn test_failed_analysis_leaves_no_trace() {
        let mut session = ReplSession::new();
        let outcome = session.eval("int a = 1; bool a = true;");
        assert!(!outcome.success());
        // Neither declaration took effect.
        let outcome = session.eval("int a = 7; a;");
        assert!(outcome.success(), "unexpected error: {:?}", outcome.error);
        assert_eq!(outcome.shown(), vec!["7"]);
    }
}
