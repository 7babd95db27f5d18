//! Interactive session management

pub mod input;
pub mod session;

pub use input::{is_complete, is_definition, split_submissions, InputBuffer};
pub use session::{ReplOutcome, ReplSession};
