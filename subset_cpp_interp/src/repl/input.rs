//! Submission collection and classification
//!
//! The interactive front-end accumulates lines until the bracket balance
//! closes (Idle → Collecting → Ready), then classifies the submission:
//! definitions go to the durable program, everything else executes as
//! statements in the session scope.

use subset_cpp_parser::{tokenize, Token};

/// Multi-line input accumulator driven by bracket balance
#[derive(Debug, Default)]
pub struct InputBuffer {
    buffer: String,
    paren: i32,
    brace: i32,
    bracket: i32,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is still open
    pub fn is_collecting(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Add a line. Returns the completed submission once no brackets
    /// remain open; whitespace-only submissions are dropped.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        self.buffer.push_str(line);
        self.buffer.push('\n');
        for ch in line.chars() {
            match ch {
                '(' => self.paren += 1,
                ')' => self.paren -= 1,
                '{' => self.brace += 1,
                '}' => self.brace -= 1,
                '[' => self.bracket += 1,
                ']' => self.bracket -= 1,
                _ => {}
            }
        }
        if self.paren > 0 || self.brace > 0 || self.bracket > 0 {
            return None;
        }

        let submission = self.take();
        if submission.trim().is_empty() {
            None
        } else {
            Some(submission)
        }
    }

    /// Drain the buffer and reset the balance counters
    pub fn take(&mut self) -> String {
        self.paren = 0;
        self.brace = 0;
        self.bracket = 0;
        std::mem::take(&mut self.buffer)
    }
}

/// Whole-input completeness check (used by the line editor's validator)
pub fn is_complete(src: &str) -> bool {
    let (mut paren, mut brace, mut bracket) = (0i32, 0i32, 0i32);
    for ch in src.chars() {
        match ch {
            '(' => paren += 1,
            ')' => paren -= 1,
            '{' => brace += 1,
            '}' => brace -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            _ => {}
        }
    }
    paren <= 0 && brace <= 0 && bracket <= 0
}

/// Split a script into submissions the way the interactive loop would:
/// line by line, cutting at every balanced point.
pub fn split_submissions(source: &str) -> Vec<String> {
    let mut buffer = InputBuffer::new();
    let mut submissions = Vec::new();
    for line in source.lines() {
        if let Some(submission) = buffer.push_line(line) {
            submissions.push(submission);
        }
    }
    if buffer.is_collecting() {
        // Unbalanced tail: hand it to the parser for a proper error.
        submissions.push(buffer.take());
    }
    submissions
}

/// A submission is a top-level definition iff it starts with `class`, or
/// matches the shape `<type-ish> [&] <ident> (` with a `{` further on.
pub fn is_definition(src: &str) -> bool {
    let tokens: Vec<Token> = tokenize(src)
        .into_iter()
        .filter_map(|r| r.ok().map(|t| t.token))
        .collect();

    match tokens.first() {
        Some(Token::KwClass) => true,
        Some(first) if first.starts_type() => {
            let mut i = 1;
            if tokens.get(i) == Some(&Token::Amp) {
                i += 1;
            }
            tokens.get(i) == Some(&Token::Identifier)
                && tokens.get(i + 1) == Some(&Token::LParen)
                && tokens.iter().skip(i + 2).any(|t| *t == Token::LBrace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_submission() {
        let mut buf = InputBuffer::new();
        assert_eq!(buf.push_line("int x = 1;"), Some("int x = 1;\n".into()));
        assert!(!buf.is_collecting());
    }

    #[test]
    fn test_multiline_collects_until_balanced() {
        let mut buf = InputBuffer::new();
        assert_eq!(buf.push_line("int main() {"), None);
        assert!(buf.is_collecting());
        assert_eq!(buf.push_line("  return 0;"), None);
        let done = buf.push_line("}").unwrap();
        assert!(done.contains("return 0;"));
    }

    #[test]
    fn test_blank_submission_dropped() {
        let mut buf = InputBuffer::new();
        assert_eq!(buf.push_line("   "), None);
        assert!(!buf.is_collecting());
    }

    #[test]
    fn test_definition_classification() {
        assert!(is_definition("class P { int x; }"));
        assert!(is_definition("int main() { return 0; }"));
        assert!(is_definition("void bump(int& n) { n = n + 10; }"));
        assert!(is_definition("P make() { P p = P(1); return p; }"));

        assert!(!is_definition("main();"));
        assert!(!is_definition("int x = 1;"));
        assert!(!is_definition("x = f(3);"));
        assert!(!is_definition("P p = P(1);"));
    }

    #[test]
    fn test_split_submissions() {
        let script = "class P { int x; }\nint main() {\n  return 0;\n}\nmain();\n";
        let subs = split_submissions(script);
        assert_eq!(subs.len(), 3);
        assert!(is_definition(&subs[0]));
        assert!(is_definition(&subs[1]));
        assert!(!is_definition(&subs[2]));
    }

    #[test]
    fn test_is_complete() {
        assert!(is_complete("f(1);"));
        assert!(!is_complete("int main() {"));
        assert!(is_complete("int main() { }"));
    }
}
