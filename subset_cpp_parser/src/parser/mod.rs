//! Recursive descent parser for the C++ subset
//!
//! Converts the token stream into the AST. Declaration-vs-expression
//! disambiguation (`T x;` vs `f(x);`) and constructor-vs-call
//! disambiguation (`T(1)` vs `f(1)`) both rely on a set of known class
//! names: the union of a prescan of the current token stream and the
//! class names the caller already knows about (the REPL session passes
//! the classes accumulated in earlier submissions).

mod definitions;
mod expressions;
mod statements;

use std::collections::HashSet;

use crate::ast::{BaseType, Param, Program, Stmt, Type};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken};
use crate::span::Span;
use crate::token::Token;

/// C++ subset parser
pub struct Parser<'a> {
    tokens: Vec<SpannedToken<'a>>,
    pos: usize,
    class_names: HashSet<String>,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser").field("pos", &self.pos).finish()
    }
}

/// Parse a sequence of class and function definitions
pub fn parse_program(source: &str, known_classes: &HashSet<String>) -> ParseResult<Program> {
    Parser::new(source, known_classes)?.parse_program()
}

/// Parse a brace-less statement list (a statement submission wrapped in
/// an anonymous body)
pub fn parse_statements(source: &str, known_classes: &HashSet<String>) -> ParseResult<Vec<Stmt>> {
    Parser::new(source, known_classes)?.parse_statement_list()
}

impl<'a> Parser<'a> {
    /// Tokenize the source and prepare a parser over it
    pub fn new(source: &'a str, known_classes: &HashSet<String>) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            tokens.push(result?);
        }

        let mut class_names = known_classes.clone();
        // Prescan `class X` pairs so later statements in the same source
        // can use X as a type and as a constructor.
        for pair in tokens.windows(2) {
            if pair[0].token == Token::KwClass && pair[1].token == Token::Identifier {
                class_names.insert(pair[1].text.to_string());
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            class_names,
        })
    }

    /// Parse a whole program: class defs and function defs until EOF
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut program = Program::default();
        while !self.at_end() {
            if self.check(Token::KwClass) {
                program.classes.push(self.parse_class_def()?);
            } else {
                program.functions.push(self.parse_function_def()?);
            }
        }
        Ok(program)
    }

    /// Parse statements until EOF
    pub fn parse_statement_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    // ==================== Token management ====================

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_at(&self, off: usize) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.pos + off)
    }

    pub(crate) fn peek_kind(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    pub(crate) fn check(&self, token: Token) -> bool {
        self.peek_kind() == Some(token)
    }

    pub(crate) fn check_at(&self, off: usize, token: Token) -> bool {
        self.peek_at(off).map(|t| t.token) == Some(token)
    }

    pub(crate) fn advance(&mut self) -> Option<&SpannedToken<'a>> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token, returning its span and text. The text
    /// borrows the source, not the parser.
    pub(crate) fn advance_info(&mut self) -> Option<(Span, &'a str)> {
        let tok = self.tokens.get(self.pos)?;
        let info = (tok.span, tok.text);
        self.pos += 1;
        Some(info)
    }

    /// Consume the current token if it matches
    pub(crate) fn match_tok(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a specific token or fail with `expected`
    pub(crate) fn expect(&mut self, token: Token, expected: &str) -> ParseResult<()> {
        if self.match_tok(token) {
            Ok(())
        } else {
            Err(self.err_expected(expected))
        }
    }

    /// Consume an identifier and return its text
    pub(crate) fn take_ident(&mut self, expected: &str) -> ParseResult<String> {
        if self.check(Token::Identifier) {
            let text = self.tokens[self.pos].text.to_string();
            self.pos += 1;
            Ok(text)
        } else {
            Err(self.err_expected(expected))
        }
    }

    /// Span just past the last token, for end-of-input errors
    fn eof_span(&self) -> Span {
        match self.tokens.last() {
            Some(t) => {
                let mut span = t.span;
                span.start = span.end;
                span.start_line = span.end_line;
                span.start_column = span.end_column;
                span
            }
            None => Span::empty(),
        }
    }

    /// Error at the current position
    pub(crate) fn err_expected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(t) => ParseError::unexpected_token(t.text, expected, t.span),
            None => ParseError::unexpected_eof(expected, self.eof_span()),
        }
    }

    pub(crate) fn is_known_class(&self, name: &str) -> bool {
        self.class_names.contains(name)
    }

    // ==================== Types and parameters ====================

    /// Parse a type, including the optional trailing `&`
    pub(crate) fn parse_type(&mut self) -> ParseResult<Type> {
        let base = match self.peek_kind() {
            Some(Token::KwInt) => {
                self.pos += 1;
                BaseType::Int
            }
            Some(Token::KwBool) => {
                self.pos += 1;
                BaseType::Bool
            }
            Some(Token::KwChar) => {
                self.pos += 1;
                BaseType::Char
            }
            Some(Token::KwString) => {
                self.pos += 1;
                BaseType::String
            }
            Some(Token::KwVoid) => {
                self.pos += 1;
                BaseType::Void
            }
            Some(Token::Identifier) => {
                let name = self.take_ident("a type name")?;
                BaseType::Class(name)
            }
            _ => return Err(self.err_expected("a type")),
        };

        let is_ref = self.match_tok(Token::Amp);
        Ok(Type::new(base, is_ref))
    }

    /// Parse a single `Type name` parameter
    fn parse_param(&mut self) -> ParseResult<Param> {
        let ty = self.parse_type()?;
        let name = self.take_ident("a parameter name")?;
        Ok(Param { ty, name })
    }

    /// Parse a parameter list after the opening `(`
    pub(crate) fn parse_param_list(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.match_tok(Token::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.parse_param()?);
            if self.match_tok(Token::RParen) {
                break;
            }
            self.expect(Token::Comma, "',' or ')' in parameter list")?;
        }
        Ok(params)
    }
}
