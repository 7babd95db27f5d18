//! Statement parsers (blocks, declarations, control flow, return)

use crate::ast::Stmt;
use crate::error::ParseResult;
use crate::token::Token;

use crate::parser::Parser;

impl Parser<'_> {
    /// Parse a single statement
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        if self.check(Token::LBrace) {
            return self.parse_block();
        }

        if self.match_tok(Token::KwIf) {
            self.expect(Token::LParen, "'(' after 'if'")?;
            let cond = self.parse_expr()?;
            self.expect(Token::RParen, "')' after if condition")?;
            let then_branch = Box::new(self.parse_stmt()?);
            let else_branch = if self.match_tok(Token::KwElse) {
                Some(Box::new(self.parse_stmt()?))
            } else {
                None
            };
            return Ok(Stmt::If {
                cond,
                then_branch,
                else_branch,
            });
        }

        if self.match_tok(Token::KwWhile) {
            self.expect(Token::LParen, "'(' after 'while'")?;
            let cond = self.parse_expr()?;
            self.expect(Token::RParen, "')' after while condition")?;
            let body = Box::new(self.parse_stmt()?);
            return Ok(Stmt::While { cond, body });
        }

        if self.match_tok(Token::KwReturn) {
            if self.match_tok(Token::Semicolon) {
                return Ok(Stmt::Return(None));
            }
            let value = self.parse_expr()?;
            self.expect(Token::Semicolon, "';' after return value")?;
            return Ok(Stmt::Return(Some(value)));
        }

        if self.starts_declaration() {
            let ty = self.parse_type()?;
            let name = self.take_ident("a variable name")?;
            let init = if self.match_tok(Token::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect(Token::Semicolon, "';' after variable declaration")?;
            return Ok(Stmt::VarDecl { ty, name, init });
        }

        let expr = self.parse_expr()?;
        self.expect(Token::Semicolon, "';' after expression")?;
        Ok(Stmt::Expr(expr))
    }

    /// Parse a block: `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Stmt> {
        self.expect(Token::LBrace, "'{' to start block")?;
        let mut stmts = Vec::new();
        while !self.match_tok(Token::RBrace) {
            if self.at_end() {
                return Err(self.err_expected("'}' to close block"));
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(Stmt::Block(stmts))
    }

    /// A statement starts a declaration when it begins with a primitive
    /// type keyword, or with a known class name used as a type:
    /// `P x …` or `P& x …`. A class name followed by anything else (for
    /// example `P(1)`) is an expression.
    fn starts_declaration(&self) -> bool {
        match self.peek_kind() {
            Some(kind) if kind.is_primitive_type() => true,
            Some(Token::Identifier) => {
                let Some(tok) = self.peek() else { return false };
                if !self.is_known_class(tok.text) {
                    return false;
                }
                self.check_at(1, Token::Identifier)
                    || (self.check_at(1, Token::Amp) && self.check_at(2, Token::Identifier))
            }
            _ => false,
        }
    }
}
