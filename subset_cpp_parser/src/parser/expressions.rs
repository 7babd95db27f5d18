//! Expression parsers
//!
//! Standard C-family precedence: assignment (right-assoc) < `||` < `&&`
//! < equality < relational < additive < multiplicative < unary <
//! postfix (`.field`, `.method(args)`) < primary.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{decode_char_lit, decode_string_lit};
use crate::token::Token;

use crate::parser::Parser;

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    /// Assignment is right-associative: `a = b = c`
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_logical_or()?;

        if self.check(Token::Assign) {
            let assign_span = self.peek().map(|t| t.span).unwrap_or_default();
            self.advance();
            let value = Box::new(self.parse_assignment()?);

            return match lhs {
                Expr::Var(name) => Ok(Expr::Assign { name, value }),
                Expr::Member { object, field } => Ok(Expr::FieldAssign {
                    object,
                    field,
                    value,
                }),
                _ => Err(ParseError::unexpected_token(
                    "=",
                    "a variable or field on the left of assignment",
                    assign_span,
                )),
            };
        }

        Ok(lhs)
    }

    fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_logical_and()?;
        while self.match_tok(Token::OrOr) {
            let rhs = self.parse_logical_and()?;
            e = binary(BinaryOp::OrOr, e, rhs);
        }
        Ok(e)
    }

    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_equality()?;
        while self.match_tok(Token::AndAnd) {
            let rhs = self.parse_equality()?;
            e = binary(BinaryOp::AndAnd, e, rhs);
        }
        Ok(e)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_relational()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(Token::Less) => BinaryOp::Lt,
                Some(Token::LessEq) => BinaryOp::Le,
                Some(Token::Greater) => BinaryOp::Gt,
                Some(Token::GreaterEq) => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            e = binary(op, e, rhs);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_kind() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = Box::new(self.parse_unary()?);
        Ok(Expr::Unary { op, operand })
    }

    /// Postfix: `primary ( "." ident [ "(" args ")" ] )*`
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut e = self.parse_primary()?;

        while self.match_tok(Token::Dot) {
            let field = self.take_ident("a field or method name after '.'")?;

            if self.match_tok(Token::LParen) {
                let args = self.parse_arg_list()?;
                e = Expr::MethodCall {
                    object: Box::new(e),
                    method: field,
                    args,
                };
            } else {
                e = Expr::Member {
                    object: Box::new(e),
                    field,
                };
            }
        }

        Ok(e)
    }

    /// Parse an argument list after the opening `(`
    fn parse_arg_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.match_tok(Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.match_tok(Token::RParen) {
                break;
            }
            self.expect(Token::Comma, "',' or ')' in argument list")?;
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.match_tok(Token::LParen) {
            let e = self.parse_expr()?;
            self.expect(Token::RParen, "')'")?;
            return Ok(e);
        }

        match self.peek_kind() {
            Some(Token::IntLit) => {
                let Some((span, text)) = self.advance_info() else {
                    return Err(self.err_expected("an expression"));
                };
                let value = text.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    literal: text.to_string(),
                    span,
                })?;
                Ok(Expr::IntLit(value))
            }
            Some(Token::CharLit) => {
                let Some((span, text)) = self.advance_info() else {
                    return Err(self.err_expected("an expression"));
                };
                Ok(Expr::CharLit(decode_char_lit(text, span)?))
            }
            Some(Token::StringLit) => {
                let Some((span, text)) = self.advance_info() else {
                    return Err(self.err_expected("an expression"));
                };
                Ok(Expr::StringLit(decode_string_lit(text, span)?))
            }
            Some(Token::KwTrue) => {
                self.advance();
                Ok(Expr::BoolLit(true))
            }
            Some(Token::KwFalse) => {
                self.advance();
                Ok(Expr::BoolLit(false))
            }
            Some(Token::Identifier) => {
                let name = self.take_ident("an identifier")?;

                if self.match_tok(Token::LParen) {
                    let args = self.parse_arg_list()?;
                    // A call on a class name is a construction.
                    if self.is_known_class(&name) {
                        return Ok(Expr::Construct { class: name, args });
                    }
                    return Ok(Expr::Call { callee: name, args });
                }

                Ok(Expr::Var(name))
            }
            _ => Err(self.err_expected("an expression")),
        }
    }
}
