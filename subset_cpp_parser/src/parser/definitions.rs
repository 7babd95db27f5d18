//! Definition parsers (class definitions, free function definitions)

use crate::ast::{ClassDef, ConstructorDef, FieldDecl, FunctionDef, MethodDef};
use crate::error::ParseResult;
use crate::token::Token;

use crate::parser::Parser;

impl Parser<'_> {
    /// Parse a function definition: `ReturnType name(params) { … }`
    pub(crate) fn parse_function_def(&mut self) -> ParseResult<FunctionDef> {
        let return_type = self.parse_type()?;
        let name = self.take_ident("a function name")?;
        self.expect(Token::LParen, "'(' after function name")?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        Ok(FunctionDef {
            name,
            return_type,
            params,
            body,
        })
    }

    /// Parse a class definition:
    /// `class Name [: public Base] { [public:] members… } [;]`
    pub(crate) fn parse_class_def(&mut self) -> ParseResult<ClassDef> {
        self.expect(Token::KwClass, "'class'")?;
        let name = self.take_ident("a class name")?;

        let base = if self.match_tok(Token::Colon) {
            self.expect(Token::KwPublic, "'public' after ':'")?;
            Some(self.take_ident("a base class name")?)
        } else {
            None
        };

        self.expect(Token::LBrace, "'{' to start class body")?;

        // Optional access-section marker; only public members exist.
        if self.match_tok(Token::KwPublic) {
            self.expect(Token::Colon, "':' after 'public'")?;
        }

        let mut class = ClassDef {
            name,
            base,
            fields: Vec::new(),
            ctors: Vec::new(),
            methods: Vec::new(),
        };

        while !self.match_tok(Token::RBrace) {
            if self.at_end() {
                return Err(self.err_expected("'}' to close class body"));
            }

            let is_virtual = self.match_tok(Token::KwVirtual);

            // Constructor: ClassName(params) { … }
            if self.check(Token::Identifier)
                && self.peek().map(|t| t.text) == Some(class.name.as_str())
                && self.check_at(1, Token::LParen)
            {
                self.advance();
                self.advance();
                let params = self.parse_param_list()?;
                let body = self.parse_block()?;
                class.ctors.push(ConstructorDef { params, body });
                continue;
            }

            // Otherwise a field or a method: Type name …
            let ty = self.parse_type()?;
            let member_name = self.take_ident("a member name")?;

            if self.match_tok(Token::LParen) {
                let params = self.parse_param_list()?;
                let body = self.parse_block()?;
                class.methods.push(MethodDef {
                    is_virtual,
                    name: member_name,
                    return_type: ty,
                    params,
                    body,
                });
            } else {
                // Field; an inline initializer is consumed but carries no
                // meaning (fields are default-initialized).
                if self.match_tok(Token::Assign) {
                    let _ = self.parse_expr()?;
                }
                self.expect(Token::Semicolon, "';' after field declaration")?;
                class.fields.push(FieldDecl {
                    ty,
                    name: member_name,
                });
            }
        }

        // C++-compatible optional ';' after the class body
        self.match_tok(Token::Semicolon);
        Ok(class)
    }
}
