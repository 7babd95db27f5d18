//! Token definitions for the C++ subset lexer
//!
//! Keywords, punctuation and operators follow the language's lexical
//! surface: whitespace, `//` line comments and `#`-prefixed preprocessor
//! lines are skipped by the lexer itself; `/*` starts a block comment
//! which the lexer wrapper scans past (see `lexer.rs`).

use logos::Logos;

/// Tokens of the C++ subset
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("int")]
    KwInt,
    #[token("bool")]
    KwBool,
    #[token("char")]
    KwChar,
    #[token("string")]
    KwString,
    #[token("void")]
    KwVoid,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("return")]
    KwReturn,
    #[token("class")]
    KwClass,
    #[token("public")]
    KwPublic,
    #[token("virtual")]
    KwVirtual,

    // ==================== Punctuation ====================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("&")]
    Amp,

    // ==================== Operators ====================
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,

    // ==================== Literals / identifiers ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+")]
    IntLit,
    #[regex(r"'(\\.|[^'\\\n])'")]
    CharLit,
    #[regex(r#""(\\.|[^"\\\n])*""#)]
    StringLit,

    /// `/*` — the wrapper scans to the matching `*/` and resumes.
    #[token("/*")]
    BlockCommentStart,
}

impl Token {
    /// True for tokens that can begin a type (primitive keywords and
    /// identifiers, which may name a class).
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            Token::KwInt
                | Token::KwBool
                | Token::KwChar
                | Token::KwString
                | Token::KwVoid
                | Token::Identifier
        )
    }

    /// True for primitive type keywords (these always begin a declaration).
    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Token::KwInt | Token::KwBool | Token::KwChar | Token::KwString | Token::KwVoid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn kinds(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        assert_eq!(kinds("int"), vec![Token::KwInt]);
        assert_eq!(kinds("interp"), vec![Token::Identifier]);
        assert_eq!(kinds("classy class"), vec![Token::Identifier, Token::KwClass]);
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("&& & == = <= < != !"),
            vec![
                Token::AndAnd,
                Token::Amp,
                Token::EqEq,
                Token::Assign,
                Token::LessEq,
                Token::Less,
                Token::NotEq,
                Token::Bang,
            ]
        );
    }

    #[test]
    fn test_comments_and_hash_lines_skipped() {
        assert_eq!(kinds("1 // two\n3"), vec![Token::IntLit, Token::IntLit]);
        assert_eq!(kinds("#include <iostream>\n42"), vec![Token::IntLit]);
    }
}
