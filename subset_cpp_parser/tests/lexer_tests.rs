//! Lexer integration tests

use subset_cpp_parser::{tokenize, ParseError, Token};

fn kinds(source: &str) -> Vec<Token> {
    tokenize(source)
        .into_iter()
        .map(|t| t.expect("lex error").token)
        .collect()
}

#[test]
fn test_keyword_inventory() {
    let source = "int bool char string void true false if else while return class public virtual";
    assert_eq!(
        kinds(source),
        vec![
            Token::KwInt,
            Token::KwBool,
            Token::KwChar,
            Token::KwString,
            Token::KwVoid,
            Token::KwTrue,
            Token::KwFalse,
            Token::KwIf,
            Token::KwElse,
            Token::KwWhile,
            Token::KwReturn,
            Token::KwClass,
            Token::KwPublic,
            Token::KwVirtual,
        ]
    );
}

#[test]
fn test_punctuation_and_operators() {
    assert_eq!(
        kinds("( ) { } ; , . : & = + - * / % !"),
        vec![
            Token::LParen,
            Token::RParen,
            Token::LBrace,
            Token::RBrace,
            Token::Semicolon,
            Token::Comma,
            Token::Dot,
            Token::Colon,
            Token::Amp,
            Token::Assign,
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Percent,
            Token::Bang,
        ]
    );
    assert_eq!(
        kinds("&& || == != < <= > >="),
        vec![
            Token::AndAnd,
            Token::OrOr,
            Token::EqEq,
            Token::NotEq,
            Token::Less,
            Token::LessEq,
            Token::Greater,
            Token::GreaterEq,
        ]
    );
}

#[test]
fn test_maximal_munch() {
    // `x<=y` must not lex as `<` `=`
    assert_eq!(
        kinds("x<=y"),
        vec![Token::Identifier, Token::LessEq, Token::Identifier]
    );
    // `a&&b` is logical-and, `a&b` would be Amp (used only in types)
    assert_eq!(
        kinds("a&&b"),
        vec![Token::Identifier, Token::AndAnd, Token::Identifier]
    );
}

#[test]
fn test_literals() {
    let toks: Vec<_> = tokenize(r#"42 'x' '\n' "hi\tthere" """#)
        .into_iter()
        .map(|t| t.unwrap())
        .collect();
    assert_eq!(toks[0].token, Token::IntLit);
    assert_eq!(toks[0].text, "42");
    assert_eq!(toks[1].token, Token::CharLit);
    assert_eq!(toks[2].token, Token::CharLit);
    assert_eq!(toks[2].text, r"'\n'");
    assert_eq!(toks[3].token, Token::StringLit);
    assert_eq!(toks[4].token, Token::StringLit);
    assert_eq!(toks[4].text, "\"\"");
}

#[test]
fn test_comment_forms() {
    assert_eq!(kinds("1 // rest of line\n2"), vec![Token::IntLit, Token::IntLit]);
    assert_eq!(kinds("1 /* a\nmultiline\ncomment */ 2"), vec![Token::IntLit, Token::IntLit]);
    // Preprocessor-style lines are skipped whole
    assert_eq!(kinds("#include <iostream>\nint"), vec![Token::KwInt]);
}

#[test]
fn test_line_and_column_positions() {
    let toks: Vec<_> = tokenize("int x;\n  x = 1;")
        .into_iter()
        .map(|t| t.unwrap())
        .collect();
    let eq = toks.iter().find(|t| t.token == Token::Assign).unwrap();
    assert_eq!(eq.span.start_line, 2);
    assert_eq!(eq.span.start_column, 5);
}

#[test]
fn test_unterminated_string_error() {
    let results = tokenize("\"never closed");
    assert!(matches!(
        results.last(),
        Some(Err(ParseError::UnterminatedString { .. }))
    ));
}

#[test]
fn test_bad_char_literal_error() {
    let results = tokenize("'ab'");
    assert!(results.iter().any(|r| r.is_err()));
}

#[test]
fn test_unrecognized_token_error() {
    let results = tokenize("int @ x");
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(ParseError::LexerError { .. }))));
}
