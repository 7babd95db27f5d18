//! Lexer for the C++ subset
//!
//! Wraps the logos-generated lexer with span tracking, block comment
//! scanning and literal decoding.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span and raw source text
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// C++ subset lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
    /// Offset from original source (used after restarting the lexer
    /// behind a block comment)
    offset: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer").field("offset", &self.offset).finish()
    }
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
            offset: 0,
        }
    }

    /// Get the source code
    pub fn source(&self) -> &'a str {
        self.source
    }

    fn make_span(&self, start: usize, end: usize) -> Span {
        self.source_map.span(start, end)
    }

    /// Restart the inner lexer from an absolute byte position
    fn restart_from(&mut self, pos: usize) {
        self.inner = Token::lexer(&self.source[pos..]);
        self.offset = pos;
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        loop {
            let result = self.inner.next()?;
            let span = self.inner.span();
            let start = self.offset + span.start;
            let end = self.offset + span.end;

            match result {
                Ok(Token::BlockCommentStart) => match self.scan_block_comment(end) {
                    Ok(comment_end) => {
                        self.restart_from(comment_end);
                        continue;
                    }
                    Err(e) => {
                        // Prevent further tokens after an unterminated comment
                        self.restart_from(self.source.len());
                        return Some(Err(e));
                    }
                },

                Ok(token) => {
                    let span = self.make_span(start, end);
                    return Some(Ok(SpannedToken::new(token, span, &self.source[start..end])));
                }

                Err(()) => {
                    let span = self.make_span(start, end);
                    // Classify the failure by its first byte so string/char
                    // problems do not surface as a bare "unrecognized token".
                    let err = match self.source.as_bytes().get(start) {
                        Some(b'"') => ParseError::UnterminatedString { span },
                        Some(b'\'') => ParseError::InvalidCharacter { span },
                        _ => ParseError::LexerError { span },
                    };
                    self.restart_from(self.source.len());
                    return Some(Err(err));
                }
            }
        }
    }

    /// Scan past a `/* … */` block comment (non-nesting).
    /// Uses memchr's substring search to find the closing delimiter.
    fn scan_block_comment(&self, start: usize) -> ParseResult<usize> {
        match memchr::memmem::find(&self.source.as_bytes()[start..], b"*/") {
            Some(offset) => Ok(start + offset + 2),
            None => Err(ParseError::UnterminatedBlockComment {
                span: self.make_span(start.saturating_sub(2), start),
            }),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize source code, returning tokens with their spans
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    Lexer::new(source).collect()
}

// ==================== Literal decoding ====================
// The lexer keeps raw text (with quotes and escapes); the parser decodes
// it through these helpers.

fn unescape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

/// Decode a raw char literal (`'a'` or `'\n'`) into its character
pub fn decode_char_lit(raw: &str, span: Span) -> ParseResult<char> {
    let inner: Vec<char> = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or(ParseError::InvalidCharacter { span })?
        .chars()
        .collect();

    match inner.as_slice() {
        [c] if *c != '\\' => Ok(*c),
        ['\\', e] => unescape(*e).ok_or_else(|| ParseError::InvalidEscape {
            sequence: e.to_string(),
            span,
        }),
        _ => Err(ParseError::InvalidCharacter { span }),
    }
}

/// Decode a raw string literal (`"…"` with escapes) into its contents
pub fn decode_string_lit(raw: &str, span: Span) -> ParseResult<String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(ParseError::UnterminatedString { span })?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or(ParseError::UnterminatedString { span })?;
        match unescape(esc) {
            Some(decoded) => out.push(decoded),
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: esc.to_string(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_tokens(source: &str) -> Vec<SpannedToken<'_>> {
        tokenize(source).into_iter().map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_spans_track_lines() {
        let toks = ok_tokens("int x;\nx = 1;");
        assert_eq!(toks[0].span.start_line, 1);
        let x = toks.iter().find(|t| t.span.start_line == 2).unwrap();
        assert_eq!(x.text, "x");
        assert_eq!(x.span.start_column, 1);
    }

    #[test]
    fn test_block_comment_skipped() {
        let toks = ok_tokens("1 /* comment * with stars */ 2");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].text, "2");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let results = tokenize("1 /* never closed");
        assert!(matches!(
            results.last(),
            Some(Err(ParseError::UnterminatedBlockComment { .. }))
        ));
    }

    #[test]
    fn test_decode_char() {
        let span = Span::empty();
        assert_eq!(decode_char_lit("'a'", span).unwrap(), 'a');
        assert_eq!(decode_char_lit(r"'\n'", span).unwrap(), '\n');
        assert_eq!(decode_char_lit(r"'\0'", span).unwrap(), '\0');
        assert!(decode_char_lit(r"'\q'", span).is_err());
    }

    #[test]
    fn test_decode_string() {
        let span = Span::empty();
        assert_eq!(
            decode_string_lit(r#""a\tb\"c""#, span).unwrap(),
            "a\tb\"c"
        );
        assert!(decode_string_lit(r#""bad \q escape""#, span).is_err());
    }
}
