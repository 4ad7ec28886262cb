//! # Scanner
//!
//! Cursor-style reads over a declaration string. All operations take the full
//! input plus a `start..end` byte window and return offsets into the original
//! text, so the parser can recurse into argument lists without copying
//! substrings.
//!
//! Tokens are recognised with a [`logos`] lexer created on the window being
//! read. Quoted literals are single tokens, which is what keeps commas and
//! parentheses inside enum names or default expressions from being mistaken for
//! delimiters.

use crate::errors::TypeParseError;
use logos::Logos;
use std::borrow::Cow;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Token<'a> {
    /// Bare identifier (type name, column name, keyword)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    Identifier(&'a str),

    /// `quoted identifier`, doubled or escaped backticks allowed
    #[regex(r"`([^`\\]|\\.|``)*`", |lex| lex.slice())]
    BacktickQuoted(&'a str),

    /// "quoted identifier"
    #[regex(r#""([^"\\]|\\.|"")*""#, |lex| lex.slice())]
    DoubleQuoted(&'a str),

    /// 'string literal' with `''` and `\'` escapes
    #[regex(r"'([^'\\]|\\.|'')*'", |lex| lex.slice())]
    StringLiteral(&'a str),

    #[regex(r"[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'a str),

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    /// Any other single character, only seen inside expressions we skip over
    #[regex(r#"[^a-zA-Z0-9_ \t\r\n\f`'"(),=]"#, |lex| lex.slice())]
    Symbol(&'a str),
}

impl Token<'_> {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Identifier(s) => format!("identifier '{s}'"),
            Token::BacktickQuoted(s) | Token::DoubleQuoted(s) => format!("quoted identifier {s}"),
            Token::StringLiteral(s) => format!("string {s}"),
            Token::Number(n) => format!("number {n}"),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Equals => "=".to_string(),
            Token::Symbol(s) => format!("'{s}'"),
        }
    }
}

/// A token together with its byte span in the full input.
pub(crate) type Spanned<'a> = (Token<'a>, Range<usize>);

/// Read-only cursor operations over one declaration string.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    text: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the first index at or after `start` that is not ASCII whitespace,
    /// or `end`.
    pub fn skip_spaces(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.text.len());
        let bytes = self.text.as_bytes();
        let mut i = start;
        while i < end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    /// Byte at `index`, if it lies inside the window.
    pub fn byte_at(&self, index: usize, end: usize) -> Option<u8> {
        if index < end {
            self.text.as_bytes().get(index).copied()
        } else {
            None
        }
    }

    /// Lexes the next token in `start..end`, skipping leading whitespace.
    pub(crate) fn next_token(
        &self,
        start: usize,
        end: usize,
    ) -> Result<Option<Spanned<'a>>, TypeParseError> {
        let end = end.min(self.text.len());
        if start >= end {
            return Ok(None);
        }
        let window = self.window(start, end)?;
        let mut lexer = Token::lexer(window);
        match lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => {
                let span = lexer.span();
                Ok(Some((token, start + span.start..start + span.end)))
            }
            Some(Err(())) => {
                let span = lexer.span();
                Err(self.lexer_error(start + span.start, end))
            }
        }
    }

    /// Reads a bare identifier or a backtick/double-quoted one.
    ///
    /// Quoted identifiers are unescaped: a doubled quote character or a
    /// backslash escape stands for the quote itself.
    pub fn read_identifier(
        &self,
        start: usize,
        end: usize,
    ) -> Result<(Cow<'a, str>, usize), TypeParseError> {
        match self.next_token(start, end)? {
            Some((Token::Identifier(name), span)) => Ok((Cow::Borrowed(name), span.end)),
            Some((Token::BacktickQuoted(quoted) | Token::DoubleQuoted(quoted), span)) => {
                Ok((unquote(quoted), span.end))
            }
            Some((token, span)) => Err(TypeParseError::syntax(
                format!("expected identifier, found {}", token.describe()),
                span,
            )),
            None => Err(TypeParseError::syntax(
                "expected identifier, found end of input",
                end..end,
            )),
        }
    }

    /// Reads a single-quoted string literal and returns its unescaped value.
    pub fn read_single_quoted_literal(
        &self,
        start: usize,
        end: usize,
    ) -> Result<(String, usize), TypeParseError> {
        match self.next_token(start, end)? {
            Some((Token::StringLiteral(quoted), span)) => {
                Ok((unquote(quoted).into_owned(), span.end))
            }
            Some((token, span)) => Err(TypeParseError::syntax(
                format!("expected quoted string, found {}", token.describe()),
                span,
            )),
            None => Err(TypeParseError::syntax(
                "expected quoted string, found end of input",
                end..end,
            )),
        }
    }

    /// Finds the first delimiter byte (e.g. `,` or `)`) at parenthesis depth
    /// zero and outside any quoted literal. Returns `end` if there is none.
    ///
    /// A `)` that closes a parenthesis opened inside the window is not a
    /// delimiter; one that would close an enclosing parenthesis is.
    pub fn find_top_level_delimiter(
        &self,
        start: usize,
        end: usize,
        delimiters: &[u8],
    ) -> Result<usize, TypeParseError> {
        let end = end.min(self.text.len());
        let mut depth = 0usize;
        let mut pos = start;
        while let Some((token, span)) = self.next_token(pos, end)? {
            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen if depth > 0 => depth -= 1,
                Token::RightParen if delimiters.contains(&b')') => return Ok(span.start),
                Token::Comma if depth == 0 && delimiters.contains(&b',') => {
                    return Ok(span.start)
                }
                Token::Equals if depth == 0 && delimiters.contains(&b'=') => {
                    return Ok(span.start)
                }
                _ => {}
            }
            pos = span.end;
        }
        Ok(end)
    }

    fn window(&self, start: usize, end: usize) -> Result<&'a str, TypeParseError> {
        self.text.get(start..end).ok_or_else(|| {
            TypeParseError::syntax("offset is not on a character boundary", start..end)
        })
    }

    fn lexer_error(&self, at: usize, end: usize) -> TypeParseError {
        match self.byte_at(at, end) {
            Some(quote @ (b'\'' | b'`' | b'"')) => TypeParseError::syntax(
                format!("unterminated quoted literal starting with {}", quote as char),
                at..end,
            ),
            _ => {
                let found = self.text[at..].chars().next().unwrap_or(' ');
                TypeParseError::syntax(
                    format!("unexpected character '{found}'"),
                    at..at + found.len_utf8(),
                )
            }
        }
    }
}

/// Strips the surrounding quote characters and resolves escapes.
fn unquote(quoted: &str) -> Cow<'_, str> {
    let mut chars = quoted.chars();
    let quote = match chars.next() {
        Some(q) => q,
        None => return Cow::Borrowed(quoted),
    };
    let content = &quoted[quote.len_utf8()..quoted.len() - quote.len_utf8()];
    if !content.contains(quote) && !content.contains('\\') {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(c @ ('\\' | '\'' | '"' | '`')) => result.push(c),
                Some(c) => {
                    // Unrecognized escapes keep their backslash
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else if c == quote && chars.peek() == Some(&quote) {
            chars.next();
            result.push(quote);
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}
