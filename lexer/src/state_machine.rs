use crate::keywords::keyword_or_identifier;
use model::{Token, TokenKind};

/// On-demand scanner. Each call to [`Scanner::next_token`] consumes exactly
/// one token; once the input is exhausted every further call yields
/// `SCAN_EOF` again.
pub struct Scanner<'src> {
    pub(crate) source: &'src str,
    pub(crate) input: &'src [u8],
    pub(crate) pos: usize,
    pub(crate) token_start: usize,
    pub(crate) token_line: usize,
    pub(crate) line: usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
            token_start: 0,
            token_line: 1,
            line: 1,
            finished: false,
        }
    }

    /// Line the scanner is currently positioned on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.token_line = self.line;

        let Some(ch) = self.peek(0) else {
            return self.make(TokenKind::ScanEof);
        };
        self.pos += 1;

        match ch {
            b'/' if self.peek(0) == Some(b'/') => self.line_comment(),
            b'{' if self.peek(0) == Some(b'*') => self.block_comment(),
            b'"' => self.lex_string(),
            b'0'..=b'9' => self.lex_number(),
            c if c.is_ascii_alphabetic() => self.lex_identifier(),
            b'+' => self.make(TokenKind::Plus),
            b'-' => self.make(TokenKind::Minus),
            b'*' => self.make(TokenKind::Mul),
            b'/' => self.make(TokenKind::Div),
            b'%' => self.make(TokenKind::Mod),
            b'=' => self.make(TokenKind::Eq),
            b'(' => self.make(TokenKind::LeftParen),
            b')' => self.make(TokenKind::RightParen),
            b'[' => self.make(TokenKind::LeftBracket),
            b']' => self.make(TokenKind::RightBracket),
            b'.' => self.make(TokenKind::Dot),
            b',' => self.make(TokenKind::Comma),
            b';' => self.make(TokenKind::Semicolon),
            b':' => {
                let kind = if self.match_byte(b'=') { TokenKind::Assign } else { TokenKind::Colon };
                self.make(kind)
            }
            b'<' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::Lte
                } else if self.match_byte(b'>') {
                    TokenKind::Neq
                } else {
                    TokenKind::Lt
                };
                self.make(kind)
            }
            b'>' => {
                let kind = if self.match_byte(b'=') { TokenKind::Gte } else { TokenKind::Gt };
                self.make(kind)
            }
            _ => {
                // Consume the whole character so the lexeme stays valid UTF-8.
                self.pos = self.token_start;
                let width = self.source[self.pos..].chars().next().map_or(1, char::len_utf8);
                self.pos += width;
                self.error("Unexpected character.")
            }
        }
    }

    pub(crate) fn peek(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    pub(crate) fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek(0) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn current_slice(&self) -> &'src str {
        &self.source[self.token_start..self.pos]
    }

    pub(crate) fn make(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, self.current_slice(), self.token_line)
    }

    pub(crate) fn error(&self, message: &'static str) -> Token<'src> {
        Token::error(self.current_slice(), self.token_line, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek(0) {
            match ch {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn lex_identifier(&mut self) -> Token<'src> {
        while matches!(self.peek(0), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        self.make(keyword_or_identifier(self.current_slice()))
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    /// Yields every token up to and including a single `SCAN_EOF`.
    fn next(&mut self) -> Option<Token<'src>> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::ScanEof) {
            self.finished = true;
        }
        Some(token)
    }
}
