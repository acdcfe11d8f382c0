use crate::state_machine::Scanner;
use model::{Token, TokenKind};

impl<'src> Scanner<'src> {
    /// Integer run, optionally followed by `.digits` and an exponent.
    pub(crate) fn lex_number(&mut self) -> Token<'src> {
        self.skip_digits();

        if self.peek(0) != Some(b'.') {
            return self.make(TokenKind::IntLit);
        }
        self.pos += 1;
        if !self.at_digit() {
            return self.error("Malformed number.");
        }
        self.skip_digits();

        if matches!(self.peek(0), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !self.at_digit() {
                return self.error("Malformed number.");
            }
            self.skip_digits();
        }

        self.make(TokenKind::RealLit)
    }

    /// The opening quote is already consumed. The lexeme keeps both quotes
    /// and the escapes undecoded.
    pub(crate) fn lex_string(&mut self) -> Token<'src> {
        loop {
            match self.peek(0) {
                None => return self.error("Unterminated string."),
                Some(b'"') => {
                    self.pos += 1;
                    return self.make(TokenKind::StrLit);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek(0) {
                        Some(b'\n') => {
                            self.line += 1;
                            self.pos += 1;
                        }
                        Some(_) => self.pos += 1,
                        None => {}
                    }
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    pub(crate) fn line_comment(&mut self) -> Token<'src> {
        while matches!(self.peek(0), Some(c) if c != b'\n') {
            self.pos += 1;
        }
        self.make(TokenKind::Comment)
    }

    /// `{* ... *}`, not nested.
    pub(crate) fn block_comment(&mut self) -> Token<'src> {
        self.pos += 1;
        loop {
            match self.peek(0) {
                None => return self.error("Unterminated comment."),
                Some(b'*') if self.peek(1) == Some(b'}') => {
                    self.pos += 2;
                    return self.make(TokenKind::Comment);
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn at_digit(&self) -> bool {
        matches!(self.peek(0), Some(c) if c.is_ascii_digit())
    }

    fn skip_digits(&mut self) {
        while self.at_digit() {
            self.pos += 1;
        }
    }
}
