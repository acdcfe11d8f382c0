use crate::declarations::DeclarationParser;
use crate::statements::StatementParser;
use lexer::Scanner;
use model::{Block, Diagnostic, Location, Program, Token, TokenKind};

/// Marker returned when a production could not be completed. The diagnostic
/// has already been recorded; callers decide where to resynchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyntaxError;

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

/// Core parser struct that maintains parsing state
pub(crate) struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) panic_mode: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let scanner = Scanner::new(source);
        let start = Token::new(TokenKind::ScanEof, "", 1);
        let mut parser = Parser {
            scanner,
            current: start,
            previous: start,
            diagnostics: Vec::new(),
            panic_mode: false,
        };
        parser.advance();
        parser
    }

    /// `program ID ; {subroutine} block . EOF`
    ///
    /// Always yields a tree; whatever could not be parsed is left out and
    /// reported through `diagnostics`.
    pub fn parse_program(&mut self) -> Program {
        let name = match self.parse_header() {
            Ok(name) => name,
            Err(_) => {
                self.synchronize();
                String::new()
            }
        };

        let mut functions = Vec::new();
        while self.check(TokenKind::Function) || self.check(TokenKind::Procedure) {
            match self.parse_subroutine() {
                Ok(function) => functions.push(function),
                Err(_) => self.recover_subroutine(),
            }
        }

        let body = self.parse_block().unwrap_or_else(|_| Block { statements: Vec::new() });
        if self.expect(TokenKind::Dot, "Expect '.' after program body.").is_ok() {
            let _ = self.expect(TokenKind::ScanEof, "Expect end of input after '.'.");
        }

        Program { name, functions, body }
    }

    fn parse_header(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::Program, "Expect 'program'.")?;
        let name = self.expect_identifier("Expect program name.")?;
        self.expect(TokenKind::Semicolon, "Expect ';' after program name.")?;
        Ok(name)
    }

    /// Skip past a subroutine whose header failed, including its body.
    fn recover_subroutine(&mut self) {
        self.synchronize();
        if self.check(TokenKind::Begin) {
            let _ = self.parse_block();
            self.match_token(TokenKind::Semicolon);
        }
    }

    /// Move to the next non-comment token. Error tokens are kept so the
    /// production that meets one reports its lexical message.
    pub(crate) fn advance(&mut self) -> Token<'src> {
        self.previous = self.current;
        loop {
            self.current = self.scanner.next_token();
            if !self.current.is(TokenKind::Comment) {
                break;
            }
        }
        self.previous
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    /// Identifier with a particular spelling, e.g. the built-in `read`.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.current.is(TokenKind::Id) && self.current.lexeme == word
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token<'src>> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(message))
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> ParseResult<String> {
        self.expect(TokenKind::Id, message).map(|token| token.lexeme.to_string())
    }

    /// Record a diagnostic for the current token and enter panic mode.
    /// Nothing is recorded while already panicking.
    pub(crate) fn error_at_current(&mut self, message: &str) -> SyntaxError {
        self.error_at(self.current, message)
    }

    pub(crate) fn error_at(&mut self, token: Token<'src>, message: &str) -> SyntaxError {
        if self.panic_mode {
            return SyntaxError;
        }
        self.panic_mode = true;

        let diagnostic = match token.kind {
            TokenKind::ScanError => Diagnostic::lexical(token.line, token.diagnostic.unwrap_or(message)),
            TokenKind::ScanEof => Diagnostic::syntax(token.line, Location::End, message),
            _ => Diagnostic::syntax(token.line, Location::At(token.lexeme.to_string()), message),
        };
        self.diagnostics.push(diagnostic);
        SyntaxError
    }

    /// Discard tokens up to and including the next `;`. Panic mode stays on
    /// when input runs out so trailing productions do not cascade.
    pub(crate) fn synchronize(&mut self) {
        while !self.check(TokenKind::Semicolon) && !self.check(TokenKind::ScanEof) {
            self.advance();
        }
        if self.match_token(TokenKind::Semicolon) {
            self.panic_mode = false;
        }
    }
}
