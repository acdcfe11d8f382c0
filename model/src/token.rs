use std::fmt;

/// Every lexical category the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Id,
    IntLit,
    RealLit,
    StrLit,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Assign,
    Dot,
    Comma,
    Semicolon,
    Colon,
    // Keywords
    Or,
    And,
    Not,
    If,
    Then,
    Else,
    Of,
    While,
    Do,
    Begin,
    End,
    Var,
    Array,
    Procedure,
    Function,
    Program,
    Assert,
    Return,
    Comment,
    ScanError,
    ScanEof,
}

impl TokenKind {
    /// Upper-case name used by the token trace.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::IntLit => "INT_LIT",
            Self::RealLit => "REAL_LIT",
            Self::StrLit => "STR_LIT",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Lte => "LTE",
            Self::Gte => "GTE",
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::LeftBracket => "LEFT_BRACKET",
            Self::RightBracket => "RIGHT_BRACKET",
            Self::Assign => "ASSIGN",
            Self::Dot => "DOT",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::Of => "OF",
            Self::While => "WHILE",
            Self::Do => "DO",
            Self::Begin => "BEGIN",
            Self::End => "END",
            Self::Var => "VAR",
            Self::Array => "ARRAY",
            Self::Procedure => "PROCEDURE",
            Self::Function => "FUNCTION",
            Self::Program => "PROGRAM",
            Self::Assert => "ASSERT",
            Self::Return => "RETURN",
            Self::Comment => "COMMENT",
            Self::ScanError => "SCAN_ERROR",
            Self::ScanEof => "SCAN_EOF",
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Or
                | Self::And
                | Self::Not
                | Self::If
                | Self::Then
                | Self::Else
                | Self::Of
                | Self::While
                | Self::Do
                | Self::Begin
                | Self::End
                | Self::Var
                | Self::Array
                | Self::Procedure
                | Self::Function
                | Self::Program
                | Self::Assert
                | Self::Return
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token borrowing its lexeme from the scanned source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub line: usize,
    /// Set only on `ScanError` tokens.
    pub diagnostic: Option<&'static str>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, line: usize) -> Self {
        Self { kind, lexeme, line, diagnostic: None }
    }

    pub fn error(lexeme: &'src str, line: usize, message: &'static str) -> Self {
        Self { kind: TokenKind::ScanError, lexeme, line, diagnostic: Some(message) }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} '{}' {}", self.kind.name(), self.lexeme, self.diagnostic.unwrap_or(""))
    }
}
