use model::TokenKind;

/// Classify a scanned word. Matching is whole-word because the caller has
/// already consumed the longest identifier run.
pub fn keyword_or_identifier(text: &str) -> TokenKind {
    match text {
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "not" => TokenKind::Not,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "of" => TokenKind::Of,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "begin" => TokenKind::Begin,
        "end" => TokenKind::End,
        "var" => TokenKind::Var,
        "array" => TokenKind::Array,
        "procedure" => TokenKind::Procedure,
        "function" => TokenKind::Function,
        "program" => TokenKind::Program,
        "assert" => TokenKind::Assert,
        "return" => TokenKind::Return,
        _ => TokenKind::Id,
    }
}
