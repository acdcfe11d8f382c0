pub mod keywords;
pub mod literals;
pub mod state_machine;

use model::Token;
pub use state_machine::Scanner;

/// Scan the whole input eagerly. The last token is always `SCAN_EOF`.
pub fn lex(source: &str) -> Vec<Token<'_>> {
    Scanner::new(source).collect()
}
