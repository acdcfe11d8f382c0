use model::{TokenKind, Type};
use crate::expressions::ExpressionParser;
use crate::parser::{ParseResult, Parser};

/// Type parsing functionality
pub(crate) trait TypeParser {
    fn parse_type(&mut self) -> ParseResult<Type>;
}

impl<'src> TypeParser for Parser<'src> {
    /// `ID` or `array [ [expr] ] of ID`. Type names are not checked here;
    /// an unknown name is the analyzer's problem.
    fn parse_type(&mut self) -> ParseResult<Type> {
        if !self.match_token(TokenKind::Array) {
            let base_name = self.expect_identifier("Expect type name.")?;
            return Ok(Type::scalar(base_name));
        }

        self.expect(TokenKind::LeftBracket, "Expect '[' after 'array'.")?;
        let size_expr = if self.check(TokenKind::RightBracket) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.expect(TokenKind::RightBracket, "Expect ']' after array size.")?;
        self.expect(TokenKind::Of, "Expect 'of' after array size.")?;
        let base_name = self.expect_identifier("Expect element type name.")?;

        Ok(Type { base_name, is_array: true, size_expr })
    }
}
