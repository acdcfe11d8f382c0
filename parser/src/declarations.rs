use model::{Function, Parameter, StmtKind, TokenKind, Type};
use crate::parser::{ParseResult, Parser};
use crate::statements::StatementParser;
use crate::types::TypeParser;

pub(crate) trait DeclarationParser {
    fn parse_subroutine(&mut self) -> ParseResult<Function>;
    fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>>;
    fn parse_var_declaration(&mut self) -> ParseResult<StmtKind>;
}

impl<'src> DeclarationParser for Parser<'src> {
    /// `function ID ( [params] ) : type ; block ;` or the procedure form
    /// without a return type.
    fn parse_subroutine(&mut self) -> ParseResult<Function> {
        let line = self.current.line;
        let is_function = self.match_token(TokenKind::Function);
        if !is_function {
            self.expect(TokenKind::Procedure, "Expect 'function' or 'procedure'.")?;
        }

        let name = self.expect_identifier("Expect subroutine name.")?;
        self.expect(TokenKind::LeftParen, "Expect '(' after subroutine name.")?;
        let params = if self.check(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_parameters()?
        };
        self.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;

        let return_type = if is_function {
            self.expect(TokenKind::Colon, "Expect ':' before return type.")?;
            self.parse_type()?
        } else {
            Type::void()
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after subroutine header.")?;

        let body = self.parse_block()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after subroutine body.")?;

        Ok(Function { name, params, return_type, body, line })
    }

    fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut params = Vec::new();
        loop {
            let line = self.current.line;
            let name = self.expect_identifier("Expect parameter name.")?;
            self.expect(TokenKind::Colon, "Expect ':' after parameter name.")?;
            let type_token = self.current;
            let r#type = self.parse_type()?;
            if r#type.size_expr.is_some() {
                return Err(self.error_at(type_token, "Array parameter cannot have a size."));
            }
            params.push(Parameter { name, r#type, line });

            if !self.match_token(TokenKind::Comma) {
                return Ok(params);
            }
        }
    }

    /// `var` has been consumed: `ID {, ID} : type`
    fn parse_var_declaration(&mut self) -> ParseResult<StmtKind> {
        let mut names = vec![self.expect_identifier("Expect variable name.")?];
        while self.match_token(TokenKind::Comma) {
            names.push(self.expect_identifier("Expect variable name after ','.")?);
        }
        self.expect(TokenKind::Colon, "Expect ':' after variable names.")?;
        let r#type = self.parse_type()?;
        Ok(StmtKind::VarDecl { names, r#type })
    }
}
