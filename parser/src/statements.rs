use model::{Block, Statement, StmtKind, TokenKind};
use crate::declarations::DeclarationParser;
use crate::expressions::ExpressionParser;
use crate::parser::{ParseResult, Parser};

/// Statement parsing functionality
pub(crate) trait StatementParser {
    fn parse_block(&mut self) -> ParseResult<Block>;
    fn parse_statement(&mut self) -> ParseResult<Statement>;
}

impl<'src> StatementParser for Parser<'src> {
    /// `begin { statement [;] } end`. A failed statement is skipped up to
    /// the next `;` and parsing carries on with the one after it.
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::Begin, "Expect 'begin'.")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::End) && !self.check(TokenKind::ScanEof) {
            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    if !self.check(TokenKind::End)
                        && self.expect(TokenKind::Semicolon, "Expect ';' after statement.").is_err()
                    {
                        self.synchronize();
                    }
                }
                Err(_) => self.synchronize(),
            }
        }

        self.expect(TokenKind::End, "Expect 'end' after block.")?;
        Ok(Block { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.current.line;

        let kind = match self.current.kind {
            TokenKind::Var => {
                self.advance();
                self.parse_var_declaration()?
            }
            TokenKind::If => {
                self.advance();
                self.parse_if()?
            }
            TokenKind::While => {
                self.advance();
                let condition = self.parse_expr()?;
                self.expect(TokenKind::Do, "Expect 'do' after loop condition.")?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { condition, body }
            }
            TokenKind::Begin => StmtKind::Block(self.parse_block()?),
            TokenKind::Return => {
                self.advance();
                StmtKind::Return(self.parse_return_value()?)
            }
            TokenKind::Assert => {
                self.advance();
                self.expect(TokenKind::LeftParen, "Expect '(' after 'assert'.")?;
                let condition = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expect ')' after assertion.")?;
                StmtKind::Assert(condition)
            }
            TokenKind::Id if self.check_word("read") => {
                self.advance();
                self.parse_read()?
            }
            TokenKind::Id if self.check_word("writeln") => {
                self.advance();
                self.expect(TokenKind::LeftParen, "Expect '(' after 'writeln'.")?;
                StmtKind::Write { args: self.parse_arguments()? }
            }
            TokenKind::Id => self.parse_assign_or_call()?,
            _ => return Err(self.error_at_current("Expect statement.")),
        };

        Ok(Statement { kind, line })
    }
}

impl<'src> Parser<'src> {
    /// `if` consumed. The else branch binds to the nearest `if`.
    fn parse_if(&mut self) -> ParseResult<StmtKind> {
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Then, "Expect 'then' after condition.")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If { condition, then_branch, else_branch })
    }

    fn parse_return_value(&mut self) -> ParseResult<Option<model::Expr>> {
        let bare = [TokenKind::Semicolon, TokenKind::End, TokenKind::Else, TokenKind::ScanEof]
            .iter()
            .any(|&kind| self.check(kind));
        if bare { Ok(None) } else { self.parse_expr().map(Some) }
    }

    fn parse_read(&mut self) -> ParseResult<StmtKind> {
        self.expect(TokenKind::LeftParen, "Expect '(' after 'read'.")?;
        let mut targets = vec![self.parse_variable()?];
        while self.match_token(TokenKind::Comma) {
            targets.push(self.parse_variable()?);
        }
        self.expect(TokenKind::RightParen, "Expect ')' after read targets.")?;
        Ok(StmtKind::Read { targets })
    }

    /// `ID := expr`, `ID [ expr ] := expr`, or `ID ( [args] )`.
    fn parse_assign_or_call(&mut self) -> ParseResult<StmtKind> {
        let name = self.advance().lexeme.to_string();

        if self.match_token(TokenKind::LeftParen) {
            let args = self.parse_arguments()?;
            return Ok(StmtKind::Call { name, args });
        }

        let index = if self.match_token(TokenKind::LeftBracket) {
            let index = self.parse_expr()?;
            self.expect(TokenKind::RightBracket, "Expect ']' after index.")?;
            Some(index)
        } else {
            None
        };

        self.expect(TokenKind::Assign, "Expect ':=' after variable.")?;
        let expr = self.parse_expr()?;
        Ok(StmtKind::Assign { name, index, expr })
    }
}
