use model::{AddOp, Expr, Factor, MulOp, RelOp, Sign, SimpleExpr, Term, TokenKind, Variable};
use crate::parser::{ParseResult, Parser};

/// Expression parsing functionality using precedence climbing
pub(crate) trait ExpressionParser {
    fn parse_expr(&mut self) -> ParseResult<Expr>;
    /// Comma-separated arguments after an already consumed `(`, through `)`.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>>;
    fn parse_variable(&mut self) -> ParseResult<Variable>;
}

impl<'src> ExpressionParser for Parser<'src> {
    /// Relational level. At most one comparison, so `a < b < c` leaves the
    /// second `<` for the caller to reject.
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let left = self.parse_simple_expr()?;
        let relation = match self.relational_op() {
            Some(op) => {
                self.advance();
                Some((op, self.parse_simple_expr()?))
            }
            None => None,
        };
        Ok(Expr { left, relation })
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(args)
    }

    fn parse_variable(&mut self) -> ParseResult<Variable> {
        let name = self.expect_identifier("Expect variable name.")?;
        self.parse_variable_suffix(name)
    }
}

impl<'src> Parser<'src> {
    fn parse_simple_expr(&mut self) -> ParseResult<SimpleExpr> {
        let sign = if self.match_token(TokenKind::Minus) {
            Some(Sign::Minus)
        } else if self.match_token(TokenKind::Plus) {
            Some(Sign::Plus)
        } else {
            None
        };

        let first = self.parse_term()?;
        let mut rest = Vec::new();
        while let Some(op) = self.additive_op() {
            self.advance();
            rest.push((op, self.parse_term()?));
        }
        Ok(SimpleExpr { sign, first, rest })
    }

    fn parse_term(&mut self) -> ParseResult<Term> {
        let first = self.parse_factor()?;
        let mut rest = Vec::new();
        while let Some(op) = self.multiplicative_op() {
            self.advance();
            rest.push((op, self.parse_factor()?));
        }
        Ok(Term { first, rest })
    }

    /// A primary with an optional `.size` suffix.
    fn parse_factor(&mut self) -> ParseResult<Factor> {
        let primary = self.parse_primary()?;
        if !self.match_token(TokenKind::Dot) {
            return Ok(primary);
        }
        if !self.check_word("size") {
            return Err(self.error_at_current("Expect 'size' after '.'."));
        }
        self.advance();
        Ok(Factor::Size(Box::new(primary)))
    }

    fn parse_primary(&mut self) -> ParseResult<Factor> {
        let token = self.current;
        match token.kind {
            TokenKind::Not => {
                self.advance();
                Ok(Factor::Not(Box::new(self.parse_factor()?)))
            }
            TokenKind::IntLit => {
                self.advance();
                Ok(Factor::IntegerLiteral(token.lexeme.to_string()))
            }
            TokenKind::RealLit => {
                self.advance();
                Ok(Factor::RealLiteral(token.lexeme.to_string()))
            }
            TokenKind::StrLit => {
                self.advance();
                Ok(Factor::StringLiteral(token.lexeme.to_string()))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Factor::Paren(Box::new(inner)))
            }
            TokenKind::Id => {
                let name = self.advance().lexeme.to_string();
                if self.match_token(TokenKind::LeftParen) {
                    let args = self.parse_arguments()?;
                    Ok(Factor::Call { name, args })
                } else {
                    self.parse_variable_suffix(name).map(Factor::Variable)
                }
            }
            _ => Err(self.error_at_current("Expect expression.")),
        }
    }

    fn parse_variable_suffix(&mut self, name: String) -> ParseResult<Variable> {
        if !self.match_token(TokenKind::LeftBracket) {
            return Ok(Variable { name, index: None });
        }
        let index = self.parse_expr()?;
        self.expect(TokenKind::RightBracket, "Expect ']' after index.")?;
        Ok(Variable { name, index: Some(Box::new(index)) })
    }

    fn relational_op(&self) -> Option<RelOp> {
        match self.current.kind {
            TokenKind::Eq => Some(RelOp::Eq),
            TokenKind::Neq => Some(RelOp::Neq),
            TokenKind::Lt => Some(RelOp::Lt),
            TokenKind::Lte => Some(RelOp::Lte),
            TokenKind::Gte => Some(RelOp::Gte),
            TokenKind::Gt => Some(RelOp::Gt),
            _ => None,
        }
    }

    fn additive_op(&self) -> Option<AddOp> {
        match self.current.kind {
            TokenKind::Plus => Some(AddOp::Add),
            TokenKind::Minus => Some(AddOp::Sub),
            TokenKind::Or => Some(AddOp::Or),
            _ => None,
        }
    }

    fn multiplicative_op(&self) -> Option<MulOp> {
        match self.current.kind {
            TokenKind::Mul => Some(MulOp::Mul),
            TokenKind::Div => Some(MulOp::Div),
            TokenKind::Mod => Some(MulOp::Mod),
            TokenKind::And => Some(MulOp::And),
            _ => None,
        }
    }
}
