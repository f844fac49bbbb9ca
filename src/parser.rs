use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{PengError, Position, Result, Span};
use crate::lexer::{Literal, Token, TokenType};
use std::rc::Rc;

/// Outcome of one grammar rule together with the number of tokens it
/// consumed before finishing or failing.
struct Attempt<T> {
    result: Result<T>,
    advanced: usize,
}

impl<T> Attempt<T> {
    /// Swap a failure for `error`, but only when the attempt consumed no
    /// tokens; otherwise the rule's own error stands.
    fn or_fail_with(self, error: impl FnOnce() -> PengError) -> Result<T> {
        match self.result {
            Err(_) if self.advanced == 0 => Err(error()),
            result => result,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// An `Eof` token is appended when `tokens` does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let end = match tokens.last() {
                Some(last) => last.span.end.clone(),
                None => Position::start(Rc::from("<unknown>")),
            };
            tokens.push(Token::new(TokenType::Eof, String::new(), Span::empty(end)));
        }
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        loop {
            match self.peek().token_type {
                TokenType::Newline => {
                    self.advance();
                }
                TokenType::Eof => break,
                TokenType::Say => statements.push(self.print_statement()?),
                TokenType::Identifier => statements.push(self.assign_statement()?),
                _ => {
                    return Err(self.error_at_current(
                        "Expected 'say', variable assignment or newline",
                    ));
                }
            }
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => self.peek().span.clone(),
        };

        Ok(Program { statements, span })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        // 'say'
        self.advance();

        let mut values = vec![self.operand(Self::expression, "say")?];
        while self.match_type(TokenType::Comma) {
            values.push(self.operand(Self::expression, ",")?);
        }

        self.end_of_statement("Expected ',', '+', '-', '*', '/', newline or end of input")?;

        let span = values[0].span().to(values[values.len() - 1].span());
        Ok(Stmt::Print { values, span })
    }

    fn assign_statement(&mut self) -> Result<Stmt> {
        let name = self.advance().clone();

        if !self.match_type(TokenType::Is) {
            return Err(self.error_at_current("Expected 'is' after identifier"));
        }

        let value = self.operand(Self::expression, "is")?;
        self.end_of_statement("Expected '+', '-', '*', '/', newline or end of input")?;

        let span = name.span.to(value.span());
        Ok(Stmt::Assign {
            name: name.lexeme,
            value,
            span,
        })
    }

    /// A statement ends at a newline (consumed) or at end of input (left
    /// for the program loop).
    fn end_of_statement(&mut self, message: &str) -> Result<()> {
        match self.peek().token_type {
            TokenType::Newline => {
                self.advance();
                Ok(())
            }
            TokenType::Eof => Ok(()),
            _ => Err(self.error_at_current(message)),
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        while self.match_types(&[TokenType::Plus, TokenType::Minus]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Plus => BinaryOp::Add,
                _ => BinaryOp::Subtract,
            };

            let right = self.operand(Self::term, &operator_token.lexeme)?;
            let span = expr.span().to(right.span());

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Star, TokenType::Slash]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Star => BinaryOp::Multiply,
                _ => BinaryOp::Divide,
            };

            let right = self.operand(Self::unary, &operator_token.lexeme)?;
            let span = expr.span().to(right.span());

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_types(&[TokenType::Plus, TokenType::Minus]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Plus => UnaryOp::Plus,
                _ => UnaryOp::Negate,
            };

            let operand = self.operand(Self::atom, &operator_token.lexeme)?;
            let span = operator_token.span.to(operand.span());

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                span,
            });
        }

        self.atom()
    }

    fn atom(&mut self) -> Result<Expr> {
        let token = self.peek().clone();

        let expr = match (token.token_type, token.literal) {
            (TokenType::LeftParen, _) => {
                self.advance();
                let expr = self.operand(Self::expression, "(")?;
                if !self.match_type(TokenType::RightParen) {
                    return Err(self.error_at_current("Expected ')'"));
                }
                return Ok(expr);
            }
            (TokenType::Integer, Some(Literal::Integer(value))) => Expr::Number {
                value: value as f64,
                span: token.span,
            },
            (TokenType::Integer | TokenType::Float, Some(Literal::Float(value))) => Expr::Number {
                value,
                span: token.span,
            },
            (TokenType::String, Some(Literal::Str(value))) => Expr::Str {
                value,
                span: token.span,
            },
            (TokenType::Identifier, _) => Expr::Variable {
                name: token.lexeme,
                span: token.span,
            },
            _ => {
                return Err(self.error_at_current(
                    "Expected int, float, string, identifier or '('",
                ));
            }
        };

        self.advance();
        Ok(expr)
    }

    /// Parse the operand that must follow `after`. If the operand rule
    /// fails without consuming anything, report the missing operand in
    /// terms of `after` instead.
    fn operand(&mut self, rule: fn(&mut Self) -> Result<Expr>, after: &str) -> Result<Expr> {
        let attempt = self.attempt(rule);
        let found = self.peek();
        let span = found.span.clone();
        let message = format!("Expected expression after '{}', found {}", after, describe(found));
        attempt.or_fail_with(|| PengError::invalid_syntax(span, message))
    }

    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Attempt<T> {
        let start = self.current;
        let result = rule(self);
        Attempt {
            result,
            advanced: self.current - start,
        }
    }

    fn error_at_current(&self, expected: &str) -> PengError {
        let found = self.peek();
        PengError::invalid_syntax(
            found.span.clone(),
            format!("{}, found {}", expected, describe(found)),
        )
    }

    fn match_type(&mut self, token_type: TokenType) -> bool {
        self.match_types(&[token_type])
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        if types.contains(&self.peek().token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
}

fn describe(token: &Token) -> String {
    match token.token_type {
        TokenType::Eof => "end of input".to_string(),
        TokenType::Newline => "newline".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}
