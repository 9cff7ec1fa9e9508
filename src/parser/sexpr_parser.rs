use super::ast::{Expression, Program, Statement};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Names accepted for `define` statements
const DEFINE_FORMS: [&str; 2] = ["define", "definieren"];
/// Names accepted for `print` statements
const PRINT_FORMS: [&str; 2] = ["print", "druck"];
/// Names accepted for conditionals
const IF_FORMS: [&str; 2] = ["if", "ob"];

/// S-expression parser producing programs and expressions
pub struct SExprParser {
    tokens: Vec<Token>,
    current: usize,
}

impl SExprParser {
    /// Creates a new S-expression parser
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenKind::Eof, String::new(), line, column));
        }
        SExprParser { tokens, current: 0 }
    }

    /// Parses the tokens as a sequence of top-level statements
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program::new(statements))
    }

    /// Parses the tokens as exactly one expression
    pub fn parse_single_expression(&mut self) -> Result<Expression> {
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            return Err(self.expected_error("end of input after the expression"));
        }
        Ok(expr)
    }

    /// Parse one top-level statement
    fn parse_statement(&mut self) -> Result<Statement> {
        if self.check(&TokenKind::LeftParen) {
            if let TokenKind::Identifier(name) = self.peek_next().kind.clone() {
                if DEFINE_FORMS.contains(&name.as_str()) {
                    return self.parse_define();
                }
                if PRINT_FORMS.contains(&name.as_str()) {
                    return self.parse_print();
                }
            }
        }

        let expr = self.parse_expression()?;
        Err(Error::NotAStatement {
            form: expr.to_string(),
        })
    }

    /// (define name expr)
    fn parse_define(&mut self) -> Result<Statement> {
        self.consume(TokenKind::LeftParen)?;
        self.advance(); // consume 'define'

        let name = self.consume_identifier("name to define")?;
        let value = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        Ok(Statement::Define { name, value })
    }

    /// (print expr)
    fn parse_print(&mut self) -> Result<Statement> {
        self.consume(TokenKind::LeftParen)?;
        self.advance(); // consume 'print'

        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        Ok(Statement::Print(expr))
    }

    /// Parse an expression
    pub fn parse_expression(&mut self) -> Result<Expression> {
        match self.peek().kind.clone() {
            TokenKind::LeftParen => self.parse_list(),
            TokenKind::Colon => self.parse_keyword_literal(),
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expression::NumberLiteral(n))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::BoolLiteral(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::BoolLiteral(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::NullLiteral)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expression::Variable(name))
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            TokenKind::RightParen => Err(self.expected_error("expression")),
        }
    }

    /// Parse a parenthesized form
    fn parse_list(&mut self) -> Result<Expression> {
        self.consume(TokenKind::LeftParen)?;

        if self.check(&TokenKind::RightParen) {
            return Err(self.syntax_error("empty application `()`"));
        }

        if let TokenKind::Identifier(name) = self.peek().kind.clone() {
            let name = name.as_str();
            if name == "lambda" {
                return self.parse_lambda();
            }
            if IF_FORMS.contains(&name) {
                return self.parse_if_expr();
            }
            if DEFINE_FORMS.contains(&name) || PRINT_FORMS.contains(&name) {
                return Err(self.syntax_error(format!(
                    "`{}` is a statement and may only appear at top level",
                    name
                )));
            }
        }

        let head = self.parse_expression()?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            args.push(self.parse_expression()?);
        }
        self.consume(TokenKind::RightParen)?;

        Ok(Expression::apply(head, args))
    }

    /// (lambda (param ...) body)
    fn parse_lambda(&mut self) -> Result<Expression> {
        self.advance(); // consume 'lambda'

        self.consume(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            params.push(self.consume_identifier("parameter name")?);
        }
        self.consume(TokenKind::RightParen)?;

        let body = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        Ok(Expression::lambda(params, body))
    }

    /// (if guard then else)
    fn parse_if_expr(&mut self) -> Result<Expression> {
        self.advance(); // consume 'if'

        let guard = self.parse_expression()?;
        let then_expr = self.parse_expression()?;
        if self.check(&TokenKind::RightParen) {
            return Err(self.expected_error("else branch of conditional"));
        }
        let else_expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        Ok(Expression::conditional(guard, then_expr, else_expr))
    }

    /// :name, with the name directly after the colon
    fn parse_keyword_literal(&mut self) -> Result<Expression> {
        let colon = self.consume(TokenKind::Colon)?;

        match self.peek().kind.clone() {
            TokenKind::Identifier(_) | TokenKind::True | TokenKind::False | TokenKind::Null => {
                let name = self.peek();
                if name.line != colon.line || name.column != colon.column + 1 {
                    return Err(self.syntax_error("keyword name must follow `:` directly"));
                }
                let token = self.advance();
                Ok(Expression::KeywordLiteral(token.lexeme))
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.expected_error("keyword name after `:`")),
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    // `new` guarantees the stream ends in Eof, and `advance` never moves past it
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.current + 1).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(Error::UnexpectedEof)
        } else {
            Err(self.expected_error(&kind.to_string()))
        }
    }

    fn consume_identifier(&mut self, what: &str) -> Result<String> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.expected_error(what)),
        }
    }

    /// Syntax error at the current token
    fn syntax_error(&self, message: impl Into<String>) -> Error {
        let token = self.peek();
        Error::SyntaxError {
            line: token.line,
            col: token.column,
            message: message.into(),
        }
    }

    /// Syntax error of the form "expected X, found Y"
    fn expected_error(&self, expected: &str) -> Error {
        self.syntax_error(format!("expected {}, found {}", expected, self.peek().kind))
    }
}
