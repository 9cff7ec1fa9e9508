use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for the parenthesized prefix syntax
pub struct SExprScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Column where the current token starts
    start_column: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl SExprScanner {
    /// Creates a new S-expression scanner from source code
    pub fn new(source: &str) -> Self {
        SExprScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            start_column: 1,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_column = self.column;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            c if c.is_whitespace() => {}

            ';' => self.skip_line_comment(),

            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            ':' => self.add_token(TokenKind::Colon),

            // A minus sign directly followed by a digit starts a negative
            // number; otherwise it is an identifier such as `-`.
            '-' if self.peek().is_ascii_digit() => self.scan_number()?,
            c if c.is_ascii_digit() => self.scan_number()?,

            '"' => {
                return Err(self.error("string literals are not supported"));
            }

            c if c.is_control() => {
                return Err(self.error(format!("unexpected character {:?}", c)));
            }

            _ => self.scan_identifier(),
        }

        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn scan_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume .
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if !Self::ends_token(self.peek()) {
            while !Self::ends_token(self.peek()) {
                self.advance();
            }
            return Err(self.error(format!("malformed number '{}'", self.lexeme())));
        }

        let text = self.lexeme();
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(format!("malformed number '{}'", text)))?;
        self.add_token(TokenKind::Number(value));
        Ok(())
    }

    fn scan_identifier(&mut self) {
        while !Self::ends_token(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        let kind = match text.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier(text),
        };
        self.add_token(kind);
    }

    /// Characters that cannot continue a number or identifier
    fn ends_token(c: char) -> bool {
        c == '\0' || c.is_whitespace() || matches!(c, '(' | ')' | ':' | ';' | '"')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.tokens
            .push(Token::new(kind, lexeme, self.line, self.start_column));
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::SyntaxError {
            line: self.line,
            col: self.start_column,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        SExprScanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_sexpr() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Identifier("+".to_string()),
                TokenKind::Number(1.0),
                TokenKind::Number(2.0),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword() {
        assert_eq!(
            kinds("(field d :fur-color)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Identifier("field".to_string()),
                TokenKind::Identifier("d".to_string()),
                TokenKind::Colon,
                TokenKind::Identifier("fur-color".to_string()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("-3 2.5 - 7"),
            vec![
                TokenKind::Number(-3.0),
                TokenKind::Number(2.5),
                TokenKind::Identifier("-".to_string()),
                TokenKind::Number(7.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals_and_symbolic_names() {
        assert_eq!(
            kinds("true false null zero? Dog"),
            vec![
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Identifier("zero?".to_string()),
                TokenKind::Identifier("Dog".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            kinds("; leading comment\n(print 1) ; trailing"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Identifier("print".to_string()),
                TokenKind::Number(1.0),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = SExprScanner::new("(print\n  x)").scan_tokens().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
        assert_eq!(tokens[2].lexeme, "x");
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
    }

    #[test]
    fn test_malformed_number() {
        let err = SExprScanner::new("(+ 12abc 1)").scan_tokens().unwrap_err();
        assert!(matches!(err, Error::SyntaxError { line: 1, col: 4, .. }));
    }

    #[test]
    fn test_string_rejected() {
        let err = SExprScanner::new("(print \"hi\")").scan_tokens().unwrap_err();
        assert!(matches!(err, Error::SyntaxError { .. }));
    }
}
