use tracing::trace;

use crate::{
    ast::{Token, TokenKind},
    error::SyntaxError,
};

/// Tokenizer for query text.
///
/// Keywords are case-insensitive; identifiers and string contents keep their
/// case. Whitespace and line breaks only advance the position.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>, line: usize, column: usize) -> SyntaxError {
        SyntaxError::new(message, line, column)
    }

    /// Reads `name`, `name_2`, `due-date` and dotted paths such as `file.name`.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            let continues_path = ch == '.'
                && self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphabetic() || c == '_');
            if ch.is_alphanumeric() || ch == '_' || ch == '-' || continues_path {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, SyntaxError> {
        let (line, column) = (self.line, self.column);
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let (esc_line, esc_column) = (self.line, self.column);
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(self.error(
                                format!("Invalid escape sequence '\\{}'", ch),
                                esc_line,
                                esc_column,
                            ));
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error("Unterminated string literal", line, column))
    }

    fn read_number(&mut self) -> Result<TokenKind, SyntaxError> {
        let (line, column) = (self.line, self.column);
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            number
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("Invalid number '{}'", number), line, column))
        } else {
            number
                .parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| self.error(format!("Number '{}' is out of range", number), line, column))
        }
    }

    /// Produce the next token; returns `Eof` (repeatedly) once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let start = self.position;

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some('[') => {
                self.advance();
                TokenKind::LBracket
            }
            Some(']') => {
                self.advance();
                TokenKind::RBracket
            }
            Some('=') => {
                self.advance();
                TokenKind::Eq
            }
            Some('>') => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            Some('<') => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(self.error("Unexpected '!' (did you mean '!='?)", line, column));
                }
            }
            Some('"') => TokenKind::String(self.read_string('"')?),
            Some('\'') => TokenKind::String(self.read_string('\'')?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                TokenKind::keyword(&ident).unwrap_or(TokenKind::Identifier(ident))
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => {
                return Err(self.error(format!("Unexpected character '{}'", ch), line, column));
            }
        };

        let text: String = self.input[start..self.position].iter().collect();
        trace!(?kind, line, column, "token");
        Ok(Token::new(kind, text, line, column))
    }

    /// Tokenize the whole input; the last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Tokenize query text in one call.
pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(input).tokenize()
}

#[test]
fn test_keywords() {
    let kinds: Vec<TokenKind> = tokenize("table List TASK calendar and Or")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Table,
            TokenKind::List,
            TokenKind::Task,
            TokenKind::Calendar,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_positions() {
    let tokens = tokenize("LIST\n  WHERE x >= 2").unwrap();
    let where_token = &tokens[1];
    assert_eq!(where_token.kind, TokenKind::Where);
    assert_eq!((where_token.line, where_token.column), (2, 3));
    assert_eq!(tokens[3].text, ">=");
    assert_eq!((tokens[3].line, tokens[3].column), (2, 11));
}
