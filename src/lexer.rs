use crate::error::{PengError, Position, Result, Span};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    Comma,
    Minus,
    Plus,
    Slash,
    Star,
    Newline,

    // Literals
    Identifier,
    String,
    Integer,
    Float,

    // Keywords
    Say,
    Is,

    // Special
    Eof,
}

/// Value carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    /// Source text of the token, quotes and escapes included.
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            literal: None,
            span,
        }
    }

    pub fn with_literal(token_type: TokenType, lexeme: String, literal: Literal, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            literal: Some(literal),
            span,
        }
    }
}

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    current: usize,
    /// Position of the character at `current`.
    pos: Position,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str, name: &str) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("say", TokenType::Say);
        keywords.insert("is", TokenType::Is);

        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            current: 0,
            pos: Position::start(Rc::from(name)),
            keywords,
        }
    }

    /// Scan the whole source, stopping at the first lexical error.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.peek() {
            self.scan_token(c)?;
        }

        self.tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            Span::empty(self.pos.clone()),
        ));

        Ok(self.tokens)
    }

    fn scan_token(&mut self, c: char) -> Result<()> {
        match c {
            ' ' | '\t' => {
                self.advance();
            }
            '(' => self.single(TokenType::LeftParen),
            ')' => self.single(TokenType::RightParen),
            ',' => self.single(TokenType::Comma),
            '-' => self.single(TokenType::Minus),
            '+' => self.single(TokenType::Plus),
            '*' => self.single(TokenType::Star),
            '/' => self.single(TokenType::Slash),
            '\n' => self.single(TokenType::Newline),
            '"' => self.string()?,
            c if c.is_ascii_digit() => self.number()?,
            c if is_identifier_char(c) => self.identifier(),
            _ => {
                return Err(PengError::unknown_character(
                    Span::single(self.pos.clone(), c),
                    format!("Unknown character '{}'", c.escape_default()),
                ));
            }
        }

        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        self.pos.advance(c);
        Some(c)
    }

    fn single(&mut self, token_type: TokenType) {
        let start = self.pos.clone();
        if let Some(c) = self.advance() {
            self.tokens.push(Token::new(
                token_type,
                c.to_string(),
                Span::new(start, self.pos.clone()),
            ));
        }
    }

    fn string(&mut self) -> Result<()> {
        let start = self.pos.clone();
        let mut raw = String::from('"');
        let mut contents = String::new();

        // Opening quote
        self.advance();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(PengError::invalid_syntax(
                        Span::new(start, self.pos.clone()),
                        "Expected closing '\"'".to_string(),
                    ));
                }
                Some('"') => {
                    self.advance();
                    raw.push('"');
                    break;
                }
                Some('\\') => {
                    self.advance();
                    raw.push('\\');
                    // A backslash right before the line ends leaves the string open.
                    let escaped = match self.peek() {
                        None | Some('\n') => continue,
                        Some(escaped) => escaped,
                    };
                    self.advance();
                    raw.push(escaped);
                    match escaped {
                        '\\' => contents.push('\\'),
                        '"' => contents.push('"'),
                        't' => contents.push('\t'),
                        'n' => contents.push('\n'),
                        'r' => contents.push('\r'),
                        'v' => contents.push('\u{0b}'),
                        'f' => contents.push('\u{0c}'),
                        other => {
                            contents.push('\\');
                            contents.push(other);
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    raw.push(c);
                    contents.push(c);
                }
            }
        }

        self.tokens.push(Token::with_literal(
            TokenType::String,
            raw,
            Literal::Str(contents),
            Span::new(start, self.pos.clone()),
        ));
        Ok(())
    }

    fn number(&mut self) -> Result<()> {
        let start = self.pos.clone();
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c == '.' {
                if is_float {
                    return Err(PengError::invalid_character(
                        Span::single(self.pos.clone(), c),
                        "Invalid character '.'".to_string(),
                    ));
                }
                is_float = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }

        let span = Span::new(start, self.pos.clone());

        let token = if is_float {
            let value = text.parse::<f64>().map_err(|_| {
                PengError::invalid_character(span.clone(), format!("Invalid float '{}'", text))
            })?;
            Token::with_literal(TokenType::Float, text, Literal::Float(value), span)
        } else {
            // Digit runs too long for i64 keep their nearest f64 value.
            let literal = match text.parse::<i64>() {
                Ok(value) => Literal::Integer(value),
                Err(_) => Literal::Float(text.parse::<f64>().map_err(|_| {
                    PengError::invalid_character(span.clone(), format!("Invalid integer '{}'", text))
                })?),
            };
            Token::with_literal(TokenType::Integer, text, literal, span)
        };

        self.tokens.push(token);
        Ok(())
    }

    fn identifier(&mut self) {
        let start = self.pos.clone();
        let mut text = String::new();

        while let Some(c) = self.peek().filter(|c| is_identifier_char(*c)) {
            text.push(c);
            self.advance();
        }

        let token_type = self
            .keywords
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);

        self.tokens.push(Token::new(
            token_type,
            text,
            Span::new(start, self.pos.clone()),
        ));
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
