//! Lexer (tokenizer) for C-family source text.
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parse driver. Preprocessor directives are silently skipped rather than
//! parsed. The lexer is error tolerant: an unrecognized character or a
//! malformed literal becomes a [`TokenKind::Error`] token and lexing
//! continues, so a token stream is always produced.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use super::token::{Span, Token, TokenKind};

/// Reserved-word table, built once and shared by all lexers.
fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        let mut table = FxHashMap::default();
        table.insert("int", TokenKind::Int);
        table.insert("char", TokenKind::Char);
        table.insert("void", TokenKind::Void);
        table.insert("long", TokenKind::Long);
        table.insert("short", TokenKind::Short);
        table.insert("float", TokenKind::Float);
        table.insert("double", TokenKind::Double);
        table.insert("signed", TokenKind::Signed);
        table.insert("unsigned", TokenKind::Unsigned);
        table.insert("_Bool", TokenKind::Bool);
        table.insert("struct", TokenKind::Struct);
        table.insert("union", TokenKind::Union);
        table.insert("enum", TokenKind::Enum);
        table.insert("const", TokenKind::Const);
        table.insert("volatile", TokenKind::Volatile);
        table.insert("sizeof", TokenKind::Sizeof);
        table
    })
}

/// Lexer over one source text (or one re-lexed slice of it).
pub struct Lexer {
    input: Vec<(usize, char)>,
    position: usize,
    base: usize,
    end: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::with_offset(input, 0)
    }

    /// Create a lexer whose spans are offset by `base` bytes.
    ///
    /// Used by the incremental re-parser to lex the edited middle region of
    /// a source text in place, producing spans valid for the whole text.
    pub fn with_offset(input: &str, base: usize) -> Self {
        Self {
            input: input.char_indices().collect(),
            position: 0,
            base,
            end: base + input.len(),
        }
    }

    /// Tokenize the entire input. Never fails; malformed input is recorded
    /// as error tokens in place.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments(&mut tokens);

            if self.is_at_end() {
                let at = self.end;
                tokens.push(Token::new(TokenKind::Eof, Span::new(at, at)));
                break;
            }

            // Preprocessor lines are not part of the grammar.
            if self.peek() == Some('#') {
                self.skip_to_line_end();
                continue;
            }

            tokens.push(self.next_token());
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        let start_idx = self.position;
        let start = self.current_offset();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, Span::new(start, start)),
        };

        let kind = match ch {
            '"' => return self.string_literal(start),
            '\'' => return self.char_literal(start),
            '0'..='9' => return self.number_literal(start, start_idx),
            'a'..='z' | 'A'..='Z' | '_' => return self.identifier_or_keyword(start, start_idx),

            '+' => {
                if self.peek() == Some('+') {
                    self.advance();
                    TokenKind::PlusPlus
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.peek() == Some('-') {
                    self.advance();
                    TokenKind::MinusMinus
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::MinusEq
                } else if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else if self.peek() == Some('<') {
                    self.advance();
                    TokenKind::LtLt
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::GtGt
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,

            // Unrecognized character: error token, keep lexing.
            _ => TokenKind::Error,
        };

        Token::new(kind, Span::new(start, self.current_offset()))
    }

    /// Lex a string literal. An unterminated literal or unknown escape
    /// becomes an error token covering the scanned span.
    fn string_literal(&mut self, start: usize) -> Token {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance();
                let span = Span::new(start, self.current_offset());
                return Token::new(TokenKind::StringLiteral(string), span);
            }

            if ch == '\n' {
                // Literal runs off the line: unterminated.
                break;
            }

            if ch == '\\' {
                self.advance();
                let escaped = match self.advance() {
                    Some(c) => c,
                    None => break,
                };
                match unescape(escaped) {
                    Some(c) => string.push(c),
                    None => {
                        self.skip_to_quote('"');
                        return Token::new(
                            TokenKind::Error,
                            Span::new(start, self.current_offset()),
                        );
                    }
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Token::new(TokenKind::Error, Span::new(start, self.current_offset()))
    }

    /// Lex a character literal; malformed forms become error tokens.
    fn char_literal(&mut self, start: usize) -> Token {
        let value = match self.advance() {
            Some('\\') => match self.advance().and_then(unescape) {
                Some(c) => c as i8,
                None => {
                    self.skip_to_quote('\'');
                    return Token::new(
                        TokenKind::Error,
                        Span::new(start, self.current_offset()),
                    );
                }
            },
            Some('\'') | Some('\n') | None => {
                return Token::new(TokenKind::Error, Span::new(start, self.current_offset()));
            }
            Some(ch) => ch as i8,
        };

        if self.peek() == Some('\'') {
            self.advance();
            Token::new(TokenKind::CharLiteral(value), Span::new(start, self.current_offset()))
        } else {
            self.skip_to_quote('\'');
            Token::new(TokenKind::Error, Span::new(start, self.current_offset()))
        }
    }

    /// Lex a decimal integer literal (the first digit is already consumed).
    fn number_literal(&mut self, start: usize, start_idx: usize) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let span = Span::new(start, self.current_offset());
        let text: String = self.input[start_idx..self.position]
            .iter()
            .map(|(_, c)| *c)
            .collect();

        match text.parse::<i64>() {
            Ok(value) => Token::new(TokenKind::IntLiteral(value), span),
            Err(_) => Token::new(TokenKind::Error, span),
        }
    }

    /// Lex an identifier or keyword (the first character is already consumed).
    fn identifier_or_keyword(&mut self, start: usize, start_idx: usize) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let span = Span::new(start, self.current_offset());
        let ident: String = self.input[start_idx..self.position]
            .iter()
            .map(|(_, c)| *c)
            .collect();

        let kind = match keyword_table().get(ident.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenKind::Ident(ident),
        };

        Token::new(kind, span)
    }

    /// Skip whitespace and comments. An unterminated block comment is
    /// recorded as an error token covering the rest of the input.
    fn skip_whitespace_and_comments(&mut self, tokens: &mut Vec<Token>) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_to_line_end();
                    } else if self.peek_ahead(1) == Some('*') {
                        let start = self.current_offset();
                        if !self.skip_block_comment() {
                            tokens.push(Token::new(
                                TokenKind::Error,
                                Span::new(start, self.current_offset()),
                            ));
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_to_quote(&mut self, quote: char) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
            if ch == quote {
                break;
            }
        }
    }

    /// Returns false when the comment runs off the end of input.
    fn skip_block_comment(&mut self) -> bool {
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return true;
            }
            self.advance();
        }

        false
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).map(|(_, c)| *c)
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).map(|(_, c)| *c);
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Byte offset of the next unconsumed character, in whole-text terms.
    fn current_offset(&self) -> usize {
        match self.input.get(self.position) {
            Some((off, _)) => self.base + off,
            None => self.end,
        }
    }
}

fn unescape(escaped: char) -> Option<char> {
    match escaped {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '0' => Some('\0'),
        _ => None,
    }
}
