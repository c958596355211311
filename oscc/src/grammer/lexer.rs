use super::token::{is_ident_char, Pos, Token, TokenKind, SEQUENCES, SYMBOLS};
use crate::error::Error;

pub struct Lexer<'a> {
    file: &'a str,
    chars: Vec<char>,
    index: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, code: &str) -> Self {
        Self {
            file,
            chars: code.chars().collect(),
            index: 0,
            line: 1,
            col: 1,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.chars.get(self.index).copied()?;
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, cond: F) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0) {
            if !cond(ch) {
                break;
            }
            lexeme.push(ch);
            self.consume();
        }
        lexeme
    }

    fn pos(&self) -> Pos<'a> {
        Pos {
            file: self.file,
            line: self.line,
            col: self.col,
            offset: self.index,
        }
    }

    /// Length of the reserved sequence starting at the cursor.
    /// Sequences other than `::` must not run into an identifier
    /// (`init-list`, `structured`, `~=b`).
    fn match_sequence(&self, text: &str) -> Option<usize> {
        let len = text.chars().count();
        let matched = text
            .chars()
            .enumerate()
            .all(|(i, expected)| match self.peek_nth(i) {
                Some(ch) => ch.to_lowercase().eq(expected.to_lowercase()),
                None => false,
            });
        if !matched {
            return None;
        }
        match self.peek_nth(len) {
            Some(next) if text != "::" && is_ident_char(next) => None,
            _ => Some(len),
        }
    }
}

// ----------------------------------------------------------------------------
// Tokenizer
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, Error> {
        let mut tokens = Vec::new();
        'outer: while let Some(ch0) = self.peek_nth(0) {
            // 0. Newlines and whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = self.pos();

            // 1. Comment: .* until end of line
            if ch0 == '.' && self.peek_nth(1) == Some('*') {
                self.consume_while(|ch| ch != '\n');
                continue;
            }

            // 2. String literal
            if ch0 == '"' {
                self.consume();
                let lexeme = self.consume_while(|ch| ch != '"');
                if self.consume().is_none() {
                    return Err(Error::UnterminatedString((&pos).into()));
                }
                tokens.push(Token::new(TokenKind::Text, lexeme, pos));
                continue;
            }

            // 3. Keywords and multi character operators
            for (text, kind, value) in SEQUENCES {
                if let Some(len) = self.match_sequence(text) {
                    for _ in 0..len {
                        self.consume();
                    }
                    tokens.push(Token::new(*kind, *value, pos));
                    continue 'outer;
                }
            }

            // 4. Identifier
            if ch0.is_alphabetic() {
                let lexeme = self.consume_while(is_ident_char);
                tokens.push(Token::new(TokenKind::Ident, lexeme, pos));
                continue;
            }

            // 5. Number literal
            if ch0.is_ascii_digit() {
                let lexeme = self.consume_while(|ch| ch.is_ascii_digit());
                tokens.push(Token::new(TokenKind::Number, lexeme, pos));
                continue;
            }

            // 6. Single character token
            if let Some(kind) = SYMBOLS.get_by_left(&ch0) {
                self.consume();
                tokens.push(Token::new(*kind, ch0.to_string(), pos));
                continue;
            }

            return Err(Error::UnexpectedChar(ch0, (&pos).into()));
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.pos()));
        Ok(tokens)
    }
}
