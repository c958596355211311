use bimap::BiMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Pos<'a>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: Pos<'a>) -> Self {
        Token {
            kind,
            value: value.into(),
            pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum TokenKind {
    // Sequences
    DoubleColon, // '::'
    NotEqual,    // '~='

    // Single character tokens
    Dot,      // '.'
    Plus,     // '+'
    Minus,    // '-'
    Lt,       // '<'
    Gt,       // '>'
    LParen,   // '('
    RParen,   // ')'
    LBracket, // '['
    RBracket, // ']'
    Equal,    // '='
    Colon,    // ':'
    Comma,    // ','
    Asterisk, // '*'
    Tilde,    // '~'

    // Keywords
    Declare,   // "declare"
    Struct,    // "struct"
    Begin,     // "begin"
    End,       // "end"
    Anon,      // "anon"
    Modifier,  // "public" | "private"
    Ret,       // "ret"
    Print,     // "print"
    Call,      // "call"
    Init,      // "init"
    Increment, // "increment"
    Decrement, // "decrement"
    If,        // "if"
    Else,      // "else"
    Then,      // "then"

    // Identifier
    Ident,

    // Literals
    Number,
    Text,

    // Special
    Eof,
}

impl TokenKind {
    pub fn symbol(&self) -> Option<char> {
        SYMBOLS.get_by_right(self).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pos<'a> {
    pub file: &'a str,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

/// Reserved character sequences: (text, kind, token value).
/// `ok`, `true` and `false` are aliases of number literals.
pub const SEQUENCES: &[(&str, TokenKind, &str)] = &[
    ("::", TokenKind::DoubleColon, "::"),
    ("~=", TokenKind::NotEqual, "~="),
    ("declare", TokenKind::Declare, "declare"),
    ("struct", TokenKind::Struct, "struct"),
    ("begin", TokenKind::Begin, "begin"),
    ("end", TokenKind::End, "end"),
    ("anon", TokenKind::Anon, "anon"),
    ("public", TokenKind::Modifier, "public"),
    ("private", TokenKind::Modifier, "private"),
    ("ret", TokenKind::Ret, "ret"),
    ("print", TokenKind::Print, "print"),
    ("call", TokenKind::Call, "call"),
    ("init", TokenKind::Init, "init"),
    ("increment", TokenKind::Increment, "increment"),
    ("decrement", TokenKind::Decrement, "decrement"),
    ("if", TokenKind::If, "if"),
    ("else", TokenKind::Else, "else"),
    ("then", TokenKind::Then, "then"),
    ("ok", TokenKind::Number, "0"),
    ("true", TokenKind::Number, "1"),
    ("false", TokenKind::Number, "0"),
];

pub static SYMBOLS: Lazy<BiMap<char, TokenKind>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert('.', TokenKind::Dot);
    map.insert('+', TokenKind::Plus);
    map.insert('-', TokenKind::Minus);
    map.insert('<', TokenKind::Lt);
    map.insert('>', TokenKind::Gt);
    map.insert('(', TokenKind::LParen);
    map.insert(')', TokenKind::RParen);
    map.insert('[', TokenKind::LBracket);
    map.insert(']', TokenKind::RBracket);
    map.insert('=', TokenKind::Equal);
    map.insert(':', TokenKind::Colon);
    map.insert(',', TokenKind::Comma);
    map.insert('*', TokenKind::Asterisk);
    map.insert('~', TokenKind::Tilde);
    map
});

pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-'
}
