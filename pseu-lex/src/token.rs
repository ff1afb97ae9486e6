use pseu_util::Span;

/// One lexeme. Primitive type names (`VOID`, `BOOLEAN`, ...) are *not*
/// keywords here — spec.md §6 lists them separately from the keyword
/// set, so they lex as ordinary identifiers and are only given meaning
/// by the parser/compiler when they occur in type-ident position.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),

    IntLiteral(i32),
    RealLiteral(f32),
    /// Raw literal text between the quotes, with only the `\"` escape
    /// already resolved; every other escape is translated by the parser
    /// (spec.md §4.2).
    StringLiteral(String),
    BoolLiteral(bool),

    // keywords
    Declare,
    Output,
    Function,
    EndFunction,
    Return,
    If,
    Then,
    Else,
    EndIf,
    While,
    EndWhile,
    Not,
    And,
    Or,

    // punctuation
    LParen,
    RParen,
    Colon,
    Comma,
    Dot,

    // operators
    Assign, // <-
    Eq,     // =
    Ne,     // <>
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,

    Newline,
    Eof,

    // error tokens (spec.md §4.1, §7)
    ErrInvalidHex,
    ErrInvalidExponent,
    ErrUnterminatedString,
    ErrUnknownChar(char),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::ErrInvalidHex
                | TokenKind::ErrInvalidExponent
                | TokenKind::ErrUnterminatedString
                | TokenKind::ErrUnknownChar(_)
        )
    }
}

/// Maps a scanned identifier to a keyword token, or `None` if it is an
/// ordinary identifier.
pub fn keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "DECLARE" => Declare,
        "OUTPUT" => Output,
        "FUNCTION" => Function,
        "ENDFUNCTION" => EndFunction,
        "RETURN" => Return,
        "IF" => If,
        "THEN" => Then,
        "ELSE" => Else,
        "ENDIF" => EndIf,
        "WHILE" => While,
        "ENDWHILE" => EndWhile,
        "TRUE" => BoolLiteral(true),
        "FALSE" => BoolLiteral(false),
        "NOT" => Not,
        "AND" => And,
        "OR" => Or,
        _ => return None,
    })
}
