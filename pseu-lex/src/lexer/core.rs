use pseu_util::Span;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scanner over a source buffer. Pull-based: [`Lexer::next`] returns the
/// next token and advances; [`Lexer::peek`] does the same but restores
/// the cursor afterward (spec.md §4.1).
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source) }
    }

    pub fn next(&mut self) -> Token {
        self.scan_token()
    }

    pub fn peek(&mut self) -> Token {
        let saved = self.cursor.clone();
        let tok = self.scan_token();
        self.cursor = saved;
        tok
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.cursor.position();
        let line = self.cursor.line();
        let column = self.cursor.column();

        let Some(ch) = self.cursor.current() else {
            return self.make(TokenKind::Eof, start, line, column);
        };

        let kind = match ch {
            '\n' => {
                self.cursor.advance();
                TokenKind::Newline
            }
            c if c.is_ascii_digit() || (c == '.' && self.cursor.peek_at(1).is_some_and(|n| n.is_ascii_digit())) => {
                self.scan_number()
            }
            c if is_ident_start(c) => self.scan_identifier(),
            '"' => self.scan_string(),
            _ => self.scan_operator(),
        };

        self.make(kind, start, line, column)
    }

    fn make(&self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token {
        let end = self.cursor.position();
        Token::new(kind, Span::new(start as u32, end as u32, line, column))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.cursor.advance();
                }
                Some('/') if self.cursor.peek_at(1) == Some('/') => {
                    self.skip_line_comment();
                }
                Some('/') if self.cursor.peek_at(1) == Some('*') => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next();
            let done = tok.is_eof();
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn skips_spaces_but_keeps_newlines() {
        assert_eq!(kinds("OUTPUT  1\n"), vec![
            TokenKind::Output,
            TokenKind::IntLiteral(1),
            TokenKind::Newline,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn line_comment_does_not_consume_its_newline() {
        assert_eq!(kinds("OUTPUT 1 // hi\n"), vec![
            TokenKind::Output,
            TokenKind::IntLiteral(1),
            TokenKind::Newline,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn block_comment_spans_newlines_without_emitting_them() {
        assert_eq!(kinds("OUTPUT /* a\nb */ 1\n"), vec![
            TokenKind::Output,
            TokenKind::IntLiteral(1),
            TokenKind::Newline,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("OUTPUT 1\n");
        assert_eq!(lexer.peek().kind, TokenKind::Output);
        assert_eq!(lexer.peek().kind, TokenKind::Output);
        assert_eq!(lexer.next().kind, TokenKind::Output);
        assert_eq!(lexer.next().kind, TokenKind::IntLiteral(1));
    }
}
