use super::Lexer;
use crate::token::TokenKind;

impl<'a> Lexer<'a> {
    /// Scans a double-quoted string literal. Only the `\"` escape is
    /// resolved here; every other escape sequence is passed through
    /// verbatim for the parser to translate (spec.md §4.1, §4.2). A raw
    /// newline inside the literal is an error.
    pub(crate) fn scan_string(&mut self) -> TokenKind {
        self.cursor.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None => return TokenKind::ErrUnterminatedString,
                Some('\n') => return TokenKind::ErrUnterminatedString,
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') if self.cursor.peek_at(1) == Some('"') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    text.push('"');
                }
                Some('\\') => {
                    text.push('\\');
                    self.cursor.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
        TokenKind::StringLiteral(text)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn plain_string() {
        assert_eq!(Lexer::new("\"hi\"").next().kind, TokenKind::StringLiteral("hi".into()));
    }

    #[test]
    fn escaped_quote_is_resolved_at_lex_time() {
        assert_eq!(Lexer::new(r#""a\"b""#).next().kind, TokenKind::StringLiteral("a\"b".into()));
    }

    #[test]
    fn other_escapes_pass_through_raw() {
        assert_eq!(Lexer::new(r#""a\nb""#).next().kind, TokenKind::StringLiteral("a\\nb".into()));
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        assert_eq!(Lexer::new("\"abc").next().kind, TokenKind::ErrUnterminatedString);
    }

    #[test]
    fn raw_newline_inside_string_is_an_error() {
        assert_eq!(Lexer::new("\"abc\ndef\"").next().kind, TokenKind::ErrUnterminatedString);
    }
}
