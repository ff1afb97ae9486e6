use super::core::is_ident_continue;
use super::Lexer;
use crate::token::{keyword, TokenKind};

impl<'a> Lexer<'a> {
    /// Scans `[A-Za-z_][A-Za-z0-9_]*`, resolving it to a keyword token
    /// when it matches one of spec.md §6's reserved words.
    pub(crate) fn scan_identifier(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while self.cursor.current().is_some_and(is_ident_continue) {
            self.cursor.advance();
        }
        let text = self.cursor.slice(start, self.cursor.position());
        keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn keyword_recognized() {
        assert_eq!(Lexer::new("DECLARE").next().kind, TokenKind::Declare);
    }

    #[test]
    fn plain_identifier() {
        assert_eq!(Lexer::new("counter_1").next().kind, TokenKind::Ident("counter_1".into()));
    }

    #[test]
    fn boolean_literals_are_keywords() {
        assert_eq!(Lexer::new("TRUE").next().kind, TokenKind::BoolLiteral(true));
        assert_eq!(Lexer::new("FALSE").next().kind, TokenKind::BoolLiteral(false));
    }
}
