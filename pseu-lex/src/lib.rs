//! pseu-lex - the lexical scanner (spec.md §4.1).
//!
//! A pull interface over a source buffer: [`Lexer::next`] and
//! [`Lexer::peek`] each produce one [`Token`]. The lexer never reports
//! diagnostics itself — malformed input becomes a dedicated error
//! [`TokenKind`] so the parser (which knows what it was trying to parse)
//! can word the message and decide how to recover (spec.md §4.2).

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{keyword, Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md §8 scenario 10: `0x`, `0xFF`, `0e24`, `44e ` lexes to the
    /// four distinct error/ok token kinds the spec names, in order.
    #[test]
    fn mixed_number_scenario() {
        let mut lexer = Lexer::new(" 0x  0xFF  0e24  44e ");
        assert_eq!(lexer.next().kind, TokenKind::ErrInvalidHex);
        assert_eq!(lexer.next().kind, TokenKind::IntLiteral(0xFF));
        assert_eq!(lexer.next().kind, TokenKind::RealLiteral(0e24));
        assert_eq!(lexer.next().kind, TokenKind::ErrInvalidExponent);
    }

    /// spec.md §8 invariant 1: lexing the source-slice backing a token
    /// again reproduces an equal token stream.
    #[test]
    fn round_trip_on_source_slices() {
        let src = "DECLARE X : INTEGER\nX <- 41\nOUTPUT X\n";
        let mut lexer = Lexer::new(src);
        let mut spans = Vec::new();
        loop {
            let tok = lexer.next();
            let done = tok.is_eof();
            spans.push(tok);
            if done {
                break;
            }
        }
        for tok in &spans {
            if tok.is_eof() {
                continue;
            }
            let slice = &src[tok.span.start as usize..tok.span.end as usize];
            let mut resliced = Lexer::new(slice);
            assert_eq!(resliced.next().kind, tok.kind);
        }
    }
}
