use super::Lexer;

impl<'a> Lexer<'a> {
    /// Consumes a `//` comment up to but not including the terminating
    /// newline, so the newline is still emitted as its own token
    /// (spec.md §4.1: statement termination is newline-based).
    pub(crate) fn skip_line_comment(&mut self) {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '/'
        while !matches!(self.cursor.current(), None | Some('\n')) {
            self.cursor.advance();
        }
    }

    /// Consumes a `/* ... */` comment, which may span newlines; those
    /// newlines are swallowed along with the rest of the comment body.
    /// An unterminated block comment runs to end of file.
    pub(crate) fn skip_block_comment(&mut self) {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            match self.cursor.current() {
                None => break,
                Some('*') if self.cursor.peek_at(1) == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }
}
