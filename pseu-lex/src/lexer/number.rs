use super::Lexer;
use crate::token::TokenKind;

impl<'a> Lexer<'a> {
    /// Scans an integer, hex integer, or real literal (spec.md §4.1).
    /// Dispatch into here has already established that the current
    /// character is a digit, or a `.` immediately followed by a digit.
    pub(crate) fn scan_number(&mut self) -> TokenKind {
        if self.cursor.current() == Some('0')
            && matches!(self.cursor.peek_at(1), Some('x') | Some('X'))
        {
            return self.scan_hex();
        }

        let mut is_real = false;

        let int_start = self.cursor.position();
        while self.cursor.current().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
        }
        let int_end = self.cursor.position();

        let mut frac_start = int_end;
        let mut frac_end = int_end;
        if self.cursor.current() == Some('.') {
            is_real = true;
            self.cursor.advance();
            frac_start = self.cursor.position();
            while self.cursor.current().is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
            }
            frac_end = self.cursor.position();
        }

        let mut exp_text = String::new();
        if matches!(self.cursor.current(), Some('e') | Some('E')) {
            is_real = true;
            self.cursor.advance();
            if matches!(self.cursor.current(), Some('+') | Some('-')) {
                exp_text.push(self.cursor.advance().unwrap());
            }
            let digits_start = self.cursor.position();
            while self.cursor.current().is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
            }
            if self.cursor.position() == digits_start {
                return TokenKind::ErrInvalidExponent;
            }
        }

        if is_real {
            let _ = (frac_start, frac_end, exp_text);
            let full = self.cursor.slice(int_start, self.cursor.position());
            let normalized = normalize_real_text(full);
            let value: f32 = normalized.parse().unwrap_or(f32::NAN);
            TokenKind::RealLiteral(value)
        } else {
            let text = self.cursor.slice(int_start, int_end);
            TokenKind::IntLiteral(parse_wrapping_decimal(text))
        }
    }

    fn scan_hex(&mut self) -> TokenKind {
        self.cursor.advance(); // '0'
        self.cursor.advance(); // 'x'/'X'
        let digits_start = self.cursor.position();
        while self.cursor.current().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.cursor.advance();
        }
        if self.cursor.position() == digits_start {
            return TokenKind::ErrInvalidHex;
        }
        let digits = self.cursor.slice(digits_start, self.cursor.position());
        let mut value: i32 = 0;
        for b in digits.bytes() {
            let d = (b as char).to_digit(16).unwrap() as i32;
            value = value.wrapping_mul(16).wrapping_add(d);
        }
        TokenKind::IntLiteral(value)
    }
}

/// Rebuilds a parseable `f32` literal from the raw source slice, which
/// may have an empty integer part (`.5`) or empty fraction (`0.e5`).
fn normalize_real_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let bytes = raw.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'.') {
        out.push('0');
    }
    while i < bytes.len() {
        let c = bytes[i] as char;
        out.push(c);
        if c == '.' && (i + 1 >= bytes.len() || !bytes[i + 1].is_ascii_digit()) {
            out.push('0');
        }
        i += 1;
    }
    out
}

fn parse_wrapping_decimal(text: &str) -> i32 {
    let mut value: i32 = 0;
    for b in text.bytes() {
        let d = (b - b'0') as i32;
        value = value.wrapping_mul(10).wrapping_add(d);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::super::Lexer;
    use crate::token::TokenKind;

    fn scan(src: &str) -> TokenKind {
        Lexer::new(src).next().kind
    }

    #[test]
    fn plain_integer() {
        assert_eq!(scan("42"), TokenKind::IntLiteral(42));
    }

    #[test]
    fn hex_integer() {
        assert_eq!(scan("0xFF"), TokenKind::IntLiteral(255));
    }

    #[test]
    fn invalid_hex_has_no_digits() {
        assert_eq!(scan("0x  "), TokenKind::ErrInvalidHex);
    }

    #[test]
    fn real_with_fraction() {
        assert_eq!(scan("1.5"), TokenKind::RealLiteral(1.5));
    }

    #[test]
    fn real_leading_dot() {
        assert_eq!(scan(".5"), TokenKind::RealLiteral(0.5));
    }

    #[test]
    fn real_with_exponent() {
        assert_eq!(scan("1e5"), TokenKind::RealLiteral(1e5));
    }

    #[test]
    fn real_empty_fraction_with_exponent() {
        assert_eq!(scan("0.e5"), TokenKind::RealLiteral(0.0e5));
    }

    #[test]
    fn invalid_exponent_has_no_digits() {
        assert_eq!(scan("44e "), TokenKind::ErrInvalidExponent);
    }
}
