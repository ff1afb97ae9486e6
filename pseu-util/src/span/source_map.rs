use crate::error::{SourceMapError, SourceMapResult};

/// Holds the source text being compiled, plus the line-start offsets
/// needed to turn a byte offset back into a `line:col` pair for
/// diagnostics that are constructed after the fact (e.g. runtime errors,
/// which only carry a span captured at compile time).
pub struct SourceMap {
    text: String,
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line number containing byte offset `pos`.
    pub fn line_of(&self, pos: u32) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(idx) => idx as u32 + 1,
            Err(idx) => idx as u32,
        }
    }

    /// The full text of 1-based line `line`, without its trailing newline.
    pub fn line_text(&self, line: u32) -> SourceMapResult<&str> {
        let max_lines = self.line_starts.len();
        if line == 0 || line as usize > max_lines {
            return Err(SourceMapError::InvalidLine { line: line as usize, max_lines });
        }
        let start = self.line_starts[line as usize - 1] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map(|&n| n as usize - 1)
            .unwrap_or(self.text.len());
        Ok(&self.text[start..end.max(start)])
    }

    pub fn snippet(&self, start: u32, end: u32) -> SourceMapResult<&str> {
        let (start, end) = (start as usize, end as usize);
        if start > end || end > self.text.len() {
            return Err(SourceMapError::SpanOutOfBounds { len: self.text.len(), start, end });
        }
        Ok(&self.text[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_finds_correct_line() {
        let sm = SourceMap::new("aaa\nbbb\nccc");
        assert_eq!(sm.line_of(0), 1);
        assert_eq!(sm.line_of(4), 2);
        assert_eq!(sm.line_of(8), 3);
    }

    #[test]
    fn line_text_strips_newline() {
        let sm = SourceMap::new("OUTPUT 1\nOUTPUT 2\n");
        assert_eq!(sm.line_text(1).unwrap(), "OUTPUT 1");
        assert_eq!(sm.line_text(2).unwrap(), "OUTPUT 2");
    }
}
