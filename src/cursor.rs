//! Line cursor shared by the card parsers
//!
//! Extracted PDF text has no field delimiters, so both parsers walk it line
//! by line with fixed offsets. `LineCursor` keeps that walk explicit: every
//! sub-scan either returns the line it landed on or a typed `ScanError`.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Split raw extracted text into physical lines (`\r\n`, `\r` or `\n`)
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_BREAK_RE.split(text).collect()
}

/// Why a record could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Input ran out before the expected line was reached
    #[error("input ended while looking for {expected}")]
    EndOfInput { expected: &'static str },
    /// A line was found but does not have the expected shape
    #[error("line {line_no}: {reason}: {line:?}")]
    Malformed {
        line_no: usize,
        reason: &'static str,
        line: String,
    },
}

/// Entries parsed from one document plus the anomaly that stopped parsing, if any
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    pub entries: Vec<T>,
    pub anomaly: Option<ScanError>,
}

impl<T> ParseReport<T> {
    /// True when the whole input was consumed without an anomaly
    pub fn is_complete(&self) -> bool {
        self.anomaly.is_none()
    }
}

/// Cursor over an indexed sequence of lines.
///
/// `pos` is the line that was read last; `None` means nothing has been read
/// yet, so the first `advance` lands on line 0.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: Option<usize>,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: split_lines(text),
            pos: None,
        }
    }

    /// Zero-based number of the line read last
    pub fn line_no(&self) -> Option<usize> {
        self.pos
    }

    /// Whether any line remains after the current position
    pub fn has_remaining(&self) -> bool {
        self.next_index() < self.lines.len()
    }

    fn next_index(&self) -> usize {
        self.pos.map_or(0, |p| p + 1)
    }

    /// Move forward `n` lines and return the trimmed line there
    pub fn skip(&mut self, n: usize, expected: &'static str) -> Result<&'a str, ScanError> {
        let target = self.pos.map_or(n.saturating_sub(1), |p| p + n);
        self.pos = Some(target);
        self.lines
            .get(target)
            .map(|line| line.trim())
            .ok_or(ScanError::EndOfInput { expected })
    }

    /// Move to the next line and return it trimmed
    pub fn advance(&mut self, expected: &'static str) -> Result<&'a str, ScanError> {
        self.skip(1, expected)
    }

    /// Advance line by line until `pred` accepts a trimmed line
    pub fn find<F>(&mut self, expected: &'static str, mut pred: F) -> Result<&'a str, ScanError>
    where
        F: FnMut(&str) -> bool,
    {
        loop {
            let line = self.advance(expected)?;
            if pred(line) {
                return Ok(line);
            }
        }
    }

    /// Step back one line so the next `advance` re-reads the current line
    pub fn rewind(&mut self) {
        self.pos = match self.pos {
            Some(0) | None => None,
            Some(p) => Some(p - 1),
        };
    }

    /// Build a `Malformed` error for the current line
    pub fn malformed(&self, reason: &'static str, line: &str) -> ScanError {
        ScanError::Malformed {
            line_no: self.pos.map_or(0, |p| p + 1),
            reason,
            line: line.to_string(),
        }
    }
}

/// Parse a whitespace-trimmed token as a 32-bit signed integer
pub fn parse_int(token: &str) -> Option<i32> {
    token.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_mixed_breaks() {
        let lines = split_lines("a\r\nb\rc\nd");
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_skip_and_advance() {
        let mut cursor = LineCursor::new("zero\n one \ntwo\nthree");
        assert_eq!(cursor.advance("first"), Ok("zero"));
        assert_eq!(cursor.skip(3, "fourth"), Ok("three"));
        assert_eq!(cursor.line_no(), Some(3));
        assert!(!cursor.has_remaining());
        assert_eq!(
            cursor.advance("fifth"),
            Err(ScanError::EndOfInput { expected: "fifth" })
        );
    }

    #[test]
    fn test_skip_from_start_lands_on_nth_line() {
        let mut cursor = LineCursor::new("a\nb\nc");
        assert_eq!(cursor.skip(2, "b"), Ok("b"));
    }

    #[test]
    fn test_find_and_rewind() {
        let mut cursor = LineCursor::new("x\n\n42\ny");
        assert_eq!(cursor.find("number", |l| parse_int(l).is_some()), Ok("42"));
        cursor.rewind();
        assert_eq!(cursor.advance("number again"), Ok("42"));
    }

    #[test]
    fn test_malformed_reports_one_based_line() {
        let mut cursor = LineCursor::new("a\nb");
        cursor.skip(2, "b").unwrap();
        match cursor.malformed("bad", "b") {
            ScanError::Malformed { line_no, .. } => assert_eq!(line_no, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(" 12 "), Some(12));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("12a"), None);
        assert_eq!(parse_int(""), None);
    }
}
