//! Comp card text parser
//!
//! A comp card lists every event one person is registered for:
//!
//! ```text
//! ID 4521            <- person id
//! John Doe
//! 100m Freestyle     <- event lines, one per event
//! 200m Backstroke, 3
//!                    <- blank line ends the block
//! ```

use crate::cursor::{parse_int, LineCursor, ParseReport, ScanError};

/// Prefix of the line that opens a comp card block
pub const ID_MARKER: &str = "ID";
/// Lines between the id line and the first event line
const ID_TO_EVENTS: usize = 2;

/// One physical comp card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompCardEntry {
    /// Slot index across the whole document
    pub index: usize,
    pub person_id: i32,
    /// Event names in card order; duplicates are kept
    pub event_list: Vec<String>,
}

/// Parse comp card text, returning the entries read before any anomaly
pub fn parse_comp_cards(text: &str) -> Vec<CompCardEntry> {
    parse_comp_cards_report(text).entries
}

/// Parse comp card text and report the anomaly that stopped parsing, if any
pub fn parse_comp_cards_report(text: &str) -> ParseReport<CompCardEntry> {
    let mut cursor = LineCursor::new(text);
    let mut entries = Vec::new();

    let anomaly = loop {
        let person_id = match find_id_line(&mut cursor) {
            Ok(id) => id,
            Err(ScanError::EndOfInput { .. }) => break None,
            Err(e) => break Some(e),
        };

        let event_list = read_event_block(&mut cursor);
        let index = entries.len();
        log::debug!(
            "comp card {}: person {} events {:?}",
            index,
            person_id,
            event_list
        );
        entries.push(CompCardEntry {
            index,
            person_id,
            event_list,
        });
    };

    if let Some(e) = &anomaly {
        log::warn!(
            "comp card parsing stopped after {} entries: {}",
            entries.len(),
            e
        );
    }

    ParseReport { entries, anomaly }
}

fn is_id_line(line: &str) -> bool {
    line.starts_with(ID_MARKER)
}

/// Advance to the next `ID <number>` line and return the person id
fn find_id_line(cursor: &mut LineCursor<'_>) -> Result<i32, ScanError> {
    let line = cursor.find("ID line", is_id_line)?;
    line.split_whitespace()
        .nth(1)
        .and_then(parse_int)
        .ok_or_else(|| cursor.malformed("ID line must carry a numeric person id", line))
}

/// Collect event lines until a blank line or the next card's ID line.
///
/// When an ID line shows up before the blank line, the extractor dropped the
/// block terminator and the last collected line belongs to the next card: it
/// is discarded and the cursor steps back so the ID line is read again.
fn read_event_block(cursor: &mut LineCursor<'_>) -> Vec<String> {
    let mut events = Vec::new();

    let mut next = cursor.skip(ID_TO_EVENTS, "event line");
    while let Ok(line) = next {
        if line.is_empty() {
            break;
        }
        if is_id_line(line) {
            events.pop();
            cursor.rewind();
            break;
        }
        events.push(clean_event_line(line));
        next = cursor.advance("event line");
    }

    events
}

/// Drop numeric annotations (heat, lane, `3,`) from an event line.
///
/// Tokens that parse as integers once a single trailing comma is removed are
/// dropped, the rest are joined with single spaces and any trailing comma
/// left dangling by a dropped annotation is trimmed.
pub fn clean_event_line(line: &str) -> String {
    let kept: Vec<&str> = line
        .split_whitespace()
        .filter(|token| {
            let bare = token.strip_suffix(',').unwrap_or(token);
            parse_int(bare).is_none()
        })
        .collect();

    kept.join(" ").trim_end_matches(',').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_card() {
        let text = "ID 4521\n\n100m Freestyle\n200m Backstroke, 3\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(
            entries,
            vec![CompCardEntry {
                index: 0,
                person_id: 4521,
                event_list: vec!["100m Freestyle".into(), "200m Backstroke".into()],
            }]
        );
    }

    #[test]
    fn test_line_after_id_is_skipped() {
        let text = "ID 7\nJane Roe\nLong Jump\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(entries[0].event_list, vec!["Long Jump".to_string()]);
    }

    #[test]
    fn test_blank_runs_between_blocks() {
        let text = "ID 1\nA\nShot Put\n\n\n\n\nID 2\nB\nDiscus\nShot Put\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].person_id, 2);
        assert_eq!(
            entries[1].event_list,
            vec!["Discus".to_string(), "Shot Put".to_string()]
        );
    }

    #[test]
    fn test_id_overrun_drops_last_line_and_rereads_id() {
        // No blank line after the first block: "Bob" belongs to the next card
        let text = "ID 1\nAnn\nHigh Jump\n60m Hurdles\nBob\nID 2\nBob\nSprint\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].event_list,
            vec!["High Jump".to_string(), "60m Hurdles".to_string()]
        );
        assert_eq!(entries[1].person_id, 2);
        assert_eq!(entries[1].event_list, vec!["Sprint".to_string()]);
    }

    #[test]
    fn test_duplicate_events_are_kept() {
        let text = "ID 3\nx\nRelay\nRelay\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(entries[0].event_list, vec!["Relay", "Relay"]);
    }

    #[test]
    fn test_numeric_only_line_becomes_empty_event() {
        let text = "ID 3\nx\n12, 4\nRelay\n\n";
        let entries = parse_comp_cards(text);
        assert_eq!(entries[0].event_list, vec!["", "Relay"]);
    }

    #[test]
    fn test_block_running_to_end_of_input() {
        let text = "ID 9\nx\nJavelin";
        let report = parse_comp_cards_report(text);
        assert!(report.is_complete());
        assert_eq!(report.entries[0].event_list, vec!["Javelin"]);
    }

    #[test]
    fn test_bad_id_stops_parsing() {
        let text = "ID 1\nx\nJavelin\n\nID abc\nx\nDiscus\n\n";
        let report = parse_comp_cards_report(text);
        assert_eq!(report.entries.len(), 1);
        assert!(matches!(report.anomaly, Some(ScanError::Malformed { .. })));
    }

    #[test]
    fn test_clean_event_line() {
        assert_eq!(clean_event_line("200m Backstroke, 3"), "200m Backstroke");
        assert_eq!(clean_event_line("100m  Freestyle 2, 5"), "100m Freestyle");
        assert_eq!(clean_event_line("4x100m Relay"), "4x100m Relay");
        assert_eq!(clean_event_line("1, 2"), "");
    }

    #[test]
    fn test_clean_event_line_is_idempotent() {
        for line in ["200m Backstroke, 3", "Shot Put 4 5,", "60m, Hurdles, 2", "7"] {
            let once = clean_event_line(line);
            assert_eq!(clean_event_line(&once), once);
        }
    }
}
