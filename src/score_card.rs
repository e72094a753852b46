//! Score card text parser
//!
//! Score cards are printed 4 per page, one card per person per event. The
//! extracted text of one card looks like:
//!
//! ```text
//! 12                 <- serial number (anchor)
//! ...
//! ...
//! 100m Freestyle A   <- event name + group
//! ...
//! 4521 John Doe      <- person id + name
//! ...
//! _                  <- end of card
//! ```
//!
//! A new event/group always starts on a fresh page, so the slot index jumps
//! over the unused slots left on the previous page.

use crate::cursor::{parse_int, LineCursor, ParseReport, ScanError};
use crate::layout::SCORE_CARDS_PER_PAGE;

/// Lines between the serial anchor and the event line
const ANCHOR_TO_EVENT: usize = 3;
/// Lines between the event line and the person line
const EVENT_TO_PERSON: usize = 2;
/// Line that closes one card's text block
pub const SENTINEL: &str = "_";

/// One physical score card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCardEntry {
    /// Slot index across the whole document, including skipped slots
    pub index: usize,
    pub person_id: i32,
    pub event_name: String,
    pub group_no: String,
    /// 1-based position within the current (event, group) run
    pub station_no: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EventLine {
    event_name: String,
    group_no: String,
}

/// Running state carried from one card to the next
#[derive(Debug)]
struct ScoreCardState {
    slots_per_page: usize,
    next_index: usize,
    station_no: u32,
    current: Option<EventLine>,
}

impl ScoreCardState {
    fn new(slots_per_page: usize) -> Self {
        Self {
            slots_per_page: slots_per_page.max(1),
            next_index: 0,
            station_no: 0,
            current: None,
        }
    }

    /// Reset the station counter and realign to a fresh page when the
    /// (event, group) pair changes.
    fn enter_group(&mut self, event: &EventLine) {
        if self.current.as_ref() == Some(event) {
            return;
        }
        self.station_no = 0;
        let used = self.next_index % self.slots_per_page;
        if used != 0 {
            self.next_index += self.slots_per_page - used;
        }
        self.current = Some(event.clone());
    }

    fn assign(&mut self) -> (usize, u32) {
        self.station_no += 1;
        let index = self.next_index;
        self.next_index += 1;
        (index, self.station_no)
    }
}

/// Parse score card text, returning the entries read before any anomaly
pub fn parse_score_cards(text: &str) -> Vec<ScoreCardEntry> {
    parse_score_cards_report(text).entries
}

/// Parse score card text with the default 4 slots per page
pub fn parse_score_cards_report(text: &str) -> ParseReport<ScoreCardEntry> {
    parse_score_cards_with_page_slots(text, SCORE_CARDS_PER_PAGE)
}

/// Parse score card text for a sheet holding `slots_per_page` cards
pub fn parse_score_cards_with_page_slots(
    text: &str,
    slots_per_page: usize,
) -> ParseReport<ScoreCardEntry> {
    let mut cursor = LineCursor::new(text);
    let mut state = ScoreCardState::new(slots_per_page);
    let mut entries = Vec::new();

    let anomaly = loop {
        match find_anchor(&mut cursor) {
            Ok(()) => {}
            // Running out of input between cards is the normal way to finish
            Err(ScanError::EndOfInput { .. }) => break None,
            Err(e) => break Some(e),
        }

        let event = match read_event_line(&mut cursor) {
            Ok(event) => event,
            Err(e) => break Some(e),
        };
        state.enter_group(&event);

        let person_id = match read_person_line(&mut cursor) {
            Ok(id) => id,
            Err(e) => break Some(e),
        };

        let (index, station_no) = state.assign();
        log::debug!(
            "score card {}: person {} event {:?} group {} station {}",
            index,
            person_id,
            event.event_name,
            event.group_no,
            station_no
        );
        entries.push(ScoreCardEntry {
            index,
            person_id,
            event_name: event.event_name,
            group_no: event.group_no,
            station_no,
        });

        if !skip_to_sentinel(&mut cursor) {
            break None;
        }
    };

    if let Some(e) = &anomaly {
        log::warn!(
            "score card parsing stopped after {} entries: {}",
            entries.len(),
            e
        );
    }

    ParseReport { entries, anomaly }
}

/// Advance to the next line that is a bare integer (the card serial number)
fn find_anchor(cursor: &mut LineCursor<'_>) -> Result<(), ScanError> {
    cursor
        .find("serial number", |line| parse_int(line).is_some())
        .map(|_| ())
}

/// Read `<event name...> <group>` three lines after the anchor
fn read_event_line(cursor: &mut LineCursor<'_>) -> Result<EventLine, ScanError> {
    let line = cursor.skip(ANCHOR_TO_EVENT, "event line")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.split_last() {
        Some((group, name)) if name.len() >= 2 => Ok(EventLine {
            event_name: name.join(" "),
            group_no: (*group).to_string(),
        }),
        _ => Err(cursor.malformed("event line needs a name and a group", line)),
    }
}

/// Read the person id, the first token two lines after the event line
fn read_person_line(cursor: &mut LineCursor<'_>) -> Result<i32, ScanError> {
    let line = cursor.skip(EVENT_TO_PERSON, "person line")?;
    line.split_whitespace()
        .next()
        .and_then(parse_int)
        .ok_or_else(|| cursor.malformed("person line must start with a numeric id", line))
}

/// Advance past the next sentinel line; false when input ran out first
fn skip_to_sentinel(cursor: &mut LineCursor<'_>) -> bool {
    cursor.find("sentinel", |line| line == SENTINEL).is_ok()
}
