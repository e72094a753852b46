//! Cross-reference comp card events to score card stations

use crate::comp_card::CompCardEntry;
use crate::score_card::ScoreCardEntry;
use std::collections::HashMap;

/// First score card for `person_id` in `event_name`, in document order
pub fn find_score_card<'a>(
    score_cards: &'a [ScoreCardEntry],
    person_id: i32,
    event_name: &str,
) -> Option<&'a ScoreCardEntry> {
    score_cards
        .iter()
        .find(|e| e.person_id == person_id && e.event_name == event_name)
}

/// Resolve every event on a comp card with a linear scan; `None` where the
/// person has no score card for that event.
pub fn resolve<'a>(
    comp_card: &CompCardEntry,
    score_cards: &'a [ScoreCardEntry],
) -> Vec<Option<&'a ScoreCardEntry>> {
    comp_card
        .event_list
        .iter()
        .map(|event| find_score_card(score_cards, comp_card.person_id, event))
        .collect()
}

/// `(person, event) -> score card` map built once per run.
///
/// When the same pair appears twice the entry with the lower index wins,
/// matching `find_score_card`.
#[derive(Debug, Default)]
pub struct StationLookup<'a> {
    by_person_event: HashMap<(i32, &'a str), &'a ScoreCardEntry>,
}

impl<'a> StationLookup<'a> {
    pub fn new(score_cards: &'a [ScoreCardEntry]) -> Self {
        let mut by_person_event = HashMap::with_capacity(score_cards.len());
        for entry in score_cards {
            by_person_event
                .entry((entry.person_id, entry.event_name.as_str()))
                .and_modify(|kept: &mut &'a ScoreCardEntry| {
                    if entry.index < kept.index {
                        *kept = entry;
                    }
                })
                .or_insert(entry);
        }
        Self { by_person_event }
    }

    pub fn get(&self, person_id: i32, event_name: &str) -> Option<&'a ScoreCardEntry> {
        self.by_person_event.get(&(person_id, event_name)).copied()
    }

    /// Same result as [`resolve`] without rescanning the score cards
    pub fn resolve(&self, comp_card: &CompCardEntry) -> Vec<Option<&'a ScoreCardEntry>> {
        comp_card
            .event_list
            .iter()
            .map(|event| self.get(comp_card.person_id, event))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_person_event.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_person_event.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(index: usize, person_id: i32, event_name: &str, station_no: u32) -> ScoreCardEntry {
        ScoreCardEntry {
            index,
            person_id,
            event_name: event_name.into(),
            group_no: "1".into(),
            station_no,
        }
    }

    fn comp(person_id: i32, events: &[&str]) -> CompCardEntry {
        CompCardEntry {
            index: 0,
            person_id,
            event_list: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn stations(resolved: &[Option<&ScoreCardEntry>]) -> Vec<Option<u32>> {
        resolved.iter().map(|e| e.map(|e| e.station_no)).collect()
    }

    #[test]
    fn test_resolve_matches_person_and_event() {
        let cards = vec![
            score(0, 1, "Shot Put", 1),
            score(1, 2, "Shot Put", 2),
            score(4, 2, "Long Jump", 1),
        ];
        let resolved = resolve(&comp(2, &["Long Jump", "Shot Put", "Discus"]), &cards);
        assert_eq!(stations(&resolved), vec![Some(1), Some(2), None]);
    }

    #[test]
    fn test_event_match_is_case_sensitive() {
        let cards = vec![score(0, 1, "Shot Put", 1)];
        let resolved = resolve(&comp(1, &["shot put"]), &cards);
        assert_eq!(stations(&resolved), vec![None]);
    }

    #[test]
    fn test_duplicates_resolve_to_lowest_index() {
        let cards = vec![score(0, 7, "Relay", 3), score(8, 7, "Relay", 1)];
        let card = comp(7, &["Relay"]);

        let linear = resolve(&card, &cards);
        assert_eq!(linear[0].map(|e| e.index), Some(0));

        let lookup = StationLookup::new(&cards);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.resolve(&card)[0].map(|e| e.index), Some(0));
    }

    #[test]
    fn test_lookup_agrees_with_linear_scan() {
        let cards = vec![
            score(0, 1, "A", 1),
            score(1, 2, "A", 2),
            score(4, 1, "B", 1),
            score(5, 1, "A", 9),
        ];
        let lookup = StationLookup::new(&cards);
        for card in [comp(1, &["A", "B", "C"]), comp(2, &["B", "A"]), comp(3, &["A"])] {
            assert_eq!(stations(&lookup.resolve(&card)), stations(&resolve(&card, &cards)));
        }
    }

    #[test]
    fn test_empty_lookup() {
        let lookup = StationLookup::new(&[]);
        assert!(lookup.is_empty());
        assert!(lookup.get(1, "A").is_none());
    }
}
