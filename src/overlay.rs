//! Per-page stamp lists for both documents
//!
//! Page `p` of a document covers slots `p * slots_per_page ..`; each slot
//! holding a parsed card gets its station number stamped.

use crate::comp_card::CompCardEntry;
use crate::layout::{Alignment, CompCardGrid, PageBox, ScoreCardGeometry};
use crate::metrics;
use crate::resolver::StationLookup;
use crate::score_card::ScoreCardEntry;
use std::collections::HashMap;

/// One string to draw on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub x: f32,
    pub y: f32,
    pub alignment: Alignment,
    pub text: String,
    pub font_size: f32,
}

impl Stamp {
    /// Left edge of the text once alignment is applied
    pub fn origin_x(&self) -> f32 {
        match self.alignment {
            Alignment::Left => self.x,
            Alignment::Right => self.x - metrics::text_width(&self.text, self.font_size),
        }
    }
}

/// Text printed for a station number
pub fn station_label(station_no: u32) -> String {
    format!("S{}", station_no)
}

fn index_by_slot<T>(entries: &[T], slot_of: impl Fn(&T) -> usize) -> HashMap<usize, &T> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        map.entry(slot_of(entry)).or_insert(entry);
    }
    map
}

/// Station stamps for the score card document
#[derive(Debug)]
pub struct ScoreCardOverlay<'a> {
    geometry: ScoreCardGeometry,
    by_slot: HashMap<usize, &'a ScoreCardEntry>,
}

impl<'a> ScoreCardOverlay<'a> {
    pub fn new(geometry: ScoreCardGeometry, entries: &'a [ScoreCardEntry]) -> Self {
        Self {
            geometry,
            by_slot: index_by_slot(entries, |e| e.index),
        }
    }

    pub fn stamps_for_page(&self, page_index: usize, page: PageBox) -> Vec<Stamp> {
        let per_page = self.geometry.slots_per_page();
        (0..per_page)
            .filter_map(|slot| {
                let entry = self.by_slot.get(&(page_index * per_page + slot))?;
                let anchor = self.geometry.anchor(page, slot);
                Some(Stamp {
                    x: anchor.x,
                    y: anchor.y,
                    alignment: anchor.alignment,
                    text: station_label(entry.station_no),
                    font_size: self.geometry.font_size,
                })
            })
            .collect()
    }
}

/// Comp card stamps: one per resolved event line
#[derive(Debug)]
pub struct CompCardOverlay<'a> {
    grid: CompCardGrid,
    by_slot: HashMap<usize, &'a CompCardEntry>,
    lookup: StationLookup<'a>,
}

/// Stamps for one comp card page plus the events that had no score card
#[derive(Debug, Default)]
pub struct CompCardPage {
    pub stamps: Vec<Stamp>,
    pub unresolved: usize,
}

impl<'a> CompCardOverlay<'a> {
    pub fn new(
        grid: CompCardGrid,
        comp_cards: &'a [CompCardEntry],
        score_cards: &'a [ScoreCardEntry],
    ) -> Self {
        Self {
            grid,
            by_slot: index_by_slot(comp_cards, |e| e.index),
            lookup: StationLookup::new(score_cards),
        }
    }

    pub fn grid(&self) -> &CompCardGrid {
        &self.grid
    }

    pub fn page(&self, page_index: usize, page: PageBox) -> CompCardPage {
        let per_page = self.grid.slots_per_page();
        let mut result = CompCardPage::default();

        for slot in 0..per_page {
            let Some(card) = self.by_slot.get(&(page_index * per_page + slot)) else {
                continue;
            };
            for (position, event) in card.event_list.iter().enumerate() {
                let Some(score_card) = self.lookup.get(card.person_id, event) else {
                    log::debug!(
                        "no score card for person {} in {:?}",
                        card.person_id,
                        event
                    );
                    result.unresolved += 1;
                    continue;
                };
                let anchor = self.grid.event_anchor(page, slot, position);
                result.stamps.push(Stamp {
                    x: anchor.x,
                    y: anchor.y,
                    alignment: anchor.alignment,
                    text: station_label(score_card.station_no),
                    font_size: self.grid.font_size,
                });
            }
        }

        result
    }

    pub fn stamps_for_page(&self, page_index: usize, page: PageBox) -> Vec<Stamp> {
        self.page(page_index, page).stamps
    }
}
