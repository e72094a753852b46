//! Helvetica advance widths (standard 14 font, WinAnsi subset)
//!
//! Used to right-align stamps and to size the comp card label column.
//! Widths are in 1/1000 text space units, as in the Adobe font metrics.

use crate::layout::COMP_CARD_LABEL_FONT_SIZE;
use crate::score_card::ScoreCardEntry;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Width used for characters missing from the table
const DEFAULT_WIDTH: u16 = 556;

/// Printable ASCII `' '..='~'`, in code point order
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica widths keyed by character
pub static HELVETICA_WIDTHS: LazyLock<HashMap<char, u16>> = LazyLock::new(|| {
    let mut m: HashMap<char, u16> = (' '..='~').zip(ASCII_WIDTHS).collect();

    // Latin-1 letters seen in Nordic and German event names
    m.insert('Æ', 1000);
    m.insert('Ø', 778);
    m.insert('Å', 667);
    m.insert('æ', 889);
    m.insert('ø', 611);
    m.insert('å', 556);
    m.insert('Ä', 667);
    m.insert('Ö', 778);
    m.insert('Ü', 722);
    m.insert('ä', 556);
    m.insert('ö', 556);
    m.insert('ü', 556);
    m.insert('É', 667);
    m.insert('é', 556);
    m.insert('è', 556);
    m.insert('ß', 611);

    // Punctuation
    m.insert('°', 400);
    m.insert('×', 584);
    m.insert('\u{2013}', 556); // en dash
    m.insert('\u{2019}', 222); // right single quote

    m
});

/// Advance width of one character in 1/1000 units
pub fn char_width(c: char) -> u16 {
    HELVETICA_WIDTHS.get(&c).copied().unwrap_or(DEFAULT_WIDTH)
}

/// Rendered width of `text` at `font_size` points
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * font_size
}

/// Widest of `labels` at `font_size`, 0 when there are none
pub fn widest_label<'a, I>(labels: I, font_size: f32) -> f32
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .map(|label| text_width(label, font_size))
        .fold(0.0, f32::max)
}

/// Left margin that keeps comp card stamps clear of the printed event
/// labels: the widest distinct score card event name at label size.
pub fn auto_left_margin(score_cards: &[ScoreCardEntry]) -> f32 {
    let names: HashSet<&str> = score_cards.iter().map(|e| e.event_name.as_str()).collect();
    widest_label(names, COMP_CARD_LABEL_FONT_SIZE)
}
