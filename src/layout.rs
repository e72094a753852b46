//! Overlay geometry for both card documents
//!
//! All coordinates are PDF user space points with the origin at the bottom
//! left of the page. Nothing in here touches a PDF; the functions are pure so
//! the grid can be checked against known page sizes.

/// Score cards per page (2 x 2 grid)
pub const SCORE_CARDS_PER_PAGE: usize = 4;
/// Distance from the right edge of a score card to the stamp anchor
pub const SCORE_CARD_RIGHT_INSET: f32 = 25.0;
/// Distance from the top edge of a score card to the stamp anchor
pub const SCORE_CARD_TOP_INSET: f32 = 30.0;
/// Font size of the station stamp on score cards
pub const SCORE_CARD_FONT_SIZE: f32 = 11.0;

/// Default comp card grid
pub const DEFAULT_COMP_CARD_ROWS: usize = 4;
pub const DEFAULT_COMP_CARD_COLUMNS: usize = 3;
/// Left offset of the stamp column before the event label margin
pub const COMP_CARD_BASE_X: f32 = 17.5;
/// Subtracted from the page width / columns to get the column step
pub const COMP_CARD_COLUMN_GUTTER: f32 = 3.5;
/// Subtracted from the page height / rows to get the row step
pub const COMP_CARD_ROW_GUTTER: f32 = 38.5;
/// Vertical distance between two event lines on one comp card
pub const COMP_CARD_EVENT_LINE_STEP: f32 = 12.4;
/// Font size of the station stamp on comp cards
pub const COMP_CARD_FONT_SIZE: f32 = 5.0;
/// Font size the comp cards print their event labels at
pub const COMP_CARD_LABEL_FONT_SIZE: f32 = 7.75;
/// Default distance from the top of the page to the first event line
pub const DEFAULT_COMP_CARD_TOP_MARGIN: f32 = 55.0;

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Horizontal text alignment relative to the anchor x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Where and how to draw one piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
    pub alignment: Alignment,
}

/// Score card stamp placement: one stamp in the top right corner of each
/// card on a 2 x 2 page.
#[derive(Debug, Clone)]
pub struct ScoreCardGeometry {
    pub right_inset: f32,
    pub top_inset: f32,
    pub font_size: f32,
}

impl Default for ScoreCardGeometry {
    fn default() -> Self {
        Self {
            right_inset: SCORE_CARD_RIGHT_INSET,
            top_inset: SCORE_CARD_TOP_INSET,
            font_size: SCORE_CARD_FONT_SIZE,
        }
    }
}

impl ScoreCardGeometry {
    pub fn slots_per_page(&self) -> usize {
        SCORE_CARDS_PER_PAGE
    }

    /// Anchor for `slot` (0..4) on a page; even slots are the left column,
    /// slots 2 and 3 the bottom row.
    pub fn anchor(&self, page: PageBox, slot: usize) -> Anchor {
        let mut x = page.width - self.right_inset;
        if slot % 2 == 0 {
            x -= page.width / 2.0;
        }
        let mut y = page.height - self.top_inset;
        if slot / 2 >= 1 {
            y -= page.height / 2.0;
        }
        Anchor {
            x,
            y,
            alignment: Alignment::Right,
        }
    }
}

/// Comp card grid: `rows x columns` cards per page, filled row by row.
#[derive(Debug, Clone)]
pub struct CompCardGrid {
    pub rows: usize,
    pub columns: usize,
    /// Width reserved for the printed event labels
    pub left_margin: f32,
    pub top_margin: f32,
    pub font_size: f32,
}

impl Default for CompCardGrid {
    fn default() -> Self {
        Self {
            rows: DEFAULT_COMP_CARD_ROWS,
            columns: DEFAULT_COMP_CARD_COLUMNS,
            left_margin: 0.0,
            top_margin: DEFAULT_COMP_CARD_TOP_MARGIN,
            font_size: COMP_CARD_FONT_SIZE,
        }
    }
}

impl CompCardGrid {
    // A zero-sized grid is treated as a single cell.
    fn rows(&self) -> usize {
        self.rows.max(1)
    }

    fn columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn slots_per_page(&self) -> usize {
        self.rows() * self.columns()
    }

    pub fn column_step(&self, page: PageBox) -> f32 {
        page.width / self.columns() as f32 - COMP_CARD_COLUMN_GUTTER
    }

    pub fn row_step(&self, page: PageBox) -> f32 {
        page.height / self.rows() as f32 - COMP_CARD_ROW_GUTTER
    }

    /// Anchor of the first event line of the card in `slot`
    pub fn anchor(&self, page: PageBox, slot: usize) -> Anchor {
        let column = slot % self.columns();
        let row = slot / self.columns();
        let base_x = COMP_CARD_BASE_X + self.left_margin;
        let base_y = page.height - self.top_margin;
        Anchor {
            x: base_x + self.column_step(page) * column as f32,
            y: base_y - self.row_step(page) * row as f32,
            alignment: Alignment::Left,
        }
    }

    /// Anchor of the `position`-th event line of the card in `slot`
    pub fn event_anchor(&self, page: PageBox, slot: usize, position: usize) -> Anchor {
        let card = self.anchor(page, slot);
        Anchor {
            y: card.y - COMP_CARD_EVENT_LINE_STEP * position as f32,
            ..card
        }
    }
}
