//! Station numbers for score cards and comp cards
//!
//! This crate provides:
//! - Parsers that recover score card and comp card records from extracted PDF text
//! - Cross-referencing of comp card events to score card stations
//! - Overlay geometry and stamping of the station numbers onto the original PDFs

pub mod comp_card;
pub mod cursor;
pub mod diagnostics;
pub mod extractor;
pub mod layout;
pub mod metrics;
pub mod overlay;
pub mod resolver;
pub mod score_card;
pub mod stamp;

pub use comp_card::{parse_comp_cards, parse_comp_cards_report, CompCardEntry};
pub use cursor::{ParseReport, ScanError};
pub use extractor::{extract_page_texts, extract_text};
pub use layout::{Alignment, Anchor, CompCardGrid, PageBox, ScoreCardGeometry};
pub use overlay::{CompCardOverlay, ScoreCardOverlay, Stamp};
pub use resolver::{resolve, StationLookup};
pub use score_card::{parse_score_cards, parse_score_cards_report, ScoreCardEntry};
pub use stamp::{stamp_pdf, StampSummary};

use diagnostics::DiagnosticWriter;
use layout::{DEFAULT_COMP_CARD_COLUMNS, DEFAULT_COMP_CARD_ROWS, DEFAULT_COMP_CARD_TOP_MARGIN};
use std::path::{Path, PathBuf};

/// Suffix added to the input file stem for default output paths
pub const OUTPUT_SUFFIX: &str = "_out";

/// Inputs and settings for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub score_card_input: PathBuf,
    pub comp_card_input: PathBuf,
    /// Defaults to `<stem>_out.<ext>` next to the input
    pub score_card_output: Option<PathBuf>,
    pub comp_card_output: Option<PathBuf>,
    pub comp_card_rows: usize,
    pub comp_card_columns: usize,
    /// Computed from the score card event names when not given
    pub comp_card_left_margin: Option<f32>,
    pub comp_card_top_margin: Option<f32>,
    /// Directory for diagnostic dumps; `None` disables them
    pub diagnostics_dir: Option<PathBuf>,
}

impl RunOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        score_card_input: P,
        comp_card_input: Q,
    ) -> Self {
        Self {
            score_card_input: score_card_input.into(),
            comp_card_input: comp_card_input.into(),
            score_card_output: None,
            comp_card_output: None,
            comp_card_rows: DEFAULT_COMP_CARD_ROWS,
            comp_card_columns: DEFAULT_COMP_CARD_COLUMNS,
            comp_card_left_margin: None,
            comp_card_top_margin: None,
            diagnostics_dir: None,
        }
    }

    pub fn score_card_output(&self) -> PathBuf {
        self.score_card_output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.score_card_input))
    }

    pub fn comp_card_output(&self) -> PathBuf {
        self.comp_card_output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.comp_card_input))
    }

    /// Check everything that must hold before any output is written
    pub fn validate(&self) -> Result<(), CardError> {
        for input in [&self.score_card_input, &self.comp_card_input] {
            if !input.is_file() {
                return Err(CardError::InputNotFound(input.clone()));
            }
        }
        if self.comp_card_rows == 0 || self.comp_card_columns == 0 {
            return Err(CardError::InvalidGrid {
                rows: self.comp_card_rows,
                columns: self.comp_card_columns,
            });
        }
        Ok(())
    }
}

/// `cards.pdf` -> `cards_out.pdf`, in the same directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdf".to_string());
    input.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
}

/// What one run produced
#[derive(Debug)]
pub struct RunSummary {
    pub score_cards: usize,
    pub comp_cards: usize,
    pub score_card_anomaly: Option<ScanError>,
    pub comp_card_anomaly: Option<ScanError>,
    pub comp_card_left_margin: f32,
    pub unresolved_events: usize,
    pub score_card_output: PathBuf,
    pub comp_card_output: PathBuf,
    pub score_card_stamps: StampSummary,
    pub comp_card_stamps: StampSummary,
}

/// Extract, parse, cross-reference and stamp both documents
pub fn process_cards(options: &RunOptions) -> Result<RunSummary, CardError> {
    options.validate()?;
    let diagnostics = options.diagnostics_dir.as_ref().map(DiagnosticWriter::new);

    let score_text = extract_text(&options.score_card_input)?;
    let comp_text = extract_text(&options.comp_card_input)?;
    if let Some(writer) = &diagnostics {
        keep_going(writer.score_cards_raw(&score_text));
        keep_going(writer.comp_cards_raw(&comp_text));
    }

    let score_report = parse_score_cards_report(&score_text);
    let comp_report = parse_comp_cards_report(&comp_text);
    log::info!(
        "parsed {} score cards and {} comp cards",
        score_report.entries.len(),
        comp_report.entries.len()
    );
    if let Some(writer) = &diagnostics {
        keep_going(writer.score_cards_data(&score_report.entries));
        keep_going(writer.comp_cards_data(&comp_report.entries));
    }

    let left_margin = options
        .comp_card_left_margin
        .unwrap_or_else(|| metrics::auto_left_margin(&score_report.entries));
    let grid = CompCardGrid {
        rows: options.comp_card_rows,
        columns: options.comp_card_columns,
        left_margin,
        top_margin: options
            .comp_card_top_margin
            .unwrap_or(DEFAULT_COMP_CARD_TOP_MARGIN),
        ..CompCardGrid::default()
    };
    log::debug!("comp card grid: {:?}", grid);

    let score_card_output = options.score_card_output();
    let score_overlay = ScoreCardOverlay::new(ScoreCardGeometry::default(), &score_report.entries);
    let score_card_stamps = stamp_pdf(
        &options.score_card_input,
        &score_card_output,
        |page_index, page| score_overlay.stamps_for_page(page_index, page),
    )?;
    log::info!(
        "stamped {} score card stations into {}",
        score_card_stamps.stamps,
        score_card_output.display()
    );

    let comp_card_output = options.comp_card_output();
    let comp_overlay = CompCardOverlay::new(grid, &comp_report.entries, &score_report.entries);
    let mut unresolved_events = 0;
    let comp_card_stamps = stamp_pdf(
        &options.comp_card_input,
        &comp_card_output,
        |page_index, page| {
            let stamped = comp_overlay.page(page_index, page);
            unresolved_events += stamped.unresolved;
            stamped.stamps
        },
    )?;
    log::info!(
        "stamped {} comp card stations into {} ({} events without a score card)",
        comp_card_stamps.stamps,
        comp_card_output.display(),
        unresolved_events
    );

    Ok(RunSummary {
        score_cards: score_report.entries.len(),
        comp_cards: comp_report.entries.len(),
        score_card_anomaly: score_report.anomaly,
        comp_card_anomaly: comp_report.anomaly,
        comp_card_left_margin: left_margin,
        unresolved_events,
        score_card_output,
        comp_card_output,
        score_card_stamps,
        comp_card_stamps,
    })
}

/// Diagnostic dumps never stop the stamping
fn keep_going(written: Result<PathBuf, CardError>) {
    if let Err(e) = written {
        log::warn!("could not write diagnostic file: {}", e);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Page {page} has no usable MediaBox")]
    MissingMediaBox { page: usize },
    #[error("Comp card grid must have at least one row and column (got {rows} x {columns})")]
    InvalidGrid { rows: usize, columns: usize },
}

impl From<lopdf::Error> for CardError {
    fn from(e: lopdf::Error) -> Self {
        CardError::Pdf(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/cards/score.pdf")),
            PathBuf::from("/tmp/cards/score_out.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("comp")),
            PathBuf::from("comp_out.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("a.b.PDF")),
            PathBuf::from("a.b_out.PDF")
        );
    }

    #[test]
    fn test_output_override() {
        let mut options = RunOptions::new("s.pdf", "c.pdf");
        options.comp_card_output = Some(PathBuf::from("x.pdf"));
        assert_eq!(options.comp_card_output(), PathBuf::from("x.pdf"));
        assert_eq!(options.score_card_output(), PathBuf::from("s_out.pdf"));
    }

    #[test]
    fn test_validate_missing_input() {
        let options = RunOptions::new(
            "/definitely/missing/s.pdf",
            "/definitely/missing/c.pdf",
        );
        assert!(matches!(options.validate(), Err(CardError::InputNotFound(_))));
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();
        let mut options = RunOptions::new(&input, &input);
        options.comp_card_columns = 0;
        assert!(matches!(
            options.validate(),
            Err(CardError::InvalidGrid { rows: 4, columns: 0 })
        ));
    }
}
