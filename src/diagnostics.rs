//! Diagnostic dumps of extracted text and parsed records
//!
//! Written only when diagnostics are requested; the primary PDF outputs do
//! not depend on them.

use crate::comp_card::CompCardEntry;
use crate::score_card::ScoreCardEntry;
use crate::CardError;
use std::fs;
use std::path::PathBuf;

pub const SCORE_CARDS_RAW: &str = "scorecards_raw.txt";
pub const COMP_CARDS_RAW: &str = "compcards_raw.txt";
pub const SCORE_CARDS_DATA: &str = "scorecards_data.txt";
pub const COMP_CARDS_DATA: &str = "compcards_data.txt";

/// Score card records as tab-separated text with a header row
pub fn score_cards_tsv(entries: &[ScoreCardEntry]) -> String {
    let mut out = String::from("index\tpersonId\teventName\tgroup\tstationNo\n");
    for e in entries {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            e.index, e.person_id, e.event_name, e.group_no, e.station_no
        ));
    }
    out
}

/// Comp card records as tab-separated text; events are joined with `|`
pub fn comp_cards_tsv(entries: &[CompCardEntry]) -> String {
    let mut out = String::from("index\tpersonId\tevents\n");
    for e in entries {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            e.index,
            e.person_id,
            e.event_list.join("|")
        ));
    }
    out
}

/// Writes diagnostic files into one directory
#[derive(Debug, Clone)]
pub struct DiagnosticWriter {
    dir: PathBuf,
}

impl DiagnosticWriter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf, CardError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }

    pub fn score_cards_raw(&self, text: &str) -> Result<PathBuf, CardError> {
        self.write(SCORE_CARDS_RAW, text)
    }

    pub fn comp_cards_raw(&self, text: &str) -> Result<PathBuf, CardError> {
        self.write(COMP_CARDS_RAW, text)
    }

    pub fn score_cards_data(&self, entries: &[ScoreCardEntry]) -> Result<PathBuf, CardError> {
        self.write(SCORE_CARDS_DATA, &score_cards_tsv(entries))
    }

    pub fn comp_cards_data(&self, entries: &[CompCardEntry]) -> Result<PathBuf, CardError> {
        self.write(COMP_CARDS_DATA, &comp_cards_tsv(entries))
    }
}
