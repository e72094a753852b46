//! Plain text extraction from PDF using lopdf
//!
//! The card parsers only need the page text in content stream order, one
//! block per page. Layout whitespace is whatever lopdf produces; the parsers
//! trim and re-split every line themselves.

use crate::CardError;
use lopdf::Document;
use std::path::Path;

/// Extract the text of every page of a PDF file, in page order
pub fn extract_page_texts<P: AsRef<Path>>(path: P) -> Result<Vec<String>, CardError> {
    let doc = Document::load(path)?;
    extract_page_texts_from_doc(&doc)
}

/// Extract the text of every page from a memory buffer
pub fn extract_page_texts_mem(buffer: &[u8]) -> Result<Vec<String>, CardError> {
    let doc = Document::load_mem(buffer)?;
    extract_page_texts_from_doc(&doc)
}

/// Extract one page (1-based page number) from a loaded document
pub fn extract_page_text(doc: &Document, page_number: u32) -> Result<String, CardError> {
    doc.extract_text(&[page_number])
        .map_err(|e| CardError::Pdf(format!("page {}: {}", page_number, e)))
}

fn extract_page_texts_from_doc(doc: &Document) -> Result<Vec<String>, CardError> {
    doc.get_pages()
        .keys()
        .map(|&page_number| extract_page_text(doc, page_number))
        .collect()
}

/// Join page texts into one document text, each page ending with a newline
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

/// Extract the whole text of a PDF file as one string
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String, CardError> {
    Ok(join_pages(&extract_page_texts(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_terminates_each_page() {
        let pages = vec!["ID 1\nA".to_string(), "ID 2".to_string()];
        assert_eq!(join_pages(&pages), "ID 1\nA\nID 2\n");
    }

    #[test]
    fn test_join_no_pages() {
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn test_invalid_buffer_is_an_error() {
        assert!(extract_page_texts_mem(b"not a pdf").is_err());
    }
}
