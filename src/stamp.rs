//! Draw stamps onto copies of existing PDF pages
//!
//! Each stamped page keeps its original content untouched: the original
//! content streams are wrapped in `q`/`Q` and one Flate-compressed overlay
//! stream is appended after them. The overlay uses the standard Helvetica
//! font, registered once per document under a private resource name.

use crate::layout::PageBox;
use crate::overlay::Stamp;
use crate::CardError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::Write;
use std::path::Path;

/// Resource name of the stamp font on every stamped page
pub const STAMP_FONT_KEY: &str = "FDsfStamp";

/// Totals for one stamped document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampSummary {
    pub pages: usize,
    pub stamped_pages: usize,
    pub stamps: usize,
}

/// Load `input`, ask `stamps_for_page` for the stamps of every page
/// (0-based page index, page size) and write the result to `output`.
pub fn stamp_pdf<P, Q, F>(
    input: P,
    output: Q,
    stamps_for_page: F,
) -> Result<StampSummary, CardError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(usize, PageBox) -> Vec<Stamp>,
{
    let mut doc = Document::load(input)?;
    let summary = stamp_document(&mut doc, stamps_for_page)?;
    doc.save(output)?;
    Ok(summary)
}

/// Stamp an already loaded document in place
pub fn stamp_document<F>(
    doc: &mut Document,
    mut stamps_for_page: F,
) -> Result<StampSummary, CardError>
where
    F: FnMut(usize, PageBox) -> Vec<Stamp>,
{
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let mut summary = StampSummary {
        pages: page_ids.len(),
        ..StampSummary::default()
    };
    let mut font_id: Option<ObjectId> = None;

    for (page_index, page_id) in page_ids.into_iter().enumerate() {
        let page = page_box(doc, page_id).ok_or(CardError::MissingMediaBox {
            page: page_index + 1,
        })?;
        let stamps = stamps_for_page(page_index, page);
        if stamps.is_empty() {
            continue;
        }

        let font = *font_id.get_or_insert_with(|| doc.add_object(helvetica_font()));
        register_font(doc, page_id, font)?;
        append_overlay(doc, page_id, &stamps)?;

        log::debug!("page {}: {} stamps", page_index + 1, stamps.len());
        summary.stamped_pages += 1;
        summary.stamps += stamps.len();
    }

    Ok(summary)
}

fn helvetica_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Follow one level of indirection
fn deref<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up the page tree for inherited values
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_object(page_id).and_then(Object::as_dict).ok()?;
    // Depth limit guards against cyclic Parent links
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return deref(doc, value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_object(parent).and_then(Object::as_dict).ok()?;
    }
    None
}

/// Page width and height from the (possibly inherited) MediaBox
pub fn page_box(doc: &Document, page_id: ObjectId) -> Option<PageBox> {
    let media_box = inherited(doc, page_id, b"MediaBox")?.as_array().ok()?;
    let coords: Vec<f32> = media_box
        .iter()
        .filter_map(|o| deref(doc, o).and_then(get_number))
        .collect();
    match coords.as_slice() {
        [x0, y0, x1, y1] => Some(PageBox::new((x1 - x0).abs(), (y1 - y0).abs())),
        _ => None,
    }
}

/// Make the stamp font available on the page.
///
/// The page gets its own copy of its (possibly inherited or shared)
/// resource dictionary so other pages are not affected.
fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), CardError> {
    let mut resources = inherited(doc, page_id, b"Resources")
        .and_then(|o| o.as_dict().ok())
        .cloned()
        .unwrap_or_default();

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|o| deref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .cloned()
        .unwrap_or_default();
    fonts.set(STAMP_FONT_KEY, font_id);
    resources.set("Font", fonts);

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    page.set("Resources", resources);
    Ok(())
}

/// Content operations drawing `stamps`, preceded by the `Q` that closes the
/// `q` wrapped around the original content.
pub fn overlay_operations(stamps: &[Stamp]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(stamps.len() * 3 + 3);
    ops.push(Operation::new("Q", vec![]));
    ops.push(Operation::new("BT", vec![]));
    for stamp in stamps {
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(STAMP_FONT_KEY.as_bytes().to_vec()), stamp.font_size.into()],
        ));
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                stamp.origin_x().into(),
                stamp.y.into(),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(stamp.text.clone().into_bytes(), StringFormat::Literal)],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn compressed_stream(data: &[u8]) -> Result<Stream, CardError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed))
}

fn append_overlay(
    doc: &mut Document,
    page_id: ObjectId,
    stamps: &[Stamp],
) -> Result<(), CardError> {
    let content = Content {
        operations: overlay_operations(stamps),
    };
    let encoded = content.encode()?;

    let original = doc.get_page_contents(page_id);
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = doc.add_object(compressed_stream(&encoded)?);

    let mut contents: Vec<Object> = Vec::with_capacity(original.len() + 2);
    contents.push(save_id.into());
    contents.extend(original.into_iter().map(Object::Reference));
    contents.push(overlay_id.into());

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    page.set("Contents", contents);
    Ok(())
}
