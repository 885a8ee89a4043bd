// Document assembly: render the paginated deck into a front PDF and a
// back PDF, then (with the `merge` feature) interleave them into one
// duplex-ready document.

use printpdf::{Mm, PdfDocument, PdfDocumentReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::Config;
use crate::deck::Page;
use crate::error::AppError;
use crate::layout::LayoutGrid;
use crate::render::{self, Fonts, Side};

/// Called after each page finishes rendering: (side, page number, total).
pub type ProgressFn<'a> = &'a mut dyn FnMut(Side, usize, usize);

/// Render both sides of the deck and save them as separate PDFs.
///
/// The two documents are built from the same page sequence, and the count
/// check still runs before anything is written: a mismatch means the
/// partitioner broke, not bad input.
pub fn generate(
    pages: &[Page],
    grid: &LayoutGrid,
    config: &Config,
    front_path: &Path,
    back_path: &Path,
    mut progress: Option<ProgressFn>,
) -> Result<(), AppError> {
    let (front_doc, front_count) = render_deck(pages, grid, config, Side::Front, &mut progress)?;
    let (back_doc, back_count) = render_deck(pages, grid, config, Side::Back, &mut progress)?;

    if front_count != back_count {
        return Err(AppError::AlignmentError(format!(
            "rendered {} front pages but {} back pages",
            front_count, back_count
        )));
    }

    write_document(front_doc, front_path)?;
    write_document(back_doc, back_path)?;
    Ok(())
}

fn render_deck(
    pages: &[Page],
    grid: &LayoutGrid,
    config: &Config,
    side: Side,
    progress: &mut Option<ProgressFn>,
) -> Result<(PdfDocumentReference, usize), AppError> {
    let title = match side {
        Side::Front => "Flashcards (front)",
        Side::Back => "Flashcards (back)",
    };
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(grid.page_width),
        Mm(grid.page_height),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc)?;

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) =
                doc.add_page(Mm(grid.page_width), Mm(grid.page_height), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        render::draw_page(
            &layer,
            &fonts,
            page,
            grid,
            side,
            &config.fonts,
            config.outline_blank_slots,
        );
        if let Some(cb) = progress.as_mut() {
            cb(side, i + 1, total);
        }
    }

    Ok((doc, total.max(1)))
}

fn write_document(doc: PdfDocumentReference, path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))
}

/// Whether the interleaved-merge capability was compiled in. Its absence
/// is a normal branch: the front and back PDFs become the deliverable.
pub const fn merge_supported() -> bool {
    cfg!(feature = "merge")
}

/// The page order of the combined document: front[0], back[0], front[1],
/// back[1], ... Unequal inputs are a fatal alignment failure.
pub fn interleave_order(
    front_pages: usize,
    back_pages: usize,
) -> Result<Vec<(Side, usize)>, AppError> {
    if front_pages != back_pages {
        return Err(AppError::AlignmentError(format!(
            "front document has {} pages, back document has {}",
            front_pages, back_pages
        )));
    }
    let mut order = Vec::with_capacity(front_pages * 2);
    for i in 0..front_pages {
        order.push((Side::Front, i));
        order.push((Side::Back, i));
    }
    Ok(order)
}

/// Merge the saved front and back PDFs into one interleaved document.
#[cfg(feature = "merge")]
pub fn merge_interleaved(
    front_path: &Path,
    back_path: &Path,
    output_path: &Path,
) -> Result<(), AppError> {
    use lopdf::{Dictionary, Document, Object, ObjectId};

    let mut front = Document::load(front_path).map_err(|e| AppError::PdfError(e.to_string()))?;
    let mut back = Document::load(back_path).map_err(|e| AppError::PdfError(e.to_string()))?;

    // Renumber so the two object sets cannot collide.
    let mut next_id = 1;
    for doc in [&mut front, &mut back] {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;
    }

    let front_pages: Vec<ObjectId> = front.get_pages().into_values().collect();
    let back_pages: Vec<ObjectId> = back.get_pages().into_values().collect();
    let order = interleave_order(front_pages.len(), back_pages.len())?;
    let ordered_pages: Vec<ObjectId> = order
        .into_iter()
        .map(|(side, i)| match side {
            Side::Front => front_pages[i],
            Side::Back => back_pages[i],
        })
        .collect();

    let mut merged = Document::with_version("1.5");
    let source_objects = std::mem::take(&mut front.objects)
        .into_iter()
        .chain(std::mem::take(&mut back.objects));
    for (id, object) in source_objects {
        // Each source document's own catalog and page tree are replaced
        // by the merged ones below.
        match object.type_name().unwrap_or("") {
            "Catalog" | "Pages" => {}
            _ => {
                merged.objects.insert(id, object);
            }
        }
    }
    merged.max_id = next_id - 1;

    let pages_id = merged.new_object_id();
    for page_id in &ordered_pages {
        let page = merged
            .objects
            .get_mut(page_id)
            .ok_or_else(|| AppError::PdfError("page object missing during merge".to_string()))?;
        page.as_dict_mut()
            .map_err(|e| AppError::PdfError(e.to_string()))?
            .set("Parent", pages_id);
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(ordered_pages.len() as i64));
    pages_dict.set(
        "Kids",
        Object::Array(ordered_pages.iter().map(|id| Object::Reference(*id)).collect()),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", catalog_id);

    merged.renumber_objects();
    merged.compress();
    merged
        .save(output_path)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_alternates_front_and_back() {
        let order = interleave_order(3, 3).unwrap();
        assert_eq!(
            order,
            vec![
                (Side::Front, 0),
                (Side::Back, 0),
                (Side::Front, 1),
                (Side::Back, 1),
                (Side::Front, 2),
                (Side::Back, 2),
            ]
        );
    }

    #[test]
    fn mismatched_page_counts_are_rejected() {
        let err = interleave_order(4, 5).unwrap_err();
        assert!(matches!(err, AppError::AlignmentError(_)));
        assert!(err.to_string().contains("4"));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn empty_documents_interleave_to_nothing() {
        assert!(interleave_order(0, 0).unwrap().is_empty());
    }
}
