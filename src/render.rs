// Page rendering: place each record's text into its slot on a printpdf
// layer. Every slot draws independently; no stroke or font state leaks
// from one slot to the next.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerReference,
    Point, Rgb,
};
use std::fmt;

use crate::config::FontSpec;
use crate::deck::{Card, Page};
use crate::error::AppError;
use crate::layout::{LayoutGrid, Rect};
use crate::textfit::{self, FittedText};

/// Inner padding between the card border and its text block, in mm
const TEXT_PAD_MM: f32 = 2.0;

/// Inset of the tag from the card's bottom-right corner, in mm
const TAG_INSET_MM: f32 = 3.0;

/// Which face of the deck a page shows. Back pages mirror slot columns so
/// fronts and backs line up after a duplex flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Front => write!(f, "front"),
            Side::Back => write!(f, "back"),
        }
    }
}

/// Builtin fonts used on every card: bold body, oblique tag.
pub struct Fonts {
    pub body: IndirectFontRef,
    pub tag: IndirectFontRef,
}

impl Fonts {
    pub fn load(doc: &PdfDocumentReference) -> Result<Self, AppError> {
        let body = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        let tag = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        Ok(Fonts { body, tag })
    }
}

/// Draw one page of the deck in the given mode.
///
/// Front mode shows side A at slot (row, col); back mode shows side B at
/// (row, mirrored col). Only the slot position is mirrored, never the
/// content.
pub fn draw_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    page: &Page,
    grid: &LayoutGrid,
    side: Side,
    spec: &FontSpec,
    outline_blank_slots: bool,
) {
    for (index, slot) in page.slots.iter().enumerate() {
        let row = index / grid.columns;
        let col = index % grid.columns;
        let draw_col = match side {
            Side::Front => col,
            Side::Back => grid.mirror_col(col),
        };
        let rect = grid.slot_rect(row, draw_col);

        match slot {
            Some(card) => draw_card(layer, fonts, rect, card, side, spec),
            None => {
                if outline_blank_slots {
                    draw_border(layer, rect);
                }
            }
        }
    }
}

fn draw_card(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    rect: Rect,
    card: &Card,
    side: Side,
    spec: &FontSpec,
) {
    draw_border(layer, rect);

    let (text, body_size) = match side {
        Side::Front => (card.side_a.as_str(), spec.body_front),
        Side::Back => (card.side_b.as_str(), spec.body_back),
    };
    let fitted = textfit::fit_text(
        text,
        rect.width - 2.0 * TEXT_PAD_MM,
        rect.height - 2.0 * TEXT_PAD_MM,
        body_size,
        spec.min,
    );
    draw_centered_block(layer, &fonts.body, rect, &fitted);

    // tag goes on the front only, like the handwritten originals
    if side == Side::Front && !card.tag.is_empty() {
        let tag_width = textfit::text_width_mm(&card.tag, spec.tag);
        layer.use_text(
            &card.tag,
            spec.tag,
            Mm(rect.x + rect.width - TAG_INSET_MM - tag_width),
            Mm(rect.y + TAG_INSET_MM),
            &fonts.tag,
        );
    }
}

/// Center the wrapped block in the slot, each line centered on its own.
fn draw_centered_block(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    rect: Rect,
    fitted: &FittedText,
) {
    let line_height = textfit::line_height_mm(fitted.font_size);
    let mut y = rect.y + rect.height / 2.0 + (fitted.lines.len() as f32 / 2.0) * line_height
        - line_height;

    for line in &fitted.lines {
        if !line.is_empty() {
            let x = rect.x + (rect.width - textfit::text_width_mm(line, fitted.font_size)) / 2.0;
            layer.use_text(line, fitted.font_size, Mm(x), Mm(y), font);
        }
        y -= line_height;
    }
}

fn draw_border(layer: &PdfLayerReference, rect: Rect) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.5);

    let points = vec![
        (Point::new(Mm(rect.x), Mm(rect.y)), false),
        (Point::new(Mm(rect.x + rect.width), Mm(rect.y)), false),
        (
            Point::new(Mm(rect.x + rect.width), Mm(rect.y + rect.height)),
            false,
        ),
        (Point::new(Mm(rect.x), Mm(rect.y + rect.height)), false),
    ];
    let border = Line {
        points,
        is_closed: true,
    };
    layer.add_line(border);
}
