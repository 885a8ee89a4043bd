// Layout grid computation: how many cards fit a page, and where each
// slot sits. Pure arithmetic, no drawing.

use crate::config::CardGeometry;
use crate::error::AppError;

/// Conversion from user-facing cm to the mm used for PDF placement
pub const CM_TO_MM: f32 = 10.0;

/// Tolerance for f32 rounding at exact-fit boundaries
const EPSILON_MM: f32 = 0.001;

/// A slot rectangle on the page, in mm from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Derived grid for one page format + card geometry pair. All lengths in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGrid {
    pub columns: usize,
    pub rows: usize,
    pub page_width: f32,
    pub page_height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub gap: f32,
    /// Offset of the grid's left edge; leftover space is split evenly,
    /// so the margins act as a required minimum clearance
    pub origin_x: f32,
    /// Offset of the grid's top edge (measured from the top of the page)
    pub origin_y: f32,
}

/// Compute the layout grid. Fails with `ConfigurationError` when the card
/// cannot fit the usable page area, before anything is rendered.
pub fn compute_grid(
    page_width_cm: f32,
    page_height_cm: f32,
    geometry: &CardGeometry,
) -> Result<LayoutGrid, AppError> {
    if geometry.card_width <= 0.0 || geometry.card_height <= 0.0 {
        return Err(AppError::ConfigurationError(format!(
            "card dimensions must be positive, got {:.1} x {:.1} cm",
            geometry.card_width, geometry.card_height
        )));
    }
    if geometry.margin_x < 0.0 || geometry.margin_y < 0.0 || geometry.gap < 0.0 {
        return Err(AppError::ConfigurationError(
            "margins and gap must not be negative".to_string(),
        ));
    }

    let page_w = page_width_cm * CM_TO_MM;
    let page_h = page_height_cm * CM_TO_MM;
    let card_w = geometry.card_width * CM_TO_MM;
    let card_h = geometry.card_height * CM_TO_MM;
    let margin_x = geometry.margin_x * CM_TO_MM;
    let margin_y = geometry.margin_y * CM_TO_MM;
    let gap = geometry.gap * CM_TO_MM;

    let usable_w = page_w - 2.0 * margin_x;
    let usable_h = page_h - 2.0 * margin_y;
    if card_w > usable_w + EPSILON_MM || card_h > usable_h + EPSILON_MM {
        return Err(AppError::ConfigurationError(format!(
            "card {:.1} x {:.1} cm does not fit page {:.1} x {:.1} cm with margins {:.1} x {:.1} cm",
            geometry.card_width,
            geometry.card_height,
            page_width_cm,
            page_height_cm,
            geometry.margin_x,
            geometry.margin_y
        )));
    }

    let columns = (((usable_w + gap + EPSILON_MM) / (card_w + gap)) as usize).max(1);
    let rows = (((usable_h + gap + EPSILON_MM) / (card_h + gap)) as usize).max(1);

    // Center the whole grid; the leftover beyond the requested margins is
    // distributed evenly on both sides of each axis.
    let grid_w = columns as f32 * card_w + (columns - 1) as f32 * gap;
    let grid_h = rows as f32 * card_h + (rows - 1) as f32 * gap;
    let origin_x = (page_w - grid_w) / 2.0;
    let origin_y = (page_h - grid_h) / 2.0;

    Ok(LayoutGrid {
        columns,
        rows,
        page_width: page_w,
        page_height: page_h,
        card_width: card_w,
        card_height: card_h,
        gap,
        origin_x,
        origin_y,
    })
}

impl LayoutGrid {
    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// The column a slot lands on after a duplex flip. Involution:
    /// mirroring twice returns the original column.
    pub fn mirror_col(&self, col: usize) -> usize {
        self.columns - 1 - col
    }

    /// Rectangle of slot (row, col), bottom-left origin. Rows run top to
    /// bottom, columns left to right.
    pub fn slot_rect(&self, row: usize, col: usize) -> Rect {
        let x = self.origin_x + col as f32 * (self.card_width + self.gap);
        let y = self.page_height
            - self.origin_y
            - (row + 1) as f32 * self.card_height
            - row as f32 * self.gap;
        Rect {
            x,
            y,
            width: self.card_width,
            height: self.card_height,
        }
    }
}

/// Preview of the layout, derivable before any rendering happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSummary {
    pub columns: usize,
    pub rows: usize,
    pub cards_per_page: usize,
    pub total_cards: usize,
    pub page_count: usize,
}

impl LayoutSummary {
    pub fn new(grid: &LayoutGrid, total_cards: usize) -> Self {
        let cards_per_page = grid.cards_per_page();
        let page_count = (total_cards + cards_per_page - 1) / cards_per_page;
        LayoutSummary {
            columns: grid.columns,
            rows: grid.rows,
            cards_per_page,
            total_cards,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(card_w: f32, card_h: f32, margin_x: f32, margin_y: f32, gap: f32) -> CardGeometry {
        CardGeometry {
            card_width: card_w,
            card_height: card_h,
            margin_x,
            margin_y,
            gap,
        }
    }

    #[test]
    fn a4_with_6x4_cards_gives_3_by_5() {
        let grid = compute_grid(21.0, 29.7, &geometry(6.0, 4.0, 1.0, 2.0, 0.5)).unwrap();
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.cards_per_page(), 15);
    }

    #[test]
    fn grid_never_exceeds_the_page() {
        let grid = compute_grid(21.0, 29.7, &geometry(6.0, 4.0, 1.0, 2.0, 0.5)).unwrap();
        let grid_w =
            grid.columns as f32 * grid.card_width + (grid.columns - 1) as f32 * grid.gap;
        let grid_h = grid.rows as f32 * grid.card_height + (grid.rows - 1) as f32 * grid.gap;
        assert!(grid_w + 2.0 * 10.0 <= grid.page_width + 0.01);
        assert!(grid_h + 2.0 * 20.0 <= grid.page_height + 0.01);
    }

    #[test]
    fn oversized_card_is_rejected_before_rendering() {
        let err = compute_grid(21.0, 29.7, &geometry(22.0, 4.0, 0.0, 0.0, 0.5)).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
        assert!(err.to_string().contains("22.0"));
    }

    #[test]
    fn card_wider_than_usable_area_is_rejected() {
        // 6 cm card fits a bare A6 page but not one with 3 cm side margins
        assert!(compute_grid(10.5, 14.8, &geometry(6.0, 4.0, 0.0, 0.0, 0.0)).is_ok());
        let err = compute_grid(10.5, 14.8, &geometry(6.0, 4.0, 3.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn computation_is_deterministic() {
        let g = geometry(6.0, 4.0, 0.5, 0.5, 0.5);
        let a = compute_grid(21.0, 29.7, &g).unwrap();
        let b = compute_grid(21.0, 29.7, &g).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_oversized_but_fitting_card_still_gets_one_slot() {
        let grid = compute_grid(21.0, 29.7, &geometry(20.0, 28.0, 0.0, 0.0, 0.5)).unwrap();
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.rows, 1);
    }

    #[test]
    fn mirroring_is_an_involution() {
        for columns in 1..=7 {
            let grid = LayoutGrid {
                columns,
                rows: 1,
                page_width: 210.0,
                page_height: 297.0,
                card_width: 20.0,
                card_height: 20.0,
                gap: 0.0,
                origin_x: 0.0,
                origin_y: 0.0,
            };
            for col in 0..columns {
                assert_eq!(grid.mirror_col(grid.mirror_col(col)), col);
            }
        }
    }

    #[test]
    fn mirrored_slot_occupies_the_flip_position() {
        // On a 3-column grid the leftmost front slot must land where the
        // rightmost slot sits, so the rectangles swap under mirroring.
        let grid = compute_grid(21.0, 29.7, &geometry(6.0, 4.0, 1.0, 2.0, 0.5)).unwrap();
        let front = grid.slot_rect(0, 0);
        let back = grid.slot_rect(0, grid.mirror_col(0));
        assert_eq!(back, grid.slot_rect(0, 2));
        assert_eq!(front.y, back.y);
        assert!(back.x > front.x);
    }

    #[test]
    fn slots_do_not_overlap() {
        let grid = compute_grid(21.0, 29.7, &geometry(6.0, 4.0, 1.0, 2.0, 0.5)).unwrap();
        let a = grid.slot_rect(0, 0);
        let b = grid.slot_rect(0, 1);
        let c = grid.slot_rect(1, 0);
        assert!(a.x + a.width <= b.x + 0.001);
        assert!(c.y + c.height <= a.y + 0.001);
    }

    #[test]
    fn summary_counts_pages() {
        let grid = compute_grid(21.0, 29.7, &geometry(6.0, 4.0, 1.0, 2.0, 0.5)).unwrap();
        let exact = LayoutSummary::new(&grid, 60);
        assert_eq!(exact.page_count, 4);
        let padded = LayoutSummary::new(&grid, 61);
        assert_eq!(padded.page_count, 5);
        let empty = LayoutSummary::new(&grid, 0);
        assert_eq!(empty.page_count, 0);
    }
}
