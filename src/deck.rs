// Deck loading and pagination.
//
// The CSV side is deliberately strict: semicolon delimiter, a header row,
// and a small alias table for the column names. Everything downstream
// works on clean, ordered `Card` values.

use std::path::Path;

use crate::error::AppError;

/// One study item. Identity is its input order position; never mutated
/// after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub side_a: String,
    pub side_b: String,
    /// Optional label drawn in the card corner; empty when absent
    pub tag: String,
}

/// One output page: exactly `cards_per_page` slots in row-major order.
/// Trailing `None` slots on the last page keep front and back page counts
/// identical, so slot-index alignment survives a partial page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub slots: Vec<Option<Card>>,
}

impl Page {
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Header aliases, matched after trimming, lowercasing and stripping
/// spaces/underscores.
const SIDE_A_ALIASES: &[&str] = &["latoa", "sidea", "a"];
const SIDE_B_ALIASES: &[&str] = &["latob", "sideb", "b"];
const TAG_ALIASES: &[&str] = &["tag", "tags", "labels", "etichetta"];

fn normalize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .replace(' ', "")
        .replace('_', "")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

/// Load a deck from a semicolon-delimited CSV file.
pub fn load_deck(path: &Path) -> Result<Vec<Card>, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::InvalidInputError(format!("{}: {}", path.display(), e)))?;
    parse_deck(&content)
}

/// Parse CSV content into ordered cards.
///
/// Rows where both sides are empty abort the whole run, listing the
/// offending line numbers; skipping them silently would desynchronize
/// front and back ordering for anyone cross-checking against the source
/// file.
pub fn parse_deck(content: &str) -> Result<Vec<Card>, AppError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let col_a = find_column(&headers, SIDE_A_ALIASES);
    let col_b = find_column(&headers, SIDE_B_ALIASES);
    let col_tag = find_column(&headers, TAG_ALIASES);

    let (col_a, col_b) = match (col_a, col_b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(AppError::InvalidInputError(
                "CSV is missing a side A or side B column \
                 (accepted headers: 'Lato A'/'Side A'/'A' and 'Lato B'/'Side B'/'B')"
                    .to_string(),
            ))
        }
    };

    let mut cards = Vec::new();
    let mut blank_rows: Vec<u64> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();
        let side_a = field(col_a);
        let side_b = field(col_b);
        let tag = col_tag.map(field).unwrap_or_default();

        if side_a.is_empty() && side_b.is_empty() {
            blank_rows.push(line);
            continue;
        }
        cards.push(Card { side_a, side_b, tag });
    }

    if !blank_rows.is_empty() {
        let listed = blank_rows
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::InvalidInputError(format!(
            "rows with both sides empty at line(s) {}",
            listed
        )));
    }
    if cards.is_empty() {
        return Err(AppError::InvalidInputError(
            "no cards found in deck".to_string(),
        ));
    }

    Ok(cards)
}

/// Split cards into pages of `cards_per_page` slots, preserving order.
/// The last page is padded with explicit empty slots.
pub fn paginate(cards: Vec<Card>, cards_per_page: usize) -> Vec<Page> {
    assert!(cards_per_page > 0);
    let mut pages = Vec::with_capacity((cards.len() + cards_per_page - 1) / cards_per_page);

    let mut slots: Vec<Option<Card>> = Vec::with_capacity(cards_per_page);
    for card in cards {
        slots.push(Some(card));
        if slots.len() == cards_per_page {
            pages.push(Page { slots });
            slots = Vec::with_capacity(cards_per_page);
        }
    }
    if !slots.is_empty() {
        slots.resize(cards_per_page, None);
        pages.push(Page { slots });
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(n: usize) -> Card {
        Card {
            side_a: format!("front {}", n),
            side_b: format!("back {}", n),
            tag: String::new(),
        }
    }

    #[test]
    fn sixty_cards_fill_four_pages_exactly() {
        let pages = paginate((0..60).map(card).collect(), 15);
        assert_eq!(pages.len(), 4);
        assert!(pages.iter().all(|p| p.occupied() == 15));
    }

    #[test]
    fn sixty_one_cards_pad_the_fifth_page() {
        let pages = paginate((0..61).map(card).collect(), 15);
        assert_eq!(pages.len(), 5);
        assert_eq!(pages[4].occupied(), 1);
        assert_eq!(pages[4].slots.len(), 15);
        assert!(pages[4].slots[1..].iter().all(|s| s.is_none()));
    }

    #[test]
    fn flattening_pages_reproduces_input_order() {
        let cards: Vec<Card> = (0..37).map(card).collect();
        let pages = paginate(cards.clone(), 15);
        let flattened: Vec<Card> = pages
            .into_iter()
            .flat_map(|p| p.slots)
            .flatten()
            .collect();
        assert_eq!(flattened, cards);
    }

    #[test]
    fn parses_italian_headers() {
        let cards = parse_deck("Lato A;Lato B;Tag\ncane;dog;animali\ngatto;cat;\n").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].side_a, "cane");
        assert_eq!(cards[0].side_b, "dog");
        assert_eq!(cards[0].tag, "animali");
        assert_eq!(cards[1].tag, "");
    }

    #[test]
    fn parses_english_headers_and_bom() {
        let cards = parse_deck("\u{feff}Side A;Side B;Labels\nhouse;casa;nouns\n").unwrap();
        assert_eq!(cards[0].side_a, "house");
        assert_eq!(cards[0].tag, "nouns");
    }

    #[test]
    fn parses_single_letter_headers_without_tag_column() {
        let cards = parse_deck("A;B\none;uno\n").unwrap();
        assert_eq!(cards[0].side_b, "uno");
        assert_eq!(cards[0].tag, "");
    }

    #[test]
    fn missing_side_column_is_rejected() {
        let err = parse_deck("Question;Answer\nq;a\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidInputError(_)));
    }

    #[test]
    fn rows_with_both_sides_empty_abort_with_line_numbers() {
        let err = parse_deck("A;B\none;uno\n;\ntwo;due\n ; \n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("3"), "{}", msg);
        assert!(msg.contains("5"), "{}", msg);
    }

    #[test]
    fn one_sided_cards_are_kept() {
        let cards = parse_deck("A;B\nonly front;\n;only back\n").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].side_b, "");
        assert_eq!(cards[1].side_a, "");
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert!(matches!(
            parse_deck("A;B\n"),
            Err(AppError::InvalidInputError(_))
        ));
    }
}
