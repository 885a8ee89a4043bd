// Text fitting: wrap a card face into its slot, shrinking the font when
// the wrapped block runs too tall and truncating once the floor size is
// reached.
//
// Widths are estimated from an average Helvetica advance rather than real
// font metrics; printpdf's builtin fonts expose none, and the same
// estimate is used for wrapping and centering so the two stay consistent.

/// Points to millimeters
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// Average glyph advance as a fraction of the font size
const CHAR_WIDTH_RATIO: f32 = 0.5;

/// Step by which the font shrinks on each retry, in points
const FONT_STEP: f32 = 0.5;

/// Marker appended when text is cut at the floor size
const TRUNCATION_MARKER: char = '…';

/// Character sequence in the source text forcing a line break
pub const BREAK_MARKER: char = '^';

/// Estimated width of a string at a font size, in mm.
pub fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO * PT_TO_MM
}

/// Line advance at a font size, in mm.
pub fn line_height_mm(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR * PT_TO_MM
}

/// A wrapped card face: the lines to draw and the size they fit at.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub truncated: bool,
}

/// Wrap `text` into a `width` x `height` mm rectangle.
///
/// `^` forces a break. Wrapping restarts from scratch at each smaller
/// size, so the result depends only on the inputs.
pub fn fit_text(
    text: &str,
    width: f32,
    height: f32,
    start_size: f32,
    min_size: f32,
) -> FittedText {
    let mut size = start_size.max(min_size);

    loop {
        let lines = wrap(text, width, size);
        let block_height = lines.len() as f32 * line_height_mm(size);
        if block_height <= height {
            return FittedText {
                lines,
                font_size: size,
                truncated: false,
            };
        }
        if size <= min_size {
            return truncate(lines, width, height, size);
        }
        size = (size - FONT_STEP).max(min_size);
    }
}

/// Greedy word wrap at a fixed size. Words longer than a full line are
/// hard-split.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split(BREAK_MARKER) {
        let words: Vec<&str> = segment.split_whitespace().collect();
        if words.is_empty() {
            // a forced break around empty content keeps its blank line
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in words {
            for piece in split_long_word(word, width, size) {
                let candidate = if current.is_empty() {
                    piece.clone()
                } else {
                    format!("{} {}", current, piece)
                };
                if text_width_mm(&candidate, size) <= width || current.is_empty() {
                    current = candidate;
                } else {
                    lines.push(current);
                    current = piece;
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Break a single word into chunks that each fit the line width.
fn split_long_word(word: &str, width: f32, size: f32) -> Vec<String> {
    if text_width_mm(word, size) <= width {
        return vec![word.to_string()];
    }
    let max_chars = ((width / (size * CHAR_WIDTH_RATIO * PT_TO_MM)) as usize).max(1);
    word.chars()
        .collect::<Vec<char>>()
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

/// Keep the lines that fit at the floor size and mark the cut.
fn truncate(lines: Vec<String>, width: f32, height: f32, min_size: f32) -> FittedText {
    let max_lines = (height / line_height_mm(min_size)) as usize;
    if max_lines == 0 {
        return FittedText {
            lines: Vec::new(),
            font_size: min_size,
            truncated: true,
        };
    }

    let mut kept: Vec<String> = lines.into_iter().take(max_lines).collect();
    if let Some(last) = kept.last_mut() {
        last.push(TRUNCATION_MARKER);
        while text_width_mm(last, min_size) > width && last.chars().count() > 1 {
            // drop the character before the marker
            let mut chars: Vec<char> = last.chars().collect();
            chars.remove(chars.len() - 2);
            *last = chars.into_iter().collect();
        }
    }
    FittedText {
        lines: kept,
        font_size: min_size,
        truncated: true,
    }
}
