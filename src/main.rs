// flashcards-pdf: Generate print-ready double-sided flashcards from a CSV deck

use clap::Parser;
use std::path::{Path, PathBuf};

use flashcards_pdf::assemble;
use flashcards_pdf::config::{
    self, CardGeometry, Config, FontSpec, Orientation, PageFormat, Settings,
    DEFAULT_BODY_FONT_SIZE, DEFAULT_CARD_HEIGHT_CM, DEFAULT_CARD_WIDTH_CM, DEFAULT_GAP_CM,
    DEFAULT_MARGIN_CM, DEFAULT_MIN_FONT_SIZE,
};
use flashcards_pdf::deck;
use flashcards_pdf::error::AppError;
use flashcards_pdf::layout::{self, LayoutSummary};
use flashcards_pdf::render::Side;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(version, about = "Generate print-ready double-sided flashcards from a CSV deck")]
struct Args {
    /// CSV deck file (semicolon-delimited, with a header row)
    deck: PathBuf,

    /// Page format
    #[arg(short, long, ignore_case = true)]
    format: Option<PageFormat>,

    /// Page orientation (auto turns the page for wide cards)
    #[arg(long, ignore_case = true)]
    orientation: Option<Orientation>,

    /// Card width in cm
    #[arg(long)]
    card_width: Option<f32>,

    /// Card height in cm
    #[arg(long)]
    card_height: Option<f32>,

    /// Horizontal page margin in cm
    #[arg(long)]
    margin_x: Option<f32>,

    /// Vertical page margin in cm
    #[arg(long)]
    margin_y: Option<f32>,

    /// Gap between cards in cm
    #[arg(long)]
    gap: Option<f32>,

    /// Side A font size in points
    #[arg(long)]
    font_size_a: Option<f32>,

    /// Side B font size in points
    #[arg(long)]
    font_size_b: Option<f32>,

    /// Tag font size in points (default derived from side A size)
    #[arg(long)]
    tag_font_size: Option<f32>,

    /// Smallest font size the text fitter may shrink to
    #[arg(long)]
    min_font_size: Option<f32>,

    /// Draw outlines around unfilled slots on the last page
    #[arg(long)]
    outline_blank_slots: bool,

    /// Settings file (JSON) supplying defaults for any of the above
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output filename for the combined PDF
    #[arg(short, long, default_value = "flashcards.pdf")]
    output: String,

    /// Print the layout preview and exit without generating anything
    #[arg(long)]
    preview: bool,

    /// Keep the separate front/back PDFs after a successful merge
    #[arg(long)]
    keep_intermediate: bool,

    /// Skip the interleaved merge and leave the two separate PDFs
    #[arg(long)]
    no_merge: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => config::load_settings(path)?,
        None => Settings::default(),
    };
    let config = resolve_config(&args, &settings)?;
    config.validate()?;

    // Load the deck first so input problems surface before any layout work
    let cards = deck::load_deck(&args.deck)?;

    let (page_w, page_h) = config.page_dimensions_cm();
    let grid = layout::compute_grid(page_w, page_h, &config.geometry)?;
    let summary = LayoutSummary::new(&grid, cards.len());

    print_preview(&config, &summary, page_w, page_h);
    if args.preview {
        return Ok(());
    }

    let pages = deck::paginate(cards, grid.cards_per_page());

    let (output, front_path, back_path) = output_paths(&args.output);
    let mut report = |side: Side, done: usize, total: usize| {
        println!("  rendered {} page {}/{}", side, done, total);
    };
    assemble::generate(
        &pages,
        &grid,
        &config,
        &front_path,
        &back_path,
        Some(&mut report),
    )?;

    if assemble::merge_supported() && !args.no_merge {
        merge(&front_path, &back_path, &output)?;
        if !args.keep_intermediate {
            std::fs::remove_file(&front_path)?;
            std::fs::remove_file(&back_path)?;
        }
        println!("✓ Generated: {}", output.display());
    } else {
        if !assemble::merge_supported() {
            println!("Interleaved merge not available in this build; keeping separate files.");
        }
        println!(
            "✓ Generated: {} and {}",
            front_path.display(),
            back_path.display()
        );
    }
    println!("  Cards: {}", summary.total_cards);
    println!("  Pages: {} per side", summary.page_count);

    Ok(())
}

#[cfg(feature = "merge")]
fn merge(front: &Path, back: &Path, output: &Path) -> Result<(), AppError> {
    assemble::merge_interleaved(front, back, output)
}

#[cfg(not(feature = "merge"))]
fn merge(_front: &Path, _back: &Path, _output: &Path) -> Result<(), AppError> {
    unreachable!("merge() is only called when merge_supported() is true");
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// Build the immutable run configuration: explicit flags win, then the
/// settings file, then the defaults.
fn resolve_config(args: &Args, settings: &Settings) -> Result<Config, AppError> {
    let format = match args.format {
        Some(f) => f,
        None => match &settings.format {
            Some(s) => PageFormat::parse(s)
                .ok_or_else(|| AppError::SettingsError(format!("unknown page format '{}'", s)))?,
            None => PageFormat::A4,
        },
    };
    let orientation = match args.orientation {
        Some(o) => o,
        None => match &settings.orientation {
            Some(s) => Orientation::parse(s)
                .ok_or_else(|| AppError::SettingsError(format!("unknown orientation '{}'", s)))?,
            None => Orientation::Auto,
        },
    };

    let pick =
        |flag: Option<f32>, setting: Option<f32>, default: f32| flag.or(setting).unwrap_or(default);
    let geometry = CardGeometry {
        card_width: pick(args.card_width, settings.card_width, DEFAULT_CARD_WIDTH_CM),
        card_height: pick(args.card_height, settings.card_height, DEFAULT_CARD_HEIGHT_CM),
        margin_x: pick(args.margin_x, settings.margin_x, DEFAULT_MARGIN_CM),
        margin_y: pick(args.margin_y, settings.margin_y, DEFAULT_MARGIN_CM),
        gap: pick(args.gap, settings.gap, DEFAULT_GAP_CM),
    };

    let body_front = pick(args.font_size_a, settings.font_size_a, DEFAULT_BODY_FONT_SIZE);
    let body_back = pick(args.font_size_b, settings.font_size_b, DEFAULT_BODY_FONT_SIZE);
    let fonts = FontSpec {
        body_front,
        body_back,
        tag: pick(
            args.tag_font_size,
            settings.tag_font_size,
            FontSpec::derived_tag_size(body_front),
        ),
        min: pick(args.min_font_size, settings.min_font_size, DEFAULT_MIN_FONT_SIZE),
    };

    Ok(Config {
        format,
        orientation,
        geometry,
        fonts,
        outline_blank_slots: args.outline_blank_slots
            || settings.outline_blank_slots.unwrap_or(false),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Derive the intermediate front/back filenames from the output name:
/// `deck.pdf` becomes `deck_front.pdf` and `deck_back.pdf` next to it.
fn output_paths(output: &str) -> (PathBuf, PathBuf, PathBuf) {
    let output = PathBuf::from(output);
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("flashcards")
        .to_string();
    let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
    let front = dir.join(format!("{}_front.pdf", stem));
    let back = dir.join(format!("{}_back.pdf", stem));
    (output, front, back)
}

fn print_preview(config: &Config, summary: &LayoutSummary, page_w: f32, page_h: f32) {
    let orientation = match config.applied_orientation() {
        Orientation::Landscape => "landscape",
        _ => "portrait",
    };
    println!("Layout preview:");
    println!(
        "  Page: {} {} ({:.1} x {:.1} cm)",
        config.format, orientation, page_w, page_h
    );
    println!(
        "  Card: {:.1} x {:.1} cm",
        config.geometry.card_width, config.geometry.card_height
    );
    println!(
        "  Grid: {} columns x {} rows = {} cards/page",
        summary.columns, summary.rows, summary.cards_per_page
    );
    println!("  Cards: {}", summary.total_cards);
    println!("  Pages: {} per side", summary.page_count);
}
