// flashcards-pdf: turn a CSV deck into mirrored front/back PDF sheets
// ready for double-sided printing and cutting.

pub mod assemble;
pub mod config;
pub mod deck;
pub mod error;
pub mod layout;
pub mod render;
pub mod textfit;

pub use error::AppError;
