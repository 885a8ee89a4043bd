use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("Invalid input: {0}")]
    InvalidInputError(String),
    #[error("Front/back alignment broken: {0}")]
    AlignmentError(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read deck file: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to read settings file: {0}")]
    SettingsError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
