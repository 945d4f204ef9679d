use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("Page {page_id} is not open")]
    PageNotFound { page_id: uuid::Uuid },

    #[error("Action {seq} arrived after action {last_seq} was applied")]
    StaleAction { seq: u64, last_seq: u64 },

    #[error("View state unavailable: {message}")]
    StateError { message: String },
}

pub type Result<T> = std::result::Result<T, PredictorError>;
