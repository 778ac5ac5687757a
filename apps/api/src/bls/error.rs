use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unparseable area title: '{0}'")]
    UnparseableArea(String),

    #[error("Row is missing a value for {0}")]
    MissingField(&'static str),

    #[error("Workbook is missing required column {0}")]
    MissingColumn(&'static str),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
