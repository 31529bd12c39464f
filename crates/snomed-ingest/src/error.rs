#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("workbook {path} has no sheet named {sheet:?}")]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("sheet {sheet:?} in {path} is missing column {column:?}")]
    MissingColumn {
        path: PathBuf,
        sheet: String,
        column: String,
    },

    #[error("sheet {sheet:?} in {path}, row {row}, column {column:?}: {message}")]
    Cell {
        path: PathBuf,
        sheet: String,
        row: usize,
        column: String,
        message: String,
    },

    #[error("codelist {path} is missing column {column:?}")]
    MissingCodelistColumn { path: PathBuf, column: String },

    #[error("failed to parse codelist {path}: {message}")]
    Csv { path: PathBuf, message: String },
}
