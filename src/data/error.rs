use thiserror::Error;

/// The file could not be turned into a table at all.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type `{name}` (expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods)")]
    UnsupportedExtension { name: String },

    #[error("IO error reading `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook `{name}` has no worksheets")]
    EmptyWorkbook { name: String },

    #[error("File `{name}` has no header row")]
    MissingHeader { name: String },
}

/// The table loaded but lacks columns the analysis needs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A single cell that could not be read as a number. Never fatal: the value
/// degrades to 0 and the error is listed in the parse report.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Row {row}: column `{column}` has non-numeric value `{value}`")]
pub struct ParseError {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// Anything that stops a file from being analyzed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
