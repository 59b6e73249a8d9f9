pub mod clean;
pub mod error;
pub mod table;

use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tracing::{info, warn};

pub use clean::{ParseReport, Schema, clean_price, parse_rows};
pub use error::{AnalysisError, LoadError, ParseError, SchemaError};
pub use table::RawTable;

use crate::model::PositionRow;

/// How tolerant the loader is of structurally broken files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Ragged records are an error.
    Strict,
    /// Ragged records are padded or truncated to the header width.
    Lenient,
}

/// Recognized input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Workbook,
}

impl FileFormat {
    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Workbook),
            _ => Err(LoadError::UnsupportedExtension {
                name: name.to_string(),
            }),
        }
    }
}

/// Load a CSV or Excel file from disk.
pub fn load_path(path: &Path, mode: LoadMode) -> Result<RawTable, LoadError> {
    let name = path.display().to_string();
    // Reject by extension before touching the filesystem.
    FileFormat::from_name(&name)?;
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|source| LoadError::Io {
            path: name.clone(),
            source,
        })?;
    load_bytes(&name, bytes, mode)
}

/// Load an in-memory file (e.g. an upload); `name` only selects the format.
pub fn load_bytes(name: &str, bytes: Vec<u8>, mode: LoadMode) -> Result<RawTable, LoadError> {
    let table = match FileFormat::from_name(name)? {
        FileFormat::Csv => read_csv(&bytes, mode)?,
        FileFormat::Workbook => read_workbook(name, bytes)?,
    };
    info!(
        "Loaded {} row(s), {} column(s) from {}",
        table.len(),
        table.headers.len(),
        name
    );
    Ok(table)
}

fn read_csv(bytes: &[u8], mode: LoadMode) -> Result<RawTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(mode == LoadMode::Lenient)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(headers);
    let mut reshaped = 0usize;

    for record in rdr.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if table.push_padded(record.iter().map(str::to_string).collect()) {
            reshaped += 1;
        }
    }

    if reshaped > 0 {
        warn!("{reshaped} record(s) did not match the header width and were padded");
    }
    Ok(table)
}

/// First worksheet only; its first row is the header row.
fn read_workbook(name: &str, bytes: Vec<u8>) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            name: name.to_string(),
        })??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::MissingHeader {
            name: name.to_string(),
        })?
        .iter()
        .map(cell_text)
        .collect();

    let mut table = RawTable::new(headers);
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        // Ranges are rectangular, so there is nothing to reshape.
        table.push_padded(cells);
    }
    Ok(table)
}

/// Render a worksheet cell as the text a CSV export would contain.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Load, check the schema and type a file in one call.
pub fn load_positions(
    path: &Path,
    mode: LoadMode,
) -> Result<(Vec<PositionRow>, ParseReport), AnalysisError> {
    let table = load_path(path, mode)?;
    positions_from_table(&table)
}

/// Schema check plus typing for an already-loaded table.
pub fn positions_from_table(
    table: &RawTable,
) -> Result<(Vec<PositionRow>, ParseReport), AnalysisError> {
    let schema = Schema::resolve(table)?;
    Ok(parse_rows(table, &schema))
}
