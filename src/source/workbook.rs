//! Spreadsheet workbooks (xlsx, xls, ods). Only the first worksheet is read.

use super::{Record, RecordSource, records_from_rows};
use crate::error::SourceError;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct WorkbookSheet {
    name: String,
    path: PathBuf,
}

impl WorkbookSheet {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, message: impl ToString) -> SourceError {
        SourceError::Malformed {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

/// Render a cell the way a sheet displays it. Whole numbers drop the ".0".
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

impl RecordSource for WorkbookSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_all_records(&self) -> Result<Vec<Record>, SourceError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.malformed(e))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| self.malformed(e))?,
            None => return Err(self.malformed("workbook has no worksheets")),
        };

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

        let headers: Vec<String> = match rows.next() {
            Some(headers) => headers.into_iter().map(|h| h.trim().to_string()).collect(),
            None => return Ok(Vec::new()),
        };

        records_from_rows(&self.name, headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Alice".into())), "Alice");
        assert_eq!(cell_to_string(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_unreadable_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pilots.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let err = WorkbookSheet::new("pilots", &path)
            .get_all_records()
            .unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
