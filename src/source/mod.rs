//! Record sources: named sheets that yield rows keyed by column label.
//!
//! A [`SheetClient`] resolves a sheet name to a [`RecordSource`], which reads
//! every row below the header as a [`Record`]. The local client maps names to
//! files in a sheets directory; tests use the in-memory client.

pub mod credentials;
pub mod delimited;
pub mod json;
pub mod workbook;

use crate::error::SourceError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

pub use credentials::Credentials;

/// One row of a sheet, keyed by column label.
///
/// A missing key means the sheet has no such column. A present key with an
/// empty value means the cell is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Raw cell value, `None` when the column is absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Cell value only when the column is present and the cell is non-empty.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}

/// A sheet that can be read in full.
pub trait RecordSource {
    /// Sheet name as requested by the caller.
    fn name(&self) -> &str;

    /// Read every data row below the header row, in sheet order.
    fn get_all_records(&self) -> Result<Vec<Record>, SourceError>;
}

/// Opens sheets by name.
pub trait SheetClient {
    fn open(&self, name: &str) -> Result<Box<dyn RecordSource>, SourceError>;
}

/// Reject names that are empty or could escape the sheets directory.
///
/// Returns the name with surrounding whitespace removed; every client looks
/// sheets up by that form.
pub fn validate_sheet_name(name: &str) -> Result<&str, SourceError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains("..")
        || trimmed.contains('\0')
    {
        return Err(SourceError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Drop blank rows from the end of a sheet.
pub(crate) fn trim_trailing_blank(records: &mut Vec<Record>) {
    while records.last().is_some_and(Record::is_blank) {
        records.pop();
    }
}

/// Build records from a header row and data rows.
///
/// Columns with a blank header are dropped. Short rows are padded with blank
/// cells and trailing blank rows are trimmed, the way a spreadsheet grid reads.
pub(crate) fn records_from_rows<I>(
    sheet: &str,
    headers: Vec<String>,
    rows: I,
) -> Result<Vec<Record>, SourceError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header.as_str()) {
            return Err(SourceError::DuplicateHeader {
                name: sheet.to_string(),
                header: header.clone(),
            });
        }
    }

    let mut records: Vec<Record> = rows
        .into_iter()
        .map(|cells| {
            let mut record = Record::new();
            for (idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let value = cells.get(idx).cloned().unwrap_or_default();
                record.insert(header.clone(), value);
            }
            record
        })
        .collect();

    trim_trailing_blank(&mut records);
    Ok(records)
}

/// In-memory sheet.
#[derive(Debug, Clone)]
pub struct MemorySheet {
    name: String,
    records: Vec<Record>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl RecordSource for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_all_records(&self) -> Result<Vec<Record>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Sheet client backed by a map of named in-memory sheets.
#[derive(Debug, Clone, Default)]
pub struct MemorySheetClient {
    sheets: HashMap<String, Vec<Record>>,
}

impl MemorySheetClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet. The name is stored trimmed, the form `open` looks up.
    pub fn with_sheet(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        let name: String = name.into();
        self.sheets.insert(name.trim().to_string(), records);
        self
    }
}

impl SheetClient for MemorySheetClient {
    fn open(&self, name: &str) -> Result<Box<dyn RecordSource>, SourceError> {
        let name = validate_sheet_name(name)?;
        let records = self.sheets.get(name).ok_or_else(|| SourceError::NotFound {
            name: name.to_string(),
            dir: PathBuf::from("<memory>"),
        })?;
        Ok(Box::new(MemorySheet::new(name, records.clone())))
    }
}

/// File extensions tried, in order, when resolving a sheet name.
pub const SHEET_EXTENSIONS: &[&str] = &["csv", "csv.gz", "xlsx", "xls", "ods", "json"];

/// Sheet client that reads spreadsheet files from a directory.
#[derive(Debug, Clone)]
pub struct FileSheetClient {
    root: PathBuf,
    account: Option<String>,
}

impl FileSheetClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            account: None,
        }
    }

    /// Build a client for the account named in the credentials.
    pub fn from_credentials(credentials: &Credentials, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            account: Some(credentials.client_email.clone()),
        }
    }

    /// Find the file backing `name`, trying each known extension.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        let name = validate_sheet_name(name)?;
        SHEET_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
                dir: self.root.clone(),
            })
    }
}

impl SheetClient for FileSheetClient {
    fn open(&self, name: &str) -> Result<Box<dyn RecordSource>, SourceError> {
        let path = self.resolve(name)?;
        let name = name.trim();
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        tracing::debug!(
            sheet = %name,
            path = %path.display(),
            account = self.account.as_deref().unwrap_or("-"),
            "Opening sheet"
        );

        let source: Box<dyn RecordSource> = if file_name.ends_with(".json") {
            Box::new(json::JsonSheet::new(name, path))
        } else if file_name.ends_with(".csv") || file_name.ends_with(".csv.gz") {
            Box::new(delimited::CsvSheet::new(name, path))
        } else {
            Box::new(workbook::WorkbookSheet::new(name, path))
        };
        Ok(source)
    }
}
