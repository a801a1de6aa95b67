//! CSV sheets, optionally gzip compressed.

use super::{Record, RecordSource, records_from_rows};
use crate::error::SourceError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// A CSV file whose first row is the header row.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    name: String,
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SourceError {
        SourceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Open the file, transparently decompressing gzip input.
    fn open_reader(&self) -> Result<Box<dyn Read>, SourceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 2];
        let is_gzip = match reader.read_exact(&mut magic) {
            Ok(()) => magic == [0x1f, 0x8b],
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(self.io_error(e)),
        };

        // Reopen so the reader starts at the beginning
        drop(reader);
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let reader = BufReader::new(file);

        if is_gzip {
            Ok(Box::new(flate2::read::GzDecoder::new(reader)))
        } else {
            Ok(Box::new(reader))
        }
    }
}

/// Parse CSV text into records.
pub fn parse_csv<R: Read>(sheet: &str, path: &Path, input: R) -> Result<Vec<Record>, SourceError> {
    let malformed = |e: csv::Error| SourceError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect(),
        Err(e) => return Err(malformed(e)),
    };
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(malformed)?;
        rows.push(row.iter().map(str::to_string).collect::<Vec<_>>());
    }

    records_from_rows(sheet, headers, rows)
}

impl RecordSource for CsvSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_all_records(&self) -> Result<Vec<Record>, SourceError> {
        let reader = self.open_reader()?;
        parse_csv(&self.name, &self.path, reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{Compression, write::GzEncoder};
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = "Name,Callsign,Phonetic,Colour\n\
                          Alice,AL1,Al,#123456\n\
                          ,,,\n\
                          Bob,BB\n";

    #[test]
    fn test_parse_csv() {
        let records = parse_csv("Pilots", Path::new("pilots.csv"), SAMPLE.as_bytes()).unwrap();

        // The ",,," row is trailing-blank only if nothing follows it
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("Colour"), Some("#123456"));
        assert!(records[1].is_blank());
        assert_eq!(records[2].get("Callsign"), Some("BB"));
        assert_eq!(records[2].get("Colour"), Some(""));
    }

    #[test]
    fn test_parse_csv_trims_header_whitespace() {
        let records =
            parse_csv("Pilots", Path::new("p.csv"), " Name , Callsign\nA,B\n".as_bytes()).unwrap();
        assert_eq!(records[0].get("Name"), Some("A"));
        assert_eq!(records[0].get("Callsign"), Some("B"));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = parse_csv("Pilots", Path::new("p.csv"), "".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_plain_and_gzip_files() {
        let dir = TempDir::new().unwrap();

        let plain = dir.path().join("pilots.csv");
        std::fs::write(&plain, SAMPLE).unwrap();

        let gz = dir.path().join("pilots.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let from_plain = CsvSheet::new("pilots", &plain).get_all_records().unwrap();
        let from_gz = CsvSheet::new("pilots", &gz).get_all_records().unwrap();
        assert_eq!(from_plain, from_gz);
        assert_eq!(from_plain.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvSheet::new("x", dir.path().join("x.csv"))
            .get_all_records()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
