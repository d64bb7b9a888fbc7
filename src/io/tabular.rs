//! io::tabular
//!
//! CSV and gzip-compressed CSV strategies.
//!
//! # Format
//!
//! - Comma-delimited, header row required
//! - Written with a header and no index column
//! - Optional column projection on read
//!
//! The gzip variant decodes and encodes transparently and is permissive:
//! rows whose width does not match the header are skipped and counted
//! instead of failing the whole read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::traits::{
    discard_on_error, open_existing, prepare_destination, unsupported_content, unsupported_filter,
    Content, FileIoError, IoStrategy, ReadFilter,
};
use crate::core::table::Table;
use crate::core::types::Extension;

/// Reads and writes tables as CSV, optionally gzip-compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvStrategy {
    gzip: bool,
}

impl CsvStrategy {
    /// Uncompressed CSV (`.csv`).
    pub const fn plain() -> Self {
        Self { gzip: false }
    }

    /// Gzip-compressed CSV (`.gz`).
    pub const fn gzip() -> Self {
        Self { gzip: true }
    }

    /// Whether this strategy compresses.
    pub fn is_gzip(&self) -> bool {
        self.gzip
    }

    fn encode(&self, path: &Path, file: File, table: &Table) -> Result<(), FileIoError> {
        let mut inner = if self.gzip {
            let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            write_table(path, encoder, table)?
                .finish()
                .map_err(|e| FileIoError::io(path, e))?
        } else {
            write_table(path, BufWriter::new(file), table)?
        };
        inner.flush().map_err(|e| FileIoError::io(path, e))
    }
}

impl IoStrategy for CsvStrategy {
    fn name(&self) -> &'static str {
        if self.gzip {
            "csv.gz"
        } else {
            "csv"
        }
    }

    fn extension(&self) -> Extension {
        Extension::from_static(if self.gzip { ".gz" } else { ".csv" })
    }

    fn read(&self, path: &Path, filter: Option<&ReadFilter>) -> Result<Content, FileIoError> {
        let columns = match filter {
            None => None,
            Some(ReadFilter::Columns(names)) => Some(names.as_slice()),
            Some(other) => return Err(unsupported_filter(self.name(), other)),
        };

        let file = open_existing(path)?;
        let table = if self.gzip {
            read_table(path, GzDecoder::new(BufReader::new(file)), true)?
        } else {
            read_table(path, BufReader::new(file), false)?
        };

        let table = match columns {
            Some(names) => table
                .select(names)
                .map_err(|e| FileIoError::from_table(path, e))?,
            None => table,
        };

        tracing::debug!(
            path = %path.display(),
            rows = table.n_rows(),
            cols = table.n_cols(),
            "read table"
        );
        Ok(Content::Table(table))
    }

    fn write(&self, path: &Path, content: &Content) -> Result<PathBuf, FileIoError> {
        let table = match content {
            Content::Table(t) => t,
            other => return Err(unsupported_content(self.name(), "a table", other)),
        };

        let path = prepare_destination(path, &self.extension())?;
        let file = File::create(&path).map_err(|e| FileIoError::io(&path, e))?;
        discard_on_error(&path, self.encode(&path, file, table))?;

        tracing::debug!(path = %path.display(), rows = table.n_rows(), "wrote table");
        Ok(path)
    }
}

/// Decode a table from any reader.
///
/// In permissive mode rows with the wrong number of fields are skipped.
fn read_table<R: Read>(path: &Path, reader: R, permissive: bool) -> Result<Table, FileIoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(permissive)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(FileIoError::malformed(path, "missing header row"));
    }

    let mut table = Table::new(headers).map_err(|e| FileIoError::from_table(path, e))?;
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if permissive && !matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(csv_error(path, e)),
        };

        if record.len() != table.n_cols() {
            if permissive {
                skipped += 1;
                continue;
            }
            return Err(FileIoError::malformed(
                path,
                format!(
                    "row has {} fields, expected {}",
                    record.len(),
                    table.n_cols()
                ),
            ));
        }

        table
            .push_row(record.iter())
            .map_err(|e| FileIoError::from_table(path, e))?;
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped malformed rows");
    }
    Ok(table)
}

/// Encode a table to any writer, returning the writer once flushed.
fn write_table<W: Write>(path: &Path, writer: W, table: &Table) -> Result<W, FileIoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())
        .map_err(|e| csv_error(path, e))?;
    for row in table.rows() {
        wtr.write_record(row).map_err(|e| csv_error(path, e))?;
    }
    wtr.into_inner()
        .map_err(|e| FileIoError::io(path, e.into_error()))
}

fn csv_error(path: &Path, err: csv::Error) -> FileIoError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(source) => FileIoError::io(path, source),
            other => FileIoError::malformed(path, format!("{:?}", other)),
        }
    } else {
        FileIoError::malformed(path, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn listings() -> Table {
        let mut t = Table::new(["id", "bathrooms", "price"]).unwrap();
        t.push_row(["1", "2", "100"]).unwrap();
        t.push_row(["2", "1", "80"]).unwrap();
        t.push_row(["3", "3", "410"]).unwrap();
        t
    }

    mod plain {
        use super::*;

        #[test]
        fn roundtrip() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv");
            let csv = CsvStrategy::plain();

            let written = csv.write(&path, &Content::Table(listings())).unwrap();
            assert_eq!(written, path);

            let read = csv.read(&path, None).unwrap();
            assert_eq!(read, Content::Table(listings()));
        }

        #[test]
        fn written_without_index_column() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv");
            CsvStrategy::plain()
                .write(&path, &Content::Table(listings()))
                .unwrap();

            let text = fs::read_to_string(&path).unwrap();
            assert!(text.starts_with("id,bathrooms,price\n1,2,100\n"));
        }

        #[test]
        fn column_projection() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv");
            fs::write(&path, "id,bathrooms,price\n1,2,100\n2,1,80\n").unwrap();

            let filter = ReadFilter::columns(["id", "bathrooms"]);
            let table = CsvStrategy::plain()
                .read(&path, Some(&filter))
                .unwrap()
                .into_table()
                .unwrap();
            assert_eq!(table.n_cols(), 2);
            assert_eq!(table.n_rows(), 2);
        }

        #[test]
        fn unknown_column_is_malformed() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv");
            fs::write(&path, "id,price\n1,100\n").unwrap();

            let filter = ReadFilter::columns(["bedrooms"]);
            let err = CsvStrategy::plain().read(&path, Some(&filter)).unwrap_err();
            assert!(matches!(err, FileIoError::MalformedContent { .. }));
        }

        #[test]
        fn ragged_rows_are_malformed() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("bad.csv");
            fs::write(&path, "id,price\n1,100\n2\n").unwrap();

            let err = CsvStrategy::plain().read(&path, None).unwrap_err();
            assert!(matches!(err, FileIoError::MalformedContent { .. }));
        }

        #[test]
        fn empty_file_has_no_header() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("empty.csv");
            fs::write(&path, "").unwrap();

            let err = CsvStrategy::plain().read(&path, None).unwrap_err();
            assert!(matches!(err, FileIoError::MalformedContent { .. }));
        }

        #[test]
        fn missing_file() {
            let temp = TempDir::new().unwrap();
            let err = CsvStrategy::plain()
                .read(&temp.path().join("missing.csv"), None)
                .unwrap_err();
            assert!(matches!(err, FileIoError::FileMissing { .. }));
        }

        #[test]
        fn byte_filter_rejected() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv");
            fs::write(&path, "id\n1\n").unwrap();

            let err = CsvStrategy::plain()
                .read(&path, Some(&ReadFilter::Bytes(4)))
                .unwrap_err();
            assert!(matches!(err, FileIoError::TypeMismatch { .. }));
        }

        #[test]
        fn text_content_rejected() {
            let temp = TempDir::new().unwrap();
            let err = CsvStrategy::plain()
                .write(&temp.path().join("x.csv"), &Content::Text("a".into()))
                .unwrap_err();
            assert!(matches!(err, FileIoError::TypeMismatch { .. }));
            assert!(!temp.path().join("x.csv").exists());
        }

        #[test]
        fn wrong_extension_corrected() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.tsv");
            let written = CsvStrategy::plain()
                .write(&path, &Content::Table(listings()))
                .unwrap();
            assert_eq!(written, temp.path().join("sf.tsv.csv"));
            assert!(written.exists());
        }
    }

    mod gzip {
        use super::*;

        #[test]
        fn roundtrip() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("sf.csv.gz");
            let gz = CsvStrategy::gzip();

            let written = gz.write(&path, &Content::Table(listings())).unwrap();
            assert_eq!(written, path);

            // Really compressed: gzip magic bytes
            let bytes = fs::read(&path).unwrap();
            assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

            let read = gz.read(&path, None).unwrap();
            assert_eq!(read, Content::Table(listings()));
        }

        #[test]
        fn skips_malformed_rows() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("ragged.csv.gz");

            let file = File::create(&path).unwrap();
            let mut enc = GzEncoder::new(file, Compression::default());
            enc.write_all(b"id,price\n1,100\n2\n3,300,extra\n4,400\n")
                .unwrap();
            enc.finish().unwrap();

            let table = CsvStrategy::gzip()
                .read(&path, None)
                .unwrap()
                .into_table()
                .unwrap();
            assert_eq!(table.n_rows(), 2);
            assert_eq!(table.column("id"), Some(vec!["1", "4"]));
        }

        #[test]
        fn not_gzip_is_an_error() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("plain.gz");
            fs::write(&path, "id,price\n1,100\n").unwrap();

            assert!(CsvStrategy::gzip().read(&path, None).is_err());
        }

        #[test]
        fn appends_gz_extension() {
            let temp = TempDir::new().unwrap();
            let written = CsvStrategy::gzip()
                .write(&temp.path().join("sf.csv"), &Content::Table(listings()))
                .unwrap();
            assert_eq!(written, temp.path().join("sf.csv.gz"));
        }
    }
}
