use csv::{Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::ScrapeError;
use crate::models::{ProductRecord, COLUMNS};
use crate::storage::RecordSink;

/// Lets spreadsheet software detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV output that writes the canonical header exactly once and flushes
/// after every row, so an interrupted run leaves a readable file.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    header_written: bool,
    rows: usize,
}

impl CsvSink<File> {
    /// Open `path` for appending. A new or empty file gets the BOM and
    /// header; an existing file is continued as-is.
    pub fn open_append(path: &Path) -> Result<Self, ScrapeError> {
        let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if is_new {
            file.write_all(UTF8_BOM)?;
            info!("Created {}", path.display());
        } else {
            info!("Appending to existing {}", path.display());
        }

        Ok(Self::from_writer(file, is_new))
    }

    /// Truncate `path` and start a fresh table.
    pub fn create(path: &Path) -> Result<Self, ScrapeError> {
        let mut file = File::create(path)?;
        file.write_all(UTF8_BOM)?;
        Ok(Self::from_writer(file, true))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer. `write_header` is false when continuing a table
    /// that already has its header.
    pub fn from_writer(inner: W, write_header: bool) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
            header_written: !write_header,
            rows: 0,
        }
    }

    /// Rows appended through this sink.
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn ensure_header(&mut self) -> Result<(), ScrapeError> {
        if !self.header_written {
            self.writer.write_record(COLUMNS)?;
            self.writer.flush()?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer. A run without rows still
    /// leaves a header behind.
    pub fn finish(mut self) -> Result<W, ScrapeError> {
        self.ensure_header()?;
        self.writer
            .into_inner()
            .map_err(|e| ScrapeError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &ProductRecord) -> Result<(), ScrapeError> {
        self.ensure_header()?;
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
