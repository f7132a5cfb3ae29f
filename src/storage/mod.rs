use crate::error::ScrapeError;
use crate::models::ProductRecord;

mod csv_sink;
pub use csv_sink::{CsvSink, UTF8_BOM};

/// Destination for assembled rows, appended in discovery order.
pub trait RecordSink {
    fn append(&mut self, record: &ProductRecord) -> Result<(), ScrapeError>;
}

impl RecordSink for Vec<ProductRecord> {
    fn append(&mut self, record: &ProductRecord) -> Result<(), ScrapeError> {
        self.push(record.clone());
        Ok(())
    }
}
