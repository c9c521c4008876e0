//! Persisting cleaned records.

use csv::{QuoteStyle, WriterBuilder};
use std::path::{Path, PathBuf};

use crate::error::{SinkError, SinkResult};
use crate::models::ClassifiedRecord;

/// Destination for the cleaned records of a run.
pub trait ReportSink {
    /// Persist `records` when `save` is set.
    ///
    /// Returns where the records went, or `None` when nothing was saved.
    fn accept(&mut self, records: &[ClassifiedRecord], save: bool) -> SinkResult<Option<PathBuf>>;
}

/// Writes cleaned records as comma-delimited text.
///
/// The header comes from the first record. Null values are written as empty
/// fields; values containing commas or quotes are quoted.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvFileSink {
    fn accept(&mut self, records: &[ClassifiedRecord], save: bool) -> SinkResult<Option<PathBuf>> {
        if !save {
            return Ok(None);
        }

        let first = records.first().ok_or(SinkError::NoRecords)?;

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_path(&self.path)?;

        writer.write_record(first.field_names())?;
        for record in records {
            writer.write_record(record.values())?;
        }
        writer.flush()?;

        Ok(Some(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_file;
    use crate::transform::pipeline::report_bytes;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
NAME,CITY,CLAIM_AMOUNT,PAID_AMOUNT,REJECTION_REMARKS
\"Doe, John\",pune,1000.0,0,not covered
Asha,ranchi,NA,250,
";

    #[test]
    fn test_writes_cleaned_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let report = report_bytes(SAMPLE.as_bytes()).unwrap();

        let mut sink = CsvFileSink::new(&path);
        let written = sink.accept(&report.records, true).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "NAME,CITY,CLAIM_AMOUNT,PAID_AMOUNT,REJECTION_REMARKS,PAYMENT_STATUS,REJECTION_CLASS",
                "\"Doe, John\",Pune,1000.0,0,not covered,Rejected,Not_Covered",
                "Asha,Ranchi,,250,,Paid,No Remark",
            ]
        );
    }

    #[test]
    fn test_saved_file_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let report = report_bytes(SAMPLE.as_bytes()).unwrap();

        CsvFileSink::new(&path).accept(&report.records, true).unwrap();

        let reread = parse_file(&path).unwrap();
        assert_eq!(reread.records.len(), 2);
        assert!(reread.dropped.is_empty());
        assert_eq!(reread.records[0].get("NAME"), Some("Doe, John"));
    }

    #[test]
    fn test_no_save_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let report = report_bytes(SAMPLE.as_bytes()).unwrap();

        let written = CsvFileSink::new(&path).accept(&report.records, false).unwrap();
        assert!(written.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_records_rejected() {
        let dir = tempdir().unwrap();
        let mut sink = CsvFileSink::new(dir.path().join("cleaned.csv"));

        let err = sink.accept(&[], true).unwrap_err();
        assert!(matches!(err, SinkError::NoRecords));
    }
}
