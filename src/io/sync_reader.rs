//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over submission rows from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize CSV records
//! sequentially, delegating conversion to the csv_format module. Every data
//! row yields exactly one [`SubmissionRow`], so a row that cannot be decoded
//! is reported in place rather than dropped.
//!
//! ```no_run
//! use card_payment_gateway::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("payments.csv")).unwrap();
//! for row in reader {
//!     let row = row.expect("input is readable");
//!     match row.request {
//!         Ok(request) => println!("row {}: {}", row.row, request.card_owner),
//!         Err(e) => eprintln!("row {}: {}", row.row, e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - An I/O error while reading rows is yielded as `Err` and ends iteration
//! - Individual row errors are carried in the yielded `SubmissionRow`
//! - Line numbers are included in parse errors for debugging

use crate::io::csv_format::{convert_submission, CsvSubmission};
use crate::types::{GatewayError, RowNumber, SubmissionRow};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Provides an iterator interface over submission rows.
/// Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    row: RowNumber,
    failed: bool,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (short rows become row errors)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Io` if the file could not be opened or its
    /// header line could not be read.
    pub fn new(path: &Path) -> Result<Self, GatewayError> {
        let file = File::open(path).map_err(|e| GatewayError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        reader.headers().map_err(|e| GatewayError::Io {
            message: format!("Failed to read file '{}': {}", path.display(), e),
        })?;

        Ok(Self {
            reader,
            row: 0,
            failed: false,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<SubmissionRow, GatewayError>;

    /// Get the next submission row from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(SubmissionRow))` - The next row, decoded or carrying its error
    /// * `Some(Err(GatewayError::Io))` - The input could not be read; no
    ///   further rows are yielded
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut deserializer = self.reader.deserialize::<CsvSubmission>();
        let decoded = deserializer.next()?;

        if let Err(e) = &decoded {
            if is_read_failure(e.kind()) {
                self.failed = true;
                return Some(Err(GatewayError::Io {
                    message: format!("Failed to read input: {}", e),
                }));
            }
        }

        self.row += 1;
        let row = self.row;
        let request = match decoded {
            Ok(record) => convert_submission(record, row),
            Err(e) => Err(GatewayError::from(e)),
        };

        if let Err(e) = &request {
            tracing::debug!(row, "undecodable row: {}", e);
        }

        Some(Ok(SubmissionRow { row, request }))
    }
}

fn is_read_failure(kind: &csv::ErrorKind) -> bool {
    matches!(kind, csv::ErrorKind::Io(_))
}
