//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over submission rows from a CSV file.
//! Supports batch reading for the asynchronous strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of SubmissionRows
//!                  ↓
//!           csv_format module
//!           (CsvSubmission, convert_submission)
//! ```

use crate::io::csv_format::{convert_submission, CsvSubmission};
use crate::types::{GatewayError, RowNumber, SubmissionRow};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
///
/// Row numbers keep counting across batches, so they match what the
/// synchronous reader reports for the same file.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    row: RowNumber,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader, row: 0 }
    }

    /// Read the header line
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Io` if the input cannot be read.
    pub async fn read_headers(&mut self) -> Result<(), GatewayError> {
        self.csv_reader
            .headers()
            .await
            .map_err(|e| GatewayError::Io {
                message: format!("Failed to read input: {}", e),
            })?;
        Ok(())
    }

    /// Read a batch of submission rows
    ///
    /// Reads up to `batch_size` rows. Rows that cannot be decoded are
    /// included with their error.
    ///
    /// # Returns
    ///
    /// The rows read, or an empty vector once the end of the file is reached.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Io` if the input cannot be read. The rows of
    /// the partial batch are discarded.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<SubmissionRow>, GatewayError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvSubmission>();

        while batch.len() < batch_size {
            let decoded = match records.next().await {
                Some(decoded) => decoded,
                None => break,
            };

            if let Err(e) = &decoded {
                if matches!(e.kind(), csv_async::ErrorKind::Io(_)) {
                    return Err(GatewayError::Io {
                        message: format!("Failed to read input: {}", e),
                    });
                }
            }

            self.row += 1;
            let row = self.row;
            let request = match decoded {
                Ok(record) => convert_submission(record, row),
                Err(e) => {
                    let line = e.position().map(|pos| pos.line());
                    Err(GatewayError::parse(line, e.to_string()))
                }
            };

            if let Err(e) = &request {
                tracing::debug!(row, "undecodable row: {}", e);
            }

            batch.push(SubmissionRow { row, request });
        }

        Ok(batch)
    }
}
