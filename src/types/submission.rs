//! Batch submission types
//!
//! Batch input is read row by row. A row either decodes into a
//! [`TransactionRequest`] or carries the error explaining why it did not, and
//! every row yields exactly one [`SubmissionOutcome`].

use super::error::GatewayError;
use super::payment::PaymentResponse;
use super::transaction::TransactionRequest;

/// Row number within a batch input, starting at 1 for the first data row
pub type RowNumber = u64;

/// One decoded (or undecodable) row of batch input
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRow {
    pub row: RowNumber,
    pub request: Result<TransactionRequest, GatewayError>,
}

/// Result of submitting one row
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub row: RowNumber,
    pub result: Result<PaymentResponse, GatewayError>,
}
