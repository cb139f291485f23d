//! CSV format handling for batch submissions and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvSubmission structure for deserialization
//! - Conversion from CSV records to submission requests
//! - Serialization of submission outcomes and masked payment views
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    GatewayError, MaskedPaymentView, RowNumber, SubmissionOutcome, TransactionRequest,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header of the per-row responses report
pub const RESPONSES_HEADER: [&str; 5] = ["row", "payment_id", "status", "reason", "error"];

/// Header of the stored payments report
pub const PAYMENTS_HEADER: [&str; 9] = [
    "payment_id",
    "status_code",
    "message",
    "amount",
    "currency",
    "card_owner",
    "card_number",
    "expiration_date",
    "ccv",
];

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// card_owner, card_number, expiration_date, ccv, amount, currency.
/// Every column is read as text so that card numbers and CCVs keep their
/// leading zeros; the amount is parsed separately.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvSubmission {
    pub card_owner: String,
    pub card_number: String,
    pub expiration_date: String,
    pub ccv: String,
    pub amount: String,
    pub currency: String,
}

/// Line of the input file holding a data row, assuming a single header line
pub fn line_of_row(row: RowNumber) -> u64 {
    row + 1
}

/// Convert a CsvSubmission to a TransactionRequest
///
/// Only the amount needs converting. Field formats are left to the validator
/// so that invalid values surface with their validation messages.
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
/// * `row` - Row number of the record, used for error reporting
///
/// # Errors
///
/// Returns `GatewayError::Parse` if the amount is not a decimal number.
pub fn convert_submission(
    record: CsvSubmission,
    row: RowNumber,
) -> Result<TransactionRequest, GatewayError> {
    let amount = Decimal::from_str(&record.amount).map_err(|_| {
        GatewayError::parse(
            Some(line_of_row(row)),
            format!("Invalid amount '{}'", record.amount),
        )
    })?;

    Ok(TransactionRequest {
        card_owner: record.card_owner,
        card_number: record.card_number,
        expiration_date: record.expiration_date,
        ccv: record.ccv,
        amount,
        currency: record.currency,
    })
}

/// Write submission outcomes to CSV format
///
/// Writes one line per outcome with columns: row, payment_id, status, reason,
/// error. Outcomes are sorted by row for deterministic output. Failed rows
/// leave the payment columns empty and carry their caller-facing message in
/// `error`.
pub fn write_responses_csv(
    outcomes: &[SubmissionOutcome],
    output: &mut dyn Write,
) -> Result<(), GatewayError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(RESPONSES_HEADER)?;

    let mut sorted: Vec<&SubmissionOutcome> = outcomes.iter().collect();
    sorted.sort_by_key(|outcome| outcome.row);

    for outcome in sorted {
        let row = outcome.row.to_string();
        match &outcome.result {
            Ok(response) => writer.write_record([
                row.as_str(),
                response.payment_id.to_string().as_str(),
                response.status.as_str(),
                response.reason.as_deref().unwrap_or(""),
                "",
            ])?,
            Err(error) => {
                let message = error.public_message();
                writer.write_record([row.as_str(), "", "", "", message.as_str()])?
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write masked payment views to CSV format
///
/// Views are written in the order given; the retrieval service already
/// orders them by payment id.
pub fn write_payments_csv(
    views: &[MaskedPaymentView],
    output: &mut dyn Write,
) -> Result<(), GatewayError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(PAYMENTS_HEADER)?;

    for view in views {
        writer.write_record([
            view.payment_id.to_string().as_str(),
            view.status_code.as_str(),
            view.message.as_str(),
            view.amount.to_string().as_str(),
            view.currency.as_str(),
            view.card_owner.as_str(),
            view.card_number.as_str(),
            view.expiration_date.as_str(),
            view.ccv.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentOutcome, PaymentResponse, TransactionField};
    use rstest::rstest;

    fn submission(amount: &str) -> CsvSubmission {
        CsvSubmission {
            card_owner: "John Doe".to_string(),
            card_number: "4012888888881881".to_string(),
            expiration_date: "12/25".to_string(),
            ccv: "012".to_string(),
            amount: amount.to_string(),
            currency: "USD".to_string(),
        }
    }

    #[rstest]
    #[case("50", Decimal::new(50, 0))]
    #[case("19.99", Decimal::new(1999, 2))]
    #[case("-5", Decimal::new(-5, 0))]
    #[case("0", Decimal::ZERO)]
    fn test_convert_submission_parses_amount(#[case] amount: &str, #[case] expected: Decimal) {
        let request = convert_submission(submission(amount), 1).unwrap();
        assert_eq!(request.amount, expected);
        assert_eq!(request.ccv, "012");
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("fifty")]
    fn test_convert_submission_rejects_bad_amount(#[case] amount: &str) {
        let error = convert_submission(submission(amount), 3).unwrap_err();
        assert_eq!(
            error,
            GatewayError::parse(Some(4), format!("Invalid amount '{}'", amount))
        );
    }

    #[test]
    fn test_write_responses_csv() {
        let outcomes = vec![
            SubmissionOutcome {
                row: 2,
                result: Ok(PaymentResponse {
                    payment_id: 2,
                    status: PaymentOutcome::Rejected,
                    reason: Some("Error during payment".to_string()),
                }),
            },
            SubmissionOutcome {
                row: 1,
                result: Ok(PaymentResponse {
                    payment_id: 1,
                    status: PaymentOutcome::Successful,
                    reason: None,
                }),
            },
            SubmissionOutcome {
                row: 3,
                result: Err(GatewayError::validation(
                    TransactionField::CardOwner,
                    "Invalid card owner format. Use 'Firstname Lastname'.",
                )),
            },
            SubmissionOutcome {
                row: 4,
                result: Err(GatewayError::bank_communication("connection refused")),
            },
        ];
        let mut output = Vec::new();

        write_responses_csv(&outcomes, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "row,payment_id,status,reason,error\n\
             1,1,payment successful,,\n\
             2,2,payment rejected,Error during payment,\n\
             3,,,,Invalid card owner format. Use 'Firstname Lastname'.\n\
             4,,,,Payment could not be processed\n"
        );
    }

    #[test]
    fn test_write_responses_csv_empty() {
        let mut output = Vec::new();
        write_responses_csv(&[], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "row,payment_id,status,reason,error\n"
        );
    }

    #[test]
    fn test_write_payments_csv() {
        let views = vec![MaskedPaymentView {
            payment_id: 1,
            status_code: "200".to_string(),
            message: "Payment executed successfully".to_string(),
            amount: Decimal::new(5000, 2),
            currency: "USD".to_string(),
            card_owner: "John Doe".to_string(),
            card_number: "************1881".to_string(),
            expiration_date: "12/25".to_string(),
            ccv: "123".to_string(),
        }];
        let mut output = Vec::new();

        write_payments_csv(&views, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "payment_id,status_code,message,amount,currency,card_owner,card_number,expiration_date,ccv"
        );
        assert_eq!(
            lines[1],
            "1,200,Payment executed successfully,50.00,USD,John Doe,************1881,12/25,123"
        );
    }
}
