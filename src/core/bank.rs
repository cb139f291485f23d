//! Acquiring bank clients
//!
//! Two implementations of [`AcquiringBank`] exist, and
//! [`AcquiringBankClient::from_config`] picks one from the `test_mode` flag:
//!
//! - [`MockAcquiringBank`] decides from the owner name alone: names ending in
//!   `Fail` are rejected with code 400, everything else is accepted with 200.
//! - [`HttpAcquiringBank`] posts the transaction as JSON to the configured
//!   endpoint, with the API key in the `appid` query parameter, and decodes a
//!   `{code, message}` JSON reply.
//!
//! Neither retries. A transport or decoding failure is a
//! `BankCommunication` error.

use crate::config::BankConfig;
use crate::core::traits::AcquiringBank;
use crate::types::{BankResponse, GatewayError, ValidatedTransaction};
use std::fmt;

pub const MOCK_FAILURE_SUFFIX: &str = "Fail";
pub const MOCK_SUCCESS_MESSAGE: &str = "Payment executed successfully";
pub const MOCK_FAILURE_MESSAGE: &str = "Error during payment";

/// Deterministic stand-in for the acquiring bank
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAcquiringBank;

impl AcquiringBank for MockAcquiringBank {
    fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError> {
        if transaction.card_owner.ends_with(MOCK_FAILURE_SUFFIX) {
            Ok(BankResponse::new(400, MOCK_FAILURE_MESSAGE))
        } else {
            Ok(BankResponse::new(200, MOCK_SUCCESS_MESSAGE))
        }
    }
}

/// Client for a real acquiring bank endpoint
pub struct HttpAcquiringBank {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
}

impl HttpAcquiringBank {
    /// Build the HTTP client for the configured endpoint
    ///
    /// Must not be called from within an async runtime.
    pub fn new(config: &BankConfig) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to build bank client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl AcquiringBank for HttpAcquiringBank {
    fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError> {
        // The reply body is decoded whatever the HTTP status: a rejection
        // may come back as a 4xx carrying the bank's code and message.
        let response = self
            .client
            .post(&self.api_url)
            .query(&[("appid", self.api_key.as_str())])
            .json(transaction)
            .send()?;

        let status = response.status();
        response.json::<BankResponse>().map_err(|e| {
            GatewayError::bank_communication(format!(
                "Undecodable reply from acquiring bank (HTTP {}): {}",
                status, e
            ))
        })
    }
}

impl fmt::Debug for HttpAcquiringBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAcquiringBank")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Acquiring bank client selected by configuration
#[derive(Debug)]
pub enum AcquiringBankClient {
    Mock(MockAcquiringBank),
    Live(HttpAcquiringBank),
}

impl AcquiringBankClient {
    /// Pick the mock or the live client from `config.test_mode`
    pub fn from_config(config: &BankConfig) -> Result<Self, GatewayError> {
        if config.test_mode {
            tracing::info!("acquiring bank running in test mode");
            Ok(AcquiringBankClient::Mock(MockAcquiringBank))
        } else {
            tracing::info!(api_url = %config.api_url, "acquiring bank running in live mode");
            Ok(AcquiringBankClient::Live(HttpAcquiringBank::new(config)?))
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, AcquiringBankClient::Mock(_))
    }
}

impl AcquiringBank for AcquiringBankClient {
    fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError> {
        match self {
            AcquiringBankClient::Mock(bank) => bank.submit(transaction),
            AcquiringBankClient::Live(bank) => bank.submit(transaction),
        }
    }
}
