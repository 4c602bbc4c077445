//! Configuration of the HTTP batch validator.

use std::time::Duration;

use bridge_relayer_primitives::chain::Chain;
use reqwest::Url;

use crate::errors::{ValidatorError, ValidatorResult};

/// Lowest request timeout accepted by [`BatchValidatorConfig::validate`].
pub const MIN_REQUEST_TIME: Duration = Duration::from_millis(1);

/// Parameters of an [`HttpBatchValidator`](crate::HttpBatchValidator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchValidatorConfig {
    /// The chain the batch was read from.
    pub source_chain: Chain,

    /// The chain the batch is relayed to.
    pub destination_chain: Chain,

    /// Base URL of the microservice, without the chain suffix.
    pub request_url: String,

    /// Timeout applied to every request.
    pub request_time: Duration,
}

impl BatchValidatorConfig {
    /// Checks the configuration and returns the full endpoint,
    /// `{request_url}/{source_chain}/{destination_chain}`.
    pub fn validate(&self) -> ValidatorResult<Url> {
        if self.request_time < MIN_REQUEST_TIME {
            return Err(ValidatorError::InvalidRequestTime(self.request_time));
        }

        let endpoint = format!(
            "{}/{}/{}",
            self.request_url.trim_end_matches('/'),
            self.source_chain,
            self.destination_chain
        );

        Url::parse(&endpoint).map_err(|e| ValidatorError::InvalidUrl {
            url: self.request_url.clone(),
            reason: e.to_string(),
        })
    }
}
