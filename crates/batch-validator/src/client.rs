//! Clients of the batch validation microservice.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use bridge_relayer_primitives::batch::TransferBatch;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::BatchValidatorConfig,
    errors::{ValidatorError, ValidatorResult},
};

/// Decides whether a batch read from a source chain may be relayed.
#[async_trait]
pub trait BatchValidator: fmt::Debug + Send + Sync {
    /// Returns the verdict of the validator on `batch`.
    async fn validate_batch(&self, batch: &TransferBatch) -> ValidatorResult<bool>;
}

#[derive(Debug, Deserialize)]
struct MicroserviceResponse {
    valid: bool,
}

/// Asks an HTTP microservice whether a batch is valid.
///
/// The batch is posted as JSON to `{request_url}/{source_chain}/{destination_chain}` and the
/// service is expected to answer with `{"valid": <bool>}`.
#[derive(Debug, Clone)]
pub struct HttpBatchValidator {
    endpoint: Url,
    request_time: Duration,
    client: Client,
}

impl HttpBatchValidator {
    /// Creates a new validator from a checked configuration.
    pub fn new(config: &BatchValidatorConfig) -> ValidatorResult<Self> {
        let endpoint = config.validate()?;
        let client = Client::builder()
            .build()
            .map_err(ValidatorError::Client)?;

        debug!(%endpoint, request_time = ?config.request_time, "batch validator created");

        Ok(Self {
            endpoint,
            request_time: config.request_time,
            client,
        })
    }

    /// The endpoint batches are posted to.
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl BatchValidator for HttpBatchValidator {
    async fn validate_batch(&self, batch: &TransferBatch) -> ValidatorResult<bool> {
        let body = serde_json::to_vec(batch).map_err(ValidatorError::Marshal)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(self.request_time)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            warn!(batch_id = %batch.id, %status, "batch validator answered with an error");

            return Err(ValidatorError::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.is_empty() {
            return Err(ValidatorError::EmptyResponse);
        }

        let response: MicroserviceResponse =
            serde_json::from_slice(&bytes).map_err(ValidatorError::Unmarshal)?;
        debug!(batch_id = %batch.id, valid = %response.valid, "batch validated");

        Ok(response.valid)
    }
}

/// A validator that accepts every batch, used when the microservice is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBatchValidator;

#[async_trait]
impl BatchValidator for DisabledBatchValidator {
    async fn validate_batch(&self, _batch: &TransferBatch) -> ValidatorResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{http::StatusCode, routing::post, Json, Router};
    use bridge_relayer_primitives::{batch::DepositTransfer, chain::Chain};
    use num_bigint::BigUint;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    async fn accepts_batch_seven(Json(batch): Json<TransferBatch>) -> Json<Value> {
        Json(json!({ "valid": batch.id == 7 }))
    }

    async fn malformed() -> &'static str {
        "{\"valid\": tru"
    }

    async fn empty() -> StatusCode {
        StatusCode::OK
    }

    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Json(json!({ "valid": true }))
    }

    async fn failing() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    async fn spawn_microservice() -> SocketAddr {
        let app = Router::new()
            .route("/valid/ethereum/elrond", post(accepts_batch_seven))
            .route("/malformed/ethereum/elrond", post(malformed))
            .route("/empty/ethereum/elrond", post(empty))
            .route("/slow/ethereum/elrond", post(slow))
            .route("/failing/ethereum/elrond", post(failing));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn validator(addr: SocketAddr, path: &str, request_time: Duration) -> HttpBatchValidator {
        HttpBatchValidator::new(&BatchValidatorConfig {
            source_chain: Chain::Ethereum,
            destination_chain: Chain::Elrond,
            request_url: format!("http://{addr}/{path}"),
            request_time,
        })
        .unwrap()
    }

    fn batch(id: u64) -> TransferBatch {
        TransferBatch::new(
            id,
            vec![DepositTransfer {
                nonce: 1,
                to_bytes: vec![1; 32],
                displayable_to: "erd1recipient".to_string(),
                from_bytes: vec![2; 20],
                displayable_from: "0xdepositor".to_string(),
                token_bytes: vec![3; 20],
                displayable_token: "0xtoken".to_string(),
                amount: BigUint::from(100u32),
            }],
        )
    }

    #[tokio::test]
    async fn test_valid_batch() {
        let addr = spawn_microservice().await;
        let validator = validator(addr, "valid", Duration::from_secs(2));

        assert!(validator.validate_batch(&batch(7)).await.unwrap());
        assert!(!validator.validate_batch(&batch(8)).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let addr = spawn_microservice().await;
        let validator = validator(addr, "malformed", Duration::from_secs(2));

        let err = validator.validate_batch(&batch(7)).await.unwrap_err();
        assert!(matches!(err, ValidatorError::Unmarshal(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_response_is_an_error() {
        let addr = spawn_microservice().await;
        let validator = validator(addr, "empty", Duration::from_secs(2));

        let err = validator.validate_batch(&batch(7)).await.unwrap_err();
        assert!(matches!(err, ValidatorError::EmptyResponse), "got {err:?}");
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let addr = spawn_microservice().await;
        let validator = validator(addr, "slow", Duration::from_millis(50));

        let err = validator.validate_batch(&batch(7)).await.unwrap_err();
        match err {
            ValidatorError::Request(e) => assert!(e.is_timeout(), "got {e:?}"),
            other => panic!("expected a request error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let addr = spawn_microservice().await;
        let validator = validator(addr, "failing", Duration::from_secs(2));

        let err = validator.validate_batch(&batch(7)).await.unwrap_err();
        assert!(
            matches!(
                &err,
                ValidatorError::UnexpectedStatus { status, body }
                    if *status == StatusCode::INTERNAL_SERVER_ERROR && body == "boom"
            ),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let validator = validator(addr, "valid", Duration::from_secs(2));

        assert!(matches!(
            validator.validate_batch(&batch(7)).await,
            Err(ValidatorError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_validator_accepts_everything() {
        assert!(DisabledBatchValidator
            .validate_batch(&batch(8))
            .await
            .unwrap());
    }
}
