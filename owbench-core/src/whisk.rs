use std::time::{Duration, Instant};

use bytes::Bytes;
use owbench_http::{HttpClient, HttpRequest};
use serde_json::Value;

use crate::config::{BenchConfig, InvokeMode};
use crate::record::InvocationResult;

pub type Result<T> = std::result::Result<T, InvokeError>;

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("invalid apihost url: {0}")]
    InvalidApiHost(String),

    #[error("failed to encode payload: {0}")]
    PayloadEncode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] owbench_http::Error),

    #[error("submit response carried no activationId (status {status})")]
    MissingActivationId { status: u16 },

    #[error("activation {activation_id} did not complete within {limit:?}")]
    PollTimeout {
        activation_id: String,
        limit: Duration,
    },
}

/// One benchmark invocation against the FaaS endpoint. Abstracted so the
/// driver can be exercised without a network.
pub trait Invoker {
    fn invoke(&self, cfg: &BenchConfig) -> impl Future<Output = Result<InvocationResult>> + Send;
}

/// Client for the OpenWhisk-style REST control plane.
#[derive(Debug, Clone)]
pub struct WhiskClient {
    http: HttpClient,
    apihost: String,
    authorization: String,
}

impl WhiskClient {
    #[must_use]
    pub fn new(apihost: String, authorization: String) -> Self {
        Self {
            http: HttpClient::default(),
            apihost,
            authorization,
        }
    }

    /// `POST {apihost}/namespaces/_/actions/{function}?blocking=...&result=true&workers={n}`
    fn action_url(&self, function: &str, blocking: bool, workers: u32) -> Result<String> {
        let mut url = self.base_url()?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| InvokeError::InvalidApiHost(self.apihost.clone()))?;
            segments
                .pop_if_empty()
                .push("namespaces")
                .push("_")
                .push("actions")
                .push(function);
        }
        url.query_pairs_mut()
            .append_pair("blocking", if blocking { "true" } else { "false" })
            .append_pair("result", "true")
            .append_pair("workers", &workers.to_string());
        Ok(url.into())
    }

    /// `GET {apihost}/namespaces/_/activations/{activationId}`
    fn activation_url(&self, activation_id: &str) -> Result<String> {
        let mut url = self.base_url()?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| InvokeError::InvalidApiHost(self.apihost.clone()))?;
            segments
                .pop_if_empty()
                .push("namespaces")
                .push("_")
                .push("activations")
                .push(activation_id);
        }
        Ok(url.into())
    }

    fn base_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.apihost)
            .map_err(|_| InvokeError::InvalidApiHost(self.apihost.clone()))
    }

    fn payload_bytes(&self, cfg: &BenchConfig) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(&cfg.payload)?))
    }

    /// One synchronous exchange; the response body is the activation record.
    pub async fn invoke_blocking(&self, cfg: &BenchConfig) -> Result<InvocationResult> {
        let url = self.action_url(&cfg.function, true, cfg.workers)?;
        let body = self.payload_bytes(cfg)?;

        let started = Instant::now();
        let res = self
            .http
            .request(
                HttpRequest::post_json(url, body)
                    .with_authorization(&self.authorization)
                    .with_timeout(Some(cfg.time_limit)),
            )
            .await?;

        Ok(InvocationResult {
            status: res.status,
            body: res.body,
            client_elapsed: started.elapsed(),
        })
    }

    /// Submit without blocking, then poll the activation at `poll_interval`
    /// until HTTP 200 or `time_limit` elapses. Elapsed time spans from the
    /// submission to the terminal poll response.
    pub async fn invoke_polling(&self, cfg: &BenchConfig) -> Result<InvocationResult> {
        let submit_url = self.action_url(&cfg.function, false, cfg.workers)?;
        let body = self.payload_bytes(cfg)?;

        let started = Instant::now();
        let submitted = self
            .http
            .request(
                HttpRequest::post_json(submit_url, body)
                    .with_authorization(&self.authorization)
                    .with_timeout(Some(cfg.time_limit)),
            )
            .await?;

        let activation_id = parse_activation_id(&submitted.body).ok_or(
            InvokeError::MissingActivationId {
                status: submitted.status,
            },
        )?;
        let poll_url = self.activation_url(&activation_id)?;

        loop {
            // Each poll only gets whatever is left of the invocation's budget,
            // so a hung request cannot stretch past `time_limit`.
            let remaining = cfg.time_limit.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(InvokeError::PollTimeout {
                    activation_id,
                    limit: cfg.time_limit,
                });
            }

            let res = self
                .http
                .request(
                    HttpRequest::get(poll_url.clone())
                        .with_authorization(&self.authorization)
                        .with_timeout(Some(remaining)),
                )
                .await?;

            // Anything but 200 means the activation record is not ready yet.
            if res.status == 200 {
                return Ok(InvocationResult {
                    status: res.status,
                    body: res.body,
                    client_elapsed: started.elapsed(),
                });
            }

            if started.elapsed() >= cfg.time_limit {
                return Err(InvokeError::PollTimeout {
                    activation_id,
                    limit: cfg.time_limit,
                });
            }

            tokio::time::sleep(cfg.poll_interval).await;
        }
    }
}

impl Invoker for WhiskClient {
    async fn invoke(&self, cfg: &BenchConfig) -> Result<InvocationResult> {
        match cfg.mode {
            InvokeMode::Blocking => self.invoke_blocking(cfg).await,
            InvokeMode::Polling => self.invoke_polling(cfg).await,
        }
    }
}

fn parse_activation_id(body: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(body).ok()?;
    body.get("activationId")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client() -> WhiskClient {
        WhiskClient::new(
            "http://172.17.0.1:3233/api/v1".to_string(),
            "Basic Zm9vOmJhcg==".to_string(),
        )
    }

    #[test]
    fn action_url_matches_the_control_plane_layout() {
        let url = client().action_url("noop", true, 3).unwrap();
        assert_eq!(
            url,
            "http://172.17.0.1:3233/api/v1/namespaces/_/actions/noop?blocking=true&result=true&workers=3"
        );
    }

    #[test]
    fn action_url_tolerates_trailing_slash_and_encodes_names() {
        let c = WhiskClient::new(
            "http://localhost:3233/api/v1/".to_string(),
            String::new(),
        );
        let url = c.action_url("my pkg/fn", false, 1).unwrap();
        assert!(url.starts_with("http://localhost:3233/api/v1/namespaces/_/actions/my%20pkg%2Ffn?"));
        assert!(url.contains("blocking=false"));
    }

    #[test]
    fn activation_url_targets_the_activation_record() {
        let url = client().activation_url("abc123").unwrap();
        assert_eq!(
            url,
            "http://172.17.0.1:3233/api/v1/namespaces/_/activations/abc123"
        );
    }

    #[test]
    fn invalid_apihost_is_reported_as_such() {
        let c = WhiskClient::new("not a url".to_string(), String::new());
        match c.action_url("noop", true, 1) {
            Err(InvokeError::InvalidApiHost(host)) => assert_eq!(host, "not a url"),
            other => panic!("expected InvalidApiHost, got {other:?}"),
        }
    }

    #[test]
    fn activation_id_is_read_from_the_submit_body() {
        let body = br#"{"activationId": "8b2f"}"#;
        assert_eq!(parse_activation_id(body), Some("8b2f".to_string()));
        assert_eq!(parse_activation_id(b"{}"), None);
        assert_eq!(parse_activation_id(b"garbage"), None);
    }
}
