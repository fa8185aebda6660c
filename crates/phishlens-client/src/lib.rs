#![warn(missing_docs)]
//! # phishlens-client
//!
//! ## Purpose
//! Issues the outbound calls to the classification backend.
//!
//! ## Responsibilities
//! - Validate the backend base URL and derive `/predict` and `/health`.
//! - Send one `POST /predict` per submission through an injectable transport.
//! - Classify replies into decoded results, application rejections, and
//!   transport failures.
//! - Provide a blocking `reqwest` transport for the CLI.
//!
//! ## Data flow
//! Trimmed URL -> [`PredictRequest`] -> [`PredictTransport::post_json`] ->
//! [`RawResponse`] -> [`PredictResponse`].
//!
//! ## Ownership and lifetimes
//! The transport is shared behind `Arc<dyn PredictTransport>` so tests and the
//! CLI can swap implementations without changing client lifetimes.
//!
//! ## Error model
//! No response at all is [`ClientError::Transport`]. A non-2xx response is not
//! an error: it is returned as [`PredictResponse::Rejected`] carrying the
//! server message when one was supplied. An undecodable 2xx body is
//! [`ClientError::Contract`].
//!
//! ## Security and privacy notes
//! The client never logs the submitted URL; callers log a redacted form.
//! There is no timeout unless one is configured on [`HttpTransport`].

use std::sync::Arc;
use std::time::Duration;

use phishlens_analysis_contract::{
    AnalysisContractError, AnalysisResult, HealthStatus, PredictRequest, parse_analysis_result,
    parse_error_message, parse_health_status,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Prediction path, relative to the base URL.
pub const PREDICT_PATH: &str = "predict";

/// Health probe path, relative to the base URL.
pub const HEALTH_PATH: &str = "health";

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by [`PredictClient`].
pub trait PredictTransport: Send + Sync {
    /// Sends `request` as a JSON body to `endpoint`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] only when no response was received.
    fn post_json(
        &self,
        endpoint: &Url,
        request: &PredictRequest,
    ) -> Result<RawResponse, ClientError>;

    /// Sends a `GET` to `endpoint`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] only when no response was received.
    fn get(&self, endpoint: &Url) -> Result<RawResponse, ClientError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport. A `timeout` of `None` waits indefinitely.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|error| ClientError::Transport(format!("http client setup failed: {error}")))?;
        Ok(Self { client })
    }
}

impl PredictTransport for HttpTransport {
    fn post_json(
        &self,
        endpoint: &Url,
        request: &PredictRequest,
    ) -> Result<RawResponse, ClientError> {
        let response = self
            .client
            .post(endpoint.clone())
            .json(request)
            .send()
            .map_err(|error| ClientError::Transport(error.to_string()))?;
        read_response(response)
    }

    fn get(&self, endpoint: &Url) -> Result<RawResponse, ClientError> {
        let response = self
            .client
            .get(endpoint.clone())
            .send()
            .map_err(|error| ClientError::Transport(error.to_string()))?;
        read_response(response)
    }
}

fn read_response(response: reqwest::blocking::Response) -> Result<RawResponse, ClientError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|error| ClientError::Transport(format!("body read failed: {error}")))?;
    Ok(RawResponse { status, body })
}

/// Classified reply to one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictResponse {
    /// 2xx reply decoded as an analysis result.
    Analysis(AnalysisResult),
    /// Non-2xx reply.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `error` message, when present and non-blank.
        message: Option<String>,
    },
}

/// Client bound to one backend base URL.
#[derive(Clone)]
pub struct PredictClient {
    base: Url,
    transport: Arc<dyn PredictTransport>,
}

impl PredictClient {
    /// Creates a client for a validated base URL.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when the base URL is not an
    /// absolute `http`/`https` URL with a host.
    pub fn new(base: &str, transport: Arc<dyn PredictTransport>) -> Result<Self, ClientError> {
        Ok(Self {
            base: validate_base_url(base)?,
            transport,
        })
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full `/predict` URL.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when the path cannot be joined.
    pub fn predict_url(&self) -> Result<Url, ClientError> {
        join_endpoint(&self.base, PREDICT_PATH)
    }

    /// Full `/health` URL.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when the path cannot be joined.
    pub fn health_url(&self) -> Result<Url, ClientError> {
        join_endpoint(&self.base, HEALTH_PATH)
    }

    /// Requests a classification for `url`.
    ///
    /// # Errors
    /// Returns [`ClientError::Contract`] for a blank URL or an undecodable 2xx
    /// body, and [`ClientError::Transport`] when no response arrived.
    pub fn predict(&self, url: &str) -> Result<PredictResponse, ClientError> {
        let request = PredictRequest::new(url)?;
        let endpoint = self.predict_url()?;

        let response = self.transport.post_json(&endpoint, &request)?;
        debug!(
            endpoint = %endpoint,
            status = response.status,
            body_len = response.body.len(),
            "predict response received"
        );

        if !response.is_success() {
            return Ok(PredictResponse::Rejected {
                status: response.status,
                message: parse_error_message(&response.body),
            });
        }

        Ok(PredictResponse::Analysis(parse_analysis_result(&response.body)?))
    }

    /// Probes backend readiness.
    ///
    /// # Errors
    /// Returns [`ClientError::Status`] for non-2xx replies,
    /// [`ClientError::Contract`] for malformed bodies, and
    /// [`ClientError::Transport`] when no response arrived.
    pub fn health(&self) -> Result<HealthStatus, ClientError> {
        let endpoint = self.health_url()?;
        let response = self.transport.get(&endpoint)?;
        debug!(endpoint = %endpoint, status = response.status, "health response received");

        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                message: parse_error_message(&response.body),
            });
        }

        Ok(parse_health_status(&response.body)?)
    }
}

/// Validates and normalizes a backend base URL.
///
/// The returned URL has no query or fragment and its path ends with `/`, so
/// relative joins append instead of replacing the last segment.
///
/// # Errors
/// Returns [`ClientError::InvalidEndpoint`] for unparsable URLs, non-HTTP
/// schemes, or a missing host.
pub fn validate_base_url(base: &str) -> Result<Url, ClientError> {
    let mut parsed = Url::parse(base.trim())
        .map_err(|error| ClientError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidEndpoint(
            "base url must include a host".to_string(),
        ));
    }

    parsed.set_query(None);
    parsed.set_fragment(None);
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    base.join(path)
        .map_err(|error| ClientError::InvalidEndpoint(format!("cannot join '{path}': {error}")))
}

/// Errors produced by the prediction client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL violates endpoint requirements.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Request or response violated the wire contract.
    #[error(transparent)]
    Contract(#[from] AnalysisContractError),
    /// Non-2xx reply where a success was required.
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, when present.
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for endpoint validation and joining.

    use super::*;

    #[test]
    fn joins_paths_onto_normalized_base() {
        let base = validate_base_url("http://127.0.0.1:5000").expect("base should validate");
        assert_eq!(
            join_endpoint(&base, PREDICT_PATH).expect("join").as_str(),
            "http://127.0.0.1:5000/predict"
        );

        let nested = validate_base_url("https://scanner.example/api?x=1#frag")
            .expect("nested base should validate");
        assert_eq!(nested.as_str(), "https://scanner.example/api/");
        assert_eq!(
            join_endpoint(&nested, HEALTH_PATH).expect("join").as_str(),
            "https://scanner.example/api/health"
        );
    }

    #[test]
    fn rejects_unsupported_endpoints() {
        assert!(validate_base_url("ftp://scanner.example").is_err());
        assert!(validate_base_url("file:///tmp/socket").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn success_range_is_2xx() {
        let response = |status| RawResponse {
            status,
            body: String::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(302).is_success());
        assert!(!response(500).is_success());
    }
}
