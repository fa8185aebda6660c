#![warn(missing_docs)]
//! # phishlens-analysis-contract
//!
//! ## Purpose
//! Defines the wire contract between the `phishlens` client and the URL
//! classification backend.
//!
//! ## Responsibilities
//! - Decode untrusted, partially populated analysis results.
//! - Derive the binary verdict from the backend's result label.
//! - Model the predict request, error body, and health probe payloads.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_analysis_result`] -> [`AnalysisResult`] ->
//! projection and presentation crates.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs so a result can outlive the network buffer
//! it was decoded from. A result is read-only once decoded; callers never merge
//! two results.
//!
//! ## Error model
//! Invalid JSON returns [`AnalysisContractError::Decode`]; a non-object body
//! returns [`AnalysisContractError::InvalidContract`].
//! Inside the object every field tolerates absence, `null`, or a wrong type:
//! scalars stand in for strings, anything else decodes as absent. Partial
//! payloads therefore decode successfully and degrade at render time.
//!
//! ## Security and privacy notes
//! This crate handles classifier output only. The submitted URL is carried
//! verbatim and must be redacted by callers before logging.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Result label that selects the phishing verdict. Any other label is safe.
pub const PHISHING_LABEL: &str = "Phishing";

/// Health status reported by a ready backend.
pub const HEALTH_STATUS_ONLINE: &str = "online";

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// URL was classified as phishing.
    Phishing,
    /// URL was classified as anything other than phishing.
    Safe,
}

impl Verdict {
    /// Maps a backend result label to a verdict.
    ///
    /// Only an exact, case-sensitive match on `"Phishing"` yields
    /// [`Verdict::Phishing`].
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(PHISHING_LABEL) => Self::Phishing,
            _ => Self::Safe,
        }
    }

    /// Returns `true` for [`Verdict::Phishing`].
    pub fn is_phishing(self) -> bool {
        self == Self::Phishing
    }
}

/// One analysis response from the `/predict` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// URL as normalized and analysed by the backend.
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    /// Result label (`"Phishing"`, `"Legitimate"`, `"Safe"`, ...).
    #[serde(default, deserialize_with = "lenient_text")]
    pub result: Option<String>,
    /// Confidence of the returned verdict, nominally in `[0, 1]`.
    #[serde(default, deserialize_with = "lenient_number")]
    pub probability: Option<f64>,
    /// Human-readable reasons supporting a phishing verdict.
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub reasons: Option<Vec<String>>,
    /// Registrar metadata.
    #[serde(default, deserialize_with = "lenient_object")]
    pub domain_info: Option<DomainInfo>,
    /// Raw numeric features extracted from the URL.
    #[serde(default)]
    pub features: FeatureMap,
    /// DNS records keyed by record type, in document order.
    #[serde(default, deserialize_with = "lenient_object")]
    pub dns_info: Option<DnsRecords>,
    /// Live site probe results.
    #[serde(default, deserialize_with = "lenient_object")]
    pub site_data: Option<SiteData>,
}

impl AnalysisResult {
    /// Returns the verdict carried by this result.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(self.result.as_deref())
    }
}

/// Registrar metadata. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// Registrar name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub registrar: Option<String>,
    /// Registrant organization.
    #[serde(default, deserialize_with = "lenient_text")]
    pub org: Option<String>,
    /// Registrant country.
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
    /// Domain creation date as reported by WHOIS.
    #[serde(default, deserialize_with = "lenient_text")]
    pub creation_date: Option<String>,
}

/// Live site probe results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteData {
    /// Page title.
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// `Server` response header.
    #[serde(default, deserialize_with = "lenient_text")]
    pub server_header: Option<String>,
    /// Meta description. Retained but not displayed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Whether a password input was found on the page.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_login_form: Option<bool>,
}

impl SiteData {
    /// Returns `true` only when the probe positively reported a login form.
    pub fn login_form_detected(&self) -> bool {
        self.has_login_form.unwrap_or(false)
    }
}

/// Numeric feature values keyed by feature name.
///
/// Entries whose JSON value is not a number are dropped during decode, and an
/// absent, `null`, or non-object feature value decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureMap(BTreeMap<String, f64>);

impl FeatureMap {
    /// Returns the value for `key` when present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Returns the number of numeric features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no numeric features are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl<'de> Deserialize<'de> for FeatureMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(raw) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|number| (key, number)))
            .collect();
        Ok(Self(values))
    }
}

/// Records for one DNS record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordSet {
    /// Record type such as `A` or `MX`.
    pub record_type: String,
    /// Records in resolver order.
    pub records: Vec<String>,
}

/// DNS records grouped by type, preserving the order of the JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecords(Vec<DnsRecordSet>);

impl DnsRecords {
    /// Builds record groups from `(type, records)` pairs.
    pub fn new(sets: Vec<DnsRecordSet>) -> Self {
        Self(sets)
    }

    /// Iterates record groups in document order.
    pub fn iter(&self) -> impl Iterator<Item = &DnsRecordSet> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for DnsRecords {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DnsRecordsVisitor)
    }
}

struct DnsRecordsVisitor;

impl<'de> Visitor<'de> for DnsRecordsVisitor {
    type Value = DnsRecords;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of DNS record type to record list")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut sets = Vec::new();
        while let Some((record_type, records)) = map.next_entry::<String, Value>()? {
            sets.push(DnsRecordSet {
                record_type,
                records: text_list(records).unwrap_or_default(),
            });
        }
        Ok(DnsRecords(sets))
    }
}

impl Serialize for DnsRecords {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for set in &self.0 {
            map.serialize_entry(&set.record_type, &set.records)?;
        }
        map.end()
    }
}

/// Body of an outbound `/predict` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Candidate URL, trimmed.
    pub url: String,
}

impl PredictRequest {
    /// Creates a request from user input.
    ///
    /// # Errors
    /// Returns [`AnalysisContractError::InvalidContract`] when the trimmed URL
    /// is empty.
    pub fn new(url: &str) -> Result<Self, AnalysisContractError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnalysisContractError::InvalidContract(
                "url is empty".to_string(),
            ));
        }

        Ok(Self {
            url: url.to_string(),
        })
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Server-supplied error message.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the `/health` probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service status, `"online"` when ready.
    pub status: String,
    /// Optional operator message.
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Returns `true` when the backend reports itself online.
    pub fn is_online(&self) -> bool {
        self.status == HEALTH_STATUS_ONLINE
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text_list(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(scalar_text).collect()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(text_list)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.as_f64())
}

// Follows the backend's truthiness: non-zero numbers and non-empty strings count.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|value| value != 0.0)),
        Value::String(text) => Some(!text.is_empty()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Parses a success body into an analysis result.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON and
/// [`AnalysisContractError::InvalidContract`] when the body is not a JSON
/// object. Mistyped fields inside the object decode as absent.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, AnalysisContractError> {
    let value: Value = serde_json::from_str(raw).map_err(AnalysisContractError::Decode)?;
    if !value.is_object() {
        return Err(AnalysisContractError::InvalidContract(
            "analysis result must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(AnalysisContractError::Decode)
}

/// Extracts the server-supplied message from an error body.
///
/// Returns `None` when the body is not JSON, has no `error` field, or the
/// message is blank.
pub fn parse_error_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

/// Parses a `/health` body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON.
/// Returns [`AnalysisContractError::InvalidContract`] when `status` is blank.
pub fn parse_health_status(raw: &str) -> Result<HealthStatus, AnalysisContractError> {
    let parsed: HealthStatus = serde_json::from_str(raw).map_err(AnalysisContractError::Decode)?;

    if parsed.status.trim().is_empty() {
        return Err(AnalysisContractError::InvalidContract(
            "status is empty".to_string(),
        ));
    }

    Ok(parsed)
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Payload violates contract invariants.
    #[error("analysis contract violation: {0}")]
    InvalidContract(String),
}
