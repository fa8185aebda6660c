#![warn(missing_docs)]
//! # phishlens-projection
//!
//! ## Purpose
//! Turns a decoded [`phishlens_analysis_contract::AnalysisResult`] into
//! display-ready rows and the radar risk vector.
//!
//! ## Responsibilities
//! - Format the verdict probability as a one-decimal percentage.
//! - Project the known feature subset into labelled rows in table order.
//! - Build the 5-axis risk vector used by the radar chart.
//! - Summarize registrar, DNS, and site-probe sections with placeholders.
//!
//! ## Data flow
//! `AnalysisResult` fields -> projection functions -> rows consumed by the
//! `phishlens-ui` view model.
//!
//! ## Ownership and lifetimes
//! Projections borrow the result and return owned rows so the view model never
//! holds references into a superseded result.
//!
//! ## Error model
//! Every function is total: absent fields yield placeholders or no rows, never
//! errors.
//!
//! ## Security and privacy notes
//! Values are copied verbatim from the backend. Renderers must treat them as
//! untrusted text.

use phishlens_analysis_contract::{DnsRecords, DomainInfo, FeatureMap, SiteData, Verdict};

/// Known feature keys and their display labels, in display order.
pub const FEATURE_LABELS: [(&str, &str); 5] = [
    ("URLLength", "Length"),
    ("NoOfSubDomain", "Subdomains"),
    ("SuspiciousKeywords", "Keywords"),
    ("Entropy", "Entropy"),
    ("IsHTTPS", "HTTPS"),
];

/// Upper bound of every risk axis.
pub const RISK_AXIS_MAX: f64 = 10.0;

/// Verdict axis value for phishing results.
pub const PHISHING_AXIS_SCORE: f64 = 9.0;

/// Verdict axis value for safe results.
pub const SAFE_AXIS_SCORE: f64 = 1.0;

/// Placeholder row shown when registrar metadata is absent.
pub const NO_DOMAIN_INFO: &str = "No info available";

/// Placeholder shown when no DNS record type has records.
pub const NO_DNS_RECORDS: &str = "No DNS records found.";

/// Text shown for an absent sub-field inside a present section.
pub const MISSING_VALUE: &str = "(not provided)";

/// Maximum records displayed per DNS record type.
pub const DNS_RECORDS_PER_TYPE: usize = 2;

/// Login-form indicator text when a form was found.
pub const LOGIN_FORM_DETECTED: &str = "DETECTED";

/// Login-form indicator text when no form was found.
pub const LOGIN_FORM_ABSENT: &str = "None";

/// Formats a probability as `round(p * 100, 1)` with a trailing `%`.
///
/// Rounding is half away from zero. Values outside `[0, 1]` pass through.
pub fn format_probability(probability: f64) -> String {
    let percent = (probability * 100.0 * 10.0).round() / 10.0;
    format!("{percent:.1}%")
}

/// One labelled feature row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    /// Raw feature key.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Formatted value.
    pub value: String,
}

/// Projects known features into rows following [`FEATURE_LABELS`] order.
///
/// Keys absent from `features` produce no row; a present `0` still does.
pub fn project_features(features: &FeatureMap) -> Vec<FeatureRow> {
    FEATURE_LABELS
        .iter()
        .filter_map(|&(key, label)| {
            features.get(key).map(|value| FeatureRow {
                key,
                label,
                value: format_feature_value(key, value),
            })
        })
        .collect()
}

fn format_feature_value(key: &str, value: f64) -> String {
    match key {
        "Entropy" => format!("{:.2}", (value * 100.0).round() / 100.0),
        "IsHTTPS" if value == 1.0 => "Yes".to_string(),
        "IsHTTPS" => "No".to_string(),
        _ => value.to_string(),
    }
}

/// Normalized radar vector, every axis in `[0, 10]`.
///
/// The length axis is `NaN` when `URLLength` is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskVector {
    /// Suspicious keyword axis.
    pub keywords: f64,
    /// Entropy axis.
    pub entropy: f64,
    /// URL length axis.
    pub length: f64,
    /// Special-character complexity axis.
    pub complexity: f64,
    /// Verdict axis, constant per verdict.
    pub verdict: f64,
}

impl RiskVector {
    /// Returns axes in chart order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.keywords,
            self.entropy,
            self.length,
            self.complexity,
            self.verdict,
        ]
    }
}

/// Builds the radar vector from raw features.
///
/// Missing features default to `0`, except `URLLength` which propagates as
/// `NaN`. The verdict axis ignores the probability.
pub fn build_risk_vector(features: &FeatureMap, verdict: Verdict) -> RiskVector {
    let feature_or_zero = |key: &str| features.get(key).unwrap_or(0.0);

    RiskVector {
        keywords: saturate(feature_or_zero("SuspiciousKeywords") * 5.0),
        entropy: saturate(feature_or_zero("Entropy") * 1.5),
        length: saturate(features.get("URLLength").unwrap_or(f64::NAN) / 100.0 * 10.0),
        complexity: saturate(feature_or_zero("NoOfOtherSpecialCharsInURL") * 2.0),
        verdict: if verdict.is_phishing() {
            PHISHING_AXIS_SCORE
        } else {
            SAFE_AXIS_SCORE
        },
    }
}

// `f64::clamp` keeps NaN, unlike `f64::min`.
fn saturate(value: f64) -> f64 {
    value.clamp(0.0, RISK_AXIS_MAX)
}

/// Colour tone of a detail value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Default text colour.
    Neutral,
    /// Warning colour.
    Warning,
    /// Safe colour.
    Safe,
}

impl Tone {
    /// CSS-style hex colour for the tone, `None` for neutral.
    pub fn hex(self) -> Option<&'static str> {
        match self {
            Tone::Neutral => None,
            Tone::Warning => Some("#f43f5e"),
            Tone::Safe => Some("#10b981"),
        }
    }
}

/// One label/value row in a detail list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    /// Row label, `None` for placeholder rows.
    pub label: Option<&'static str>,
    /// Row value.
    pub value: String,
    /// Value colour.
    pub tone: Tone,
}

impl InfoRow {
    fn labelled(label: &'static str, value: Option<&str>) -> Self {
        Self {
            label: Some(label),
            value: value.unwrap_or(MISSING_VALUE).to_string(),
            tone: Tone::Neutral,
        }
    }

    fn placeholder(text: &str) -> Self {
        Self {
            label: None,
            value: text.to_string(),
            tone: Tone::Neutral,
        }
    }
}

/// Summarizes registrar metadata.
///
/// Absent metadata yields exactly one placeholder row; present metadata always
/// yields four rows, with absent sub-fields shown as [`MISSING_VALUE`].
pub fn summarize_domain_info(info: Option<&DomainInfo>) -> Vec<InfoRow> {
    let Some(info) = info else {
        return vec![InfoRow::placeholder(NO_DOMAIN_INFO)];
    };

    vec![
        InfoRow::labelled("Registrar", info.registrar.as_deref()),
        InfoRow::labelled("Org", info.org.as_deref()),
        InfoRow::labelled("Country", info.country.as_deref()),
        InfoRow::labelled("Created", info.creation_date.as_deref()),
    ]
}

/// Displayed records for one DNS record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsBlock {
    /// Record type label.
    pub record_type: String,
    /// At most [`DNS_RECORDS_PER_TYPE`] records, original order.
    pub records: Vec<String>,
}

/// DNS section content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DnsSection {
    /// No type had records; show [`NO_DNS_RECORDS`].
    #[default]
    Empty,
    /// Blocks in document order.
    Blocks(Vec<DnsBlock>),
}

/// Summarizes DNS records, skipping types with no records.
pub fn summarize_dns(dns: Option<&DnsRecords>) -> DnsSection {
    let blocks: Vec<DnsBlock> = dns
        .into_iter()
        .flat_map(DnsRecords::iter)
        .filter(|set| !set.records.is_empty())
        .map(|set| DnsBlock {
            record_type: set.record_type.clone(),
            records: set
                .records
                .iter()
                .take(DNS_RECORDS_PER_TYPE)
                .cloned()
                .collect(),
        })
        .collect();

    if blocks.is_empty() {
        DnsSection::Empty
    } else {
        DnsSection::Blocks(blocks)
    }
}

/// Summarizes the site probe.
///
/// Present data always yields three rows. Absent data yields no rows and no
/// placeholder.
pub fn summarize_site_data(site: Option<&SiteData>) -> Vec<InfoRow> {
    let Some(site) = site else {
        return Vec::new();
    };

    let (login_value, login_tone) = if site.login_form_detected() {
        (LOGIN_FORM_DETECTED, Tone::Warning)
    } else {
        (LOGIN_FORM_ABSENT, Tone::Safe)
    };

    vec![
        InfoRow::labelled("Title", site.title.as_deref()),
        InfoRow::labelled("Server", site.server_header.as_deref()),
        InfoRow {
            label: Some("Login Form"),
            value: login_value.to_string(),
            tone: login_tone,
        },
    ]
}
