#![warn(missing_docs)]
//! # phishlens-app
//!
//! ## Purpose
//! Orchestrates one URL analysis from submission to rendered verdict.
//!
//! ## Responsibilities
//! - Ignore blank submissions and drive the loading state for the rest.
//! - Route backend replies to the verdict presenter or the error display.
//! - Present verdicts: theme, probability, reasons, detail sections, chart.
//! - Own the single radar chart instance across submissions.
//! - Build runtime configuration and log-safe URL forms.
//!
//! ## Data flow
//! User input -> [`AnalysisSession::submit`] -> `PredictClient` ->
//! [`VerdictPresenter::present`] or error display -> [`ViewModel`] ->
//! terminal rendering.
//!
//! ## Ownership and lifetimes
//! The session owns its client, presenter, and view. Each decoded result is
//! dropped at the end of the submission that produced it.
//!
//! ## Error model
//! Submission never fails: every path ends in a [`SubmitOutcome`] and leaves
//! the loading indicator cleared. Setup failures are [`AppError`].
//!
//! ## Security and privacy notes
//! - Submitted URLs are logged only through [`log_safe_url`].
//! - Backend strings are displayed verbatim and never executed.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use phishlens_analysis_contract::{AnalysisResult, HealthStatus, Verdict};
use phishlens_client::{ClientError, HttpTransport, PredictClient, PredictResponse};
use phishlens_projection::{
    build_risk_vector, format_probability, project_features, summarize_dns,
    summarize_domain_info, summarize_site_data,
};
use phishlens_ui::{
    ChartSlot, RadarChart, RenderOptions, Theme, VerdictPanel, ViewModel, render_text,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PHISHLENS_VERSION");

/// User agent sent with every backend request.
pub const APP_USER_AGENT: &str = env!("PHISHLENS_USER_AGENT");

/// Backend base URL used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Message shown for rejected or unusable replies without a server message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Message shown when the backend could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Is the server running?";

/// Probability text shown when the reply carries no probability.
pub const MISSING_PROBABILITY_TEXT: &str = "--";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Why a submission ended on the error display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Backend answered with a non-2xx status.
    Application,
    /// Backend could not be reached.
    Connectivity,
    /// Backend answered 2xx with an unusable body.
    Decode,
}

/// Result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was sent and the view is untouched.
    Ignored,
    /// A verdict was presented.
    Presented(Verdict),
    /// An error message is displayed.
    Failed(FailureKind),
}

/// Renders analysis results into a [`ViewModel`] and owns the radar chart.
#[derive(Debug, Default)]
pub struct VerdictPresenter {
    chart: ChartSlot,
}

impl VerdictPresenter {
    /// Creates a presenter with no chart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presents `result` into `view`, replacing every result section and the
    /// chart. Returns the verdict.
    pub fn present(&mut self, result: &AnalysisResult, view: &mut ViewModel) -> Verdict {
        let verdict = result.verdict();
        let theme = Theme::for_verdict(verdict);

        view.error = None;
        view.result_visible = true;
        view.apply_theme(theme);

        let probability_text = result
            .probability
            .map_or_else(|| MISSING_PROBABILITY_TEXT.to_string(), format_probability);
        view.verdict = Some(VerdictPanel::new(
            verdict,
            probability_text,
            result.url.clone(),
        ));

        view.reasons = match &result.reasons {
            Some(reasons) if verdict.is_phishing() && !reasons.is_empty() => Some(reasons.clone()),
            _ => None,
        };

        view.domain_info = summarize_domain_info(result.domain_info.as_ref());
        view.features = project_features(&result.features);

        let vector = build_risk_vector(&result.features, verdict);
        let generation = self.chart.replace(RadarChart::new(&vector, theme));
        debug!(generation, "risk chart replaced");

        view.dns = summarize_dns(result.dns_info.as_ref());
        view.site_data = summarize_site_data(result.site_data.as_ref());

        verdict
    }

    /// Destroys the current chart, if any.
    pub fn discard_chart(&mut self) -> bool {
        self.chart.destroy()
    }

    /// Currently mounted chart.
    pub fn chart(&self) -> Option<&RadarChart> {
        self.chart.current()
    }

    /// Chart slot, for lifecycle inspection.
    pub fn chart_slot(&self) -> &ChartSlot {
        &self.chart
    }
}

// Clears the loading flag when dropped, including during unwinding.
struct LoadingGuard<'a> {
    view: &'a mut ViewModel,
}

impl<'a> LoadingGuard<'a> {
    fn begin(view: &'a mut ViewModel) -> Self {
        view.begin_loading();
        Self { view }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = ViewModel;

    fn deref(&self) -> &ViewModel {
        self.view
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut ViewModel {
        self.view
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.end_loading();
    }
}

/// One interactive analysis surface: client, presenter, and view.
pub struct AnalysisSession {
    client: PredictClient,
    presenter: VerdictPresenter,
    view: ViewModel,
}

impl AnalysisSession {
    /// Creates an idle session.
    pub fn new(client: PredictClient) -> Self {
        Self {
            client,
            presenter: VerdictPresenter::new(),
            view: ViewModel::new(),
        }
    }

    /// Submits user input for analysis.
    ///
    /// Blank input is ignored. Otherwise the view is reset into the loading
    /// state, one request is sent, and the reply fully replaces the view. The
    /// loading flag is cleared on every path.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let url = input.trim();
        if url.is_empty() {
            debug!("blank submission ignored");
            return SubmitOutcome::Ignored;
        }

        info!(url = %log_safe_url(url), "analysis requested");
        let mut view = LoadingGuard::begin(&mut self.view);
        self.presenter.discard_chart();

        match self.client.predict(url) {
            Ok(PredictResponse::Analysis(result)) => {
                let verdict = self.presenter.present(&result, &mut view);
                info!(?verdict, "analysis presented");
                SubmitOutcome::Presented(verdict)
            }
            Ok(PredictResponse::Rejected { status, message }) => {
                warn!(status, "analysis rejected by backend");
                view.show_error(message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()));
                SubmitOutcome::Failed(FailureKind::Application)
            }
            Err(ClientError::Transport(reason)) => {
                warn!(%reason, "backend unreachable");
                view.show_error(NETWORK_ERROR_MESSAGE);
                SubmitOutcome::Failed(FailureKind::Connectivity)
            }
            Err(error) => {
                warn!(%error, "backend reply unusable");
                view.show_error(GENERIC_ERROR_MESSAGE);
                SubmitOutcome::Failed(FailureKind::Decode)
            }
        }
    }

    /// Flips the deep-scan panel. Returns the new open state.
    pub fn toggle_deep_scan(&mut self) -> bool {
        self.view.deep_scan.toggle()
    }

    /// Opens the deep-scan panel.
    pub fn expand_deep_scan(&mut self) {
        self.view.deep_scan.expand();
    }

    /// Probes backend health.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the probe fails.
    pub fn health(&self) -> Result<HealthStatus, AppError> {
        Ok(self.client.health()?)
    }

    /// Current view.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Presenter, for chart inspection.
    pub fn presenter(&self) -> &VerdictPresenter {
        &self.presenter
    }

    /// Renders the current view as terminal text.
    pub fn render(&self, options: RenderOptions) -> String {
        render_text(&self.view, self.presenter.chart(), options)
    }
}

/// Runtime configuration assembled by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL.
    pub endpoint: String,
    /// Request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Emit ANSI colour.
    pub color: bool,
    /// Open the deep-scan panel after every analysis.
    pub expand_deep_scan: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            color: color_enabled_from_env(),
            expand_deep_scan: false,
        }
    }
}

impl AppConfig {
    /// Builds a session backed by the HTTP transport.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] for an invalid endpoint or HTTP client
    /// setup failure.
    pub fn connect(&self) -> Result<AnalysisSession, AppError> {
        let transport = HttpTransport::new(APP_USER_AGENT, self.timeout)?;
        let client = PredictClient::new(&self.endpoint, Arc::new(transport))?;
        info!(endpoint = %client.base_url(), timeout = ?self.timeout, "backend configured");
        Ok(AnalysisSession::new(client))
    }

    /// Render switches derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { color: self.color }
    }
}

/// Reduces a URL to scheme, host, port, and path for logging.
///
/// Credentials, query, and fragment are removed. Input without a scheme is
/// read as `http://`, matching how the backend normalizes it.
pub fn log_safe_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(mut parsed) => {
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => "<unparsable url>".to_string(),
    }
}

/// Reads colour preference from the environment.
///
/// Semantics:
/// - `NO_COLOR` set to any non-empty value => colour disabled.
/// - `PHISHLENS_COLOR` of `0`, `false`, `off` (case-insensitive) => disabled.
/// - Otherwise colour is enabled.
pub fn color_enabled_from_env() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
        return false;
    }

    match std::env::var("PHISHLENS_COLOR") {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            !(normalized == "0" || normalized == "false" || normalized == "off")
        }
        Err(_) => true,
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client setup or request failure.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}
