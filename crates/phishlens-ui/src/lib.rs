#![warn(missing_docs)]
//! # phishlens-ui
//!
//! ## Purpose
//! Defines the view model that `phishlens` renders, and a terminal renderer
//! for it.
//!
//! ## Responsibilities
//! - Track loading, error, and result visibility for one analysis at a time.
//! - Hold the active theme, verdict panel, and projected detail sections.
//! - Own the single radar chart instance through [`ChartSlot`].
//! - Track the collapsible deep-scan panel and its chevron glyph.
//! - Render the view model as plain or ANSI-coloured text.
//!
//! ## Data flow
//! Orchestrator events mutate [`ViewModel`]; the presenter fills its sections
//! and replaces the chart; [`render_text`] turns both into terminal output.
//!
//! ## Ownership and lifetimes
//! `ViewModel` owns every string it displays so a new submission can reset it
//! without borrowing from the previous result.
//!
//! ## Error model
//! This crate has no recoverable errors. Visibility rules are encoded as
//! `Option` fields and explicit reset methods.
//!
//! ## Security and privacy notes
//! Rendered values originate from the backend, and site data is scraped from
//! the analysed page. [`render_text`] escapes control characters in every such
//! value, so only the renderer's own ANSI sequences reach the terminal.

use std::borrow::Cow;

use phishlens_analysis_contract::Verdict;
use phishlens_projection::{DnsSection, FeatureRow, InfoRow, NO_DNS_RECORDS, RiskVector, Tone};

/// Radar chart axis labels, in vector order.
pub const CHART_LABELS: [&str; 5] = ["Keywords", "Entropy", "Length", "Complex", "AI Score"];

/// Title shown for phishing verdicts.
pub const PHISHING_TITLE: &str = "THREAT DETECTED";
/// Description shown for phishing verdicts.
pub const PHISHING_DESCRIPTION: &str = "This URL exhibits malicious behavior.";
/// Title shown for safe verdicts.
pub const SAFE_TITLE: &str = "SAFE DESTINATION";
/// Description shown for safe verdicts.
pub const SAFE_DESCRIPTION: &str = "No known threats found.";

/// Icon identifiers used by the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconGlyph {
    /// Phishing verdict icon.
    AlertOctagon,
    /// Safe verdict icon.
    ShieldCheck,
    /// Open deep-scan affordance.
    ChevronUp,
    /// Closed deep-scan affordance.
    ChevronDown,
}

impl IconGlyph {
    /// Icon-set name of the glyph.
    pub fn name(self) -> &'static str {
        match self {
            IconGlyph::AlertOctagon => "alert-octagon",
            IconGlyph::ShieldCheck => "shield-check",
            IconGlyph::ChevronUp => "chevron-up",
            IconGlyph::ChevronDown => "chevron-down",
        }
    }

    /// Terminal stand-in for the glyph.
    pub fn symbol(self) -> &'static str {
        match self {
            IconGlyph::AlertOctagon => "[!]",
            IconGlyph::ShieldCheck => "[ok]",
            IconGlyph::ChevronUp => "[-]",
            IconGlyph::ChevronDown => "[+]",
        }
    }
}

/// Global success/failure theme. Exactly one value is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// No verdict styling.
    #[default]
    Neutral,
    /// Safe styling.
    Safe,
    /// Phishing styling.
    Phishing,
}

impl Theme {
    /// Theme for a verdict.
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Phishing => Theme::Phishing,
            Verdict::Safe => Theme::Safe,
        }
    }

    /// Chart palette for the theme. Neutral falls back to the safe palette.
    pub fn palette(self) -> ChartPalette {
        match self {
            Theme::Phishing => ChartPalette {
                fill: "rgba(244, 63, 94, 0.4)",
                border: "#f43f5e",
            },
            Theme::Safe | Theme::Neutral => ChartPalette {
                fill: "rgba(16, 185, 129, 0.4)",
                border: "#10b981",
            },
        }
    }
}

/// Radar chart colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    /// Area fill colour.
    pub fill: &'static str,
    /// Border and point colour.
    pub border: &'static str,
}

/// One radar chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarChart {
    /// Monotonic id assigned by the owning [`ChartSlot`].
    pub generation: u64,
    /// Axis labels.
    pub labels: [&'static str; 5],
    /// Axis values in `[0, 10]` (or `NaN`).
    pub values: [f64; 5],
    /// Colours.
    pub palette: ChartPalette,
}

impl RadarChart {
    /// Creates an unmounted chart for a risk vector and theme.
    pub fn new(vector: &RiskVector, theme: Theme) -> Self {
        Self {
            generation: 0,
            labels: CHART_LABELS,
            values: vector.as_array(),
            palette: theme.palette(),
        }
    }
}

/// Holds at most one live chart.
///
/// [`ChartSlot::replace`] always destroys the current chart before mounting
/// the new one, so two charts never coexist.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<RadarChart>,
    generation: u64,
    destroyed: u64,
}

impl ChartSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroys the current chart, if any. Returns `true` when one existed.
    pub fn destroy(&mut self) -> bool {
        if self.current.take().is_some() {
            self.destroyed += 1;
            return true;
        }
        false
    }

    /// Destroys the current chart and mounts `chart`. Returns its generation.
    pub fn replace(&mut self, mut chart: RadarChart) -> u64 {
        self.destroy();
        self.generation += 1;
        chart.generation = self.generation;
        self.current = Some(chart);
        self.generation
    }

    /// Currently mounted chart.
    pub fn current(&self) -> Option<&RadarChart> {
        self.current.as_ref()
    }

    /// Number of charts mounted so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of charts destroyed so far.
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }
}

/// Verdict headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictPanel {
    /// Verdict icon.
    pub icon: IconGlyph,
    /// Headline.
    pub title: &'static str,
    /// Sub-headline.
    pub description: &'static str,
    /// Formatted confidence, e.g. `87.3%`.
    pub probability_text: String,
    /// URL the backend analysed, when reported.
    pub target: Option<String>,
}

impl VerdictPanel {
    /// Builds the panel copy for a verdict.
    pub fn new(verdict: Verdict, probability_text: String, target: Option<String>) -> Self {
        let (icon, title, description) = match verdict {
            Verdict::Phishing => (IconGlyph::AlertOctagon, PHISHING_TITLE, PHISHING_DESCRIPTION),
            Verdict::Safe => (IconGlyph::ShieldCheck, SAFE_TITLE, SAFE_DESCRIPTION),
        };

        Self {
            icon,
            title,
            description,
            probability_text,
            target,
        }
    }
}

/// Collapsible section holding DNS and site-probe details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeepScanPanel {
    expanded: bool,
}

impl DeepScanPanel {
    /// Returns `true` when the panel is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flips the panel and returns the new open state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Opens the panel.
    pub fn expand(&mut self) {
        self.expanded = true;
    }

    /// Closes the panel.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Chevron matching the open state.
    pub fn chevron(&self) -> IconGlyph {
        if self.expanded {
            IconGlyph::ChevronUp
        } else {
            IconGlyph::ChevronDown
        }
    }
}

/// Aggregate display state for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    /// Loading indicator visibility.
    pub loading: bool,
    /// Error message; the error view is visible iff this is `Some`.
    pub error: Option<String>,
    /// Result view visibility.
    pub result_visible: bool,
    /// Active theme.
    pub theme: Theme,
    /// Verdict headline.
    pub verdict: Option<VerdictPanel>,
    /// Reasons list; `None` hides the section.
    pub reasons: Option<Vec<String>>,
    /// Feature rows.
    pub features: Vec<FeatureRow>,
    /// Registrar rows.
    pub domain_info: Vec<InfoRow>,
    /// DNS section.
    pub dns: DnsSection,
    /// Site-probe rows.
    pub site_data: Vec<InfoRow>,
    /// Deep-scan panel state.
    pub deep_scan: DeepScanPanel,
}

impl ViewModel {
    /// Creates an idle view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the loading state for a new submission.
    ///
    /// Hides result and error views, clears the theme and every section, and
    /// collapses the deep-scan panel.
    pub fn begin_loading(&mut self) {
        *self = Self {
            loading: true,
            ..Self::default()
        };
    }

    /// Leaves the loading state.
    pub fn end_loading(&mut self) {
        self.loading = false;
    }

    /// Shows an error message.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Replaces the active theme; the previous one never lingers.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Returns `true` when the reasons section is visible.
    pub fn reasons_visible(&self) -> bool {
        self.reasons.is_some()
    }
}

/// Terminal rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colour sequences.
    pub color: bool,
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

const BAR_WIDTH: usize = 10;

/// Renders the view and chart as terminal text, one line per entry.
pub fn render_text(view: &ViewModel, chart: Option<&RadarChart>, options: RenderOptions) -> String {
    let mut lines = Vec::new();

    if view.loading {
        lines.push("Scanning...".to_string());
    }

    if let Some(error) = &view.error {
        lines.push(paint(options, ANSI_RED, &format!("Error: {}", printable(error))));
    }

    if view.result_visible {
        render_result(view, chart, options, &mut lines);
    }

    let mut rendered = lines.join("\n");
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    rendered
}

fn render_result(
    view: &ViewModel,
    chart: Option<&RadarChart>,
    options: RenderOptions,
    lines: &mut Vec<String>,
) {
    let theme_color = match view.theme {
        Theme::Phishing => ANSI_RED,
        Theme::Safe => ANSI_GREEN,
        Theme::Neutral => ANSI_BOLD,
    };

    if let Some(panel) = &view.verdict {
        lines.push(paint(
            options,
            theme_color,
            &format!("{} {}", panel.icon.symbol(), panel.title),
        ));
        lines.push(panel.description.to_string());
        lines.push(format!("Confidence: {}", panel.probability_text));
        if let Some(target) = &panel.target {
            lines.push(format!("Target: {}", printable(target)));
        }
    }

    if let Some(reasons) = &view.reasons {
        lines.push(String::new());
        lines.push("Reasons:".to_string());
        lines.extend(reasons.iter().map(|reason| format!("  - {}", printable(reason))));
    }

    lines.push(String::new());
    lines.push("Features:".to_string());
    lines.extend(
        view.features
            .iter()
            .map(|row| format!("  {}: {}", row.label, row.value)),
    );

    lines.push(String::new());
    lines.push("Domain:".to_string());
    lines.extend(view.domain_info.iter().map(|row| info_line(row, options)));

    if let Some(chart) = chart {
        lines.push(String::new());
        lines.push("Risk profile:".to_string());
        for (label, value) in chart.labels.iter().zip(chart.values) {
            lines.push(format!("  {label:<9} {}", axis_bar(value)));
        }
    }

    lines.push(String::new());
    lines.push(format!("Deep scan {}", view.deep_scan.chevron().symbol()));
    if view.deep_scan.is_expanded() {
        lines.push("  DNS:".to_string());
        match &view.dns {
            DnsSection::Empty => lines.push(format!("    {NO_DNS_RECORDS}")),
            DnsSection::Blocks(blocks) => {
                for block in blocks {
                    let indent = format!("\n    {:<5} ", "");
                    let records: Vec<Cow<'_, str>> =
                        block.records.iter().map(|record| printable(record)).collect();
                    lines.push(format!(
                        "    {:<5} {}",
                        printable(&block.record_type),
                        records.join(indent.as_str())
                    ));
                }
            }
        }

        lines.push("  Site:".to_string());
        lines.extend(
            view.site_data
                .iter()
                .map(|row| format!("  {}", info_line(row, options))),
        );
    }
}

fn info_line(row: &InfoRow, options: RenderOptions) -> String {
    let value = printable(&row.value);
    let value = match row.tone {
        Tone::Warning => paint(options, ANSI_RED, &value),
        Tone::Safe => paint(options, ANSI_GREEN, &value),
        Tone::Neutral => value.into_owned(),
    };

    match row.label {
        Some(label) => format!("  {label}: {value}"),
        None => format!("  {value}"),
    }
}

fn axis_bar(value: f64) -> String {
    if value.is_nan() {
        return format!("{} n/a", ".".repeat(BAR_WIDTH));
    }

    let filled = (value.clamp(0.0, BAR_WIDTH as f64).round()) as usize;
    format!(
        "{}{} {value:.1}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

// Escapes control characters (ESC, CR, newline, ...) as `\u{1b}`-style text.
fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() {
            escaped.extend(ch.escape_default());
        } else {
            escaped.push(ch);
        }
    }
    Cow::Owned(escaped)
}

fn paint(options: RenderOptions, color: &str, text: &str) -> String {
    if options.color {
        format!("{color}{text}{ANSI_RESET}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for view resets, chart lifecycle, and rendering.

    use phishlens_projection::{DnsBlock, build_risk_vector};

    use super::*;

    fn sample_chart(theme: Theme) -> RadarChart {
        let features: phishlens_analysis_contract::FeatureMap =
            [("URLLength", 50.0)].into_iter().collect();
        RadarChart::new(&build_risk_vector(&features, Verdict::Safe), theme)
    }

    #[test]
    fn begin_loading_clears_previous_result() {
        let mut view = ViewModel::new();
        view.result_visible = true;
        view.theme = Theme::Phishing;
        view.error = Some("old".to_string());
        view.reasons = Some(vec!["r".to_string()]);
        view.deep_scan.expand();

        view.begin_loading();

        assert!(view.loading);
        assert!(!view.result_visible);
        assert!(view.error.is_none());
        assert_eq!(view.theme, Theme::Neutral);
        assert!(!view.reasons_visible());
        assert!(!view.deep_scan.is_expanded());
    }

    #[test]
    fn chart_slot_destroys_before_replacing() {
        let mut slot = ChartSlot::new();
        assert!(!slot.destroy());

        assert_eq!(slot.replace(sample_chart(Theme::Safe)), 1);
        assert_eq!(slot.destroyed(), 0);

        assert_eq!(slot.replace(sample_chart(Theme::Phishing)), 2);
        assert_eq!(slot.destroyed(), 1);

        let current = slot.current().expect("chart should be mounted");
        assert_eq!(current.generation, 2);
        assert_eq!(current.palette.border, "#f43f5e");
    }

    #[test]
    fn deep_scan_chevron_tracks_state() {
        let mut panel = DeepScanPanel::default();
        assert_eq!(panel.chevron(), IconGlyph::ChevronDown);
        assert!(panel.toggle());
        assert_eq!(panel.chevron().name(), "chevron-up");
        assert!(!panel.toggle());
        assert_eq!(panel.chevron(), IconGlyph::ChevronDown);
    }

    #[test]
    fn verdict_panel_copy_matches_verdict() {
        let panel = VerdictPanel::new(Verdict::Phishing, "87.3%".to_string(), None);
        assert_eq!(panel.icon, IconGlyph::AlertOctagon);
        assert_eq!(panel.title, PHISHING_TITLE);

        let panel = VerdictPanel::new(Verdict::Safe, "2.0%".to_string(), None);
        assert_eq!(panel.icon.name(), "shield-check");
        assert_eq!(panel.description, SAFE_DESCRIPTION);
    }

    #[test]
    fn renders_nan_axis_as_not_available() {
        assert_eq!(axis_bar(f64::NAN), ".......... n/a");
        assert_eq!(axis_bar(10.0), "########## 10.0");
        assert_eq!(axis_bar(5.0), "#####..... 5.0");
    }

    #[test]
    fn renders_deep_scan_only_when_expanded() {
        let mut view = ViewModel::new();
        view.result_visible = true;
        view.dns = DnsSection::Blocks(vec![DnsBlock {
            record_type: "A".to_string(),
            records: vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()],
        }]);

        let collapsed = render_text(&view, None, RenderOptions::default());
        assert!(collapsed.contains("Deep scan [+]"));
        assert!(!collapsed.contains("1.1.1.1"));

        view.deep_scan.toggle();
        let expanded = render_text(&view, None, RenderOptions::default());
        assert!(expanded.contains("Deep scan [-]"));
        assert!(expanded.contains("    A     1.1.1.1\n          2.2.2.2"));
    }

    #[test]
    fn backend_text_cannot_inject_escape_sequences() {
        let hostile = "\u{1b}[2J\u{1b}[32mSAFE DESTINATION\u{1b}[0m";
        let mut view = ViewModel::new();
        view.result_visible = true;
        view.verdict = Some(VerdictPanel::new(
            Verdict::Phishing,
            "97.0%".to_string(),
            Some(format!("http://evil.example/{hostile}")),
        ));
        view.reasons = Some(vec![hostile.to_string()]);
        view.site_data = vec![InfoRow {
            label: Some("Title"),
            value: hostile.to_string(),
            tone: Tone::Neutral,
        }];
        view.dns = DnsSection::Blocks(vec![DnsBlock {
            record_type: "TXT".to_string(),
            records: vec![format!("v=spf1\r{hostile}")],
        }]);
        view.deep_scan.expand();

        let rendered = render_text(&view, None, RenderOptions { color: false });
        assert!(!rendered.contains('\x1b'));
        assert!(!rendered.contains('\r'));
        assert!(rendered.contains("    Title: \\u{1b}[2J\\u{1b}[32mSAFE DESTINATION\\u{1b}[0m"));

        let mut failed = ViewModel::new();
        failed.show_error(format!("bad\n{hostile}"));
        let error_line = render_text(&failed, None, RenderOptions { color: false });
        assert_eq!(error_line.lines().count(), 1);
        assert!(!error_line.contains('\x1b'));
    }

    #[test]
    fn idle_view_renders_nothing() {
        assert_eq!(render_text(&ViewModel::new(), None, RenderOptions::default()), "");
    }

    #[test]
    fn colour_is_opt_in() {
        let mut view = ViewModel::new();
        view.show_error("boom");
        let plain = render_text(&view, None, RenderOptions::default());
        assert_eq!(plain, "Error: boom\n");

        let coloured = render_text(&view, None, RenderOptions { color: true });
        assert!(coloured.starts_with(ANSI_RED));
    }
}
