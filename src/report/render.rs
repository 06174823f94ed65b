//! HTML and plain-text report views
//!
//! HTML goes through askama templates in `templates/`; the SVG charts are
//! produced by [`super::chart`] and embedded unescaped.

use super::{bar_chart_svg, pie_chart_svg, FeedbackReport};
use crate::config::ChartStyle;
use crate::types::{FeedbackRecord, FeedbackSubmission, Gender};
use askama::Template;
use std::fmt::Write as _;

pub const NO_REPORT_WARNING: &str = "No feedback data available yet.";
pub const NO_CHARTS_WARNING: &str = "No feedback data available to show charts.";

/// One banner line on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    /// CSS class suffix: success, error, info, warning
    pub kind: &'static str,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: "success", text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: "error", text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: "info", text: text.into() }
    }

    pub fn caption(text: impl Into<String>) -> Self {
        Self { kind: "caption", text: text.into() }
    }
}

/// Gender `<option>` with its selected state
#[derive(Debug, Clone)]
pub struct GenderOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Form page with optional report and chart sections
#[derive(Template)]
#[template(path = "index.html")]
pub struct FeedbackPage<'a> {
    pub title: String,
    pub messages: Vec<FlashMessage>,
    pub values: FeedbackSubmission,
    pub gender_options: Vec<GenderOption>,
    pub form_action: String,
    pub show_report: bool,
    pub show_charts: bool,
    pub report: Option<&'a FeedbackReport>,
    pub bar_svg: String,
    pub pie_svg: String,
    pub report_warning: &'static str,
    pub charts_warning: &'static str,
}

impl<'a> FeedbackPage<'a> {
    pub fn new(
        title: &str,
        report: Option<&'a FeedbackReport>,
        show_report: bool,
        show_charts: bool,
        chart_style: ChartStyle,
    ) -> Self {
        let (bar_svg, pie_svg) = chart_markup(report, show_charts, chart_style);

        Self {
            title: title.to_string(),
            messages: Vec::new(),
            values: FeedbackSubmission::default(),
            gender_options: gender_options(None),
            form_action: format!("/feedback{}", toggle_query(show_report, show_charts)),
            show_report,
            show_charts,
            report,
            bar_svg,
            pie_svg,
            report_warning: NO_REPORT_WARNING,
            charts_warning: NO_CHARTS_WARNING,
        }
    }

    pub fn with_messages(mut self, messages: Vec<FlashMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Refill the form, e.g. after a rejected submission
    pub fn with_values(mut self, values: FeedbackSubmission) -> Self {
        let selected = values.gender.parse::<Gender>().ok();
        self.gender_options = gender_options(selected);
        self.values = values;
        self
    }
}

/// Standalone report document (table and charts, no form)
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage<'a> {
    pub title: String,
    pub generated_at: String,
    pub show_report: bool,
    pub show_charts: bool,
    pub report: Option<&'a FeedbackReport>,
    pub bar_svg: String,
    pub pie_svg: String,
    pub report_warning: &'static str,
    pub charts_warning: &'static str,
}

impl<'a> ReportPage<'a> {
    pub fn new(title: &str, report: &'a FeedbackReport, chart_style: ChartStyle) -> Self {
        let (bar_svg, pie_svg) = chart_markup(Some(report), true, chart_style);
        Self {
            title: title.to_string(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            show_report: true,
            show_charts: true,
            report: Some(report),
            bar_svg,
            pie_svg,
            report_warning: NO_REPORT_WARNING,
            charts_warning: NO_CHARTS_WARNING,
        }
    }
}

fn chart_markup(
    report: Option<&FeedbackReport>,
    show_charts: bool,
    chart_style: ChartStyle,
) -> (String, String) {
    match report {
        Some(report) if show_charts => (
            bar_chart_svg(&report.counts),
            pie_chart_svg(&report.counts, chart_style),
        ),
        _ => (String::new(), String::new()),
    }
}

fn gender_options(selected: Option<Gender>) -> Vec<GenderOption> {
    Gender::ALL
        .iter()
        .map(|g| GenderOption {
            value: g.as_str(),
            selected: Some(*g) == selected,
        })
        .collect()
}

/// Query string that preserves the display toggles
pub fn toggle_query(show_report: bool, show_charts: bool) -> String {
    let mut params = Vec::new();
    if show_report {
        params.push("show_report=true");
    }
    if show_charts {
        params.push("show_charts=true");
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

/// Plain-text report for terminals
pub fn render_text(report: &FeedbackReport) -> String {
    let mut out = String::new();
    let records = &report.records;

    let width = |f: fn(&FeedbackRecord) -> usize, header: &str| {
        records.iter().map(f).max().unwrap_or(0).max(header.chars().count())
    };
    let name_w = width(|r| r.name.chars().count(), "Name");
    let email_w = width(|r| r.email.chars().count(), "Email");

    let _ = writeln!(
        out,
        "{:<name_w$}  {:<6}  {:>3}  {:<email_w$}  {:<9}  Feedback",
        "Name", "Gender", "Age", "Email", "Sentiment"
    );
    let _ = writeln!(out, "{}", "-".repeat(name_w + email_w + 42));

    for record in records {
        let _ = writeln!(
            out,
            "{:<name_w$}  {:<6}  {:>3}  {:<email_w$}  {:<9}  {}",
            record.name,
            record.gender.as_str(),
            record.age,
            record.email,
            record.sentiment.as_str(),
            record.feedback.replace('\n', " ")
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Sentiment counts ({} total):", report.counts.total);
    for entry in &report.counts.entries {
        let _ = writeln!(
            out,
            "  {:<9} {:>5}  {:>5.1}%",
            entry.label.as_str(),
            entry.count,
            report.counts.share(entry.label) * 100.0
        );
    }

    out
}
