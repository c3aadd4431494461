use crate::domain::leaderboard::Report;
use std::fmt;
use std::str::FromStr;

pub mod columns;
pub mod exclusive;
pub mod sections;

pub const NO_DATA: &str = "no data";
const HEADER_ICON: &str = "⚡";

/// Turns ranked leaderboards into message text.
pub trait ReportRenderer: Send + Sync {
    fn layout(&self) -> Layout;

    fn render(&self, report: &Report) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One Markdown block per horizon, stacked vertically.
    Sections,
    /// All horizons side by side inside a code fence.
    Columns,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Sections => f.write_str("sections"),
            Layout::Columns => f.write_str("columns"),
        }
    }
}

impl FromStr for Layout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sections" | "sectioned" => Ok(Layout::Sections),
            "columns" | "multi-column" => Ok(Layout::Columns),
            other => anyhow::bail!("unknown report layout: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub decimals: usize,
    /// Names longer than this are truncated.
    pub name_width: usize,
    pub pct_width: usize,
    pub mark_exclusive: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decimals: 0,
            name_width: 10,
            pct_width: 6,
            mark_exclusive: true,
        }
    }
}

pub fn renderer_for(layout: Layout, opts: RenderOptions) -> Box<dyn ReportRenderer> {
    match layout {
        Layout::Sections => Box::new(sections::SectionsRenderer::new(opts)),
        Layout::Columns => Box::new(columns::ColumnsRenderer::new(opts)),
    }
}

/// `+12%`, `-3.50%`. Positive values always carry a sign.
pub fn format_pct(pct: f64, decimals: usize) -> String {
    format!("{pct:+.decimals$}%")
}

/// Truncates to `width` characters.
pub fn fit_name(name: &str, width: usize) -> String {
    name.chars().take(width.max(1)).collect()
}

pub(crate) fn header(report: &Report) -> String {
    format!(
        "{HEADER_ICON} **{}**\nUpdated {}\n",
        report.title,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

pub(crate) fn section_title(report: &Report, horizon: &str) -> String {
    format!("{horizon} Top {}", report.top_n)
}

/// Configured percent width, widened when a value would not fit.
pub(crate) fn pct_width(report: &Report, opts: &RenderOptions) -> usize {
    report
        .sections
        .iter()
        .flat_map(|s| s.entries.iter())
        .map(|e| format_pct(e.pct, opts.decimals).chars().count())
        .max()
        .unwrap_or(0)
        .max(opts.pct_width)
}

/// Width of the widest rank in the report.
pub(crate) fn rank_width(report: &Report) -> usize {
    let max_rows = report
        .sections
        .iter()
        .map(|s| s.entries.len())
        .max()
        .unwrap_or(0)
        .max(1);
    max_rows.to_string().len()
}
