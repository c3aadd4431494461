use crate::domain::leaderboard::{Leaderboard, Report};
use crate::render::exclusive::exclusive_names;
use crate::render::{
    fit_name, format_pct, header, pct_width, rank_width, section_title, Layout, RenderOptions,
    ReportRenderer, NO_DATA,
};
use std::collections::HashSet;

const COLUMN_GAP: &str = "  ";
const EXCLUSIVE_MARK: char = '*';

/// Horizons side by side in a code fence. Emphasis does not render inside fences, so
/// exclusive names get a trailing `*` instead.
#[derive(Debug, Clone)]
pub struct ColumnsRenderer {
    opts: RenderOptions,
}

struct CellLayout {
    rank_w: usize,
    name_w: usize,
    pct_w: usize,
}

impl CellLayout {
    fn width(&self) -> usize {
        // '#', rank, space, name, marker, pct
        1 + self.rank_w + 1 + self.name_w + 1 + self.pct_w
    }
}

impl ColumnsRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts }
    }

    fn cell(
        &self,
        layout: &CellLayout,
        board: &Leaderboard,
        exclusive: &HashSet<String>,
        idx: usize,
    ) -> String {
        let width = layout.width();
        let Some(entry) = board.entries.get(idx) else {
            if idx == 0 {
                return format!("{NO_DATA:<width$}");
            }
            return " ".repeat(width);
        };

        let name = fit_name(&entry.name, layout.name_w);
        let mark = if exclusive.contains(&entry.name) {
            EXCLUSIVE_MARK
        } else {
            ' '
        };
        let tagged = format!("{name}{mark}");
        let pct = format_pct(entry.pct, self.opts.decimals);
        format!(
            "#{rank:<rank_w$} {tagged:<tag_w$}{pct:>pct_w$}",
            rank = idx + 1,
            rank_w = layout.rank_w,
            tag_w = layout.name_w + 1,
            pct_w = layout.pct_w,
        )
    }
}

impl ReportRenderer for ColumnsRenderer {
    fn layout(&self) -> Layout {
        Layout::Columns
    }

    fn render(&self, report: &Report) -> String {
        let exclusive = if self.opts.mark_exclusive {
            exclusive_names(&report.sections)
        } else {
            vec![HashSet::new(); report.sections.len()]
        };
        let layout = CellLayout {
            rank_w: rank_width(report),
            name_w: self.opts.name_width.max(1),
            pct_w: pct_width(report, &self.opts),
        };
        let width = layout.width();

        let titles: Vec<String> = report
            .sections
            .iter()
            .map(|b| {
                let title = fit_name(&section_title(report, &b.horizon.name), width);
                format!("{title:<width$}")
            })
            .collect();

        let rows = report
            .sections
            .iter()
            .map(|b| b.entries.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut lines = vec![titles.join(COLUMN_GAP)];
        for idx in 0..rows {
            let cells: Vec<String> = report
                .sections
                .iter()
                .zip(&exclusive)
                .map(|(board, ex)| self.cell(&layout, board, ex, idx))
                .collect();
            lines.push(cells.join(COLUMN_GAP));
        }

        let mut out = header(report);
        out.push_str("```\n");
        out.push_str(&lines.join("\n"));
        out.push_str("\n```");
        if exclusive.iter().any(|ex| !ex.is_empty()) {
            out.push_str(&format!("\n{EXCLUSIVE_MARK} = only in one list"));
        }
        out
    }
}
