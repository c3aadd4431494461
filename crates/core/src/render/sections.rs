use crate::domain::leaderboard::{Leaderboard, Report};
use crate::render::exclusive::exclusive_names;
use crate::render::{
    fit_name, format_pct, header, pct_width, rank_width, section_title, Layout, RenderOptions,
    ReportRenderer, NO_DATA,
};
use std::collections::HashSet;

/// Stacked Markdown sections. No code fences, so `**bold**` renders in chat clients.
#[derive(Debug, Clone)]
pub struct SectionsRenderer {
    opts: RenderOptions,
}

impl SectionsRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts }
    }

    fn render_section(
        &self,
        report: &Report,
        board: &Leaderboard,
        exclusive: &HashSet<String>,
        rank_w: usize,
        pct_w: usize,
    ) -> String {
        let name_w = self.opts.name_width.max(1);
        let mut lines = vec![format!("**{}**", section_title(report, &board.horizon.name))];

        if board.entries.is_empty() {
            lines.push(format!("_{NO_DATA}_"));
        }

        for (i, entry) in board.entries.iter().enumerate() {
            let name = fit_name(&entry.name, name_w);
            // Padding follows the raw name so emphasis markers don't shift the column.
            let pad = " ".repeat(name_w - name.chars().count() + 1);
            let shown = if exclusive.contains(&entry.name) {
                format!("**{name}**")
            } else {
                name
            };
            let pct = format_pct(entry.pct, self.opts.decimals);
            lines.push(format!(
                "#{rank:<rank_w$} {shown}{pad}{pct:>pct_w$}",
                rank = i + 1
            ));
        }

        lines.join("\n")
    }
}

impl ReportRenderer for SectionsRenderer {
    fn layout(&self) -> Layout {
        Layout::Sections
    }

    fn render(&self, report: &Report) -> String {
        let exclusive = if self.opts.mark_exclusive {
            exclusive_names(&report.sections)
        } else {
            vec![HashSet::new(); report.sections.len()]
        };
        let rank_w = rank_width(report);
        let pct_w = pct_width(report, &self.opts);

        let parts: Vec<String> = report
            .sections
            .iter()
            .zip(&exclusive)
            .map(|(board, ex)| self.render_section(report, board, ex, rank_w, pct_w))
            .collect();

        format!("{}{}", header(report), parts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::horizon::HorizonSpec;
    use crate::domain::leaderboard::LeaderboardEntry;
    use chrono::{TimeZone, Utc};

    fn board(horizon: &str, rows: &[(&str, f64)]) -> Leaderboard {
        Leaderboard {
            horizon: HorizonSpec::new(horizon, 1),
            entries: rows
                .iter()
                .map(|(n, p)| LeaderboardEntry {
                    name: n.to_string(),
                    pct: *p,
                })
                .collect(),
        }
    }

    fn report(sections: Vec<Leaderboard>) -> Report {
        Report {
            title: "MEXC Movers".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 12).unwrap(),
            top_n: 20,
            sections,
        }
    }

    /// Reads `(horizon, [(rank, name, pct)])` back out of rendered text.
    fn parse(text: &str) -> Vec<(String, Vec<(usize, String, f64)>)> {
        let mut out: Vec<(String, Vec<(usize, String, f64)>)> = Vec::new();
        for line in text.lines().skip(2) {
            if let Some(title) = line.strip_prefix("**").and_then(|l| l.strip_suffix("**")) {
                let horizon = title.split_whitespace().next().unwrap().to_string();
                out.push((horizon, Vec::new()));
                continue;
            }
            let Some(row) = line.strip_prefix('#') else {
                continue;
            };
            let mut parts = row.split_whitespace();
            let rank = parts.next().unwrap().parse::<usize>().unwrap();
            let name = parts.next().unwrap().trim_matches('*').to_string();
            let pct = parts
                .next()
                .unwrap()
                .trim_end_matches('%')
                .parse::<f64>()
                .unwrap();
            out.last_mut().unwrap().1.push((rank, name, pct));
        }
        out
    }

    #[test]
    fn renders_header_sections_and_bold_exclusives() {
        let r = report(vec![
            board("3D", &[("X", 12.4), ("Y", -3.0)]),
            board("7D", &[("Y", 8.0), ("Z", 2.0)]),
        ]);
        let text = SectionsRenderer::new(RenderOptions::default()).render(&r);

        let expected = "\
⚡ **MEXC Movers**
Updated 2026-10-17 08:30 UTC
**3D Top 20**
#1 **X**            +12%
#2 Y             -3%

**7D Top 20**
#1 Y             +8%
#2 **Z**             +2%";
        assert_eq!(text, expected);
    }

    #[test]
    fn rows_align_regardless_of_name_length() {
        let r = report(vec![board(
            "3D",
            &[("A", 1.0), ("ABCDEFGHIJ", 2.0), ("ABCDEFGHIJKLMNOP", 3.0)],
        )]);
        let opts = RenderOptions {
            mark_exclusive: false,
            ..RenderOptions::default()
        };
        let text = SectionsRenderer::new(opts).render(&r);
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|l| l.chars().count() == rows[0].chars().count()));
        assert!(rows[2].contains("ABCDEFGHIJ "));
        assert!(!rows[2].contains("ABCDEFGHIJK"));
    }

    #[test]
    fn empty_board_is_present_with_no_data_marker() {
        let r = report(vec![board("3D", &[]), board("7D", &[]), board("20D", &[])]);
        let text = SectionsRenderer::new(RenderOptions::default()).render(&r);
        assert!(text.starts_with("⚡ **MEXC Movers**\nUpdated 2026-10-17 08:30 UTC\n"));
        for h in ["3D", "7D", "20D"] {
            assert!(text.contains(&format!("**{h} Top 20**\n_no data_")));
        }
    }

    #[test]
    fn round_trips_ranked_lists_at_fixed_precision() {
        let boards = vec![
            board("3D", &[("OKB", 25.5), ("PEPE", 12.25), ("BTC", -0.75)]),
            board("7D", &[("PEPE", 40.0), ("DOGE", 3.13)]),
        ];
        let opts = RenderOptions {
            decimals: 2,
            ..RenderOptions::default()
        };
        let text = SectionsRenderer::new(opts).render(&report(boards.clone()));

        let parsed = parse(&text);
        assert_eq!(parsed.len(), boards.len());
        for (b, (horizon, rows)) in boards.iter().zip(&parsed) {
            assert_eq!(&b.horizon.name, horizon);
            let expected: Vec<(usize, String, f64)> = b
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| (i + 1, e.name.clone(), e.pct))
                .collect();
            assert_eq!(rows, &expected);
        }
    }

    #[test]
    fn wide_percentages_widen_the_column() {
        let r = report(vec![board("3D", &[("MOON", 12345.0), ("DUST", 1.0)])]);
        let text = SectionsRenderer::new(RenderOptions::default()).render(&r);
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with('#')).collect();
        assert!(rows[0].ends_with("+12345%"));
        assert_eq!(rows[0].chars().count(), rows[1].chars().count());
    }
}
