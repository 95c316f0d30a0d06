//! Console and CSV rendering of coverage reports.

use dataqa_core::{CheckId, CoverageSummary};

const COL_WIDTHS: [usize; 3] = [30, 50, 50];

/// Render the Rule | Proposals | Expectations audit table for console
/// output. Empty cells show `-`; overlong cells are truncated.
pub fn render_table(summary: &CoverageSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} | {} | {}\n",
        cell("Rule", COL_WIDTHS[0]),
        cell("Proposals", COL_WIDTHS[1]),
        cell("Expectations", COL_WIDTHS[2])
    ));
    out.push_str(&format!(
        "{}-+-{}-+-{}\n",
        "-".repeat(COL_WIDTHS[0]),
        "-".repeat(COL_WIDTHS[1]),
        "-".repeat(COL_WIDTHS[2])
    ));
    for row in &summary.table {
        out.push_str(&format!(
            "{} | {} | {}\n",
            cell(&row.rule, COL_WIDTHS[0]),
            cell(&join(&row.proposals, ", "), COL_WIDTHS[1]),
            cell(&join(&row.expectations, ", "), COL_WIDTHS[2])
        ));
    }
    out
}

/// Render the flat CSV report: `rule,proposals,expectations` with the id
/// lists semicolon-joined.
pub fn to_csv(summary: &CoverageSummary) -> String {
    let mut out = String::from("rule,proposals,expectations\r\n");
    for row in &summary.table {
        out.push_str(&format!(
            "{},{},{}\r\n",
            csv_field(&row.rule),
            csv_field(&join_plain(&row.proposals, ";")),
            csv_field(&join_plain(&row.expectations, ";"))
        ));
    }
    out
}

fn join(ids: &[CheckId], sep: &str) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    join_plain(ids, sep)
}

fn join_plain(ids: &[CheckId], sep: &str) -> String {
    ids.iter()
        .map(CheckId::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

fn cell(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{s:<width$}")
    } else {
        let truncated: String = s.chars().take(width - 3).collect();
        format!("{truncated}...")
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataqa_core::{CoverageRow, CoverageStat};

    fn summary() -> CoverageSummary {
        CoverageSummary {
            dataset: "orders".to_string(),
            run_id: "r1".to_string(),
            proposal_coverage: CoverageStat {
                covered: 1,
                total: 2,
                pct: 0.5,
            },
            expectation_coverage: CoverageStat {
                covered: 0,
                total: 2,
                pct: 0.0,
            },
            table: vec![
                CoverageRow {
                    rule: "amount_present".to_string(),
                    proposals: vec![CheckId::from("p-1"), CheckId::from("p-2")],
                    expectations: vec![],
                },
                CoverageRow {
                    rule: "order_id_unique".to_string(),
                    proposals: vec![],
                    expectations: vec![],
                },
            ],
            unmapped_existing: vec![],
            proposal_only_existing: vec![],
        }
    }

    #[test]
    fn table_shows_ids_and_placeholders() {
        let rendered = render_table(&summary());
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("Rule"));
        assert!(lines[1].contains("-+-"));
        assert!(lines[2].contains("p-1, p-2"));
        assert!(lines[3].contains(" - "));
    }

    #[test]
    fn long_cells_are_truncated() {
        let mut s = summary();
        s.table[0].rule = "r".repeat(64);
        let rendered = render_table(&s);
        assert!(rendered.lines().nth(2).unwrap().contains("..."));
    }

    #[test]
    fn csv_joins_ids_with_semicolons() {
        let csv = to_csv(&summary());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "rule,proposals,expectations");
        assert_eq!(lines[1], "amount_present,p-1;p-2,");
        assert_eq!(lines[2], "order_id_unique,,");
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}
