use std::cmp::Ordering;
use std::io::Write;

use rust_decimal::Decimal;

use crate::loader::{IndexEntry, PriceChangeIndex};

pub const DEFAULT_TOP_N: usize = 10;

/// The largest increases (highest first) and largest decreases (most negative first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedReport {
    pub increases: Vec<(String, Decimal)>,
    pub decreases: Vec<(String, Decimal)>,
}

/// Rank every entry of `index` by delta and keep `top_n` from each end.
///
/// Equal deltas are ordered by the position at which their description first
/// appeared in the input, in both lists.
pub fn build_report(index: &PriceChangeIndex, top_n: usize) -> RankedReport {
    let mut ranked = index.entries();

    ranked.sort_by(|a, b| by_delta(&b.1, &a.1).then(a.1.order.cmp(&b.1.order)));
    let increases = take_owned(&ranked, top_n);

    ranked.sort_by(|a, b| by_delta(&a.1, &b.1).then(a.1.order.cmp(&b.1.order)));
    let decreases = take_owned(&ranked, top_n);

    RankedReport {
        increases,
        decreases,
    }
}

fn by_delta(a: &IndexEntry, b: &IndexEntry) -> Ordering {
    a.delta.cmp(&b.delta)
}

fn take_owned(ranked: &[(&str, IndexEntry)], n: usize) -> Vec<(String, Decimal)> {
    ranked
        .iter()
        .take(n)
        .map(|(description, entry)| (description.to_string(), entry.delta))
        .collect()
}

/// `$1261.36`, `-$0.00542`. The stored scale is printed as is.
pub fn format_dollar_amount(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${}", amount.abs())
    } else {
        format!("${}", amount.abs())
    }
}

impl RankedReport {
    pub fn increase_lines(&self) -> Vec<String> {
        render_lines(&self.increases)
    }

    pub fn decrease_lines(&self) -> Vec<String> {
        render_lines(&self.decreases)
    }

    /// Write both sections, each under a one-line title naming the year (or all years).
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        top_n: usize,
        year: Option<i32>,
    ) -> std::io::Result<()> {
        let scope = match year {
            Some(year) => format!("of {}", year),
            None => String::from("across all effective dates"),
        };

        writeln!(out, "Top {} NADAC per unit price increases {}:", top_n, scope)?;
        for line in self.increase_lines() {
            writeln!(out, "{}", line)?;
        }

        writeln!(out)?;
        writeln!(out, "Top {} NADAC per unit price decreases {}:", top_n, scope)?;
        for line in self.decrease_lines() {
            writeln!(out, "{}", line)?;
        }

        out.flush()
    }
}

fn render_lines(entries: &[(String, Decimal)]) -> Vec<String> {
    entries
        .iter()
        .map(|(description, delta)| format!("{}: {}", format_dollar_amount(*delta), description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(amount: &str) -> Decimal {
        Decimal::from_str(amount).unwrap()
    }

    fn index_of(rows: &[(&str, &str)]) -> PriceChangeIndex {
        let mut index = PriceChangeIndex::new();
        for (description, delta) in rows {
            index.insert(description.to_string(), decimal(delta));
        }
        index
    }

    fn deltas(entries: &[(String, Decimal)]) -> Vec<Decimal> {
        entries.iter().map(|(_, d)| *d).collect()
    }

    #[test]
    fn test_ranking_order() {
        let index = index_of(&[("a", "5"), ("b", "-3"), ("c", "10"), ("d", "-8"), ("e", "0")]);
        let report = build_report(&index, 3);
        assert_eq!(deltas(&report.increases), vec![decimal("10"), decimal("5"), decimal("0")]);
        assert_eq!(deltas(&report.decreases), vec![decimal("-8"), decimal("-3"), decimal("0")]);
    }

    #[test]
    fn test_fewer_entries_than_top_n() {
        let index = index_of(&[("a", "1.5"), ("b", "-2.25")]);
        let report = build_report(&index, DEFAULT_TOP_N);
        assert_eq!(report.increases.len(), 2);
        assert_eq!(report.decreases.len(), 2);
        assert_eq!(report.decreases[0].0, "b");
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let index = index_of(&[("first", "1"), ("second", "1"), ("third", "-1"), ("fourth", "-1")]);
        let report = build_report(&index, 4);
        let names: Vec<&str> = report.increases.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
        let names: Vec<&str> = report.decreases.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(names, vec!["third", "fourth", "first", "second"]);
    }

    #[test]
    fn test_format_dollar_amount() {
        assert_eq!(format_dollar_amount(decimal("-0.00542")), "-$0.00542");
        assert_eq!(format_dollar_amount(decimal("1261.36")), "$1261.36");
        assert_eq!(format_dollar_amount(decimal("0.15000")), "$0.15000");
        assert_eq!(format_dollar_amount(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_example_report() {
        let index = index_of(&[
            ("AMOXICILLIN 200 MG/5 ML SUSP", "-0.00542"),
            ("IBUPROFEN 200 MG SOFTGEL", "0.00877"),
            ("ACETAMINOPHEN 325 MG TABLET", "-0.00259"),
        ]);
        let report = build_report(&index, DEFAULT_TOP_N);
        assert_eq!(report.increase_lines()[0], "$0.00877: IBUPROFEN 200 MG SOFTGEL");
        assert_eq!(
            report.decrease_lines()[..2],
            [
                "-$0.00542: AMOXICILLIN 200 MG/5 ML SUSP".to_string(),
                "-$0.00259: ACETAMINOPHEN 325 MG TABLET".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_index_renders_empty_sections() {
        let report = build_report(&PriceChangeIndex::new(), DEFAULT_TOP_N);
        let mut out = Vec::new();
        report.write_to(&mut out, DEFAULT_TOP_N, Some(2022)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Top 10 NADAC per unit price increases of 2022:\n\nTop 10 NADAC per unit price decreases of 2022:\n"
        );
    }
}
