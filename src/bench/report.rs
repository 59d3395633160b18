//! Rendering suite results as a terminal table or JSON.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use super::suite::ScenarioResult;
use crate::error::{BenchError, BenchResult};

/// How a [`Report`] is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Results of one suite run.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub suite: String,
    pub results: Vec<ScenarioResult>,
    /// Names of the scenarios with the highest ops/sec.
    pub fastest: Vec<String>,
}

impl Report {
    pub fn new(suite: String, results: Vec<ScenarioResult>) -> Self {
        let best = results
            .iter()
            .filter_map(ScenarioResult::ops_per_sec)
            .fold(None, |best: Option<f64>, hz| Some(best.map_or(hz, |b| b.max(hz))));

        let fastest = match best {
            Some(best) => results
                .iter()
                .filter(|r| r.ops_per_sec() == Some(best))
                .map(|r| r.name.clone())
                .collect(),
            None => Vec::new(),
        };

        Self {
            suite,
            results,
            fastest,
        }
    }

    pub fn render(&self, format: ReportFormat) -> BenchResult<String> {
        match format {
            ReportFormat::Table => Ok(self.to_table()),
            ReportFormat::Json => self.to_json(),
        }
    }

    pub fn to_json(&self) -> BenchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BenchError::io("serialize report", e.into()))
    }

    pub fn to_table(&self) -> String {
        let name_width = self
            .results
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("scenario".len());

        let rule_width = name_width + 58;
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.suite);
        let _ = writeln!(out, "{}", "═".repeat(rule_width));
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>12}  {:>9}  {:>10}  {:>10}  {:>7}",
            "scenario", "ops/sec", "±rme", "mean ms", "min ms", "runs"
        );
        let _ = writeln!(out, "{}", "─".repeat(rule_width));

        for result in &self.results {
            match (&result.stats, &result.error) {
                (Some(s), None) => {
                    let _ = writeln!(
                        out,
                        "{:<name_width$}  {:>12.2}  {:>8.2}%  {:>10.3}  {:>10.3}  {:>7}",
                        result.name, s.ops_per_sec, s.rme, s.mean_ms, s.min_ms, s.samples
                    );
                }
                (_, Some(error)) => {
                    let _ = writeln!(out, "{:<name_width$}  failed: {error}", result.name);
                }
                (None, None) => {
                    let _ = writeln!(out, "{:<name_width$}  no samples", result.name);
                }
            }
        }

        let _ = writeln!(out, "{}", "─".repeat(rule_width));
        let _ = writeln!(out, "Fastest is {}", self.fastest.join(", "));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::suite::Stats;
    use std::time::Duration;

    fn result(name: &str, mean_ms: u64) -> ScenarioResult {
        ScenarioResult {
            name: name.to_string(),
            stats: Stats::from_samples(&[Duration::from_millis(mean_ms)]),
            error: None,
        }
    }

    fn sample_report() -> Report {
        let failed = ScenarioResult {
            name: "broken".to_string(),
            stats: None,
            error: Some("worker 0 failed".to_string()),
        };
        Report::new("images".to_string(), vec![result("slow", 20), result("quick", 5), failed])
    }

    #[test]
    fn fastest_ignores_failures() {
        assert_eq!(sample_report().fastest, vec!["quick".to_string()]);
    }

    #[test]
    fn table_lists_every_scenario() {
        let table = sample_report().to_table();
        assert!(table.starts_with("images\n═"));
        assert!(table.contains("quick"));
        assert!(table.contains("200.00"));
        assert!(table.contains("failed: worker 0 failed"));
        assert!(table.trim_end().ends_with("Fastest is quick"));
    }

    #[test]
    fn json_round_trips_through_serde_value() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["suite"], "images");
        assert_eq!(value["results"][1]["stats"]["samples"], 1);
        assert_eq!(value["fastest"][0], "quick");
        assert!(value["results"][2]["stats"].is_null());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(<ReportFormat as ValueEnum>::from_str("JSON", true), Ok(ReportFormat::Json));
        assert!(<ReportFormat as ValueEnum>::from_str("xml", true).is_err());
    }
}
