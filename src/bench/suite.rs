//! A small async benchmark suite: named scenarios, warmup, timed samples.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;

use super::report::Report;
use crate::error::BenchResult;

/// One timed operation.
#[async_trait]
pub trait Scenario: Send + Sync {
    async fn run(&self) -> BenchResult<()>;
}

#[async_trait]
impl<F, Fut> Scenario for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = BenchResult<()>> + Send + 'static,
{
    async fn run(&self) -> BenchResult<()> {
        (self)().await
    }
}

/// How many times each scenario runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuiteOptions {
    /// Untimed runs before sampling starts.
    pub warmup: usize,
    /// Timed runs.
    pub samples: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            warmup: 1,
            samples: 10,
        }
    }
}

/// Timing statistics over a set of samples.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub samples: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub stddev_ms: f64,
    /// Relative margin of error at 95% confidence, in percent.
    pub rme: f64,
    pub ops_per_sec: f64,
}

impl Stats {
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        let n = ms.len() as f64;
        let mean = ms.iter().sum::<f64>() / n;
        let min = ms.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let variance = if ms.len() > 1 {
            ms.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let stddev = variance.sqrt();
        let sem = stddev / n.sqrt();
        let rme = if mean > 0.0 {
            t_critical(ms.len() - 1) * sem / mean * 100.0
        } else {
            0.0
        };
        let ops_per_sec = if mean > 0.0 { 1000.0 / mean } else { f64::INFINITY };

        Some(Self {
            samples: ms.len(),
            mean_ms: mean,
            min_ms: min,
            max_ms: max,
            stddev_ms: stddev,
            rme,
            ops_per_sec,
        })
    }
}

/// Two-sided Student's t at 95% for `df` degrees of freedom.
fn t_critical(df: usize) -> f64 {
    const TABLE: [f64; 30] = [
        12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179,
        2.16, 2.145, 2.131, 2.12, 2.11, 2.101, 2.093, 2.086, 2.08, 2.074, 2.069, 2.064, 2.06,
        2.056, 2.052, 2.048, 2.045, 2.042,
    ];
    match df {
        0 => 0.0,
        1..=30 => TABLE[df - 1],
        _ => 1.96,
    }
}

/// Outcome of one scenario.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub stats: Option<Stats>,
    /// First failure; the scenario stops sampling once one occurs.
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn ops_per_sec(&self) -> Option<f64> {
        match (&self.stats, &self.error) {
            (Some(stats), None) => Some(stats.ops_per_sec),
            _ => None,
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.stats, &self.error) {
            (_, Some(error)) => write!(f, "{}: failed: {error}", self.name),
            (Some(s), None) => write!(
                f,
                "{} x {:.2} ops/sec ±{:.2}% ({} runs sampled)",
                self.name, s.ops_per_sec, s.rme, s.samples
            ),
            (None, None) => write!(f, "{}: no samples", self.name),
        }
    }
}

/// Ordered collection of named scenarios.
pub struct Suite {
    name: String,
    options: SuiteOptions,
    scenarios: Vec<(String, Box<dyn Scenario>)>,
}

impl Suite {
    pub fn new(name: impl Into<String>, options: SuiteOptions) -> Self {
        Self {
            name: name.into(),
            options,
            scenarios: Vec::new(),
        }
    }

    pub fn add(mut self, name: impl Into<String>, scenario: impl Scenario + 'static) -> Self {
        self.scenarios.push((name.into(), Box::new(scenario)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Run every scenario in order.
    ///
    /// Each finished scenario is logged as a cycle line; a failing scenario is
    /// recorded and the suite moves on.
    pub async fn run(&self) -> Report {
        let mut results = Vec::with_capacity(self.scenarios.len());
        for (name, scenario) in &self.scenarios {
            let result = self.run_one(name, scenario.as_ref()).await;
            tracing::info!("{result}");
            results.push(result);
        }

        let report = Report::new(self.name.clone(), results);
        tracing::info!("Fastest is {}", report.fastest.join(", "));
        report
    }

    async fn run_one(&self, name: &str, scenario: &dyn Scenario) -> ScenarioResult {
        let failed = |e: crate::error::BenchError, samples: &[Duration]| ScenarioResult {
            name: name.to_string(),
            stats: Stats::from_samples(samples),
            error: Some(e.to_string()),
        };

        for _ in 0..self.options.warmup {
            if let Err(e) = scenario.run().await {
                return failed(e, &[]);
            }
        }

        let mut samples = Vec::with_capacity(self.options.samples);
        for _ in 0..self.options.samples {
            let start = Instant::now();
            if let Err(e) = scenario.run().await {
                return failed(e, &samples);
            }
            samples.push(start.elapsed());
        }

        ScenarioResult {
            name: name.to_string(),
            stats: Stats::from_samples(&samples),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn stats_of_known_samples() {
        let stats = Stats::from_samples(&ms(&[10, 20, 30])).unwrap();
        assert_eq!(stats.samples, 3);
        assert!((stats.mean_ms - 20.0).abs() < 1e-9);
        assert!((stats.min_ms - 10.0).abs() < 1e-9);
        assert!((stats.max_ms - 30.0).abs() < 1e-9);
        assert!((stats.stddev_ms - 10.0).abs() < 1e-9);
        assert!((stats.ops_per_sec - 50.0).abs() < 1e-9);
        // t(2) * 10 / sqrt(3) / 20 * 100
        assert!((stats.rme - 4.303 * 10.0 / 3f64.sqrt() / 20.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn single_sample_has_no_spread() {
        let stats = Stats::from_samples(&ms(&[5])).unwrap();
        assert_eq!(stats.stddev_ms, 0.0);
        assert_eq!(stats.rme, 0.0);
        assert!(Stats::from_samples(&[]).is_none());
    }

    #[tokio::test]
    async fn runs_warmup_plus_samples() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let suite = Suite::new("count", SuiteOptions { warmup: 2, samples: 3 }).add("inc", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BenchError>(())
            }
        });

        let report = suite.run().await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.results[0].stats.as_ref().unwrap().samples, 3);
        assert_eq!(report.fastest, vec!["inc".to_string()]);
    }

    #[tokio::test]
    async fn failing_scenario_is_recorded_and_skipped_for_fastest() {
        let suite = Suite::new("mixed", SuiteOptions { warmup: 0, samples: 2 })
            .add("ok", || async { Ok::<_, BenchError>(()) })
            .add("broken", || async { Err::<(), _>(BenchError::codec("inflate", "corrupt")) });

        let report = suite.run().await;
        assert!(report.results[1].error.as_deref().unwrap().contains("corrupt"));
        assert_eq!(report.fastest, vec!["ok".to_string()]);
    }
}
