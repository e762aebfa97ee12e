//! Fetch metrics collection and reporting
//!
//! Tracks latency percentiles and success rate of upstream fetches.

use crate::constants::METRICS_MAX_SAMPLES;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Snapshot of fetch metrics
#[derive(Debug, Clone, PartialEq)]
pub struct FetchMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful fetches, in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful fetches, in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of fetches
    pub total_fetches: u64,
    /// Number of failed fetches
    pub failed_fetches: u64,
}

impl FetchMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_fetches: 0,
            failed_fetches: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Samples {
    /// (duration_ms, success), most recent last
    window: VecDeque<(f64, bool)>,
    total: u64,
    failed: u64,
}

/// Collects fetch outcomes for one provider
pub struct MetricsCollector {
    provider_name: String,
    samples: RwLock<Samples>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a provider
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            samples: RwLock::new(Samples {
                window: VecDeque::with_capacity(METRICS_MAX_SAMPLES),
                ..Samples::default()
            }),
        }
    }

    /// Records a fetch with its duration and success status
    pub async fn record_fetch(&self, duration: Duration, success: bool) {
        let mut samples = self.samples.write().await;
        samples.total += 1;
        if !success {
            samples.failed += 1;
        }

        if samples.window.len() >= METRICS_MAX_SAMPLES {
            samples.window.pop_front();
        }
        samples
            .window
            .push_back((duration.as_secs_f64() * 1000.0, success));
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> FetchMetrics {
        let samples = self.samples.read().await;
        if samples.total == 0 {
            return FetchMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = samples
            .window
            .iter()
            .filter(|(_, success)| *success)
            .map(|(ms, _)| *ms)
            .collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        FetchMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (samples.total - samples.failed) as f64 / samples.total as f64,
            total_fetches: samples.total,
            failed_fetches: samples.failed,
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
