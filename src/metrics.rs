//! Inference statistics for a dashboard process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latency samples for profile evaluations
pub struct InferenceMetrics {
    /// Evaluations that produced a prediction
    pub predictions_served: AtomicU64,
    /// Evaluations rejected for invalid input
    pub inputs_rejected: AtomicU64,
    /// Workouts appended to session logs
    pub workouts_saved: AtomicU64,
    /// Evaluation times (in microseconds)
    evaluation_times: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            inputs_rejected: AtomicU64::new(0),
            workouts_saved: AtomicU64::new(0),
            evaluation_times: RwLock::new(Vec::with_capacity(256)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful evaluation
    pub fn record_prediction(&self, elapsed: Duration) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.evaluation_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    pub fn record_rejection(&self) {
        self.inputs_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved_workout(&self) {
        self.workouts_saved.fetch_add(1, Ordering::Relaxed);
    }

    /// Latency percentiles over the retained samples
    pub fn latency_stats(&self) -> LatencyStats {
        let times = match self.evaluation_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return LatencyStats::default(),
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = times;
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Log a summary of the session
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let rejected = self.inputs_rejected.load(Ordering::Relaxed);
        let saved = self.workouts_saved.load(Ordering::Relaxed);
        let latency = self.latency_stats();

        info!(
            predictions = served,
            rejected = rejected,
            saved_workouts = saved,
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Session summary"
        );
        if latency.count > 0 {
            info!(
                mean_us = latency.mean_us,
                p50_us = latency.p50_us,
                p95_us = latency.p95_us,
                max_us = latency.max_us,
                "Evaluation latency"
            );
        }
    }
}

impl Default for InferenceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluation latency statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = InferenceMetrics::new();

        metrics.record_prediction(Duration::from_micros(100));
        metrics.record_prediction(Duration::from_micros(300));
        metrics.record_rejection();
        metrics.record_saved_workout();

        assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.inputs_rejected.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.workouts_saved.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_latency_stats() {
        let metrics = InferenceMetrics::new();
        assert_eq!(metrics.latency_stats(), LatencyStats::default());

        for us in [40, 10, 30, 20] {
            metrics.record_prediction(Duration::from_micros(us));
        }

        let stats = metrics.latency_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 25);
        assert_eq!(stats.p50_us, 30);
        assert_eq!(stats.max_us, 40);
    }
}
