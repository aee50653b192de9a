//! Metrics collection module
//!
//! Tracks marketplace response times, failure rates and search volume.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Response times kept per marketplace for the rolling average
const RESPONSE_TIME_WINDOW: usize = 100;

/// Metrics collector shared by the aggregator and the web layer
pub struct Metrics {
    /// Aggregated searches accepted
    total_searches: AtomicU64,
    /// Aggregated searches rejected by validation
    rejected_searches: AtomicU64,
    /// Per-marketplace counters
    sources: RwLock<HashMap<String, SourceCounters>>,
}

#[derive(Default)]
struct SourceCounters {
    searches: u64,
    successes: u64,
    errors: u64,
    response_times: VecDeque<u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            rejected_searches: AtomicU64::new(0),
            sources: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed marketplace fetch
    pub fn record_success(&self, source: &str, time_ms: u64) {
        let mut sources = self.sources.write().unwrap();
        let counters = sources.entry(source.to_string()).or_default();
        counters.searches += 1;
        counters.successes += 1;

        if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
            counters.response_times.pop_front();
        }
        counters.response_times.push_back(time_ms);
    }

    /// Record a failed marketplace fetch
    pub fn record_error(&self, source: &str) {
        let mut sources = self.sources.write().unwrap();
        let counters = sources.entry(source.to_string()).or_default();
        counters.searches += 1;
        counters.errors += 1;
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_rejected_searches(&self) -> u64 {
        self.rejected_searches.load(Ordering::Relaxed)
    }

    /// Average response time of successful fetches
    pub fn get_avg_response_time(&self, source: &str) -> Option<u64> {
        self.sources.read().unwrap().get(source)?.avg_response_time()
    }

    /// Success percentage; 100 for a marketplace never searched
    pub fn get_reliability(&self, source: &str) -> f64 {
        self.sources
            .read()
            .unwrap()
            .get(source)
            .map(|c| c.reliability())
            .unwrap_or(100.0)
    }

    /// Statistics for every marketplace searched so far
    pub fn get_source_stats(&self) -> HashMap<String, SourceStats> {
        let sources = self.sources.read().unwrap();
        sources
            .iter()
            .map(|(id, c)| {
                let stats = SourceStats {
                    searches: c.searches,
                    errors: c.errors,
                    avg_response_time: c.avg_response_time(),
                    reliability: c.reliability(),
                };
                (id.clone(), stats)
            })
            .collect()
    }
}

impl SourceCounters {
    fn avg_response_time(&self) -> Option<u64> {
        if self.response_times.is_empty() {
            None
        } else {
            Some(self.response_times.iter().sum::<u64>() / self.response_times.len() as u64)
        }
    }

    fn reliability(&self) -> f64 {
        if self.searches == 0 {
            100.0
        } else {
            (self.successes as f64 / self.searches as f64) * 100.0
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single marketplace
#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub searches: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_success("ebay", 100);
        metrics.record_success("ebay", 200);

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_avg_response_time("ebay"), Some(150));
        assert_eq!(metrics.get_reliability("ebay"), 100.0);
    }

    #[test]
    fn test_reliability_counts_errors() {
        let metrics = Metrics::new();
        metrics.record_success("goldin", 10);
        metrics.record_error("goldin");

        assert_eq!(metrics.get_reliability("goldin"), 50.0);
        assert_eq!(metrics.get_reliability("never-searched"), 100.0);
        assert_eq!(metrics.get_avg_response_time("never-searched"), None);

        let stats = metrics.get_source_stats();
        assert_eq!(stats["goldin"].searches, 2);
        assert_eq!(stats["goldin"].errors, 1);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_success("pwcc", 1000);
        }
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_success("pwcc", 10);
        }
        assert_eq!(metrics.get_avg_response_time("pwcc"), Some(10));
    }
}
