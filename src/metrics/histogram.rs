use hdrhistogram::Histogram;

use crate::error::MetricsError;

use super::Percentiles;

/// Latency histogram in milliseconds, three significant digits.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        let hist = Histogram::<u64>::new(3).map_err(|err| MetricsError::Histogram {
            context: "create",
            source: Box::new(err),
        })?;
        Ok(Self { hist })
    }

    /// Record a latency value in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency_ms: u64) -> Result<(), MetricsError> {
        self.hist
            .record(latency_ms)
            .map_err(|err| MetricsError::Histogram {
                context: "record",
                source: Box::new(err),
            })
    }

    /// Merge another histogram into this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge fails.
    #[cfg(test)]
    pub fn merge(&mut self, other: &LatencyHistogram) -> Result<(), MetricsError> {
        self.hist
            .add(&other.hist)
            .map_err(|err| MetricsError::Histogram {
                context: "merge",
                source: Box::new(err),
            })
    }

    #[must_use]
    pub fn quantile(&self, quantile: f64) -> u64 {
        if self.count() == 0 {
            return 0;
        }
        self.hist.value_at_quantile(quantile)
    }

    #[must_use]
    pub fn percentiles(&self) -> Option<Percentiles> {
        if self.count() == 0 {
            return None;
        }
        Some(Percentiles {
            p50: self.hist.value_at_quantile(0.5),
            p90: self.hist.value_at_quantile(0.9),
            p95: self.hist.value_at_quantile(0.95),
            p99: self.hist.value_at_quantile(0.99),
        })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
