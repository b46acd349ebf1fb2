//! Codec Metrics
//!
//! Counters for packet traffic through a [`Dispatcher`](crate::protocol::dispatcher::Dispatcher).
//!
//! Uses atomic counters, so a collector can be shared by every connection task
//! without locking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for encode/decode operations
#[derive(Debug)]
pub struct Metrics {
    /// Packets successfully encoded
    pub packets_encoded: AtomicU64,
    /// Packets successfully decoded
    pub packets_decoded: AtomicU64,
    /// Bytes produced by successful encodes
    pub bytes_encoded: AtomicU64,
    /// Bytes consumed by successful decodes
    pub bytes_decoded: AtomicU64,
    /// Buffers whose leading id had no descriptor
    pub unknown_packets: AtomicU64,
    /// Failed decodes other than unknown ids
    pub decode_errors: AtomicU64,
    /// Failed encodes
    pub encode_errors: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            packets_encoded: AtomicU64::new(0),
            packets_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            unknown_packets: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a packet encoded into `byte_count` bytes
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a packet decoded from `byte_count` bytes
    pub fn packet_decoded(&self, byte_count: u64) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn unknown_packet(&self) {
        self.unknown_packets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            unknown_packets: self.unknown_packets.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_encoded = snapshot.packets_encoded,
            packets_decoded = snapshot.packets_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            unknown_packets = snapshot.unknown_packets,
            decode_errors = snapshot.decode_errors,
            encode_errors = snapshot.encode_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub packets_encoded: u64,
    pub packets_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub unknown_packets: u64,
    pub decode_errors: u64,
    pub encode_errors: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Share of decode attempts that failed, unknown ids included.
    pub fn decode_failure_rate(&self) -> f64 {
        let failures = self.unknown_packets + self.decode_errors;
        let total = failures + self.packets_decoded;
        if total == 0 {
            0.0
        } else {
            failures as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.packet_encoded(10);
        metrics.packet_encoded(5);
        metrics.packet_decoded(7);
        metrics.unknown_packet();
        metrics.decode_error();
        metrics.encode_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_encoded, 2);
        assert_eq!(snapshot.bytes_encoded, 15);
        assert_eq!(snapshot.bytes_decoded, 7);
        assert_eq!(snapshot.encode_errors, 1);
        assert!((snapshot.decode_failure_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_failure_rate() {
        assert_eq!(Metrics::default().snapshot().decode_failure_rate(), 0.0);
    }
}
