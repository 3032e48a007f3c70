use std::sync::atomic::{AtomicU64, Ordering};

use shared::{AnalyticsSnapshot, PredictionMode, QualityLabel};

/// Receives one event per successful prediction and reports running totals.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, label: QualityLabel, mode: PredictionMode);
    fn snapshot(&self) -> AnalyticsSnapshot;
}

/// Process-lifetime counters. Increments are independent, so relaxed
/// ordering is enough.
#[derive(Debug, Default)]
pub struct InMemoryAnalytics {
    total: AtomicU64,
    low_quality: AtomicU64,
    average_quality: AtomicU64,
    high_quality: AtomicU64,
    data_only: AtomicU64,
    image_only: AtomicU64,
    data_and_image: AtomicU64,
}

impl InMemoryAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    fn label_counter(&self, label: QualityLabel) -> &AtomicU64 {
        match label {
            QualityLabel::Low => &self.low_quality,
            QualityLabel::Average => &self.average_quality,
            QualityLabel::High => &self.high_quality,
        }
    }

    fn mode_counter(&self, mode: PredictionMode) -> &AtomicU64 {
        match mode {
            PredictionMode::DataOnly => &self.data_only,
            PredictionMode::ImageOnly => &self.image_only,
            PredictionMode::DataAndImage => &self.data_and_image,
        }
    }
}

impl AnalyticsSink for InMemoryAnalytics {
    fn record(&self, label: QualityLabel, mode: PredictionMode) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.label_counter(label).fetch_add(1, Ordering::Relaxed);
        self.mode_counter(mode).fetch_add(1, Ordering::Relaxed);
        log::debug!("Recorded prediction event: {} / {}", label, mode);
    }

    fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            low_quality: self.low_quality.load(Ordering::Relaxed),
            average_quality: self.average_quality.load(Ordering::Relaxed),
            high_quality: self.high_quality.load(Ordering::Relaxed),
            data_only: self.data_only.load(Ordering::Relaxed),
            image_only: self.image_only.load(Ordering::Relaxed),
            data_and_image: self.data_and_image.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fresh_store_reports_all_keys_at_zero() {
        let snapshot = InMemoryAnalytics::new().snapshot();
        for key in AnalyticsSnapshot::KEYS {
            assert_eq!(snapshot.get(key), Some(0), "key {}", key);
        }
    }

    #[test]
    fn one_event_bumps_total_label_and_mode() {
        let analytics = InMemoryAnalytics::new();
        analytics.record(QualityLabel::High, PredictionMode::DataOnly);

        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.get("total"), Some(1));
        assert_eq!(snapshot.get("High Quality"), Some(1));
        assert_eq!(snapshot.get("Data Only"), Some(1));
        for key in ["Low Quality", "Average Quality", "Image Only", "Data + Image"] {
            assert_eq!(snapshot.get(key), Some(0), "key {}", key);
        }
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let analytics = Arc::new(InMemoryAnalytics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let analytics = analytics.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        analytics.record(QualityLabel::Average, PredictionMode::DataAndImage);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.total, 2000);
        assert_eq!(snapshot.average_quality, 2000);
        assert_eq!(snapshot.data_and_image, 2000);
    }
}
