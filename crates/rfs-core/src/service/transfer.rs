//! Per-chunk progress for the primary body: broadcast a fraction and refresh the indicator.

use std::sync::Arc;

use crate::indicator::{IndicatorId, IndicatorProgress, IndicatorState, ProgressIndicator};
use crate::progress::{Fraction, ProgressCallback, ProgressStream};
use crate::subject::DownloadSubject;

/// Decimal megabyte, as shown in indicator text.
const MB: f64 = 1_000_000.0;

/// Indicator text for `bytes` out of an optional `total`.
pub fn progress_text(bytes: u64, total: Option<u64>) -> String {
    let current = bytes as f64 / MB;
    match total {
        Some(total) if total > 0 => format!("{:.2} / {:.2} MB", current, total as f64 / MB),
        _ => format!("{:.2} MB / ??", current),
    }
}

/// Callback installed on the primary body's [`CountingReader`](crate::progress::CountingReader).
pub(super) struct TransferProgress {
    id: IndicatorId,
    subject: Arc<DownloadSubject>,
    total: Option<u64>,
    indicator: Arc<dyn ProgressIndicator>,
    progress: ProgressStream,
}

impl TransferProgress {
    pub(super) fn new(
        subject: &Arc<DownloadSubject>,
        total: Option<u64>,
        indicator: Arc<dyn ProgressIndicator>,
        progress: ProgressStream,
    ) -> Self {
        Self {
            id: IndicatorId::from(subject.id()),
            subject: Arc::clone(subject),
            total,
            indicator,
            progress,
        }
    }
}

impl ProgressCallback for TransferProgress {
    fn on_progress(&mut self, bytes_read: u64) {
        let fraction = Fraction::from_bytes(bytes_read, self.total);
        self.progress.publish(fraction, &self.subject);

        let text = progress_text(bytes_read, self.total);
        let bar = match (fraction, self.total) {
            (Fraction::Known(_), Some(max)) => IndicatorProgress::Determinate {
                current: bytes_read.min(max),
                max,
            },
            _ => IndicatorProgress::Indeterminate,
        };
        self.indicator.update(self.id, &|state: &mut IndicatorState| {
            state.text.clone_from(&text);
            state.progress = bar;
        });
    }
}
