use std::time::Duration;
use tracing::info;

use crate::models::{ItemRecord, SourceTag};
use crate::pipeline::ResolutionPipeline;

/// Records recovered by one batch, in the order their ids were supplied.
#[derive(Debug, Default)]
pub struct RecoveryOutcome {
    pub records: Vec<ItemRecord>,
}

impl RecoveryOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Count per source, in the order each source first appeared.
    pub fn source_counts(&self) -> Vec<(SourceTag, usize)> {
        let mut counts: Vec<(SourceTag, usize)> = Vec::new();
        for record in &self.records {
            match counts.iter_mut().find(|(tag, _)| *tag == record.source()) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.source(), 1)),
            }
        }
        counts
    }
}

/// Resolves ids one at a time, pausing between calls to go easy on the
/// remote sources.
pub struct BatchRecovery<'a> {
    pipeline: &'a ResolutionPipeline,
    delay: Duration,
    jitter: Duration,
}

impl<'a> BatchRecovery<'a> {
    pub fn new(pipeline: &'a ResolutionPipeline) -> Self {
        Self {
            pipeline,
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_throttle(mut self, delay: Duration, jitter: Duration) -> Self {
        self.delay = delay;
        self.jitter = jitter;
        self
    }

    fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.delay;
        }
        self.delay + Duration::from_millis(rand::random::<u64>() % jitter_ms)
    }

    pub async fn recover(&self, ids: &[String]) -> RecoveryOutcome {
        let mut outcome = RecoveryOutcome::default();

        for (index, id) in ids.iter().enumerate() {
            if index > 0 {
                let pause = self.next_delay();
                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
            }

            let record = self.pipeline.resolve(id).await;
            info!(id = %id, source = %record.source(), "recovered product");
            outcome.records.push(record);
        }

        outcome
    }
}
