use std::sync::Arc;

use async_trait::async_trait;

use super::retry::RetryPolicy;

/// Outcome of one or more submitted batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub submitted: usize,
    pub succeeded: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.submitted - self.succeeded.min(self.submitted)
    }

    fn absorb(&mut self, other: BatchReport) {
        self.submitted += other.submitted;
        self.succeeded += other.succeeded;
    }
}

/// Destination of batched items (a search index, a queue, ...).
#[async_trait]
pub trait BatchSink<T: Sync>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit one batch, reporting how many items were accepted.
    async fn submit(&self, batch: &[T]) -> Result<BatchReport, Self::Error>;

    /// Whether resubmitting the same batch may succeed.
    fn is_transient(&self, _error: &Self::Error) -> bool {
        false
    }
}

/// Collects items and submits them to a sink whenever the batch is full.
pub struct BatchSubmitter<T, S: ?Sized> {
    buffer: Vec<T>,
    batch_size: usize,
    sink: Arc<S>,
    retry: RetryPolicy,
    totals: BatchReport,
    batches: usize,
}

impl<T, S> BatchSubmitter<T, S>
where
    T: Send + Sync,
    S: BatchSink<T> + ?Sized,
{
    pub fn new(sink: Arc<S>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            sink,
            retry: RetryPolicy::none(),
            totals: BatchReport::default(),
            batches: 0,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Add an item. Returns the batch report if this filled the batch (auto-flush).
    pub async fn add(&mut self, item: T) -> Result<Option<BatchReport>, S::Error> {
        self.buffer.push(item);
        if self.buffer.len() >= self.batch_size {
            self.flush().await
        } else {
            Ok(None)
        }
    }

    /// Submit whatever is buffered. `None` when nothing was pending.
    ///
    /// On failure the items stay buffered.
    pub async fn flush(&mut self) -> Result<Option<BatchReport>, S::Error> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let sink = self.sink.as_ref();
        let batch = &self.buffer;
        let report = self
            .retry
            .run(|| sink.submit(batch), |e| sink.is_transient(e))
            .await?;

        self.buffer.clear();
        self.batches += 1;
        self.totals.absorb(report);
        Ok(Some(report))
    }

    /// Number of items currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Totals across every successful flush.
    pub fn totals(&self) -> BatchReport {
        self.totals
    }

    pub fn batches(&self) -> usize {
        self.batches
    }
}
