//! Size-limited batching of calendar operations.
//!
//! The remote calendar service accepts at most [`MAX_BATCH_SIZE`] operations
//! per round trip. [`BatchDispatcher`] buffers operations, submits a full
//! batch as a side effect of [`BatchDispatcher::add`], and leaves whatever
//! remains to a final [`BatchDispatcher::flush`].

use async_trait::async_trait;

use crate::error::ReminderResult;

/// Hard per-batch operation limit of the remote service.
pub const MAX_BATCH_SIZE: usize = 50;

/// Result of one operation inside a submitted batch.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// Remote event id for successful creates, the operation's own key
    /// otherwise.
    pub id: String,
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn ok(id: impl Into<String>) -> Self {
        ItemOutcome {
            id: id.into(),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        ItemOutcome {
            id: id.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Submission channel for one kind of batched operation.
///
/// A `submit` call is a single round trip and must report one outcome per
/// operation. An `Err` is a transport failure and ends the run; failures of
/// individual operations belong in the returned outcomes and must not abort
/// the rest of the batch. The remote side does not guarantee ordering within
/// one batch.
#[async_trait]
pub trait BatchSink<Op: Send> {
    async fn submit(&mut self, batch: Vec<Op>) -> ReminderResult<Vec<ItemOutcome>>;
}

#[async_trait]
impl<'s, Op: Send + 'static, S: BatchSink<Op> + Send> BatchSink<Op> for &'s mut S {
    async fn submit(&mut self, batch: Vec<Op>) -> ReminderResult<Vec<ItemOutcome>> {
        (**self).submit(batch).await
    }
}

/// Accumulates operations and submits them in order, `limit` at a time.
///
/// The current batch buffer is exclusively owned here; a concurrent caller
/// running several dispatch runs must give each run its own dispatcher.
pub struct BatchDispatcher<Op, S> {
    sink: S,
    limit: usize,
    pending: Vec<Op>,
    batches_submitted: usize,
    operations_submitted: usize,
    failures: Vec<ItemOutcome>,
}

impl<Op: Send + 'static, S: BatchSink<Op> + Send> BatchDispatcher<Op, S> {
    pub fn new(sink: S) -> Self {
        Self::with_limit(sink, MAX_BATCH_SIZE)
    }

    pub fn with_limit(sink: S, limit: usize) -> Self {
        assert!(limit > 0, "batch limit must be positive");
        BatchDispatcher {
            sink,
            limit,
            pending: Vec::new(),
            batches_submitted: 0,
            operations_submitted: 0,
            failures: Vec::new(),
        }
    }

    /// Append one operation, submitting the batch transparently once it
    /// reaches the limit.
    pub async fn add(&mut self, operation: Op) -> ReminderResult<()> {
        self.pending.push(operation);
        if self.pending.len() >= self.limit {
            self.submit_pending().await?;
        }
        Ok(())
    }

    /// Submit whatever remains; no-op on an empty buffer. Must be called
    /// once after the last `add`, or the tail is silently dropped.
    pub async fn flush(&mut self) -> ReminderResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.submit_pending().await
    }

    async fn submit_pending(&mut self) -> ReminderResult<()> {
        let batch = std::mem::take(&mut self.pending);
        let size = batch.len();

        // No retries here: a transport error propagates and the operations
        // of this batch (and any unflushed tail) are lost for the run.
        let outcomes = self.sink.submit(batch).await?;

        self.batches_submitted += 1;
        self.operations_submitted += size;
        tracing::debug!(
            size,
            total = self.operations_submitted,
            "Submitted batch"
        );

        for outcome in outcomes {
            if outcome.is_failure() {
                tracing::warn!(
                    id = %outcome.id,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "Operation failed inside batch"
                );
                self.failures.push(outcome);
            }
        }
        Ok(())
    }

    pub fn batches_submitted(&self) -> usize {
        self.batches_submitted
    }

    pub fn operations_submitted(&self) -> usize {
        self.operations_submitted
    }

    /// Per-operation failures collected so far; these never abort a run.
    pub fn failures(&self) -> &[ItemOutcome] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<ItemOutcome> {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReminderError;

    #[derive(Default)]
    struct RecordingSink {
        batches: Vec<Vec<u32>>,
        fail_items: Vec<u32>,
        transport_error: bool,
    }

    #[async_trait]
    impl BatchSink<u32> for RecordingSink {
        async fn submit(&mut self, batch: Vec<u32>) -> ReminderResult<Vec<ItemOutcome>> {
            if self.transport_error {
                return Err(ReminderError::BatchTransport("connection reset".to_string()));
            }
            let outcomes = batch
                .iter()
                .map(|op| {
                    if self.fail_items.contains(op) {
                        ItemOutcome::failed(op.to_string(), "backend rejected")
                    } else {
                        ItemOutcome::ok(op.to_string())
                    }
                })
                .collect();
            self.batches.push(batch);
            Ok(outcomes)
        }
    }

    #[tokio::test]
    async fn test_batch_count_is_ceil_of_ops_over_limit() {
        let mut sink = RecordingSink::default();
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 3);
        for op in 0..7 {
            dispatcher.add(op).await.unwrap();
        }
        dispatcher.flush().await.unwrap();

        assert_eq!(dispatcher.batches_submitted(), 3);
        assert_eq!(dispatcher.operations_submitted(), 7);
        drop(dispatcher);
        assert_eq!(sink.batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    }

    #[tokio::test]
    async fn test_full_batch_submits_during_add() {
        let mut sink = RecordingSink::default();
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 2);
        dispatcher.add(1).await.unwrap();
        assert_eq!(dispatcher.batches_submitted(), 0);
        dispatcher.add(2).await.unwrap();
        // The limit was hit; no flush needed for these two.
        assert_eq!(dispatcher.batches_submitted(), 1);
    }

    #[tokio::test]
    async fn test_flush_on_empty_buffer_is_a_noop() {
        let mut sink = RecordingSink::default();
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 3);
        dispatcher.flush().await.unwrap();
        dispatcher.flush().await.unwrap();
        assert_eq!(dispatcher.batches_submitted(), 0);
        drop(dispatcher);
        assert!(sink.batches.is_empty());
    }

    #[tokio::test]
    async fn test_exact_multiple_leaves_no_tail() {
        let mut sink = RecordingSink::default();
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 3);
        for op in 0..6 {
            dispatcher.add(op).await.unwrap();
        }
        dispatcher.flush().await.unwrap();
        assert_eq!(dispatcher.batches_submitted(), 2);
    }

    #[tokio::test]
    async fn test_operations_keep_insertion_order() {
        let mut sink = RecordingSink::default();
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 4);
        for op in 0..11 {
            dispatcher.add(op).await.unwrap();
        }
        dispatcher.flush().await.unwrap();
        drop(dispatcher);

        let flattened: Vec<u32> = sink.batches.into_iter().flatten().collect();
        assert_eq!(flattened, (0..11).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_item_failure_does_not_abort_siblings() {
        let mut sink = RecordingSink {
            fail_items: vec![1],
            ..Default::default()
        };
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 2);
        for op in 0..4 {
            dispatcher.add(op).await.unwrap();
        }
        dispatcher.flush().await.unwrap();

        assert_eq!(dispatcher.failures().len(), 1);
        assert_eq!(dispatcher.failures()[0].id, "1");
        assert_eq!(dispatcher.operations_submitted(), 4);
        drop(dispatcher);
        // The failing item's siblings and the following batch still went out.
        assert_eq!(sink.batches, vec![vec![0, 1], vec![2, 3]]);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal() {
        let mut sink = RecordingSink {
            transport_error: true,
            ..Default::default()
        };
        let mut dispatcher = BatchDispatcher::with_limit(&mut sink, 2);
        dispatcher.add(1).await.unwrap();
        let err = dispatcher.add(2).await.unwrap_err();
        assert!(matches!(err, ReminderError::BatchTransport(_)));
    }
}
