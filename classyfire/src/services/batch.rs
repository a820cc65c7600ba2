//! Batch classification orchestrator
//!
//! Drives the cache and the rate-limited fetcher over a sequence of
//! identifiers and yields results lazily, in input order.
//!
//! # Passes
//! 1. Every identifier in input order: cache hit → emit; miss → fetch.
//!    Empty results follow [`EmptyClassificationPolicy`]; under `RetryLast`
//!    the identifier joins the retry queue and its output slot is held.
//! 2. Only under `RetryLast` with a non-empty queue: wait `retry_delay`, then
//!    fetch every queued identifier exactly once more, in queue order. Still
//!    empty → cached as empty and emitted.
//!
//! Results are yielded eagerly up to the first held slot; everything behind
//! it is buffered until the slot resolves.

use crate::error::{ClassyFireError, Result};
use crate::models::{Classification, EmptyClassificationPolicy, FailurePolicy, Identifier};
use crate::services::cache::ClassificationCache;
use crate::services::fetcher::RateLimitedFetcher;
use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Receives batch progress
///
/// `total` is the number of identifiers in the batch; retries never raise it.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, completed: usize, total: usize);
}

/// Discards progress
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _completed: usize, _total: usize) {}
}

/// Logs progress through `tracing`
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, completed: usize, total: usize) {
        info!(completed, total, "Classification progress");
    }
}

/// Output slot of one input position
enum Slot {
    Ready(Result<Classification>),
    /// Waiting for the retry pass
    Deferred(Identifier),
}

/// Outcome of the first pass for one identifier
enum FirstPass {
    Resolved(Classification),
    Deferred,
}

/// Cache + fetcher + policies
pub struct BatchOrchestrator {
    fetcher: RateLimitedFetcher,
    cache: ClassificationCache,
    empty_policy: EmptyClassificationPolicy,
    failure_policy: FailurePolicy,
    retry_delay: Duration,
    progress: Arc<dyn ProgressReporter>,
}

impl BatchOrchestrator {
    pub fn new(fetcher: RateLimitedFetcher, cache: ClassificationCache) -> Self {
        Self {
            fetcher,
            cache,
            empty_policy: EmptyClassificationPolicy::default(),
            failure_policy: FailurePolicy::default(),
            retry_delay: Duration::from_secs(10),
            progress: Arc::new(SilentProgress),
        }
    }

    pub fn with_empty_policy(mut self, policy: EmptyClassificationPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Classify a single identifier under the configured policies
    pub async fn classify(&self, identifier: &Identifier) -> Result<Classification> {
        let results = self.classify_many(vec![identifier.clone()]);
        pin_mut!(results);
        match results.next().await {
            Some(result) => result,
            None => Err(ClassyFireError::Storage(format!(
                "no result produced for '{}'",
                identifier
            ))),
        }
    }

    /// Classify `identifiers`, yielding one item per input in input order
    ///
    /// Under `FailurePolicy::Skip` a failed request yields `Err` in its slot
    /// and the batch continues. Any other error is the last item.
    pub fn classify_many(
        &self,
        identifiers: Vec<Identifier>,
    ) -> impl Stream<Item = Result<Classification>> + '_ {
        stream! {
            let total = identifiers.len();
            let mut completed = 0usize;
            let mut slots: VecDeque<Slot> = VecDeque::new();
            let mut retry_queue: Vec<Identifier> = Vec::new();
            let mut queued: HashSet<Identifier> = HashSet::new();

            for identifier in identifiers {
                // Already waiting for the retry pass: share its slot outcome
                if queued.contains(&identifier) {
                    slots.push_back(Slot::Deferred(identifier));
                    self.progress.report(completed, total);
                    continue;
                }

                match self.first_pass(&identifier).await {
                    Ok(FirstPass::Resolved(classification)) => {
                        completed += 1;
                        slots.push_back(Slot::Ready(Ok(classification)));
                    }
                    Ok(FirstPass::Deferred) => {
                        queued.insert(identifier.clone());
                        retry_queue.push(identifier.clone());
                        slots.push_back(Slot::Deferred(identifier));
                    }
                    Err(e) if e.is_request_failure() && self.failure_policy == FailurePolicy::Skip => {
                        warn!(identifier = %identifier, error = %e, "Skipping identifier");
                        completed += 1;
                        slots.push_back(Slot::Ready(Err(e)));
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }

                self.progress.report(completed, total);

                while matches!(slots.front(), Some(Slot::Ready(_))) {
                    if let Some(Slot::Ready(result)) = slots.pop_front() {
                        yield result;
                    }
                }
            }

            if retry_queue.is_empty() {
                return;
            }

            info!(
                count = retry_queue.len(),
                delay_secs = self.retry_delay.as_secs_f64(),
                "Retrying empty classifications"
            );
            sleep(self.retry_delay).await;

            let mut resolved: HashMap<Identifier, Result<Classification>> = HashMap::new();

            for identifier in retry_queue {
                let outcome = match self.fetcher.fetch(&identifier).await {
                    Ok(Classification::Empty) => {
                        warn!(identifier = %identifier, "Classification still empty after retry");
                        self.store(&identifier, &Classification::Empty).await;
                        Ok(Classification::Empty)
                    }
                    Ok(classification) => {
                        info!(identifier = %identifier, "Retry produced a classification");
                        self.store(&identifier, &classification).await;
                        Ok(classification)
                    }
                    Err(e) if self.failure_policy == FailurePolicy::Skip => {
                        warn!(identifier = %identifier, error = %e, "Skipping identifier");
                        Err(e)
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                completed += slots
                    .iter()
                    .filter(|slot| matches!(slot, Slot::Deferred(id) if *id == identifier))
                    .count();
                self.progress.report(completed, total);
                resolved.insert(identifier, outcome);

                // Flush everything up to the next unresolved slot
                loop {
                    let ready = match slots.front() {
                        Some(Slot::Ready(_)) => true,
                        Some(Slot::Deferred(id)) => resolved.contains_key(id),
                        None => false,
                    };
                    if !ready {
                        break;
                    }
                    let result = match slots.pop_front() {
                        Some(Slot::Ready(result)) => result,
                        Some(Slot::Deferred(id)) => match resolved.get(&id) {
                            Some(result) => result.clone(),
                            None => break,
                        },
                        None => break,
                    };
                    yield result;
                }
            }
        }
    }

    /// Cache lookup, then fetch on miss
    async fn first_pass(&self, identifier: &Identifier) -> Result<FirstPass> {
        if let Some(hit) = self.cache.get(identifier).await {
            debug!(identifier = %identifier, "Cache hit");
            return Ok(FirstPass::Resolved(hit));
        }

        match self.fetcher.fetch(identifier).await? {
            Classification::Empty => match self.empty_policy {
                EmptyClassificationPolicy::Raise => Err(identifier.empty_classification_error()),
                EmptyClassificationPolicy::Accept => {
                    warn!(identifier = %identifier, "Empty classification");
                    self.store(identifier, &Classification::Empty).await;
                    Ok(FirstPass::Resolved(Classification::Empty))
                }
                EmptyClassificationPolicy::RetryLast => {
                    warn!(
                        identifier = %identifier,
                        "Empty classification, will retry at the end of the batch"
                    );
                    Ok(FirstPass::Deferred)
                }
            },
            classification => {
                self.store(identifier, &classification).await;
                Ok(FirstPass::Resolved(classification))
            }
        }
    }

    /// Cache write; failures are warnings only
    async fn store(&self, identifier: &Identifier, classification: &Classification) {
        if let Err(e) = self.cache.put(identifier, classification).await {
            warn!(error = %e, "Classification kept in memory only");
        }
    }
}
