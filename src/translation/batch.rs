/*!
 * Batch dispatch.
 *
 * This module runs the translation service over every batch of a file, either
 * concurrently (bounded) or one batch at a time, and returns one result per
 * batch indexed identically to the batch order. Results are placed by batch
 * index, never by arrival order.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::TranslationError;
use crate::subtitle_processor::Batch;

use super::concurrency::DispatchMode;
use super::core::{BatchUsage, TokenUsageStats, TranslationService};
use super::result::TranslationResult;

/// Results of a complete dispatch
#[derive(Debug)]
pub struct DispatchOutcome {
    /// One result per batch, in batch order
    pub results: Vec<TranslationResult>,

    /// Token usage accumulated over all batches
    pub token_usage: TokenUsageStats,
}

/// Batch translator for processing subtitle batches
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Dispatch policy
    mode: DispatchMode,

    /// Maximum number of concurrent requests in concurrent mode
    max_concurrent_requests: usize,

    /// Stops unstarted batches and abandons the ones in flight
    cancellation: CancellationToken,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService, mode: DispatchMode, max_concurrent_requests: usize) -> Self {
        Self {
            service,
            mode,
            max_concurrent_requests: max_concurrent_requests.max(1),
            cancellation: CancellationToken::new(),
        }
    }

    /// Use an existing cancellation token
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Token that cancels this translator's dispatches
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Dispatch policy in use
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Translate every batch.
    ///
    /// `progress_callback` is called with `(completed, total)` after each batch
    /// settles. A failing batch degrades to an all-failed result and never
    /// affects the others. The only error is `TranslationError::Cancelled`,
    /// returned whenever the token fired, even if some batches finished.
    pub async fn translate_batches(
        &self,
        batches: &[Batch],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<DispatchOutcome, TranslationError> {
        let total = batches.len();
        debug!(
            "Dispatching {} batches via {} ({} mode, up to {} concurrent)",
            total, self.service.provider_name(), self.mode, self.max_concurrent_requests
        );

        let settled = match self.mode {
            DispatchMode::Concurrent => self.dispatch_concurrent(batches, progress_callback).await,
            DispatchMode::Sequential => self.dispatch_sequential(batches, progress_callback).await,
        };

        let mut token_usage = self.service.new_usage_stats();
        let mut results = Vec::with_capacity(total);
        let mut completed = 0;

        for (result, usage) in settled.into_iter().flatten() {
            token_usage.merge(&usage);
            results.push(result);
            completed += 1;
        }

        if self.cancellation.is_cancelled() || completed < total {
            warn!("Dispatch cancelled after {} of {} batches", completed, total);
            return Err(TranslationError::Cancelled { completed, total });
        }

        Ok(DispatchOutcome { results, token_usage })
    }

    /// Fire batches concurrently and wait for all of them to settle
    async fn dispatch_concurrent(
        &self,
        batches: &[Batch],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<Option<(TranslationResult, BatchUsage)>> {
        let total = batches.len();
        let processed_batches = Arc::new(AtomicUsize::new(0));

        let arrived = stream::iter(batches.iter().enumerate())
            .map(|(position, batch)| {
                let service = &self.service;
                let cancellation = self.cancellation.clone();
                let processed_batches = processed_batches.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let outcome = Self::run_batch(service, batch, total, &cancellation).await;
                    if outcome.is_some() {
                        let current = processed_batches.fetch_add(1, Ordering::SeqCst) + 1;
                        progress_callback(current, total);
                    }
                    (position, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        let mut settled: Vec<Option<(TranslationResult, BatchUsage)>> = vec![None; total];
        for (position, outcome) in arrived {
            settled[position] = outcome;
        }
        settled
    }

    /// Run batches one after another, reporting progress after each
    async fn dispatch_sequential(
        &self,
        batches: &[Batch],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<Option<(TranslationResult, BatchUsage)>> {
        let total = batches.len();
        let mut settled = Vec::with_capacity(total);

        for (position, batch) in batches.iter().enumerate() {
            let Some(outcome) = Self::run_batch(&self.service, batch, total, &self.cancellation).await else {
                break;
            };
            settled.push(Some(outcome));
            progress_callback(position + 1, total);
        }

        settled.resize(total, None);
        settled
    }

    /// Translate one batch unless cancelled; `None` when it was skipped or abandoned
    async fn run_batch(
        service: &TranslationService,
        batch: &Batch,
        total: usize,
        cancellation: &CancellationToken,
    ) -> Option<(TranslationResult, BatchUsage)> {
        if cancellation.is_cancelled() {
            return None;
        }

        debug!("Processing batch {} of {} ({} captions)", batch.index + 1, total, batch.len());
        let start_time = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Batch {} abandoned after {:?}", batch.index + 1, start_time.elapsed());
                return None;
            }
            outcome = service.translate_batch(batch) => outcome,
        };

        debug!(
            "Batch {} completed in {:?} ({} of {} slots failed)",
            batch.index + 1, start_time.elapsed(), outcome.0.failed_count(), batch.len()
        );
        Some(outcome)
    }
}
