//! Bounded-concurrency fan-out of many documents over one [`EtsApi`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::future::{BoxFuture, join_all};
use tokio::sync::Semaphore;
use uuid::Uuid;

use super::api::EtsApi;
use super::config::RetryPolicy;
use super::error::ClientError;
use super::models::{SendResult, StatusInfo};
use crate::core::{Dispatch, Invoice, ProducerReceipt};

/// Settings for [`BulkSender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    /// Maximum number of requests in flight at once.
    pub concurrency: usize,
    /// Per-item retry policy, applied on top of any retries done by the client.
    pub retry: RetryPolicy,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome for one input item.
#[derive(Debug)]
pub struct BulkItem<T> {
    /// Position of the item in the input slice.
    pub index: usize,
    /// Attempts made, including the first.
    pub attempts: u32,
    pub result: Result<T, ClientError>,
}

/// Outcome of a bulk run. `items` is ordered like the input.
#[derive(Debug)]
pub struct BulkReport<T> {
    pub items: Vec<BulkItem<T>>,
    pub succeeded: usize,
    pub failed: usize,
}

impl<T> BulkReport<T> {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|v| (item.index, v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &ClientError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (item.index, e)))
    }
}

/// Sends or queries many documents with bounded concurrency and per-item retry.
///
/// ```ignore
/// let bulk = BulkSender::with_options(client, BulkOptions { concurrency: 8, ..Default::default() });
/// let report = bulk.send_invoices(&invoices).await;
/// for (index, err) in report.failures() {
///     eprintln!("invoice #{index} failed: {err}");
/// }
/// ```
pub struct BulkSender<C> {
    client: C,
    options: BulkOptions,
}

impl<C: EtsApi> BulkSender<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, BulkOptions::default())
    }

    pub fn with_options(client: C, options: BulkOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run `op` for every input. Retryable failures are retried with
    /// exponential backoff up to `options.retry.max_attempts` attempts.
    pub async fn run<I, T, F>(&self, inputs: &[I], op: F) -> BulkReport<T>
    where
        F: for<'a> Fn(&'a C, &'a I) -> BoxFuture<'a, Result<T, ClientError>>,
    {
        let started = Instant::now();
        let semaphore = Semaphore::new(self.options.concurrency.max(1));
        let succeeded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let policy = self.options.retry;
        let max_attempts = policy.max_attempts.max(1);

        let tasks = inputs.iter().enumerate().map(|(index, input)| {
            let semaphore = &semaphore;
            let succeeded = &succeeded;
            let failed = &failed;
            let op = &op;
            async move {
                let _permit = semaphore.acquire().await.ok();
                let mut attempts = 0;
                loop {
                    attempts += 1;
                    match op(&self.client, input).await {
                        Err(e) if e.is_retryable() && attempts < max_attempts => {
                            let delay = policy.delay_for(attempts - 1);
                            tracing::debug!(index, attempts, error = %e, "bulk item failed, retrying");
                            tokio::time::sleep(delay).await;
                        }
                        result => {
                            let counter = if result.is_ok() { succeeded } else { failed };
                            counter.fetch_add(1, Ordering::Relaxed);
                            return BulkItem {
                                index,
                                attempts,
                                result,
                            };
                        }
                    }
                }
            }
        });

        let items = join_all(tasks).await;
        let report = BulkReport {
            items,
            succeeded: succeeded.into_inner(),
            failed: failed.into_inner(),
        };
        tracing::info!(
            total = inputs.len(),
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bulk run finished"
        );
        report
    }

    pub async fn send_invoices(&self, invoices: &[Invoice]) -> BulkReport<SendResult> {
        self.run(invoices, |client, invoice| client.send_invoice(invoice))
            .await
    }

    pub async fn invoice_statuses(&self, uuids: &[Uuid]) -> BulkReport<StatusInfo> {
        self.run(uuids, |client, uuid| client.get_invoice_status(*uuid))
            .await
    }

    pub async fn send_dispatches(&self, dispatches: &[Dispatch]) -> BulkReport<SendResult> {
        self.run(dispatches, |client, dispatch| client.send_dispatch(dispatch))
            .await
    }

    pub async fn send_producer_receipts(
        &self,
        receipts: &[ProducerReceipt],
    ) -> BulkReport<SendResult> {
        self.run(receipts, |client, receipt| {
            client.send_producer_receipt(receipt)
        })
        .await
    }
}
