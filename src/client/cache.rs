//! Read-through cache for status lookups and user checks.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use super::api::EtsApi;
use super::error::ClientError;
use super::models::{
    Acknowledgement, DocumentContent, DocumentFormat, InvoiceResponse, SendResult, StatusInfo,
    UserInfo,
};
use crate::core::{Dispatch, DocumentKind, Invoice, ProducerReceipt};

/// Time-to-live settings for [`CachingClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a document status is served from cache.
    pub status_ttl: Duration,
    /// How long an e-Fatura registration lookup is served from cache.
    pub user_ttl: Duration,
    /// Per-map entry limit; expired entries are evicted when it is reached.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            status_ttl: Duration::from_secs(30),
            user_ttl: Duration::from_secs(60 * 60),
            max_entries: 10_000,
        }
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently stored, expired ones included until evicted.
    pub entries: usize,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

type StatusKey = (DocumentKind, Uuid);

/// [`EtsApi`] decorator caching status lookups and user checks.
///
/// Only successful results are cached. Sending, cancelling or responding to a
/// document drops its cached status, and a lookup that was in flight while an
/// entry was dropped does not write its result back.
pub struct CachingClient<C> {
    inner: C,
    config: CacheConfig,
    statuses: RwLock<HashMap<StatusKey, Entry<StatusInfo>>>,
    users: RwLock<HashMap<String, Entry<UserInfo>>>,
    /// Bumped under the write lock whenever entries are dropped.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: EtsApi> CachingClient<C> {
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    pub fn with_config(inner: C, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            statuses: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.statuses.read().await.len() + self.users.read().await.len(),
        }
    }

    /// Drop every cached entry. Counters are kept.
    pub async fn clear(&self) {
        let mut statuses = self.statuses.write().await;
        let mut users = self.users.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        statuses.clear();
        users.clear();
    }

    async fn invalidate_status(&self, kind: DocumentKind, uuid: Uuid) {
        let mut statuses = self.statuses.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        statuses.remove(&(kind, uuid));
    }

    async fn cached<K, V, F, Fut>(
        &self,
        map: &RwLock<HashMap<K, Entry<V>>>,
        key: K,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, ClientError>
    where
        K: Eq + Hash,
        V: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ClientError>>,
    {
        if let Some(entry) = map.read().await.get(&key) {
            if entry.expires_at > Instant::now() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(entry.value.clone());
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let generation = self.generation.load(Ordering::SeqCst);
        let value = fetch().await?;

        let mut map = map.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            // invalidated while fetching; the value may predate the change
            return Ok(value);
        }
        let now = Instant::now();
        if map.len() >= self.config.max_entries {
            map.retain(|_, e| e.expires_at > now);
        }
        if map.len() < self.config.max_entries {
            map.insert(
                key,
                Entry {
                    value: value.clone(),
                    expires_at: now + ttl,
                },
            );
        }
        Ok(value)
    }

    async fn status(&self, kind: DocumentKind, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.cached(&self.statuses, (kind, uuid), self.config.status_ttl, || async move {
            match kind {
                DocumentKind::Invoice => self.inner.get_invoice_status(uuid).await,
                DocumentKind::Dispatch => self.inner.get_dispatch_status(uuid).await,
                DocumentKind::ProducerReceipt => {
                    self.inner.get_producer_receipt_status(uuid).await
                }
            }
        })
        .await
    }
}

#[async_trait]
impl<C: EtsApi> EtsApi for CachingClient<C> {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        let result = self.inner.send_invoice(invoice).await;
        self.invalidate_status(DocumentKind::Invoice, invoice.uuid)
            .await;
        result
    }

    async fn save_invoice_draft(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        let result = self.inner.save_invoice_draft(invoice).await;
        self.invalidate_status(DocumentKind::Invoice, invoice.uuid)
            .await;
        result
    }

    async fn get_invoice_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.status(DocumentKind::Invoice, uuid).await
    }

    async fn cancel_invoice(
        &self,
        uuid: Uuid,
        reason: &str,
    ) -> Result<Acknowledgement, ClientError> {
        let result = self.inner.cancel_invoice(uuid, reason).await;
        self.invalidate_status(DocumentKind::Invoice, uuid).await;
        result
    }

    async fn respond_to_invoice(
        &self,
        uuid: Uuid,
        response: &InvoiceResponse,
    ) -> Result<Acknowledgement, ClientError> {
        let result = self.inner.respond_to_invoice(uuid, response).await;
        self.invalidate_status(DocumentKind::Invoice, uuid).await;
        result
    }

    async fn get_invoice_document(
        &self,
        uuid: Uuid,
        format: DocumentFormat,
    ) -> Result<DocumentContent, ClientError> {
        self.inner.get_invoice_document(uuid, format).await
    }

    async fn check_user(&self, tax_id: &str) -> Result<UserInfo, ClientError> {
        let key = tax_id.trim().to_string();
        self.cached(&self.users, key, self.config.user_ttl, || {
            self.inner.check_user(tax_id)
        })
        .await
    }

    async fn send_dispatch(&self, dispatch: &Dispatch) -> Result<SendResult, ClientError> {
        let result = self.inner.send_dispatch(dispatch).await;
        self.invalidate_status(DocumentKind::Dispatch, dispatch.uuid)
            .await;
        result
    }

    async fn get_dispatch_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.status(DocumentKind::Dispatch, uuid).await
    }

    async fn send_producer_receipt(
        &self,
        receipt: &ProducerReceipt,
    ) -> Result<SendResult, ClientError> {
        let result = self.inner.send_producer_receipt(receipt).await;
        self.invalidate_status(DocumentKind::ProducerReceipt, receipt.uuid)
            .await;
        result
    }

    async fn get_producer_receipt_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.status(DocumentKind::ProducerReceipt, uuid).await
    }
}
