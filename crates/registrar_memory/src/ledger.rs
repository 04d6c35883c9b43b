use registrar_core::prelude::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// A submission accepted by the [`MemoryLedger`] and the event it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSubmission {
    pub author: String,
    pub digest: ContentDigest,
    pub participants: Option<Vec<String>>,
    pub mode: SubmitMode,
    pub event: DefinitionConfirmed,
}

struct LedgerInner {
    block: AtomicU64,
    submissions: Mutex<Vec<LedgerSubmission>>,
    events: Option<mpsc::UnboundedSender<DefinitionConfirmed>>,
}

/// A single-node ledger that mines one block per submission.
///
/// Without an event channel, confirmations are only recorded and tests decide when
/// (and in which order) to deliver them.
#[derive(Clone)]
pub struct MemoryLedger {
    inner: Arc<LedgerInner>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryLedger {
    fn new(events: Option<mpsc::UnboundedSender<DefinitionConfirmed>>) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                block: AtomicU64::new(0),
                submissions: Mutex::new(Vec::new()),
                events,
            }),
        }
    }

    /// Creates a ledger publishing a confirmation event for every submission.
    pub fn with_events() -> (Self, mpsc::UnboundedReceiver<DefinitionConfirmed>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(Some(tx)), rx)
    }

    pub async fn submissions(&self) -> Vec<LedgerSubmission> {
        self.inner.submissions.lock().await.clone()
    }

    /// The confirmation event of the latest submission of `digest`.
    pub async fn event_for(&self, digest: &ContentDigest) -> Option<DefinitionConfirmed> {
        self.inner
            .submissions
            .lock()
            .await
            .iter()
            .rev()
            .find(|submission| &submission.digest == digest)
            .map(|submission| submission.event.clone())
    }
}

impl LedgerGateway for MemoryLedger {
    async fn submit(
        &self,
        author: &str,
        digest: &ContentDigest,
        participants: Option<&[String]>,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome, LedgerError> {
        // Blocks are mined and published under one lock, so events leave in block order.
        let mut submissions = self.inner.submissions.lock().await;
        let block = self.inner.block.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| LedgerError::System(e.to_string()))?
            .as_secs() as i64;

        let event = DefinitionConfirmed {
            content_digest: *digest,
            author: author.to_string(),
            timestamp,
            block_number: block,
            transaction_hash: format!("0x{block:064x}"),
        };

        submissions.push(LedgerSubmission {
            author: author.to_string(),
            digest: *digest,
            participants: participants.map(<[String]>::to_vec),
            mode,
            event: event.clone(),
        });

        if let Some(events) = &self.inner.events {
            if events.send(event).is_err() {
                debug!(block, "Event receiver dropped, confirmation not published");
            }
        }
        drop(submissions);

        Ok(match mode {
            SubmitMode::Sync => SubmitOutcome::Confirmed,
            SubmitMode::Async => SubmitOutcome::Receipt(format!("receipt-{block}")),
        })
    }
}
