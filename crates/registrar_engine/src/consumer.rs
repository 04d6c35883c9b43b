use crate::{ReconciliationEngine, Reconciliation};

use futures::{Stream, StreamExt};
use registrar_core::prelude::*;
use tracing::{error, info, warn};

/// Drains a stream of ledger confirmation events into the engine.
///
/// Events are applied one at a time in stream order, which must be the ledger's
/// confirmation order: for two definitions sharing a name, the one applied first wins.
/// Failures are logged and the event dropped: the party processing the event is not
/// necessarily the one that created the definition, so there is nobody to return the
/// error to.
#[derive(Clone)]
pub struct ConfirmationConsumer<S: RegistrarServices> {
    engine: ReconciliationEngine<S>,
}

impl<S: RegistrarServices> ConfirmationConsumer<S> {
    pub fn new(engine: ReconciliationEngine<S>) -> Self {
        Self { engine }
    }

    /// Runs until the stream ends.
    pub async fn run<St>(self, events: St)
    where
        St: Stream<Item = DefinitionConfirmed> + Send,
    {
        let mut events = std::pin::pin!(events);
        let mut applied = 0usize;

        while let Some(event) = events.next().await {
            Self::apply(&self.engine, event).await;
            applied += 1;
        }

        info!(applied, "Confirmation stream ended");
    }

    /// Handles a single event, logging the failure if there is one.
    pub async fn apply(
        engine: &ReconciliationEngine<S>,
        event: DefinitionConfirmed,
    ) -> Option<Reconciliation> {
        let digest = event.content_digest;
        let tx = event.transaction_hash.clone();

        match engine.handle_definition_confirmed(event).await {
            Ok(reconciliation) => Some(reconciliation),
            Err(e) => {
                match e.kind() {
                    ErrorKind::MalformedContent => {
                        warn!(%digest, %tx, "Dropping confirmation event: {e}")
                    }
                    ErrorKind::InvariantViolation => {
                        error!(%digest, %tx, "Invariant violated, confirmation rejected: {e}")
                    }
                    _ => error!(%digest, %tx, "Failed to process confirmation event: {e}"),
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreateDefinitionRequest;
    use crate::testing::*;

    #[tokio::test]
    async fn test_consumer_applies_all_events() {
        let engine = engine(EngineConfig::default());
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(
                engine
                    .request_definition_creation(CreateDefinitionRequest::new(name, "A"))
                    .await
                    .unwrap(),
            );
        }

        let mut events = Vec::new();
        for id in &ids {
            events.push(event_for(&engine, id).await);
        }
        // A malformed event in the middle must not stop the others.
        events.insert(
            1,
            DefinitionConfirmed {
                content_digest: ContentDigest::of(b"missing"),
                author: "A".into(),
                timestamp: 0,
                block_number: 0,
                transaction_hash: "0x0".into(),
            },
        );

        ConfirmationConsumer::new(engine.clone())
            .run(futures::stream::iter(events))
            .await;

        for id in &ids {
            let record = engine.get(id).await.unwrap().unwrap();
            assert!(record.state.is_confirmed());
        }
        assert_eq!(engine.services().registry.collection_count().await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stream_order_decides_name_owner() {
        for round in 0..50 {
            let engine = engine(EngineConfig::default());
            let x = racing_request(&engine, "widget", "A").await;
            let y = racing_request(&engine, "widget", "B").await;

            let (first, second) = if round % 2 == 0 { (x, y) } else { (y, x) };
            let events = vec![event_for(&engine, &first).await, event_for(&engine, &second).await];

            tokio::spawn(ConfirmationConsumer::new(engine.clone()).run(futures::stream::iter(events)))
                .await
                .unwrap();

            assert!(engine.get(&first).await.unwrap().unwrap().state.is_confirmed());
            assert!(engine.get(&second).await.unwrap().unwrap().state.is_conflicted());
        }
    }
}
