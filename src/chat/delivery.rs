// Simulated delivery acknowledgments
// A sent message is marked delivered after a fixed delay, imitating
// transport acknowledgment without a transport. Each delay is a spawned
// single-shot task, retained so conversation teardown can cancel it.

use log::{debug, error};
use tokio::time::sleep;

use super::{ChatError, ChatSession};
use crate::models::DeliveryStatus;

impl ChatSession {
    /// Arrange for `msg_id` to be marked delivered once the configured delay
    /// elapses. Fire-and-forget from the caller's side; the spawned task's
    /// handle is tracked in `pending_deliveries` for cancellation.
    pub(crate) fn schedule_delivery(&self, msg_id: String) {
        let messages = self.messages.clone();
        let msg_tx = self.msg_tx.clone();
        let pending = self.pending_deliveries.clone();
        let delay = self.delivery_delay;
        let id = msg_id.clone();

        let handle = tokio::spawn(async move {
            sleep(delay).await;

            // The conversation may have been cleared while we slept; an
            // unknown id here is the expected race, not a failure
            match ChatSession::apply_transition(
                &messages,
                &msg_tx,
                &id,
                DeliveryStatus::Delivered,
            )
            .await
            {
                Ok(_) => debug!("Delivery acknowledgment applied for message {}", id),
                Err(ChatError::UnknownMessageId(_)) => {
                    debug!("Delivery fired for already-cleared message {}", id)
                }
                Err(e) => error!("Failed to apply delivery acknowledgment for {}: {}", id, e),
            }

            if let Ok(mut pending) = pending.lock() {
                pending.remove(&id);
            }
        });

        match self.pending_deliveries.lock() {
            Ok(mut pending) => {
                pending.insert(msg_id, handle);
            }
            Err(_) => {
                // Poisoned map; an untracked task could outlive teardown
                error!("Failed to track delivery task for message {}", msg_id);
                handle.abort();
            }
        }
    }

    /// Abort every pending delivery acknowledgment. Called on teardown so no
    /// stale timer can mutate a store after its view is gone.
    pub fn cancel_pending_deliveries(&self) {
        if let Ok(mut pending) = self.pending_deliveries.lock() {
            for (id, handle) in pending.drain() {
                handle.abort();
                debug!("Cancelled pending delivery for message {}", id);
            }
        }
    }
}
