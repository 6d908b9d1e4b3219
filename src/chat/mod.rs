// Chat session for the Bandhan chat view
// Owns the message history of the selected conversation and hands out a
// channel of message updates for the view to render.

use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex as TokioMutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub mod delivery;
pub mod directory;

pub use directory::ConversationDirectory;

use crate::models::{ConversationSummary, DeliveryStatus, Message, LOCAL_SENDER};

/// Delay before a sent message is marked delivered.
pub const DEFAULT_DELIVERY_DELAY: Duration = Duration::from_secs(1);

/// Rejections surfaced by the session instead of silently dropping input,
/// so callers can tell "nothing was wrong" apart from "input was invalid".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message text is empty and no image is attached")]
    EmptyMessage,
    #[error("no conversation is selected")]
    NoActiveConversation,
    #[error("unknown message id: {0}")]
    UnknownMessageId(String),
}

pub struct ChatSession {
    directory: Arc<dyn ConversationDirectory>,
    active: Option<String>,
    messages: Arc<TokioMutex<Vec<Message>>>,
    // Message ID -> delivery task, retained so teardown can abort them
    pending_deliveries: Arc<StdMutex<HashMap<String, JoinHandle<()>>>>,
    msg_tx: mpsc::Sender<Message>,
    delivery_delay: Duration,
}

impl ChatSession {
    pub fn new(
        directory: Arc<dyn ConversationDirectory>,
        delivery_delay: Duration,
    ) -> (Self, mpsc::Receiver<Message>) {
        let (msg_tx, msg_rx) = mpsc::channel(100);

        (
            Self {
                directory,
                active: None,
                messages: Arc::new(TokioMutex::new(Vec::new())),
                pending_deliveries: Arc::new(StdMutex::new(HashMap::new())),
                msg_tx,
                delivery_delay,
            },
            msg_rx,
        )
    }

    pub fn active_conversation(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Resolve a conversation id and make it the active one. The previous
    /// view is torn down first: its pending deliveries are cancelled and the
    /// store is replaced by the new conversation's seeded history. A miss
    /// leaves the session untouched and is a normal outcome, not an error.
    pub async fn select_conversation(&mut self, id: &str) -> Option<ConversationSummary> {
        let summary = self.directory.resolve(id)?;

        self.cancel_pending_deliveries();
        let seeded = self.directory.seeded_messages(id);
        {
            let mut messages = self.messages.lock().await;
            *messages = seeded;
        }
        self.active = Some(summary.id.clone());
        info!(
            "Opened conversation with {} ({})",
            summary.display_name, summary.id
        );

        Some(summary)
    }

    /// Tear down the active conversation view. Cancelling the pending
    /// deliveries is mandatory here: a delivery timer must never mutate a
    /// store its view no longer owns.
    pub async fn close(&mut self) {
        self.cancel_pending_deliveries();
        self.messages.lock().await.clear();
        if let Some(id) = self.active.take() {
            info!("Closed conversation {}", id);
        }
    }

    /// Append a new outgoing message and schedule its simulated delivery
    /// acknowledgment. Returns the id of the new message.
    pub async fn send_message(
        &self,
        content: &str,
        image_url: Option<String>,
    ) -> Result<String, ChatError> {
        let conversation = self
            .active
            .as_ref()
            .ok_or(ChatError::NoActiveConversation)?;
        if content.trim().is_empty() && image_url.is_none() {
            return Err(ChatError::EmptyMessage);
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: LOCAL_SENDER.to_string(),
            content: content.to_string(),
            timestamp: chrono::Utc::now().timestamp() as u64,
            delivery_status: DeliveryStatus::Sent,
            image_url,
        };
        let msg_id = message.id.clone();

        {
            let mut messages = self.messages.lock().await;
            messages.push(message.clone());
        }
        info!("Queued message {} to {}", msg_id, conversation);

        // Show the pending message in the view first, then start the
        // simulated acknowledgment for it
        if let Err(e) = self.msg_tx.send(message).await {
            error!("Failed to send message to UI: {}", e);
        }
        self.schedule_delivery(msg_id.clone());

        Ok(msg_id)
    }

    /// Advance a message's delivery status, leaving every other field and
    /// the message's position unchanged.
    pub async fn apply_status_transition(
        &self,
        msg_id: &str,
        new_status: DeliveryStatus,
    ) -> Result<(), ChatError> {
        Self::apply_transition(&self.messages, &self.msg_tx, msg_id, new_status).await
    }

    /// Static helper so the spawned delivery task can update a message
    /// without holding a reference to the session itself.
    pub(crate) async fn apply_transition(
        messages: &TokioMutex<Vec<Message>>,
        msg_tx: &mpsc::Sender<Message>,
        msg_id: &str,
        new_status: DeliveryStatus,
    ) -> Result<(), ChatError> {
        let updated = {
            let mut messages = messages.lock().await;
            match messages.iter_mut().find(|m| m.id == msg_id) {
                Some(message) => {
                    // Only move forward along the delivery chain
                    if new_status as u8 <= message.delivery_status as u8 {
                        debug!(
                            "Ignoring status change for message {}: {:?} -> {:?}",
                            msg_id, message.delivery_status, new_status
                        );
                        return Ok(());
                    }
                    info!(
                        "Updating message {} status from {:?} to {:?}",
                        msg_id, message.delivery_status, new_status
                    );
                    message.delivery_status = new_status;
                    Some(message.clone())
                }
                None => None,
            }
        };

        match updated {
            Some(message) => {
                if let Err(e) = msg_tx.send(message).await {
                    error!("Failed to send status update to UI: {}", e);
                }
                Ok(())
            }
            None => Err(ChatError::UnknownMessageId(msg_id.to_string())),
        }
    }

    /// Snapshot of the active conversation's messages in creation order.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_pending_deliveries();
    }
}
