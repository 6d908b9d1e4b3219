use serde::{Deserialize, Serialize};

/// Sentinel sender id for messages authored by the local user.
pub const LOCAL_SENDER: &str = "me";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub last_message: String,
    pub last_message_time: u64,
    pub unread_count: u32,
    pub online: bool,
    pub typing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: u64,
    pub delivery_status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent = 0,      // Accepted into the local store, acknowledgment pending
    Delivered = 1, // Acknowledged by the simulated transport
    Read = 2,      // Read by the counterparty; only seeded history carries this
}
