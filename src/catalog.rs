// Seed catalog for the chat view
// All data is process-local and rebuilt on every start; a JSON seed file can
// replace the built-in demo catalog. There is no persistence layer.

use anyhow::Result;
use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::chat::directory::ConversationDirectory;
use crate::models::{ConversationSummary, DeliveryStatus, Message, LOCAL_SENDER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub conversations: Vec<ConversationSummary>,
    // Conversation id -> seeded message history
    #[serde(default)]
    pub messages: HashMap<String, Vec<Message>>,
}

impl ConversationDirectory for Catalog {
    fn conversations(&self) -> Vec<ConversationSummary> {
        self.conversations.clone()
    }

    fn resolve(&self, id: &str) -> Option<ConversationSummary> {
        self.conversations.iter().find(|c| c.id == id).cloned()
    }

    fn seeded_messages(&self, id: &str) -> Vec<Message> {
        self.messages.get(id).cloned().unwrap_or_default()
    }
}

/// Load a seed catalog from a JSON file, falling back to the built-in demo
/// data when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let path = match path {
        Some(path) => path,
        None => return Ok(demo_catalog()),
    };

    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let catalog: Catalog = serde_json::from_str(&contents)?;
    info!(
        "Loaded {} conversations from {}",
        catalog.conversations.len(),
        path.display()
    );

    Ok(catalog)
}

pub fn demo_catalog() -> Catalog {
    DEMO_CATALOG.clone()
}

static DEMO_CATALOG: Lazy<Catalog> = Lazy::new(build_demo_catalog);

fn build_demo_catalog() -> Catalog {
    let now = chrono::Utc::now().timestamp() as u64;

    let conversations = vec![
        ConversationSummary {
            id: "1".to_string(),
            display_name: "Priya Sharma".to_string(),
            avatar_url: "https://images.unsplash.com/photo-1594744803329-e58b31de8bf5?w=100"
                .to_string(),
            last_message: "Hi! Thanks for showing interest.".to_string(),
            last_message_time: now - 60 * 5,
            unread_count: 2,
            online: true,
            typing: false,
        },
        ConversationSummary {
            id: "2".to_string(),
            display_name: "Rahul Verma".to_string(),
            avatar_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=100"
                .to_string(),
            last_message: "Would love to know more about you".to_string(),
            last_message_time: now - 60 * 60 * 2,
            unread_count: 0,
            online: false,
            typing: false,
        },
        ConversationSummary {
            id: "3".to_string(),
            display_name: "Anjali Patel".to_string(),
            avatar_url: "https://images.unsplash.com/photo-1609505848912-b7c3b8b4beda?w=100"
                .to_string(),
            last_message: "Looking forward to talking!".to_string(),
            last_message_time: now - 60 * 60 * 24,
            unread_count: 0,
            online: true,
            typing: false,
        },
    ];

    // Seeded history for the first conversation, oldest first. The first
    // three are already read; the last outgoing one is still only delivered.
    let history = vec![
        seed_message("1", "1", "Hi! Thanks for showing interest in my profile.", now - 60 * 10, DeliveryStatus::Read),
        seed_message("2", LOCAL_SENDER, "Hello! I'd love to know more about you.", now - 60 * 8, DeliveryStatus::Read),
        seed_message("3", "1", "Sure! What would you like to know?", now - 60 * 6, DeliveryStatus::Read),
        seed_message("4", LOCAL_SENDER, "Tell me about your hobbies and interests.", now - 60 * 5, DeliveryStatus::Delivered),
    ];

    let mut messages = HashMap::new();
    messages.insert("1".to_string(), history);

    Catalog {
        conversations,
        messages,
    }
}

fn seed_message(
    id: &str,
    sender_id: &str,
    content: &str,
    timestamp: u64,
    delivery_status: DeliveryStatus,
) -> Message {
    Message {
        id: id.to_string(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
        timestamp,
        delivery_status,
        image_url: None,
    }
}
