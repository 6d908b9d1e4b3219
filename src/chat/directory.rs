// Conversation directory
// Read-only resolution of conversation ids against a catalog. Kept behind a
// trait so the seeded demo data could be swapped for real storage without
// touching the session logic.

use crate::models::{ConversationSummary, Message};

pub trait ConversationDirectory: Send + Sync {
    /// All conversations known to the directory, in sidebar order.
    fn conversations(&self) -> Vec<ConversationSummary>;

    /// Resolve a conversation id to its summary. `None` is a normal,
    /// expected outcome (nothing selected yet, or a stale link) and drives
    /// the view's empty state.
    fn resolve(&self, id: &str) -> Option<ConversationSummary>;

    /// Seeded message history for a conversation, in creation order.
    fn seeded_messages(&self, id: &str) -> Vec<Message>;
}

/// Case-insensitive filter over conversation display names, used by the
/// sidebar search box.
pub fn search(
    conversations: &[ConversationSummary],
    query: &str,
) -> Vec<ConversationSummary> {
    let query = query.to_lowercase();
    conversations
        .iter()
        .filter(|c| c.display_name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
