// Common test utilities for integration tests
// This module contains shared code for all integration tests

use std::sync::Once;
use std::time::Duration;

use log::LevelFilter;
use tokio::sync::mpsc;

use bandhan_chat::catalog::demo_catalog;
use bandhan_chat::chat::ChatSession;
use bandhan_chat::models::Message;
use std::sync::Arc;

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Delivery delay used across the lifecycle tests; paused-clock tests
/// advance virtual time past it.
pub const TEST_DELIVERY_DELAY: Duration = Duration::from_secs(1);

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// A fresh session over the built-in demo catalog.
pub fn test_session() -> (ChatSession, mpsc::Receiver<Message>) {
    setup_logging();
    ChatSession::new(Arc::new(demo_catalog()), TEST_DELIVERY_DELAY)
}
