use anyhow::Result;
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod ui;
mod utils;

use crate::ui::{ChatUI, UiAction};
use bandhan_chat::catalog;
use bandhan_chat::chat::{directory::ConversationDirectory, ChatSession};
use bandhan_chat::models::Message;

/// Command line arguments for the Bandhan chat view
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bandhan Messages: the chat view of the Bandhan matchmaking app, running on local seeded data.",
    long_about = "Bandhan Messages is a terminal chat view for the Bandhan matchmaking app.\n\n\
    There is no server behind it: conversations come from a seed catalog and message\n\
    delivery is simulated locally.\n\
    Use -h or --help to see all options."
)]
struct Args {
    /// Conversation to open at startup (counterparty id)
    #[arg(long, value_name = "ID")]
    conversation: Option<String>,

    /// JSON seed catalog replacing the built-in demo data
    #[arg(long, value_name = "PATH")]
    seed_file: Option<PathBuf>,

    /// Simulated delivery acknowledgment delay in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    delivery_delay_ms: u64,

    /// Log file path
    #[arg(long, value_name = "PATH", default_value = "bandhan-chat.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    utils::setup_logging(args.log_file.to_str(), LevelFilter::Debug)?;
    info!("Bandhan chat view starting up");
    info!("Logging to file: {}", args.log_file.display());

    let directory = Arc::new(catalog::load_catalog(args.seed_file.as_deref())?);
    let (mut session, mut msg_rx) = ChatSession::new(
        directory.clone(),
        Duration::from_millis(args.delivery_delay_ms),
    );

    let mut chat_ui = ChatUI::new(directory.conversations());

    // An unknown startup conversation id just shows the empty state
    if let Some(id) = &args.conversation {
        match session.select_conversation(id).await {
            Some(summary) => {
                let messages = session.messages().await;
                chat_ui.open(summary, messages);
            }
            None => info!("No conversation found for id {}", id),
        }
    }

    let mut terminal = ui::setup_terminal()?;
    let result = run_main_loop(&mut chat_ui, &mut terminal, &mut session, &mut msg_rx).await;

    // Teardown before giving the terminal back, so no delivery timer can
    // outlive the view
    session.close().await;
    ui::restore_terminal(terminal)?;
    result?;

    println!("Chat session ended.");
    Ok(())
}

async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    session: &mut ChatSession,
    msg_rx: &mut tokio::sync::mpsc::Receiver<Message>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f))?;

        chat_ui.clean_notices(4);

        match chat_ui.handle_input()? {
            Some(UiAction::Quit) => break,
            Some(UiAction::SendMessage(content)) => {
                match session.send_message(&content, None).await {
                    Ok(_) => chat_ui.clear_input(),
                    // Rejected sends leave the input untouched
                    Err(e) => debug!("Send rejected: {}", e),
                }
            }
            Some(UiAction::OpenConversation(id)) => match session.select_conversation(&id).await {
                Some(summary) => {
                    // Drop updates still queued for the previous conversation
                    while msg_rx.try_recv().is_ok() {}
                    let messages = session.messages().await;
                    chat_ui.open(summary, messages);
                }
                None => chat_ui.show_notice("Conversation not found"),
            },
            Some(UiAction::CloseConversation) => {
                session.close().await;
                while msg_rx.try_recv().is_ok() {}
                chat_ui.close_active();
            }
            Some(UiAction::AttachImage) => {
                chat_ui.show_notice("Image sharing will be available soon");
            }
            None => {}
        }

        // Pick up message appends and delivery-status updates from the session
        if let Ok(message) = msg_rx.try_recv() {
            chat_ui.add_message(message);
        }
    }

    Ok(())
}
