use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use bandhan_chat::chat::directory;
use bandhan_chat::models::{ConversationSummary, DeliveryStatus, Message, LOCAL_SENDER};

use crate::utils::format_message_time;

// Export types needed by main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

/// What the main loop should do in response to a key event.
pub enum UiAction {
    SendMessage(String),
    OpenConversation(String),
    CloseConversation,
    AttachImage,
    Quit,
}

enum Pane {
    Conversations,
    Chat,
}

pub struct ChatUI {
    pub conversations: Vec<ConversationSummary>,
    pub messages: Vec<Message>,
    input: Input,
    search: Input,
    searching: bool,
    active: Option<ConversationSummary>,
    pane: Pane,
    selected_index: usize,
    notice: Option<(String, chrono::DateTime<chrono::Utc>)>,
}

impl ChatUI {
    pub fn new(conversations: Vec<ConversationSummary>) -> Self {
        ChatUI {
            conversations,
            messages: Vec::new(),
            input: Input::default(),
            search: Input::default(),
            searching: false,
            active: None,
            pane: Pane::Conversations,
            selected_index: 0,
            notice: None,
        }
    }

    /// Conversations matching the current search box contents.
    pub fn visible_conversations(&self) -> Vec<ConversationSummary> {
        let query = self.search.value();
        if query.is_empty() {
            self.conversations.clone()
        } else {
            directory::search(&self.conversations, query)
        }
    }

    pub fn open(&mut self, summary: ConversationSummary, messages: Vec<Message>) {
        debug!("UI: opening conversation with {}", summary.display_name);
        self.active = Some(summary);
        self.messages = messages;
        self.input.reset();
        self.pane = Pane::Chat;
    }

    pub fn close_active(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("UI: leaving conversation with {}", active.display_name);
        }
        self.messages.clear();
        self.pane = Pane::Conversations;
    }

    pub fn clear_input(&mut self) {
        self.input.reset();
    }

    /// Add or update a message coming off the session's update channel.
    /// Updates are keyed by id and only ever move the status forward.
    pub fn add_message(&mut self, message: Message) {
        if let Some(existing) = self.messages.iter_mut().find(|m| m.id == message.id) {
            if message.delivery_status as u8 > existing.delivery_status as u8 {
                existing.delivery_status = message.delivery_status;
            }
        } else {
            self.messages.push(message);
        }
    }

    pub fn show_notice(&mut self, text: &str) {
        self.notice = Some((text.to_string(), chrono::Utc::now()));
    }

    /// Drop the transient notice once it has been on screen long enough.
    pub fn clean_notices(&mut self, timeout_secs: i64) {
        if let Some((_, shown_at)) = &self.notice {
            let now = chrono::Utc::now();
            if (now - *shown_at).num_seconds() > timeout_secs {
                self.notice = None;
            }
        }
    }

    fn selected_conversation_id(&self) -> Option<String> {
        let visible = self.visible_conversations();
        visible.get(self.selected_index).map(|c| c.id.clone())
    }

    pub fn handle_input(&mut self) -> Result<Option<UiAction>> {
        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => return Ok(None),
        };

        // Ctrl+C always quits, whatever has focus
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(UiAction::Quit));
        }

        // Search box steals keys while it is open
        if self.searching {
            match key.code {
                KeyCode::Esc => {
                    self.search.reset();
                    self.searching = false;
                    self.selected_index = 0;
                }
                KeyCode::Enter => {
                    // Keep the filter, move focus back to the list
                    self.searching = false;
                    self.selected_index = 0;
                }
                _ => {
                    self.search.handle_event(&Event::Key(key));
                    self.selected_index = 0;
                }
            }
            return Ok(None);
        }

        match self.pane {
            Pane::Conversations => match key.code {
                KeyCode::Char('q') => return Ok(Some(UiAction::Quit)),
                KeyCode::Char('/') => {
                    self.searching = true;
                }
                KeyCode::Up => {
                    self.selected_index = self.selected_index.saturating_sub(1);
                }
                KeyCode::Down => {
                    let count = self.visible_conversations().len();
                    if count > 0 && self.selected_index < count - 1 {
                        self.selected_index += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(id) = self.selected_conversation_id() {
                        return Ok(Some(UiAction::OpenConversation(id)));
                    }
                }
                KeyCode::Tab => {
                    if self.active.is_some() {
                        self.pane = Pane::Chat;
                    }
                }
                _ => {}
            },
            Pane::Chat => match key.code {
                KeyCode::Esc => return Ok(Some(UiAction::CloseConversation)),
                KeyCode::Tab => {
                    self.pane = Pane::Conversations;
                }
                KeyCode::F(2) => return Ok(Some(UiAction::AttachImage)),
                KeyCode::Enter => {
                    // Empty input never produces a send
                    if !self.input.value().trim().is_empty() {
                        let message_content = self.input.value().to_string();
                        return Ok(Some(UiAction::SendMessage(message_content)));
                    }
                }
                _ => {
                    self.input.handle_event(&Event::Key(key));
                }
            },
        }

        Ok(None)
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
            .split(size);

        self.draw_sidebar(frame, chunks[0]);

        match &self.active {
            Some(active) => self.draw_chat(frame, chunks[1], active),
            None => draw_empty_state(frame, chunks[1]),
        }

        if let Some((text, _)) = &self.notice {
            draw_notice(frame, text, size);
        }
    }

    fn draw_sidebar<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
            .split(area);

        let search_widget = Paragraph::new(self.search.value())
            .block(Block::default().borders(Borders::ALL).title(if self.searching {
                "Search conversations (Enter to apply, Esc to clear)"
            } else {
                "Search (/)"
            }));
        frame.render_widget(search_widget, chunks[0]);

        if self.searching {
            frame.set_cursor(
                chunks[0].x + self.search.visual_cursor() as u16 + 1,
                chunks[0].y + 1,
            );
        }

        let visible = self.visible_conversations();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|conv| {
                let mut header = Vec::new();
                if conv.online {
                    header.push(Span::styled("● ", Style::default().fg(Color::Green)));
                }
                header.push(Span::styled(
                    conv.display_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                header.push(Span::styled(
                    format!("  {}", format_message_time(conv.last_message_time)),
                    Style::default().fg(Color::DarkGray),
                ));

                let preview = if conv.typing {
                    Span::styled(
                        "typing...".to_string(),
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::ITALIC),
                    )
                } else {
                    Span::styled(
                        conv.last_message.clone(),
                        Style::default().fg(Color::Gray),
                    )
                };
                let mut second_line = vec![preview];
                if conv.unread_count > 0 {
                    second_line.push(Span::styled(
                        format!(" ({})", conv.unread_count),
                        Style::default().fg(Color::Yellow),
                    ));
                }

                ListItem::new(vec![Line::from(header), Line::from(second_line)])
            })
            .collect();

        let mut list_state = ListState::default();
        if !visible.is_empty() {
            list_state.select(Some(self.selected_index.min(visible.len() - 1)));
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Messages"))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_chat<B: Backend>(
        &self,
        frame: &mut Frame<B>,
        area: Rect,
        active: &ConversationSummary,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Min(1),    // Messages
                    Constraint::Length(1), // Typing indicator
                    Constraint::Length(3), // Input
                ]
                .as_ref(),
            )
            .split(area);

        draw_messages(frame, &self.messages, chunks[0], active);

        if active.typing {
            let typing = Paragraph::new(format!("{} is typing...", active.display_name))
                .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC));
            frame.render_widget(typing, chunks[1]);
        }

        let input_widget = Paragraph::new(self.input.value()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Type a message (Enter to send, F2 photo, Esc back)"),
        );
        frame.render_widget(input_widget, chunks[2]);

        if let Pane::Chat = self.pane {
            frame.set_cursor(
                chunks[2].x + self.input.visual_cursor() as u16 + 1,
                chunks[2].y + 1,
            );
        }
    }
}

fn draw_messages<B: Backend>(
    f: &mut Frame<B>,
    messages: &[Message],
    area: Rect,
    active: &ConversationSummary,
) {
    let wrap_width = area.width.saturating_sub(2) as usize; // Account for borders

    let items: Vec<ListItem> = messages
        .iter()
        .flat_map(|m| {
            let timestamp = format_message_time(m.timestamp);
            let outgoing = m.sender_id == LOCAL_SENDER;

            let prefix = if outgoing {
                format!("[{}] You: ", timestamp)
            } else {
                format!("[{}] {}: ", timestamp, active.display_name)
            };

            let image_marker = if m.image_url.is_some() { "[photo] " } else { "" };

            // Tick ladder for outgoing messages; read adds a third tick
            let status_indicator = if outgoing {
                match m.delivery_status {
                    DeliveryStatus::Sent => " ✓",
                    DeliveryStatus::Delivered => " ✓✓",
                    DeliveryStatus::Read => " ✓✓✓",
                }
            } else {
                ""
            };

            let full_content = format!("{}{}{}{}", prefix, image_marker, m.content, status_indicator);

            let wrapped_lines: Vec<String> = wrap(&full_content, wrap_width.max(1))
                .into_iter()
                .map(|l| l.into_owned())
                .collect();

            let style = if outgoing {
                match m.delivery_status {
                    DeliveryStatus::Sent => Style::default().fg(Color::Blue),
                    DeliveryStatus::Delivered | DeliveryStatus::Read => {
                        Style::default().fg(Color::Green)
                    }
                }
            } else {
                Style::default()
            };

            wrapped_lines
                .into_iter()
                .map(move |line| ListItem::new(Text::from(line)).style(style))
        })
        .collect();

    let presence = if active.online { "online" } else { "offline" };
    let title = format!("{} ({})", active.display_name, presence);

    // Keep the view pinned to the newest message
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(items.len() - 1));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default());
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_empty_state<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let text = "\n\nSelect a conversation\n\nChoose a conversation from the list to start messaging";
    let empty = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(empty, area);
}

fn draw_notice<B: Backend>(f: &mut Frame<B>, text: &str, area: Rect) {
    let popup_width = (text.len() as u16 + 4).min(area.width.saturating_sub(4));
    let popup_height = 3;
    if area.width < popup_width + 2 || area.height < popup_height + 1 {
        return;
    }

    let popup_area = Rect::new(area.width - popup_width - 1, 1, popup_width, popup_height);

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
