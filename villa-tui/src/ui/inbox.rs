//! Host inbox: tabs, thread list and conversation pane

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use libvillastay::schema::{MessageEntry, ThreadEntry};
use libvillastay::service::inbox::{InboxTab, ThreadPhase};

use super::{fg, Editors};
use crate::app::{AppState, InboxFocus};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, editors: &Editors) {
    if state.viewport.is_mobile() {
        // Single pane: the list, or the open conversation
        if state.inbox.selected.is_some() {
            render_conversation(frame, area, state, editors);
        } else {
            render_thread_pane(frame, area, state);
        }
        return;
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_thread_pane(frame, panes[0], state);
    if state.inbox.selected.is_some() {
        render_conversation(frame, panes[1], state, editors);
    } else {
        let hint = Paragraph::new("Select a conversation")
            .style(fg(state, Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, panes[1]);
    }
}

fn render_thread_pane(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let titles: Vec<Line> = InboxTab::ALL.iter().map(|tab| Line::from(tab.label())).collect();
    let selected = InboxTab::ALL
        .iter()
        .position(|tab| *tab == state.inbox.tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(" Inbox "))
        .highlight_style(fg(state, Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let focused = state.inbox.focus == InboxFocus::Threads;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { fg(state, Color::Cyan) } else { Style::default() });

    if state.inbox.threads.is_empty() {
        let text = if state.inbox.threads_loading {
            "Loading…"
        } else {
            "No threads"
        };
        frame.render_widget(Paragraph::new(text).block(block), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .inbox
        .threads
        .iter()
        .map(|thread| thread_item(state, thread))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default().with_selected(Some(state.inbox.cursor));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn thread_item<'a>(state: &AppState, thread: &'a ThreadEntry) -> ListItem<'a> {
    let is_open = state.inbox.selected.as_deref() == Some(thread.booking_id.as_str());
    let name_style = if is_open {
        fg(state, Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut first = vec![
        Span::styled(thread.guest_name.as_str(), name_style),
        Span::raw(" · "),
        Span::raw(thread.villa_title.as_str()),
    ];
    if thread.unread_count > 0 {
        first.push(Span::styled(
            format!(" ({})", thread.unread_count),
            fg(state, Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let second = Line::from(Span::styled(
        thread.last_message_snippet.as_str(),
        fg(state, Color::Gray),
    ));

    ListItem::new(vec![Line::from(first), second])
}

fn render_conversation(frame: &mut Frame, area: Rect, state: &AppState, editors: &Editors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(4)])
        .split(area);

    let header = match state.inbox.selected_thread() {
        Some(thread) => Line::from(vec![
            Span::styled(thread.guest_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" · "),
            Span::raw(thread.villa_title.as_str()),
            Span::styled(
                format!("  {} → {}  {}", thread.check_in, thread.check_out, thread.status),
                fg(state, Color::Gray),
            ),
        ]),
        None => Line::from(state.inbox.selected.clone().unwrap_or_default()),
    };
    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    render_messages(frame, chunks[1], state);

    let (title, border) = match (state.inbox.phase, state.inbox.focus) {
        (ThreadPhase::Sending, _) => (" Sending… ", fg(state, Color::Yellow)),
        (_, InboxFocus::Compose) => (" Message ", fg(state, Color::Cyan)),
        _ => (" Message (i to reply) ", Style::default()),
    };
    let mut compose = editors.compose().clone();
    compose.set_block(Block::default().title(title).borders(Borders::ALL).border_style(border));
    frame.render_widget(&compose, chunks[2]);
}

fn render_messages(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL);

    if state.inbox.phase == ThreadPhase::Loading {
        frame.render_widget(Paragraph::new("Loading messages…").block(block), area);
        return;
    }

    let has_more = state.inbox.history.as_ref().map(|h| h.has_more()).unwrap_or(false);
    let marker = if has_more {
        "── o: load older messages ──"
    } else {
        "── start of conversation ──"
    };

    let messages = state.inbox.messages();
    let mut lines = vec![Line::from(Span::styled(marker, fg(state, Color::DarkGray))).centered()];
    if messages.is_empty() {
        lines.push(Line::from("No messages yet"));
    }
    for message in &messages {
        lines.extend(message_lines(state, message));
    }

    // Pinned to the newest line unless scrolled up
    let visible = area.height.saturating_sub(2) as usize;
    let bottom = lines.len().saturating_sub(visible);
    let offset = bottom.saturating_sub(state.inbox.scroll);

    let widget = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(widget, area);
}

fn message_lines<'a>(state: &AppState, message: &'a MessageEntry) -> Vec<Line<'a>> {
    let from_host = message.is_from_host();
    let sender = match (&message.sender_name, from_host) {
        (Some(name), _) => name.clone(),
        (None, true) => "You".to_string(),
        (None, false) => "Guest".to_string(),
    };
    let color = if from_host { Color::Cyan } else { Color::Green };

    let mut lines = vec![Line::from(vec![
        Span::styled(sender, fg(state, color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", message.sent_at.format("%b %d %H:%M")),
            fg(state, Color::DarkGray),
        ),
    ])];
    lines.extend(message.body.lines().map(Line::from));

    if from_host {
        lines = lines.into_iter().map(Line::right_aligned).collect();
    }
    lines
}
