//! UI rendering
//!
//! Pure rendering functions that turn state into terminal frames.

pub mod editors;
mod inbox;
mod review;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use libvillastay::NotificationKind;
use libvillastay::service::review::ReviewPhase;

use crate::app::{AppState, Screen};
pub use editors::Editors;

/// Render the application UI
pub fn render(frame: &mut Frame, state: &AppState, editors: &Editors) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    match state.current_screen {
        Screen::Inbox => inbox::render(frame, chunks[0], state, editors),
        Screen::Review => review::render(frame, chunks[0], state, editors),
        Screen::Trips => render_trips(frame, chunks[0], state),
    }
    render_status_bar(frame, chunks[1], state);

    if state.current_screen == Screen::Review && state.review.phase == ReviewPhase::Confirmed {
        render_confirmation(frame, area, state);
    }

    render_toast(frame, area, state);

    if state.help_visible {
        render_help_overlay(frame, area, state);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, state);
    }
}

/// Foreground color, unless NO_COLOR is set
pub(crate) fn fg(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match state.current_screen {
        Screen::Inbox if state.is_typing() => "Enter: Send | Esc: Threads | PgUp/PgDn: Scroll",
        Screen::Inbox => "Tab: Switch tab | j/k: Move | Enter: Open | i: Reply | o: Older | r: Review | F1: Help",
        Screen::Review => "Tab: Next field | 1-5: Rate | Ctrl+S: Submit | Esc: Back | F1: Help",
        Screen::Trips => "F2: Inbox | q: Quit",
    };

    let mut spans = Vec::new();
    if let Some(ref message) = state.status.message {
        spans.push(Span::styled(message.as_str(), fg(state, Color::Yellow)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(hints, fg(state, Color::Gray)));

    let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn render_trips(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Thanks for your review!",
            fg(state, Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Your trips will be listed here."),
        Line::from("Press F2 to return to the inbox"),
    ])
    .block(Block::default().title(" Trips ").borders(Borders::ALL))
    .alignment(Alignment::Center);

    frame.render_widget(text, area);
}

fn render_confirmation(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(50, 20, area);

    let text = vec![
        Line::from(Span::styled(
            "Review submitted",
            fg(state, Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Taking you to your trips…"),
    ];

    let widget = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Green)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}

/// Latest notification, top right
fn render_toast(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(notification) = state.notifications.latest() else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Info => Color::Cyan,
        NotificationKind::Error => Color::Red,
    };

    let width = area.width.min(40);
    if width < 10 || area.height < 5 {
        return;
    }
    let toast_area = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: 4,
    };

    let toast = Paragraph::new(notification.body.as_str())
        .block(
            Block::default()
                .title(format!(" {} ", notification.title))
                .borders(Borders::ALL)
                .border_style(fg(state, color)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, toast_area);
    frame.render_widget(toast, toast_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  q / Ctrl+C - Quit"),
        Line::from("  F1         - Toggle help"),
        Line::from("  F2         - Inbox"),
        Line::from("  F3         - Trips"),
        Line::from(""),
        Line::from("Inbox:"),
        Line::from("  Tab, 1-4   - Switch tab"),
        Line::from("  j/k, Enter - Move, open thread"),
        Line::from("  i          - Reply, Enter sends"),
        Line::from("  o          - Load older messages"),
        Line::from("  r          - Review the guest"),
        Line::from("  Esc        - Back (narrow terminals)"),
        Line::from(""),
        Line::from("Review:"),
        Line::from("  Tab        - Next field"),
        Line::from("  1-5, ←/→   - Rate category"),
        Line::from("  Ctrl+S     - Submit"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            fg(state, Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Centered rectangle taking the given percentages of `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
