//! Guest review form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use libvillastay::schema::ReviewCategory;
use libvillastay::service::review::{ReviewPhase, MAX_CONTENT_CHARS, REQUIRED_PHOTOS};

use super::{fg, Editors};
use crate::app::{AppState, ReviewField};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, editors: &Editors) {
    let review = &state.review;
    let outer = Block::default().title(" Review your guest ").borders(Borders::ALL);

    let Some(booking) = review.booking.as_ref() else {
        let text = if review.loading {
            "Loading booking…"
        } else {
            "Booking not found. Press Esc to go back."
        };
        frame.render_widget(Paragraph::new(text).block(outer), area);
        return;
    };

    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(7),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let stay = Line::from(vec![
        Span::styled(booking.villa_id.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "  {} → {} · {} nights · {} guests",
                booking.check_in,
                booking.check_out,
                booking.nights(),
                booking.guests
            ),
            fg(state, Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(stay), chunks[0]);

    render_ratings(frame, chunks[1], state);

    let content_len = review.form.content().chars().count();
    let mut content = editors.content().clone();
    content.set_block(field_block(
        state,
        ReviewField::Content,
        format!(" Review {}/{} ", content_len, MAX_CONTENT_CHARS),
    ));
    frame.render_widget(&content, chunks[2]);

    let mut photos = editors.photos().clone();
    photos.set_block(field_block(
        state,
        ReviewField::Photos,
        format!(" Photos {}/{} · JPEG or PNG ", review.form.photos().len(), REQUIRED_PHOTOS),
    ));
    frame.render_widget(&photos, chunks[3]);

    render_footer(frame, chunks[4], state);
}

fn field_block(state: &AppState, field: ReviewField, title: String) -> Block<'static> {
    let border = if state.review.field == field {
        fg(state, Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().title(title).borders(Borders::ALL).border_style(border)
}

fn render_ratings(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = ReviewCategory::ALL
        .into_iter()
        .map(|category| {
            let value = state.review.form.rating(category);
            let focused = state.review.field == ReviewField::Rating(category);
            let label_style = if focused {
                fg(state, Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let stars: String = (1..=5).map(|i| if i <= value { '★' } else { '☆' }).collect();
            Line::from(vec![
                Span::styled(if focused { "▸ " } else { "  " }, label_style),
                Span::styled(format!("{:<14}", category.label()), label_style),
                Span::styled(stars, fg(state, Color::Yellow)),
            ])
        })
        .collect();

    let overall = match state.review.form.overall_rating() {
        Some(rating) => format!(" Ratings · overall {}/5 ", rating),
        None => " Ratings ".to_string(),
    };
    let block = Block::default().title(overall).borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let review = &state.review;
    let line = match &review.phase {
        ReviewPhase::Submitting => Line::from(Span::styled("Submitting…", fg(state, Color::Yellow))),
        ReviewPhase::Confirmed => Line::from(Span::styled("Submitted", fg(state, Color::Green))),
        ReviewPhase::Failed(error) if review.can_submit() => Line::from(vec![
            Span::styled(format!("Failed to submit review: {} ", error), fg(state, Color::Red)),
            Span::styled("Ctrl+S to retry", fg(state, Color::Green)),
        ]),
        _ if review.can_submit() => Line::from(Span::styled(
            "Ready. Ctrl+S to submit",
            fg(state, Color::Green).add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(Span::styled(review.form.blockers().join(" · "), fg(state, Color::Red))),
    };

    let footer = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Submit "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}
