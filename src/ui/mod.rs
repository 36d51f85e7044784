mod render;

use ratatui::prelude::*;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::game::{Outcome, SessionState};
use crate::leaderboard::{Pager, Record};
use crate::{NAME_LEN, RESULTS_PER_PAGE};

pub use render::{BoardCanvas, draw_session, required_size};

pub const MENU_ITEMS: [&str; 3] = ["PLAY", "LEADERBOARD", "QUIT"];

const HIGHLIGHT: Style = Style::new().fg(Color::Black).bg(Color::LightGreen);
const NOTICE: Style = Style::new().fg(Color::LightRed);

/// Outer frame plus a centred box of the given size; returns the box's inner area.
fn panel(frame: &mut Frame, title: &str, width: u16, height: u16) -> Rect {
    let area = frame.size();
    let cabinet = Block::default()
        .title("GRIDSNAKE")
        .border_type(BorderType::Thick)
        .borders(Borders::ALL);
    let inner = cabinet.inner(area);
    frame.render_widget(cabinet, area);

    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(height), Constraint::Min(0)])
        .split(inner);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(width), Constraint::Min(0)])
        .split(v[1]);

    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let body = block.inner(h[1]);
    frame.render_widget(block, h[1]);
    body
}

pub fn draw_menu(frame: &mut Frame, selected: usize, notice: Option<&str>) {
    let body = panel(frame, "MENU", 40, MENU_ITEMS.len() as u16 + 6);
    let mut lines: Vec<Line> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == selected {
                Line::styled(format!("> {}", item), HIGHLIGHT)
            } else {
                Line::raw(format!("  {}", item))
            }
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::raw("↑/↓ move   enter select"));
    if let Some(notice) = notice {
        lines.push(Line::styled(notice.to_string(), NOTICE));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

pub fn draw_name_entry(frame: &mut Frame, outcome: &Outcome, name: &str) {
    let body = panel(frame, "NEW SCORE", 40, 9);
    let headline = match outcome.state {
        SessionState::Died => "GAME OVER",
        SessionState::Won => "BOARD FULL!",
        SessionState::Quit | SessionState::Playing => "SESSION ENDED",
    };
    let mut slots = name.to_string();
    while slots.len() < NAME_LEN {
        slots.push('_');
    }
    let lines = vec![
        Line::raw(headline),
        Line::raw(format!("SCORE {}", outcome.score)),
        Line::raw(""),
        Line::styled(format!("NAME: {}", slots), HIGHLIGHT),
        Line::raw(""),
        Line::raw("enter save   backspace edit   esc skip"),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

/// One page of records. `highlight` is the absolute rank to emphasise.
pub fn draw_leaderboard(frame: &mut Frame, pager: &Pager, records: &[Record], highlight: Option<u64>) {
    let title = format!("LEADERBOARD {}/{}", pager.page() + 1, pager.max_page() + 1);
    let body = panel(frame, &title, 32, RESULTS_PER_PAGE as u16 + 5);
    let mut lines: Vec<Line> = Vec::with_capacity(RESULTS_PER_PAGE + 3);
    if records.is_empty() {
        lines.push(Line::raw("no scores yet"));
    }
    for (i, record) in records.iter().enumerate() {
        let rank = pager.first_rank() + i;
        let text = format!("{:>4}. {}", rank + 1, record);
        if highlight == Some(rank as u64) {
            lines.push(Line::styled(text, HIGHLIGHT));
        } else {
            lines.push(Line::raw(text));
        }
    }
    while lines.len() < RESULTS_PER_PAGE {
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("←/→ page   enter back"));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}
