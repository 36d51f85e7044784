use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::SIDEBAR_W;
use crate::game::{Board, Cell, Color as CellColor, Painter, SessionState, SessionStatus};

/// Cell-addressed colour buffer the engine paints into. Each cell is drawn
/// as two terminal columns so it looks roughly square.
pub struct BoardCanvas {
    cols: i32,
    rows: i32,
    cell_size: i32,
    cells: Vec<CellColor>,
}

impl BoardCanvas {
    pub fn new(board: &Board) -> Self {
        Self {
            cols: board.cols(),
            rows: board.rows(),
            cell_size: board.cell_size,
            cells: vec![board.light; board.total_cells()],
        }
    }

    pub fn get(&self, col: i32, row: i32) -> Option<CellColor> {
        if col < 0 || row < 0 || col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize).copied()
    }

    fn lines(&self) -> Vec<Line<'static>> {
        (0..self.rows)
            .map(|row| {
                let spans: Vec<Span> = (0..self.cols)
                    .filter_map(|col| self.get(col, row))
                    .map(|color| Span::styled("  ", Style::default().bg(term_color(color))))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Painter for BoardCanvas {
    fn paint_cell(&mut self, cell: Cell, color: CellColor) {
        let (col, row) = (cell.x / self.cell_size, cell.y / self.cell_size);
        if col >= 0 && row >= 0 && col < self.cols && row < self.rows {
            self.cells[(row * self.cols + col) as usize] = color;
        }
    }
}

pub fn term_color(color: CellColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Smallest terminal area that fits the play field, its border and the sidebar.
/// `None` when no terminal size can hold it.
pub fn required_size(board: &Board) -> Option<(u16, u16)> {
    let cols = u32::try_from(board.cols()).ok()?;
    let rows = u32::try_from(board.rows()).ok()?;
    let width = cols
        .checked_mul(2)?
        .checked_add(2 + u32::from(SIDEBAR_W) + 2)?;
    let height = rows.checked_add(2)?.max(12).checked_add(2)?;
    Some((u16::try_from(width).ok()?, u16::try_from(height).ok()?))
}

pub fn draw_session(frame: &mut Frame, canvas: &BoardCanvas, status: &SessionStatus) {
    let area = frame.size();

    let cabinet = Block::default()
        .title("GRIDSNAKE")
        .border_type(BorderType::Thick)
        .borders(Borders::ALL)
        .title_alignment(Alignment::Left);
    let cabinet_inner = cabinet.inner(area);
    frame.render_widget(cabinet, area);

    let field_w = u16::try_from(i64::from(canvas.cols) * 2 + 2).unwrap_or(u16::MAX);
    let field_h = u16::try_from(i64::from(canvas.rows) + 2).unwrap_or(u16::MAX);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(field_w),
            Constraint::Length(SIDEBAR_W),
            Constraint::Min(0),
        ])
        .split(cabinet_inner);
    let v_center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(field_h),
            Constraint::Min(0),
        ])
        .split(cols[1]);

    let field = Paragraph::new(canvas.lines()).block(Block::default().borders(Borders::ALL));
    frame.render_widget(field, v_center[1]);
    draw_sidebar(frame, status, cols[2]);

    if status.state != SessionState::Playing {
        draw_banner(frame, status, v_center[1]);
    }
}

fn draw_sidebar(frame: &mut Frame, status: &SessionStatus, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let state = match status.state {
        SessionState::Playing => "PLAYING",
        SessionState::Died => "DIED",
        SessionState::Won => "BOARD FULL",
        SessionState::Quit => "QUIT",
    };
    let info = Paragraph::new(vec![
        Line::raw(format!("{:<7} {}", "LENGTH:", status.length)),
        Line::raw(format!("{:<7} {}", "FOOD:", status.foods_eaten)),
        Line::raw(format!("{:<7} {}ms", "TICK:", status.interval.as_millis())),
        Line::raw(format!("{:<7} {}", "STATUS:", state)),
    ])
    .block(Block::default().title("INFO").borders(Borders::ALL));
    frame.render_widget(info, chunks[0]);

    let controls = Paragraph::new(vec![Line::raw("w/a/s/d steer"), Line::raw("q quit")])
        .block(Block::default().title("CONTROLS").borders(Borders::ALL));
    frame.render_widget(controls, chunks[2]);
}

fn draw_banner(frame: &mut Frame, status: &SessionStatus, field: Rect) {
    let headline = match status.state {
        SessionState::Won => "BOARD FULL!",
        _ => "GAME OVER",
    };
    let overlay_w = field.width.saturating_sub(4).clamp(8, 24);
    let overlay_h = 4u16;
    let popup = Rect {
        x: field.x + field.width.saturating_sub(overlay_w) / 2,
        y: field.y + field.height.saturating_sub(overlay_h) / 2,
        width: overlay_w.min(field.width),
        height: overlay_h.min(field.height),
    };
    let overlay = Paragraph::new(format!("{}\nSCORE {}", headline, status.length))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(overlay, popup);
}
