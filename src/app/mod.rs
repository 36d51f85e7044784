use std::error::Error;
use std::io::{Stdout, stdout};

use crossterm::event::KeyCode;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::{START_CELL, Settings};
use crate::error::{GameError, LeaderboardError};
use crate::game::{
    Board, Cell, Color, GameEngine, Outcome, Painter, RngSource, SessionStatus, Surface,
    run_session,
};
use crate::io::{TerminalEvents, drain_pending, read_key};
use crate::leaderboard::{LeaderboardStore, Pager};
use crate::ui::{
    BoardCanvas, MENU_ITEMS, draw_leaderboard, draw_menu, draw_name_entry, draw_session,
    required_size,
};
use crate::{NAME_LEN, log};

type Term = Terminal<CrosstermBackend<Stdout>>;

enum Screen {
    Menu { selected: usize, notice: Option<String> },
    Play,
    NameEntry { outcome: Outcome },
    Leaderboard { highlight: Option<u64> },
    Exit,
}

pub fn run(settings: Settings) -> Result<(), Box<dyn Error>> {
    let store = LeaderboardStore::new(&settings.leaderboard_path);
    let mut tui = TuiGuard::new()?;
    let result = run_loop(tui.terminal_mut(), &settings, &store);
    log!("shutting down");
    result
}

fn run_loop(terminal: &mut Term, settings: &Settings, store: &LeaderboardStore) -> Result<(), Box<dyn Error>> {
    let mut screen = Screen::Menu {
        selected: 0,
        notice: None,
    };
    loop {
        screen = match screen {
            Screen::Menu { selected, notice } => menu(terminal, selected, notice)?,
            Screen::Play => {
                let outcome = play(terminal, settings)?;
                Screen::NameEntry { outcome }
            }
            Screen::NameEntry { outcome } => name_entry(terminal, store, outcome)?,
            Screen::Leaderboard { highlight } => leaderboard(terminal, store, highlight)?,
            Screen::Exit => return Ok(()),
        };
    }
}

fn menu(terminal: &mut Term, mut selected: usize, notice: Option<String>) -> Result<Screen, Box<dyn Error>> {
    loop {
        terminal.draw(|frame| draw_menu(frame, selected, notice.as_deref()))?;
        match read_key()?.code {
            KeyCode::Up => selected = selected.saturating_sub(1),
            KeyCode::Down => selected = (selected + 1).min(MENU_ITEMS.len() - 1),
            KeyCode::Enter => {
                return Ok(match selected {
                    0 => Screen::Play,
                    1 => Screen::Leaderboard { highlight: None },
                    _ => Screen::Exit,
                });
            }
            _ => {}
        }
    }
}

fn play(terminal: &mut Term, settings: &Settings) -> Result<Outcome, GameError> {
    let board = Board::new(
        settings.resolution.width,
        settings.resolution.height,
        settings.cell_size,
        &settings.palette,
    )?;
    let size = terminal.size()?;
    let fits = required_size(&board)
        .is_some_and(|(need_w, need_h)| size.width >= need_w && size.height >= need_h);
    if !fits {
        log!(
            "terminal {}x{} cannot show a {}x{} board",
            size.width,
            size.height,
            board.cols(),
            board.rows()
        );
        return Err(GameError::MissingCapability("terminal too small for the board"));
    }

    let start = Cell::new(
        START_CELL.0.min(board.cols() - 1) * board.cell_size,
        START_CELL.1.min(board.rows() - 1) * board.cell_size,
    );
    let mut random = RngSource::new(rand::thread_rng());
    let mut surface = TerminalSurface {
        terminal,
        canvas: BoardCanvas::new(&board),
    };
    let mut engine = GameEngine::new(
        board,
        start,
        settings.initial_interval(),
        settings.speedup,
        &mut random,
    )?;
    let mut events = TerminalEvents::new();
    run_session(&mut engine, &mut events, &mut surface, &mut random)
}

fn name_entry(terminal: &mut Term, store: &LeaderboardStore, outcome: Outcome) -> Result<Screen, Box<dyn Error>> {
    drain_pending()?;
    let mut name = String::new();
    loop {
        terminal.draw(|frame| draw_name_entry(frame, &outcome, &name))?;
        match read_key()?.code {
            KeyCode::Char(c) if c.is_ascii_alphanumeric() && name.len() < NAME_LEN => {
                name.push(c.to_ascii_uppercase());
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => {
                return Ok(match store.insert(&name, outcome.score) {
                    Ok(rank) => Screen::Leaderboard {
                        highlight: Some(rank),
                    },
                    Err(err) => failed(err),
                });
            }
            KeyCode::Esc => {
                return Ok(Screen::Menu {
                    selected: 0,
                    notice: None,
                });
            }
            _ => {}
        }
    }
}

fn leaderboard(terminal: &mut Term, store: &LeaderboardStore, highlight: Option<u64>) -> Result<Screen, Box<dyn Error>> {
    let pager = match highlight {
        Some(rank) => store.byte_len().map(|total| Pager::at_rank(total, rank)),
        None => store.pager(),
    };
    let mut pager = match pager {
        Ok(pager) => pager,
        Err(err) => return Ok(failed(err)),
    };
    loop {
        let records = match store.page(pager.page()) {
            Ok(records) => records,
            Err(err) => return Ok(failed(err)),
        };
        terminal.draw(|frame| draw_leaderboard(frame, &pager, &records, highlight))?;
        match read_key()?.code {
            KeyCode::Left => pager.left(),
            KeyCode::Right => pager.right(),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                return Ok(Screen::Menu {
                    selected: 1,
                    notice: None,
                });
            }
            _ => {}
        }
    }
}

/// Leaderboard problems are reported on the menu instead of ending the program.
fn failed(err: LeaderboardError) -> Screen {
    log!("leaderboard error: {}", err);
    Screen::Menu {
        selected: 0,
        notice: Some(err.to_string()),
    }
}

/// Prints one leaderboard page to stdout without entering the terminal UI.
pub fn print_scores(store: &LeaderboardStore, page: usize) -> Result<(), LeaderboardError> {
    let mut pager = store.pager()?;
    for _ in 0..page {
        pager.right();
    }
    let records = store.page(pager.page())?;
    println!(
        "{}: {} scores, page {}/{}",
        store.path().display(),
        store.record_count()?,
        pager.page() + 1,
        pager.max_page() + 1
    );
    if records.is_empty() {
        println!("no scores yet");
    }
    for (i, record) in records.iter().enumerate() {
        println!("{:>4}. {}", pager.first_rank() + i + 1, record);
    }
    Ok(())
}

/// Forwards the engine's paint calls into a canvas and draws it each frame.
struct TerminalSurface<'a> {
    terminal: &'a mut Term,
    canvas: BoardCanvas,
}

impl Painter for TerminalSurface<'_> {
    fn paint_cell(&mut self, cell: Cell, color: Color) {
        self.canvas.paint_cell(cell, color);
    }
}

impl Surface for TerminalSurface<'_> {
    fn present(&mut self, status: &SessionStatus) -> Result<(), GameError> {
        let canvas = &self.canvas;
        self.terminal.draw(|frame| draw_session(frame, canvas, status))?;
        Ok(())
    }
}

struct TuiGuard {
    terminal: Term,
}

impl TuiGuard {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
