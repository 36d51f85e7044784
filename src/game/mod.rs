pub mod board;
pub mod food;
pub mod session;
pub mod snake;
pub mod state;

pub use board::{Board, Cell, Color, Painter};
pub use food::RngSource;
pub use session::{Event, EventSource, Surface, run_session};
pub use snake::Direction;
pub use state::{GameEngine, Input, Outcome, SessionState, SessionStatus};
