pub mod arrange;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod gesture;
pub mod interaction;
pub mod piece;
pub mod render;
pub mod session;

#[cfg(test)]
mod tests;

pub use board::{Board, Container, DropTarget};
pub use clock::{GameClock, TimerState};
pub use config::{GestureThresholds, PuzzleConfig};
pub use error::ConfigError;
pub use gesture::Point;
pub use interaction::{DragPayload, InputEvent, InteractionController, Modality};
pub use piece::{Piece, PieceId, create_pieces};
pub use render::{NullSink, RenderSink};
pub use session::Session;
