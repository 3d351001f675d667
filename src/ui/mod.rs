mod app;
mod board;
mod dialogs;
mod hud;
mod state;

pub use app::{APP_ID, run};
