pub mod puzzle;

#[cfg(feature = "ui")]
pub mod ui;
