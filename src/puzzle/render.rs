use super::board::DropTarget;
use super::gesture::Point;
use super::piece::Piece;

/// Everything the session needs from whoever draws the puzzle. Calls are
/// notifications; the session never reads state back except through
/// `hit_test`.
pub trait RenderSink {
    fn render_grid(&mut self, pieces: &[Piece]);

    fn render_pile(&mut self, pieces: &[Piece]);

    fn on_timer_tick(&mut self, seconds: u32);

    fn on_pause_changed(&mut self, _paused: bool) {}

    fn request_drag_proxy(&mut self, _piece: &Piece, _origin: Point) {}

    fn update_drag_proxy(&mut self, _at: Point) {}

    fn clear_drag_proxy(&mut self) {}

    /// The rendered slot under `at`, in the same coordinate space the input
    /// positions use.
    fn hit_test(&self, _at: Point) -> Option<DropTarget> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render_grid(&mut self, _pieces: &[Piece]) {}

    fn render_pile(&mut self, _pieces: &[Piece]) {}

    fn on_timer_tick(&mut self, _seconds: u32) {}
}
