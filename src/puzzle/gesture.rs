use super::config::GestureThresholds;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Tracks one touch press until it becomes a tap or a drag. Platforms with no
/// native notion of either feed it positions and timestamps; it only answers
/// threshold questions.
#[derive(Clone, Copy, Debug)]
pub struct PressGate {
    start: Point,
    started_ms: u64,
    thresholds: GestureThresholds,
}

impl PressGate {
    pub fn arm(start: Point, now_ms: u64, thresholds: GestureThresholds) -> Self {
        Self {
            start,
            started_ms: now_ms,
            thresholds,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    /// Movement past the slop on either axis.
    pub fn exceeds_slop(&self, at: Point) -> bool {
        let slop = self.thresholds.drag_slop_px;
        (at.x - self.start.x).abs() > slop || (at.y - self.start.y).abs() > slop
    }

    pub fn hold_elapsed(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.thresholds.hold_ms
    }

    pub fn is_tap(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) < self.thresholds.tap_max_ms
    }
}
