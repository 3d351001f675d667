#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    NotStarted,
    Running,
    Paused,
}

/// Elapsed-seconds counter. The host drives `tick` on a fixed cadence; the
/// counter only advances while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    state: TimerState,
    seconds: u32,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Starts a clock that has never run. Returns whether it started.
    pub fn start(&mut self) -> bool {
        if self.state != TimerState::NotStarted {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    pub fn tick(&mut self) -> Option<u32> {
        if !self.is_running() {
            return None;
        }
        self.seconds = self.seconds.saturating_add(1);
        Some(self.seconds)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
