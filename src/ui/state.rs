use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::puzzle::{PuzzleConfig, Session};

use super::board::BoardView;
use super::hud;

pub struct AppState {
    pub session: Session<BoardView>,
    pub ticker_handle: Option<glib::SourceId>,
}

impl AppState {
    /// Builds the state together with the view that renders it. The view's
    /// handlers only hold a weak reference back to the state.
    pub fn new(
        config: PuzzleConfig,
        view: impl FnOnce(Weak<RefCell<AppState>>) -> BoardView,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            let view = view(weak.clone());
            RefCell::new(AppState {
                session: Session::new(config, view),
                ticker_handle: None,
            })
        })
    }
}

/// Runs `action` against the session unless the state is gone or already
/// borrowed further up the stack, then brings the ticker in line with the
/// clock.
pub fn with_session<T>(
    state: &Weak<RefCell<AppState>>,
    action: impl FnOnce(&mut Session<BoardView>) -> T,
) -> Option<T> {
    let state = state.upgrade()?;
    let result = {
        let Ok(mut st) = state.try_borrow_mut() else {
            trace!("event dropped while the session is busy");
            return None;
        };
        action(&mut st.session)
    };
    hud::sync_ticker(&state);
    Some(result)
}

/// Milliseconds on the monotonic clock, the time base for gesture thresholds.
pub fn now_ms() -> u64 {
    u64::try_from(glib::monotonic_time() / 1000).unwrap_or_default()
}
