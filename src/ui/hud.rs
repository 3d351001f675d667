use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::debug;

use super::state::AppState;

/// The timer label and the pause button, driven from the session's render
/// callbacks.
#[derive(Clone)]
pub struct Hud {
    timer_label: gtk::Label,
    pause_button: gtk::Button,
}

impl Hud {
    pub fn new() -> Self {
        let timer_label = gtk::Label::builder()
            .label(timer_text(0))
            .halign(gtk::Align::Center)
            .css_classes(vec!["tessera-timer", "numeric"])
            .build();

        let pause_button = gtk::Button::builder()
            .label(gettext("Pause"))
            .action_name("app.pause")
            .build();
        pause_button.set_tooltip_text(Some(gettext("Pause or resume the game").as_str()));

        Self {
            timer_label,
            pause_button,
        }
    }

    pub fn timer_label(&self) -> &gtk::Label {
        &self.timer_label
    }

    pub fn pause_button(&self) -> &gtk::Button {
        &self.pause_button
    }

    pub fn show_seconds(&self, seconds: u32) {
        self.timer_label.set_text(&timer_text(seconds));
    }

    pub fn show_paused(&self, paused: bool) {
        if paused {
            self.pause_button.set_label(&gettext("Play"));
            self.pause_button.add_css_class("paused");
            self.timer_label.add_css_class("dim-label");
        } else {
            self.pause_button.set_label(&gettext("Pause"));
            self.pause_button.remove_css_class("paused");
            self.timer_label.remove_css_class("dim-label");
        }
    }
}

pub fn timer_text(seconds: u32) -> String {
    gettext("Time: {}s").replace("{}", &seconds.to_string())
}

/// Starts the one-second ticker when the clock runs and stops it otherwise.
pub(super) fn sync_ticker(state: &Rc<RefCell<AppState>>) {
    let Ok(mut st) = state.try_borrow_mut() else {
        return;
    };
    let running = st.session.clock().is_running();
    if running && st.ticker_handle.is_none() {
        let interval = Duration::from_millis(st.session.config().tick_interval_ms);
        let weak = Rc::downgrade(state);
        let handle = glib::timeout_add_local(interval, move || tick(&weak));
        st.ticker_handle = Some(handle);
        debug!("ticker started");
    } else if !running {
        if let Some(handle) = st.ticker_handle.take() {
            handle.remove();
            debug!("ticker stopped");
        }
    }
}

fn tick(state: &Weak<RefCell<AppState>>) -> glib::ControlFlow {
    let Some(state) = state.upgrade() else {
        return glib::ControlFlow::Break;
    };
    let Ok(mut st) = state.try_borrow_mut() else {
        return glib::ControlFlow::Continue;
    };
    if st.session.tick().is_some() {
        glib::ControlFlow::Continue
    } else {
        // The handle is about to be invalidated by returning Break.
        st.ticker_handle = None;
        glib::ControlFlow::Break
    }
}
