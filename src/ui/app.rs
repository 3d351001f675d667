use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use tracing::info;

use crate::puzzle::{PuzzleConfig, Session, TimerState};

use super::board::{BoardView, TILE_GAP};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::Hud;
use super::state::{AppState, with_session};

pub const APP_ID: &str = "io.github.tessera.Tessera";

const STYLE: &str = "
.tessera-piece { border-radius: 6px; background-color: alpha(currentColor, 0.08); }
.tessera-piece.flipped { background-color: alpha(currentColor, 0.2); }
.tessera-pile { padding: 6px; }
.tessera-proxy { opacity: 0.85; box-shadow: 0 6px 18px alpha(black, 0.35); border-radius: 6px; }
.tessera-board.paused .tessera-grid,
.tessera-board.paused .tessera-pile { opacity: 0.45; }
.tessera-timer { font-weight: bold; }
.theme-dark .tessera-piece { background-color: alpha(white, 0.06); }
";

pub fn run(config: PuzzleConfig) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        build_window(app, config.clone());
    });

    app.run()
}

fn build_window(app: &adw::Application, config: PuzzleConfig) {
    load_css();

    let hud = Hud::new();
    let state = AppState::new(config.clone(), {
        let hud = hud.clone();
        move |weak| BoardView::new(config, weak, hud)
    });
    let weak = Rc::downgrade(&state);

    add_session_action(app, &weak, "new-game", &["<Control>n"], |session| {
        session.new_game();
    });
    add_session_action(app, &weak, "draw", &["<Control>d"], |session| {
        session.draw_from_pile();
    });
    add_session_action(app, &weak, "solve", &["<Control><Shift>s"], |session| {
        session.solve();
    });
    add_session_action(app, &weak, "flip-all", &["<Control>f"], |session| {
        session.flip_all();
    });
    add_session_action(app, &weak, "pause", &["<Control>p", "Pause"], |session| {
        session.toggle_pause();
    });

    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let app = app.clone();
        let weak = weak.clone();
        move |_, _| {
            let paused_here = pause_for_overlay(&weak);
            let dialog = show_instructions_dialog(&app);
            let weak = weak.clone();
            dialog.connect_response(None, move |_, _| {
                resume_after_overlay(&weak, paused_here);
            });
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        let weak = weak.clone();
        move |_, _| {
            let paused_here = pause_for_overlay(&weak);
            let dialog = show_about_dialog(&app);
            let weak = weak.clone();
            dialog.connect_closed(move |_| {
                resume_after_overlay(&weak, paused_here);
            });
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<Control>q"]);

    let header = adw::HeaderBar::builder()
        .title_widget(hud.timer_label())
        .build();
    header.add_css_class("app-header");

    let new_game_button = gtk::Button::builder()
        .icon_name("view-refresh-symbolic")
        .action_name("app.new-game")
        .build();
    new_game_button.set_tooltip_text(Some(gettext("New Game").as_str()));
    header.pack_start(&new_game_button);

    let draw_button = gtk::Button::builder()
        .label(gettext("Draw"))
        .action_name("app.draw")
        .build();
    draw_button.add_css_class("suggested-action");
    header.pack_start(&draw_button);

    let menu_model = gio::Menu::new();
    menu_model.append(Some(gettext("Instructions").as_str()), Some("app.instructions"));
    menu_model.append(Some(gettext("About Tessera").as_str()), Some("app.about"));
    menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
    let menu_button = gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu_model)
        .build();

    let solve_button = gtk::Button::builder()
        .label(gettext("Solve"))
        .action_name("app.solve")
        .build();
    let flip_button = gtk::Button::builder()
        .label(gettext("Flip All"))
        .action_name("app.flip-all")
        .build();

    let end_box = gtk::Box::new(gtk::Orientation::Horizontal, TILE_GAP);
    end_box.append(&flip_button);
    end_box.append(&solve_button);
    end_box.append(hud.pause_button());
    end_box.append(&menu_button);
    header.pack_end(&end_box);

    let board_root = state.borrow().session.renderer().root().clone();
    let toolbar = adw::ToolbarView::new();
    toolbar.set_hexpand(true);
    toolbar.set_vexpand(true);
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&board_root));

    let win = adw::ApplicationWindow::builder()
        .application(app)
        .title("Tessera")
        .icon_name(APP_ID)
        .default_width(860)
        .default_height(760)
        .content(&toolbar)
        .build();
    win.set_size_request(360, 480);

    let style_manager = adw::StyleManager::default();
    apply_theme_class(&win, style_manager.is_dark());
    style_manager.connect_notify_local(Some("dark"), {
        let win = win.clone();
        move |manager, _| apply_theme_class(&win, manager.is_dark())
    });

    // The window owns the only strong reference to the state.
    win.connect_close_request({
        let state = state.clone();
        move |_| {
            if let Ok(mut st) = state.try_borrow_mut() {
                if let Some(handle) = st.ticker_handle.take() {
                    handle.remove();
                }
                info!(seconds = st.session.clock().seconds(), "window closed");
            }
            glib::Propagation::Proceed
        }
    });

    win.present();
}

fn add_session_action(
    app: &adw::Application,
    state: &Weak<RefCell<AppState>>,
    name: &str,
    accels: &[&str],
    action: impl Fn(&mut Session<BoardView>) + 'static,
) {
    let simple = SimpleAction::new(name, None);
    simple.connect_activate({
        let state = state.clone();
        move |_, _| {
            with_session(&state, &action);
        }
    });
    app.add_action(&simple);
    app.set_accels_for_action(&format!("app.{name}"), accels);
}

/// Pauses a running game while a dialog covers the board. Returns whether
/// this call did the pausing.
fn pause_for_overlay(state: &Weak<RefCell<AppState>>) -> bool {
    with_session(state, |session| {
        if session.paused() || session.timer_state() != TimerState::Running {
            return false;
        }
        session.toggle_pause();
        true
    })
    .unwrap_or(false)
}

fn resume_after_overlay(state: &Weak<RefCell<AppState>>, paused_here: bool) {
    if !paused_here {
        return;
    }
    with_session(state, |session| {
        if session.paused() {
            session.toggle_pause();
        }
    });
}

fn apply_theme_class(win: &adw::ApplicationWindow, dark: bool) {
    if dark {
        win.remove_css_class("theme-light");
        win.add_css_class("theme-dark");
    } else {
        win.remove_css_class("theme-dark");
        win.add_css_class("theme-light");
    }
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLE);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
