use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

use super::app::APP_ID;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let body = gettext(
        "Rebuild the picture on the grid.\n\
Draw pieces from the pile, then drag them onto the grid: a piece from the pile \
is inserted where you drop it, a grid piece swaps places with the one it lands on.\n\
Tap a piece to turn it over. The timer starts with your first move.",
    );
    let dialog = adw::AlertDialog::new(Some(gettext("Instructions").as_str()), Some(body.as_str()));
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Tessera")
        .application_icon(APP_ID)
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("A tile-arrangement puzzle."))
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}
