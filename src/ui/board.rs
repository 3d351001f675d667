use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::graphene;
use gtk4::pango;
use gtk4::prelude::*;

use crate::puzzle::{Container, DropTarget, Piece, PieceId, Point, PuzzleConfig, RenderSink};

use super::hud::Hud;
use super::state::{AppState, now_ms, with_session};

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_SIZE: i32 = 72;
pub const TILE_GAP: i32 = 6;

/// GTK rendering of the board: the grid above a scrolling pile strip, with a
/// non-targetable layer on top for the touch drag proxy.
pub struct BoardView {
    state: Weak<RefCell<AppState>>,
    config: PuzzleConfig,
    root: gtk::Overlay,
    grid: gtk::Grid,
    pile: gtk::Box,
    proxy_layer: gtk::Fixed,
    proxy: Option<gtk::Picture>,
    hud: Hud,
}

impl BoardView {
    pub fn new(config: PuzzleConfig, state: Weak<RefCell<AppState>>, hud: Hud) -> Self {
        let grid = gtk::Grid::builder()
            .row_spacing(TILE_GAP as u32)
            .column_spacing(TILE_GAP as u32)
            .halign(gtk::Align::Center)
            .valign(gtk::Align::Start)
            .css_classes(vec!["tessera-grid"])
            .build();
        grid.set_widget_name(Container::Grid.as_str());
        // Releasing over the grid but off any piece appends to the end.
        attach_drop_target(&grid, state.clone(), DropTarget::grid(usize::MAX));

        let grid_scroll = gtk::ScrolledWindow::builder()
            .child(&grid)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .build();

        let pile = gtk::Box::new(gtk::Orientation::Horizontal, TILE_GAP);
        pile.add_css_class("tessera-pile");
        pile.set_widget_name(Container::Pile.as_str());

        let pile_scroll = gtk::ScrolledWindow::builder()
            .child(&pile)
            .vscrollbar_policy(gtk::PolicyType::Never)
            .min_content_height(TILE_SIZE + CONTENT_MARGIN)
            .build();

        let content = gtk::Box::new(gtk::Orientation::Vertical, CONTENT_MARGIN);
        content.set_margin_top(CONTENT_MARGIN);
        content.set_margin_bottom(CONTENT_MARGIN);
        content.set_margin_start(CONTENT_MARGIN);
        content.set_margin_end(CONTENT_MARGIN);
        content.append(&grid_scroll);
        content.append(&gtk::Separator::new(gtk::Orientation::Horizontal));
        content.append(&pile_scroll);

        let proxy_layer = gtk::Fixed::new();
        proxy_layer.set_can_target(false);

        let root = gtk::Overlay::new();
        root.add_css_class("tessera-board");
        root.set_child(Some(&content));
        root.add_overlay(&proxy_layer);

        Self {
            state,
            config,
            root,
            grid,
            pile,
            proxy_layer,
            proxy: None,
            hud,
        }
    }

    pub fn root(&self) -> &gtk::Overlay {
        &self.root
    }

    fn piece_widget(&self, piece: &Piece, container: Container, slot: usize) -> gtk::Overlay {
        let frame = gtk::Overlay::new();
        frame.set_size_request(TILE_SIZE, TILE_SIZE);
        frame.set_widget_name(&format!("{container}-{slot}"));
        frame.add_css_class("tessera-piece");
        if piece.flipped() {
            frame.add_css_class("flipped");
        }

        let picture = face_picture(self.config.resolve_asset(piece.visible_ref()));
        frame.set_child(Some(&picture));
        frame.add_overlay(&number_badge(piece.id(), piece.flipped()));

        let handle = PieceHandle {
            state: self.state.clone(),
            root: self.root.downgrade(),
            frame: frame.downgrade(),
            piece: piece.id(),
            container,
        };
        attach_pointer(&frame, &handle, self.config.resolve_asset(piece.front_ref()));
        attach_touch(&frame, &handle, self.config.gestures.hold_ms);
        if container == Container::Grid {
            attach_drop_target(&frame, self.state.clone(), DropTarget::grid(slot));
        }
        frame
    }
}

impl RenderSink for BoardView {
    fn render_grid(&mut self, pieces: &[Piece]) {
        while let Some(child) = self.grid.first_child() {
            self.grid.remove(&child);
        }
        let cols = self.config.cols.max(1);
        for (slot, piece) in pieces.iter().enumerate() {
            let widget = self.piece_widget(piece, Container::Grid, slot);
            self.grid
                .attach(&widget, (slot % cols) as i32, (slot / cols) as i32, 1, 1);
        }
    }

    fn render_pile(&mut self, pieces: &[Piece]) {
        while let Some(child) = self.pile.first_child() {
            self.pile.remove(&child);
        }
        for (slot, piece) in pieces.iter().enumerate() {
            let widget = self.piece_widget(piece, Container::Pile, slot);
            self.pile.append(&widget);
        }
    }

    fn on_timer_tick(&mut self, seconds: u32) {
        self.hud.show_seconds(seconds);
    }

    fn on_pause_changed(&mut self, paused: bool) {
        self.hud.show_paused(paused);
        if paused {
            self.root.add_css_class("paused");
        } else {
            self.root.remove_css_class("paused");
        }
    }

    fn request_drag_proxy(&mut self, piece: &Piece, origin: Point) {
        self.clear_drag_proxy();
        let picture = face_picture(self.config.resolve_asset(piece.front_ref()));
        picture.add_css_class("tessera-proxy");
        let (x, y) = proxy_origin(origin);
        self.proxy_layer.put(&picture, x, y);
        self.proxy = Some(picture);
    }

    fn update_drag_proxy(&mut self, at: Point) {
        if let Some(picture) = &self.proxy {
            let (x, y) = proxy_origin(at);
            self.proxy_layer.move_(picture, x, y);
        }
    }

    fn clear_drag_proxy(&mut self) {
        if let Some(picture) = self.proxy.take() {
            self.proxy_layer.remove(&picture);
        }
    }

    fn hit_test(&self, at: Point) -> Option<DropTarget> {
        let mut widget = self.root.pick(at.x, at.y, gtk::PickFlags::DEFAULT);
        while let Some(current) = widget {
            if let Some(target) = slot_from_name(&current.widget_name()) {
                return Some(target);
            }
            if current == *self.root.upcast_ref::<gtk::Widget>() {
                return None;
            }
            widget = current.parent();
        }
        None
    }
}

/// Piece widgets carry `grid-3` / `pile-7` names; the bare container names
/// stand for "past the last slot".
fn slot_from_name(name: &str) -> Option<DropTarget> {
    let (container, slot) = match name.split_once('-') {
        Some((container, slot)) => (container, slot.parse().ok()?),
        None => (name, usize::MAX),
    };
    Some(DropTarget {
        container: container.parse().ok()?,
        slot,
    })
}

fn proxy_origin(center: Point) -> (f64, f64) {
    let half = f64::from(TILE_SIZE) / 2.0;
    (center.x - half, center.y - half)
}

fn face_picture(path: PathBuf) -> gtk::Picture {
    let picture = gtk::Picture::for_filename(path);
    picture.set_content_fit(gtk::ContentFit::Cover);
    picture.set_can_shrink(true);
    picture.set_size_request(TILE_SIZE, TILE_SIZE);
    picture
}

fn number_badge(id: PieceId, flipped: bool) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .can_target(false)
        .build();
    area.add_css_class("tessera-badge");

    let text = id.to_string();
    area.set_draw_func(move |_, cr, width, height| {
        let min_dim = width.min(height) as f64;
        let pad = (min_dim * 0.05).max(2.0);

        cr.set_antialias(cairo::Antialias::Best);

        let layout = pangocairo::functions::create_layout(cr);
        let mut font_desc = pango::FontDescription::new();
        font_desc.set_family("Cantarell, Noto Sans, sans");
        font_desc.set_weight(pango::Weight::Bold);
        font_desc.set_size((min_dim * 0.2 * pango::SCALE as f64) as i32);
        layout.set_font_description(Some(&font_desc));
        layout.set_text(&text);

        let (text_width, text_height) = layout.pixel_size();
        let x = width as f64 - text_width as f64 - pad * 2.0;
        let y = height as f64 - text_height as f64 - pad * 2.0;

        let shade = if flipped { 0.7 } else { 0.45 };
        cr.set_source_rgba(0.0, 0.0, 0.0, shade);
        cr.rectangle(
            x - pad,
            y - pad,
            text_width as f64 + pad * 2.0,
            text_height as f64 + pad * 2.0,
        );
        if cr.fill().is_err() {
            return;
        }

        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.move_to(x, y);
        pangocairo::functions::show_layout(cr, &layout);
    });
    area
}

/// What a piece's input controllers need to reach the session.
#[derive(Clone)]
struct PieceHandle {
    state: Weak<RefCell<AppState>>,
    root: glib::WeakRef<gtk::Overlay>,
    frame: glib::WeakRef<gtk::Overlay>,
    piece: PieceId,
    container: Container,
}

impl PieceHandle {
    /// Maps a point in the piece's coordinates into the board's.
    fn to_board(&self, x: f64, y: f64) -> Option<Point> {
        let root = self.root.upgrade()?;
        let frame = self.frame.upgrade()?;
        let point = frame.compute_point(&root, &graphene::Point::new(x as f32, y as f32))?;
        Some(Point::new(f64::from(point.x()), f64::from(point.y())))
    }
}

fn is_touch(controller: &impl IsA<gtk::EventController>) -> bool {
    controller
        .current_event_device()
        .is_some_and(|device| device.source() == gdk::InputSource::Touchscreen)
}

/// Mouse input: a click gesture for taps and a native drag source.
fn attach_pointer(frame: &gtk::Overlay, handle: &PieceHandle, front: PathBuf) {
    let click = gtk::GestureClick::new();
    click.set_button(gdk::BUTTON_PRIMARY);
    click.connect_pressed({
        let handle = handle.clone();
        move |gesture, _, x, y| {
            if is_touch(gesture) {
                return;
            }
            let Some(at) = handle.to_board(x, y) else {
                return;
            };
            with_session(&handle.state, |session| {
                session.pointer_press(handle.piece, handle.container, at, now_ms())
            });
        }
    });
    click.connect_released({
        let state = handle.state.clone();
        move |gesture, _, _, _| {
            if is_touch(gesture) {
                return;
            }
            with_session(&state, |session| session.pointer_release(now_ms()));
        }
    });
    frame.add_controller(click);

    let source = gtk::DragSource::new();
    source.set_actions(gdk::DragAction::MOVE);
    source.connect_prepare({
        let handle = handle.clone();
        move |source, x, y| {
            if is_touch(source) {
                return None;
            }
            let at = handle.to_board(x, y)?;
            let payload = with_session(&handle.state, |session| {
                session.native_drag_begin(handle.piece, handle.container, at)
            })
            .flatten()?;
            Some(gdk::ContentProvider::for_value(
                &payload.to_string().to_value(),
            ))
        }
    });
    source.connect_drag_begin(move |source, _| {
        if let Ok(texture) = gdk::Texture::from_filename(&front) {
            source.set_icon(Some(&texture), TILE_SIZE / 2, TILE_SIZE / 2);
        }
    });
    source.connect_drag_end({
        let state = handle.state.clone();
        move |_, _, _| {
            with_session(&state, |session| session.native_drag_end());
        }
    });
    frame.add_controller(source);
}

/// Touch input: a touch-only drag gesture plus a one-shot hold timer feed
/// the session's touch entry points. `active` tracks whether this piece's
/// gesture owns the current press, so a second finger cannot steer it.
fn attach_touch(frame: &gtk::Overlay, handle: &PieceHandle, hold_ms: u64) {
    let active = Rc::new(Cell::new(false));
    let gesture = gtk::GestureDrag::new();
    gesture.set_touch_only(true);

    gesture.connect_drag_begin({
        let handle = handle.clone();
        let active = active.clone();
        move |gesture, x, y| {
            let accepted = handle.to_board(x, y).and_then(|at| {
                with_session(&handle.state, |session| {
                    session.touch_start(handle.piece, handle.container, at, now_ms())
                })
            });
            if accepted != Some(true) {
                gesture.set_state(gtk::EventSequenceState::Denied);
                return;
            }
            gesture.set_state(gtk::EventSequenceState::Claimed);
            active.set(true);
            let state = handle.state.clone();
            glib::timeout_add_local_once(Duration::from_millis(hold_ms), move || {
                with_session(&state, |session| session.touch_hold(now_ms()));
            });
        }
    });

    gesture.connect_drag_update({
        let handle = handle.clone();
        let active = active.clone();
        move |gesture, dx, dy| {
            if !active.get() {
                return;
            }
            let Some(at) = gesture
                .start_point()
                .and_then(|(x, y)| handle.to_board(x + dx, y + dy))
            else {
                return;
            };
            with_session(&handle.state, |session| session.touch_move(at));
        }
    });

    gesture.connect_drag_end({
        let handle = handle.clone();
        let active = active.clone();
        move |gesture, dx, dy| {
            if !active.replace(false) {
                return;
            }
            let at = gesture
                .start_point()
                .and_then(|(x, y)| handle.to_board(x + dx, y + dy));
            with_session(&handle.state, |session| match at {
                Some(at) => session.touch_end(at, now_ms()),
                None => session.cancel_input(),
            });
        }
    });

    gesture.connect_cancel({
        let state = handle.state.clone();
        move |_, _| {
            if active.replace(false) {
                with_session(&state, |session| session.cancel_input());
            }
        }
    });

    frame.add_controller(gesture);
}

/// Native drops onto `target`. The payload names the piece; the target only
/// says where it landed.
fn attach_drop_target(
    widget: &impl IsA<gtk::Widget>,
    state: Weak<RefCell<AppState>>,
    target: DropTarget,
) {
    let drop = gtk::DropTarget::new(glib::Type::STRING, gdk::DragAction::MOVE);
    drop.connect_drop(move |_, value, _, _| {
        let Ok(payload) = value.get::<String>() else {
            return false;
        };
        with_session(&state, |session| session.native_drop(&payload, Some(target)))
            .unwrap_or(false)
    });
    widget.add_controller(drop);
}
