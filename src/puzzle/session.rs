use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use super::arrange;
use super::board::{Board, Container, DropTarget};
use super::clock::{GameClock, TimerState};
use super::config::PuzzleConfig;
use super::gesture::Point;
use super::interaction::{DragPayload, InputEvent, InteractionController, Modality};
use super::piece::{PieceId, create_pieces};
use super::render::RenderSink;

/// One game in progress: the board, the clock, the input state machine and
/// the renderer they report to. Every entry point runs to completion and
/// re-renders what it changed before returning.
pub struct Session<R: RenderSink> {
    config: PuzzleConfig,
    board: Board,
    clock: GameClock,
    controller: InteractionController,
    game_started: bool,
    paused: bool,
    flipped_all: bool,
    rng: StdRng,
    renderer: R,
}

impl<R: RenderSink> Session<R> {
    pub fn new(config: PuzzleConfig, renderer: R) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(config, renderer, rng)
    }

    /// A session whose shuffles are reproducible.
    pub fn with_seed(config: PuzzleConfig, renderer: R, seed: u64) -> Self {
        Self::with_rng(config, renderer, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PuzzleConfig, renderer: R, rng: StdRng) -> Self {
        let controller = InteractionController::new(config.gestures);
        let mut session = Self {
            config,
            board: Board::default(),
            clock: GameClock::new(),
            controller,
            game_started: false,
            paused: false,
            flipped_all: false,
            rng,
            renderer,
        };
        session.new_game();
        session
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn timer_state(&self) -> TimerState {
        self.clock.state()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn flipped_all(&self) -> bool {
        self.flipped_all
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Throws the current pieces away and deals a fresh shuffled set. A
    /// paused session stays paused; the clock waits for the first move after
    /// play resumes.
    pub fn new_game(&mut self) {
        if self.controller.cancel().is_some() {
            self.renderer.clear_drag_proxy();
        }
        let pieces = create_pieces(&self.config);
        let shuffled = arrange::shuffle(&pieces, &mut self.rng);
        self.board = Board::deal(shuffled, self.config.initial_grid);
        self.clock.reset();
        self.game_started = false;
        self.flipped_all = false;
        info!(
            grid = self.board.grid().len(),
            pile = self.board.pile().len(),
            "dealt new game"
        );
        self.render_all();
        self.renderer.on_timer_tick(0);
    }

    pub fn draw_from_pile(&mut self) -> bool {
        if self.paused {
            trace!("draw ignored while paused");
            return false;
        }
        let Some(id) = self.board.draw_from_pile() else {
            trace!("draw ignored, pile is empty");
            return false;
        };
        debug!(piece = id, "drew piece onto the grid");
        self.mark_started();
        self.render_all();
        true
    }

    pub fn solve(&mut self) -> bool {
        if self.paused {
            trace!("solve ignored while paused");
            return false;
        }
        arrange::solve(&mut self.board);
        info!("puzzle solved");
        self.render_all();
        true
    }

    pub fn flip_all(&mut self) -> bool {
        if self.paused {
            trace!("flip-all ignored while paused");
            return false;
        }
        self.flipped_all = !self.flipped_all;
        arrange::flip_all(&mut self.board, self.flipped_all, self.config.cols);
        info!(on = self.flipped_all, "flipped all pieces");
        self.render_all();
        true
    }

    /// Returns the new paused flag. Pausing discards any gesture in flight.
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.paused = false;
            self.clock.resume();
        } else {
            if let Some(event) = self.controller.cancel() {
                self.dispatch(event);
            }
            self.paused = true;
            self.clock.pause();
        }
        info!(paused = self.paused, seconds = self.clock.seconds(), "pause toggled");
        self.renderer.on_pause_changed(self.paused);
        self.paused
    }

    /// Advances the clock by one interval if it is running.
    pub fn tick(&mut self) -> Option<u32> {
        let seconds = self.clock.tick()?;
        self.renderer.on_timer_tick(seconds);
        Some(seconds)
    }

    pub fn touch_start(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
        now_ms: u64,
    ) -> bool {
        self.press(piece, container, at, now_ms, Modality::Touch)
    }

    pub fn touch_move(&mut self, at: Point) {
        if self.paused {
            return;
        }
        if let Some(event) = self.controller.motion(at) {
            self.dispatch(event);
        }
    }

    /// Driven by the host's one-shot hold timer.
    pub fn touch_hold(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        if let Some(event) = self.controller.hold_elapsed(now_ms) {
            self.dispatch(event);
        }
    }

    /// Releases a touch at `at`; a drag is resolved against whatever the
    /// renderer reports under that point.
    pub fn touch_end(&mut self, at: Point, now_ms: u64) {
        if self.paused {
            return;
        }
        let target = if self.controller.is_dragging() {
            self.renderer.hit_test(at)
        } else {
            None
        };
        if let Some(event) = self.controller.release(now_ms, target) {
            self.dispatch(event);
        }
    }

    pub fn pointer_press(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
        now_ms: u64,
    ) -> bool {
        self.press(piece, container, at, now_ms, Modality::Pointer)
    }

    pub fn pointer_release(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        if let Some(event) = self.controller.release(now_ms, None) {
            self.dispatch(event);
        }
    }

    /// Abandons whatever press or drag is in flight.
    pub fn cancel_input(&mut self) {
        if let Some(event) = self.controller.cancel() {
            self.dispatch(event);
        }
    }

    /// The platform wants to start a native drag of `piece`. Returns the
    /// payload the drag session should carry, or `None` to refuse the drag.
    pub fn native_drag_begin(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
    ) -> Option<DragPayload> {
        if self.paused {
            trace!(piece, "native drag refused while paused");
            return None;
        }
        self.board.find(container, piece)?;
        let event = self.controller.native_drag_begin(piece, container, at)?;
        self.dispatch(event);
        Some(DragPayload {
            piece,
            origin: container,
        })
    }

    pub fn native_drop(&mut self, payload: &str, target: Option<DropTarget>) -> bool {
        if self.paused {
            trace!("native drop ignored while paused");
            return false;
        }
        let Ok(payload) = payload.parse::<DragPayload>() else {
            trace!(payload, "native drop with foreign payload ignored");
            return false;
        };
        match self.controller.native_drop(payload, target) {
            Some(event) => self.dispatch(event),
            None => false,
        }
    }

    pub fn native_drag_end(&mut self) {
        if let Some(event) = self.controller.native_drag_end() {
            self.dispatch(event);
        }
    }

    /// Applies one canonical input event. Returns whether the board changed.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        if self.paused {
            trace!(?event, "input ignored while paused");
            return false;
        }
        match event {
            InputEvent::TapPiece { piece, container } => {
                self.mark_started();
                let applied = self.board.toggle_face(piece, container);
                if applied {
                    debug!(piece, %container, "toggled piece face");
                    self.render_all();
                } else {
                    trace!(piece, %container, "tap on a piece no longer there");
                }
                applied
            }
            InputEvent::BeginDrag {
                piece,
                container,
                at,
                modality,
            } => {
                self.mark_started();
                trace!(piece, %container, ?modality, "drag started");
                if modality == Modality::Touch {
                    if let Some(dragged) = self.board.find(container, piece) {
                        self.renderer.request_drag_proxy(dragged, at);
                    }
                }
                false
            }
            InputEvent::UpdateDrag { at } => {
                self.renderer.update_drag_proxy(at);
                false
            }
            InputEvent::DropAt {
                piece,
                origin,
                target,
                modality,
            } => {
                if modality == Modality::Touch {
                    self.renderer.clear_drag_proxy();
                }
                let applied = self.apply_drop(piece, origin, target);
                self.render_all();
                applied
            }
            InputEvent::CancelDrag { modality } => {
                if modality == Modality::Touch {
                    self.renderer.clear_drag_proxy();
                }
                trace!(?modality, "drag abandoned");
                self.render_all();
                false
            }
        }
    }

    fn press(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
        now_ms: u64,
        modality: Modality,
    ) -> bool {
        if self.paused {
            trace!(piece, "press ignored while paused");
            return false;
        }
        if self.board.find(container, piece).is_none() {
            trace!(piece, %container, "press on a piece no longer there");
            return false;
        }
        if !self.controller.press(piece, container, at, now_ms, modality) {
            trace!(piece, "press ignored, another gesture is active");
            return false;
        }
        self.mark_started();
        true
    }

    fn apply_drop(&mut self, piece: PieceId, origin: Container, target: DropTarget) -> bool {
        if target.container != Container::Grid {
            trace!(piece, slot = target.slot, "drop onto the pile abandoned");
            return false;
        }
        let applied = match origin {
            Container::Pile => self.board.move_from_pile_to_grid(piece, target.slot),
            Container::Grid => self.board.swap_within_grid(piece, target.slot),
        };
        if applied {
            debug!(piece, %origin, slot = target.slot, "dropped piece onto the grid");
        } else {
            trace!(piece, %origin, slot = target.slot, "drop did not apply");
        }
        applied
    }

    fn mark_started(&mut self) {
        self.game_started = true;
        if self.clock.start() {
            info!("timer started");
        }
    }

    fn render(&mut self, container: Container) {
        match container {
            Container::Grid => self.renderer.render_grid(self.board.grid()),
            Container::Pile => self.renderer.render_pile(self.board.pile()),
        }
    }

    fn render_all(&mut self) {
        self.render(Container::Grid);
        self.render(Container::Pile);
    }
}
