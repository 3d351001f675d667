use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::arrange::{self, mirror_rows, shuffle};
use super::board::{Board, Container, DropTarget};
use super::clock::{GameClock, TimerState};
use super::config::{GestureThresholds, PuzzleConfig};
use super::error::ConfigError;
use super::gesture::{Point, PressGate};
use super::interaction::{DragPayload, InputEvent, InteractionController, Modality};
use super::piece::{Piece, PieceId, create_pieces};
use super::render::RenderSink;
use super::session::Session;

#[derive(Default)]
struct RecordingSink {
    grid: Vec<PieceId>,
    pile: Vec<PieceId>,
    grid_renders: usize,
    pile_renders: usize,
    ticks: Vec<u32>,
    proxy: Option<(PieceId, Point)>,
    proxy_moves: Vec<Point>,
    proxy_clears: usize,
    paused: Option<bool>,
    hits: Vec<(Point, DropTarget)>,
}

impl RenderSink for RecordingSink {
    fn render_grid(&mut self, pieces: &[Piece]) {
        self.grid = pieces.iter().map(Piece::id).collect();
        self.grid_renders += 1;
    }

    fn render_pile(&mut self, pieces: &[Piece]) {
        self.pile = pieces.iter().map(Piece::id).collect();
        self.pile_renders += 1;
    }

    fn on_timer_tick(&mut self, seconds: u32) {
        self.ticks.push(seconds);
    }

    fn on_pause_changed(&mut self, paused: bool) {
        self.paused = Some(paused);
    }

    fn request_drag_proxy(&mut self, piece: &Piece, origin: Point) {
        self.proxy = Some((piece.id(), origin));
    }

    fn update_drag_proxy(&mut self, at: Point) {
        self.proxy_moves.push(at);
    }

    fn clear_drag_proxy(&mut self) {
        self.proxy = None;
        self.proxy_clears += 1;
    }

    fn hit_test(&self, at: Point) -> Option<DropTarget> {
        self.hits
            .iter()
            .find(|(point, _)| *point == at)
            .map(|(_, target)| *target)
    }
}

fn small_config() -> PuzzleConfig {
    PuzzleConfig {
        rows: 2,
        cols: 3,
        initial_grid: 3,
        ..PuzzleConfig::default()
    }
}

fn session() -> Session<RecordingSink> {
    Session::with_seed(PuzzleConfig::default(), RecordingSink::default(), 7)
}

fn ids(pieces: &[Piece]) -> Vec<PieceId> {
    pieces.iter().map(Piece::id).collect()
}

fn assert_conserved(board: &Board, total: usize) {
    assert_eq!(board.total(), total);
    let seen: HashSet<PieceId> = board
        .grid()
        .iter()
        .chain(board.pile())
        .map(Piece::id)
        .collect();
    assert_eq!(seen.len(), total);
    assert!(seen.iter().all(|id| (1..=total as PieceId).contains(id)));
}

fn board_of(grid: &[usize], pile: &[usize]) -> Board {
    let pieces = create_pieces(&PuzzleConfig::default());
    let pick = |indices: &[usize]| -> Vec<Piece> {
        indices.iter().map(|i| pieces[*i].clone()).collect()
    };
    Board::new(pick(grid), pick(pile))
}

#[test]
fn registry_builds_canonical_pieces() {
    let pieces = create_pieces(&PuzzleConfig::default());
    assert_eq!(pieces.len(), 48);
    for (index, piece) in pieces.iter().enumerate() {
        assert_eq!(piece.id(), index as PieceId + 1);
        assert_eq!(piece.original_index(), index);
        assert!(!piece.flipped());
    }
    assert_eq!(pieces[0].front_ref(), "images/piece_1.jpg");
    assert_eq!(pieces[47].back_ref(), "images/back_piece_48.jpg");
    assert_eq!(create_pieces(&PuzzleConfig::default()), pieces);
}

#[test]
fn visible_face_follows_flip() {
    let mut piece = create_pieces(&small_config()).remove(0);
    assert_eq!(piece.visible_ref(), piece.front_ref());
    piece.toggle();
    assert_eq!(piece.visible_ref(), "images/back_piece_1.jpg");
}

#[test]
fn config_defaults_match_reference_board() {
    let config = PuzzleConfig::default();
    assert_eq!((config.rows, config.cols, config.initial_grid), (6, 8, 3));
    assert_eq!(config.gestures, GestureThresholds::default());
    assert_eq!(config.gestures.hold_ms, 300);
    assert!(config.validate().is_ok());
}

#[test]
fn config_partial_json_keeps_defaults() {
    let config =
        PuzzleConfig::from_json(r#"{"rows": 4, "gestures": {"tap_max_ms": 180}}"#).unwrap();
    assert_eq!(config.rows, 4);
    assert_eq!(config.cols, 8);
    assert_eq!(config.gestures.tap_max_ms, 180);
    assert_eq!(config.gestures.hold_ms, 300);
}

#[test]
fn config_rejects_bad_values() {
    let err = PuzzleConfig::from_json(r#"{"rows": 1, "cols": 2, "initial_grid": 3}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = PuzzleConfig::from_json(r#"{"front_pattern": "front.png"}"#).unwrap_err();
    assert!(err.to_string().contains("front_pattern"));

    let err = PuzzleConfig::from_json("{ rows: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = PuzzleConfig::load_from(std::path::Path::new("/nonexistent/tessera.json"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn config_resolves_assets_against_dir() {
    let mut config = PuzzleConfig::default();
    assert_eq!(
        config.resolve_asset("images/piece_1.jpg"),
        std::path::PathBuf::from("images/piece_1.jpg")
    );
    config.asset_dir = Some("/srv/puzzle".into());
    assert_eq!(
        config.resolve_asset("images/piece_1.jpg"),
        std::path::PathBuf::from("/srv/puzzle/images/piece_1.jpg")
    );
}

#[test]
fn pile_drop_inserts_and_shifts_grid() {
    let mut board = board_of(&[0, 1, 2], &[3, 4]);
    assert!(board.move_from_pile_to_grid(5, 1));
    assert_eq!(ids(board.grid()), vec![1, 5, 2, 3]);
    assert_eq!(ids(board.pile()), vec![4]);
}

#[test]
fn pile_drop_past_end_appends() {
    let mut board = board_of(&[0, 1], &[2]);
    assert!(board.move_from_pile_to_grid(3, 40));
    assert_eq!(ids(board.grid()), vec![1, 2, 3]);
    assert!(board.pile().is_empty());
}

#[test]
fn stale_ids_are_noops() {
    let mut board = board_of(&[0, 1], &[2]);
    let before = board.clone();
    assert!(!board.move_from_pile_to_grid(1, 0));
    assert!(!board.swap_within_grid(3, 0));
    assert!(!board.toggle_face(3, Container::Grid));
    assert_eq!(board, before);
}

#[test]
fn grid_swap_exchanges_slots() {
    let mut board = board_of(&[0, 1, 2, 3], &[4]);
    assert!(board.swap_within_grid(1, 2));
    assert_eq!(ids(board.grid()), vec![3, 2, 1, 4]);
    assert!(!board.swap_within_grid(1, 4));
    assert_eq!(ids(board.grid()), vec![3, 2, 1, 4]);
    assert_eq!(ids(board.pile()), vec![5]);
}

#[test]
fn draw_takes_pile_head() {
    let mut board = board_of(&[0], &[5, 6]);
    assert_eq!(board.draw_from_pile(), Some(6));
    assert_eq!(ids(board.grid()), vec![1, 6]);
    assert_eq!(board.draw_from_pile(), Some(7));
    assert_eq!(board.draw_from_pile(), None);
    assert_eq!(ids(board.grid()), vec![1, 6, 7]);
}

#[test]
fn toggle_face_only_touches_target() {
    let mut board = board_of(&[0, 1], &[2]);
    assert!(board.toggle_face(3, Container::Pile));
    assert!(board.pile()[0].flipped());
    assert!(board.grid().iter().all(|piece| !piece.flipped()));
    assert!(!board.toggle_face(3, Container::Grid));
}

#[test]
fn shuffle_returns_permutation_without_touching_input() {
    let pieces = create_pieces(&PuzzleConfig::default());
    let snapshot = pieces.clone();
    let mut rng = StdRng::seed_from_u64(11);
    let shuffled = shuffle(&pieces, &mut rng);
    assert_eq!(pieces, snapshot);
    assert_eq!(shuffled.len(), pieces.len());
    assert_ne!(ids(&shuffled), ids(&pieces));
    let mut sorted = shuffled.clone();
    arrange::sort_canonical(&mut sorted);
    assert_eq!(sorted, pieces);
}

#[test]
fn shuffle_is_reproducible_per_seed() {
    let pieces = create_pieces(&PuzzleConfig::default());
    let a = shuffle(&pieces, &mut StdRng::seed_from_u64(3));
    let b = shuffle(&pieces, &mut StdRng::seed_from_u64(3));
    assert_eq!(a, b);
}

#[test]
fn solve_gathers_and_sorts() {
    let mut board = board_of(&[4, 0, 2], &[3, 1, 5]);
    board.toggle_face(5, Container::Grid);
    arrange::solve(&mut board);
    assert_eq!(ids(board.grid()), vec![1, 2, 3, 4, 5, 6]);
    assert!(board.pile().is_empty());
    assert!(board.grid().iter().all(|piece| !piece.flipped()));

    let once = board.clone();
    arrange::solve(&mut board);
    assert_eq!(board, once);
}

#[test]
fn mirror_rows_reverses_each_row() {
    let pieces = create_pieces(&small_config());
    assert_eq!(ids(&mirror_rows(&pieces, 3)), vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn mirror_rows_reverses_short_trailing_row() {
    let pieces = create_pieces(&small_config());
    assert_eq!(ids(&mirror_rows(&pieces[..5], 3)), vec![3, 2, 1, 5, 4]);
    assert_eq!(ids(&mirror_rows(&pieces[..2], 3)), vec![2, 1]);
}

#[test]
fn flip_all_round_trip_restores_canonical() {
    let mut board = Board::new(create_pieces(&small_config()), Vec::new());
    arrange::flip_all(&mut board, true, 3);
    assert_eq!(ids(board.grid()), vec![3, 2, 1, 6, 5, 4]);
    assert!(board.grid().iter().all(Piece::flipped));
    arrange::flip_all(&mut board, false, 3);
    assert_eq!(ids(board.grid()), vec![1, 2, 3, 4, 5, 6]);
    assert!(board.grid().iter().all(|piece| !piece.flipped()));
}

#[test]
fn flip_all_leaves_pile_alone() {
    let mut board = board_of(&[2, 0, 1], &[3]);
    board.toggle_face(4, Container::Pile);
    arrange::flip_all(&mut board, true, 8);
    assert_eq!(ids(board.grid()), vec![2, 1, 3]);
    assert!(board.pile()[0].flipped());
    arrange::flip_all(&mut board, false, 8);
    assert_eq!(ids(board.grid()), vec![1, 2, 3]);
    assert!(board.pile()[0].flipped());
}

#[test]
fn clock_lifecycle() {
    let mut clock = GameClock::new();
    assert_eq!(clock.tick(), None);
    clock.pause();
    assert_eq!(clock.state(), TimerState::NotStarted);
    assert!(clock.start());
    assert!(!clock.start());
    assert_eq!(clock.tick(), Some(1));
    assert_eq!(clock.tick(), Some(2));
    clock.pause();
    assert_eq!(clock.state(), TimerState::Paused);
    assert_eq!(clock.tick(), None);
    clock.resume();
    assert_eq!(clock.tick(), Some(3));
    clock.reset();
    assert_eq!(clock.state(), TimerState::NotStarted);
    assert_eq!(clock.seconds(), 0);
}

#[test]
fn press_gate_thresholds() {
    let gate = PressGate::arm(Point::new(100.0, 100.0), 1_000, GestureThresholds::default());
    assert!(!gate.exceeds_slop(Point::new(110.0, 90.0)));
    assert!(gate.exceeds_slop(Point::new(110.5, 100.0)));
    assert!(gate.exceeds_slop(Point::new(100.0, 89.0)));
    assert!(!gate.hold_elapsed(1_299));
    assert!(gate.hold_elapsed(1_300));
    assert!(gate.is_tap(1_249));
    assert!(!gate.is_tap(1_250));
}

fn controller() -> InteractionController {
    InteractionController::new(GestureThresholds::default())
}

#[test]
fn quick_touch_release_is_a_tap() {
    let mut ctl = controller();
    assert!(ctl.press(4, Container::Grid, Point::new(5.0, 5.0), 0, Modality::Touch));
    assert_eq!(ctl.motion(Point::new(8.0, 9.0)), None);
    assert_eq!(
        ctl.release(120, None),
        Some(InputEvent::TapPiece {
            piece: 4,
            container: Container::Grid
        })
    );
    assert!(ctl.is_idle());
}

#[test]
fn touch_jitter_inside_slop_still_taps() {
    let mut ctl = controller();
    ctl.press(6, Container::Pile, Point::new(40.0, 40.0), 0, Modality::Touch);
    assert_eq!(ctl.motion(Point::new(50.0, 30.0)), None);
    assert_eq!(ctl.motion(Point::new(31.0, 49.0)), None);
    assert!(ctl.is_pressed());
    assert_eq!(
        ctl.release(200, None),
        Some(InputEvent::TapPiece {
            piece: 6,
            container: Container::Pile
        })
    );
}

#[test]
fn slow_touch_release_does_nothing() {
    let mut ctl = controller();
    ctl.press(4, Container::Pile, Point::default(), 0, Modality::Touch);
    assert_eq!(ctl.release(260, None), None);
    assert!(ctl.is_idle());
}

#[test]
fn touch_movement_past_slop_starts_drag() {
    let mut ctl = controller();
    ctl.press(9, Container::Pile, Point::new(0.0, 0.0), 0, Modality::Touch);
    let begin = ctl.motion(Point::new(0.0, 12.0));
    assert_eq!(
        begin,
        Some(InputEvent::BeginDrag {
            piece: 9,
            container: Container::Pile,
            at: Point::new(0.0, 12.0),
            modality: Modality::Touch,
        })
    );
    assert_eq!(
        ctl.motion(Point::new(3.0, 40.0)),
        Some(InputEvent::UpdateDrag {
            at: Point::new(3.0, 40.0)
        })
    );
    assert_eq!(
        ctl.release(50, Some(DropTarget::grid(2))),
        Some(InputEvent::DropAt {
            piece: 9,
            origin: Container::Pile,
            target: DropTarget::grid(2),
            modality: Modality::Touch,
        })
    );
}

#[test]
fn touch_hold_starts_drag_at_press_point() {
    let mut ctl = controller();
    ctl.press(2, Container::Grid, Point::new(7.0, 7.0), 1_000, Modality::Touch);
    assert_eq!(ctl.hold_elapsed(1_200), None);
    assert!(matches!(
        ctl.hold_elapsed(1_300),
        Some(InputEvent::BeginDrag { at, .. }) if at == Point::new(7.0, 7.0)
    ));
    assert_eq!(ctl.dragged_piece(), Some((2, Container::Grid)));
    assert_eq!(
        ctl.release(1_400, None),
        Some(InputEvent::CancelDrag {
            modality: Modality::Touch
        })
    );
}

#[test]
fn second_press_ignored_during_drag() {
    let mut ctl = controller();
    ctl.press(1, Container::Grid, Point::default(), 0, Modality::Touch);
    ctl.hold_elapsed(400);
    assert!(!ctl.press(2, Container::Grid, Point::default(), 410, Modality::Touch));
    assert!(!ctl.press(2, Container::Grid, Point::default(), 410, Modality::Pointer));
    assert_eq!(
        ctl.native_drag_begin(2, Container::Grid, Point::default()),
        None
    );
    assert_eq!(ctl.dragged_piece(), Some((1, Container::Grid)));
}

#[test]
fn pending_touch_press_blocks_other_presses() {
    let mut ctl = controller();
    ctl.press(1, Container::Grid, Point::default(), 0, Modality::Touch);
    assert!(!ctl.press(2, Container::Grid, Point::default(), 10, Modality::Touch));
    let mut ctl = controller();
    ctl.press(1, Container::Grid, Point::default(), 0, Modality::Pointer);
    assert!(ctl.press(2, Container::Grid, Point::default(), 10, Modality::Pointer));
}

#[test]
fn pointer_click_has_no_duration_cap() {
    let mut ctl = controller();
    ctl.press(3, Container::Grid, Point::default(), 0, Modality::Pointer);
    assert_eq!(ctl.motion(Point::new(50.0, 50.0)), None);
    assert_eq!(
        ctl.release(5_000, None),
        Some(InputEvent::TapPiece {
            piece: 3,
            container: Container::Grid
        })
    );
}

#[test]
fn native_drag_resolves_from_payload() {
    let mut ctl = controller();
    ctl.press(3, Container::Pile, Point::default(), 0, Modality::Pointer);
    assert!(ctl.native_drag_begin(3, Container::Pile, Point::default()).is_some());
    let payload = DragPayload {
        piece: 3,
        origin: Container::Pile,
    };
    assert_eq!(
        ctl.native_drop(payload, Some(DropTarget::grid(0))),
        Some(InputEvent::DropAt {
            piece: 3,
            origin: Container::Pile,
            target: DropTarget::grid(0),
            modality: Modality::Pointer,
        })
    );
    assert_eq!(ctl.native_drag_end(), None);
}

#[test]
fn native_drag_end_without_drop_cancels() {
    let mut ctl = controller();
    ctl.native_drag_begin(5, Container::Grid, Point::default());
    assert_eq!(
        ctl.native_drag_end(),
        Some(InputEvent::CancelDrag {
            modality: Modality::Pointer
        })
    );
    assert!(ctl.is_idle());
}

#[test]
fn drag_payload_text_form() {
    let payload = DragPayload {
        piece: 17,
        origin: Container::Grid,
    };
    assert_eq!(payload.to_string(), "piece:17:grid");
    assert_eq!("piece:17:grid".parse::<DragPayload>(), Ok(payload));
    assert!("piece:x:grid".parse::<DragPayload>().is_err());
    assert!("piece:4:table".parse::<DragPayload>().is_err());
    assert!("waste".parse::<DragPayload>().is_err());
}

#[test]
fn new_game_deals_three_to_grid() {
    let session = session();
    let board = session.board();
    assert_eq!(board.grid().len(), 3);
    assert_eq!(board.pile().len(), 45);
    assert!(board.grid().iter().chain(board.pile()).all(|p| !p.flipped()));
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    assert!(!session.game_started());
    assert_conserved(board, 48);
    assert_eq!(session.renderer().grid, ids(board.grid()));
    assert_eq!(session.renderer().pile, ids(board.pile()));
    assert_eq!(session.renderer().ticks, vec![0]);
}

#[test]
fn five_draws_fill_grid_from_pile_head() {
    let mut session = session();
    let mut head = 0;
    for _ in 0..5 {
        head = session.board().pile()[0].id();
        assert!(session.draw_from_pile());
    }
    let board = session.board();
    assert_eq!(board.grid().len(), 8);
    assert_eq!(board.pile().len(), 40);
    assert_eq!(board.grid().last().map(Piece::id), Some(head));
    assert_eq!(session.timer_state(), TimerState::Running);
    assert!(session.game_started());
}

#[test]
fn drawing_an_empty_pile_is_a_noop() {
    let config = PuzzleConfig {
        initial_grid: 6,
        ..small_config()
    };
    let mut session = Session::with_seed(config, RecordingSink::default(), 1);
    let renders = session.renderer().grid_renders;
    assert!(!session.draw_from_pile());
    assert_eq!(session.renderer().grid_renders, renders);
    assert_eq!(session.timer_state(), TimerState::NotStarted);
}

#[test]
fn paused_session_rejects_every_mutation() {
    let mut session = session();
    session.draw_from_pile();
    session.tick();
    session.toggle_pause();
    assert_eq!(session.renderer().paused, Some(true));
    let board = session.board().clone();
    let seconds = session.clock().seconds();
    let (grid_id, pile_id) = (board.grid()[0].id(), board.pile()[0].id());

    assert!(!session.draw_from_pile());
    assert!(!session.solve());
    assert!(!session.flip_all());
    assert!(!session.touch_start(grid_id, Container::Grid, Point::default(), 0));
    assert!(!session.pointer_press(grid_id, Container::Grid, Point::default(), 0));
    assert!(
        session
            .native_drag_begin(pile_id, Container::Pile, Point::default())
            .is_none()
    );
    assert!(!session.native_drop(&format!("piece:{pile_id}:pile"), Some(DropTarget::grid(0))));
    assert!(!session.dispatch(InputEvent::TapPiece {
        piece: grid_id,
        container: Container::Grid
    }));
    assert_eq!(session.tick(), None);

    assert_eq!(session.board(), &board);
    assert_eq!(session.clock().seconds(), seconds);
    assert!(!session.flipped_all());

    session.toggle_pause();
    assert_eq!(session.tick(), Some(seconds + 1));
}

#[test]
fn pausing_before_start_keeps_clock_idle() {
    let mut session = session();
    session.toggle_pause();
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    session.toggle_pause();
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    assert_eq!(session.tick(), None);
}

#[test]
fn touch_tap_toggles_exactly_one_piece() {
    let mut session = session();
    let before = session.board().clone();
    let target = before.grid()[1].id();
    assert!(session.touch_start(target, Container::Grid, Point::new(1.0, 1.0), 10));
    session.touch_end(Point::new(1.0, 1.0), 90);

    let after = session.board();
    assert_eq!(ids(after.grid()), ids(before.grid()));
    assert_eq!(ids(after.pile()), ids(before.pile()));
    for (old, new) in before.grid().iter().zip(after.grid()) {
        assert_eq!(new.flipped(), old.flipped() != (old.id() == target));
    }
    assert!(after.pile().iter().all(|p| !p.flipped()));
    assert_eq!(session.timer_state(), TimerState::Running);
}

#[test]
fn pointer_click_on_pile_piece_flips_it() {
    let mut session = session();
    let target = session.board().pile()[4].id();
    let (grid_renders, pile_renders) = (
        session.renderer().grid_renders,
        session.renderer().pile_renders,
    );
    assert!(session.pointer_press(target, Container::Pile, Point::default(), 0));
    session.pointer_release(900);
    assert!(session.board().pile()[4].flipped());
    assert_eq!(session.renderer().grid_renders, grid_renders + 1);
    assert_eq!(session.renderer().pile_renders, pile_renders + 1);
}

#[test]
fn touch_drag_swaps_grid_slots() {
    let mut session = session();
    for _ in 0..3 {
        session.draw_from_pile();
    }
    let before = ids(session.board().grid());
    let drop_point = Point::new(300.0, 40.0);
    session
        .renderer_mut()
        .hits
        .push((drop_point, DropTarget::grid(4)));

    session.touch_start(before[1], Container::Grid, Point::new(60.0, 40.0), 0);
    session.touch_move(Point::new(80.0, 40.0));
    assert_eq!(session.renderer().proxy.map(|(id, _)| id), Some(before[1]));
    session.touch_move(drop_point);
    assert_eq!(session.renderer().proxy_moves, vec![drop_point]);
    session.touch_end(drop_point, 600);

    let after = ids(session.board().grid());
    assert_eq!(after.len(), before.len());
    assert_eq!(after[4], before[1]);
    assert_eq!(after[1], before[4]);
    assert_eq!(session.board().pile().len(), 42);
    assert_eq!(session.renderer().proxy, None);
    assert!(session.controller().is_idle());
}

#[test]
fn touch_drop_outside_any_piece_is_abandoned() {
    let mut session = session();
    let before = session.board().clone();
    let piece = before.pile()[0].id();
    session.touch_start(piece, Container::Pile, Point::default(), 0);
    session.touch_hold(300);
    assert!(session.renderer().proxy.is_some());
    session.touch_end(Point::new(999.0, 999.0), 700);
    assert_eq!(session.board(), &before);
    assert_eq!(session.renderer().proxy, None);
    assert_eq!(session.renderer().proxy_clears, 1);
}

#[test]
fn native_pile_drop_inserts_into_grid() {
    let mut session = session();
    let grid_before = ids(session.board().grid());
    let piece = session.board().pile()[10].id();
    let payload = session
        .native_drag_begin(piece, Container::Pile, Point::default())
        .unwrap();
    assert_eq!(session.renderer().proxy, None);
    assert!(session.native_drop(&payload.to_string(), Some(DropTarget::grid(1))));
    session.native_drag_end();

    let grid = ids(session.board().grid());
    assert_eq!(grid, vec![grid_before[0], piece, grid_before[1], grid_before[2]]);
    assert_eq!(session.board().pile().len(), 44);
    assert_conserved(session.board(), 48);
}

#[test]
fn drops_onto_the_pile_change_nothing() {
    let mut session = session();
    let before = session.board().clone();
    let piece = before.grid()[0].id();
    session.native_drag_begin(piece, Container::Grid, Point::default());
    assert!(!session.native_drop(&format!("piece:{piece}:grid"), Some(DropTarget::pile(0))));
    assert_eq!(session.board(), &before);
}

#[test]
fn stale_drop_payload_is_a_noop() {
    let mut session = session();
    let before = session.board().clone();
    let grid_piece = before.grid()[0].id();
    assert!(!session.native_drop(&format!("piece:{grid_piece}:pile"), Some(DropTarget::grid(0))));
    assert!(!session.native_drop("not a piece", Some(DropTarget::grid(0))));
    assert_eq!(session.board(), &before);
}

#[test]
fn pausing_mid_drag_discards_it() {
    let mut session = session();
    let piece = session.board().pile()[0].id();
    session.touch_start(piece, Container::Pile, Point::default(), 0);
    session.touch_move(Point::new(40.0, 0.0));
    assert!(session.controller().is_dragging());
    let before = session.board().clone();
    session.toggle_pause();
    assert!(session.controller().is_idle());
    assert_eq!(session.renderer().proxy, None);
    session.touch_end(Point::new(40.0, 0.0), 100);
    assert_eq!(session.board(), &before);
}

#[test]
fn solve_twice_matches_solve_once() {
    let mut session = session();
    session.draw_from_pile();
    session.flip_all();
    assert!(session.solve());
    let once = session.board().clone();
    assert!(session.solve());
    assert_eq!(session.board(), &once);
    assert!(session.board().pile().is_empty());
    let grid = session.board().grid();
    assert_eq!(ids(grid), (1..=48).collect::<Vec<PieceId>>());
    assert!(grid.iter().all(|p| !p.flipped()));
}

#[test]
fn flip_all_toggles_from_canonical_order() {
    let mut session = session();
    session.solve();
    assert!(session.flip_all());
    assert!(session.flipped_all());
    let grid = ids(session.board().grid());
    assert_eq!(&grid[..8], &[8, 7, 6, 5, 4, 3, 2, 1]);
    assert!(session.flip_all());
    assert!(!session.flipped_all());
    assert_eq!(ids(session.board().grid()), (1..=48).collect::<Vec<PieceId>>());
}

#[test]
fn new_game_resets_everything() {
    let mut session = session();
    session.draw_from_pile();
    session.tick();
    session.flip_all();
    session.new_game();
    assert!(!session.paused());
    assert!(!session.flipped_all());
    assert!(!session.game_started());
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    assert_eq!(session.clock().seconds(), 0);
    assert_eq!(session.board().grid().len(), 3);
    assert!(session.board().grid().iter().all(|p| !p.flipped()));
    assert_eq!(session.renderer().ticks.last(), Some(&0));
}

#[test]
fn new_game_while_paused_stays_paused() {
    let mut session = session();
    session.draw_from_pile();
    session.tick();
    session.toggle_pause();
    session.new_game();
    assert!(session.paused());
    assert_eq!(session.renderer().paused, Some(true));
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    assert_eq!(session.board().grid().len(), 3);
    assert!(!session.draw_from_pile());

    session.toggle_pause();
    assert_eq!(session.timer_state(), TimerState::NotStarted);
    assert_eq!(session.tick(), None);
    assert!(session.draw_from_pile());
    assert_eq!(session.timer_state(), TimerState::Running);
}

#[test]
fn native_drop_after_pause_cancel_is_ignored() {
    let mut session = session();
    let piece = session.board().pile()[0].id();
    let payload = session
        .native_drag_begin(piece, Container::Pile, Point::default())
        .unwrap();
    session.toggle_pause();
    session.toggle_pause();
    let before = session.board().clone();
    assert!(!session.native_drop(&payload.to_string(), Some(DropTarget::grid(0))));
    session.native_drag_end();
    assert_eq!(session.board(), &before);
    assert_eq!(session.board().grid().len(), 3);
    assert!(session.controller().is_idle());
}

#[test]
fn native_drop_from_previous_game_is_ignored() {
    let mut session = session();
    let piece = session.board().grid()[0].id();
    let payload = session
        .native_drag_begin(piece, Container::Grid, Point::default())
        .unwrap();
    session.new_game();
    let before = session.board().clone();
    assert!(!session.native_drop(&payload.to_string(), Some(DropTarget::grid(2))));
    assert_eq!(session.board(), &before);
}

#[test]
fn native_drop_must_match_the_drag_in_flight() {
    let mut ctl = controller();
    let payload = DragPayload {
        piece: 4,
        origin: Container::Pile,
    };
    assert_eq!(ctl.native_drop(payload, Some(DropTarget::grid(0))), None);

    ctl.native_drag_begin(3, Container::Pile, Point::default());
    assert_eq!(ctl.native_drop(payload, Some(DropTarget::grid(0))), None);
    let wrong_origin = DragPayload {
        piece: 3,
        origin: Container::Grid,
    };
    assert_eq!(ctl.native_drop(wrong_origin, Some(DropTarget::grid(0))), None);
    assert_eq!(ctl.dragged_piece(), Some((3, Container::Pile)));
}
