use std::fmt;
use std::str::FromStr;

use super::board::{Container, DropTarget};
use super::config::GestureThresholds;
use super::gesture::{Point, PressGate};
use super::piece::PieceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modality {
    /// Mouse or pen driving the platform's native drag-and-drop.
    Pointer,
    /// Touch input, with drags emulated from positions and timing.
    Touch,
}

/// The events every input path is reduced to before anything touches the
/// board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    TapPiece {
        piece: PieceId,
        container: Container,
    },
    BeginDrag {
        piece: PieceId,
        container: Container,
        at: Point,
        modality: Modality,
    },
    UpdateDrag {
        at: Point,
    },
    DropAt {
        piece: PieceId,
        origin: Container,
        target: DropTarget,
        modality: Modality,
    },
    CancelDrag {
        modality: Modality,
    },
}

/// What a native drag carries between source and drop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragPayload {
    pub piece: PieceId,
    pub origin: Container,
}

impl fmt::Display for DragPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece:{}:{}", self.piece, self.origin)
    }
}

impl FromStr for DragPayload {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw.strip_prefix("piece:").ok_or(())?;
        let (id, origin) = rest.split_once(':').ok_or(())?;
        Ok(Self {
            piece: id.parse().map_err(|_| ())?,
            origin: origin.parse()?,
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct Press {
    piece: PieceId,
    container: Container,
    modality: Modality,
    gate: PressGate,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    piece: PieceId,
    container: Container,
    modality: Modality,
}

#[derive(Clone, Copy, Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Pressed(Press),
    Dragging(Drag),
}

/// Press/drag state machine shared by pointer and touch input. It never
/// mutates the board; it only turns raw input into `InputEvent`s. At most one
/// drag is in flight at a time.
#[derive(Clone, Debug)]
pub struct InteractionController {
    phase: Phase,
    thresholds: GestureThresholds,
}

impl InteractionController {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            phase: Phase::Idle,
            thresholds,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.phase, Phase::Pressed(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn dragged_piece(&self) -> Option<(PieceId, Container)> {
        match self.phase {
            Phase::Dragging(drag) => Some((drag.piece, drag.container)),
            _ => None,
        }
    }

    fn accepts_press(&self) -> bool {
        match self.phase {
            Phase::Idle => true,
            // A pointer press that never saw its release is stale.
            Phase::Pressed(press) => press.modality == Modality::Pointer,
            Phase::Dragging(_) => false,
        }
    }

    /// Starts tracking a press on a piece. Returns false when another
    /// gesture owns the controller.
    pub fn press(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
        now_ms: u64,
        modality: Modality,
    ) -> bool {
        if !self.accepts_press() {
            return false;
        }
        self.phase = Phase::Pressed(Press {
            piece,
            container,
            modality,
            gate: PressGate::arm(at, now_ms, self.thresholds),
        });
        true
    }

    /// Touch movement: crossing the slop starts a drag, later movement moves
    /// the proxy.
    pub fn motion(&mut self, at: Point) -> Option<InputEvent> {
        match self.phase {
            Phase::Pressed(press)
                if press.modality == Modality::Touch && press.gate.exceeds_slop(at) =>
            {
                Some(self.begin_drag(press.piece, press.container, at, Modality::Touch))
            }
            Phase::Dragging(drag) if drag.modality == Modality::Touch => {
                Some(InputEvent::UpdateDrag { at })
            }
            _ => None,
        }
    }

    /// Called by the host's hold timer; starts a drag if the touch is still
    /// held in place long enough.
    pub fn hold_elapsed(&mut self, now_ms: u64) -> Option<InputEvent> {
        match self.phase {
            Phase::Pressed(press)
                if press.modality == Modality::Touch && press.gate.hold_elapsed(now_ms) =>
            {
                Some(self.begin_drag(
                    press.piece,
                    press.container,
                    press.gate.start(),
                    Modality::Touch,
                ))
            }
            _ => None,
        }
    }

    /// Ends the current press or drag. `target` is the slot under the release
    /// point, if any.
    pub fn release(&mut self, now_ms: u64, target: Option<DropTarget>) -> Option<InputEvent> {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::Pressed(press) => {
                // Touch movement inside the slop never left `Pressed`, so it
                // still counts as a tap.
                let tapped = match press.modality {
                    Modality::Touch => press.gate.is_tap(now_ms),
                    Modality::Pointer => true,
                };
                tapped.then_some(InputEvent::TapPiece {
                    piece: press.piece,
                    container: press.container,
                })
            }
            Phase::Dragging(drag) => Some(Self::resolve_drop(
                drag.piece,
                drag.container,
                target,
                drag.modality,
            )),
        }
    }

    /// The platform started a native drag session for `piece`.
    pub fn native_drag_begin(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
    ) -> Option<InputEvent> {
        match self.phase {
            Phase::Dragging(_) => None,
            Phase::Pressed(press) if press.modality == Modality::Touch => None,
            _ => Some(self.begin_drag(piece, container, at, Modality::Pointer)),
        }
    }

    /// A native drag was released over `target`. Only the pointer drag in
    /// flight resolves; a payload from a drag that was cancelled (by a pause
    /// or a new game) is ignored.
    pub fn native_drop(
        &mut self,
        payload: DragPayload,
        target: Option<DropTarget>,
    ) -> Option<InputEvent> {
        match self.phase {
            Phase::Dragging(drag)
                if drag.modality == Modality::Pointer
                    && drag.piece == payload.piece
                    && drag.container == payload.origin => {}
            _ => return None,
        }
        self.phase = Phase::Idle;
        Some(Self::resolve_drop(
            payload.piece,
            payload.origin,
            target,
            Modality::Pointer,
        ))
    }

    /// The native drag session ended. A session that already dropped is idle
    /// by now and yields nothing.
    pub fn native_drag_end(&mut self) -> Option<InputEvent> {
        match self.phase {
            Phase::Dragging(drag) if drag.modality == Modality::Pointer => {
                self.phase = Phase::Idle;
                Some(InputEvent::CancelDrag {
                    modality: Modality::Pointer,
                })
            }
            _ => None,
        }
    }

    /// Drops whatever is in flight without resolving it.
    pub fn cancel(&mut self) -> Option<InputEvent> {
        match std::mem::take(&mut self.phase) {
            Phase::Dragging(drag) => Some(InputEvent::CancelDrag {
                modality: drag.modality,
            }),
            Phase::Idle | Phase::Pressed(_) => None,
        }
    }

    fn begin_drag(
        &mut self,
        piece: PieceId,
        container: Container,
        at: Point,
        modality: Modality,
    ) -> InputEvent {
        self.phase = Phase::Dragging(Drag {
            piece,
            container,
            modality,
        });
        InputEvent::BeginDrag {
            piece,
            container,
            at,
            modality,
        }
    }

    fn resolve_drop(
        piece: PieceId,
        origin: Container,
        target: Option<DropTarget>,
        modality: Modality,
    ) -> InputEvent {
        match target {
            Some(target) => InputEvent::DropAt {
                piece,
                origin,
                target,
                modality,
            },
            None => InputEvent::CancelDrag { modality },
        }
    }
}
