use serde::Serialize;

use super::config::{INDEX_PLACEHOLDER, PuzzleConfig};

pub type PieceId = u32;

/// One tile. Identity, faces and solved position are fixed at creation;
/// only the shown face changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Piece {
    id: PieceId,
    front_ref: String,
    back_ref: String,
    flipped: bool,
    original_index: usize,
}

impl Piece {
    pub fn new(id: PieceId, front_ref: String, back_ref: String, original_index: usize) -> Self {
        Self {
            id,
            front_ref,
            back_ref,
            flipped: false,
            original_index,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn front_ref(&self) -> &str {
        &self.front_ref
    }

    pub fn back_ref(&self) -> &str {
        &self.back_ref
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// The face reference currently showing.
    pub fn visible_ref(&self) -> &str {
        if self.flipped {
            &self.back_ref
        } else {
            &self.front_ref
        }
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn toggle(&mut self) {
        self.flipped = !self.flipped;
    }
}

fn face_ref(pattern: &str, number: usize) -> String {
    pattern.replace(INDEX_PLACEHOLDER, &number.to_string())
}

/// Builds the canonical, solved piece set: ids `1..=N`, original indices
/// `0..N` in row-major order, all showing their front.
pub fn create_pieces(config: &PuzzleConfig) -> Vec<Piece> {
    (0..config.total_pieces())
        .map(|index| {
            let number = index + 1;
            Piece::new(
                number as PieceId,
                face_ref(&config.front_pattern, number),
                face_ref(&config.back_pattern, number),
                index,
            )
        })
        .collect()
}
