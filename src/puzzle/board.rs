use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Grid,
    Pile,
}

impl Container {
    pub fn as_str(self) -> &'static str {
        match self {
            Container::Grid => "grid",
            Container::Pile => "pile",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Container {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "grid" => Ok(Container::Grid),
            "pile" => Ok(Container::Pile),
            _ => Err(()),
        }
    }
}

/// A rendered slot a drag can be released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DropTarget {
    pub container: Container,
    pub slot: usize,
}

impl DropTarget {
    pub fn grid(slot: usize) -> Self {
        Self {
            container: Container::Grid,
            slot,
        }
    }

    pub fn pile(slot: usize) -> Self {
        Self {
            container: Container::Pile,
            slot,
        }
    }
}

/// The grid and the pile. Between them they hold every piece of the game
/// exactly once; each mutation below either moves pieces or does nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    grid: Vec<Piece>,
    pile: Vec<Piece>,
}

impl Board {
    pub fn new(grid: Vec<Piece>, pile: Vec<Piece>) -> Self {
        Self { grid, pile }
    }

    /// Deals the first `grid_count` pieces to the grid and the rest to the pile.
    pub fn deal(mut pieces: Vec<Piece>, grid_count: usize) -> Self {
        let pile = pieces.split_off(grid_count.min(pieces.len()));
        Self { grid: pieces, pile }
    }

    pub fn grid(&self) -> &[Piece] {
        &self.grid
    }

    pub fn pile(&self) -> &[Piece] {
        &self.pile
    }

    pub fn pieces(&self, container: Container) -> &[Piece] {
        match container {
            Container::Grid => &self.grid,
            Container::Pile => &self.pile,
        }
    }

    pub fn total(&self) -> usize {
        self.grid.len() + self.pile.len()
    }

    pub fn position(&self, container: Container, id: PieceId) -> Option<usize> {
        self.pieces(container).iter().position(|piece| piece.id() == id)
    }

    pub fn find(&self, container: Container, id: PieceId) -> Option<&Piece> {
        self.pieces(container).iter().find(|piece| piece.id() == id)
    }

    /// Removes `id` from the pile and inserts it into the grid at
    /// `target_slot`, shifting later grid pieces right. Slots past the end
    /// append.
    pub fn move_from_pile_to_grid(&mut self, id: PieceId, target_slot: usize) -> bool {
        let Some(from) = self.position(Container::Pile, id) else {
            return false;
        };
        let piece = self.remove_at(Container::Pile, from);
        self.insert_at(Container::Grid, target_slot, piece);
        true
    }

    /// Exchanges the grid piece `id` with whatever occupies `target_slot`.
    pub fn swap_within_grid(&mut self, id: PieceId, target_slot: usize) -> bool {
        let Some(from) = self.position(Container::Grid, id) else {
            return false;
        };
        if target_slot >= self.grid.len() {
            return false;
        }
        self.grid.swap(from, target_slot);
        true
    }

    /// Moves the pile's head to the end of the grid.
    pub fn draw_from_pile(&mut self) -> Option<PieceId> {
        if self.pile.is_empty() {
            return None;
        }
        let piece = self.remove_at(Container::Pile, 0);
        let id = piece.id();
        let end = self.grid.len();
        self.insert_at(Container::Grid, end, piece);
        Some(id)
    }

    pub fn toggle_face(&mut self, id: PieceId, container: Container) -> bool {
        let pieces = self.pieces_mut(container);
        match pieces.iter_mut().find(|piece| piece.id() == id) {
            Some(piece) => {
                piece.toggle();
                true
            }
            None => false,
        }
    }

    /// Empties the pile onto the end of the grid.
    pub fn gather_pile(&mut self) {
        let pile = std::mem::take(&mut self.pile);
        self.grid.extend(pile);
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Vec<Piece> {
        &mut self.grid
    }

    fn pieces_mut(&mut self, container: Container) -> &mut Vec<Piece> {
        match container {
            Container::Grid => &mut self.grid,
            Container::Pile => &mut self.pile,
        }
    }

    fn insert_at(&mut self, container: Container, slot: usize, piece: Piece) {
        let pieces = self.pieces_mut(container);
        let slot = slot.min(pieces.len());
        pieces.insert(slot, piece);
    }

    fn remove_at(&mut self, container: Container, slot: usize) -> Piece {
        self.pieces_mut(container).remove(slot)
    }
}
