use rand::Rng;

use super::board::Board;
use super::piece::Piece;

/// Returns a uniformly shuffled copy of `pieces`: every piece draws an
/// independent random key and the copy is ordered by key.
pub fn shuffle<R: Rng + ?Sized>(pieces: &[Piece], rng: &mut R) -> Vec<Piece> {
    let mut keyed: Vec<(f64, Piece)> = pieces
        .iter()
        .map(|piece| (rng.random::<f64>(), piece.clone()))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, piece)| piece).collect()
}

pub fn sort_canonical(pieces: &mut [Piece]) {
    pieces.sort_by_key(Piece::original_index);
}

fn set_all_flipped(pieces: &mut [Piece], flipped: bool) {
    for piece in pieces {
        piece.set_flipped(flipped);
    }
}

/// Moves the whole pile into the grid and lays the grid out in solved order,
/// front side up.
pub fn solve(board: &mut Board) {
    board.gather_pile();
    let grid = board.grid_mut();
    sort_canonical(grid);
    set_all_flipped(grid, false);
}

/// Reverses every `cols`-wide row of `grid`, keeping rows in order. A short
/// trailing row is reversed on its own.
pub fn mirror_rows(grid: &[Piece], cols: usize) -> Vec<Piece> {
    if cols == 0 {
        return grid.to_vec();
    }
    grid.chunks(cols)
        .flat_map(|row| row.iter().rev().cloned())
        .collect()
}

/// Turning on mirrors the current grid rows and shows every back; turning
/// off restores solved order with fronts showing. The pile is untouched.
pub fn flip_all(board: &mut Board, on: bool, cols: usize) {
    let grid = board.grid_mut();
    if on {
        let mut mirrored = mirror_rows(grid, cols);
        set_all_flipped(&mut mirrored, true);
        *grid = mirrored;
    } else {
        sort_canonical(grid);
        set_all_flipped(grid, false);
    }
}
