use cozy_chess::{Color, Piece, Square};
use serde::Serialize;

use crate::board::Position;
use crate::board::cozy::{piece_letter, square_at};
use crate::config::Side;
use crate::session::Selection;
use crate::view::PieceKind;

/// One occupied square for a flat 2D renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub square: String,
    pub side: Side,
    pub kind: PieceKind,
    pub letter: char,
}

/// 8x8 board in screen order: row 0 is rank 8, column 0 is file a.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<(Color, Piece)>; 8]; 8],
}

impl Grid {
    pub fn from_position(pos: &Position) -> Self {
        let mut cells = [[None; 8]; 8];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                *cell = square_at(row, col).and_then(|sq| pos.piece_at(sq));
            }
        }
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<(Color, Piece)> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn placements(&self) -> Vec<Placement> {
        let mut out = Vec::new();
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let (Some((color, piece)), Some(sq)) = (*cell, square_at(row, col)) else { continue };
                out.push(Placement { square: sq.to_string(), side: color.into(), kind: piece.into(), letter: piece_letter(color, piece) });
            }
        }
        out
    }

    /// ASCII board with the current selection marked: `(P)` origin, `*` quiet
    /// destination, `*p*` capture destination.
    pub fn render_text(&self, selection: &Selection) -> String {
        let mut s = String::new();
        for (row, line) in self.cells.iter().enumerate() {
            s.push_str(&format!("{} ", 8 - row));
            for (col, cell) in line.iter().enumerate() {
                let Some(sq) = square_at(row, col) else { continue };
                let ch = cell.map(|(c, p)| piece_letter(c, p)).unwrap_or('.');
                let marked = selection.dests().contains(&sq);
                let text = if selection.origin() == Some(sq) {
                    format!("({ch})")
                } else if marked && cell.is_some() {
                    format!("*{ch}*")
                } else if marked {
                    " * ".to_string()
                } else {
                    format!(" {ch} ")
                };
                s.push_str(&text);
            }
            s.push('\n');
        }
        s.push_str("   a  b  c  d  e  f  g  h\n");
        s
    }
}

/// Legal destinations grouped by origin, origins in generation order.
/// Recompute after every position change.
pub fn dests(pos: &Position) -> Vec<(Square, Vec<Square>)> {
    let mut out: Vec<(Square, Vec<Square>)> = Vec::new();
    for lm in pos.legal_moves() {
        match out.iter_mut().find(|(from, _)| *from == lm.from) {
            Some((_, tos)) => { if !tos.contains(&lm.to) { tos.push(lm.to); } }
            None => out.push((lm.from, vec![lm.to])),
        }
    }
    out
}
