use cozy_chess::{Color, Piece, Square};
use serde::Serialize;

use crate::board::Position;
use crate::board::cozy::{piece_letter, row_of, square_at};
use crate::config::Side;
use crate::session::Selection;
use crate::view::PieceKind;

/// Board squares sit at y = -1 + 0.26; pieces are lifted 0.5 and dropped 0.7.
pub const PIECE_Y: f32 = 0.5 - 0.7;
pub const SQUARE_Y: f32 = -1.0 + 0.26;
pub const SELECTED_SCALE: f32 = 1.2;

pub const WHITE_PIECE: &str = "#e6e6e6";
pub const BLACK_PIECE: &str = "#333333";
pub const LIGHT_SQUARE: &str = "#ffffff";
pub const DARK_SQUARE: &str = "#4d4d4d";
pub const BOARD_BASE: &str = "#8B4513";

/// Centered world coordinate of a square: x is the file offset, z the row
/// offset with row 0 on rank 8.
pub fn square_to_world(sq: Square) -> [f32; 3] {
    [sq.file() as usize as f32 - 3.5, PIECE_Y, row_of(sq) as f32 - 3.5]
}

/// Inverse of `square_to_world`; height is ignored. `None` off the board.
pub fn world_to_square(p: [f32; 3]) -> Option<Square> {
    let col = (p[0] + 3.5).round();
    let row = (p[2] + 3.5).round();
    if !(0.0..=7.0).contains(&col) || !(0.0..=7.0).contains(&row) { return None; }
    square_at(row as usize, col as usize)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Primitive {
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Cone { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

impl Primitive {
    pub fn for_piece(piece: Piece) -> Self {
        match piece {
            Piece::Pawn => Primitive::Cylinder { radius_top: 0.2, radius_bottom: 0.2, height: 0.6 },
            Piece::Rook => Primitive::Box { width: 0.3, height: 0.8, depth: 0.3 },
            Piece::Knight => Primitive::Cone { radius: 0.2, height: 0.8 },
            Piece::Bishop => Primitive::Cylinder { radius_top: 0.15, radius_bottom: 0.3, height: 1.0 },
            Piece::Queen => Primitive::Sphere { radius: 0.3 },
            Piece::King => Primitive::Box { width: 0.3, height: 1.2, depth: 0.3 },
        }
    }
}

pub fn piece_color(color: Color) -> &'static str {
    if color == Color::White { WHITE_PIECE } else { BLACK_PIECE }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderEntity {
    pub square: String,
    /// Side letter plus uppercase piece letter, e.g. "wP".
    pub key: String,
    pub side: Side,
    pub kind: PieceKind,
    pub color: &'static str,
    pub primitive: Primitive,
    pub position: [f32; 3],
    pub scale: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardTile {
    pub square: String,
    pub color: &'static str,
    pub position: [f32; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub tiles: Vec<BoardTile>,
    pub pieces: Vec<RenderEntity>,
}

impl Scene {
    pub fn from_position(pos: &Position, selection: &Selection) -> Self {
        let mut tiles = Vec::with_capacity(64);
        let mut pieces = Vec::with_capacity(32);
        for row in 0..8 {
            for col in 0..8 {
                let Some(sq) = square_at(row, col) else { continue };
                let [x, _, z] = square_to_world(sq);
                tiles.push(BoardTile {
                    square: sq.to_string(),
                    color: if (row + col) % 2 == 0 { LIGHT_SQUARE } else { DARK_SQUARE },
                    position: [x, SQUARE_Y, z],
                });
                let Some((color, piece)) = pos.piece_at(sq) else { continue };
                let side_letter = if color == Color::White { 'w' } else { 'b' };
                pieces.push(RenderEntity {
                    square: sq.to_string(),
                    key: format!("{}{}", side_letter, piece_letter(Color::White, piece)),
                    side: color.into(),
                    kind: piece.into(),
                    color: piece_color(color),
                    primitive: Primitive::for_piece(piece),
                    position: square_to_world(sq),
                    scale: if selection.origin() == Some(sq) { SELECTED_SCALE } else { 1.0 },
                });
            }
        }
        Self { tiles, pieces }
    }

    /// Maps a pick on a rendered entity back to its square.
    pub fn pick(&self, world: [f32; 3]) -> Option<Square> { world_to_square(world) }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}
