use cozy_chess::{Board, Color, Piece, Square};

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

pub const CENTER_BONUS: i32 = 10;
pub const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 0,
    }
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.into_iter().count() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    let mut score = 0;
    for piece in [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        score += (count_piece(board, Color::White, piece) - count_piece(board, Color::Black, piece)) * piece_value(piece);
    }
    score
}

pub fn material_for(board: &Board, side: Color) -> i32 {
    let base = material_eval_cp_side_agnostic(board);
    if side == Color::White { base } else { -base }
}

/// +CENTER_BONUS per center square held by `side`, -CENTER_BONUS per square held by the other side.
pub fn center_for(board: &Board, side: Color) -> i32 {
    CENTER.iter().map(|&sq| match board.color_on(sq) {
        Some(c) if c == side => CENTER_BONUS,
        Some(_) => -CENTER_BONUS,
        None => 0,
    }).sum()
}

/// Static score of `board` from `side`'s point of view.
pub fn score_for(board: &Board, side: Color) -> i32 {
    material_for(board, side) + center_for(board, side)
}
