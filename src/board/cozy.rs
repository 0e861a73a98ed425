use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Rank, Square};
use std::fmt;

use crate::error::{MoveError, PositionError};

/// A legal move as the oracle knows it plus the squares a user would click.
/// Castling is shown as the king's two-square hop (e1g1) even though cozy-chess
/// encodes it as king-takes-rook (e1h1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalMove {
    pub mv: Move,
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl fmt::Display for LegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion { write!(f, "{}", piece_char(p))?; }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    /// Fifty-move rule.
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool { self != GameStatus::Ongoing }
}

#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        CozyBoard::from_fen(fen.trim(), false).map(|b| Self { board: b }).map_err(|e| PositionError::Fen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        match (self.board.color_on(sq), self.board.piece_on(sq)) {
            (Some(c), Some(p)) => Some((c, p)),
            _ => None,
        }
    }

    /// Verbose legal move list for the side to move, in generation order.
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        let mut out = Vec::new();
        self.board.generate_moves(|moves| {
            let piece = moves.piece;
            for m in moves { out.push(self.describe(m, piece)); }
            false
        });
        out
    }

    /// Only the side to move has legal moves; asking for the other side yields none.
    pub fn legal_moves_for(&self, side: Color) -> Vec<LegalMove> {
        if side != self.side_to_move() { return Vec::new(); }
        self.legal_moves()
    }

    fn describe(&self, mv: Move, piece: Piece) -> LegalMove {
        let mut to = mv.to;
        if piece == Piece::King && self.board.color_on(mv.to) == Some(self.side_to_move()) {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
            to = Square::new(file, mv.from.rank());
        }
        LegalMove { mv, piece, from: mv.from, to, promotion: mv.promotion }
    }

    /// Finds the legal move matching user-facing squares. A promoting pawn
    /// takes `promotion` when given and a queen otherwise; a promotion piece
    /// on a move that does not promote matches nothing.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Option<LegalMove> {
        let wanted = promotion.unwrap_or(Piece::Queen);
        let mut fallback = None;
        for lm in self.legal_moves() {
            if lm.from != from || lm.to != to { continue; }
            match lm.promotion {
                None => return if promotion.is_none() { Some(lm) } else { None },
                Some(p) if p == wanted => return Some(lm),
                Some(_) => { if fallback.is_none() && promotion.is_none() { fallback = Some(lm); } }
            }
        }
        fallback
    }

    /// Returns the successor position; `lm` must come from this position's legal list.
    pub fn apply(&self, lm: &LegalMove) -> Position {
        let mut child = self.board.clone();
        child.play(lm.mv);
        Position { board: child }
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), MoveError> {
        let req = parse_move(mv_uci)?;
        match self.find_move(req.from, req.to, req.promotion) {
            Some(lm) => { self.board.play(lm.mv); Ok(()) }
            None => Err(MoveError::IllegalMove { from: req.from, to: req.to }),
        }
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, PositionError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m).map_err(|_| PositionError::MoveList(m.clone()))?; }
        Ok(pos)
    }

    pub fn status(&self) -> GameStatus {
        let mut has_legal = false;
        self.board.generate_moves(|_| { has_legal = true; true });
        if !has_legal {
            if (self.board.checkers()).is_empty() { return GameStatus::Stalemate; }
            return GameStatus::Checkmate { winner: !self.side_to_move() };
        }
        if self.board.halfmove_clock() >= 100 { return GameStatus::Draw; }
        GameStatus::Ongoing
    }
}

/// A (from, to, promotion) triple built from one user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self { Self { from, to, promotion: None } }
}

pub fn parse_square(s: &str) -> Result<Square, MoveError> {
    s.trim().parse::<Square>().map_err(|_| MoveError::BadSquare(s.to_string()))
}

/// Accepts "e2e4", "e7e8q" and "e2 e4".
pub fn parse_move(s: &str) -> Result<MoveRequest, MoveError> {
    let compact: String = s.split_whitespace().collect();
    if compact.len() != 4 && compact.len() != 5 { return Err(MoveError::BadSquare(s.to_string())); }
    let from = parse_square(compact.get(0..2).ok_or_else(|| MoveError::BadSquare(s.to_string()))?)?;
    let to = parse_square(compact.get(2..4).ok_or_else(|| MoveError::BadSquare(s.to_string()))?)?;
    let promotion = match compact.chars().nth(4) {
        None => None,
        Some(c) => Some(piece_from_char(c).filter(|p| !matches!(p, Piece::Pawn | Piece::King)).ok_or_else(|| MoveError::BadSquare(s.to_string()))?),
    };
    Ok(MoveRequest { from, to, promotion })
}

pub fn piece_char(p: Piece) -> char {
    match p {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

pub fn piece_from_char(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'p' => Some(Piece::Pawn),
        'n' => Some(Piece::Knight),
        'b' => Some(Piece::Bishop),
        'r' => Some(Piece::Rook),
        'q' => Some(Piece::Queen),
        'k' => Some(Piece::King),
        _ => None,
    }
}

/// FEN-style letter: uppercase for white.
pub fn piece_letter(color: Color, p: Piece) -> char {
    let c = piece_char(p);
    if color == Color::White { c.to_ascii_uppercase() } else { c }
}

pub fn color_char(c: Color) -> char { if c == Color::White { 'w' } else { 'b' } }

pub fn parse_color(s: &str) -> Option<Color> {
    match s.trim().to_lowercase().as_str() {
        "w" | "white" => Some(Color::White),
        "b" | "black" => Some(Color::Black),
        _ => None,
    }
}

/// Row index as drawn on screen: row 0 is rank 8.
pub fn row_of(sq: Square) -> usize { 7 - sq.rank() as usize }

pub fn square_at(row: usize, col: usize) -> Option<Square> {
    if row > 7 || col > 7 { return None; }
    Some(Square::new(File::index(col), Rank::index(7 - row)))
}
