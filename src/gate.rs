use cozy_chess::Square;
use log::debug;

use crate::board::{LegalMove, MoveRequest, Position};
use crate::error::MoveError;

/// Result of a move that passed the gate.
#[derive(Clone, Debug)]
pub struct Applied {
    pub position: Position,
    pub mv: LegalMove,
}

/// Validates `req` against the position's own turn and legal move list.
/// The side to move is read from `pos` every time; nothing cached is trusted.
/// On rejection `pos` is untouched since the caller still owns it.
pub fn attempt_move(pos: &Position, req: MoveRequest) -> Result<Applied, MoveError> {
    let stm = pos.side_to_move();
    match pos.piece_at(req.from) {
        None => {
            debug!("rejected {}{}: empty origin", req.from, req.to);
            return Err(MoveError::EmptySquare { square: req.from });
        }
        Some((color, _)) if color != stm => {
            debug!("rejected {}{}: out of turn", req.from, req.to);
            return Err(MoveError::OutOfTurn { square: req.from });
        }
        Some(_) => {}
    }
    match pos.find_move(req.from, req.to, req.promotion) {
        Some(lm) => Ok(Applied { position: pos.apply(&lm), mv: lm }),
        None => {
            debug!("rejected {}{}: not in legal set", req.from, req.to);
            Err(MoveError::IllegalMove { from: req.from, to: req.to })
        }
    }
}

/// Legal destinations of the piece on `from`, or empty when it cannot move.
pub fn destinations(pos: &Position, from: Square) -> Vec<Square> {
    let mut out: Vec<Square> = Vec::new();
    for lm in pos.legal_moves() {
        // Promotions repeat the same destination once per piece.
        if lm.from == from && !out.contains(&lm.to) { out.push(lm.to); }
    }
    out
}
