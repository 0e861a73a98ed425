use cozy_chess::Square;
use thiserror::Error;

/// Why a move request was turned away. Every variant is local and leaves the
/// game untouched; callers log it and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: {from}{to}")]
    IllegalMove { from: Square, to: Square },
    #[error("piece on {square} does not belong to the side to move")]
    OutOfTurn { square: Square },
    #[error("no piece on {square}")]
    EmptySquare { square: Square },
    #[error("opponent move is pending")]
    OpponentPending,
    #[error("it is not the player's turn")]
    NotPlayersTurn,
    #[error("game is over")]
    GameOver,
    #[error("bad square or move text: {0:?}")]
    BadSquare(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("FEN error: {0}")]
    Fen(String),
    #[error("illegal move in move list: {0}")]
    MoveList(String),
}
