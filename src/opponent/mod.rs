pub mod eval;

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::{LegalMove, Position};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentPolicy {
    /// Uniform pick over the legal list.
    #[default]
    Random,
    /// One-ply material plus center control.
    Greedy,
}

impl FromStr for OpponentPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(OpponentPolicy::Random),
            "greedy" => Ok(OpponentPolicy::Greedy),
            other => Err(format!("unknown policy: {other}")),
        }
    }
}

impl fmt::Display for OpponentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentPolicy::Random => write!(f, "random"),
            OpponentPolicy::Greedy => write!(f, "greedy"),
        }
    }
}

/// Picks a move for the side to move. `None` means the side has no legal
/// move and the game has ended; it is not an error.
pub fn choose_move(pos: &Position, policy: OpponentPolicy, rng: &mut SmallRng) -> Option<LegalMove> {
    let moves = pos.legal_moves();
    match policy {
        OpponentPolicy::Random => select_random_move(&moves, rng),
        OpponentPolicy::Greedy => select_greedy_move(pos, &moves),
    }
}

fn select_random_move(moves: &[LegalMove], rng: &mut SmallRng) -> Option<LegalMove> {
    if moves.is_empty() { None } else { Some(moves[rng.gen_range(0..moves.len())]) }
}

// Strictly-greater replacement keeps the first of equal scores.
fn select_greedy_move(pos: &Position, moves: &[LegalMove]) -> Option<LegalMove> {
    let side = pos.side_to_move();
    let mut best: Option<(LegalMove, i32)> = None;
    for &lm in moves {
        let child = pos.apply(&lm);
        let score = eval::score_for(child.board(), side);
        match best {
            Some((_, b)) if score <= b => {}
            _ => best = Some((lm, score)),
        }
    }
    best.map(|(lm, _)| lm)
}

/// Greedy scores of every legal move, in generation order.
pub fn score_moves(pos: &Position) -> Vec<(LegalMove, i32)> {
    let side = pos.side_to_move();
    pos.legal_moves().into_iter().map(|lm| {
        let child = pos.apply(&lm);
        (lm, eval::score_for(child.board(), side))
    }).collect()
}
