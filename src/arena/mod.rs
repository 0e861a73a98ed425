use cozy_chess::Color;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

use crate::board::{GameStatus, MoveRequest, Position};
use crate::gate;
use crate::opponent::{choose_move, OpponentPolicy};

#[derive(Clone, Debug)]
pub struct ArenaParams {
    pub games: usize,
    pub max_plies: usize,
    pub white: OpponentPolicy,
    pub black: OpponentPolicy,
    pub seed: u64,
    pub openings_path: Option<PathBuf>, // optional path to FEN list (one per line)
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self { games: 10, max_plies: 200, white: OpponentPolicy::Greedy, black: OpponentPolicy::Random, seed: 42, openings_path: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub start_fen: String,
    pub moves: Vec<String>,
    pub result: i8, // 1 white win, 0 draw, -1 black win
    pub termination: String,
    pub final_fen: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub avg_plies: f32,
}

/// Plays one game, routing every chosen move back through the gate.
pub fn play_game(start: &Position, params: &ArenaParams, seed: u64) -> GameRecord {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut pos = start.clone();
    let mut record = GameRecord { start_fen: start.fen(), moves: Vec::new(), result: 0, termination: String::new(), final_fen: String::new() };
    loop {
        if record.moves.len() >= params.max_plies { record.termination = "max_plies".into(); break; }
        let policy = if pos.side_to_move() == Color::White { params.white } else { params.black };
        let Some(lm) = choose_move(&pos, policy, &mut rng) else {
            match pos.status() {
                GameStatus::Checkmate { winner } => {
                    record.result = if winner == Color::White { 1 } else { -1 };
                    record.termination = "checkmate".into();
                }
                _ => record.termination = "stalemate".into(),
            }
            break;
        };
        match gate::attempt_move(&pos, MoveRequest { from: lm.from, to: lm.to, promotion: lm.promotion }) {
            Ok(applied) => {
                record.moves.push(applied.mv.to_string());
                pos = applied.position;
            }
            Err(e) => {
                warn!("gate rejected opponent move {lm}: {e}");
                record.termination = "rejected".into();
                break;
            }
        }
        if pos.status() == GameStatus::Draw { record.termination = "fifty_moves".into(); break; }
    }
    record.final_fen = pos.fen();
    record
}

/// Games run in parallel; output order and content depend only on the seed.
pub fn generate_games_with<F: Fn(&GameRecord) + Sync>(params: &ArenaParams, on_done: F) -> Vec<GameRecord> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let openings = load_openings(params);
    let jobs: Vec<(Position, u64)> = (0..params.games).map(|gi| {
        let start = if !openings.is_empty() {
            let idx = (rng.gen::<u64>() ^ (gi as u64)) as usize % openings.len();
            openings[idx].clone()
        } else { Position::startpos() };
        (start, rng.gen::<u64>())
    }).collect();
    jobs.par_iter().map(|(start, seed)| {
        let g = play_game(start, params, *seed);
        debug!("game done: {} plies, {}", g.moves.len(), g.termination);
        on_done(&g);
        g
    }).collect()
}

pub fn generate_games(params: &ArenaParams) -> Vec<GameRecord> {
    generate_games_with(params, |_| {})
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut s = Summary { games: games.len(), ..Summary::default() };
    let mut plies = 0usize;
    for g in games {
        plies += g.moves.len();
        match g.result { 1 => s.white_wins += 1, -1 => s.black_wins += 1, _ => s.draws += 1 }
    }
    if !games.is_empty() { s.avg_plies = plies as f32 / games.len() as f32; }
    s
}

fn load_openings(params: &ArenaParams) -> Vec<Position> {
    let mut out = Vec::new();
    let Some(ref p) = params.openings_path else { return out };
    let s = match std::fs::read_to_string(p) {
        Ok(s) => s,
        Err(e) => { warn!("cannot read openings {}: {e}", p.display()); return out; }
    };
    for line in s.lines() {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') { continue; }
        // Support EPD (4 fields) by padding halfmove/fullmove
        let parts: Vec<&str> = raw.split_whitespace().collect();
        let fen = if parts.len() >= 6 {
            parts[0..6].join(" ")
        } else if parts.len() >= 4 {
            let mut v = parts[0..4].to_vec();
            v.push("0"); v.push("1"); v.join(" ")
        } else { raw.to_string() };
        match Position::from_fen(&fen) {
            Ok(pos) => out.push(pos),
            Err(e) => warn!("skipping opening {raw:?}: {e}"),
        }
    }
    out
}
