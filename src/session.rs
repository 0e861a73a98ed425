use cozy_chess::{Color, Square};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;

use crate::board::{GameStatus, LegalMove, MoveRequest, Position};
use crate::config::SessionConfig;
use crate::error::{MoveError, PositionError};
use crate::gate;
use crate::opponent::{self, OpponentPolicy};
use crate::view::ViewMode;

/// Transient UI record of a chosen origin and where it can go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected { origin: Square, dests: Vec<Square> },
}

impl Selection {
    pub fn origin(&self) -> Option<Square> {
        match self { Selection::Idle => None, Selection::Selected { origin, .. } => Some(*origin) }
    }

    pub fn dests(&self) -> &[Square] {
        match self { Selection::Idle => &[], Selection::Selected { dests, .. } => dests.as_slice() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected { origin: Square, dests: Vec<Square> },
    Deselected,
    Moved(LegalMove),
    Rejected(MoveError),
    /// Click on an empty or foreign square with nothing selected.
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpponentOutcome {
    Moved(LegalMove),
    /// The opponent had nothing to play; carries the terminal status.
    NoLegalMoves(GameStatus),
    /// The game was already decided when the reply came due; nothing is played.
    GameOver(GameStatus),
    /// Session was torn down or reset before the delay ran out.
    Cancelled,
    NotOpponentsTurn,
}

/// One game: the position, the selection and the opponent lock, owned in one place.
pub struct Session {
    position: Position,
    selection: Selection,
    player: Color,
    policy: OpponentPolicy,
    rng: SmallRng,
    view: ViewMode,
    delay: Duration,
    pending: bool,
    generation: u64,
    ended: Option<GameStatus>,
    moves: Vec<String>,
}

impl Session {
    pub fn new(cfg: &SessionConfig) -> Result<Self, PositionError> {
        let position = match cfg.start_fen.as_deref() {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::startpos(),
        };
        Ok(Self {
            position,
            selection: Selection::Idle,
            player: cfg.player.into(),
            policy: cfg.policy,
            rng: SmallRng::seed_from_u64(cfg.seed),
            view: cfg.view,
            delay: Duration::from_millis(cfg.delay_ms),
            pending: false,
            generation: 0,
            ended: None,
            moves: Vec::new(),
        })
    }

    pub fn position(&self) -> &Position { &self.position }
    pub fn fen(&self) -> String { self.position.fen() }
    pub fn side_to_move(&self) -> Color { self.position.side_to_move() }
    pub fn player(&self) -> Color { self.player }
    pub fn policy(&self) -> OpponentPolicy { self.policy }
    pub fn selection(&self) -> &Selection { &self.selection }
    pub fn view(&self) -> ViewMode { self.view }
    pub fn set_view(&mut self, view: ViewMode) { self.view = view; }
    pub fn delay(&self) -> Duration { self.delay }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn moves(&self) -> &[String] { &self.moves }

    /// True while an opponent reply is scheduled; shown as "thinking".
    pub fn is_pending(&self) -> bool { self.pending }

    pub fn status(&self) -> GameStatus {
        self.ended.unwrap_or_else(|| self.position.status())
    }

    pub fn is_over(&self) -> bool { self.status().is_over() }

    /// Opponent should move now and nobody has scheduled it yet.
    pub fn needs_opponent(&self) -> bool {
        !self.pending && !self.is_over() && self.side_to_move() != self.player
    }

    /// Marks the opponent as scheduled; player input is closed until it lands.
    pub fn mark_pending(&mut self) { self.pending = true; }

    pub fn clear_pending(&mut self) { self.pending = false; }

    pub fn reset(&mut self, fen: Option<&str>) -> Result<(), PositionError> {
        let position = match fen { Some(f) => Position::from_fen(f)?, None => Position::startpos() };
        self.position = position;
        self.selection = Selection::Idle;
        self.pending = false;
        self.ended = None;
        self.moves.clear();
        self.generation += 1;
        info!("new game (generation {}): {}", self.generation, self.position.fen());
        Ok(())
    }

    fn check_open(&self) -> Result<(), MoveError> {
        if self.is_over() { return Err(MoveError::GameOver); }
        if self.pending { return Err(MoveError::OpponentPending); }
        if self.side_to_move() != self.player { return Err(MoveError::NotPlayersTurn); }
        Ok(())
    }

    /// Player move through the gate. On success the opponent is marked
    /// pending and the caller schedules it.
    pub fn player_move(&mut self, req: MoveRequest) -> Result<LegalMove, MoveError> {
        if let Err(e) = self.check_open() {
            debug!("player move {}{} refused: {e}", req.from, req.to);
            return Err(e);
        }
        match gate::attempt_move(&self.position, req) {
            Ok(applied) => {
                info!("player plays {}", applied.mv);
                self.position = applied.position;
                self.moves.push(applied.mv.to_string());
                self.selection = Selection::Idle;
                self.pending = true;
                let status = self.position.status();
                if status.is_over() {
                    info!("game over after player move: {status:?}");
                    self.ended = Some(status);
                }
                Ok(applied.mv)
            }
            Err(e) => {
                self.selection = Selection::Idle;
                Err(e)
            }
        }
    }

    /// Click-to-move: Idle -> Selected -> Idle.
    pub fn click(&mut self, sq: Square) -> ClickOutcome {
        if let Err(e) = self.check_open() { return ClickOutcome::Rejected(e); }
        let own = matches!(self.position.piece_at(sq), Some((c, _)) if c == self.player);
        match self.selection.origin() {
            Some(origin) if origin == sq => {
                self.selection = Selection::Idle;
                ClickOutcome::Deselected
            }
            Some(_) if own => self.select(sq),
            Some(origin) => match self.player_move(MoveRequest::new(origin, sq)) {
                Ok(lm) => ClickOutcome::Moved(lm),
                Err(e) => ClickOutcome::Rejected(e),
            },
            None if own => self.select(sq),
            None => ClickOutcome::Ignored,
        }
    }

    fn select(&mut self, origin: Square) -> ClickOutcome {
        let dests = gate::destinations(&self.position, origin);
        self.selection = Selection::Selected { origin, dests: dests.clone() };
        ClickOutcome::Selected { origin, dests }
    }

    /// Plays the opponent's reply on the position as it is now and reopens player input.
    pub fn opponent_move(&mut self) -> OpponentOutcome {
        let status = self.status();
        if status.is_over() {
            debug!("opponent stands down, game already over: {status:?}");
            self.ended = Some(status);
            self.pending = false;
            let stuck = self.side_to_move() != self.player && self.position.legal_moves().is_empty();
            return if stuck { OpponentOutcome::NoLegalMoves(status) } else { OpponentOutcome::GameOver(status) };
        }
        if self.side_to_move() == self.player {
            self.pending = false;
            return OpponentOutcome::NotOpponentsTurn;
        }
        let outcome = match opponent::choose_move(&self.position, self.policy, &mut self.rng) {
            Some(lm) => {
                info!("opponent ({}) plays {}", self.policy, lm);
                self.position = self.position.apply(&lm);
                self.moves.push(lm.to_string());
                OpponentOutcome::Moved(lm)
            }
            None => {
                let status = self.position.status();
                info!("opponent has no legal moves: {status:?}");
                self.ended = Some(status);
                OpponentOutcome::NoLegalMoves(status)
            }
        };
        self.pending = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session { Session::new(&SessionConfig::default()).unwrap() }

    #[test]
    fn click_select_then_move() {
        let mut s = session();
        match s.click(Square::E2) {
            ClickOutcome::Selected { origin, dests } => {
                assert_eq!(origin, Square::E2);
                assert_eq!(dests, vec![Square::E3, Square::E4]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(s.click(Square::E4), ClickOutcome::Moved(_)));
        assert_eq!(s.selection(), &Selection::Idle);
        assert!(s.is_pending());
    }

    #[test]
    fn reclick_deselects_and_illegal_clears() {
        let mut s = session();
        s.click(Square::E2);
        assert_eq!(s.click(Square::E2), ClickOutcome::Deselected);
        s.click(Square::E2);
        assert!(matches!(s.click(Square::E5), ClickOutcome::Rejected(MoveError::IllegalMove { .. })));
        assert_eq!(s.selection(), &Selection::Idle);
        assert!(!s.is_pending());
    }

    #[test]
    fn clicking_other_own_piece_switches_selection() {
        let mut s = session();
        s.click(Square::E2);
        assert!(matches!(s.click(Square::G1), ClickOutcome::Selected { origin: Square::G1, .. }));
        assert_eq!(s.selection().origin(), Some(Square::G1));
    }

    #[test]
    fn fifty_move_draw_stops_the_reply() {
        let cfg = SessionConfig { start_fen: Some("k7/p7/8/8/8/8/1R6/K7 w - - 99 100".into()), ..SessionConfig::default() };
        let mut s = Session::new(&cfg).unwrap();
        s.player_move(MoveRequest::new(Square::B2, Square::B1)).unwrap();
        assert_eq!(s.status(), GameStatus::Draw);
        let fen = s.fen();
        assert_eq!(s.opponent_move(), OpponentOutcome::GameOver(GameStatus::Draw));
        assert_eq!(s.fen(), fen);
        assert!(!s.is_pending());
        assert_eq!(s.status(), GameStatus::Draw);
        assert_eq!(s.player_move(MoveRequest::new(Square::B1, Square::C1)), Err(MoveError::GameOver));
    }

    #[test]
    fn empty_click_is_ignored() {
        let mut s = session();
        assert_eq!(s.click(Square::E4), ClickOutcome::Ignored);
        assert_eq!(s.click(Square::E7), ClickOutcome::Ignored);
    }
}
