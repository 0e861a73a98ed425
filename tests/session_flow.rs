use cozy_chess::{Color, Square};
use dualboard::board::{GameStatus, MoveRequest};
use dualboard::config::{SessionConfig, Side};
use dualboard::error::MoveError;
use dualboard::opponent::OpponentPolicy;
use dualboard::scheduler::{CancelToken, SessionHandle};
use dualboard::session::{ClickOutcome, OpponentOutcome, Session};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn cfg(delay_ms: u64) -> SessionConfig {
    SessionConfig { delay_ms, ..SessionConfig::default() }
}

#[test]
fn e2e4_then_opponent_replies() {
    let mut h = SessionHandle::from_config(&cfg(10)).unwrap();
    let lm = h.player_move(MoveRequest::new(Square::E2, Square::E4)).unwrap();
    assert_eq!(lm.to_string(), "e2e4");
    match h.wait_opponent() {
        Some(OpponentOutcome::Moved(reply)) => {
            assert_eq!(h.with(|s| s.position().piece_at(reply.to).map(|(c, _)| c)), Some(Color::Black));
        }
        other => panic!("expected an opponent move, got {other:?}"),
    }
    h.with(|s| {
        assert_eq!(s.side_to_move(), Color::White);
        assert!(!s.is_pending());
        assert_eq!(s.moves().len(), 2);
    });
}

#[test]
fn player_input_is_closed_while_opponent_pending() {
    let mut h = SessionHandle::from_config(&cfg(200)).unwrap();
    h.player_move(MoveRequest::new(Square::E2, Square::E4)).unwrap();
    assert!(h.with(|s| s.is_pending()));
    let fen = h.with(|s| s.fen());
    assert_eq!(h.player_move(MoveRequest::new(Square::D2, Square::D4)), Err(MoveError::OpponentPending));
    assert_eq!(h.click(Square::D2), ClickOutcome::Rejected(MoveError::OpponentPending));
    assert_eq!(h.with(|s| s.fen()), fen);
    assert!(matches!(h.wait_opponent(), Some(OpponentOutcome::Moved(_))));
    assert!(h.player_move(MoveRequest::new(Square::D2, Square::D3)).is_ok());
    h.wait_opponent();
}

#[test]
fn rejected_moves_leave_session_untouched() {
    let mut h = SessionHandle::from_config(&cfg(0)).unwrap();
    let fen = h.with(|s| s.fen());
    assert!(matches!(h.on_interact(Square::E2, Square::E5), Err(MoveError::IllegalMove { .. })));
    assert!(matches!(h.on_interact(Square::E7, Square::E5), Err(MoveError::OutOfTurn { .. })));
    assert_eq!(h.with(|s| s.fen()), fen);
    assert!(!h.with(|s| s.is_pending()));
    assert_eq!(h.wait_opponent(), None);
}

#[test]
fn dropping_the_handle_cancels_pending_reply() {
    let mut h = SessionHandle::from_config(&cfg(5_000)).unwrap();
    h.player_move(MoveRequest::new(Square::E2, Square::E4)).unwrap();
    let shared = Arc::clone(h.shared());
    let fen = h.with(|s| s.fen());
    drop(h);
    let s = shared.lock().unwrap();
    assert_eq!(s.fen(), fen);
    assert_eq!(s.side_to_move(), Color::Black);
}

#[test]
fn new_game_discards_stale_reply() {
    let mut h = SessionHandle::from_config(&cfg(5_000)).unwrap();
    h.player_move(MoveRequest::new(Square::E2, Square::E4)).unwrap();
    h.new_game(None).unwrap();
    h.with(|s| {
        assert!(!s.is_pending());
        assert_eq!(s.side_to_move(), Color::White);
        assert_eq!(s.generation(), 1);
        assert!(s.moves().is_empty());
    });
}

#[test]
fn opponent_opens_when_player_is_black() {
    let mut h = SessionHandle::from_config(&SessionConfig { player: Side::Black, delay_ms: 0, ..SessionConfig::default() }).unwrap();
    assert_eq!(h.player_move(MoveRequest::new(Square::E7, Square::E5)), Err(MoveError::NotPlayersTurn));
    assert!(h.kick_opponent());
    assert!(matches!(h.wait_opponent(), Some(OpponentOutcome::Moved(_))));
    assert_eq!(h.with(|s| s.side_to_move()), Color::Black);
    assert!(!h.kick_opponent());
}

#[test]
fn mating_move_signals_game_end() {
    // Scholar's mate: white to play Qxf7#.
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    let c = SessionConfig { delay_ms: 0, start_fen: Some(fen.into()), ..SessionConfig::default() };
    let mut h = SessionHandle::from_config(&c).unwrap();
    h.player_move(MoveRequest::new(Square::H5, Square::F7)).unwrap();
    assert_eq!(h.wait_opponent(), Some(OpponentOutcome::NoLegalMoves(GameStatus::Checkmate { winner: Color::White })));
    h.with(|s| {
        assert!(s.is_over());
        assert!(!s.is_pending());
    });
    assert_eq!(h.player_move(MoveRequest::new(Square::A2, Square::A3)), Err(MoveError::GameOver));
}

#[test]
fn drawing_move_leaves_board_frozen() {
    let fen = "k7/p7/8/8/8/8/1R6/K7 w - - 99 100";
    let c = SessionConfig { delay_ms: 0, start_fen: Some(fen.into()), ..SessionConfig::default() };
    let mut h = SessionHandle::from_config(&c).unwrap();
    h.player_move(MoveRequest::new(Square::B2, Square::B1)).unwrap();
    let after = h.with(|s| s.fen());
    assert_eq!(h.wait_opponent(), Some(OpponentOutcome::GameOver(GameStatus::Draw)));
    h.with(|s| {
        assert_eq!(s.fen(), after);
        assert_eq!(s.status(), GameStatus::Draw);
        assert_eq!(s.moves(), &["b2b1".to_string()]);
        assert!(!s.is_pending());
    });
    assert!(!h.kick_opponent());
    assert_eq!(h.player_move(MoveRequest::new(Square::B1, Square::C1)), Err(MoveError::GameOver));
}

#[test]
fn opponent_plays_on_latest_position() {
    // Synchronous path: the reply is chosen from whatever the session holds when it runs.
    let mut s = Session::new(&SessionConfig { policy: OpponentPolicy::Greedy, ..SessionConfig::default() }).unwrap();
    s.player_move(MoveRequest::new(Square::E2, Square::E4)).unwrap();
    let before = s.position().clone();
    match s.opponent_move() {
        OpponentOutcome::Moved(lm) => assert!(before.legal_moves().contains(&lm)),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(s.opponent_move(), OpponentOutcome::NotOpponentsTurn);
}

#[test]
fn cancel_token_interrupts_wait() {
    let t = CancelToken::new();
    let t2 = t.clone();
    let j = std::thread::spawn(move || t2.wait(Duration::from_secs(30)));
    std::thread::sleep(Duration::from_millis(20));
    t.cancel();
    assert!(j.join().unwrap());
    assert!(!CancelToken::new().wait(Duration::from_millis(1)));
}
