use cozy_chess::{Color, Piece, Square};
use dualboard::board::{MoveRequest, Position};
use dualboard::error::MoveError;
use dualboard::gate::attempt_move;

#[test]
fn startpos_e2e4_is_accepted() {
    let pos = Position::startpos();
    let applied = attempt_move(&pos, MoveRequest::new(Square::E2, Square::E4)).expect("e2e4 is legal");
    assert!(applied.position.fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq"), "got {}", applied.position.fen());
    assert_eq!(applied.position.side_to_move(), Color::Black);
    assert_eq!(applied.mv.to_string(), "e2e4");
}

#[test]
fn e2e5_is_rejected_without_mutation() {
    let pos = Position::startpos();
    let before = pos.fen();
    let err = attempt_move(&pos, MoveRequest::new(Square::E2, Square::E5)).unwrap_err();
    assert_eq!(err, MoveError::IllegalMove { from: Square::E2, to: Square::E5 });
    assert_eq!(pos.fen(), before);
    assert_eq!(pos.side_to_move(), Color::White);
}

#[test]
fn black_piece_on_whites_turn_is_out_of_turn() {
    let pos = Position::startpos();
    // e7e5 would be legal for black, but it is white's move.
    let err = attempt_move(&pos, MoveRequest::new(Square::E7, Square::E5)).unwrap_err();
    assert_eq!(err, MoveError::OutOfTurn { square: Square::E7 });
}

#[test]
fn empty_origin_is_rejected() {
    let pos = Position::startpos();
    let err = attempt_move(&pos, MoveRequest::new(Square::E4, Square::E5)).unwrap_err();
    assert_eq!(err, MoveError::EmptySquare { square: Square::E4 });
}

#[test]
fn only_the_owner_of_the_moving_piece_succeeds() {
    // Every legal move from a handful of positions is made by the side to move.
    let fens = [
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
    ];
    for fen in fens {
        let pos = Position::from_fen(fen).unwrap();
        for from in Square::ALL {
            for to in Square::ALL {
                if let Ok(a) = attempt_move(&pos, MoveRequest::new(from, to)) {
                    assert_eq!(pos.piece_at(from).map(|(c, _)| c), Some(pos.side_to_move()));
                    assert_eq!(a.position.side_to_move(), !pos.side_to_move());
                }
            }
        }
    }
}

#[test]
fn pawn_auto_promotes_to_queen() {
    let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let applied = attempt_move(&pos, MoveRequest::new(Square::A7, Square::A8)).unwrap();
    assert_eq!(applied.mv.promotion, Some(Piece::Queen));
    assert_eq!(applied.position.piece_at(Square::A8), Some((Color::White, Piece::Queen)));
}

#[test]
fn requested_underpromotion_is_honoured() {
    let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let req = MoveRequest { from: Square::A7, to: Square::A8, promotion: Some(Piece::Knight) };
    let applied = attempt_move(&pos, req).unwrap();
    assert_eq!(applied.position.piece_at(Square::A8), Some((Color::White, Piece::Knight)));
}

#[test]
fn promotion_piece_on_plain_move_is_rejected() {
    let pos = Position::startpos();
    let req = MoveRequest { from: Square::E2, to: Square::E4, promotion: Some(Piece::Queen) };
    assert_eq!(attempt_move(&pos, req).err(), Some(MoveError::IllegalMove { from: Square::E2, to: Square::E4 }));
}

#[test]
fn castling_by_king_hop() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let applied = attempt_move(&pos, MoveRequest::new(Square::E1, Square::C1)).unwrap();
    assert_eq!(applied.position.piece_at(Square::C1), Some((Color::White, Piece::King)));
    assert_eq!(applied.position.piece_at(Square::D1), Some((Color::White, Piece::Rook)));
    assert_eq!(applied.mv.to_string(), "e1c1");
}
