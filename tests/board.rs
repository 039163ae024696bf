use valuenet::board::Position;

fn moves(list: &[&str]) -> Vec<String> { list.iter().map(|m| m.to_string()).collect() }

#[test]
fn replays_uci_moves_from_start() {
    let pos = Position::set_from_start_and_moves(&moves(&["e2e4", "c7c5", "g1f3"])).unwrap();
    let expected = Position::from_fen("rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2").unwrap();
    assert_eq!(pos.text(), expected.text());
    assert!(!pos.white_to_move());
    assert_eq!(pos.halfmove_clock(), 1);
    assert_eq!(pos.board().hash(), expected.board().hash());
}

#[test]
fn replay_rejects_illegal_move() {
    let err = Position::set_from_start_and_moves(&moves(&["e2e4", "e7e5", "e4e5"])).unwrap_err();
    assert!(err.contains("e4e5"), "{err}");
    assert!(Position::set_from_start_and_moves(&moves(&["e2e5"])).is_err());
}

#[test]
fn empty_replay_is_startpos() {
    let pos = Position::set_from_start_and_moves(&[]).unwrap();
    assert_eq!(pos.text(), Position::startpos().text());
    assert_eq!(pos.legal_moves().len(), 20);
}

#[test]
fn repetitions_count_revisits() {
    let pos = Position::set_from_start_and_moves(&moves(&["g1f3", "g8f6", "f3g1", "f6g8"])).unwrap();
    assert_eq!(pos.repetitions(), 2);
    assert!(Position::from_fen("not a fen").is_err());
}
