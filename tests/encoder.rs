use valuenet::board::Position;
use valuenet::encoder::{encode, encode_text, EncodingError, FEATURE_LEN, SIDE_SLOT};

fn ones(v: &valuenet::FeatureVector) -> usize {
    v.as_slice()[..SIDE_SLOT].iter().filter(|&&x| x == 1.0).count()
}

#[test]
fn startpos_has_one_bit_per_piece() {
    let pos = Position::startpos();
    let v = encode(&pos, true);
    assert_eq!(v.len(), FEATURE_LEN);
    assert_eq!(ones(&v), 32);
    assert!(v.as_slice().iter().all(|&x| x == 0.0 || x == 1.0));
    // white king on e1: plane 0, text index 60
    assert_eq!(v[60], 1.0);
    // black king on e8: plane 6, text index 4
    assert_eq!(v[6 * 64 + 4], 1.0);
    // black pawns a7..h7 on plane 11
    for sq in 8..16 { assert_eq!(v[11 * 64 + sq], 1.0); }
    // white rook a1 on plane 2
    assert_eq!(v[2 * 64 + 56], 1.0);
}

#[test]
fn side_slot_follows_flag_not_board() {
    let pos = Position::startpos();
    assert_eq!(encode(&pos, true)[SIDE_SLOT], 1.0);
    assert_eq!(encode(&pos, false)[SIDE_SLOT], 0.0);
    assert!(encode(&pos, true).white_to_move());
}

#[test]
fn encoding_is_deterministic() {
    let pos = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3").unwrap();
    assert_eq!(encode(&pos, false), encode(&pos, false));
}

#[test]
fn text_and_board_paths_agree() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "k7/8/8/8/8/8/3qQ3/7K w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        let text = pos.text();
        assert_eq!(encode_text(&text, true).unwrap(), encode(&pos, true), "{fen}");
    }
}

#[test]
fn board_text_layout() {
    let pos = Position::startpos();
    let text = pos.text();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0], "r n b q k b n r");
    assert_eq!(rows[4], ". . . . . . . .");
    assert_eq!(rows[7], "R N B Q K B N R");
}

#[test]
fn malformed_text_is_rejected() {
    let short = "r n b q k b n r\np p p p p p p p";
    assert_eq!(encode_text(short, true).unwrap_err(), EncodingError::WrongSquareCount { found: 16 });
    let long = format!("{}\n.", Position::startpos().text());
    assert_eq!(encode_text(&long, true).unwrap_err(), EncodingError::WrongSquareCount { found: 65 });
}
