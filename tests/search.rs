use valuenet::board::Position;
use valuenet::encoder::FeatureVector;
use valuenet::eval::Evaluator;
use valuenet::search::{LeafEval, Minimax};
use valuenet::ValueNet;

/// Counts pieces of one colour in the encoded position.
struct PieceCount { black: bool }

impl Evaluator for PieceCount {
    fn evaluate(&self, f: &FeatureVector) -> f32 {
        let planes = if self.black { 6 * 64..12 * 64 } else { 0..6 * 64 };
        f.as_slice()[planes].iter().sum()
    }
}

struct Constant(f32);

impl Evaluator for Constant {
    fn evaluate(&self, _: &FeatureVector) -> f32 { self.0 }
}

fn pos(fen: &str) -> Position { Position::from_fen(fen).unwrap() }

fn fools_mate_setup() -> Position {
    let mut p = Position::startpos();
    for mv in ["f2f3", "e7e5", "g2g4"] { p.make_move_uci(mv).unwrap(); }
    p
}

#[test]
fn mated_positions_are_infinite() {
    let mut p = fools_mate_setup();
    p.make_move_uci("d8h4").unwrap();
    let zero = Constant(0.0);
    let mut s = Minimax::new(&zero, LeafEval::Zero);
    assert_eq!(s.search(&p, true, 0), f32::NEG_INFINITY);
    assert_eq!(s.search(&p, true, 3), f32::NEG_INFINITY);

    let scholars = pos("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    assert_eq!(s.search(&scholars, false, 2), f32::INFINITY);
}

#[test]
fn drawn_positions_score_zero() {
    let stalemate = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let five = Constant(5.0);
    let mut s = Minimax::new(&five, LeafEval::Network);
    assert_eq!(s.search(&stalemate, false, 2), 0.0);
    let bare = pos("k7/8/8/8/8/8/8/7K w - - 0 1");
    assert_eq!(s.search(&bare, true, 2), 0.0);
}

#[test]
fn black_maximises_so_mate_for_black_is_avoided() {
    // Black to move can mate with Qh4#, worth -inf from white's side. Black
    // maximises, so every other move (all worth 0 at depth 1) is preferred.
    let p = fools_mate_setup();
    let zero = Constant(0.0);
    let mut s = Minimax::new(&zero, LeafEval::Zero);
    let scored = s.score_moves(&p, false, 0);
    let mate = scored.iter().find(|(m, _)| m.to_string() == "d8h4").map(|&(_, v)| v);
    assert_eq!(mate, Some(f32::NEG_INFINITY));
    assert_eq!(s.search(&p, false, 1), 0.0);
    let (best, value) = s.best_move(&p, false, 0).unwrap();
    assert_ne!(best.to_string(), "d8h4");
    assert_eq!(value, 0.0);
}

#[test]
fn white_picks_minimum_leaf() {
    let p = pos("k7/8/8/8/8/8/3qQ3/7K w - - 0 1");
    let eval = PieceCount { black: true };
    let mut s = Minimax::new(&eval, LeafEval::Network);
    let (mv, value) = s.best_move(&p, true, 0).unwrap();
    assert_eq!(mv.to_string(), "e2d2");
    assert_eq!(value, 1.0);
}

#[test]
fn black_picks_maximum_leaf() {
    let p = pos("k7/8/8/8/8/8/3qQ3/7K b - - 0 1");
    let eval = PieceCount { black: false };
    let mut s = Minimax::new(&eval, LeafEval::Network);
    let (mv, value) = s.best_move(&p, false, 0).unwrap();
    assert_ne!(mv.to_string(), "d2e2");
    assert_eq!(value, 2.0);
}

#[test]
fn zero_leaf_ignores_evaluator() {
    let p = Position::startpos();
    let eval = Constant(7.5);
    let mut s = Minimax::new(&eval, LeafEval::Zero);
    assert_eq!(s.search(&p, true, 0), 0.0);
    assert_eq!(s.search(&p, true, 1), 0.0);
    let mut s = Minimax::new(&eval, LeafEval::Network);
    assert_eq!(s.search(&p, true, 0), 7.5);
    assert_eq!(s.search(&p, true, 1), 7.5);
}

#[test]
fn network_leaf_matches_forward_pass() {
    let net = ValueNet::selfplay(3);
    let p = Position::startpos();
    let mut s = Minimax::new(&net, LeafEval::Network);
    let expected = net.forward(valuenet::encode(&p, true).as_slice());
    assert_eq!(s.search(&p, true, 0), expected);
}

#[test]
fn node_count_covers_full_tree() {
    let p = Position::startpos();
    let zero = Constant(0.0);
    let mut s = Minimax::new(&zero, LeafEval::Zero);
    s.search(&p, true, 2);
    // root + 20 children + 400 grandchildren
    assert_eq!(s.nodes, 421);
}

#[test]
fn forced_mating_move_propagates_infinity() {
    // White is in check from Nf3; the only reply Nxf3 uncovers Bb2 onto h8.
    let white = pos("6bk/7p/8/4N3/8/5nPP/1B4RK/7R w - - 0 1");
    let only: Vec<String> = white.legal_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(only, vec!["e5f3".to_string()]);
    let zero = Constant(0.0);
    let mut s = Minimax::new(&zero, LeafEval::Zero);
    assert_eq!(s.search(&white, true, 1), f32::INFINITY);
    assert_eq!(s.search(&white, true, 2), f32::INFINITY);

    // Same position with colours swapped and the board mirrored.
    let black = pos("7r/1b4rk/5Npp/8/4n3/8/7P/6BK b - - 0 1");
    let only: Vec<String> = black.legal_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(only, vec!["e4f6".to_string()]);
    assert_eq!(s.search(&black, false, 1), f32::NEG_INFINITY);
}
