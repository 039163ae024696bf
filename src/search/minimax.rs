use crate::board::Position;
use crate::encoder::encode;
use crate::eval::Evaluator;
use crate::outcome::{checkmate_winner, is_search_draw};
use cozy_chess::{Color, Move};
use serde::{Deserialize, Serialize};

/// What a depth-0 leaf that is not terminal scores as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LeafEval {
    /// Leaves score 0; only terminal positions move the value.
    #[default]
    Zero,
    /// Leaves are scored by the evaluator on the encoded position.
    Network,
}

/// Brute-force bounded minimax: no pruning, no transposition table, no move
/// ordering. Values are from white's point of view, mates are +-infinity.
pub struct Minimax<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    leaf: LeafEval,
    pub nodes: u64,
}

impl<'a, E: Evaluator + ?Sized> Minimax<'a, E> {
    pub fn new(evaluator: &'a E, leaf: LeafEval) -> Self { Self { evaluator, leaf, nodes: 0 } }

    pub fn search(&mut self, pos: &Position, white_to_move: bool, depth: u32) -> f32 {
        self.nodes += 1;
        if is_search_draw(pos) { return 0.0; }
        if let Some(winner) = checkmate_winner(pos) {
            return if winner == Color::White { f32::INFINITY } else { f32::NEG_INFINITY };
        }
        if depth == 0 {
            return match self.leaf {
                LeafEval::Zero => 0.0,
                LeafEval::Network => self.evaluator.evaluate(&encode(pos, white_to_move)),
            };
        }
        let values = self.child_values(pos, white_to_move, depth - 1);
        pick_index(&values, white_to_move).map_or(0.0, |i| values[i])
    }

    /// Scores every legal move of `pos` by searching the child to `depth` with
    /// the other side to move. Order follows move generation.
    pub fn score_moves(&mut self, pos: &Position, white_to_move: bool, depth: u32) -> Vec<(Move, f32)> {
        pos.legal_moves().into_iter().map(|mv| {
            let mut child = pos.clone();
            child.play(mv);
            (mv, self.search(&child, !white_to_move, depth))
        }).collect()
    }

    /// Move the side to move plays after searching each child to `depth`.
    pub fn best_move(&mut self, pos: &Position, white_to_move: bool, depth: u32) -> Option<(Move, f32)> {
        let scored = self.score_moves(pos, white_to_move, depth);
        let values: Vec<f32> = scored.iter().map(|&(_, v)| v).collect();
        pick_index(&values, white_to_move).map(|i| scored[i])
    }

    fn child_values(&mut self, pos: &Position, white_to_move: bool, depth: u32) -> Vec<f32> {
        self.score_moves(pos, white_to_move, depth).into_iter().map(|(_, v)| v).collect()
    }
}

/// White to move takes the minimising child, black the maximising one; the
/// first index reaching the extreme wins ties.
pub fn pick_index(values: &[f32], white_to_move: bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) if white_to_move => v < values[b],
            Some(b) => v > values[b],
        };
        if better { best = Some(i); }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::pick_index;

    #[test]
    fn ties_resolve_to_first_extreme() {
        let v = [0.0, -1.0, 3.0, -1.0, 3.0];
        assert_eq!(pick_index(&v, true), Some(1));
        assert_eq!(pick_index(&v, false), Some(2));
        assert_eq!(pick_index(&[], true), None);
    }

    #[test]
    fn infinities_are_extremes() {
        let v = [0.0, f32::INFINITY, f32::NEG_INFINITY];
        assert_eq!(pick_index(&v, true), Some(2));
        assert_eq!(pick_index(&v, false), Some(1));
    }
}
