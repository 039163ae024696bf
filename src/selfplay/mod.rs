pub mod cycle;
pub mod game;

use crate::board::Position;
use crate::eval::Evaluator;
use crate::outcome::Rules;
use crate::search::{LeafEval, Minimax};
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use cycle::{LoopStats, SelfPlayLoop};
pub use game::{label_game, GameEnd, GameRecord, RecordedPosition, SelfPlayGame};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayParams {
    pub seed: u64,
    /// Chance that a ply is searched instead of played at random.
    pub search_probability: f64,
    pub search_depth: u32,
    pub leaf_eval: LeafEval,
    pub max_plies: Option<usize>,
    pub rules: Rules,
    /// Encode recorded positions with the side slot forced to white.
    pub stamp_white_to_move: bool,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        Self {
            seed: 22,
            search_probability: 1.0 / 6.0,
            search_depth: 1,
            leaf_eval: LeafEval::Zero,
            max_plies: None,
            rules: Rules::default(),
            stamp_white_to_move: true,
        }
    }
}

/// Plays one game from `start`. The RNG is seeded from `params.seed` and
/// `game_index`, so a game is reproducible from those two values.
pub fn play_game<E: Evaluator + ?Sized>(start: &Position, params: &SelfPlayParams, evaluator: &E, game_index: u64) -> GameRecord {
    let mut rng = SmallRng::seed_from_u64(params.seed.wrapping_add(game_index));
    let mut game = SelfPlayGame::new(start.clone(), params.rules);
    let mut search = Minimax::new(evaluator, params.leaf_eval);
    while !game.is_over() {
        if params.max_plies.map_or(false, |cap| game.plies() >= cap) { break; }
        if rng.gen::<f64>() < params.search_probability {
            match search.best_move(game.position(), game.white_to_move(), params.search_depth) {
                Some((mv, _)) => game.play_searched(mv),
                None => break,
            }
        } else {
            let moves = game.position().legal_moves();
            if moves.is_empty() { break; }
            let mv = moves[rng.gen_range(0..moves.len())];
            game.play_recorded(mv);
        }
    }
    let record = game.finish();
    debug!("game {game_index}: {:?} after {} plies, {} recorded, {} search nodes", record.end, record.plies, record.recorded.len(), search.nodes);
    record
}

/// Plays games `2 * pair_index` and `2 * pair_index + 1` concurrently and
/// returns both once each has finished.
pub fn play_pair<E: Evaluator + ?Sized>(start: &Position, params: &SelfPlayParams, evaluator: &E, pair_index: u64) -> (GameRecord, GameRecord) {
    let first = pair_index.wrapping_mul(2);
    rayon::join(
        || play_game(start, params, evaluator, first),
        || play_game(start, params, evaluator, first.wrapping_add(1)),
    )
}
