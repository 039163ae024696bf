pub mod minimax;

pub use minimax::{pick_index, LeafEval, Minimax};
