// Value-network training for chess: encoding, labels, search, self-play and export.
pub mod board;
pub mod config;
pub mod encoder;
pub mod eval;
pub mod export;
pub mod outcome;
pub mod pgn;
pub mod samples;
pub mod search;
pub mod selfplay;
pub mod train;

pub use board::Position;
pub use encoder::{encode, FeatureVector, FEATURE_LEN};
pub use eval::{Evaluator, ValueNet};
pub use samples::LabeledSample;
