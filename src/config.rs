use crate::eval::SELFPLAY_WIDTHS;
use crate::selfplay::SelfPlayParams;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub lr: f32,
    pub epochs: usize,
    pub patience: usize,
    pub delta: f32,
    pub test_fraction: f32,
    pub split_seed: u64,
    pub batch_size: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { lr: 0.001, epochs: 10, patience: 10, delta: 0.0, test_fraction: 0.1, split_seed: 42, batch_size: 1 }
    }
}

impl TrainConfig {
    /// Settings used for the network trained on mined PGN games.
    pub fn pgn() -> Self { Self { lr: 0.0001, epochs: 100, ..Self::default() } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    pub params: SelfPlayParams,
    /// Train once more than this many samples are buffered.
    pub batch_threshold: usize,
    pub max_cycles: Option<usize>,
    pub checkpoint: PathBuf,
    /// Load `checkpoint` before playing; a missing file is an error.
    pub resume: bool,
    pub net_widths: Vec<usize>,
    /// Dump every training batch as sample shards here.
    pub samples_dir: Option<PathBuf>,
    pub start_fen: Option<String>,
    pub train: TrainConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            params: SelfPlayParams::default(),
            batch_threshold: 1000,
            max_cycles: None,
            checkpoint: PathBuf::from("self_play.ckpt"),
            resume: false,
            net_widths: SELFPLAY_WIDTHS.to_vec(),
            samples_dir: None,
            start_fen: None,
            train: TrainConfig::default(),
        }
    }
}

pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config: {}", path.display()))
}

pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("write config: {}", path.display()))
}
