use crate::board::Position;
use crate::config::SelfPlayConfig;
use crate::eval::{checkpoint, ValueNet};
use crate::samples::{write_shards, LabeledSample};
use crate::selfplay::{label_game, play_pair, GameEnd, GameRecord};
use crate::train::{TrainReport, Trainer};
use anyhow::{anyhow, Context, Result};
use log::info;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub games: usize,
    pub decisive: usize,
    pub drawn: usize,
    pub abandoned: usize,
    pub samples: usize,
    pub cycles: usize,
}

/// Self-play feeding the trainer: pairs of games fill a sample buffer, and a
/// full buffer pauses play while the network retrains and the best checkpoint
/// is reloaded.
pub struct SelfPlayLoop {
    config: SelfPlayConfig,
    start: Position,
    net: ValueNet,
    trainer: Trainer,
    buffer: Vec<LabeledSample>,
    pairs_played: u64,
    stats: LoopStats,
}

impl SelfPlayLoop {
    pub fn new(config: SelfPlayConfig) -> Result<Self> {
        let net = if config.resume {
            checkpoint::load(&config.checkpoint).context("resume self-play")?
        } else {
            ValueNet::new(&config.net_widths, config.params.seed).context("self-play network widths")?
        };
        Self::with_net(config, net)
    }

    pub fn with_net(config: SelfPlayConfig, net: ValueNet) -> Result<Self> {
        net.check_features().context("self-play network")?;
        let start = match &config.start_fen {
            Some(fen) => Position::from_fen(fen).map_err(|e| anyhow!(e))?,
            None => Position::startpos(),
        };
        let trainer = Trainer::new(config.train.clone(), &config.checkpoint);
        Ok(Self { config, start, net, trainer, buffer: Vec::new(), pairs_played: 0, stats: LoopStats::default() })
    }

    pub fn net(&self) -> &ValueNet { &self.net }

    pub fn buffered(&self) -> usize { self.buffer.len() }

    pub fn stats(&self) -> &LoopStats { &self.stats }

    /// Plays one pair of games and buffers the labelled samples of the
    /// decisive ones. Returns how many samples were added.
    pub fn play_round(&mut self) -> usize {
        let (a, b) = play_pair(&self.start, &self.config.params, &self.net, self.pairs_played);
        self.pairs_played += 1;
        let before = self.buffer.len();
        for record in [a, b] { self.absorb(&record); }
        self.buffer.len() - before
    }

    /// One round, followed by training when the buffer is over the threshold.
    pub fn step(&mut self) -> Result<Option<TrainReport>> {
        self.play_round();
        if self.buffer.len() > self.config.batch_threshold {
            return self.train_buffer().map(Some);
        }
        Ok(None)
    }

    pub fn train_buffer(&mut self) -> Result<TrainReport> {
        if let Some(dir) = &self.config.samples_dir {
            let shards = write_shards(&self.buffer, dir, 100_000)?;
            info!("wrote {} samples to {} shard(s) in {}", self.buffer.len(), shards.len(), dir.display());
        }
        let report = self.trainer.fit(&mut self.net, &self.buffer)?;
        self.stats.cycles += 1;
        info!("cycle {}: trained on {} samples, best validation loss {:.6} after {} epochs",
            self.stats.cycles, self.buffer.len(), report.best_val_loss, report.epochs_run);
        self.buffer.clear();
        Ok(report)
    }

    /// Runs until `max_cycles` training cycles have completed; without a limit
    /// it does not return unless training fails.
    pub fn run(&mut self) -> Result<LoopStats> {
        while self.config.max_cycles.map_or(true, |max| self.stats.cycles < max) {
            self.step()?;
        }
        Ok(self.stats.clone())
    }

    fn absorb(&mut self, record: &GameRecord) {
        self.stats.games += 1;
        match record.end {
            GameEnd::Decisive(_) => self.stats.decisive += 1,
            GameEnd::Drawn => self.stats.drawn += 1,
            GameEnd::Abandoned => self.stats.abandoned += 1,
        }
        let samples = label_game(record, self.config.params.stamp_white_to_move);
        self.stats.samples += samples.len();
        self.buffer.extend(samples);
    }
}
