use crate::eval::{checkpoint, ValueNet};
use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// Tracks the best validation loss, checkpoints on improvement and flags a
/// stop after `patience` epochs without one.
pub struct EarlyStopping {
    patience: usize,
    delta: f32,
    counter: usize,
    best_score: Option<f32>,
    pub early_stop: bool,
    pub val_loss_min: f32,
    checkpoint_path: PathBuf,
}

impl EarlyStopping {
    pub fn new<P: AsRef<Path>>(checkpoint_path: P, patience: usize, delta: f32) -> Self {
        Self {
            patience,
            delta,
            counter: 0,
            best_score: None,
            early_stop: false,
            val_loss_min: f32::INFINITY,
            checkpoint_path: checkpoint_path.as_ref().to_path_buf(),
        }
    }

    pub fn checkpoint_path(&self) -> &Path { &self.checkpoint_path }

    pub fn counter(&self) -> usize { self.counter }

    /// Returns true when this epoch produced a new checkpoint.
    pub fn step(&mut self, val_loss: f32, net: &ValueNet) -> Result<bool> {
        let score = -val_loss;
        match self.best_score {
            Some(best) if score < best + self.delta => {
                self.counter += 1;
                if self.counter >= self.patience { self.early_stop = true; }
                Ok(false)
            }
            _ => {
                self.best_score = Some(score);
                self.save_checkpoint(val_loss, net)?;
                self.counter = 0;
                Ok(true)
            }
        }
    }

    fn save_checkpoint(&mut self, val_loss: f32, net: &ValueNet) -> Result<()> {
        debug!("validation loss decreased ({:.6} --> {:.6}), saving {}", self.val_loss_min, val_loss, self.checkpoint_path.display());
        checkpoint::save(net, &self.checkpoint_path)?;
        self.val_loss_min = val_loss;
        Ok(())
    }
}
