use crate::encoder::FEATURE_LEN;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

/// Layer widths of the network trained by self-play.
pub const SELFPLAY_WIDTHS: [usize; 4] = [FEATURE_LEN, 64, 32, 1];
/// Layer widths of the network trained on mined PGN games.
pub const PGN_WIDTHS: [usize; 5] = [FEATURE_LEN, 256, 64, 32, 1];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("network needs at least one layer")]
    Empty,
    #[error("layer {index}: input width {found} does not match previous output width {expected}")]
    Chain { index: usize, expected: usize, found: usize },
    #[error("layer {index}: {what} holds {found} values, expected {expected}")]
    Size { index: usize, what: &'static str, expected: usize, found: usize },
    #[error("final layer must have a single output, has {0}")]
    Output(usize),
    #[error("network takes {found} inputs, encoder produces {expected}")]
    Input { expected: usize, found: usize },
}

/// Fully connected layer; `weights` is row-major with `out_dim` rows of `in_dim`.
#[derive(Clone, Debug, PartialEq)]
pub struct Linear {
    pub in_dim: usize,
    pub out_dim: usize,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

impl Linear {
    pub fn zeros(in_dim: usize, out_dim: usize) -> Self {
        Self { in_dim, out_dim, weights: vec![0.0; in_dim * out_dim], bias: vec![0.0; out_dim] }
    }

    /// Uniform in +-1/sqrt(fan_in) for weights and bias.
    pub fn init(in_dim: usize, out_dim: usize, rng: &mut SmallRng) -> Self {
        let bound = 1.0 / (in_dim.max(1) as f32).sqrt();
        let dist = Uniform::new_inclusive(-bound, bound);
        let weights = (0..in_dim * out_dim).map(|_| dist.sample(rng)).collect();
        let bias = (0..out_dim).map(|_| dist.sample(rng)).collect();
        Self { in_dim, out_dim, weights, bias }
    }

    pub fn forward(&self, x: &[f32], out: &mut Vec<f32>) {
        out.clear();
        for j in 0..self.out_dim {
            let row = &self.weights[j * self.in_dim..(j + 1) * self.in_dim];
            let mut sum = self.bias[j];
            for (w, &xi) in row.iter().zip(x) {
                if xi != 0.0 { sum += w * xi; }
            }
            out.push(sum);
        }
    }

    pub fn param_count(&self) -> usize { self.weights.len() + self.bias.len() }
}

/// Feed-forward value network: linear layers with ReLU between them and a
/// single linear output.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueNet {
    layers: Vec<Linear>,
}

impl ValueNet {
    /// Freshly initialised network; `widths` runs from the input width to the
    /// single output.
    pub fn new(widths: &[usize], seed: u64) -> Result<Self, ShapeError> {
        Self::from_layers(init_layers(widths, seed))
    }

    pub fn selfplay(seed: u64) -> Self { Self { layers: init_layers(&SELFPLAY_WIDTHS, seed) } }

    pub fn pgn(seed: u64) -> Self { Self { layers: init_layers(&PGN_WIDTHS, seed) } }

    pub fn from_layers(layers: Vec<Linear>) -> Result<Self, ShapeError> {
        if layers.is_empty() { return Err(ShapeError::Empty); }
        for (index, l) in layers.iter().enumerate() {
            if l.weights.len() != l.in_dim * l.out_dim {
                return Err(ShapeError::Size { index, what: "weights", expected: l.in_dim * l.out_dim, found: l.weights.len() });
            }
            if l.bias.len() != l.out_dim {
                return Err(ShapeError::Size { index, what: "bias", expected: l.out_dim, found: l.bias.len() });
            }
            if index > 0 && layers[index - 1].out_dim != l.in_dim {
                return Err(ShapeError::Chain { index, expected: layers[index - 1].out_dim, found: l.in_dim });
            }
        }
        let last = layers[layers.len() - 1].out_dim;
        if last != 1 { return Err(ShapeError::Output(last)); }
        Ok(Self { layers })
    }

    /// Fails unless the first layer takes exactly `expected` inputs.
    pub fn check_input(&self, expected: usize) -> Result<(), ShapeError> {
        let found = self.input_dim();
        if found != expected { return Err(ShapeError::Input { expected, found }); }
        Ok(())
    }

    /// Fails unless the network reads encoder feature vectors.
    pub fn check_features(&self) -> Result<(), ShapeError> { self.check_input(FEATURE_LEN) }

    pub fn layers(&self) -> &[Linear] { &self.layers }

    pub fn layers_mut(&mut self) -> &mut [Linear] { &mut self.layers }

    pub fn input_dim(&self) -> usize { self.layers[0].in_dim }

    pub fn widths(&self) -> Vec<usize> {
        let mut w = vec![self.input_dim()];
        w.extend(self.layers.iter().map(|l| l.out_dim));
        w
    }

    pub fn param_count(&self) -> usize { self.layers.iter().map(Linear::param_count).sum() }

    pub fn forward(&self, x: &[f32]) -> f32 {
        let acts = self.activations(x);
        acts.last().and_then(|a| a.first()).copied().unwrap_or(0.0)
    }

    /// Input of every layer followed by the network output.
    pub fn activations(&self, x: &[f32]) -> Vec<Vec<f32>> {
        let mut acts = Vec::with_capacity(self.layers.len() + 1);
        acts.push(x.to_vec());
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            let mut out = Vec::with_capacity(layer.out_dim);
            layer.forward(&acts[i], &mut out);
            if i < last {
                for v in &mut out { if *v < 0.0 { *v = 0.0; } }
            }
            acts.push(out);
        }
        acts
    }

    /// Zeroed gradient buffers shaped like the layers.
    pub fn zero_grads(&self) -> Vec<Linear> {
        self.layers.iter().map(|l| Linear::zeros(l.in_dim, l.out_dim)).collect()
    }

    /// Adds d(loss)/d(param) of the squared error against `target` into `grads`
    /// and returns the loss.
    pub fn accumulate_gradients(&self, x: &[f32], target: f32, grads: &mut [Linear]) -> f32 {
        let acts = self.activations(x);
        let out = acts[acts.len() - 1][0];
        let diff = out - target;
        let mut g = vec![2.0 * diff];
        for l in (0..self.layers.len()).rev() {
            let layer = &self.layers[l];
            let input = &acts[l];
            let grad = &mut grads[l];
            let n = layer.in_dim;
            for (j, &gj) in g.iter().enumerate() {
                if gj == 0.0 { continue; }
                grad.bias[j] += gj;
                let row = &mut grad.weights[j * n..(j + 1) * n];
                for (w, &xi) in row.iter_mut().zip(input) {
                    if xi != 0.0 { *w += gj * xi; }
                }
            }
            if l == 0 { break; }
            let mut prev = vec![0.0f32; n];
            for (j, &gj) in g.iter().enumerate() {
                if gj == 0.0 { continue; }
                let row = &layer.weights[j * n..(j + 1) * n];
                for (p, &w) in prev.iter_mut().zip(row) { *p += w * gj; }
            }
            // ReLU gate: inputs of hidden layers are post-activation values.
            for (p, &a) in prev.iter_mut().zip(input) {
                if a <= 0.0 { *p = 0.0; }
            }
            g = prev;
        }
        diff * diff
    }
}

fn init_layers(widths: &[usize], seed: u64) -> Vec<Linear> {
    let mut rng = SmallRng::seed_from_u64(seed);
    widths.windows(2).map(|w| Linear::init(w[0], w[1], &mut rng)).collect()
}
