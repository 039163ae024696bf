use crate::eval::{Linear, ValueNet};

/// Adam with bias correction, per-parameter first and second moments.
pub struct Adam {
    pub lr: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub eps: f32,
    t: i32,
    m: Vec<Linear>,
    v: Vec<Linear>,
}

impl Adam {
    pub fn new(net: &ValueNet, lr: f32) -> Self {
        Self { lr, beta1: 0.9, beta2: 0.999, eps: 1e-8, t: 0, m: net.zero_grads(), v: net.zero_grads() }
    }

    pub fn steps(&self) -> i32 { self.t }

    /// Applies `grads * scale` to `net`.
    pub fn step(&mut self, net: &mut ValueNet, grads: &[Linear], scale: f32) {
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t);
        let bc2 = 1.0 - self.beta2.powi(self.t);
        let step = Step { lr: self.lr / bc1, bc2_sqrt: bc2.sqrt(), beta1: self.beta1, beta2: self.beta2, eps: self.eps, scale };
        for (((layer, g), m), v) in net.layers_mut().iter_mut().zip(grads).zip(&mut self.m).zip(&mut self.v) {
            step.apply(&mut layer.weights, &g.weights, &mut m.weights, &mut v.weights);
            step.apply(&mut layer.bias, &g.bias, &mut m.bias, &mut v.bias);
        }
    }
}

struct Step {
    lr: f32,
    bc2_sqrt: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    scale: f32,
}

impl Step {
    fn apply(&self, params: &mut [f32], grads: &[f32], m: &mut [f32], v: &mut [f32]) {
        for i in 0..params.len() {
            let g = grads[i] * self.scale;
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            let denom = v[i].sqrt() / self.bc2_sqrt + self.eps;
            params[i] -= self.lr * m[i] / denom;
        }
    }
}
