/*
 * @file classifier.rs
 * @brief Binary decision classifier backing the "learn" and "decision" actions
 * @date 2026
 *
 * MIT License
 *
 * Copyright (c) 2026 Sentra Project
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Classifier collaborator: a small fully-connected binary classifier.
//!
//! The assistant treats this as a black box with `train` and `predict`; the
//! default implementation runs a CPU MLP on the burn ndarray backend.

use anyhow::{anyhow, bail, Result};
use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::backend::Autodiff;
use burn::module::{AutodiffModule, Module};
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::optim::{AdamWConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend;
use burn::tensor::{activation, Tensor};

/// Fixed dimensionality of every decision input vector.
pub const FEATURE_DIM: usize = 10;

/// Autodiff backend used for training; inference runs on the inner backend.
type TrainBackend = Autodiff<NdArray>;

/// Outcome of one training run, with the accuracy measured on the training
/// set rather than fabricated.
#[derive(Clone, Copy, Debug)]
pub struct TrainReport {
    pub examples: usize,
    pub epochs: usize,
    pub accuracy: f32,
    pub loss: f32,
}

/// Black-box train/predict interface the assistant depends on.
///
/// # Details
/// `predict` yields a score in [0, 1] that the decision policy thresholds;
/// the score carries no semantic guarantee beyond its range. Tests substitute
/// stub implementations through this trait.
pub trait Classifier {
    /// Fits the model to the given rows.
    ///
    /// # Arguments
    /// * `features` - Rows of [`FEATURE_DIM`] floats each.
    /// * `labels` - One binary label (0 or 1) per row.
    ///
    /// # Errors
    /// Returns an error on empty input or mismatched shapes; never panics on
    /// caller data.
    fn train(&mut self, features: &[Vec<f32>], labels: &[u8]) -> Result<TrainReport>;

    /// Scores a single feature vector.
    fn predict(&self, features: &[f32]) -> Result<f32>;
}

/// The network: 10 -> 64 -> 128 -> 64 -> 1 with sigmoid output and dropout
/// after the first two hidden layers.
#[derive(Module, Debug)]
struct DecisionNet<B: Backend> {
    fc1: Linear<B>,
    drop1: Dropout,
    fc2: Linear<B>,
    drop2: Dropout,
    fc3: Linear<B>,
    out: Linear<B>,
}

impl<B: Backend> DecisionNet<B> {
    fn new(device: &B::Device) -> Self {
        Self {
            fc1: LinearConfig::new(FEATURE_DIM, 64).init(device),
            drop1: DropoutConfig::new(0.3).init(),
            fc2: LinearConfig::new(64, 128).init(device),
            drop2: DropoutConfig::new(0.3).init(),
            fc3: LinearConfig::new(128, 64).init(device),
            out: LinearConfig::new(64, 1).init(device),
        }
    }

    /// x: [batch, FEATURE_DIM] -> probabilities [batch, 1]
    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = activation::relu(self.fc1.forward(x));
        let x = self.drop1.forward(x);
        let x = activation::relu(self.fc2.forward(x));
        let x = self.drop2.forward(x);
        let x = activation::relu(self.fc3.forward(x));
        activation::sigmoid(self.out.forward(x))
    }
}

/// Flattens feature rows into a [n, FEATURE_DIM] tensor.
fn feature_tensor<B: Backend>(rows: &[Vec<f32>], device: &B::Device) -> Tensor<B, 2> {
    let mut flat = Vec::with_capacity(rows.len() * FEATURE_DIM);
    for row in rows {
        flat.extend_from_slice(row);
    }
    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([rows.len(), FEATURE_DIM])
}

/// Mean binary cross-entropy over a batch of probabilities.
fn binary_cross_entropy<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    // Clamp keeps log() away from zero.
    let probs = probs.clamp(1e-7, 1.0 - 1e-7);
    let inv_targets = targets.ones_like() - targets.clone();
    let inv_probs = probs.ones_like() - probs.clone();
    let term = targets * probs.log() + inv_targets * inv_probs.log();
    term.mean().neg()
}

/// Default classifier implementation.
pub struct NeuralClassifier {
    model: DecisionNet<TrainBackend>,
    device: NdArrayDevice,
    epochs: usize,
    learning_rate: f64,
}

impl NeuralClassifier {
    /// Creates a classifier with freshly initialized weights.
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Creates a classifier whose weight initialization is seeded for
    /// reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        let device = NdArrayDevice::default();
        <TrainBackend as Backend>::seed(seed);
        Self {
            model: DecisionNet::new(&device),
            device,
            epochs: 15,
            learning_rate: 3e-3,
        }
    }

    /// Overrides the number of full-batch epochs per `train` call.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Overrides the AdamW learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    fn validate_rows(features: &[Vec<f32>], labels: &[u8]) -> Result<()> {
        if features.is_empty() {
            bail!("training set is empty");
        }
        if features.len() != labels.len() {
            bail!(
                "feature/label count mismatch: {} rows vs {} labels",
                features.len(),
                labels.len()
            );
        }
        if let Some(row) = features.iter().find(|row| row.len() != FEATURE_DIM) {
            bail!(
                "feature row has dimension {}, expected {}",
                row.len(),
                FEATURE_DIM
            );
        }
        if let Some(&label) = labels.iter().find(|&&l| l > 1) {
            bail!("label {} is not binary", label);
        }
        Ok(())
    }
}

impl Default for NeuralClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for NeuralClassifier {
    fn train(&mut self, features: &[Vec<f32>], labels: &[u8]) -> Result<TrainReport> {
        Self::validate_rows(features, labels)?;

        let x = feature_tensor::<TrainBackend>(features, &self.device);
        let targets: Vec<f32> = labels.iter().map(|&l| l as f32).collect();
        let y = Tensor::<TrainBackend, 1>::from_floats(targets.as_slice(), &self.device)
            .reshape([labels.len(), 1]);

        let mut optim = AdamWConfig::new().init::<TrainBackend, DecisionNet<TrainBackend>>();
        let mut model = self.model.clone();
        let mut last_loss = 0.0_f32;

        for _ in 0..self.epochs {
            let probs = model.forward(x.clone());
            let loss = binary_cross_entropy(probs, y.clone());
            last_loss = loss
                .clone()
                .to_data()
                .as_slice::<f32>()
                .map_err(|e| anyhow!("loss tensor read failed: {e:?}"))?[0];
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(self.learning_rate, model, grads);
        }
        self.model = model;

        // Accuracy on the training set, measured with dropout disabled.
        let inference = self.model.valid();
        let probs = inference.forward(x.inner());
        let data = probs.to_data();
        let scores = data
            .as_slice::<f32>()
            .map_err(|e| anyhow!("prediction tensor read failed: {e:?}"))?;
        let correct = scores
            .iter()
            .zip(labels)
            .filter(|(score, &label)| (**score > 0.5) == (label == 1))
            .count();

        Ok(TrainReport {
            examples: labels.len(),
            epochs: self.epochs,
            accuracy: correct as f32 / labels.len() as f32,
            loss: last_loss,
        })
    }

    fn predict(&self, features: &[f32]) -> Result<f32> {
        if features.len() != FEATURE_DIM {
            bail!(
                "decision input has dimension {}, expected {}",
                features.len(),
                FEATURE_DIM
            );
        }
        let x = Tensor::<NdArray, 1>::from_floats(features, &self.device)
            .reshape([1, FEATURE_DIM]);
        let probs = self.model.valid().forward(x);
        let data = probs.to_data();
        let scores = data
            .as_slice::<f32>()
            .map_err(|e| anyhow!("prediction tensor read failed: {e:?}"))?;
        Ok(scores[0].clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_set(rows: usize) -> (Vec<Vec<f32>>, Vec<u8>) {
        let mut features = Vec::with_capacity(rows);
        let mut labels = Vec::with_capacity(rows);
        for i in 0..rows {
            let label = (i % 2) as u8;
            let level = if label == 1 { 0.9 } else { 0.1 };
            features.push(vec![level; FEATURE_DIM]);
            labels.push(label);
        }
        (features, labels)
    }

    #[test]
    fn predict_rejects_wrong_dimension() {
        let classifier = NeuralClassifier::with_seed(1);
        assert!(classifier.predict(&[0.5; 3]).is_err());
    }

    #[test]
    fn train_rejects_mismatched_shapes() {
        let mut classifier = NeuralClassifier::with_seed(1);
        let (features, _) = separable_set(4);
        assert!(classifier.train(&features, &[1]).is_err());
        assert!(classifier.train(&[], &[]).is_err());
        assert!(classifier
            .train(&[vec![0.0; FEATURE_DIM]], &[2])
            .is_err());
    }

    #[test]
    fn predict_scores_stay_in_unit_interval() {
        let classifier = NeuralClassifier::with_seed(3);
        let score = classifier.predict(&[0.25; FEATURE_DIM]).expect("predict");
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn training_learns_a_separable_set() {
        let mut classifier = NeuralClassifier::with_seed(7)
            .with_epochs(80)
            .with_learning_rate(1e-2);
        let (features, labels) = separable_set(60);
        let report = classifier.train(&features, &labels).expect("train");
        assert_eq!(report.examples, 60);
        assert!(report.loss.is_finite());
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!(report.accuracy >= 0.55, "accuracy {}", report.accuracy);
    }
}
