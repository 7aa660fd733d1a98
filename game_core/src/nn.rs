//! Small fully-connected feedforward network with tanh activations,
//! trained one example at a time by plain gradient descent.
//!
//! Layer widths are fixed at construction (the paddle controller uses
//! 4-4-4-4-4-1). Every layer, including the output, applies tanh, so
//! outputs lie in (-1, 1).

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("network needs at least an input and an output layer, got {0} layers")]
    TooFewLayers(usize),
    #[error("layer {0} has zero width")]
    EmptyLayer(usize),
    #[error("insufficient weights: need {expected}, got {actual}")]
    InsufficientWeights { expected: usize, actual: usize },
}

/// Weights into one layer: `weights[neuron][input]`
#[derive(Debug, Clone, PartialEq)]
struct Layer {
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
}

impl Layer {
    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    layers: Vec<Layer>,
    learning_rate: f32,
}

fn check_topology(topology: &[usize]) -> Result<(), NetworkError> {
    if topology.len() < 2 {
        return Err(NetworkError::TooFewLayers(topology.len()));
    }
    if let Some(idx) = topology.iter().position(|&w| w == 0) {
        return Err(NetworkError::EmptyLayer(idx));
    }
    Ok(())
}

/// Number of weights plus biases for a topology
pub fn parameter_count(topology: &[usize]) -> usize {
    topology.windows(2).map(|w| w[0] * w[1] + w[1]).sum()
}

impl NeuralNet {
    /// Random weights and biases drawn uniformly from `[-weight_range, weight_range)`
    pub fn new<R: Rng>(
        topology: &[usize],
        learning_rate: f32,
        weight_range: f32,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        check_topology(topology)?;
        let weights = (0..parameter_count(topology))
            .map(|_| rng.gen_range(-weight_range..weight_range))
            .collect::<Vec<_>>();
        Self::from_weights(topology, learning_rate, weights)
    }

    /// Build from a flat parameter list: for each layer, its weight rows then its biases
    pub fn from_weights(
        topology: &[usize],
        learning_rate: f32,
        weights: impl IntoIterator<Item = f32>,
    ) -> Result<Self, NetworkError> {
        check_topology(topology)?;
        let expected = parameter_count(topology);
        let flat: Vec<f32> = weights.into_iter().take(expected).collect();
        if flat.len() < expected {
            return Err(NetworkError::InsufficientWeights {
                expected,
                actual: flat.len(),
            });
        }

        let mut values = flat.into_iter();
        let layers = topology
            .windows(2)
            .map(|pair| {
                let (inputs, neurons) = (pair[0], pair[1]);
                let weights = (0..neurons)
                    .map(|_| values.by_ref().take(inputs).collect())
                    .collect();
                let biases = values.by_ref().take(neurons).collect();
                Layer { weights, biases }
            })
            .collect();

        Ok(Self {
            layers,
            learning_rate,
        })
    }

    /// Flatten parameters in the order `from_weights` expects
    pub fn to_weight_vec(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for layer in &self.layers {
            for row in &layer.weights {
                out.extend_from_slice(row);
            }
            out.extend_from_slice(&layer.biases);
        }
        out
    }

    pub fn topology(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            widths.push(first.weights.first().map_or(0, Vec::len));
        }
        widths.extend(self.layers.iter().map(|l| l.biases.len()));
        widths
    }

    /// Activations of every layer, input included
    fn activations(&self, input: &[f32]) -> Vec<Vec<f32>> {
        debug_assert_eq!(
            Some(input.len()),
            self.topology().first().copied(),
            "input width does not match network"
        );
        let mut acts = Vec::with_capacity(self.layers.len() + 1);
        acts.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(&acts[acts.len() - 1]);
            acts.push(next);
        }
        acts
    }

    /// Inference; never mutates the network
    pub fn feed_forward(&self, input: &[f32]) -> Vec<f32> {
        self.activations(input).pop().unwrap_or_default()
    }

    /// One stochastic gradient step toward `target`.
    ///
    /// Returns the squared error of the forward pass taken before the update.
    pub fn back_propagate(&mut self, input: &[f32], target: &[f32]) -> f32 {
        let acts = self.activations(input);
        let output = &acts[acts.len() - 1];
        debug_assert_eq!(output.len(), target.len(), "target width does not match network");

        let error: f32 = output
            .iter()
            .zip(target)
            .map(|(o, t)| (o - t) * (o - t))
            .sum();

        // tanh'(x) expressed through the activation: 1 - a^2
        let mut deltas: Vec<f32> = output
            .iter()
            .zip(target)
            .map(|(o, t)| (o - t) * (1.0 - o * o))
            .collect();

        let lr = self.learning_rate;
        for (idx, layer) in self.layers.iter_mut().enumerate().rev() {
            let layer_input = &acts[idx];

            let upstream: Vec<f32> = if idx > 0 {
                (0..layer_input.len())
                    .map(|i| {
                        let sum: f32 = layer
                            .weights
                            .iter()
                            .zip(&deltas)
                            .map(|(row, d)| row[i] * d)
                            .sum();
                        sum * (1.0 - layer_input[i] * layer_input[i])
                    })
                    .collect()
            } else {
                Vec::new()
            };

            for ((row, bias), delta) in layer.weights.iter_mut().zip(&mut layer.biases).zip(&deltas) {
                for (w, x) in row.iter_mut().zip(layer_input) {
                    *w -= lr * delta * x;
                }
                *bias -= lr * delta;
            }

            deltas = upstream;
        }

        error
    }
}
