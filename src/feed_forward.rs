//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) of ReLU layers.
//!
//! # Example
//!
//! Fit a small network to a single sample:
//!
//! ```
//! use relunet::dataset::Sample;
//! use relunet::feed_forward::Network;
//! use relunet::init::Initializer;
//!
//! let mut network = Network::new(&[2, 8, 1], &mut Initializer::from_seed(1))?;
//! let sample = Sample::new(vec![1.0, 0.5], vec![1.0]);
//!
//! let first = network.train_step(&sample, 0.05);
//! let mut last = first;
//! for _ in 0..200 {
//!     last = network.train_step(&sample, 0.05);
//! }
//! assert!(last < first);
//! assert!(last < 1e-3);
//! # Ok::<(), relunet::Error>(())
//! ```

use crate::activator::activate_derivative;
use crate::dataset::Sample;
use crate::error::{Error, Result};
use crate::init::Initializer;
use crate::layers::{Dense, Gradients, Layer};
use crate::loss::{loss, loss_gradient};
use crate::trainer::Trainable;
use crate::utils::{Back, Front};

/// A feedforward network of dense ReLU layers.
///
/// Besides the layers themselves, the network owns the scratch space used by
/// a training step: the activation cache (the raw input followed by every
/// layer's output), the error signal at every layer boundary and a gradient
/// buffer per layer.
#[derive(Clone, Debug)]
pub struct Network {
    layers: Vec<Dense>,
    activations: Vec<Vec<f32>>,
    errors: Vec<Vec<f32>>,
    updates: Vec<Gradients>,
}

impl Network {
    /// Creates a new, untrained network.
    ///
    /// Arguments:
    ///  * `layer_sizes` - the number of neurons in each layer, starting with
    ///                    the input width and ending with the output width.
    ///  * `init` - the source of the initial parameters.
    pub fn new(layer_sizes: &[usize], init: &mut Initializer) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(Error::NoLayers);
        }
        if let Some(layer) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(Error::EmptyLayer { layer });
        }
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Dense::new(pair[0], pair[1], init))
            .collect();
        Network::from_layers(layers)
    }

    /// Builds a network from existing layers, checking that adjacent widths
    /// agree.
    pub fn from_layers(layers: Vec<Dense>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::NoLayers);
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.input_len() == 0 || layer.output_len() == 0 {
                return Err(Error::EmptyLayer { layer: i });
            }
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[1].input_len() != pair[0].output_len() {
                return Err(Error::LayerMismatch {
                    layer: i + 1,
                    expected: pair[1].input_len(),
                    actual: pair[0].output_len(),
                });
            }
        }

        let mut activations = Vec::with_capacity(layers.len() + 1);
        activations.push(vec![0.0; layers.front().input_len()]);
        for layer in &layers {
            activations.push(vec![0.0; layer.output_len()]);
        }
        let errors = activations.clone();
        let updates = layers.iter().map(Layer::new_update).collect();
        Ok(Network {
            layers,
            activations,
            errors,
            updates,
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers.front().input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers.back().output_len()
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the activation cache from the last forward pass.
    pub fn activations(&self) -> &[Vec<f32>] {
        &self.activations
    }

    /// Returns the output of the last forward pass.
    pub fn output(&self) -> &[f32] {
        self.activations.back()
    }

    /// Feeds `input` through the network, caching every layer's activations,
    /// and returns the output layer.
    ///
    /// Panics if `input` does not match the network's input width.
    pub fn forward(&mut self, input: &[f32]) -> &[f32] {
        assert_eq!(input.len(), self.input_len());
        self.activations[0].copy_from_slice(input);
        for (i, layer) in self.layers.iter().enumerate() {
            let (inputs, outputs) = mut_layers(&mut self.activations, i);
            layer.forward(inputs, outputs);
        }
        self.activations.back()
    }

    /// Feeds `input` through the network without touching the activation
    /// cache.
    pub fn run(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.input_len());
        let mut current = input.to_vec();
        for layer in &self.layers {
            let mut next = vec![0.0; layer.output_len()];
            layer.forward(&current, &mut next);
            current = next;
        }
        current
    }

    /// Performs one stochastic gradient descent step on `sample` and returns
    /// the loss of the prediction made before the update.
    ///
    /// Layers are visited from the output back to the input. Each layer
    /// propagates its error with its current weights, then applies its own
    /// update, before the next layer is visited.
    ///
    /// Panics if the sample does not match the network's widths.
    pub fn train_step(&mut self, sample: &Sample, rate: f32) -> f32 {
        assert_eq!(sample.target.len(), self.output_len());
        self.forward(&sample.input);

        let Network {
            layers,
            activations,
            errors,
            updates,
        } = self;
        let output = activations.back();
        let loss_value = loss(output, &sample.target);
        // The output layer's error is the raw loss gradient. No activation
        // derivative is applied here, only at hidden layers below.
        loss_gradient(output, &sample.target, errors.mut_back());

        for (i, layer) in layers.iter_mut().enumerate().rev() {
            let (input_errors, output_errors) = mut_layers(errors, i);
            let update = &mut updates[i];
            layer.backward(&activations[i], output_errors, input_errors, update);
            layer.apply_update(rate, update);
            if i > 0 {
                for (e, &y) in input_errors.iter_mut().zip(&activations[i]) {
                    *e *= activate_derivative(y);
                }
            }
        }
        loss_value
    }
}

impl Trainable for Network {
    fn input_len(&self) -> usize {
        Network::input_len(self)
    }

    fn output_len(&self) -> usize {
        Network::output_len(self)
    }

    fn train_step(&mut self, sample: &Sample, rate: f32) -> f32 {
        Network::train_step(self, sample, rate)
    }

    fn output(&self) -> &[f32] {
        Network::output(self)
    }
}

/// Splits adjacent layer buffers `layer` and `layer + 1` for simultaneous
/// access.
fn mut_layers(layers: &mut [Vec<f32>], layer: usize) -> (&mut [f32], &mut [f32]) {
    let (before, after) = layers[layer..].split_at_mut(1);
    (&mut before[0], &mut after[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Mat;

    fn init() -> Initializer {
        Initializer::from_seed(42)
    }

    #[test]
    fn too_few_layers() {
        assert!(matches!(
            Network::new(&[3], &mut init()),
            Err(Error::NoLayers)
        ));
        assert!(matches!(Network::from_layers(vec![]), Err(Error::NoLayers)));
    }

    #[test]
    fn empty_layer() {
        assert!(matches!(
            Network::new(&[1, 0, 1], &mut init()),
            Err(Error::EmptyLayer { layer: 1 })
        ));
    }

    #[test]
    fn mismatched_layers() {
        let mut init = init();
        let layers = vec![Dense::new(2, 3, &mut init), Dense::new(4, 1, &mut init)];
        assert!(matches!(
            Network::from_layers(layers),
            Err(Error::LayerMismatch {
                layer: 1,
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn widths() {
        let network = Network::new(&[7, 50, 50, 4], &mut init()).unwrap();
        assert_eq!(network.input_len(), 7);
        assert_eq!(network.output_len(), 4);
        assert_eq!(network.layers().len(), 3);
        assert_eq!(network.activations().len(), 4);
    }

    #[test]
    fn forward_caches_activations() {
        let mut network = Network::new(&[3, 5, 2], &mut init()).unwrap();
        let output = network.forward(&[0.2, -0.4, 1.0]).to_vec();
        assert_eq!(network.activations()[0], vec![0.2, -0.4, 1.0]);
        assert_eq!(network.activations()[2], output);
        assert!(network.activations()[1].iter().all(|&a| a >= 0.0));
    }

    #[test]
    fn forward_is_deterministic() {
        let mut network = Network::new(&[4, 16, 16, 3], &mut init()).unwrap();
        let input = [0.9, 0.1, 0.5, 0.3];
        let a = network.forward(&input).to_vec();
        let b = network.forward(&input).to_vec();
        assert_eq!(a, b);
        assert_eq!(a, network.run(&input));
    }

    #[test]
    #[should_panic]
    fn forward_wrong_width() {
        let mut network = Network::new(&[7, 10, 4], &mut init()).unwrap();
        network.forward(&[0.0; 5]);
    }

    #[test]
    #[should_panic]
    fn train_step_wrong_target_width() {
        let mut network = Network::new(&[2, 3, 2], &mut init()).unwrap();
        network.train_step(&Sample::new(vec![0.0, 0.0], vec![1.0]), 0.1);
    }

    #[test]
    fn dead_output_still_learns() {
        // The output unit starts clamped at zero. With no derivative on the
        // output layer its bias still moves toward the target.
        let hidden = Dense::with_params(Mat::from_rows(&[vec![1.0]]), vec![0.0]);
        let output = Dense::with_params(Mat::from_rows(&[vec![-1.0]]), vec![0.0]);
        let mut network = Network::from_layers(vec![hidden, output]).unwrap();
        let sample = Sample::new(vec![1.0], vec![1.0]);

        assert_eq!(network.train_step(&sample, 0.1), 1.0);
        assert!(network.layers()[1].biases()[0] > 0.0);
    }

    #[test]
    fn one_update_per_step() {
        let mut network = Network::new(&[2, 4, 1], &mut init()).unwrap();
        let before = network.layers().to_vec();
        network.train_step(&Sample::new(vec![1.0, 1.0], vec![2.0]), 0.1);
        let after = network.layers().to_vec();
        assert_ne!(before[1], after[1]);
        // Gradient buffers are cleared once applied.
        for (layer, update) in network.layers.iter().zip(&network.updates) {
            assert_eq!(*update, layer.new_update());
        }
    }
}
