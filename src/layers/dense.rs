use crate::activator::activate;
use crate::init::Initializer;
use crate::layers::Layer;
use crate::matrix::Mat;
use crate::utils::ZeroOut;

use itertools::multizip;

/// A fully connected layer with ReLU activation.
///
/// Weights are stored with one row per input and one column per output.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    weights: Mat,
    biases: Vec<f32>,
}

impl Dense {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    ///  * `init` - the source of the initial weights and biases.
    pub fn new(inputs: usize, outputs: usize, init: &mut Initializer) -> Self {
        Dense {
            weights: init.weights(inputs, outputs),
            biases: init.biases(outputs),
        }
    }

    /// Builds a layer from known parameters.
    ///
    /// Panics if `biases` does not have one entry per weight column.
    pub fn with_params(weights: Mat, biases: Vec<f32>) -> Self {
        assert_eq!(weights.cols(), biases.len());
        Dense { weights, biases }
    }

    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    pub fn biases(&self) -> &[f32] {
        &self.biases
    }
}

/// Parameter gradients for a `Dense` layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub weights: Mat,
    pub biases: Vec<f32>,
}

impl ZeroOut for Gradients {
    fn zero_out(&mut self) {
        self.weights.zero_out();
        self.biases.zero_out();
    }
}

impl Layer for Dense {
    type Update = Gradients;

    fn input_len(&self) -> usize {
        self.weights.rows()
    }

    fn output_len(&self) -> usize {
        self.weights.cols()
    }

    fn new_update(&self) -> Self::Update {
        Gradients {
            weights: Mat::zeros(self.input_len(), self.output_len()),
            biases: vec![0.0; self.output_len()],
        }
    }

    fn forward(&self, inputs: &[f32], outputs: &mut [f32]) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        outputs.copy_from_slice(&self.biases);
        for (i, &x) in inputs.iter().enumerate() {
            for (y, &w) in outputs.iter_mut().zip(self.weights.row(i)) {
                *y += x * w;
            }
        }
        for y in outputs {
            *y = activate(*y);
        }
    }

    fn backward(
        &self,
        inputs: &[f32],
        output_errors: &[f32],
        input_errors: &mut [f32],
        update: &mut Self::Update,
    ) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(output_errors.len(), self.output_len());
        assert_eq!(input_errors.len(), self.input_len());
        update.biases.copy_from_slice(output_errors);
        for (i, (&x, e_in)) in inputs.iter().zip(input_errors.iter_mut()).enumerate() {
            let mut sum = 0.0;
            for (&e, &w, dw) in multizip((
                output_errors.iter(),
                self.weights.row(i).iter(),
                update.weights.row_mut(i).iter_mut(),
            )) {
                *dw = e * x;
                sum += e * w;
            }
            *e_in = sum;
        }
    }

    fn apply_update(&mut self, rate: f32, update: &mut Self::Update) {
        self.weights.apply_delta(rate, &update.weights);
        for (b, g) in self.biases.iter_mut().zip(update.biases.iter()) {
            *b -= rate * g;
        }
        update.zero_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layer() -> Dense {
        // 2 inputs, 3 outputs
        Dense::with_params(
            Mat::from_rows(&[vec![0.5, -1.0, 0.25], vec![1.0, 0.5, -0.5]]),
            vec![0.1, 0.2, 0.0],
        )
    }

    #[test]
    fn forward() {
        let mut out = vec![0.0; 3];
        layer().forward(&[1.0, 2.0], &mut out);
        // [0.1 + 0.5 + 2.0, 0.2 - 1.0 + 1.0, 0.0 + 0.25 - 1.0]
        assert_relative_eq!(out[0], 2.6, epsilon = 1e-6);
        assert_relative_eq!(out[1], 0.2, epsilon = 1e-6);
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn forward_ignores_stale_outputs() {
        let layer = layer();
        let mut a = vec![0.0; 3];
        let mut b = vec![100.0; 3];
        layer.forward(&[1.0, 2.0], &mut a);
        layer.forward(&[1.0, 2.0], &mut b);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn forward_wrong_input_len() {
        let mut out = vec![0.0; 3];
        layer().forward(&[1.0], &mut out);
    }

    #[test]
    fn backward() {
        let layer = layer();
        let mut update = layer.new_update();
        let mut input_errors = vec![0.0; 2];
        layer.backward(
            &[1.0, 2.0],
            &[1.0, -2.0, 0.5],
            &mut input_errors,
            &mut update,
        );

        assert_eq!(update.biases, vec![1.0, -2.0, 0.5]);
        assert_eq!(update.weights.row(0), &[1.0, -2.0, 0.5]);
        assert_eq!(update.weights.row(1), &[2.0, -4.0, 1.0]);
        // 0.5 + 2.0 + 0.125, 1.0 - 1.0 - 0.25
        assert_relative_eq!(input_errors[0], 2.625, epsilon = 1e-6);
        assert_relative_eq!(input_errors[1], -0.25, epsilon = 1e-6);
    }

    #[test]
    fn apply_update_resets_gradients() {
        let mut layer = layer();
        let mut update = layer.new_update();
        let mut input_errors = vec![0.0; 2];
        layer.backward(
            &[1.0, 0.0],
            &[1.0, 0.0, 0.0],
            &mut input_errors,
            &mut update,
        );
        layer.apply_update(0.1, &mut update);

        assert_relative_eq!(layer.weights()[(0, 0)], 0.4, epsilon = 1e-6);
        assert_eq!(layer.weights()[(1, 0)], 1.0);
        assert_relative_eq!(layer.biases()[0], 0.0, epsilon = 1e-6);
        assert_eq!(&layer.biases()[1..], &[0.2, 0.0]);
        assert_eq!(update, layer.new_update());
    }

    #[test]
    fn random_layer_shape() {
        let mut init = Initializer::from_seed(3);
        let layer = Dense::new(4, 6, &mut init);
        assert_eq!(layer.input_len(), 4);
        assert_eq!(layer.output_len(), 6);
        assert!(layer.biases().iter().all(|&b| b == 0.01));
    }
}
