//! Network layers.

pub mod dense;

pub use self::dense::{Dense, Gradients};

/// A single trainable stage of a feedforward network.
pub trait Layer {
    /// A container for the parameter gradients of one training step.
    type Update;

    /// Returns the number of inputs to this layer.
    fn input_len(&self) -> usize;

    /// Returns the number of outputs from this layer.
    fn output_len(&self) -> usize;

    /// Returns a new, zeroed update.
    fn new_update(&self) -> Self::Update;

    /// Feeds `inputs` forward through the layer, writing the activated values
    /// into `outputs`.
    fn forward(&self, inputs: &[f32], outputs: &mut [f32]);

    /// Feeds `output_errors` backwards through the layer.
    ///
    /// `output_errors` is the gradient of the loss with respect to this
    /// layer's activated output, with any activation derivative already
    /// applied. Parameter gradients are written into `update`, and the
    /// gradient with respect to `inputs` is written into `input_errors`
    /// *without* the previous layer's activation derivative.
    fn backward(
        &self,
        inputs: &[f32],
        output_errors: &[f32],
        input_errors: &mut [f32],
        update: &mut Self::Update,
    );

    /// Applies and resets the provided `update`, scaling by the gradient
    /// descent `rate`.
    fn apply_update(&mut self, rate: f32, update: &mut Self::Update);
}
