//! Utilities for training neural networks.

use crate::dataset::{check_widths, Sample};
use crate::error::{Error, Result};

use std::time::{Duration, Instant};
use tracing::info;

/// Makes a model trainable using stochastic gradient descent.
pub trait Trainable {
    /// Width of the inputs the model accepts.
    fn input_len(&self) -> usize;

    /// Width of the outputs the model produces.
    fn output_len(&self) -> usize;

    /// Performs one forward pass, backward pass and parameter update on
    /// `sample`. Returns the loss of the prediction made before the update.
    fn train_step(&mut self, sample: &Sample, rate: f32) -> f32;

    /// The output produced by the most recent training step.
    fn output(&self) -> &[f32];
}

/// A builder for training new models.
#[derive(Debug)]
pub struct Trainer<T: Trainable> {
    model: T,
    learning_rate: f32,
    logging: Logging,
    stop_condition: StopCondition,
}

/// The outcome of a finished training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// Number of epochs run.
    pub epochs: usize,
    /// Mean per-sample loss over the final epoch.
    pub final_loss: f32,
    pub elapsed: Duration,
}

impl<T: Trainable> Trainer<T> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after 1000 epochs.
    /// * Logs on training completion.
    pub fn new(model: T) -> Self {
        Trainer {
            model,
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f32) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains the model on the provided labelled data.
    ///
    /// Every epoch runs one training step per sample, in order. The samples'
    /// widths and the training parameters are checked before any step runs.
    ///
    /// Returns:
    ///   The trained model and a summary of the run, or an error if invalid
    ///   training parameters were provided.
    pub fn train(mut self, samples: &[Sample]) -> Result<(T, Summary)> {
        self.validate(samples)?;

        let start_time = Instant::now();
        let mut epoch = 0;
        let mut training_error;
        loop {
            epoch += 1;
            training_error = 0.0;
            for sample in samples {
                let loss = self.model.train_step(sample, self.learning_rate);
                self.logging.step(epoch, loss, self.model.output());
                training_error += loss;
            }
            training_error /= samples.len() as f32;

            self.logging.epoch(epoch, training_error);
            if self
                .stop_condition
                .should_stop(epoch, training_error, start_time)
            {
                break;
            }
        }

        let summary = Summary {
            epochs: epoch,
            final_loss: training_error,
            elapsed: start_time.elapsed(),
        };
        self.logging.completion(&summary);
        Ok((self.model, summary))
    }

    /// Verifies that all provided inputs to the `Trainer` are valid, returning
    /// an error if something is wrong.
    fn validate(&self, samples: &[Sample]) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidLearningRate(self.learning_rate));
        }
        if let StopCondition::Iterations(0) = self.stop_condition {
            return Err(Error::NoEpochs);
        }
        if samples.is_empty() {
            return Err(Error::NoSamples);
        }
        check_widths(samples, self.model.input_len(), self.model.output_len())
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// A summary will be emitted after every `n` epochs
    Epochs(usize),
    /// Every training step's loss and output will be emitted, along with a
    /// summary after each epoch
    Steps,
}

impl Logging {
    /// Performs logging after a single training step.
    fn step(&self, epoch: usize, loss: f32, output: &[f32]) {
        if let Logging::Steps = self {
            info!(epoch, loss, ?output, "training step");
        }
    }

    /// Performs logging at the end of an epoch.
    fn epoch(&self, epoch: usize, training_error: f32) {
        match *self {
            Logging::Epochs(freq) if freq > 0 && epoch % freq == 0 => {
                info!(epoch, loss = training_error, "epoch complete");
            }
            Logging::Steps => info!(epoch, loss = training_error, "epoch complete"),
            _ => {}
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, summary: &Summary) {
        if let Logging::Silent = self {
            return;
        }
        info!(
            epochs = summary.epochs,
            loss = summary.final_loss,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "training complete"
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Iterations(usize),
    /// Stops when the mean epoch loss drops below the provided threshold
    ErrorThreshold(f32),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, epoch: usize, training_error: f32, start_time: Instant) -> bool {
        match *self {
            StopCondition::Iterations(epochs) => epoch >= epochs,
            // NaN never compares below the threshold.
            StopCondition::ErrorThreshold(threshold) => training_error < threshold,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
