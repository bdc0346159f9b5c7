//! Training run configuration.
//!
//! A run is described by a small JSON document. Every field is optional:
//!
//! ```json
//! {
//!     "input_width": 7,
//!     "hidden_widths": [50, 50],
//!     "output_width": 4,
//!     "learning_rate": 0.6,
//!     "epochs": 30,
//!     "seed": 1234
//! }
//! ```

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::init::Initializer;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Fixed shape and hyperparameters for a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_width: usize,
    pub hidden_widths: Vec<usize>,
    pub output_width: usize,
    pub learning_rate: f32,
    pub epochs: usize,
    /// Seed for weight initialization. Drawn from system entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_width: 7,
            hidden_widths: vec![50, 50],
            output_width: 4,
            learning_rate: 0.6,
            epochs: 30,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Config::from_reader(BufReader::new(File::open(path)?))
    }

    /// Every layer width, input first and output last.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_widths.len() + 2);
        sizes.push(self.input_width);
        sizes.extend_from_slice(&self.hidden_widths);
        sizes.push(self.output_width);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(layer) = self.layer_sizes().iter().position(|&w| w == 0) {
            return Err(Error::EmptyLayer { layer });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidLearningRate(self.learning_rate));
        }
        if self.epochs == 0 {
            return Err(Error::NoEpochs);
        }
        Ok(())
    }

    /// Builds a freshly initialized network of the configured shape.
    pub fn build_network(&self) -> Result<Network> {
        self.validate()?;
        Network::new(&self.layer_sizes(), &mut Initializer::from(self.seed))
    }
}
