//! Initial parameter values for new layers.

use crate::matrix::Mat;

use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Half-width of the interval initial weights are drawn from.
pub const WEIGHT_RANGE: f32 = 0.05;

/// Value every bias starts at.
pub const INITIAL_BIAS: f32 = 0.01;

/// Produces starting weights and biases.
///
/// Weights are drawn uniformly from `[-WEIGHT_RANGE, WEIGHT_RANGE]`; biases
/// are all `INITIAL_BIAS`. Only used while a network is being built.
#[derive(Debug)]
pub struct Initializer {
    rng: StdRng,
    distribution: Uniform<f32>,
}

impl Initializer {
    /// Creates an initializer seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a reproducible initializer.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Initializer {
            rng,
            distribution: Uniform::new_inclusive(-WEIGHT_RANGE, WEIGHT_RANGE),
        }
    }

    /// Returns an `inputs x outputs` weight matrix.
    pub fn weights(&mut self, inputs: usize, outputs: usize) -> Mat {
        Mat::random(self.distribution, &mut self.rng, inputs, outputs)
    }

    /// Returns a bias vector of length `outputs`.
    pub fn biases(&self, outputs: usize) -> Vec<f32> {
        vec![INITIAL_BIAS; outputs]
    }
}

impl Default for Initializer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Option<u64>> for Initializer {
    fn from(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Initializer::from_seed(seed),
            None => Initializer::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_in_range() {
        let mut init = Initializer::from_seed(11);
        let w = init.weights(7, 50);
        assert_eq!((w.rows(), w.cols()), (7, 50));
        for i in 0..w.rows() {
            assert!(w.row(i).iter().all(|x| x.abs() <= WEIGHT_RANGE));
        }
    }

    #[test]
    fn seeded_is_reproducible() {
        let a = Initializer::from_seed(5).weights(3, 4);
        let b = Initializer::from_seed(5).weights(3, 4);
        let c = Initializer::from_seed(6).weights(3, 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn biases_are_constant() {
        assert_eq!(Initializer::from_seed(0).biases(3), vec![0.01; 3]);
    }
}
