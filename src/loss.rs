//! Squared-error loss.
//!
//! The loss is a plain sum over the output width. It is not averaged, and
//! `loss_gradient` is its exact derivative with respect to `output`.

/// Computes `Σ (output[i] - target[i])²`.
pub fn loss(output: &[f32], target: &[f32]) -> f32 {
    assert_eq!(output.len(), target.len());
    output
        .iter()
        .zip(target)
        .map(|(o, t)| (o - t) * (o - t))
        .sum()
}

/// Writes `2 * (output[i] - target[i])` into `gradient`.
pub fn loss_gradient(output: &[f32], target: &[f32], gradient: &mut [f32]) {
    assert_eq!(output.len(), target.len());
    assert_eq!(output.len(), gradient.len());
    for ((g, o), t) in gradient.iter_mut().zip(output).zip(target) {
        *g = 2.0 * (o - t);
    }
}

/// Allocating form of `loss_gradient`.
pub fn loss_gradient_vec(output: &[f32], target: &[f32]) -> Vec<f32> {
    let mut gradient = vec![0.0; output.len()];
    loss_gradient(output, target, &mut gradient);
    gradient
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, len: usize) -> Vec<f32> {
        (0..len).map(|_| rng.gen_range(-10.0..10.0)).collect()
    }

    #[test]
    fn known_value() {
        assert_eq!(loss(&[1.0, 0.0, 3.0], &[0.0, 0.0, 1.0]), 5.0);
    }

    #[test]
    fn non_negative() {
        let mut rng = StdRng::seed_from_u64(1);
        for len in 1..20 {
            let a = random_vec(&mut rng, len);
            let b = random_vec(&mut rng, len);
            assert!(loss(&a, &b) >= 0.0);
            assert_eq!(loss(&a, &a), 0.0);
        }
    }

    #[test]
    fn gradient_matches_definition() {
        let mut rng = StdRng::seed_from_u64(2);
        for len in 1..20 {
            let a = random_vec(&mut rng, len);
            let b = random_vec(&mut rng, len);
            let g = loss_gradient_vec(&a, &b);
            for i in 0..len {
                assert_eq!(g[i], 2.0 * (a[i] - b[i]));
            }
        }
    }

    #[test]
    fn empty_vectors() {
        assert_eq!(loss(&[], &[]), 0.0);
        assert!(loss_gradient_vec(&[], &[]).is_empty());
    }

    #[test]
    #[should_panic]
    fn length_mismatch() {
        loss(&[1.0, 2.0], &[1.0]);
    }
}
