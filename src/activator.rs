//! The [rectified linear](https://en.wikipedia.org/wiki/Rectifier_(neural_networks))
//! activation function.

/// Evaluates `f(x) = max(x, 0)`.
#[inline]
pub fn activate(x: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
///
/// Note that this function takes in the *output* of the activation function,
/// rather than the input. This means we don't have to store the intermediate
/// results before activation. It only holds for ReLU, where `f(x) > 0`
/// exactly when `x > 0`.
#[inline]
pub fn activate_derivative(y: f32) -> f32 {
    if y > 0.0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_positive_values() {
        for &x in &[1e-6, 0.5, 1.0, 42.0] {
            assert_eq!(activate(x), x);
        }
    }

    #[test]
    fn clamps_non_positive_values() {
        for &x in &[0.0, -0.0, -1e-6, -3.5] {
            assert_eq!(activate(x), 0.0);
        }
    }

    #[test]
    fn derivative_is_a_step() {
        assert_eq!(activate_derivative(2.0), 1.0);
        assert_eq!(activate_derivative(1e-6), 1.0);
        assert_eq!(activate_derivative(0.0), 0.0);
        assert_eq!(activate_derivative(-2.0), 0.0);
    }

    #[test]
    fn derivative_agrees_on_activated_values() {
        for &x in &[-2.0f32, -0.1, 0.0, 0.1, 2.0] {
            let expected = if x > 0.0 { 1.0 } else { 0.0 };
            assert_eq!(activate_derivative(activate(x)), expected);
        }
    }
}
