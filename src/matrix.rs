use crate::utils::ZeroOut;

use rand::distributions::Distribution;
use rand::Rng;
use std::ops::{Index, IndexMut};

/// A dense `rows x cols` matrix of `f32`.
///
/// Weight matrices use one row per layer input and one column per layer
/// output, so `self[(i, o)]` is the weight from input `i` to output `o`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f32>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn random<D, R>(distribution: D, rng: &mut R, rows: usize, cols: usize) -> Self
    where
        D: Distribution<f32>,
        R: Rng + ?Sized,
    {
        let data = distribution.sample_iter(rng).take(rows * cols).collect();
        Mat { rows, cols, data }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Panics if the rows are not all the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "matrix rows must have equal length");
            data.extend_from_slice(row);
        }
        Mat {
            rows: rows.len(),
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i` as a slice of length `cols`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Subtracts `rate * delta` from every element.
    pub fn apply_delta(&mut self, rate: f32, delta: &Mat) {
        assert_eq!((self.rows, self.cols), (delta.rows, delta.cols));
        for (w, d) in self.data.iter_mut().zip(delta.data.iter()) {
            *w -= rate * d;
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.row(row)[col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.row_mut(row)[col]
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn from_rows_is_row_major() {
        let m = Mat::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m[(0, 2)], 3.0);
    }

    #[test]
    #[should_panic]
    fn ragged_rows() {
        Mat::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Mat::random(Uniform::new_inclusive(-0.5f32, 0.5), &mut rng, 10, 20);
        assert_eq!((m.rows(), m.cols()), (10, 20));
        for i in 0..m.rows() {
            assert!(m.row(i).iter().all(|w| (-0.5..=0.5).contains(w)));
        }
    }

    #[test]
    fn apply_delta_descends() {
        let mut m = Mat::from_rows(&[vec![1.0, 1.0]]);
        let delta = Mat::from_rows(&[vec![2.0, -4.0]]);
        m.apply_delta(0.5, &delta);
        assert_eq!(m.row(0), &[0.0, 3.0]);
    }

    #[test]
    fn zero_out() {
        let mut m = Mat::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        m.zero_out();
        assert_eq!(m, Mat::zeros(2, 2));
    }
}
