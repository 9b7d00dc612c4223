//! Vector and matrix norm computations

use crate::precision::Precision;
use ndarray::{ArrayView1, ArrayView2};

/// Compute the 2-norm (Euclidean norm) of a vector
///
/// The sum is scaled by the largest entry so that tiny columns do not
/// underflow before the square root is taken.
pub fn norm_2<T: Precision>(vec: ArrayView1<T>) -> T {
    let scale = norm_inf(vec);
    if scale == T::zero() {
        return T::zero();
    }
    let mut sum = T::zero();
    for &val in vec.iter() {
        let r = val / scale;
        sum += r * r;
    }
    scale * sum.sqrt()
}

/// Compute the Frobenius norm of a matrix
pub fn norm_frobenius<T: Precision>(mat: ArrayView2<T>) -> T {
    let mut sum = T::zero();
    for &val in mat.iter() {
        sum += val * val;
    }
    sum.sqrt()
}

/// Compute the maximum absolute value in a vector
pub fn norm_inf<T: Precision>(vec: ArrayView1<T>) -> T {
    vec.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max<T: Precision>(mat: ArrayView2<T>) -> T {
    mat.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
}
