//! Stride computation utilities.
//!
//! Tensor products are laid out row-major: the last factor varies fastest.

/// Compute row-major strides from factor dimensions.
///
/// For dimensions [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use symtensors::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; dims.len()];
    let mut stride = 1;

    for (slot, &dim) in strides.iter_mut().zip(dims.iter()).rev() {
        *slot = stride;
        stride *= dim;
    }

    strides
}

/// Product of the dimensions, or `None` on overflow.
///
/// The empty product is 1 (the scalar space).
pub fn checked_volume(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Convert per-factor indices to a flat index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a flat index to per-factor indices, row-major.
pub fn linear_to_cartesian(mut linear: usize, dims: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; dims.len()];

    for (slot, &dim) in indices.iter_mut().zip(dims.iter()).rev() {
        *slot = linear % dim;
        linear /= dim;
    }

    indices
}
