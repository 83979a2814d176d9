//! Zero-copy views between dense tensors and faer matrices.

use faer::{Mat, MatMut, MatRef};

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::space::Space;
use crate::storage::ComponentStorage;
use crate::tensor::{DenseTensor, Tensor};

/// Row and column counts of a space with two index factors.
///
/// Accepts a two-factor tensor product or an order-2 symmetric or exterior
/// power.
///
/// # Errors
///
/// `NotAMatrix` for anything else.
pub fn matrix_shape(space: &Space) -> Result<(usize, usize), TensorError> {
    match space.factor_spaces() {
        [rows, cols] if space.is_composite() => Ok((rows.dimension(), cols.dimension())),
        factors => Err(TensorError::NotAMatrix {
            factors: factors.len(),
        }),
    }
}

fn product_matrix_shape(space: &Space) -> Result<(usize, usize), TensorError> {
    if !space.is_tensor_product() {
        return Err(TensorError::NotAMatrix { factors: 1 });
    }
    matrix_shape(space)
}

/// View a dense tensor on a two-factor tensor product as a faer matrix.
pub trait AsFaerMat<T: Scalar> {
    /// View tensor data as an immutable faer matrix (zero-copy).
    ///
    /// # Example
    ///
    /// ```
    /// use symtensors::{DenseTensor, Space};
    /// use symtensors::backend::AsFaerMat;
    ///
    /// let v = Space::vector("V", 2).unwrap();
    /// let w = Space::vector("W", 3).unwrap();
    /// let t = DenseTensor::from_components(
    ///     Space::tensor_product(vec![v, w]).unwrap(),
    ///     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    /// )
    /// .unwrap();
    /// let mat = t.as_faer_mat().unwrap();
    /// assert_eq!((mat.nrows(), mat.ncols()), (2, 3));
    /// assert_eq!(mat[(1, 0)], 4.0);
    /// ```
    fn as_faer_mat(&self) -> Result<MatRef<'_, T>, TensorError>;

    /// View tensor data as a mutable faer matrix (zero-copy).
    fn as_faer_mat_mut(&mut self) -> Result<MatMut<'_, T>, TensorError>;
}

impl<T: Scalar> AsFaerMat<T> for DenseTensor<T> {
    fn as_faer_mat(&self) -> Result<MatRef<'_, T>, TensorError> {
        let (rows, cols) = product_matrix_shape(self.space())?;
        Ok(MatRef::from_row_major_slice(self.data(), rows, cols))
    }

    fn as_faer_mat_mut(&mut self) -> Result<MatMut<'_, T>, TensorError> {
        let (rows, cols) = product_matrix_shape(self.space())?;
        Ok(MatMut::from_row_major_slice_mut(self.data_mut(), rows, cols))
    }
}

/// Copy any order-2 tensor into an owned faer matrix.
///
/// Symmetric and exterior powers are expanded: entry `(i, j)` is the
/// tensor's value at multi-index `(i, j)`.
pub fn faer_mat_from_tensor<T, S>(tensor: &Tensor<T, S>) -> Result<Mat<T>, TensorError>
where
    T: Scalar,
    S: ComponentStorage<T>,
{
    let (rows, cols) = matrix_shape(tensor.space())?;
    let codec = tensor.space().codec();
    Ok(Mat::from_fn(rows, cols, |i, j| match codec.rank(&[i, j]) {
        Some(slot) => slot.sign.apply(tensor.storage().component(slot.index)),
        None => T::zero(),
    }))
}

/// Copy a faer matrix into a dense tensor on a two-factor tensor product.
///
/// # Errors
///
/// `NotAMatrix` if `space` is not a two-factor tensor product, and
/// `ShapeMismatch` if the matrix does not match its factor dimensions.
pub fn tensor_from_faer_mat<T: Scalar>(
    space: Space,
    mat: MatRef<'_, T>,
) -> Result<DenseTensor<T>, TensorError> {
    let (rows, cols) = product_matrix_shape(&space)?;
    if (mat.nrows(), mat.ncols()) != (rows, cols) {
        return Err(TensorError::ShapeMismatch {
            expected: rows * cols,
            actual: mat.nrows() * mat.ncols(),
        });
    }

    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            data.push(mat[(i, j)]);
        }
    }
    DenseTensor::from_components(space, data)
}
