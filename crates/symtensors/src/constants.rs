//! Structural constants backed by procedural storage.
//!
//! Each constructor is cheap (no component memory), so callers create them
//! where needed and clone the handle freely.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::space::Space;
use crate::tensor::ProceduralTensor;

/// Identity map on `v`, as a tensor on `v ⊗ v*`.
///
/// Contracting its second slot with a vector returns the vector.
pub fn identity<T: Scalar>(v: &Space) -> Result<ProceduralTensor<T>, TensorError> {
    let n = v.dimension();
    let space = Space::tensor_product(vec![v.clone(), v.dual()])?;
    Ok(ProceduralTensor::procedural(space, move |i| {
        if i / n == i % n { T::one() } else { T::zero() }
    }))
}

/// The Euclidean inner product on `v`, as a tensor on `Sym^2(v*)`.
pub fn euclidean_metric<T: Scalar>(v: &Space) -> Result<ProceduralTensor<T>, TensorError> {
    diagonal_form(&v.dual())
}

/// The inverse Euclidean metric, as a tensor on `Sym^2(v)`.
pub fn euclidean_inverse_metric<T: Scalar>(v: &Space) -> Result<ProceduralTensor<T>, TensorError> {
    diagonal_form(v)
}

fn diagonal_form<T: Scalar>(v: &Space) -> Result<ProceduralTensor<T>, TensorError> {
    let space = Space::symmetric_power(v, 2)?;
    let handle = space.clone();
    Ok(ProceduralTensor::procedural(space, move |i| {
        let m = handle.codec().unrank(i);
        if m[0] == m[1] { T::one() } else { T::zero() }
    }))
}

/// Volume form on `v`: the single component of `Λ^n(v*)`, `n = dim v`.
pub fn volume_form<T: Scalar>(v: &Space) -> Result<ProceduralTensor<T>, TensorError> {
    let space = Space::exterior_power(&v.dual(), v.dimension())?;
    Ok(ProceduralTensor::procedural(space, |_| T::one()))
}

/// The zero tensor on any space.
pub fn zero<T: Scalar>(space: Space) -> ProceduralTensor<T> {
    ProceduralTensor::procedural(space, |_| T::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Check;

    #[test]
    fn test_identity() {
        let v = Space::vector("V", 3).unwrap();
        let id = identity::<f64>(&v).unwrap();
        assert_eq!(id.get(&[1, 1], Check::Enforced), Ok(1.0));
        assert_eq!(id.get(&[1, 2], Check::Enforced), Ok(0.0));
        assert_eq!(id.size_in_bytes(), 0);
    }

    #[test]
    fn test_metric_is_diagonal() {
        let v = Space::vector("V", 3).unwrap();
        let g = euclidean_metric::<f64>(&v).unwrap();
        assert_eq!(g.len(), 6);
        assert_eq!(g.space(), &Space::symmetric_power(&v.dual(), 2).unwrap());
        let values: Vec<f64> = g.components().collect();
        assert_eq!(values, vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_volume_form_sign() {
        let v = Space::vector("V", 3).unwrap();
        let eps = volume_form::<f64>(&v).unwrap();
        assert_eq!(eps.get(&[0, 1, 2], Check::Enforced), Ok(1.0));
        assert_eq!(eps.get(&[1, 0, 2], Check::Enforced), Ok(-1.0));
        assert_eq!(eps.get(&[0, 0, 2], Check::Enforced), Ok(0.0));
    }

    #[test]
    fn test_zero() {
        let v = Space::vector("V", 4).unwrap();
        let z = zero::<f64>(v);
        assert!(z.components().all(|x| x == 0.0));
    }
}
