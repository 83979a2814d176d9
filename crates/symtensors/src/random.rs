//! Random tensor construction.
//!
//! Random tensors draw one value per compact component, so a random
//! symmetric tensor is exactly symmetric.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::scalar::{Scalar, c64};
use crate::space::Space;
use crate::tensor::DenseTensor;

/// Component types that can be drawn at random.
pub trait RandomScalar: Scalar {
    /// Uniform on `[0, 1)`; complex values draw both parts independently.
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;

    /// Standard normal. Complex values have `E|z|^2 = 1`.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomScalar for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }

    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomScalar for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }

    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

fn sample_components<ElT, R, F>(space: Space, rng: &mut R, mut draw: F) -> DenseTensor<ElT>
where
    ElT: Scalar,
    R: Rng,
    F: FnMut(&mut R) -> ElT,
{
    let data = (0..space.dimension()).map(|_| draw(rng)).collect();
    DenseTensor::from_parts(space, data)
}

impl<ElT: RandomScalar> DenseTensor<ElT> {
    /// Uniform components in `[0, 1)`, one draw per stored component.
    ///
    /// # Example
    ///
    /// ```
    /// use symtensors::{DenseTensor, Space};
    ///
    /// let v = Space::vector("V", 3).unwrap();
    /// let t: DenseTensor<f64> = DenseTensor::random(Space::symmetric_power(&v, 2).unwrap());
    /// assert_eq!(t.len(), 6);
    /// assert!(t.components().all(|x| (0.0..1.0).contains(&x)));
    /// ```
    pub fn random(space: Space) -> Self {
        Self::random_with_rng(space, &mut rand::rng())
    }

    /// Uniform components from a caller-supplied RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use symtensors::{DenseTensor, Space};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let v = Space::vector("V", 4).unwrap();
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t1: DenseTensor<f64> = DenseTensor::random_with_rng(v.clone(), &mut rng);
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t2: DenseTensor<f64> = DenseTensor::random_with_rng(v, &mut rng);
    /// assert_eq!(t1.data(), t2.data());
    /// ```
    pub fn random_with_rng<R: Rng>(space: Space, rng: &mut R) -> Self {
        sample_components(space, rng, |r| ElT::sample_uniform(r))
    }

    /// Standard normal components from the thread RNG.
    pub fn randn(space: Space) -> Self {
        Self::randn_with_rng(space, &mut rand::rng())
    }

    pub fn randn_with_rng<R: Rng>(space: Space, rng: &mut R) -> Self {
        sample_components(space, rng, |r| ElT::sample_normal(r))
    }
}
