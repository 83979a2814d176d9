//! Vector spaces and their tensor, symmetric and exterior powers.
//!
//! The algebraic structure of a space is carried as a runtime tag:
//!
//! ```text
//! Space
//! ├── Base          - named vector space (or its dual), dimension n
//! ├── TensorProduct - ordered factors, dimension = product of factor dims
//! └── Power         - k copies of one factor, Symmetric or Alternating
//! ```
//!
//! A `Space` is a cheap handle (`Arc`). Its codec is interned: equal spaces
//! and duals of each other hold the same codec allocation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::codec::MultiIndexCodec;
use crate::error::{MismatchReason, TensorError};

/// Which side of the duality pairing a base space sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// Vectors (upper indices).
    Contravariant,
    /// Covectors (lower indices).
    Covariant,
}

impl Variance {
    pub fn dual(self) -> Self {
        match self {
            Variance::Contravariant => Variance::Covariant,
            Variance::Covariant => Variance::Contravariant,
        }
    }
}

/// Which orderings of a multi-index address the same component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Plain tensor product: every ordering is distinct.
    None,
    /// Any permutation addresses the same component.
    Symmetric,
    /// Any permutation addresses the same component up to its sign.
    Alternating,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Kind {
    Base {
        name: Arc<str>,
        dimension: usize,
        variance: Variance,
    },
    TensorProduct,
    Power(Symmetry),
}

struct SpaceInner {
    kind: Kind,
    factors: Vec<Space>,
    codec: Arc<MultiIndexCodec>,
}

/// Handle to an immutable vector space.
///
/// Equality is structural: two spaces built from the same name, dimension,
/// variance and construction are equal even when built separately.
#[derive(Clone)]
pub struct Space {
    inner: Arc<SpaceInner>,
}

impl Space {
    fn build(kind: Kind, factors: Vec<Space>, codec: Arc<MultiIndexCodec>) -> Self {
        Self {
            inner: Arc::new(SpaceInner {
                kind,
                factors,
                codec,
            }),
        }
    }

    /// A contravariant base space.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for dimension 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::Space;
    ///
    /// let v = Space::vector("V", 3).unwrap();
    /// assert_eq!(v.dimension(), 3);
    /// assert!(v.dual().is_dual_of(&v));
    /// ```
    pub fn vector(name: &str, dimension: usize) -> Result<Self, TensorError> {
        if dimension == 0 {
            return Err(TensorError::InvalidArgument {
                message: format!("space {name} has dimension 0"),
            });
        }
        let codec = MultiIndexCodec::shared_product(&[dimension])?;
        Ok(Self::build(
            Kind::Base {
                name: Arc::from(name),
                dimension,
                variance: Variance::Contravariant,
            },
            Vec::new(),
            codec,
        ))
    }

    /// The one-dimensional space of scalars (the empty tensor product).
    pub fn scalar() -> Self {
        Self::build(Kind::TensorProduct, Vec::new(), MultiIndexCodec::shared_scalar())
    }

    /// Tensor product of the given factors, in order.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the dimension overflows.
    pub fn tensor_product(factors: Vec<Space>) -> Result<Self, TensorError> {
        let dims: Vec<usize> = factors.iter().map(Space::dimension).collect();
        let codec = MultiIndexCodec::shared_product(&dims)?;
        Ok(Self::build(Kind::TensorProduct, factors, codec))
    }

    /// `order` copies of `factor` under the plain tensor product.
    pub fn tensor_power(factor: &Space, order: usize) -> Result<Self, TensorError> {
        if order == 0 {
            return Err(TensorError::InvalidArgument {
                message: "tensor power of order 0".into(),
            });
        }
        Self::tensor_product(vec![factor.clone(); order])
    }

    /// Symmetric power: components indexed by non-decreasing multi-indices.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::{Space, Symmetry};
    ///
    /// let v = Space::vector("V", 4).unwrap();
    /// let s = Space::symmetric_power(&v, 2).unwrap();
    /// assert_eq!(s.dimension(), 10);
    /// assert_eq!(s.symmetry_class(), Symmetry::Symmetric);
    /// ```
    pub fn symmetric_power(factor: &Space, order: usize) -> Result<Self, TensorError> {
        let codec = MultiIndexCodec::shared_symmetric(factor.dimension(), order)?;
        Ok(Self::build(
            Kind::Power(Symmetry::Symmetric),
            vec![factor.clone(); order],
            codec,
        ))
    }

    /// Exterior power: components indexed by strictly increasing
    /// multi-indices.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `order` is 0 or exceeds the factor dimension.
    pub fn exterior_power(factor: &Space, order: usize) -> Result<Self, TensorError> {
        let codec = MultiIndexCodec::shared_alternating(factor.dimension(), order)?;
        Ok(Self::build(
            Kind::Power(Symmetry::Alternating),
            vec![factor.clone(); order],
            codec,
        ))
    }

    /// Number of component slots.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.inner.codec.dimension()
    }

    /// Ordered factor spaces; empty for a base space.
    #[inline]
    pub fn factor_spaces(&self) -> &[Space] {
        &self.inner.factors
    }

    /// Number of factors; 0 for a base space.
    #[inline]
    pub fn order(&self) -> usize {
        self.inner.factors.len()
    }

    pub fn symmetry_class(&self) -> Symmetry {
        match self.inner.kind {
            Kind::Power(symmetry) => symmetry,
            _ => Symmetry::None,
        }
    }

    #[inline]
    pub fn codec(&self) -> &MultiIndexCodec {
        &self.inner.codec
    }

    pub fn is_base(&self) -> bool {
        matches!(self.inner.kind, Kind::Base { .. })
    }

    pub fn is_tensor_product(&self) -> bool {
        matches!(self.inner.kind, Kind::TensorProduct)
    }

    /// Whether this is a tensor product or power with a factor list that
    /// `split`/`bundle` can decompose into.
    pub fn is_composite(&self) -> bool {
        !self.is_base() && !self.inner.factors.is_empty()
    }

    /// Variance shared by every base space inside, if uniform.
    pub fn variance(&self) -> Option<Variance> {
        match &self.inner.kind {
            Kind::Base { variance, .. } => Some(*variance),
            _ => {
                let mut variances = self.inner.factors.iter().map(Space::variance);
                let first = variances.next()??;
                variances.all(|v| v == Some(first)).then_some(first)
            }
        }
    }

    /// The spaces an expression leaf attaches one abstract index to each:
    /// the factors of a tensor product, otherwise the space itself.
    pub fn index_factors(&self) -> &[Space] {
        if self.is_tensor_product() {
            &self.inner.factors
        } else {
            std::slice::from_ref(self)
        }
    }

    /// The dual space: every base space inside has its variance flipped.
    pub fn dual(&self) -> Space {
        let kind = match &self.inner.kind {
            Kind::Base {
                name,
                dimension,
                variance,
            } => Kind::Base {
                name: name.clone(),
                dimension: *dimension,
                variance: variance.dual(),
            },
            other => other.clone(),
        };
        let factors = self.inner.factors.iter().map(Space::dual).collect();
        Self::build(kind, factors, Arc::clone(&self.inner.codec))
    }

    /// Whether `other` equals `self.dual()`, compared without building it.
    pub fn is_dual_of(&self, other: &Space) -> bool {
        let kinds_pair = match (&self.inner.kind, &other.inner.kind) {
            (
                Kind::Base {
                    name,
                    dimension,
                    variance,
                },
                Kind::Base {
                    name: other_name,
                    dimension: other_dimension,
                    variance: other_variance,
                },
            ) => {
                name == other_name
                    && dimension == other_dimension
                    && *variance == other_variance.dual()
            }
            (kind, other_kind) => kind == other_kind,
        };
        kinds_pair
            && self.inner.factors.len() == other.inner.factors.len()
            && self
                .inner
                .factors
                .iter()
                .zip(&other.inner.factors)
                .all(|(a, b)| a.is_dual_of(b))
    }
}

/// Whether two occurrences of one abstract index may be contracted.
pub(crate) fn check_pairing(index: char, a: &Space, b: &Space) -> Result<(), MismatchReason> {
    if a.dimension() != b.dimension() {
        return Err(MismatchReason::DimensionMismatch {
            index,
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    if let (Some(va), Some(vb)) = (a.variance(), b.variance()) {
        if va == vb {
            return Err(MismatchReason::SameVariance { index });
        }
    }
    if !a.is_dual_of(b) {
        return Err(MismatchReason::NotDual { index });
    }
    Ok(())
}

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.kind == other.inner.kind && self.inner.factors == other.inner.factors)
    }
}

impl Eq for Space {}

impl Hash for Space {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.kind.hash(state);
        self.inner.factors.hash(state);
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Base { name, variance, .. } => match variance {
                Variance::Contravariant => write!(f, "{name}"),
                Variance::Covariant => write!(f, "{name}*"),
            },
            Kind::TensorProduct if self.inner.factors.is_empty() => write!(f, "Scalars"),
            Kind::TensorProduct => {
                for (n, factor) in self.inner.factors.iter().enumerate() {
                    if n > 0 {
                        write!(f, " ⊗ ")?;
                    }
                    if factor.is_tensor_product() {
                        write!(f, "({factor})")?;
                    } else {
                        write!(f, "{factor}")?;
                    }
                }
                Ok(())
            }
            Kind::Power(symmetry) => {
                let symbol = match symmetry {
                    Symmetry::Alternating => "Λ",
                    _ => "Sym",
                };
                write!(f, "{symbol}^{}({})", self.order(), self.inner.factors[0])
            }
        }
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Space({self}, dim {})", self.dimension())
    }
}
