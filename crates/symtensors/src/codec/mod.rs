//! Bijections between multi-indices and compact component indices.
//!
//! Spaces obtain codecs through an interning table keyed by symmetry class
//! and dimensions, so structurally equal spaces, their duals and every tensor
//! on them share one allocation. An entry lives as long as some space holds
//! it.
//!
//! ```text
//! MultiIndexCodec
//! ├── Product     - mixed radix, row-major (last factor fastest)
//! ├── Symmetric   - rank among non-decreasing tuples, C(n+k-1, k) slots
//! └── Alternating - rank among strictly increasing tuples, C(n, k) slots, signed
//! ```
//!
//! Powers use colexicographic order: a strictly increasing tuple
//! `c_0 < c_1 < ... < c_{k-1}` has rank `sum_j C(c_j, j + 1)`, and a
//! non-decreasing tuple `a` is first shifted to `c_j = a_j + j`. For order 2
//! this enumerates `(0,0), (0,1), (1,1), (0,2), (1,2), (2,2), ...`.

pub mod binomial;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, Weak};

use tracing::debug;

use crate::error::{Check, TensorError};
use crate::multi_index::{ComponentIndex, MultiIndex, Sign};
use crate::space::Symmetry;
use crate::strides::{cartesian_to_linear, checked_volume, compute_strides, linear_to_cartesian};

use binomial::{BinomialTable, binomial, factorial};

/// A component index together with the sign picked up while canonicalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedIndex {
    pub index: ComponentIndex,
    pub sign: Sign,
}

impl SignedIndex {
    #[inline]
    fn plus(index: ComponentIndex) -> Self {
        Self {
            index,
            sign: Sign::Plus,
        }
    }
}

/// Codec for one space, dispatched on its symmetry class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiIndexCodec {
    Product(ProductCodec),
    Symmetric(PowerCodec),
    Alternating(PowerCodec),
}

/// Mixed-radix codec for a tensor product of arbitrary factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCodec {
    dims: Vec<usize>,
    strides: Vec<usize>,
    dimension: usize,
}

/// Combinatorial codec for a symmetric or exterior power of one factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCodec {
    factor_dim: usize,
    order: usize,
    dimension: usize,
    table: BinomialTable,
}

impl ProductCodec {
    fn new(dims: &[usize]) -> Result<Self, TensorError> {
        let dimension = checked_volume(dims).ok_or_else(|| overflow(dims.len()))?;
        Ok(Self {
            dims: dims.to_vec(),
            strides: compute_strides(dims),
            dimension,
        })
    }
}

impl PowerCodec {
    fn new(factor_dim: usize, order: usize, symmetric: bool) -> Result<Self, TensorError> {
        if order == 0 || factor_dim == 0 {
            return Err(TensorError::InvalidArgument {
                message: format!("power of order {order} over dimension {factor_dim}"),
            });
        }
        if !symmetric && order > factor_dim {
            return Err(TensorError::InvalidArgument {
                message: format!(
                    "exterior power of order {order} over dimension {factor_dim} has no components"
                ),
            });
        }
        // Largest shifted digit plus one.
        let ceiling = if symmetric {
            factor_dim
                .checked_add(order - 1)
                .ok_or_else(|| overflow(order))?
        } else {
            factor_dim
        };
        let dimension = binomial(ceiling, order).ok_or_else(|| overflow(order))?;
        let table = BinomialTable::new(ceiling, order).ok_or_else(|| overflow(order))?;
        Ok(Self {
            factor_dim,
            order,
            dimension,
            table,
        })
    }

    /// Rank of a strictly increasing tuple.
    #[inline]
    fn rank_increasing(&self, c: &[usize]) -> ComponentIndex {
        c.iter()
            .enumerate()
            .map(|(j, &x)| self.table.get(x, j + 1))
            .sum()
    }

    /// Inverse of `rank_increasing`: greedy unranking from the top digit.
    fn unrank_increasing(&self, index: ComponentIndex, ceiling: usize) -> MultiIndex {
        let mut digits = MultiIndex::zeros(self.order);
        let mut remaining = index;
        let mut hi = ceiling;
        for j in (0..self.order).rev() {
            // Largest x in [j, hi) with C(x, j + 1) <= remaining; C(j, j + 1) = 0.
            let (mut lo, mut up) = (j, hi);
            while up - lo > 1 {
                let mid = lo + (up - lo) / 2;
                if self.table.get(mid, j + 1) <= remaining {
                    lo = mid;
                } else {
                    up = mid;
                }
            }
            digits.as_mut_slice()[j] = lo;
            remaining -= self.table.get(lo, j + 1);
            hi = lo;
        }
        digits
    }
}

fn overflow(order: usize) -> TensorError {
    TensorError::InvalidArgument {
        message: format!("dimension of order-{order} space overflows usize"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CodecKey {
    Product(Vec<usize>),
    Symmetric(usize, usize),
    Alternating(usize, usize),
}

static CODECS: LazyLock<Mutex<HashMap<CodecKey, Weak<MultiIndexCodec>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static SCALAR: LazyLock<Arc<MultiIndexCodec>> =
    LazyLock::new(|| Arc::new(MultiIndexCodec::scalar()));

/// Return the live codec for `key`, building it on a miss.
fn intern(
    key: CodecKey,
    build: impl FnOnce() -> Result<MultiIndexCodec, TensorError>,
) -> Result<Arc<MultiIndexCodec>, TensorError> {
    let mut codecs = CODECS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(codec) = codecs.get(&key).and_then(Weak::upgrade) {
        return Ok(codec);
    }
    let codec = Arc::new(build()?);
    debug!(?key, dimension = codec.dimension(), "built codec");
    codecs.retain(|_, weak| weak.strong_count() > 0);
    codecs.insert(key, Arc::downgrade(&codec));
    Ok(codec)
}

impl MultiIndexCodec {
    /// Codec for a tensor product with the given factor dimensions.
    pub fn product(dims: &[usize]) -> Result<Self, TensorError> {
        Ok(Self::Product(ProductCodec::new(dims)?))
    }

    /// Codec of the one-dimensional scalar space (empty tensor product).
    pub(crate) fn scalar() -> Self {
        Self::Product(ProductCodec {
            dims: Vec::new(),
            strides: Vec::new(),
            dimension: 1,
        })
    }

    /// Codec for the order-`order` symmetric power of a `factor_dim` space.
    pub fn symmetric(factor_dim: usize, order: usize) -> Result<Self, TensorError> {
        Ok(Self::Symmetric(PowerCodec::new(factor_dim, order, true)?))
    }

    /// Codec for the order-`order` exterior power of a `factor_dim` space.
    pub fn alternating(factor_dim: usize, order: usize) -> Result<Self, TensorError> {
        Ok(Self::Alternating(PowerCodec::new(factor_dim, order, false)?))
    }

    /// The one scalar codec.
    pub(crate) fn shared_scalar() -> Arc<Self> {
        Arc::clone(&SCALAR)
    }

    /// Interned product codec.
    pub(crate) fn shared_product(dims: &[usize]) -> Result<Arc<Self>, TensorError> {
        if dims.is_empty() {
            return Ok(Self::shared_scalar());
        }
        intern(CodecKey::Product(dims.to_vec()), || Self::product(dims))
    }

    /// Interned symmetric power codec.
    pub(crate) fn shared_symmetric(
        factor_dim: usize,
        order: usize,
    ) -> Result<Arc<Self>, TensorError> {
        intern(CodecKey::Symmetric(factor_dim, order), || {
            Self::symmetric(factor_dim, order)
        })
    }

    /// Interned exterior power codec.
    pub(crate) fn shared_alternating(
        factor_dim: usize,
        order: usize,
    ) -> Result<Arc<Self>, TensorError> {
        intern(CodecKey::Alternating(factor_dim, order), || {
            Self::alternating(factor_dim, order)
        })
    }

    /// Number of component slots.
    #[inline]
    pub fn dimension(&self) -> usize {
        match self {
            Self::Product(p) => p.dimension,
            Self::Symmetric(p) | Self::Alternating(p) => p.dimension,
        }
    }

    /// Length of the multi-indices this codec accepts.
    #[inline]
    pub fn order(&self) -> usize {
        match self {
            Self::Product(p) => p.dims.len(),
            Self::Symmetric(p) | Self::Alternating(p) => p.order,
        }
    }

    /// Dimension of factor `j`.
    #[inline]
    pub fn factor_dim(&self, j: usize) -> usize {
        match self {
            Self::Product(p) => p.dims[j],
            Self::Symmetric(p) | Self::Alternating(p) => p.factor_dim,
        }
    }

    pub fn symmetry(&self) -> Symmetry {
        match self {
            Self::Product(_) => Symmetry::None,
            Self::Symmetric(_) => Symmetry::Symmetric,
            Self::Alternating(_) => Symmetry::Alternating,
        }
    }

    /// Map a multi-index to its component slot.
    ///
    /// Any ordering is accepted; symmetric and alternating powers sort it
    /// first. Returns `Ok(None)` for an alternating multi-index with a
    /// repeated entry: that entry is identically zero.
    ///
    /// # Errors
    ///
    /// `WrongNumberOfIndices` if the length differs from the order, and
    /// `IndexOutOfBounds` for an entry outside its factor (only with
    /// `Check::Enforced`).
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::codec::MultiIndexCodec;
    /// use symtensors::{Check, Sign};
    ///
    /// let sym = MultiIndexCodec::symmetric(3, 2).unwrap();
    /// let slot = sym.bundle(&[2, 0], Check::Enforced).unwrap().unwrap();
    /// assert_eq!(slot.index, 3); // (0, 2) is the fourth canonical pair
    ///
    /// let alt = MultiIndexCodec::alternating(3, 2).unwrap();
    /// let slot = alt.bundle(&[2, 0], Check::Enforced).unwrap().unwrap();
    /// assert_eq!(slot.sign, Sign::Minus);
    /// assert_eq!(alt.bundle(&[1, 1], Check::Enforced).unwrap(), None);
    /// ```
    pub fn bundle(
        &self,
        multi_index: &[usize],
        check: Check,
    ) -> Result<Option<SignedIndex>, TensorError> {
        self.validate(multi_index, check)?;
        Ok(self.rank(multi_index))
    }

    /// Length is always checked; entry ranges only with `Check::Enforced`.
    fn validate(&self, multi_index: &[usize], check: Check) -> Result<(), TensorError> {
        if multi_index.len() != self.order() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.order(),
                actual: multi_index.len(),
            });
        }
        if check.enforced() {
            for (j, &i) in multi_index.iter().enumerate() {
                let dim_size = self.factor_dim(j);
                if i >= dim_size {
                    return Err(TensorError::IndexOutOfBounds { index: i, dim_size });
                }
            }
        }
        Ok(())
    }

    /// Unchecked `bundle`; the caller guarantees length and ranges.
    pub(crate) fn rank(&self, multi_index: &[usize]) -> Option<SignedIndex> {
        match self {
            Self::Product(p) => Some(SignedIndex::plus(cartesian_to_linear(
                multi_index,
                &p.strides,
            ))),
            Self::Symmetric(p) => {
                let mut sorted = MultiIndex::new(multi_index);
                sorted.as_mut_slice().sort_unstable();
                for (j, x) in sorted.as_mut_slice().iter_mut().enumerate() {
                    *x += j;
                }
                Some(SignedIndex::plus(p.rank_increasing(sorted.as_slice())))
            }
            Self::Alternating(p) => {
                let (sorted, sign) = MultiIndex::new(multi_index).sorted_with_sign();
                if !sorted.is_strictly_increasing() {
                    return None;
                }
                Some(SignedIndex {
                    index: p.rank_increasing(sorted.as_slice()),
                    sign,
                })
            }
        }
    }

    /// Map a component slot back to its canonical multi-index.
    ///
    /// Exact inverse of [`bundle`](Self::bundle) on canonical input:
    /// non-decreasing for symmetric powers, strictly increasing for exterior
    /// powers.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index >= dimension()` (only with
    /// `Check::Enforced`).
    pub fn split(&self, index: ComponentIndex, check: Check) -> Result<MultiIndex, TensorError> {
        if check.enforced() && index >= self.dimension() {
            return Err(TensorError::IndexOutOfBounds {
                index,
                dim_size: self.dimension(),
            });
        }
        Ok(self.unrank(index))
    }

    /// Unchecked `split`.
    pub(crate) fn unrank(&self, index: ComponentIndex) -> MultiIndex {
        match self {
            Self::Product(p) => MultiIndex::from(linear_to_cartesian(index, &p.dims)),
            Self::Symmetric(p) => {
                let mut digits = p.unrank_increasing(index, p.factor_dim + p.order - 1);
                for (j, x) in digits.as_mut_slice().iter_mut().enumerate() {
                    *x -= j;
                }
                digits
            }
            Self::Alternating(p) => p.unrank_increasing(index, p.factor_dim),
        }
    }

    /// Number of input orderings that canonicalize to the same slot.
    ///
    /// `k! / prod(count!)` for symmetric powers, `k!` for exterior powers
    /// (each ordering differs from the canonical one by a sign), 1 for
    /// tensor products.
    ///
    /// # Errors
    ///
    /// The same length and range errors as [`bundle`](Self::bundle).
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::codec::MultiIndexCodec;
    /// use symtensors::Check;
    ///
    /// let sym = MultiIndexCodec::symmetric(3, 3).unwrap();
    /// assert_eq!(sym.multiplicity(&[2, 0, 0], Check::Enforced), Ok(3));
    /// assert!(sym.multiplicity(&[0, 0, 3], Check::Enforced).is_err());
    /// ```
    pub fn multiplicity(&self, multi_index: &[usize], check: Check) -> Result<usize, TensorError> {
        self.validate(multi_index, check)?;
        Ok(self.count_orderings(multi_index))
    }

    /// Unchecked `multiplicity`.
    pub(crate) fn count_orderings(&self, multi_index: &[usize]) -> usize {
        match self {
            Self::Product(_) => 1,
            Self::Symmetric(_) => {
                let mut sorted = MultiIndex::new(multi_index);
                sorted.as_mut_slice().sort_unstable();
                let mut result = 1usize;
                let mut seen = 0usize;
                for group in sorted.as_slice().chunk_by(|a, b| a == b) {
                    seen += group.len();
                    let ways = binomial(seen, group.len()).unwrap_or(usize::MAX);
                    result = result.saturating_mul(ways);
                }
                result
            }
            Self::Alternating(p) => factorial(p.order),
        }
    }

    /// Canonical form of a multi-index with the sign of the sorting
    /// permutation, or `None` for an alternating structural zero.
    pub fn canonicalize(&self, multi_index: &[usize]) -> Option<(MultiIndex, Sign)> {
        match self {
            Self::Product(_) => Some((MultiIndex::new(multi_index), Sign::Plus)),
            Self::Symmetric(_) => {
                let mut sorted = MultiIndex::new(multi_index);
                sorted.as_mut_slice().sort_unstable();
                Some((sorted, Sign::Plus))
            }
            Self::Alternating(_) => {
                let (sorted, sign) = MultiIndex::new(multi_index).sorted_with_sign();
                sorted.is_strictly_increasing().then_some((sorted, sign))
            }
        }
    }

    /// Every distinct ordering of a multi-index with its sign relative to
    /// the canonical form.
    ///
    /// The length equals [`multiplicity`](Self::multiplicity); an
    /// alternating structural zero has no orderings.
    ///
    /// # Errors
    ///
    /// The same length and range errors as [`bundle`](Self::bundle).
    pub fn orderings(
        &self,
        multi_index: &[usize],
        check: Check,
    ) -> Result<Vec<(MultiIndex, Sign)>, TensorError> {
        self.validate(multi_index, check)?;
        Ok(self.enumerate_orderings(multi_index))
    }

    /// Unchecked `orderings`.
    pub(crate) fn enumerate_orderings(&self, multi_index: &[usize]) -> Vec<(MultiIndex, Sign)> {
        let Some((mut current, _)) = self.canonicalize(multi_index) else {
            return Vec::new();
        };
        if let Self::Product(_) = self {
            return vec![(current, Sign::Plus)];
        }
        let alternating = matches!(self, Self::Alternating(_));
        let mut out = Vec::with_capacity(self.count_orderings(multi_index).min(1 << 12));
        loop {
            let sign = if alternating {
                current.parity()
            } else {
                Sign::Plus
            };
            out.push((current.clone(), sign));
            if !current.next_ordering() {
                break;
            }
        }
        out
    }

    /// Iterate `(component index, canonical multi-index)` over every slot in
    /// storage order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentIndex, MultiIndex)> + '_ {
        (0..self.dimension()).map(move |i| (i, self.unrank(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi_index::MultiIndexIter;

    #[test]
    fn test_product_row_major() {
        let codec = MultiIndexCodec::product(&[2, 3]).unwrap();
        assert_eq!(codec.dimension(), 6);
        let slot = codec.bundle(&[1, 2], Check::Enforced).unwrap().unwrap();
        assert_eq!(slot.index, 5);
        assert_eq!(codec.split(4, Check::Enforced).unwrap().as_slice(), &[1, 1]);
    }

    #[test]
    fn test_symmetric_order_two_layout() {
        let codec = MultiIndexCodec::symmetric(3, 2).unwrap();
        let layout: Vec<Vec<usize>> = codec
            .components()
            .map(|(_, m)| m.as_slice().to_vec())
            .collect();
        assert_eq!(
            layout,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![1, 1],
                vec![0, 2],
                vec![1, 2],
                vec![2, 2]
            ]
        );
    }

    #[test]
    fn test_alternating_order_two_layout() {
        let codec = MultiIndexCodec::alternating(4, 2).unwrap();
        assert_eq!(codec.dimension(), 6);
        assert_eq!(codec.split(0, Check::Enforced).unwrap().as_slice(), &[0, 1]);
        assert_eq!(codec.split(1, Check::Enforced).unwrap().as_slice(), &[0, 2]);
        assert_eq!(codec.split(2, Check::Enforced).unwrap().as_slice(), &[1, 2]);
        assert_eq!(codec.split(5, Check::Enforced).unwrap().as_slice(), &[2, 3]);
    }

    #[test]
    fn test_symmetric_bundle_ignores_order() {
        let codec = MultiIndexCodec::symmetric(4, 3).unwrap();
        for m in MultiIndexIter::new(&[4, 4, 4]) {
            let (canonical, _) = codec.canonicalize(m.as_slice()).unwrap();
            assert_eq!(
                codec.bundle(m.as_slice(), Check::Enforced).unwrap(),
                codec.bundle(canonical.as_slice(), Check::Enforced).unwrap()
            );
        }
    }

    #[test]
    fn test_alternating_sign() {
        let codec = MultiIndexCodec::alternating(3, 3).unwrap();
        assert_eq!(codec.dimension(), 1);
        let even = codec.bundle(&[1, 2, 0], Check::Enforced).unwrap().unwrap();
        let odd = codec.bundle(&[1, 0, 2], Check::Enforced).unwrap().unwrap();
        assert_eq!(even, SignedIndex::plus(0));
        assert_eq!(odd.sign, Sign::Minus);
        assert_eq!(codec.bundle(&[2, 0, 2], Check::Enforced).unwrap(), None);
    }

    #[test]
    fn test_range_checks() {
        let codec = MultiIndexCodec::symmetric(3, 2).unwrap();
        assert_eq!(
            codec.bundle(&[0, 3], Check::Enforced),
            Err(TensorError::IndexOutOfBounds {
                index: 3,
                dim_size: 3
            })
        );
        assert!(codec.split(6, Check::Enforced).is_err());
        assert!(matches!(
            codec.bundle(&[0], Check::Elided),
            Err(TensorError::WrongNumberOfIndices { .. })
        ));
    }

    #[test]
    fn test_multiplicity() {
        let codec = MultiIndexCodec::symmetric(3, 3).unwrap();
        assert_eq!(codec.multiplicity(&[0, 0, 0], Check::Enforced), Ok(1));
        assert_eq!(codec.multiplicity(&[0, 0, 1], Check::Enforced), Ok(3));
        assert_eq!(codec.multiplicity(&[0, 1, 2], Check::Enforced), Ok(6));
        let alt = MultiIndexCodec::alternating(3, 3).unwrap();
        assert_eq!(alt.multiplicity(&[0, 1, 2], Check::Enforced), Ok(6));
        let prod = MultiIndexCodec::product(&[3, 3]).unwrap();
        assert_eq!(prod.multiplicity(&[1, 1], Check::Enforced), Ok(1));
    }

    #[test]
    fn test_queries_validate_input() {
        let sym = MultiIndexCodec::symmetric(3, 2).unwrap();
        assert_eq!(
            sym.multiplicity(&[0, 7], Check::Enforced),
            Err(TensorError::IndexOutOfBounds {
                index: 7,
                dim_size: 3
            })
        );
        assert_eq!(
            sym.multiplicity(&[0, 1, 2, 2], Check::Enforced),
            Err(TensorError::WrongNumberOfIndices {
                expected: 2,
                actual: 4
            })
        );
        assert_eq!(
            sym.orderings(&[9, 5], Check::Enforced),
            Err(TensorError::IndexOutOfBounds {
                index: 9,
                dim_size: 3
            })
        );
        assert!(matches!(
            sym.orderings(&[0], Check::Elided),
            Err(TensorError::WrongNumberOfIndices { .. })
        ));
        assert_eq!(sym.multiplicity(&[1, 0], Check::Elided), Ok(2));
    }

    #[test]
    fn test_orderings_signs() {
        let alt = MultiIndexCodec::alternating(3, 2).unwrap();
        let orderings = alt.orderings(&[0, 2], Check::Enforced).unwrap();
        assert_eq!(orderings.len(), 2);
        assert_eq!(orderings[0], (MultiIndex::from([0, 2]), Sign::Plus));
        assert_eq!(orderings[1], (MultiIndex::from([2, 0]), Sign::Minus));

        let sym = MultiIndexCodec::symmetric(3, 3).unwrap();
        assert_eq!(sym.orderings(&[1, 1, 2], Check::Enforced).unwrap().len(), 3);
        assert_eq!(alt.orderings(&[1, 1], Check::Enforced), Ok(Vec::new()));
    }

    #[test]
    fn test_invalid_powers() {
        assert!(MultiIndexCodec::alternating(2, 3).is_err());
        assert!(MultiIndexCodec::symmetric(2, 0).is_err());
        assert!(MultiIndexCodec::symmetric(1000, 40).is_err());
    }

    #[test]
    fn test_empty_product_is_scalar() {
        let codec = MultiIndexCodec::product(&[]).unwrap();
        assert_eq!(codec.dimension(), 1);
        assert_eq!(codec.bundle(&[], Check::Enforced).unwrap(), Some(SignedIndex::plus(0)));
    }

    #[test]
    fn test_first_power_of_huge_space() {
        let n = 1usize << 40;
        let sym = MultiIndexCodec::symmetric(n, 1).unwrap();
        let alt = MultiIndexCodec::alternating(n, 1).unwrap();
        for codec in [&sym, &alt] {
            assert_eq!(codec.dimension(), n);
            let slot = codec.bundle(&[12345], Check::Enforced).unwrap().unwrap();
            assert_eq!(slot, SignedIndex::plus(12345));
            assert_eq!(codec.split(n - 1, Check::Enforced).unwrap().as_slice(), &[n - 1]);
        }
    }

    #[test]
    fn test_shared_codecs_are_interned() {
        let a = MultiIndexCodec::shared_symmetric(97, 3).unwrap();
        let b = MultiIndexCodec::shared_symmetric(97, 3).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let alt = MultiIndexCodec::shared_alternating(97, 3).unwrap();
        assert!(!Arc::ptr_eq(&a, &alt));
        assert_eq!(*alt, MultiIndexCodec::alternating(97, 3).unwrap());

        let weak = Arc::downgrade(&a);
        drop((a, b));
        assert_eq!(weak.strong_count(), 0);
        let rebuilt = MultiIndexCodec::shared_symmetric(97, 3).unwrap();
        assert_eq!(rebuilt.dimension(), binomial(99, 3).unwrap());

        let scalar = MultiIndexCodec::shared_product(&[]).unwrap();
        assert!(Arc::ptr_eq(&scalar, &MultiIndexCodec::shared_product(&[]).unwrap()));
        assert!(MultiIndexCodec::shared_alternating(2, 3).is_err());
    }
}
