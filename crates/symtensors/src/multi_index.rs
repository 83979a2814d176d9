//! Multi-indices, permutation signs, and odometer iteration.
//!
//! A [`MultiIndex`] is the uncompacted address of one tensor entry: one flat
//! index per factor. Orders up to four stay inline without allocating.

use smallvec::SmallVec;
use std::fmt;
use std::ops::{Index, Mul};

use crate::scalar::Scalar;

/// Flat storage slot of one component, in `[0, dimension)`.
pub type ComponentIndex = usize;

/// An ordered tuple of per-factor indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MultiIndex(SmallVec<[usize; 4]>);

impl MultiIndex {
    /// Create a multi-index from a slice.
    pub fn new(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    /// The all-zero multi-index of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(SmallVec::from_elem(0, len))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Whether entries never decrease (canonical symmetric form).
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Whether entries strictly increase (canonical alternating form).
    pub fn is_strictly_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] < w[1])
    }

    /// Sort ascending, returning the sorted copy and the parity of the
    /// permutation that sorted it.
    pub fn sorted_with_sign(&self) -> (MultiIndex, Sign) {
        let mut sorted = self.clone();
        let mut swaps = 0usize;
        let v = sorted.as_mut_slice();
        for i in 1..v.len() {
            let mut j = i;
            while j > 0 && v[j - 1] > v[j] {
                v.swap(j - 1, j);
                swaps += 1;
                j -= 1;
            }
        }
        (sorted, Sign::from_parity(swaps))
    }

    /// Sign of the permutation that sorts this tuple.
    ///
    /// Counts inversions; repeated entries contribute nothing.
    pub fn parity(&self) -> Sign {
        let v = self.as_slice();
        let mut inversions = 0usize;
        for i in 0..v.len() {
            for j in (i + 1)..v.len() {
                if v[i] > v[j] {
                    inversions += 1;
                }
            }
        }
        Sign::from_parity(inversions)
    }

    /// Rearrange into the lexicographically next ordering.
    ///
    /// Returns `false` (leaving the tuple sorted ascending again) once the
    /// last ordering has been passed. Repeated entries produce each distinct
    /// ordering exactly once.
    pub fn next_ordering(&mut self) -> bool {
        let v = self.as_mut_slice();
        if v.len() < 2 {
            return false;
        }
        let mut i = v.len() - 1;
        while i > 0 && v[i - 1] >= v[i] {
            i -= 1;
        }
        if i == 0 {
            v.reverse();
            return false;
        }
        let mut j = v.len() - 1;
        while v[j] <= v[i - 1] {
            j -= 1;
        }
        v.swap(i - 1, j);
        v[i..].reverse();
        true
    }
}

impl Index<usize> for MultiIndex {
    type Output = usize;

    #[inline]
    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

impl From<Vec<usize>> for MultiIndex {
    fn from(v: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(v))
    }
}

impl<const N: usize> From<[usize; N]> for MultiIndex {
    fn from(v: [usize; N]) -> Self {
        Self::new(&v)
    }
}

impl FromIterator<usize> for MultiIndex {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for MultiIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (n, i) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{i}")?;
        }
        write!(f, ")")
    }
}

/// Sign of a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// `Plus` for an even count of transpositions, `Minus` for odd.
    #[inline]
    pub fn from_parity(transpositions: usize) -> Self {
        if transpositions % 2 == 0 {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// Multiply a scalar by this sign.
    #[inline]
    pub fn apply<T: Scalar>(self, value: T) -> T {
        match self {
            Sign::Plus => value,
            Sign::Minus => -value,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        if self == rhs { Sign::Plus } else { Sign::Minus }
    }
}

/// Row-major odometer over every multi-index with the given factor
/// dimensions. The last factor varies fastest, so the n-th item has flat
/// index n in a tensor product with these dimensions.
///
/// An empty dimension list yields the single empty multi-index; any zero
/// dimension yields nothing.
#[derive(Debug, Clone)]
pub struct MultiIndexIter {
    dims: Vec<usize>,
    next: Option<MultiIndex>,
}

impl MultiIndexIter {
    pub fn new(dims: &[usize]) -> Self {
        let next = if dims.contains(&0) {
            None
        } else {
            Some(MultiIndex::zeros(dims.len()))
        };
        Self {
            dims: dims.to_vec(),
            next,
        }
    }
}

impl Iterator for MultiIndexIter {
    type Item = MultiIndex;

    fn next(&mut self) -> Option<MultiIndex> {
        let current = self.next.take()?;
        let mut following = current.clone();
        let v = following.as_mut_slice();
        let mut pos = v.len();
        let mut done = true;
        while pos > 0 {
            pos -= 1;
            v[pos] += 1;
            if v[pos] < self.dims[pos] {
                done = false;
                break;
            }
            v[pos] = 0;
        }
        if !done {
            self.next = Some(following);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_with_sign() {
        let (sorted, sign) = MultiIndex::from([2, 0, 1]).sorted_with_sign();
        assert_eq!(sorted.as_slice(), &[0, 1, 2]);
        assert_eq!(sign, Sign::Plus);

        let (sorted, sign) = MultiIndex::from([1, 0, 2]).sorted_with_sign();
        assert_eq!(sorted.as_slice(), &[0, 1, 2]);
        assert_eq!(sign, Sign::Minus);
    }

    #[test]
    fn test_parity_matches_sort() {
        for m in MultiIndexIter::new(&[3, 3, 3]) {
            assert_eq!(m.parity(), m.sorted_with_sign().1);
        }
    }

    #[test]
    fn test_canonical_predicates() {
        assert!(MultiIndex::from([0, 0, 2]).is_non_decreasing());
        assert!(!MultiIndex::from([0, 0, 2]).is_strictly_increasing());
        assert!(MultiIndex::from([0, 1, 2]).is_strictly_increasing());
        assert!(!MultiIndex::from([1, 0]).is_non_decreasing());
    }

    #[test]
    fn test_next_ordering_distinct() {
        let mut m = MultiIndex::from([0, 1, 2]);
        let mut seen = vec![m.clone()];
        while m.next_ordering() {
            seen.push(m.clone());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(m.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_next_ordering_repeated() {
        let mut m = MultiIndex::from([0, 0, 1]);
        let mut count = 1;
        while m.next_ordering() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_sign_algebra() {
        assert_eq!(Sign::Plus * Sign::Minus, Sign::Minus);
        assert_eq!(Sign::Minus * Sign::Minus, Sign::Plus);
        assert_eq!(Sign::Minus.flip(), Sign::Plus);
        assert_eq!(Sign::Minus.apply(3.0), -3.0);
    }

    #[test]
    fn test_odometer_row_major() {
        let all: Vec<MultiIndex> = MultiIndexIter::new(&[2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].as_slice(), &[0, 0]);
        assert_eq!(all[1].as_slice(), &[0, 1]);
        assert_eq!(all[3].as_slice(), &[1, 0]);
        assert_eq!(all[5].as_slice(), &[1, 2]);
    }

    #[test]
    fn test_odometer_edge_cases() {
        assert_eq!(MultiIndexIter::new(&[]).count(), 1);
        assert_eq!(MultiIndexIter::new(&[3, 0]).count(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(MultiIndex::from([1, 2]).to_string(), "(1, 2)");
    }
}
