//! Owned contiguous storage.

use std::cell::Cell;

use crate::scalar::Scalar;
use crate::storage::External;

/// Dense storage: an owned `Vec` of components in `ComponentIndex` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<ElT: Scalar> {
    data: Vec<ElT>,
}

impl<ElT: Scalar> Dense<ElT> {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![ElT::zero(); len],
        }
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<ElT>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ElT] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ElT] {
        &mut self.data
    }

    /// Get raw pointer (for FFI).
    #[inline]
    pub fn as_ptr(&self) -> *const ElT {
        self.data.as_ptr()
    }

    /// Get mutable raw pointer (for FFI).
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut ElT {
        self.data.as_mut_ptr()
    }

    pub fn into_vec(self) -> Vec<ElT> {
        self.data
    }

    /// Borrow the buffer as external storage. Writes through the view land
    /// in this buffer.
    pub fn view(&mut self) -> External<'_, ElT> {
        External::from_cells(Cell::from_mut(self.data.as_mut_slice()).as_slice_of_cells())
    }
}

impl<ElT: Scalar> std::ops::Index<usize> for Dense<ElT> {
    type Output = ElT;

    #[inline]
    fn index(&self, i: usize) -> &ElT {
        &self.data[i]
    }
}

impl<ElT: Scalar> std::ops::IndexMut<usize> for Dense<ElT> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut ElT {
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ComponentStorageMut;

    #[test]
    fn test_zeros() {
        let d: Dense<f64> = Dense::zeros(5);
        assert_eq!(d.len(), 5);
        assert!(!d.is_empty());
        assert!(d.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_clone_is_deep() {
        let a = Dense::from_vec(vec![1.0, 2.0]);
        let mut b = a.clone();
        b[0] = 9.0;
        assert_eq!(a[0], 1.0);
        assert_eq!(b[0], 9.0);
    }

    #[test]
    fn test_view_writes_through() {
        let mut d = Dense::from_vec(vec![1.0, 2.0, 3.0]);
        let ptr = d.as_ptr();
        {
            let mut view = d.view();
            view.set_component(1, 7.0);
            assert!(std::ptr::eq(view.as_ptr(), ptr));
        }
        assert_eq!(d.as_slice(), &[1.0, 7.0, 3.0]);
    }
}
