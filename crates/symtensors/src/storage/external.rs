//! Storage over a caller-owned buffer.
//!
//! The buffer is viewed as `&[Cell<T>]`: several views of one buffer may
//! coexist and all of them may write, single-threaded. `Cell` is `!Sync`, so
//! the compiler keeps these views on one thread.

use std::cell::Cell;

use crate::error::{Check, TensorError};
use crate::scalar::Scalar;

/// Non-owning view of externally owned components.
///
/// Copying the view copies the pointer, never the components.
#[derive(Clone, Copy)]
pub struct External<'a, T> {
    cells: &'a [Cell<T>],
}

impl<T: Scalar> std::fmt::Debug for External<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("External")
            .field("ptr", &self.as_ptr())
            .field("len", &self.len())
            .finish()
    }
}

impl<'a, T: Scalar> External<'a, T> {
    pub fn from_cells(cells: &'a [Cell<T>]) -> Self {
        Self { cells }
    }

    /// View a mutable slice for the lifetime of the borrow.
    pub fn from_slice(slice: &'a mut [T]) -> Self {
        Self::from_cells(Cell::from_mut(slice).as_slice_of_cells())
    }

    /// View `len` components starting at `ptr`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `ptr` is null and `check` is `Enforced`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` consecutive `T` for
    /// `'a`, and no other reference may mutate that memory except through
    /// views built from the same pointer. With `Check::Elided` the pointer
    /// must also be non-null.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::Check;
    /// use symtensors::storage::{ComponentStorage, External};
    ///
    /// let mut buffer = vec![1.0f64, 2.0];
    /// let ptr = buffer.as_mut_ptr();
    /// let view = unsafe { External::from_raw_parts(ptr, 2, Check::Enforced) }.unwrap();
    /// assert_eq!(view.component(1), 2.0);
    ///
    /// let null = std::ptr::null_mut();
    /// let null = unsafe { External::<f64>::from_raw_parts(null, 2, Check::Enforced) };
    /// assert!(null.is_err());
    /// ```
    pub unsafe fn from_raw_parts(
        ptr: *mut T,
        len: usize,
        check: Check,
    ) -> Result<Self, TensorError> {
        if check.enforced() && ptr.is_null() {
            return Err(TensorError::InvalidArgument {
                message: "external storage pointer is null".into(),
            });
        }
        // SAFETY: caller guarantees validity for `len` elements over 'a;
        // `Cell<T>` has the same layout as `T`.
        let cells = unsafe { std::slice::from_raw_parts(ptr.cast::<Cell<T>>().cast_const(), len) };
        Ok(Self { cells })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &'a [Cell<T>] {
        self.cells
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.cells.as_ptr().cast::<T>()
    }

    /// Whether both views cover exactly the same buffer.
    pub fn shares_buffer_with(&self, other: &External<'_, T>) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr()) && self.len() == other.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ComponentStorage, ComponentStorageMut};

    #[test]
    fn test_aliasing_views() {
        let mut buffer = vec![0.0f64; 3];
        let a = External::from_slice(&mut buffer);
        let mut b = a;
        b.set_component(2, 5.0);
        assert_eq!(a.component(2), 5.0);
        assert!(a.shares_buffer_with(&b));
    }

    #[test]
    fn test_raw_parts_roundtrip() {
        let mut buffer = vec![1.0f64, 2.0, 3.0];
        let ptr = buffer.as_mut_ptr();
        {
            let mut view = unsafe { External::from_raw_parts(ptr, 3, Check::Enforced) }.unwrap();
            view.set_component(0, -1.0);
        }
        assert_eq!(buffer, vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_null_pointer_rejected() {
        let result =
            unsafe { External::<f64>::from_raw_parts(std::ptr::null_mut(), 4, Check::Enforced) };
        assert!(matches!(result, Err(TensorError::InvalidArgument { .. })));
    }
}
