//! Storage strategies for compact tensor components.
//!
//! ```text
//! ComponentStorage<T> (trait)
//! ├── Dense<T>          - owned Vec, deep-copied on clone
//! ├── External<'a, T>   - view over a caller-owned buffer (mutable through &)
//! └── Procedural<T>     - components computed on demand, read-only
//! ```
//!
//! Storage is always a flat sequence of `dimension()` components in
//! `ComponentIndex` order. How a multi-index maps to a slot is the space's
//! codec's concern, never the storage's.

mod dense;
mod external;
mod procedural;

use crate::error::{Check, TensorError};
use crate::multi_index::ComponentIndex;
use crate::scalar::Scalar;

pub use dense::Dense;
pub use external::External;
pub use procedural::{ComponentGenerator, Procedural};

/// Read access to a flat component sequence.
pub trait ComponentStorage<T: Scalar>: Clone + std::fmt::Debug {
    /// Number of components.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Component `i`. Panics if `i >= len()`.
    fn component(&self, i: ComponentIndex) -> T;

    /// Component `i`, with an optional range check.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `i >= len()` and `check` is `Enforced`.
    fn get(&self, i: ComponentIndex, check: Check) -> Result<T, TensorError> {
        if check.enforced() && i >= self.len() {
            return Err(TensorError::IndexOutOfBounds {
                index: i,
                dim_size: self.len(),
            });
        }
        Ok(self.component(i))
    }

    /// Bytes of component memory this storage holds or views.
    fn size_in_bytes(&self) -> usize;

    /// Every component in persisted order.
    fn components(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.component(i))
    }
}

/// Write access, implemented only by storages that hold writable memory.
pub trait ComponentStorageMut<T: Scalar>: ComponentStorage<T> {
    /// Overwrite component `i`. Panics if `i >= len()`.
    fn set_component(&mut self, i: ComponentIndex, value: T);

    /// Overwrite component `i`, with an optional range check.
    fn set(&mut self, i: ComponentIndex, value: T, check: Check) -> Result<(), TensorError> {
        if check.enforced() && i >= self.len() {
            return Err(TensorError::IndexOutOfBounds {
                index: i,
                dim_size: self.len(),
            });
        }
        self.set_component(i, value);
        Ok(())
    }

    fn fill(&mut self, value: T) {
        for i in 0..self.len() {
            self.set_component(i, value);
        }
    }
}

impl<T: Scalar> ComponentStorage<T> for Dense<T> {
    #[inline]
    fn len(&self) -> usize {
        Dense::len(self)
    }

    #[inline]
    fn component(&self, i: ComponentIndex) -> T {
        self[i]
    }

    fn size_in_bytes(&self) -> usize {
        Dense::len(self) * std::mem::size_of::<T>()
    }
}

impl<T: Scalar> ComponentStorageMut<T> for Dense<T> {
    #[inline]
    fn set_component(&mut self, i: ComponentIndex, value: T) {
        self[i] = value;
    }

    fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }
}

impl<T: Scalar> ComponentStorage<T> for External<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        External::len(self)
    }

    #[inline]
    fn component(&self, i: ComponentIndex) -> T {
        self.cells()[i].get()
    }

    fn size_in_bytes(&self) -> usize {
        External::len(self) * std::mem::size_of::<T>()
    }
}

impl<T: Scalar> ComponentStorageMut<T> for External<'_, T> {
    #[inline]
    fn set_component(&mut self, i: ComponentIndex, value: T) {
        self.cells()[i].set(value);
    }
}

impl<T: Scalar> ComponentStorage<T> for Procedural<T> {
    #[inline]
    fn len(&self) -> usize {
        Procedural::len(self)
    }

    #[inline]
    fn component(&self, i: ComponentIndex) -> T {
        assert!(i < self.len(), "component {i} out of range {}", self.len());
        self.generate(i)
    }

    fn size_in_bytes(&self) -> usize {
        0
    }
}
