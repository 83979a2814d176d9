//! Tensors: a space paired with a component storage.
//!
//! ```text
//! Tensor<T, S: ComponentStorage<T>>
//! ├── DenseTensor       = Tensor<T, Dense<T>>
//! ├── ExternalTensor    = Tensor<T, External<'a, T>>
//! └── ProceduralTensor  = Tensor<T, Procedural<T>>
//! ```
//!
//! Components are stored compactly: a tensor on `Sym^2(V)` with `dim V = 3`
//! holds 6 components, not 9. Multi-index access goes through the space's
//! codec.

use std::marker::PhantomData;

use crate::error::{Check, TensorError};
use crate::multi_index::{ComponentIndex, MultiIndex, MultiIndexIter};
use crate::scalar::Scalar;
use crate::space::Space;
use crate::storage::{ComponentStorage, ComponentStorageMut, Dense, External, Procedural};

/// A tensor on a [`Space`] with polymorphic storage.
#[derive(Debug, Clone)]
pub struct Tensor<ElT: Scalar, StoreT: ComponentStorage<ElT> = Dense<ElT>> {
    space: Space,
    storage: StoreT,
    _phantom: PhantomData<ElT>,
}

pub type DenseTensor<ElT> = Tensor<ElT, Dense<ElT>>;

pub type ExternalTensor<'a, ElT> = Tensor<ElT, External<'a, ElT>>;

pub type ProceduralTensor<ElT> = Tensor<ElT, Procedural<ElT>>;

impl<ElT: Scalar, StoreT: ComponentStorage<ElT>> Tensor<ElT, StoreT> {
    /// Pair a space with a storage of exactly `space.dimension()` components.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the storage length differs from the space dimension.
    pub fn with_storage(space: Space, storage: StoreT) -> Result<Self, TensorError> {
        if storage.len() != space.dimension() {
            return Err(TensorError::ShapeMismatch {
                expected: space.dimension(),
                actual: storage.len(),
            });
        }
        Ok(Self {
            space,
            storage,
            _phantom: PhantomData,
        })
    }

    #[inline]
    pub fn space(&self) -> &Space {
        &self.space
    }

    #[inline]
    pub fn storage(&self) -> &StoreT {
        &self.storage
    }

    /// Number of stored components.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.storage.size_in_bytes()
    }

    /// Component by flat slot.
    pub fn get_component(&self, i: ComponentIndex, check: Check) -> Result<ElT, TensorError> {
        self.storage.get(i, check)
    }

    /// Entry by multi-index in any ordering.
    ///
    /// For an exterior power the stored component is returned with the sign
    /// of the sorting permutation, and a repeated entry reads as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::{Check, DenseTensor, Space};
    ///
    /// let v = Space::vector("V", 3).unwrap();
    /// let l2 = Space::exterior_power(&v, 2).unwrap();
    /// let t = DenseTensor::from_components(l2, vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.get(&[0, 2], Check::Enforced), Ok(2.0));
    /// assert_eq!(t.get(&[2, 0], Check::Enforced), Ok(-2.0));
    /// assert_eq!(t.get(&[1, 1], Check::Enforced), Ok(0.0));
    /// ```
    pub fn get(&self, multi_index: &[usize], check: Check) -> Result<ElT, TensorError> {
        Ok(match self.space.codec().bundle(multi_index, check)? {
            Some(slot) => slot.sign.apply(self.storage.component(slot.index)),
            None => ElT::zero(),
        })
    }

    /// Every component in persisted order.
    pub fn components(&self) -> impl Iterator<Item = ElT> + '_ {
        self.storage.components()
    }

    /// `(canonical multi-index, component)` pairs in persisted order.
    pub fn entries(&self) -> impl Iterator<Item = (MultiIndex, ElT)> + '_ {
        self.space
            .codec()
            .components()
            .map(|(i, m)| (m, self.storage.component(i)))
    }

    /// Copy the components into owned storage on the same space.
    pub fn to_dense(&self) -> DenseTensor<ElT> {
        Tensor {
            space: self.space.clone(),
            storage: Dense::from_vec(self.components().collect()),
            _phantom: PhantomData,
        }
    }

    /// Expand a symmetric or exterior power into full storage on the tensor
    /// product of its factors; every ordering gets its own slot.
    ///
    /// Tensor products and base spaces are copied unchanged.
    pub fn to_dense_product(&self) -> Result<DenseTensor<ElT>, TensorError> {
        if !self.space.is_composite() || self.space.is_tensor_product() {
            return Ok(self.to_dense());
        }
        let product = Space::tensor_product(self.space.factor_spaces().to_vec())?;
        let dims: Vec<usize> = product.factor_spaces().iter().map(Space::dimension).collect();
        let data = MultiIndexIter::new(&dims)
            .map(|m| self.get(m.as_slice(), Check::Elided))
            .collect::<Result<Vec<_>, _>>()?;
        DenseTensor::from_components(product, data)
    }
}

impl<ElT: Scalar, StoreT: ComponentStorageMut<ElT>> Tensor<ElT, StoreT> {
    pub fn set_component(
        &mut self,
        i: ComponentIndex,
        value: ElT,
        check: Check,
    ) -> Result<(), TensorError> {
        self.storage.set(i, value, check)
    }

    /// Write the entry at a multi-index in any ordering.
    ///
    /// # Errors
    ///
    /// `WriteToStructuralZero` for an exterior-power multi-index with a
    /// repeated entry, plus the codec's arity and range errors.
    pub fn set(
        &mut self,
        multi_index: &[usize],
        value: ElT,
        check: Check,
    ) -> Result<(), TensorError> {
        match self.space.codec().bundle(multi_index, check)? {
            Some(slot) => {
                self.storage.set_component(slot.index, slot.sign.apply(value));
                Ok(())
            }
            None => Err(TensorError::WriteToStructuralZero {
                indices: multi_index.to_vec(),
            }),
        }
    }

    pub fn fill(&mut self, value: ElT) {
        self.storage.fill(value);
    }

    pub(crate) fn storage_mut(&mut self) -> &mut StoreT {
        &mut self.storage
    }
}

impl<ElT: Scalar> DenseTensor<ElT> {
    /// Zero-initialized tensor on `space`.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::{DenseTensor, Space};
    ///
    /// let v = Space::vector("V", 3).unwrap();
    /// let s = Space::symmetric_power(&v, 2).unwrap();
    /// let t: DenseTensor<f64> = DenseTensor::zeros(s);
    /// assert_eq!(t.len(), 6);
    /// ```
    pub fn zeros(space: Space) -> Self {
        let len = space.dimension();
        Self {
            space,
            storage: Dense::zeros(len),
            _phantom: PhantomData,
        }
    }

    /// Tensor from compact components in persisted order.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len() != space.dimension()`.
    pub fn from_components(space: Space, data: Vec<ElT>) -> Result<Self, TensorError> {
        Self::with_storage(space, Dense::from_vec(data))
    }

    /// Wrap a buffer already known to match `space`.
    pub(crate) fn from_parts(space: Space, data: Vec<ElT>) -> Self {
        debug_assert_eq!(data.len(), space.dimension());
        Self {
            space,
            storage: Dense::from_vec(data),
            _phantom: PhantomData,
        }
    }

    /// Tensor whose component at each canonical multi-index is `f(m)`.
    pub fn from_fn<F>(space: Space, mut f: F) -> Self
    where
        F: FnMut(&MultiIndex) -> ElT,
    {
        let data = space.codec().components().map(|(_, m)| f(&m)).collect();
        Self {
            space,
            storage: Dense::from_vec(data),
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn data(&self) -> &[ElT] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [ElT] {
        self.storage.as_mut_slice()
    }

    pub fn into_components(self) -> Vec<ElT> {
        self.storage.into_vec()
    }

    /// Borrow this tensor as an external tensor over the same buffer.
    pub fn view(&mut self) -> ExternalTensor<'_, ElT> {
        Tensor {
            space: self.space.clone(),
            storage: self.storage.view(),
            _phantom: PhantomData,
        }
    }
}

impl<'a, ElT: Scalar> ExternalTensor<'a, ElT> {
    /// Tensor over a caller-owned buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::{Check, ExternalTensor, Space};
    ///
    /// let v = Space::vector("V", 2).unwrap();
    /// let mut buffer = vec![0.0, 0.0];
    /// {
    ///     let mut t = ExternalTensor::from_slice(v, &mut buffer).unwrap();
    ///     t.set(&[1], 4.0, Check::Enforced).unwrap();
    /// }
    /// assert_eq!(buffer, vec![0.0, 4.0]);
    /// ```
    pub fn from_slice(space: Space, buffer: &'a mut [ElT]) -> Result<Self, TensorError> {
        Self::with_storage(space, External::from_slice(buffer))
    }

    /// Whether both tensors view the same buffer.
    pub fn shares_buffer_with(&self, other: &ExternalTensor<'_, ElT>) -> bool {
        self.storage.shares_buffer_with(&other.storage)
    }
}

impl<ElT: Scalar> ProceduralTensor<ElT> {
    /// Read-only tensor whose component at slot `i` is `generator(i)`.
    pub fn procedural<F>(space: Space, generator: F) -> Self
    where
        F: Fn(ComponentIndex) -> ElT + Send + Sync + 'static,
    {
        let len = space.dimension();
        Self {
            space,
            storage: Procedural::new(len, generator),
            _phantom: PhantomData,
        }
    }
}
