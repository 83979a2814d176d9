//! Read-only storage whose components are computed on demand.

use std::fmt;
use std::sync::Arc;

use crate::multi_index::ComponentIndex;

/// Shared generator mapping a component slot to its value.
pub type ComponentGenerator<T> = Arc<dyn Fn(ComponentIndex) -> T + Send + Sync>;

/// Storage that holds no components, only a rule to produce them.
///
/// There is no write access: `Procedural` does not implement
/// [`ComponentStorageMut`](crate::storage::ComponentStorageMut).
///
/// ```compile_fail
/// use symtensors::storage::{ComponentStorageMut, Procedural};
///
/// let mut p = Procedural::new(3, |i| i as f64);
/// p.set_component(0, 1.0);
/// ```
#[derive(Clone)]
pub struct Procedural<T> {
    len: usize,
    generator: ComponentGenerator<T>,
}

impl<T> Procedural<T> {
    pub fn new<F>(len: usize, generator: F) -> Self
    where
        F: Fn(ComponentIndex) -> T + Send + Sync + 'static,
    {
        Self {
            len,
            generator: Arc::new(generator),
        }
    }

    pub fn from_generator(len: usize, generator: ComponentGenerator<T>) -> Self {
        Self { len, generator }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn generate(&self, i: ComponentIndex) -> T {
        (self.generator)(i)
    }
}

impl<T> fmt::Debug for Procedural<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedural")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Check;
    use crate::storage::ComponentStorage;

    #[test]
    fn test_generates_on_demand() {
        let p = Procedural::new(4, |i| if i % 2 == 0 { 1.0 } else { 0.0 });
        let values: Vec<f64> = p.components().collect();
        assert_eq!(values, vec![1.0, 0.0, 1.0, 0.0]);
        assert!(p.get(4, Check::Enforced).is_err());
    }

    #[test]
    fn test_clone_shares_generator() {
        let p = Procedural::new(2, |i| i as f64 * 10.0);
        let q = p.clone();
        assert!(Arc::ptr_eq(&p.generator, &q.generator));
        assert_eq!(q.component(1), 10.0);
    }
}
