//! Summation loops over a compiled contraction.

use tracing::debug_span;

use crate::error::{MismatchReason, TensorError};
use crate::multi_index::{MultiIndex, MultiIndexIter};
use crate::scalar::Scalar;
use crate::space::Space;
use crate::storage::ComponentStorageMut;
use crate::tensor::{DenseTensor, Tensor};

use super::compile::{Contraction, LeafPlan, Plan, SummedIndex};
use super::index::AbstractIndex;
use super::tree::Expr;

/// Sum `body` over every assignment of the summed indices.
fn sum_over<T, F>(summed: &[SummedIndex], values: &mut [usize], body: &mut F) -> T
where
    T: Scalar,
    F: FnMut(&mut [usize]) -> T,
{
    let Some((first, rest)) = summed.split_first() else {
        return body(values);
    };
    let mut acc = T::zero();
    for x in 0..first.dim {
        for &slot in &first.slots {
            values[slot] = x;
        }
        acc = acc + sum_over(rest, values, body);
    }
    acc
}

impl<T: Scalar> LeafPlan<'_, T> {
    #[inline]
    fn read(&self, values: &[usize]) -> T {
        let flat = self
            .slots
            .iter()
            .zip(&self.strides)
            .map(|(&slot, &stride)| values[slot] * stride)
            .sum();
        self.operand.read(flat)
    }
}

impl<T: Scalar> Plan<'_, T> {
    fn eval(&self, values: &mut [usize]) -> T {
        match self {
            Plan::Leaf(leaf) => sum_over(&leaf.summed, values, &mut |v: &mut [usize]| leaf.read(v)),
            Plan::Product {
                left,
                right,
                summed,
            } => sum_over(summed, values, &mut |v: &mut [usize]| {
                let a = left.eval(v);
                a * right.eval(v)
            }),
            Plan::Sum { left, right, links } => {
                for &(from, to) in links {
                    values[to] = values[from];
                }
                let a = left.eval(values);
                a + right.eval(values)
            }
            Plan::Scale(c, inner) => *c * inner.eval(values),
            Plan::Split {
                inner,
                space,
                source,
                factors,
            } => {
                let target: MultiIndex = factors.iter().map(|&slot| values[slot]).collect();
                match space.codec().rank(target.as_slice()) {
                    Some(slot) => {
                        values[*source] = slot.index;
                        slot.sign.apply(inner.eval(values))
                    }
                    None => T::zero(),
                }
            }
            Plan::Bundle {
                inner,
                space,
                factors,
                target,
            } => {
                let canonical = space.codec().unrank(values[*target]);
                let orderings = space.codec().enumerate_orderings(canonical.as_slice());
                let mut acc = T::zero();
                for (ordering, sign) in &orderings {
                    for (&slot, &x) in factors.iter().zip(ordering.iter()) {
                        values[slot] = x;
                    }
                    acc = acc + sign.apply(inner.eval(values));
                }
                T::from_real(1.0 / orderings.len() as f64) * acc
            }
        }
    }
}

impl<T: Scalar> Contraction<'_, T> {
    /// Run the summation loops and collect the result on
    /// [`output_space`](Self::output_space).
    ///
    /// Output components follow the output space's persisted order.
    pub fn evaluate(&self) -> DenseTensor<T> {
        let _span = debug_span!(
            "evaluate",
            output = %self.output_space,
            dimension = self.output_space.dimension()
        )
        .entered();
        let dims: Vec<usize> = self
            .free
            .iter()
            .map(|&slot| self.records[slot].space.dimension())
            .collect();
        let mut values = vec![0usize; self.records.len()];
        let data = MultiIndexIter::new(&dims)
            .map(|m| {
                for (&slot, &x) in self.free.iter().zip(m.iter()) {
                    values[slot] = x;
                }
                self.plan.eval(&mut values)
            })
            .collect();
        DenseTensor::from_parts(self.output_space.clone(), data)
    }

    /// Value of a fully contracted expression.
    ///
    /// # Errors
    ///
    /// `StructuralMismatch` if any index is still free.
    pub fn evaluate_scalar(&self) -> Result<T, TensorError> {
        if !self.free.is_empty() {
            return Err(MismatchReason::FreeIndicesRemain {
                count: self.free.len(),
            }
            .into());
        }
        let _span = debug_span!("evaluate_scalar").entered();
        let mut values = vec![0usize; self.records.len()];
        Ok(self.plan.eval(&mut values))
    }

    /// Write the result into `target`, whose slots carry `indices`.
    ///
    /// `indices` must be a permutation of the free indices, each attached to
    /// a slot of the same space; this is how a caller picks an output order
    /// other than first occurrence.
    ///
    /// # Errors
    ///
    /// `StructuralMismatch` with `LeafArity` or `TargetIndices`.
    pub fn assign_into<S>(
        &self,
        target: &mut Tensor<T, S>,
        indices: &str,
    ) -> Result<(), TensorError>
    where
        S: ComponentStorageMut<T>,
    {
        let tokens = AbstractIndex::parse(indices);
        let factors: Vec<Space> = target.space().index_factors().to_vec();
        if tokens.len() != factors.len() {
            return Err(MismatchReason::LeafArity {
                expected: factors.len(),
                actual: tokens.len(),
            }
            .into());
        }
        if tokens.len() != self.free.len() {
            return Err(MismatchReason::TargetIndices.into());
        }
        let mut slots = Vec::with_capacity(tokens.len());
        for (n, (token, space)) in tokens.iter().zip(&factors).enumerate() {
            let slot = self
                .free
                .iter()
                .copied()
                .find(|&s| self.records[s].index == *token)
                .filter(|&s| self.records[s].space == *space && !tokens[..n].contains(token))
                .ok_or(MismatchReason::TargetIndices)?;
            slots.push(slot);
        }

        let _span = debug_span!("assign", target = %target.space(), indices).entered();
        let dims: Vec<usize> = factors.iter().map(Space::dimension).collect();
        let mut values = vec![0usize; self.records.len()];
        for (component, m) in MultiIndexIter::new(&dims).enumerate() {
            for (&slot, &x) in slots.iter().zip(m.iter()) {
                values[slot] = x;
            }
            let value = self.plan.eval(&mut values);
            target.storage_mut().set_component(component, value);
        }
        Ok(())
    }
}

/// Compile and evaluate in one call.
///
/// # Examples
///
/// ```
/// use symtensors::{DenseTensor, Space};
/// use symtensors::expr::evaluate;
///
/// let v = Space::vector("V", 2).unwrap();
/// let a = DenseTensor::from_components(
///     Space::tensor_product(vec![v.clone(), v.dual()]).unwrap(),
///     vec![1.0, 2.0, 3.0, 4.0],
/// )
/// .unwrap();
/// let x = DenseTensor::from_components(v.clone(), vec![1.0, 1.0]).unwrap();
/// let y = evaluate(&(a.at("ij") * x.at("j"))).unwrap();
/// assert_eq!(y.space(), &v);
/// assert_eq!(y.data(), &[3.0, 7.0]);
/// ```
pub fn evaluate<T: Scalar>(expr: &Expr<'_, T>) -> Result<DenseTensor<T>, TensorError> {
    Ok(Contraction::compile(expr)?.evaluate())
}

/// Compile and evaluate a fully contracted expression.
pub fn evaluate_scalar<T: Scalar>(expr: &Expr<'_, T>) -> Result<T, TensorError> {
    Contraction::compile(expr)?.evaluate_scalar()
}

/// Compile `expr` and write it into `target` with slots labelled `indices`.
///
/// `target` must not alias any operand of `expr` (possible only through
/// external storage).
pub fn assign<T, S>(
    target: &mut Tensor<T, S>,
    indices: &str,
    expr: &Expr<'_, T>,
) -> Result<(), TensorError>
where
    T: Scalar,
    S: ComponentStorageMut<T>,
{
    Contraction::compile(expr)?.assign_into(target, indices)
}
