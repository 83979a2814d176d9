//! Expression tree over abstract-indexed tensors.
//!
//! Building an expression never fails; every structural check runs when the
//! expression is compiled into a [`Contraction`](super::Contraction).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::multi_index::ComponentIndex;
use crate::scalar::Scalar;
use crate::space::Space;
use crate::storage::ComponentStorage;
use crate::tensor::Tensor;

use super::index::AbstractIndex;

/// Anything an expression leaf can read components from.
pub trait Operand<T: Scalar> {
    fn operand_space(&self) -> &Space;

    /// Component at slot `i`; `i` is always in range.
    fn read(&self, i: ComponentIndex) -> T;
}

impl<T: Scalar, S: ComponentStorage<T>> Operand<T> for Tensor<T, S> {
    #[inline]
    fn operand_space(&self) -> &Space {
        self.space()
    }

    #[inline]
    fn read(&self, i: ComponentIndex) -> T {
        self.storage().component(i)
    }
}

/// An abstract-index expression borrowing its operands for `'a`.
pub struct Expr<'a, T: Scalar> {
    pub(crate) node: Node<'a, T>,
}

pub(crate) enum Node<'a, T: Scalar> {
    Leaf {
        operand: &'a dyn Operand<T>,
        indices: Vec<AbstractIndex>,
    },
    Product(Box<Expr<'a, T>>, Box<Expr<'a, T>>),
    Sum(Box<Expr<'a, T>>, Box<Expr<'a, T>>),
    Scale(T, Box<Expr<'a, T>>),
    Split {
        inner: Box<Expr<'a, T>>,
        index: AbstractIndex,
        factors: Vec<AbstractIndex>,
    },
    Bundle {
        inner: Box<Expr<'a, T>>,
        factors: Vec<AbstractIndex>,
        index: AbstractIndex,
        target: Space,
    },
}

impl<T: Scalar, S: ComponentStorage<T>> Tensor<T, S> {
    /// Attach abstract indices to this tensor, one per index factor of its
    /// space (see [`Space::index_factors`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use symtensors::{DenseTensor, Space};
    /// use symtensors::expr::evaluate_scalar;
    ///
    /// let v = Space::vector("V", 3).unwrap();
    /// let u = DenseTensor::from_components(v.clone(), vec![1.0, 2.0, 3.0]).unwrap();
    /// let w = DenseTensor::from_components(v.dual(), vec![8.0, -2.0, 6.0]).unwrap();
    /// assert_eq!(evaluate_scalar(&(u.at("i") * w.at("i"))).unwrap(), 22.0);
    /// ```
    pub fn at(&self, indices: &str) -> Expr<'_, T> {
        Expr::leaf(self, indices)
    }
}

impl<'a, T: Scalar> Expr<'a, T> {
    /// Leaf over any operand.
    pub fn leaf(operand: &'a dyn Operand<T>, indices: &str) -> Self {
        Self {
            node: Node::Leaf {
                operand,
                indices: AbstractIndex::parse(indices),
            },
        }
    }

    pub fn scale(self, factor: T) -> Self {
        Self {
            node: Node::Scale(factor, Box::new(self)),
        }
    }

    /// Replace the free index `index`, which must range over a composite
    /// space, by one finer index per factor of that space.
    ///
    /// The value at factor indices `t` is the inner value at the slot `t`
    /// bundles to, with its sign, or zero for an alternating repeat.
    pub fn split(self, index: char, factors: &str) -> Self {
        Self {
            node: Node::Split {
                inner: Box::new(self),
                index: AbstractIndex(index),
                factors: AbstractIndex::parse(factors),
            },
        }
    }

    /// Collapse the free indices `factors` into one index `index` over the
    /// composite space `target`.
    ///
    /// For a symmetric or exterior power the value at a slot is the signed
    /// average of the inner expression over every distinct ordering of the
    /// slot's canonical multi-index.
    pub fn bundle(self, factors: &str, index: char, target: &Space) -> Self {
        Self {
            node: Node::Bundle {
                inner: Box::new(self),
                factors: AbstractIndex::parse(factors),
                index: AbstractIndex(index),
                target: target.clone(),
            },
        }
    }
}

impl<'a, T: Scalar> Mul for Expr<'a, T> {
    type Output = Expr<'a, T>;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr {
            node: Node::Product(Box::new(self), Box::new(rhs)),
        }
    }
}

impl<'a, T: Scalar> Add for Expr<'a, T> {
    type Output = Expr<'a, T>;

    fn add(self, rhs: Self) -> Self::Output {
        Expr {
            node: Node::Sum(Box::new(self), Box::new(rhs)),
        }
    }
}

impl<'a, T: Scalar> Sub for Expr<'a, T> {
    type Output = Expr<'a, T>;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl<'a, T: Scalar> Neg for Expr<'a, T> {
    type Output = Expr<'a, T>;

    fn neg(self) -> Self::Output {
        self.scale(-T::one())
    }
}

fn write_indices(f: &mut fmt::Formatter<'_>, indices: &[AbstractIndex]) -> fmt::Result {
    for index in indices {
        write!(f, "{index}")?;
    }
    Ok(())
}

impl<T: Scalar> fmt::Display for Expr<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { operand, indices } => {
                write!(f, "[{}]_", operand.operand_space())?;
                write_indices(f, indices)
            }
            Node::Product(l, r) => write!(f, "({l} * {r})"),
            Node::Sum(l, r) => write!(f, "({l} + {r})"),
            Node::Scale(c, inner) => write!(f, "{c:?} {inner}"),
            Node::Split {
                inner,
                index,
                factors,
            } => {
                write!(f, "split({inner}, {index} -> ")?;
                write_indices(f, factors)?;
                write!(f, ")")
            }
            Node::Bundle {
                inner,
                factors,
                index,
                target,
            } => {
                write!(f, "bundle({inner}, ")?;
                write_indices(f, factors)?;
                write!(f, " -> {index}: {target})")
            }
        }
    }
}

impl<T: Scalar> fmt::Debug for Expr<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::DenseTensor;

    #[test]
    fn test_display() {
        let v = Space::vector("V", 2).unwrap();
        let vv = Space::tensor_product(vec![v.clone(), v.dual()]).unwrap();
        let a = DenseTensor::<f64>::zeros(vv);
        let x = DenseTensor::<f64>::zeros(v.clone());
        let e = a.at("ij") * x.at("j") - x.at("i");
        assert_eq!(e.to_string(), "(([V ⊗ V*]_ij * [V]_j) + -1.0 [V]_i)");
    }

    #[test]
    fn test_operand_reads_storage() {
        let v = Space::vector("V", 2).unwrap();
        let x = DenseTensor::from_components(v, vec![3.0, 4.0]).unwrap();
        let op: &dyn Operand<f64> = &x;
        assert_eq!(op.read(1), 4.0);
        assert_eq!(op.operand_space().dimension(), 2);
    }
}
