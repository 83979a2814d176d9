//! Index analysis: validate an expression once and lower it to a plan.
//!
//! Every index binding in the expression becomes one slot of a flat value
//! array, described by an [`IndexRecord`]. Evaluation then only assigns slot
//! values and reads components; no names are looked up inside the loops.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{MismatchReason, TensorError};
use crate::scalar::Scalar;
use crate::space::{Space, check_pairing};
use crate::strides::compute_strides;

use super::index::AbstractIndex;
use super::tree::{Expr, Node, Operand};

/// What an index binding does in the compiled contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRole {
    /// Ranges over the output.
    Free,
    /// Contracted with its dual partner and summed.
    Summed,
    /// Set by an enclosing split, bundle or sum; never iterated on its own.
    Internal,
}

/// One index binding: its token, the space it ranges over and, when it is
/// contracted, the space of the occurrence it pairs with.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    pub index: AbstractIndex,
    pub space: Space,
    pub partner: Option<Space>,
    pub role: IndexRole,
}

/// Loop variable: every listed slot takes the same value in `0..dim`.
#[derive(Debug, Clone)]
pub(crate) struct SummedIndex {
    pub(crate) slots: Vec<usize>,
    pub(crate) dim: usize,
}

pub(crate) struct LeafPlan<'a, T: Scalar> {
    pub(crate) operand: &'a dyn Operand<T>,
    pub(crate) slots: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) summed: Vec<SummedIndex>,
}

pub(crate) enum Plan<'a, T: Scalar> {
    Leaf(LeafPlan<'a, T>),
    Product {
        left: Box<Plan<'a, T>>,
        right: Box<Plan<'a, T>>,
        summed: Vec<SummedIndex>,
    },
    Sum {
        left: Box<Plan<'a, T>>,
        right: Box<Plan<'a, T>>,
        /// `(left slot, right slot)` pairs naming the same free index.
        links: Vec<(usize, usize)>,
    },
    Scale(T, Box<Plan<'a, T>>),
    Split {
        inner: Box<Plan<'a, T>>,
        space: Space,
        source: usize,
        factors: Vec<usize>,
    },
    Bundle {
        inner: Box<Plan<'a, T>>,
        space: Space,
        factors: Vec<usize>,
        target: usize,
    },
}

/// A validated expression, ready to evaluate any number of times.
pub struct Contraction<'a, T: Scalar> {
    pub(crate) plan: Plan<'a, T>,
    pub(crate) records: Vec<IndexRecord>,
    pub(crate) free: Vec<usize>,
    pub(crate) output_space: Space,
}

#[derive(Debug, Clone)]
struct FreeIndex {
    index: AbstractIndex,
    space: Space,
    slot: usize,
}

/// Free indices of a subexpression in first-occurrence order, and every
/// token it mentions.
struct Scope {
    free: Vec<FreeIndex>,
    used: BTreeSet<AbstractIndex>,
}

impl Scope {
    fn find(&self, index: AbstractIndex) -> Option<&FreeIndex> {
        self.free.iter().find(|f| f.index == index)
    }

    fn is_bound(&self, index: AbstractIndex) -> bool {
        self.used.contains(&index) && self.find(index).is_none()
    }
}

struct Compiler {
    records: Vec<IndexRecord>,
}

impl Compiler {
    fn alloc(&mut self, index: AbstractIndex, space: Space) -> usize {
        self.records.push(IndexRecord {
            index,
            space,
            partner: None,
            role: IndexRole::Free,
        });
        self.records.len() - 1
    }

    fn contract(&mut self, slot: usize, partner: &Space) {
        let record = &mut self.records[slot];
        record.role = IndexRole::Summed;
        record.partner = Some(partner.clone());
    }

    fn lower<'a, T: Scalar>(
        &mut self,
        expr: &Expr<'a, T>,
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        match &expr.node {
            Node::Leaf { operand, indices } => self.lower_leaf(*operand, indices),
            Node::Product(l, r) => {
                let (left, ls) = self.lower(l)?;
                let (right, rs) = self.lower(r)?;
                self.lower_product(left, ls, right, rs)
            }
            Node::Sum(l, r) => {
                let (left, ls) = self.lower(l)?;
                let (right, rs) = self.lower(r)?;
                self.lower_sum(left, ls, right, rs)
            }
            Node::Scale(c, inner) => {
                let (plan, scope) = self.lower(inner)?;
                Ok((Plan::Scale(*c, Box::new(plan)), scope))
            }
            Node::Split {
                inner,
                index,
                factors,
            } => {
                let (plan, scope) = self.lower(inner)?;
                self.lower_split(plan, scope, *index, factors)
            }
            Node::Bundle {
                inner,
                factors,
                index,
                target,
            } => {
                let (plan, scope) = self.lower(inner)?;
                self.lower_bundle(plan, scope, factors, *index, target)
            }
        }
    }

    fn lower_leaf<'a, T: Scalar>(
        &mut self,
        operand: &'a dyn Operand<T>,
        indices: &[AbstractIndex],
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        let factors = operand.operand_space().index_factors();
        if indices.len() != factors.len() {
            return Err(MismatchReason::LeafArity {
                expected: factors.len(),
                actual: indices.len(),
            }
            .into());
        }

        let mut free: Vec<FreeIndex> = Vec::new();
        let mut traced = BTreeSet::new();
        let mut slots = Vec::with_capacity(indices.len());
        let mut summed = Vec::new();
        for (&index, space) in indices.iter().zip(factors) {
            if traced.contains(&index) {
                return Err(MismatchReason::TooManyOccurrences { index: index.0 }.into());
            }
            if let Some(pos) = free.iter().position(|f| f.index == index) {
                let first = free.remove(pos);
                check_pairing(index.0, &first.space, space)?;
                self.contract(first.slot, space);
                slots.push(first.slot);
                summed.push(SummedIndex {
                    slots: vec![first.slot],
                    dim: space.dimension(),
                });
                traced.insert(index);
            } else {
                let slot = self.alloc(index, space.clone());
                slots.push(slot);
                free.push(FreeIndex {
                    index,
                    space: space.clone(),
                    slot,
                });
            }
        }

        let dims: Vec<usize> = factors.iter().map(Space::dimension).collect();
        let plan = Plan::Leaf(LeafPlan {
            operand,
            slots,
            strides: compute_strides(&dims),
            summed,
        });
        let scope = Scope {
            free,
            used: indices.iter().copied().collect(),
        };
        Ok((plan, scope))
    }

    fn lower_product<'a, T: Scalar>(
        &mut self,
        left: Plan<'a, T>,
        ls: Scope,
        right: Plan<'a, T>,
        rs: Scope,
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        // A token bound on one side is out of reach of the other.
        for (bound_side, other) in [(&ls, &rs), (&rs, &ls)] {
            if let Some(&index) = bound_side
                .used
                .iter()
                .find(|&&i| bound_side.is_bound(i) && other.used.contains(&i))
            {
                return Err(MismatchReason::TooManyOccurrences { index: index.0 }.into());
            }
        }

        let mut free = Vec::new();
        let mut summed = Vec::new();
        for f in &ls.free {
            match rs.find(f.index) {
                Some(g) => {
                    check_pairing(f.index.0, &f.space, &g.space)?;
                    self.contract(f.slot, &g.space);
                    self.contract(g.slot, &f.space);
                    summed.push(SummedIndex {
                        slots: vec![f.slot, g.slot],
                        dim: f.space.dimension(),
                    });
                }
                None => free.push(f.clone()),
            }
        }
        free.extend(rs.free.iter().filter(|g| ls.find(g.index).is_none()).cloned());

        let plan = Plan::Product {
            left: Box::new(left),
            right: Box::new(right),
            summed,
        };
        let used = ls.used.union(&rs.used).copied().collect();
        Ok((plan, Scope { free, used }))
    }

    fn lower_sum<'a, T: Scalar>(
        &mut self,
        left: Plan<'a, T>,
        ls: Scope,
        right: Plan<'a, T>,
        rs: Scope,
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        if ls.free.len() != rs.free.len() {
            return Err(MismatchReason::SummandIndices.into());
        }
        let mut links = Vec::with_capacity(ls.free.len());
        for f in &ls.free {
            let g = rs
                .find(f.index)
                .filter(|g| g.space == f.space)
                .ok_or(MismatchReason::SummandIndices)?;
            self.records[g.slot].role = IndexRole::Internal;
            links.push((f.slot, g.slot));
        }

        let plan = Plan::Sum {
            left: Box::new(left),
            right: Box::new(right),
            links,
        };
        let used = ls.used.union(&rs.used).copied().collect();
        Ok((
            plan,
            Scope {
                free: ls.free,
                used,
            },
        ))
    }

    fn lower_split<'a, T: Scalar>(
        &mut self,
        inner: Plan<'a, T>,
        mut scope: Scope,
        index: AbstractIndex,
        factors: &[AbstractIndex],
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        let pos = scope
            .free
            .iter()
            .position(|f| f.index == index)
            .ok_or(MismatchReason::NotFree { index: index.0 })?;
        let source = scope.free[pos].clone();
        let space = source.space;
        if !space.is_composite() {
            return Err(MismatchReason::NotComposite { index: index.0 }.into());
        }
        if factors.len() != space.factor_spaces().len() {
            return Err(MismatchReason::FactorCount {
                expected: space.factor_spaces().len(),
                actual: factors.len(),
            }
            .into());
        }
        check_fresh(&scope.used, factors)?;

        self.records[source.slot].role = IndexRole::Internal;
        let fine: Vec<FreeIndex> = factors
            .iter()
            .zip(space.factor_spaces())
            .map(|(&index, factor)| FreeIndex {
                index,
                space: factor.clone(),
                slot: self.alloc(index, factor.clone()),
            })
            .collect();
        let factor_slots = fine.iter().map(|f| f.slot).collect();
        scope.free.remove(pos);
        for (n, f) in fine.into_iter().enumerate() {
            scope.free.insert(pos + n, f);
        }
        scope.used.extend(factors.iter().copied());

        let plan = Plan::Split {
            inner: Box::new(inner),
            space,
            source: source.slot,
            factors: factor_slots,
        };
        Ok((plan, scope))
    }

    fn lower_bundle<'a, T: Scalar>(
        &mut self,
        inner: Plan<'a, T>,
        mut scope: Scope,
        factors: &[AbstractIndex],
        index: AbstractIndex,
        target: &Space,
    ) -> Result<(Plan<'a, T>, Scope), TensorError> {
        if !target.is_composite() {
            return Err(MismatchReason::NotComposite { index: index.0 }.into());
        }
        if factors.len() != target.factor_spaces().len() {
            return Err(MismatchReason::FactorCount {
                expected: target.factor_spaces().len(),
                actual: factors.len(),
            }
            .into());
        }
        if scope.used.contains(&index) {
            return Err(MismatchReason::TooManyOccurrences { index: index.0 }.into());
        }

        let mut factor_slots = Vec::with_capacity(factors.len());
        let mut first_pos = scope.free.len();
        for (n, (&token, factor_space)) in factors.iter().zip(target.factor_spaces()).enumerate() {
            if factors[..n].contains(&token) {
                return Err(MismatchReason::TooManyOccurrences { index: token.0 }.into());
            }
            let pos = scope
                .free
                .iter()
                .position(|f| f.index == token)
                .ok_or(MismatchReason::NotFree { index: token.0 })?;
            let free = &scope.free[pos];
            if free.space != *factor_space {
                return Err(MismatchReason::FactorMismatch { index: token.0 }.into());
            }
            factor_slots.push(free.slot);
            first_pos = first_pos.min(pos);
        }
        for &slot in &factor_slots {
            self.records[slot].role = IndexRole::Internal;
        }

        let slot = self.alloc(index, target.clone());
        let before = scope.free[..first_pos]
            .iter()
            .filter(|f| !factors.contains(&f.index))
            .count();
        scope.free.retain(|f| !factors.contains(&f.index));
        scope.free.insert(
            before,
            FreeIndex {
                index,
                space: target.clone(),
                slot,
            },
        );
        scope.used.insert(index);

        let plan = Plan::Bundle {
            inner: Box::new(inner),
            space: target.clone(),
            factors: factor_slots,
            target: slot,
        };
        Ok((plan, scope))
    }
}

/// New tokens must be distinct and unused in the expression they extend.
fn check_fresh(
    used: &BTreeSet<AbstractIndex>,
    tokens: &[AbstractIndex],
) -> Result<(), TensorError> {
    for (n, token) in tokens.iter().enumerate() {
        if used.contains(token) || tokens[..n].contains(token) {
            return Err(MismatchReason::TooManyOccurrences { index: token.0 }.into());
        }
    }
    Ok(())
}

/// Output space for free indices in order: scalars, the single index's own
/// space, or the tensor product.
fn output_space(free: &[FreeIndex]) -> Result<Space, TensorError> {
    match free {
        [] => Ok(Space::scalar()),
        [only] => Ok(only.space.clone()),
        _ => Space::tensor_product(free.iter().map(|f| f.space.clone()).collect()),
    }
}

impl<'a, T: Scalar> Contraction<'a, T> {
    /// Validate `expr` and lower it to a plan.
    ///
    /// # Errors
    ///
    /// `StructuralMismatch` when a token occurs more than twice in one scope,
    /// pairs two occurrences that are not dual spaces of equal dimension, or
    /// a leaf, sum, split or bundle is malformed.
    pub fn compile(expr: &Expr<'a, T>) -> Result<Self, TensorError> {
        let mut compiler = Compiler {
            records: Vec::new(),
        };
        let (plan, scope) = compiler.lower(expr)?;
        let output_space = output_space(&scope.free)?;
        let free: Vec<usize> = scope.free.iter().map(|f| f.slot).collect();
        debug!(
            free = free.len(),
            summed = compiler
                .records
                .iter()
                .filter(|r| r.role == IndexRole::Summed)
                .count(),
            records = compiler.records.len(),
            output_dimension = output_space.dimension(),
            "compiled contraction"
        );
        Ok(Self {
            plan,
            records: compiler.records,
            free,
            output_space,
        })
    }

    /// Every index binding, in allocation order.
    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    /// Free indices in output order.
    pub fn free_indices(&self) -> Vec<AbstractIndex> {
        self.free.iter().map(|&s| self.records[s].index).collect()
    }

    pub fn output_space(&self) -> &Space {
        &self.output_space
    }
}
