//! Abstract-index expressions under the Einstein summation convention.
//!
//! An expression is built from tensor leaves annotated with one token per
//! index slot:
//!
//! ```text
//! Expr
//! ├── Leaf     t.at("ij")            one token per index factor
//! ├── Product  a * b                 shared tokens are contracted
//! ├── Sum      a + b, a - b          same free tokens on both sides
//! ├── Scale    a.scale(c), -a
//! ├── Split    a.split('s', "ij")    expose the factors of a composite index
//! └── Bundle   a.bundle("ij", 's', &space)
//! ```
//!
//! [`Contraction::compile`] checks the whole tree once: a token occurs at
//! most twice per scope, and the two occurrences must sit on dual spaces of
//! equal dimension. The result is a flat list of [`IndexRecord`]s and a plan
//! that [`Contraction::evaluate`] runs as nested loops.
//!
//! Free tokens of the result appear in first-occurrence order, left to right.
//! Use [`assign`] to write into a tensor with a different slot order.
//!
//! # Example
//!
//! ```
//! use symtensors::{DenseTensor, Space};
//! use symtensors::expr::evaluate;
//!
//! // Symmetric square of v = (1, 2): compact slots (0,0), (0,1), (1,1).
//! let v = Space::vector("V", 2).unwrap();
//! let x = DenseTensor::from_components(v.clone(), vec![1.0, 2.0]).unwrap();
//! let sym = Space::symmetric_power(&v, 2).unwrap();
//! let s = evaluate(&(x.at("i") * x.at("j")).bundle("ij", 's', &sym)).unwrap();
//! assert_eq!(s.space(), &sym);
//! assert_eq!(s.data(), &[1.0, 2.0, 4.0]);
//! ```

mod compile;
mod eval;
mod index;
mod tree;

pub use compile::{Contraction, IndexRecord, IndexRole};
pub use eval::{assign, evaluate, evaluate_scalar};
pub use index::AbstractIndex;
pub use tree::{Expr, Operand};
