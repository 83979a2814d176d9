//! symtensors - compact symmetric tensors and abstract-index contraction
//!
//! This crate models vector spaces with their tensor, symmetric and exterior
//! powers, stores tensors compactly according to their symmetry, and
//! evaluates Einstein-summation expressions written with abstract indices.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Expressions (expr module)
//!     → t.at("ij") * x.at("j"), split, bundle, evaluate, assign
//!
//! Level 2: Tensors (tensor module)
//!     → Tensor<T, S> = Space + ComponentStorage
//!
//! Level 3: Codecs and storage (codec, storage modules)
//!     → MultiIndex <-> ComponentIndex, Dense / External / Procedural
//! ```
//!
//! # Example
//!
//! ```
//! use symtensors::{Check, DenseTensor, Space};
//! use symtensors::expr::evaluate;
//!
//! let v = Space::vector("V", 3).unwrap();
//! let sym = Space::symmetric_power(&v, 2).unwrap();
//! assert_eq!(sym.dimension(), 6);
//!
//! // A symmetric matrix stores each off-diagonal entry once.
//! let mut g: DenseTensor<f64> = DenseTensor::zeros(Space::symmetric_power(&v.dual(), 2).unwrap());
//! g.set(&[0, 1], 2.0, Check::Enforced).unwrap();
//! assert_eq!(g.get(&[1, 0], Check::Enforced), Ok(2.0));
//!
//! // g(x, .) through a split of the compact index.
//! let x = DenseTensor::from_components(v.clone(), vec![1.0, 0.0, 0.0]).unwrap();
//! let y = evaluate(&(g.at("s").split('s', "ij") * x.at("i"))).unwrap();
//! assert_eq!(y.data(), &[0.0, 2.0, 0.0]);
//! ```

pub mod backend;
pub mod codec;
pub mod constants;
pub mod error;
pub mod expr;
pub mod multi_index;
pub mod random;
pub mod scalar;
pub mod space;
pub mod storage;
pub mod strides;
pub mod tensor;

pub use codec::{MultiIndexCodec, SignedIndex};
pub use error::{Check, MismatchReason, TensorError};
pub use expr::{AbstractIndex, Contraction, Expr, assign, evaluate, evaluate_scalar};
pub use multi_index::{ComponentIndex, MultiIndex, MultiIndexIter, Sign};
pub use scalar::{Scalar, c64};
pub use space::{Space, Symmetry, Variance};
pub use storage::{ComponentStorage, ComponentStorageMut, Dense, External, Procedural};
pub use tensor::{DenseTensor, ExternalTensor, ProceduralTensor, Tensor};
