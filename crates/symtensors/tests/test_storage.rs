//! Integration tests for component storage backends.
//!
//! Dense, external and procedural storage must present the same components
//! through the same tensor API.

use std::cell::Cell;

use symtensors::storage::{ComponentStorage, External};
use symtensors::{
    Check, DenseTensor, ExternalTensor, ProceduralTensor, Space, Tensor, TensorError,
};

fn sym2(n: usize) -> Space {
    let v = Space::vector("V", n).unwrap();
    Space::symmetric_power(&v, 2).unwrap()
}

#[test]
fn test_persisted_layout() {
    // Sym^2 over dim 3 stores (0,0) (0,1) (1,1) (0,2) (1,2) (2,2).
    let t = DenseTensor::from_fn(sym2(3), |m| (10 * m[0] + m[1]) as f64);
    assert_eq!(t.data(), &[0.0, 1.0, 11.0, 2.0, 12.0, 22.0]);
    let canonical: Vec<Vec<usize>> = t.entries().map(|(m, _)| m.as_slice().to_vec()).collect();
    assert_eq!(
        canonical,
        vec![
            vec![0, 0],
            vec![0, 1],
            vec![1, 1],
            vec![0, 2],
            vec![1, 2],
            vec![2, 2]
        ]
    );
}

#[test]
fn test_external_views_alias() {
    let space = sym2(2);
    let mut buffer = vec![0.0f64; 3];
    let cells = Cell::from_mut(buffer.as_mut_slice()).as_slice_of_cells();
    let mut a: ExternalTensor<'_, f64> =
        Tensor::with_storage(space.clone(), External::from_cells(cells)).unwrap();
    let b: ExternalTensor<'_, f64> =
        Tensor::with_storage(space, External::from_cells(cells)).unwrap();
    assert!(a.shares_buffer_with(&b));

    a.set(&[1, 0], 5.0, Check::Enforced).unwrap();
    assert_eq!(b.get(&[0, 1], Check::Enforced), Ok(5.0));
    a.fill(1.5);
    assert!(b.components().all(|x| x == 1.5));
    assert_eq!(buffer, vec![1.5, 1.5, 1.5]);
}

#[test]
fn test_external_length_must_match() {
    let mut buffer = vec![0.0f64; 4];
    let err = ExternalTensor::from_slice(sym2(2), &mut buffer).unwrap_err();
    assert_eq!(
        err,
        TensorError::ShapeMismatch {
            expected: 3,
            actual: 4
        }
    );
}

#[test]
fn test_external_null_pointer() {
    let null = std::ptr::null_mut();
    let result = unsafe { External::<f64>::from_raw_parts(null, 3, Check::Enforced) };
    assert!(matches!(result, Err(TensorError::InvalidArgument { .. })));
}

#[test]
fn test_dense_view_writes_through() {
    let mut t: DenseTensor<f64> = DenseTensor::zeros(sym2(3));
    {
        let mut view = t.view();
        view.set(&[2, 1], -1.0, Check::Enforced).unwrap();
    }
    assert_eq!(t.get(&[1, 2], Check::Enforced), Ok(-1.0));
    assert_eq!(t.size_in_bytes(), 6 * std::mem::size_of::<f64>());
}

#[test]
fn test_procedural_is_memoryless() {
    let p = ProceduralTensor::procedural(sym2(100), |i| i as f64);
    assert_eq!(p.len(), 5050);
    assert_eq!(p.size_in_bytes(), 0);
    assert_eq!(p.storage().component(42), 42.0);
    assert_eq!(p.get_component(5050, Check::Enforced).ok(), None);
}

#[test]
fn test_backends_agree() {
    let space = sym2(3);
    let dense = DenseTensor::from_fn(space.clone(), |m| (m[0] + 2 * m[1]) as f64);
    let mut buffer = dense.data().to_vec();
    let external = ExternalTensor::from_slice(space.clone(), &mut buffer).unwrap();
    let handle = space.clone();
    let procedural = ProceduralTensor::procedural(space, move |i| {
        let m = handle.codec().split(i, Check::Elided).unwrap_or_default();
        (m[0] + 2 * m[1]) as f64
    });

    for (i, j) in [(0, 0), (2, 1), (1, 2), (0, 2)] {
        let expected = dense.get(&[i, j], Check::Enforced).unwrap();
        assert_eq!(external.get(&[i, j], Check::Enforced), Ok(expected));
        assert_eq!(procedural.get(&[i, j], Check::Enforced), Ok(expected));
    }
    assert_eq!(procedural.to_dense().data(), dense.data());
}

#[test]
fn test_exterior_write_to_repeated_index() {
    let v = Space::vector("V", 3).unwrap();
    let mut t: DenseTensor<f64> = DenseTensor::zeros(Space::exterior_power(&v, 2).unwrap());
    assert_eq!(
        t.set(&[2, 2], 1.0, Check::Enforced),
        Err(TensorError::WriteToStructuralZero {
            indices: vec![2, 2]
        })
    );
    t.set(&[2, 0], 3.0, Check::Enforced).unwrap();
    assert_eq!(t.get(&[0, 2], Check::Enforced), Ok(-3.0));
}
