//! Integration tests for multi-index codecs.
//!
//! Enumerates every component slot of small powers and checks counts,
//! round trips and multiplicities exactly.

use symtensors::codec::binomial::{binomial, factorial};
use symtensors::{Check, MultiIndexCodec, MultiIndexIter, Sign, Space, Symmetry};

fn pow(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, _| acc * n)
}

#[test]
fn test_dimension_conservation() {
    for n in 1..=5 {
        for k in 1..=4 {
            let sym = MultiIndexCodec::symmetric(n, k).unwrap();
            let canonical = MultiIndexIter::new(&vec![n; k])
                .filter(|m| m.is_non_decreasing())
                .count();
            assert_eq!(sym.dimension(), canonical, "Sym^{k} over {n}");
            assert_eq!(sym.dimension(), binomial(n + k - 1, k).unwrap());

            let product = MultiIndexCodec::product(&vec![n; k]).unwrap();
            assert_eq!(product.dimension(), pow(n, k));

            if k <= n {
                let alt = MultiIndexCodec::alternating(n, k).unwrap();
                let canonical = MultiIndexIter::new(&vec![n; k])
                    .filter(|m| m.is_strictly_increasing())
                    .count();
                assert_eq!(alt.dimension(), canonical, "Λ^{k} over {n}");
                assert_eq!(alt.dimension(), binomial(n, k).unwrap());
            }
        }
    }
}

#[test]
fn test_round_trip_every_slot() {
    let codecs = [
        MultiIndexCodec::symmetric(4, 3).unwrap(),
        MultiIndexCodec::alternating(5, 3).unwrap(),
        MultiIndexCodec::product(&[2, 3, 4]).unwrap(),
    ];
    for codec in &codecs {
        for i in 0..codec.dimension() {
            let m = codec.split(i, Check::Enforced).unwrap();
            let slot = codec.bundle(m.as_slice(), Check::Enforced).unwrap().unwrap();
            assert_eq!(slot.index, i);
            assert_eq!(slot.sign, Sign::Plus);
        }
    }
}

#[test]
fn test_split_yields_canonical_forms() {
    let sym = MultiIndexCodec::symmetric(3, 4).unwrap();
    let alt = MultiIndexCodec::alternating(6, 4).unwrap();
    assert!(sym.components().all(|(_, m)| m.is_non_decreasing()));
    assert!(alt.components().all(|(_, m)| m.is_strictly_increasing()));
}

#[test]
fn test_multiplicity_consistency() {
    // Summing the multiplicity over canonical tuples weighted by orderings
    // recovers every k-tuple exactly once.
    let (n, k) = (4, 3);
    let sym = MultiIndexCodec::symmetric(n, k).unwrap();
    let total: usize = sym
        .components()
        .map(|(_, m)| sym.multiplicity(m.as_slice(), Check::Enforced).unwrap())
        .sum();
    assert_eq!(total, pow(n, k));

    for (_, m) in sym.components() {
        let mult = sym.multiplicity(m.as_slice(), Check::Enforced).unwrap();
        let orderings = sym.orderings(m.as_slice(), Check::Enforced).unwrap();
        assert_eq!(orderings.len(), mult);
        let stabilizer: usize = m
            .as_slice()
            .chunk_by(|a, b| a == b)
            .map(|group| factorial(group.len()))
            .product();
        assert_eq!(mult * stabilizer, factorial(k), "{m}");
        for (p, _) in &orderings {
            assert_eq!(sym.multiplicity(p.as_slice(), Check::Enforced), Ok(mult));
        }
    }
}

#[test]
fn test_alternating_zero_law() {
    let alt = MultiIndexCodec::alternating(4, 3).unwrap();
    for m in MultiIndexIter::new(&[4, 4, 4]) {
        let repeated = !m.sorted_with_sign().0.is_strictly_increasing();
        let slot = alt.bundle(m.as_slice(), Check::Enforced).unwrap();
        assert_eq!(slot.is_none(), repeated, "{m}");
    }
}

#[test]
fn test_alternating_sign_is_parity() {
    let alt = MultiIndexCodec::alternating(3, 3).unwrap();
    let cases = [
        ([0, 1, 2], Sign::Plus),
        ([1, 2, 0], Sign::Plus),
        ([2, 0, 1], Sign::Plus),
        ([0, 2, 1], Sign::Minus),
        ([2, 1, 0], Sign::Minus),
        ([1, 0, 2], Sign::Minus),
    ];
    for (m, sign) in cases {
        let slot = alt.bundle(&m, Check::Enforced).unwrap().unwrap();
        assert_eq!(slot.index, 0);
        assert_eq!(slot.sign, sign, "{m:?}");
    }
}

#[test]
fn test_space_owns_codec() {
    let v = Space::vector("V", 4).unwrap();
    let s = Space::symmetric_power(&v, 3).unwrap();
    let t = s.clone();
    assert!(std::ptr::eq(s.codec(), t.codec()));
    assert_eq!(s.codec().symmetry(), Symmetry::Symmetric);
    assert_eq!(s.codec().order(), 3);
    assert_eq!(s.codec().factor_dim(2), 4);
}

#[test]
fn test_range_check_elided() {
    let sym = MultiIndexCodec::symmetric(3, 2).unwrap();
    assert!(sym.split(10, Check::Enforced).is_err());
    assert!(sym.bundle(&[0, 7], Check::Enforced).is_err());
    // Elided checks trust the caller; in-range input behaves identically.
    assert_eq!(
        sym.bundle(&[1, 2], Check::Elided).unwrap(),
        sym.bundle(&[2, 1], Check::Enforced).unwrap()
    );
}
