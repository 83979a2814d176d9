//! Pascal-triangle lookup for combinatorial ranking.

/// Precomputed binomial coefficients `C(n, r)` for `n <= max_n`, `r <= max_r`.
///
/// Columns `r <= 1` are closed form and not stored, so first powers of any
/// dimension need no table. Entries saturate at `usize::MAX` instead of
/// wrapping. Ranking only ever sums coefficients that are smaller than the
/// codec dimension, and the codec rejects dimensions that saturate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinomialTable {
    max_r: usize,
    rows: Vec<usize>,
}

impl BinomialTable {
    /// `None` when the stored columns would not fit in memory.
    pub fn new(max_n: usize, max_r: usize) -> Option<Self> {
        let width = max_r.saturating_sub(1);
        if width == 0 {
            return Some(Self {
                max_r,
                rows: Vec::new(),
            });
        }
        let len = max_n.checked_add(1)?.checked_mul(width)?;
        let mut rows = Vec::new();
        rows.try_reserve_exact(len).ok()?;
        rows.resize(len, 0);
        for n in 1..=max_n {
            for r in 2..=max_r.min(n) {
                let above = rows[(n - 1) * width + r - 2];
                let above_left = if r == 2 {
                    n - 1
                } else {
                    rows[(n - 1) * width + r - 3]
                };
                rows[n * width + r - 2] = above.saturating_add(above_left);
            }
        }
        Some(Self { max_r, rows })
    }

    /// `C(n, r)`; zero when `r > n`.
    #[inline]
    pub fn get(&self, n: usize, r: usize) -> usize {
        debug_assert!(r <= self.max_r);
        match r {
            0 => 1,
            1 => n,
            _ => self.rows[n * (self.max_r - 1) + r - 2],
        }
    }
}

/// `C(n, k)` by the multiplicative formula, `None` on overflow.
pub fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    usize::try_from(acc).ok()
}

/// `k!`, saturating.
pub fn factorial(k: usize) -> usize {
    (1..=k).fold(1usize, |acc, x| acc.saturating_mul(x))
}
