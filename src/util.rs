//! Small geometry helpers shared across the tracker and sampler modules.

/// Row-major enumeration of every multi-index in `shape`.
pub fn all_indices(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = shape.iter().product();
    (0..total).map(move |flat| {
        let mut flat = flat;
        let mut idx = vec![0usize; shape.len()];
        for ax in (0..shape.len()).rev() {
            idx[ax] = flat % shape[ax];
            flat /= shape[ax];
        }
        idx
    })
}

/// Every nonzero offset in `{-1, 0, 1}^dim` (the Moore/26-/8-connected
/// neighborhood), used by the DPN sampler (spec.md §4.2).
pub fn moore_offsets(dim: usize) -> Vec<Vec<i64>> {
    let mut offsets = vec![vec![]];
    for _ in 0..dim {
        let mut next = Vec::with_capacity(offsets.len() * 3);
        for o in &offsets {
            for d in [-1i64, 0, 1] {
                let mut o2 = o.clone();
                o2.push(d);
                next.push(o2);
            }
        }
        offsets = next;
    }
    offsets.into_iter().filter(|o| o.iter().any(|&d| d != 0)).collect()
}
