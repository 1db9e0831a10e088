//! Exact Euclidean distance transform (Felzenszwalb & Huttenlocher): a 1-D
//! lower envelope of parabolas run over columns, then rows.

/// Stand-in for infinity that keeps the envelope arithmetic finite.
const FAR: f64 = 1e20;

/// Squared distance transform of one line of sample costs `f` into `out`.
fn transform_line(f: &[f64], out: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let qf = q as f64;
        let mut s;
        loop {
            let p = v[k];
            let pf = p as f64;
            s = ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf));
            if s <= z[k] {
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let d = q as f64 - v[k] as f64;
        *slot = d * d + f[v[k]];
    }
}

/// Distance from every cell to the nearest `true` cell of `mask`
/// (row-major, `width x height`). Returns `None` when the mask is empty.
pub fn distance_to(mask: &[bool], width: usize, height: usize) -> Option<Vec<f64>> {
    if !mask.iter().any(|&m| m) {
        return None;
    }
    let n = width.max(height);
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];
    let mut line = vec![0.0f64; n];
    let mut out = vec![0.0f64; n];

    let mut grid: Vec<f64> = mask.iter().map(|&m| if m { 0.0 } else { FAR }).collect();

    for c in 0..width {
        for r in 0..height {
            line[r] = grid[r * width + c];
        }
        transform_line(&line[..height], &mut out[..height], &mut v, &mut z);
        for r in 0..height {
            grid[r * width + c] = out[r];
        }
    }
    for r in 0..height {
        let row = &mut grid[r * width..(r + 1) * width];
        line[..width].copy_from_slice(row);
        transform_line(&line[..width], &mut out[..width], &mut v, &mut z);
        row.copy_from_slice(&out[..width]);
    }

    Some(grid.into_iter().map(f64::sqrt).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn brute_force(mask: &[bool], width: usize, height: usize) -> Vec<f64> {
        let sources: Vec<(usize, usize)> =
            (0..mask.len()).filter(|&i| mask[i]).map(|i| (i / width, i % width)).collect();
        (0..width * height)
            .map(|i| {
                let (r, c) = (i / width, i % width);
                sources
                    .iter()
                    .map(|&(sr, sc)| {
                        let dr = r as f64 - sr as f64;
                        let dc = c as f64 - sc as f64;
                        (dr * dr + dc * dc).sqrt()
                    })
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }

    #[test]
    fn matches_brute_force() {
        let (w, h) = (13, 9);
        let mask: Vec<bool> = (0..w * h).map(|i| (i * 37 + 11) % 23 == 0).collect();
        let fast = distance_to(&mask, w, h).unwrap();
        let slow = brute_force(&mask, w, h);
        for (a, b) in fast.iter().zip(&slow) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_source_in_corner() {
        let mut mask = vec![false; 4 * 3];
        mask[0] = true;
        let d = distance_to(&mask, 4, 3).unwrap();
        assert_eq!(d[0], 0.0);
        assert_abs_diff_eq!(d[3], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[2 * 4 + 3], 13f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn empty_mask_has_no_distances() {
        assert!(distance_to(&[false; 6], 3, 2).is_none());
    }
}
