//! Slope-adaptive smoothing: steep cells lean toward a Gaussian-blurred copy,
//! flat cells keep most of their original height.
use crate::field::ScalarField;

const SIGMA: f64 = 0.5;
const RADIUS: isize = 2;
const SLOPE_GAIN: f64 = 3.0;
const MIN_BLEND: f64 = 0.2;
const MAX_BLEND: f64 = 0.8;

/// Reflect an out-of-range index back into `0..n` (`d c b a | a b c d | d c b a`).
#[inline]
fn reflect(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    while i < 0 || i >= n {
        i = if i < 0 { -i - 1 } else { 2 * n - i - 1 };
    }
    i as usize
}

fn kernel() -> Vec<f64> {
    let weights: Vec<f64> = (-RADIUS..=RADIUS)
        .map(|k| (-((k * k) as f64) / (2.0 * SIGMA * SIGMA)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Separable Gaussian blur with reflected borders.
pub fn gaussian_blur(field: &ScalarField) -> ScalarField {
    let (w, h) = (field.width, field.height);
    let k = kernel();

    let mut rows = ScalarField::new(w, h, 0.0);
    for r in 0..h {
        for c in 0..w {
            let mut acc = 0.0;
            for (j, weight) in k.iter().enumerate() {
                let cc = reflect(c as isize + j as isize - RADIUS, w);
                acc += weight * field.get(r, cc);
            }
            rows.set(r, c, acc);
        }
    }

    let mut out = ScalarField::new(w, h, 0.0);
    for r in 0..h {
        for c in 0..w {
            let mut acc = 0.0;
            for (j, weight) in k.iter().enumerate() {
                let rr = reflect(r as isize + j as isize - RADIUS, h);
                acc += weight * rows.get(rr, c);
            }
            out.set(r, c, acc);
        }
    }
    out
}

pub fn smooth(field: &ScalarField) -> ScalarField {
    let blurred = gaussian_blur(field);
    let (gy, gx) = field.gradient();
    let data = field
        .data
        .iter()
        .zip(&blurred.data)
        .zip(gy.iter().zip(&gx))
        .map(|((&raw, &soft), (&dy, &dx))| {
            let slope = (dy * dy + dx * dx).sqrt();
            let blend = (SLOPE_GAIN * slope).clamp(MIN_BLEND, MAX_BLEND);
            ((1.0 - blend) * raw + blend * soft).clamp(0.0, 1.0)
        })
        .collect();
    ScalarField { data, width: field.width, height: field.height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reflect_mirrors_both_edges() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        assert_eq!(reflect(3, 2), 0);
    }

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let k = kernel();
        assert_eq!(k.len(), 5);
        assert_abs_diff_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k[0], k[4], epsilon = 1e-15);
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn flat_field_is_unchanged() {
        let field = ScalarField::new(9, 7, 0.42);
        let out = smooth(&field);
        for v in &out.data {
            assert_abs_diff_eq!(*v, 0.42, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_spike_is_flattened() {
        let mut field = ScalarField::new(9, 9, 0.3);
        field.set(4, 4, 0.9);
        let out = smooth(&field);
        assert!(out.get(4, 4) < 0.9);
        assert!(out.get(4, 4) > 0.3);
    }
}
