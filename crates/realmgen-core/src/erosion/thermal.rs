//! Thermal weathering: material slides from a cell to lower axis neighbours
//! when the height difference exceeds `min_slope`.
//!
//! Transfers are computed against a snapshot of the heights at the start of
//! the iteration and applied together, so total mass is conserved exactly up
//! to floating-point rounding.
use crate::field::ScalarField;

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One thermal iteration over all interior cells.
pub fn apply(field: &mut ScalarField, min_slope: f64) {
    let (w, h) = (field.width, field.height);
    if w < 3 || h < 3 {
        return;
    }
    let snapshot = field.data.clone();

    for r in 1..h - 1 {
        for c in 1..w - 1 {
            let i = r * w + c;
            for &(dr, dc) in &NEIGHBOURS {
                let n = (r as isize + dr) as usize * w + (c as isize + dc) as usize;
                let diff = snapshot[i] - snapshot[n];
                if diff > min_slope {
                    let transfer = diff * 0.25;
                    field.data[i] -= transfer;
                    field.data[n] += transfer;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn conserves_mass() {
        let mut field = ScalarField::from_fn(20, 15, |r, c| ((r * 7 + c * 13) % 11) as f64 / 10.0);
        let before = field.sum();
        for _ in 0..5 {
            apply(&mut field, 0.01);
        }
        assert_abs_diff_eq!(field.sum(), before, epsilon = 1e-9);
    }

    #[test]
    fn peak_spreads_to_neighbours() {
        let mut field = ScalarField::new(5, 5, 0.0);
        field.set(2, 2, 1.0);
        apply(&mut field, 0.01);
        assert_abs_diff_eq!(field.get(2, 2), 0.0, epsilon = 1e-12);
        for (r, c) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_abs_diff_eq!(field.get(r, c), 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn gentle_slopes_below_threshold_are_stable() {
        let mut field = ScalarField::from_fn(6, 6, |_, c| c as f64 * 0.001);
        let original = field.clone();
        apply(&mut field, 0.01);
        assert_eq!(field, original);
    }

    #[test]
    fn border_cells_only_receive() {
        let mut field = ScalarField::new(4, 4, 0.0);
        field.set(0, 1, 1.0);
        apply(&mut field, 0.01);
        assert_eq!(field.get(0, 1), 1.0, "border cell is never a source");
    }
}
