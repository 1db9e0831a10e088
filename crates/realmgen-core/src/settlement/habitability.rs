//! Habitability: how attractive each cell is for a settlement.
//!
//! Land scores 0.5 plus a coastal bonus `0.5 * exp(-d / 5)` where `d` is the
//! distance to the nearest water cell. Cells above [`MOUNTAIN_LEVEL`] are
//! halved, water scores zero and the result is scaled so the best cell is 1.
use crate::climate::distance::distance_to;
use crate::field::ScalarField;

pub const MOUNTAIN_LEVEL: f64 = 0.7;
const LAND_BASE: f64 = 0.5;
const COAST_BONUS: f64 = 0.5;
const COAST_DECAY: f64 = 5.0;
const MOUNTAIN_PENALTY: f64 = 0.5;

pub fn score(elevation: &ScalarField, water_level: f64) -> ScalarField {
    let water: Vec<bool> = elevation.data.iter().map(|&e| e < water_level).collect();
    let distance = distance_to(&water, elevation.width, elevation.height);

    let mut data: Vec<f64> = elevation
        .data
        .iter()
        .enumerate()
        .map(|(i, &e)| {
            if water[i] {
                return 0.0;
            }
            let bonus = match &distance {
                Some(d) => COAST_BONUS * (-d[i] / COAST_DECAY).exp(),
                None => 0.0,
            };
            let mut h = LAND_BASE + bonus;
            if e > MOUNTAIN_LEVEL {
                h *= MOUNTAIN_PENALTY;
            }
            h
        })
        .collect();

    let max = data.iter().cloned().fold(0.0, f64::max);
    if max > 0.0 {
        for v in &mut data {
            *v /= max;
        }
    }
    ScalarField { data, width: elevation.width, height: elevation.height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn coast_beats_interior_and_water_is_zero() {
        let elevation = ScalarField::from_fn(20, 3, |_, c| if c < 2 { 0.2 } else { 0.5 });
        let h = score(&elevation, 0.4);
        assert_eq!(h.get(1, 0), 0.0);
        assert_abs_diff_eq!(h.get(1, 2), 1.0, epsilon = 1e-12);
        assert!(h.get(1, 3) > h.get(1, 19));
    }

    #[test]
    fn mountains_are_discouraged_not_forbidden() {
        let elevation = ScalarField::from_fn(10, 1, |_, c| if c == 9 { 0.9 } else { 0.5 });
        let h = score(&elevation, 0.4);
        assert!(h.get(0, 9) > 0.0);
        assert_abs_diff_eq!(h.get(0, 9), h.get(0, 0) * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn all_water_scores_zero() {
        let h = score(&ScalarField::new(5, 5, 0.1), 0.4);
        assert!(h.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn landlocked_world_is_flat_one() {
        let h = score(&ScalarField::new(4, 4, 0.5), 0.4);
        assert!(h.data.iter().all(|&v| v == 1.0));
    }
}
