use serde::{Deserialize, Serialize};

/// A dense row-major 2D grid of `f64` scalars.
///
/// Used for elevation, temperature, precipitation and habitability. Grid
/// coordinates are `(row, col)`; continuous sampling positions are `(x, y)`
/// with `x` along columns and `y` along rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    /// Row-major values, length `width * height`.
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl ScalarField {
    /// Create a field filled with `fill`.
    pub fn new(width: usize, height: usize, fill: f64) -> Self {
        Self { data: vec![fill; width * height], width, height }
    }

    /// Create a field by evaluating `f(row, col)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                data.push(f(r, c));
            }
        }
        Self { data, width, height }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.width + col] = val;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bilinear sample at continuous position `(x, y)`.
    ///
    /// Lattice indices are clamped to the grid, so positions at or beyond the
    /// last row/column read the border value.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (x0, x1, wx) = self.axis(x, self.width);
        let (y0, y1, wy) = self.axis(y, self.height);

        self.get(y0, x0) * (1.0 - wx) * (1.0 - wy)
            + self.get(y0, x1) * wx * (1.0 - wy)
            + self.get(y1, x0) * (1.0 - wx) * wy
            + self.get(y1, x1) * wx * wy
    }

    /// Add `amount` at `(x, y)`, distributed over the four surrounding cells
    /// with bilinear weights. A negative amount removes material.
    pub fn splat(&mut self, x: f64, y: f64, amount: f64) {
        let (x0, x1, wx) = self.axis(x, self.width);
        let (y0, y1, wy) = self.axis(y, self.height);
        let w = self.width;

        self.data[y0 * w + x0] += amount * (1.0 - wx) * (1.0 - wy);
        self.data[y0 * w + x1] += amount * wx * (1.0 - wy);
        self.data[y1 * w + x0] += amount * (1.0 - wx) * wy;
        self.data[y1 * w + x1] += amount * wx * wy;
    }

    /// Integer lattice neighbours and fractional weight along one axis.
    #[inline]
    fn axis(&self, v: f64, len: usize) -> (usize, usize, f64) {
        let last = len.saturating_sub(1) as isize;
        let base = v.floor() as isize;
        let i0 = base.clamp(0, last) as usize;
        let i1 = (base + 1).clamp(0, last) as usize;
        (i0, i1, v - i0 as f64)
    }

    pub fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Clamp every value into `[lo, hi]`.
    pub fn clamp(&mut self, lo: f64, hi: f64) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }

    /// Per-axis finite-difference gradient `(d/drow, d/dcol)`.
    ///
    /// Interior cells use central differences `(f[i+1] - f[i-1]) / 2`,
    /// border cells one-sided differences; a single-cell axis has zero
    /// gradient.
    pub fn gradient(&self) -> (Vec<f64>, Vec<f64>) {
        let (w, h) = (self.width, self.height);
        let mut gy = vec![0.0; w * h];
        let mut gx = vec![0.0; w * h];
        for r in 0..h {
            for c in 0..w {
                let i = r * w + c;
                gy[i] = diff(r, h, |k| self.get(k, c));
                gx[i] = diff(c, w, |k| self.get(r, k));
            }
        }
        (gy, gx)
    }
}

/// Evaluate `f(row, col)` for every cell in row-major order.
///
/// With the `threading` feature cells are computed in parallel; the result is
/// identical to the sequential build because cells never read each other.
pub(crate) fn cells<T, F>(width: usize, height: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    if width == 0 {
        return Vec::new();
    }
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        (0..width * height).into_par_iter().map(|i| f(i / width, i % width)).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        (0..width * height).map(|i| f(i / width, i % width)).collect()
    }
}

#[inline]
fn diff(i: usize, len: usize, at: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        at(1) - at(0)
    } else if i == len - 1 {
        at(i) - at(i - 1)
    } else {
        (at(i + 1) - at(i - 1)) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_corners_return_exact_values() {
        let mut f = ScalarField::new(4, 4, 0.0);
        f.set(0, 0, 10.0);
        f.set(0, 3, 20.0);
        f.set(3, 0, 30.0);
        f.set(3, 3, 40.0);

        assert_abs_diff_eq!(f.sample(0.0, 0.0), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.sample(3.0, 0.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.sample(0.0, 3.0), 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.sample(3.0, 3.0), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn sample_interpolates_between_cells() {
        let f = ScalarField::from_fn(4, 4, |_, c| c as f64);
        assert_abs_diff_eq!(f.sample(1.25, 2.0), 1.25, epsilon = 1e-12);
    }

    #[test]
    fn splat_distributes_full_amount() {
        let mut f = ScalarField::new(5, 5, 0.0);
        f.splat(1.3, 2.7, 0.5);
        assert_abs_diff_eq!(f.sum(), 0.5, epsilon = 1e-12);
        assert!(f.get(3, 1) > f.get(2, 2), "nearer cell should receive more");
    }

    #[test]
    fn gradient_of_ramp_is_constant() {
        let f = ScalarField::from_fn(6, 3, |_, c| 0.1 * c as f64);
        let (gy, gx) = f.gradient();
        for i in 0..f.len() {
            assert_abs_diff_eq!(gx[i], 0.1, epsilon = 1e-12);
            assert_abs_diff_eq!(gy[i], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn clamp_bounds_values() {
        let mut f = ScalarField::from_fn(3, 1, |_, c| c as f64 - 1.0);
        f.clamp(0.0, 0.5);
        assert_eq!(f.data, vec![0.0, 0.0, 0.5]);
    }
}
