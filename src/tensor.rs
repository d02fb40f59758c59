//! Weight/gradient volume.
//!
//! A `Volume` is a flat pair of arrays (values and gradients) addressed by a
//! 3-axis `(x, y, d)` coordinate. Element `(x, y, d)` lives at
//! `(sx * y + x) * depth + d`. A 1-D volume has `sx = sy = 0`, so its
//! elements are reached through `(0, 0, d)`.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::random::RandomSource;

/// How a new volume's values are populated. Gradients always start at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Init {
    /// Every value set to the constant.
    Constant(f64),
    /// Standard normal samples scaled by `sqrt(1 / N)`.
    Gaussian,
    /// Raw uniform samples in `[0, 1)`.
    Uniform,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    sx: usize,
    sy: usize,
    depth: usize,
    weights: Vec<f64>,
    dweights: Vec<f64>,
}

impl Volume {
    /// 1-D volume of `len` elements.
    pub fn new(len: usize, init: Init, rng: &mut RandomSource) -> Self {
        Self::allocate(0, 0, len, len, init, rng)
    }

    /// 3-axis volume of `sx * sy * depth` elements.
    pub fn with_shape(sx: usize, sy: usize, depth: usize, init: Init, rng: &mut RandomSource) -> Self {
        Self::allocate(sx, sy, depth, sx * sy * depth, init, rng)
    }

    /// 3-axis volume filled with `c`. Needs no random source.
    pub fn constant(sx: usize, sy: usize, depth: usize, c: f64) -> Self {
        let n = sx * sy * depth;
        Self {
            sx,
            sy,
            depth,
            weights: vec![c; n],
            dweights: vec![0.0; n],
        }
    }

    /// 1-D volume of zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            sx: 0,
            sy: 0,
            depth: len,
            weights: vec![0.0; len],
            dweights: vec![0.0; len],
        }
    }

    /// 1-D volume wrapping existing values, gradients zeroed.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let len = weights.len();
        Self {
            sx: 0,
            sy: 0,
            depth: len,
            weights,
            dweights: vec![0.0; len],
        }
    }

    fn allocate(
        sx: usize,
        sy: usize,
        depth: usize,
        n: usize,
        init: Init,
        rng: &mut RandomSource,
    ) -> Self {
        let weights = match init {
            Init::Constant(c) => vec![c; n],
            Init::Gaussian => {
                let scale = if n == 0 { 0.0 } else { (1.0 / n as f64).sqrt() };
                (0..n).map(|_| rng.next_gaussian() * scale).collect()
            }
            Init::Uniform => (0..n).map(|_| rng.next_uniform()).collect(),
        };
        Self {
            sx,
            sy,
            depth,
            weights,
            dweights: vec![0.0; n],
        }
    }

    /// `(sx, sy, depth)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.depth)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Flat offset of `(x, y, d)`. Panics when the coordinate is outside the
    /// volume; callers own bounds as a precondition.
    fn offset(&self, x: usize, y: usize, d: usize) -> usize {
        let (xs, ys) = (self.sx.max(1), self.sy.max(1));
        let i = |x: usize, y: usize, d: usize| (self.sx * y + x) * self.depth + d;
        // a zero extent in a 3-axis shape leaves no valid slot at all
        assert!(
            x < xs && y < ys && d < self.depth && i(x, y, d) < self.len(),
            "volume index ({}, {}, {}) out of range for shape ({}, {}, {})",
            x,
            y,
            d,
            self.sx,
            self.sy,
            self.depth
        );
        i(x, y, d)
    }

    pub fn get(&self, x: usize, y: usize, d: usize) -> f64 {
        self.weights[self.offset(x, y, d)]
    }

    pub fn set(&mut self, x: usize, y: usize, d: usize, value: f64) {
        let i = self.offset(x, y, d);
        self.weights[i] = value;
    }

    pub fn add(&mut self, x: usize, y: usize, d: usize, value: f64) {
        let i = self.offset(x, y, d);
        self.weights[i] += value;
    }

    pub fn get_grad(&self, x: usize, y: usize, d: usize) -> f64 {
        self.dweights[self.offset(x, y, d)]
    }

    pub fn set_grad(&mut self, x: usize, y: usize, d: usize, value: f64) {
        let i = self.offset(x, y, d);
        self.dweights[i] = value;
    }

    pub fn add_grad(&mut self, x: usize, y: usize, d: usize, value: f64) {
        let i = self.offset(x, y, d);
        self.dweights[i] += value;
    }

    /// Accumulate `other * scale` into this volume's values, element by
    /// element over `other`'s length.
    pub fn add_volume(&mut self, other: &Volume, scale: f64) -> Result<()> {
        if other.len() > self.len() {
            return Err(Error::LengthMismatch {
                source_len: other.len(),
                dest_len: self.len(),
            });
        }
        for (w, o) in self.weights.iter_mut().zip(&other.weights) {
            *w += o * scale;
        }
        Ok(())
    }

    /// Overwrite every value; gradients are untouched.
    pub fn set_constant(&mut self, c: f64) {
        self.weights.fill(c);
    }

    pub fn zero_grads(&mut self) {
        self.dweights.fill(0.0);
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub fn grads(&self) -> &[f64] {
        &self.dweights
    }

    pub fn grads_mut(&mut self) -> &mut [f64] {
        &mut self.dweights
    }

    /// One line per `y` with the values of channel `d`, comma separated.
    pub fn render_slice(&self, d: usize) -> String {
        let mut out = String::new();
        for y in 0..self.sy {
            for x in 0..self.sx {
                let sep = if x == self.sx - 1 { "\n" } else { ", " };
                let _ = write!(out, "{}{}", self.get(x, y, d), sep);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_every_coordinate() {
        let mut v = Volume::constant(3, 2, 4, 0.0);
        for y in 0..2 {
            for x in 0..3 {
                for d in 0..4 {
                    let value = (x * 100 + y * 10 + d) as f64;
                    v.set(x, y, d, value);
                    assert_eq!(v.get(x, y, d), value);
                }
            }
        }
    }

    #[test]
    fn layout_formula_matches_flat_storage() {
        let mut v = Volume::constant(3, 2, 4, 0.0);
        v.set(2, 1, 3, 9.0);
        // (3 * 1 + 2) * 4 + 3
        assert_eq!(v.weights()[23], 9.0);
        v.set_grad(1, 0, 2, -1.0);
        // (3 * 0 + 1) * 4 + 2
        assert_eq!(v.grads()[6], -1.0);
    }

    #[test]
    fn add_accumulates() {
        let mut v = Volume::constant(2, 2, 1, 1.5);
        v.add(1, 1, 0, 2.0);
        assert_eq!(v.get(1, 1, 0), 3.5);
        v.add_grad(0, 1, 0, 0.25);
        v.add_grad(0, 1, 0, 0.25);
        assert_eq!(v.get_grad(0, 1, 0), 0.5);
    }

    #[test]
    fn constant_fill_zeroes_gradients() {
        let v = Volume::constant(2, 2, 3, 0.5);
        assert_eq!(v.len(), 12);
        assert!(v.weights().iter().all(|&w| w == 0.5));
        assert_eq!(v.grads().len(), 12);
        assert!(v.grads().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn clone_is_not_aliased() {
        let v = Volume::constant(2, 2, 3, 0.5);
        let mut c = v.clone();
        assert_eq!(c, v);
        c.set(0, 0, 0, 7.0);
        c.set_grad(1, 1, 2, 3.0);
        assert_eq!(v.get(0, 0, 0), 0.5);
        assert_eq!(v.get_grad(1, 1, 2), 0.0);
    }

    #[test]
    fn flat_volume_clone_keeps_data() {
        let mut rng = RandomSource::seeded(2);
        let v = Volume::new(5, Init::Uniform, &mut rng);
        let c = v.clone();
        assert_eq!(c.len(), 5);
        assert_eq!(c.weights(), v.weights());
    }

    #[test]
    fn flat_volume_addresses_by_depth() {
        let mut v = Volume::zeros(4);
        v.set(0, 0, 3, 2.0);
        assert_eq!(v.weights()[3], 2.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_access_panics() {
        let v = Volume::constant(2, 2, 1, 0.0);
        v.get(2, 0, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_extent_shape_has_no_valid_index() {
        let v = Volume::with_shape(3, 0, 2, Init::Uniform, &mut RandomSource::seeded(0));
        assert!(v.is_empty());
        v.get(0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn flat_zero_extent_grad_access_panics() {
        let mut v = Volume::constant(0, 0, 4, 1.0);
        v.set_grad(0, 0, 1, 2.0);
    }

    #[test]
    fn constant_init_through_constructors() {
        let mut rng = RandomSource::seeded(0);
        let v = Volume::with_shape(2, 2, 3, Init::Constant(0.5), &mut rng);
        assert_eq!(v.shape(), (2, 2, 3));
        assert_eq!(v, Volume::constant(2, 2, 3, 0.5));
        assert!(v.grads().iter().all(|&g| g == 0.0));

        let flat = Volume::new(4, Init::Constant(-1.0), &mut rng);
        assert_eq!(flat.weights(), &[-1.0; 4]);
        assert_eq!(flat.grads(), &[0.0; 4]);
        assert_eq!(flat.get(0, 0, 3), -1.0);
    }

    #[test]
    fn gaussian_fill_is_variance_scaled() {
        let mut rng = RandomSource::seeded(9);
        let v = Volume::with_shape(20, 20, 10, Init::Gaussian, &mut rng);
        let n = v.len() as f64;
        let var = v.weights().iter().map(|w| w * w).sum::<f64>() / n;
        // Expected variance is 1/n.
        assert!((var * n - 1.0).abs() < 0.15, "variance {} off", var);
    }

    #[test]
    fn uniform_fill_stays_in_unit_interval() {
        let mut rng = RandomSource::seeded(4);
        let v = Volume::new(200, Init::Uniform, &mut rng);
        assert!(v.weights().iter().all(|w| (0.0..1.0).contains(w)));
    }

    #[test]
    fn add_volume_scales_and_accumulates() {
        let mut a = Volume::constant(1, 1, 4, 1.0);
        let b = Volume::from_weights(vec![1.0, 2.0, 3.0]);
        a.add_volume(&b, 0.5).unwrap();
        assert_eq!(a.weights(), &[1.5, 2.0, 2.5, 1.0]);
    }

    #[test]
    fn add_volume_rejects_longer_source() {
        let mut a = Volume::zeros(2);
        let b = Volume::zeros(3);
        assert!(matches!(
            a.add_volume(&b, 1.0),
            Err(Error::LengthMismatch {
                source_len: 3,
                dest_len: 2
            })
        ));
    }

    #[test]
    fn set_constant_leaves_gradients() {
        let mut v = Volume::constant(1, 1, 3, 0.0);
        v.set_grad(0, 0, 1, 4.0);
        v.set_constant(2.0);
        assert!(v.weights().iter().all(|&w| w == 2.0));
        assert_eq!(v.get_grad(0, 0, 1), 4.0);
    }

    #[test]
    fn render_slice_lists_rows() {
        let mut v = Volume::constant(2, 2, 2, 0.0);
        v.set(0, 0, 1, 1.0);
        v.set(1, 1, 1, 4.0);
        assert_eq!(v.render_slice(1), "1, 0\n0, 4\n");
    }
}
