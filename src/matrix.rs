//! General 2-D grid with fill strategies, used for ad-hoc weight
//! initialization outside `Volume`'s own initializer.

use std::fmt;

use crate::random::RandomSource;

/// Row-major matrix that owns a default random source for its fills.
#[derive(Clone, Debug)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    rng: RandomSource,
}

impl Matrix {
    /// Zeroed matrix with an entropy-seeded default source.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_source(rows, cols, RandomSource::from_entropy())
    }

    /// Zeroed matrix whose default source replays from `seed`.
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Self {
        Self::with_source(rows, cols, RandomSource::seeded(seed))
    }

    pub fn with_source(rows: usize, cols: usize, rng: RandomSource) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            rng,
        }
    }

    /// Project a 1-D slice into a single column (`fill_rows`) or a single row.
    pub fn from_slice(values: &[f64], fill_rows: bool) -> Self {
        let (rows, cols) = if fill_rows {
            (values.len(), 1)
        } else {
            (1, values.len())
        };
        Self {
            rows,
            cols,
            data: values.to_vec(),
            rng: RandomSource::from_entropy(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn idx(&self, r: usize, c: usize) -> usize {
        assert!(
            r < self.rows && c < self.cols,
            "matrix index ({}, {}) out of range for {}x{}",
            r,
            c,
            self.rows,
            self.cols
        );
        r * self.cols + c
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[self.idx(r, c)]
    }

    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        let i = self.idx(r, c);
        self.data[i] = value;
    }

    /// Assign `generator(row, col)` to every cell.
    pub fn fill_with<F>(&mut self, mut generator: F)
    where
        F: FnMut(usize, usize) -> f64,
    {
        let cols = self.cols;
        for (i, cell) in self.data.iter_mut().enumerate() {
            *cell = generator(i / cols, i % cols);
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Uniform `[0, 1)` from the matrix's own source.
    pub fn fill_random(&mut self) {
        fill_uniform(&mut self.data, 0.0, 1.0, &mut self.rng);
    }

    pub fn fill_random_with(&mut self, rng: &mut RandomSource) {
        fill_uniform(&mut self.data, 0.0, 1.0, rng);
    }

    /// Uniform in `[lo, hi)` where `lo`/`hi` are `min`/`max` in ascending order.
    pub fn fill_random_range(&mut self, min: f64, max: f64) {
        let (lo, hi) = ordered(min, max);
        fill_uniform(&mut self.data, lo, hi, &mut self.rng);
    }

    pub fn fill_random_range_with(&mut self, min: f64, max: f64, rng: &mut RandomSource) {
        let (lo, hi) = ordered(min, max);
        fill_uniform(&mut self.data, lo, hi, rng);
    }

    /// Standard normal samples from the matrix's own source.
    pub fn fill_gaussian(&mut self) {
        self.fill_gaussian_params(0.0, 1.0);
    }

    pub fn fill_gaussian_with(&mut self, rng: &mut RandomSource) {
        self.fill_gaussian_params_with(0.0, 1.0, rng);
    }

    pub fn fill_gaussian_params(&mut self, mean: f64, dev: f64) {
        fill_normal(&mut self.data, mean, dev, &mut self.rng);
    }

    pub fn fill_gaussian_params_with(&mut self, mean: f64, dev: f64, rng: &mut RandomSource) {
        fill_normal(&mut self.data, mean, dev, rng);
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn fill_uniform(data: &mut [f64], lo: f64, hi: f64, rng: &mut RandomSource) {
    for cell in data {
        *cell = rng.next_uniform().abs() * (hi - lo) + lo;
    }
}

fn fill_normal(data: &mut [f64], mean: f64, dev: f64, rng: &mut RandomSource) {
    for cell in data {
        *cell = rng.next_gaussian_with(mean, dev);
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            write!(f, "{}", if r == 0 { "[" } else { " [" })?;
            for c in 0..self.cols {
                let v = self.get(r, c);
                let sign = if v < 0.0 { "-" } else { " " };
                let tail = if r == self.rows - 1 && c == self.cols - 1 {
                    "]"
                } else if c == self.cols - 1 {
                    "],\n"
                } else {
                    ", "
                };
                write!(f, "{}{:.4}{}", sign, v.abs(), tail)?;
            }
        }
        write!(f, "]")
    }
}
