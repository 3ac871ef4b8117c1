//! 1-D binned spectrum over the probe-energy axis.

use nc_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named 1-D histogram: `bin_edges` has one more entry than `contents`.
///
/// This is the shape the flux and event-rate spectra attached to every
/// sample file take, and the basis of all normalization arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Spectrum name (the key it is stored under).
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Bin edges, strictly increasing, length `n_bins + 1`.
    pub bin_edges: Vec<f64>,
    /// Bin contents, length `n_bins`.
    pub contents: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum from explicit edges and contents.
    pub fn new(
        name: impl Into<String>,
        bin_edges: Vec<f64>,
        contents: Vec<f64>,
    ) -> Result<Self> {
        if bin_edges.len() < 2 || bin_edges.len() != contents.len() + 1 {
            return Err(Error::Format(format!(
                "spectrum needs n+1 edges for n contents, got {} edges / {} contents",
                bin_edges.len(),
                contents.len()
            )));
        }
        if bin_edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::Format("spectrum bin edges must be strictly increasing".into()));
        }
        let name = name.into();
        Ok(Self { title: name.clone(), name, bin_edges, contents })
    }

    /// Uniformly binned spectrum over `[lo, hi]`.
    pub fn uniform(
        name: impl Into<String>,
        n_bins: usize,
        lo: f64,
        hi: f64,
        contents: Vec<f64>,
    ) -> Result<Self> {
        let w = (hi - lo) / n_bins as f64;
        let edges = (0..=n_bins).map(|i| lo + w * i as f64).collect();
        Self::new(name, edges, contents)
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.contents.len()
    }

    /// Lower edge of the axis.
    pub fn x_min(&self) -> f64 {
        self.bin_edges[0]
    }

    /// Upper edge of the axis.
    pub fn x_max(&self) -> f64 {
        *self.bin_edges.last().expect("spectrum has edges")
    }

    /// Width of bin `i`.
    pub fn bin_width(&self, i: usize) -> f64 {
        self.bin_edges[i + 1] - self.bin_edges[i]
    }

    /// Center of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        0.5 * (self.bin_edges[i] + self.bin_edges[i + 1])
    }

    /// Bin index containing `x`; `None` outside the axis range.
    ///
    /// The upper axis edge is counted into the last bin.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if x < self.x_min() || x > self.x_max() {
            return None;
        }
        if x == self.x_max() {
            return Some(self.n_bins() - 1);
        }
        // partition_point: first edge strictly greater than x.
        let i = self.bin_edges.partition_point(|&e| e <= x);
        Some(i - 1)
    }

    /// Plain sum of bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Width-weighted integral (`Integral("width")` semantics).
    pub fn integral_width(&self) -> f64 {
        self.contents.iter().enumerate().map(|(i, c)| c * self.bin_width(i)).sum()
    }

    /// Integral over the inclusive bin range `[lo_bin, hi_bin]`.
    pub fn integral_bins(&self, lo_bin: usize, hi_bin: usize, width: bool) -> f64 {
        if lo_bin > hi_bin || lo_bin >= self.n_bins() {
            return 0.0;
        }
        let hi_bin = hi_bin.min(self.n_bins() - 1);
        (lo_bin..=hi_bin)
            .map(|i| self.contents[i] * if width { self.bin_width(i) } else { 1.0 })
            .sum()
    }

    /// Integral between two axis values with linear apportionment of the
    /// partially covered boundary bins.
    ///
    /// `None` bounds mean the corresponding axis edge. Out-of-range bounds
    /// are clamped to the axis.
    pub fn integral_between(&self, low: Option<f64>, high: Option<f64>, width: bool) -> f64 {
        let lo = low.unwrap_or(self.x_min()).max(self.x_min());
        let hi = high.unwrap_or(self.x_max()).min(self.x_max());
        if hi <= lo {
            return 0.0;
        }

        let min_bin = self.find_bin(lo).expect("clamped low bound on axis");
        let max_bin = self.find_bin(hi).expect("clamped high bound on axis");
        let term = |i: usize| self.contents[i] * if width { self.bin_width(i) } else { 1.0 };

        // Entirely within one bin: contained fraction of that bin.
        if min_bin == max_bin {
            return (hi - lo) / self.bin_width(min_bin) * term(min_bin);
        }

        let low_frac = (self.bin_edges[min_bin + 1] - lo) / self.bin_width(min_bin) * term(min_bin);
        let high_frac = (hi - self.bin_edges[max_bin]) / self.bin_width(max_bin) * term(max_bin);

        if min_bin + 1 == max_bin {
            return low_frac + high_frac;
        }
        low_frac + high_frac + self.integral_bins(min_bin + 1, max_bin - 1, width)
    }

    /// Add another spectrum bin-by-bin. Binning must match exactly.
    pub fn add(&mut self, other: &Spectrum) -> Result<()> {
        if self.bin_edges != other.bin_edges {
            return Err(Error::Format(format!(
                "cannot add spectrum '{}' to '{}': binning differs",
                other.name, self.name
            )));
        }
        for (a, b) in self.contents.iter_mut().zip(&other.contents) {
            *a += b;
        }
        Ok(())
    }

    /// Scale every bin by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for c in &mut self.contents {
            *c *= factor;
        }
    }

    /// Bin-by-bin ratio `self / other`; bins where `other` is zero come
    /// out zero. Binning must match exactly.
    pub fn divide(&self, other: &Spectrum) -> Result<Spectrum> {
        if self.bin_edges != other.bin_edges {
            return Err(Error::Format(format!(
                "cannot divide spectrum '{}' by '{}': binning differs",
                self.name, other.name
            )));
        }
        let contents = self
            .contents
            .iter()
            .zip(&other.contents)
            .map(|(a, b)| if *b != 0.0 { a / b } else { 0.0 })
            .collect();
        Ok(Spectrum {
            name: format!("{}_over_{}", self.name, other.name),
            title: self.title.clone(),
            bin_edges: self.bin_edges.clone(),
            contents,
        })
    }

    /// Copy of this spectrum under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Spectrum {
        let mut s = self.clone();
        s.name = name.into();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat4() -> Spectrum {
        // 4 bins of width 0.5 on [0, 2], contents 1,2,3,4
        Spectrum::uniform("s", 4, 0.0, 2.0, vec![1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn rejects_bad_binning() {
        assert!(Spectrum::new("s", vec![0.0, 1.0], vec![1.0, 2.0]).is_err());
        assert!(Spectrum::new("s", vec![0.0, 1.0, 0.5], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn find_bin_edges() {
        let s = flat4();
        assert_eq!(s.find_bin(0.0), Some(0));
        assert_eq!(s.find_bin(0.5), Some(1));
        assert_eq!(s.find_bin(1.99), Some(3));
        assert_eq!(s.find_bin(2.0), Some(3));
        assert_eq!(s.find_bin(-0.1), None);
        assert_eq!(s.find_bin(2.1), None);
    }

    #[test]
    fn integrals() {
        let s = flat4();
        assert_relative_eq!(s.integral(), 10.0);
        assert_relative_eq!(s.integral_width(), 5.0);
        assert_relative_eq!(s.integral_bins(1, 2, false), 5.0);
        assert_relative_eq!(s.integral_bins(1, 2, true), 2.5);
    }

    #[test]
    fn partial_bin_integral() {
        let s = flat4();
        // [0.25, 1.75]: half of bin 0, all of bins 1-2, half of bin 3.
        let expect = 0.5 * 0.5 * 1.0 + 0.5 * (2.0 + 3.0) + 0.5 * 0.5 * 4.0;
        assert_relative_eq!(s.integral_between(Some(0.25), Some(1.75), true), expect);

        // Entirely inside one bin: fraction of that bin.
        assert_relative_eq!(
            s.integral_between(Some(0.6), Some(0.9), true),
            (0.3 / 0.5) * 2.0 * 0.5
        );

        // Neighbouring bins only.
        assert_relative_eq!(
            s.integral_between(Some(0.25), Some(0.75), true),
            0.5 * 0.5 * 1.0 + 0.5 * 0.5 * 2.0
        );

        // Full-range defaults.
        assert_relative_eq!(s.integral_between(None, None, true), s.integral_width());
    }

    #[test]
    fn add_scale_divide() {
        let mut a = flat4();
        let b = flat4();
        a.add(&b).unwrap();
        assert_relative_eq!(a.integral(), 20.0);
        a.scale(0.5);
        assert_relative_eq!(a.integral(), 10.0);

        let r = a.divide(&b).unwrap();
        assert!(r.contents.iter().all(|&c| (c - 1.0).abs() < 1e-12));

        let other = Spectrum::uniform("t", 2, 0.0, 2.0, vec![1.0, 1.0]).unwrap();
        assert!(a.divide(&other).is_err());
    }
}
