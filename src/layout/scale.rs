use serde::{Deserialize, Serialize};

/// Continuous linear mapping from a domain interval onto a range interval.
///
/// The value is computed as `r0 + (x - d0) * (r1 - r0) / (d1 - d0)`, so that
/// integer positions on an axis of `n` bands of total length `l` land exactly
/// on `i * l / n` whenever that product is representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Maps a domain value into the range. A degenerate domain maps
    /// everything onto the start of the range.
    pub fn apply(&self, x: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;

        if d0 == d1 {
            return r0;
        }

        r0 + (x - d0) * (r1 - r0) / (d1 - d0)
    }

    /// Maps a range value back into the domain. A degenerate range maps
    /// everything onto the start of the domain.
    pub fn invert(&self, y: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;

        if r0 == r1 {
            return d0;
        }

        d0 + (y - r0) * (d1 - d0) / (r1 - r0)
    }
}
