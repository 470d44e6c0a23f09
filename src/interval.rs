//! Open intervals over the ray parameter.
//!
//! The nearest-hit search narrows an interval `(0, best)` as closer hits are
//! found, so acceptance is always a strict comparison on both ends.

/// Interval (min, max) used for range checking of ray t-values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound of the interval
    pub min: f32,
    /// Upper bound of the interval
    pub max: f32,
}

impl Interval {
    /// Upper bound used before any hit has been found.
    pub const FAR: f32 = 1e30;

    /// Everything strictly in front of the ray origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: Self::FAR,
    };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, with the upper bound pulled in to `max`.
    pub fn closer_than(&self, max: f32) -> Self {
        Self { min: self.min, max }
    }
}
