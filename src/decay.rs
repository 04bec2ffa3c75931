use crate::{ensure_interval, error::Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Besides the closed form, the schedule can be advanced one step at a time with
/// [`Geometric::next`], which is how the trainer carries epsilon across episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Geometric {
    /// **Errors** if `rate` is not in `(0, 1]` or if `vf` is negative or greater than `vi`
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        ensure_interval!(rate, above 0.0, 1.0);
        ensure_interval!(vf, 0.0, vi);
        Ok(Self { rate, vi, vf })
    }

    /// The value at `t = 0`
    pub fn initial(&self) -> f32 {
        self.vi
    }

    /// The floor the value never decays below
    pub fn floor(&self) -> f32 {
        self.vf
    }

    /// Apply one decay step to `value`
    pub fn next(&self, value: f32) -> f32 {
        (value * self.rate).max(self.vf)
    }
}

impl Decay for Geometric {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}
