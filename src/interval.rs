//! Interval
//!
//! Per feature constraints collected while walking a decision path,
//! and their rendering into rule cells.
use crate::constants::DEFAULT_PRECISION;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The range of values of a single feature admitted by a rule.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub enum Interval {
    /// Any value is admitted.
    #[default]
    Unconstrained,
    /// `value <= t`
    AtMost(f64),
    /// `value > t`
    GreaterThan(f64),
    /// `lower < value <= upper`, with `lower < upper`.
    Between { lower: f64, upper: f64 },
}

impl Interval {
    /// Check if a value lies inside the interval.
    pub fn contains(&self, v: f64) -> bool {
        match self {
            Interval::Unconstrained => true,
            Interval::AtMost(upper) => v <= *upper,
            Interval::GreaterThan(lower) => v > *lower,
            Interval::Between { lower, upper } => *lower < v && v <= *upper,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Interval::Unconstrained)
    }

    /// Render the interval as a rule cell with a fixed number of decimals.
    pub fn to_cell(&self, precision: usize) -> String {
        format!("{:.*}", precision, self)
    }
}

impl fmt::Display for Interval {
    /// Unconstrained intervals render as an empty cell. The formatter
    /// precision controls the number of decimals, four by default.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = f.precision().unwrap_or(DEFAULT_PRECISION);
        match self {
            Interval::Unconstrained => Ok(()),
            Interval::AtMost(upper) => write!(f, "<= {:.*}", p, upper),
            Interval::GreaterThan(lower) => write!(f, "> {:.*}", p, lower),
            Interval::Between { lower, upper } => write!(f, "]{:.*}..{:.*}]", p, lower, p, upper),
        }
    }
}

/// Running bounds of one feature along a decision path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    /// Record `value <= t`, keeping the smaller upper bound.
    pub fn tighten_upper(&mut self, t: f64) {
        self.upper = Some(match self.upper {
            Some(u) if u <= t => u,
            _ => t,
        });
    }

    /// Record `value > t`, keeping the larger lower bound.
    pub fn tighten_lower(&mut self, t: f64) {
        self.lower = Some(match self.lower {
            Some(l) if l >= t => l,
            _ => t,
        });
    }

    /// Collapse the bounds into an interval. Inverted or empty bounds
    /// admit no value, these degrade to unconstrained.
    pub fn finish(&self) -> Interval {
        match (self.lower, self.upper) {
            (None, None) => Interval::Unconstrained,
            (None, Some(upper)) => Interval::AtMost(upper),
            (Some(lower), None) => Interval::GreaterThan(lower),
            (Some(lower), Some(upper)) => {
                if lower < upper {
                    Interval::Between { lower, upper }
                } else {
                    warn!(
                        "Inconsistent bounds ]{}..{}] dropped, the feature is left unconstrained.",
                        lower, upper
                    );
                    Interval::Unconstrained
                }
            }
        }
    }
}
