//! Num — the numeric value type used throughout the computation graph.
//!
//! A closed union of two backends (fixed `f64` precision and arbitrary
//! precision via `rust_decimal`) plus a canonical NaN sentinel. All arithmetic
//! either yields a well-formed value or NaN; nothing here ever panics on a
//! degenerate *value* (division by zero, sqrt of a negative). Mixing the two
//! backends in one expression is a programmer error and panics immediately.
//!
//! NaN semantics follow the gating conventions of the indicator layer:
//! NaN propagates through every operation, equals only itself, and makes
//! every ordered comparison false.

mod factory;

pub use factory::{NumBackend, NumFactory};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Immutable numeric value. `Copy`, so it moves freely through indicator state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Num {
    /// Fixed-precision backend.
    Double(f64),
    /// Arbitrary-precision backend.
    Decimal(Decimal),
    /// Canonical not-a-number sentinel shared by both backends.
    NaN,
}

#[track_caller]
fn backend_mismatch() -> ! {
    panic!("Num backend mismatch: Double and Decimal must not be mixed in one expression");
}

impl Num {
    /// Wrap an `f64`, normalizing every non-finite value to the canonical NaN.
    ///
    /// This is what turns `x / 0.0` into NaN instead of an infinity.
    pub fn from_double(value: f64) -> Self {
        if value.is_finite() {
            Num::Double(value)
        } else {
            Num::NaN
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Num::NaN)
    }

    pub fn is_zero(self) -> bool {
        match self {
            Num::Double(v) => v == 0.0,
            Num::Decimal(d) => d.is_zero(),
            Num::NaN => false,
        }
    }

    pub fn is_positive(self) -> bool {
        match self {
            Num::Double(v) => v > 0.0,
            Num::Decimal(d) => d.is_sign_positive() && !d.is_zero(),
            Num::NaN => false,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Num::Double(v) => v < 0.0,
            Num::Decimal(d) => d.is_sign_negative() && !d.is_zero(),
            Num::NaN => false,
        }
    }

    /// Combine two values under per-backend closures, with NaN absorption and
    /// fail-fast backend checking. A `None` from the Decimal closure (overflow,
    /// division by zero) resolves to NaN.
    fn zip(
        self,
        other: Num,
        double: impl FnOnce(f64, f64) -> f64,
        decimal: impl FnOnce(Decimal, Decimal) -> Option<Decimal>,
    ) -> Num {
        match (self, other) {
            (Num::NaN, _) | (_, Num::NaN) => Num::NaN,
            (Num::Double(a), Num::Double(b)) => Num::from_double(double(a, b)),
            (Num::Decimal(a), Num::Decimal(b)) => {
                decimal(a, b).map(Num::Decimal).unwrap_or(Num::NaN)
            }
            _ => backend_mismatch(),
        }
    }

    pub fn abs(self) -> Num {
        match self {
            Num::Double(v) => Num::from_double(v.abs()),
            Num::Decimal(d) => Num::Decimal(d.abs()),
            Num::NaN => Num::NaN,
        }
    }

    /// Square root; a negative argument resolves to NaN.
    pub fn sqrt(self) -> Num {
        match self {
            Num::Double(v) => Num::from_double(v.sqrt()),
            Num::Decimal(d) => d.sqrt().map(Num::Decimal).unwrap_or(Num::NaN),
            Num::NaN => Num::NaN,
        }
    }

    /// Integer power.
    pub fn powi(self, exp: i64) -> Num {
        match self {
            Num::Double(v) => Num::from_double(v.powi(exp as i32)),
            Num::Decimal(d) => d.checked_powi(exp).map(Num::Decimal).unwrap_or(Num::NaN),
            Num::NaN => Num::NaN,
        }
    }

    /// The smaller of two values; NaN poisons the result.
    pub fn min(self, other: Num) -> Num {
        if self.is_nan() || other.is_nan() {
            Num::NaN
        } else if self.is_less_than_or_equal(other) {
            self
        } else {
            other
        }
    }

    /// The larger of two values; NaN poisons the result.
    pub fn max(self, other: Num) -> Num {
        if self.is_nan() || other.is_nan() {
            Num::NaN
        } else if self.is_greater_than_or_equal(other) {
            self
        } else {
            other
        }
    }

    // ── Gating predicates ────────────────────────────────────────────
    // NaN equals only itself; every ordered comparison involving NaN is false.

    pub fn is_equal(self, other: Num) -> bool {
        self == other
    }

    pub fn is_greater_than(self, other: Num) -> bool {
        matches!(self.partial_cmp(&other), Some(Ordering::Greater))
    }

    pub fn is_greater_than_or_equal(self, other: Num) -> bool {
        matches!(
            self.partial_cmp(&other),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    pub fn is_less_than(self, other: Num) -> bool {
        matches!(self.partial_cmp(&other), Some(Ordering::Less))
    }

    pub fn is_less_than_or_equal(self, other: Num) -> bool {
        matches!(
            self.partial_cmp(&other),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// Lossy view as `f64`; NaN maps to `f64::NAN`.
    pub fn to_f64(self) -> f64 {
        match self {
            Num::Double(v) => v,
            Num::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Num::NaN => f64::NAN,
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a + b, |a, b| a.checked_add(b))
    }
}

impl Sub for Num {
    type Output = Num;

    fn sub(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a - b, |a, b| a.checked_sub(b))
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        self.zip(rhs, |a, b| a * b, |a, b| a.checked_mul(b))
    }
}

impl Div for Num {
    type Output = Num;

    fn div(self, rhs: Num) -> Num {
        // f64 division by zero yields an infinity, which from_double folds
        // into NaN; Decimal checked_div returns None for the same case.
        self.zip(rhs, |a, b| a / b, |a, b| a.checked_div(b))
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        match self {
            Num::Double(v) => Num::Double(-v),
            Num::Decimal(d) => Num::Decimal(-d),
            Num::NaN => Num::NaN,
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::NaN, Num::NaN) => true,
            (Num::NaN, _) | (_, Num::NaN) => false,
            (Num::Double(a), Num::Double(b)) => a == b,
            (Num::Decimal(a), Num::Decimal(b)) => a == b,
            _ => backend_mismatch(),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Num::NaN, Num::NaN) => Some(Ordering::Equal),
            (Num::NaN, _) | (_, Num::NaN) => None,
            (Num::Double(a), Num::Double(b)) => a.partial_cmp(b),
            (Num::Decimal(a), Num::Decimal(b)) => a.partial_cmp(b),
            _ => backend_mismatch(),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Double(v) => write!(f, "{v}"),
            Num::Decimal(d) => write!(f, "{d}"),
            Num::NaN => write!(f, "NaN"),
        }
    }
}
