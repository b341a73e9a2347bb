//! NumFactory — mints values for exactly one numeric backend.
//!
//! One factory is threaded explicitly through every component of a
//! computation graph; there is no process-wide default. Two graphs with
//! different backends can coexist in one process, but values minted by
//! different factories must never meet in one expression.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Num;

/// Which representation a factory mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumBackend {
    Double,
    Decimal,
}

/// Factory for `Num` values of a single backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumFactory {
    backend: NumBackend,
}

impl NumFactory {
    pub fn new(backend: NumBackend) -> Self {
        Self { backend }
    }

    /// Factory for the fixed-precision `f64` backend.
    pub fn double() -> Self {
        Self::new(NumBackend::Double)
    }

    /// Factory for the arbitrary-precision decimal backend.
    pub fn decimal() -> Self {
        Self::new(NumBackend::Decimal)
    }

    pub fn backend(&self) -> NumBackend {
        self.backend
    }

    /// True when `value` could have been minted by this factory.
    /// NaN belongs to every backend.
    pub fn owns(&self, value: Num) -> bool {
        match (self.backend, value) {
            (_, Num::NaN) => true,
            (NumBackend::Double, Num::Double(_)) => true,
            (NumBackend::Decimal, Num::Decimal(_)) => true,
            _ => false,
        }
    }

    /// Mint a value from an `f64` literal.
    pub fn num(&self, value: f64) -> Num {
        match self.backend {
            NumBackend::Double => Num::from_double(value),
            NumBackend::Decimal => Decimal::from_f64(value).map(Num::Decimal).unwrap_or(Num::NaN),
        }
    }

    /// Mint a value from an integer literal (exact in both backends).
    pub fn num_i64(&self, value: i64) -> Num {
        match self.backend {
            NumBackend::Double => Num::Double(value as f64),
            NumBackend::Decimal => Num::Decimal(Decimal::from(value)),
        }
    }

    pub fn nan(&self) -> Num {
        Num::NaN
    }

    pub fn zero(&self) -> Num {
        match self.backend {
            NumBackend::Double => Num::Double(0.0),
            NumBackend::Decimal => Num::Decimal(Decimal::ZERO),
        }
    }

    pub fn one(&self) -> Num {
        match self.backend {
            NumBackend::Double => Num::Double(1.0),
            NumBackend::Decimal => Num::Decimal(Decimal::ONE),
        }
    }

    pub fn two(&self) -> Num {
        self.num_i64(2)
    }

    pub fn three(&self) -> Num {
        self.num_i64(3)
    }

    pub fn ten(&self) -> Num {
        self.num_i64(10)
    }

    pub fn fifty(&self) -> Num {
        self.num_i64(50)
    }

    pub fn hundred(&self) -> Num {
        self.num_i64(100)
    }

    pub fn thousand(&self) -> Num {
        self.num_i64(1000)
    }
}
