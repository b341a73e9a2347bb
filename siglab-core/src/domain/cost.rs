//! Cost models — execution friction and financing cost.
//!
//! Transaction cost is charged per execution and folded into the trade's net
//! price. Holding cost accrues with time-in-position and is folded into the
//! valuation price, never into the recorded trade itself.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::num::{Num, NumFactory};

/// Cost charged on a single execution.
pub trait TransactionCostModel: fmt::Debug + Send + Sync {
    /// Total cost of executing `amount` assets at `price` per asset.
    fn cost(&self, price: Num, amount: Num, factory: &NumFactory) -> Num;
}

/// Financing/borrow cost accrued while a position stays open.
pub trait HoldingCostModel: fmt::Debug + Send + Sync {
    /// Cost per asset accrued between `opened_at` and `until`.
    fn cost_per_asset(
        &self,
        opened_at: DateTime<Utc>,
        until: DateTime<Utc>,
        factory: &NumFactory,
    ) -> Num;
}

/// Frictionless execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTransactionCost;

impl TransactionCostModel for ZeroTransactionCost {
    fn cost(&self, _price: Num, _amount: Num, factory: &NumFactory) -> Num {
        factory.zero()
    }
}

/// Proportional fee on traded value: `cost = price * amount * fee_rate`.
#[derive(Debug, Clone, Copy)]
pub struct LinearTransactionCost {
    fee_rate: f64,
}

impl LinearTransactionCost {
    pub fn new(fee_rate: f64) -> Self {
        assert!(
            fee_rate >= 0.0 && fee_rate.is_finite(),
            "fee rate must be a non-negative finite number"
        );
        Self { fee_rate }
    }
}

impl TransactionCostModel for LinearTransactionCost {
    fn cost(&self, price: Num, amount: Num, factory: &NumFactory) -> Num {
        price * amount * factory.num(self.fee_rate)
    }
}

/// No financing cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHoldingCost;

impl HoldingCostModel for ZeroHoldingCost {
    fn cost_per_asset(
        &self,
        _opened_at: DateTime<Utc>,
        _until: DateTime<Utc>,
        factory: &NumFactory,
    ) -> Num {
        factory.zero()
    }
}

/// Flat per-asset cost per day held, prorated over wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct LinearHoldingCost {
    per_asset_per_day: f64,
}

impl LinearHoldingCost {
    pub fn new(per_asset_per_day: f64) -> Self {
        assert!(
            per_asset_per_day >= 0.0 && per_asset_per_day.is_finite(),
            "holding cost must be a non-negative finite number"
        );
        Self { per_asset_per_day }
    }
}

impl HoldingCostModel for LinearHoldingCost {
    fn cost_per_asset(
        &self,
        opened_at: DateTime<Utc>,
        until: DateTime<Utc>,
        factory: &NumFactory,
    ) -> Num {
        if until <= opened_at {
            return factory.zero();
        }
        let seconds = (until - opened_at).num_seconds() as f64;
        let days = seconds / 86_400.0;
        factory.num(self.per_asset_per_day) * factory.num(days)
    }
}
