//! Trade — an immutable record of a single execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::cost::TransactionCostModel;
use crate::num::{Num, NumFactory};

/// Direction of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// The side that closes a position opened by this side.
    pub fn complement(self) -> TradeSide {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }
}

/// A single execution within a position.
///
/// `net_price` is the effective per-asset price after the transaction cost:
/// raised for buys, lowered for sells. The raw `price_per_asset` is kept
/// unchanged for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    executed_at: DateTime<Utc>,
    side: TradeSide,
    price_per_asset: Num,
    amount: Num,
    cost: Num,
    net_price: Num,
}

impl Trade {
    /// Record an execution, charging `cost_model` and deriving the net price.
    pub fn new(
        executed_at: DateTime<Utc>,
        side: TradeSide,
        price_per_asset: Num,
        amount: Num,
        cost_model: &dyn TransactionCostModel,
        factory: &NumFactory,
    ) -> Self {
        assert!(
            amount.is_positive(),
            "trade amount must be a positive number"
        );
        let cost = cost_model.cost(price_per_asset, amount, factory);
        let cost_per_asset = cost / amount;
        let net_price = match side {
            TradeSide::Buy => price_per_asset + cost_per_asset,
            TradeSide::Sell => price_per_asset - cost_per_asset,
        };
        Self {
            executed_at,
            side,
            price_per_asset,
            amount,
            cost,
            net_price,
        }
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }

    pub fn price_per_asset(&self) -> Num {
        self.price_per_asset
    }

    pub fn amount(&self) -> Num {
        self.amount
    }

    pub fn cost(&self) -> Num {
        self.cost
    }

    pub fn net_price(&self) -> Num {
        self.net_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cost::{LinearTransactionCost, ZeroTransactionCost};
    use chrono::TimeZone;

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 30, 0).unwrap()
    }

    #[test]
    fn frictionless_net_price_equals_raw() {
        let f = NumFactory::double();
        let trade = Trade::new(
            when(),
            TradeSide::Buy,
            f.hundred(),
            f.ten(),
            &ZeroTransactionCost,
            &f,
        );
        assert_eq!(trade.net_price(), f.hundred());
        assert!(trade.cost().is_zero());
    }

    #[test]
    fn buy_cost_raises_net_price() {
        let f = NumFactory::double();
        let model = LinearTransactionCost::new(0.01);
        let trade = Trade::new(when(), TradeSide::Buy, f.hundred(), f.ten(), &model, &f);
        // cost = 100 * 10 * 1% = 10, so 1 per asset
        assert_eq!(trade.cost(), f.ten());
        assert_eq!(trade.net_price(), f.num(101.0));
    }

    #[test]
    fn sell_cost_lowers_net_price() {
        let f = NumFactory::double();
        let model = LinearTransactionCost::new(0.01);
        let trade = Trade::new(when(), TradeSide::Sell, f.hundred(), f.ten(), &model, &f);
        assert_eq!(trade.net_price(), f.num(99.0));
    }

    #[test]
    fn complement_flips_side() {
        assert_eq!(TradeSide::Buy.complement(), TradeSide::Sell);
        assert_eq!(TradeSide::Sell.complement(), TradeSide::Buy);
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn zero_amount_rejected() {
        let f = NumFactory::double();
        let _ = Trade::new(
            when(),
            TradeSide::Buy,
            f.hundred(),
            f.zero(),
            &ZeroTransactionCost,
            &f,
        );
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let f = NumFactory::double();
        let trade = Trade::new(
            when(),
            TradeSide::Sell,
            f.num(42.5),
            f.two(),
            &ZeroTransactionCost,
            &f,
        );
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
