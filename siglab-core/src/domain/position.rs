//! Position — one open-to-close exposure, long or short.
//!
//! State machine: EMPTY → OPEN → CLOSED, with CLOSED terminal. A new
//! `Position` instance is created for the next round trip; instances are
//! never reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::cost::{
    HoldingCostModel, TransactionCostModel, ZeroHoldingCost, ZeroTransactionCost,
};
use crate::domain::trade::{Trade, TradeSide};
use crate::num::{Num, NumFactory};

/// Direction of the exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("position is already opened by the trade at {0}")]
    AlreadyOpened(DateTime<Utc>),

    #[error("position was closed at {0} and is terminal")]
    AlreadyClosed(DateTime<Utc>),

    #[error("cannot exit a position that was never opened")]
    NotOpened,

    #[error("exit at {at} precedes the entry trade at {entry}")]
    ExitBeforeEntry {
        at: DateTime<Utc>,
        entry: DateTime<Utc>,
    },
}

/// A single round-trip (or still-open) exposure.
///
/// The entry side fixes direction: a position entered with a buy is long,
/// one entered with a sell is short.
#[derive(Debug, Clone)]
pub struct Position {
    entry_side: TradeSide,
    entry: Option<Trade>,
    exit: Option<Trade>,
    transaction_costs: Arc<dyn TransactionCostModel>,
    holding_costs: Arc<dyn HoldingCostModel>,
    factory: NumFactory,
}

impl Position {
    pub fn new(
        entry_side: TradeSide,
        transaction_costs: Arc<dyn TransactionCostModel>,
        holding_costs: Arc<dyn HoldingCostModel>,
        factory: NumFactory,
    ) -> Self {
        Self {
            entry_side,
            entry: None,
            exit: None,
            transaction_costs,
            holding_costs,
            factory,
        }
    }

    /// A position with zero transaction and holding costs.
    pub fn frictionless(entry_side: TradeSide, factory: NumFactory) -> Self {
        Self::new(
            entry_side,
            Arc::new(ZeroTransactionCost),
            Arc::new(ZeroHoldingCost),
            factory,
        )
    }

    pub fn side(&self) -> PositionSide {
        match self.entry_side {
            TradeSide::Buy => PositionSide::Long,
            TradeSide::Sell => PositionSide::Short,
        }
    }

    pub fn is_new(&self) -> bool {
        self.entry.is_none()
    }

    pub fn is_opened(&self) -> bool {
        self.entry.is_some() && self.exit.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.exit.is_some()
    }

    pub fn entry(&self) -> Option<&Trade> {
        self.entry.as_ref()
    }

    pub fn exit_trade(&self) -> Option<&Trade> {
        self.exit.as_ref()
    }

    pub fn factory(&self) -> &NumFactory {
        &self.factory
    }

    /// Open the position. Fails if it was already opened or closed.
    pub fn enter(
        &mut self,
        at: DateTime<Utc>,
        price: Num,
        amount: Num,
    ) -> Result<&Trade, PositionError> {
        if let Some(exit) = &self.exit {
            return Err(PositionError::AlreadyClosed(exit.executed_at()));
        }
        if let Some(entry) = &self.entry {
            return Err(PositionError::AlreadyOpened(entry.executed_at()));
        }
        let trade = Trade::new(
            at,
            self.entry_side,
            price,
            amount,
            self.transaction_costs.as_ref(),
            &self.factory,
        );
        Ok(self.entry.insert(trade))
    }

    /// Close the position with the full entry amount. Fails if it was never
    /// opened, was already closed, or the exit precedes the entry.
    pub fn exit(&mut self, at: DateTime<Utc>, price: Num) -> Result<&Trade, PositionError> {
        if let Some(exit) = &self.exit {
            return Err(PositionError::AlreadyClosed(exit.executed_at()));
        }
        let entry = self.entry.as_ref().ok_or(PositionError::NotOpened)?;
        if at < entry.executed_at() {
            return Err(PositionError::ExitBeforeEntry {
                at,
                entry: entry.executed_at(),
            });
        }
        let trade = Trade::new(
            at,
            self.entry_side.complement(),
            price,
            entry.amount(),
            self.transaction_costs.as_ref(),
            &self.factory,
        );
        Ok(self.exit.insert(trade))
    }

    /// Holding cost per asset accrued from entry until `at`.
    /// Zero while the position has no entry.
    pub fn holding_cost_per_asset(&self, at: DateTime<Utc>) -> Num {
        match &self.entry {
            Some(entry) => {
                self.holding_costs
                    .cost_per_asset(entry.executed_at(), at, &self.factory)
            }
            None => self.factory.zero(),
        }
    }

    /// Total holding cost accrued from entry until `at`.
    pub fn holding_cost(&self, at: DateTime<Utc>) -> Num {
        match &self.entry {
            Some(entry) => self.holding_cost_per_asset(at) * entry.amount(),
            None => self.factory.zero(),
        }
    }

    /// Valuation ratio of the position at price `price` and time `at`,
    /// relative to the cost-adjusted entry price.
    ///
    /// Holding cost erodes long returns and inflates the effective cost basis
    /// for shorts: it is subtracted from the valuation price for longs and
    /// added for shorts, before the ratio is formed.
    ///
    /// Long: `(price - hc) / entry_net`.
    /// Short: `1 + (entry_net - (price + hc)) / entry_net`.
    pub fn ratio_at(&self, price: Num, at: DateTime<Utc>) -> Num {
        let entry = match &self.entry {
            Some(entry) => entry,
            None => return self.factory.one(),
        };
        let entry_net = entry.net_price();
        let hc = self.holding_cost_per_asset(at);
        match self.side() {
            PositionSide::Long => (price - hc) / entry_net,
            PositionSide::Short => {
                self.factory.one() + (entry_net - (price + hc)) / entry_net
            }
        }
    }

    /// Realized profit or loss, cost-adjusted: transaction costs through the
    /// net prices, holding cost through the effective exit price. Zero until
    /// closed.
    pub fn profit(&self) -> Num {
        match (&self.entry, &self.exit) {
            (Some(entry), Some(exit)) => {
                let hc = self.holding_cost_per_asset(exit.executed_at());
                let delta = match self.side() {
                    PositionSide::Long => exit.net_price() - hc - entry.net_price(),
                    PositionSide::Short => entry.net_price() - exit.net_price() - hc,
                };
                delta * entry.amount()
            }
            _ => self.factory.zero(),
        }
    }

    /// Profit or loss on raw execution prices, ignoring all costs.
    /// Zero until closed.
    pub fn gross_profit(&self) -> Num {
        match (&self.entry, &self.exit) {
            (Some(entry), Some(exit)) => {
                let delta = match self.side() {
                    PositionSide::Long => exit.price_per_asset() - entry.price_per_asset(),
                    PositionSide::Short => entry.price_per_asset() - exit.price_per_asset(),
                };
                delta * entry.amount()
            }
            _ => self.factory.zero(),
        }
    }
}
