//! TradingRecord — ordered history of closed positions plus the current one.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::cost::{
    HoldingCostModel, TransactionCostModel, ZeroHoldingCost, ZeroTransactionCost,
};
use crate::domain::position::{Position, PositionError};
use crate::domain::trade::TradeSide;
use crate::num::{Num, NumFactory};

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("trade at {at} precedes the last recorded trade at {previous}")]
    OutOfOrder {
        at: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
}

/// One strategy's trade history: closed positions in time order, followed by
/// a current position that is either empty or open. Positions never overlap
/// within a record.
///
/// The starting side fixes the record's direction for its whole life: a
/// buy-starting record holds long positions, a sell-starting record holds
/// short ones.
#[derive(Debug, Clone)]
pub struct TradingRecord {
    starting_side: TradeSide,
    positions: Vec<Position>,
    current: Position,
    transaction_costs: Arc<dyn TransactionCostModel>,
    holding_costs: Arc<dyn HoldingCostModel>,
    factory: NumFactory,
}

impl TradingRecord {
    /// A frictionless, buy-starting (long) record.
    pub fn new(factory: NumFactory) -> Self {
        Self::with_costs(
            TradeSide::Buy,
            Arc::new(ZeroTransactionCost),
            Arc::new(ZeroHoldingCost),
            factory,
        )
    }

    pub fn with_costs(
        starting_side: TradeSide,
        transaction_costs: Arc<dyn TransactionCostModel>,
        holding_costs: Arc<dyn HoldingCostModel>,
        factory: NumFactory,
    ) -> Self {
        let current = Position::new(
            starting_side,
            Arc::clone(&transaction_costs),
            Arc::clone(&holding_costs),
            factory,
        );
        Self {
            starting_side,
            positions: Vec::new(),
            current,
            transaction_costs,
            holding_costs,
            factory,
        }
    }

    pub fn starting_side(&self) -> TradeSide {
        self.starting_side
    }

    pub fn factory(&self) -> &NumFactory {
        &self.factory
    }

    /// Closed positions, oldest first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The current position: empty or open, never closed.
    pub fn current(&self) -> &Position {
        &self.current
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn last_position(&self) -> Option<&Position> {
        self.positions.last()
    }

    /// Timestamp of the most recent trade anywhere in the record.
    pub fn last_trade_time(&self) -> Option<DateTime<Utc>> {
        if let Some(entry) = self.current.entry() {
            return Some(entry.executed_at());
        }
        self.positions
            .last()
            .and_then(|p| p.exit_trade())
            .map(|t| t.executed_at())
    }

    fn check_order(&self, at: DateTime<Utc>) -> Result<(), RecordError> {
        match self.last_trade_time() {
            Some(previous) if at < previous => Err(RecordError::OutOfOrder { at, previous }),
            _ => Ok(()),
        }
    }

    /// Open the current position.
    pub fn enter(
        &mut self,
        at: DateTime<Utc>,
        price: Num,
        amount: Num,
    ) -> Result<(), RecordError> {
        self.check_order(at)?;
        self.current.enter(at, price, amount)?;
        Ok(())
    }

    /// Close the current position and roll it into the history.
    pub fn exit(&mut self, at: DateTime<Utc>, price: Num) -> Result<(), RecordError> {
        self.check_order(at)?;
        self.current.exit(at, price)?;
        let next = Position::new(
            self.starting_side,
            Arc::clone(&self.transaction_costs),
            Arc::clone(&self.holding_costs),
            self.factory,
        );
        let closed = std::mem::replace(&mut self.current, next);
        self.positions.push(closed);
        Ok(())
    }
}
