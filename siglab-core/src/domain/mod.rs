//! Domain types: bars, trades, positions, trading records, cost models.

pub mod bar;
pub mod cost;
pub mod position;
pub mod trade;
pub mod trading_record;

pub use bar::{Bar, BarSeries, SeriesError};
pub use cost::{
    HoldingCostModel, LinearHoldingCost, LinearTransactionCost, TransactionCostModel,
    ZeroHoldingCost, ZeroTransactionCost,
};
pub use position::{Position, PositionError, PositionSide};
pub use trade::{Trade, TradeSide};
pub use trading_record::{RecordError, TradingRecord};
