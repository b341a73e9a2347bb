//! SigLab Analysis — turns trade histories into time-valued return series
//! and scalar performance scores.
//!
//! - `CashFlow`: mark-to-market valuation, one point per bar while exposed
//! - `RealizedCashFlow`: entry/exit points only, wall-clock interpolation
//! - `criteria`: pure scoring functions with a `better_than` ranking order,
//!   plus statistical wrappers (average, variance, standard error)

pub mod cashflow;
pub mod criteria;
pub mod realized;

pub use cashflow::CashFlow;
pub use criteria::{
    AnalysisCriterion, AverageCriterion, MaximumDrawdown, NumberOfPositions, ProfitLoss,
    StandardErrorCriterion, TotalReturn, VarianceCriterion,
};
pub use realized::RealizedCashFlow;
