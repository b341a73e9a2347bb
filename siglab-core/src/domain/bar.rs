//! Bar — the fundamental market data unit, and the series that holds them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::num::{Num, NumFactory};

/// OHLCV bar for a single time interval.
///
/// `begin_time`/`end_time` are monotonic across a series; indicators key
/// their step admission on `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub begin_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub open: Num,
    pub high: Num,
    pub low: Num,
    pub close: Num,
    pub volume: Num,
}

impl Bar {
    /// True when the close is strictly above the open.
    pub fn is_bullish(&self) -> bool {
        self.close.is_greater_than(self.open)
    }

    /// True when the close is strictly below the open.
    pub fn is_bearish(&self) -> bool {
        self.close.is_less_than(self.open)
    }

    /// Returns true if any price or volume field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar beginning at {incoming} precedes the previous bar at {previous}")]
    OutOfOrder {
        incoming: DateTime<Utc>,
        previous: DateTime<Utc>,
    },

    #[error("bar begins at {begin} but ends at {end}")]
    InvertedInterval {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("bar prices were minted by a different numeric backend than the series factory")]
    BackendMismatch,
}

/// Ordered, append-only sequence of bars sharing one numeric factory.
///
/// This is only a source of bars for `on_bar` calls; the computation core
/// never mutates a series it reads from. Ingestion and aggregation live in
/// collaborating layers.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<Bar>,
    factory: NumFactory,
}

impl BarSeries {
    pub fn new(factory: NumFactory) -> Self {
        Self {
            bars: Vec::new(),
            factory,
        }
    }

    pub fn factory(&self) -> &NumFactory {
        &self.factory
    }

    /// Append a bar, enforcing non-decreasing `begin_time` and a single
    /// numeric backend per series.
    pub fn push(&mut self, bar: Bar) -> Result<(), SeriesError> {
        if bar.end_time < bar.begin_time {
            return Err(SeriesError::InvertedInterval {
                begin: bar.begin_time,
                end: bar.end_time,
            });
        }
        if let Some(last) = self.bars.last() {
            if bar.begin_time < last.begin_time {
                return Err(SeriesError::OutOfOrder {
                    incoming: bar.begin_time,
                    previous: last.begin_time,
                });
            }
        }
        let owned = [bar.open, bar.high, bar.low, bar.close, bar.volume]
            .into_iter()
            .all(|v| self.factory.owns(v));
        if !owned {
            return Err(SeriesError::BackendMismatch);
        }
        self.bars.push(bar);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }
}
