//! Source indicators — thin readers of a single bar field, plus constants.

use crate::domain::Bar;
use crate::indicators::{Indicator, StepAdmission, StepGuard};
use crate::num::Num;

/// Which bar field a price indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Reads one field of the current bar. Stable from the first bar, lag 0.
#[derive(Debug, Clone)]
pub struct PriceIndicator {
    field: PriceField,
    guard: StepGuard,
    value: Num,
}

impl PriceIndicator {
    pub fn new(field: PriceField) -> Self {
        Self {
            field,
            guard: StepGuard::new(),
            value: Num::NaN,
        }
    }

    pub fn open() -> Self {
        Self::new(PriceField::Open)
    }

    pub fn high() -> Self {
        Self::new(PriceField::High)
    }

    pub fn low() -> Self {
        Self::new(PriceField::Low)
    }

    pub fn close() -> Self {
        Self::new(PriceField::Close)
    }

    pub fn volume() -> Self {
        Self::new(PriceField::Volume)
    }

    fn read(&self, bar: &Bar) -> Num {
        match self.field {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
            PriceField::Volume => bar.volume,
        }
    }
}

impl Indicator for PriceIndicator {
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        match self.guard.admit(bar.end_time) {
            StepAdmission::Replay => {}
            // A source carries no accumulated state, so a rewind is just a
            // fresh read of the rewound bar.
            StepAdmission::Advance | StepAdmission::Rewind => self.value = self.read(bar),
        }
    }

    fn value(&self) -> Num {
        self.value
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn lag(&self) -> usize {
        0
    }
}

/// A fixed value, independent of the bar stream.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    value: Num,
}

impl Constant {
    pub fn new(value: Num) -> Self {
        Self { value }
    }
}

impl Indicator for Constant {
    type Output = Num;

    fn on_bar(&mut self, _bar: &Bar) {}

    fn value(&self) -> Num {
        self.value
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn lag(&self) -> usize {
        0
    }
}
