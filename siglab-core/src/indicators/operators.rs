//! Operator combinators — uncached arithmetic and comparison composition.
//!
//! Operators carry no per-step memory: every `on_bar` drives both operands
//! and `value` recomputes from their current values. They therefore add zero
//! lag of their own; stability is the AND of operand stability.

use crate::domain::Bar;
use crate::indicators::Indicator;
use crate::num::Num;

/// Arithmetic combination of two indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Sum,
    Difference,
    Product,
    Quotient,
    Min,
    Max,
}

#[derive(Debug, Clone)]
pub struct BinaryOperation<L, R> {
    left: L,
    right: R,
    op: BinaryOp,
}

impl<L, R> BinaryOperation<L, R>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
{
    pub fn new(op: BinaryOp, left: L, right: R) -> Self {
        Self { left, right, op }
    }

    pub fn sum(left: L, right: R) -> Self {
        Self::new(BinaryOp::Sum, left, right)
    }

    pub fn difference(left: L, right: R) -> Self {
        Self::new(BinaryOp::Difference, left, right)
    }

    pub fn product(left: L, right: R) -> Self {
        Self::new(BinaryOp::Product, left, right)
    }

    pub fn quotient(left: L, right: R) -> Self {
        Self::new(BinaryOp::Quotient, left, right)
    }

    pub fn min(left: L, right: R) -> Self {
        Self::new(BinaryOp::Min, left, right)
    }

    pub fn max(left: L, right: R) -> Self {
        Self::new(BinaryOp::Max, left, right)
    }
}

impl<L, R> Indicator for BinaryOperation<L, R>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
{
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        self.left.on_bar(bar);
        self.right.on_bar(bar);
    }

    fn value(&self) -> Num {
        let l = self.left.value();
        let r = self.right.value();
        match self.op {
            BinaryOp::Sum => l + r,
            BinaryOp::Difference => l - r,
            BinaryOp::Product => l * r,
            BinaryOp::Quotient => l / r,
            BinaryOp::Min => l.min(r),
            BinaryOp::Max => l.max(r),
        }
    }

    fn is_stable(&self) -> bool {
        self.left.is_stable() && self.right.is_stable()
    }

    fn lag(&self) -> usize {
        self.left.lag().max(self.right.lag())
    }
}

/// Pointwise transformation of one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Abs,
    Sqrt,
    /// Multiply by a constant factor.
    Scale(Num),
    /// Add a constant term.
    Offset(Num),
}

#[derive(Debug, Clone)]
pub struct UnaryOperation<I> {
    input: I,
    op: UnaryOp,
}

impl<I: Indicator<Output = Num>> UnaryOperation<I> {
    pub fn new(op: UnaryOp, input: I) -> Self {
        Self { input, op }
    }

    pub fn abs(input: I) -> Self {
        Self::new(UnaryOp::Abs, input)
    }

    pub fn sqrt(input: I) -> Self {
        Self::new(UnaryOp::Sqrt, input)
    }

    pub fn scale(input: I, factor: Num) -> Self {
        Self::new(UnaryOp::Scale(factor), input)
    }

    pub fn offset(input: I, term: Num) -> Self {
        Self::new(UnaryOp::Offset(term), input)
    }
}

impl<I: Indicator<Output = Num>> Indicator for UnaryOperation<I> {
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        self.input.on_bar(bar);
    }

    fn value(&self) -> Num {
        let v = self.input.value();
        match self.op {
            UnaryOp::Abs => v.abs(),
            UnaryOp::Sqrt => v.sqrt(),
            UnaryOp::Scale(factor) => v * factor,
            UnaryOp::Offset(term) => v + term,
        }
    }

    fn is_stable(&self) -> bool {
        self.input.is_stable()
    }

    fn lag(&self) -> usize {
        self.input.lag()
    }
}

/// Generic combination of two indicators under a caller-supplied function.
#[derive(Clone)]
pub struct CombineIndicator<L, R, F> {
    left: L,
    right: R,
    combine: F,
}

impl<L, R, F> CombineIndicator<L, R, F>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
    F: Fn(Num, Num) -> Num,
{
    pub fn new(left: L, right: R, combine: F) -> Self {
        Self {
            left,
            right,
            combine,
        }
    }
}

impl<L, R, F> Indicator for CombineIndicator<L, R, F>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
    F: Fn(Num, Num) -> Num,
{
    type Output = Num;

    fn on_bar(&mut self, bar: &Bar) {
        self.left.on_bar(bar);
        self.right.on_bar(bar);
    }

    fn value(&self) -> Num {
        (self.combine)(self.left.value(), self.right.value())
    }

    fn is_stable(&self) -> bool {
        self.left.is_stable() && self.right.is_stable()
    }

    fn lag(&self) -> usize {
        self.left.lag().max(self.right.lag())
    }
}

/// Boolean comparison of two indicators, with NaN gating semantics: every
/// ordered comparison involving NaN is false, and NaN is equal only to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
}

#[derive(Debug, Clone)]
pub struct ComparisonOperation<L, R> {
    left: L,
    right: R,
    op: ComparisonOp,
}

impl<L, R> ComparisonOperation<L, R>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
{
    pub fn new(op: ComparisonOp, left: L, right: R) -> Self {
        Self { left, right, op }
    }

    pub fn greater(left: L, right: R) -> Self {
        Self::new(ComparisonOp::Greater, left, right)
    }

    pub fn greater_or_equal(left: L, right: R) -> Self {
        Self::new(ComparisonOp::GreaterOrEqual, left, right)
    }

    pub fn less(left: L, right: R) -> Self {
        Self::new(ComparisonOp::Less, left, right)
    }

    pub fn less_or_equal(left: L, right: R) -> Self {
        Self::new(ComparisonOp::LessOrEqual, left, right)
    }

    pub fn equal(left: L, right: R) -> Self {
        Self::new(ComparisonOp::Equal, left, right)
    }
}

impl<L, R> Indicator for ComparisonOperation<L, R>
where
    L: Indicator<Output = Num>,
    R: Indicator<Output = Num>,
{
    type Output = bool;

    fn on_bar(&mut self, bar: &Bar) {
        self.left.on_bar(bar);
        self.right.on_bar(bar);
    }

    fn value(&self) -> bool {
        let l = self.left.value();
        let r = self.right.value();
        match self.op {
            ComparisonOp::Greater => l.is_greater_than(r),
            ComparisonOp::GreaterOrEqual => l.is_greater_than_or_equal(r),
            ComparisonOp::Less => l.is_less_than(r),
            ComparisonOp::LessOrEqual => l.is_less_than_or_equal(r),
            ComparisonOp::Equal => l.is_equal(r),
        }
    }

    fn is_stable(&self) -> bool {
        self.left.is_stable() && self.right.is_stable()
    }

    fn lag(&self) -> usize {
        self.left.lag().max(self.right.lag())
    }
}
