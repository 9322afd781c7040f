//! Declarative calculator records: one output row computed from an ordered list of operands.

use super::kernel::OpCode;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

pub type Label = Cow<'static, str>;

/// Where a calculator reads a row from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A row of the model table being computed.
    Row(Label),
    /// A row of the parallel rate table.
    Rate(Label),
}

impl Operand {
    pub fn row(label: impl Into<Label>) -> Self { Operand::Row(label.into()) }
    pub fn rate(label: impl Into<Label>) -> Self { Operand::Rate(label.into()) }

    pub fn label(&self) -> &str {
        match self {
            Operand::Row(l) | Operand::Rate(l) => l,
        }
    }

    pub fn is_rate(&self) -> bool { matches!(self, Operand::Rate(_)) }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Row(l) => f.write_str(l),
            Operand::Rate(l) => write!(f, "{} (rates)", l),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub op: OpCode,
    pub operand: Operand,
}

/// `output = base op1 operand1 op2 operand2 ...`, evaluated left to right per year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    output: Label,
    base: Operand,
    terms: SmallVec<[Term; 4]>,
}

impl Step {
    pub fn new(output: impl Into<Label>, base: Operand) -> Self {
        Self { output: output.into(), base, terms: SmallVec::new() }
    }

    pub fn plus(self, operand: Operand) -> Self { self.term(OpCode::Add, operand) }
    pub fn minus(self, operand: Operand) -> Self { self.term(OpCode::Sub, operand) }
    pub fn times(self, operand: Operand) -> Self { self.term(OpCode::Mul, operand) }

    pub fn term(mut self, op: OpCode, operand: Operand) -> Self {
        self.terms.push(Term { op, operand });
        self
    }

    pub fn output(&self) -> &str { &self.output }
    pub fn base(&self) -> &Operand { &self.base }
    pub fn terms(&self) -> &[Term] { &self.terms }

    /// Every operand in evaluation order, base first.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        std::iter::once(&self.base).chain(self.terms.iter().map(|t| &t.operand))
    }

    /// Human-readable right-hand side, e.g. `Gross Revenue - Vacancy`.
    pub fn formula(&self) -> String {
        let mut s = self.base.to_string();
        for t in &self.terms {
            s.push_str(&format!(" {} {}", t.op, t.operand));
        }
        s
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.output, self.formula())
    }
}
