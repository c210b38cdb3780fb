// src/calc.rs
// Arithmetic evaluator: a closed operation set and a pure compute table.

use serde::Serialize;
use thiserror::Error;

/// Domain errors. All three are expected, user-facing failures surfaced
/// directly to the caller; none triggers a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("invalid numbers")]
    InvalidNumber,
    #[error("unsupported operation")]
    UnsupportedOperation,
    #[error("division by zero")]
    DivisionByZero,
}

/// Canonical operation set. Accepted aliases collapse to these four
/// variants on parse; anything else is rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    /// Normalization table for incoming op strings.
    pub fn parse(raw: &str) -> Result<Self, CalcError> {
        match raw {
            "add" => Ok(Operation::Add),
            "sub" | "subtract" => Ok(Operation::Sub),
            "mul" | "multiply" => Ok(Operation::Mul),
            "div" | "divide" => Ok(Operation::Div),
            _ => Err(CalcError::UnsupportedOperation),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an operand into a finite f64. Spellings that reach infinity or
/// NaN are rejected along with plain garbage.
pub fn parse_operand(raw: &str) -> Result<f64, CalcError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::InvalidNumber),
    }
}

/// Canonical request identity: the sole key for both tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcKey {
    pub op: Operation,
    pub a: f64,
    pub b: f64,
}

impl CalcKey {
    pub fn new(op: Operation, a: f64, b: f64) -> Self {
        Self { op, a, b }
    }

    /// Key string for the expiring cache. f64 Display renders "2" and
    /// "2.0" identically, so equal keys share one entry.
    pub fn cache_key(&self) -> String {
        format!("calc:{}:{}:{}", self.op, self.a, self.b)
    }
}

/// Evaluate one operation. Pure and deterministic; the only failure left
/// at this point is a zero divisor (exact equality, no epsilon).
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64, CalcError> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Sub => Ok(a - b),
        Operation::Mul => Ok(a * b),
        Operation::Div => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            Ok(a / b)
        }
    }
}
