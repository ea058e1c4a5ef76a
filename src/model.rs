//! The in-memory model handed to the exporter.
//!
//! The exporter never mutates a model; it only needs enough structural
//! information (bound shapes, coefficients, integrality) to emit legal text.
use std::collections::BTreeMap;

/// Optimization sense
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Sense {
    /// min
    Minimize,
    /// max
    Maximize,
}

/// A decision variable. Its identifier is its index in [Model::variables].
#[derive(Debug, Clone)]
pub struct Variable {
    /// Raw user-supplied name. May be absent, duplicated, or contain
    /// characters the target formats forbid; the exporter resolves it.
    pub name: Option<String>,
    /// `f64::NEG_INFINITY` if there is no lower bound
    pub lower_bound: f64,
    /// `f64::INFINITY` if there is no upper bound
    pub upper_bound: f64,
    /// Whether the variable is forced to take only integer values
    pub is_integer: bool,
}

impl Variable {
    /// An integer variable with bounds exactly [0, 1].
    pub fn is_binary(&self) -> bool {
        self.is_integer && self.lower_bound == 0.0 && self.upper_bound == 1.0
    }

    /// True when the bounds match the formats' implicit default,
    /// a continuous variable in `[0, +inf)`.
    pub(crate) fn has_default_bounds(&self) -> bool {
        self.lower_bound == 0.0 && self.upper_bound == f64::INFINITY
    }
}

/// A linear constraint `lower_bound <= expr <= upper_bound`.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Raw user-supplied name, resolved by the exporter like variable names.
    pub name: Option<String>,
    /// `f64::NEG_INFINITY` if there is no lower bound
    pub lower_bound: f64,
    /// `f64::INFINITY` if there is no upper bound
    pub upper_bound: f64,
    /// Sparse expression: variable index to coefficient. A `BTreeMap` keeps
    /// the term order stable across exports of the same model.
    pub coefficients: BTreeMap<usize, f64>,
}

impl Constraint {
    /// A constraint with two distinct finite bounds. Such constraints are
    /// written as two inequality rows in .lp output and as one row plus a
    /// RANGES entry in MPS output.
    pub fn is_range(&self) -> bool {
        self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound != self.upper_bound
    }
}

/// The objective function.
#[derive(Debug, Clone)]
pub struct Objective {
    /// Sparse linear expression: variable index to coefficient.
    pub coefficients: BTreeMap<usize, f64>,
    /// Constant term added to the expression.
    pub offset: f64,
    /// Whether to maximize or minimize.
    pub sense: Sense,
}

/// A complete linear or mixed-integer program.
#[derive(Debug, Clone)]
pub struct Model {
    /// Problem name, shown in comment headers and the MPS NAME record.
    pub name: String,
    /// Ordered variable list. Coefficient maps index into it.
    pub variables: Vec<Variable>,
    /// Ordered constraint list.
    pub constraints: Vec<Constraint>,
    /// The objective function.
    pub objective: Objective,
}
