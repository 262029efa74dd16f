//! The capability set a satisfiability decision procedure has to offer so
//! that solutions can be enumerated on top of it.

use thiserror::Error;

/// Handle of a decision variable, scoped to the oracle instance that allocated it.
///
/// Handles are numbered by allocation order starting at zero, which is also
/// their position inside a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(usize);

impl Var {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn lit(self, positive: bool) -> OracleLit {
        OracleLit {
            var: self,
            positive,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OracleLit {
    pub var: Var,
    pub positive: bool,
}

/// A total assignment over every variable allocated so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model(Vec<bool>);

impl Model {
    pub fn new(values: Vec<bool>) -> Self {
        Self(values)
    }

    /// Value of `var`, or `None` for a handle the oracle never allocated.
    pub fn value(&self, var: Var) -> Option<bool> {
        self.0.get(var.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Sat(Model),
    Unsat,
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("unknown variable handle {0:?}")]
    UnknownVar(Var),

    #[error("model has {actual} values, expected {expected}")]
    IncompleteModel { expected: usize, actual: usize },

    #[error("{0}")]
    Other(String),
}

/// Incremental satisfiability decision procedure.
///
/// Clauses accumulate and are never removed; every `solve` is evaluated
/// against the conjunction of all clauses added so far.
pub trait Oracle {
    /// Allocates a fresh decision variable.
    fn new_var(&mut self) -> Var;

    /// Number of variables allocated so far.
    fn var_count(&self) -> usize;

    /// Adds the disjunction of `lits`. An empty slice makes the instance unsatisfiable.
    fn add_clause(&mut self, lits: &[OracleLit]) -> Result<(), OracleError>;

    fn solve(&mut self) -> Result<Outcome, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn new_var(&mut self) -> Var {
        (**self).new_var()
    }

    fn var_count(&self) -> usize {
        (**self).var_count()
    }

    fn add_clause(&mut self, lits: &[OracleLit]) -> Result<(), OracleError> {
        (**self).add_clause(lits)
    }

    fn solve(&mut self) -> Result<Outcome, OracleError> {
        (**self).solve()
    }
}
