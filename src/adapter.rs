//! Maps a system's 1-based signed literals onto oracle variable handles.

use log::debug;

use crate::{
    error::{Error, Result},
    oracle::{Oracle, OracleLit, Var},
    types::{Lit, Solution, System},
};

/// Explicit table from declared variable id (`1..=var_count`) to oracle handle.
///
/// Lookups go through the table, so the oracle is free to hand out handles
/// in any numbering.
pub struct VarTable {
    vars: Vec<Var>,
}

impl VarTable {
    /// Allocates exactly `var_count` fresh variables; id `k` gets the `k`-th allocation.
    pub fn allocate(oracle: &mut impl Oracle, var_count: usize) -> Self {
        let vars = (0..var_count).map(|_| oracle.new_var()).collect();
        Self { vars }
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Handle of the declared variable `id`, if it is in range.
    pub fn get(&self, id: usize) -> Option<Var> {
        id.checked_sub(1).and_then(|i| self.vars.get(i)).copied()
    }

    /// Handles ordered by declared id.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// `None` for zero or an id outside the table.
    pub fn translate(&self, lit: Lit) -> Option<OracleLit> {
        self.get(lit.unsigned_abs() as usize)
            .map(|var| var.lit(lit > 0))
    }

    /// Clause that is false under exactly `solution` and true under every other assignment.
    pub fn blocking_clause(&self, solution: &Solution) -> Vec<OracleLit> {
        self.vars
            .iter()
            .zip(solution)
            .map(|(var, &value)| var.lit(!value))
            .collect()
    }
}

/// Allocates the system's variables in `oracle` and submits every clause,
/// preserving clause and literal order.
///
/// `index` only labels errors with the system's position in its batch.
pub fn load(system: &System, index: usize, oracle: &mut impl Oracle) -> Result<VarTable> {
    let table = VarTable::allocate(oracle, system.var_count);

    let mut buf = vec![];
    for (i_clause, clause) in system.clauses.iter().enumerate() {
        buf.clear();
        for &literal in clause {
            let lit = table.translate(literal).ok_or(Error::InvalidLiteral {
                system: index,
                clause: i_clause,
                literal,
                var_count: system.var_count,
            })?;
            buf.push(lit);
        }
        oracle.add_clause(&buf)?;
    }

    debug!(
        "system {index}: loaded {} variables and {} clauses",
        table.var_count(),
        system.clauses.len()
    );

    Ok(table)
}
