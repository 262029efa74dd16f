//! Built-in CDCL decision procedure.
//!
//! Incremental: clauses can be added between calls to `solve`, learnt
//! clauses are kept, and each search starts again from decision level 0.

mod assignment;
mod branching;
mod map;
mod restart;

use log::{debug, trace};

use crate::{
    oracle::{Model, Oracle, OracleError, OracleLit, Outcome, Var as Handle},
    types::{to_var, Clause, Lit},
};

use self::{
    assignment::{Assignment, Reason},
    branching::Chooser,
    map::LitMap,
    restart::Restarts,
};

const RESTART_BASE: usize = 16;

pub struct Solver {
    clauses: Vec<Clause>,
    var_count: usize,

    assignment: Assignment,

    watched: LitMap<Vec<usize>>,
    prop_head: usize,

    chooser: Chooser,

    conflicts: usize,
    restarts: Restarts,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            clauses: vec![],
            var_count: 0,
            assignment: Assignment::new(),
            watched: LitMap::new(),
            prop_head: 0,
            chooser: Chooser::new(),
            conflicts: 0,
            restarts: Restarts::new(RESTART_BASE),
        }
    }

    fn add(&mut self, clause: Clause) -> usize {
        let i = self.clauses.len();
        if let [lit0, lit1, ..] = clause[..] {
            self.watched[lit0].push(i);
            self.watched[lit1].push(i);
        }
        self.clauses.push(clause);
        i
    }

    fn to_lit(&self, lit: OracleLit) -> Result<Lit, OracleError> {
        let index = lit.var.index();
        if index >= self.var_count {
            return Err(OracleError::UnknownVar(lit.var));
        }
        let var = Lit::try_from(index + 1).map_err(|_| OracleError::UnknownVar(lit.var))?;
        Ok(if lit.positive { var } else { -var })
    }

    fn propagate(&mut self) -> Option<usize> {
        while let Some(lit) = self.assignment.trail().get(self.prop_head) {
            let lit = -lit;

            let mut i = 0;
            'clause: while i < self.watched[lit].len() {
                let c = self.watched[lit][i];
                let clause = &mut self.clauses[c];

                // Uses "implicit" watches, i.e., the two watched literals
                // are always stored at index 0 and 1. (Borrowed from minisat.)

                if clause[1] != lit {
                    clause.swap(0, 1);
                }
                debug_assert_eq!(clause[1], lit);

                for j in 0..clause.len() {
                    match self.assignment.eval(clause[j]) {
                        Some(true) => {
                            i += 1;
                            continue 'clause;
                        }
                        None if j != 0 => {
                            clause.swap(1, j);
                            debug_assert_ne!(clause[0], clause[1]);

                            self.watched[lit].swap_remove(i);
                            debug_assert!(!self.watched[clause[1]].contains(&c));
                            self.watched[clause[1]].push(c);

                            continue 'clause;
                        }
                        _ => (),
                    }
                }

                if self.assignment.eval(clause[0]).is_none() {
                    // unit clause
                    let unit_lit = clause[0];
                    self.assignment
                        .set(unit_lit, Reason::Propagation { i_clause: c });
                } else {
                    // conflict
                    return Some(c);
                }

                i += 1;
            }

            self.prop_head += 1;
        }

        None
    }

    /// First-UIP conflict analysis; only called above level 0.
    fn analyze(&mut self, i_conflict: usize) -> (Clause, usize) {
        let mut learnt = self.clauses[i_conflict].clone();
        let last_level = self.assignment.last_level();

        let mut i_trail = self.assignment.trail().len();
        let i_assert = loop {
            for &lit in &learnt {
                self.chooser.touch(to_var(lit));
            }

            let mut iter = learnt
                .iter()
                .enumerate()
                .filter(|(_, &lit)| self.assignment.level(lit).unwrap_or(0) >= last_level);
            let Some((i, _)) = iter.next() else {
                unreachable!("conflict clause has no literal at the conflict level")
            };
            if iter.next().is_none() {
                break i;
            }

            i_trail -= 1;
            let on_lit = self.assignment.trail()[i_trail];

            let i_reason = match self.assignment.reason(on_lit) {
                Some(Reason::Propagation { i_clause }) => i_clause,
                _ => unreachable!("decision reached before the first UIP"),
            };
            let reason = &self.clauses[i_reason];
            debug_assert!(reason.contains(&on_lit));

            let len_before = learnt.len();
            learnt.retain(|&lit| lit != -on_lit);
            if learnt.len() != len_before {
                // learnt contained -on_lit, finish the resolution
                learnt.extend(reason.iter().filter(|&&lit| lit != on_lit));
                // need to dedup to correctly determine #lits at a given level
                learnt.sort();
                learnt.dedup();
            }
        };

        learnt.swap(0, i_assert);

        let backtrack_level = match learnt[1..]
            .iter()
            .enumerate()
            .max_by_key(|(_, &lit)| self.assignment.level(lit).unwrap_or(0))
        {
            None => 1,
            Some((i_max, _)) => {
                learnt.swap(1, i_max + 1);
                self.assignment.level(learnt[1]).unwrap_or(0) + 1
            }
        };

        self.chooser.rescale();

        (learnt, backtrack_level)
    }

    fn backtrack(&mut self, level: usize) {
        self.assignment.backtrack(level);
        self.prop_head = std::cmp::min(self.prop_head, self.assignment.trail().len());
    }

    fn model(&self) -> Model {
        let values = (1..=self.var_count)
            .map(|var| self.assignment.eval(var as Lit) == Some(true))
            .collect();
        Model::new(values)
    }

    fn search(&mut self) -> Outcome {
        // clauses may have been added since the last call, start over from level 0
        self.assignment.clear();
        self.prop_head = 0;

        for (i, clause) in self.clauses.iter().enumerate() {
            match clause[..] {
                [] => return Outcome::Unsat,
                [lit] => match self.assignment.eval(lit) {
                    None => self
                        .assignment
                        .set(lit, Reason::Propagation { i_clause: i }),
                    Some(false) => return Outcome::Unsat,
                    Some(true) => (),
                },
                _ => (),
            }
        }

        if self.propagate().is_some() {
            return Outcome::Unsat;
        }

        while let Some(var) = self.chooser.choose(&self.assignment) {
            self.assignment.set(-(var as Lit), Reason::Decision);

            while let Some(i_conflict) = self.propagate() {
                if self.assignment.last_level() == 0 {
                    return Outcome::Unsat;
                }
                self.conflicts += 1;
                self.restarts.conflict();

                let (learnt, level) = self.analyze(i_conflict);
                trace!("learnt {learnt:?}, backtracking to level {level}");

                self.backtrack(level);

                let lit_assert = learnt[0];
                let i_clause = self.add(learnt);
                self.assignment
                    .set(lit_assert, Reason::Propagation { i_clause });
            }

            if self.restarts.due() && self.assignment.last_level() >= 1 {
                debug!("restart after {} conflicts in total", self.conflicts);
                self.backtrack(1);
            }
        }

        Outcome::Sat(self.model())
    }
}

impl Oracle for Solver {
    fn new_var(&mut self) -> Handle {
        self.assignment.grow();
        self.watched.grow();
        let var = self.chooser.grow();
        self.var_count += 1;
        debug_assert_eq!(var, self.var_count);
        Handle::from_index(var - 1)
    }

    fn var_count(&self) -> usize {
        self.var_count
    }

    fn add_clause(&mut self, lits: &[OracleLit]) -> Result<(), OracleError> {
        let mut clause = lits
            .iter()
            .map(|&lit| self.to_lit(lit))
            .collect::<Result<Clause, _>>()?;
        clause.sort();
        clause.dedup();

        if clause.iter().any(|&lit| clause.binary_search(&-lit).is_ok()) {
            // tautology
            return Ok(());
        }

        self.add(clause);
        Ok(())
    }

    fn solve(&mut self) -> Result<Outcome, OracleError> {
        let outcome = self.search();
        if let Outcome::Sat(model) = &outcome {
            if model.len() != self.var_count {
                return Err(OracleError::IncompleteModel {
                    expected: self.var_count,
                    actual: model.len(),
                });
            }
        }
        Ok(outcome)
    }
}
