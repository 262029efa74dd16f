//! Exhaustive solution enumeration by repeated solve and block.
//!
//! Every model the oracle returns is recorded and then excluded with a
//! blocking clause, so the next call has to find a different assignment.
//! The search stops on the first UNSAT verdict. With `n` variables this
//! takes at most `2^n + 1` oracle calls and never yields an assignment twice.

use log::debug;

use crate::{
    adapter::{self, VarTable},
    error::Result,
    oracle::{Oracle, OracleError, Outcome},
    solver::Solver,
    types::{Solution, System},
};

/// Lazily yields the satisfying assignments of a system.
///
/// The discovery order depends on the oracle; only the set of yielded
/// solutions is meaningful. After an error or UNSAT the iterator is exhausted.
pub struct Enumerator<O: Oracle> {
    oracle: O,
    table: VarTable,
    done: bool,
}

impl<O: Oracle> Enumerator<O> {
    /// Loads `system`'s clauses into a fresh `oracle`.
    pub fn new(mut oracle: O, system: &System, index: usize) -> Result<Self> {
        let table = adapter::load(system, index, &mut oracle)?;
        Ok(Self {
            oracle,
            table,
            done: false,
        })
    }

    fn step(&mut self) -> Result<Option<Solution>> {
        let model = match self.oracle.solve()? {
            Outcome::Unsat => return Ok(None),
            Outcome::Sat(model) => model,
        };

        let solution = self
            .table
            .vars()
            .iter()
            .map(|&var| model.value(var).ok_or(OracleError::UnknownVar(var)))
            .collect::<std::result::Result<Solution, _>>()?;

        self.oracle
            .add_clause(&self.table.blocking_clause(&solution))?;

        Ok(Some(solution))
    }
}

impl<O: Oracle> Iterator for Enumerator<O> {
    type Item = Result<Solution>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(solution)) => Some(Ok(solution)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<O: Oracle> std::iter::FusedIterator for Enumerator<O> {}

/// Runs `oracle` to exhaustion on `system` and appends every solution found.
///
/// `oracle` must be fresh; it is consumed so that no state leaks into other systems.
pub fn enumerate_with<O: Oracle>(oracle: O, system: &mut System, index: usize) -> Result<()> {
    for solution in Enumerator::new(oracle, system, index)? {
        let solution = solution?;
        debug!("system {index}: solution {}", display(&solution));
        debug_assert!(system.is_satisfied_by(&solution));
        system.solutions.push(solution);
    }
    Ok(())
}

/// Same as [`enumerate_with`], using the built-in solver.
pub fn enumerate(system: &mut System, index: usize) -> Result<()> {
    enumerate_with(Solver::new(), system, index)
}

fn display(solution: &Solution) -> String {
    solution
        .iter()
        .map(|&value| if value { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};
    use test_log::test;

    use crate::{
        error::Error,
        oracle::{Model, Oracle, OracleError, OracleLit, Outcome, Var},
        solver::Solver,
        types::{Clause, Solution, System},
    };

    use super::{enumerate, enumerate_with, Enumerator};

    fn solutions(var_count: usize, clauses: Vec<Clause>) -> Vec<Solution> {
        let mut system = System::new(var_count, clauses);
        enumerate(&mut system, 0).unwrap();
        system.solutions
    }

    fn as_set(solutions: &[Solution]) -> HashSet<Solution> {
        solutions.iter().cloned().collect()
    }

    fn brute_force(system: &System) -> HashSet<Solution> {
        let n = system.var_count;
        (0..1u32 << n)
            .map(|bits| (0..n).map(|i| bits >> i & 1 == 1).collect::<Solution>())
            .filter(|solution| system.is_satisfied_by(solution))
            .collect()
    }

    fn random_system(rng: &mut StdRng) -> System {
        let var_count = rng.gen_range(0..=12);
        if var_count == 0 {
            return System::new(0, vec![]);
        }
        let clause_count = rng.gen_range(var_count..=4 * var_count);
        let clauses = (0..clause_count)
            .map(|_| {
                let len = rng.gen_range(1..=3);
                (0..len)
                    .map(|_| {
                        let var = rng.gen_range(1..=var_count) as i32;
                        if rng.gen_bool(0.5) {
                            var
                        } else {
                            -var
                        }
                    })
                    .collect()
            })
            .collect();
        System::new(var_count, clauses)
    }

    #[test]
    fn zero_variables() {
        assert_eq!(solutions(0, vec![]), vec![Vec::<bool>::new()]);
    }

    #[test]
    fn zero_variables_empty_clause() {
        assert!(solutions(0, vec![vec![]]).is_empty());
    }

    #[test]
    fn contradiction() {
        assert!(solutions(1, vec![vec![1], vec![-1]]).is_empty());
    }

    #[test]
    fn disjunction() {
        let found = solutions(2, vec![vec![1, 2]]);
        assert_eq!(found.len(), 3);
        let expected = as_set(&[vec![true, false], vec![false, true], vec![true, true]]);
        assert_eq!(as_set(&found), expected);
    }

    #[test]
    fn unconstrained() {
        let found = solutions(1, vec![]);
        assert_eq!(as_set(&found), as_set(&[vec![false], vec![true]]));

        assert_eq!(solutions(6, vec![]).len(), 64);
    }

    #[test]
    fn invalid_literal_fails() {
        let mut system = System::new(2, vec![vec![3]]);
        let result = enumerate(&mut system, 0);
        assert!(matches!(result, Err(Error::InvalidLiteral { .. })));
        assert!(system.solutions.is_empty());
    }

    #[test]
    fn agrees_with_truth_table() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut system = random_system(&mut rng);
            let expected = brute_force(&system);

            enumerate(&mut system, 0).unwrap();

            let found = as_set(&system.solutions);
            assert_eq!(found.len(), system.solutions.len(), "duplicate solution");
            assert_eq!(found, expected);
            assert!(system
                .solutions
                .iter()
                .all(|solution| system.is_satisfied_by(solution)));
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let system = random_system(&mut rng);
            let mut first = system.clone();
            let mut second = system.clone();
            enumerate(&mut first, 0).unwrap();
            enumerate(&mut second, 0).unwrap();
            assert_eq!(first.solutions.len(), second.solutions.len());
            assert_eq!(as_set(&first.solutions), as_set(&second.solutions));
        }
    }

    #[test]
    fn lazy_and_fused() {
        let system = System::new(3, vec![vec![1], vec![2]]);
        let mut solutions = Enumerator::new(Solver::new(), &system, 0).unwrap();
        assert!(solutions.next().unwrap().is_ok());
        assert!(solutions.next().unwrap().is_ok());
        assert!(solutions.next().is_none());
        assert!(solutions.next().is_none());
    }

    /// Plays back a fixed list of models, advancing on every full-length clause.
    struct Scripted {
        vars: usize,
        script: Vec<Vec<bool>>,
        blocked: usize,
    }

    impl Oracle for Scripted {
        fn new_var(&mut self) -> Var {
            self.vars += 1;
            Var::from_index(self.vars - 1)
        }

        fn var_count(&self) -> usize {
            self.vars
        }

        fn add_clause(&mut self, lits: &[OracleLit]) -> Result<(), OracleError> {
            if lits.len() == self.vars {
                self.blocked += 1;
            }
            Ok(())
        }

        fn solve(&mut self) -> Result<Outcome, OracleError> {
            match self.script.get(self.blocked) {
                Some(values) => Ok(Outcome::Sat(Model::new(values.clone()))),
                None => Ok(Outcome::Unsat),
            }
        }
    }

    #[test]
    fn keeps_discovery_order() {
        let script = vec![vec![true, true], vec![true, false]];
        let oracle = Scripted {
            vars: 0,
            script: script.clone(),
            blocked: 0,
        };
        let mut system = System::new(2, vec![vec![1]]);
        enumerate_with(oracle, &mut system, 0).unwrap();
        assert_eq!(system.solutions, script);
    }

    struct Failing;

    impl Oracle for Failing {
        fn new_var(&mut self) -> Var {
            Var::from_index(0)
        }

        fn var_count(&self) -> usize {
            1
        }

        fn add_clause(&mut self, _lits: &[OracleLit]) -> Result<(), OracleError> {
            Ok(())
        }

        fn solve(&mut self) -> Result<Outcome, OracleError> {
            Err(OracleError::Other("out of memory".into()))
        }
    }

    #[test]
    fn oracle_failure_is_fatal() {
        let mut system = System::new(1, vec![]);
        let result = enumerate_with(Failing, &mut system, 0);
        assert!(matches!(result, Err(Error::Oracle(_))));

        let mut solutions = Enumerator::new(Failing, &System::new(1, vec![]), 0).unwrap();
        assert!(solutions.next().unwrap().is_err());
        assert!(solutions.next().is_none());
    }
}
