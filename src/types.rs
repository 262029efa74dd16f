pub type Lit = i32;

pub type Var = usize;

pub fn to_var(lit: Lit) -> Var {
    assert_ne!(lit, 0);
    lit.unsigned_abs() as Var
}

pub type Clause = Vec<Lit>;

/// One total assignment; index `i` holds the value of variable `i + 1`.
pub type Solution = Vec<bool>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct System {
    pub var_count: usize,
    pub clauses: Vec<Clause>,
    pub solutions: Vec<Solution>,
}

impl System {
    pub fn new(var_count: usize, clauses: Vec<Clause>) -> Self {
        Self {
            var_count,
            clauses,
            solutions: vec![],
        }
    }

    /// Evaluates the original clauses only, never anything added while solving.
    pub fn is_satisfied_by(&self, solution: &Solution) -> bool {
        solution.len() == self.var_count
            && self.clauses.iter().all(|clause| {
                clause.iter().any(|&lit| {
                    let value = (lit.unsigned_abs() as usize)
                        .checked_sub(1)
                        .and_then(|i| solution.get(i));
                    value == Some(&lit.is_positive())
                })
            })
    }
}

pub type Batch = Vec<System>;
