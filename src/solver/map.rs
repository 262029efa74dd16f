use std::ops::{Index, IndexMut};

use crate::types::{to_var, Lit, Var};

/// Vector indexed by literal; both polarities of every variable get a slot.
pub struct LitMap<T>(Vec<T>);

impl<T> LitMap<T> {
    fn position(lit: Lit) -> usize {
        2 * to_var(lit) - (lit.is_negative() as usize)
    }
}

impl<T: Default> LitMap<T> {
    pub fn new() -> Self {
        // slot 0 is never addressed
        Self(vec![T::default()])
    }

    /// Makes room for one more variable.
    pub fn grow(&mut self) {
        self.0.push(T::default());
        self.0.push(T::default());
    }
}

impl<T> Index<Lit> for LitMap<T> {
    type Output = T;

    fn index(&self, index: Lit) -> &Self::Output {
        &self.0[LitMap::<T>::position(index)]
    }
}

impl<T> IndexMut<Lit> for LitMap<T> {
    fn index_mut(&mut self, index: Lit) -> &mut Self::Output {
        &mut self.0[LitMap::<T>::position(index)]
    }
}

/// Vector indexed by (1-based) variable.
pub struct VarMap<T>(Vec<T>);

impl<T: Default> VarMap<T> {
    pub fn new() -> Self {
        Self(vec![T::default()])
    }

    pub fn grow(&mut self) {
        self.0.push(T::default());
    }
}

impl<T> VarMap<T> {
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut().skip(1)
    }
}

impl<T> Index<Var> for VarMap<T> {
    type Output = T;

    fn index(&self, index: Var) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> IndexMut<Var> for VarMap<T> {
    fn index_mut(&mut self, index: Var) -> &mut Self::Output {
        &mut self.0[index]
    }
}
