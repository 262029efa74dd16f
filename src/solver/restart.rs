struct Luby {
    base: usize,
    uv: (isize, isize),
}

impl Luby {
    fn new(base: usize) -> Self {
        Self { base, uv: (1, 1) }
    }
}

impl Iterator for Luby {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let (u, v) = self.uv;
        // Based on Knuth's formula, see https://oeis.org/A182105.
        self.uv = if u & -u == v { (u + 1, 1) } else { (u, 2 * v) };
        Some(self.base * v as usize)
    }
}

/// Restart schedule following the Luby sequence, measured in conflicts.
pub struct Restarts {
    conflicts: usize,
    threshold: usize,
    luby: Luby,
}

impl Restarts {
    pub fn new(base: usize) -> Self {
        let mut luby = Luby::new(base);
        let threshold = luby.next().unwrap_or(base);
        Self {
            conflicts: 0,
            threshold,
            luby,
        }
    }

    pub fn conflict(&mut self) {
        self.conflicts += 1;
    }

    /// Returns `true` once the current interval is used up and starts the next one.
    pub fn due(&mut self) -> bool {
        if self.conflicts < self.threshold {
            return false;
        }
        self.conflicts = 0;
        self.threshold = self.luby.next().unwrap_or(self.threshold);
        true
    }
}
