pub mod adapter;
pub mod enumerate;
pub mod error;
pub mod io;
pub mod oracle;
pub mod solver;
pub mod types;

use std::{fs, path::Path};

use log::info;

use crate::{
    error::{Error, Result},
    types::Batch,
};

/// Enumerates every system of `batch` in order, each with its own solver.
pub fn solve_batch(batch: &mut Batch) -> Result<()> {
    for (index, system) in batch.iter_mut().enumerate() {
        enumerate::enumerate(system, index)?;
        info!(
            "system {index}: {} variables, {} clauses, {} solutions",
            system.var_count,
            system.clauses.len(),
            system.solutions.len()
        );
    }
    Ok(())
}

/// Reads the batch at `input`, solves it completely and only then writes `output`.
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let bytes = fs::read(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let mut batch = io::decode(&bytes)?;

    solve_batch(&mut batch)?;

    let bytes = io::encode(&batch)?;
    fs::write(output, bytes).map_err(|source| Error::Io {
        path: output.to_path_buf(),
        source,
    })?;

    let total: usize = batch.iter().map(|system| system.solutions.len()).sum();
    info!("wrote {} systems with {total} solutions", batch.len());
    Ok(())
}
