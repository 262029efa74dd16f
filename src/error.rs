use std::path::PathBuf;

use thiserror::Error;

use crate::{oracle::OracleError, types::Lit};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The container ended before a declared count was satisfied.
    #[error("malformed input: stream ended at byte {offset} while reading {expected}")]
    MalformedInput {
        offset: usize,
        expected: &'static str,
    },

    #[error("invalid input at byte {offset}: {reason}")]
    InvalidInput { offset: usize, reason: String },

    #[error(
        "invalid literal {literal} in clause {clause} of system {system} \
         (variables are 1..={var_count})"
    )]
    InvalidLiteral {
        system: usize,
        clause: usize,
        literal: Lit,
        var_count: usize,
    },

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
}
