//! Binary batch container.
//!
//! All integers are 32-bit signed in native byte order. Input:
//!
//! ```text
//! systems, then per system: vars, clauses, then per clause: len, literals...
//! ```
//!
//! Output:
//!
//! ```text
//! systems, then per system: vars, solutions, then solutions * vars bits (0 or 1)
//! ```
//!
//! Clauses are never written back.

use std::io::{BufWriter, Read, Write};

use log::{debug, warn};

use crate::{
    error::{Error, Result},
    types::{Batch, Clause, Lit, System},
};

const WORD: usize = std::mem::size_of::<i32>();

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn int(&mut self, expected: &'static str) -> Result<i32> {
        let word = self
            .bytes
            .get(self.pos..self.pos + WORD)
            .ok_or(Error::MalformedInput {
                offset: self.pos,
                expected,
            })?;
        self.pos += WORD;
        let mut buf = [0; WORD];
        buf.copy_from_slice(word);
        Ok(i32::from_ne_bytes(buf))
    }

    fn count(&mut self, expected: &'static str) -> Result<usize> {
        let offset = self.pos;
        let value = self.int(expected)?;
        usize::try_from(value).map_err(|_| Error::InvalidInput {
            offset,
            reason: format!("negative {expected} {value}"),
        })
    }

    /// Capacity hint that never trusts a count beyond what the stream can hold.
    fn capacity(&self, count: usize) -> usize {
        count.min(self.remaining() / WORD)
    }
}

fn decode_system(reader: &mut Reader, index: usize) -> Result<System> {
    let var_count = reader.count("variable count")?;
    let clause_count = reader.count("clause count")?;

    let mut clauses = Vec::with_capacity(reader.capacity(clause_count));
    for i_clause in 0..clause_count {
        let len = reader.count("clause length")?;
        let mut clause: Clause = Vec::with_capacity(reader.capacity(len));
        for _ in 0..len {
            let literal: Lit = reader.int("literal")?;
            let var = literal.unsigned_abs() as usize;
            if var == 0 || var > var_count {
                return Err(Error::InvalidLiteral {
                    system: index,
                    clause: i_clause,
                    literal,
                    var_count,
                });
            }
            clause.push(literal);
        }
        clauses.push(clause);
    }

    Ok(System::new(var_count, clauses))
}

pub fn decode(bytes: &[u8]) -> Result<Batch> {
    let mut reader = Reader::new(bytes);

    let system_count = reader.count("system count")?;
    let mut batch = Vec::with_capacity(reader.capacity(system_count));
    for index in 0..system_count {
        batch.push(decode_system(&mut reader, index)?);
    }

    if reader.remaining() > 0 {
        warn!(
            "ignoring {} trailing bytes after {} systems",
            reader.remaining(),
            system_count
        );
    }
    debug!("decoded {system_count} systems from {} bytes", bytes.len());

    Ok(batch)
}

fn int(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidInput {
        offset: 0,
        reason: format!("{what} {value} does not fit the output container"),
    })
}

fn write_batch_to(writer: &mut impl Write, batch: &Batch) -> std::io::Result<()> {
    writer.write_all(&(batch.len() as i32).to_ne_bytes())?;
    for system in batch {
        writer.write_all(&(system.var_count as i32).to_ne_bytes())?;
        writer.write_all(&(system.solutions.len() as i32).to_ne_bytes())?;
        for solution in &system.solutions {
            for &value in solution {
                writer.write_all(&i32::from(value).to_ne_bytes())?;
            }
        }
    }
    Ok(())
}

/// Fails with `InvalidInput` if a count does not fit in 32 bits.
fn validate(batch: &Batch) -> Result<()> {
    int(batch.len(), "system count")?;
    for system in batch {
        int(system.var_count, "variable count")?;
        int(system.solutions.len(), "solution count")?;
        debug_assert!(system
            .solutions
            .iter()
            .all(|solution| solution.len() == system.var_count));
    }
    Ok(())
}

pub fn encode(batch: &Batch) -> Result<Vec<u8>> {
    validate(batch)?;
    let mut bytes = vec![];
    write_batch_to(&mut bytes, batch)?;
    Ok(bytes)
}

pub fn read_batch(reader: &mut impl Read) -> Result<Batch> {
    let mut bytes = vec![];
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

pub fn write_batch(writer: &mut impl Write, batch: &Batch) -> Result<()> {
    validate(batch)?;
    let mut writer = BufWriter::new(writer);
    write_batch_to(&mut writer, batch)?;
    writer.flush()?;
    Ok(())
}
