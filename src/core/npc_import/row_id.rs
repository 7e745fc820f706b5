//! Row discriminators for repeating attribute groups.
//!
//! Repeating rows are named `repeating_<group>_<rowid>_<column>`, so a row id
//! must be non-empty, free of `_`, and unique within its character.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{ImportError, ImportResult};

const ROW_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ROW_ID_LEN: usize = 19;

/// Attempts per allocation before giving up on a colliding generator.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 8;

/// Source of row discriminators.
pub trait RowIdGenerator {
    fn next_row_id(&mut self) -> String;
}

impl<G: RowIdGenerator + ?Sized> RowIdGenerator for &mut G {
    fn next_row_id(&mut self) -> String {
        (**self).next_row_id()
    }
}

impl<G: RowIdGenerator + ?Sized> RowIdGenerator for Box<G> {
    fn next_row_id(&mut self) -> String {
        (**self).next_row_id()
    }
}

/// `-` followed by 19 random base-36 characters (about 98 bits).
#[derive(Debug)]
pub struct RandomRowIds {
    rng: StdRng,
}

impl RandomRowIds {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRowIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RowIdGenerator for RandomRowIds {
    fn next_row_id(&mut self) -> String {
        let mut id = String::with_capacity(ROW_ID_LEN + 1);
        id.push('-');
        for _ in 0..ROW_ID_LEN {
            let idx = self.rng.gen_range(0..ROW_ID_ALPHABET.len());
            id.push(ROW_ID_ALPHABET[idx] as char);
        }
        id
    }
}

/// Deterministic ids: `<prefix>000001`, `<prefix>000002`, ...
#[derive(Debug, Clone)]
pub struct SequentialRowIds {
    prefix: String,
    next: u64,
}

impl SequentialRowIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialRowIds {
    fn default() -> Self {
        Self::new("-row")
    }
}

impl RowIdGenerator for SequentialRowIds {
    fn next_row_id(&mut self) -> String {
        let id = format!("{}{:06}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Hands out row ids that are unique within one import.
pub struct RowIdAllocator<'g, G: RowIdGenerator + ?Sized> {
    generator: &'g mut G,
    issued: HashSet<String>,
}

impl<'g, G: RowIdGenerator + ?Sized> RowIdAllocator<'g, G> {
    pub fn new(generator: &'g mut G) -> Self {
        Self {
            generator,
            issued: HashSet::new(),
        }
    }

    pub fn allocate(&mut self) -> ImportResult<String> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let id = self.generator.next_row_id();
            if id.is_empty() || id.contains('_') {
                continue;
            }
            if self.issued.insert(id.clone()) {
                return Ok(id);
            }
        }
        Err(ImportError::RowIdExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}
