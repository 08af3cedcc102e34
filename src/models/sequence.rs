//! Home/away sequences.
//!
//! A team's season is a sequence of [`Venue`]s. Only the first half is
//! stored; the second half is its complement, so a full sequence is always
//! `half ++ complement(half)`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TournamentError};

/// Where a team plays in a given week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// Home game (bit `0`).
    Home,
    /// Away game (bit `1`).
    Away,
}

impl Venue {
    /// The other venue.
    pub fn flip(self) -> Self {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }

    /// `0` for home, `1` for away.
    pub fn bit(self) -> u8 {
        match self {
            Venue::Home => 0,
            Venue::Away => 1,
        }
    }

    /// Any non-zero bit is away.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Venue::Home
        } else {
            Venue::Away
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

/// Converts a bit slice (`0` home, `1` away) into venues.
pub fn from_bits(bits: &[u8]) -> Vec<Venue> {
    bits.iter().copied().map(Venue::from_bit).collect()
}

/// Returns the sequence with every venue flipped.
pub fn complement(seq: &[Venue]) -> Vec<Venue> {
    seq.iter().map(|v| v.flip()).collect()
}

/// Full season sequence: the half followed by its complement.
pub fn full_sequence(half: &[Venue]) -> Vec<Venue> {
    let mut full = Vec::with_capacity(half.len() * 2);
    full.extend_from_slice(half);
    full.extend(half.iter().map(|v| v.flip()));
    full
}

/// Checks the run-length rule.
///
/// Fails if any window of `max_consecutive + 1` weeks holds a single venue.
/// Sequences shorter than the window are valid.
pub fn is_valid(seq: &[Venue], max_consecutive: usize) -> bool {
    let window = max_consecutive + 1;
    if seq.len() < window {
        return true;
    }
    seq.windows(window).all(|w| w.iter().any(|v| *v != w[0]))
}

/// Longest run of `venue` in `seq`.
pub fn longest_run(seq: &[Venue], venue: Venue) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &v in seq {
        if v == venue {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Draws a random first half whose full sequence is valid.
///
/// Uniform rejection sampling, bounded by `max_attempts`.
///
/// # Errors
/// [`TournamentError::GenerationExhausted`] when no draw is accepted, which
/// happens for degenerate settings such as `max_consecutive = 0`.
pub fn random_first_half<R: Rng>(
    weeks: usize,
    max_consecutive: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<Venue>> {
    for _ in 0..max_attempts {
        let half: Vec<Venue> = (0..weeks)
            .map(|_| {
                if rng.random_bool(0.5) {
                    Venue::Away
                } else {
                    Venue::Home
                }
            })
            .collect();
        if is_valid(&full_sequence(&half), max_consecutive) {
            return Ok(half);
        }
    }
    Err(TournamentError::GenerationExhausted {
        weeks,
        attempts: max_attempts,
    })
}
