// src/sampling/period.rs

//! Task period sampling.
//!
//! A population is either a discrete set of candidate periods or an
//! inclusive integer range. The mode is always explicit in
//! [`PeriodPopulation`]; [`PeriodPopulation::from_legacy`] reproduces the
//! older "two values means a range" convention for configs that do not say
//! which one they mean.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{DaggenError, Result};
use crate::types::PeriodMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodPopulation {
    /// Uniform choice, with replacement, among these values.
    Choices(Vec<u64>),
    /// Uniform integer in `[min, max]`.
    Range { min: u64, max: u64 },
}

impl PeriodPopulation {
    /// Interpret `values` under an explicit mode.
    ///
    /// `Range` requires exactly two values.
    pub fn with_mode(values: &[u64], mode: PeriodMode) -> Result<Self> {
        let population = match mode {
            PeriodMode::Choices => PeriodPopulation::Choices(values.to_vec()),
            PeriodMode::Range => match values {
                [min, max] => PeriodPopulation::Range {
                    min: *min,
                    max: *max,
                },
                _ => {
                    return Err(DaggenError::invalid(
                        "periods",
                        format!(
                            "range mode needs exactly two values [min, max] (got {})",
                            values.len()
                        ),
                    ));
                }
            },
        };
        population.validate()?;
        Ok(population)
    }

    /// Arity-based interpretation: **exactly two values are read as an
    /// inclusive range**, anything else as a discrete set.
    ///
    /// `[100, 200]` therefore samples every integer between 100 and 200, not
    /// just the two endpoints. Prefer [`PeriodPopulation::with_mode`].
    pub fn from_legacy(values: &[u64]) -> Result<Self> {
        let mode = if values.len() == 2 {
            PeriodMode::Range
        } else {
            PeriodMode::Choices
        };
        Self::with_mode(values, mode)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            PeriodPopulation::Choices(values) => {
                if values.is_empty() {
                    return Err(DaggenError::invalid(
                        "periods",
                        "population must not be empty",
                    ));
                }
                if values.contains(&0) {
                    return Err(DaggenError::invalid("periods", "periods must be > 0"));
                }
            }
            PeriodPopulation::Range { min, max } => {
                if *min == 0 {
                    return Err(DaggenError::invalid("periods", "periods must be > 0"));
                }
                if min > max {
                    return Err(DaggenError::invalid(
                        "periods",
                        format!("range minimum {min} exceeds maximum {max}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Draw `n` independent periods. One random draw per period.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<u64>> {
        self.validate()?;

        let periods = match self {
            PeriodPopulation::Choices(values) => (0..n)
                .map(|_| {
                    values
                        .choose(rng)
                        .copied()
                        .ok_or_else(|| DaggenError::invalid("periods", "population is empty"))
                })
                .collect::<Result<Vec<_>>>()?,
            PeriodPopulation::Range { min, max } => {
                (0..n).map(|_| rng.gen_range(*min..=*max)).collect()
            }
        };

        Ok(periods)
    }
}

/// Convenience wrapper around [`PeriodPopulation::sample`].
pub fn sample_periods<R: Rng + ?Sized>(
    rng: &mut R,
    population: &PeriodPopulation,
    n: usize,
) -> Result<Vec<u64>> {
    population.sample(rng, n)
}
