// src/sampling/utilization.rs

//! Fixed-sum utilization vectors with a per-task ceiling.
//!
//! Both samplers share one contract: `sets` vectors of length `tasks`, every
//! element in `[0, ulimit]`, every vector summing to `total`.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::errors::{DaggenError, Result};
use crate::types::UtilizationAlgorithm;

/// Default number of UUniFast vectors drawn before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Parameters of one utilization split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilizationSplit {
    /// Number of tasks `n`.
    pub tasks: usize,
    /// Target total utilization `u`.
    pub total: f64,
    /// Number of independent vectors to produce.
    pub sets: usize,
    /// Per-task ceiling.
    pub ulimit: f64,
}

impl UtilizationSplit {
    /// One set, ceiling of 1.
    pub fn new(tasks: usize, total: f64) -> Self {
        Self {
            tasks,
            total,
            sets: 1,
            ulimit: 1.0,
        }
    }

    pub fn with_sets(mut self, sets: usize) -> Self {
        self.sets = sets;
        self
    }

    pub fn with_ulimit(mut self, ulimit: f64) -> Self {
        self.ulimit = ulimit;
        self
    }

    /// Argument checks shared by every sampler. Infeasibility is detected
    /// here, before any sampling loop is entered.
    pub fn validate(&self) -> Result<()> {
        if self.tasks < 1 {
            return Err(DaggenError::invalid("n", "task count must be >= 1 (got 0)"));
        }
        if !self.total.is_finite() || self.total <= 0.0 {
            return Err(DaggenError::invalid(
                "u",
                format!("total utilization must be > 0 (got {})", self.total),
            ));
        }
        if self.sets < 1 {
            return Err(DaggenError::invalid("nsets", "set count must be >= 1 (got 0)"));
        }
        if !self.ulimit.is_finite() || self.ulimit <= 0.0 {
            return Err(DaggenError::invalid(
                "ulimit",
                format!("per-task ceiling must be > 0 (got {})", self.ulimit),
            ));
        }
        // Relative slack so `u == n * ulimit` survives rounding in the product.
        let capacity = self.tasks as f64 * self.ulimit;
        if self.total > capacity * (1.0 + f64::EPSILON * self.tasks as f64) {
            return Err(DaggenError::InfeasibleRequest(format!(
                "total utilization {} exceeds {} tasks x ceiling {} = {}",
                self.total, self.tasks, self.ulimit, capacity
            )));
        }
        Ok(())
    }
}

/// Dispatch to the selected algorithm.
///
/// `max_attempts` only applies to [`UtilizationAlgorithm::UUniFastDiscard`].
pub fn split_utilization<R: Rng + ?Sized>(
    rng: &mut R,
    algorithm: UtilizationAlgorithm,
    split: &UtilizationSplit,
    max_attempts: usize,
) -> Result<Vec<Vec<f64>>> {
    match algorithm {
        UtilizationAlgorithm::UUniFastDiscard => uunifast_discard(rng, split, max_attempts),
        UtilizationAlgorithm::Drs => drs(rng, split),
    }
}

/// Plain UUniFast: `n` non-negative values summing to `u`, no ceiling.
///
/// Draws exactly `n - 1` uniform variates.
pub fn uunifast<R: Rng + ?Sized>(rng: &mut R, n: usize, u: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let mut utilizations = Vec::with_capacity(n);
    let mut sum_u = u;
    for i in 1..n {
        let r: f64 = rng.r#gen();
        let next_sum_u = sum_u * r.powf(1.0 / (n - i) as f64);
        utilizations.push(sum_u - next_sum_u);
        sum_u = next_sum_u;
    }
    utilizations.push(sum_u);
    utilizations
}

/// UUniFast-discard: redraw whole vectors until `sets` of them respect the
/// ceiling.
///
/// At most `max_attempts` vectors are drawn in total; running out yields
/// [`DaggenError::InfeasibleRequest`]. This bounds the loop for requests
/// close to `u == n * ulimit`, where acceptance becomes vanishingly rare.
pub fn uunifast_discard<R: Rng + ?Sized>(
    rng: &mut R,
    split: &UtilizationSplit,
    max_attempts: usize,
) -> Result<Vec<Vec<f64>>> {
    split.validate()?;
    if max_attempts < 1 {
        return Err(DaggenError::invalid(
            "max_attempts",
            "retry ceiling must be >= 1 (got 0)",
        ));
    }

    let mut sets = Vec::with_capacity(split.sets);
    let mut attempts = 0usize;

    while sets.len() < split.sets {
        if attempts == max_attempts {
            return Err(DaggenError::InfeasibleRequest(format!(
                "UUniFast-discard accepted {} of {} sets after {} attempts \
                 (n = {}, u = {}, ulimit = {})",
                sets.len(),
                split.sets,
                attempts,
                split.tasks,
                split.total,
                split.ulimit
            )));
        }
        attempts += 1;

        let candidate = uunifast(rng, split.tasks, split.total);
        if candidate.iter().all(|&u| u <= split.ulimit) {
            sets.push(candidate);
        } else {
            trace!(attempt = attempts, "discarded utilization vector above ceiling");
        }
    }

    Ok(sets)
}

/// Fixed-sum sampler over `[0, ulimit]^n` (Stafford's RandFixedSum).
///
/// Samples uniformly from the slice of the hypercube where the elements sum
/// to `total`, then shuffles the coordinates. No rejection: the number of
/// draws per vector is fixed at `2 (n - 1)` uniforms plus one shuffle.
pub fn drs<R: Rng + ?Sized>(rng: &mut R, split: &UtilizationSplit) -> Result<Vec<Vec<f64>>> {
    split.validate()?;

    let n = split.tasks;
    let s = split.total / split.ulimit;
    let table = TransitionTable::build(n, s);

    let mut sets = Vec::with_capacity(split.sets);
    for _ in 0..split.sets {
        let mut unit = table.sample(rng);
        unit.shuffle(rng);

        let scaled: Vec<f64> = unit
            .into_iter()
            .map(|x| (x * split.ulimit).clamp(0.0, split.ulimit))
            .collect();
        sets.push(scaled);
    }

    Ok(sets)
}

/// Precomputed transition probabilities for sampling `n` unit-interval values
/// with sum `s`. Depends only on `(n, s)`, so it is built once per call.
struct TransitionTable {
    n: usize,
    /// Clamped sum in `[k, k + 1]`.
    s: f64,
    /// `floor(s)`, clamped to `[0, n - 1]`.
    k: usize,
    /// `t[i][j]`, 1-based in both indices; row 0 and column 0 are unused.
    t: Vec<Vec<f64>>,
}

impl TransitionTable {
    fn build(n: usize, s: f64) -> Self {
        let k = (s.floor().max(0.0) as usize).min(n - 1);
        let s = s.clamp(k as f64, (k + 1) as f64);

        // s1[i] = s - k + i - 1, s2[i] = k + n - i + 1 - s (1-based).
        let s1: Vec<f64> = (0..=n).map(|i| s - k as f64 + i as f64 - 1.0).collect();
        let s2: Vec<f64> = (0..=n)
            .map(|i| (k + n) as f64 - i as f64 + 1.0 - s)
            .collect();

        let tiny = f64::MIN_POSITIVE;
        let mut w = vec![vec![0.0f64; n + 2]; n + 1];
        w[1][2] = f64::MAX;
        let mut t = vec![vec![0.0f64; n + 1]; n.max(1)];

        for i in 2..=n {
            let fi = i as f64;
            for c in 1..=i {
                let tmp1 = w[i - 1][c + 1] * s1[c] / fi;
                let tmp2 = w[i - 1][c] * s2[n - i + c] / fi;
                w[i][c + 1] = tmp1 + tmp2;
                let tmp3 = w[i][c + 1] + tiny;
                t[i - 1][c] = if s2[n - i + c] > s1[c] {
                    tmp2 / tmp3
                } else {
                    1.0 - tmp1 / tmp3
                };
            }
        }

        Self { n, s, k, t }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let n = self.n;
        let mut x = vec![0.0f64; n];
        let mut s = self.s;
        let mut j = self.k + 1;
        let mut sm = 0.0f64;
        let mut pr = 1.0f64;

        for i in (1..n).rev() {
            let rt: f64 = rng.r#gen();
            let rs: f64 = rng.r#gen();
            let threshold = self.t[i].get(j).copied().unwrap_or(0.0);
            let e = if rt <= threshold { 1.0 } else { 0.0 };
            let sx = rs.powf(1.0 / i as f64);
            sm += (1.0 - sx) * pr * s / (i + 1) as f64;
            pr *= sx;
            x[n - i - 1] = sm + pr * e;
            s -= e;
            if e > 0.0 {
                j = j.saturating_sub(1);
            }
        }
        x[n - 1] = sm + pr * s;
        x
    }
}
