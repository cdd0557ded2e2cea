use crate::belief::PriorBelief;
use crate::error::BeliefError;
use crate::observation::Observation;
use log::{debug, info};
use serde::Serialize;

pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Belief snapshots in chronological order. Index 0 holds the initial prior,
/// index `i` the belief after the i-th observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefSequence {
    snapshots: Vec<PriorBelief>,
}

impl BeliefSequence {
    pub fn initial(&self) -> &PriorBelief {
        &self.snapshots[0]
    }

    pub fn last(&self) -> &PriorBelief {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn get(&self, day: usize) -> Option<&PriorBelief> {
        self.snapshots.get(day)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Number of observed days, excluding the prior
    pub fn days(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriorBelief> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a BeliefSequence {
    type Item = &'a PriorBelief;
    type IntoIter = std::slice::Iter<'a, PriorBelief>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistic {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
}

impl SummaryStatistic {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Fold the observations over `initial`, keeping every intermediate belief.
pub fn run_sequence(initial: PriorBelief, observations: &[Observation]) -> BeliefSequence {
    let mut snapshots = Vec::with_capacity(observations.len() + 1);
    snapshots.push(initial);
    let last = observations.iter().fold(initial, |belief, observation| {
        let next = belief.observe(observation);
        snapshots.push(next);
        next
    });
    info!(
        "Processed {} observations: α = {:.1}, β = {:.1}",
        observations.len(),
        last.alpha(),
        last.beta()
    );
    BeliefSequence { snapshots }
}

/// Same as [`run_sequence`] for raw `(count, trials)` pairs.
///
/// Every pair is checked before the first update. An invalid pair rejects
/// the whole run and the error carries its 1-based day.
pub fn run_counts(
    initial: PriorBelief,
    pairs: &[(u64, u64)],
) -> Result<BeliefSequence, BeliefError> {
    let observations = pairs
        .iter()
        .enumerate()
        .map(|(i, &(count, trials))| {
            Observation::new(count, trials).map_err(|e| e.at_day(i + 1))
        })
        .collect::<Result<Vec<_>, BeliefError>>()?;
    Ok(run_sequence(initial, &observations))
}

/// Mean and equal-tailed credible interval of `belief`.
pub fn summarize(belief: &PriorBelief, confidence: f64) -> Result<SummaryStatistic, BeliefError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(BeliefError::Domain {
            value: confidence,
            domain: "confidence levels (0, 1)",
        });
    }
    let tail = (1.0 - confidence) / 2.0;
    let lower = belief.quantile(tail)?;
    let upper = belief.quantile(1.0 - tail)?;
    debug!(
        "Summary of Beta({:.1}, {:.1}): mean = {:.5}, {:.0}% interval [{:.5}, {:.5}]",
        belief.alpha(),
        belief.beta(),
        belief.mean(),
        confidence * 100.0,
        lower,
        upper
    );
    Ok(SummaryStatistic {
        mean: belief.mean(),
        lower,
        upper,
        confidence,
    })
}

pub fn summarize_sequence(
    sequence: &BeliefSequence,
    confidence: f64,
) -> Result<Vec<SummaryStatistic>, BeliefError> {
    sequence
        .iter()
        .map(|belief| summarize(belief, confidence))
        .collect()
}

/// Beta density of `belief` at each sample point
pub fn density_curve(belief: &PriorBelief, sample_points: &[f64]) -> Result<Vec<f64>, BeliefError> {
    sample_points
        .iter()
        .map(|&x| {
            if !(0.0..=1.0).contains(&x) {
                return Err(BeliefError::Domain {
                    value: x,
                    domain: "the support [0, 1]",
                });
            }
            Ok(belief.pdf(x))
        })
        .collect()
}

/// `n` evenly spaced points from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
