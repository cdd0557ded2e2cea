use crate::error::BeliefError;
use serde::{Deserialize, Serialize};

/// Positive test results out of the tests performed on one day, with
/// `count <= trials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignedObservation")]
pub struct Observation {
    count: u64,
    trials: u64,
}

#[derive(Deserialize)]
struct SignedObservation {
    count: i64,
    trials: i64,
}

impl TryFrom<SignedObservation> for Observation {
    type Error = BeliefError;

    fn try_from(raw: SignedObservation) -> Result<Self, Self::Error> {
        Observation::from_signed(raw.count, raw.trials)
    }
}

impl Observation {
    pub fn new(count: u64, trials: u64) -> Result<Self, BeliefError> {
        if count > trials {
            return Err(BeliefError::InvalidObservation {
                day: None,
                count: i128::from(count),
                trials: i128::from(trials),
            });
        }
        Ok(Self { count, trials })
    }

    /// Build an observation from signed input, rejecting negative values
    /// instead of letting them wrap.
    pub fn from_signed(count: i64, trials: i64) -> Result<Self, BeliefError> {
        match (u64::try_from(count), u64::try_from(trials)) {
            (Ok(count), Ok(trials)) => Self::new(count, trials),
            _ => Err(BeliefError::InvalidObservation {
                day: None,
                count: i128::from(count),
                trials: i128::from(trials),
            }),
        }
    }

    /// Same number of tests on every day.
    pub fn with_constant_trials(counts: &[i64], trials: i64) -> Result<Vec<Self>, BeliefError> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Self::from_signed(count, trials).map_err(|e| e.at_day(i + 1)))
            .collect()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn negatives(&self) -> u64 {
        self.trials - self.count
    }
}
