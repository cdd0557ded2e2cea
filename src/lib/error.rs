use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeliefError {
    #[error("Invalid shape parameters: α = {alpha}, β = {beta}. Both must be positive and finite")]
    InvalidParameter { alpha: f64, beta: f64 },
    #[error("Invalid observation{}: {count} positive cases out of {trials} tests", on_day(.day))]
    InvalidObservation {
        day: Option<usize>,
        count: i128,
        trials: i128,
    },
    #[error("Value {value} lies outside of {domain}")]
    Domain { value: f64, domain: &'static str },
}

impl BeliefError {
    /// Attach the 1-based day an invalid observation belongs to.
    pub fn at_day(self, day: usize) -> Self {
        match self {
            BeliefError::InvalidObservation { count, trials, .. } => {
                BeliefError::InvalidObservation {
                    day: Some(day),
                    count,
                    trials,
                }
            }
            other => other,
        }
    }
}

fn on_day(day: &Option<usize>) -> String {
    match day {
        Some(day) => format!(" on day {}", day),
        None => String::new(),
    }
}
