use crate::belief::PriorBelief;
use crate::error::BeliefError;
use crate::observation::Observation;
use crate::tracker::{self, BeliefSequence, SummaryStatistic, DEFAULT_CONFIDENCE};
use log::info;
use serde::Serialize;

pub const DEFAULT_GRID_POINTS: usize = 200;

/// Inputs of one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub prior: PriorBelief,
    /// Only scales the final mean into an expected case count.
    pub population: u64,
    pub observations: Vec<Observation>,
    pub confidence: f64,
    pub grid_points: usize,
}

impl ForecastRequest {
    pub fn new(prior: PriorBelief, population: u64, observations: Vec<Observation>) -> Self {
        Self {
            prior,
            population,
            observations,
            confidence: DEFAULT_CONFIDENCE,
            grid_points: DEFAULT_GRID_POINTS,
        }
    }

    pub fn with_constant_trials(
        prior: PriorBelief,
        population: u64,
        counts: &[i64],
        trials: i64,
    ) -> Result<Self, BeliefError> {
        let observations = Observation::with_constant_trials(counts, trials)?;
        Ok(Self::new(prior, population, observations))
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayForecast {
    pub day: usize,
    pub belief: PriorBelief,
    pub summary: SummaryStatistic,
    pub density: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub population: u64,
    pub grid: Vec<f64>,
    pub days: Vec<DayForecast>,
    pub expected_cases: u64,
    #[serde(skip)]
    pub sequence: BeliefSequence,
}

impl Forecast {
    pub fn compute(request: &ForecastRequest) -> Result<Self, BeliefError> {
        let sequence = tracker::run_sequence(request.prior, &request.observations);
        let summaries = tracker::summarize_sequence(&sequence, request.confidence)?;
        let grid = tracker::linspace(0.0, 1.0, request.grid_points);

        let days = sequence
            .iter()
            .zip(summaries)
            .enumerate()
            .map(|(day, (belief, summary))| {
                Ok(DayForecast {
                    day,
                    belief: *belief,
                    summary,
                    density: tracker::density_curve(belief, &grid)?,
                })
            })
            .collect::<Result<Vec<_>, BeliefError>>()?;

        let final_mean = sequence.last().mean();
        let expected_cases = expected_cases(final_mean, request.population);
        info!(
            "Expected cases after {} days: {} / {}",
            sequence.days(),
            expected_cases,
            request.population
        );
        Ok(Self {
            population: request.population,
            grid,
            days,
            expected_cases,
            sequence,
        })
    }

    pub fn final_day(&self) -> &DayForecast {
        &self.days[self.days.len() - 1]
    }
}

/// Rate times population, rounded down
pub fn expected_cases(mean: f64, population: u64) -> u64 {
    (mean * population as f64).floor() as u64
}
