use crate::belief::PriorBelief;
use crate::error::BeliefError;
use crate::forecast::{DEFAULT_GRID_POINTS, Forecast, ForecastRequest};
use crate::observation::Observation;
use crate::tracker::DEFAULT_CONFIDENCE;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl From<BeliefError> for PyErr {
    fn from(err: BeliefError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pymodule]
fn betacast_utils(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run_forecast, m)?)?;
    Ok(())
}

/// Run the daily beta-binomial update and return column-wise results.
///
/// `counts[i]` positives out of `trials[i]` tests on day i + 1.
#[pyfunction]
#[pyo3(signature = (alpha, beta, population, counts, trials, confidence=DEFAULT_CONFIDENCE, grid_points=DEFAULT_GRID_POINTS))]
pub fn run_forecast(
    py: Python<'_>,
    alpha: f64,
    beta: f64,
    population: u64,
    counts: Vec<i64>,
    trials: Vec<i64>,
    confidence: f64,
    grid_points: usize,
) -> PyResult<Py<PyDict>> {
    if counts.len() != trials.len() {
        return Err(PyValueError::new_err(format!(
            "Got {} daily counts but {} daily trial sizes",
            counts.len(),
            trials.len()
        )));
    }
    let prior = PriorBelief::new(alpha, beta)?;
    let observations = counts
        .iter()
        .zip(trials.iter())
        .enumerate()
        .map(|(i, (&count, &trials))| {
            Observation::from_signed(count, trials).map_err(|e| e.at_day(i + 1))
        })
        .collect::<Result<Vec<_>, BeliefError>>()?;
    let request = ForecastRequest::new(prior, population, observations)
        .confidence(confidence)
        .grid_points(grid_points);
    let forecast = Forecast::compute(&request)?;

    let days = &forecast.days;
    let dict = PyDict::new(py);
    dict.set_item("day", days.iter().map(|d| d.day).collect::<Vec<_>>())?;
    dict.set_item("alpha", days.iter().map(|d| d.belief.alpha()).collect::<Vec<_>>())?;
    dict.set_item("beta", days.iter().map(|d| d.belief.beta()).collect::<Vec<_>>())?;
    dict.set_item("mean", days.iter().map(|d| d.summary.mean).collect::<Vec<_>>())?;
    dict.set_item(
        "sd",
        days.iter().map(|d| d.belief.standard_deviation()).collect::<Vec<_>>(),
    )?;
    dict.set_item("mode", days.iter().map(|d| d.belief.mode()).collect::<Vec<_>>())?;
    dict.set_item("lower", days.iter().map(|d| d.summary.lower).collect::<Vec<_>>())?;
    dict.set_item("upper", days.iter().map(|d| d.summary.upper).collect::<Vec<_>>())?;
    dict.set_item("grid", forecast.grid.clone())?;
    dict.set_item("density", days.iter().map(|d| d.density.clone()).collect::<Vec<_>>())?;
    dict.set_item("population", forecast.population)?;
    dict.set_item("expected_cases", forecast.expected_cases)?;

    Ok(dict.into())
}
