use crate::cli::Cli;
use crate::io;
use anyhow::Result;
use betacast_utils::belief::PriorBelief;
use betacast_utils::forecast::{Forecast, ForecastRequest};
use betacast_utils::observation::Observation;
use itertools::Itertools;
use log::{debug, info};
use std::path::Path;

/// Build the forecast request from the command line, validating every input
/// before anything is written.
pub fn build_request(args: &Cli) -> Result<ForecastRequest> {
    let prior = PriorBelief::new(args.alpha, args.beta)?;
    let observations = match &args.observations {
        Some(path) => {
            info!("Loading observations from: {}", path);
            io::load_observations(Path::new(path))?
        }
        None => Observation::with_constant_trials(&args.cases, args.tested_per_day)?,
    };
    debug!(
        "Observations (positive/tested): {}",
        observations
            .iter()
            .map(|o| format!("{}/{}", o.count(), o.trials()))
            .join(", ")
    );
    Ok(ForecastRequest::new(prior, args.population, observations)
        .confidence(args.confidence)
        .grid_points(args.grid_points))
}

pub fn betacast(request: &ForecastRequest, outdir: &Path) -> Result<Forecast> {
    info!(
        "Prior: α = {}, β = {}, {} days of observations",
        request.prior.alpha(),
        request.prior.beta(),
        request.observations.len()
    );
    let forecast = Forecast::compute(request)?;

    io::write_trend(&outdir.join("trend.tsv"), &forecast)?;
    io::write_density(&outdir.join("density.tsv"), &forecast)?;
    io::write_json(&outdir.join("forecast.json"), &forecast)?;

    let last = forecast.final_day();
    info!("Infection rate after {} days", last.day);
    info!("Posterior mean: {:.4}", last.summary.mean);
    info!(
        "{:.0}% credible interval: [{:.4}, {:.4}]",
        last.summary.confidence * 100.0,
        last.summary.lower,
        last.summary.upper
    );
    info!(
        "Expected cases: {} / {}",
        forecast.expected_cases, forecast.population
    );
    Ok(forecast)
}
