use anyhow::{Context, Result};
use betacast_utils::error::BeliefError;
use betacast_utils::forecast::{Forecast, expected_cases};
use betacast_utils::observation::Observation;
use csv::{ReaderBuilder, Writer, WriterBuilder};
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TrendFields {
    #[strum(to_string = "day")]
    Day,
    #[strum(to_string = "alpha")]
    Alpha,
    #[strum(to_string = "beta")]
    Beta,
    #[strum(to_string = "mean")]
    Mean,
    #[strum(to_string = "lower")]
    Lower,
    #[strum(to_string = "upper")]
    Upper,
    #[strum(to_string = "sd")]
    Sd,
    #[strum(to_string = "mode")]
    Mode,
    #[strum(to_string = "pseudo_count")]
    PseudoCount,
    #[strum(to_string = "expected_cases")]
    ExpectedCases,
}

impl TrendFields {
    pub fn all_as_string() -> Vec<String> {
        TrendFields::iter().map(|f| f.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum DensityFields {
    #[strum(to_string = "day")]
    Day,
    #[strum(to_string = "x")]
    X,
    #[strum(to_string = "density")]
    Density,
}

impl DensityFields {
    pub fn all_as_string() -> Vec<String> {
        DensityFields::iter().map(|f| f.to_string()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    count: i64,
    trials: i64,
}

/// Read daily observations from a tab separated file with a header row.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = File::open(path)
        .with_context(|| format!("Could not open observations file: {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut observations = Vec::new();
    for (i, row) in reader.deserialize::<ObservationRow>().enumerate() {
        let day = i + 1;
        let row = row.with_context(|| format!("Could not parse observation on day {}", day))?;
        let observation = Observation::from_signed(row.count, row.trials)
            .map_err(|e: BeliefError| e.at_day(day))?;
        observations.push(observation);
    }
    info!("Loaded {} daily observations", observations.len());
    Ok(observations)
}

fn tsv_writer(path: &Path) -> Result<Writer<File>> {
    let file = File::create(path)
        .with_context(|| format!("Could not create output file: {}", path.display()))?;
    Ok(WriterBuilder::new().delimiter(b'\t').from_writer(file))
}

/// Per-day mean and credible interval, one row per day including the prior.
pub fn write_trend(path: &Path, forecast: &Forecast) -> Result<()> {
    let mut writer = tsv_writer(path)?;
    writer.write_record(TrendFields::all_as_string())?;
    for day in &forecast.days {
        writer.write_record(&[
            day.day.to_string(),
            day.belief.alpha().to_string(),
            day.belief.beta().to_string(),
            day.summary.mean.to_string(),
            day.summary.lower.to_string(),
            day.summary.upper.to_string(),
            day.belief.standard_deviation().to_string(),
            day.belief.mode().map(|m| m.to_string()).unwrap_or_default(),
            day.belief.pseudo_count().to_string(),
            expected_cases(day.summary.mean, forecast.population).to_string(),
        ])?;
    }
    writer.flush()?;
    debug!("Wrote {} trend rows to {}", forecast.days.len(), path.display());
    Ok(())
}

/// Long format density table, `grid` rows per day.
pub fn write_density(path: &Path, forecast: &Forecast) -> Result<()> {
    let mut writer = tsv_writer(path)?;
    writer.write_record(DensityFields::all_as_string())?;
    for day in &forecast.days {
        for (x, density) in forecast.grid.iter().zip(day.density.iter()) {
            writer.write_record(&[day.day.to_string(), x.to_string(), density.to_string()])?;
        }
    }
    writer.flush()?;
    debug!("Wrote density curves to {}", path.display());
    Ok(())
}

pub fn write_json(path: &Path, forecast: &Forecast) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Could not create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, forecast)?;
    debug!("Wrote forecast to {}", path.display());
    Ok(())
}
