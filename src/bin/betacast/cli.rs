use clap::Parser;
/// Daily beta-binomial update of the belief about an infection rate.
#[derive(Parser, Debug)]
#[command(name = "betacast", version, about = "Bayesian infection rate estimate from daily case counts")]
pub struct Cli {
    #[arg(
        long,
        default_value = "2",
        help = "Initial α, prior belief in positive cases"
    )]
    pub alpha: f64,

    #[arg(
        long,
        default_value = "18",
        help = "Initial β, prior belief in negative cases"
    )]
    pub beta: f64,

    #[arg(
        long,
        default_value = "5000",
        help = "Population size used to scale the expected number of cases"
    )]
    pub population: u64,

    #[arg(
        long,
        default_value = "100",
        allow_hyphen_values = true,
        help = "Number of people tested per day"
    )]
    pub tested_per_day: i64,

    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [2, 5, 4, 3, 6, 5, 7],
        allow_hyphen_values = true,
        help = "Positive cases per day, comma separated"
    )]
    pub cases: Vec<i64>,

    #[arg(
        long,
        value_name = "OBSERVATIONS",
        help = "Tab separated file with `count` and `trials` columns, one row per day. Replaces --cases and --tested-per-day"
    )]
    pub observations: Option<String>,

    #[arg(long, default_value = "0.95", help = "Credible interval level")]
    pub confidence: f64,

    #[arg(
        long,
        default_value = "200",
        help = "Number of points the densities are sampled at"
    )]
    pub grid_points: usize,

    #[arg(
        long,
        short,
        default_value = "betacast",
        value_name = "OUT",
        help = "Output directory"
    )]
    pub out: String,

    #[arg(
        value_enum,
        long,
        default_value = "normal",
        value_name = "VERBOSITY",
        help = "Verbosity level"
    )]
    pub verbosity: LogLevel,
}

#[derive(Debug, clap::ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Normal,
    Silent,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "verbose"),
            LogLevel::Normal => write!(f, "normal"),
            LogLevel::Silent => write!(f, "silent"),
        }
    }
}
