use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid analytics parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid calendar period: year {year}, month {month}")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("Configuration error: {0}")]
    Config(#[from] configuration::ConfigError),
}
