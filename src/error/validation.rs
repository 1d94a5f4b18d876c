use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid percentage '{value}'. Use at most two decimal places, like 1, 0.5 or 0.01%.")]
    InvalidPercent { value: String },
    #[error("Percentage '{value}' must be between 0 and 100.")]
    PercentOutOfRange { value: String },
    #[error("No target URLs (set --url, --urls-file, or provide urls in config).")]
    MissingTargets,
    #[error("SLO validation failed: {reasons}")]
    SloFailed { reasons: String },
    #[cfg(test)]
    #[error("{message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("{message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
