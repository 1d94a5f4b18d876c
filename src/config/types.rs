use std::time::Duration;

use serde::Deserialize;

use crate::args::BasisPoints;
use crate::args::parsers::{duration_from_str, positive_duration};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "targets")]
    pub urls: Option<Vec<String>>,
    #[serde(alias = "urls_csv")]
    pub urls_file: Option<String>,
    #[serde(alias = "concurrency")]
    pub vus: Option<usize>,
    pub duration: Option<DurationValue>,
    pub sleep: Option<DurationValue>,
    pub iterations: Option<u64>,
    pub ramp_up: Option<DurationValue>,
    pub seed: Option<u64>,
    #[serde(alias = "status")]
    pub expected_status: Option<u16>,
    pub timeout: Option<DurationValue>,
    pub redirect: Option<u32>,
    pub insecure: Option<bool>,
    pub export_csv: Option<String>,
    pub export_json: Option<String>,
    pub report: Option<String>,
    pub metrics_max: Option<usize>,
    pub progress_interval: Option<DurationValue>,
    pub summary: Option<bool>,
    pub no_color: Option<bool>,
    pub slo: Option<SloConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SloConfig {
    pub p95_ms: Option<u64>,
    /// Percent with at most two decimal places.
    #[serde(alias = "error_rate_pct")]
    pub error_pct: Option<PercentValue>,
    pub enforce: Option<bool>,
}

/// Duration given either as plain seconds or as text with a unit (`"2m"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => positive_duration(text),
        }
    }

    pub(crate) fn to_pause(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => duration_from_str(text),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PercentValue {
    Number(f64),
    Text(String),
}

impl PercentValue {
    pub(crate) fn to_basis_points(&self) -> Result<BasisPoints, ValidationError> {
        match self {
            PercentValue::Number(value) => value.to_string().parse(),
            PercentValue::Text(text) => text.parse(),
        }
    }
}
