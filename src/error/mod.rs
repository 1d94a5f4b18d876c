mod app;
mod config;
mod http;
mod metrics;
mod report;
mod targets;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use metrics::MetricsError;
pub use report::ReportError;
pub use targets::TargetError;
pub use validation::ValidationError;
