use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Histogram error during {context}: {source}")]
    Histogram {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
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
