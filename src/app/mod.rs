mod finalize;
mod runner;

#[cfg(test)]
mod tests;

pub(crate) use runner::run_local;
#[cfg(test)]
pub(crate) use runner::{RunOutcome, run_with_fetcher};
