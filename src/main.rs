mod app;
mod args;
mod config;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod report;
mod shutdown;
mod slo;
mod targets;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
