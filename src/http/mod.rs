//! HTTP client, the per-iteration check, and the virtual-user driver.
mod client;
mod fetcher;
mod iteration;
mod virtual_user;


pub use client::build_client;
pub use fetcher::{Fetcher, ReqwestFetcher};
pub use iteration::{IterationContext, run_iteration};
pub use virtual_user::{VirtualUserConfig, VirtualUserContext, setup_virtual_users};

#[cfg(test)]
pub(crate) use fetcher::FetchOutcome;
#[cfg(test)]
pub(crate) use virtual_user::run_virtual_user;
