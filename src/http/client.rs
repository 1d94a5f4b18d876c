use reqwest::{Client, redirect};
use tracing::debug;

use crate::{
    args::{DEFAULT_USER_AGENT, RunArgs},
    error::{AppError, AppResult, HttpError},
};

/// Build the shared client. No request timeout is set unless `--timeout` is
/// given, so slow responses are measured rather than cut off.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialized.
pub fn build_client(args: &RunArgs) -> AppResult<Client> {
    let mut client_builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

    if let Some(timeout) = args.request_timeout {
        client_builder = client_builder.timeout(timeout);
    }

    if args.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(args.redirect_limit).unwrap_or(10),
        ));
    }

    if args.insecure {
        debug!("TLS certificate and hostname verification disabled.");
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
