use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

/// What a single GET produced. `status` is `None` when no response arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub status: Option<u16>,
    pub timed_out: bool,
    pub transport_error: bool,
    pub response_bytes: u64,
}

impl FetchOutcome {
    fn from_error(err: &reqwest::Error, status: Option<u16>) -> Self {
        let timed_out = err.is_timeout();
        Self {
            status,
            timed_out,
            transport_error: !timed_out,
            response_bytes: 0,
        }
    }
}

/// Issues one GET per call. Failures are folded into the outcome.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> FetchOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("GET {} failed: {}", url, err);
                return FetchOutcome::from_error(&err, None);
            }
        };

        let status = response.status().as_u16();
        match drain_response_body(response).await {
            Ok(response_bytes) => FetchOutcome {
                status: Some(status),
                timed_out: false,
                transport_error: false,
                response_bytes,
            },
            Err(err) => {
                debug!("Reading body of {} failed: {}", url, err);
                FetchOutcome::from_error(&err, Some(status))
            }
        }
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
