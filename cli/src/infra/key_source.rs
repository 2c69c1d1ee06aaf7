//! Key server client. Implements `KeySource` over blocking `ureq`.

use std::io::ErrorKind;
use std::time::Duration;

use crate::application::ports::KeySource;
use crate::domain::config::redact;
use crate::domain::{FetchError, KeyPayload};

/// Bound on the whole round trip.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// `GET {server}/api/authorized-keys/group/{group}?key=...` with `X-API-Key`.
pub struct HttpKeySource {
    timeout: Duration,
}

impl HttpKeySource {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpKeySource {
    fn default() -> Self {
        Self::new(FETCH_TIMEOUT)
    }
}

/// Request URL without the query string.
#[must_use]
pub fn group_url(server: &str, group: &str) -> String {
    format!(
        "{}/api/authorized-keys/group/{group}",
        server.trim_end_matches('/')
    )
}

impl KeySource for HttpKeySource {
    async fn fetch(
        &self,
        server: &str,
        credential: &str,
        group: &str,
    ) -> Result<KeyPayload, FetchError> {
        let url = group_url(server, group);
        tracing::info!(
            url = %redact(&format!("{url}?key={credential}"), credential),
            "Fetching authorized_keys"
        );

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let credential = credential.to_string();
        let group = group.to_string();
        let timeout = self.timeout;
        let content = tokio::task::spawn_blocking(move || {
            get_keys(&agent, &url, &credential, &group, timeout)
        })
        .await
        .map_err(|e| FetchError::NetworkError(format!("fetch task failed: {e}")))??;

        tracing::info!(bytes = content.len(), "Successfully fetched authorized_keys");
        Ok(KeyPayload::new(content))
    }
}

fn get_keys(
    agent: &ureq::Agent,
    url: &str,
    credential: &str,
    group: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let response = agent
        .get(url)
        .query("key", credential)
        .set("X-API-Key", credential)
        .call();

    match response {
        Ok(resp) if resp.status() == 200 => resp.into_string().map_err(|e| {
            if is_timeout_kind(e.kind()) {
                FetchError::Timeout(timeout.as_secs())
            } else {
                FetchError::NetworkError(format!("reading response body: {e}"))
            }
        }),
        Ok(resp) => Err(FetchError::ServerError(resp.status())),
        Err(ureq::Error::Status(404, _)) => Err(FetchError::GroupNotFound(group.to_string())),
        Err(ureq::Error::Status(401, _)) => Err(FetchError::AuthFailed),
        Err(ureq::Error::Status(code, _)) => Err(FetchError::ServerError(code)),
        Err(ureq::Error::Transport(transport)) => {
            if transport_timed_out(&transport) {
                Err(FetchError::Timeout(timeout.as_secs()))
            } else {
                Err(FetchError::NetworkError(transport.to_string()))
            }
        }
    }
}

fn transport_timed_out(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(|io| is_timeout_kind(io.kind()))
}

fn is_timeout_kind(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::WouldBlock)
}
