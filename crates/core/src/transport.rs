//! Outbound webhook transport.
//!
//! Exactly one POST per send: JSON body, optional bearer auth, and an exact
//! expected success status. A process-wide default client can be installed
//! to override request options (timeouts, proxy) for every subsequent send;
//! it must be set before concurrent use begins.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::NotificationError;

static DEFAULT_CLIENT: RwLock<Option<reqwest::Client>> = RwLock::new(None);

/// Install a process-wide HTTP client used by all subsequent sends.
pub fn set_default_client(client: reqwest::Client) {
    *DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(client);
}

/// Remove a previously installed default client, reverting to per-send
/// clients with stock options.
pub fn clear_default_client() {
    *DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

pub(crate) fn client() -> reqwest::Client {
    DEFAULT_CLIENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default()
}

/// POST `body` as JSON to `url` and map the response onto the dialect's
/// success contract: `success_status` resolves with `success_message`, any
/// other status or transport failure rejects.
pub(crate) async fn post<B: Serialize + ?Sized>(
    url: &str,
    auth_token: Option<&str>,
    body: &B,
    success_status: u16,
    success_message: &'static str,
) -> Result<&'static str, NotificationError> {
    debug!(url, "posting notification");

    let mut request = client().post(url).json(body);
    if let Some(token) = auth_token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();

    if status == success_status {
        info!(status, "webhook accepted notification");
        Ok(success_message)
    } else {
        let body = response.text().await.unwrap_or_default();
        warn!(status, body = %body, "webhook returned unexpected status");
        Err(NotificationError::UnexpectedStatus { status, body })
    }
}
