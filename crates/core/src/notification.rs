//! The capability shared by both notification dialects.

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::NotificationError;
use crate::transport;

/// A webhook notification under construction.
///
/// Both dialects accumulate a wire-format document through chained setter
/// calls, defer all validation to send time, and deliver with a single
/// POST. The dialects differ only in field names, mutual-exclusion rules,
/// auth, and the success status code, so `send` is implemented once here.
#[async_trait]
pub trait Notification {
    /// Wire-format request document for this dialect.
    type Document: Serialize + Clone + Send + Sync;

    /// HTTP status the target API answers on success.
    const SUCCESS_STATUS: u16;

    /// Fixed resolution string identifying the target.
    const SUCCESS_MESSAGE: &'static str;

    /// Webhook endpoint receiving the POST.
    fn endpoint(&self) -> &str;

    /// Bearer token for the `Authorization` header, when the dialect
    /// requires one.
    fn auth_token(&self) -> Option<&str> {
        None
    }

    /// Snapshot of the document accumulated so far. Queued attributes are
    /// not part of the document until send time.
    fn document(&self) -> &Self::Document;

    /// Run the dialect's ordered field checks, returning every violation.
    fn validate(&self) -> Vec<String>;

    /// Produce the outgoing document: queued attributes flushed and
    /// deferred transforms applied. The builder itself is left untouched,
    /// so sending never consumes accumulated state.
    fn finalize(&self) -> Self::Document;

    /// Validate, finalize, and POST the notification.
    ///
    /// Rejects with [`NotificationError::Invalid`] before any network
    /// traffic when validation fails; otherwise issues exactly one POST and
    /// resolves with [`Self::SUCCESS_MESSAGE`] iff the endpoint answers
    /// [`Self::SUCCESS_STATUS`].
    async fn send(&self) -> Result<&'static str, NotificationError> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(NotificationError::Invalid(violations));
        }

        let body = self.finalize();
        transport::post(
            self.endpoint(),
            self.auth_token(),
            &body,
            Self::SUCCESS_STATUS,
            Self::SUCCESS_MESSAGE,
        )
        .await
    }
}
