//! chathook core library.
//!
//! Builders, validation, and delivery for webhook chat notifications in two
//! wire dialects: the room API (flat document plus a nested card, bearer
//! auth, HTTP 204 on success) and the space API (text plus a cards array,
//! plain webhook URL, HTTP 200 on success).
//!
//! Setters accumulate a wire-format document without validating; all
//! constraint checking is deferred to [`Notification::send`], which collects
//! every violation, flushes queued card attributes, applies the deferred
//! document transforms, and performs exactly one POST.

pub mod config;
pub mod errors;
pub mod lozenge;
pub mod notification;
pub mod room;
pub mod space;
pub mod transport;
pub mod validate;

// Re-exports for convenience.
pub use config::AppConfig;
pub use errors::{ConfigError, NotificationError};
pub use notification::Notification;
pub use room::RoomNotification;
pub use space::SpaceNotification;
