//! Villastay - client library for the villa booking platform
//!
//! Shared schemas, the booking API client, the client store and the
//! services behind the host inbox and guest review front ends.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod schema;
pub mod service;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use api::{BookingApi, PageRequest, MESSAGE_PAGE_SIZE};
pub use config::Config;
pub use error::{ApiError, ConfigError, Result, SchemaError, VillaError};
pub use service::VillaService;
pub use store::{ClientStore, Notification, NotificationKind, NotificationQueue, ScreenSize};
