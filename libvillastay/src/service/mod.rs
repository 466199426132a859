//! Service layer for Villastay
//!
//! Business logic shared by the TUI and the CLI. [`VillaService`] is the
//! entry point; it owns the [`ClientStore`] and hands out the specialised
//! sub-services:
//!
//! - `InboxService`: thread lists, paginated history, sending messages
//! - `ReviewService`: booking context and review submission
//! - `EventBus`: outcome events for subscribers
//!
//! # Example
//!
//! ```no_run
//! use libvillastay::service::VillaService;
//! use libvillastay::service::inbox::InboxTab;
//!
//! # async fn example() -> libvillastay::Result<()> {
//! let service = VillaService::new()?;
//! service.sign_in_configured().await?;
//!
//! let threads = service.inbox().threads(InboxTab::Upcoming).await?;
//! println!("{} upcoming stays", threads.len());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod inbox;
pub mod review;

use std::sync::Arc;

use self::events::{EventBus, EventReceiver};
use self::inbox::InboxService;
use self::review::ReviewService;
use crate::api::http::HttpBookingApi;
use crate::api::BookingApi;
use crate::error::VillaError;
use crate::schema::User;
use crate::session::TokenStore;
use crate::store::ClientStore;
use crate::{Config, Result};

/// Main service facade
///
/// Sub-services share one `Arc<ClientStore>`, so signing in through the
/// facade is visible to all of them.
pub struct VillaService {
    config: Config,
    store: Arc<ClientStore>,
    inbox: InboxService,
    review: ReviewService,
    event_bus: EventBus,
}

impl VillaService {
    /// Load configuration from the default location and connect over HTTP
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Connect over HTTP using `config` and the stored bearer token
    pub fn from_config(config: Config) -> Result<Self> {
        let tokens = TokenStore::new(config.token_path());
        let token = tokens.load()?;
        if token.is_none() {
            tracing::debug!("No bearer token stored; requests go out unauthenticated");
        }
        let api = HttpBookingApi::from_config(&config, token)?;
        tracing::debug!(base_url = %api.base_url(), "HTTP client ready");
        Ok(Self::assemble(config, Arc::new(api), Some(tokens)))
    }

    /// Use an existing API client (mock backends, tests)
    pub fn with_api(config: Config, api: Arc<dyn BookingApi>) -> Self {
        Self::assemble(config, api, None)
    }

    fn assemble(config: Config, api: Arc<dyn BookingApi>, tokens: Option<TokenStore>) -> Self {
        let store = Arc::new(ClientStore::new(api, tokens));
        let event_bus = EventBus::new(100);
        let inbox = InboxService::new(Arc::clone(&store), event_bus.clone());
        let review = ReviewService::new(Arc::clone(&store), event_bus.clone());
        Self {
            config,
            store,
            inbox,
            review,
            event_bus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<ClientStore> {
        &self.store
    }

    pub fn inbox(&self) -> &InboxService {
        &self.inbox
    }

    pub fn review(&self) -> &ReviewService {
        &self.review
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Sign in as `[session] user_id` (or `VILLASTAY_USER_ID`)
    pub async fn sign_in_configured(&self) -> Result<User> {
        let user_id = self.config.session.user_id.clone().ok_or_else(|| {
            VillaError::NotSignedIn(
                "no user configured; set [session] user_id or VILLASTAY_USER_ID".to_string(),
            )
        })?;
        self.store.sign_in(&user_id).await
    }

    pub fn logout(&self) -> Result<()> {
        self.store.logout()
    }
}
